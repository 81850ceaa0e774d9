use std::collections::HashMap;
use std::fmt;

use gp_core::texture::{RenderTexture, TextureDescriptor};

use crate::error::PassError;

/// Opaque identifier of a texture owned by a [`TexturePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Compteurs du pool, pour vérifier l'équilibre allocation/libération.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Temporary leases handed out.
    pub allocations: u64,
    /// Temporary leases returned.
    pub releases: u64,
    /// Temporaries currently leased.
    pub live: usize,
    /// Fresh storage allocations (leases not served from the free list).
    pub storage_allocations: u64,
}

struct Slot {
    texture: RenderTexture,
    temporary: bool,
}

/// Owns every texture the host and its passes touch.
///
/// Persistent textures (the camera colour target) live until the pool is
/// dropped. Temporaries are leased for one frame; released storage is kept
/// on a free list and handed back, zeroed, to the next lease with the same
/// descriptor.
///
/// # Example
/// ```
/// use gp_core::texture::{ColorFormat, TextureDescriptor};
/// use gp_render::pool::TexturePool;
///
/// let mut pool = TexturePool::new();
/// let desc = TextureDescriptor::new(64, 32, ColorFormat::DefaultHdr);
/// let tmp = pool.get_temporary(desc);
/// assert_eq!(pool.stats().live, 1);
/// pool.release_temporary(tmp).unwrap();
/// assert_eq!(pool.stats().live, 0);
/// ```
#[derive(Default)]
pub struct TexturePool {
    slots: HashMap<TextureHandle, Slot>,
    free: Vec<RenderTexture>,
    next_id: u32,
    stats: PoolStats,
}

impl TexturePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, texture: RenderTexture, temporary: bool) -> TextureHandle {
        let handle = TextureHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.slots.insert(handle, Slot { texture, temporary });
        handle
    }

    /// Create a texture that is never released by frame cleanup.
    pub fn create_persistent(&mut self, desc: TextureDescriptor) -> TextureHandle {
        self.insert(RenderTexture::new(desc), false)
    }

    /// Lease a zeroed texture for the current frame.
    pub fn get_temporary(&mut self, desc: TextureDescriptor) -> TextureHandle {
        let texture = match self.free.iter().position(|t| t.descriptor == desc) {
            Some(i) => {
                let mut t = self.free.swap_remove(i);
                t.data.fill(0.0);
                t
            }
            None => {
                self.stats.storage_allocations += 1;
                RenderTexture::new(desc)
            }
        };
        self.stats.allocations += 1;
        self.stats.live += 1;
        let handle = self.insert(texture, true);
        log::trace!("pool: bail {handle} {}×{}", desc.width, desc.height);
        handle
    }

    /// Return a leased texture to the pool.
    ///
    /// # Errors
    /// [`PassError::UnknownTexture`] if the handle is unknown, already
    /// released, or names a persistent texture.
    pub fn release_temporary(&mut self, handle: TextureHandle) -> Result<(), PassError> {
        match self.slots.get(&handle) {
            Some(slot) if slot.temporary => {}
            _ => return Err(PassError::UnknownTexture(handle)),
        }
        if let Some(slot) = self.slots.remove(&handle) {
            self.free.push(slot.texture);
        }
        self.stats.releases += 1;
        self.stats.live -= 1;
        log::trace!("pool: libère {handle}");
        Ok(())
    }

    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&RenderTexture> {
        self.slots.get(&handle).map(|s| &s.texture)
    }

    #[must_use]
    pub fn get_mut(&mut self, handle: TextureHandle) -> Option<&mut RenderTexture> {
        self.slots.get_mut(&handle).map(|s| &mut s.texture)
    }

    #[must_use]
    pub fn descriptor(&self, handle: TextureHandle) -> Option<TextureDescriptor> {
        self.get(handle).map(|t| t.descriptor)
    }

    /// Replace the storage behind a handle, keeping its lifetime class.
    ///
    /// # Errors
    /// [`PassError::UnknownTexture`] if the handle is unknown.
    pub fn replace(&mut self, handle: TextureHandle, texture: RenderTexture) -> Result<(), PassError> {
        let slot = self
            .slots
            .get_mut(&handle)
            .ok_or(PassError::UnknownTexture(handle))?;
        slot.texture = texture;
        Ok(())
    }

    /// Detach a texture so it can be written while another one is read.
    /// Must be given back with [`put_back`](Self::put_back).
    pub(crate) fn take(&mut self, handle: TextureHandle) -> Option<(RenderTexture, bool)> {
        self.slots
            .remove(&handle)
            .map(|s| (s.texture, s.temporary))
    }

    pub(crate) fn put_back(&mut self, handle: TextureHandle, texture: RenderTexture, temporary: bool) {
        self.slots.insert(handle, Slot { texture, temporary });
    }

    /// Drop free storage whose extent is not `width × height`.
    pub fn trim(&mut self, width: u32, height: u32) {
        let before = self.free.len();
        self.free
            .retain(|t| t.descriptor.width == width && t.descriptor.height == height);
        if self.free.len() != before {
            log::debug!("pool : {} texture(s) libre(s) évincée(s)", before - self.free.len());
        }
    }

    /// Textures released and waiting for reuse.
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}
