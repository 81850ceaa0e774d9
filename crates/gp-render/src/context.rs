use gp_core::texture::{RenderTexture, TextureDescriptor};

use crate::command::{Command, CommandBuffer, CommandBufferPool};
use crate::error::PassError;
use crate::pool::{TextureHandle, TexturePool};

/// Per-renderer resources shared by every pass.
///
/// Owns the texture pool, the camera colour target and the command buffer
/// pool. Commands recorded by a pass take effect only when the buffer is
/// submitted through [`execute_command_buffer`](Self::execute_command_buffer).
pub struct RenderContext {
    pool: TexturePool,
    camera_color: TextureHandle,
    commands: CommandBufferPool,
}

impl RenderContext {
    #[must_use]
    pub fn new(camera: TextureDescriptor) -> Self {
        let mut pool = TexturePool::new();
        let camera_color = pool.create_persistent(camera);
        Self {
            pool,
            camera_color,
            commands: CommandBufferPool::default(),
        }
    }

    /// Handle of the camera colour target.
    #[must_use]
    pub fn camera_color(&self) -> TextureHandle {
        self.camera_color
    }

    #[must_use]
    pub fn camera_descriptor(&self) -> TextureDescriptor {
        self.camera_texture().descriptor
    }

    #[must_use]
    pub fn camera_texture(&self) -> &RenderTexture {
        // The camera slot is persistent and only detached inside a blit.
        self.pool
            .get(self.camera_color)
            .unwrap_or_else(|| unreachable!("cible caméra détachée"))
    }

    pub fn camera_texture_mut(&mut self) -> &mut RenderTexture {
        self.pool
            .get_mut(self.camera_color)
            .unwrap_or_else(|| unreachable!("cible caméra détachée"))
    }

    /// Reallocate the camera target, dropping its content.
    ///
    /// Free pool storage of another extent is evicted with it.
    pub fn resize_camera(&mut self, desc: TextureDescriptor) {
        if self.camera_descriptor() == desc {
            return;
        }
        log::debug!("caméra redimensionnée : {}×{}", desc.width, desc.height);
        if let Err(e) = self.pool.replace(self.camera_color, RenderTexture::new(desc)) {
            log::error!("redimensionnement caméra : {e}");
        }
        self.pool.trim(desc.width, desc.height);
    }

    pub fn get_temporary(&mut self, desc: TextureDescriptor) -> TextureHandle {
        self.pool.get_temporary(desc)
    }

    /// # Errors
    /// See [`TexturePool::release_temporary`].
    pub fn release_temporary(&mut self, handle: TextureHandle) -> Result<(), PassError> {
        self.pool.release_temporary(handle)
    }

    #[must_use]
    pub fn pool(&self) -> &TexturePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut TexturePool {
        &mut self.pool
    }

    pub fn command_buffers(&mut self) -> &mut CommandBufferPool {
        &mut self.commands
    }

    /// Run every command of `cmd`, in order.
    ///
    /// # Errors
    /// Stops at the first failing command: [`PassError::UnknownTexture`] or
    /// [`PassError::DimensionMismatch`]. Earlier commands stay applied.
    pub fn execute_command_buffer(&mut self, cmd: &CommandBuffer) -> Result<(), PassError> {
        log::trace!("soumission « {} » : {} commande(s)", cmd.name(), cmd.len());
        for command in cmd.commands() {
            match command {
                Command::Blit { src, dst, material } => {
                    self.blit(*src, *dst, material.as_ref())?;
                }
            }
        }
        Ok(())
    }

    fn blit(
        &mut self,
        src: TextureHandle,
        dst: TextureHandle,
        material: Option<&gp_core::program::Material>,
    ) -> Result<(), PassError> {
        let src_desc = self.pool.descriptor(src).ok_or(PassError::UnknownTexture(src))?;
        let dst_desc = self.pool.descriptor(dst).ok_or(PassError::UnknownTexture(dst))?;
        if (src_desc.width, src_desc.height) != (dst_desc.width, dst_desc.height) {
            return Err(PassError::DimensionMismatch {
                src: src_desc,
                dst: dst_desc,
            });
        }

        let (mut target, temporary) = self.pool.take(dst).ok_or(PassError::UnknownTexture(dst))?;
        // In-place blit reads a snapshot of the destination.
        let snapshot;
        let source = if src == dst {
            snapshot = target.clone();
            &snapshot
        } else {
            match self.pool.get(src) {
                Some(t) => t,
                None => {
                    self.pool.put_back(dst, target, temporary);
                    return Err(PassError::UnknownTexture(src));
                }
            }
        };
        match material {
            Some(mat) => mat.apply(source, &mut target),
            None => {
                if let Err(e) = target.copy_from(source) {
                    log::error!("blit {src} → {dst} : {e}");
                }
            }
        }
        self.pool.put_back(dst, target, temporary);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gp_core::texture::ColorFormat;

    use super::*;

    #[test]
    fn plain_blit_copies_and_reencodes() {
        let desc = TextureDescriptor::new(4, 4, ColorFormat::Rgba8Unorm);
        let mut ctx = RenderContext::new(desc);
        ctx.camera_texture_mut().fill([0.5, 0.25, 1.0, 1.0]);

        let tmp = ctx.get_temporary(desc.with_format(ColorFormat::DefaultHdr));
        let mut cmd = ctx.command_buffers().get("test");
        cmd.blit(ctx.camera_color(), tmp, None);
        ctx.execute_command_buffer(&cmd).unwrap();

        let copied = ctx.pool().get(tmp).unwrap().texel(1, 1);
        assert_eq!(copied, ctx.camera_texture().texel(1, 1));
        ctx.release_temporary(tmp).unwrap();
        ctx.command_buffers().release(cmd);
    }

    #[test]
    fn blit_between_sizes_is_rejected() {
        let mut ctx = RenderContext::new(TextureDescriptor::new(4, 4, ColorFormat::Rgba8Unorm));
        let tmp = ctx.get_temporary(TextureDescriptor::new(2, 2, ColorFormat::DefaultHdr));
        let mut cmd = ctx.command_buffers().get("test");
        cmd.blit(ctx.camera_color(), tmp, None);
        assert!(matches!(
            ctx.execute_command_buffer(&cmd),
            Err(PassError::DimensionMismatch { .. })
        ));
        // Both textures still in the pool.
        assert!(ctx.pool().get(tmp).is_some());
        assert_eq!(ctx.camera_descriptor().width, 4);
    }

    #[test]
    fn blit_to_released_texture_fails() {
        let desc = TextureDescriptor::new(2, 2, ColorFormat::DefaultHdr);
        let mut ctx = RenderContext::new(desc);
        let tmp = ctx.get_temporary(desc);
        ctx.release_temporary(tmp).unwrap();
        let mut cmd = ctx.command_buffers().get("test");
        cmd.blit(ctx.camera_color(), tmp, None);
        assert_eq!(ctx.execute_command_buffer(&cmd), Err(PassError::UnknownTexture(tmp)));
    }

    #[test]
    fn resize_replaces_camera_storage() {
        let mut ctx = RenderContext::new(TextureDescriptor::new(2, 2, ColorFormat::Rgba8Unorm));
        let handle = ctx.camera_color();
        ctx.resize_camera(TextureDescriptor::new(6, 3, ColorFormat::Rgba8Unorm));
        assert_eq!(ctx.camera_color(), handle);
        assert_eq!((ctx.camera_descriptor().width, ctx.camera_descriptor().height), (6, 3));
    }

    #[test]
    fn resize_evicts_stale_free_storage() {
        let desc = TextureDescriptor::new(4, 4, ColorFormat::Rgba8Unorm);
        let mut ctx = RenderContext::new(desc);
        let tmp = ctx.get_temporary(desc.with_format(ColorFormat::DefaultHdr));
        ctx.release_temporary(tmp).unwrap();
        assert_eq!(ctx.pool().free_len(), 1);

        ctx.resize_camera(TextureDescriptor::new(8, 2, ColorFormat::Rgba8Unorm));
        assert_eq!(ctx.pool().free_len(), 0);
    }
}
