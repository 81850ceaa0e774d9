use std::sync::Arc;

use gp_core::error::CoreError;
use gp_core::program::{GlyphProgram, Material};
use gp_glyph::program::AsciiProgram;

/// Builds the transformation program on demand.
pub type ProgramBuilder = Box<dyn Fn() -> Result<Arc<dyn GlyphProgram>, CoreError> + Send>;

/// Matériau construit paresseusement, reconstruit seulement si invalidé.
///
/// A failed build leaves the cache empty and keeps it dirty, so the next
/// frame retries.
///
/// # Example
/// ```
/// use gp_render::program_cache::ProgramCache;
/// let mut cache = ProgramCache::ascii();
/// assert!(!cache.is_available());
/// cache.ensure();
/// cache.ensure();
/// assert!(cache.is_available());
/// assert_eq!(cache.build_count(), 1);
/// ```
pub struct ProgramCache {
    builder: ProgramBuilder,
    material: Option<Material>,
    dirty: bool,
    builds: u64,
}

impl ProgramCache {
    #[must_use]
    pub fn new(builder: ProgramBuilder) -> Self {
        Self {
            builder,
            material: None,
            dirty: true,
            builds: 0,
        }
    }

    /// Cache for the built-in [`AsciiProgram`].
    #[must_use]
    pub fn ascii() -> Self {
        Self::new(Box::new(|| Ok(Arc::new(AsciiProgram::new()) as Arc<dyn GlyphProgram>)))
    }

    /// Build the material if the cache is dirty.
    pub fn ensure(&mut self) {
        if !self.dirty {
            return;
        }
        // The previous instance is dropped before its replacement is built.
        self.material = None;
        self.builds += 1;
        match (self.builder)() {
            Ok(program) => {
                log::debug!("programme « {} » construit", program.name());
                self.material = Some(Material::new(program));
                self.dirty = false;
            }
            Err(e) => log::warn!("Programme de transformation indisponible : {e}"),
        }
    }

    /// Force a rebuild on the next [`ensure`](Self::ensure).
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.material.is_some()
    }

    #[must_use]
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.material.as_mut()
    }

    /// Build attempts so far, successful or not.
    #[must_use]
    pub fn build_count(&self) -> u64 {
        self.builds
    }
}

impl Default for ProgramCache {
    fn default() -> Self {
        Self::ascii()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_triggers_one_rebuild() {
        let mut cache = ProgramCache::ascii();
        cache.ensure();
        cache.invalidate();
        cache.ensure();
        cache.ensure();
        assert_eq!(cache.build_count(), 2);
        assert_eq!(cache.material().map(Material::program_name), Some("ascii"));
    }

    #[test]
    fn failed_build_retries_next_time() {
        let mut cache = ProgramCache::new(Box::new(|| Err(CoreError::Program("shader absent".into()))));
        cache.ensure();
        assert!(!cache.is_available());
        cache.ensure();
        assert_eq!(cache.build_count(), 2);
    }

    #[test]
    fn failed_rebuild_drops_previous_program() {
        use std::sync::atomic::{AtomicBool, Ordering};
        let fail = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fail);
        let mut cache = ProgramCache::new(Box::new(move || {
            if flag.load(Ordering::Relaxed) {
                Err(CoreError::Program("perdu".into()))
            } else {
                Ok(Arc::new(AsciiProgram::new()) as Arc<dyn GlyphProgram>)
            }
        }));
        cache.ensure();
        assert!(cache.is_available());
        fail.store(true, Ordering::Relaxed);
        cache.invalidate();
        cache.ensure();
        assert!(!cache.is_available());
    }
}
