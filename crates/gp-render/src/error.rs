use gp_core::texture::TextureDescriptor;
use thiserror::Error;

use crate::pass::PassState;
use crate::pool::TextureHandle;

/// Host contract violations. Degraded frames are not errors: see
/// [`PassOutcome`](crate::pass::PassOutcome).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PassError {
    /// A lifecycle call arrived out of order.
    #[error("État de passe invalide : attendu {expected:?}, trouvé {found:?}")]
    InvalidState {
        /// State the call requires.
        expected: PassState,
        /// State the pass was in.
        found: PassState,
    },

    /// Handle is not (or no longer) known to the pool.
    #[error("Texture inconnue : {0}")]
    UnknownTexture(TextureHandle),

    /// Full-screen blit between textures of different extents.
    #[error("Blit entre tailles différentes : {src:?} → {dst:?}")]
    DimensionMismatch {
        /// Source descriptor.
        src: TextureDescriptor,
        /// Destination descriptor.
        dst: TextureDescriptor,
    },
}
