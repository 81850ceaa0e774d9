/// Hôte de rendu minimal et passe ASCII pour glyphpass.
///
/// The host side mirrors what a scriptable render pipeline hands a
/// post-process pass: a target descriptor, a transient texture pool,
/// pooled command buffers and an ordered list of injection points. The
/// [`ascii_pass::AsciiPass`] plugs into it through [`pass::RenderPass`].
pub mod ascii_pass;
pub mod binder;
pub mod command;
pub mod context;
pub mod error;
pub mod pass;
pub mod pool;
pub mod program_cache;
pub mod renderer;

pub use ascii_pass::AsciiPass;
pub use context::RenderContext;
pub use error::PassError;
pub use pass::{PassOutcome, PassState, RenderPass, RenderPassEvent, RenderingData, SkipReason};
pub use pool::{PoolStats, TextureHandle, TexturePool};
pub use renderer::{FrameReport, FrameRenderer};
