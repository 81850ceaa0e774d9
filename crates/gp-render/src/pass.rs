use gp_core::error::CoreError;
use gp_core::params::StylizationParameters;
use gp_core::texture::TextureDescriptor;

use crate::context::RenderContext;
use crate::error::PassError;

/// Point d'injection d'une passe dans la frame, dans l'ordre d'exécution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderPassEvent {
    BeforeRendering,
    BeforeRenderingOpaques,
    AfterRenderingOpaques,
    BeforeRenderingPostProcessing,
    AfterRenderingPostProcessing,
    AfterRendering,
}

/// Per-frame lifecycle of a pass: `Idle → Configured → Executed → Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassState {
    Idle,
    Configured,
    Executed,
}

/// Why a pass left the camera target untouched this frame.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// The transformation program could not be built.
    TransformUnavailable,
    /// The frame's parameters were rejected.
    InvalidParameters(CoreError),
}

/// Result of one `execute` call.
#[derive(Clone, Debug, PartialEq)]
pub enum PassOutcome {
    Rendered,
    Skipped(SkipReason),
}

impl PassOutcome {
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered)
    }
}

/// What the host hands every pass for one frame.
#[derive(Clone, Debug)]
pub struct RenderingData {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Descriptor of the camera colour target.
    pub camera: TextureDescriptor,
    /// Stylisation settings for this frame.
    pub params: StylizationParameters,
}

/// A pass the host drives once per frame.
///
/// The host calls, in order, [`configure`](Self::configure),
/// [`execute`](Self::execute) and [`frame_cleanup`](Self::frame_cleanup).
/// `frame_cleanup` is called even if an earlier step failed.
pub trait RenderPass {
    /// Identifiant unique dans le renderer.
    fn name(&self) -> &'static str;

    /// Injection point.
    fn event(&self) -> RenderPassEvent;

    /// Acquire per-frame resources sized after `target`.
    ///
    /// # Errors
    /// [`PassError::InvalidState`] if called twice without cleanup.
    fn configure(&mut self, ctx: &mut RenderContext, target: &TextureDescriptor) -> Result<(), PassError>;

    /// Record and submit this frame's work.
    ///
    /// # Errors
    /// [`PassError`] on a host contract violation. A frame the pass chooses
    /// not to render is `Ok(PassOutcome::Skipped(_))`.
    fn execute(&mut self, ctx: &mut RenderContext, data: &RenderingData) -> Result<PassOutcome, PassError>;

    /// Release per-frame resources. Must not fail.
    fn frame_cleanup(&mut self, ctx: &mut RenderContext);
}
