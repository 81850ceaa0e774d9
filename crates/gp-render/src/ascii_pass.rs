use gp_core::config::TilePolicy;
use gp_core::params::StylizationParameters;
use gp_core::program::Material;
use gp_core::texture::{ColorFormat, TextureDescriptor};

use crate::binder::bind_parameters;
use crate::context::RenderContext;
use crate::error::PassError;
use crate::pass::{PassOutcome, PassState, RenderPass, RenderPassEvent, RenderingData, SkipReason};
use crate::pool::TextureHandle;
use crate::program_cache::ProgramCache;

/// Name of the pooled command buffer the pass records into.
pub const COMMAND_BUFFER_NAME: &str = "ASCIIPass";

/// Passe post-process qui remplace la cible caméra par sa version ASCII.
///
/// Per frame:
/// 1. `configure` leases an HDR transient the size of the target and makes
///    sure the program is built;
/// 2. `execute` binds the frame's parameters, then records and submits
///    `camera → transient` through the material and `transient → camera`
///    as a plain copy;
/// 3. `frame_cleanup` returns the transient to the pool.
///
/// If the program is unavailable, or the parameters are rejected, the
/// camera target is left untouched and the outcome says why.
pub struct AsciiPass {
    tile_policy: TilePolicy,
    programs: ProgramCache,
    transient: Option<TextureHandle>,
    state: PassState,
}

impl AsciiPass {
    #[must_use]
    pub fn new(tile_policy: TilePolicy) -> Self {
        Self::with_program_cache(tile_policy, ProgramCache::ascii())
    }

    #[must_use]
    pub fn with_program_cache(tile_policy: TilePolicy, programs: ProgramCache) -> Self {
        Self {
            tile_policy,
            programs,
            transient: None,
            state: PassState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> PassState {
        self.state
    }

    /// Transient leased for the current frame, if configured.
    #[must_use]
    pub fn transient(&self) -> Option<TextureHandle> {
        self.transient
    }

    #[must_use]
    pub fn material(&self) -> Option<&Material> {
        self.programs.material()
    }

    #[must_use]
    pub fn tile_policy(&self) -> TilePolicy {
        self.tile_policy
    }

    /// Rebuild the program at the next `configure`.
    pub fn invalidate_program(&mut self) {
        self.programs.invalidate();
    }

    fn expect_state(&self, expected: PassState) -> Result<(), PassError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PassError::InvalidState {
                expected,
                found: self.state,
            })
        }
    }

    /// Run the pass with explicit parameters.
    ///
    /// # Errors
    /// [`PassError::InvalidState`] unless configured; blit errors from the
    /// context are propagated.
    pub fn execute_with(
        &mut self,
        ctx: &mut RenderContext,
        params: StylizationParameters,
    ) -> Result<PassOutcome, PassError> {
        self.expect_state(PassState::Configured)?;
        self.state = PassState::Executed;

        if !self.programs.is_available() {
            log::debug!("ascii : programme indisponible, frame ignorée");
            return Ok(PassOutcome::Skipped(SkipReason::TransformUnavailable));
        }
        if let Err(e) = params.validate(self.tile_policy) {
            log::warn!("ascii : paramètres rejetés ({e}), frame ignorée");
            return Ok(PassOutcome::Skipped(SkipReason::InvalidParameters(e)));
        }
        let Some(transient) = self.transient else {
            return Err(PassError::InvalidState {
                expected: PassState::Configured,
                found: PassState::Idle,
            });
        };

        bind_parameters(self.programs.material_mut(), &params);

        let camera = ctx.camera_color();
        let mut cmd = ctx.command_buffers().get(COMMAND_BUFFER_NAME);
        cmd.blit(camera, transient, self.programs.material());
        cmd.blit(transient, camera, None);
        let submitted = ctx.execute_command_buffer(&cmd);
        ctx.command_buffers().release(cmd);
        submitted?;
        Ok(PassOutcome::Rendered)
    }
}

impl Default for AsciiPass {
    fn default() -> Self {
        Self::new(TilePolicy::default())
    }
}

impl RenderPass for AsciiPass {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn event(&self) -> RenderPassEvent {
        RenderPassEvent::BeforeRenderingPostProcessing
    }

    fn configure(&mut self, ctx: &mut RenderContext, target: &TextureDescriptor) -> Result<(), PassError> {
        self.expect_state(PassState::Idle)?;
        let desc = target.with_format(ColorFormat::DefaultHdr);
        self.transient = Some(ctx.get_temporary(desc));
        self.programs.ensure();
        self.state = PassState::Configured;
        Ok(())
    }

    fn execute(&mut self, ctx: &mut RenderContext, data: &RenderingData) -> Result<PassOutcome, PassError> {
        self.execute_with(ctx, data.params.clone())
    }

    fn frame_cleanup(&mut self, ctx: &mut RenderContext) {
        if let Some(handle) = self.transient.take()
            && let Err(e) = ctx.release_temporary(handle)
        {
            log::error!("ascii : libération du temporaire impossible : {e}");
        }
        if self.state == PassState::Idle {
            log::debug!("ascii : cleanup sans frame en cours");
        }
        self.state = PassState::Idle;
    }
}
