use gp_core::frame::FrameBuffer;
use gp_core::params::StylizationParameters;
use gp_core::texture::{ColorFormat, RenderTexture, TextureDescriptor};

use crate::context::RenderContext;
use crate::error::PassError;
use crate::pass::{PassOutcome, RenderPass, RenderingData};

/// Résumé d'une frame rendue.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    /// Outcome of each pass, in execution order.
    pub outcomes: Vec<(&'static str, PassOutcome)>,
}

impl FrameReport {
    /// Outcome of the pass named `name`, if it ran.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&PassOutcome> {
        self.outcomes.iter().find(|(n, _)| *n == name).map(|(_, o)| o)
    }
}

/// Host that drives registered passes over a camera target, frame by frame.
///
/// Passes run sorted by [`RenderPassEvent`](crate::pass::RenderPassEvent);
/// passes sharing an event keep their insertion order.
///
/// # Example
/// ```
/// use gp_core::frame::FrameBuffer;
/// use gp_core::params::StylizationParameters;
/// use gp_render::{AsciiPass, FrameRenderer};
///
/// let mut renderer = FrameRenderer::new(64, 64);
/// renderer.add_pass(Box::new(AsciiPass::default()));
/// renderer.upload(&FrameBuffer::new(64, 64));
/// let params = StylizationParameters {
///     frame_width: 64,
///     frame_height: 64,
///     tiles_x: 8,
///     tiles_y: 8,
///     ..StylizationParameters::default()
/// };
/// let report = renderer.render_frame(params).unwrap();
/// assert!(report.outcome("ascii").unwrap().is_rendered());
/// assert_eq!(renderer.read_back().width, 64);
/// ```
pub struct FrameRenderer {
    ctx: RenderContext,
    passes: Vec<Box<dyn RenderPass>>,
    frame_index: u64,
}

impl FrameRenderer {
    /// Renderer with an 8-bit camera target of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_target(TextureDescriptor::new(width, height, ColorFormat::Rgba8Unorm))
    }

    #[must_use]
    pub fn with_target(camera: TextureDescriptor) -> Self {
        Self {
            ctx: RenderContext::new(camera),
            passes: Vec::new(),
            frame_index: 0,
        }
    }

    /// Register a pass, replacing any pass with the same name.
    pub fn add_pass(&mut self, pass: Box<dyn RenderPass>) {
        let name = pass.name();
        if let Some(i) = self.passes.iter().position(|p| p.name() == name) {
            log::debug!("passe « {name} » remplacée");
            self.passes.remove(i);
        }
        self.passes.push(pass);
        self.passes.sort_by_key(|p| p.event());
    }

    /// Unregister a pass. Returns `false` if none had that name.
    pub fn remove_pass(&mut self, name: &str) -> bool {
        let before = self.passes.len();
        self.passes.retain(|p| p.name() != name);
        before != self.passes.len()
    }

    /// Registered pass names, in execution order.
    #[must_use]
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Copy `frame` into the camera target, resizing it if needed.
    pub fn upload(&mut self, frame: &FrameBuffer) {
        let format = self.ctx.camera_descriptor().format;
        let tex = RenderTexture::from_frame(frame, format);
        self.ctx.resize_camera(tex.descriptor);
        *self.ctx.camera_texture_mut() = tex;
    }

    /// Read the camera target back as 8-bit RGBA.
    #[must_use]
    pub fn read_back(&self) -> FrameBuffer {
        self.ctx.camera_texture().to_frame()
    }

    /// Run one frame: configure every pass, execute them in order, then
    /// clean every configured pass up.
    ///
    /// # Errors
    /// The first [`PassError`] raised by a pass. Cleanup still runs for every
    /// pass that was configured, and the frame counter still advances.
    pub fn render_frame(&mut self, params: StylizationParameters) -> Result<FrameReport, PassError> {
        let data = RenderingData {
            frame_index: self.frame_index,
            camera: self.ctx.camera_descriptor(),
            params,
        };
        self.frame_index += 1;

        let mut configured = 0;
        let mut failure = None;
        for pass in &mut self.passes {
            if let Err(e) = pass.configure(&mut self.ctx, &data.camera) {
                failure = Some(e);
                break;
            }
            configured += 1;
        }
        let mut outcomes = Vec::with_capacity(self.passes.len());
        if failure.is_none() {
            for pass in &mut self.passes {
                match pass.execute(&mut self.ctx, &data) {
                    Ok(outcome) => {
                        log::trace!("frame {} : {} → {outcome:?}", data.frame_index, pass.name());
                        outcomes.push((pass.name(), outcome));
                    }
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }
        }
        for pass in self.passes.iter_mut().take(configured) {
            pass.frame_cleanup(&mut self.ctx);
        }

        if let Some(e) = failure {
            log::error!("frame {} interrompue : {e}", data.frame_index);
            return Err(e);
        }
        Ok(FrameReport {
            frame_index: data.frame_index,
            outcomes,
        })
    }
}
