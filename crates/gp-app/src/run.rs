use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use gp_core::config::{AsciiSettings, TilePolicy, load_settings};
use gp_core::frame::FrameBuffer;
use gp_glyph::atlas::GlyphAtlas;
use gp_render::{AsciiPass, FrameRenderer, PassOutcome, PoolStats};

use crate::cli::Cli;

/// Bilan d'une exécution complète.
#[derive(Debug)]
pub struct RunSummary {
    pub frames: u32,
    pub rendered: u32,
    pub skipped: u32,
    pub pool: PoolStats,
}

/// Charge la config, ou les défauts si le fichier n'existe pas.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed.
pub fn resolve_settings(cli: &Cli) -> Result<AsciiSettings> {
    if cli.config.exists() {
        load_settings(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(AsciiSettings::default())
    }
}

/// Apply command-line overrides on top of the file settings.
pub fn apply_overrides(settings: &mut AsciiSettings, cli: &Cli, input: (u32, u32)) {
    if cli.fit {
        settings.resolution_x = input.0;
        settings.resolution_y = input.1;
    }
    if let Some(ref atlas) = cli.atlas {
        settings.char_tex = Some(atlas.clone());
    }
    if let Some(tx) = cli.tiles_x {
        settings.tiles_x = tx;
    }
    if let Some(ty) = cli.tiles_y {
        settings.tiles_y = ty;
    }
    if let Some(n) = cli.char_count {
        settings.char_count = n;
    }
    if let Some(b) = cli.brightness {
        settings.brightness = b;
    }
    if cli.mono {
        settings.monochromatic = 1;
    }
    if cli.round_down {
        settings.tile_policy = TilePolicy::RoundDown;
    }
    settings.clamp_all();
}

/// Load an image as an 8-bit RGBA frame.
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded.
pub fn load_frame(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path)
        .with_context(|| format!("Impossible d'ouvrir l'image : {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(FrameBuffer {
        data: img.into_raw(),
        width,
        height,
    })
}

/// Write an 8-bit RGBA frame as PNG.
///
/// # Errors
/// Returns an error if the buffer is inconsistent or the write fails.
pub fn save_frame(frame: &FrameBuffer, path: &Path) -> Result<()> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .context("Buffer de sortie incohérent")?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Écriture impossible : {}", path.display()))?;
    Ok(())
}

/// Rééchantillonne `frame` à `width × height` (filtre bilinéaire).
///
/// Returns a copy when the frame already has that size.
///
/// # Errors
/// Returns an error if a buffer does not match its dimensions.
pub fn resize_frame(frame: &FrameBuffer, width: u32, height: u32) -> Result<FrameBuffer> {
    if (frame.width, frame.height) == (width, height) {
        return Ok(frame.clone());
    }
    log::debug!(
        "Entrée {}×{} → {}×{}",
        frame.width,
        frame.height,
        width,
        height
    );
    // fast_image_resize veut une source mutable.
    let mut src_buf = frame.data.clone();
    let src = Image::from_slice_u8(frame.width, frame.height, &mut src_buf, PixelType::U8x4)
        .context("Dimensions source invalides")?;
    let mut out = FrameBuffer::new(width, height);
    let mut dst = Image::from_slice_u8(width, height, &mut out.data, PixelType::U8x4)
        .context("Dimensions cible invalides")?;
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    Resizer::new()
        .resize(&src, &mut dst, Some(&options))
        .context("Rééchantillonnage impossible")?;
    Ok(out)
}

/// Load the configured atlas. A missing or unreadable atlas falls back to
/// the built-in ramp with a warning.
fn load_atlas(settings: &AsciiSettings) -> Option<Arc<gp_core::texture::RenderTexture>> {
    let path = settings.char_tex.as_deref()?;
    match GlyphAtlas::from_image(path, settings.char_count) {
        Ok(atlas) => {
            log::debug!(
                "Atlas {} : {} glyphes de {} px",
                path.display(),
                atlas.glyph_count(),
                atlas.cell_width()
            );
            Some(Arc::clone(atlas.texture()))
        }
        Err(e) => {
            log::warn!("{e}. Rampe intégrée utilisée.");
            None
        }
    }
}

/// Render `frames` frames of `input` and return the last one.
///
/// The input is resampled to the target resolution first, so the output is
/// always `resolution_x × resolution_y`.
///
/// # Errors
/// Propagates resampling failures and host contract violations.
pub fn render(input: &FrameBuffer, settings: &AsciiSettings, frames: u32) -> Result<(FrameBuffer, RunSummary)> {
    let atlas = load_atlas(settings);
    let frame = resize_frame(input, settings.resolution_x, settings.resolution_y)?;
    let mut renderer = FrameRenderer::new(settings.resolution_x, settings.resolution_y);
    renderer.add_pass(Box::new(AsciiPass::new(settings.tile_policy)));

    let mut summary = RunSummary {
        frames: frames.max(1),
        rendered: 0,
        skipped: 0,
        pool: PoolStats::default(),
    };
    for _ in 0..summary.frames {
        renderer.upload(&frame);
        let report = renderer
            .render_frame(settings.to_parameters(atlas.clone()))
            .context("Frame interrompue")?;
        match report.outcome("ascii") {
            Some(PassOutcome::Rendered) => summary.rendered += 1,
            Some(PassOutcome::Skipped(reason)) => {
                log::warn!("Frame {} non stylisée : {reason:?}", report.frame_index);
                summary.skipped += 1;
            }
            None => {}
        }
    }
    summary.pool = renderer.context().pool().stats();
    log::info!(
        "{} frame(s) : {} stylisée(s), {} ignorée(s), pool {}/{} (vivants {}, allocations réelles {})",
        summary.frames,
        summary.rendered,
        summary.skipped,
        summary.pool.allocations,
        summary.pool.releases,
        summary.pool.live,
        summary.pool.storage_allocations
    );
    Ok((renderer.read_back(), summary))
}

/// Full command: load, render, save.
///
/// # Errors
/// Returns an error on I/O, config or render failure.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let input = load_frame(&cli.input)?;
    let mut settings = resolve_settings(cli)?;
    apply_overrides(&mut settings, cli, (input.width, input.height));
    log::debug!("Réglages effectifs : {settings:?}");

    let (output, summary) = render(&input, &settings, cli.frames)?;
    save_frame(&output, &cli.output)?;
    log::info!("Écrit : {}", cli.output.display());
    Ok(summary)
}
