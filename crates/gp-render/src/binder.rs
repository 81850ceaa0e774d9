use gp_core::params::StylizationParameters;
use gp_core::program::{Material, slots};

/// Écrit les paramètres de la frame dans les slots uniformes du matériau.
///
/// Returns `false` and leaves nothing bound if there is no material. Counts
/// and resolutions are bound as floats, `_monochromatic` as an int (0/1),
/// `_tileSize` as the integer division `frame_width / tiles_x`. An absent
/// atlas binds an empty `_CharTex` slot.
///
/// `_tileSize` is informational: programs may derive the tile side from
/// `_resolutionX / _tilesX` themselves, as [`AsciiProgram`] does.
///
/// [`AsciiProgram`]: gp_glyph::program::AsciiProgram
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use gp_core::params::StylizationParameters;
/// use gp_core::program::Material;
/// use gp_glyph::program::AsciiProgram;
/// use gp_render::binder::bind_parameters;
///
/// let mut mat = Material::new(Arc::new(AsciiProgram::new()));
/// assert!(bind_parameters(Some(&mut mat), &StylizationParameters::default()));
/// assert_eq!(mat.uniforms().get_float("_tileSize"), Some(24.0));
/// assert!(!bind_parameters(None, &StylizationParameters::default()));
/// ```
pub fn bind_parameters(material: Option<&mut Material>, params: &StylizationParameters) -> bool {
    let Some(material) = material else {
        log::trace!("binder : aucun matériau, rien à lier");
        return false;
    };
    let u = material.uniforms_mut();
    u.set_texture(slots::CHAR_TEX, params.glyph_atlas.clone());
    u.set_float(slots::TILES_X, params.tiles_x as f32);
    u.set_float(slots::TILES_Y, params.tiles_y as f32);
    u.set_float(slots::RESOLUTION_X, params.frame_width as f32);
    u.set_float(slots::RESOLUTION_Y, params.frame_height as f32);
    u.set_float(slots::TILE_SIZE, params.tile_size() as f32);
    u.set_float(slots::CHAR_COUNT, params.glyph_count as f32);
    u.set_int(slots::MONOCHROMATIC, i32::from(params.monochrome));
    u.set_float(slots::BRIGHTNESS, params.brightness);
    let [r, g, b] = params.mono_tint;
    u.set_vector(slots::MONO_TINT, [r, g, b, 1.0]);
    log::trace!(
        "binder : {}×{} tuiles de {} px, {} glyphes, mono={}, gain={}",
        params.tiles_x,
        params.tiles_y,
        params.tile_size(),
        params.glyph_count,
        params.monochrome,
        params.brightness
    );
    true
}
