use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::texture::RenderTexture;

/// Noms des slots uniformes lus par le programme glyphe.
pub mod slots {
    pub const CHAR_TEX: &str = "_CharTex";
    pub const TILES_X: &str = "_tilesX";
    pub const TILES_Y: &str = "_tilesY";
    pub const RESOLUTION_X: &str = "_resolutionX";
    pub const RESOLUTION_Y: &str = "_resolutionY";
    pub const TILE_SIZE: &str = "_tileSize";
    pub const CHAR_COUNT: &str = "_charCount";
    pub const MONOCHROMATIC: &str = "_monochromatic";
    pub const BRIGHTNESS: &str = "_brightness";
    pub const MONO_TINT: &str = "_monoTint";
}

/// A value bound to a named uniform slot.
#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vector([f32; 4]),
    /// `None` is a bound-but-empty texture slot.
    Texture(Option<Arc<RenderTexture>>),
}

/// Named uniform slots, ordered by name so dumps are stable.
///
/// # Example
/// ```
/// use gp_core::program::Uniforms;
/// let mut u = Uniforms::default();
/// u.set_float("_tilesX", 80.0);
/// assert_eq!(u.get_float("_tilesX"), Some(80.0));
/// assert_eq!(u.get_int("_tilesX"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Uniforms {
    values: BTreeMap<&'static str, UniformValue>,
}

impl Uniforms {
    pub fn set_float(&mut self, name: &'static str, v: f32) {
        self.values.insert(name, UniformValue::Float(v));
    }

    pub fn set_int(&mut self, name: &'static str, v: i32) {
        self.values.insert(name, UniformValue::Int(v));
    }

    pub fn set_vector(&mut self, name: &'static str, v: [f32; 4]) {
        self.values.insert(name, UniformValue::Vector(v));
    }

    pub fn set_texture(&mut self, name: &'static str, tex: Option<Arc<RenderTexture>>) {
        self.values.insert(name, UniformValue::Texture(tex));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.values.get(name) {
            Some(UniformValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.values.get(name) {
            Some(UniformValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_vector(&self, name: &str) -> Option<[f32; 4]> {
        match self.values.get(name) {
            Some(UniformValue::Vector(v)) => Some(*v),
            _ => None,
        }
    }

    /// `None` if the slot is unbound or not a texture; `Some(None)` if bound empty.
    #[must_use]
    pub fn get_texture(&self, name: &str) -> Option<Option<&Arc<RenderTexture>>> {
        match self.values.get(name) {
            Some(UniformValue::Texture(t)) => Some(t.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Programme de transformation exécuté pendant un blit.
///
/// The program reads its inputs from `uniforms` and writes every texel of
/// `target`, which the caller guarantees has the same extent as `source`.
///
/// # Example
/// ```
/// use gp_core::program::{GlyphProgram, Uniforms};
/// use gp_core::texture::RenderTexture;
///
/// struct Invert;
/// impl GlyphProgram for Invert {
///     fn name(&self) -> &'static str { "invert" }
///     fn apply(&self, _u: &Uniforms, source: &RenderTexture, target: &mut RenderTexture) {
///         for y in 0..source.height() {
///             for x in 0..source.width() {
///                 let [r, g, b, a] = source.texel(x, y);
///                 target.set_texel(x, y, [1.0 - r, 1.0 - g, 1.0 - b, a]);
///             }
///         }
///     }
/// }
/// ```
pub trait GlyphProgram: Send + Sync {
    /// Nom lisible pour le debug.
    fn name(&self) -> &'static str;

    /// Transform `source` into `target`.
    fn apply(&self, uniforms: &Uniforms, source: &RenderTexture, target: &mut RenderTexture);
}

/// A program plus the uniform values bound to it.
///
/// Cloning is cheap: the program is shared and the uniforms are a handful of
/// scalars plus an `Arc` to the atlas. A blit records a clone, so later
/// rebinds never change an already recorded command.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use gp_core::program::{GlyphProgram, Material, Uniforms};
/// use gp_core::texture::RenderTexture;
///
/// struct Noop;
/// impl GlyphProgram for Noop {
///     fn name(&self) -> &'static str { "noop" }
///     fn apply(&self, _: &Uniforms, _: &RenderTexture, _: &mut RenderTexture) {}
/// }
///
/// let mut mat = Material::new(Arc::new(Noop));
/// mat.uniforms_mut().set_int("_monochromatic", 1);
/// assert_eq!(mat.uniforms().get_int("_monochromatic"), Some(1));
/// assert_eq!(mat.program_name(), "noop");
/// ```
#[derive(Clone)]
pub struct Material {
    program: Arc<dyn GlyphProgram>,
    uniforms: Uniforms,
}

impl Material {
    #[must_use]
    pub fn new(program: Arc<dyn GlyphProgram>) -> Self {
        Self {
            program,
            uniforms: Uniforms::default(),
        }
    }

    #[must_use]
    pub fn program_name(&self) -> &'static str {
        self.program.name()
    }

    #[must_use]
    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }

    /// Run the program with the currently bound uniforms.
    pub fn apply(&self, source: &RenderTexture, target: &mut RenderTexture) {
        self.program.apply(&self.uniforms, source, target);
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("program", &self.program.name())
            .field("uniforms", &self.uniforms)
            .finish()
    }
}
