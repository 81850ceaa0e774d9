/// Types, configuration et structures partagées de glyphpass.
///
/// This crate holds everything the transform, the render host and the
/// binary agree on: textures, stylization parameters, the settings file,
/// the program/material seam and the error type.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod params;
pub mod program;
pub mod texture;

pub use config::{AsciiSettings, TilePolicy};
pub use error::CoreError;
pub use frame::FrameBuffer;
pub use params::StylizationParameters;
pub use program::{GlyphProgram, Material, UniformValue, Uniforms};
pub use texture::{ColorFormat, RenderTexture, TextureDescriptor};
