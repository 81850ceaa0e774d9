/// Moteur de conversion glyphe pour glyphpass.
///
/// Maps tile blocks of a frame to cells of a glyph atlas. The program in
/// [`program`] is the reference CPU implementation of the transform the
/// render pass blits through.
pub mod atlas;
pub mod block;
pub mod dither;
pub mod grid;
pub mod program;

pub use atlas::GlyphAtlas;
pub use grid::TileGrid;
pub use program::AsciiProgram;
