use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Referenced file does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Frame size does not split into whole, square tiles.
    #[error(
        "Tuiles non uniformes : {frame_width}×{frame_height} en {tiles_x}×{tiles_y} tuiles"
    )]
    NonUniformTiles {
        /// Frame width in pixels.
        frame_width: u32,
        /// Frame height in pixels.
        frame_height: u32,
        /// Tiles across.
        tiles_x: u32,
        /// Tiles down.
        tiles_y: u32,
    },

    /// Glyph atlas is missing, unreadable or too small.
    #[error("Atlas de glyphes invalide : {0}")]
    Atlas(String),

    /// The transform program could not be built.
    #[error("Programme indisponible : {0}")]
    Program(String),
}
