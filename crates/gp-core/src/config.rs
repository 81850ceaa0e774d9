use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::params::{DEFAULT_MONO_TINT, MAX_GLYPH_COUNT, StylizationParameters};
use crate::texture::RenderTexture;

/// What to do when the frame does not split into whole, square tiles.
///
/// # Example
/// ```
/// use gp_core::config::TilePolicy;
/// assert_eq!(TilePolicy::default(), TilePolicy::Reject);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum TilePolicy {
    /// Refuse the parameters; the pass skips the frame.
    #[default]
    Reject,
    /// Tile size is `frame_width / tiles_x` rounded down; trailing pixels
    /// join the last row/column of tiles.
    RoundDown,
}

/// Réglages de l'effet, fournis à l'attachement de la passe.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use gp_core::config::AsciiSettings;
/// let s = AsciiSettings::default();
/// assert_eq!((s.tiles_x, s.tiles_y), (80, 45));
/// assert_eq!(s.char_count, 8);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AsciiSettings {
    /// Glyph atlas image. `None` = built-in ramp.
    pub char_tex: Option<PathBuf>,
    /// Target resolution, width.
    pub resolution_x: u32,
    /// Target resolution, height.
    pub resolution_y: u32,
    /// Glyph cells across.
    pub tiles_x: u32,
    /// Glyph cells down.
    pub tiles_y: u32,
    /// Number of glyphs in the atlas strip, 1..=[`MAX_GLYPH_COUNT`].
    pub char_count: u32,
    /// Output gain, [0.0, ∞). Non-finite values fall back to the default.
    pub brightness: f32,
    /// 0 = colour from the source block, 1 = fixed tint.
    pub monochromatic: i32,
    /// Non-integer tile size handling.
    pub tile_policy: TilePolicy,
    /// Tint used when `monochromatic` is 1, RGB [0, 1].
    pub mono_tint: [f32; 3],
}

impl Default for AsciiSettings {
    fn default() -> Self {
        Self {
            char_tex: None,
            resolution_x: 1920,
            resolution_y: 1080,
            tiles_x: 80,
            tiles_y: 45,
            char_count: 8,
            brightness: 0.8,
            monochromatic: 0,
            tile_policy: TilePolicy::Reject,
            mono_tint: DEFAULT_MONO_TINT,
        }
    }
}

impl AsciiSettings {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.resolution_x = self.resolution_x.max(1);
        self.resolution_y = self.resolution_y.max(1);
        self.tiles_x = self.tiles_x.clamp(1, self.resolution_x);
        self.tiles_y = self.tiles_y.clamp(1, self.resolution_y);
        self.char_count = self.char_count.clamp(1, MAX_GLYPH_COUNT);
        self.brightness = if self.brightness.is_finite() {
            self.brightness.max(0.0)
        } else {
            0.8
        };
        self.monochromatic = self.monochromatic.clamp(0, 1);
        for c in &mut self.mono_tint {
            *c = if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
        }
    }

    /// Copie les réglages dans un paquet de paramètres neuf pour une frame.
    ///
    /// # Example
    /// ```
    /// use gp_core::config::AsciiSettings;
    /// let p = AsciiSettings::default().to_parameters(None);
    /// assert_eq!(p.tiles_x, 80);
    /// assert!(!p.monochrome);
    /// ```
    #[must_use]
    pub fn to_parameters(&self, atlas: Option<Arc<RenderTexture>>) -> StylizationParameters {
        StylizationParameters {
            frame_width: self.resolution_x,
            frame_height: self.resolution_y,
            tiles_x: self.tiles_x,
            tiles_y: self.tiles_y,
            glyph_atlas: atlas,
            glyph_count: self.char_count,
            brightness: self.brightness,
            monochrome: self.monochromatic != 0,
            mono_tint: self.mono_tint,
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    ascii: Option<AsciiSection>,
}

/// `[ascii]` section, all fields optional for partial override.
#[derive(Deserialize)]
struct AsciiSection {
    char_tex: Option<PathBuf>,
    resolution_x: Option<u32>,
    resolution_y: Option<u32>,
    tiles_x: Option<u32>,
    tiles_y: Option<u32>,
    char_count: Option<u32>,
    brightness: Option<f32>,
    monochromatic: Option<i32>,
    tile_policy: Option<TilePolicy>,
    mono_tint: Option<[f32; 3]>,
}

/// Parse a TOML document and merge it over the defaults.
///
/// # Errors
/// Returns an error if the document is not valid TOML for this schema.
///
/// # Example
/// ```
/// use gp_core::config::parse_settings;
/// let s = parse_settings("[ascii]\ntiles_x = 40\nmonochromatic = 1\n").unwrap();
/// assert_eq!(s.tiles_x, 40);
/// assert_eq!(s.tiles_y, 45);
/// assert_eq!(s.monochromatic, 1);
/// ```
pub fn parse_settings(content: &str) -> Result<AsciiSettings> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut settings = AsciiSettings::default();

    if let Some(a) = file.ascii {
        if let Some(v) = a.char_tex {
            settings.char_tex = Some(v);
        }
        if let Some(v) = a.resolution_x {
            settings.resolution_x = v;
        }
        if let Some(v) = a.resolution_y {
            settings.resolution_y = v;
        }
        if let Some(v) = a.tiles_x {
            settings.tiles_x = v;
        }
        if let Some(v) = a.tiles_y {
            settings.tiles_y = v;
        }
        if let Some(v) = a.char_count {
            settings.char_count = v;
        }
        if let Some(v) = a.brightness {
            settings.brightness = v;
        }
        if let Some(v) = a.monochromatic {
            settings.monochromatic = v;
        }
        if let Some(v) = a.tile_policy {
            settings.tile_policy = v;
        }
        if let Some(v) = a.mono_tint {
            settings.mono_tint = v;
        }
    }

    settings.clamp_all();
    Ok(settings)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// A relative `char_tex` is resolved against the config file's directory.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use gp_core::config::load_settings;
/// use std::path::Path;
/// let settings = load_settings(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_settings(path: &Path) -> Result<AsciiSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let mut settings = parse_settings(&content)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))?;

    if let Some(tex) = settings.char_tex.as_mut()
        && tex.is_relative()
        && let Some(dir) = path.parent()
    {
        *tex = dir.join(&*tex);
    }
    log::debug!("Réglages chargés depuis {} : {settings:?}", path.display());
    Ok(settings)
}
