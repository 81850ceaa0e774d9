use std::path::PathBuf;

use clap::Parser;

/// glyphpass : stylise une image en mosaïque de glyphes ASCII.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub input: PathBuf,

    /// Image PNG de sortie.
    #[arg(long, default_value = "out.png")]
    pub output: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Atlas de glyphes (bande horizontale), remplace `char_tex`.
    #[arg(long)]
    pub atlas: Option<PathBuf>,

    /// Nombre de tuiles en largeur.
    #[arg(long)]
    pub tiles_x: Option<u32>,

    /// Nombre de tuiles en hauteur.
    #[arg(long)]
    pub tiles_y: Option<u32>,

    /// Nombre de glyphes dans l'atlas (1 à 256).
    #[arg(long)]
    pub char_count: Option<u32>,

    /// Teinte fixe au lieu de la couleur des blocs.
    #[arg(long, default_value_t = false)]
    pub mono: bool,

    /// Gain de sortie, >= 0.
    #[arg(long)]
    pub brightness: Option<f32>,

    /// Accepter les grilles non uniformes (taille de tuile arrondie).
    #[arg(long, default_value_t = false)]
    pub round_down: bool,

    /// Résolution cible = taille de l'image source. Sinon l'entrée est rééchantillonnée.
    #[arg(long, default_value_t = false)]
    pub fit: bool,

    /// Nombre de frames à rendre (le résultat de la dernière est écrit).
    #[arg(long, default_value_t = 1)]
    pub frames: u32,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_apply() {
        let cli = Cli::try_parse_from(["glyphpass", "--input", "in.png"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert_eq!(cli.frames, 1);
        assert!(!cli.mono && !cli.fit && !cli.round_down);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["glyphpass"]).is_err());
    }

    #[test]
    fn overrides_parse() {
        let cli = Cli::try_parse_from([
            "glyphpass",
            "--input",
            "in.png",
            "--tiles-x",
            "40",
            "--tiles-y",
            "30",
            "--mono",
            "--brightness",
            "1.5",
            "-c",
            "alt.toml",
        ])
        .unwrap();
        assert_eq!((cli.tiles_x, cli.tiles_y), (Some(40), Some(30)));
        assert!(cli.mono);
        assert_eq!(cli.brightness, Some(1.5));
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
    }
}
