use anyhow::Result;
use clap::Parser;

pub mod cli;
pub mod run;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger, rendre, écrire
    let summary = run::run(&cli)?;
    if summary.skipped > 0 {
        log::warn!(
            "{} frame(s) sur {} copiée(s) sans stylisation",
            summary.skipped,
            summary.frames
        );
    }
    Ok(())
}
