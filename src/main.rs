use anyhow::{Context, Result};
use clap::Parser;
use retrosniff::config::{Cli, Config};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let config = Config::from(cli);
    log::info!("Opening {}", config.file.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    retrosniff::run(&config, &mut out)
        .with_context(|| format!("failed to analyse {}", config.file.display()))?;
    Ok(())
}
