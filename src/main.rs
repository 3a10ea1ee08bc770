mod config;
mod sources;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Exit code when every source comes up empty (EX_UNAVAILABLE).
const EXIT_NO_LYRICS: i32 = 69;

#[derive(Debug, Parser)]
#[command(name = "stanza", version, about = "Fetch song lyrics from local files and web sources")]
struct Cli {
    /// Artist name.
    artist: String,

    /// Song title.
    title: String,

    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only consult the named source (local, darklyrics, lyricswiki, metal-archives).
    #[arg(long)]
    source: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    let mut sources = sources::default_sources(&cfg)?;
    if let Some(name) = &cli.source {
        sources.retain(|s| s.name() == name);
        if sources.is_empty() {
            anyhow::bail!("unknown source: {name}");
        }
    }

    match sources::fetch_with_fallback(&sources, &cli.artist, &cli.title).await {
        Some(text) => println!("{text}"),
        None => {
            tracing::error!("no lyrics found for {} - {}", cli.artist, cli.title);
            std::process::exit(EXIT_NO_LYRICS);
        }
    }

    Ok(())
}
