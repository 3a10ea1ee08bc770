//! Pluggable lyrics sources and the fallback chain
//!
//! Each source knows one way to locate lyrics for an (artist, title) pair:
//! - files saved under the local lyrics directory
//! - darklyrics.com site search + album page scrape
//! - the LyricsWiki getSong API
//! - the Metal Archives song search API

pub mod darklyrics;
pub mod local;
pub mod lyricswiki;
pub mod metal_archives;

pub use darklyrics::DarkLyricsSource;
pub use local::LocalSource;
pub use lyricswiki::LyricsWikiSource;
pub use metal_archives::MetalArchivesSource;

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;

const USER_AGENT: &str = "stanza/0.1.0 (https://github.com/stanza)";

/// A lyrics provider that can be tried as part of the fallback chain.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Short name used in log output and `--source` lookups.
    fn name(&self) -> &str;

    /// Look up lyrics for the given artist and title.
    ///
    /// `Ok(None)` means the source has no match; `Err` means the lookup
    /// itself broke (network, parse). The caller treats both as a miss.
    async fn fetch(&self, artist: &str, title: &str) -> Result<Option<String>>;
}

pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .context("build http client")
}

/// Build the source chain in priority order.
pub fn default_sources(cfg: &Config) -> Result<Vec<Box<dyn LyricsSource>>> {
    Ok(vec![
        Box::new(LocalSource::new(cfg.paths.lyrics_dir.clone())),
        Box::new(DarkLyricsSource::new(&cfg.darklyrics.base_url)?),
        Box::new(LyricsWikiSource::new(&cfg.lyricswiki.api_url)?),
        Box::new(MetalArchivesSource::new(&cfg.metal_archives.base_url)?),
    ])
}

/// Try each source in order and return the first hit.
///
/// Later sources are never consulted once one succeeds. A miss or an error
/// from one source only moves the chain along.
pub async fn fetch_with_fallback(
    sources: &[Box<dyn LyricsSource>],
    artist: &str,
    title: &str,
) -> Option<String> {
    for source in sources {
        match source.fetch(artist, title).await {
            Ok(Some(text)) => {
                tracing::info!("found lyrics via {}", source.name());
                return Some(text);
            }
            Ok(None) => tracing::info!("no lyrics from {}", source.name()),
            Err(e) => tracing::warn!("{} lookup failed: {e:#}", source.name()),
        }
    }
    None
}
