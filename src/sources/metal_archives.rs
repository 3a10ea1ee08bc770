//! Metal Archives source
//!
//! The advanced-search endpoint answers with JSON rows whose last column is
//! an HTML snippet carrying the numeric lyrics id; the lyrics themselves are
//! then pulled by id from a separate endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::sources::LyricsSource;

const LYRICS_LINK_PREFIX: &str = "<a href=\"javascript:;\" id=\"lyricsLink_";
const NOT_AVAILABLE: &str = "<em>(lyrics not available)</em>";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "aaData")]
    aa_data: Vec<Vec<serde_json::Value>>,
}

pub struct MetalArchivesSource {
    client: reqwest::Client,
    base_url: String,
}

impl MetalArchivesSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            base_url: format!("{}/", base_url.trim_end_matches('/')),
        })
    }

    async fn search(&self, artist: &str, title: &str) -> Result<Option<u64>> {
        let url = format!(
            "{}search/ajax-advanced/searching/songs/?songTitle={}&bandName={}&ExactSongMatch=1&ExactBandMatch=1",
            self.base_url,
            urlencoding::encode(&title.to_lowercase()),
            urlencoding::encode(&artist.to_lowercase())
        );

        let resp: SearchResponse = self
            .client
            .get(&url)
            .send()
            .await
            .context("send song search")?
            .error_for_status()
            .context("song search http status")?
            .json()
            .await
            .context("parse song search json")?;

        Ok(first_lyrics_id(&resp))
    }

    async fn lyrics_by_id(&self, id: u64) -> Result<Option<String>> {
        let url = format!("{}release/ajax-view-lyrics/id/{id}", self.base_url);

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .context("send lyrics request")?
            .error_for_status()
            .context("lyrics http status")?
            .text()
            .await
            .context("read lyrics response")?;

        Ok(clean_lyrics(&body))
    }
}

#[async_trait]
impl LyricsSource for MetalArchivesSource {
    fn name(&self) -> &str {
        "metal-archives"
    }

    async fn fetch(&self, artist: &str, title: &str) -> Result<Option<String>> {
        let Some(id) = self.search(artist, title).await? else {
            return Ok(None);
        };
        self.lyrics_by_id(id).await
    }
}

/// The id from the first search row with a parseable lyrics link.
///
/// Rows without one are skipped; a search where no row parses is a miss.
fn first_lyrics_id(resp: &SearchResponse) -> Option<u64> {
    resp.aa_data.iter().find_map(|record| {
        let snippet = record.last()?.as_str()?;
        parse_lyrics_link_id(snippet)
    })
}

/// Parse `id="lyricsLink_<digits>"` out of a search row snippet.
fn parse_lyrics_link_id(snippet: &str) -> Option<u64> {
    let rest = snippet.strip_prefix(LYRICS_LINK_PREFIX)?;
    let end = rest.find('"')?;
    rest[..end].parse().ok()
}

fn clean_lyrics(body: &str) -> Option<String> {
    let text = body.replace("<br />", "");
    let text = text.trim();
    if text == NOT_AVAILABLE || text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lyrics_link_id() {
        let snippet = "<a href=\"javascript:;\" id=\"lyricsLink_3812\" class=\"viewLyrics\">Show lyrics</a>";
        assert_eq!(parse_lyrics_link_id(snippet), Some(3812));
    }

    #[test]
    fn test_parse_lyrics_link_id_rejects_other_markup() {
        assert!(parse_lyrics_link_id("<a href=\"/bands/X\">X</a>").is_none());
        assert!(parse_lyrics_link_id("<a href=\"javascript:;\" id=\"lyricsLink_abc\">x</a>").is_none());
        assert!(parse_lyrics_link_id("").is_none());
    }

    #[test]
    fn test_first_lyrics_id_skips_bad_rows() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"aaData": [
                ["<a href=\"/bands/A\">A</a>", "Song One", "Album", "(no lyrics link)"],
                ["<a href=\"/bands/B\">B</a>", "Song Two", "Album", "<a href=\"javascript:;\" id=\"lyricsLink_991\" class=\"viewLyrics\">Show lyrics</a>"]
            ]}"#,
        )
        .unwrap();
        assert_eq!(first_lyrics_id(&resp), Some(991));
    }

    #[test]
    fn test_first_lyrics_id_all_rows_bad_is_a_miss() {
        let resp: SearchResponse =
            serde_json::from_str(r#"{"aaData": [["band", "song", "(no lyrics link)"]]}"#).unwrap();
        assert_eq!(first_lyrics_id(&resp), None);
    }

    #[test]
    fn test_first_lyrics_id_empty_results() {
        let resp: SearchResponse = serde_json::from_str(r#"{"aaData": []}"#).unwrap();
        assert_eq!(first_lyrics_id(&resp), None);
    }

    #[test]
    fn test_clean_lyrics_strips_break_tags() {
        let body = "\nRiding hard<br />\nBreaking ground<br />\n";
        assert_eq!(clean_lyrics(body).as_deref(), Some("Riding hard\nBreaking ground"));
    }

    #[test]
    fn test_clean_lyrics_not_available_sentinel() {
        assert!(clean_lyrics("\n<em>(lyrics not available)</em>\n").is_none());
        assert!(clean_lyrics("   ").is_none());
    }
}
