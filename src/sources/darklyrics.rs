//! darklyrics.com source
//!
//! The site search links into whole-album pages that carry one
//! `<h3><a name="N">` heading per song, so after the search the fetch has to
//! isolate a single song's block between its own heading and the next one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::sources::LyricsSource;

pub struct DarkLyricsSource {
    client: reqwest::Client,
    base_url: String,
}

/// A search hit: album page plus the in-page anchor of the song.
struct SongRef {
    page: String,
    anchor: String,
}

impl DarkLyricsSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            base_url: format!("{}/", base_url.trim_end_matches('/')),
        })
    }

    async fn search(&self, artist: &str, title: &str) -> Result<Option<SongRef>> {
        let url = format!(
            "{}search?q={}+{}",
            self.base_url,
            urlencoding::encode(&artist.to_lowercase()),
            urlencoding::encode(&title.to_lowercase())
        );

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .context("send search request")?
            .error_for_status()
            .context("search http status")?
            .text()
            .await
            .context("read search response")?;

        Ok(first_song_link(&body))
    }
}

#[async_trait]
impl LyricsSource for DarkLyricsSource {
    fn name(&self) -> &str {
        "darklyrics"
    }

    async fn fetch(&self, artist: &str, title: &str) -> Result<Option<String>> {
        let Some(song) = self.search(artist, title).await? else {
            return Ok(None);
        };

        let url = format!("{}{}", self.base_url, song.page);
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .context("send album page request")?
            .error_for_status()
            .context("album page http status")?
            .text()
            .await
            .context("read album page")?;

        Ok(extract_song_block(&body, &song.anchor))
    }
}

/// First search result whose link carries an in-page anchor.
///
/// Results come back in site order; no ranking beyond that.
fn first_song_link(body: &str) -> Option<SongRef> {
    let doc = Html::parse_document(body);
    let sel = Selector::parse("div.sen > h2 > a").unwrap();

    for link in doc.select(&sel) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let parts: Vec<&str> = href.split('#').collect();
        if parts.len() != 2 {
            continue;
        }
        return Some(SongRef {
            page: parts[0].to_string(),
            anchor: parts[1].to_string(),
        });
    }
    None
}

/// Cut one song's block out of an album page and strip its markup.
///
/// The block starts right after the song's own `<h3>` heading line and ends
/// at the next `<h3>`. Any of the three markers missing fails the extraction.
fn extract_song_block(body: &str, anchor: &str) -> Option<String> {
    let heading = format!("<h3><a name=\"{anchor}\">");
    let start = body.find(&heading)?;
    let block = &body[start..];

    let after_break = block.find("<br />\n")? + "<br />\n".len();
    let block = &block[after_break..];

    let end = block.find("<h3>")?;
    let block = &block[..end];

    let fragment = Html::parse_fragment(block);
    let text = fragment.root_element().text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_song_link_splits_href() {
        let body = r#"<html><body>
<div class="sen"><h2><a href="m/metallica/kill.html#4">Metallica - Jump In The Fire</a></h2></div>
<div class="sen"><h2><a href="m/metallica/ride.html#2">Metallica - Ride The Lightning</a></h2></div>
</body></html>"#;
        let song = first_song_link(body).unwrap();
        assert_eq!(song.page, "m/metallica/kill.html");
        assert_eq!(song.anchor, "4");
    }

    #[test]
    fn test_first_song_link_skips_links_without_anchor() {
        let body = r#"<html><body>
<div class="sen"><h2><a href="m/metallica/kill.html">album only</a></h2></div>
<div class="sen"><h2><a href="m/slayer/reign.html#1">Slayer - Angel Of Death</a></h2></div>
</body></html>"#;
        let song = first_song_link(body).unwrap();
        assert_eq!(song.page, "m/slayer/reign.html");
        assert_eq!(song.anchor, "1");
    }

    #[test]
    fn test_first_song_link_no_usable_results() {
        let body = r#"<html><body><div class="sen"><h2><a href="m/band/album.html">x</a></h2></div></body></html>"#;
        assert!(first_song_link(body).is_none());
    }

    #[test]
    fn test_extract_song_block() {
        let body = "<h3><a name=\"123\">X</a></h3><br />\nLyric line one\nLyric line two<h3>Y</h3>";
        assert_eq!(
            extract_song_block(body, "123").as_deref(),
            Some("Lyric line one\nLyric line two")
        );
    }

    #[test]
    fn test_extract_song_block_strips_markup() {
        let body = "<h3><a name=\"7\">Song</a></h3><br />\nFirst <i>emphasised</i> line<br />\nSecond line<br />\n<h3>Next</h3>";
        assert_eq!(
            extract_song_block(body, "7").as_deref(),
            Some("First emphasised line\nSecond line")
        );
    }

    #[test]
    fn test_extract_song_block_missing_markers() {
        // No heading for this anchor.
        assert!(extract_song_block("<h3><a name=\"1\">X</a></h3><br />\ntext<h3>Y</h3>", "2").is_none());
        // No break after the heading.
        assert!(extract_song_block("<h3><a name=\"1\">X</a></h3>text<h3>Y</h3>", "1").is_none());
        // No terminating heading.
        assert!(extract_song_block("<h3><a name=\"1\">X</a></h3><br />\ntext", "1").is_none());
    }
}
