//! LyricsWiki source
//!
//! Locates the song page through the wiki's getSong API (an XML response
//! carrying a `<url>` element), then scrapes the lyrics container off the
//! page itself.

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::sources::LyricsSource;

const INSTRUMENTAL: &str = "[Instrumental]";

pub struct LyricsWikiSource {
    client: reqwest::Client,
    api_url: String,
}

impl LyricsWikiSource {
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            api_url: api_url.to_string(),
        })
    }

    /// Ask the getSong API where the song page lives.
    async fn query_song_url(&self, artist: &str, title: &str) -> Result<Option<String>> {
        let url = format!(
            "{}?action=lyrics&fmt=xml&func=getSong&artist={}&song={}",
            self.api_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        );

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .context("send getSong request")?
            .error_for_status()
            .context("getSong http status")?
            .text()
            .await
            .context("read getSong response")?;

        Ok(song_url_from_response(&body))
    }

    /// Resolve the song page URL, retrying with commas stripped.
    ///
    /// "Band, The" style names and multi-part titles are stored on the wiki
    /// without commas. Each retry removes every comma from both fields, so
    /// the loop runs at most twice.
    async fn locate(&self, artist: &str, title: &str) -> Result<Option<String>> {
        // Typographic apostrophes never match the wiki's page titles.
        let mut artist = artist.replace('\u{2019}', "'");
        let mut title = title.replace('\u{2019}', "'");

        loop {
            if let Some(url) = self.query_song_url(&artist, &title).await? {
                return Ok(Some(url));
            }
            if !artist.contains(',') && !title.contains(',') {
                return Ok(None);
            }
            artist = artist.replace(',', "");
            title = title.replace(',', "");
        }
    }
}

#[async_trait]
impl LyricsSource for LyricsWikiSource {
    fn name(&self) -> &str {
        "lyricswiki"
    }

    async fn fetch(&self, artist: &str, title: &str) -> Result<Option<String>> {
        let Some(page_url) = self.locate(artist, title).await? else {
            return Ok(None);
        };

        let body = self
            .client
            .get(&page_url)
            .send()
            .await
            .context("send song page request")?
            .error_for_status()
            .context("song page http status")?
            .text()
            .await
            .context("read song page")?;

        Ok(extract_lyrics(&body))
    }
}

fn song_url_from_response(body: &str) -> Option<String> {
    let doc = Html::parse_document(body);
    let sel = Selector::parse("url").unwrap();
    let url = doc.select(&sel).next()?.text().collect::<String>();
    if url.is_empty() { None } else { Some(url) }
}

/// Pull the lyrics text out of a full song page.
///
/// The lyricbox content keeps its embedded markup except for line breaks
/// (turned into newlines) and the decorative break marker; instrumental
/// pages short-circuit to the `[Instrumental]` sentinel.
fn extract_lyrics(body: &str) -> Option<String> {
    let doc = Html::parse_document(body);
    let sel = Selector::parse("div.lyricbox").unwrap();
    let content = doc.select(&sel).next()?.inner_html();
    let content = decode_html_entities(&content);

    if content.contains("Category:Instrumental") {
        return Some(INSTRUMENTAL.to_string());
    }

    let text = content
        .replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("<div class=\"lyricsbreak\"></div>", "");
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn decode_html_entities(s: &str) -> String {
    s.replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
