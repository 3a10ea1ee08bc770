use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

use crate::sources::LyricsSource;

/// Reads lyrics saved as "{artist} - {title}.txt" under the lyrics directory.
pub struct LocalSource {
    lyrics_dir: PathBuf,
}

impl LocalSource {
    pub fn new(lyrics_dir: PathBuf) -> Self {
        Self { lyrics_dir }
    }

    fn file_path(&self, artist: &str, title: &str) -> PathBuf {
        // '/' in either field would split the file name into path components.
        let artist = artist.replace('/', "_");
        let title = title.replace('/', "_");
        self.lyrics_dir.join(format!("{artist} - {title}.txt"))
    }
}

#[async_trait]
impl LyricsSource for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn fetch(&self, artist: &str, title: &str) -> Result<Option<String>> {
        let path = self.file_path(artist, title);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                // A missing file is the normal case for unsaved songs.
                tracing::debug!("no local lyrics at {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}
