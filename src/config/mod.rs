use anyhow::Context;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub paths: PathsConfig,
    pub darklyrics: DarkLyricsConfig,
    pub lyricswiki: LyricsWikiConfig,
    pub metal_archives: MetalArchivesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding saved lyrics files named "{artist} - {title}.txt".
    pub lyrics_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let lyrics_dir = UserDirs::new()
            .map(|u| u.home_dir().join(".lyrics"))
            .unwrap_or_else(|| std::env::temp_dir().join("lyrics"));
        Self { lyrics_dir }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DarkLyricsConfig {
    pub base_url: String,
}

impl Default for DarkLyricsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.darklyrics.com/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsWikiConfig {
    /// getSong API endpoint; artist and song go in the query string.
    pub api_url: String,
}

impl Default for LyricsWikiConfig {
    fn default() -> Self {
        Self {
            api_url: "http://lyrics.wikia.com/api.php".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetalArchivesConfig {
    pub base_url: String,
}

impl Default for MetalArchivesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.metal-archives.com/".to_string(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj =
        ProjectDirs::from("dev", "stanza", "stanza").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
        let cfg = Config::default();
        let raw = toml::to_string_pretty(&cfg).context("serialize default config")?;
        fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
