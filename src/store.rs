//! Episode text store.
//!
//! Maps episode numbers to raw scraped episode texts. Texts come either from
//! a single JSON object (`{"1": "...", "2": "..."}`) or from a directory of
//! `.txt` files, one per episode.

use std::collections::BTreeMap;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{ExtractError, Result};

lazy_static! {
    /// `12`, `012`, `MAG012`, `mag12`
    static ref FILE_STEM_RE: Regex = Regex::new(r"^(?i:MAG)?0*(\d+)$").unwrap();
    /// `MAG012 - Title` on the first non-empty line
    static ref HEADER_RE: Regex = Regex::new(r"^(?:MAG)+0*(\d+) -").unwrap();
}

/// Raw episode texts keyed by episode number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeTexts {
    texts: BTreeMap<u32, String>,
}

impl EpisodeTexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object whose keys are episode numbers.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        let store = Self::from_json_str(&content)?;
        info!(path = %path.display(), episodes = store.len(), "loaded episode texts");
        Ok(store)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let texts: BTreeMap<u32, String> = serde_json::from_str(content)?;
        Ok(EpisodeTexts { texts })
    }

    /// Load every `.txt` file below `dir`.
    ///
    /// The episode number comes from the file stem (`12.txt`, `MAG012.txt`)
    /// or, failing that, from a `MAG012 -` header line. Files with neither are
    /// an error rather than being silently dropped. Later files with the same
    /// number replace earlier ones in path order.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in walkdir::WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|s| s.to_str()) == Some("txt")
            {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();

        let mut store = EpisodeTexts::new();
        for path in paths {
            let text = std::fs::read_to_string(&path).map_err(|e| ExtractError::io(&path, e))?;
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            let episode = episode_from_stem(stem)
                .or_else(|| episode_from_header(&text))
                .ok_or_else(|| ExtractError::InvalidEpisodeFile {
                    path: path.clone(),
                    reason: "no episode number in file name or header".to_string(),
                })?;
            debug!(path = %path.display(), episode, "read episode text");
            store.insert(episode, text);
        }

        info!(dir = %dir.display(), episodes = store.len(), "loaded episode texts");
        Ok(store)
    }

    /// Load from a JSON file or a directory, whichever `path` is
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_json_file(path)
        }
    }

    pub fn insert(&mut self, episode: u32, text: impl Into<String>) {
        self.texts.insert(episode, text.into());
    }

    /// Raw text of `episode`
    pub fn get(&self, episode: u32) -> Result<&str> {
        self.texts
            .get(&episode)
            .map(String::as_str)
            .ok_or(ExtractError::MissingEpisode { episode })
    }

    pub fn contains(&self, episode: u32) -> bool {
        self.texts.contains_key(&episode)
    }

    /// Stored episode numbers, ascending
    pub fn episodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.texts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// SHA-256 of an episode's raw text, hex encoded
    pub fn sha256(&self, episode: u32) -> Result<String> {
        self.get(episode).map(|text| compute_hash(text.as_bytes()))
    }
}

impl FromIterator<(u32, String)> for EpisodeTexts {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        EpisodeTexts {
            texts: iter.into_iter().collect(),
        }
    }
}

/// Compute SHA-256 hash of text contents
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

fn episode_from_stem(stem: &str) -> Option<u32> {
    FILE_STEM_RE
        .captures(stem)
        .and_then(|caps| caps[1].parse().ok())
}

fn episode_from_header(text: &str) -> Option<u32> {
    let first = text.lines().map(str::trim).find(|line| !line.is_empty())?;
    HEADER_RE
        .captures(first)
        .and_then(|caps| caps[1].parse().ok())
}
