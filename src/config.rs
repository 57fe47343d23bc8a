//! Extraction configuration.
//!
//! Every knob has a default so an empty YAML file is a valid configuration:
//!
//! ```yaml
//! name_table:
//!   MAGNUS: ELIAS
//!   JOHN: ARCHIVIST
//! proximity_threshold: 5
//! base_closeness: 1.0
//! max_episode: 200
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default line distance within which two cues count as an interaction
pub const DEFAULT_PROXIMITY_THRESHOLD: usize = 5;

/// Default closeness awarded for merely sharing a scene
pub const DEFAULT_BASE_CLOSENESS: f64 = 1.0;

/// Default upper bound for episode ranges
pub const DEFAULT_MAX_EPISODE: u32 = 200;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside its accepted range
    #[error("Invalid value for field '{field}': {value}. {hint}")]
    Range {
        field: String,
        value: String,
        hint: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Character-name consolidation table.
///
/// Maps a raw cue label (for example a character's earlier stage name) to the
/// canonical label their lines should be attributed to. Replacement works on
/// whole cue lines, so `JOHN` is rewritten but `JOHNNY` or dialogue that
/// merely mentions John is left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameTable(BTreeMap<String, String>);

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `raw -> canonical` mapping
    pub fn with_alias(mut self, raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.0.insert(raw.into(), canonical.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Canonical label for `raw`, if the table has one
    pub fn canonical(&self, raw: &str) -> Option<&str> {
        self.0.get(raw).map(String::as_str)
    }

    /// Rewrite every line whose trimmed text is a raw label.
    ///
    /// Line count and order are preserved. Each line is looked up once, so a
    /// chain `A -> B -> C` maps `A` to `B`, not `C`.
    pub fn apply(&self, text: &str) -> String {
        if self.0.is_empty() {
            return text.to_string();
        }
        text.split('\n')
            .map(|line| self.canonical(line.trim()).unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NameTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        NameTable(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parameters of the closeness scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Inclusive line distance counted as an interaction
    pub proximity_threshold: usize,
    /// Score for co-occurring in a scene at all
    pub base_closeness: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            base_closeness: DEFAULT_BASE_CLOSENESS,
        }
    }
}

/// Full configuration for an extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Raw cue label -> canonical label
    pub name_table: NameTable,
    /// Inclusive line distance counted as an interaction
    pub proximity_threshold: usize,
    /// Score for co-occurring in a scene at all
    pub base_closeness: f64,
    /// Highest episode number accepted in a range
    pub max_episode: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            name_table: NameTable::default(),
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            base_closeness: DEFAULT_BASE_CLOSENESS,
            max_episode: DEFAULT_MAX_EPISODE,
        }
    }
}

impl ExtractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        // An empty document deserializes to unit, not to a map
        let config: ExtractionConfig = if content.trim().is_empty() {
            ExtractionConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_name_table(mut self, table: NameTable) -> Self {
        self.name_table = table;
        self
    }

    pub fn with_proximity_threshold(mut self, threshold: usize) -> Self {
        self.proximity_threshold = threshold;
        self
    }

    pub fn with_base_closeness(mut self, base: f64) -> Self {
        self.base_closeness = base;
        self
    }

    pub fn with_max_episode(mut self, max_episode: u32) -> Self {
        self.max_episode = max_episode;
        self
    }

    /// Scorer parameters carried by this configuration
    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            proximity_threshold: self.proximity_threshold,
            base_closeness: self.base_closeness,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.base_closeness.is_finite() || self.base_closeness < 0.0 {
            return Err(ConfigError::Range {
                field: "base_closeness".to_string(),
                value: self.base_closeness.to_string(),
                hint: "Must be a finite, non-negative number.".to_string(),
            });
        }
        if self.max_episode == 0 {
            return Err(ConfigError::Range {
                field: "max_episode".to_string(),
                value: "0".to_string(),
                hint: "Episodes are numbered from 1.".to_string(),
            });
        }
        Ok(())
    }
}
