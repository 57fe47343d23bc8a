//! Corpus export to JSON and JSONL.
//!
//! A [`CorpusExport`] is the serializable form of a corpus build. Episode
//! numbers stay integer keys; character pairs are written as explicit
//! `source`/`target` records so they round-trip exactly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::aggregate::{EdgeAppearances, NodeAppearances};
use super::{CharacterPair, CumulativeGraph, EdgeEntry, EpisodeGraph, NodeEntry};
use crate::error::{ExtractError, Result};
use crate::pipeline::{CorpusBuild, EpisodeRange};
use crate::version::BuildInfo;

/// Export format for corpus data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One JSON document
    Json,
    /// JSON Lines format (one JSON record per line)
    JsonL,
}

impl ExportFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "jsonl" => Some(ExportFormat::JsonL),
            _ => None,
        }
    }
}

/// Configuration for corpus export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output format
    pub format: ExportFormat,
    /// Use minified JSON (no pretty-printing)
    pub minify: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            format: ExportFormat::Json,
            minify: false,
        }
    }
}

impl ExportConfig {
    /// Create a new export config with the specified format
    pub fn new(format: ExportFormat) -> Self {
        ExportConfig {
            format,
            ..Default::default()
        }
    }

    /// Set whether to minify JSON output
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

/// An episode that produced no graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub code: String,
    pub message: String,
}

impl From<&ExtractError> for FailureRecord {
    fn from(err: &ExtractError) -> Self {
        FailureRecord {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Provenance of one episode's graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// SHA-256 of the raw episode text
    pub sha256: String,
}

/// Serializable corpus: graphs, aggregates and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusExport {
    pub range: EpisodeRange,
    pub individual: BTreeMap<u32, EpisodeGraph>,
    pub cumulative: BTreeMap<u32, CumulativeGraph>,
    pub node_appearances: NodeAppearances,
    #[serde(with = "edge_appearance_list")]
    pub edge_appearances: EdgeAppearances,
    #[serde(default)]
    pub failures: BTreeMap<u32, FailureRecord>,
    #[serde(default)]
    pub sources: BTreeMap<u32, SourceRecord>,
}

impl CorpusExport {
    pub fn from_build(build: &CorpusBuild) -> Self {
        CorpusExport {
            range: build.range,
            individual: build.individual.clone(),
            cumulative: build.cumulative.clone(),
            node_appearances: build.node_appearances.clone(),
            edge_appearances: build.edge_appearances.clone(),
            failures: build
                .failures
                .iter()
                .map(|(&episode, err)| (episode, FailureRecord::from(err)))
                .collect(),
            sources: build
                .sources
                .iter()
                .map(|(&episode, hash)| (episode, SourceRecord { sha256: hash.clone() }))
                .collect(),
        }
    }
}

/// Edge appearances serialize as
/// `[{source, target, episodes: {n: {weight}}}, ...]`
pub(crate) mod edge_appearance_list {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct PairAppearances {
        source: String,
        target: String,
        episodes: BTreeMap<u32, EdgeEntry>,
    }

    pub fn serialize<M, S>(index: &M, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        M: std::borrow::Borrow<EdgeAppearances>,
        S: serde::Serializer,
    {
        let records: Vec<PairAppearances> = index
            .borrow()
            .iter()
            .map(|(pair, episodes)| PairAppearances {
                source: pair.first().to_string(),
                target: pair.second().to_string(),
                episodes: episodes.clone(),
            })
            .collect();
        records.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<EdgeAppearances, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let records = Vec::<PairAppearances>::deserialize(deserializer)?;
        let mut index = EdgeAppearances::new();
        for record in records {
            index
                .entry(CharacterPair::new(record.source, record.target))
                .or_default()
                .extend(record.episodes);
        }
        Ok(index)
    }
}

/// JSONL record types
///
/// Each JSONL line includes a "kind" field to identify the record type.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonlRecord<'a> {
    Episode {
        episode: u32,
        graph: &'a EpisodeGraph,
    },
    Cumulative {
        episode: u32,
        graph: &'a CumulativeGraph,
    },
    Node {
        name: &'a str,
        episodes: &'a BTreeMap<u32, NodeEntry>,
    },
    Edge {
        source: &'a str,
        target: &'a str,
        episodes: &'a BTreeMap<u32, EdgeEntry>,
    },
    Failure {
        episode: u32,
        #[serde(flatten)]
        failure: &'a FailureRecord,
    },
}

fn to_json<T: Serialize>(value: &T, minify: bool) -> Result<String> {
    let json = if minify {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

/// Export the whole corpus as one JSON document
pub fn export_json(export: &CorpusExport, minify: bool) -> Result<String> {
    to_json(export, minify)
}

/// Export the corpus as JSON Lines.
///
/// Records are grouped by kind (episode, cumulative, node, edge, failure) and
/// sorted by key within each group.
pub fn export_jsonl(export: &CorpusExport) -> Result<String> {
    let mut records = Vec::new();
    for (&episode, graph) in &export.individual {
        records.push(JsonlRecord::Episode { episode, graph });
    }
    for (&episode, graph) in &export.cumulative {
        records.push(JsonlRecord::Cumulative { episode, graph });
    }
    for (name, episodes) in &export.node_appearances {
        records.push(JsonlRecord::Node { name, episodes });
    }
    for (pair, episodes) in &export.edge_appearances {
        records.push(JsonlRecord::Edge {
            source: pair.first(),
            target: pair.second(),
            episodes,
        });
    }
    for (&episode, failure) in &export.failures {
        records.push(JsonlRecord::Failure { episode, failure });
    }

    let lines: std::result::Result<Vec<String>, _> =
        records.iter().map(serde_json::to_string).collect();
    Ok(lines?.join("\n"))
}

/// Export corpus data with configurable format and options
pub fn export_corpus(export: &CorpusExport, config: &ExportConfig) -> Result<String> {
    match config.format {
        ExportFormat::Json => export_json(export, config.minify),
        ExportFormat::JsonL => export_jsonl(export),
    }
}

/// Output file names written by [`write_export_dir`]
pub const INDIVIDUAL_FILE: &str = "individual.json";
pub const CUMULATIVE_FILE: &str = "cumulative.json";
pub const NODE_APPEARANCES_FILE: &str = "na.json";
pub const EDGE_APPEARANCES_FILE: &str = "ea.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Serialize)]
struct Manifest<'a> {
    tool: BuildInfo,
    range: EpisodeRange,
    failures: &'a BTreeMap<u32, FailureRecord>,
    sources: &'a BTreeMap<u32, SourceRecord>,
}

#[derive(Serialize)]
struct EdgeAppearancesFile<'a>(
    #[serde(serialize_with = "edge_appearance_list::serialize")] &'a EdgeAppearances,
);

/// Write the per-artifact JSON files into `dir`, creating it if needed.
///
/// Returns the written paths in a fixed order.
pub fn write_export_dir(dir: &Path, export: &CorpusExport, minify: bool) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| ExtractError::io(dir, e))?;

    let manifest = Manifest {
        tool: BuildInfo::current(),
        range: export.range,
        failures: &export.failures,
        sources: &export.sources,
    };
    let artifacts = [
        (INDIVIDUAL_FILE, to_json(&export.individual, minify)?),
        (CUMULATIVE_FILE, to_json(&export.cumulative, minify)?),
        (NODE_APPEARANCES_FILE, to_json(&export.node_appearances, minify)?),
        (
            EDGE_APPEARANCES_FILE,
            to_json(&EdgeAppearancesFile(&export.edge_appearances), minify)?,
        ),
        (MANIFEST_FILE, to_json(&manifest, minify)?),
    ];

    let mut written = Vec::with_capacity(artifacts.len());
    for (name, content) in artifacts {
        let path = dir.join(name);
        std::fs::write(&path, content).map_err(|e| ExtractError::io(&path, e))?;
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "export written");
    Ok(written)
}

/// Read back the individual episode graphs written by [`write_export_dir`]
pub fn read_individual(dir: &Path) -> Result<BTreeMap<u32, EpisodeGraph>> {
    let path = dir.join(INDIVIDUAL_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| ExtractError::io(&path, e))?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{cumulative, normalize_pair};
    use crate::graph::aggregate::{edge_appearances, node_appearances};

    fn sample() -> CorpusExport {
        let mut graph = EpisodeGraph::new();
        graph.nodes.insert("A".to_string(), NodeEntry::new(2));
        graph.nodes.insert("B".to_string(), NodeEntry::new(1));
        graph.edges.insert(normalize_pair("A", "B"), EdgeEntry::new(2.0));
        let mut individual = BTreeMap::new();
        individual.insert(1, graph);

        let mut failures = BTreeMap::new();
        failures.insert(
            2,
            FailureRecord::from(&ExtractError::MissingEpisode { episode: 2 }),
        );

        CorpusExport {
            range: EpisodeRange::new(1, 2),
            cumulative: cumulative(&individual),
            node_appearances: node_appearances(&individual),
            edge_appearances: edge_appearances(&individual),
            individual,
            failures,
            sources: BTreeMap::new(),
        }
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!(ExportFormat::from_str("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_str("jsonl"), Some(ExportFormat::JsonL));
        assert_eq!(ExportFormat::from_str("dot"), None);
    }

    #[test]
    fn test_export_json_round_trip() {
        let export = sample();
        let json = export_json(&export, true).unwrap();
        let back: CorpusExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, export);
    }

    #[test]
    fn test_edge_appearances_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&export_json(&sample(), false).unwrap()).unwrap();
        let first = &json["edge_appearances"][0];
        assert_eq!(first["source"], "A");
        assert_eq!(first["target"], "B");
        assert_eq!(first["episodes"]["1"]["weight"], 2.0);
        assert_eq!(json["failures"]["2"]["code"], "TAPE-EP-001");
    }

    #[test]
    fn test_export_jsonl_one_record_per_line() {
        let jsonl = export_corpus(&sample(), &ExportConfig::new(ExportFormat::JsonL)).unwrap();
        let kinds: Vec<String> = jsonl
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["kind"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(kinds, vec!["episode", "cumulative", "node", "node", "edge", "failure"]);
    }
}
