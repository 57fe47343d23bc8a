//! Character interaction graphs.
//!
//! Nodes are characters sized by words spoken; edges are unordered character
//! pairs weighted by closeness. An [`EpisodeGraph`] covers one episode, an
//! [`aggregate::CumulativeGraph`] the running total up to an episode.
mod closeness;
mod episode;
pub mod aggregate;
pub mod export;

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use aggregate::{appearance_index, cumulative, AppearanceIndex, CumulativeGraph, ItemKind};
pub use closeness::closeness;
pub use episode::{build, builder_from_scenes, upsert_edge, upsert_node, EpisodeGraphBuilder};
pub use export::{CorpusExport, ExportConfig, ExportFormat};

/// Progress callback for batch builds
///
/// Receives (completed_count, total_count) as episodes finish
pub type BuildProgress<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;

/// Unordered pair of distinct characters, stored in sorted order.
///
/// `CharacterPair::new("B", "A")` and `CharacterPair::new("A", "B")` are the
/// same key, so an interaction is recorded once regardless of who spoke first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterPair {
    first: String,
    second: String,
}

impl CharacterPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            CharacterPair { first: a, second: b }
        } else {
            CharacterPair { first: b, second: a }
        }
    }

    /// Lexicographically smaller name
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Lexicographically larger name
    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, name: &str) -> bool {
        self.first == name || self.second == name
    }

    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }
}

impl fmt::Display for CharacterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Sorted pair key for two names
pub fn normalize_pair(a: &str, b: &str) -> CharacterPair {
    CharacterPair::new(a, b)
}

/// Values that can be summed into an existing map entry.
pub trait Accumulate {
    fn accumulate(&mut self, other: &Self);
}

/// Node attributes: words spoken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub size: u64,
}

impl NodeEntry {
    pub fn new(size: u64) -> Self {
        NodeEntry { size }
    }
}

impl Accumulate for NodeEntry {
    fn accumulate(&mut self, other: &Self) {
        self.size += other.size;
    }
}

/// Edge attributes: closeness
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub weight: f64,
}

impl EdgeEntry {
    pub fn new(weight: f64) -> Self {
        EdgeEntry { weight }
    }
}

impl Accumulate for EdgeEntry {
    fn accumulate(&mut self, other: &Self) {
        self.weight += other.weight;
    }
}

pub type NodeMap = BTreeMap<String, NodeEntry>;
pub type EdgeMap = BTreeMap<CharacterPair, EdgeEntry>;

/// Insert `value` under `key`, or add it to the entry already there.
///
/// Lookups never create entries; only this function does.
pub fn upsert<K: Ord, V: Accumulate>(map: &mut BTreeMap<K, V>, key: K, value: V) {
    match map.get_mut(&key) {
        Some(existing) => existing.accumulate(&value),
        None => {
            map.insert(key, value);
        }
    }
}

/// Add every entry of `delta` into `target`
pub fn merge_into<K: Ord + Clone, V: Accumulate + Clone>(
    target: &mut BTreeMap<K, V>,
    delta: &BTreeMap<K, V>,
) {
    for (key, value) in delta {
        upsert(target, key.clone(), value.clone());
    }
}

/// Nodes and edges of one episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeGraph {
    pub nodes: NodeMap,
    #[serde(with = "edge_list")]
    pub edges: EdgeMap,
}

impl EpisodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, name: &str) -> Option<&NodeEntry> {
        self.nodes.get(name)
    }

    pub fn edge(&self, a: &str, b: &str) -> Option<&EdgeEntry> {
        self.edges.get(&normalize_pair(a, b))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Total words spoken across all characters
    pub fn total_words(&self) -> u64 {
        self.nodes.values().map(|n| n.size).sum()
    }

    /// Edges whose endpoints are not both nodes; empty for a well-formed graph
    pub fn dangling_edges(&self) -> Vec<&CharacterPair> {
        dangling_edges(&self.nodes, &self.edges)
    }
}

pub(crate) fn dangling_edges<'a>(nodes: &NodeMap, edges: &'a EdgeMap) -> Vec<&'a CharacterPair> {
    edges
        .keys()
        .filter(|pair| !nodes.contains_key(pair.first()) || !nodes.contains_key(pair.second()))
        .collect()
}

/// Serialized form of one edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// Edge maps serialize as `[{source, target, weight}, ...]`.
///
/// JSON object keys must be strings, and no separator is safe for arbitrary
/// canonical names, so pairs are written as explicit records. `source` is
/// always the smaller name.
pub(crate) mod edge_list {
    use super::*;

    pub fn serialize<M, S>(map: &M, serializer: S) -> Result<S::Ok, S::Error>
    where
        M: Borrow<EdgeMap>,
        S: Serializer,
    {
        let records: Vec<EdgeRecord> = map
            .borrow()
            .iter()
            .map(|(pair, entry)| EdgeRecord {
                source: pair.first().to_string(),
                target: pair.second().to_string(),
                weight: entry.weight,
            })
            .collect();
        records.serialize(serializer)
    }

    pub fn deserialize<'de, M, D>(deserializer: D) -> Result<M, D::Error>
    where
        M: From<EdgeMap>,
        D: Deserializer<'de>,
    {
        let records = Vec::<EdgeRecord>::deserialize(deserializer)?;
        let mut map = EdgeMap::new();
        for record in records {
            upsert(
                &mut map,
                CharacterPair::new(record.source, record.target),
                EdgeEntry::new(record.weight),
            );
        }
        Ok(M::from(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_order_independent() {
        assert_eq!(normalize_pair("MARTIN", "ARCHIVIST"), normalize_pair("ARCHIVIST", "MARTIN"));
        let pair = normalize_pair("MARTIN", "ARCHIVIST");
        assert_eq!(pair.first(), "ARCHIVIST");
        assert_eq!(pair.second(), "MARTIN");
        assert!(pair.contains("MARTIN"));
        assert!(!pair.is_self_pair());
    }

    #[test]
    fn test_upsert_inserts_then_adds() {
        let mut nodes = NodeMap::new();
        upsert(&mut nodes, "A".to_string(), NodeEntry::new(3));
        upsert(&mut nodes, "A".to_string(), NodeEntry::new(4));
        upsert(&mut nodes, "B".to_string(), NodeEntry::new(0));
        assert_eq!(nodes["A"].size, 7);
        assert_eq!(nodes["B"].size, 0);
    }

    #[test]
    fn test_lookup_does_not_create_entries() {
        let graph = EpisodeGraph::new();
        assert!(graph.node("GHOST").is_none());
        assert!(graph.edge("A", "B").is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_merge_into() {
        let mut target = EdgeMap::new();
        upsert(&mut target, normalize_pair("A", "B"), EdgeEntry::new(1.5));
        let mut delta = EdgeMap::new();
        upsert(&mut delta, normalize_pair("B", "A"), EdgeEntry::new(2.0));
        upsert(&mut delta, normalize_pair("A", "C"), EdgeEntry::new(1.0));
        merge_into(&mut target, &delta);
        assert_eq!(target[&normalize_pair("A", "B")].weight, 3.5);
        assert_eq!(target[&normalize_pair("A", "C")].weight, 1.0);
    }

    #[test]
    fn test_episode_graph_json_round_trip() {
        let mut graph = EpisodeGraph::new();
        graph.nodes.insert("A".to_string(), NodeEntry::new(2));
        graph.nodes.insert("B".to_string(), NodeEntry::new(1));
        graph.edges.insert(normalize_pair("B", "A"), EdgeEntry::new(2.0));

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["nodes"]["A"]["size"], 2);
        assert_eq!(json["edges"][0]["source"], "A");
        assert_eq!(json["edges"][0]["target"], "B");

        let back: EpisodeGraph = serde_json::from_value(json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn test_dangling_edges_detected() {
        let mut graph = EpisodeGraph::new();
        graph.nodes.insert("A".to_string(), NodeEntry::new(1));
        graph.edges.insert(normalize_pair("A", "B"), EdgeEntry::new(1.0));
        assert_eq!(graph.dangling_edges().len(), 1);
    }
}
