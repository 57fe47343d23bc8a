//! Cross-episode aggregation.
//!
//! Two views over a set of episode graphs:
//! - appearance indices: for each character (or pair), the episodes it
//!   appears in and its attributes there
//! - cumulative graphs: running totals, episode by episode
//!
//! # Adjacency rule
//!
//! The cumulative graph of episode `e` extends the cumulative graph of
//! episode `e - 1` only. If `e - 1` was not processed the chain restarts at
//! `e`, even when an earlier episode exists. Processing 5 and 7 therefore
//! gives `cumulative[7] == graph[7]`.
//!
//! # Sharing
//!
//! Cumulative node and edge maps sit behind [`Arc`]. Extending a cumulative
//! graph clones the handle and copies a map only when the new episode
//! actually changes it (`Arc::make_mut`).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{merge_into, CharacterPair, EdgeEntry, EdgeMap, EpisodeGraph, NodeEntry, NodeMap};

/// Which items an appearance index is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Node,
    Edge,
}

impl ItemKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "node" | "nodes" => Some(ItemKind::Node),
            "edge" | "edges" => Some(ItemKind::Edge),
            _ => None,
        }
    }
}

/// Character -> episode -> node entry
pub type NodeAppearances = BTreeMap<String, BTreeMap<u32, NodeEntry>>;

/// Pair -> episode -> edge entry
pub type EdgeAppearances = BTreeMap<CharacterPair, BTreeMap<u32, EdgeEntry>>;

/// Per-item episode appearances
#[derive(Debug, Clone, PartialEq)]
pub enum AppearanceIndex {
    Nodes(NodeAppearances),
    Edges(EdgeAppearances),
}

impl AppearanceIndex {
    pub fn kind(&self) -> ItemKind {
        match self {
            AppearanceIndex::Nodes(_) => ItemKind::Node,
            AppearanceIndex::Edges(_) => ItemKind::Edge,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AppearanceIndex::Nodes(index) => index.len(),
            AppearanceIndex::Edges(index) => index.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_nodes(&self) -> Option<&NodeAppearances> {
        match self {
            AppearanceIndex::Nodes(index) => Some(index),
            AppearanceIndex::Edges(_) => None,
        }
    }

    pub fn as_edges(&self) -> Option<&EdgeAppearances> {
        match self {
            AppearanceIndex::Edges(index) => Some(index),
            AppearanceIndex::Nodes(_) => None,
        }
    }

    pub fn into_nodes(self) -> Option<NodeAppearances> {
        match self {
            AppearanceIndex::Nodes(index) => Some(index),
            AppearanceIndex::Edges(_) => None,
        }
    }

    pub fn into_edges(self) -> Option<EdgeAppearances> {
        match self {
            AppearanceIndex::Edges(index) => Some(index),
            AppearanceIndex::Nodes(_) => None,
        }
    }
}

/// Record every node of every episode, in ascending episode order
pub fn node_appearances(graphs: &BTreeMap<u32, EpisodeGraph>) -> NodeAppearances {
    let mut index = NodeAppearances::new();
    for (&episode, graph) in graphs {
        for (name, entry) in &graph.nodes {
            index.entry(name.clone()).or_default().insert(episode, *entry);
        }
    }
    index
}

/// Record every edge of every episode, in ascending episode order
pub fn edge_appearances(graphs: &BTreeMap<u32, EpisodeGraph>) -> EdgeAppearances {
    let mut index = EdgeAppearances::new();
    for (&episode, graph) in graphs {
        for (pair, entry) in &graph.edges {
            index.entry(pair.clone()).or_default().insert(episode, *entry);
        }
    }
    index
}

/// Appearance index of the requested kind
pub fn appearance_index(graphs: &BTreeMap<u32, EpisodeGraph>, kind: ItemKind) -> AppearanceIndex {
    match kind {
        ItemKind::Node => AppearanceIndex::Nodes(node_appearances(graphs)),
        ItemKind::Edge => AppearanceIndex::Edges(edge_appearances(graphs)),
    }
}

/// Running totals of nodes and edges up to some episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeGraph {
    /// First episode of the unbroken run this total covers
    pub run_start: u32,
    pub nodes: Arc<NodeMap>,
    #[serde(with = "crate::graph::edge_list")]
    pub edges: Arc<EdgeMap>,
}

impl CumulativeGraph {
    /// Start a new run from one episode's graph
    pub fn from_episode(episode: u32, graph: &EpisodeGraph) -> Self {
        CumulativeGraph {
            run_start: episode,
            nodes: Arc::new(graph.nodes.clone()),
            edges: Arc::new(graph.edges.clone()),
        }
    }

    /// This total with `graph` added in
    pub fn extended_with(&self, graph: &EpisodeGraph) -> Self {
        let mut next = self.clone();
        if !graph.nodes.is_empty() {
            merge_into(Arc::make_mut(&mut next.nodes), &graph.nodes);
        }
        if !graph.edges.is_empty() {
            merge_into(Arc::make_mut(&mut next.edges), &graph.edges);
        }
        next
    }

    pub fn node(&self, name: &str) -> Option<&NodeEntry> {
        self.nodes.get(name)
    }

    pub fn edge(&self, a: &str, b: &str) -> Option<&EdgeEntry> {
        self.edges.get(&CharacterPair::new(a, b))
    }

    /// True if both graphs use the same node storage
    pub fn shares_nodes_with(&self, other: &CumulativeGraph) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }

    /// True if both graphs use the same edge storage
    pub fn shares_edges_with(&self, other: &CumulativeGraph) -> bool {
        Arc::ptr_eq(&self.edges, &other.edges)
    }

    /// Plain episode-graph copy of this total
    pub fn to_episode_graph(&self) -> EpisodeGraph {
        EpisodeGraph {
            nodes: (*self.nodes).clone(),
            edges: (*self.edges).clone(),
        }
    }
}

/// Cumulative graph for every episode, following the adjacency rule.
pub fn cumulative(graphs: &BTreeMap<u32, EpisodeGraph>) -> BTreeMap<u32, CumulativeGraph> {
    let mut totals: BTreeMap<u32, CumulativeGraph> = BTreeMap::new();

    for (&episode, graph) in graphs {
        let previous = episode.checked_sub(1).and_then(|prev| totals.get(&prev));
        let total = match previous {
            Some(prev_total) => prev_total.extended_with(graph),
            None => {
                debug!(episode, "starting new cumulative run");
                CumulativeGraph::from_episode(episode, graph)
            }
        };
        totals.insert(episode, total);
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::normalize_pair;

    fn graph(nodes: &[(&str, u64)], edges: &[(&str, &str, f64)]) -> EpisodeGraph {
        let mut g = EpisodeGraph::new();
        for (name, size) in nodes {
            g.nodes.insert(name.to_string(), NodeEntry::new(*size));
        }
        for (a, b, weight) in edges {
            g.edges.insert(normalize_pair(a, b), EdgeEntry::new(*weight));
        }
        g
    }

    #[test]
    fn test_node_appearances_accumulate_episodes() {
        let mut graphs = BTreeMap::new();
        graphs.insert(1, graph(&[("A", 3)], &[]));
        graphs.insert(2, graph(&[("A", 4), ("B", 1)], &[("A", "B", 2.0)]));

        let index = appearance_index(&graphs, ItemKind::Node).into_nodes().unwrap();
        assert_eq!(index["A"].len(), 2);
        assert_eq!(index["A"][&1].size, 3);
        assert_eq!(index["A"][&2].size, 4);
        assert_eq!(index["B"].keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_edge_appearances() {
        let mut graphs = BTreeMap::new();
        graphs.insert(3, graph(&[("A", 1), ("B", 1)], &[("B", "A", 1.5)]));
        let index = appearance_index(&graphs, ItemKind::Edge);
        assert_eq!(index.kind(), ItemKind::Edge);
        let edges = index.as_edges().unwrap();
        assert_eq!(edges[&normalize_pair("A", "B")][&3].weight, 1.5);
    }

    #[test]
    fn test_cumulative_adds_consecutive_episodes() {
        let mut graphs = BTreeMap::new();
        graphs.insert(1, graph(&[("A", 3)], &[]));
        graphs.insert(2, graph(&[("A", 4), ("B", 1)], &[("A", "B", 2.0)]));

        let totals = cumulative(&graphs);
        assert_eq!(totals[&1].node("A").unwrap().size, 3);
        assert_eq!(totals[&2].node("A").unwrap().size, 7);
        assert_eq!(totals[&2].node("B").unwrap().size, 1);
        assert_eq!(totals[&2].edge("B", "A").unwrap().weight, 2.0);
        assert_eq!(totals[&2].run_start, 1);
    }

    #[test]
    fn test_cumulative_gap_restarts_run() {
        let mut graphs = BTreeMap::new();
        graphs.insert(5, graph(&[("A", 10)], &[]));
        graphs.insert(7, graph(&[("A", 1)], &[]));

        let totals = cumulative(&graphs);
        assert_eq!(totals[&7].node("A").unwrap().size, 1);
        assert_eq!(totals[&7].run_start, 7);
        assert_eq!(totals[&7].to_episode_graph(), graphs[&7]);
    }

    #[test]
    fn test_unchanged_maps_are_shared() {
        let mut graphs = BTreeMap::new();
        graphs.insert(1, graph(&[("A", 1), ("B", 1)], &[("A", "B", 1.0)]));
        graphs.insert(2, graph(&[("A", 2)], &[]));

        let totals = cumulative(&graphs);
        assert!(totals[&2].shares_edges_with(&totals[&1]));
        assert!(!totals[&2].shares_nodes_with(&totals[&1]));
        assert_eq!(totals[&1].node("A").unwrap().size, 1);
    }

    #[test]
    fn test_cumulative_json_round_trip() {
        let mut graphs = BTreeMap::new();
        graphs.insert(1, graph(&[("A", 1), ("B", 2)], &[("A", "B", 1.0)]));
        let totals = cumulative(&graphs);

        let json = serde_json::to_string(&totals).unwrap();
        let back: BTreeMap<u32, CumulativeGraph> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, totals);
    }
}
