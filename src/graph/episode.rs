//! Episode graph construction from scenes.

use tracing::debug;

use super::{closeness, upsert, CharacterPair, EdgeEntry, EdgeMap, EpisodeGraph, NodeEntry, NodeMap};
use crate::config::ScoringConfig;
use crate::ingest::{extract, Scene, SceneCharacters};

/// Add `size` words to `name`, creating the node at `size` if absent
pub fn upsert_node(nodes: &mut NodeMap, name: &str, size: u64) {
    upsert(nodes, name.to_string(), NodeEntry::new(size));
}

/// Add `weight` to the edge between `a` and `b`, creating it if absent
pub fn upsert_edge(edges: &mut EdgeMap, a: &str, b: &str, weight: f64) {
    upsert(edges, CharacterPair::new(a, b), EdgeEntry::new(weight));
}

/// Accumulates scene contributions into one [`EpisodeGraph`].
#[derive(Debug, Default)]
pub struct EpisodeGraphBuilder {
    scoring: ScoringConfig,
    graph: EpisodeGraph,
    scenes_seen: usize,
    empty_scenes: Vec<usize>,
}

impl EpisodeGraphBuilder {
    pub fn new(scoring: ScoringConfig) -> Self {
        EpisodeGraphBuilder {
            scoring,
            ..Default::default()
        }
    }

    /// Add one scene's characters.
    ///
    /// Every character grows its node by its word count. Every unordered pair
    /// of distinct characters gains the pair's closeness in this scene.
    pub fn add_scene(&mut self, scene_index: usize, characters: &SceneCharacters) {
        self.scenes_seen += 1;
        if characters.is_empty() {
            self.empty_scenes.push(scene_index);
            return;
        }

        for (name, info) in characters {
            upsert_node(&mut self.graph.nodes, name, info.word_count as u64);
        }

        // BTreeMap keys are distinct and sorted, so each pair appears once
        let cast: Vec<_> = characters.iter().collect();
        for (i, (name_a, info_a)) in cast.iter().enumerate() {
            for (name_b, info_b) in &cast[i + 1..] {
                let weight = closeness(
                    &info_a.appearances,
                    &info_b.appearances,
                    self.scoring.proximity_threshold,
                    self.scoring.base_closeness,
                );
                upsert_edge(&mut self.graph.edges, name_a, name_b, weight);
            }
        }

        debug!(
            scene = scene_index,
            characters = characters.len(),
            "scene added to episode graph"
        );
    }

    /// Indices of scenes that had no speaking characters
    pub fn empty_scenes(&self) -> &[usize] {
        &self.empty_scenes
    }

    pub fn scenes_seen(&self) -> usize {
        self.scenes_seen
    }

    pub fn finish(self) -> EpisodeGraph {
        self.graph
    }
}

/// Feed every scene to a fresh builder, leaving it open for inspection.
pub fn builder_from_scenes(scenes: &[Scene], scoring: &ScoringConfig) -> EpisodeGraphBuilder {
    let mut builder = EpisodeGraphBuilder::new(*scoring);
    for scene in scenes {
        builder.add_scene(scene.index, &extract(&scene.line_refs()));
    }
    builder
}

/// Build an episode graph from its scenes.
pub fn build(scenes: &[Scene], scoring: &ScoringConfig) -> EpisodeGraph {
    builder_from_scenes(scenes, scoring).finish()
}
