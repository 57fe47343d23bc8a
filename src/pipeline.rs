//! Episode and corpus processing.
//!
//! One episode runs segment -> split -> extract -> build. A corpus build runs
//! episodes in parallel, then aggregates the finished graphs in ascending
//! episode order.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::diagnostics::{DiagnosticStage, ExtractionDiagnostic, WarningKind};
use crate::error::{ExtractError, Result};
use crate::graph::aggregate::{edge_appearances, node_appearances, EdgeAppearances, NodeAppearances};
use crate::graph::{builder_from_scenes, cumulative, BuildProgress, CumulativeGraph, EpisodeGraph};
use crate::ingest::{extract, segment, split_into_scenes, SceneCharacters, TranscriptBounds};
use crate::store::{compute_hash, EpisodeTexts};

/// Inclusive range of episode numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRange {
    pub start: u32,
    pub end: u32,
}

impl EpisodeRange {
    pub fn new(start: u32, end: u32) -> Self {
        EpisodeRange { start, end }
    }

    /// Single-episode range
    pub fn single(episode: u32) -> Self {
        EpisodeRange::new(episode, episode)
    }

    /// Reject empty ranges, episode 0, and ranges past `max_episode`
    pub fn validate(&self, max_episode: u32) -> Result<()> {
        if self.start == 0 || self.start > self.end || self.end > max_episode {
            return Err(ExtractError::InvalidRange {
                start: self.start,
                end: self.end,
                max: max_episode,
            });
        }
        Ok(())
    }

    pub fn contains(&self, episode: u32) -> bool {
        (self.start..=self.end).contains(&episode)
    }

    pub fn episodes(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts describing one processed episode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub scenes: usize,
    pub delimiters_found: usize,
    pub empty_scenes: usize,
    pub characters: usize,
    pub edges: usize,
    pub total_words: u64,
}

/// Graph and diagnostics for one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub episode: u32,
    pub graph: EpisodeGraph,
    pub summary: EpisodeSummary,
    pub diagnostics: Vec<ExtractionDiagnostic>,
}

/// Build the graph of one episode from its raw text.
///
/// Never fails: degraded input (no markers, no delimiters, silent scenes)
/// yields warnings in [`EpisodeOutcome::diagnostics`].
pub fn process_episode(episode: u32, raw: &str, config: &ExtractionConfig) -> EpisodeOutcome {
    let mut diagnostics = Vec::new();

    let transcript = segment(raw, &config.name_table);
    if !transcript.bounds.markers_found() {
        warn!(episode, "no transcript markers found, using whole text");
        diagnostics.push(ExtractionDiagnostic::warning(
            episode,
            WarningKind::NoTranscriptMarkers,
        ));
    }
    info!(episode, bytes = transcript.text.len(), "transcript segmented");

    let split = split_into_scenes(&transcript);
    if split.delimiters_found == 0 {
        debug!(episode, "no scene delimiters");
        diagnostics.push(ExtractionDiagnostic::warning(
            episode,
            WarningKind::NoSceneDelimiters,
        ));
    }
    info!(episode, scenes = split.scenes.len(), "transcript split into scenes");

    let builder = builder_from_scenes(&split.scenes, &config.scoring());
    for &scene in builder.empty_scenes() {
        diagnostics.push(ExtractionDiagnostic::scene_warning(
            episode,
            scene,
            WarningKind::EmptyScene,
        ));
    }
    let empty_scenes = builder.empty_scenes().len();
    let graph = builder.finish();

    let summary = EpisodeSummary {
        episode,
        scenes: split.scenes.len(),
        delimiters_found: split.delimiters_found,
        empty_scenes,
        characters: graph.nodes.len(),
        edges: graph.edges.len(),
        total_words: graph.total_words(),
    };
    info!(
        episode,
        characters = summary.characters,
        edges = summary.edges,
        "episode graph built"
    );

    EpisodeOutcome {
        episode,
        graph,
        summary,
        diagnostics,
    }
}

/// Look up an episode in the store and process it
pub fn process_stored_episode(
    texts: &EpisodeTexts,
    episode: u32,
    config: &ExtractionConfig,
) -> Result<EpisodeOutcome> {
    let raw = texts.get(episode)?;
    Ok(process_episode(episode, raw, config))
}

/// Character info of one scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneReport {
    pub index: usize,
    pub lines: usize,
    pub characters: SceneCharacters,
}

/// Scene-level view of one episode, for checking how a text was parsed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneInspection {
    pub episode: u32,
    pub transcript_start: usize,
    pub transcript_end: usize,
    pub markers_found: bool,
    pub delimiters_found: usize,
    pub scenes: Vec<SceneReport>,
}

/// Segment and split an episode, returning per-scene character info
pub fn inspect_scenes(episode: u32, raw: &str, config: &ExtractionConfig) -> SceneInspection {
    let transcript = segment(raw, &config.name_table);
    let TranscriptBounds { start, end, .. } = transcript.bounds;
    let split = split_into_scenes(&transcript);

    let scenes = split
        .scenes
        .iter()
        .map(|scene| SceneReport {
            index: scene.index,
            lines: scene.lines.len(),
            characters: extract(&scene.line_refs()),
        })
        .collect();

    SceneInspection {
        episode,
        transcript_start: start,
        transcript_end: end,
        markers_found: transcript.bounds.markers_found(),
        delimiters_found: split.delimiters_found,
        scenes,
    }
}

/// Everything produced by one corpus build.
#[derive(Debug)]
pub struct CorpusBuild {
    pub range: EpisodeRange,
    pub individual: BTreeMap<u32, EpisodeGraph>,
    pub cumulative: BTreeMap<u32, CumulativeGraph>,
    pub node_appearances: NodeAppearances,
    pub edge_appearances: EdgeAppearances,
    pub summaries: BTreeMap<u32, EpisodeSummary>,
    /// Sorted warnings and errors across all episodes
    pub diagnostics: Vec<ExtractionDiagnostic>,
    /// Episodes that produced no graph
    pub failures: BTreeMap<u32, ExtractError>,
    /// SHA-256 of each processed episode's raw text
    pub sources: BTreeMap<u32, String>,
}

impl CorpusBuild {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| !d.is_error()).count()
    }
}

/// Build graphs for every episode in `range`, then aggregate them.
///
/// Fails only for an invalid range. An episode missing from `texts` is
/// recorded in [`CorpusBuild::failures`] and the rest of the batch continues.
pub fn build_corpus(
    texts: &EpisodeTexts,
    range: EpisodeRange,
    config: &ExtractionConfig,
    progress: Option<&BuildProgress<'_>>,
) -> Result<CorpusBuild> {
    range.validate(config.max_episode)?;
    info!(start = range.start, end = range.end, "building corpus");

    let episodes: Vec<u32> = range.episodes().collect();
    let total = episodes.len();
    let done = AtomicUsize::new(0);

    let results: Vec<(u32, Result<(EpisodeOutcome, String)>)> = episodes
        .par_iter()
        .map(|&episode| {
            let result = texts.get(episode).map(|raw| {
                let hash = compute_hash(raw.as_bytes());
                (process_episode(episode, raw, config), hash)
            });
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress {
                cb(finished, total);
            }
            (episode, result)
        })
        .collect();

    let mut individual = BTreeMap::new();
    let mut summaries = BTreeMap::new();
    let mut sources = BTreeMap::new();
    let mut diagnostics = Vec::new();
    let mut failures = BTreeMap::new();

    for (episode, result) in results {
        match result {
            Ok((outcome, hash)) => {
                diagnostics.extend(outcome.diagnostics);
                summaries.insert(episode, outcome.summary);
                individual.insert(episode, outcome.graph);
                sources.insert(episode, hash);
            }
            Err(err) => {
                warn!(episode, error = %err, "episode failed");
                diagnostics.push(ExtractionDiagnostic::error(
                    episode,
                    DiagnosticStage::Load,
                    err.code(),
                    err.to_string(),
                ));
                failures.insert(episode, err);
            }
        }
    }
    diagnostics.sort();

    let cumulative = cumulative(&individual);
    let node_appearances = node_appearances(&individual);
    let edge_appearances = edge_appearances(&individual);
    info!(
        episodes = individual.len(),
        failures = failures.len(),
        characters = node_appearances.len(),
        pairs = edge_appearances.len(),
        "corpus aggregated"
    );

    Ok(CorpusBuild {
        range,
        individual,
        cumulative,
        node_appearances,
        edge_appearances,
        summaries,
        diagnostics,
        failures,
        sources,
    })
}
