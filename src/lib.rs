//! tapegraph: character interaction networks from audio-drama transcripts
//!
//! tapegraph reads scraped episode texts, finds the transcript between the
//! tape-recorder click markers, splits it into scenes, and measures who
//! speaks and who speaks near whom. The result is one graph per episode plus
//! cross-episode views: which episodes each character or pair appears in,
//! and running totals episode by episode.
//!
//! # Data flow
//!
//! ```text
//! raw text -> ingest::segment -> ingest::split_into_scenes
//!          -> ingest::extract (per scene) -> graph::build (per episode)
//!          -> graph::appearance_index / graph::cumulative (per corpus)
//! ```
//!
//! Every stage is a pure transformation over in-memory text. Only
//! [`store`] and [`graph::export`] touch the filesystem.
//!
//! # Example
//!
//! ```
//! use tapegraph::{process_episode, ExtractionConfig};
//!
//! let raw = "MAG001 - Test\n[CLICK]\n\nARCHIVIST\nHello there.\nMARTIN\nHi.\n\n[CLICK]";
//! let outcome = process_episode(1, raw, &ExtractionConfig::default());
//! assert_eq!(outcome.graph.nodes["ARCHIVIST"].size, 2);
//! assert!(outcome.graph.edge("MARTIN", "ARCHIVIST").is_some());
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod error_codes;
pub mod graph;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod store;
pub mod version;

pub use config::{ConfigError, ExtractionConfig, NameTable, ScoringConfig};
pub use diagnostics::{DiagnosticStage, ExtractionDiagnostic, WarningKind};
pub use error::{ExtractError, Result};
pub use graph::{
    appearance_index, build, closeness, cumulative, normalize_pair, AppearanceIndex,
    BuildProgress, CharacterPair, CorpusExport, CumulativeGraph, EdgeEntry, EpisodeGraph,
    EpisodeGraphBuilder, ExportConfig, ExportFormat, ItemKind, NodeEntry,
};
pub use ingest::{extract, segment, split_into_scenes, CharacterInfo, Scene, SceneCharacters, Transcript};
pub use pipeline::{
    build_corpus, inspect_scenes, process_episode, process_stored_episode, CorpusBuild,
    EpisodeOutcome, EpisodeRange, EpisodeSummary,
};
pub use output::OutputFormat;
pub use store::EpisodeTexts;
