//! Extraction diagnostics for degraded transcripts and failed episodes.
//!
//! Warnings mark input the pipeline processed anyway (no click markers, no
//! scene delimiters, scenes without speakers). Errors mark episodes that
//! produced no graph. Both sort deterministically by episode so a batch
//! report reads the same on every run.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Degraded-input condition that did not stop processing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// No click or supplement marker; the whole text was used
    NoTranscriptMarkers,
    /// No scene delimiter; the transcript is a single scene
    NoSceneDelimiters,
    /// A scene with no speaking character
    EmptyScene,
}

impl WarningKind {
    /// Stable sort key for deterministic ordering.
    pub fn sort_key(&self) -> u8 {
        match self {
            WarningKind::NoTranscriptMarkers => 0,
            WarningKind::NoSceneDelimiters => 1,
            WarningKind::EmptyScene => 2,
        }
    }

    /// Human-readable description for stderr output.
    pub fn description(&self) -> &'static str {
        match self {
            WarningKind::NoTranscriptMarkers => "no transcript markers, using whole text",
            WarningKind::NoSceneDelimiters => "no scene delimiters, treating transcript as one scene",
            WarningKind::EmptyScene => "scene has no speaking characters",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl PartialOrd for WarningKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WarningKind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Pipeline stage where an episode failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStage {
    /// Looking up or reading the episode text
    Load,
    /// Locating and normalizing the transcript
    Segment,
    /// Splitting into scenes
    Split,
    /// Extracting character info
    Extract,
    /// Building the episode graph
    Build,
}

impl DiagnosticStage {
    /// Stable sort key for deterministic ordering.
    pub fn sort_key(&self) -> u8 {
        match self {
            DiagnosticStage::Load => 0,
            DiagnosticStage::Segment => 1,
            DiagnosticStage::Split => 2,
            DiagnosticStage::Extract => 3,
            DiagnosticStage::Build => 4,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticStage::Load => "loading text",
            DiagnosticStage::Segment => "segmenting transcript",
            DiagnosticStage::Split => "splitting scenes",
            DiagnosticStage::Extract => "extracting characters",
            DiagnosticStage::Build => "building graph",
        }
    }
}

impl fmt::Display for DiagnosticStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl PartialOrd for DiagnosticStage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DiagnosticStage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// A diagnostic event from one episode's extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum ExtractionDiagnostic {
    /// Input was degraded but a graph was still produced
    Warning {
        episode: u32,
        kind: WarningKind,
        /// Scene index, for scene-level warnings
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scene: Option<usize>,
    },
    /// The episode produced no graph
    Error {
        episode: u32,
        stage: DiagnosticStage,
        /// Stable error code (TAPE-XXX-NNN)
        code: String,
        message: String,
    },
}

impl ExtractionDiagnostic {
    pub fn warning(episode: u32, kind: WarningKind) -> Self {
        ExtractionDiagnostic::Warning {
            episode,
            kind,
            scene: None,
        }
    }

    pub fn scene_warning(episode: u32, scene: usize, kind: WarningKind) -> Self {
        ExtractionDiagnostic::Warning {
            episode,
            kind,
            scene: Some(scene),
        }
    }

    pub fn error(
        episode: u32,
        stage: DiagnosticStage,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ExtractionDiagnostic::Error {
            episode,
            stage,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn episode(&self) -> u32 {
        match self {
            ExtractionDiagnostic::Warning { episode, .. } => *episode,
            ExtractionDiagnostic::Error { episode, .. } => *episode,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExtractionDiagnostic::Error { .. })
    }

    /// Stable sort key for deterministic ordering.
    ///
    /// Primary: episode number
    /// Secondary: variant (Error before Warning)
    /// Then: stage/kind sort key, scene index
    pub fn sort_key(&self) -> (u32, u8, u8, usize) {
        match self {
            ExtractionDiagnostic::Error { episode, stage, .. } => {
                (*episode, 0, stage.sort_key(), 0)
            }
            ExtractionDiagnostic::Warning {
                episode,
                kind,
                scene,
            } => (*episode, 1, kind.sort_key(), scene.unwrap_or(0)),
        }
    }

    /// Format for human-readable stderr output.
    ///
    /// Examples:
    /// - "WARN ep 12: no scene delimiters, treating transcript as one scene"
    /// - "WARN ep 12 scene 3: scene has no speaking characters"
    /// - "ERROR ep 40: loading text: TAPE-EP-001: episode 40 not found"
    pub fn format_stderr(&self) -> String {
        match self {
            ExtractionDiagnostic::Warning {
                episode,
                kind,
                scene: Some(scene),
            } => format!("WARN ep {} scene {}: {}", episode, scene, kind),
            ExtractionDiagnostic::Warning {
                episode,
                kind,
                scene: None,
            } => format!("WARN ep {}: {}", episode, kind),
            ExtractionDiagnostic::Error {
                episode,
                stage,
                code,
                message,
            } => format!("ERROR ep {}: {}: {}: {}", episode, stage, code, message),
        }
    }
}

impl fmt::Display for ExtractionDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_stderr())
    }
}

impl PartialOrd for ExtractionDiagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExtractionDiagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.format_stderr().cmp(&other.format_stderr()))
    }
}
