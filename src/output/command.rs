//! JSON output types for CLI commands
//!
//! Every JSON payload is wrapped in a [`JsonResponse`] carrying the schema
//! version and an execution ID, so consumers can parse stdout without
//! guessing which build of the tool produced it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagnostics::ExtractionDiagnostic;
use crate::error::ExtractError;
use crate::graph::export::FailureRecord;
use crate::graph::EpisodeGraph;
use crate::pipeline::{CorpusBuild, EpisodeOutcome, EpisodeRange, EpisodeSummary};

/// Current JSON output schema version
pub const TAPEGRAPH_JSON_SCHEMA_VERSION: &str = "1.0.0";

/// Wrapper for all JSON responses
///
/// Every JSON response includes schema_version and execution_id for
/// parsing stability and traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    /// Schema version for parsing stability
    pub schema_version: String,
    /// Unique execution ID for this run
    pub execution_id: String,
    pub tool: String,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
    /// Response data
    pub data: T,
    /// Whether the response is partial (some episodes failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

impl<T> JsonResponse<T> {
    /// Create a new JSON response
    pub fn new(data: T, execution_id: &str) -> Self {
        JsonResponse {
            schema_version: TAPEGRAPH_JSON_SCHEMA_VERSION.to_string(),
            execution_id: execution_id.to_string(),
            tool: "tapegraph".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            data,
            partial: None,
        }
    }

    /// Mark the response as partial
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }
}

/// Response for the `build` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildResponse {
    pub range: EpisodeRange,
    /// Episodes that produced a graph, ascending
    pub episodes: Vec<u32>,
    pub summaries: Vec<EpisodeSummary>,
    pub failures: BTreeMap<u32, FailureRecord>,
    pub diagnostics: Vec<ExtractionDiagnostic>,
    /// Distinct characters across the corpus
    pub characters: usize,
    /// Distinct character pairs across the corpus
    pub pairs: usize,
    /// Files written, if an output directory was given
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl BuildResponse {
    pub fn from_build(build: &CorpusBuild, files: Vec<String>) -> Self {
        BuildResponse {
            range: build.range,
            episodes: build.individual.keys().copied().collect(),
            summaries: build.summaries.values().cloned().collect(),
            failures: build
                .failures
                .iter()
                .map(|(&episode, err)| (episode, FailureRecord::from(err)))
                .collect(),
            diagnostics: build.diagnostics.clone(),
            characters: build.node_appearances.len(),
            pairs: build.edge_appearances.len(),
            files,
        }
    }
}

/// Response for the `episode` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeResponse {
    pub summary: EpisodeSummary,
    pub graph: EpisodeGraph,
    pub diagnostics: Vec<ExtractionDiagnostic>,
}

impl From<EpisodeOutcome> for EpisodeResponse {
    fn from(outcome: EpisodeOutcome) -> Self {
        EpisodeResponse {
            summary: outcome.summary,
            graph: outcome.graph,
            diagnostics: outcome.diagnostics,
        }
    }
}

/// Error response for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category/type
    pub error: String,
    /// Stable error code, when the error carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Build from any error, picking up the code of an [`ExtractError`]
    pub fn from_error(err: &anyhow::Error) -> Self {
        let code = err
            .downcast_ref::<ExtractError>()
            .map(|e| e.code().to_string());
        ErrorResponse {
            error: if code.is_some() { "extract_error" } else { "error" }.to_string(),
            code,
            message: format!("{:#}", err),
        }
    }
}

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// JSON output with schema versioning
    Json,
}

impl OutputFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Generate a unique execution ID for this run
///
/// Uses timestamp + process ID for uniqueness.
pub fn generate_execution_id() -> String {
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let pid = process::id();

    format!("{:x}-{:x}", timestamp, pid)
}

/// Output JSON to stdout
pub fn output_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}
