//! Build command implementation
//!
//! Processes an episode range into per-episode graphs, appearance indices and
//! cumulative graphs, then writes them out.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tapegraph::graph::export::{export_corpus, write_export_dir};
use tapegraph::output::{generate_execution_id, output_json, BuildResponse, JsonResponse};
use tapegraph::{
    build_corpus, CorpusExport, EpisodeRange, ExportConfig, ExportFormat, OutputFormat,
};
use tracing::debug;

use crate::cli::InputArgs;

/// Run the build command.
///
/// Returns `Ok(false)` when the build finished but some episodes failed.
#[allow(clippy::too_many_arguments)]
pub fn run_build(
    input: InputArgs,
    start: Option<u32>,
    end: Option<u32>,
    out_dir: Option<PathBuf>,
    export: Option<PathBuf>,
    format: ExportFormat,
    minify: bool,
    output_format: OutputFormat,
) -> Result<bool> {
    let exec_id = generate_execution_id();
    let config = crate::load_config(input.config.as_deref())?;
    let texts = crate::load_texts(&input.texts)?;

    let start = start.unwrap_or(1);
    let end = end.unwrap_or_else(|| texts.episodes().last().unwrap_or(start));
    let range = EpisodeRange::new(start, end);

    let progress = |done: usize, total: usize| {
        debug!(done, total, "episode finished");
    };
    let build = build_corpus(&texts, range, &config, Some(&progress))?;

    for diagnostic in &build.diagnostics {
        eprintln!("{}", diagnostic.format_stderr());
    }

    let corpus = CorpusExport::from_build(&build);
    let mut files = Vec::new();

    if let Some(dir) = out_dir {
        for path in write_export_dir(&dir, &corpus, minify)? {
            files.push(path.to_string_lossy().to_string());
        }
    }

    if let Some(path) = export {
        let content = export_corpus(&corpus, &ExportConfig::new(format).with_minify(minify))?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write export: {}", path.display()))?;
        files.push(path.to_string_lossy().to_string());
    }

    match output_format {
        OutputFormat::Json => {
            let response = BuildResponse::from_build(&build, files);
            let json_response =
                JsonResponse::new(response, &exec_id).with_partial(!build.is_complete());
            output_json(&json_response)?;
        }
        OutputFormat::Human => {
            println!(
                "episodes: {} of {} ({}-{})",
                build.individual.len(),
                range.len(),
                range.start,
                range.end
            );
            for summary in build.summaries.values() {
                println!(
                    "  episode {}: {} scenes, {} characters, {} edges, {} words",
                    summary.episode,
                    summary.scenes,
                    summary.characters,
                    summary.edges,
                    summary.total_words
                );
            }
            println!("characters: {}", build.node_appearances.len());
            println!("pairs: {}", build.edge_appearances.len());
            println!("warnings: {}", build.warning_count());
            println!("failed: {}", build.failures.len());
            for path in &files {
                println!("wrote {}", path);
            }
        }
    }

    Ok(build.is_complete())
}
