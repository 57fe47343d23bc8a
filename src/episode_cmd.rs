//! Episode command implementation
//!
//! Builds and prints the graph of one episode.

use anyhow::Result;
use tapegraph::output::{generate_execution_id, output_json, EpisodeResponse, JsonResponse};
use tapegraph::{process_stored_episode, OutputFormat};

use crate::cli::InputArgs;

pub fn run_episode(input: InputArgs, episode: u32, output_format: OutputFormat) -> Result<()> {
    let config = crate::load_config(input.config.as_deref())?;
    let texts = crate::load_texts(&input.texts)?;
    let outcome = process_stored_episode(&texts, episode, &config)?;

    for diagnostic in &outcome.diagnostics {
        eprintln!("{}", diagnostic.format_stderr());
    }

    match output_format {
        OutputFormat::Json => {
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(EpisodeResponse::from(outcome), &exec_id))?;
        }
        OutputFormat::Human => {
            let graph = &outcome.graph;
            println!(
                "episode {}: {} scenes, {} words",
                episode, outcome.summary.scenes, outcome.summary.total_words
            );

            // Largest speakers first, ties by name
            let mut nodes: Vec<_> = graph.nodes.iter().collect();
            nodes.sort_by(|a, b| b.1.size.cmp(&a.1.size).then_with(|| a.0.cmp(b.0)));
            println!("nodes:");
            for (name, entry) in nodes {
                println!("  {} {}", name, entry.size);
            }

            println!("edges:");
            for (pair, entry) in &graph.edges {
                println!("  {} -- {} {}", pair.first(), pair.second(), entry.weight);
            }
        }
    }

    Ok(())
}
