//! Scenes command implementation
//!
//! Shows how one episode was segmented and who speaks in each scene, for
//! checking scraped texts against the marker conventions.

use anyhow::Result;
use tapegraph::output::{generate_execution_id, output_json, JsonResponse};
use tapegraph::{inspect_scenes, OutputFormat};

use crate::cli::InputArgs;

pub fn run_scenes(input: InputArgs, episode: u32, output_format: OutputFormat) -> Result<()> {
    let config = crate::load_config(input.config.as_deref())?;
    let texts = crate::load_texts(&input.texts)?;
    let raw = texts.get(episode)?;
    let inspection = inspect_scenes(episode, raw, &config);

    match output_format {
        OutputFormat::Json => {
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(inspection, &exec_id))?;
        }
        OutputFormat::Human => {
            println!(
                "episode {}: transcript bytes {}..{}{}",
                episode,
                inspection.transcript_start,
                inspection.transcript_end,
                if inspection.markers_found { "" } else { " (no markers)" }
            );
            println!(
                "scenes: {} ({} delimiters)",
                inspection.scenes.len(),
                inspection.delimiters_found
            );
            for scene in &inspection.scenes {
                println!("scene {} ({} lines)", scene.index, scene.lines);
                for (name, info) in &scene.characters {
                    println!(
                        "  {} words={} cues={:?}",
                        name, info.word_count, info.appearances
                    );
                }
            }
        }
    }

    Ok(())
}
