//! tapegraph CLI - character interaction networks from audio-drama transcripts
//!
//! Usage: tapegraph <command> [arguments]

mod build_cmd;
mod cli;
mod episode_cmd;
mod scenes_cmd;

use anyhow::{Context, Result};
use cli::Command;
use std::path::Path;
use std::process::ExitCode;
use tapegraph::output::{generate_execution_id, output_json, ErrorResponse, JsonResponse};
use tapegraph::{EpisodeTexts, ExtractionConfig, OutputFormat};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exit code when a build finished but some episodes produced no graph
const EXIT_PARTIAL: u8 = 2;

/// Install the stderr log subscriber.
///
/// `--log-level` wins over `RUST_LOG`; with neither, INFO and above.
fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {}", level))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Load the extraction config, or defaults when no file is given
pub(crate) fn load_config(path: Option<&Path>) -> Result<ExtractionConfig> {
    match path {
        Some(path) => ExtractionConfig::from_yaml_file(path)
            .map_err(tapegraph::ExtractError::from)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(ExtractionConfig::default()),
    }
}

/// Load episode texts from a JSON file or a directory of .txt files
pub(crate) fn load_texts(path: &Path) -> Result<EpisodeTexts> {
    EpisodeTexts::load(path).with_context(|| format!("Failed to load texts: {}", path.display()))
}

fn report_error(err: &anyhow::Error, output_format: OutputFormat) {
    eprintln!("Error: {:#}", err);
    if output_format == OutputFormat::Json {
        let response = JsonResponse::new(ErrorResponse::from_error(err), &generate_execution_id());
        if let Err(e) = output_json(&response) {
            eprintln!("Error: failed to write JSON error response: {}", e);
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let (args, log_level) = match cli::take_log_level(args) {
        Ok(split) => split,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    if args.len() < 2 {
        cli::print_usage();
        return ExitCode::from(1);
    }

    // Parse global --output flag so parse errors can still be reported as JSON
    let output_format = args
        .iter()
        .position(|x| x == "--output")
        .and_then(|i| args.get(i + 1))
        .and_then(|fmt| OutputFormat::from_str(fmt))
        .unwrap_or(OutputFormat::Human);

    let command = match cli::parse_args_from(&args) {
        Ok(command) => command,
        Err(e) => {
            report_error(&e, output_format);
            eprintln!();
            cli::print_usage();
            return ExitCode::from(1);
        }
    };

    if let Err(e) = init_logging(log_level.as_deref()) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }

    let result = match command {
        Command::Version => {
            println!("{}", tapegraph::version::version());
            Ok(true)
        }
        Command::Help => {
            cli::print_usage();
            Ok(true)
        }
        Command::Build {
            input,
            start,
            end,
            out_dir,
            export,
            format,
            minify,
            output_format,
        } => build_cmd::run_build(
            input,
            start,
            end,
            out_dir,
            export,
            format,
            minify,
            output_format,
        ),
        Command::Episode {
            input,
            episode,
            output_format,
        } => episode_cmd::run_episode(input, episode, output_format).map(|()| true),
        Command::Scenes {
            input,
            episode,
            output_format,
        } => scenes_cmd::run_scenes(input, episode, output_format).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_PARTIAL),
        Err(e) => {
            report_error(&e, output_format);
            ExitCode::from(1)
        }
    }
}
