//! CLI argument parsing for tapegraph
//!
//! Defines the Command enum and parse_args_from() function for all CLI commands.

use anyhow::Result;
use std::path::PathBuf;
use tapegraph::{ExportFormat, OutputFormat};

pub fn print_usage() {
    eprintln!("tapegraph - Character interaction networks from audio-drama transcripts");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  tapegraph <command> [arguments]");
    eprintln!("  tapegraph --help");
    eprintln!("  tapegraph --version");
    eprintln!();
    eprintln!("  tapegraph build --texts <FILE|DIR> [--config <YAML>] [--start <N>] [--end <N>] [--out-dir <DIR>] [--export <FILE>] [--format json|jsonl] [--minify] [--output <FORMAT>]");
    eprintln!("  tapegraph episode --texts <FILE|DIR> --episode <N> [--config <YAML>] [--output <FORMAT>]");
    eprintln!("  tapegraph scenes --texts <FILE|DIR> --episode <N> [--config <YAML>] [--output <FORMAT>]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  build     Build episode graphs, appearance indices and cumulative graphs");
    eprintln!("  episode   Build and print the graph of a single episode");
    eprintln!("  scenes    Show per-scene character info for one episode");
    eprintln!();
    eprintln!("Global arguments:");
    eprintln!("  --output <FORMAT>    Output format: human (default) or json");
    eprintln!("  --log-level <LEVEL>  Log filter, e.g. info, debug, tapegraph=trace (default: $RUST_LOG or info)");
    eprintln!();
    eprintln!("Input arguments:");
    eprintln!("  --texts <FILE|DIR>   JSON object of episode texts, or a directory of .txt files");
    eprintln!("  --config <YAML>      Extraction config (name table, proximity threshold, base closeness)");
    eprintln!();
    eprintln!("Build arguments:");
    eprintln!("  --start <N>          First episode (default: 1)");
    eprintln!("  --end <N>            Last episode (default: highest stored episode)");
    eprintln!("  --out-dir <DIR>      Write individual.json, cumulative.json, na.json, ea.json, manifest.json");
    eprintln!("  --export <FILE>      Write the whole corpus as one file");
    eprintln!("  --format <FORMAT>    Format for --export: json (default) or jsonl");
    eprintln!("  --minify             Use compact JSON (no pretty-printing)");
}

/// Input arguments shared by every command
#[derive(Debug, Clone, PartialEq)]
pub struct InputArgs {
    pub texts: PathBuf,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Build {
        input: InputArgs,
        start: Option<u32>,
        end: Option<u32>,
        out_dir: Option<PathBuf>,
        export: Option<PathBuf>,
        format: ExportFormat,
        minify: bool,
        output_format: OutputFormat,
    },
    Episode {
        input: InputArgs,
        episode: u32,
        output_format: OutputFormat,
    },
    Scenes {
        input: InputArgs,
        episode: u32,
        output_format: OutputFormat,
    },
    Version,
    Help,
}

/// Value following the flag at `args[i]`
fn flag_value<'a>(args: &'a [String], i: usize) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{} requires an argument", args[i]))
}

fn parse_episode_number(flag: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("{} must be a positive integer, got '{}'", flag, value))
}

fn parse_output_format(value: &str) -> Result<OutputFormat> {
    OutputFormat::from_str(value).ok_or_else(|| {
        anyhow::anyhow!("Invalid output format: {}. Must be human or json", value)
    })
}

/// Parse arguments for a single-episode command (`episode`, `scenes`)
fn parse_episode_args(args: &[String]) -> Result<(InputArgs, u32, OutputFormat)> {
    let mut texts: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut episode: Option<u32> = None;
    let mut output_format = OutputFormat::Human;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--texts" => {
                texts = Some(PathBuf::from(flag_value(args, i)?));
                i += 2;
            }
            "--config" => {
                config = Some(PathBuf::from(flag_value(args, i)?));
                i += 2;
            }
            "--episode" => {
                episode = Some(parse_episode_number("--episode", flag_value(args, i)?)?);
                i += 2;
            }
            "--output" => {
                output_format = parse_output_format(flag_value(args, i)?)?;
                i += 2;
            }
            _ => {
                return Err(anyhow::anyhow!("Unknown argument: {}", args[i]));
            }
        }
    }

    let texts = texts.ok_or_else(|| anyhow::anyhow!("--texts is required"))?;
    let episode = episode.ok_or_else(|| anyhow::anyhow!("--episode is required"))?;
    Ok((InputArgs { texts, config }, episode, output_format))
}

/// Parse a full argument vector (program name first).
///
/// `--log-level` is consumed by the binary before this runs.
pub fn parse_args_from(args: &[String]) -> Result<Command> {
    if args.len() < 2 {
        return Err(anyhow::anyhow!("Missing command"));
    }

    let command = &args[1];

    match command.as_str() {
        "--version" | "-V" => Ok(Command::Version),
        "--help" | "-h" => Ok(Command::Help),
        "build" => {
            let mut texts: Option<PathBuf> = None;
            let mut config: Option<PathBuf> = None;
            let mut start: Option<u32> = None;
            let mut end: Option<u32> = None;
            let mut out_dir: Option<PathBuf> = None;
            let mut export: Option<PathBuf> = None;
            let mut format = ExportFormat::Json;
            let mut minify = false;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--texts" => {
                        texts = Some(PathBuf::from(flag_value(args, i)?));
                        i += 2;
                    }
                    "--config" => {
                        config = Some(PathBuf::from(flag_value(args, i)?));
                        i += 2;
                    }
                    "--start" => {
                        start = Some(parse_episode_number("--start", flag_value(args, i)?)?);
                        i += 2;
                    }
                    "--end" => {
                        end = Some(parse_episode_number("--end", flag_value(args, i)?)?);
                        i += 2;
                    }
                    "--out-dir" => {
                        out_dir = Some(PathBuf::from(flag_value(args, i)?));
                        i += 2;
                    }
                    "--export" => {
                        export = Some(PathBuf::from(flag_value(args, i)?));
                        i += 2;
                    }
                    "--format" => {
                        let value = flag_value(args, i)?;
                        format = ExportFormat::from_str(value).ok_or_else(|| {
                            anyhow::anyhow!("Invalid export format: {}. Must be json or jsonl", value)
                        })?;
                        i += 2;
                    }
                    "--minify" => {
                        minify = true;
                        i += 1;
                    }
                    "--output" => {
                        output_format = parse_output_format(flag_value(args, i)?)?;
                        i += 2;
                    }
                    _ => {
                        return Err(anyhow::anyhow!("Unknown argument: {}", args[i]));
                    }
                }
            }

            let texts = texts.ok_or_else(|| anyhow::anyhow!("--texts is required"))?;

            Ok(Command::Build {
                input: InputArgs { texts, config },
                start,
                end,
                out_dir,
                export,
                format,
                minify,
                output_format,
            })
        }
        "episode" => {
            let (input, episode, output_format) = parse_episode_args(args)?;
            Ok(Command::Episode {
                input,
                episode,
                output_format,
            })
        }
        "scenes" => {
            let (input, episode, output_format) = parse_episode_args(args)?;
            Ok(Command::Scenes {
                input,
                episode,
                output_format,
            })
        }
        _ => Err(anyhow::anyhow!("Unknown command: {}", command)),
    }
}

/// Split out the global `--log-level <LEVEL>` flag.
///
/// Returns the remaining arguments and the level, if given.
pub fn take_log_level(args: Vec<String>) -> Result<(Vec<String>, Option<String>)> {
    let mut rest = Vec::with_capacity(args.len());
    let mut level = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--log-level" {
            let value = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("--log-level requires an argument"))?;
            level = Some(value);
        } else {
            rest.push(arg);
        }
    }

    Ok((rest, level))
}
