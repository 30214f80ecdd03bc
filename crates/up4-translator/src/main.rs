//! `up4-translate`: offline UP4 translation tool.
//!
//! Reads a JSON array of device entities, table entries or UPF entities from a
//! file (or stdin) and prints the translation as pretty JSON on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use std::process::ExitCode;
use tracing::{error, info, warn};
use up4_pi::{PiEntity, PiTableEntry};
use up4_translator::{PipelineTranslator, Up4Translator};
use up4_upf::UpfEntity;

/// UP4 table entry / UPF entity translator
#[derive(Parser, Debug)]
#[command(name = "up4-translate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the UPF entity kind of each device entity
    Classify {
        /// JSON file with an array of device entities, or '-' for stdin
        file: String,
    },
    /// Translate table entries into UPF entities
    Decode {
        /// JSON file with an array of table entries, or '-' for stdin
        file: String,
    },
    /// Translate UPF entities into table entries
    Encode {
        /// JSON file with an array of UPF entities, or '-' for stdin
        file: String,
    },
}

fn init_logging(log_level: &str, json: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}

fn read_input<T: DeserializeOwned>(file: &str) -> Result<Vec<T>> {
    let text = if file == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file))?
    };
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", file))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

/// Runs a subcommand. Returns the number of inputs that failed to translate.
fn run(command: Command, translator: &impl Up4Translator) -> Result<usize> {
    match command {
        Command::Classify { file } => {
            let entities: Vec<PiEntity> = read_input(&file)?;
            let kinds: Vec<_> = entities
                .iter()
                .map(|e| translator.entity_type(e))
                .collect();
            print_json(&kinds)?;
            Ok(0)
        }
        Command::Decode { file } => {
            let entries: Vec<PiTableEntry> = read_input(&file)?;
            let mut decoded = Vec::with_capacity(entries.len());
            let mut failures = 0;
            for entry in &entries {
                match translator.decode(entry) {
                    Ok(entity) => decoded.push(entity),
                    Err(e) => {
                        error!("{}", e);
                        failures += 1;
                    }
                }
            }
            print_json(&decoded)?;
            Ok(failures)
        }
        Command::Encode { file } => {
            let entities: Vec<UpfEntity> = read_input(&file)?;
            let mut encoded = Vec::with_capacity(entities.len());
            let mut failures = 0;
            for entity in &entities {
                match translator.encode(entity) {
                    Ok(result) => {
                        if let Some(advisory) = &result.advisory {
                            warn!(entity = %entity, "{}", advisory);
                        }
                        encoded.push(result.entry);
                    }
                    Err(e) => {
                        error!("{}", e);
                        failures += 1;
                    }
                }
            }
            print_json(&encoded)?;
            Ok(failures)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level, args.json_logs);

    match run(args.command, &PipelineTranslator) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            info!("{} input(s) could not be translated", failures);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
