//! ternlex-decode - Decode trit streams back to text
//!
//! # Usage
//!
//! ```bash
//! # Decode a trit string given on the command line
//! ternlex-decode "+-++-=----==+====="
//!
//! # Decode files (globs are expanded, results sorted)
//! ternlex-decode 'encoded_messages/G_*.txt'
//!
//! # Decode stdin
//! cat msg.txt | ternlex-decode
//!
//! # Input was encoded with --raw
//! ternlex-decode --no-demod "+=====+====-"
//! ```

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use ternlex::{Codec, DecodeOptions, TableLoader, Trit};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ternlex-decode")]
#[command(version, about = "Decode balanced-ternary trit streams to text")]
struct Cli {
    /// Input was not modulated (encoded with --raw)
    #[arg(long)]
    no_demod: bool,

    /// Directory holding map.json and tier2_map.json
    #[arg(long, env = "TERNLEX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Trit string, file path or glob pattern
    inputs: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    if cli.inputs.is_empty() && std::io::stdin().is_terminal() {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.unwrap_or_else(TableLoader::data_dir);
    let codec = Codec::load_dir(&data_dir)
        .with_context(|| format!("Failed to load tables from {}", data_dir.display()))?;
    let options = DecodeOptions { demodulate: !cli.no_demod };

    if cli.inputs.is_empty() {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content).context("Failed to read stdin")?;
        let content = content.trim();
        if !content.is_empty() {
            println!("{}", codec.decode_units(content, options));
        }
        return Ok(());
    }

    let mut files = Vec::new();
    for input in &cli.inputs {
        if is_trit_input(input) {
            // A literal stream ends argument processing
            println!("{}", codec.decode_units(input, options));
            return Ok(());
        }
        files.extend(expand_input(input)?);
    }

    let labeled = files.len() > 1;
    for file in &files {
        if labeled {
            let name = file.file_name().unwrap_or(file.as_os_str());
            println!("=== {} ===", name.to_string_lossy());
        }
        println!("{}", decode_file(&codec, file, options)?);
        if labeled {
            println!();
        }
    }

    Ok(())
}

/// Only trit symbols and whitespace
fn is_trit_input(input: &str) -> bool {
    input.chars().all(|c| Trit::is_symbol(c) || matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// Glob matches in sorted order, or the input itself as a literal path
fn expand_input(input: &str) -> Result<Vec<PathBuf>> {
    let mut matches: Vec<PathBuf> = glob::glob(input)
        .with_context(|| format!("Invalid glob pattern: {}", input))?
        .filter_map(|entry| entry.ok())
        .collect();
    if matches.is_empty() {
        return Ok(vec![PathBuf::from(input)]);
    }
    matches.sort();
    Ok(matches)
}

fn decode_file(codec: &Codec, path: &Path, options: DecodeOptions) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(codec.decode_units(content.trim(), options).to_string())
}
