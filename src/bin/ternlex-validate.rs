//! ternlex-validate - Check lexicon table files before deploying them
//!
//! # Usage
//!
//! ```bash
//! # Validate the configured data directory
//! ternlex-validate
//!
//! # Validate specific files or directories (recursive)
//! ternlex-validate data/ternlex other/map.json
//!
//! # Verbose output with tier and entry counts, plus warnings
//! ternlex-validate -v data/ternlex
//! ```
//!
//! # Exit Codes
//!
//! - 0: All files validated successfully
//! - 1: One or more files failed validation
//! - 2: Invalid arguments or IO error

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ternlex::validate::{validate_directory, validate_file, ValidationResult, ValidationSummary};
use ternlex::TableLoader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ternlex-validate")]
#[command(version, about = "Validate ternlex table files (map.json, tier2_map.json)")]
#[command(after_help = "EXIT CODES:\n    0    All files validated successfully\n    1    One or more files failed validation\n    2    Invalid arguments or IO error")]
struct Cli {
    /// Show tier, entry counts and warnings
    #[arg(short, long)]
    verbose: bool,

    /// Files or directories to validate (default: the data directory)
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(2);
        }
        Err(e) => {
            // --help / --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    let paths = if cli.paths.is_empty() {
        vec![TableLoader::data_dir()]
    } else {
        cli.paths
    };

    let mut all_results = Vec::new();

    for path in &paths {
        if !path.exists() {
            eprintln!("Error: Path does not exist: {}", path.display());
            return ExitCode::from(2);
        }

        if path.is_file() {
            let result = validate_file(path);
            print_result(&result, cli.verbose);
            all_results.push(result);
        } else if path.is_dir() {
            match validate_directory(path) {
                Ok(results) => {
                    for result in &results {
                        print_result(result, cli.verbose);
                    }
                    all_results.extend(results);
                }
                Err(e) => {
                    eprintln!("Error reading directory {}: {}", path.display(), e);
                    return ExitCode::from(2);
                }
            }
        }
    }

    let summary = ValidationSummary::from_results(&all_results);
    eprintln!();
    summary.print_report();

    if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_result(result: &ValidationResult, verbose: bool) {
    match result {
        ValidationResult::Ok { path, tier, entries, warnings } => {
            let marker = if warnings.is_empty() { "+" } else { "!" };

            if verbose {
                println!("{} {} ({}, {} entries)", marker, path.display(), tier, entries);
                for warning in warnings {
                    eprintln!("  WARN : {}", warning);
                }
            } else {
                println!("{} {}", marker, path.display());
            }
        }
        ValidationResult::Err { path, error } => {
            eprintln!("x {}", path.display());
            eprintln!("  {}", error);
        }
    }
}
