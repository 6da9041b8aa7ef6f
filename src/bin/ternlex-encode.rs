//! ternlex-encode - Encode text as a balanced-ternary trit stream
//!
//! # Usage
//!
//! ```bash
//! # Modulated stream on stdout
//! ternlex-encode "Hello, мир"
//!
//! # Raw chunk stream (no modulation)
//! ternlex-encode --raw "Hello"
//!
//! # Also write encoded_messages/greeting.txt
//! ternlex-encode --save greeting "Hello"
//! ```
//!
//! Characters missing from both tiers fall back to hex escape.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ternlex::{Codec, EncodeOptions, TableLoader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ternlex-encode")]
#[command(version, about = "Encode text as a balanced-ternary trit stream")]
struct Cli {
    /// Output raw trits (no modulation)
    #[arg(long)]
    raw: bool,

    /// Also save to <out-dir>/<NAME>.txt
    #[arg(long, value_name = "NAME")]
    save: Option<String>,

    /// Directory for --save
    #[arg(long, default_value = "encoded_messages")]
    out_dir: PathBuf,

    /// Directory holding map.json and tier2_map.json
    #[arg(long, env = "TERNLEX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Text to encode (arguments are joined with spaces)
    #[arg(required = true)]
    text: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run(Cli::parse()) {
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

    let text = cli.text.join(" ");
    let output = codec.encode_with(&text, EncodeOptions { raw: cli.raw })?;

    if let Some(name) = &cli.save {
        std::fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("Failed to create {}", cli.out_dir.display()))?;
        let path = cli.out_dir.join(format!("{}.txt", name));
        std::fs::write(&path, format!("{}\n", output))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Saved to {}", path.display());
    }

    println!("{}", output);
    Ok(())
}
