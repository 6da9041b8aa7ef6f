//! Table Loader - Clean API for loading lexicon tables
//!
//! # Usage
//!
//! ## Runtime loading
//!
//! ```ignore
//! use ternlex::loader::{TableLoader, load_path};
//!
//! // Configure data directory once at startup
//! TableLoader::set_data_dir("/path/to/lexicon");
//!
//! // {data_dir}/map.json + optional {data_dir}/tier2_map.json
//! let tables = TableLoader::load_default()?;
//!
//! // {data_dir}/arch-identity/map.json + ...
//! let tables = load_path("arch-identity")?;
//! ```
//!
//! ## Testing only
//!
//! ```ignore
//! use ternlex::loader::load_string;
//!
//! let tables = load_string(tier1_json, None)?;
//! ```
//!
//! # Document Format
//!
//! ```json
//! { "mapping": { "+-++-=": "SHIFT_6", "----==": " ", "+=====": "a" } }
//! ```
//!
//! Other top-level fields are ignored. A missing Tier-2 file is an empty
//! Tier-2 table, not an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{CodecTables, SymbolTable, Tier};

/// Tier-1 file name inside a table directory
pub const TIER1_FILE: &str = "map.json";

/// Tier-2 file name inside a table directory
pub const TIER2_FILE: &str = "tier2_map.json";

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "TERNLEX_DATA_DIR";

/// Default data directory
pub const DEFAULT_DATA_DIR: &str = "data/ternlex";

// =============================================================================
// Table Document
// =============================================================================

/// On-disk form of one tier
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Symbol string -> token string
    pub mapping: BTreeMap<String, String>,
}

impl TableDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Parse into a validated table
    pub fn to_table(&self, tier: Tier) -> Result<SymbolTable> {
        SymbolTable::from_mapping(tier, &self.mapping)
    }

    /// Document form of an existing table
    pub fn from_table(table: &SymbolTable) -> Self {
        let mapping = table
            .sorted_entries()
            .into_iter()
            .map(|(k, t)| (k.to_string(), t.name()))
            .collect();
        Self { mapping }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// Table Loader
// =============================================================================

/// Global data directory
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Table loader configuration and utilities
pub struct TableLoader;

impl TableLoader {
    /// Set the data directory for table loading
    ///
    /// Call this once at application startup; later calls are ignored:
    /// ```ignore
    /// TableLoader::set_data_dir("data/ternlex");
    /// ```
    pub fn set_data_dir<P: AsRef<Path>>(path: P) {
        let _ = DATA_DIR.set(path.as_ref().to_path_buf());
    }

    /// Get the configured data directory, else `$TERNLEX_DATA_DIR`, else "data/ternlex"
    pub fn data_dir() -> PathBuf {
        DATA_DIR.get().cloned().unwrap_or_else(|| {
            std::env::var_os(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
        })
    }

    /// Load both tiers from the data directory
    pub fn load_default() -> Result<CodecTables> {
        Self::load_dir(Self::data_dir())
    }

    /// Load `map.json` (required) and `tier2_map.json` (optional) from `dir`
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<CodecTables> {
        let dir = dir.as_ref();
        log::info!("Loading lexicon tables from {}", dir.display());

        let tier1 = load_table_file(dir.join(TIER1_FILE), Tier::Tier1)?;

        let tier2_path = dir.join(TIER2_FILE);
        let tier2 = if tier2_path.is_file() {
            load_table_file(&tier2_path, Tier::Tier2)?
        } else {
            log::debug!("No {} in {}, Tier-2 is empty", TIER2_FILE, dir.display());
            SymbolTable::empty(Tier::Tier2)
        };

        let tables = CodecTables::new(tier1, tier2)?;
        log::info!(
            "Lexicon loaded: {} Tier-1 entries, {} Tier-2 entries, hex escape {}",
            tables.tier1().len(),
            tables.tier2().len(),
            if tables.hex_escape_key().is_some() { "enabled" } else { "disabled" }
        );
        Ok(tables)
    }

    /// Write both tiers of `tables` into `dir` as table documents
    pub fn save_dir<P: AsRef<Path>>(tables: &CodecTables, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let tier1 = TableDocument::from_table(tables.tier1()).to_json_pretty()?;
        std::fs::write(dir.join(TIER1_FILE), tier1)?;
        if !tables.tier2().is_empty() {
            let tier2 = TableDocument::from_table(tables.tier2()).to_json_pretty()?;
            std::fs::write(dir.join(TIER2_FILE), tier2)?;
        }
        Ok(())
    }
}

/// Load tables from a path relative to the data directory
///
/// # Arguments
/// * `name` - Table set directory, e.g. "arch-identity"
pub fn load_path(name: &str) -> Result<CodecTables> {
    TableLoader::load_dir(TableLoader::data_dir().join(name))
}

/// Load tables from JSON strings (testing only)
pub fn load_string(tier1_json: &str, tier2_json: Option<&str>) -> Result<CodecTables> {
    let tier1 = TableDocument::from_json(tier1_json)?.to_table(Tier::Tier1)?;
    let tier2 = match tier2_json {
        Some(json) => TableDocument::from_json(json)?.to_table(Tier::Tier2)?,
        None => SymbolTable::empty(Tier::Tier2),
    };
    CodecTables::new(tier1, tier2)
}

/// Load and validate one table document
pub fn load_table_file<P: AsRef<Path>>(path: P, tier: Tier) -> Result<SymbolTable> {
    let path = path.as_ref();
    let table = TableDocument::from_path(path)?.to_table(tier)?;
    log::debug!("{}: {} {} entries", path.display(), table.len(), tier);
    Ok(table)
}
