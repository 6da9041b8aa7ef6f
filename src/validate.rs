//! Validation utilities for lexicon table files
//!
//! Provides batch validation with detailed error reporting. Each `.json` file
//! is checked as a table document:
//! - JSON shape (`mapping` object)
//! - key width and alphabet for its tier
//! - token kinds allowed in the tier (no commands in Tier-2)
//! - Tier-1 only: one key per shift width, at most one HEX_ESCAPE
//! - Tier-2 next to a `map.json`: no key starts with a Tier-1 shift key
//!
//! Non-fatal findings (characters produced by several keys, no HEX_ESCAPE
//! entry) are reported as warnings.
//!
//! # Example
//!
//! ```ignore
//! use ternlex::validate::{validate_directory, ValidationResult};
//!
//! let results = validate_directory("data/ternlex")?;
//! for result in &results {
//!     match result {
//!         ValidationResult::Ok { path, entries, warnings, .. } => {
//!             println!("+ {}: {} entries, {} warnings", path.display(), entries, warnings.len());
//!         }
//!         ValidationResult::Err { path, error } => {
//!             eprintln!("x {}: {}", path.display(), error);
//!         }
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::error::TernlexError;
use crate::loader::{load_table_file, TableDocument, TIER1_FILE, TIER2_FILE};
use crate::table::{CodecTables, SymbolTable, Tier};

/// Result of validating a single table file
#[derive(Debug)]
pub enum ValidationResult {
    /// File parsed into a valid table
    Ok {
        path: PathBuf,
        tier: Tier,
        entries: usize,
        /// Non-fatal findings
        warnings: Vec<String>,
    },
    /// File failed validation
    Err {
        path: PathBuf,
        error: ValidationError,
    },
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Get the path
    pub fn path(&self) -> &Path {
        match self {
            Self::Ok { path, .. } => path,
            Self::Err { path, .. } => path,
        }
    }

    /// Get warnings (empty for Err variant)
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Ok { warnings, .. } => warnings,
            Self::Err { .. } => &[],
        }
    }
}

/// Validation error with context
#[derive(Clone, Debug)]
pub struct ValidationError {
    /// Tier the file was checked as (if known)
    pub tier: Option<Tier>,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tier {
            Some(tier) => write!(f, "{}: {}", tier, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<TernlexError> for ValidationError {
    fn from(e: TernlexError) -> Self {
        let tier = match &e {
            TernlexError::InvalidTable { tier, .. } | TernlexError::InvalidKey { tier, .. } => Some(*tier),
            TernlexError::MissingShift(_) | TernlexError::DuplicateShift(_) => Some(Tier::Tier1),
            _ => None,
        };
        Self { tier, message: e.to_string() }
    }
}

/// Guess the tier of a table file: `tier2_map.json` (or any name containing
/// "tier2") is Tier-2, otherwise the width of the first key decides, defaulting
/// to Tier-1.
pub fn detect_tier(path: &Path, doc: &TableDocument) -> Tier {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if name == TIER2_FILE || name.contains("tier2") {
        return Tier::Tier2;
    }
    doc.mapping
        .keys()
        .next()
        .and_then(|k| Tier::from_width(k.chars().count()))
        .unwrap_or(Tier::Tier1)
}

/// Validate a single table file, detecting its tier.
pub fn validate_file<P: AsRef<Path>>(path: P) -> ValidationResult {
    validate_file_as(path, None)
}

/// Validate a single table file, optionally forcing the tier.
pub fn validate_file_as<P: AsRef<Path>>(path: P, tier: Option<Tier>) -> ValidationResult {
    let path = path.as_ref().to_path_buf();

    let doc = match TableDocument::from_path(&path) {
        Ok(doc) => doc,
        Err(e) => {
            return ValidationResult::Err { path, error: e.into() };
        }
    };
    let tier = tier.unwrap_or_else(|| detect_tier(&path, &doc));

    match check_document(&path, &doc, tier) {
        Ok((entries, warnings)) => ValidationResult::Ok { path, tier, entries, warnings },
        Err(e) => {
            let mut error = ValidationError::from(e);
            error.tier.get_or_insert(tier);
            ValidationResult::Err { path, error }
        }
    }
}

fn check_document(path: &Path, doc: &TableDocument, tier: Tier) -> crate::Result<(usize, Vec<String>)> {
    let table = doc.to_table(tier)?;
    let mut warnings: Vec<String> = table
        .shadowed()
        .iter()
        .map(|(c, key)| {
            format!(
                "{:?} is also produced by {:?}; the encoder uses {:?}",
                c,
                key,
                table.key_for(*c).unwrap_or_default()
            )
        })
        .collect();

    if tier == Tier::Tier1 {
        let tables = CodecTables::new(table, SymbolTable::empty(Tier::Tier2))?;
        if tables.hex_escape_key().is_none() {
            warnings.push("no HEX_ESCAPE entry: characters outside both tiers cannot be encoded".to_string());
        }
        return Ok((tables.tier1().len(), warnings));
    }

    // Tier-2 keys are checked against the shift keys of the Tier-1 file next to it
    let sibling = path.with_file_name(TIER1_FILE);
    if sibling.is_file() {
        match load_table_file(&sibling, Tier::Tier1) {
            Ok(tier1) => {
                let entries = table.len();
                // Tier-1 problems are reported on the Tier-1 file itself
                if let Err(e @ TernlexError::InvalidTable { tier: Tier::Tier2, .. }) = CodecTables::new(tier1, table) {
                    return Err(e);
                }
                return Ok((entries, warnings));
            }
            Err(_) => warnings.push(format!("{} is invalid, shift prefixes not checked", TIER1_FILE)),
        }
    }

    Ok((table.len(), warnings))
}

/// Validate all .json files in a directory (recursive).
pub fn validate_directory<P: AsRef<Path>>(dir: P) -> std::io::Result<Vec<ValidationResult>> {
    let mut results = Vec::new();
    validate_directory_recursive(dir.as_ref(), &mut results)?;

    // Sort by path for consistent output
    results.sort_by(|a, b| a.path().cmp(b.path()));

    Ok(results)
}

fn validate_directory_recursive(dir: &Path, results: &mut Vec<ValidationResult>) -> std::io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            validate_directory_recursive(&path, results)?;
        } else if path.extension().map_or(false, |e| e == "json") {
            results.push(validate_file(&path));
        }
    }

    Ok(())
}

/// Summary of validation results
#[derive(Debug, Default)]
pub struct ValidationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub errors: Vec<(PathBuf, ValidationError)>,
}

impl ValidationSummary {
    /// Create summary from results
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut summary = Self { total: results.len(), ..Self::default() };

        for result in results {
            match result {
                ValidationResult::Ok { warnings, .. } => {
                    summary.passed += 1;
                    summary.warnings += warnings.len();
                }
                ValidationResult::Err { path, error } => {
                    summary.failed += 1;
                    summary.errors.push((path.clone(), error.clone()));
                }
            }
        }

        summary
    }

    /// Print summary to stderr
    pub fn print_report(&self) {
        if !self.errors.is_empty() {
            eprintln!("\n{} TABLE ERRORS:", self.errors.len());
            for (path, error) in &self.errors {
                eprintln!("\n  {}", path.display());
                eprintln!("    {}", error);
            }
            eprintln!();
        }

        eprintln!(
            "Validated {} files: {} passed, {} failed, {} warnings",
            self.total, self.passed, self.failed, self.warnings
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TIER1: &str = r#"{ "mapping": {
        "+-++-=": "SHIFT_6", "+-+=+=": "SHIFT_8", "+-+=+-": "SHIFT_9", "+-+=++": "SHIFT_12",
        "++++++": "HEX_ESCAPE", "----==": " ", "----=-": "0", "+=====": "a"
    } }"#;

    fn json_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_validate_valid_tier1() {
        let file = json_file(TIER1);
        let result = validate_file(file.path());
        assert!(result.is_ok(), "{:?}", result);
        if let ValidationResult::Ok { tier, entries, warnings, .. } = result {
            assert_eq!(tier, Tier::Tier1);
            assert_eq!(entries, 8);
            // " " and "0" both produce a space
            assert_eq!(warnings.len(), 1);
        }
    }

    #[test]
    fn test_validate_missing_shift() {
        let file = json_file(r#"{ "mapping": { "+-++-=": "SHIFT_6", "+=====": "a" } }"#);
        let result = validate_file(file.path());
        assert!(result.is_err());
        if let ValidationResult::Err { error, .. } = result {
            assert_eq!(error.tier, Some(Tier::Tier1));
            assert!(error.message.contains("SHIFT_8"), "{}", error.message);
        }
    }

    #[test]
    fn test_validate_missing_hex_escape_warns() {
        let file = json_file(
            r#"{ "mapping": { "+-++-=": "SHIFT_6", "+-+=+=": "SHIFT_8", "+-+=+-": "SHIFT_9", "+-+=++": "SHIFT_12" } }"#,
        );
        let result = validate_file(file.path());
        assert!(result.is_ok());
        assert!(result.warnings().iter().any(|w| w.contains("HEX_ESCAPE")));
    }

    #[test]
    fn test_validate_detects_tier2_by_width() {
        let file = json_file(r#"{ "mapping": { "++++====": "ж", "++++===-": "д" } }"#);
        let result = validate_file(file.path());
        assert!(result.is_ok());
        if let ValidationResult::Ok { tier, entries, .. } = result {
            assert_eq!(tier, Tier::Tier2);
            assert_eq!(entries, 2);
        }
    }

    #[test]
    fn test_validate_tier2_rejects_commands() {
        let file = json_file(r#"{ "mapping": { "++++====": "SHIFT_6" } }"#);
        let result = validate_file_as(file.path(), Some(Tier::Tier2));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_tier2_key_with_shift_prefix_next_to_tier1() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("map.json"), TIER1).unwrap();
        let tier2 = dir.path().join("tier2_map.json");
        std::fs::write(&tier2, r#"{ "mapping": { "+-++-===": "ж", "++++====": "д" } }"#).unwrap();

        let result = validate_file(&tier2);
        assert!(result.is_err());
        if let ValidationResult::Err { error, .. } = result {
            assert_eq!(error.tier, Some(Tier::Tier2));
            assert!(error.message.contains("SHIFT_6"), "{}", error.message);
        }

        // Same document without a Tier-1 neighbour cannot be cross-checked
        let alone = tempfile::tempdir().unwrap();
        let path = alone.path().join("tier2_map.json");
        std::fs::write(&path, r#"{ "mapping": { "+-++-===": "ж" } }"#).unwrap();
        assert!(validate_file(&path).is_ok());
    }

    #[test]
    fn test_validate_bad_json() {
        let file = json_file("{ not json");
        let result = validate_file(file.path());
        assert!(result.is_err());
        if let ValidationResult::Err { error, .. } = result {
            assert_eq!(error.tier, None);
        }
    }

    #[test]
    fn test_validate_directory_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("map.json"), TIER1).unwrap();
        std::fs::write(dir.path().join("tier2_map.json"), r#"{ "mapping": { "++++====": "ж" } }"#).unwrap();
        std::fs::create_dir(dir.path().join("broken")).unwrap();
        std::fs::write(dir.path().join("broken").join("map.json"), r#"{ "mapping": { "+": "a" } }"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let results = validate_directory(dir.path()).unwrap();
        assert_eq!(results.len(), 3);

        let summary = ValidationSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.warnings, 1);
        assert!(summary.errors[0].0.ends_with("broken/map.json"));
    }
}
