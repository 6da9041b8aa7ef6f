//! Codec - shared tables plus the two total entry points
//!
//! [`Codec`] is cheap to clone (the tables sit behind an `Arc`) and safe to use
//! from many threads at once: every call keeps its mode and position local.

use std::path::Path;
use std::sync::Arc;

use crate::decoder::{Decoded, DecodeOptions, Decoder};
use crate::encoder::{EncodeOptions, Encoder};
use crate::error::Result;
use crate::loader::TableLoader;
use crate::table::CodecTables;

/// Encoder + decoder over one immutable table set
#[derive(Clone, Debug)]
pub struct Codec {
    tables: Arc<CodecTables>,
}

impl Codec {
    pub fn new(tables: CodecTables) -> Self {
        Self { tables: Arc::new(tables) }
    }

    pub fn from_arc(tables: Arc<CodecTables>) -> Self {
        Self { tables }
    }

    /// Load `map.json` and the optional `tier2_map.json` from a directory
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        TableLoader::load_dir(dir).map(Self::new)
    }

    /// Load from the configured data directory
    pub fn load_default() -> Result<Self> {
        TableLoader::load_default().map(Self::new)
    }

    pub fn tables(&self) -> &CodecTables {
        &self.tables
    }

    /// Encode and modulate text
    pub fn encode(&self, text: &str) -> Result<String> {
        Encoder::new(&self.tables).encode(text)
    }

    pub fn encode_with(&self, text: &str, options: EncodeOptions) -> Result<String> {
        Encoder::with_options(&self.tables, options).encode(text)
    }

    /// Demodulate and decode a stream to text. Never fails; problems show up
    /// as bracketed markers.
    pub fn decode(&self, payload: &str) -> String {
        self.decode_units(payload, DecodeOptions::default()).text()
    }

    /// Decode keeping the typed units
    pub fn decode_units(&self, payload: &str, options: DecodeOptions) -> Decoded {
        Decoder::with_options(&self.tables, options).decode(payload)
    }
}

impl From<CodecTables> for Codec {
    fn from(tables: CodecTables) -> Self {
        Self::new(tables)
    }
}
