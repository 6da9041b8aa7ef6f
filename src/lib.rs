//! # Ternlex - Balanced Ternary Lexicon Codec
//!
//! Converts Unicode text to a stream of trits (`-`, `=`, `+`) and back, for
//! channels that carry nothing but those three symbols.
//!
//! ## Core Components
//!
//! - **Trit**: The channel unit, {-1, 0, +1}
//! - **Modulation**: Fixed per-position whitening (period 12), fully reversible
//! - **Symbol Tables**: Tier-1 (6-trit keys) and Tier-2 (8-trit keys) lexicons
//! - **Mode-Shift Decoder**: State machine switching chunk width on SHIFT tokens
//! - **Hex Escape**: Any code point outside the tables as 3-trit hex nibbles
//!
//! ## Design Principles
//!
//! - **Tables are data**: Loaded once, immutable, passed in explicitly
//! - **Decode never fails**: Damaged input becomes typed diagnostic units
//! - **Encode is lossless**: Every valid code point round-trips
//!
//! ## Example
//!
//! ```ignore
//! use ternlex::Codec;
//!
//! // data/ternlex/map.json + optional tier2_map.json
//! let codec = Codec::load_dir("data/ternlex")?;
//!
//! let stream = codec.encode("Привет, world 😀")?;
//! assert_eq!(codec.decode(&stream), "Привет, world 😀");
//! ```

// Trit - the channel alphabet
pub mod trit;
pub use trit::{Trit, ALPHABET};

// Modulation - reversible carrier whitening
pub mod modulation;
pub use modulation::{modulate, demodulate};

// Lexicon tables
pub mod table;
pub use table::{CodecTables, Control, SymbolTable, TablesBuilder, Tier, Token};

// Hex escape sub-codec
pub mod hex;
pub use hex::HexNibbleTable;

// Encoder / decoder
pub mod encoder;
pub use encoder::{EncodeOptions, Encoder};

pub mod decoder;
pub use decoder::{decode_trits, render_units, Decoded, DecodeOptions, DecodedUnit, Decoder, Mode};

pub mod codec;
pub use codec::Codec;

// Error types
mod error;
pub use error::{Result, TernlexError};

// Table loader - clean API for loading map.json / tier2_map.json
pub mod loader;
pub use loader::{load_path, load_string, TableDocument, TableLoader};

// Validation utilities
pub mod validate;
pub use validate::{validate_directory, validate_file, ValidationError, ValidationResult, ValidationSummary};

// HTTP relay
#[cfg(feature = "relay")]
pub mod relay;
