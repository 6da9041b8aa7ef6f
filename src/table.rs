//! Symbol tables - fixed-width trit chunks to tokens
//!
//! Two tiers:
//! - **Tier-1**: 6-trit keys. Holds the common characters plus the command
//!   tokens (`SHIFT_6`, `SHIFT_8`, `SHIFT_9`, `SHIFT_12`, `HEX_ESCAPE`).
//! - **Tier-2**: 8-trit keys. Extended characters only, no commands. May be empty.
//!
//! Tables are built once and never mutated. [`CodecTables`] bundles both tiers
//! with the derived shift index and the hex-escape key, ready to share behind
//! an `Arc`.
//!
//! # Example
//!
//! ```
//! use ternlex::{CodecTables, Mode, Token};
//!
//! let tables = CodecTables::builder()
//!     .tier1("+-++-=", "SHIFT_6")
//!     .tier1("+-+=+=", "SHIFT_8")
//!     .tier1("+-+=+-", "SHIFT_9")
//!     .tier1("+-+=++", "SHIFT_12")
//!     .tier1("----==", " ")
//!     .tier1("+=====", "a")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tables.tier1().get("+=====").unwrap(), &Token::Literal('a'));
//! assert_eq!(tables.shift_key(Mode::Eight), "+-+=+=");
//! assert!(tables.hex_escape_key().is_none());
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::decoder::Mode;
use crate::error::{Result, TernlexError};
use crate::hex::HexNibbleTable;
use crate::trit::Trit;

// =============================================================================
// Tiers
// =============================================================================

/// Which lookup table a key belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// 6-trit keys
    Tier1,
    /// 8-trit keys
    Tier2,
}

impl Tier {
    /// Key width in trits
    pub const fn width(self) -> usize {
        match self {
            Self::Tier1 => 6,
            Self::Tier2 => 8,
        }
    }

    /// Tier whose keys have this width
    pub const fn from_width(width: usize) -> Option<Self> {
        match width {
            6 => Some(Self::Tier1),
            8 => Some(Self::Tier2),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tier1 => write!(f, "Tier-1"),
            Self::Tier2 => write!(f, "Tier-2"),
        }
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// Named control tokens
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    /// `LF` - line feed
    LineFeed,
    /// `HT` - horizontal tab
    Tab,
    /// `CR` - carriage return
    CarriageReturn,
    /// `" "` - the dedicated space token
    Space,
    /// `"0"` - alternate space token
    AltSpace,
}

impl Control {
    /// Parse a control token name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LF" => Some(Self::LineFeed),
            "HT" => Some(Self::Tab),
            "CR" => Some(Self::CarriageReturn),
            " " => Some(Self::Space),
            "0" => Some(Self::AltSpace),
            _ => None,
        }
    }

    /// Token name as written in a table document
    pub const fn name(self) -> &'static str {
        match self {
            Self::LineFeed => "LF",
            Self::Tab => "HT",
            Self::CarriageReturn => "CR",
            Self::Space => " ",
            Self::AltSpace => "0",
        }
    }

    /// Character produced on decode
    pub const fn as_char(self) -> char {
        match self {
            Self::LineFeed => '\n',
            Self::Tab => '\t',
            Self::CarriageReturn => '\r',
            Self::Space | Self::AltSpace => ' ',
        }
    }
}

/// Value side of a table entry
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// A single character
    Literal(char),
    /// A multi-character string (decode only, never chosen by the encoder)
    Text(String),
    /// A named control character
    Control(Control),
    /// Switch the decoder to another chunk width (Tier-1 only)
    Shift(Mode),
    /// Start of a hex escape (Tier-1 only)
    HexEscape,
}

impl Token {
    /// Classify a token string from a table document.
    ///
    /// Control names win over literals, so `"0"` is the alternate space token,
    /// not the digit zero.
    pub fn parse(s: &str) -> Self {
        match s {
            "SHIFT_6" => return Self::Shift(Mode::Six),
            "SHIFT_8" => return Self::Shift(Mode::Eight),
            "SHIFT_9" => return Self::Shift(Mode::Nine),
            "SHIFT_12" => return Self::Shift(Mode::Twelve),
            "HEX_ESCAPE" => return Self::HexEscape,
            _ => {}
        }
        if let Some(control) = Control::from_name(s) {
            return Self::Control(control);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::Literal(c),
            _ => Self::Text(s.to_string()),
        }
    }

    /// Token string as written in a table document
    pub fn name(&self) -> String {
        match self {
            Self::Literal(c) => c.to_string(),
            Self::Text(s) => s.clone(),
            Self::Control(c) => c.name().to_string(),
            Self::Shift(mode) => format!("SHIFT_{}", mode.width()),
            Self::HexEscape => "HEX_ESCAPE".to_string(),
        }
    }

    /// Is this a mode command rather than output?
    pub fn is_command(&self) -> bool {
        matches!(self, Self::Shift(_) | Self::HexEscape)
    }

    /// The single character this token decodes to, if any
    pub fn produces(&self) -> Option<char> {
        match self {
            Self::Literal(c) => Some(*c),
            Self::Control(c) => Some(c.as_char()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.name())
    }
}

// =============================================================================
// Symbol Table
// =============================================================================

/// One tier: key -> token, plus the character -> key reverse index.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    tier: Tier,
    forward: HashMap<String, Token>,
    reverse: HashMap<char, String>,
    /// Keys whose character is already claimed by another key
    shadowed: Vec<(char, String)>,
}

impl SymbolTable {
    /// An empty table (the absent Tier-2)
    pub fn empty(tier: Tier) -> Self {
        Self {
            tier,
            forward: HashMap::new(),
            reverse: HashMap::new(),
            shadowed: Vec::new(),
        }
    }

    /// Build a table from a document `mapping` (key -> token string).
    pub fn from_mapping(tier: Tier, mapping: &BTreeMap<String, String>) -> Result<Self> {
        Self::from_entries(
            tier,
            mapping.iter().map(|(k, v)| (k.clone(), Token::parse(v))),
        )
    }

    /// Build a table from parsed entries, validating every key and token.
    pub fn from_entries<I>(tier: Tier, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Token)>,
    {
        let mut forward = HashMap::new();
        for (key, token) in entries {
            validate_key(tier, &key)?;
            if tier == Tier::Tier2 && token.is_command() {
                return Err(TernlexError::InvalidTable {
                    tier,
                    message: format!("key {:?} maps to command {}", key, token),
                });
            }
            if matches!(&token, Token::Text(s) if s.is_empty()) {
                return Err(TernlexError::InvalidTable {
                    tier,
                    message: format!("key {:?} maps to an empty token", key),
                });
            }
            if forward.insert(key.clone(), token).is_some() {
                return Err(TernlexError::InvalidTable {
                    tier,
                    message: format!("duplicate key {:?}", key),
                });
            }
        }

        let (reverse, shadowed) = build_reverse(&forward);
        for (c, key) in &shadowed {
            log::warn!(
                "{} key {:?} also produces {:?}; encoder uses {:?}",
                tier,
                key,
                c,
                reverse.get(c).map(String::as_str).unwrap_or_default()
            );
        }

        Ok(Self { tier, forward, reverse, shadowed })
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Key width in trits
    pub fn width(&self) -> usize {
        self.tier.width()
    }

    /// Token for a chunk
    pub fn get(&self, chunk: &str) -> Option<&Token> {
        self.forward.get(chunk)
    }

    /// Key the encoder uses for a character
    pub fn key_for(&self, c: char) -> Option<&str> {
        self.reverse.get(&c).map(String::as_str)
    }

    /// First key mapping to a token (keys scanned in sorted order)
    pub fn key_of(&self, token: &Token) -> Option<&str> {
        self.sorted_entries()
            .into_iter()
            .find(|(_, t)| *t == token)
            .map(|(k, _)| k)
    }

    /// Characters that more than one key produces, with the unused key
    pub fn shadowed(&self) -> &[(char, String)] {
        &self.shadowed
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Entries sorted by key
    pub fn sorted_entries(&self) -> Vec<(&str, &Token)> {
        let mut entries: Vec<_> = self.forward.iter().map(|(k, t)| (k.as_str(), t)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

fn validate_key(tier: Tier, key: &str) -> Result<()> {
    let len = key.chars().count();
    if len != tier.width() {
        return Err(TernlexError::InvalidKey {
            tier,
            key: key.to_string(),
            reason: format!("expected {} symbols, found {}", tier.width(), len),
        });
    }
    if let Some(bad) = key.chars().find(|c| !Trit::is_symbol(*c)) {
        return Err(TernlexError::InvalidKey {
            tier,
            key: key.to_string(),
            reason: format!("{:?} is not one of '-', '=', '+'", bad),
        });
    }
    Ok(())
}

/// Character -> key. Lowest key wins, except the dedicated space token beats `"0"`.
fn build_reverse(forward: &HashMap<String, Token>) -> (HashMap<char, String>, Vec<(char, String)>) {
    let mut candidates: Vec<(u8, &String, char)> = forward
        .iter()
        .filter_map(|(key, token)| {
            let rank = match token {
                Token::Control(Control::AltSpace) => 1,
                _ => 0,
            };
            token.produces().map(|c| (rank, key, c))
        })
        .collect();
    candidates.sort();

    let mut reverse = HashMap::with_capacity(candidates.len());
    let mut shadowed = Vec::new();
    for (_, key, c) in candidates {
        if reverse.contains_key(&c) {
            shadowed.push((c, key.clone()));
        } else {
            reverse.insert(c, key.clone());
        }
    }
    (reverse, shadowed)
}

// =============================================================================
// Codec Tables
// =============================================================================

/// Everything the encoder and decoder read. Immutable once built.
#[derive(Clone, Debug)]
pub struct CodecTables {
    tier1: SymbolTable,
    tier2: SymbolTable,
    /// Tier-1 key for each mode, indexed by `Mode::index()`
    shift_keys: [String; 4],
    /// Tier-1 shift key -> target mode
    shift_targets: HashMap<String, Mode>,
    hex_escape: Option<String>,
    nibbles: HexNibbleTable,
}

impl CodecTables {
    /// Combine two tiers, deriving the shift index and the hex-escape key.
    ///
    /// Tier-1 must contain exactly one key per shift width and at most one
    /// HEX_ESCAPE key.
    pub fn new(tier1: SymbolTable, tier2: SymbolTable) -> Result<Self> {
        if tier1.tier() != Tier::Tier1 || tier2.tier() != Tier::Tier2 {
            return Err(TernlexError::InvalidArgument(format!(
                "expected (Tier-1, Tier-2) tables, got ({}, {})",
                tier1.tier(),
                tier2.tier()
            )));
        }

        let mut by_mode: [Option<String>; 4] = Default::default();
        let mut hex_escape = None;
        for (key, token) in tier1.sorted_entries() {
            match token {
                Token::Shift(mode) => {
                    let slot = &mut by_mode[mode.index()];
                    if slot.is_some() {
                        return Err(TernlexError::DuplicateShift(mode.width()));
                    }
                    *slot = Some(key.to_string());
                }
                Token::HexEscape => {
                    if hex_escape.is_some() {
                        return Err(TernlexError::InvalidTable {
                            tier: Tier::Tier1,
                            message: "more than one HEX_ESCAPE entry".to_string(),
                        });
                    }
                    hex_escape = Some(key.to_string());
                }
                _ => {}
            }
        }

        let mut shift_keys: [String; 4] = Default::default();
        let mut shift_targets = HashMap::with_capacity(4);
        for mode in Mode::ALL {
            let key = by_mode[mode.index()]
                .take()
                .ok_or(TernlexError::MissingShift(mode.width()))?;
            shift_targets.insert(key.clone(), mode);
            shift_keys[mode.index()] = key;
        }

        // Outside width 6 the decoder probes for a shift before every chunk,
        // so a Tier-2 key must not start with a shift key
        if let Some((key, mode)) = tier2
            .sorted_entries()
            .into_iter()
            .find_map(|(key, _)| shift_prefix(key).and_then(|p| shift_targets.get(p)).map(|m| (key, *m)))
        {
            return Err(TernlexError::InvalidTable {
                tier: Tier::Tier2,
                message: format!("key {:?} starts with the SHIFT_{} key and cannot be decoded", key, mode.width()),
            });
        }

        if hex_escape.is_none() {
            log::warn!("Tier-1 has no HEX_ESCAPE entry; characters outside both tiers cannot be encoded");
        }
        log::debug!(
            "Codec tables ready: {} Tier-1 entries, {} Tier-2 entries",
            tier1.len(),
            tier2.len()
        );

        Ok(Self {
            tier1,
            tier2,
            shift_keys,
            shift_targets,
            hex_escape,
            nibbles: HexNibbleTable::standard(),
        })
    }

    /// Start building tables in code
    pub fn builder() -> TablesBuilder {
        TablesBuilder::default()
    }

    /// Replace the hex nibble table
    pub fn with_nibbles(mut self, nibbles: HexNibbleTable) -> Self {
        self.nibbles = nibbles;
        self
    }

    pub fn tier1(&self) -> &SymbolTable {
        &self.tier1
    }

    pub fn tier2(&self) -> &SymbolTable {
        &self.tier2
    }

    /// Tier-1 key that shifts into `mode`
    pub fn shift_key(&self, mode: Mode) -> &str {
        &self.shift_keys[mode.index()]
    }

    /// Target mode if `chunk` is a shift key
    pub fn shift_target(&self, chunk: &str) -> Option<Mode> {
        self.shift_targets.get(chunk).copied()
    }

    /// Tier-1 key for HEX_ESCAPE, if configured
    pub fn hex_escape_key(&self) -> Option<&str> {
        self.hex_escape.as_deref()
    }

    pub fn nibbles(&self) -> &HexNibbleTable {
        &self.nibbles
    }
}

/// Leading probe-width slice of a key
fn shift_prefix(key: &str) -> Option<&str> {
    key.char_indices().nth(Mode::PROBE_WIDTH).map(|(i, _)| &key[..i])
}

/// Builder for [`CodecTables`], taking tokens in document form.
#[derive(Debug, Default)]
pub struct TablesBuilder {
    tier1: Vec<(String, Token)>,
    tier2: Vec<(String, Token)>,
    nibbles: Option<HexNibbleTable>,
}

impl TablesBuilder {
    /// Add a Tier-1 entry (token string as in a table document)
    pub fn tier1(mut self, key: &str, token: &str) -> Self {
        self.tier1.push((key.to_string(), Token::parse(token)));
        self
    }

    /// Add a Tier-2 entry
    pub fn tier2(mut self, key: &str, token: &str) -> Self {
        self.tier2.push((key.to_string(), Token::parse(token)));
        self
    }

    pub fn nibbles(mut self, nibbles: HexNibbleTable) -> Self {
        self.nibbles = Some(nibbles);
        self
    }

    pub fn build(self) -> Result<CodecTables> {
        let tier1 = SymbolTable::from_entries(Tier::Tier1, self.tier1)?;
        let tier2 = SymbolTable::from_entries(Tier::Tier2, self.tier2)?;
        let tables = CodecTables::new(tier1, tier2)?;
        Ok(match self.nibbles {
            Some(nibbles) => tables.with_nibbles(nibbles),
            None => tables,
        })
    }
}
