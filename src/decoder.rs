//! Decoder - mode-shift state machine over a demodulated trit stream
//!
//! ## State machine
//!
//! ```text
//!            SHIFT_8              SHIFT_9 / SHIFT_12
//!   [6] -------------> [8]  ...  [9] [12]   (no tables yet)
//!    ^                  |
//!    +----- SHIFT_6 ----+
//! ```
//!
//! - Width 6 reads Tier-1. Shift tokens change the width, HEX_ESCAPE hands
//!   control to the hex sub-codec for one code point.
//! - In any other width, every step first probes the next 6 trits for a shift key.
//! - Width 8 reads Tier-2. Widths 9 and 12 are reserved and emit
//!   [`DecodedUnit::Unimplemented`].
//!
//! Decoding never fails. Every chunk that cannot be resolved becomes a
//! diagnostic unit in the output, so a damaged stream still shows everything
//! that arrived.
//!
//! # Example
//!
//! ```ignore
//! use ternlex::{Decoder, DecodedUnit};
//!
//! let decoded = Decoder::new(&tables).decode("+-=+=-...");
//! println!("{}", decoded);                 // rendered text with [..] markers
//! let problems = decoded.diagnostics().count();
//! ```

use crate::hex::HexNibbleTable;
use crate::modulation;
use crate::table::{CodecTables, Tier, Token};
use crate::trit::Trit;

// =============================================================================
// Mode
// =============================================================================

/// Active chunk width
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// 6-trit chunks, Tier-1
    #[default]
    Six,
    /// 8-trit chunks, Tier-2
    Eight,
    /// 9-trit chunks, reserved
    Nine,
    /// 12-trit chunks, reserved
    Twelve,
}

impl Mode {
    /// Every mode, in width order
    pub const ALL: [Mode; 4] = [Mode::Six, Mode::Eight, Mode::Nine, Mode::Twelve];

    /// Width of the shift probe (shift keys are Tier-1 keys)
    pub const PROBE_WIDTH: usize = 6;

    /// Chunk width in trits
    pub const fn width(self) -> usize {
        match self {
            Self::Six => 6,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Twelve => 12,
        }
    }

    pub const fn from_width(width: usize) -> Option<Self> {
        match width {
            6 => Some(Self::Six),
            8 => Some(Self::Eight),
            9 => Some(Self::Nine),
            12 => Some(Self::Twelve),
            _ => None,
        }
    }

    /// Dense index 0..4
    pub const fn index(self) -> usize {
        match self {
            Self::Six => 0,
            Self::Eight => 1,
            Self::Nine => 2,
            Self::Twelve => 3,
        }
    }

    /// Table read in this mode, None for reserved widths
    pub const fn tier(self) -> Option<Tier> {
        match self {
            Self::Six => Some(Tier::Tier1),
            Self::Eight => Some(Tier::Tier2),
            Self::Nine | Self::Twelve => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.width())
    }
}

// =============================================================================
// Decoded Units
// =============================================================================

/// One element of decoder output: text, or a diagnostic that kept the raw trits.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DecodedUnit {
    /// A table character (literal or control)
    Literal(char),
    /// A multi-character table token
    Text(String),
    /// A character recovered from a hex escape
    Escaped(char),
    /// Chunk missing from the active tier
    Unknown(String),
    /// Chunk read in a width with no table (9 or 12)
    Unimplemented { width: usize, chunk: String },
    /// Hex escape hit a group that is neither a digit nor the terminator
    MalformedEscape(String),
    /// Stream ended inside a hex escape
    TruncatedEscape(String),
    /// Hex escape value is not a Unicode scalar value (hex digits kept)
    InvalidCodepoint(String),
    /// Leftover trits shorter than one chunk
    Trailing(String),
}

impl DecodedUnit {
    /// Is this a diagnostic rather than decoded text?
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, Self::Literal(_) | Self::Text(_) | Self::Escaped(_))
    }

    /// Append the rendered form to `out`.
    ///
    /// Diagnostics render in brackets: `[chunk]`, `[T9:chunk]`, `[HEX_ERR]`,
    /// `[HEX_TRUNC]`, `[U+XXXX?]`.
    pub fn render_into(&self, out: &mut String) {
        use std::fmt::Write;
        // Writing to a String cannot fail
        let _ = match self {
            Self::Literal(c) | Self::Escaped(c) => {
                out.push(*c);
                Ok(())
            }
            Self::Text(s) => {
                out.push_str(s);
                Ok(())
            }
            Self::Unknown(chunk) | Self::Trailing(chunk) => write!(out, "[{}]", chunk),
            Self::Unimplemented { width, chunk } => write!(out, "[T{}:{}]", width, chunk),
            Self::MalformedEscape(_) => write!(out, "[HEX_ERR]"),
            Self::TruncatedEscape(_) => write!(out, "[HEX_TRUNC]"),
            Self::InvalidCodepoint(hex) => {
                let digits = hex.trim_start_matches('0');
                let digits = if digits.is_empty() { "0" } else { digits };
                write!(out, "[U+{:0>4}?]", digits)
            }
        };
    }
}

impl std::fmt::Display for DecodedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        self.render_into(&mut s);
        f.write_str(&s)
    }
}

/// Render a unit sequence to text
pub fn render_units(units: &[DecodedUnit]) -> String {
    let mut out = String::new();
    for unit in units {
        unit.render_into(&mut out);
    }
    out
}

/// Result of decoding one stream
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    pub units: Vec<DecodedUnit>,
    /// Mode the machine was in when input ran out
    pub final_mode: Mode,
}

impl Decoded {
    /// Rendered text, diagnostics in brackets
    pub fn text(&self) -> String {
        render_units(&self.units)
    }

    /// Iterate over diagnostic units only
    pub fn diagnostics(&self) -> impl Iterator<Item = &DecodedUnit> {
        self.units.iter().filter(|u| u.is_diagnostic())
    }

    /// True when every unit is text
    pub fn is_clean(&self) -> bool {
        self.diagnostics().next().is_none()
    }
}

impl std::fmt::Display for Decoded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

// =============================================================================
// Decoder
// =============================================================================

/// Decode options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Remove the carriers before decoding (default true)
    pub demodulate: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { demodulate: true }
    }
}

/// Stream decoder bound to a set of tables
#[derive(Clone, Copy, Debug)]
pub struct Decoder<'t> {
    tables: &'t CodecTables,
    options: DecodeOptions,
}

impl<'t> Decoder<'t> {
    pub fn new(tables: &'t CodecTables) -> Self {
        Self { tables, options: DecodeOptions::default() }
    }

    pub fn with_options(tables: &'t CodecTables, options: DecodeOptions) -> Self {
        Self { tables, options }
    }

    /// Enable or disable demodulation
    pub fn demodulate(mut self, enabled: bool) -> Self {
        self.options.demodulate = enabled;
        self
    }

    /// Decode a received stream.
    ///
    /// Whitespace is removed first. With demodulation on, every other
    /// non-alphabet character is dropped as well.
    pub fn decode(&self, stream: &str) -> Decoded {
        let compact: String = stream.split_whitespace().collect();
        let content: Vec<char> = if self.options.demodulate {
            modulation::demodulate(&compact).chars().collect()
        } else {
            compact.chars().collect()
        };
        decode_trits(&content, self.tables)
    }

    /// Decode and render to text in one step
    pub fn decode_to_string(&self, stream: &str) -> String {
        self.decode(stream).text()
    }
}

/// Run the mode-shift state machine over an already demodulated stream.
pub fn decode_trits(content: &[char], tables: &CodecTables) -> Decoded {
    let nibbles: &HexNibbleTable = tables.nibbles();
    let len = content.len();
    let mut units = Vec::new();
    let mut mode = Mode::Six;
    let mut pos = 0;

    while pos < len {
        // Outside width 6, look for a 6-trit shift key before every chunk
        if mode != Mode::Six && pos + Mode::PROBE_WIDTH <= len {
            let probe = chunk_at(content, pos, Mode::PROBE_WIDTH);
            if let Some(target) = tables.shift_target(&probe) {
                log::trace!("shift {} -> {} at {}", mode, target, pos);
                mode = target;
                pos += Mode::PROBE_WIDTH;
                continue;
            }
        }

        let width = mode.width();
        if pos + width > len {
            break;
        }
        let chunk = chunk_at(content, pos, width);
        pos += width;

        match mode {
            Mode::Six => match tables.tier1().get(&chunk) {
                None => units.push(DecodedUnit::Unknown(chunk)),
                Some(Token::Shift(target)) => {
                    log::trace!("shift {} -> {} at {}", mode, target, pos - width);
                    mode = *target;
                }
                Some(Token::HexEscape) => {
                    let (unit, next) = nibbles.decode(content, pos);
                    units.extend(unit);
                    pos = next;
                }
                Some(token) => push_token(&mut units, token, chunk),
            },
            Mode::Eight => match tables.tier2().get(&chunk) {
                Some(token) => push_token(&mut units, token, chunk),
                None => units.push(DecodedUnit::Unknown(chunk)),
            },
            Mode::Nine | Mode::Twelve => {
                units.push(DecodedUnit::Unimplemented { width, chunk });
            }
        }
    }

    if pos < len {
        let tail: String = content[pos..].iter().collect();
        if tail.chars().all(Trit::is_symbol) {
            units.push(DecodedUnit::Trailing(tail));
        } else {
            log::debug!("Dropping {} trailing non-trit characters", tail.chars().count());
        }
    }

    let diagnostics = units.iter().filter(|u| u.is_diagnostic()).count();
    if diagnostics > 0 {
        log::debug!("Decoded {} units with {} diagnostics", units.len(), diagnostics);
    }

    Decoded { units, final_mode: mode }
}

fn chunk_at(content: &[char], pos: usize, width: usize) -> String {
    content[pos..pos + width].iter().collect()
}

fn push_token(units: &mut Vec<DecodedUnit>, token: &Token, chunk: String) {
    match token {
        Token::Literal(c) => units.push(DecodedUnit::Literal(*c)),
        Token::Control(c) => units.push(DecodedUnit::Literal(c.as_char())),
        Token::Text(s) => units.push(DecodedUnit::Text(s.clone())),
        // Commands are only meaningful in Tier-1 width 6, handled by the caller
        Token::Shift(_) | Token::HexEscape => units.push(DecodedUnit::Unknown(chunk)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::sample_tables;

    fn raw(tables: &CodecTables, stream: &str) -> Decoded {
        Decoder::new(tables).demodulate(false).decode(stream)
    }

    #[test]
    fn test_mode_widths() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_width(mode.width()), Some(mode));
            assert_eq!(Mode::ALL[mode.index()], mode);
        }
        assert_eq!(Mode::from_width(7), None);
        assert_eq!(Mode::Eight.tier(), Some(Tier::Tier2));
        assert_eq!(Mode::Nine.tier(), None);
    }

    #[test]
    fn test_decode_tier1_literals_and_controls() {
        let tables = sample_tables();
        // H i space ! LF
        let decoded = raw(&tables, "+===-= +===+= ----== +===-- ----=+");
        assert_eq!(decoded.text(), "Hi !\n");
        assert!(decoded.is_clean());
        assert_eq!(decoded.final_mode, Mode::Six);
    }

    #[test]
    fn test_alt_space_decodes_to_space() {
        let tables = sample_tables();
        assert_eq!(raw(&tables, "----=-").text(), " ");
        assert_eq!(raw(&tables, "----+-----++").text(), "\t\r");
    }

    #[test]
    fn test_text_token() {
        let tables = sample_tables();
        let decoded = raw(&tables, "+==-==----==+=====");
        assert_eq!(decoded.text(), "the a");
        assert_eq!(decoded.units[0], DecodedUnit::Text("the".to_string()));
    }

    #[test]
    fn test_unknown_chunk_then_resume() {
        let tables = sample_tables();
        let decoded = raw(&tables, "------+=====");
        assert_eq!(
            decoded.units,
            vec![DecodedUnit::Unknown("------".to_string()), DecodedUnit::Literal('a')]
        );
        assert_eq!(decoded.text(), "[------]a");
    }

    #[test]
    fn test_shift_to_tier2_and_back() {
        let tables = sample_tables();
        // SHIFT_8 д а SHIFT_6 a
        let stream = "+-+=+= ++++==== ++++===- +-++-= +=====";
        let decoded = raw(&tables, stream);
        assert_eq!(decoded.text(), "даa");
        assert_eq!(decoded.final_mode, Mode::Six);
    }

    #[test]
    fn test_tier2_control_and_unknown() {
        let tables = sample_tables();
        let decoded = raw(&tables, "+-+=+= ----==== -------- +-++-=");
        assert_eq!(
            decoded.units,
            vec![DecodedUnit::Literal('\n'), DecodedUnit::Unknown("--------".to_string())]
        );
    }

    #[test]
    fn test_shift_probe_before_chunk_in_mode8() {
        let tables = sample_tables();
        // In mode 8, the 6-trit SHIFT_6 key is recognized even though 8 trits remain
        let decoded = raw(&tables, "+-+=+= +-++-= +=");
        assert_eq!(decoded.final_mode, Mode::Six);
        assert_eq!(decoded.units, vec![DecodedUnit::Trailing("+=".to_string())]);
    }

    #[test]
    fn test_reserved_widths() {
        let tables = sample_tables();
        let decoded = raw(&tables, "+-+=+- +++===--- +-+=++ ============ +-++-=");
        assert_eq!(
            decoded.units,
            vec![
                DecodedUnit::Unimplemented { width: 9, chunk: "+++===---".to_string() },
                DecodedUnit::Unimplemented { width: 12, chunk: "============".to_string() },
            ]
        );
        assert_eq!(decoded.text(), "[T9:+++===---][T12:============]");
        assert_eq!(decoded.final_mode, Mode::Six);
    }

    #[test]
    fn test_hex_escape_in_stream() {
        let tables = sample_tables();
        // HEX_ESCAPE "4" "1" END, then a
        let decoded = raw(&tables, "++++++ +== ++= =-= +=====");
        assert_eq!(decoded.units, vec![DecodedUnit::Escaped('A'), DecodedUnit::Literal('a')]);
    }

    #[test]
    fn test_empty_hex_escape_produces_nothing() {
        let tables = sample_tables();
        let decoded = raw(&tables, "++++++ =-= +=====");
        assert_eq!(decoded.units, vec![DecodedUnit::Literal('a')]);
    }

    #[test]
    fn test_malformed_hex_escape_resumes() {
        let tables = sample_tables();
        // "4" then "---" (not a nibble); decoding resumes right after it
        let decoded = raw(&tables, "++++++ +== --- +=====");
        assert_eq!(
            decoded.units,
            vec![DecodedUnit::MalformedEscape("+==---".to_string()), DecodedUnit::Literal('a')]
        );
        assert_eq!(decoded.text(), "[HEX_ERR]a");
    }

    #[test]
    fn test_truncated_hex_escape_consumes_rest() {
        let tables = sample_tables();
        let decoded = raw(&tables, "+===== ++++++ +== ++= +-");
        assert_eq!(
            decoded.units,
            vec![
                DecodedUnit::Literal('a'),
                DecodedUnit::TruncatedEscape("+==++=+-".to_string()),
            ]
        );
        assert_eq!(decoded.text(), "a[HEX_TRUNC]");
    }

    #[test]
    fn test_invalid_codepoint_placeholder() {
        let tables = sample_tables();
        // D800 is a surrogate
        let decoded = raw(&tables, "++++++ === +-- +++ +++ =-=");
        assert_eq!(decoded.text(), "[U+D800?]");
    }

    #[test]
    fn test_invalid_codepoint_pads_short_hex() {
        assert_eq!(DecodedUnit::InvalidCodepoint("D8".to_string()).to_string(), "[U+00D8?]");
    }

    #[test]
    fn test_invalid_codepoint_drops_leading_zero_nibbles() {
        let tables = sample_tables();
        // 0 0 1 1 0 0 0 0 END: one past the last code point
        let decoded = raw(&tables, "++++++ +++ +++ ++= ++= +++ +++ +++ +++ =-=");
        assert_eq!(decoded.units, vec![DecodedUnit::InvalidCodepoint("00110000".to_string())]);
        assert_eq!(decoded.text(), "[U+110000?]");
        assert_eq!(DecodedUnit::InvalidCodepoint("0000D800".to_string()).to_string(), "[U+D800?]");
    }

    #[test]
    fn test_trailing_partial_chunk() {
        let tables = sample_tables();
        let decoded = raw(&tables, "+===== +====- +=-");
        assert_eq!(
            decoded.units,
            vec![
                DecodedUnit::Literal('a'),
                DecodedUnit::Literal('b'),
                DecodedUnit::Trailing("+=-".to_string()),
            ]
        );
        assert_eq!(decoded.diagnostics().count(), 1);
    }

    #[test]
    fn test_trailing_non_trits_dropped() {
        let tables = sample_tables();
        let decoded = raw(&tables, "+=====ab");
        assert_eq!(decoded.units, vec![DecodedUnit::Literal('a')]);
    }

    #[test]
    fn test_empty_stream() {
        let tables = sample_tables();
        let decoded = Decoder::new(&tables).decode("  \n ");
        assert!(decoded.units.is_empty());
        assert_eq!(decoded.final_mode, Mode::Six);
    }

    #[test]
    fn test_demodulated_decode() {
        let tables = sample_tables();
        let modulated = modulation::modulate("+===-=+===+=");
        assert_eq!(Decoder::new(&tables).decode_to_string(&modulated), "Hi");
        // Line breaks inside the transmitted stream are ignored
        let wrapped = format!("{}\n{}", &modulated[..5], &modulated[5..]);
        assert_eq!(Decoder::new(&tables).decode_to_string(&wrapped), "Hi");
    }

    #[test]
    fn test_unit_serde_shape() {
        let unit = DecodedUnit::Unknown("------".to_string());
        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(json, r#"{"kind":"unknown","value":"------"}"#);
        let back: DecodedUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, unit);
    }
}
