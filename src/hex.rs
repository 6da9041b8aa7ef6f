//! Hex escape - lossless fallback for code points outside the tables
//!
//! A code point is written as its uppercase hexadecimal digits, most significant
//! first, one 3-trit group per digit, followed by a reserved terminator group:
//!
//! ```text
//! U+0041  ->  "4" "1" END  ->  +==  ++=  =-=
//! ```
//!
//! 16 digit groups plus the terminator use 17 of the 27 possible 3-trit groups.

use std::collections::HashMap;

use crate::decoder::DecodedUnit;
use crate::error::{Result, TernlexError};
use crate::trit::is_trit_str;

/// Width of one nibble group in trits
pub const NIBBLE_WIDTH: usize = 3;

/// Standard digit groups, indexed by hex digit value 0x0..=0xF
pub const STANDARD_NIBBLES: [&str; 16] = [
    "+++", "++=", "++-", "+=+", // 0 1 2 3
    "+==", "+=-", "+-+", "+-=", // 4 5 6 7
    "+--", "=++", "=+=", "=+-", // 8 9 A B
    "==+", "===", "==-", "=-+", // C D E F
];

/// Standard terminator group
pub const STANDARD_TERMINATOR: &str = "=-=";

/// Bijection between hex digits and 3-trit groups, plus the terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexNibbleTable {
    digits: [String; 16],
    terminator: String,
    lookup: HashMap<String, u8>,
}

impl HexNibbleTable {
    /// Build a nibble table. All 17 groups must be distinct 3-symbol strings.
    pub fn new(digits: [&str; 16], terminator: &str) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(16);
        for group in digits.iter().chain(std::iter::once(&terminator)) {
            if group.chars().count() != NIBBLE_WIDTH || !is_trit_str(group) {
                return Err(TernlexError::InvalidNibbleTable(format!(
                    "group {:?} is not {} alphabet symbols",
                    group, NIBBLE_WIDTH
                )));
            }
        }
        for (value, group) in digits.iter().enumerate() {
            if *group == terminator || lookup.insert(group.to_string(), value as u8).is_some() {
                return Err(TernlexError::InvalidNibbleTable(format!(
                    "group {:?} is used more than once",
                    group
                )));
            }
        }

        Ok(Self {
            digits: digits.map(str::to_string),
            terminator: terminator.to_string(),
            lookup,
        })
    }

    /// The standard nibble table used on the wire
    pub fn standard() -> Self {
        let lookup = STANDARD_NIBBLES
            .iter()
            .enumerate()
            .map(|(v, g)| (g.to_string(), v as u8))
            .collect();
        Self {
            digits: STANDARD_NIBBLES.map(str::to_string),
            terminator: STANDARD_TERMINATOR.to_string(),
            lookup,
        }
    }

    /// Group for a digit value (0..16)
    pub fn group(&self, digit: u8) -> Option<&str> {
        self.digits.get(digit as usize).map(String::as_str)
    }

    /// Digit value for a group, None for the terminator or an unknown group
    pub fn digit(&self, group: &str) -> Option<u8> {
        self.lookup.get(group).copied()
    }

    pub fn terminator(&self) -> &str {
        &self.terminator
    }

    /// Encode a code point: digit groups followed by the terminator.
    pub fn encode(&self, codepoint: u32) -> String {
        let hex = format!("{:X}", codepoint);
        let mut out = String::with_capacity((hex.len() + 1) * NIBBLE_WIDTH);
        for h in hex.chars() {
            // {:X} only yields 0-9A-F
            let value = h.to_digit(16).unwrap_or(0) as usize;
            out.push_str(&self.digits[value]);
        }
        out.push_str(&self.terminator);
        out
    }

    /// Decode one escape starting at `pos` (just after the HEX_ESCAPE chunk).
    ///
    /// Returns the decoded unit (None for the empty escape) and the position
    /// after everything consumed.
    pub fn decode(&self, content: &[char], mut pos: usize) -> (Option<DecodedUnit>, usize) {
        let start = pos;
        let mut hex = String::new();
        let mut value: Option<u32> = Some(0);

        while pos + NIBBLE_WIDTH <= content.len() {
            let group: String = content[pos..pos + NIBBLE_WIDTH].iter().collect();
            pos += NIBBLE_WIDTH;

            if group == self.terminator {
                if hex.is_empty() {
                    return (None, pos);
                }
                let unit = match value.and_then(char::from_u32) {
                    Some(c) => DecodedUnit::Escaped(c),
                    None => DecodedUnit::InvalidCodepoint(hex),
                };
                return (Some(unit), pos);
            }

            match self.digit(&group) {
                Some(nibble) => {
                    hex.push_str(&format!("{:X}", nibble));
                    value = value
                        .and_then(|v| v.checked_mul(16))
                        .and_then(|v| v.checked_add(nibble as u32));
                }
                None => {
                    log::debug!("Malformed hex escape group {:?} at {}", group, pos - NIBBLE_WIDTH);
                    let raw = content[start..pos].iter().collect();
                    return (Some(DecodedUnit::MalformedEscape(raw)), pos);
                }
            }
        }

        log::debug!("Hex escape truncated after {} digits", hex.len());
        let raw = content[start..].iter().collect();
        (Some(DecodedUnit::TruncatedEscape(raw)), content.len())
    }
}

impl Default for HexNibbleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_standard_table_valid() {
        let rebuilt = HexNibbleTable::new(STANDARD_NIBBLES, STANDARD_TERMINATOR).unwrap();
        assert_eq!(rebuilt, HexNibbleTable::standard());
    }

    #[test]
    fn test_encode_ascii_a() {
        let table = HexNibbleTable::standard();
        assert_eq!(table.encode(0x41), "+==++==-=");
    }

    #[test]
    fn test_encode_zero_is_one_digit() {
        let table = HexNibbleTable::standard();
        assert_eq!(table.encode(0), "+++=-=");
    }

    #[test]
    fn test_encode_emoji() {
        let table = HexNibbleTable::standard();
        // 1 F 6 0 0 END
        assert_eq!(table.encode(0x1F600), "++==-++-+++++++=-=");
    }

    #[test]
    fn test_decode_roundtrip_sample() {
        let table = HexNibbleTable::standard();
        for cp in [0x41u32, 0x0, 0xE9, 0x3B1, 0x1F600, 0x10FFFF] {
            let encoded = chars(&table.encode(cp));
            let (unit, pos) = table.decode(&encoded, 0);
            assert_eq!(pos, encoded.len());
            assert_eq!(unit, Some(DecodedUnit::Escaped(char::from_u32(cp).unwrap())));
        }
    }

    #[test]
    fn test_decode_empty_escape() {
        let table = HexNibbleTable::standard();
        let (unit, pos) = table.decode(&chars("=-=+++"), 0);
        assert_eq!(unit, None);
        assert_eq!(pos, 3);
    }

    #[test]
    fn test_decode_malformed_group() {
        let table = HexNibbleTable::standard();
        // "4" then "---" which is neither a digit nor the terminator
        let content = chars("+==---+++");
        let (unit, pos) = table.decode(&content, 0);
        assert_eq!(unit, Some(DecodedUnit::MalformedEscape("+==---".to_string())));
        assert_eq!(pos, 6);
    }

    #[test]
    fn test_decode_truncated() {
        let table = HexNibbleTable::standard();
        let content = chars("+==++=+");
        let (unit, pos) = table.decode(&content, 0);
        assert_eq!(unit, Some(DecodedUnit::TruncatedEscape("+==++=+".to_string())));
        assert_eq!(pos, content.len());
    }

    #[test]
    fn test_decode_surrogate_is_invalid_codepoint() {
        let table = HexNibbleTable::standard();
        let encoded = chars(&table.encode(0xD800));
        let (unit, _) = table.decode(&encoded, 0);
        assert_eq!(unit, Some(DecodedUnit::InvalidCodepoint("D800".to_string())));
    }

    #[test]
    fn test_decode_overflow_is_invalid_codepoint() {
        let table = HexNibbleTable::standard();
        let mut s = table.group(0xF).unwrap().repeat(9);
        s.push_str(STANDARD_TERMINATOR);
        let (unit, _) = table.decode(&chars(&s), 0);
        assert_eq!(unit, Some(DecodedUnit::InvalidCodepoint("FFFFFFFFF".to_string())));
    }

    #[test]
    fn test_decode_from_offset() {
        let table = HexNibbleTable::standard();
        let content = chars("XXXXXX+==++==-=");
        let (unit, pos) = table.decode(&content, 6);
        assert_eq!(unit, Some(DecodedUnit::Escaped('A')));
        assert_eq!(pos, 15);
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let mut digits = STANDARD_NIBBLES;
        digits[1] = digits[0];
        assert!(HexNibbleTable::new(digits, STANDARD_TERMINATOR).is_err());

        let mut digits = STANDARD_NIBBLES;
        digits[5] = STANDARD_TERMINATOR;
        assert!(HexNibbleTable::new(digits, STANDARD_TERMINATOR).is_err());

        assert!(HexNibbleTable::new(STANDARD_NIBBLES, "=-").is_err());
        assert!(HexNibbleTable::new(STANDARD_NIBBLES, "=x=").is_err());
    }
}
