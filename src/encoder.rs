//! Encoder - text to trit stream
//!
//! Per character, in order of preference:
//!
//! 1. Tier-1 key (shift back to width 6 first if needed)
//! 2. Tier-2 key (shift to width 8 first if needed)
//! 3. HEX_ESCAPE + hex nibbles (in width 6)
//!
//! The stream always ends in width 6: a trailing SHIFT_6 is appended when the
//! last character came from Tier-2. The raw stream is then modulated unless
//! raw output was requested.

use crate::decoder::Mode;
use crate::error::{Result, TernlexError};
use crate::modulation;
use crate::table::CodecTables;

/// Encode options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Skip modulation and emit the raw chunk stream
    pub raw: bool,
}

/// Text encoder bound to a set of tables
#[derive(Clone, Copy, Debug)]
pub struct Encoder<'t> {
    tables: &'t CodecTables,
    options: EncodeOptions,
}

impl<'t> Encoder<'t> {
    pub fn new(tables: &'t CodecTables) -> Self {
        Self { tables, options: EncodeOptions::default() }
    }

    pub fn with_options(tables: &'t CodecTables, options: EncodeOptions) -> Self {
        Self { tables, options }
    }

    /// Request raw (unmodulated) output
    pub fn raw(mut self, raw: bool) -> Self {
        self.options.raw = raw;
        self
    }

    /// Encode text for transmission.
    ///
    /// # Errors
    /// [`TernlexError::MissingHexEscapeConfig`] if a character is in neither
    /// tier and Tier-1 has no HEX_ESCAPE entry.
    pub fn encode(&self, text: &str) -> Result<String> {
        let raw = self.encode_raw(text)?;
        if self.options.raw {
            Ok(raw)
        } else {
            Ok(modulation::modulate(&raw))
        }
    }

    /// Encode text to the unmodulated chunk stream.
    pub fn encode_raw(&self, text: &str) -> Result<String> {
        let tables = self.tables;
        let mut out = String::with_capacity(text.len() * Mode::Six.width());
        let mut mode = Mode::Six;
        let mut escaped = 0usize;

        for c in text.chars() {
            if let Some(key) = tables.tier1().key_for(c) {
                self.enter(&mut out, &mut mode, Mode::Six);
                out.push_str(key);
            } else if let Some(key) = tables.tier2().key_for(c) {
                self.enter(&mut out, &mut mode, Mode::Eight);
                out.push_str(key);
            } else {
                let escape = tables
                    .hex_escape_key()
                    .ok_or(TernlexError::MissingHexEscapeConfig { ch: c })?;
                self.enter(&mut out, &mut mode, Mode::Six);
                out.push_str(escape);
                out.push_str(&tables.nibbles().encode(c as u32));
                escaped += 1;
            }
        }

        // Clean termination: a complete stream always ends in width 6
        self.enter(&mut out, &mut mode, Mode::Six);

        if escaped > 0 {
            log::debug!("Hex-escaped {} characters", escaped);
        }
        Ok(out)
    }

    fn enter(&self, out: &mut String, mode: &mut Mode, target: Mode) {
        if *mode != target {
            out.push_str(self.tables.shift_key(target));
            *mode = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{Decoder, DecodedUnit};
    use crate::table::tests::sample_tables;

    #[test]
    fn test_encode_tier1_only() {
        let tables = sample_tables();
        let raw = Encoder::new(&tables).encode_raw("Hi !").unwrap();
        assert_eq!(raw, "+===-=+===+=----==+===--");
    }

    #[test]
    fn test_encode_space_uses_dedicated_token() {
        let tables = sample_tables();
        assert_eq!(Encoder::new(&tables).encode_raw(" ").unwrap(), "----==");
    }

    #[test]
    fn test_encode_controls() {
        let tables = sample_tables();
        assert_eq!(Encoder::new(&tables).encode_raw("\n\t\r").unwrap(), "----=+----+-----++");
    }

    #[test]
    fn test_encode_tier2_with_shifts() {
        let tables = sample_tables();
        let raw = Encoder::new(&tables).encode_raw("aда a").unwrap();
        let expected = [
            "+=====",   // a
            "+-+=+=",   // SHIFT_8
            "++++====", // д
            "++++===-", // а
            "+-++-=",   // SHIFT_6
            "----==",   // space
            "+=====",   // a
        ]
        .concat();
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_encode_ends_in_mode6() {
        let tables = sample_tables();
        let raw = Encoder::new(&tables).encode_raw("ж").unwrap();
        assert_eq!(raw, "+-+=+=++++===++-++-=");
        let decoded = Decoder::new(&tables).demodulate(false).decode(&raw);
        assert_eq!(decoded.final_mode, Mode::Six);
        assert_eq!(decoded.text(), "ж");
    }

    #[test]
    fn test_encode_hex_fallback_ascii() {
        let tables = sample_tables();
        // 'A' is in neither tier: HEX_ESCAPE, "4", "1", END
        let raw = Encoder::new(&tables).encode_raw("A").unwrap();
        assert_eq!(raw, "+++++++==++==-=");
    }

    #[test]
    fn test_encode_hex_fallback_emoji() {
        let tables = sample_tables();
        let raw = Encoder::new(&tables).encode_raw("😀").unwrap();
        let expected = ["++++++", "++=", "=-+", "+-+", "+++", "+++", "=-="].concat();
        assert_eq!(raw, expected);
        let decoded = Decoder::new(&tables).demodulate(false).decode(&raw);
        assert_eq!(decoded.units, vec![DecodedUnit::Escaped('😀')]);
    }

    #[test]
    fn test_hex_fallback_shifts_back_to_mode6() {
        let tables = sample_tables();
        let raw = Encoder::new(&tables).encode_raw("жZ").unwrap();
        assert!(raw.starts_with("+-+=+=++++===+"));
        assert_eq!(&raw[14..20], "+-++-=");
        assert_eq!(&raw[20..26], "++++++");
        assert_eq!(Decoder::new(&tables).demodulate(false).decode_to_string(&raw), "жZ");
    }

    #[test]
    fn test_missing_hex_escape_fails() {
        let tables = CodecTables::builder()
            .tier1("+-++-=", "SHIFT_6")
            .tier1("+-+=+=", "SHIFT_8")
            .tier1("+-+=+-", "SHIFT_9")
            .tier1("+-+=++", "SHIFT_12")
            .tier1("+=====", "a")
            .build()
            .unwrap();
        let encoder = Encoder::new(&tables);
        assert_eq!(encoder.encode_raw("aa").unwrap(), "+=====+=====");
        let err = encoder.encode("ab").unwrap_err();
        assert!(matches!(err, TernlexError::MissingHexEscapeConfig { ch: 'b' }));
    }

    #[test]
    fn test_modulated_output_roundtrip() {
        let tables = sample_tables();
        let text = "Hi the\tжд ä😀!\r\n";
        let encoded = Encoder::new(&tables).encode(text).unwrap();
        assert_ne!(encoded, Encoder::new(&tables).raw(true).encode(text).unwrap());
        let decoded = Decoder::new(&tables).decode(&encoded);
        assert!(decoded.is_clean(), "{:?}", decoded.units);
        assert_eq!(decoded.text(), text);
        assert_eq!(decoded.final_mode, Mode::Six);
    }

    #[test]
    fn test_roundtrip_many_texts() {
        let tables = sample_tables();
        let texts = [
            "",
            "a",
            "abc cba",
            "жжж",
            "aжbдc",
            "0123",
            "\u{10FFFF}\u{80}\u{7F}",
            "mixed ж and 日本語 and ✓",
        ];
        for text in texts {
            let encoded = Encoder::new(&tables).encode(text).unwrap();
            let decoded = Decoder::new(&tables).decode(&encoded);
            assert_eq!(decoded.text(), text, "roundtrip failed for {:?}", text);
            assert_eq!(decoded.final_mode, Mode::Six);
        }
    }

    #[test]
    fn test_empty_text() {
        let tables = sample_tables();
        assert_eq!(Encoder::new(&tables).encode("").unwrap(), "");
    }
}
