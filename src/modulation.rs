//! Modulation - fixed per-position whitening of a trit stream
//!
//! Two periodic carriers are added to every trit before transmission and
//! subtracted after reception:
//!
//! - C1, period 4: `+1, 0, -1, 0`
//! - C2, period 3: `+1, -1, 0`
//!
//! The combined pattern repeats every 12 positions. This breaks up long runs of
//! identical symbols on the channel. It is public and reversible, NOT encryption.
//!
//! Only alphabet symbols occupy a position. Anything else (whitespace, stray
//! characters) is dropped from the output and does not advance the carrier.

use crate::trit::Trit;

/// Carrier 1 (period 4)
pub const C1: [i8; 4] = [1, 0, -1, 0];

/// Carrier 2 (period 3)
pub const C2: [i8; 3] = [1, -1, 0];

/// Combined carrier offset at position `i`
#[inline]
pub const fn carrier(i: usize) -> i32 {
    C1[i % C1.len()] as i32 + C2[i % C2.len()] as i32
}

/// Apply the carriers to a trit slice.
pub fn modulate_trits(trits: &[Trit]) -> Vec<Trit> {
    trits
        .iter()
        .enumerate()
        .map(|(i, t)| Trit::wrapping(t.as_i8() as i32 + carrier(i)))
        .collect()
}

/// Remove the carriers from a trit slice.
pub fn demodulate_trits(trits: &[Trit]) -> Vec<Trit> {
    trits
        .iter()
        .enumerate()
        .map(|(i, t)| Trit::wrapping(t.as_i8() as i32 - carrier(i)))
        .collect()
}

/// Modulate a symbol string. Non-alphabet characters are dropped.
pub fn modulate(stream: &str) -> String {
    shift_symbols(stream, 1)
}

/// Demodulate a symbol string. Non-alphabet characters are dropped.
pub fn demodulate(stream: &str) -> String {
    shift_symbols(stream, -1)
}

fn shift_symbols(stream: &str, sign: i32) -> String {
    stream
        .chars()
        .filter_map(Trit::from_symbol)
        .enumerate()
        .map(|(i, t)| Trit::wrapping(t.as_i8() as i32 + sign * carrier(i)).symbol())
        .collect()
}
