//! Trit - The fundamental unit of the channel
//!
//! Everything that crosses the wire is a Trit: one balanced-ternary digit.
//!
//! Textual representation, one character per trit:
//!
//! | Trit       | Value | Symbol |
//! |------------|-------|--------|
//! | `Negative` | -1    | `-`    |
//! | `Zero`     | 0     | `=`    |
//! | `Positive` | +1    | `+`    |
//!
//! # Example
//! ```
//! use ternlex::Trit;
//!
//! let t = Trit::from_symbol('+').unwrap();
//! assert_eq!(t.as_i8(), 1);
//! assert_eq!(Trit::wrapping(2), Trit::Negative);
//! assert_eq!(Trit::Negative.symbol(), '-');
//! ```

/// All three symbols of the alphabet, ordered by value.
pub const ALPHABET: [char; 3] = ['-', '=', '+'];

/// One balanced-ternary digit - strictly {-1, 0, +1}
///
/// Using this enum instead of raw i8 prevents invalid states like trit=2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i8)]
pub enum Trit {
    /// -1, written `-`
    Negative = -1,
    /// 0, written `=`
    #[default]
    Zero = 0,
    /// +1, written `+`
    Positive = 1,
}

impl Trit {
    /// Convert to i8
    #[inline]
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    /// Try to convert from i8, returns None for invalid values
    #[inline]
    pub const fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Self::Negative),
            0 => Some(Self::Zero),
            1 => Some(Self::Positive),
            _ => None,
        }
    }

    /// Reduce any integer into {-1, 0, +1} by balanced-ternary wraparound.
    ///
    /// Equivalent to repeatedly adding or subtracting 3 until the value is in range.
    #[inline]
    pub const fn wrapping(value: i32) -> Self {
        // rem_euclid puts value in 0..3; shift so 2 wraps to -1
        match value.rem_euclid(3) {
            0 => Self::Zero,
            1 => Self::Positive,
            _ => Self::Negative,
        }
    }

    /// Parse a single alphabet symbol
    #[inline]
    pub const fn from_symbol(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Negative),
            '=' => Some(Self::Zero),
            '+' => Some(Self::Positive),
            _ => None,
        }
    }

    /// The alphabet symbol for this trit
    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            Self::Negative => '-',
            Self::Zero => '=',
            Self::Positive => '+',
        }
    }

    /// Is this character part of the alphabet?
    #[inline]
    pub const fn is_symbol(c: char) -> bool {
        matches!(c, '-' | '=' | '+')
    }
}

impl From<Trit> for i8 {
    fn from(t: Trit) -> i8 {
        t.as_i8()
    }
}

impl TryFrom<i8> for Trit {
    type Error = &'static str;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Trit::from_i8(value).ok_or("trit must be -1, 0, or +1")
    }
}

impl TryFrom<char> for Trit {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Trit::from_symbol(c).ok_or(c)
    }
}

impl std::fmt::Display for Trit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Does `s` consist only of alphabet symbols? (true for the empty string)
pub fn is_trit_str(s: &str) -> bool {
    s.chars().all(Trit::is_symbol)
}

/// Parse a symbol string into trits, skipping anything outside the alphabet.
pub fn parse_trits(s: &str) -> Vec<Trit> {
    s.chars().filter_map(Trit::from_symbol).collect()
}

/// Render trits back to their symbol string.
pub fn render_trits(trits: &[Trit]) -> String {
    trits.iter().map(|t| t.symbol()).collect()
}
