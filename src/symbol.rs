//! The coding alphabet: every byte value plus an out-of-band end marker.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of distinct symbols, the 256 byte values and [`Symbol::EndOfStream`].
pub const ALPHABET_SIZE: usize = 257;

/// One unit of the coded alphabet.
///
/// `EndOfStream` sits outside the byte range so that a literal `0x00` in
/// the input is never mistaken for the end of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Byte(u8),
    EndOfStream,
}

impl Symbol {
    /// Dense index in `0..ALPHABET_SIZE`; the end marker is last.
    pub fn index(self) -> usize {
        match self {
            Symbol::Byte(b) => b as usize,
            Symbol::EndOfStream => ALPHABET_SIZE - 1,
        }
    }

    pub fn is_end_of_stream(self) -> bool {
        matches!(self, Symbol::EndOfStream)
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Symbol::Byte(byte)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Byte(b) => write!(f, "0x{b:02X}"),
            Symbol::EndOfStream => f.write_str("EOS"),
        }
    }
}

impl FromStr for Symbol {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "EOS" {
            return Ok(Symbol::EndOfStream);
        }
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| CodecError::InvalidSymbol(format!("expected `EOS` or `0xHH`, got {s:?}")))?;
        u8::from_str_radix(hex, 16)
            .map(Symbol::Byte)
            .map_err(|e| CodecError::InvalidSymbol(format!("bad byte value {s:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_distinct_from_nul() {
        assert_ne!(Symbol::Byte(0), Symbol::EndOfStream);
        assert_ne!(Symbol::Byte(0).index(), Symbol::EndOfStream.index());
        assert_eq!(Symbol::EndOfStream.index(), 256);
    }

    #[test]
    fn test_display_parse() {
        assert_eq!(Symbol::Byte(b' ').to_string(), "0x20");
        assert_eq!("0x0a".parse::<Symbol>().unwrap(), Symbol::Byte(b'\n'));
        assert_eq!("EOS".parse::<Symbol>().unwrap(), Symbol::EndOfStream);
        assert!(matches!("A".parse::<Symbol>(), Err(CodecError::InvalidSymbol(_))));
        assert!(matches!("0x100".parse::<Symbol>(), Err(CodecError::InvalidSymbol(_))));
    }

    #[test]
    fn test_sentinel_sorts_last() {
        assert!(Symbol::Byte(255) < Symbol::EndOfStream);
    }
}
