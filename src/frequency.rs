//! Byte histograms over the input.

use crate::error::CodecError;
use crate::symbol::Symbol;
use tracing::trace;

/// Occurrence counts for each byte value, plus the end-of-stream symbol
/// which always counts exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Count every byte in `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &b in data {
            counts[b as usize] += 1;
        }
        trace!(
            bytes = data.len(),
            distinct = counts.iter().filter(|&&c| c > 0).count(),
            "counted byte frequencies"
        );
        Self { counts }
    }

    /// Rebuild a table from persisted `(byte, count)` pairs. Repeated bytes
    /// accumulate. The grand total, end marker included, must fit in a `u64`
    /// so that the tree's root weight cannot overflow.
    pub fn from_counts<I>(counts: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = [0u64; 256];
        let mut total = 1u64;
        for (byte, count) in counts {
            let slot = &mut table[byte as usize];
            *slot = slot.checked_add(count).ok_or(CodecError::FrequencyOverflow)?;
            total = total.checked_add(count).ok_or(CodecError::FrequencyOverflow)?;
        }
        Ok(Self { counts: table })
    }

    /// Frequency of a symbol; the end marker is pinned to 1.
    pub fn get(&self, symbol: Symbol) -> u64 {
        match symbol {
            Symbol::Byte(b) => self.counts[b as usize],
            Symbol::EndOfStream => 1,
        }
    }

    /// Symbols with a non-zero count in byte order, followed by the end marker.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(b, &c)| (Symbol::Byte(b as u8), c))
            .chain(std::iter::once((Symbol::EndOfStream, 1)))
    }

    /// Number of distinct symbols including the end marker.
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count() + 1
    }

    /// Never true: the end marker is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Total number of input bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_bytes() {
        let table = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(table.get(Symbol::Byte(b'a')), 5);
        assert_eq!(table.get(Symbol::Byte(b'b')), 2);
        assert_eq!(table.get(Symbol::Byte(b'z')), 0);
        assert_eq!(table.total(), 11);
        // a, b, c, d, r + EOS
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_empty_input_has_only_sentinel() {
        let table = FrequencyTable::from_bytes(b"");
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(Symbol::EndOfStream, 1)]);
    }

    #[test]
    fn test_nul_bytes_counted_separately() {
        let table = FrequencyTable::from_bytes(&[0, 0, 0]);
        assert_eq!(table.get(Symbol::Byte(0)), 3);
        assert_eq!(table.get(Symbol::EndOfStream), 1);
    }

    #[test]
    fn test_from_counts_matches_from_bytes() {
        let counted = FrequencyTable::from_bytes(b"hello");
        let loaded =
            FrequencyTable::from_counts(vec![(b'h', 1), (b'e', 1), (b'l', 2), (b'o', 1)]).unwrap();
        assert_eq!(counted, loaded);
    }

    #[test]
    fn test_from_counts_rejects_overflow() {
        let repeated = FrequencyTable::from_counts(vec![(b'a', u64::MAX), (b'a', 1)]);
        assert!(matches!(repeated, Err(CodecError::FrequencyOverflow)));

        let spread = FrequencyTable::from_counts(vec![(b'a', u64::MAX / 2), (b'b', u64::MAX / 2 + 1)]);
        assert!(matches!(spread, Err(CodecError::FrequencyOverflow)));

        // the end marker's 1 still has to fit
        let edge = FrequencyTable::from_counts(vec![(b'a', u64::MAX)]);
        assert!(matches!(edge, Err(CodecError::FrequencyOverflow)));
        assert!(FrequencyTable::from_counts(vec![(b'a', u64::MAX - 1)]).is_ok());
    }

    #[test]
    fn test_iter_order() {
        let table = FrequencyTable::from_bytes(b"cba");
        let symbols: Vec<_> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(
            symbols,
            vec![
                Symbol::Byte(b'a'),
                Symbol::Byte(b'b'),
                Symbol::Byte(b'c'),
                Symbol::EndOfStream
            ]
        );
    }
}
