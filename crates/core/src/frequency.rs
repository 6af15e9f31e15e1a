//! Byte frequency analysis.

use std::fmt;

/// Occurrence count for each of the 256 byte values.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Count every byte of `data` in a single pass.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    /// Count for one byte value (zero if absent).
    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Number of distinct byte values present.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Non-zero `(byte, count)` pairs in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .map(move |byte| (byte, self.counts[byte as usize]))
            .filter(|&(_, count)| count > 0)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; 256] }
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_each_byte() {
        let table = FrequencyTable::from_bytes(b"abbccc");
        assert_eq!(table.get(b'a'), 1);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'c'), 3);
        assert_eq!(table.get(b'd'), 0);
        assert_eq!(table.distinct(), 3);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn test_iter_is_sorted_and_sparse() {
        let table = FrequencyTable::from_bytes(&[0xFF, 0x00, 0x80, 0xFF]);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(0x00, 1), (0x80, 1), (0xFF, 2)]);
    }

    #[test]
    fn test_empty() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.distinct(), 0);
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table, FrequencyTable::default());
    }

    #[test]
    fn test_full_alphabet() {
        let data: Vec<u8> = (0..=255).collect();
        let table = FrequencyTable::from_bytes(&data);
        assert_eq!(table.distinct(), 256);
        assert!(table.iter().all(|(_, count)| count == 1));
    }
}
