//! Frequency analysis for byte streams.
//!
//! Counts the occurrence of each byte value (0-255) in an input buffer
//! and computes Shannon entropy.

/// A frequency table that tracks byte occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Count of each byte value (index = byte value, value = count).
    pub byte: [u64; 256],
    /// Sum of all counts.
    pub total: u64,
    /// Number of distinct byte values with nonzero count.
    pub used: u32,
}

impl FrequencyTable {
    /// Create a new, zeroed frequency table.
    pub fn new() -> Self {
        Self {
            byte: [0u64; 256],
            total: 0,
            used: 0,
        }
    }

    /// Count byte frequencies in the input buffer.
    ///
    /// Adds to any counts already present, so calling this once per chunk
    /// yields the same table as one call over the concatenation.
    pub fn count(&mut self, input: &[u8]) {
        for &b in input {
            self.byte[b as usize] += 1;
        }
        self.refresh();
    }

    /// Combine the counts of another table into this one.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (mine, theirs) in self.byte.iter_mut().zip(other.byte.iter()) {
            *mine = mine.saturating_add(*theirs);
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        let mut total = 0u64;
        let mut used = 0u32;
        for &c in &self.byte {
            total = total.saturating_add(c);
            used += (c > 0) as u32;
        }
        self.total = total;
        self.used = used;
    }

    /// Compute the Shannon entropy of the distribution (in bits per symbol).
    ///
    /// Returns 0.0 if the table is empty.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.byte
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }

    /// Get the count for a specific byte value.
    pub fn get(&self, byte: u8) -> u64 {
        self.byte[byte as usize]
    }

    /// Iterate `(symbol, count)` over symbols that occur, in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.byte
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| (c > 0).then_some((i as u8, c)))
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function: compute a frequency table from input.
pub fn get_frequency(input: &[u8]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    table.count(input);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let table = get_frequency(&[]);
        assert_eq!(table.total, 0);
        assert_eq!(table.used, 0);
        assert!(table.is_empty());
        assert_eq!(table.entropy(), 0.0);
        assert_eq!(table.symbols().count(), 0);
    }

    #[test]
    fn test_known_frequencies() {
        let table = get_frequency(b"AAAB");
        assert_eq!(table.get(0x41), 3);
        assert_eq!(table.get(0x42), 1);
        assert_eq!(table.total, 4);
        assert_eq!(table.used, 2);
        let present: Vec<(u8, u64)> = table.symbols().collect();
        assert_eq!(present, vec![(0x41, 3), (0x42, 1)]);
    }

    #[test]
    fn test_all_same_byte() {
        let table = get_frequency(&[0xFFu8; 100]);
        assert_eq!(table.total, 100);
        assert_eq!(table.used, 1);
        assert_eq!(table.get(0xFF), 100);
        assert_eq!(table.entropy(), 0.0);
    }

    #[test]
    fn test_uniform_distribution() {
        let input: Vec<u8> = (0..=255).collect();
        let table = get_frequency(&input);
        assert_eq!(table.used, 256);
        let entropy = table.entropy();
        assert!((entropy - 8.0).abs() < 0.001, "entropy was {}", entropy);
    }

    #[test]
    fn test_chunked_counts_match_whole() {
        let input = b"the quick brown fox jumps over the lazy dog";
        let whole = get_frequency(input);

        let (a, b) = input.split_at(17);
        let mut left = get_frequency(a);
        let right = get_frequency(b);
        left.merge(&right);
        assert_eq!(left, whole);

        let mut incremental = FrequencyTable::new();
        incremental.count(b);
        incremental.count(a);
        assert_eq!(incremental, whole);
    }

    #[test]
    fn test_merge_saturates() {
        let mut big = FrequencyTable::new();
        big.byte[7] = u64::MAX - 1;
        let small = get_frequency(&[7, 7, 7]);
        big.merge(&small);
        assert_eq!(big.get(7), u64::MAX);
        assert_eq!(big.total, u64::MAX);
        assert_eq!(big.used, 1);
    }
}
