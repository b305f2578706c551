/// Validation tests across the whole pipeline.
///
/// These tests verify:
/// 1. **Round-trip correctness** for every stage and both container layouts
/// 2. **Code properties** - prefix-free tables, lengths bounded by entropy
/// 3. **Edge cases** - empty, single byte, single symbol, all 256 symbols
#[cfg(test)]
mod tests {
    use crate::bits;
    use crate::codec;
    use crate::codes::CodeTable;
    use crate::container::Format;
    use crate::frequency;
    use crate::huffman::HuffmanTree;
    use crate::pipeline::{self, CompressOptions};

    // ---------------------------------------------------------------
    // Helper: generate diverse test vectors
    // ---------------------------------------------------------------

    /// Highly compressible: single byte repeated.
    fn data_all_zeros(n: usize) -> Vec<u8> {
        vec![0u8; n]
    }

    /// Every byte value once (uniform distribution, 8 bits entropy).
    fn data_uniform() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// Skewed distribution: 90% one byte, 10% another.
    fn data_skewed(n: usize) -> Vec<u8> {
        (0..n).map(|i| if i % 10 == 0 { 1 } else { 0 }).collect()
    }

    /// Repetitive text with structure.
    fn data_repeating_text() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. ".repeat(100)
    }

    /// Binary data with some structure (sawtooth).
    fn data_sawtooth(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 256) as u8).collect()
    }

    /// Fibonacci-weighted symbols: produces the deepest possible tree for
    /// the symbol count.
    fn data_fibonacci() -> Vec<u8> {
        let (mut a, mut b) = (1usize, 1usize);
        let mut v = Vec::new();
        for sym in 0..20u8 {
            v.extend(std::iter::repeat(sym).take(a));
            (a, b) = (b, a + b);
        }
        v
    }

    // ---------------------------------------------------------------
    // 1. Round-trip validation for every stage
    // ---------------------------------------------------------------

    macro_rules! round_trip_test {
        ($name:ident, $data:expr) => {
            mod $name {
                use super::*;

                #[test]
                fn stages() {
                    let input: Vec<u8> = $data;
                    let Some(tree) = HuffmanTree::from_data(&input) else {
                        assert!(input.is_empty());
                        return;
                    };
                    let table = CodeTable::from_tree(&tree);
                    let encoded = codec::encode(&input, &table).unwrap();
                    let block = bits::pack(&encoded);
                    assert_eq!(block.bytes.len(), encoded.len().div_ceil(8));
                    let unpacked = bits::unpack(&block).unwrap();
                    assert_eq!(unpacked, encoded);
                    let decoded = codec::decode(&unpacked, &tree).unwrap();
                    assert_eq!(decoded, input, "stage round-trip failed");
                }

                #[test]
                fn hz_container() {
                    let input: Vec<u8> = $data;
                    let packed = pipeline::compress(&input).unwrap();
                    let decoded = pipeline::decompress(&packed).unwrap();
                    assert_eq!(decoded, input, "hz container round-trip failed");
                }

                #[test]
                fn legacy_container() {
                    let input: Vec<u8> = $data;
                    let options = CompressOptions {
                        format: Format::Legacy,
                        verify: false,
                    };
                    let packed = pipeline::compress_with_options(&input, &options).unwrap();
                    let decoded = pipeline::decompress(&packed).unwrap();
                    assert_eq!(decoded, input, "legacy container round-trip failed");
                }

                #[test]
                fn prefix_free() {
                    let input: Vec<u8> = $data;
                    if let Some(tree) = HuffmanTree::from_data(&input) {
                        assert!(CodeTable::from_tree(&tree).is_prefix_free());
                    }
                }
            }
        };
    }

    round_trip_test!(empty, Vec::new());
    round_trip_test!(single_byte, vec![42u8]);
    round_trip_test!(all_zeros, data_all_zeros(1000));
    round_trip_test!(uniform, data_uniform());
    round_trip_test!(skewed, data_skewed(1000));
    round_trip_test!(repeating_text, data_repeating_text());
    round_trip_test!(sawtooth, data_sawtooth(3000));
    round_trip_test!(fibonacci, data_fibonacci());

    // ---------------------------------------------------------------
    // 2. Algorithmic properties
    // ---------------------------------------------------------------

    /// Huffman's average code length lies within one bit of the entropy.
    #[test]
    fn average_length_within_one_bit_of_entropy() {
        for input in [data_repeating_text(), data_skewed(1000), data_uniform()] {
            let freq = frequency::get_frequency(&input);
            let tree = HuffmanTree::from_frequency_table(&freq).unwrap();
            let avg = tree.weighted_path_length() as f64 / freq.total as f64;
            let entropy = freq.entropy();
            assert!(avg >= entropy - 1e-9, "avg {avg} < entropy {entropy}");
            assert!(avg < entropy + 1.0, "avg {avg} >= entropy + 1 ({entropy})");
        }
    }

    #[test]
    fn uniform_symbols_get_eight_bit_codes() {
        let tree = HuffmanTree::from_data(&data_uniform()).unwrap();
        let table = CodeTable::from_tree(&tree);
        assert!(table.iter().all(|(_, c)| c.len() == 8));
    }

    #[test]
    fn fibonacci_weights_give_deep_tree() {
        let tree = HuffmanTree::from_data(&data_fibonacci()).unwrap();
        let table = CodeTable::from_tree(&tree);
        let max = table.iter().map(|(_, c)| c.len()).max().unwrap();
        assert_eq!(max, 19);
    }
}
