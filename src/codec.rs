//! Huffman encoding and decoding between bytes and bit sequences.
use crate::bits::BitSequence;
use crate::codes::CodeTable;
use crate::huffman::{HuffmanTree, Node};
use crate::{HzError, HzResult};

/// Concatenate the code of every input byte, in input order.
///
/// Fails with [`HzError::UnknownSymbol`] if a byte has no code, which cannot
/// happen when the table was derived from the same input.
pub fn encode(input: &[u8], table: &CodeTable) -> HzResult<BitSequence> {
    if input.is_empty() {
        return Ok(BitSequence::new());
    }
    let total_bits = table.encoded_bits(input)?;
    let mut bits = BitSequence::with_capacity(total_bits as usize);
    for &byte in input {
        let code = table.get(byte).ok_or(HzError::UnknownSymbol(byte))?;
        bits.extend_from_slice(code.bits());
    }
    Ok(bits)
}

/// Walk the tree bit by bit, emitting a byte at every leaf.
///
/// For a lone-leaf tree each `0` bit is one occurrence of the symbol. A
/// sequence that stops partway down the tree is rejected with
/// [`HzError::TruncatedStream`].
pub fn decode(bits: &BitSequence, tree: &HuffmanTree) -> HzResult<Vec<u8>> {
    let root = tree.root();
    if let Node::Leaf { symbol, .. } = *tree.node(root) {
        if bits.iter().any(|bit| bit) {
            return Err(HzError::InvalidCode);
        }
        return Ok(vec![symbol; bits.len()]);
    }

    let mut output = Vec::new();
    let mut node_idx = root;
    for bit in bits.iter() {
        let next = match *tree.node(node_idx) {
            Node::Internal { left, right, .. } => {
                if bit {
                    right
                } else {
                    left
                }
            }
            // The cursor is reset at every leaf.
            Node::Leaf { .. } => return Err(HzError::InvalidCode),
        };
        match *tree.node(next) {
            Node::Leaf { symbol, .. } => {
                output.push(symbol);
                node_idx = root;
            }
            Node::Internal { .. } => node_idx = next,
        }
    }

    if node_idx != root {
        return Err(HzError::TruncatedStream);
    }
    Ok(output)
}
