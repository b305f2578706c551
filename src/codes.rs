//! Code table generation: the bit path from the root to every leaf.
use std::collections::BTreeMap;
use std::fmt;

use crate::huffman::{HuffmanTree, Node};
use crate::{HzError, HzResult};

/// A single code: `false` descends left, `true` descends right.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn new(bits: Vec<bool>) -> Self {
        Code(bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Parse ASCII `'0'`/`'1'` text. Empty codes are rejected.
    pub fn from_ascii(text: &[u8]) -> HzResult<Self> {
        if text.is_empty() {
            return Err(HzError::malformed("empty code"));
        }
        text.iter()
            .map(|&c| match c {
                b'0' => Ok(false),
                b'1' => Ok(true),
                other => Err(HzError::malformed(format!(
                    "code contains byte 0x{other:02x}"
                ))),
            })
            .collect::<HzResult<Vec<bool>>>()
            .map(Code)
    }

    /// Render as ASCII `'0'`/`'1'` bytes.
    pub fn to_ascii(&self) -> Vec<u8> {
        self.0.iter().map(|&b| if b { b'1' } else { b'0' }).collect()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from byte value to its code, ordered by byte value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the tree and record the path to every leaf.
    ///
    /// A tree that is a lone leaf gets the one-bit code `0` so that every
    /// occurrence still costs a bit and the symbol count survives encoding.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = CodeTable::new();
        if let Node::Leaf { symbol, .. } = tree.node(tree.root()) {
            table.insert(*symbol, Code(vec![false]));
            return table;
        }
        let mut path = Vec::new();
        Self::generate_codes(tree, tree.root(), &mut path, &mut table);
        table
    }

    fn generate_codes(tree: &HuffmanTree, idx: usize, path: &mut Vec<bool>, table: &mut CodeTable) {
        match tree.node(idx) {
            Node::Leaf { symbol, .. } => {
                table.insert(*symbol, Code(path.clone()));
            }
            Node::Internal { left, right, .. } => {
                path.push(false);
                Self::generate_codes(tree, *left, path, table);
                path.pop();
                path.push(true);
                Self::generate_codes(tree, *right, path, table);
                path.pop();
            }
        }
    }

    /// Insert or replace the code for `symbol`.
    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes.insert(symbol, code)
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    /// Sum of code lengths weighted by how often each symbol occurs in `input`.
    pub fn encoded_bits(&self, input: &[u8]) -> HzResult<u64> {
        input.iter().try_fold(0u64, |acc, &b| -> HzResult<u64> {
            let code = self.get(b).ok_or(HzError::UnknownSymbol(b))?;
            Ok(acc + code.len() as u64)
        })
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // In sorted order a prefix sorts directly before some extension of
        // it, so checking neighbours is enough.
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        sorted.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }
}
