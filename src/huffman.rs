//! Huffman tree construction.
//!
//! Nodes live in a flat arena and refer to their children by index, so a
//! tree is freed as a unit and children can never be shared.
use log::{debug, trace};

use crate::codes::CodeTable;
use crate::frequency::FrequencyTable;
use crate::pqueue::MinHeap;
use crate::{HzError, HzResult};

/// A node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    /// Internal nodes always own exactly two children.
    Internal {
        weight: u64,
        left: usize,
        right: usize,
    },
}

impl Node {
    /// Frequency weight of this node (or subtree). Trees rebuilt from a
    /// code table carry zero weights.
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A Huffman tree for encoding and decoding byte streams.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    /// All nodes stored in a flat vector; leaves first, then internal
    /// nodes in merge order.
    nodes: Vec<Node>,
    /// Index of the root node in `nodes`.
    root: usize,
}

impl HuffmanTree {
    /// Build a Huffman tree from input data.
    ///
    /// Returns `None` for empty input: there is nothing to build a code for.
    pub fn from_data(input: &[u8]) -> Option<Self> {
        if input.is_empty() {
            return None;
        }
        let mut freq = FrequencyTable::new();
        freq.count(input);
        Self::from_frequency_table(&freq)
    }

    /// Build a Huffman tree from a pre-computed frequency table.
    ///
    /// Equal weights are broken deterministically: leaves pop in symbol
    /// order, then merged nodes in creation order. The first node popped
    /// becomes the left child.
    ///
    /// Returns `None` for an empty table, or when a subtree weight would
    /// overflow `u64` (only possible for hand-filled tables).
    pub fn from_frequency_table(freq: &FrequencyTable) -> Option<Self> {
        if freq.is_empty() {
            return None;
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(2 * freq.used as usize);
        let mut heap: MinHeap<usize> = MinHeap::with_capacity(freq.used as usize);
        for (symbol, weight) in freq.symbols() {
            heap.push(weight, symbol as u32, nodes.len());
            nodes.push(Node::Leaf { symbol, weight });
        }

        // Merged nodes order after every leaf.
        let mut order = 256u32;
        while heap.len() > 1 {
            let (left_weight, left) = heap.pop()?;
            let (right_weight, right) = heap.pop()?;
            let weight = left_weight.checked_add(right_weight)?;
            heap.push(weight, order, nodes.len());
            nodes.push(Node::Internal {
                weight,
                left,
                right,
            });
            order += 1;
        }

        let (_, root) = heap.pop()?;
        let tree = HuffmanTree { nodes, root };
        debug!(
            "huffman tree: {} leaves, {} nodes, root weight {}",
            tree.leaf_count(),
            tree.nodes.len(),
            tree.nodes[root].weight()
        );
        trace!("huffman tree nodes: {:?}", tree.nodes);
        Some(tree)
    }

    /// Rebuild the decoding tree described by a persisted code table.
    ///
    /// The table must be non-empty and prefix-free, and with two or more
    /// entries it must be complete (every internal node has two children).
    /// A single entry must carry the one-bit code `0`, which maps back to a
    /// lone leaf root.
    pub fn from_code_table(table: &CodeTable) -> HzResult<Self> {
        if table.is_empty() {
            return Err(HzError::malformed("empty code table"));
        }

        if table.len() == 1 {
            let (symbol, code) = table
                .iter()
                .next()
                .ok_or_else(|| HzError::malformed("empty code table"))?;
            if code.bits() != [false] {
                return Err(HzError::malformed(format!(
                    "single-entry code table must use code 0, found {code}"
                )));
            }
            return Ok(HuffmanTree {
                nodes: vec![Node::Leaf { symbol, weight: 0 }],
                root: 0,
            });
        }

        struct Slot {
            symbol: Option<u8>,
            children: [Option<usize>; 2],
        }
        let mut slots = vec![Slot {
            symbol: None,
            children: [None, None],
        }];

        for (symbol, code) in table.iter() {
            let mut cur = 0;
            for &bit in code.bits() {
                if slots[cur].symbol.is_some() {
                    return Err(HzError::malformed("code table is not prefix-free"));
                }
                cur = match slots[cur].children[bit as usize] {
                    Some(next) => next,
                    None => {
                        let next = slots.len();
                        slots.push(Slot {
                            symbol: None,
                            children: [None, None],
                        });
                        slots[cur].children[bit as usize] = Some(next);
                        next
                    }
                };
            }
            let slot = &mut slots[cur];
            if slot.symbol.is_some() || slot.children.iter().any(Option::is_some) {
                return Err(HzError::malformed("code table is not prefix-free"));
            }
            slot.symbol = Some(symbol);
        }

        let nodes = slots
            .into_iter()
            .map(|slot| match (slot.symbol, slot.children) {
                (Some(symbol), _) => Ok(Node::Leaf { symbol, weight: 0 }),
                (None, [Some(left), Some(right)]) => Ok(Node::Internal {
                    weight: 0,
                    left,
                    right,
                }),
                _ => Err(HzError::malformed("code table is incomplete")),
            })
            .collect::<HzResult<Vec<Node>>>()?;

        Ok(HuffmanTree { nodes, root: 0 })
    }

    /// Index of the root node.
    pub fn root(&self) -> usize {
        self.root
    }

    /// Get a node by index. Indices come from `root()` or a parent node.
    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// True when the tree is a single leaf (one distinct symbol).
    pub fn is_single_leaf(&self) -> bool {
        self.nodes[self.root].is_leaf()
    }

    /// Number of distinct symbols in the tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth of the leaf holding `symbol`, or `None` if absent.
    ///
    /// A lone leaf root reports depth 1, the length of its code.
    pub fn depth_of(&self, symbol: u8) -> Option<usize> {
        let mut found = None;
        self.walk(|s, _, depth| {
            if s == symbol {
                found = Some(depth);
            }
        });
        found
    }

    /// Sum of weight x depth over all leaves.
    pub fn weighted_path_length(&self) -> u64 {
        let mut total = 0u64;
        self.walk(|_, weight, depth| total += weight * depth as u64);
        total
    }

    /// Visit every leaf as `(symbol, weight, depth)`, left before right.
    fn walk(&self, mut visit: impl FnMut(u8, u64, usize)) {
        if let Node::Leaf { symbol, weight } = self.nodes[self.root] {
            visit(symbol, weight, 1);
            return;
        }
        let mut stack = vec![(self.root, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            match self.nodes[idx] {
                Node::Leaf { symbol, weight } => visit(symbol, weight, depth),
                Node::Internal { left, right, .. } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
    }
}
