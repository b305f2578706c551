//! Logical bit sequences and their byte-aligned packed form.
//!
//! Bits are packed most-significant first. The last byte is zero-padded on
//! the low end, so the exact bit count travels alongside the bytes.
use std::fmt;
use std::str::FromStr;

use crate::{HzError, HzResult};

/// An ordered, arbitrary-length sequence of bits.
///
/// Stored eight bits to a byte, MSB first. Bits past `len` in the last byte
/// are always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence {
    bytes: Vec<u8>,
    len: usize,
}

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        BitSequence {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    pub fn push(&mut self, bit: bool) {
        let bit_offset = self.len % 8;
        if bit_offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 1 << (7 - bit_offset);
        }
        self.len += 1;
    }

    pub fn extend_from_slice(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.push(bit);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.len).then(|| (self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    /// The packed bytes, zero-padded after the last bit.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| (self.bytes[i / 8] >> (7 - i % 8)) & 1 == 1)
    }

    /// Hand the storage over as a packed block without copying.
    pub fn into_packed(self) -> PackedBlock {
        PackedBlock {
            bytes: self.bytes,
            bit_count: self.len as u64,
        }
    }
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        let mut seq = BitSequence::with_capacity(bits.len());
        seq.extend_from_slice(&bits);
        seq
    }
}

impl FromStr for BitSequence {
    type Err = HzError;

    /// Parse a string of `'0'`/`'1'` characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut seq = BitSequence::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => seq.push(false),
                '1' => seq.push(true),
                other => {
                    return Err(HzError::malformed(format!("invalid bit character {other:?}")))
                }
            }
        }
        Ok(seq)
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Byte-aligned storage of a bit sequence plus its exact length in bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedBlock {
    pub bytes: Vec<u8>,
    pub bit_count: u64,
}

impl PackedBlock {
    /// Number of bytes needed to hold `bit_count` bits.
    pub fn byte_len(bit_count: u64) -> u64 {
        bit_count.div_ceil(8)
    }
}

/// Pack bits eight to a byte, MSB first, zero-padding the final byte.
///
/// The sequence is already stored this way, so this is a copy.
pub fn pack(bits: &BitSequence) -> PackedBlock {
    bits.clone().into_packed()
}

/// Recover exactly `block.bit_count` bits; padding is never re-emitted.
pub fn unpack(block: &PackedBlock) -> HzResult<BitSequence> {
    let available = block.bytes.len() as u64 * 8;
    if block.bit_count > available {
        return Err(HzError::malformed(format!(
            "bit count {} exceeds {} packed bits",
            block.bit_count, available
        )));
    }
    let len = block.bit_count as usize;
    let mut bytes = block.bytes[..len.div_ceil(8)].to_vec();
    let tail = len % 8;
    if tail != 0 {
        if let Some(last) = bytes.last_mut() {
            *last &= 0xFFu8 << (8 - tail);
        }
    }
    Ok(BitSequence { bytes, len })
}
