//! Static Huffman compression for byte streams.
//!
//! The core builds a prefix-code tree from byte frequencies, encodes input
//! into a bit sequence and packs it into bytes with an exact bit count.
//! [`pipeline`] wraps the core in a self-describing container and [`file`]
//! persists it atomically.
//!
//! ```
//! let packed = hz::pipeline::compress(b"AAAB").unwrap();
//! assert_eq!(hz::pipeline::decompress(&packed).unwrap(), b"AAAB");
//! ```

pub mod bits;
pub mod codec;
pub mod codes;
pub mod container;
pub mod crc32;
pub mod file;
pub mod frequency;
pub mod huffman;
pub mod pipeline;
pub mod pqueue;

#[cfg(test)]
mod validation;

use thiserror::Error;

/// Error types for hz operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HzError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The container is truncated or internally inconsistent.
    #[error("malformed container: {0}")]
    Malformed(String),
    /// The container uses a version or flag this build does not know.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// A byte has no entry in the code table.
    #[error("byte 0x{0:02x} has no code")]
    UnknownSymbol(u8),
    /// A bit path leads outside the tree.
    #[error("bit sequence does not match the code table")]
    InvalidCode,
    /// The bit sequence ended in the middle of a code.
    #[error("bit sequence ends in the middle of a code")]
    TruncatedStream,
    /// The restored payload does not match the stored checksum.
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    /// The restored payload does not have the stored length.
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },
}

impl HzError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

pub type HzResult<T> = Result<T, HzError>;
