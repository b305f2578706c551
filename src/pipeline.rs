/// Compression pipeline orchestrator.
///
/// Chains the Huffman stages together:
///
/// bytes → frequency table → tree → code table → bit sequence → packed
/// block → container bytes
///
/// and runs them in reverse for decompression, rebuilding the tree from the
/// persisted code table.
use log::debug;

use crate::bits::{self, PackedBlock};
use crate::codec;
use crate::codes::CodeTable;
use crate::container::{Container, Format};
use crate::crc32::crc32;
use crate::huffman::HuffmanTree;
use crate::{HzError, HzResult};

/// Options controlling compression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressOptions {
    /// Container layout to write.
    pub format: Format,
    /// Decompress the result and compare it with the input before
    /// returning it.
    pub verify: bool,
}

/// In-memory result of compressing one input.
#[derive(Debug, Clone)]
pub struct Compressed {
    /// `None` for empty input.
    pub tree: Option<HuffmanTree>,
    pub table: CodeTable,
    pub block: PackedBlock,
}

/// Run the core stages without building a container.
pub fn compress_parts(input: &[u8]) -> HzResult<Compressed> {
    let Some(tree) = HuffmanTree::from_data(input) else {
        return Ok(Compressed {
            tree: None,
            table: CodeTable::new(),
            block: PackedBlock::default(),
        });
    };
    let table = CodeTable::from_tree(&tree);
    let encoded = codec::encode(input, &table)?;
    let block = encoded.into_packed();
    debug!(
        "encoded {} bytes with {} codes into {} bits",
        input.len(),
        table.len(),
        block.bit_count
    );
    Ok(Compressed {
        tree: Some(tree),
        table,
        block,
    })
}

/// Compress data into a container with default options.
pub fn compress(input: &[u8]) -> HzResult<Vec<u8>> {
    compress_with_options(input, &CompressOptions::default())
}

/// Compress data into a container in the layout named by `options`.
pub fn compress_with_options(input: &[u8], options: &CompressOptions) -> HzResult<Vec<u8>> {
    let parts = compress_parts(input)?;
    let container = Container {
        table: parts.table,
        block: parts.block,
        original_len: Some(input.len() as u64),
        checksum: Some(crc32(input)),
    };
    let output = container.to_bytes(options.format)?;

    if options.verify {
        let restored = decompress(&output)?;
        if restored != input {
            return Err(HzError::ChecksumMismatch {
                expected: crc32(input),
                actual: crc32(&restored),
            });
        }
        debug!("verified {} bytes", restored.len());
    }
    Ok(output)
}

/// Decompress a container produced by `compress` (either layout).
///
/// Length and checksum are checked when the container carries them.
pub fn decompress(input: &[u8]) -> HzResult<Vec<u8>> {
    let container = Container::from_bytes(input)?;
    let output = decode_container(&container)?;

    if let Some(expected) = container.original_len {
        let actual = output.len() as u64;
        if actual != expected {
            return Err(HzError::LengthMismatch { expected, actual });
        }
    }
    if let Some(expected) = container.checksum {
        let actual = crc32(&output);
        if actual != expected {
            return Err(HzError::ChecksumMismatch { expected, actual });
        }
    }
    Ok(output)
}

fn decode_container(container: &Container) -> HzResult<Vec<u8>> {
    if container.table.is_empty() {
        if container.block.bit_count != 0 {
            return Err(HzError::malformed(format!(
                "{} payload bits with an empty code table",
                container.block.bit_count
            )));
        }
        return Ok(Vec::new());
    }
    let tree = HuffmanTree::from_code_table(&container.table)?;
    let encoded = bits::unpack(&container.block)?;
    let output = codec::decode(&encoded, &tree)?;
    debug!(
        "decoded {} bits into {} bytes",
        container.block.bit_count,
        output.len()
    );
    Ok(output)
}

/// Header facts about a container, for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub format: Format,
    pub entries: usize,
    pub bit_count: u64,
    pub compressed_len: u64,
    /// Known up front for v1; legacy containers are decoded to find it.
    pub original_len: u64,
}

impl Summary {
    /// Compressed size as a percentage of the original.
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            0.0
        } else {
            self.compressed_len as f64 / self.original_len as f64 * 100.0
        }
    }
}

/// Describe a container without writing its contents anywhere.
pub fn inspect(input: &[u8]) -> HzResult<Summary> {
    let container = Container::from_bytes(input)?;
    let original_len = match container.original_len {
        Some(len) => len,
        None => decode_container(&container)?.len() as u64,
    };
    Ok(Summary {
        format: container.format(),
        entries: container.table.len(),
        bit_count: container.block.bit_count,
        compressed_len: input.len() as u64,
        original_len,
    })
}
