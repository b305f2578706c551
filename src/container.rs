//! On-disk container for a code table and its packed bit stream.
//!
//! **Format v1** (all integers little-endian):
//! - Magic bytes: `HZ` (2 bytes)
//! - Version: 1 (1 byte)
//! - Flags: 0 (1 byte, reserved)
//! - CRC-32 of the original data (4 bytes)
//! - Original length in bytes (8 bytes)
//! - Total valid bits in the payload (8 bytes)
//! - Code table entry count, 0..=256 (4 bytes)
//! - Per entry: symbol (1 byte), code length `n` (4 bytes), `n` ASCII
//!   `'0'`/`'1'` bytes
//! - Payload: exactly `ceil(total_bits / 8)` bytes
//!
//! **Legacy format**: the header-less layout written by the original tool.
//! Total bits (i32), entry count (i32), entries with an i32 code length,
//! then the payload filling the rest of the file. It carries no checksum
//! and no original length.
use log::{debug, warn};

use crate::bits::PackedBlock;
use crate::codes::{Code, CodeTable};
use crate::{HzError, HzResult};

/// Magic bytes for the hz container format.
pub const MAGIC: [u8; 2] = *b"HZ";
/// Format version.
pub const VERSION: u8 = 1;

/// magic(2) + version(1) + flags(1) + crc(4) + orig_len(8) + bits(8) + entries(4)
const HEADER_SIZE: usize = 28;
/// bits(4) + entries(4)
const LEGACY_HEADER_SIZE: usize = 8;

const MAX_ENTRIES: u64 = 256;

/// Container layouts this crate reads and writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Versioned layout with magic, length and checksum.
    #[default]
    Hz,
    /// Reference layout with no header, kept for interop.
    Legacy,
}

/// Guess the layout of `data` from its first bytes.
///
/// Anything without the `HZ` magic is treated as legacy; the legacy layout
/// has no signature of its own. A legacy bit count can also start with the
/// magic bytes, so this is only a first guess: [`Container::from_bytes`]
/// falls back to legacy when such data does not parse as v1.
pub fn detect_format(data: &[u8]) -> Format {
    if data.len() >= MAGIC.len() && data[..MAGIC.len()] == MAGIC {
        Format::Hz
    } else {
        Format::Legacy
    }
}

/// Everything persisted for one compressed payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    pub table: CodeTable,
    pub block: PackedBlock,
    /// Length of the original data; absent in legacy containers.
    pub original_len: Option<u64>,
    /// CRC-32 of the original data; absent in legacy containers.
    pub checksum: Option<u32>,
}

impl Container {
    /// Serialize in the requested layout.
    ///
    /// Legacy output drops `original_len` and `checksum`, and fails with
    /// [`HzError::Unsupported`] when the bit count does not fit an `i32`.
    pub fn to_bytes(&self, format: Format) -> HzResult<Vec<u8>> {
        let table_size: usize = self.table.iter().map(|(_, c)| 5 + c.len()).sum();
        let mut out = Vec::with_capacity(HEADER_SIZE + table_size + self.block.bytes.len());

        match format {
            Format::Hz => {
                out.extend_from_slice(&MAGIC);
                out.push(VERSION);
                out.push(0);
                out.extend_from_slice(&self.checksum.unwrap_or(0).to_le_bytes());
                out.extend_from_slice(&self.original_len.unwrap_or(0).to_le_bytes());
                out.extend_from_slice(&self.block.bit_count.to_le_bytes());
                out.extend_from_slice(&(self.table.len() as u32).to_le_bytes());
                for (symbol, code) in self.table.iter() {
                    out.push(symbol);
                    out.extend_from_slice(&(code.len() as u32).to_le_bytes());
                    out.extend_from_slice(&code.to_ascii());
                }
            }
            Format::Legacy => {
                let bits = i32::try_from(self.block.bit_count).map_err(|_| {
                    HzError::Unsupported(format!(
                        "{} bits do not fit the legacy format",
                        self.block.bit_count
                    ))
                })?;
                out.extend_from_slice(&bits.to_le_bytes());
                out.extend_from_slice(&(self.table.len() as i32).to_le_bytes());
                for (symbol, code) in self.table.iter() {
                    out.push(symbol);
                    out.extend_from_slice(&(code.len() as i32).to_le_bytes());
                    out.extend_from_slice(&code.to_ascii());
                }
            }
        }

        out.extend_from_slice(&self.block.bytes);
        debug!(
            "container ({:?}): {} entries, {} bits, {} bytes",
            format,
            self.table.len(),
            self.block.bit_count,
            out.len()
        );
        Ok(out)
    }

    /// Parse a container, detecting its layout from the magic bytes.
    ///
    /// Data carrying the magic that fails to parse as v1 is retried as
    /// legacy; if that fails too, the v1 error is returned.
    pub fn from_bytes(data: &[u8]) -> HzResult<Self> {
        match detect_format(data) {
            Format::Hz => Self::parse_hz(data).or_else(|err| match Self::parse_legacy(data) {
                Ok(container) => {
                    warn!("not a v1 container ({err}); read as legacy instead");
                    Ok(container)
                }
                Err(_) => Err(err),
            }),
            Format::Legacy => {
                warn!("reading legacy container: no checksum or length to verify");
                Self::parse_legacy(data)
            }
        }
    }

    /// Layout this container was read from: only v1 records a length.
    pub fn format(&self) -> Format {
        if self.original_len.is_some() {
            Format::Hz
        } else {
            Format::Legacy
        }
    }

    fn parse_hz(data: &[u8]) -> HzResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(HzError::malformed(format!(
                "header needs {HEADER_SIZE} bytes, found {}",
                data.len()
            )));
        }
        let mut r = Reader::new(data);
        r.take(MAGIC.len(), "magic")?;
        let version = r.u8("version")?;
        if version != VERSION {
            return Err(HzError::Unsupported(format!("container version {version}")));
        }
        let flags = r.u8("flags")?;
        if flags != 0 {
            return Err(HzError::Unsupported(format!("container flags 0x{flags:02x}")));
        }
        let checksum = r.u32("checksum")?;
        let original_len = r.u64("original length")?;
        let bit_count = r.u64("bit count")?;
        let entries = r.u32("entry count")? as u64;
        let table = read_table(&mut r, entries, |r| r.u32("code length").map(u64::from))?;
        let block = read_payload(r.rest(), bit_count)?;

        Ok(Container {
            table,
            block,
            original_len: Some(original_len),
            checksum: Some(checksum),
        })
    }

    fn parse_legacy(data: &[u8]) -> HzResult<Self> {
        if data.len() < LEGACY_HEADER_SIZE {
            return Err(HzError::malformed(format!(
                "legacy header needs {LEGACY_HEADER_SIZE} bytes, found {}",
                data.len()
            )));
        }
        let mut r = Reader::new(data);
        let bit_count = r.non_negative("bit count")?;
        let entries = r.non_negative("entry count")?;
        let table = read_table(&mut r, entries, |r| r.non_negative("code length"))?;
        let block = read_payload(r.rest(), bit_count)?;

        Ok(Container {
            table,
            block,
            original_len: None,
            checksum: None,
        })
    }
}

fn read_table(
    r: &mut Reader<'_>,
    entries: u64,
    mut code_len: impl FnMut(&mut Reader<'_>) -> HzResult<u64>,
) -> HzResult<CodeTable> {
    if entries > MAX_ENTRIES {
        return Err(HzError::malformed(format!(
            "{entries} code table entries (at most {MAX_ENTRIES})"
        )));
    }
    let mut table = CodeTable::new();
    for i in 0..entries {
        let symbol = r.u8("entry symbol")?;
        let len = code_len(r)?;
        let len = usize::try_from(len)
            .map_err(|_| HzError::malformed(format!("entry {i}: code length {len}")))?;
        let code = Code::from_ascii(r.take(len, "code")?)?;
        if table.insert(symbol, code).is_some() {
            return Err(HzError::malformed(format!(
                "symbol 0x{symbol:02x} appears twice in the code table"
            )));
        }
    }
    if !table.is_prefix_free() {
        return Err(HzError::malformed("code table is not prefix-free"));
    }
    Ok(table)
}

fn read_payload(payload: &[u8], bit_count: u64) -> HzResult<PackedBlock> {
    let needed = PackedBlock::byte_len(bit_count);
    let found = payload.len() as u64;
    if found < needed {
        return Err(HzError::malformed(format!(
            "{bit_count} bits need {needed} payload bytes, found {found}"
        )));
    }
    if found > needed {
        return Err(HzError::malformed(format!(
            "{} trailing bytes after payload",
            found - needed
        )));
    }
    Ok(PackedBlock {
        bytes: payload.to_vec(),
        bit_count,
    })
}

/// Bounds-checked little-endian reader over the container bytes.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    fn take(&mut self, n: usize, what: &str) -> HzResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                HzError::malformed(format!(
                    "truncated {what}: need {n} bytes at offset {}, {} left",
                    self.pos,
                    self.data.len() - self.pos
                ))
            })?;
        let data: &'a [u8] = self.data;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, what: &str) -> HzResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N, what)?);
        Ok(buf)
    }

    fn u8(&mut self, what: &str) -> HzResult<u8> {
        Ok(self.array::<1>(what)?[0])
    }

    fn u32(&mut self, what: &str) -> HzResult<u32> {
        self.array(what).map(u32::from_le_bytes)
    }

    fn u64(&mut self, what: &str) -> HzResult<u64> {
        self.array(what).map(u64::from_le_bytes)
    }

    fn non_negative(&mut self, what: &str) -> HzResult<u64> {
        let v = i32::from_le_bytes(self.array(what)?);
        u64::try_from(v).map_err(|_| HzError::malformed(format!("negative {what}: {v}")))
    }

    fn rest(self) -> &'a [u8] {
        let data: &'a [u8] = self.data;
        &data[self.pos..]
    }
}
