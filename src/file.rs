//! Whole-file compression with all-or-nothing output.
//!
//! Output is written to a temporary file next to the destination and
//! renamed into place only after the pipeline succeeds, so a failed run
//! never leaves a partial or truncated destination behind.
use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::pipeline::{self, CompressOptions};
use crate::HzResult;

/// Compress `src` into a container at `dst`. Returns the bytes written.
pub fn compress_file(src: &Path, dst: &Path, options: &CompressOptions) -> HzResult<u64> {
    let input = fs::read(src)?;
    compress_to_file(&input, dst, options)
}

/// Compress data already in memory into a container at `dst`. Returns the
/// bytes written.
pub fn compress_to_file(input: &[u8], dst: &Path, options: &CompressOptions) -> HzResult<u64> {
    let output = pipeline::compress_with_options(input, options)?;
    write_atomic(dst, &output)?;
    debug!(
        "{}: {} -> {} bytes",
        dst.display(),
        input.len(),
        output.len()
    );
    Ok(output.len() as u64)
}

/// Restore the container at `src` into `dst`. Returns the bytes written.
pub fn decompress_file(src: &Path, dst: &Path) -> HzResult<u64> {
    let input = fs::read(src)?;
    let output = pipeline::decompress(&input)?;
    write_atomic(dst, &output)?;
    debug!(
        "{}: {} -> {} bytes",
        src.display(),
        input.len(),
        output.len()
    );
    Ok(output.len() as u64)
}

/// Write `data` to `path`, replacing any existing file only on success.
pub fn write_atomic(path: &Path, data: &[u8]) -> HzResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HzError;
    use tempfile::TempDir;

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("input.txt");
        let packed = dir.path().join("input.txt.hz");
        let restored = dir.path().join("restored.txt");
        let data = b"file round trip through a temporary directory".repeat(20);
        fs::write(&src, &data).unwrap();

        let written = compress_file(&src, &packed, &CompressOptions::default()).unwrap();
        assert_eq!(written, fs::metadata(&packed).unwrap().len());
        assert!(written < data.len() as u64);

        let restored_len = decompress_file(&packed, &restored).unwrap();
        assert_eq!(restored_len, data.len() as u64);
        assert_eq!(fs::read(&restored).unwrap(), data);
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = compress_file(
            &dir.path().join("missing"),
            &dir.path().join("out.hz"),
            &CompressOptions::default(),
        );
        assert!(matches!(result, Err(HzError::Io(_))));
        assert!(!dir.path().join("out.hz").exists());
    }

    #[test]
    fn test_failed_decompress_leaves_destination_untouched() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("bad.hz");
        let dst = dir.path().join("bad");
        fs::write(&src, b"HZ\x01\x00short").unwrap();
        fs::write(&dst, b"previous contents").unwrap();

        assert!(matches!(
            decompress_file(&src, &dst),
            Err(HzError::Malformed(_))
        ));
        assert_eq!(fs::read(&dst).unwrap(), b"previous contents");
        // Only the two files we created remain.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_compress_to_file_matches_compress_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("input");
        let from_path = dir.path().join("a.hz");
        let from_memory = dir.path().join("b.hz");
        let data = b"same bytes, same container".repeat(8);
        fs::write(&src, &data).unwrap();

        let options = CompressOptions::default();
        let a = compress_file(&src, &from_path, &options).unwrap();
        let b = compress_to_file(&data, &from_memory, &options).unwrap();
        assert_eq!(a, b);
        assert_eq!(fs::read(&from_path).unwrap(), fs::read(&from_memory).unwrap());
    }

    #[test]
    fn test_write_atomic_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("target");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"two");
    }
}
