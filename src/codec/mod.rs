//! Event sequence serialization
//!
//! The binary record is the authoritative artifact; the C header is derived
//! from the same sequence and must agree with it value for value.

mod binary;
mod header;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::search::EventSequence;

pub use self::binary::{RecordHeader, decode_binary, decode_header, encode_binary};
pub use self::header::{HeaderOptions, iso8601, render_header};

/// Both artifacts for one event sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub binary: Vec<u8>,
    pub source: String,
}

/// Encode with default header options.
pub fn encode(sequence: &EventSequence) -> Result<Encoded> {
    encode_with(sequence, &HeaderOptions::default())
}

pub fn encode_with(sequence: &EventSequence, options: &HeaderOptions) -> Result<Encoded> {
    Ok(Encoded {
        binary: encode_binary(&sequence.timestamps)?,
        source: render_header(sequence, options),
    })
}

/// Read and decode a binary record from disk.
pub fn read_record(path: &Path) -> Result<Vec<i64>> {
    let bytes = fs::read(path)?;
    decode_binary(&bytes)
}

/// Replace `path` with `contents` in one step
///
/// Writes a sibling temporary file and renames it over the target, so readers
/// never observe a half-written artifact.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    log::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_agrees() {
        let seq = EventSequence::new("perigee", vec![10, 20, 35]);
        let encoded = encode(&seq).unwrap();
        assert_eq!(decode_binary(&encoded.binary).unwrap(), seq.timestamps);
        assert!(encoded.source.contains("10LL, 20LL, 35LL"));
    }

    #[test]
    fn test_write_atomic_round_trip() {
        let dir = std::env::temp_dir().join(format!("almanac-codec-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("apogee.bin");

        let bytes = encode_binary(&[1, 2, 3]).unwrap();
        write_atomic(&path, &bytes).unwrap();
        assert_eq!(read_record(&path).unwrap(), vec![1, 2, 3]);
        assert!(!temp_path(&path).exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_atomic_failure_leaves_no_temp_file() {
        let dir = std::env::temp_dir().join(format!("almanac-codec-fail-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        // Renaming a file over a non-empty directory fails after the write
        let target = dir.join("full_moon.bin");
        fs::create_dir_all(target.join("occupied")).unwrap();
        assert!(write_atomic(&target, b"FRAC").is_err());
        assert!(!temp_path(&target).exists());

        // Writing into a missing directory fails before any rename
        let missing = dir.join("no_such_dir").join("apogee.bin");
        assert!(write_atomic(&missing, b"FRAC").is_err());
        assert!(!temp_path(&missing).exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_temp_path_sibling() {
        let tmp = temp_path(Path::new("/data/out/new_moon.bin"));
        assert_eq!(tmp, Path::new("/data/out/new_moon.bin.tmp"));
    }
}
