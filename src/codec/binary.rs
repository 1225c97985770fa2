//! Binary event record
//!
//! Layout, all little-endian:
//! - offset 0: `u32` magic `0x43415246` ("FRAC")
//! - offset 4: `u32` entry count
//! - offset 8: `u64` reserved, written as zero
//! - offset 16: `i64` timestamps, ascending
//!
//! Total size is `16 + 8 * count` bytes.

use crate::constants::{RECORD_ENTRY_SIZE, RECORD_HEADER_SIZE, RECORD_MAGIC};
use crate::error::{AlmanacError, Result};
use crate::search::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub magic: u32,
    pub entry_count: u32,
    pub reserved: u64,
}

impl RecordHeader {
    /// Byte length of a record with this header
    pub fn record_len(&self) -> usize {
        RECORD_HEADER_SIZE + RECORD_ENTRY_SIZE * self.entry_count as usize
    }
}

/// Encode timestamps into a binary record.
pub fn encode_binary(timestamps: &[Timestamp]) -> Result<Vec<u8>> {
    let count =
        u32::try_from(timestamps.len()).map_err(|_| AlmanacError::TooManyEntries(timestamps.len()))?;

    let mut out = Vec::with_capacity(RECORD_HEADER_SIZE + RECORD_ENTRY_SIZE * timestamps.len());
    out.extend_from_slice(&RECORD_MAGIC.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    for ts in timestamps {
        out.extend_from_slice(&ts.to_le_bytes());
    }
    Ok(out)
}

/// Parse and validate the 16-byte header.
pub fn decode_header(bytes: &[u8]) -> Result<RecordHeader> {
    let header: &[u8; RECORD_HEADER_SIZE] = bytes
        .get(..RECORD_HEADER_SIZE)
        .and_then(|h| h.try_into().ok())
        .ok_or_else(|| {
            AlmanacError::CorruptRecord(format!(
                "need {} header bytes, have {}",
                RECORD_HEADER_SIZE,
                bytes.len()
            ))
        })?;

    let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    if magic != RECORD_MAGIC {
        return Err(AlmanacError::CorruptRecord(format!(
            "bad magic 0x{:08X}, expected 0x{:08X}",
            magic, RECORD_MAGIC
        )));
    }

    let entry_count = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let mut reserved = [0u8; 8];
    reserved.copy_from_slice(&header[8..16]);

    Ok(RecordHeader {
        magic,
        entry_count,
        reserved: u64::from_le_bytes(reserved),
    })
}

/// Decode a complete binary record.
///
/// The total length must be exactly `16 + 8 * entry_count`; there is no
/// partial decode.
pub fn decode_binary(bytes: &[u8]) -> Result<Vec<Timestamp>> {
    let header = decode_header(bytes)?;
    if bytes.len() != header.record_len() {
        return Err(AlmanacError::CorruptRecord(format!(
            "header declares {} entries ({} bytes), record has {} bytes",
            header.entry_count,
            header.record_len(),
            bytes.len()
        )));
    }
    if header.reserved != 0 {
        log::warn!("Reserved header field is 0x{:016X}", header.reserved);
    }

    Ok(bytes[RECORD_HEADER_SIZE..]
        .chunks_exact(RECORD_ENTRY_SIZE)
        .map(|chunk| {
            let mut raw = [0u8; RECORD_ENTRY_SIZE];
            raw.copy_from_slice(chunk);
            Timestamp::from_le_bytes(raw)
        })
        .collect())
}
