//! Header checksum for the persistent term store.
//!
//! The term store's header is checksummed with CRC32 so a truncated or corrupted
//! file is rejected on open instead of silently misread — see
//! [`crate::store::TermStore`].

use crc32fast::Hasher;

/// Checksum algorithm. `CRC32C` is the only variant this crate uses; kept as an enum
/// (rather than a bare function) so a future on-disk format revision can add one
/// without changing every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumType {
    CRC32C,
}

pub struct Checksum;

impl Checksum {
    pub fn compute(checksum_type: ChecksumType, data: &[u8]) -> u32 {
        match checksum_type {
            ChecksumType::CRC32C => {
                let mut hasher = Hasher::new();
                hasher.update(data);
                hasher.finalize()
            }
        }
    }

    pub fn verify(checksum_type: ChecksumType, data: &[u8], expected: u32) -> Result<(), ChecksumError> {
        let actual = Self::compute(checksum_type, data);
        if actual != expected {
            return Err(ChecksumError::Mismatch {
                expected,
                actual,
                data_len: data.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x} (data_len={data_len})")]
    Mismatch {
        expected: u32,
        actual: u32,
        data_len: usize,
    },
}
