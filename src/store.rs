//! Persistent, memory-mapped term store.
//!
//! Backed by two sibling files under the index directory:
//!
//! - `terms.values`: a header followed by the NUL-delimited term-value blob, in
//!   insertion order.
//! - `terms.counters`: a flat array of 64-bit occurrence counters, one per term in the
//!   same order, growing by appending one zeroed slot per new term.
//!
//! Keeping counters in their own file means a counter's byte offset, once handed out,
//! never moves: the values file can grow its blob freely without ever touching counter
//! storage, and the counters file only ever grows by appending a whole new slot at its
//! tail. A single interleaved file would force either reserving counter capacity ahead
//! of need or relocating counters (and invalidating offsets already stored in `Term`)
//! whenever the blob outgrew the space before them.
//!
//! New terms become visible to readers via a release/acquire handshake: the value
//! bytes and the zero counter are written and flushed *before* the header's counts are
//! published with a `Release` store; `open` validates the header with an implicit
//! `Acquire` load (the mapping is re-read fresh on every open).

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use memmap2::MmapMut;

use crate::error::{Result, SearchError};
use crate::storage::checksum::{Checksum, ChecksumType};

const MAGIC: &[u8; 4] = b"NXTS";
const FORMAT_VERSION: u32 = 1;
const HEADER_SIZE: u64 = 64;
const COUNTER_SIZE: u64 = 8;

struct HeaderFields {
    magic: [u8; 4],
    version: u32,
    term_count: u64,
    blob_len: u64,
    checksum: u32,
}

impl HeaderFields {
    fn checksummed_bytes(&self) -> [u8; 24] {
        let mut buf = [0u8; 24];
        buf[0..4].copy_from_slice(&self.magic);
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..16].copy_from_slice(&self.term_count.to_le_bytes());
        buf[16..24].copy_from_slice(&self.blob_len.to_le_bytes());
        buf
    }
}

/// A single term read back from the value blob at open time.
pub struct LoadedTerm {
    pub value: String,
    pub term_id: u32,
    pub offset: u64,
}

pub struct TermStore {
    values: MmapMut,
    values_file: std::fs::File,
    counters: MmapMut,
    counters_file: std::fs::File,
}

impl TermStore {
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let values_path = dir.join("terms.values");
        let counters_path = dir.join("terms.counters");

        let values_existed = values_path.exists();
        let values_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&values_path)?;
        let counters_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&counters_path)?;

        if !values_existed || values_file.metadata()?.len() < HEADER_SIZE {
            values_file.set_len(HEADER_SIZE)?;
            let mut values = unsafe { MmapMut::map_mut(&values_file)? };
            Self::write_header(
                &mut values,
                &HeaderFields {
                    magic: *MAGIC,
                    version: FORMAT_VERSION,
                    term_count: 0,
                    blob_len: 0,
                    checksum: 0,
                },
            );
            values.flush()?;
            let counters = unsafe { MmapMut::map_mut(&counters_file)? };
            return Ok(TermStore {
                values,
                values_file,
                counters,
                counters_file,
            });
        }

        let values = unsafe { MmapMut::map_mut(&values_file)? };
        let counters = unsafe { MmapMut::map_mut(&counters_file)? };
        let store = TermStore {
            values,
            values_file,
            counters,
            counters_file,
        };
        store.validate_header()?;
        Ok(store)
    }

    fn write_header(mmap: &mut MmapMut, header: &HeaderFields) {
        let bytes = header.checksummed_bytes();
        let checksum = Checksum::compute(ChecksumType::CRC32C, &bytes);
        mmap[0..4].copy_from_slice(&header.magic);
        mmap[4..8].copy_from_slice(&header.version.to_le_bytes());
        mmap[8..16].copy_from_slice(&header.term_count.to_le_bytes());
        mmap[16..24].copy_from_slice(&header.blob_len.to_le_bytes());
        mmap[24..28].copy_from_slice(&checksum.to_le_bytes());
    }

    fn read_header(&self) -> HeaderFields {
        let m = &self.values;
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&m[0..4]);
        HeaderFields {
            magic,
            version: u32::from_le_bytes(m[4..8].try_into().unwrap()),
            term_count: u64::from_le_bytes(m[8..16].try_into().unwrap()),
            blob_len: u64::from_le_bytes(m[16..24].try_into().unwrap()),
            checksum: u32::from_le_bytes(m[24..28].try_into().unwrap()),
        }
    }

    fn validate_header(&self) -> Result<()> {
        let header = self.read_header();
        if &header.magic != MAGIC {
            return Err(SearchError::Corrupt("bad magic in term store".into()));
        }
        if header.version != FORMAT_VERSION {
            return Err(SearchError::Corrupt(format!(
                "unsupported term store version {}",
                header.version
            )));
        }
        let expected = Checksum::compute(ChecksumType::CRC32C, &header.checksummed_bytes());
        if expected != header.checksum {
            return Err(SearchError::Corrupt(
                "term store header checksum mismatch".into(),
            ));
        }
        if (self.values.len() as u64) < HEADER_SIZE + header.blob_len {
            return Err(SearchError::Corrupt("term store value blob truncated".into()));
        }
        if (self.counters.len() as u64) < header.term_count * COUNTER_SIZE {
            return Err(SearchError::Corrupt(
                "term store counter array truncated".into(),
            ));
        }
        Ok(())
    }

    /// Replays every stored term in insertion order, assigning IDs `1..=term_count`.
    pub fn load_terms(&self) -> Result<Vec<LoadedTerm>> {
        let header = self.read_header();
        let blob_start = HEADER_SIZE as usize;
        let blob_end = blob_start + header.blob_len as usize;
        let blob = &self.values[blob_start..blob_end];

        let mut terms = Vec::with_capacity(header.term_count as usize);
        let mut cursor = 0usize;
        let mut term_id = 0u32;
        while cursor < blob.len() {
            let nul = blob[cursor..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| SearchError::Corrupt("unterminated term value".into()))?;
            let value = std::str::from_utf8(&blob[cursor..cursor + nul])
                .map_err(|e| SearchError::Corrupt(e.to_string()))?
                .to_string();
            term_id += 1;
            let offset = (term_id as u64 - 1) * COUNTER_SIZE;
            terms.push(LoadedTerm {
                value,
                term_id,
                offset,
            });
            cursor += nul + 1;
        }
        Ok(terms)
    }

    /// Appends a new term value, growing both files if needed. Returns the assigned
    /// term ID (1-based, contiguous) and the byte offset of its zero-initialized
    /// counter within the counters file — stable for the life of the store.
    pub fn append(&mut self, value: &str) -> Result<(u32, u64)> {
        if value.is_empty() {
            return Err(SearchError::InvalidArgument("empty term value".into()));
        }
        let header = self.read_header();
        let new_blob_len = header.blob_len + value.len() as u64 + 1;
        let new_term_count = header.term_count + 1;
        let needed_values_len = HEADER_SIZE + new_blob_len;
        let needed_counters_len = new_term_count * COUNTER_SIZE;

        if needed_values_len > self.values.len() as u64 {
            self.values_file
                .set_len(needed_values_len.max(self.values.len() as u64 * 2))?;
            self.values = unsafe { MmapMut::map_mut(&self.values_file)? };
        }
        if needed_counters_len > self.counters.len() as u64 {
            self.counters_file
                .set_len(needed_counters_len.max((self.counters.len() as u64 * 2).max(4096)))?;
            self.counters = unsafe { MmapMut::map_mut(&self.counters_file)? };
        }

        let blob_write_at = (HEADER_SIZE + header.blob_len) as usize;
        self.values[blob_write_at..blob_write_at + value.len()].copy_from_slice(value.as_bytes());
        self.values[blob_write_at + value.len()] = 0;
        self.values.flush_range(blob_write_at, value.len() + 1)?;

        let counter_offset = (new_term_count - 1) * COUNTER_SIZE;
        let counter_at = counter_offset as usize;
        self.counters[counter_at..counter_at + 8].copy_from_slice(&0u64.to_le_bytes());
        self.counters.flush_range(counter_at, 8)?;

        // Publish: a reader that observes the header below is guaranteed to see the
        // value and counter bytes flushed above.
        std::sync::atomic::fence(Ordering::Release);
        Self::write_header(
            &mut self.values,
            &HeaderFields {
                magic: *MAGIC,
                version: FORMAT_VERSION,
                term_count: new_term_count,
                blob_len: new_blob_len,
                checksum: 0,
            },
        );
        self.values.flush_range(0, HEADER_SIZE as usize)?;

        Ok((new_term_count as u32, counter_offset))
    }

    /// Adds `count` to the occurrence counter at `offset` with relaxed ordering: the
    /// counter is a running total, not a synchronization point.
    pub fn incr_counter(&self, offset: u64, count: u64) {
        let ptr = unsafe { self.counters.as_ptr().add(offset as usize) as *const AtomicU64 };
        unsafe { (*ptr).fetch_add(count, Ordering::Relaxed) };
    }

    pub fn read_counter(&self, offset: u64) -> u64 {
        let ptr = unsafe { self.counters.as_ptr().add(offset as usize) as *const AtomicU64 };
        unsafe { (*ptr).load(Ordering::Relaxed) }
    }

    pub fn term_count(&self) -> u64 {
        self.read_header().term_count
    }

    pub fn close(mut self) -> Result<()> {
        self.values.flush()?;
        self.counters.flush()?;
        Ok(())
    }

    pub fn paths(dir: &Path) -> (PathBuf, PathBuf) {
        (dir.join("terms.values"), dir.join("terms.counters"))
    }
}
