//! Low-level storage helpers shared by the persistent term store.

pub mod checksum;

pub use checksum::{Checksum, ChecksumError, ChecksumType};
