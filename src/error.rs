//! Error types for the search engine core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("out of memory")]
    OutOfMemory,

    #[error("capacity exceeded: {0}")]
    Capacity(String),

    #[error("already exists: {0}")]
    Exists(String),

    #[error("duplicate term: {0}")]
    Duplicate(String),

    #[error("duplicate document: {0}")]
    DuplicateDoc(u64),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    #[error("unknown term id: {0}")]
    UnknownTerm(u32),

    #[error("filter initialization failed: {0}")]
    FilterInit(String),

    #[error("filter runtime error: {0}")]
    FilterRuntime(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<bincode::Error> for SearchError {
    fn from(err: bincode::Error) -> Self {
        SearchError::Corrupt(err.to_string())
    }
}
