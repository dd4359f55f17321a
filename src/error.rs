use std::io;
use thiserror::Error;

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, MfafError>;

/// Unified error type for all archive operations
#[derive(Debug, Error)]
pub enum MfafError {
    #[error("invalid magic number in archive {region}")]
    Magic { region: &'static str },

    #[error("inconsistent size fields: {0}")]
    Size(String),

    #[error("metadata checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    Crc { expected: u32, computed: u32 },

    #[error("invalid entry layout: {0}")]
    Range(String),

    #[error("metadata encoding: {0}")]
    MessagePack(String),

    #[error("unsupported format version or feature: {0}")]
    Version(String),

    #[error("duplicate entry name: {0}")]
    NameConflict(String),

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
