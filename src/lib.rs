//! mfaf: single-file multi-entry archive container
//!
//! An archive aggregates named byte streams with per-entry metadata inside
//! one file: a fixed 64-byte header, the raw content region, a
//! MessagePack-encoded metadata array, and a fixed 64-byte trailer carrying
//! a CRC-32 over the metadata. The format supports:
//! - Random access to entry content without reading the whole file
//! - Integrity verification of the metadata region
//! - Forward compatibility (unknown metadata keys are ignored)
//!
//! # Example
//!
//! ```
//! use mfaf::{Archive, Entry};
//! use std::io::Cursor;
//!
//! let mut archive = Archive::new();
//! archive.add(Entry::new("greeting.txt", b"Hello, World!".to_vec())
//!     .with_mime_type("text/plain"))?;
//!
//! let mut image = Vec::new();
//! archive.save(&mut image)?;
//!
//! let loaded = Archive::load(Cursor::new(image))?;
//! assert_eq!(loaded.get("greeting.txt").unwrap().content, b"Hello, World!");
//! # Ok::<(), mfaf::MfafError>(())
//! ```

// Core modules
pub mod archive;
pub mod entry;
pub mod error;

// Re-export commonly used types
pub use archive::{
    Archive, ArchiveReader, EntryRecord, FileHeader, ReadOptions, Trailer, CONTENT_OFFSET,
    FLAG_CONTENT_COMPRESSED, FLAG_ENCRYPTED, FORMAT_VERSION, HEADER_MAGIC, HEADER_SIZE,
    KNOWN_FLAGS, TRAILER_MAGIC, TRAILER_SIZE,
};
pub use entry::{AttrValue, Entry, DEFAULT_MIME_TYPE, MAX_ATTRIBUTE_DEPTH, MAX_ATTRIBUTE_KEY_LENGTH};
pub use error::{MfafError, Result};
