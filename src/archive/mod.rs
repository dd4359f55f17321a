mod container;
mod format;
mod metadata;
mod reader;
mod trailer;
mod writer;

pub use container::Archive;
pub use format::{
    FileHeader, CONTENT_OFFSET, FLAG_CONTENT_COMPRESSED, FLAG_ENCRYPTED, FORMAT_VERSION,
    HEADER_MAGIC, HEADER_SIZE, KNOWN_FLAGS,
};
pub use metadata::EntryRecord;
pub use reader::{ArchiveReader, ReadOptions};
pub use trailer::{Trailer, TRAILER_MAGIC, TRAILER_SIZE};
