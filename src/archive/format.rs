use crate::error::{MfafError, Result};
use std::io::{Read, Write};

/// Magic number at byte 0: "MAFFILE" followed by 0x01
pub const HEADER_MAGIC: [u8; 8] = [0x4D, 0x41, 0x46, 0x46, 0x49, 0x4C, 0x45, 0x01];

/// Current format version
pub const FORMAT_VERSION: u16 = 1;

/// Header size in bytes
pub const HEADER_SIZE: usize = 64;

/// Fixed offset of the content region (immediately after the header)
pub const CONTENT_OFFSET: u64 = 64;

/// Flag bit 0: the content region as a whole is a zstd stream
pub const FLAG_CONTENT_COMPRESSED: u16 = 1 << 0;

/// Flag bit 1: content and metadata regions are AES-256-GCM ciphertext
pub const FLAG_ENCRYPTED: u16 = 1 << 1;

/// Mask of flag bits this implementation recognizes; the rest are reserved
pub const KNOWN_FLAGS: u16 = FLAG_CONTENT_COMPRESSED | FLAG_ENCRYPTED;

/// File header at the beginning of the archive
///
/// Structure (64 bytes fixed, little-endian):
/// - Magic: "MAFFILE\x01" (8 bytes)
/// - Total Size: uint64 (8 bytes)
/// - Content Offset: uint64 (8 bytes, always 64)
/// - Metadata Offset: uint64 (8 bytes)
/// - File Count: uint32 (4 bytes)
/// - Version: uint16 (2 bytes)
/// - Flags: uint16 (2 bytes)
/// - Reserved: 24 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub total_size: u64,
    pub content_offset: u64,
    pub metadata_offset: u64,
    pub file_count: u32,
    pub version: u16,
    pub flags: u16,
}

impl FileHeader {
    pub fn new() -> Self {
        Self {
            total_size: 0,
            content_offset: CONTENT_OFFSET,
            metadata_offset: CONTENT_OFFSET,
            file_count: 0,
            version: FORMAT_VERSION,
            flags: 0,
        }
    }

    /// Write header to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&HEADER_MAGIC)?;
        writer.write_all(&self.total_size.to_le_bytes())?;
        writer.write_all(&self.content_offset.to_le_bytes())?;
        writer.write_all(&self.metadata_offset.to_le_bytes())?;
        writer.write_all(&self.file_count.to_le_bytes())?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;

        // Reserved bytes fill the header out to 64
        writer.write_all(&[0u8; 24])?;

        Ok(())
    }

    /// Read header from a reader
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;

        if magic != HEADER_MAGIC {
            return Err(MfafError::Magic { region: "header" });
        }

        let total_size = read_u64(&mut reader)?;
        let content_offset = read_u64(&mut reader)?;
        let metadata_offset = read_u64(&mut reader)?;
        let file_count = read_u32(&mut reader)?;
        let version = read_u16(&mut reader)?;
        let flags = read_u16(&mut reader)?;

        // Skip reserved bytes
        let mut reserved = [0u8; 24];
        reader.read_exact(&mut reserved)?;

        Ok(Self {
            total_size,
            content_offset,
            metadata_offset,
            file_count,
            version,
            flags,
        })
    }

    /// Validate version and the fixed content offset
    pub fn validate(&self) -> Result<()> {
        if self.version > FORMAT_VERSION {
            return Err(MfafError::Version(format!(
                "format version {} exceeds supported {}",
                self.version, FORMAT_VERSION
            )));
        }
        if self.content_offset != CONTENT_OFFSET {
            return Err(MfafError::Size(format!(
                "content offset must be {}, found {}",
                CONTENT_OFFSET, self.content_offset
            )));
        }
        Ok(())
    }

    /// Flag bits beyond the two defined extensions
    pub fn unknown_flags(&self) -> u16 {
        self.flags & !KNOWN_FLAGS
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for reading primitive types
pub(crate) fn read_u16<R: Read>(mut reader: R) -> Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub(crate) fn read_u32<R: Read>(mut reader: R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_u64<R: Read>(mut reader: R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
