use crate::archive::format::{read_u32, read_u64};
use crate::error::{MfafError, Result};
use std::io::{Read, Write};

/// Magic number opening the trailer: "ENDMAF" followed by two zero bytes
pub const TRAILER_MAGIC: [u8; 8] = [0x45, 0x4E, 0x44, 0x4D, 0x41, 0x46, 0x00, 0x00];

/// Trailer size in bytes (fixed)
pub const TRAILER_SIZE: usize = 64;

/// Archive trailer
///
/// Located at the very end of the archive (last 64 bytes). Carries the
/// metadata region's end offset and checksum so readers can locate and
/// verify the metadata by seeking to the end of the file.
///
/// Structure (64 bytes fixed, little-endian):
/// - Magic: "ENDMAF\x00\x00" (8 bytes)
/// - Metadata End: uint64 (8 bytes)
/// - Checksum: uint32 (4 bytes, CRC-32/IEEE over the metadata region)
/// - Reserved: 44 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
    pub metadata_end: u64,
    pub checksum: u32,
}

impl Trailer {
    pub fn new(metadata_end: u64, checksum: u32) -> Self {
        Self {
            metadata_end,
            checksum,
        }
    }

    /// Write trailer to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&TRAILER_MAGIC)?;
        writer.write_all(&self.metadata_end.to_le_bytes())?;
        writer.write_all(&self.checksum.to_le_bytes())?;

        // Reserved bytes fill the trailer out to 64
        writer.write_all(&[0u8; 44])?;

        Ok(())
    }

    /// Read trailer from a reader
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;

        if magic != TRAILER_MAGIC {
            return Err(MfafError::Magic { region: "trailer" });
        }

        let metadata_end = read_u64(&mut reader)?;
        let checksum = read_u32(&mut reader)?;

        // Skip reserved bytes
        let mut reserved = [0u8; 44];
        reader.read_exact(&mut reserved)?;

        Ok(Self {
            metadata_end,
            checksum,
        })
    }
}
