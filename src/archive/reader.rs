use crate::archive::container::Archive;
use crate::archive::format::{FileHeader, CONTENT_OFFSET, HEADER_SIZE};
use crate::archive::metadata::{decode_records, validate_records, EntryRecord};
use crate::archive::trailer::{Trailer, TRAILER_SIZE};
use crate::entry::Entry;
use crate::error::{MfafError, Result};
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom, Write};
use tracing::warn;

/// Decode-time options
///
/// In strict mode, unknown flag bits and non-zero reserved bytes reject the
/// archive instead of producing a warning; both indicate a newer format
/// revision than this implementation understands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub strict: bool,
}

/// Validating archive decoder with lazy random access
///
/// Opening performs the full validation pass (sentinels, version, size
/// cross-checks, metadata CRC, per-entry layout). Content is then served
/// by positional reads against the retained source, so only the metadata
/// lives in memory. Concurrent use from multiple threads requires a source
/// with its own positional-read support; this handle seeks.
pub struct ArchiveReader<R> {
    source: R,
    header: FileHeader,
    trailer: Trailer,
    records: Vec<EntryRecord>,
    index: HashMap<String, usize>,
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Open and validate an archive in lenient mode
    pub fn open(source: R) -> Result<Self> {
        Self::open_with(source, ReadOptions::default())
    }

    /// Open and validate an archive
    pub fn open_with(mut source: R, options: ReadOptions) -> Result<Self> {
        let len = source.seek(SeekFrom::End(0))?;
        if len < (HEADER_SIZE + TRAILER_SIZE) as u64 {
            return Err(MfafError::Size(format!(
                "file too small for header and trailer: {} bytes",
                len
            )));
        }

        // Trailer first: it carries the metadata boundary
        source.seek(SeekFrom::Start(len - TRAILER_SIZE as u64))?;
        let mut trailer_block = [0u8; TRAILER_SIZE];
        source.read_exact(&mut trailer_block)?;
        let trailer = Trailer::read_from(&trailer_block[..])?;
        check_reserved(&trailer_block[20..], "trailer", options.strict)?;

        source.seek(SeekFrom::Start(0))?;
        let mut header_block = [0u8; HEADER_SIZE];
        source.read_exact(&mut header_block)?;
        let header = FileHeader::read_from(&header_block[..])?;
        header.validate()?;
        check_reserved(&header_block[40..], "header", options.strict)?;

        let unknown = header.unknown_flags();
        if unknown != 0 {
            if options.strict {
                return Err(MfafError::Version(format!(
                    "unknown flag bits set: {unknown:#06x}"
                )));
            }
            warn!(flags = header.flags, "ignoring unknown flag bits");
        }

        // Cross-check the interdependent size fields against the real length
        if header.total_size != len {
            return Err(MfafError::Size(format!(
                "header total size {} does not match file length {}",
                header.total_size, len
            )));
        }
        if trailer.metadata_end.checked_add(TRAILER_SIZE as u64) != Some(len) {
            return Err(MfafError::Size(format!(
                "metadata end {} inconsistent with file length {}",
                trailer.metadata_end, len
            )));
        }
        if header.metadata_offset < CONTENT_OFFSET || header.metadata_offset > trailer.metadata_end
        {
            return Err(MfafError::Size(format!(
                "metadata offset {} outside [{}, {}]",
                header.metadata_offset, CONTENT_OFFSET, trailer.metadata_end
            )));
        }

        let metadata_len = (trailer.metadata_end - header.metadata_offset) as usize;
        source.seek(SeekFrom::Start(header.metadata_offset))?;
        let mut metadata = vec![0u8; metadata_len];
        source.read_exact(&mut metadata)?;

        let computed = crc32fast::hash(&metadata);
        if computed != trailer.checksum {
            return Err(MfafError::Crc {
                expected: trailer.checksum,
                computed,
            });
        }

        let records = decode_records(&metadata)?;
        validate_records(&records, header.metadata_offset)?;

        if records.len() != header.file_count as usize {
            return Err(MfafError::Size(format!(
                "file count mismatch: header says {}, metadata has {}",
                header.file_count,
                records.len()
            )));
        }

        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();

        Ok(Self {
            source,
            header,
            trailer,
            records,
            index,
        })
    }

    /// Parsed header
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    pub fn flags(&self) -> u16 {
        self.header.flags
    }

    /// Total size of the archive image in bytes
    pub fn total_size(&self) -> u64 {
        self.header.total_size
    }

    pub fn entry_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entry names in metadata order
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entry descriptor without reading content
    pub fn record(&self, name: &str) -> Option<&EntryRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// All entry descriptors in metadata order
    pub fn records(&self) -> &[EntryRecord] {
        &self.records
    }

    /// Read one entry's content by name
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| MfafError::EntryNotFound(name.to_string()))?;
        self.read_at(index)
    }

    /// Read one entry's content by position
    pub fn read_at(&mut self, index: usize) -> Result<Vec<u8>> {
        let record = self.records.get(index).ok_or_else(|| {
            MfafError::Range(format!(
                "entry index {} out of bounds ({} entries)",
                index,
                self.records.len()
            ))
        })?;

        let mut content = vec![0u8; record.size as usize];
        self.source.seek(SeekFrom::Start(record.offset))?;
        self.source.read_exact(&mut content)?;
        Ok(content)
    }

    /// Copy one entry's content into a sink, returning the byte count
    pub fn extract_to<W: Write>(&mut self, name: &str, mut sink: W) -> Result<u64> {
        let content = self.read(name)?;
        sink.write_all(&content)?;
        Ok(content.len() as u64)
    }

    /// Materialize every entry and return the in-memory archive
    pub fn into_archive(mut self) -> Result<Archive> {
        let mut entries = Vec::with_capacity(self.records.len());
        for index in 0..self.records.len() {
            let content = self.read_at(index)?;
            let record = &self.records[index];
            entries.push(Entry {
                name: record.name.clone(),
                content,
                mime_type: record.mime_type.clone(),
                attributes: record.attributes.clone(),
            });
        }
        Ok(Archive::from_parts(
            entries,
            self.header.version,
            self.header.flags,
            Some(self.header.total_size),
        ))
    }

    /// Consume the reader, returning the underlying source
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Parsed trailer
    pub fn trailer(&self) -> &Trailer {
        &self.trailer
    }
}

fn check_reserved(reserved: &[u8], region: &'static str, strict: bool) -> Result<()> {
    if reserved.iter().all(|&b| b == 0) {
        return Ok(());
    }
    if strict {
        return Err(MfafError::Version(format!(
            "reserved bytes in {} are not zero",
            region
        )));
    }
    warn!(region, "ignoring non-zero reserved bytes");
    Ok(())
}
