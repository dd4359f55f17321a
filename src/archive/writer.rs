use crate::archive::format::{FileHeader, CONTENT_OFFSET};
use crate::archive::metadata::{encode_records, EntryRecord};
use crate::archive::trailer::{Trailer, TRAILER_SIZE};
use crate::entry::Entry;
use crate::error::{MfafError, Result};
use std::collections::HashSet;
use std::io::Write;
use tracing::debug;

/// Encode an archive image into a byte sink
///
/// Single pass, no seeking: offsets are assigned with a running cursor
/// starting at the content region, the metadata array is serialized and
/// checksummed, then the four regions are emitted in stream order
/// (header, content, metadata, trailer). Returns the total image size.
///
/// Fails fast on states only a caller bug can produce (duplicate names,
/// attribute limit violations); a successful write always loads back.
pub(crate) fn write_archive<W: Write>(
    mut sink: W,
    entries: &[Entry],
    version: u16,
    flags: u16,
) -> Result<u64> {
    // Assign offsets in input order, contiguous, no padding
    let mut seen = HashSet::with_capacity(entries.len());
    let mut records = Vec::with_capacity(entries.len());
    let mut cursor = CONTENT_OFFSET;
    for entry in entries {
        entry.validate()?;
        if !seen.insert(entry.name.as_str()) {
            return Err(MfafError::NameConflict(entry.name.clone()));
        }
        records.push(EntryRecord {
            name: entry.name.clone(),
            offset: cursor,
            size: entry.size(),
            mime_type: entry.mime_type.clone(),
            attributes: entry.attributes.clone(),
        });
        cursor = cursor.checked_add(entry.size()).ok_or_else(|| {
            MfafError::Range(format!(
                "entry '{}': total content size overflows",
                entry.name
            ))
        })?;
    }

    let metadata_offset = cursor;
    let metadata = encode_records(&records)?;
    let metadata_end = metadata_offset + metadata.len() as u64;
    let total_size = metadata_end + TRAILER_SIZE as u64;
    let checksum = crc32fast::hash(&metadata);

    let header = FileHeader {
        total_size,
        content_offset: CONTENT_OFFSET,
        metadata_offset,
        file_count: entries.len() as u32,
        version,
        flags,
    };

    header.write_to(&mut sink)?;
    for entry in entries {
        sink.write_all(&entry.content)?;
    }
    sink.write_all(&metadata)?;
    Trailer::new(metadata_end, checksum).write_to(&mut sink)?;
    sink.flush()?;

    debug!(
        total_size,
        file_count = entries.len(),
        metadata_offset,
        metadata_len = metadata.len(),
        "archive written"
    );

    Ok(total_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::format::{FORMAT_VERSION, HEADER_SIZE};
    use crate::archive::trailer::TRAILER_MAGIC;

    #[test]
    fn test_empty_archive_image() {
        let mut buf = Vec::new();
        let total = write_archive(&mut buf, &[], FORMAT_VERSION, 0).unwrap();

        // Header + msgpack empty array + trailer
        assert_eq!(total, (HEADER_SIZE + 1 + TRAILER_SIZE) as u64);
        assert_eq!(buf.len() as u64, total);
        assert_eq!(buf[HEADER_SIZE], 0x90);

        let header = FileHeader::read_from(&buf[..HEADER_SIZE]).unwrap();
        assert_eq!(header.file_count, 0);
        assert_eq!(header.metadata_offset, 64);
        assert_eq!(header.total_size, total);
    }

    #[test]
    fn test_offset_assignment() {
        let entries = vec![
            Entry::new("one", b"AAAA".to_vec()).with_mime_type("text/plain"),
            Entry::new("two", b"BBBBBB".to_vec()),
        ];

        let mut buf = Vec::new();
        write_archive(&mut buf, &entries, FORMAT_VERSION, 0).unwrap();

        let header = FileHeader::read_from(&buf[..HEADER_SIZE]).unwrap();
        assert_eq!(header.metadata_offset, 74);
        assert_eq!(header.file_count, 2);

        // Content region is the raw concatenation
        assert_eq!(&buf[64..68], b"AAAA");
        assert_eq!(&buf[68..74], b"BBBBBB");
    }

    #[test]
    fn test_trailer_checksum_covers_metadata() {
        let entries = vec![Entry::new("a", b"a".to_vec()).with_mime_type("text/plain")];

        let mut buf = Vec::new();
        let total = write_archive(&mut buf, &entries, FORMAT_VERSION, 0).unwrap() as usize;

        let trailer = Trailer::read_from(&buf[total - TRAILER_SIZE..]).unwrap();
        assert_eq!(&buf[total - TRAILER_SIZE..total - TRAILER_SIZE + 8], &TRAILER_MAGIC);

        let metadata = &buf[65..trailer.metadata_end as usize];
        assert_eq!(trailer.checksum, crc32fast::hash(metadata));
    }

    #[test]
    fn test_deterministic_output() {
        let entries = vec![
            Entry::new("x", b"1234".to_vec()).with_attribute("k", "v"),
            Entry::new("y", Vec::new()),
        ];

        let mut first = Vec::new();
        let mut second = Vec::new();
        write_archive(&mut first, &entries, FORMAT_VERSION, 0).unwrap();
        write_archive(&mut second, &entries, FORMAT_VERSION, 0).unwrap();
        assert_eq!(first, second);
    }
}
