use crate::archive::format::FORMAT_VERSION;
use crate::archive::reader::{ArchiveReader, ReadOptions};
use crate::archive::writer::write_archive;
use crate::entry::Entry;
use crate::error::{MfafError, Result};
use std::io::{Read, Seek, Write};
use std::path::Path;

/// In-memory archive document
///
/// Holds an ordered sequence of entries; insertion order is the
/// serialization order and survives a save/load round trip. A loaded
/// archive is a plain value — re-serialization rebuilds the image rather
/// than editing it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    entries: Vec<Entry>,
    version: u16,
    flags: u16,
    total_size: Option<u64>,
}

impl Archive {
    /// Create an empty archive, format version 1, no flags
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            version: FORMAT_VERSION,
            flags: 0,
            total_size: None,
        }
    }

    pub(crate) fn from_parts(
        entries: Vec<Entry>,
        version: u16,
        flags: u16,
        total_size: Option<u64>,
    ) -> Self {
        Self {
            entries,
            version,
            flags,
            total_size,
        }
    }

    /// Append an entry, rejecting duplicate names
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        entry.validate()?;
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(MfafError::NameConflict(entry.name));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Append a file from disk, named after its file name
    pub fn add_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .ok_or_else(|| MfafError::Range(format!("path has no file name: {}", path.display())))?
            .to_string_lossy()
            .into_owned();
        self.add_path_as(path, name)
    }

    /// Append a file from disk under an explicit entry name
    pub fn add_path_as<P: AsRef<Path>>(&mut self, path: P, name: impl Into<String>) -> Result<()> {
        let content = std::fs::read(path)?;
        self.add(Entry::new(name, content))
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Entry names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Size of the persisted image this archive was loaded from, if any
    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    /// Write one entry's content into a sink, returning the byte count
    pub fn extract<W: Write>(&self, name: &str, mut sink: W) -> Result<u64> {
        let entry = self
            .get(name)
            .ok_or_else(|| MfafError::EntryNotFound(name.to_string()))?;
        sink.write_all(&entry.content)?;
        Ok(entry.size())
    }

    /// Write one entry's content to a file on disk
    pub fn extract_to_path<P: AsRef<Path>>(&self, name: &str, path: P) -> Result<u64> {
        let entry = self
            .get(name)
            .ok_or_else(|| MfafError::EntryNotFound(name.to_string()))?;
        std::fs::write(path, &entry.content)?;
        Ok(entry.size())
    }

    /// Serialize the archive image into a sink, returning the total size
    pub fn save<W: Write>(&self, sink: W) -> Result<u64> {
        write_archive(sink, &self.entries, self.version, self.flags)
    }

    /// Load and materialize an archive in lenient mode
    pub fn load<R: Read + Seek>(source: R) -> Result<Self> {
        ArchiveReader::open(source)?.into_archive()
    }

    /// Load and materialize an archive
    pub fn load_with<R: Read + Seek>(source: R, options: ReadOptions) -> Result<Self> {
        ArchiveReader::open_with(source, options)?.into_archive()
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new()
    }
}
