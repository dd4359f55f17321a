use crate::archive::format::CONTENT_OFFSET;
use crate::entry::{validate_attributes, AttrValue, DEFAULT_MIME_TYPE};
use crate::error::{MfafError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Per-entry descriptor as stored in the metadata region
///
/// The metadata region is a single MessagePack array of these maps. Keys are
/// the short strings `n`/`o`/`s`/`m`/`a`; `n`, `o` and `s` are required,
/// `m` and `a` fall back to their defaults when absent. Unknown keys are
/// ignored on decode and never re-emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(rename = "n")]
    pub name: String,

    #[serde(rename = "o")]
    pub offset: u64,

    #[serde(rename = "s")]
    pub size: u64,

    #[serde(rename = "m", default = "default_mime_type")]
    pub mime_type: String,

    #[serde(rename = "a", default)]
    pub attributes: BTreeMap<String, AttrValue>,
}

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.to_string()
}

impl EntryRecord {
    /// Half-open content range end; errors if offset + size overflows
    pub fn end(&self) -> Result<u64> {
        self.offset.checked_add(self.size).ok_or_else(|| {
            MfafError::Range(format!(
                "entry '{}': offset {} + size {} overflows",
                self.name, self.offset, self.size
            ))
        })
    }
}

/// Serialize the metadata array
///
/// The canonical encoder always emits all five keys, so a zero-entry
/// archive serializes to the one-byte empty array.
pub fn encode_records(records: &[EntryRecord]) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(records).map_err(|e| MfafError::MessagePack(e.to_string()))
}

/// Deserialize the metadata array
pub fn decode_records(bytes: &[u8]) -> Result<Vec<EntryRecord>> {
    rmp_serde::from_slice(bytes).map_err(|e| MfafError::MessagePack(e.to_string()))
}

/// Validate decoded records against the archive layout
///
/// Checks names (non-empty, unique), content ranges (within
/// `[64, metadata_offset)`, no overflow, pairwise disjoint) and attribute
/// constraints. Zero-size entries are exempt from the overlap scan because
/// their half-open range is empty.
pub fn validate_records(records: &[EntryRecord], metadata_offset: u64) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut ranges = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if record.name.is_empty() {
            return Err(MfafError::Range(format!(
                "entry {}: name must be non-empty",
                index
            )));
        }
        if !seen.insert(record.name.as_str()) {
            return Err(MfafError::Range(format!(
                "duplicate entry name in metadata: {}",
                record.name
            )));
        }

        let end = record.end()?;
        if record.offset < CONTENT_OFFSET || end > metadata_offset {
            return Err(MfafError::Range(format!(
                "entry '{}': range [{}, {}) outside content region [{}, {})",
                record.name, record.offset, end, CONTENT_OFFSET, metadata_offset
            )));
        }

        validate_attributes(&record.attributes)?;

        if record.size > 0 {
            ranges.push((record.offset, end, record.name.as_str()));
        }
    }

    ranges.sort_unstable();
    for pair in ranges.windows(2) {
        let (_, prev_end, prev_name) = pair[0];
        let (next_start, _, next_name) = pair[1];
        if next_start < prev_end {
            return Err(MfafError::Range(format!(
                "entries '{}' and '{}' have overlapping content ranges",
                prev_name, next_name
            )));
        }
    }

    Ok(())
}
