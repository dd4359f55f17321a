//! Corruption detection tests
//!
//! Each case takes a valid image, damages one region, and checks the
//! decoder rejects it with the matching error kind.

use mfaf::{Archive, Entry, FileHeader, MfafError, HEADER_SIZE, TRAILER_SIZE};
use std::io::Cursor;

/// Helper: build a valid two-entry image
fn valid_image() -> Vec<u8> {
    let mut archive = Archive::new();
    archive
        .add(Entry::new("test.txt", b"Hello, World!".to_vec()).with_mime_type("text/plain"))
        .unwrap();
    archive
        .add(Entry::new("data.bin", vec![0xAB; 256]))
        .unwrap();

    let mut image = Vec::new();
    archive.save(&mut image).unwrap();
    image
}

fn load(image: Vec<u8>) -> mfaf::Result<Archive> {
    Archive::load(Cursor::new(image))
}

#[test]
fn test_corrupted_header_magic() {
    let mut image = valid_image();
    image[0] = 0xFF;

    let result = load(image);
    assert!(matches!(result, Err(MfafError::Magic { region: "header" })));
}

#[test]
fn test_corrupted_trailer_magic() {
    let mut image = valid_image();
    let trailer_start = image.len() - TRAILER_SIZE;
    for byte in &mut image[trailer_start..trailer_start + 8] {
        *byte = 0;
    }

    let result = load(image);
    assert!(matches!(result, Err(MfafError::Magic { region: "trailer" })));
}

#[test]
fn test_metadata_bit_flip_detected_by_crc() {
    let image = valid_image();
    let header = FileHeader::read_from(&image[..HEADER_SIZE]).unwrap();
    let metadata_offset = header.metadata_offset as usize;
    let metadata_end = image.len() - TRAILER_SIZE;

    // Flip one bit in every metadata byte position, one at a time
    for position in [metadata_offset, (metadata_offset + metadata_end) / 2, metadata_end - 1] {
        let mut corrupted = image.clone();
        corrupted[position] ^= 0x01;

        let result = load(corrupted);
        assert!(
            matches!(result, Err(MfafError::Crc { .. })),
            "bit flip at {} not detected",
            position
        );
    }
}

#[test]
fn test_content_region_not_covered_by_checksum() {
    // The integrity band covers only the metadata region; content damage
    // loads fine but yields different bytes.
    let mut image = valid_image();
    image[64] ^= 0xFF;

    let loaded = load(image).unwrap();
    assert_ne!(loaded.get("test.txt").unwrap().content, b"Hello, World!");
}

#[test]
fn test_wrong_total_size() {
    let mut image = valid_image();
    let wrong = (image.len() as u64 + 1).to_le_bytes();
    image[8..16].copy_from_slice(&wrong);

    let result = load(image);
    assert!(matches!(result, Err(MfafError::Size(_))));
}

#[test]
fn test_wrong_content_offset() {
    let mut image = valid_image();
    image[16..24].copy_from_slice(&128u64.to_le_bytes());

    let result = load(image);
    assert!(matches!(result, Err(MfafError::Size(_))));
}

#[test]
fn test_wrong_file_count() {
    let mut image = valid_image();
    image[32..36].copy_from_slice(&9u32.to_le_bytes());

    let result = load(image);
    assert!(matches!(result, Err(MfafError::Size(_))));
}

#[test]
fn test_unsupported_version() {
    let mut image = valid_image();
    image[36..38].copy_from_slice(&2u16.to_le_bytes());

    let result = load(image);
    assert!(matches!(result, Err(MfafError::Version(_))));
}

#[test]
fn test_truncated_below_minimum() {
    let mut image = valid_image();
    image.truncate(100);

    let result = load(image);
    assert!(matches!(result, Err(MfafError::Size(_))));
}

#[test]
fn test_truncated_tail() {
    let mut image = valid_image();
    let len = image.len();
    image.truncate(len - 10);

    // The trailer window shifts into the metadata region, so either the
    // trailer magic or the size cross-check trips first.
    let result = load(image);
    assert!(matches!(
        result,
        Err(MfafError::Magic { .. }) | Err(MfafError::Size(_))
    ));
}

#[test]
fn test_empty_input() {
    let result = load(Vec::new());
    assert!(matches!(result, Err(MfafError::Size(_))));
}

#[test]
fn test_random_bytes() {
    let image: Vec<u8> = (0..1024).map(|i| (i * 17 + 42) as u8).collect();

    let result = load(image);
    assert!(result.is_err());
}

#[test]
fn test_metadata_offset_past_metadata_end() {
    let mut image = valid_image();
    let metadata_end = (image.len() - TRAILER_SIZE) as u64;
    image[24..32].copy_from_slice(&(metadata_end + 1).to_le_bytes());

    let result = load(image);
    assert!(matches!(result, Err(MfafError::Size(_))));
}

#[test]
fn test_garbage_metadata_with_matching_crc() {
    // A checksum that matches garbage still fails MessagePack decoding
    let mut archive = Archive::new();
    archive.add(Entry::new("a", Vec::new())).unwrap();
    let mut image = Vec::new();
    archive.save(&mut image).unwrap();

    let header = FileHeader::read_from(&image[..HEADER_SIZE]).unwrap();
    let metadata_offset = header.metadata_offset as usize;
    let metadata_end = image.len() - TRAILER_SIZE;

    for byte in &mut image[metadata_offset..metadata_end] {
        *byte = 0xC1; // never a valid MessagePack leading byte
    }
    let checksum = crc32fast::hash(&image[metadata_offset..metadata_end]);
    let crc_pos = metadata_end + 16;
    image[crc_pos..crc_pos + 4].copy_from_slice(&checksum.to_le_bytes());

    let result = load(image);
    assert!(matches!(result, Err(MfafError::MessagePack(_))));
}
