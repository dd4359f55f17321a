#![no_main]

use libfuzzer_sys::fuzz_target;
use mfaf::ArchiveReader;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Try to open the archive - should never panic
    let mut reader = match ArchiveReader::open(Cursor::new(data)) {
        Ok(r) => r,
        Err(_) => return, // Expected for invalid data
    };

    // A successful parse must expose consistent accessors, and content
    // reads must not panic either
    let names: Vec<String> = reader.names().iter().map(|s| s.to_string()).collect();
    assert_eq!(names.len(), reader.entry_count());

    for name in &names {
        assert!(reader.contains(name));
        let _ = reader.read(name);
    }
});
