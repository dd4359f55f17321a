/// Basic example demonstrating archive creation and reading
///
/// Run with: cargo run --example basic
use mfaf::{Archive, ArchiveReader, Entry};
use std::error::Error;
use std::fs::File;

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== mfaf Basic Example ===\n");

    println!("1. Creating archive...");
    create_archive()?;

    println!("\n2. Reading from archive...");
    read_archive()?;

    println!("\n✓ Example complete!");
    Ok(())
}

fn create_archive() -> Result<(), Box<dyn Error>> {
    let mut archive = Archive::new();

    archive.add(
        Entry::new(
            "readme.txt",
            b"This is a readme file for the basic example.".to_vec(),
        )
        .with_mime_type("text/plain"),
    )?;
    archive.add(
        Entry::new("notes.md", b"# Notes\n\nThis is a markdown file.".to_vec())
            .with_mime_type("text/markdown")
            .with_attribute("author", "example")
            .with_attribute("revision", 1i64),
    )?;
    archive.add(Entry::new("binary.dat", vec![0u8; 1000]))?;

    let total = archive.save(File::create("example_basic.mfaf")?)?;
    println!("   ✓ Archive created: example_basic.mfaf ({} bytes)", total);

    Ok(())
}

fn read_archive() -> Result<(), Box<dyn Error>> {
    let mut reader = ArchiveReader::open(File::open("example_basic.mfaf")?)?;

    // List all entries
    println!("   Entries in archive:");
    for record in reader.records() {
        println!(
            "     - {} ({} bytes, {})",
            record.name, record.size, record.mime_type
        );
    }

    // Random access by name
    println!("\n   Reading readme.txt:");
    let readme = reader.read("readme.txt")?;
    println!("     {}", String::from_utf8_lossy(&readme));

    println!("\n   Reading notes.md attributes:");
    let record = reader.record("notes.md").expect("entry exists");
    for (key, value) in &record.attributes {
        println!("     {} = {:?}", key, value);
    }

    Ok(())
}
