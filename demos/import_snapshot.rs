//! Import a registry XML snapshot into the in-memory store.
//!
//! Usage: `cargo run --example import_snapshot -- path/to/snapshot.xml`
//!
//! Reads the export in chunks, reconciles each chunk and prints the write
//! volume at the end. Point `RUST_LOG=debug` at it to watch skipped records.

use std::fs::File;
use std::io::BufReader;

use register_core::{utils::MemoryStorage, Converter, XmlRecordReader, DEFAULT_CHUNK_SIZE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: import_snapshot <snapshot.xml>")?;

    let file = File::open(&path)?;
    let mut reader = XmlRecordReader::new(BufReader::new(file));
    let mut converter = Converter::new(MemoryStorage::new())?;

    let mut total = 0usize;
    loop {
        let chunk = reader.read_chunk(DEFAULT_CHUNK_SIZE)?;
        if chunk.is_empty() {
            break;
        }
        total += chunk.len();
        converter.process_batch(&chunk)?;
    }

    let stats = converter.storage().stats();
    println!("records processed: {total}");
    println!(
        "inserts: {}, saves: {}, soft deletes: {}",
        stats.inserts, stats.saves, stats.soft_deletes
    );
    Ok(())
}
