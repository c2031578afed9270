//! # Register Core
//!
//! A synchronization library for the full Ukrainian business-registry XML
//! export: streams company records out of the snapshot and reconciles them
//! against a relational store.
//!
//! ## Features
//!
//! - **Streaming XML ingestion**: `<SUBJECT>` records pulled off any `BufRead`
//! - **Collection reconciliation**: unchanged records produce zero writes;
//!   changed rows are saved with their changed-field lists, dropped rows are
//!   soft-deleted
//! - **Free-text extraction**: founder, beneficiary and equity data recovered
//!   from the registry's unstructured fields
//! - **Batched writes**: chunked bulk inserts with deferred company-id
//!   backfill for child rows
//! - **Storage abstraction**: database-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use register_core::{Converter, XmlRecordReader, utils::MemoryStorage};
//!
//! let xml = r#"<DATA><SUBJECT><NAME>ТОВ РОМАШКА</NAME>
//!     <EDRPOU>12345678</EDRPOU></SUBJECT></DATA>"#;
//! let records: Vec<_> = XmlRecordReader::new(xml.as_bytes())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! let mut converter = Converter::new(MemoryStorage::new()).unwrap();
//! converter.process_batch(&records).unwrap();
//! ```

pub mod converter;
pub mod extract;
pub mod models;
pub mod record;
pub mod traits;
pub mod types;
pub mod utils;
pub mod xml;

// Re-export commonly used types
pub use converter::*;
pub use models::*;
pub use record::*;
pub use traits::*;
pub use types::*;
pub use xml::XmlRecordReader;
