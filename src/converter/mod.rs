//! Registry record conversion engine
//!
//! Takes parsed registry records and reconciles them against the backing
//! store: new companies are batch-inserted together with their child rows,
//! existing companies are diffed collection by collection so an unchanged
//! record produces no writes at all.

pub mod buffer;
pub mod core;
pub mod diff;
pub mod refdata;

pub use buffer::{WriteBuffer, DEFAULT_CHUNK_SIZE};
pub use core::Converter;
pub use diff::{diff_collection, ReconcilePlan};
pub use refdata::ReferenceCache;
