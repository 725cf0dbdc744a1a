//! Flat-file backend for the dialscope inspection history.
//!
//! One header row followed by one CSV row per record, UTF-8. File access runs
//! on tokio's blocking pool so it never stalls the async runtime.

mod codec;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::CsvHistoryStore;
