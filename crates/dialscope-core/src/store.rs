//! The `HistoryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `dialscope-store-csv`).
//! The inspection workflow and the admin views depend on this abstraction,
//! not on any concrete backend.

use std::{
  collections::{BTreeSet, HashSet},
  future::Future,
};

use crate::record::Record;

/// Durable, ordered log of inspection [`Record`]s.
///
/// `append` is the frequent path and must not read existing content. The
/// deleting operations rewrite the whole log and must replace it atomically,
/// so a failure part-way never leaves a truncated log behind.
pub trait HistoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the backing log with only its header if it does not exist yet.
  /// Repeat calls leave existing content untouched.
  fn ensure_initialized(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Durably add `record` at the end of the log.
  fn append<'a>(
    &'a self,
    record: &'a Record,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All records in insertion order. Rows that do not hold exactly five
  /// fields are skipped. A missing log reads as empty.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Remove every record equal to any entry of `keys`; returns how many were
  /// removed. Two identical records are indistinguishable here, so both go.
  fn delete_many<'a>(
    &'a self,
    keys: &'a HashSet<Record>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Remove the records at the given zero-based positions of
  /// [`list_all`](Self::list_all); out-of-range positions are ignored.
  /// Returns how many were removed.
  fn delete_rows<'a>(
    &'a self,
    rows: &'a BTreeSet<usize>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Reset the log to just its header.
  fn clear_all(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
