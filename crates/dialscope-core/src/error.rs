//! Error types for `dialscope-core`.

use thiserror::Error;

/// Boxed backend error carried by the storage variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// Nothing (or only whitespace) was entered.
  #[error("please enter a phone number")]
  EmptyInput,

  /// The numbering-plan lookup rejected the input.
  #[error("invalid phone number {input:?}: {reason}")]
  InvalidNumber { input: String, reason: String },

  /// The caller's location could not be determined.
  #[error("location unavailable: {0}")]
  GeoUnavailable(String),

  #[error("could not write history: {0}")]
  StorageWrite(#[source] BoxError),

  #[error("could not read history: {0}")]
  StorageRead(#[source] BoxError),

  #[error("speech failed: {0}")]
  Announce(String),

  #[error("incorrect admin password")]
  AccessDenied,
}

impl Error {
  pub fn storage_write(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::StorageWrite(Box::new(e))
  }

  pub fn storage_read(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::StorageRead(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
