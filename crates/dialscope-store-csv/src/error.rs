//! Error type for `dialscope-store-csv`.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read history file: {0}")]
  Read(#[source] io::Error),

  #[error("failed to write history file: {0}")]
  Write(#[source] io::Error),

  #[error("history task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

impl Error {
  /// Whether the failure happened while changing the file.
  pub fn is_write(&self) -> bool { matches!(self, Self::Write(_)) }

  pub(crate) fn read(e: impl Into<io::Error>) -> Self { Self::Read(e.into()) }

  pub(crate) fn write(e: impl Into<io::Error>) -> Self { Self::Write(e.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
