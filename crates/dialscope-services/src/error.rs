//! Error type for `dialscope-services` setup. Runtime failures of the
//! collaborators are reported as `dialscope_core::Error`.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read metadata file {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid numbering metadata: {0}")]
  Metadata(#[from] toml::de::Error),

  #[error("http client error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("password hashing failed: {0}")]
  Hash(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
