//! Prefix metadata table for region, carrier and timezone lookups.

use std::{collections::HashMap, fs, path::Path};

use dialscope_core::service::Resolution;
use serde::Deserialize;

use crate::{Error, Result};

const BUNDLED: &str = include_str!("../data/numbering.toml");

/// Metadata for one number range.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrefixEntry {
  pub region:    Option<String>,
  pub carrier:   Option<String>,
  #[serde(default)]
  pub timezones: Vec<String>,
}

/// Number-range metadata keyed by leading E.164 digits (no `+`), plus
/// country names keyed by ISO region code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataTable {
  #[serde(default)]
  prefix:  HashMap<String, PrefixEntry>,
  #[serde(default)]
  country: HashMap<String, String>,
}

impl MetadataTable {
  /// The table compiled into the binary.
  pub fn bundled() -> Result<Self> { Self::parse(BUNDLED) }

  pub fn parse(text: &str) -> Result<Self> { Ok(toml::from_str(text)?) }

  pub fn load(path: &Path) -> Result<Self> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&text)
  }

  pub fn len(&self) -> usize { self.prefix.len() }

  /// Display name for an ISO region code such as `"US"`.
  pub fn country_name(&self, code: &str) -> Option<&str> {
    self.country.get(code).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool { self.prefix.is_empty() }

  /// Resolve each field from the longest prefix of `digits` that sets it.
  /// `region_code` is left unset.
  pub fn resolve(&self, digits: &str) -> Resolution {
    let mut out = Resolution::default();
    let candidates = (1..=digits.len())
      .rev()
      .filter(|&n| digits.is_char_boundary(n))
      .filter_map(|n| self.prefix.get(&digits[..n]));

    for entry in candidates {
      if out.region.is_none() {
        out.region = entry.region.clone();
      }
      if out.carrier.is_none() {
        out.carrier = entry.carrier.clone();
      }
      if out.timezones.is_empty() {
        out.timezones = entry.timezones.clone();
      }
    }
    out
  }
}
