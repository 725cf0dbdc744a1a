//! [`PrefixLookup`] — the numbering-plan [`LookupService`].

use dialscope_core::{
  Error,
  service::{LookupService, Resolution},
};
use phonenumber::Mode;
use tracing::debug;

use crate::metadata::MetadataTable;

/// Validates numbers with the `phonenumber` crate and describes them from a
/// [`MetadataTable`].
///
/// Numbers must carry their `+CountryCode`; there is no default region.
pub struct PrefixLookup {
  table: MetadataTable,
}

impl PrefixLookup {
  pub fn new(table: MetadataTable) -> Self { Self { table } }
}

impl LookupService for PrefixLookup {
  async fn resolve(&self, raw: &str) -> dialscope_core::Result<Resolution> {
    let invalid = |reason: String| Error::InvalidNumber { input: raw.to_owned(), reason };

    let number = phonenumber::parse(None, raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !phonenumber::is_valid(&number) {
      return Err(invalid("invalid phone number format".into()));
    }

    let e164 = number.format().mode(Mode::E164).to_string();
    let mut resolution = self.table.resolve(e164.trim_start_matches('+'));
    resolution.region_code = number.country().id().map(|id| format!("{id:?}"));
    if resolution.region.is_none() {
      resolution.region = resolution
        .region_code
        .as_deref()
        .and_then(|code| self.table.country_name(code))
        .map(str::to_owned);
    }

    debug!(
      number = raw,
      e164 = %e164,
      region = ?resolution.region,
      region_code = ?resolution.region_code,
      "resolved number"
    );
    Ok(resolution)
  }
}
