//! Record — one persisted inspection result.
//!
//! A record is never edited after it is built. History mutation only adds or
//! removes whole records. Unavailable data is an explicit sentinel string,
//! never an empty or missing field.

use serde::{Deserialize, Serialize};

// ─── Sentinels ───────────────────────────────────────────────────────────────

/// Stored in place of a lookup sub-field the numbering plan has no data for.
pub const NOT_AVAILABLE: &str = "N/A";

/// Stored as `ip_location` when geolocation failed.
pub const GEO_FAILED: &str = "Location fetch error";

/// Shown in every result field before an inspection and after clearing.
pub const DISPLAY_PLACEHOLDER: &str = "-- N/A --";

/// Shown in every result field when an inspection failed.
pub const DISPLAY_ERROR: &str = "-- Error --";

/// Column names of the history file, in field order.
pub const HEADER: [&str; 5] = [
  "Phone Number",
  "Registered Region",
  "Original Carrier",
  "Region Timezone",
  "User's IP Location",
];

// ─── Record ──────────────────────────────────────────────────────────────────

/// One history entry. Equality and hashing cover all five fields, which is
/// what value-based deletion matches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
  /// The number as entered; not canonicalised.
  pub number:      String,
  pub region:      String,
  /// Original (pre-porting) carrier.
  pub carrier:     String,
  /// Comma-joined zone names.
  pub timezones:   String,
  pub ip_location: String,
}

impl Record {
  pub fn new(
    number: impl Into<String>,
    region: impl Into<String>,
    carrier: impl Into<String>,
    timezones: impl Into<String>,
    ip_location: impl Into<String>,
  ) -> Self {
    Self {
      number:      number.into(),
      region:      region.into(),
      carrier:     carrier.into(),
      timezones:   timezones.into(),
      ip_location: ip_location.into(),
    }
  }

  /// Fields in [`HEADER`] order.
  pub fn fields(&self) -> [&str; 5] {
    [
      &self.number,
      &self.region,
      &self.carrier,
      &self.timezones,
      &self.ip_location,
    ]
  }

  /// Build a record from a row of exactly five fields in [`HEADER`] order.
  /// Returns `None` for any other field count.
  pub fn from_fields<I, T>(fields: I) -> Option<Self>
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    let mut it = fields.into_iter().map(Into::into);
    let record = Self {
      number:      it.next()?,
      region:      it.next()?,
      carrier:     it.next()?,
      timezones:   it.next()?,
      ip_location: it.next()?,
    };
    match it.next() {
      Some(_) => None,
      None => Some(record),
    }
  }
}
