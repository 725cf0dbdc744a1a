//! Contracts for the external collaborators an inspection relies on.
//!
//! Implementations live in `dialscope-services`; tests use in-memory fakes.

use std::future::Future;

use crate::{Result, record::NOT_AVAILABLE};

// ─── Lookup ──────────────────────────────────────────────────────────────────

/// Numbering-plan metadata for a valid number. Any sub-field may be missing;
/// that is a normal partial result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
  /// Human-readable registered region.
  pub region:      Option<String>,
  /// Original carrier name.
  pub carrier:     Option<String>,
  pub timezones:   Vec<String>,
  /// ISO 3166-1 alpha-2 code of the region the number belongs to.
  pub region_code: Option<String>,
}

impl Resolution {
  pub fn region_or_sentinel(&self) -> String { or_sentinel(self.region.as_deref()) }

  pub fn carrier_or_sentinel(&self) -> String { or_sentinel(self.carrier.as_deref()) }

  /// Zones joined with `", "`, or the sentinel when there are none.
  pub fn timezones_joined(&self) -> String {
    let zones: Vec<&str> = self
      .timezones
      .iter()
      .map(|z| z.trim())
      .filter(|z| !z.is_empty())
      .collect();
    if zones.is_empty() {
      NOT_AVAILABLE.to_owned()
    } else {
      zones.join(", ")
    }
  }
}

fn or_sentinel(value: Option<&str>) -> String {
  match value.map(str::trim) {
    Some(v) if !v.is_empty() => v.to_owned(),
    _ => NOT_AVAILABLE.to_owned(),
  }
}

/// Resolves a raw number string against a numbering plan.
pub trait LookupService: Send + Sync {
  /// Parse and validate `raw`, then return its metadata.
  ///
  /// Fails with [`crate::Error::InvalidNumber`] if `raw` cannot be parsed or
  /// is not a valid number.
  fn resolve<'a>(
    &'a self,
    raw: &'a str,
  ) -> impl Future<Output = Result<Resolution>> + Send + 'a;
}

// ─── Geolocation ─────────────────────────────────────────────────────────────

/// Locates the machine running the inspection.
pub trait GeoService: Send + Sync {
  /// A `"city, region, country"` style description, or
  /// [`crate::Error::GeoUnavailable`].
  fn locate(&self) -> impl Future<Output = Result<String>> + Send + '_;
}

// ─── Speech ──────────────────────────────────────────────────────────────────

/// Speaks a line of text.
///
/// Reports failure through its return value; the inspection workflow logs and
/// ignores it.
pub trait Announcer: Send + Sync {
  fn say<'a>(&'a self, text: &'a str) -> impl Future<Output = Result<()>> + Send + 'a;
}

// ─── Admin credential ────────────────────────────────────────────────────────

/// Decides whether a secret unlocks the history-management operations.
pub trait Authenticator: Send + Sync {
  fn verify(&self, secret: &str) -> bool;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_fields_become_sentinels() {
    let r = Resolution::default();
    assert_eq!(r.region_or_sentinel(), NOT_AVAILABLE);
    assert_eq!(r.carrier_or_sentinel(), NOT_AVAILABLE);
    assert_eq!(r.timezones_joined(), NOT_AVAILABLE);
  }

  #[test]
  fn blank_fields_become_sentinels() {
    let r = Resolution {
      region:      Some("  ".into()),
      carrier:     Some(String::new()),
      timezones:   vec![String::new()],
      region_code: None,
    };
    assert_eq!(r.region_or_sentinel(), NOT_AVAILABLE);
    assert_eq!(r.carrier_or_sentinel(), NOT_AVAILABLE);
    assert_eq!(r.timezones_joined(), NOT_AVAILABLE);
  }

  #[test]
  fn timezones_are_comma_joined() {
    let r = Resolution {
      timezones: vec!["America/Chicago".into(), "America/New_York".into()],
      ..Resolution::default()
    };
    assert_eq!(r.timezones_joined(), "America/Chicago, America/New_York");
  }
}
