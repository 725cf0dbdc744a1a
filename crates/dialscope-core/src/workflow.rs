//! The inspection workflow: one raw number in, one displayed and persisted
//! result out.
//!
//! Only a rejected number short-circuits. A failed geolocation is replaced by
//! [`GEO_FAILED`], a failed append is reported next to the still-valid display
//! fields, and a failed announcement is logged and dropped.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  record::{DISPLAY_ERROR, DISPLAY_PLACEHOLDER, GEO_FAILED, Record},
  service::{Announcer, GeoService, LookupService},
  store::HistoryStore,
};

/// Spoken when the lookup rejects a number.
pub const FAILURE_ANNOUNCEMENT: &str = "Error! Please check the number and try again.";

// ─── Display ─────────────────────────────────────────────────────────────────

/// The four result fields shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFields {
  pub region:      String,
  pub carrier:     String,
  pub timezones:   String,
  pub ip_location: String,
}

impl DisplayFields {
  fn uniform(text: &str) -> Self {
    Self {
      region:      text.to_owned(),
      carrier:     text.to_owned(),
      timezones:   text.to_owned(),
      ip_location: text.to_owned(),
    }
  }

  /// Nothing inspected yet.
  pub fn placeholder() -> Self { Self::uniform(DISPLAY_PLACEHOLDER) }

  /// The last inspection failed; no field holds a usable value.
  pub fn error() -> Self { Self::uniform(DISPLAY_ERROR) }
}

impl Default for DisplayFields {
  fn default() -> Self { Self::placeholder() }
}

/// Regional-indicator flag for an ISO alpha-2 code, e.g. `"US"` → 🇺🇸.
pub fn flag_emoji(code: &str) -> Option<String> {
  let code = code.trim();
  if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
    return None;
  }
  code
    .chars()
    .map(|c| char::from_u32(0x1F1E6 + (c.to_ascii_uppercase() as u32 - 'A' as u32)))
    .collect()
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of one inspection attempt that got past input validation.
#[derive(Debug)]
pub struct Inspection {
  pub display: DisplayFields,
  /// The record built from this inspection; `None` when the number was
  /// rejected.
  pub record:  Option<Record>,
  /// The failure to show the user: the lookup rejection, or a storage error
  /// that kept `record` from being saved.
  pub error:   Option<Error>,
}

impl Inspection {
  /// Whether the record reached the history log.
  pub fn is_saved(&self) -> bool { self.record.is_some() && self.error.is_none() }
}

fn summary(record: &Record) -> String {
  format!(
    "Inspection complete. Number is registered in {}. Original Carrier is {}.",
    record.region, record.carrier
  )
}

// ─── Inspector ───────────────────────────────────────────────────────────────

/// Wires the collaborators of one inspection together. The history store is
/// shared with the admin views, hence the [`Arc`].
pub struct Inspector<L, G, A, S> {
  lookup:    L,
  geo:       G,
  announcer: A,
  store:     Arc<S>,
}

impl<L, G, A, S> Inspector<L, G, A, S>
where
  L: LookupService,
  G: GeoService,
  A: Announcer,
  S: HistoryStore,
{
  pub fn new(lookup: L, geo: G, announcer: A, store: Arc<S>) -> Self {
    Self { lookup, geo, announcer, store }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Inspect `raw`. Only empty input is an `Err`; every later failure is
  /// carried inside the returned [`Inspection`].
  pub async fn inspect(&self, raw: &str) -> Result<Inspection> {
    if raw.trim().is_empty() {
      return Err(Error::EmptyInput);
    }

    let resolution = match self.lookup.resolve(raw).await {
      Ok(resolution) => resolution,
      Err(err) => {
        warn!(number = raw, error = %err, "lookup rejected number");
        self.announce(FAILURE_ANNOUNCEMENT).await;
        return Ok(Inspection {
          display: DisplayFields::error(),
          record:  None,
          error:   Some(err),
        });
      }
    };

    let region = resolution.region_or_sentinel();
    let carrier = resolution.carrier_or_sentinel();
    let timezones = resolution.timezones_joined();

    let ip_location = match self.geo.locate().await {
      Ok(location) => location,
      Err(err) => {
        warn!(error = %err, "geolocation failed, using sentinel");
        GEO_FAILED.to_owned()
      }
    };

    let shown_region = match resolution.region_code.as_deref().and_then(flag_emoji) {
      Some(flag) => format!("{region} {flag}"),
      None => region.clone(),
    };
    let display = DisplayFields {
      region:      shown_region,
      carrier:     carrier.clone(),
      timezones:   timezones.clone(),
      ip_location: ip_location.clone(),
    };

    let record = Record::new(raw, region, carrier, timezones, ip_location);

    let error = match self.store.append(&record).await {
      Ok(()) => {
        info!(number = raw, "inspection saved");
        None
      }
      Err(err) => {
        warn!(number = raw, error = %err, "inspection not saved");
        Some(Error::storage_write(err))
      }
    };

    self.announce(&summary(&record)).await;

    Ok(Inspection { display, record: Some(record), error })
  }

  /// Speak `text`, logging instead of returning any failure.
  pub async fn announce(&self, text: &str) {
    match self.announcer.say(text).await {
      Ok(()) => debug!("announced"),
      Err(err) => warn!(error = %err, "announcement failed"),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::Ordering;

  use super::*;
  use crate::{
    record::NOT_AVAILABLE,
    service::Resolution,
    testing::{MemoryStore, RecordingAnnouncer, ScriptedGeo, ScriptedLookup},
  };

  type TestInspector =
    Inspector<ScriptedLookup, ScriptedGeo, RecordingAnnouncer, MemoryStore>;

  fn california() -> Resolution {
    Resolution {
      region:      Some("California, United States".into()),
      carrier:     None,
      timezones:   vec!["America/Los_Angeles".into()],
      region_code: Some("US".into()),
    }
  }

  fn inspector(
    lookup: Option<Resolution>,
    geo: Option<&str>,
    store: MemoryStore,
  ) -> TestInspector {
    Inspector::new(
      ScriptedLookup::new(lookup),
      ScriptedGeo::new(geo.map(str::to_owned)),
      RecordingAnnouncer::default(),
      Arc::new(store),
    )
  }

  #[tokio::test]
  async fn successful_inspection_is_saved_and_announced() {
    let insp = inspector(Some(california()), Some("San Jose, CA, US"), MemoryStore::default());

    let outcome = insp.inspect("+14155552671").await.unwrap();
    assert!(outcome.is_saved());
    assert!(outcome.error.is_none());

    let expected = Record::new(
      "+14155552671",
      "California, United States",
      "N/A",
      "America/Los_Angeles",
      "San Jose, CA, US",
    );
    assert_eq!(outcome.record.as_ref(), Some(&expected));
    assert_eq!(insp.store.snapshot(), vec![expected]);

    assert_eq!(outcome.display.region, "California, United States 🇺🇸");
    assert_eq!(outcome.display.carrier, NOT_AVAILABLE);
    assert_eq!(outcome.display.timezones, "America/Los_Angeles");
    assert_eq!(outcome.display.ip_location, "San Jose, CA, US");

    let spoken = insp.announcer.spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(
      spoken[0],
      "Inspection complete. Number is registered in California, United States. \
       Original Carrier is N/A."
    );
  }

  #[tokio::test]
  async fn empty_input_touches_nothing() {
    let insp = inspector(Some(california()), Some("Here"), MemoryStore::default());

    for raw in ["", "   ", "\t"] {
      assert!(matches!(insp.inspect(raw).await, Err(Error::EmptyInput)));
    }
    assert_eq!(insp.lookup.calls.load(Ordering::SeqCst), 0);
    assert_eq!(insp.geo.calls.load(Ordering::SeqCst), 0);
    assert_eq!(insp.store.appends.load(Ordering::SeqCst), 0);
    assert!(insp.announcer.spoken().is_empty());
  }

  #[tokio::test]
  async fn invalid_number_short_circuits() {
    let insp = inspector(None, Some("Here"), MemoryStore::default());

    let outcome = insp.inspect("+1 123").await.unwrap();
    assert_eq!(outcome.display, DisplayFields::error());
    assert!(outcome.record.is_none());
    assert!(!outcome.is_saved());
    match outcome.error {
      Some(Error::InvalidNumber { input, .. }) => assert_eq!(input, "+1 123"),
      other => panic!("expected InvalidNumber, got {other:?}"),
    }

    assert_eq!(insp.geo.calls.load(Ordering::SeqCst), 0);
    assert_eq!(insp.store.appends.load(Ordering::SeqCst), 0);
    assert_eq!(insp.announcer.spoken(), vec![FAILURE_ANNOUNCEMENT.to_owned()]);
  }

  #[tokio::test]
  async fn geo_failure_uses_sentinel() {
    let insp = inspector(Some(california()), None, MemoryStore::default());

    let outcome = insp.inspect("+14155552671").await.unwrap();
    assert!(outcome.is_saved());
    assert_eq!(outcome.display.ip_location, GEO_FAILED);
    assert_eq!(outcome.display.carrier, NOT_AVAILABLE);
    assert_eq!(outcome.display.timezones, "America/Los_Angeles");

    let saved = insp.store.snapshot();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].ip_location, GEO_FAILED);
  }

  #[tokio::test]
  async fn storage_failure_keeps_display() {
    let insp = inspector(Some(california()), Some("Here"), MemoryStore::failing());

    let outcome = insp.inspect("+14155552671").await.unwrap();
    assert!(matches!(outcome.error, Some(Error::StorageWrite(_))));
    assert!(!outcome.is_saved());
    assert!(outcome.record.is_some());
    assert_eq!(outcome.display.timezones, "America/Los_Angeles");
    assert!(insp.store.snapshot().is_empty());
    // Speech still happens after a failed append.
    assert_eq!(insp.announcer.spoken().len(), 1);
  }

  #[tokio::test]
  async fn announcer_failure_is_swallowed() {
    let insp = Inspector::new(
      ScriptedLookup::new(Some(california())),
      ScriptedGeo::new(Some("Here".into())),
      RecordingAnnouncer::failing(),
      Arc::new(MemoryStore::default()),
    );

    let outcome = insp.inspect("+14155552671").await.unwrap();
    assert!(outcome.is_saved());
    assert!(outcome.error.is_none());
  }

  #[tokio::test]
  async fn repeated_inspections_are_logged_twice() {
    let insp = inspector(Some(california()), Some("Here"), MemoryStore::default());
    insp.inspect("+14155552671").await.unwrap();
    insp.inspect("+14155552671").await.unwrap();

    let saved = insp.store.snapshot();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0], saved[1]);
  }

  #[test]
  fn flags_from_region_codes() {
    assert_eq!(flag_emoji("US").as_deref(), Some("🇺🇸"));
    assert_eq!(flag_emoji("in").as_deref(), Some("🇮🇳"));
    assert_eq!(flag_emoji("001"), None);
    assert_eq!(flag_emoji(""), None);
  }
}
