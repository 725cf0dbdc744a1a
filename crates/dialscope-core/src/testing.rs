//! In-memory fakes shared by the unit tests of this crate.

use std::{
  collections::{BTreeSet, HashSet},
  io,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use crate::{
  Error, Result,
  record::Record,
  service::{Announcer, GeoService, LookupService, Resolution},
  store::HistoryStore,
};

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
  records:     Mutex<Vec<Record>>,
  fail_writes: bool,
  pub appends: AtomicUsize,
}

impl MemoryStore {
  pub fn with(records: Vec<Record>) -> Self {
    Self { records: Mutex::new(records), ..Self::default() }
  }

  /// Every write fails as if the disk were full.
  pub fn failing() -> Self { Self { fail_writes: true, ..Self::default() } }

  pub fn snapshot(&self) -> Vec<Record> { self.records.lock().unwrap().clone() }

  fn check_write(&self) -> io::Result<()> {
    if self.fail_writes {
      Err(io::Error::other("disk full"))
    } else {
      Ok(())
    }
  }
}

impl HistoryStore for MemoryStore {
  type Error = io::Error;

  async fn ensure_initialized(&self) -> io::Result<()> { Ok(()) }

  async fn append(&self, record: &Record) -> io::Result<()> {
    self.appends.fetch_add(1, Ordering::SeqCst);
    self.check_write()?;
    self.records.lock().unwrap().push(record.clone());
    Ok(())
  }

  async fn list_all(&self) -> io::Result<Vec<Record>> { Ok(self.snapshot()) }

  async fn delete_many(&self, keys: &HashSet<Record>) -> io::Result<usize> {
    self.check_write()?;
    let mut records = self.records.lock().unwrap();
    let before = records.len();
    records.retain(|r| !keys.contains(r));
    Ok(before - records.len())
  }

  async fn delete_rows(&self, rows: &BTreeSet<usize>) -> io::Result<usize> {
    self.check_write()?;
    let mut records = self.records.lock().unwrap();
    let before = records.len();
    let mut index = 0;
    records.retain(|_| {
      let keep = !rows.contains(&index);
      index += 1;
      keep
    });
    Ok(before - records.len())
  }

  async fn clear_all(&self) -> io::Result<()> {
    self.check_write()?;
    self.records.lock().unwrap().clear();
    Ok(())
  }
}

// ─── Collaborators ───────────────────────────────────────────────────────────

/// Returns the scripted resolution, or rejects every number when `None`.
pub struct ScriptedLookup {
  result:    Option<Resolution>,
  pub calls: AtomicUsize,
}

impl ScriptedLookup {
  pub fn new(result: Option<Resolution>) -> Self { Self { result, calls: AtomicUsize::new(0) } }
}

impl LookupService for ScriptedLookup {
  async fn resolve(&self, raw: &str) -> Result<Resolution> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.result.clone().ok_or_else(|| Error::InvalidNumber {
      input:  raw.to_owned(),
      reason: "not a valid number".into(),
    })
  }
}

/// Returns the scripted location, or fails when `None`.
pub struct ScriptedGeo {
  location:  Option<String>,
  pub calls: AtomicUsize,
}

impl ScriptedGeo {
  pub fn new(location: Option<String>) -> Self { Self { location, calls: AtomicUsize::new(0) } }
}

impl GeoService for ScriptedGeo {
  async fn locate(&self) -> Result<String> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self
      .location
      .clone()
      .ok_or_else(|| Error::GeoUnavailable("timed out".into()))
  }
}

#[derive(Default)]
pub struct RecordingAnnouncer {
  spoken: Mutex<Vec<String>>,
  fail:   bool,
}

impl RecordingAnnouncer {
  pub fn failing() -> Self { Self { fail: true, ..Self::default() } }

  pub fn spoken(&self) -> Vec<String> { self.spoken.lock().unwrap().clone() }
}

impl Announcer for RecordingAnnouncer {
  async fn say(&self, text: &str) -> Result<()> {
    if self.fail {
      return Err(Error::Announce("no speech engine".into()));
    }
    self.spoken.lock().unwrap().push(text.to_owned());
    Ok(())
  }
}
