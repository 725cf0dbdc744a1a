//! [`CsvHistoryStore`] — the flat-file implementation of [`HistoryStore`].

use std::{
  collections::{BTreeSet, HashSet},
  fs::{self, File, OpenOptions},
  io::{self, Read, Seek, SeekFrom, Write},
  path::{Path, PathBuf},
  sync::Arc,
};

use dialscope_core::{record::Record, store::HistoryStore};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::{Error, Result, codec};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Inspection history kept in a single CSV file.
///
/// Clones share the path.
#[derive(Clone, Debug)]
pub struct CsvHistoryStore {
  path: Arc<PathBuf>,
}

impl CsvHistoryStore {
  /// Open the history at `path`, creating it with just the header if needed.
  pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
    let store = Self::at(path);
    store.ensure_initialized().await?;
    Ok(store)
  }

  /// A handle on `path` that creates nothing until the first write.
  pub fn at(path: impl Into<PathBuf>) -> Self { Self { path: Arc::new(path.into()) } }

  pub fn path(&self) -> &Path { &self.path }

  /// Run `f` against the file path on the blocking pool.
  async fn run<F, T>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Path) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let path = Arc::clone(&self.path);
    tokio::task::spawn_blocking(move || f(&path)).await?
  }
}

// ─── Blocking file operations ────────────────────────────────────────────────

fn needs_header(path: &Path) -> Result<bool> {
  match fs::metadata(path) {
    Ok(meta) => Ok(meta.len() == 0),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
    Err(e) => Err(Error::read(e)),
  }
}

fn read_all(path: &Path) -> Result<Vec<Record>> {
  let file = match File::open(path) {
    Ok(file) => file,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      debug!(path = %path.display(), "history file missing, reading as empty");
      return Ok(Vec::new());
    }
    Err(e) => return Err(Error::read(e)),
  };
  let decoded = codec::read_records(io::BufReader::new(file)).map_err(Error::read)?;
  if decoded.skipped > 0 {
    warn!(path = %path.display(), skipped = decoded.skipped, "skipped malformed history rows");
  }
  Ok(decoded.records)
}

fn append_one(path: &Path, record: &Record) -> Result<()> {
  let mut file = OpenOptions::new()
    .read(true)
    .create(true)
    .append(true)
    .open(path)
    .map_err(Error::write)?;

  // Checked from metadata and the last byte only; existing rows are never read.
  let len = file.metadata().map_err(Error::write)?.len();
  if len > 0 && ends_mid_row(&mut file).map_err(Error::write)? {
    warn!(path = %path.display(), "history file ends mid-row, terminating it");
    file.write_all(b"\n").map_err(Error::write)?;
  }

  let mut w = codec::writer(file);
  if len == 0 {
    codec::write_header(&mut w).map_err(Error::write)?;
  }
  codec::write_record(&mut w, record).map_err(Error::write)?;
  let file = w.into_inner().map_err(|e| Error::write(e.into_error()))?;
  file.sync_data().map_err(Error::write)?;
  Ok(())
}

/// Whether the last byte of a non-empty file is anything but a newline.
fn ends_mid_row(file: &mut File) -> io::Result<bool> {
  file.seek(SeekFrom::End(-1))?;
  let mut last = [0u8; 1];
  file.read_exact(&mut last)?;
  Ok(last[0] != b'\n')
}

/// Flush a directory entry change (create, rename) to disk.
#[cfg(unix)]
pub(crate) fn sync_dir(dir: &Path) -> io::Result<()> { File::open(dir)?.sync_all() }

#[cfg(not(unix))]
pub(crate) fn sync_dir(_dir: &Path) -> io::Result<()> { Ok(()) }

/// Replace the whole file with the header plus `records`.
///
/// Everything is written to a temporary file in the same directory, synced,
/// and renamed over the original, so the old content stays intact until the
/// new content is complete.
fn rewrite(path: &Path, records: &[Record]) -> Result<()> {
  let dir = match path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };
  let tmp = NamedTempFile::new_in(dir).map_err(Error::write)?;

  let mut w = codec::writer(tmp);
  codec::write_header(&mut w).map_err(Error::write)?;
  for record in records {
    codec::write_record(&mut w, record).map_err(Error::write)?;
  }
  let tmp = w.into_inner().map_err(|e| Error::write(e.into_error()))?;
  tmp.as_file().sync_all().map_err(Error::write)?;
  tmp.persist(path).map_err(|e| Error::write(e.error))?;
  sync_dir(dir).map_err(Error::write)?;
  Ok(())
}

/// Keep the records `keep` accepts; rewrite only if something was dropped.
fn retain(path: &Path, mut keep: impl FnMut(usize, &Record) -> bool) -> Result<usize> {
  let records = read_all(path)?;
  let before = records.len();
  let survivors: Vec<Record> = records
    .into_iter()
    .enumerate()
    .filter(|(i, r)| keep(*i, r))
    .map(|(_, r)| r)
    .collect();

  let removed = before - survivors.len();
  if removed > 0 {
    rewrite(path, &survivors)?;
  }
  Ok(removed)
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for CsvHistoryStore {
  type Error = Error;

  async fn ensure_initialized(&self) -> Result<()> {
    self
      .run(|path| {
        if needs_header(path)? {
          rewrite(path, &[])?;
          info!(path = %path.display(), "created history file");
        }
        Ok(())
      })
      .await
  }

  async fn append(&self, record: &Record) -> Result<()> {
    let record = record.clone();
    self.run(move |path| append_one(path, &record)).await
  }

  async fn list_all(&self) -> Result<Vec<Record>> { self.run(read_all).await }

  async fn delete_many(&self, keys: &HashSet<Record>) -> Result<usize> {
    let keys = keys.clone();
    self.run(move |path| retain(path, |_, r| !keys.contains(r))).await
  }

  async fn delete_rows(&self, rows: &BTreeSet<usize>) -> Result<usize> {
    let rows = rows.clone();
    self.run(move |path| retain(path, |i, _| !rows.contains(&i))).await
  }

  async fn clear_all(&self) -> Result<()> { self.run(|path| rewrite(path, &[])).await }
}
