//! Encoding and decoding between [`Record`]s and CSV rows.
//!
//! Standard quoting applies, so commas, quotes and newlines inside a field
//! survive a round trip. The first row of a file is always the header.

use std::io;

use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use dialscope_core::record::{HEADER, Record};
use tracing::warn;

// ─── Writing ─────────────────────────────────────────────────────────────────

pub fn writer<W: io::Write>(inner: W) -> Writer<W> {
  WriterBuilder::new().has_headers(false).from_writer(inner)
}

pub fn write_header<W: io::Write>(w: &mut Writer<W>) -> csv::Result<()> {
  w.write_record(HEADER)
}

pub fn write_record<W: io::Write>(w: &mut Writer<W>, record: &Record) -> csv::Result<()> {
  w.write_record(record.fields())
}

// ─── Reading ─────────────────────────────────────────────────────────────────

/// Records read from a history file plus the number of rows dropped.
#[derive(Debug, Default)]
pub struct Decoded {
  pub records: Vec<Record>,
  pub skipped: usize,
}

pub fn decode_row(row: &StringRecord) -> Option<Record> {
  if row.len() != HEADER.len() {
    return None;
  }
  Record::from_fields(row.iter())
}

/// Read every record after the header. Rows with the wrong field count or
/// invalid UTF-8 are counted in [`Decoded::skipped`]; only I/O failures are
/// errors.
pub fn read_records<R: io::Read>(input: R) -> io::Result<Decoded> {
  let mut reader = ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .from_reader(input);

  match reader.headers() {
    Ok(header) if !header.is_empty() && header.iter().ne(HEADER) => {
      warn!(header = ?header, "unexpected history header");
    }
    Ok(_) => {}
    Err(e) if e.is_io_error() => return Err(e.into()),
    Err(e) => warn!(error = %e, "unreadable history header"),
  }

  let mut decoded = Decoded::default();
  for row in reader.records() {
    match row {
      Ok(row) => match decode_row(&row) {
        Some(record) => decoded.records.push(record),
        None => decoded.skipped += 1,
      },
      Err(e) if e.is_io_error() => return Err(e.into()),
      Err(_) => decoded.skipped += 1,
    }
  }
  Ok(decoded)
}
