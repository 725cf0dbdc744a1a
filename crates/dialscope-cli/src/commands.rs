//! One-shot subcommands for scripted use.

use std::collections::BTreeSet;

use anyhow::{Context as _, anyhow, bail};
use dialscope_core::{Error, record::HEADER, workflow::DisplayFields};

use crate::services::Services;

pub const LABELS: [&str; 4] = [
  "Registered Region:",
  "Original Carrier (No MNP):",
  "Region's Timezone:",
  "Your (User's) IP Location:",
];

fn print_display(display: &DisplayFields) {
  let values = [
    &display.region,
    &display.carrier,
    &display.timezones,
    &display.ip_location,
  ];
  for (label, value) in LABELS.iter().zip(values) {
    println!("{label:<28}{value}");
  }
}

/// `dialscope inspect <NUMBER>`
pub async fn inspect(services: &Services, number: &str) -> anyhow::Result<()> {
  let outcome = services.inspector.inspect(number).await?;
  print_display(&outcome.display);

  match outcome.error {
    None => Ok(()),
    Some(err @ Error::InvalidNumber { .. }) => Err(err.into()),
    Some(err) => Err(anyhow!(err).context("result was not saved to history")),
  }
}

/// `dialscope history list`
pub async fn history_list(services: &Services, password: &str) -> anyhow::Result<()> {
  let admin = services.gate.unlock(password)?;
  let records = admin.list().await?;
  if records.is_empty() {
    println!("History is empty ({}).", services.history_path().display());
    return Ok(());
  }

  println!("{:>4}  {}", "#", HEADER.join(" | "));
  for (i, record) in records.iter().enumerate() {
    println!("{:>4}  {}", i + 1, record.fields().join(" | "));
  }
  Ok(())
}

/// `dialscope history delete <ROW>...` with 1-based rows as listed.
pub async fn history_delete(
  services: &Services,
  password: &str,
  rows: &[usize],
) -> anyhow::Result<()> {
  let admin = services.gate.unlock(password)?;
  let positions: BTreeSet<usize> = rows
    .iter()
    .map(|&row| row.checked_sub(1).context("row numbers start at 1"))
    .collect::<anyhow::Result<_>>()?;

  let removed = admin.delete_rows(&positions).await?;
  println!("Deleted {removed} row(s).");
  Ok(())
}

/// `dialscope history clear --yes`
pub async fn history_clear(services: &Services, password: &str, yes: bool) -> anyhow::Result<()> {
  let admin = services.gate.unlock(password)?;
  if !yes {
    bail!("refusing to delete ALL history without --yes");
  }
  admin.clear().await?;
  println!("All history has been cleared.");
  Ok(())
}
