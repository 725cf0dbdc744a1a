//! Builds the process-wide collaborators from [`Settings`].

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context as _;
use dialscope_core::{admin::AdminGate, workflow::Inspector};
use dialscope_services::{
  geo::IpInfoGeo,
  lookup::PrefixLookup,
  metadata::MetadataTable,
  speech::Speech,
};
use dialscope_store_csv::CsvHistoryStore;
use tracing::info;

use crate::settings::Settings;

pub type AppInspector = Inspector<PrefixLookup, IpInfoGeo, Speech, CsvHistoryStore>;

/// Everything the TUI and the one-shot commands operate on. The history store
/// is opened once here and shared by the inspector and the admin gate.
pub struct Services {
  pub inspector: AppInspector,
  pub gate:      AdminGate<CsvHistoryStore>,
}

impl Services {
  pub async fn build(settings: &Settings) -> anyhow::Result<Self> {
    let store = CsvHistoryStore::open(&settings.history_path)
      .await
      .with_context(|| {
        format!("failed to open history at {}", settings.history_path.display())
      })?;
    let store = Arc::new(store);

    let table = match &settings.metadata_path {
      Some(path) => MetadataTable::load(path)?,
      None => MetadataTable::bundled().context("bundled numbering metadata")?,
    };
    info!(prefixes = table.len(), "numbering metadata loaded");

    let geo = IpInfoGeo::new(
      settings.geo_url.clone(),
      Duration::from_secs(settings.geo_timeout_secs),
    )
    .context("failed to build geolocation client")?;

    let inspector = Inspector::new(
      PrefixLookup::new(table),
      geo,
      settings.speech(),
      Arc::clone(&store),
    );
    let gate = AdminGate::new(settings.authenticator(), store);

    Ok(Self { inspector, gate })
  }

  pub fn history_path(&self) -> &Path { self.inspector.store().path() }
}
