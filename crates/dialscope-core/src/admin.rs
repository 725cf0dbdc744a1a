//! Admin gate in front of the history-management operations.
//!
//! [`AdminGate::unlock`] is the only way to obtain a [`HistoryAdmin`], so list,
//! delete and clear are unreachable without a verified secret.

use std::{
  collections::{BTreeSet, HashSet},
  sync::Arc,
};

use tracing::{info, warn};

use crate::{
  Error, Result,
  record::Record,
  service::Authenticator,
  store::HistoryStore,
};

pub struct AdminGate<S> {
  auth:  Box<dyn Authenticator>,
  store: Arc<S>,
}

impl<S: HistoryStore> AdminGate<S> {
  pub fn new(auth: Box<dyn Authenticator>, store: Arc<S>) -> Self { Self { auth, store } }

  pub fn unlock(&self, secret: &str) -> Result<HistoryAdmin<S>> {
    if self.auth.verify(secret) {
      info!("admin access granted");
      Ok(HistoryAdmin { store: Arc::clone(&self.store) })
    } else {
      warn!("admin access denied");
      Err(Error::AccessDenied)
    }
  }
}

/// History-management handle handed out by a successful [`AdminGate::unlock`].
pub struct HistoryAdmin<S> {
  store: Arc<S>,
}

impl<S: HistoryStore> HistoryAdmin<S> {
  pub async fn list(&self) -> Result<Vec<Record>> {
    self.store.list_all().await.map_err(Error::storage_read)
  }

  /// Delete by position in the last [`list`](Self::list).
  pub async fn delete_rows(&self, rows: &BTreeSet<usize>) -> Result<usize> {
    let removed = self
      .store
      .delete_rows(rows)
      .await
      .map_err(Error::storage_write)?;
    info!(requested = rows.len(), removed, "deleted history rows");
    Ok(removed)
  }

  /// Delete every record equal to one of `keys`.
  pub async fn delete_matching(&self, keys: &HashSet<Record>) -> Result<usize> {
    let removed = self
      .store
      .delete_many(keys)
      .await
      .map_err(Error::storage_write)?;
    info!(keys = keys.len(), removed, "deleted matching history records");
    Ok(removed)
  }

  pub async fn clear(&self) -> Result<()> {
    self.store.clear_all().await.map_err(Error::storage_write)?;
    info!("history cleared");
    Ok(())
  }
}
