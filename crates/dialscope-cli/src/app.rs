//! Application state machine and event dispatcher.

use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dialscope_core::{Error, admin::HistoryAdmin, record::Record, workflow::DisplayFields};
use dialscope_store_csv::CsvHistoryStore;
use tracing::{info, warn};

use crate::services::Services;

pub const MISSING_HISTORY: &str =
  "History file not found. It will be created on the first track.";

// ─── Tabs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Inspector,
  /// Admin Login until unlocked, History afterwards.
  Admin,
}

/// A destructive history action waiting for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
  DeleteSelected(usize),
  ClearAll,
}

impl Confirm {
  pub fn prompt(self) -> String {
    match self {
      Self::DeleteSelected(n) => format!("Delete {n} selected record(s)? [y/n]"),
      Self::ClearAll => {
        "Delete ALL tracking history? This cannot be undone. [y/n]".to_owned()
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
  pub level: Level,
  pub text:  String,
}

impl Status {
  fn new(level: Level, text: impl Into<String>) -> Self { Self { level, text: text.into() } }
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  pub tab:      Tab,
  /// Number input on the Inspector tab.
  pub input:    String,
  pub display:  DisplayFields,
  /// Password input on the Admin Login tab.
  pub password: String,
  /// Set once the admin gate has been passed.
  admin:        Option<HistoryAdmin<CsvHistoryStore>>,
  pub history:  Vec<Record>,
  /// Cursor row in `history`.
  pub cursor:   usize,
  /// Selected rows in `history`, by position.
  pub selected: BTreeSet<usize>,
  pub confirm:  Option<Confirm>,
  /// One-line message shown in the status bar.
  pub status:   Option<Status>,
  /// An inspection was submitted and runs after the next redraw.
  pending:      bool,
  prefix:       String,
  services:     Services,
}

impl App {
  pub fn new(services: Services, default_prefix: impl Into<String>) -> Self {
    let prefix = default_prefix.into();
    Self {
      tab: Tab::Inspector,
      input: prefix.clone(),
      display: DisplayFields::placeholder(),
      password: String::new(),
      admin: None,
      history: Vec::new(),
      cursor: 0,
      selected: BTreeSet::new(),
      confirm: None,
      status: None,
      pending: false,
      prefix,
      services,
    }
  }

  pub fn is_unlocked(&self) -> bool { self.admin.is_some() }

  pub fn is_pending(&self) -> bool { self.pending }

  pub fn services(&self) -> &Services { &self.services }

  fn history_path_exists(&self) -> bool { self.services.history_path().exists() }

  fn set_status(&mut self, level: Level, text: impl Into<String>) {
    self.status = Some(Status::new(level, text));
  }

  // ── Inspector ─────────────────────────────────────────────────────────────

  fn submit_inspection(&mut self) {
    if self.input.trim().is_empty() {
      self.set_status(Level::Warning, "Please enter a phone number.");
      return;
    }
    self.pending = true;
    self.set_status(Level::Info, "Inspecting…");
  }

  /// Run the inspection queued by [`submit_inspection`](Self::submit_inspection).
  pub async fn run_pending(&mut self) {
    if !std::mem::take(&mut self.pending) {
      return;
    }
    let number = self.input.clone();

    match self.services.inspector.inspect(&number).await {
      Ok(outcome) => {
        self.display = outcome.display;
        match outcome.error {
          None => self.set_status(Level::Info, format!("Saved {} to history.", number.trim())),
          Some(err @ Error::InvalidNumber { .. }) => {
            self.set_status(Level::Error, format!("Invalid phone number: {err}"));
          }
          Some(err) => {
            self.set_status(Level::Warning, format!("Shown but not saved: {err}"));
          }
        }
      }
      Err(Error::EmptyInput) => {
        self.set_status(Level::Warning, "Please enter a phone number.");
      }
      Err(err) => {
        self.display = DisplayFields::error();
        self.set_status(Level::Error, err.to_string());
      }
    }

    // Keep the History tab in step with new rows.
    if self.is_unlocked() && self.history_path_exists() {
      self.load_history().await;
    }
  }

  fn clear_fields(&mut self) {
    self.input = self.prefix.clone();
    self.display = DisplayFields::placeholder();
    self.status = None;
  }

  // ── Admin ─────────────────────────────────────────────────────────────────

  async fn submit_login(&mut self) {
    let secret = std::mem::take(&mut self.password);
    match self.services.gate.unlock(&secret) {
      Ok(admin) => {
        self.admin = Some(admin);
        self.set_status(Level::Info, "Access granted.");
        self.load_history().await;
      }
      Err(_) => self.set_status(Level::Error, "Incorrect password."),
    }
  }

  /// Reload the History tab from the store. Returns whether rows were loaded.
  pub async fn load_history(&mut self) -> bool {
    let Some(admin) = &self.admin else { return false };

    if !self.history_path_exists() {
      self.history.clear();
      self.selected.clear();
      self.cursor = 0;
      self.set_status(Level::Warning, MISSING_HISTORY);
      self.services.inspector.announce(MISSING_HISTORY).await;
      return false;
    }

    match admin.list().await {
      Ok(records) => {
        self.history = records;
        self.selected.clear();
        self.cursor = self.cursor.min(self.history.len().saturating_sub(1));
        true
      }
      Err(err) => {
        warn!(error = %err, "failed to load history");
        self.set_status(Level::Error, format!("Could not load history: {err}"));
        false
      }
    }
  }

  fn request_delete(&mut self) {
    if self.selected.is_empty() {
      self.set_status(Level::Warning, "Please select one or more records to delete.");
    } else {
      self.confirm = Some(Confirm::DeleteSelected(self.selected.len()));
    }
  }

  async fn confirmed(&mut self, action: Confirm) {
    let Some(admin) = &self.admin else { return };

    let result = match action {
      Confirm::DeleteSelected(_) => admin
        .delete_rows(&self.selected)
        .await
        .map(|n| format!("Deleted {n} record(s).")),
      Confirm::ClearAll => admin
        .clear()
        .await
        .map(|()| "All history has been cleared.".to_owned()),
    };

    match result {
      Ok(msg) => {
        info!(?action, "history updated");
        if self.load_history().await {
          self.set_status(Level::Info, msg);
        }
      }
      Err(err) => self.set_status(Level::Error, err.to_string()),
    }
  }

  fn toggle_selected(&mut self) {
    if self.history.is_empty() {
      return;
    }
    if !self.selected.remove(&self.cursor) {
      self.selected.insert(self.cursor);
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if let Some(action) = self.confirm {
      match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
          self.confirm = None;
          self.confirmed(action).await;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
          self.confirm = None;
          self.set_status(Level::Info, "Cancelled.");
        }
        _ => {}
      }
      return Ok(true);
    }

    match key.code {
      KeyCode::Tab | KeyCode::BackTab => {
        self.tab = match self.tab {
          Tab::Inspector => Tab::Admin,
          Tab::Admin => Tab::Inspector,
        };
        return Ok(true);
      }
      KeyCode::Esc => return Ok(false),
      _ => {}
    }

    match self.tab {
      Tab::Inspector => self.handle_inspector_key(key),
      Tab::Admin if self.is_unlocked() => return self.handle_history_key(key).await,
      Tab::Admin => self.handle_login_key(key).await,
    }
    Ok(true)
  }

  fn handle_inspector_key(&mut self, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Enter => self.submit_inspection(),
      KeyCode::Char('l') if ctrl => self.clear_fields(),
      KeyCode::Backspace => {
        self.input.pop();
      }
      KeyCode::Char(c) if !ctrl => self.input.push(c),
      _ => {}
    }
  }

  async fn handle_login_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Enter => self.submit_login().await,
      KeyCode::Backspace => {
        self.password.pop();
      }
      KeyCode::Char(c) => self.password.push(c),
      _ => {}
    }
  }

  async fn handle_history_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.history.len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }
      KeyCode::Char(' ') => self.toggle_selected(),
      KeyCode::Char('a') => {
        if self.selected.len() == self.history.len() {
          self.selected.clear();
        } else {
          self.selected = (0..self.history.len()).collect();
        }
      }
      KeyCode::Char('r') => {
        if self.load_history().await {
          self.set_status(Level::Info, "History refreshed.");
        }
      }
      KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
      KeyCode::Char('c') => self.confirm = Some(Confirm::ClearAll),
      _ => {}
    }
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use dialscope_core::{record::DISPLAY_ERROR, store::HistoryStore};

  use super::*;
  use crate::settings::Settings;

  async fn app(dir: &Path) -> App {
    let settings = Settings {
      history_path: dir.join("history.csv"),
      admin_password: Some("pw".into()),
      geo_url: "http://127.0.0.1:9/json".into(),
      geo_timeout_secs: 1,
      speech: false,
      ..Settings::default()
    };
    let services = Services::build(&settings).await.unwrap();
    App::new(services, settings.default_prefix)
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  async fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
  }

  async fn seed(app: &App, numbers: &[&str]) {
    let store = app.services().inspector.store();
    for n in numbers {
      store
        .append(&Record::new(*n, "R", "C", "T", "L"))
        .await
        .unwrap();
    }
  }

  async fn unlock(app: &mut App) {
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    type_str(app, "pw").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(app.is_unlocked());
  }

  #[tokio::test]
  async fn input_starts_with_default_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path()).await;
    assert_eq!(app.input, "+91");
    assert_eq!(app.display, DisplayFields::placeholder());
  }

  #[tokio::test]
  async fn valid_number_is_inspected_after_redraw() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    app.input.clear();
    type_str(&mut app, "+16502530000").await;

    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(app.is_pending());
    assert_eq!(app.display, DisplayFields::placeholder());

    app.run_pending().await;
    assert!(!app.is_pending());
    assert_ne!(app.display.region, DISPLAY_ERROR);
    assert_eq!(app.display.ip_location, "Location fetch error");

    let rows = app.services().inspector.store().list_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].number, "+16502530000");
  }

  #[tokio::test]
  async fn number_is_stored_as_typed() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    app.input = " +1 650 253 0000 ".into();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    app.run_pending().await;

    let rows = app.services().inspector.store().list_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].number, " +1 650 253 0000 ");
  }

  #[tokio::test]
  async fn invalid_number_shows_error_and_saves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    type_str(&mut app, "abc").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    app.run_pending().await;

    assert_eq!(app.display, DisplayFields::error());
    assert_eq!(app.status.as_ref().map(|s| s.level), Some(Level::Error));
    assert!(app.services().inspector.store().list_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn blank_input_is_not_submitted() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    app.input = "   ".into();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(!app.is_pending());
    assert_eq!(app.status.as_ref().map(|s| s.level), Some(Level::Warning));
  }

  #[tokio::test]
  async fn ctrl_l_clears_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    type_str(&mut app, "123").await;
    app.display = DisplayFields::error();

    app
      .handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL))
      .await
      .unwrap();
    assert_eq!(app.input, "+91");
    assert_eq!(app.display, DisplayFields::placeholder());
  }

  #[tokio::test]
  async fn wrong_password_clears_field() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    type_str(&mut app, "nope").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    assert!(!app.is_unlocked());
    assert!(app.password.is_empty());
    assert_eq!(app.status.as_ref().map(|s| s.level), Some(Level::Error));
  }

  #[tokio::test]
  async fn login_loads_history() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    seed(&app, &["+1", "+2"]).await;
    unlock(&mut app).await;
    assert_eq!(app.history.len(), 2);
  }

  #[tokio::test]
  async fn delete_needs_selection_and_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    seed(&app, &["+1", "+2", "+3"]).await;
    unlock(&mut app).await;

    app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
    assert!(app.confirm.is_none());
    assert_eq!(app.status.as_ref().map(|s| s.level), Some(Level::Warning));

    app.handle_key(key(KeyCode::Down)).await.unwrap();
    app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
    app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
    assert_eq!(app.confirm, Some(Confirm::DeleteSelected(1)));

    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert!(app.confirm.is_none());
    assert_eq!(app.history.len(), 3);

    app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('y'))).await.unwrap();
    let numbers: Vec<_> = app.history.iter().map(|r| r.number.as_str()).collect();
    assert_eq!(numbers, ["+1", "+3"]);
    assert!(app.selected.is_empty());
  }

  #[tokio::test]
  async fn clear_all_after_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    seed(&app, &["+1", "+2"]).await;
    unlock(&mut app).await;

    app.handle_key(key(KeyCode::Char('c'))).await.unwrap();
    assert_eq!(app.confirm, Some(Confirm::ClearAll));
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    assert!(app.history.is_empty());
    assert!(app.services().history_path().exists());
  }

  #[tokio::test]
  async fn missing_history_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path()).await;
    seed(&app, &["+1"]).await;
    unlock(&mut app).await;

    std::fs::remove_file(app.services().history_path()).unwrap();
    app.handle_key(key(KeyCode::Char('r'))).await.unwrap();
    assert!(app.history.is_empty());
    assert_eq!(app.status.as_ref().map(|s| s.text.as_str()), Some(MISSING_HISTORY));
  }
}
