//! Runtime configuration: optional TOML file, then `DIALSCOPE_*` environment
//! variables, then command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use dialscope_core::service::Authenticator;
use dialscope_services::{
  auth::{Argon2Authenticator, DenyAll, PlaintextAuthenticator},
  geo,
  speech::{self, CommandAnnouncer, Speech},
};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub history_path:        PathBuf,
  /// Plaintext admin credential.
  pub admin_password:      Option<String>,
  /// Argon2 PHC string; takes precedence over `admin_password`.
  pub admin_password_hash: Option<String>,
  pub geo_url:             String,
  pub geo_timeout_secs:    u64,
  pub speech:              bool,
  /// Speech program and leading arguments, e.g. `"espeak -s 150"`.
  pub speech_command:      Option<String>,
  /// Numbering metadata replacing the bundled table.
  pub metadata_path:       Option<PathBuf>,
  /// Pre-filled into the number input.
  pub default_prefix:      String,
  pub log_dir:             PathBuf,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      history_path:        PathBuf::from("tracked_numbers.csv"),
      admin_password:      None,
      admin_password_hash: None,
      geo_url:             geo::DEFAULT_URL.to_owned(),
      geo_timeout_secs:    5,
      speech:              true,
      speech_command:      None,
      metadata_path:       None,
      default_prefix:      "+91".to_owned(),
      log_dir:             PathBuf::from("."),
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("DIALSCOPE").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.history_path = expand_tilde(&settings.history_path);
    settings.log_dir = expand_tilde(&settings.log_dir);
    settings.metadata_path = settings.metadata_path.as_deref().map(expand_tilde);
    Ok(settings)
  }

  /// The configured admin credential check. Blank values count as unset.
  pub fn authenticator(&self) -> Box<dyn Authenticator> {
    let non_blank = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

    if let Some(hash) = non_blank(&self.admin_password_hash) {
      Box::new(Argon2Authenticator::new(hash))
    } else if let Some(secret) = non_blank(&self.admin_password) {
      Box::new(PlaintextAuthenticator::new(secret))
    } else {
      warn!("no admin credential configured; history access is disabled");
      Box::new(DenyAll)
    }
  }

  pub fn speech(&self) -> Speech {
    if !self.speech {
      return Speech::Silent;
    }
    let command = self
      .speech_command
      .as_deref()
      .filter(|c| !c.trim().is_empty())
      .unwrap_or(speech::default_program());
    let mut parts = command.split_whitespace();
    match parts.next() {
      Some(program) => Speech::Command(CommandAnnouncer::new(program).with_args(parts)),
      None => Speech::Silent,
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_without_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("missing.toml")).unwrap();
    assert_eq!(settings.history_path, PathBuf::from("tracked_numbers.csv"));
    assert_eq!(settings.default_prefix, "+91");
    assert_eq!(settings.geo_timeout_secs, 5);
  }

  #[test]
  fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dialscope.toml");
    std::fs::write(
      &path,
      "history_path = \"/tmp/h.csv\"\nspeech = false\ngeo_timeout_secs = 2\nadmin_password = \"pw\"\n",
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.history_path, PathBuf::from("/tmp/h.csv"));
    assert!(!settings.speech);
    assert_eq!(settings.geo_timeout_secs, 2);
    assert!(settings.authenticator().verify("pw"));
  }

  #[test]
  fn hash_wins_over_plaintext() {
    let settings = Settings {
      admin_password: Some("plain".into()),
      admin_password_hash: Some(dialscope_services::auth::hash_password("hashed").unwrap()),
      ..Settings::default()
    };
    let auth = settings.authenticator();
    assert!(auth.verify("hashed"));
    assert!(!auth.verify("plain"));
  }

  #[test]
  fn blank_credentials_deny_everything() {
    let settings = Settings { admin_password: Some("  ".into()), ..Settings::default() };
    let auth = settings.authenticator();
    assert!(!auth.verify("  "));
    assert!(!auth.verify(""));
  }

  #[test]
  fn speech_command_is_split() {
    let settings = Settings { speech_command: Some("espeak -s 150".into()), ..Settings::default() };
    match settings.speech() {
      Speech::Command(_) => {}
      Speech::Silent => panic!("speech should be enabled"),
    }
    let off = Settings { speech: false, ..Settings::default() };
    assert!(matches!(off.speech(), Speech::Silent));
  }

  #[test]
  fn tilde_expands_to_home() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/h.csv")), PathBuf::from(home).join("h.csv"));
    }
    assert_eq!(expand_tilde(Path::new("h.csv")), PathBuf::from("h.csv"));
  }
}
