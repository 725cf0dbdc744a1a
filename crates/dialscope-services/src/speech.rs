//! Spoken announcements through a local text-to-speech program.

use std::process::Stdio;

use dialscope_core::{Error, service::Announcer};
use tokio::process::Command;
use tracing::debug;

/// Speech program used when none is configured.
pub fn default_program() -> &'static str {
  if cfg!(target_os = "macos") { "say" } else { "espeak" }
}

/// Runs `program [args...] <text>` and waits for it to finish.
#[derive(Debug, Clone)]
pub struct CommandAnnouncer {
  program: String,
  args:    Vec<String>,
}

impl CommandAnnouncer {
  pub fn new(program: impl Into<String>) -> Self {
    Self { program: program.into(), args: Vec::new() }
  }

  pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }
}

impl Announcer for CommandAnnouncer {
  async fn say(&self, text: &str) -> dialscope_core::Result<()> {
    let status = Command::new(&self.program)
      .args(&self.args)
      .arg(text)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .await
      .map_err(|e| Error::Announce(format!("{}: {e}", self.program)))?;

    if status.success() {
      debug!(program = %self.program, "spoke announcement");
      Ok(())
    } else {
      Err(Error::Announce(format!("{} exited with {status}", self.program)))
    }
  }
}

/// The announcer selected at startup.
#[derive(Debug, Clone)]
pub enum Speech {
  Command(CommandAnnouncer),
  /// Speech disabled.
  Silent,
}

impl Announcer for Speech {
  async fn say(&self, text: &str) -> dialscope_core::Result<()> {
    match self {
      Self::Command(cmd) => cmd.say(text).await,
      Self::Silent => Ok(()),
    }
  }
}
