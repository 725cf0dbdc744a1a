//! `dialscope` — phone-number inspector with a persistent tracking history.
//!
//! # Usage
//!
//! ```
//! dialscope                                  # terminal UI
//! dialscope inspect "+1 650 253 0000"
//! dialscope history list --password secret
//! dialscope history delete 2 5 --password secret
//! dialscope --hash-password                  # prints an argon2 hash
//! ```

mod app;
mod commands;
mod services;
mod settings;
mod ui;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use services::Services;
use settings::Settings;
use tracing::{info, level_filters::LevelFilter};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "dialscope", version, about = "Phone number inspector and tracker")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "dialscope.toml")]
  config: PathBuf,

  /// History CSV file, overriding the config.
  #[arg(long, value_name = "FILE")]
  history: Option<PathBuf>,

  /// Disable spoken announcements.
  #[arg(long)]
  no_speech: bool,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Inspect one number, print the result and record it.
  Inspect {
    /// Number in international format, e.g. "+91 98765 43210".
    number: String,
  },
  /// Manage the tracking history (requires the admin password).
  History {
    #[arg(long, env = "DIALSCOPE_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    action: HistoryAction,
  },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
  /// Print every record with its row number.
  List,
  /// Delete records by the row numbers `list` prints.
  Delete {
    #[arg(required = true, value_name = "ROW")]
    rows: Vec<usize>,
  },
  /// Delete every record.
  Clear {
    /// Skip the refusal; required.
    #[arg(long)]
    yes: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if args.hash_password {
    let password = read_password()?;
    println!("{}", dialscope_services::auth::hash_password(&password)?);
    return Ok(());
  }

  let mut settings = Settings::load(&args.config)?;
  if let Some(history) = args.history {
    settings.history_path = history;
  }
  if args.no_speech {
    settings.speech = false;
  }

  match args.command {
    Some(command) => {
      init_stderr_logging();
      let services = Services::build(&settings).await?;
      run_command(&services, command).await
    }
    None => {
      let _guard = init_file_logging(&settings)?;
      let services = Services::build(&settings).await?;
      info!(history = %services.history_path().display(), "starting terminal UI");
      run_tui(App::new(services, settings.default_prefix)).await
    }
  }
}

async fn run_command(services: &Services, command: Command) -> Result<()> {
  match command {
    Command::Inspect { number } => commands::inspect(services, &number).await,
    Command::History { password, action } => match action {
      HistoryAction::List => commands::history_list(services, &password).await,
      HistoryAction::Delete { rows } => {
        commands::history_delete(services, &password, &rows).await
      }
      HistoryAction::Clear { yes } => commands::history_clear(services, &password, yes).await,
    },
  }
}

// ─── Logging ──────────────────────────────────────────────────────────────────

fn env_filter() -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy()
}

fn init_stderr_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(io::stderr)
    .init();
}

/// The terminal is owned by the UI, so log to `<log_dir>/dialscope.log`.
fn init_file_logging(settings: &Settings) -> Result<WorkerGuard> {
  std::fs::create_dir_all(&settings.log_dir)
    .with_context(|| format!("creating log directory {}", settings.log_dir.display()))?;
  let appender = tracing_appender::rolling::never(&settings.log_dir, "dialscope.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(writer)
    .with_ansi(false)
    .init();
  Ok(guard)
}

fn read_password() -> Result<String> {
  use std::io::{BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_owned())
}

// ─── Terminal UI ──────────────────────────────────────────────────────────────

async fn run_tui(mut app: App) -> Result<()> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // A submitted inspection runs once its "Inspecting…" frame is on screen.
    if app.is_pending() {
      app.run_pending().await;
      continue;
    }

    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key).await? {
          break;
        }
      }
      _ => {}
    }
  }

  Ok(())
}
