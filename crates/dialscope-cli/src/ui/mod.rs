//! TUI rendering: tab bar, active tab body, status bar, confirmation overlay.

pub mod history;
pub mod inspector;
pub mod login;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::app::{App, Level, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // tabs
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_tabs(f, rows[0], app);
  match app.tab {
    Tab::Inspector => inspector::draw(f, rows[1], app),
    Tab::Admin if app.is_unlocked() => history::draw(f, rows[1], app),
    Tab::Admin => login::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);

  if let Some(confirm) = app.confirm {
    draw_confirm(f, area, &confirm.prompt());
  }
}

// ─── Tabs ─────────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
  let admin_title = if app.is_unlocked() { " History " } else { " Admin Login " };
  let selected = match app.tab {
    Tab::Inspector => 0,
    Tab::Admin => 1,
  };

  let date = Local::now().format("%Y-%m-%d").to_string();
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(0), Constraint::Length(date.len() as u16 + 1)])
    .split(area);

  let tabs = Tabs::new(vec![" Inspector ", admin_title])
    .select(selected)
    .style(Style::default().fg(Color::White).bg(Color::DarkGray))
    .highlight_style(
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )
    .divider("│");
  f.render_widget(tabs, cols[0]);
  f.render_widget(
    Paragraph::new(format!("{date} "))
      .style(Style::default().fg(Color::Gray).bg(Color::DarkGray)),
    cols[1],
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.tab {
    Tab::Inspector => (
      "INSPECT",
      "Enter track  Ctrl-L clear  Tab switch  Esc quit",
    ),
    Tab::Admin if app.is_unlocked() => (
      "HISTORY",
      "↑↓/jk move  Space select  a all  d delete  c clear all  r refresh  q quit",
    ),
    Tab::Admin => ("LOGIN", "Type password  Enter log in  Tab switch  Esc quit"),
  };

  let status_span = match &app.status {
    Some(status) => {
      let color = match status.level {
        Level::Info => Color::Green,
        Level::Warning => Color::Yellow,
        Level::Error => Color::Red,
      };
      Span::styled(format!("  {}", status.text), Style::default().fg(color))
    }
    None => Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray)),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, status_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Confirmation ─────────────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, prompt: &str) {
  let popup = centered(area, 50, 5);
  let block = Block::default()
    .title(" Confirm ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));

  f.render_widget(Clear, popup);
  f.render_widget(
    Paragraph::new(prompt)
      .block(block)
      .wrap(Wrap { trim: true }),
    popup,
  );
}

/// A `width` x `height` rect centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [rect] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  rect
}

/// A bordered, labelled block in the house style.
pub(crate) fn pane(title: &str) -> Block<'_> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}
