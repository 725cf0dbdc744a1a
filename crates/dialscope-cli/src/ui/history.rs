//! History tab: the tracked-numbers table with multi-row selection.

use dialscope_core::record::HEADER;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Span,
  widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{app::App, ui::pane};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let title = if app.selected.is_empty() {
    format!("Tracking history ({})", app.history.len())
  } else {
    format!(
      "Tracking history ({}, {} selected)",
      app.history.len(),
      app.selected.len()
    )
  };
  let block = pane(&title);

  if app.history.is_empty() {
    f.render_widget(
      Paragraph::new(Span::styled(
        "No records yet.",
        Style::default().fg(Color::DarkGray),
      ))
      .block(block),
      area,
    );
    return;
  }

  let header = Row::new(
    std::iter::once(Cell::from(" "))
      .chain(HEADER.iter().map(|h| Cell::from(*h))),
  )
  .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

  let rows = app.history.iter().enumerate().map(|(i, record)| {
    let marked = app.selected.contains(&i);
    let mark = if marked { "●" } else { " " };
    let style = if marked {
      Style::default().fg(Color::Yellow)
    } else {
      Style::default()
    };
    Row::new(
      std::iter::once(Cell::from(mark))
        .chain(record.fields().into_iter().map(|v| Cell::from(v.to_owned()))),
    )
    .style(style)
  });

  let widths = [
    Constraint::Length(1),
    Constraint::Length(16),
    Constraint::Percentage(25),
    Constraint::Percentage(15),
    Constraint::Percentage(25),
    Constraint::Min(10),
  ];
  let table = Table::new(rows, widths)
    .header(header)
    .block(block)
    .row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    );

  let mut state = TableState::default().with_selected(Some(app.cursor));
  f.render_stateful_widget(table, area, &mut state);
}
