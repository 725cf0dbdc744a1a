//! Inspector tab: number input and the four result fields.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use crate::{app::App, commands::LABELS, ui::pane};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let [input_area, result_area] =
    Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

  let cursor = if app.is_pending() { "" } else { "_" };
  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::raw(app.input.as_str()),
      Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ]))
    .block(pane("Phone number (+CountryCode Number)")),
    input_area,
  );

  let display = &app.display;
  let values = [
    &display.region,
    &display.carrier,
    &display.timezones,
    &display.ip_location,
  ];
  let lines: Vec<Line> = LABELS
    .iter()
    .zip(values)
    .flat_map(|(label, value)| {
      [
        Line::from(Span::styled(
          *label,
          Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  {value}")),
      ]
    })
    .collect();

  f.render_widget(Paragraph::new(lines).block(pane("Result")), result_area);
}
