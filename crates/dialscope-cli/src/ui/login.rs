//! Admin Login tab.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Style},
  widgets::Paragraph,
};

use crate::{app::App, ui::pane};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let [hint_area, input_area, _] = Layout::vertical([
    Constraint::Length(2),
    Constraint::Length(3),
    Constraint::Min(0),
  ])
  .areas(area);

  f.render_widget(
    Paragraph::new(" Enter the admin password to view tracking history.")
      .style(Style::default().fg(Color::DarkGray)),
    hint_area,
  );

  let masked = format!("{}_", "*".repeat(app.password.chars().count()));
  f.render_widget(Paragraph::new(masked).block(pane("Password")), input_area);
}
