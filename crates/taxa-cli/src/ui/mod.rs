//! TUI rendering — orchestrates all panes.

pub mod species_detail;
pub mod species_form;
pub mod species_list;
pub mod users;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use taxa_core::{catalog::DELETE_PROMPT, notice::NoticeLevel};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let who = app
    .me
    .as_ref()
    .map(|p| p.email.clone())
    .unwrap_or_else(|| app.session.user_id.to_string());

  let left = Span::styled(
    " taxa  [/] search  [a] add  [u] users  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{who}  {date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  match app.screen {
    Screen::Users | Screen::BioEditor => {
      users::draw(f, area, app);
      return;
    }
    Screen::Form => {
      if let Some(form) = &app.form {
        species_form::draw(f, area, form, app.controls.submit.is_pending());
      }
      return;
    }
    _ => {}
  }

  // Split into left list pane (40%) and right detail pane (60%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  species_list::draw(f, cols[0], app);

  let shown = match app.screen {
    Screen::SpeciesList => app.cursor_species(),
    _ => app.selected_species(),
  };
  species_detail::draw(f, cols[1], shown, app.screen != Screen::SpeciesList);

  if app.screen == Screen::ConfirmDelete {
    draw_confirm(f, cols[1], app.controls.delete.is_pending());
  }
}

fn draw_confirm(f: &mut Frame, area: Rect, deleting: bool) {
  let popup = centered(area, 60, 7);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(" Delete species ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let text = vec![
    Line::from(DELETE_PROMPT),
    Line::from(""),
    Line::from(Span::styled(
      if deleting { "deleting…" } else { "[y] delete   [n] cancel" },
      Style::default().add_modifier(Modifier::BOLD),
    )),
  ];
  f.render_widget(
    Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
    popup,
  );
}

/// A rect of `percent_x` width and `height` rows centred in `area`.
fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
  let width = area.width * percent_x / 100;
  Rect {
    x:      area.x + (area.width.saturating_sub(width)) / 2,
    y:      area.y + (area.height.saturating_sub(height)) / 2,
    width,
    height: height.min(area.height),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    Screen::SpeciesList if app.search_active => (
      "SEARCH",
      "Type to filter  Esc clear  Enter done",
    ),
    Screen::SpeciesList => (
      "LIST",
      "↑↓/jk navigate  / search  Enter detail  a add  r reload  u users  q quit",
    ),
    Screen::SpeciesDetail => ("DETAIL", "e edit  d delete  Esc back  q quit"),
    Screen::Form => ("FORM", "Tab next  ←→ kingdom  Space toggle  Enter save  Esc cancel"),
    Screen::ConfirmDelete => ("CONFIRM", "y delete  n cancel"),
    Screen::Users => ("USERS", "↑↓/jk navigate  Enter edit own bio  r reload  Esc back"),
    Screen::BioEditor => ("BIO", "Type to edit  Enter save  Esc cancel"),
  };

  let (message, message_style) = match &app.notice {
    Some(notice) => {
      let color = match notice.level {
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
      };
      (notice.to_string(), Style::default().fg(color))
    }
    None => (hints.to_string(), Style::default().fg(Color::DarkGray)),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let message_span = Span::styled(format!("  {message}"), message_style);

  let line = Line::from(vec![mode_span, message_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
