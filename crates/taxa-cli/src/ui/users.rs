//! User directory, with the biography editor for the caller's own row.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Screen};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  draw_list(f, cols[0], app);
  draw_profile(f, cols[1], app);
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(format!(" Users ({}) ", app.profiles.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Gray));

  let items: Vec<ListItem> = app
    .profiles
    .iter()
    .map(|p| {
      let mut spans = vec![Span::raw(p.email.clone())];
      if p.id == app.session.user_id {
        spans.push(Span::styled(" (you)", Style::default().fg(Color::Green)));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!app.profiles.is_empty()).then_some(app.profile_cursor));

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    area,
    &mut state,
  );
}

fn draw_profile(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Profile ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(profile) = app.profiles.get(app.profile_cursor) else {
    f.render_widget(
      Paragraph::new("No users.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let label = |s: &str| {
    Span::styled(
      format!("{s:<14}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )
  };

  let mut lines = vec![
    Line::from(vec![label("email"), Span::raw(profile.email.clone())]),
    Line::from(vec![
      label("name"),
      Span::raw(profile.display_name.clone().unwrap_or_else(|| "—".into())),
    ]),
    Line::from(""),
    Line::from(label("biography")),
  ];

  if app.screen == Screen::BioEditor {
    let title = if app.controls.biography.is_pending() {
      " saving… "
    } else {
      " Enter to save "
    };
    lines.push(Line::from(Span::styled(
      format!("{}_", app.bio_draft),
      Style::default().fg(Color::Yellow),
    )));
    lines.push(Line::from(Span::styled(title, Style::default().fg(Color::DarkGray))));
  } else {
    lines.push(Line::from(
      profile
        .biography
        .clone()
        .unwrap_or_else(|| "(none)".into()),
    ));
    if app.cursor_profile_is_mine() {
      lines.push(Line::from(""));
      lines.push(Line::from(Span::styled(
        "Press Enter to edit your biography.",
        Style::default().fg(Color::DarkGray),
      )));
    }
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
