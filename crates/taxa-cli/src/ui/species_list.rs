//! Species list pane — left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Screen};

/// Render the species list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_species();
  let total = app.species.len();

  let title = if app.search_active || !app.query.is_empty() {
    format!(" Species ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Species ({total}) ")
  };

  let border = if app.screen == Screen::SpeciesList {
    Color::Gray
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|species| {
      let marker = if species.endangered {
        Span::styled("! ", Style::default().fg(Color::Red))
      } else {
        Span::raw("  ")
      };
      let mut spans = vec![
        marker,
        Span::styled(
          species.scientific_name.clone(),
          Style::default().add_modifier(Modifier::ITALIC),
        ),
      ];
      if let Some(common) = &species.common_name {
        spans.push(Span::styled(
          format!("  {common}"),
          Style::default().fg(Color::DarkGray),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search box on the bottom row while searching or filtered.
  if (app.search_active || !app.query.is_empty()) && inner_area.height > 2 {
    let search_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let text = if app.search_active {
      format!("/{}_", app.query)
    } else {
      format!("/{}", app.query)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  if filtered.is_empty() {
    let empty = if total == 0 {
      "No species yet. Press [a] to add one."
    } else {
      "No species match your search."
    };
    f.render_widget(
      Paragraph::new(empty).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
