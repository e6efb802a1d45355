//! Species detail pane — right panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use taxa_core::species::Species;

/// Render `species` into `area`. `focused` brightens the border.
pub fn draw(f: &mut Frame, area: Rect, species: Option<&Species>, focused: bool) {
  let title = species
    .map(|s| format!(" {} ", s.scientific_name))
    .unwrap_or_else(|| " Detail ".to_string());
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if focused { Color::Gray } else { Color::DarkGray }));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(species) = species else {
    f.render_widget(
      Paragraph::new("Select a species and press Enter.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let population = species
    .total_population
    .map(|n| n.to_string())
    .unwrap_or_else(|| "unknown".into());
  let status = if species.endangered { "endangered" } else { "not endangered" };

  let mut lines = vec![
    row("common name", species.common_name.as_deref().unwrap_or("—")),
    row("kingdom", &species.kingdom.to_string()),
    row("population", &population),
    row("status", status),
  ];
  if let Some(image) = &species.image {
    lines.push(row("image", image));
  }

  lines.push(Line::from(""));
  match &species.author_profile {
    Some(author) => {
      let name = author.display_name.as_deref().unwrap_or("(no name)");
      lines.push(row("added by", name));
      lines.push(row("contact", &author.email));
    }
    None => lines.push(row("added by", &species.author.to_string())),
  }

  if let Some(description) = &species.description {
    lines.push(Line::from(""));
    lines.push(Line::from(description.clone()));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn row(label: &str, value: &str) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<14}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value.to_string()),
  ])
}
