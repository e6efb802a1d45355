//! Add/edit form — full body.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use strum::IntoEnumIterator as _;
use taxa_core::{species::Kingdom, validate::SpeciesField};

use crate::form::SpeciesForm;

/// Render `form` into `area`. Each field's error, if any, sits right below it.
pub fn draw(f: &mut Frame, area: Rect, form: &SpeciesForm, saving: bool) {
  let title = if saving {
    format!(" {} (saving…) ", form.title())
  } else {
    format!(" {} ", form.title())
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Gray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = Vec::new();
  for field in SpeciesField::iter() {
    let focused = field == form.focus;
    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };

    lines.push(Line::from(vec![
      Span::styled(format!("{:<18}", label(field)), label_style),
      value(form, field, focused),
    ]));

    if let Some(message) = form.errors.get(field) {
      lines.push(Line::from(Span::styled(
        format!("{:<18}{message}", ""),
        Style::default().fg(Color::Red),
      )));
    }
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn label(field: SpeciesField) -> &'static str {
  match field {
    SpeciesField::ScientificName => "Scientific name*",
    SpeciesField::CommonName => "Common name",
    SpeciesField::Kingdom => "Kingdom*",
    SpeciesField::TotalPopulation => "Total population",
    SpeciesField::Description => "Description",
    SpeciesField::Endangered => "Endangered",
    SpeciesField::Image => "Image URL",
  }
}

fn value(form: &SpeciesForm, field: SpeciesField, focused: bool) -> Span<'static> {
  let cursor = if focused { "_" } else { "" };
  match field {
    SpeciesField::Kingdom => {
      let choices: Vec<String> = Kingdom::iter()
        .map(|k| {
          if k == form.kingdom {
            format!("[{k}]")
          } else {
            k.to_string()
          }
        })
        .collect();
      Span::raw(choices.join(" "))
    }
    SpeciesField::Endangered => {
      Span::raw(if form.endangered { "[x]" } else { "[ ]" })
    }
    SpeciesField::ScientificName => Span::raw(format!("{}{cursor}", form.scientific_name)),
    SpeciesField::CommonName => Span::raw(format!("{}{cursor}", form.common_name)),
    SpeciesField::TotalPopulation => Span::raw(format!("{}{cursor}", form.total_population)),
    SpeciesField::Description => Span::raw(format!("{}{cursor}", form.description)),
    SpeciesField::Image => Span::raw(format!("{}{cursor}", form.image)),
  }
}
