//! Add/edit form state for a species.
//!
//! Holds the raw text of every input. [`SpeciesForm::submit_input`] turns it
//! into a validated [`SpeciesInput`] or fills in per-field errors, so nothing
//! invalid is ever sent.

use strum::IntoEnumIterator as _;
use taxa_core::{
  species::{Kingdom, Species, SpeciesInput},
  validate::{FieldErrors, SpeciesField, parse_population_text},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Add,
  Edit(i64),
}

#[derive(Debug, Clone)]
pub struct SpeciesForm {
  pub mode:             FormMode,
  pub focus:            SpeciesField,
  pub scientific_name:  String,
  pub common_name:      String,
  pub kingdom:          Kingdom,
  pub total_population: String,
  pub description:      String,
  pub endangered:       bool,
  pub image:            String,
  pub errors:           FieldErrors,
}

impl SpeciesForm {
  /// An empty add form. Kingdom starts on the first choice.
  pub fn add() -> Self {
    Self {
      mode:             FormMode::Add,
      focus:            SpeciesField::ScientificName,
      scientific_name:  String::new(),
      common_name:      String::new(),
      kingdom:          Kingdom::Animalia,
      total_population: String::new(),
      description:      String::new(),
      endangered:       false,
      image:            String::new(),
      errors:           FieldErrors::default(),
    }
  }

  /// An edit form pre-filled from `species`.
  pub fn edit(species: &Species) -> Self {
    let input = species.to_input();
    Self {
      mode: FormMode::Edit(species.id),
      scientific_name: input.scientific_name,
      common_name: input.common_name.unwrap_or_default(),
      kingdom: species.kingdom,
      total_population: input
        .total_population
        .map(|n| n.to_string())
        .unwrap_or_default(),
      description: input.description.unwrap_or_default(),
      endangered: input.endangered,
      image: input.image.unwrap_or_default(),
      ..Self::add()
    }
  }

  pub fn title(&self) -> &'static str {
    match self.mode {
      FormMode::Add => "Add species",
      FormMode::Edit(_) => "Edit species",
    }
  }

  // ── Focus ─────────────────────────────────────────────────────────────────

  pub fn focus_next(&mut self) {
    let fields: Vec<_> = SpeciesField::iter().collect();
    let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
    self.focus = fields[(i + 1) % fields.len()];
  }

  pub fn focus_prev(&mut self) {
    let fields: Vec<_> = SpeciesField::iter().collect();
    let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
    self.focus = fields[(i + fields.len() - 1) % fields.len()];
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  /// The text buffer behind the focused field, if it is a text input.
  fn focused_text(&mut self) -> Option<&mut String> {
    match self.focus {
      SpeciesField::ScientificName => Some(&mut self.scientific_name),
      SpeciesField::CommonName => Some(&mut self.common_name),
      SpeciesField::TotalPopulation => Some(&mut self.total_population),
      SpeciesField::Description => Some(&mut self.description),
      SpeciesField::Image => Some(&mut self.image),
      SpeciesField::Kingdom | SpeciesField::Endangered => None,
    }
  }

  pub fn push_char(&mut self, c: char) {
    match self.focus {
      SpeciesField::Endangered | SpeciesField::Kingdom if c == ' ' => self.toggle(),
      _ => {
        if let Some(text) = self.focused_text() {
          text.push(c);
        }
      }
    }
  }

  pub fn pop_char(&mut self) {
    if let Some(text) = self.focused_text() {
      text.pop();
    }
  }

  /// Space on the checkbox; cycles forward on the kingdom picker.
  pub fn toggle(&mut self) {
    match self.focus {
      SpeciesField::Endangered => self.endangered = !self.endangered,
      SpeciesField::Kingdom => self.cycle_kingdom(1),
      _ => {}
    }
  }

  /// Step the kingdom picker by `step` choices, wrapping around.
  pub fn cycle_kingdom(&mut self, step: isize) {
    let kingdoms: Vec<_> = Kingdom::iter().collect();
    let len = kingdoms.len() as isize;
    let i = kingdoms.iter().position(|k| *k == self.kingdom).unwrap_or(0) as isize;
    self.kingdom = kingdoms[(i + step).rem_euclid(len) as usize];
  }

  // ── Submit ────────────────────────────────────────────────────────────────

  /// Build the request body from the form, validating locally first.
  ///
  /// On failure the messages are stored on the form and `None` is returned.
  pub fn submit_input(&mut self) -> Option<SpeciesInput> {
    let mut errors = FieldErrors::default();

    let total_population = parse_population_text(&self.total_population)
      .map_err(|m| errors.insert(SpeciesField::TotalPopulation, m))
      .unwrap_or(None);

    let input = SpeciesInput {
      scientific_name: self.scientific_name.clone(),
      common_name: Some(self.common_name.clone()),
      kingdom: self.kingdom.to_string(),
      total_population,
      description: Some(self.description.clone()),
      endangered: self.endangered,
      image: Some(self.image.clone()),
    };

    if let Err(invalid) = input.validate() {
      for (field, message) in invalid.iter() {
        errors.insert(field, message);
      }
    }

    self.errors = errors;
    self.errors.is_empty().then_some(input)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use uuid::Uuid;

  fn lion() -> Species {
    Species {
      id:               7,
      scientific_name:  "Panthera leo".into(),
      common_name:      Some("Lion".into()),
      kingdom:          Kingdom::Animalia,
      total_population: Some(23_000),
      description:      None,
      endangered:       true,
      author:           Uuid::new_v4(),
      image:            None,
      author_profile:   None,
    }
  }

  #[test]
  fn edit_prefills_from_species() {
    let form = SpeciesForm::edit(&lion());
    assert_eq!(form.mode, FormMode::Edit(7));
    assert_eq!(form.scientific_name, "Panthera leo");
    assert_eq!(form.common_name, "Lion");
    assert_eq!(form.total_population, "23000");
    assert_eq!(form.description, "");
    assert!(form.endangered);
  }

  #[test]
  fn blank_name_blocks_submit() {
    let mut form = SpeciesForm::add();
    assert!(form.submit_input().is_none());
    assert_eq!(form.errors.get(SpeciesField::ScientificName), Some("is required"));
  }

  #[test]
  fn population_errors_are_reported_per_field() {
    let mut form = SpeciesForm::add();
    form.scientific_name = "Panthera leo".into();

    form.total_population = "lots".into();
    assert!(form.submit_input().is_none());
    assert_eq!(form.errors.get(SpeciesField::TotalPopulation), Some("must be a number"));

    form.total_population = "0".into();
    assert!(form.submit_input().is_none());
    assert_eq!(
      form.errors.get(SpeciesField::TotalPopulation),
      Some("must be greater than 0")
    );
  }

  #[test]
  fn valid_form_clears_errors_and_yields_input() {
    let mut form = SpeciesForm::add();
    form.submit_input();
    assert!(!form.errors.is_empty());

    form.scientific_name = "Quercus robur".into();
    form.kingdom = Kingdom::Plantae;
    form.total_population = "1200".into();
    let input = form.submit_input().unwrap();
    assert!(form.errors.is_empty());
    assert_eq!(input.kingdom, "Plantae");
    assert_eq!(input.total_population, Some(serde_json::Number::from(1200)));
  }

  #[test]
  fn kingdom_picker_wraps() {
    let mut form = SpeciesForm::add();
    form.cycle_kingdom(-1);
    assert_eq!(form.kingdom, Kingdom::Bacteria);
    form.cycle_kingdom(1);
    assert_eq!(form.kingdom, Kingdom::Animalia);
  }

  #[test]
  fn typing_goes_to_the_focused_field() {
    let mut form = SpeciesForm::add();
    for c in "Leo".chars() {
      form.push_char(c);
    }
    form.focus_next();
    form.push_char('L');
    form.pop_char();
    form.push_char('X');
    assert_eq!(form.scientific_name, "Leo");
    assert_eq!(form.common_name, "X");

    form.focus = SpeciesField::Endangered;
    form.push_char(' ');
    assert!(form.endangered);
  }

  #[test]
  fn space_cycles_the_kingdom_picker() {
    let mut form = SpeciesForm::add();
    form.focus = SpeciesField::Kingdom;
    form.push_char(' ');
    assert_eq!(form.kingdom, Kingdom::Plantae);
    form.push_char('x');
    assert_eq!(form.kingdom, Kingdom::Plantae);
    assert_eq!(form.scientific_name, "");
  }

  #[test]
  fn focus_wraps_both_ways() {
    let mut form = SpeciesForm::add();
    form.focus_prev();
    assert_eq!(form.focus, SpeciesField::Image);
    form.focus_next();
    assert_eq!(form.focus, SpeciesField::ScientificName);
  }
}
