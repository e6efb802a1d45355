//! Synchronous validate-then-submit for species forms.
//!
//! [`SpeciesInput::validate`] either yields a normalised [`SpeciesRecord`] or
//! a [`FieldErrors`] map with one message per offending field. No write may
//! happen without a record, so a failed validation never reaches a store.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum::{Display, EnumIter, IntoEnumIterator as _};

use crate::species::{Kingdom, SpeciesInput, SpeciesRecord};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// A form field of the species add/edit dialogs.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpeciesField {
  ScientificName,
  CommonName,
  Kingdom,
  TotalPopulation,
  Description,
  Endangered,
  Image,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Per-field validation messages. Serialises as `{"field": "message"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<SpeciesField, String>);

impl FieldErrors {
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn get(&self, field: SpeciesField) -> Option<&str> {
    self.0.get(&field).map(String::as_str)
  }

  pub fn insert(&mut self, field: SpeciesField, message: impl Into<String>) {
    self.0.insert(field, message.into());
  }

  pub fn iter(&self) -> impl Iterator<Item = (SpeciesField, &str)> {
    self.0.iter().map(|(f, m)| (*f, m.as_str()))
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, (field, message)) in self.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{field} {message}")?;
    }
    Ok(())
  }
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Trim an optional text field; blank becomes `None`.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
}

/// Parse a kingdom name; exact, case-sensitive match against the six
/// variants.
pub fn parse_kingdom(value: &str) -> Result<Kingdom, String> {
  Kingdom::from_str(value.trim()).map_err(|_| {
    let names: Vec<&'static str> = Kingdom::iter().map(Into::into).collect();
    format!("must be one of {}", names.join(", "))
  })
}

/// Check a population count: absent is fine, otherwise a positive integer.
pub fn parse_population(value: &serde_json::Number) -> Result<i64, String> {
  if let Some(n) = value.as_i64() {
    return if n > 0 {
      Ok(n)
    } else {
      Err("must be greater than 0".to_owned())
    };
  }
  if value.as_u64().is_some() {
    return Err("is too large".to_owned());
  }
  match value.as_f64() {
    Some(f) if f.fract() != 0.0 || !f.is_finite() => {
      Err("must be a whole number".to_owned())
    }
    Some(f) if f <= 0.0 => Err("must be greater than 0".to_owned()),
    // Whole floats such as `20000.0`; `i64::MAX as f64` rounds up to 2^63.
    Some(f) if f < i64::MAX as f64 => Ok(f as i64),
    _ => Err("is too large".to_owned()),
  }
}

/// Parse the free-text population box of a form. Blank means absent.
pub fn parse_population_text(
  text: &str,
) -> Result<Option<serde_json::Number>, String> {
  let text = text.trim();
  if text.is_empty() {
    return Ok(None);
  }
  if let Ok(n) = text.parse::<i64>() {
    return Ok(Some(n.into()));
  }
  text
    .parse::<f64>()
    .ok()
    .and_then(serde_json::Number::from_f64)
    .map(Some)
    .ok_or_else(|| "must be a number".to_owned())
}

// ─── Decoding ────────────────────────────────────────────────────────────────

/// Decode one member of a JSON object. Missing and `null` give the default;
/// a value of the wrong type records `message` against `field`.
fn decode_field<T: DeserializeOwned + Default>(
  body: &serde_json::Map<String, serde_json::Value>,
  field: SpeciesField,
  message: &str,
  errors: &mut FieldErrors,
) -> T {
  match body.get(&field.to_string()) {
    None | Some(serde_json::Value::Null) => T::default(),
    Some(value) => T::deserialize(value).unwrap_or_else(|_| {
      errors.insert(field, message);
      T::default()
    }),
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

impl SpeciesInput {
  /// Decode a request body field by field.
  ///
  /// A field of the wrong type is reported against that field, together with
  /// whatever [`validate`](Self::validate) finds in the rest of the body.
  /// Unknown members are ignored.
  pub fn from_json(
    body: &serde_json::Map<String, serde_json::Value>,
  ) -> Result<Self, FieldErrors> {
    use SpeciesField as F;

    let mut errors = FieldErrors::default();
    let input = Self {
      scientific_name:  decode_field(body, F::ScientificName, "must be text", &mut errors),
      common_name:      decode_field(body, F::CommonName, "must be text", &mut errors),
      kingdom:          decode_field(body, F::Kingdom, "must be text", &mut errors),
      total_population: decode_field(body, F::TotalPopulation, "must be a number", &mut errors),
      description:      decode_field(body, F::Description, "must be text", &mut errors),
      endangered:       decode_field(body, F::Endangered, "must be true or false", &mut errors),
      image:            decode_field(body, F::Image, "must be text", &mut errors),
    };

    if errors.is_empty() {
      return Ok(input);
    }
    if let Err(more) = input.validate() {
      for (field, message) in more.iter() {
        if errors.get(field).is_none() {
          errors.insert(field, message);
        }
      }
    }
    Err(errors)
  }

  /// Validate and normalise every field, collecting all failures.
  pub fn validate(&self) -> Result<SpeciesRecord, FieldErrors> {
    let mut errors = FieldErrors::default();

    let scientific_name = self.scientific_name.trim().to_owned();
    if scientific_name.is_empty() {
      errors.insert(SpeciesField::ScientificName, "is required");
    }

    let kingdom = parse_kingdom(&self.kingdom)
      .map_err(|m| errors.insert(SpeciesField::Kingdom, m))
      .ok();

    let total_population = match &self.total_population {
      None => Some(None),
      Some(n) => parse_population(n)
        .map(Some)
        .map_err(|m| errors.insert(SpeciesField::TotalPopulation, m))
        .ok(),
    };

    match (kingdom, total_population) {
      (Some(kingdom), Some(total_population)) if errors.is_empty() => {
        Ok(SpeciesRecord {
          scientific_name,
          common_name: normalize_text(self.common_name.as_deref()),
          kingdom,
          total_population,
          description: normalize_text(self.description.as_deref()),
          endangered: self.endangered,
          image: normalize_text(self.image.as_deref()),
        })
      }
      _ => Err(errors),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lion() -> SpeciesInput {
    SpeciesInput {
      scientific_name: "Panthera leo".into(),
      kingdom: "Animalia".into(),
      total_population: Some(20000.into()),
      ..Default::default()
    }
  }

  #[test]
  fn valid_input_normalises_blank_text_to_none() {
    let mut input = lion();
    input.common_name = Some("".into());
    input.description = Some("   ".into());
    input.image = Some("".into());

    let record = input.validate().unwrap();
    assert_eq!(record.common_name, None);
    assert_eq!(record.description, None);
    assert_eq!(record.image, None);
    assert_eq!(record.kingdom, Kingdom::Animalia);
    assert_eq!(record.total_population, Some(20000));
    assert!(!record.endangered);
  }

  #[test]
  fn text_fields_are_trimmed() {
    let mut input = lion();
    input.scientific_name = "  Panthera leo ".into();
    input.common_name = Some(" Lion ".into());

    let record = input.validate().unwrap();
    assert_eq!(record.scientific_name, "Panthera leo");
    assert_eq!(record.common_name.as_deref(), Some("Lion"));
  }

  #[test]
  fn empty_scientific_name_is_rejected() {
    let mut input = lion();
    input.scientific_name = "   ".into();

    let errors = input.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(SpeciesField::ScientificName), Some("is required"));
  }

  #[test]
  fn every_kingdom_is_accepted() {
    for kingdom in Kingdom::iter() {
      let mut input = lion();
      input.kingdom = kingdom.to_string();
      assert_eq!(input.validate().unwrap().kingdom, kingdom);
    }
  }

  #[test]
  fn unknown_kingdoms_are_rejected() {
    for bad in ["", "Animal", "animalia", "ANIMALIA", "Chromista", "Viruses"] {
      let mut input = lion();
      input.kingdom = bad.into();
      let errors = input.validate().unwrap_err();
      assert!(
        errors.get(SpeciesField::Kingdom).is_some(),
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn population_must_be_a_positive_integer() {
    let bad: Vec<serde_json::Number> = vec![
      0.into(),
      (-5).into(),
      serde_json::Number::from_f64(2.5).unwrap(),
      serde_json::Number::from_f64(-1.0).unwrap(),
      u64::MAX.into(),
    ];
    for n in bad {
      let mut input = lion();
      input.total_population = Some(n.clone());
      let errors = input.validate().unwrap_err();
      assert!(
        errors.get(SpeciesField::TotalPopulation).is_some(),
        "{n} should be rejected"
      );
    }
  }

  #[test]
  fn population_may_be_absent_or_a_whole_float() {
    let mut input = lion();
    input.total_population = None;
    assert_eq!(input.validate().unwrap().total_population, None);

    input.total_population = serde_json::Number::from_f64(300.0);
    assert_eq!(input.validate().unwrap().total_population, Some(300));
  }

  #[test]
  fn all_errors_are_reported_together() {
    let input = SpeciesInput {
      scientific_name: "".into(),
      kingdom: "Dragons".into(),
      total_population: Some(0.into()),
      ..Default::default()
    };
    let errors = input.validate().unwrap_err();
    assert_eq!(errors.len(), 3);
  }

  #[test]
  fn field_errors_serialise_by_field_name() {
    let mut errors = FieldErrors::default();
    errors.insert(SpeciesField::ScientificName, "is required");
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json, serde_json::json!({ "scientific_name": "is required" }));
  }

  fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
      serde_json::Value::Object(map) => map,
      other => panic!("not an object: {other}"),
    }
  }

  #[test]
  fn from_json_reads_a_well_typed_body() {
    let body = object(serde_json::json!({
      "scientific_name": "Panthera leo",
      "kingdom": "Animalia",
      "total_population": 20000,
      "common_name": null,
      "endangered": true,
      "extra": [1, 2],
    }));
    let input = SpeciesInput::from_json(&body).unwrap();
    assert_eq!(input.scientific_name, "Panthera leo");
    assert_eq!(input.common_name, None);
    assert_eq!(input.total_population, Some(20000.into()));
    assert!(input.endangered);
  }

  #[test]
  fn from_json_null_kingdom_is_a_kingdom_error() {
    let body = object(serde_json::json!({ "scientific_name": "X", "kingdom": null }));
    let errors = SpeciesInput::from_json(&body).unwrap().validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.get(SpeciesField::Kingdom).is_some());
  }

  #[test]
  fn from_json_reports_wrong_types_with_the_other_errors() {
    let body = object(serde_json::json!({
      "scientific_name": "",
      "kingdom": 3,
      "total_population": "many",
      "endangered": "yes",
    }));
    let errors = SpeciesInput::from_json(&body).unwrap_err();
    assert_eq!(errors.get(SpeciesField::Kingdom), Some("must be text"));
    assert_eq!(errors.get(SpeciesField::TotalPopulation), Some("must be a number"));
    assert_eq!(errors.get(SpeciesField::Endangered), Some("must be true or false"));
    assert_eq!(errors.get(SpeciesField::ScientificName), Some("is required"));
  }

  #[test]
  fn population_text_parsing() {
    assert_eq!(parse_population_text("  ").unwrap(), None);
    assert_eq!(parse_population_text("42").unwrap(), Some(42.into()));
    assert!(parse_population_text("1.5").unwrap().is_some());
    assert!(parse_population_text("lots").is_err());
  }
}
