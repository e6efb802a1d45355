//! Species — the catalogued organism and its write payloads.
//!
//! Three shapes exist for one record:
//! - [`SpeciesInput`]: raw form data exactly as a user typed it.
//! - [`SpeciesRecord`]: the validated, normalised payload a store writes.
//! - [`Species`]: a stored row, with its store-assigned id and joined author.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

// ─── Kingdom ─────────────────────────────────────────────────────────────────

/// Biological kingdom. Closed set; anything else is rejected on input and by
/// the store.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum Kingdom {
  Animalia,
  Plantae,
  Fungi,
  Protista,
  Archaea,
  Bacteria,
}

// ─── Author summary ──────────────────────────────────────────────────────────

/// The public part of the author's profile, joined onto every listed species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
  pub id:           Uuid,
  pub display_name: Option<String>,
  pub email:        String,
}

// ─── Species ─────────────────────────────────────────────────────────────────

/// A stored species row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
  /// Store-assigned; never reused.
  pub id:               i64,
  pub scientific_name:  String,
  pub common_name:      Option<String>,
  pub kingdom:          Kingdom,
  pub total_population: Option<i64>,
  pub description:      Option<String>,
  pub endangered:       bool,
  /// The creating user. Set once, never changed by updates.
  pub author:           Uuid,
  pub image:            Option<String>,
  /// `None` when the author has no profile row.
  #[serde(rename = "profiles")]
  pub author_profile:   Option<ProfileSummary>,
}

impl Species {
  /// The editable fields of this row, as form input. Used to prefill the
  /// edit form.
  pub fn to_input(&self) -> SpeciesInput {
    SpeciesInput {
      scientific_name:  self.scientific_name.clone(),
      common_name:      self.common_name.clone(),
      kingdom:          self.kingdom.to_string(),
      total_population: self.total_population.map(serde_json::Number::from),
      description:      self.description.clone(),
      endangered:       self.endangered,
      image:            self.image.clone(),
    }
  }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Unvalidated species fields, as submitted by the add and edit forms.
///
/// Request bodies go through [`SpeciesInput::from_json`], which decodes field
/// by field so that type errors surface together with the
/// [`validate`](SpeciesInput::validate) errors rather than one at a time from
/// the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInput {
  #[serde(default)]
  pub scientific_name:  String,
  #[serde(default)]
  pub common_name:      Option<String>,
  #[serde(default)]
  pub kingdom:          String,
  /// Kept as a raw JSON number so fractional and negative values can be
  /// reported as validation errors.
  #[serde(default)]
  pub total_population: Option<serde_json::Number>,
  #[serde(default)]
  pub description:      Option<String>,
  #[serde(default)]
  pub endangered:       bool,
  #[serde(default)]
  pub image:            Option<String>,
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A validated species payload; only produced by
/// [`SpeciesInput::validate`]. Optional text fields are trimmed and never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesRecord {
  pub scientific_name:  String,
  pub common_name:      Option<String>,
  pub kingdom:          Kingdom,
  pub total_population: Option<i64>,
  pub description:      Option<String>,
  pub endangered:       bool,
  pub image:            Option<String>,
}

/// Input to [`crate::store::CatalogStore::insert_species`].
/// The `id` is always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpecies {
  pub author: Uuid,
  pub record: SpeciesRecord,
}
