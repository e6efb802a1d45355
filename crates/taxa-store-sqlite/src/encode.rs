//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings. Kingdoms are stored by
//! their variant name, which the schema's `CHECK` constraint also enforces.

use std::str::FromStr as _;

use taxa_core::{
  profile::Profile,
  species::{Kingdom, ProfileSummary, Species},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Kingdom ──────────────────────────────────────────────────────────────────

pub fn encode_kingdom(k: Kingdom) -> &'static str { k.into() }

pub fn decode_kingdom(s: &str) -> Result<Kingdom> {
  Kingdom::from_str(s).map_err(|_| Error::UnknownKingdom(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from a `species` row joined with `profiles`.
pub struct RawSpecies {
  pub id:               i64,
  pub scientific_name:  String,
  pub common_name:      Option<String>,
  pub kingdom:          String,
  pub total_population: Option<i64>,
  pub description:      Option<String>,
  pub endangered:       bool,
  pub author:           String,
  pub image:            Option<String>,
  // profiles join; all NULL when the author has no profile
  pub profile_id:       Option<String>,
  pub display_name:     Option<String>,
  pub email:            Option<String>,
}

/// Read a row produced by [`crate::schema::SPECIES_SELECT`].
pub fn read_species(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSpecies> {
  Ok(RawSpecies {
    id:               row.get(0)?,
    scientific_name:  row.get(1)?,
    common_name:      row.get(2)?,
    kingdom:          row.get(3)?,
    total_population: row.get(4)?,
    description:      row.get(5)?,
    endangered:       row.get(6)?,
    author:           row.get(7)?,
    image:            row.get(8)?,
    profile_id:       row.get(9)?,
    display_name:     row.get(10)?,
    email:            row.get(11)?,
  })
}

impl RawSpecies {
  pub fn into_species(self) -> Result<Species> {
    let author_profile = match (self.profile_id, self.email) {
      (Some(id), Some(email)) => Some(ProfileSummary {
        id: decode_uuid(&id)?,
        display_name: self.display_name,
        email,
      }),
      _ => None,
    };

    Ok(Species {
      id: self.id,
      scientific_name: self.scientific_name,
      common_name: self.common_name,
      kingdom: decode_kingdom(&self.kingdom)?,
      total_population: self.total_population,
      description: self.description,
      endangered: self.endangered,
      author: decode_uuid(&self.author)?,
      image: self.image,
      author_profile,
    })
  }
}

/// Raw values read from a `profiles` row.
pub struct RawProfile {
  pub id:           String,
  pub email:        String,
  pub display_name: Option<String>,
  pub biography:    Option<String>,
}

/// Read a row produced by [`crate::schema::PROFILE_SELECT`].
pub fn read_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    id:           row.get(0)?,
    email:        row.get(1)?,
    display_name: row.get(2)?,
    biography:    row.get(3)?,
  })
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:           decode_uuid(&self.id)?,
      email:        self.email,
      display_name: self.display_name,
      biography:    self.biography,
    })
  }
}
