//! Profile — a registered user of the catalog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::species::ProfileSummary;

/// A user's directory entry. `id` equals the user id carried by their
/// [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub id:           Uuid,
  pub email:        String,
  pub display_name: Option<String>,
  /// Editable only by the owning session.
  pub biography:    Option<String>,
}

impl Profile {
  /// The part of the profile joined onto species rows.
  pub fn summary(&self) -> ProfileSummary {
    ProfileSummary {
      id:           self.id,
      display_name: self.display_name.clone(),
      email:        self.email.clone(),
    }
  }
}

/// Input to [`crate::store::CatalogStore::upsert_profile`].
///
/// Used to provision accounts; an existing row keeps its biography.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
  pub id:           Uuid,
  pub email:        String,
  pub display_name: Option<String>,
}
