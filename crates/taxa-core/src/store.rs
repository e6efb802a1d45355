//! The `CatalogStore` trait — the remote relational store behind the catalog.
//!
//! The trait is implemented by storage backends (e.g. `taxa-store-sqlite`).
//! [`Catalog`](crate::catalog::Catalog) and
//! [`Directory`](crate::directory::Directory) receive an implementation
//! explicitly; nothing in this workspace holds a global client.

use std::future::Future;

use uuid::Uuid;

use crate::{
  profile::{NewProfile, Profile},
  species::{NewSpecies, Species, SpeciesRecord},
};

/// Table-scoped CRUD over `species` and `profiles`.
///
/// Each method is one round trip. Writes take already-validated payloads;
/// backends do not re-normalise them.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Species ───────────────────────────────────────────────────────────

  /// Every species, newest (`id` descending) first, joined with the author's
  /// profile summary.
  fn list_species(
    &self,
  ) -> impl Future<Output = Result<Vec<Species>, Self::Error>> + Send + '_;

  /// A single species with its author summary. `None` if not found.
  fn get_species(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Species>, Self::Error>> + Send + '_;

  /// Insert a row and return it with its store-assigned `id`.
  fn insert_species(
    &self,
    input: NewSpecies,
  ) -> impl Future<Output = Result<Species, Self::Error>> + Send + '_;

  /// Replace every editable column of row `id`. `author` is left untouched.
  /// Returns `None` if no such row exists.
  fn update_species(
    &self,
    id: i64,
    record: SpeciesRecord,
  ) -> impl Future<Output = Result<Option<Species>, Self::Error>> + Send + '_;

  /// Permanently delete row `id`. Returns `false` if no such row existed.
  fn delete_species(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Every profile, unmasked.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// A single profile. `None` if not found.
  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Create the profile, or refresh its email and display name if it exists.
  fn upsert_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Overwrite the biography of profile `id`. Returns `None` if not found.
  fn update_biography(
    &self,
    id: Uuid,
    biography: Option<String>,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;
}
