//! The species Catalog Store: session checks, validation, and the
//! request lifecycle for reads and mutations against a [`CatalogStore`].

use std::{future::Future, sync::Arc};

use crate::{
  Error, Result,
  session::{self, Session},
  species::{NewSpecies, Species, SpeciesInput},
  store::CatalogStore,
};

/// Shown to the user before a delete is issued.
pub const DELETE_PROMPT: &str =
  "Are you sure you want to delete this species? This action cannot be undone.";

// ─── Confirmation ────────────────────────────────────────────────────────────

/// A human-in-the-loop yes/no step. Deletion asks this before touching the
/// store.
pub trait Confirm: Send + Sync {
  fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send;
}

/// A confirmation answered ahead of time, e.g. by the client's prompt before
/// it sent the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answered(pub bool);

impl Confirm for Answered {
  async fn confirm(&self, _prompt: &str) -> bool { self.0 }
}

/// What happened to a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
  Deleted,
  /// The user declined; the store was not called.
  Cancelled,
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Mediates between the presentation layer and the store for the species
/// collection.
///
/// Cloning is cheap — the store handle is reference-counted.
pub struct Catalog<S> {
  store: Arc<S>,
}

impl<S> Clone for Catalog<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: CatalogStore> Catalog<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// All species, newest first, with author summaries.
  ///
  /// Fails with [`Error::Unauthenticated`] before any fetch when there is no
  /// session.
  pub async fn list(&self, session: Option<&Session>) -> Result<Vec<Species>> {
    session::require(session)?;
    let species = self.store.list_species().await.map_err(Error::store)?;
    tracing::debug!(count = species.len(), "listed species");
    Ok(species)
  }

  /// One species by id.
  pub async fn get(&self, session: Option<&Session>, id: i64) -> Result<Species> {
    session::require(session)?;
    self
      .store
      .get_species(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SpeciesNotFound(id))
  }

  /// Validate `input` and insert it with the session's user as author.
  pub async fn create(
    &self,
    session: Option<&Session>,
    input: SpeciesInput,
  ) -> Result<Species> {
    let session = session::require(session)?;
    let record = input.validate().map_err(Error::Validation)?;

    let species = self
      .store
      .insert_species(NewSpecies { author: session.user_id, record })
      .await
      .map_err(Error::store)?;

    tracing::info!(
      id = species.id,
      author = %session.user_id,
      scientific_name = %species.scientific_name,
      "species created"
    );
    Ok(species)
  }

  /// Validate `input` and replace every editable field of species `id`.
  ///
  /// Last write wins; there is no version check and no ownership check.
  pub async fn update(
    &self,
    session: Option<&Session>,
    id: i64,
    input: SpeciesInput,
  ) -> Result<Species> {
    let session = session::require(session)?;
    let record = input.validate().map_err(Error::Validation)?;

    let species = self
      .store
      .update_species(id, record)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SpeciesNotFound(id))?;

    tracing::info!(id, editor = %session.user_id, "species updated");
    Ok(species)
  }

  /// Ask `confirmer`, then permanently delete species `id`.
  ///
  /// A declined confirmation returns [`DeleteOutcome::Cancelled`] without
  /// calling the store.
  pub async fn delete<C: Confirm>(
    &self,
    session: Option<&Session>,
    id: i64,
    confirmer: &C,
  ) -> Result<DeleteOutcome> {
    let session = session::require(session)?;

    if !confirmer.confirm(DELETE_PROMPT).await {
      tracing::debug!(id, "delete cancelled");
      return Ok(DeleteOutcome::Cancelled);
    }

    let deleted = self.store.delete_species(id).await.map_err(Error::store)?;
    if !deleted {
      return Err(Error::SpeciesNotFound(id));
    }

    tracing::info!(id, by = %session.user_id, "species deleted");
    Ok(DeleteOutcome::Deleted)
  }
}
