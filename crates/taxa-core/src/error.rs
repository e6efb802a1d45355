//! Error types for `taxa-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::validate::FieldErrors;

#[derive(Debug, Error)]
pub enum Error {
  /// No session was presented. Callers redirect rather than display this.
  #[error("not signed in")]
  Unauthenticated,

  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  /// The store rejected the call. Carries the store's message verbatim.
  #[error("{0}")]
  Store(String),

  #[error("species not found: {0}")]
  SpeciesNotFound(i64),

  #[error("profile not found: {0}")]
  ProfileNotFound(Uuid),

  #[error("profile {0} can only be edited by its owner")]
  Forbidden(Uuid),
}

impl Error {
  /// Wrap a store backend error, keeping only its message.
  pub fn store(e: impl std::error::Error) -> Self { Self::Store(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
