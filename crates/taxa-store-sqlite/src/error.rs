//! Error type for `taxa-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("unknown kingdom in row: {0:?}")]
  UnknownKingdom(String),

  /// A row written on this connection could not be read back.
  #[error("{0} row missing after write")]
  MissingAfterWrite(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
