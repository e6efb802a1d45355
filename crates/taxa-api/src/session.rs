//! Session extraction and `GET /session`.

use std::convert::Infallible;

use axum::{Json, extract::FromRequestParts, http::request::Parts};
use taxa_core::session::Session;

use crate::error::ApiError;

/// The session attached to the request by the auth layer, if any.
///
/// Never rejects: handlers pass the `Option` on, and the core operations
/// decide whether a session is required.
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
  pub fn get(&self) -> Option<&Session> { self.0.as_ref() }
}

impl<St: Send + Sync> FromRequestParts<St> for CurrentSession {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    Ok(Self(parts.extensions.get::<Session>().copied()))
  }
}

/// `GET /session` — who am I?
pub async fn current(session: CurrentSession) -> Result<Json<Session>, ApiError> {
  session
    .0
    .map(Json)
    .ok_or(ApiError::Core(taxa_core::Error::Unauthenticated))
}
