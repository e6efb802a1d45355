//! Handlers for `/profiles` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profiles` | Every profile, emails included |
//! | `GET`  | `/profiles/me` | The caller's own profile |
//! | `PUT`  | `/profiles/:id/biography` | Owner only; body: `{"biography":"..."}` |

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use taxa_core::{profile::Profile, store::CatalogStore};
use uuid::Uuid;

use crate::{ApiState, error::ApiError, session::CurrentSession};

/// `GET /profiles`
pub async fn list<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  session: CurrentSession,
) -> Result<Json<Vec<Profile>>, ApiError> {
  Ok(Json(state.directory.list(session.get()).await?))
}

/// `GET /profiles/me`
pub async fn me<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  session: CurrentSession,
) -> Result<Json<Profile>, ApiError> {
  Ok(Json(state.directory.me(session.get()).await?))
}

#[derive(Debug, Deserialize)]
pub struct BiographyBody {
  pub biography: Option<String>,
}

/// `PUT /profiles/:id/biography`
pub async fn update_biography<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  session: CurrentSession,
  Path(id): Path<Uuid>,
  Json(body): Json<BiographyBody>,
) -> Result<Json<Profile>, ApiError> {
  let profile = state
    .directory
    .update_biography(session.get(), id, body.biography.as_deref())
    .await?;
  Ok(Json(profile))
}
