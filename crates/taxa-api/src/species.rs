//! Handlers for `/species` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/species` | Newest first, with author summaries; no pagination |
//! | `POST`   | `/species` | Body: [`SpeciesInput`]; returns 201 + stored species |
//! | `GET`    | `/species/:id` | 404 if not found |
//! | `PUT`    | `/species/:id` | Full replace; body: [`SpeciesInput`] |
//! | `DELETE` | `/species/:id?confirm=true` | 428 without `confirm=true` |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use taxa_core::{
  Error as CoreError,
  catalog::{Answered, DeleteOutcome},
  session,
  species::{Species, SpeciesInput},
  store::CatalogStore,
};

use crate::{ApiState, error::ApiError, session::CurrentSession};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /species`
pub async fn list<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  session: CurrentSession,
) -> Result<Json<Vec<Species>>, ApiError> {
  Ok(Json(state.catalog.list(session.get()).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /species/:id`
pub async fn get_one<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  session: CurrentSession,
  Path(id): Path<i64>,
) -> Result<Json<Species>, ApiError> {
  Ok(Json(state.catalog.get(session.get(), id).await?))
}

// ─── Body ─────────────────────────────────────────────────────────────────────

/// Check the session, then decode the body. Malformed JSON keeps the
/// extractor's status; a wrongly typed field is a 422 with `fields`.
fn species_input(
  current: &CurrentSession,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<SpeciesInput, ApiError> {
  session::require(current.get())?;
  let Json(body) = body?;
  let Value::Object(body) = body else {
    return Err(ApiError::NotAnObject);
  };
  SpeciesInput::from_json(&body)
    .map_err(|fields| ApiError::Core(CoreError::Validation(fields)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /species` — returns 201 + the stored [`Species`].
pub async fn create<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  session: CurrentSession,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let input = species_input(&session, body)?;
  let species = state.catalog.create(session.get(), input).await?;
  Ok((StatusCode::CREATED, Json(species)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /species/:id` — every editable field is replaced.
pub async fn update<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  session: CurrentSession,
  Path(id): Path<i64>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Species>, ApiError> {
  let input = species_input(&session, body)?;
  Ok(Json(state.catalog.update(session.get(), id, input).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  /// Set by the client once the user has answered the confirm prompt.
  #[serde(default)]
  pub confirm: bool,
}

/// `DELETE /species/:id?confirm=true`
pub async fn delete<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  session: CurrentSession,
  Path(id): Path<i64>,
  Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
  match state
    .catalog
    .delete(session.get(), id, &Answered(params.confirm))
    .await?
  {
    DeleteOutcome::Deleted => Ok(StatusCode::NO_CONTENT),
    DeleteOutcome::Cancelled => Err(ApiError::ConfirmationRequired),
  }
}
