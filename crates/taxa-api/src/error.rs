//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use taxa_core::Error as CoreError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  /// A delete arrived without `?confirm=true`.
  #[error("deletion must be confirmed")]
  ConfirmationRequired,

  /// The body was not JSON, or was sent without a JSON content type.
  #[error(transparent)]
  Body(#[from] JsonRejection),

  #[error("request body must be a JSON object")]
  NotAnObject,
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Core(CoreError::Unauthenticated) => StatusCode::UNAUTHORIZED,
      ApiError::Core(CoreError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Core(CoreError::SpeciesNotFound(_) | CoreError::ProfileNotFound(_)) => {
        StatusCode::NOT_FOUND
      }
      ApiError::Core(CoreError::Forbidden(_)) => StatusCode::FORBIDDEN,
      ApiError::Core(CoreError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::ConfirmationRequired => StatusCode::PRECONDITION_REQUIRED,
      ApiError::Body(rejection) => rejection.status(),
      ApiError::NotAnObject => StatusCode::UNPROCESSABLE_ENTITY,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    let body = match &self {
      ApiError::Core(CoreError::Validation(fields)) => {
        json!({ "error": "validation failed", "fields": fields })
      }
      other => json!({ "error": other.to_string() }),
    };

    let mut res = (status, Json(body)).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"taxa\""),
      );
    }
    res
  }
}
