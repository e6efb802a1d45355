//! Async HTTP client wrapping the taxa JSON API.
//!
//! Failures come back as [`taxa_core::Error`] so the UI can treat them the
//! same way the server does: 401 is [`Error::Unauthenticated`], 422 carries
//! the per-field messages, and anything else keeps the server's message
//! verbatim.

use std::time::Duration;

use anyhow::Context as _;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use taxa_core::{
  Error, Result,
  profile::Profile,
  session::Session,
  species::{Species, SpeciesInput},
  validate::FieldErrors,
};
use uuid::Uuid;

/// Connection settings for the taxa API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the taxa JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Shape of every non-2xx body the server sends.
#[derive(Deserialize)]
struct ErrorBody {
  error:  String,
  #[serde(default)]
  fields: Option<FieldErrors>,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  async fn send(&self, req: reqwest::RequestBuilder) -> Result<Response> {
    let resp = self.auth(req).send().await.map_err(Error::store)?;
    if resp.status().is_success() {
      Ok(resp)
    } else {
      Err(error_from_response(resp).await)
    }
  }

  async fn json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
    self.send(req).await?.json().await.map_err(Error::store)
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// `GET /api/session`
  pub async fn session(&self) -> Result<Session> {
    self.json(self.client.get(self.url("/session"))).await
  }

  // ── Species ───────────────────────────────────────────────────────────────

  /// `GET /api/species`
  pub async fn list_species(&self) -> Result<Vec<Species>> {
    self.json(self.client.get(self.url("/species"))).await
  }

  /// `POST /api/species`
  pub async fn create_species(&self, input: &SpeciesInput) -> Result<Species> {
    self
      .json(self.client.post(self.url("/species")).json(input))
      .await
  }

  /// `PUT /api/species/:id`
  pub async fn update_species(&self, id: i64, input: &SpeciesInput) -> Result<Species> {
    self
      .json(self.client.put(self.url(&format!("/species/{id}"))).json(input))
      .await
  }

  /// `DELETE /api/species/:id?confirm=true`
  ///
  /// Only call this once the user has answered the delete prompt.
  pub async fn delete_species(&self, id: i64) -> Result<()> {
    self
      .send(
        self
          .client
          .delete(self.url(&format!("/species/{id}")))
          .query(&[("confirm", "true")]),
      )
      .await?;
    Ok(())
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  /// `GET /api/profiles`
  pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
    self.json(self.client.get(self.url("/profiles"))).await
  }

  /// `GET /api/profiles/me`
  pub async fn me(&self) -> Result<Profile> {
    self.json(self.client.get(self.url("/profiles/me"))).await
  }

  /// `PUT /api/profiles/:id/biography`
  pub async fn update_biography(&self, id: Uuid, biography: &str) -> Result<Profile> {
    self
      .json(
        self
          .client
          .put(self.url(&format!("/profiles/{id}/biography")))
          .json(&serde_json::json!({ "biography": biography })),
      )
      .await
  }
}

async fn error_from_response(resp: Response) -> Error {
  let status = resp.status();
  let text = resp.text().await.unwrap_or_default();
  let body = serde_json::from_str::<ErrorBody>(&text).ok();
  tracing::debug!(%status, "api request failed");
  error_from_parts(status, body, text)
}

fn error_from_parts(status: StatusCode, body: Option<ErrorBody>, raw: String) -> Error {
  match (status, body) {
    (StatusCode::UNAUTHORIZED, _) => Error::Unauthenticated,
    (StatusCode::UNPROCESSABLE_ENTITY, Some(ErrorBody { fields: Some(f), .. })) => {
      Error::Validation(f)
    }
    (_, Some(body)) => Error::Store(body.error),
    (_, None) if raw.trim().is_empty() => Error::Store(status.to_string()),
    (_, None) => Error::Store(raw),
  }
}
