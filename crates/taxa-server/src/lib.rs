//! HTTP server for Taxa.
//!
//! Wraps the JSON API from `taxa-api` with a Basic-auth session layer and
//! request tracing, backed by any [`CatalogStore`].

pub mod auth;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use serde::Deserialize;
use taxa_core::{profile::NewProfile, store::CatalogStore};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use auth::Accounts;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub accounts:   Vec<AccountConfig>,
}

/// A sign-in account. Each one gets a profile row at start-up.
#[derive(Deserialize, Clone)]
pub struct AccountConfig {
  pub username:      String,
  /// PHC string produced by argon2; see `taxa-server --hash-password`.
  pub password_hash: String,
  pub user_id:       Uuid,
  pub email:         String,
  #[serde(default)]
  pub display_name:  Option<String>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub accounts: Arc<Accounts>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      accounts: Arc::clone(&self.accounts),
    }
  }
}

// ─── Provisioning ─────────────────────────────────────────────────────────────

/// Make sure every configured account has a profile row. Existing rows get
/// their email and display name refreshed; biographies are left alone.
pub async fn provision_accounts<S: CatalogStore>(
  store: &S,
  accounts: &[AccountConfig],
) -> Result<(), S::Error> {
  for account in accounts {
    store
      .upsert_profile(NewProfile {
        id:           account.user_id,
        email:        account.email.clone(),
        display_name: account.display_name.clone(),
      })
      .await?;
    tracing::debug!(user = %account.user_id, "provisioned profile");
  }
  Ok(())
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full axum [`Router`]: the API under `/api`, sessions resolved
/// from Basic auth, every request traced.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CatalogStore + 'static,
{
  Router::new()
    .nest("/api", taxa_api::api_router(state.store))
    .layer(middleware::from_fn_with_state(
      state.accounts,
      auth::attach_session,
    ))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use taxa_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  struct Fixture {
    state: AppState<SqliteStore>,
    ada:   Uuid,
    bob:   Uuid,
  }

  fn account(username: &str, user_id: Uuid) -> AccountConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(b"secret", &salt)
      .unwrap()
      .to_string();
    AccountConfig {
      username: username.to_string(),
      password_hash: hash,
      user_id,
      email: format!("{username}@example.com"),
      display_name: Some(username.to_string()),
    }
  }

  async fn fixture() -> Fixture {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let (ada, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let accounts = vec![account("ada", ada), account("bob", bob)];
    provision_accounts(&store, &accounts).await.unwrap();

    Fixture {
      state: AppState {
        store:    Arc::new(store),
        accounts: Arc::new(Accounts::from_config(&accounts)),
      },
      ada,
      bob,
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn send(
    state:  &AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    user:   Option<&str>,
    body:   Option<Value>,
  ) -> (StatusCode, Option<Value>, axum::http::HeaderMap) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
      builder = builder.header(header::AUTHORIZATION, auth_header(user, "secret"));
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp    = router(state.clone()).oneshot(req).await.unwrap();
    let status  = resp.status();
    let headers = resp.headers().clone();
    let bytes   = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json    = serde_json::from_slice(&bytes).ok();
    (status, json, headers)
  }

  fn lion() -> Value {
    json!({
      "scientific_name": "Panthera leo",
      "common_name": "Lion",
      "kingdom": "Animalia",
      "total_population": 23000,
      "endangered": true
    })
  }

  // ── Sessions ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn anonymous_requests_return_401_with_challenge() {
    let f = fixture().await;
    let (status, body, headers) = send(&f.state, "GET", "/api/species", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers.contains_key(header::WWW_AUTHENTICATE));
    assert_eq!(body.unwrap()["error"], "not signed in");
  }

  #[tokio::test]
  async fn wrong_password_is_anonymous() {
    let f = fixture().await;
    let req = Request::builder()
      .uri("/api/session")
      .header(header::AUTHORIZATION, auth_header("ada", "nope"))
      .body(Body::empty())
      .unwrap();
    let resp = router(f.state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn session_endpoint_reports_user_id() {
    let f = fixture().await;
    let (status, body, _) = send(&f.state, "GET", "/api/session", Some("ada"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["user_id"], f.ada.to_string());
  }

  // ── Species ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_sets_author_and_lists_newest_first() {
    let f = fixture().await;

    let (status, created, _) =
      send(&f.state, "POST", "/api/species", Some("ada"), Some(lion())).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = created.unwrap();
    assert_eq!(created["author"], f.ada.to_string());
    assert_eq!(created["profiles"]["email"], "ada@example.com");

    let mut tiger = lion();
    tiger["scientific_name"] = json!("Panthera tigris");
    send(&f.state, "POST", "/api/species", Some("bob"), Some(tiger)).await;

    let (status, list, _) = send(&f.state, "GET", "/api/species", Some("ada"), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.unwrap();
    let names: Vec<&str> = list
      .as_array()
      .unwrap()
      .iter()
      .map(|s| s["scientific_name"].as_str().unwrap())
      .collect();
    assert_eq!(names, ["Panthera tigris", "Panthera leo"]);
  }

  #[tokio::test]
  async fn invalid_input_returns_422_with_fields() {
    let f = fixture().await;
    let body = json!({ "scientific_name": "  ", "kingdom": "Minerals", "total_population": -4 });

    let (status, resp, _) = send(&f.state, "POST", "/api/species", Some("ada"), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = &resp.unwrap()["fields"];
    assert_eq!(fields["scientific_name"], "is required");
    assert!(fields["kingdom"].is_string());
    assert_eq!(fields["total_population"], "must be greater than 0");

    let (_, list, _) = send(&f.state, "GET", "/api/species", Some("ada"), None).await;
    assert!(list.unwrap().as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn anonymous_create_is_401_whatever_the_body() {
    let f = fixture().await;
    let body = json!({ "scientific_name": "X", "kingdom": null, "total_population": "many" });
    let (status, resp, headers) =
      send(&f.state, "POST", "/api/species", None, Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers.contains_key(header::WWW_AUTHENTICATE));
    assert_eq!(resp.unwrap()["error"], "not signed in");
  }

  #[tokio::test]
  async fn wrongly_typed_fields_return_422_with_fields() {
    let f = fixture().await;

    let body = json!({ "scientific_name": "X", "kingdom": null });
    let (status, resp, _) = send(&f.state, "POST", "/api/species", Some("ada"), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.unwrap()["fields"]["kingdom"].is_string());

    let mut body = lion();
    body["total_population"] = json!("many");
    let (status, resp, _) = send(&f.state, "POST", "/api/species", Some("ada"), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let resp = resp.unwrap();
    assert_eq!(resp["error"], "validation failed");
    assert_eq!(resp["fields"]["total_population"], "must be a number");

    let (_, created, _) = send(&f.state, "POST", "/api/species", Some("ada"), Some(lion())).await;
    let id = created.unwrap()["id"].as_i64().unwrap();
    let mut body = lion();
    body["endangered"] = json!("yes");
    let uri = format!("/api/species/{id}");
    let (status, resp, _) = send(&f.state, "PUT", &uri, Some("ada"), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.unwrap()["fields"]["endangered"], "must be true or false");

    let (status, resp, _) =
      send(&f.state, "POST", "/api/species", Some("ada"), Some(json!(["Panthera leo"]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.unwrap()["error"], "request body must be a JSON object");
  }

  #[tokio::test]
  async fn malformed_json_is_a_json_error() {
    let f = fixture().await;
    let req = Request::builder()
      .method("POST")
      .uri("/api/species")
      .header(header::AUTHORIZATION, auth_header("ada", "secret"))
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{\"scientific_name\":"))
      .unwrap();
    let resp = router(f.state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn update_replaces_fields_but_not_author() {
    let f = fixture().await;
    let (_, created, _) = send(&f.state, "POST", "/api/species", Some("ada"), Some(lion())).await;
    let id = created.unwrap()["id"].as_i64().unwrap();

    let mut edit = lion();
    edit["common_name"] = json!("African lion");
    let (status, updated, _) =
      send(&f.state, "PUT", &format!("/api/species/{id}"), Some("bob"), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    let updated = updated.unwrap();
    assert_eq!(updated["common_name"], "African lion");
    assert_eq!(updated["author"], f.ada.to_string());
  }

  #[tokio::test]
  async fn get_missing_species_returns_404() {
    let f = fixture().await;
    let (status, _, _) = send(&f.state, "GET", "/api/species/999", Some("ada"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_requires_confirmation() {
    let f = fixture().await;
    let (_, created, _) = send(&f.state, "POST", "/api/species", Some("ada"), Some(lion())).await;
    let id = created.unwrap()["id"].as_i64().unwrap();
    let uri = format!("/api/species/{id}");

    let (status, _, _) = send(&f.state, "DELETE", &uri, Some("ada"), None).await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);
    let (status, _, _) = send(&f.state, "GET", &uri, Some("ada"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) =
      send(&f.state, "DELETE", &format!("{uri}?confirm=true"), Some("ada"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&f.state, "GET", &uri, Some("ada"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Profiles ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn provisioned_profiles_are_listed() {
    let f = fixture().await;
    let (status, list, _) = send(&f.state, "GET", "/api/profiles", Some("bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[0]["email"], "ada@example.com");

    let (_, me, _) = send(&f.state, "GET", "/api/profiles/me", Some("bob"), None).await;
    assert_eq!(me.unwrap()["id"], f.bob.to_string());
  }

  #[tokio::test]
  async fn only_the_owner_may_edit_a_biography() {
    let f = fixture().await;
    let body = json!({ "biography": "  Field botanist  " });

    let (status, _, _) = send(
      &f.state,
      "PUT",
      &format!("/api/profiles/{}/biography", f.ada),
      Some("bob"),
      Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, profile, _) = send(
      &f.state,
      "PUT",
      &format!("/api/profiles/{}/biography", f.ada),
      Some("ada"),
      Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile.unwrap()["biography"], "Field botanist");
  }

  #[tokio::test]
  async fn provisioning_twice_keeps_biography() {
    let f = fixture().await;
    f.state
      .store
      .update_biography(f.ada, Some("Naturalist".into()))
      .await
      .unwrap();

    let again = vec![account("ada", f.ada)];
    provision_accounts(f.state.store.as_ref(), &again).await.unwrap();

    let profile = f.state.store.get_profile(f.ada).await.unwrap().unwrap();
    assert_eq!(profile.biography.as_deref(), Some("Naturalist"));
  }
}
