//! HTTP Basic-auth session provider.
//!
//! Credentials are checked against the accounts listed in the server config.
//! A match attaches a [`Session`] to the request's extensions; anything else
//! leaves the request anonymous and the API decides what that means.

use std::{collections::HashMap, sync::Arc};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use taxa_core::session::Session;
use uuid::Uuid;

use crate::AccountConfig;

/// One sign-in identity.
#[derive(Clone)]
struct Account {
  user_id:       Uuid,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  password_hash: String,
}

/// Username → account lookup built from the config.
#[derive(Clone, Default)]
pub struct Accounts {
  by_username: HashMap<String, Account>,
}

impl Accounts {
  pub fn from_config(accounts: &[AccountConfig]) -> Self {
    let by_username = accounts
      .iter()
      .map(|a| {
        (a.username.clone(), Account {
          user_id:       a.user_id,
          password_hash: a.password_hash.clone(),
        })
      })
      .collect();
    Self { by_username }
  }

  pub fn len(&self) -> usize { self.by_username.len() }

  pub fn is_empty(&self) -> bool { self.by_username.is_empty() }

  /// Resolve the request's `Authorization` header to a session.
  ///
  /// No header yields `None` quietly; a header that fails to verify is logged.
  pub fn resolve(&self, headers: &HeaderMap) -> Option<Session> {
    let value = headers.get(header::AUTHORIZATION)?;
    let session = self.verify(value.to_str().ok()?);
    if session.is_none() {
      tracing::warn!("rejected basic-auth credentials");
    }
    session
  }

  fn verify(&self, header_val: &str) -> Option<Session> {
    let encoded = header_val.strip_prefix("Basic ")?;
    let decoded = B64.decode(encoded).ok()?;
    let creds   = std::str::from_utf8(&decoded).ok()?;

    let (username, password) = creds.split_once(':')?;
    let account = self.by_username.get(username)?;

    let parsed_hash = PasswordHash::new(&account.password_hash).ok()?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .ok()?;

    Some(Session { user_id: account.user_id })
  }
}

/// Middleware: attach the resolved [`Session`], if any, and continue.
pub async fn attach_session(
  State(accounts): State<Arc<Accounts>>,
  mut req: Request,
  next: Next,
) -> Response {
  if let Some(session) = accounts.resolve(req.headers()) {
    req.extensions_mut().insert(session);
  }
  next.run(req).await
}
