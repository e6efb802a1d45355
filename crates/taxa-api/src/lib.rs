//! JSON REST API for Taxa.
//!
//! Exposes an axum [`Router`] backed by any [`taxa_core::store::CatalogStore`].
//! Sessions are read from request extensions; issuing them (auth), TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", taxa_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod profiles;
pub mod session;
pub mod species;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use taxa_core::{catalog::Catalog, directory::Directory, store::CatalogStore};

pub use error::ApiError;
pub use session::CurrentSession;

/// State shared by every handler.
pub struct ApiState<S> {
  pub catalog:   Catalog<S>,
  pub directory: Directory<S>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      catalog:   self.catalog.clone(),
      directory: self.directory.clone(),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CatalogStore + 'static,
{
  let state = ApiState {
    catalog:   Catalog::new(Arc::clone(&store)),
    directory: Directory::new(store),
  };

  Router::new()
    .route("/session", get(session::current))
    // Species
    .route("/species", get(species::list::<S>).post(species::create::<S>))
    .route(
      "/species/{id}",
      get(species::get_one::<S>)
        .put(species::update::<S>)
        .delete(species::delete::<S>),
    )
    // Profiles
    .route("/profiles", get(profiles::list::<S>))
    .route("/profiles/me", get(profiles::me::<S>))
    .route("/profiles/{id}/biography", put(profiles::update_biography::<S>))
    .with_state(state)
}
