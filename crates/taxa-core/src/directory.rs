//! The user directory: a read-only view over `profiles`, plus self-edit of
//! the biography.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  profile::Profile,
  session::{self, Session},
  store::CatalogStore,
  validate::normalize_text,
};

pub struct Directory<S> {
  store: Arc<S>,
}

impl<S> Clone for Directory<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: CatalogStore> Directory<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Every profile, emails included. Any session may see all of them.
  pub async fn list(&self, session: Option<&Session>) -> Result<Vec<Profile>> {
    session::require(session)?;
    self.store.list_profiles().await.map_err(Error::store)
  }

  /// The profile belonging to the session itself.
  pub async fn me(&self, session: Option<&Session>) -> Result<Profile> {
    let session = session::require(session)?;
    self
      .store
      .get_profile(session.user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ProfileNotFound(session.user_id))
  }

  /// Replace the biography of `profile_id`. Only its owner may do this.
  /// Blank text clears the biography.
  pub async fn update_biography(
    &self,
    session: Option<&Session>,
    profile_id: Uuid,
    text: Option<&str>,
  ) -> Result<Profile> {
    let session = session::require(session)?;
    if session.user_id != profile_id {
      tracing::warn!(
        profile = %profile_id,
        by = %session.user_id,
        "rejected biography edit by non-owner"
      );
      return Err(Error::Forbidden(profile_id));
    }

    let profile = self
      .store
      .update_biography(profile_id, normalize_text(text))
      .await
      .map_err(Error::store)?
      .ok_or(Error::ProfileNotFound(profile_id))?;

    tracing::info!(profile = %profile_id, "biography updated");
    Ok(profile)
  }
}
