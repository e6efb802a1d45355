//! Session — proof that a request was authenticated.
//!
//! Sessions are issued elsewhere (the server's auth layer); this crate only
//! consumes them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub user_id: Uuid,
}

/// Turn an optional session into a hard requirement.
pub fn require(session: Option<&Session>) -> Result<&Session> {
  session.ok_or(Error::Unauthenticated)
}
