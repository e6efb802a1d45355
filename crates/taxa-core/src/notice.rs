//! User-visible notifications for the outcome of an action.

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
  Success,
  Error,
}

/// A dismissible notification: a title and an optional detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
  pub level:       NoticeLevel,
  pub title:       String,
  pub description: Option<String>,
}

impl Notice {
  pub fn success(title: impl Into<String>) -> Self {
    Self { level: NoticeLevel::Success, title: title.into(), description: None }
  }

  pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      level:       NoticeLevel::Error,
      title:       title.into(),
      description: Some(description.into()),
    }
  }

  /// An error notice whose detail is the error's message. For
  /// [`Error::Store`] that is the store's raw message.
  pub fn from_error(title: impl Into<String>, error: &Error) -> Self {
    Self::error(title, error.to_string())
  }

  pub fn is_error(&self) -> bool { self.level == NoticeLevel::Error }
}

impl std::fmt::Display for Notice {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match &self.description {
      Some(d) => write!(f, "{}: {d}", self.title),
      None => f.write_str(&self.title),
    }
  }
}
