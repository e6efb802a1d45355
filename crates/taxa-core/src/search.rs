//! Client-side free-text filter over an already-fetched species list.
//!
//! Nothing here touches a store; the list view recomputes the filter on every
//! keystroke.

use crate::species::Species;

/// A lower-cased search needle, built once per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  needle: String,
}

impl SearchQuery {
  pub fn new(query: &str) -> Self {
    Self { needle: query.to_lowercase() }
  }

  pub fn is_empty(&self) -> bool { self.needle.is_empty() }

  /// True when the scientific name, common name or description contains the
  /// query, ignoring case. An empty query matches everything.
  pub fn matches(&self, species: &Species) -> bool {
    if self.needle.is_empty() {
      return true;
    }
    [
      Some(species.scientific_name.as_str()),
      species.common_name.as_deref(),
      species.description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|text| text.to_lowercase().contains(&self.needle))
  }
}

/// Filter `collection` by `query`, preserving its order.
pub fn search<'a>(query: &str, collection: &'a [Species]) -> Vec<&'a Species> {
  let query = SearchQuery::new(query);
  collection.iter().filter(|s| query.matches(s)).collect()
}
