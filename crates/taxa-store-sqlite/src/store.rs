//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use taxa_core::{
  profile::{NewProfile, Profile},
  species::{NewSpecies, Species, SpeciesRecord},
  store::CatalogStore,
};

use crate::{
  Error, Result,
  encode::{RawProfile, RawSpecies, encode_kingdom, encode_uuid, read_profile, read_species},
  schema::{PROFILE_SELECT, SCHEMA, SPECIES_SELECT},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Taxa catalog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one joined species row by id.
  async fn fetch_species(&self, id: i64) -> Result<Option<Species>> {
    let raw: Option<RawSpecies> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{SPECIES_SELECT} WHERE s.id = ?1"),
            rusqlite::params![id],
            read_species,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSpecies::into_species).transpose()
  }

  async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{PROFILE_SELECT} WHERE id = ?1"),
            rusqlite::params![id_str],
            read_profile,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Species ───────────────────────────────────────────────────────────────

  async fn list_species(&self) -> Result<Vec<Species>> {
    let raws: Vec<RawSpecies> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{SPECIES_SELECT} ORDER BY s.id DESC"))?;
        let rows = stmt
          .query_map([], read_species)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSpecies::into_species).collect()
  }

  async fn get_species(&self, id: i64) -> Result<Option<Species>> {
    self.fetch_species(id).await
  }

  async fn insert_species(&self, input: NewSpecies) -> Result<Species> {
    let author_str  = encode_uuid(input.author);
    let kingdom_str = encode_kingdom(input.record.kingdom);
    let r           = input.record;

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO species (
             scientific_name, common_name, kingdom, total_population,
             description, endangered, author, image
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            r.scientific_name,
            r.common_name,
            kingdom_str,
            r.total_population,
            r.description,
            r.endangered,
            author_str,
            r.image,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "inserted species row");

    self
      .fetch_species(id)
      .await?
      .ok_or(Error::MissingAfterWrite("species"))
  }

  async fn update_species(
    &self,
    id: i64,
    record: SpeciesRecord,
  ) -> Result<Option<Species>> {
    let kingdom_str = encode_kingdom(record.kingdom);
    let r           = record;

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE species SET
             scientific_name  = ?1,
             common_name      = ?2,
             kingdom          = ?3,
             total_population = ?4,
             description      = ?5,
             endangered       = ?6,
             image            = ?7
           WHERE id = ?8",
          rusqlite::params![
            r.scientific_name,
            r.common_name,
            kingdom_str,
            r.total_population,
            r.description,
            r.endangered,
            r.image,
            id,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.fetch_species(id).await
  }

  async fn delete_species(&self, id: i64) -> Result<bool> {
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM species WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{PROFILE_SELECT} ORDER BY email"))?;
        let rows = stmt
          .query_map([], read_profile)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    self.fetch_profile(id).await
  }

  async fn upsert_profile(&self, input: NewProfile) -> Result<Profile> {
    let id     = input.id;
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (id, email, display_name) VALUES (?1, ?2, ?3)
           ON CONFLICT (id) DO UPDATE SET
             email        = excluded.email,
             display_name = excluded.display_name",
          rusqlite::params![id_str, input.email, input.display_name],
        )?;
        Ok(())
      })
      .await?;

    self
      .fetch_profile(id)
      .await?
      .ok_or(Error::MissingAfterWrite("profiles"))
  }

  async fn update_biography(
    &self,
    id: Uuid,
    biography: Option<String>,
  ) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profiles SET biography = ?1 WHERE id = ?2",
          rusqlite::params![biography, id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.fetch_profile(id).await
  }
}
