//! SQL schema for the Taxa SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS profiles (
    id           TEXT PRIMARY KEY,   -- user id from the session
    email        TEXT NOT NULL,
    display_name TEXT,
    biography    TEXT
);

-- No foreign key on author: a species outlives its author's profile row and
-- lists with a NULL author summary.
CREATE TABLE IF NOT EXISTS species (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    scientific_name  TEXT    NOT NULL CHECK (length(trim(scientific_name)) > 0),
    common_name      TEXT,
    kingdom          TEXT    NOT NULL CHECK (kingdom IN (
                       'Animalia', 'Plantae', 'Fungi',
                       'Protista', 'Archaea', 'Bacteria')),
    total_population INTEGER CHECK (total_population IS NULL OR total_population > 0),
    description      TEXT,
    endangered       INTEGER NOT NULL DEFAULT 0,
    author           TEXT    NOT NULL,
    image            TEXT
);

CREATE INDEX IF NOT EXISTS species_author_idx ON species(author);

PRAGMA user_version = 1;
";

/// Species columns joined with the author's profile summary. Column order is
/// what [`crate::encode::read_species`] expects.
pub const SPECIES_SELECT: &str = "
SELECT s.id, s.scientific_name, s.common_name, s.kingdom, s.total_population,
       s.description, s.endangered, s.author, s.image,
       p.id, p.display_name, p.email
FROM species s
LEFT JOIN profiles p ON p.id = s.author
";

pub const PROFILE_SELECT: &str =
  "SELECT id, email, display_name, biography FROM profiles";
