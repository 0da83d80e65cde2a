//! SQL schema for the Kindred SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per user. Absent row means the user never touched the privacy
-- settings, which the gate treats as allowed.
CREATE TABLE IF NOT EXISTS privacy_consents (
    user_id                      TEXT PRIMARY KEY,
    consent_given                INTEGER NOT NULL,
    consent_date                 TEXT NOT NULL,      -- ISO 8601 UTC
    allow_birthday_prediction    INTEGER NOT NULL DEFAULT 1,
    allow_relationship_inference INTEGER NOT NULL DEFAULT 1,
    allow_archetype_tagging      INTEGER NOT NULL DEFAULT 1,
    allow_external_enrichment    INTEGER NOT NULL DEFAULT 0,
    ip_address                   TEXT,
    user_agent                   TEXT,
    created_at                   TEXT NOT NULL,
    updated_at                   TEXT NOT NULL
);

-- Contact fields the store queries or updates directly get their own
-- columns; list- and map-shaped fields are stored as JSON text.
CREATE TABLE IF NOT EXISTS contacts (
    contact_id     TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL,
    full_name      TEXT NOT NULL DEFAULT '',   -- '' when the source had no name
    emails         TEXT NOT NULL DEFAULT '[]', -- JSON array of addresses
    birthday_year  INTEGER,
    birthday_month INTEGER,                    -- 1-12
    birthday_day   INTEGER,                    -- 1-31
    gender         TEXT,
    urls           TEXT NOT NULL DEFAULT '[]', -- JSON array
    photo_url      TEXT,
    social_handles TEXT NOT NULL DEFAULT '{}', -- JSON, platform -> handle
    interests      TEXT NOT NULL DEFAULT '{}', -- JSON, category -> terms
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    UNIQUE (user_id, full_name)
);

-- Derived fields, at most one row per contact. Accepting a predicted
-- birthday clears the predicted_* columns and writes the month/day onto the
-- contacts row.
CREATE TABLE IF NOT EXISTS enriched_data (
    contact_id               TEXT PRIMARY KEY REFERENCES contacts(contact_id),
    predicted_birthday_month INTEGER,  -- 1-12
    predicted_birthday_day   INTEGER,  -- 1-31
    birthday_confidence      INTEGER,  -- 0-100
    birthday_reasoning       TEXT,
    inferred_relationship    TEXT,     -- snake_case RelationshipKind
    relationship_confidence  INTEGER,  -- 0-100
    relationship_reasoning   TEXT,
    archetypes               TEXT,     -- JSON array or NULL
    gifting_profile          TEXT,     -- JSON or NULL
    enrichment_metadata      TEXT,     -- JSON or NULL
    created_at               TEXT NOT NULL,
    updated_at               TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS contacts_user_idx    ON contacts(user_id);
CREATE INDEX IF NOT EXISTS contacts_updated_idx ON contacts(updated_at);

PRAGMA user_version = 1;
";
