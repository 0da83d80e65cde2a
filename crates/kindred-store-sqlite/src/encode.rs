//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. List- and map-shaped fields
//! (emails, urls, social handles, interests, archetypes, gifting profile,
//! enrichment metadata) are stored as compact JSON. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use kindred_core::{
  consent::PrivacyConsent,
  contact::{ContactRecord, PartialDate},
  enrichment::{
    Archetype, BirthdayPrediction, EnrichedContact, EnrichmentMetadata,
    GiftingProfile, RelationshipInference, RelationshipKind,
  },
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_json<T: Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `privacy_consents` row.
pub struct RawConsent {
  pub user_id:                      String,
  pub consent_given:                bool,
  pub consent_date:                 String,
  pub allow_birthday_prediction:    bool,
  pub allow_relationship_inference: bool,
  pub allow_archetype_tagging:      bool,
  pub allow_external_enrichment:    bool,
  pub ip_address:                   Option<String>,
  pub user_agent:                   Option<String>,
  pub created_at:                   String,
  pub updated_at:                   String,
}

impl RawConsent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:                      row.get(0)?,
      consent_given:                row.get(1)?,
      consent_date:                 row.get(2)?,
      allow_birthday_prediction:    row.get(3)?,
      allow_relationship_inference: row.get(4)?,
      allow_archetype_tagging:      row.get(5)?,
      allow_external_enrichment:    row.get(6)?,
      ip_address:                   row.get(7)?,
      user_agent:                   row.get(8)?,
      created_at:                   row.get(9)?,
      updated_at:                   row.get(10)?,
    })
  }

  pub fn into_consent(self) -> Result<PrivacyConsent> {
    Ok(PrivacyConsent {
      user_id:                      self.user_id,
      consent_given:                self.consent_given,
      consent_date:                 decode_dt(&self.consent_date)?,
      allow_birthday_prediction:    self.allow_birthday_prediction,
      allow_relationship_inference: self.allow_relationship_inference,
      allow_archetype_tagging:      self.allow_archetype_tagging,
      allow_external_enrichment:    self.allow_external_enrichment,
      ip_address:                   self.ip_address,
      user_agent:                   self.user_agent,
      created_at:                   decode_dt(&self.created_at)?,
      updated_at:                   decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read from a `contacts` row left-joined with `enriched_data`.
///
/// The enrichment columns are all `NULL` for a contact that was stored but
/// never enriched; decoding then yields an [`EnrichedContact`] with every
/// derived field absent.
pub struct RawEnrichedContact {
  // contacts columns
  pub contact_id:               String,
  pub full_name:                String,
  pub emails:                   String,
  pub birthday_year:            Option<i32>,
  pub birthday_month:           Option<u32>,
  pub birthday_day:             Option<u32>,
  pub gender:                   Option<String>,
  pub urls:                     String,
  pub photo_url:                Option<String>,
  pub social_handles:           String,
  pub interests:                String,
  // enriched_data columns
  pub predicted_birthday_month: Option<u32>,
  pub predicted_birthday_day:   Option<u32>,
  pub birthday_confidence:      Option<u8>,
  pub birthday_reasoning:       Option<String>,
  pub inferred_relationship:    Option<String>,
  pub relationship_confidence:  Option<u8>,
  pub relationship_reasoning:   Option<String>,
  pub archetypes:               Option<String>,
  pub gifting_profile:          Option<String>,
  pub enrichment_metadata:      Option<String>,
}

impl RawEnrichedContact {
  /// Column order must match the SELECT list used by the store queries.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id:               row.get(0)?,
      full_name:                row.get(1)?,
      emails:                   row.get(2)?,
      birthday_year:            row.get(3)?,
      birthday_month:           row.get(4)?,
      birthday_day:             row.get(5)?,
      gender:                   row.get(6)?,
      urls:                     row.get(7)?,
      photo_url:                row.get(8)?,
      social_handles:           row.get(9)?,
      interests:                row.get(10)?,
      predicted_birthday_month: row.get(11)?,
      predicted_birthday_day:   row.get(12)?,
      birthday_confidence:      row.get(13)?,
      birthday_reasoning:       row.get(14)?,
      inferred_relationship:    row.get(15)?,
      relationship_confidence:  row.get(16)?,
      relationship_reasoning:   row.get(17)?,
      archetypes:               row.get(18)?,
      gifting_profile:          row.get(19)?,
      enrichment_metadata:      row.get(20)?,
    })
  }

  pub fn into_enriched(self) -> Result<EnrichedContact> {
    let contact_id = decode_uuid(&self.contact_id)?;

    let birthday = PartialDate {
      year:  self.birthday_year,
      month: self.birthday_month,
      day:   self.birthday_day,
    };

    let contact = ContactRecord {
      id:             Some(contact_id),
      full_name:      (!self.full_name.is_empty()).then_some(self.full_name),
      emails:         decode_json(&self.emails)?,
      birthday:       (!birthday.is_empty()).then_some(birthday),
      gender:         self.gender,
      urls:           decode_json(&self.urls)?,
      photo_url:      self.photo_url,
      social_handles: decode_json(&self.social_handles)?,
      interests:      decode_json(&self.interests)?,
    };

    // A prediction surfaces only when a month is stored; the companion
    // confidence/reasoning columns are cleared together with it.
    let predicted_birthday =
      self.predicted_birthday_month.map(|month| BirthdayPrediction {
        month,
        day:        self.predicted_birthday_day,
        confidence: self.birthday_confidence.unwrap_or(0),
        reasoning:  self.birthday_reasoning.unwrap_or_default(),
      });

    let inferred_relationship = match self.inferred_relationship {
      Some(raw_kind) => {
        let kind = RelationshipKind::parse(&raw_kind).ok_or_else(|| {
          Error::Decode(format!("unknown relationship kind: {raw_kind:?}"))
        })?;
        Some(RelationshipInference {
          kind,
          confidence: self.relationship_confidence.unwrap_or(0),
          reasoning: self.relationship_reasoning.unwrap_or_default(),
        })
      }
      None => None,
    };

    let archetypes: Option<Vec<Archetype>> =
      self.archetypes.as_deref().map(decode_json).transpose()?;
    let gifting_profile: Option<GiftingProfile> =
      self.gifting_profile.as_deref().map(decode_json).transpose()?;
    let enrichment_metadata: Option<EnrichmentMetadata> =
      self.enrichment_metadata.as_deref().map(decode_json).transpose()?;

    Ok(EnrichedContact {
      contact,
      predicted_birthday,
      inferred_relationship,
      archetypes,
      gifting_profile,
      enrichment_metadata,
    })
  }
}
