//! [`SqliteStore`], the SQLite implementation of [`EnrichmentStore`].

use std::path::Path;

use chrono::Utc;
use kindred_core::{
  consent::{NewConsent, PrivacyConsent},
  enrichment::EnrichedContact,
  store::EnrichmentStore,
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawConsent, RawEnrichedContact, decode_uuid, encode_dt, encode_json,
    encode_uuid,
  },
  schema::SCHEMA,
};

/// Columns shared by every query that reads a contact together with its
/// enrichment row. Order must match [`RawEnrichedContact::from_row`].
const ENRICHED_COLUMNS: &str = "
  c.contact_id, c.full_name, c.emails, c.birthday_year, c.birthday_month,
  c.birthday_day, c.gender, c.urls, c.photo_url, c.social_handles,
  c.interests,
  e.predicted_birthday_month, e.predicted_birthday_day,
  e.birthday_confidence, e.birthday_reasoning,
  e.inferred_relationship, e.relationship_confidence,
  e.relationship_reasoning, e.archetypes, e.gifting_profile,
  e.enrichment_metadata";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Kindred enrichment store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialization.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
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

  async fn fetch_enriched(
    &self,
    user_id: &str,
    contact_id: Uuid,
  ) -> Result<Option<EnrichedContact>> {
    let user = user_id.to_owned();
    let id_str = encode_uuid(contact_id);

    let raw: Option<RawEnrichedContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ENRICHED_COLUMNS}
                 FROM contacts c
                 LEFT JOIN enriched_data e ON e.contact_id = c.contact_id
                 WHERE c.contact_id = ?1 AND c.user_id = ?2"
              ),
              rusqlite::params![id_str, user],
              RawEnrichedContact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEnrichedContact::into_enriched).transpose()
  }
}

// ─── EnrichmentStore impl ────────────────────────────────────────────────────

impl EnrichmentStore for SqliteStore {
  type Error = Error;

  // ── Consent ───────────────────────────────────────────────────────────────

  async fn get_consent(&self, user_id: &str) -> Result<Option<PrivacyConsent>> {
    let user = user_id.to_owned();

    let raw: Option<RawConsent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, consent_given, consent_date,
                      allow_birthday_prediction, allow_relationship_inference,
                      allow_archetype_tagging, allow_external_enrichment,
                      ip_address, user_agent, created_at, updated_at
               FROM privacy_consents
               WHERE user_id = ?1",
              rusqlite::params![user],
              RawConsent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawConsent::into_consent).transpose()
  }

  async fn put_consent(
    &self,
    user_id: &str,
    input: NewConsent,
  ) -> Result<PrivacyConsent> {
    let now = Utc::now();

    // Merge in Rust rather than SQL: absent toggles keep their stored values
    // on update and take the documented defaults on first write.
    let record = match self.get_consent(user_id).await? {
      Some(prev) => PrivacyConsent {
        user_id: prev.user_id,
        consent_given: input.consent_given,
        consent_date: input.consent_date.unwrap_or(now),
        allow_birthday_prediction: input
          .allow_birthday_prediction
          .unwrap_or(prev.allow_birthday_prediction),
        allow_relationship_inference: input
          .allow_relationship_inference
          .unwrap_or(prev.allow_relationship_inference),
        allow_archetype_tagging: input
          .allow_archetype_tagging
          .unwrap_or(prev.allow_archetype_tagging),
        allow_external_enrichment: input
          .allow_external_enrichment
          .unwrap_or(prev.allow_external_enrichment),
        ip_address: input.ip_address.or(prev.ip_address),
        user_agent: input.user_agent.or(prev.user_agent),
        created_at: prev.created_at,
        updated_at: now,
      },
      None => PrivacyConsent {
        user_id: user_id.to_owned(),
        consent_given: input.consent_given,
        consent_date: input.consent_date.unwrap_or(now),
        allow_birthday_prediction: input
          .allow_birthday_prediction
          .unwrap_or(true),
        allow_relationship_inference: input
          .allow_relationship_inference
          .unwrap_or(true),
        allow_archetype_tagging: input.allow_archetype_tagging.unwrap_or(true),
        allow_external_enrichment: input
          .allow_external_enrichment
          .unwrap_or(false),
        ip_address: input.ip_address,
        user_agent: input.user_agent,
        created_at: now,
        updated_at: now,
      },
    };

    let user             = record.user_id.clone();
    let consent_given    = record.consent_given;
    let consent_date_str = encode_dt(record.consent_date);
    let allow_birthday   = record.allow_birthday_prediction;
    let allow_rel        = record.allow_relationship_inference;
    let allow_arch       = record.allow_archetype_tagging;
    let allow_ext        = record.allow_external_enrichment;
    let ip               = record.ip_address.clone();
    let ua               = record.user_agent.clone();
    let created_str      = encode_dt(record.created_at);
    let updated_str      = encode_dt(record.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO privacy_consents (
             user_id, consent_given, consent_date,
             allow_birthday_prediction, allow_relationship_inference,
             allow_archetype_tagging, allow_external_enrichment,
             ip_address, user_agent, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
           ON CONFLICT (user_id) DO UPDATE SET
             consent_given                = excluded.consent_given,
             consent_date                 = excluded.consent_date,
             allow_birthday_prediction    = excluded.allow_birthday_prediction,
             allow_relationship_inference = excluded.allow_relationship_inference,
             allow_archetype_tagging      = excluded.allow_archetype_tagging,
             allow_external_enrichment    = excluded.allow_external_enrichment,
             ip_address                   = excluded.ip_address,
             user_agent                   = excluded.user_agent,
             updated_at                   = excluded.updated_at",
          rusqlite::params![
            user,
            consent_given,
            consent_date_str,
            allow_birthday,
            allow_rel,
            allow_arch,
            allow_ext,
            ip,
            ua,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn revoke_consent(&self, user_id: &str) -> Result<PrivacyConsent> {
    // An upsert with every toggle absent: stored toggles survive, the
    // umbrella flips off, and the consent date is restamped.
    self
      .put_consent(user_id, NewConsent {
        consent_given: false,
        ..Default::default()
      })
      .await
  }

  // ── Enriched contacts ─────────────────────────────────────────────────────

  async fn save_enriched(
    &self,
    user_id: &str,
    contact: &EnrichedContact,
  ) -> Result<EnrichedContact> {
    let now_str = encode_dt(Utc::now());

    let user         = user_id.to_owned();
    let requested_id = contact.contact.id.map(encode_uuid);
    let fresh_id     = encode_uuid(Uuid::new_v4());
    // '' stands in for "no name" so the (user_id, full_name) key stays
    // non-null; decoding maps it back to None.
    let full_name     = contact.contact.full_name.clone().unwrap_or_default();
    let emails_str    = encode_json(&contact.contact.emails)?;
    let (birthday_year, birthday_month, birthday_day) =
      match &contact.contact.birthday {
        Some(b) => (b.year, b.month, b.day),
        None => (None, None, None),
      };
    let gender        = contact.contact.gender.clone();
    let urls_str      = encode_json(&contact.contact.urls)?;
    let photo_url     = contact.contact.photo_url.clone();
    let social_str    = encode_json(&contact.contact.social_handles)?;
    let interests_str = encode_json(&contact.contact.interests)?;

    let pred = contact.predicted_birthday.as_ref();
    let predicted_month     = pred.map(|p| p.month);
    let predicted_day       = pred.and_then(|p| p.day);
    let birthday_confidence = pred.map(|p| p.confidence);
    let birthday_reasoning  = pred.map(|p| p.reasoning.clone());

    let rel = contact.inferred_relationship.as_ref();
    let relationship            = rel.map(|r| r.kind.as_str().to_owned());
    let relationship_confidence = rel.map(|r| r.confidence);
    let relationship_reasoning  = rel.map(|r| r.reasoning.clone());

    let archetypes_str =
      contact.archetypes.as_ref().map(encode_json).transpose()?;
    let gifting_str =
      contact.gifting_profile.as_ref().map(encode_json).transpose()?;
    let metadata_str =
      contact.enrichment_metadata.as_ref().map(encode_json).transpose()?;

    let stored_id: String = self
      .conn
      .call(move |conn| {
        // Resolve the row to write: an explicit id wins, otherwise the
        // (user_id, full_name) dedup key decides update-vs-insert.
        let existing: Option<String> = match &requested_id {
          Some(id) => conn
            .query_row(
              "SELECT contact_id FROM contacts
               WHERE contact_id = ?1 AND user_id = ?2",
              rusqlite::params![id, user],
              |r| r.get(0),
            )
            .optional()?,
          None => conn
            .query_row(
              "SELECT contact_id FROM contacts
               WHERE user_id = ?1 AND full_name = ?2",
              rusqlite::params![user, full_name],
              |r| r.get(0),
            )
            .optional()?,
        };

        let contact_id = match existing {
          Some(id) => {
            conn.execute(
              "UPDATE contacts SET
                 full_name = ?2, emails = ?3, birthday_year = ?4,
                 birthday_month = ?5, birthday_day = ?6, gender = ?7,
                 urls = ?8, photo_url = ?9, social_handles = ?10,
                 interests = ?11, updated_at = ?12
               WHERE contact_id = ?1",
              rusqlite::params![
                id,
                full_name,
                emails_str,
                birthday_year,
                birthday_month,
                birthday_day,
                gender,
                urls_str,
                photo_url,
                social_str,
                interests_str,
                now_str,
              ],
            )?;
            id
          }
          None => {
            let id = requested_id.unwrap_or(fresh_id);
            conn.execute(
              "INSERT INTO contacts (
                 contact_id, user_id, full_name, emails, birthday_year,
                 birthday_month, birthday_day, gender, urls, photo_url,
                 social_handles, interests, created_at, updated_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                         ?13, ?13)",
              rusqlite::params![
                id,
                user,
                full_name,
                emails_str,
                birthday_year,
                birthday_month,
                birthday_day,
                gender,
                urls_str,
                photo_url,
                social_str,
                interests_str,
                now_str,
              ],
            )?;
            id
          }
        };

        conn.execute(
          "INSERT INTO enriched_data (
             contact_id, predicted_birthday_month, predicted_birthday_day,
             birthday_confidence, birthday_reasoning, inferred_relationship,
             relationship_confidence, relationship_reasoning, archetypes,
             gifting_profile, enrichment_metadata, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
           ON CONFLICT (contact_id) DO UPDATE SET
             predicted_birthday_month = excluded.predicted_birthday_month,
             predicted_birthday_day   = excluded.predicted_birthday_day,
             birthday_confidence      = excluded.birthday_confidence,
             birthday_reasoning       = excluded.birthday_reasoning,
             inferred_relationship    = excluded.inferred_relationship,
             relationship_confidence  = excluded.relationship_confidence,
             relationship_reasoning   = excluded.relationship_reasoning,
             archetypes               = excluded.archetypes,
             gifting_profile          = excluded.gifting_profile,
             enrichment_metadata      = excluded.enrichment_metadata,
             updated_at               = excluded.updated_at",
          rusqlite::params![
            contact_id,
            predicted_month,
            predicted_day,
            birthday_confidence,
            birthday_reasoning,
            relationship,
            relationship_confidence,
            relationship_reasoning,
            archetypes_str,
            gifting_str,
            metadata_str,
            now_str,
          ],
        )?;

        Ok(contact_id)
      })
      .await?;

    let contact_id = decode_uuid(&stored_id)?;
    self
      .fetch_enriched(user_id, contact_id)
      .await?
      .ok_or(Error::ContactNotFound(contact_id))
  }

  async fn get_enriched(
    &self,
    user_id: &str,
    contact_id: Uuid,
  ) -> Result<Option<EnrichedContact>> {
    self.fetch_enriched(user_id, contact_id).await
  }

  async fn list_enriched(
    &self,
    user_id: &str,
    limit: usize,
    offset: usize,
  ) -> Result<Vec<EnrichedContact>> {
    let user       = user_id.to_owned();
    let limit_val  = limit as i64;
    let offset_val = offset as i64;

    let raws: Vec<RawEnrichedContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENRICHED_COLUMNS}
           FROM contacts c
           LEFT JOIN enriched_data e ON e.contact_id = c.contact_id
           WHERE c.user_id = ?1
           ORDER BY c.updated_at DESC, c.contact_id
           LIMIT ?2 OFFSET ?3"
        ))?;

        let rows = stmt
          .query_map(
            rusqlite::params![user, limit_val, offset_val],
            RawEnrichedContact::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawEnrichedContact::into_enriched)
      .collect()
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  async fn accept_birthday(
    &self,
    user_id: &str,
    contact_id: Uuid,
  ) -> Result<EnrichedContact> {
    let current = self
      .fetch_enriched(user_id, contact_id)
      .await?
      .ok_or(Error::ContactNotFound(contact_id))?;

    let prediction = current
      .predicted_birthday
      .ok_or(Error::NoPredictedBirthday(contact_id))?;

    // The stored metadata records the promotion: a user-confirmed birthday
    // carries confidence 100, which the engine itself never emits.
    let metadata_str = match &current.enrichment_metadata {
      Some(meta) => {
        let mut promoted = meta.clone();
        promoted.confidence.birthday = 100;
        Some(encode_json(&promoted)?)
      }
      None => None,
    };

    let id_str  = encode_uuid(contact_id);
    let now_str = encode_dt(Utc::now());
    let month   = prediction.month;
    let day     = prediction.day;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE contacts SET
             birthday_month = ?2, birthday_day = ?3, updated_at = ?4
           WHERE contact_id = ?1",
          rusqlite::params![id_str, month, day, now_str],
        )?;
        conn.execute(
          "UPDATE enriched_data SET
             predicted_birthday_month = NULL,
             predicted_birthday_day   = NULL,
             birthday_confidence      = NULL,
             birthday_reasoning       = NULL,
             enrichment_metadata      = COALESCE(?2, enrichment_metadata),
             updated_at               = ?3
           WHERE contact_id = ?1",
          rusqlite::params![id_str, metadata_str, now_str],
        )?;
        Ok(())
      })
      .await?;

    self
      .fetch_enriched(user_id, contact_id)
      .await?
      .ok_or(Error::ContactNotFound(contact_id))
  }
}
