//! Privacy consent records and the pure gate policy.
//!
//! The gate runs before any enrichment. Policy is lenient: a user with no
//! consent record at all is allowed through, and only an explicit
//! `consent_given = false` or a disabled feature toggle denies. Changing the
//! missing-record default changes observable behavior for every user who
//! never opened the privacy settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Features ────────────────────────────────────────────────────────────────

/// The individually consentable enrichment features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
  BirthdayPrediction,
  RelationshipInference,
  ArchetypeTagging,
  /// Lookups against third-party data sources. Unlike the other three, this
  /// defaults to disabled and requires an explicit opt-in.
  ExternalEnrichment,
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A stored consent record. Toggles are concrete here; defaults are applied
/// when a [`NewConsent`] is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyConsent {
  pub user_id:                      String,
  pub consent_given:                bool,
  pub consent_date:                 DateTime<Utc>,
  pub allow_birthday_prediction:    bool,
  pub allow_relationship_inference: bool,
  pub allow_archetype_tagging:      bool,
  pub allow_external_enrichment:    bool,
  /// Captured at consent time for the audit trail.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ip_address:                   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_agent:                   Option<String>,
  pub created_at:                   DateTime<Utc>,
  pub updated_at:                   DateTime<Utc>,
}

/// Input to a consent upsert. Absent toggles take their defaults: birthday,
/// relationship and archetype enrichment default on, external enrichment
/// defaults off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewConsent {
  pub consent_given:                bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub consent_date:                 Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub allow_birthday_prediction:    Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub allow_relationship_inference: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub allow_archetype_tagging:      Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub allow_external_enrichment:    Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ip_address:                   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_agent:                   Option<String>,
}

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Whether `feature` may run for a user whose consent record is `record`.
///
/// - No record → allowed (MVP leniency, see the module docs).
/// - Umbrella consent withdrawn → every feature denied, toggles ignored.
/// - Otherwise the per-feature toggle decides.
pub fn feature_allowed(record: Option<&PrivacyConsent>, feature: Feature) -> bool {
  let Some(record) = record else {
    return true;
  };
  if !record.consent_given {
    return false;
  }
  match feature {
    Feature::BirthdayPrediction => record.allow_birthday_prediction,
    Feature::RelationshipInference => record.allow_relationship_inference,
    Feature::ArchetypeTagging => record.allow_archetype_tagging,
    Feature::ExternalEnrichment => record.allow_external_enrichment,
  }
}

/// Whether any enrichment at all may run for the user.
pub fn enrichment_allowed(record: Option<&PrivacyConsent>) -> bool {
  record.is_none_or(|r| r.consent_given)
}
