//! Canonical contact types accepted by the enrichment pipeline.
//!
//! A [`ContactRecord`] is produced by an import adapter (the `kindred-import`
//! crate) or supplied directly by an API caller. The engine treats it as
//! immutable: enrichment derives new fields, it never rewrites the input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Partial date ────────────────────────────────────────────────────────────

/// A possibly incomplete calendar date. Any component may be absent; an
/// Apple vCard `BDAY:--05-14` carries a month and day but no year.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(default)]
pub struct PartialDate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub year:  Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub month: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub day:   Option<u32>,
}

impl PartialDate {
  /// True when no component is present at all.
  pub fn is_empty(&self) -> bool {
    self.year.is_none() && self.month.is_none() && self.day.is_none()
  }
}

// ─── ContactRecord ───────────────────────────────────────────────────────────

/// A normalized contact, ready for enrichment.
///
/// `social_handles` maps a platform name (e.g. `twitter`) to a handle;
/// `interests` maps a category (e.g. `hobbies`) to free-text terms. Both use
/// ordered maps so that serialization, and therefore the enrichment source
/// digest, is canonical for a given record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
  /// Present when the contact already exists in the store.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:             Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub full_name:      Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub emails:         Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub birthday:       Option<PartialDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gender:         Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub urls:           Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub photo_url:      Option<String>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub social_handles: BTreeMap<String, String>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub interests:      BTreeMap<String, Vec<String>>,
}

impl ContactRecord {
  /// A contact is enrichable only if it carries a non-blank name or at least
  /// one email address.
  pub fn has_minimum_data(&self) -> bool {
    self
      .full_name
      .as_deref()
      .is_some_and(|n| !n.trim().is_empty())
      || !self.emails.is_empty()
  }

  /// Validate the record ahead of enrichment.
  ///
  /// Import adapters parse date components without range checks, so a
  /// malformed export can hand us month 13; the batch coordinator screens
  /// each item through this before invoking the engine.
  pub fn validate(&self) -> Result<()> {
    if !self.has_minimum_data() {
      return Err(Error::InsufficientData);
    }
    if let Some(birthday) = &self.birthday {
      if let Some(month) = birthday.month
        && !(1..=12).contains(&month)
      {
        return Err(Error::InvalidBirthdayMonth(month));
      }
      if let Some(day) = birthday.day
        && !(1..=31).contains(&day)
      {
        return Err(Error::InvalidBirthdayDay(day));
      }
    }
    Ok(())
  }

  /// The domain part of the first email address, lowercased.
  pub fn primary_email_domain(&self) -> Option<String> {
    self
      .emails
      .first()
      .and_then(|e| e.split('@').nth(1))
      .filter(|d| !d.is_empty())
      .map(|d| d.to_ascii_lowercase())
  }
}
