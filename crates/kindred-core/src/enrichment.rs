//! Enrichment output types: what the engine derives from a [`ContactRecord`].
//!
//! Every derived field carries a confidence in `[0, 99]` and a human-readable
//! reasoning string. Confidence 100 is reserved for user-confirmed data and is
//! only ever written by the accept-birthday lifecycle operation, never by the
//! engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, contact::ContactRecord};

// ─── Birthday ────────────────────────────────────────────────────────────────

/// A heuristic birthday guess. A prediction always carries a month; signals
/// that cannot name a month (e.g. a birth year spotted in an email address)
/// corroborate other signals but never produce a prediction on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayPrediction {
  pub month:      u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub day:        Option<u32>,
  pub confidence: u8,
  pub reasoning:  String,
}

// ─── Relationship ────────────────────────────────────────────────────────────

/// The fixed relationship taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
  Family,
  CloseFriend,
  Friend,
  Colleague,
  Acquaintance,
  Professional,
  Unknown,
}

impl RelationshipKind {
  /// The string stored in the `inferred_relationship` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Family => "family",
      Self::CloseFriend => "close_friend",
      Self::Friend => "friend",
      Self::Colleague => "colleague",
      Self::Acquaintance => "acquaintance",
      Self::Professional => "professional",
      Self::Unknown => "unknown",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "family" => Some(Self::Family),
      "close_friend" => Some(Self::CloseFriend),
      "friend" => Some(Self::Friend),
      "colleague" => Some(Self::Colleague),
      "acquaintance" => Some(Self::Acquaintance),
      "professional" => Some(Self::Professional),
      "unknown" => Some(Self::Unknown),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipInference {
  pub kind:       RelationshipKind,
  pub confidence: u8,
  pub reasoning:  String,
}

/// How often the user communicates with the contact, when the caller's CRM
/// data knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationFrequency {
  Daily,
  Weekly,
  Monthly,
  Rare,
}

/// Optional interaction history for the relationship inferer. Recency is
/// supplied as a precomputed day count so the inference itself stays free of
/// clock reads.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(default)]
pub struct InteractionMetrics {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub communication_frequency:  Option<CommunicationFrequency>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub shared_connections:       Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub days_since_last_contact:  Option<u32>,
}

/// Caller-supplied knowledge that sharpens inference beyond the contact
/// record itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentContext {
  /// The requesting user's own email domain; a contact on the same domain is
  /// almost certainly a colleague.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub own_email_domain: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub interaction:      Option<InteractionMetrics>,
}

// ─── Archetypes & gifting ────────────────────────────────────────────────────

/// A personality/style tag with independent confidence. Archetypes are not
/// mutually exclusive; a contact carries at most the top three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
  pub id:          String,
  pub name:        String,
  pub description: String,
  pub tags:        Vec<String>,
  pub confidence:  u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftingStyle {
  Sentimental,
  Practical,
  Experiential,
  Luxurious,
  Creative,
  TechSavvy,
  EcoConscious,
  Foodie,
}

/// Preference scores across the four base gift styles, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GiftingPreferences {
  pub sentimental:  f64,
  pub practical:    f64,
  pub experiential: f64,
  pub luxurious:    f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
  pub min: f64,
  pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftingProfile {
  pub style:        GiftingStyle,
  pub preferences:  GiftingPreferences,
  /// Set by the user when editing; the engine never guesses a budget.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub budget_range: Option<BudgetRange>,
  pub interests:    Vec<String>,
}

// ─── Trait extraction ────────────────────────────────────────────────────────

/// Personality/tone/aesthetic traits extracted from a handful of free words
/// describing the recipient. Each list falls back to a single neutral default
/// when no keyword matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTraits {
  pub personality: Vec<String>,
  pub tone:        Vec<String>,
  pub aesthetic:   Vec<String>,
}

// ─── Metadata ────────────────────────────────────────────────────────────────

/// Per-field and overall confidence, each in `[0, 100]`. A field the engine
/// declined to enrich reports 0 and is excluded from the overall mean.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct ConfidenceBreakdown {
  pub overall:      u8,
  pub birthday:     u8,
  pub relationship: u8,
  pub archetype:    u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentMetadata {
  pub enriched_at:     DateTime<Utc>,
  /// Heuristic algorithm version, bumped when signal tables change.
  pub version:         String,
  pub fields_enriched: Vec<String>,
  pub confidence:      ConfidenceBreakdown,
  pub privacy_consent: bool,
  /// Lowercase-hex SHA-256 over the canonical JSON of the input record.
  /// Lets callers detect that a stored enrichment refers to a contact that
  /// has since changed.
  pub source_digest:   String,
}

// ─── EnrichedContact ─────────────────────────────────────────────────────────

/// A [`ContactRecord`] plus whatever the engine managed to derive. Absent
/// derived fields mean the corresponding inferer was disabled, found no
/// signal, or was skipped (birthday prediction is skipped when a birthday is
/// already known).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedContact {
  #[serde(flatten)]
  pub contact:               ContactRecord,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub predicted_birthday:    Option<BirthdayPrediction>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub inferred_relationship: Option<RelationshipInference>,
  /// `Some` only when tagging ran and matched at least one archetype.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub archetypes:            Option<Vec<Archetype>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gifting_profile:       Option<GiftingProfile>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub enrichment_metadata:   Option<EnrichmentMetadata>,
}

// ─── Options ─────────────────────────────────────────────────────────────────

fn default_true() -> bool { true }

/// Which inferers to run. Every feature defaults to enabled; the HTTP layer
/// additionally intersects these with the user's per-feature consent before
/// the engine sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentOptions {
  #[serde(default = "default_true")]
  pub predict_birthday:         bool,
  #[serde(default = "default_true")]
  pub infer_relationship:       bool,
  #[serde(default = "default_true")]
  pub tag_archetypes:           bool,
  #[serde(default = "default_true")]
  pub generate_gifting_profile: bool,
}

impl Default for EnrichmentOptions {
  fn default() -> Self {
    Self {
      predict_birthday:         true,
      infer_relationship:       true,
      tag_archetypes:           true,
      generate_gifting_profile: true,
    }
  }
}

// ─── Batch types ─────────────────────────────────────────────────────────────

/// Machine-readable code for a per-item batch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemErrorCode {
  /// The contact had neither a name nor an email address.
  InsufficientData,
  /// The contact failed validation (e.g. birthday month out of range).
  InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
  pub code:    ItemErrorCode,
  pub message: String,
}

impl From<Error> for ItemError {
  fn from(e: Error) -> Self {
    let code = match &e {
      Error::InsufficientData => ItemErrorCode::InsufficientData,
      _ => ItemErrorCode::InvalidInput,
    };
    Self {
      code,
      message: e.to_string(),
    }
  }
}

/// The outcome for one input position of a batch. Outcomes are positional:
/// `results[i]` always refers to `inputs[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
  Enriched { contact: EnrichedContact },
  Failed { error: ItemError },
}

impl ItemOutcome {
  pub fn is_success(&self) -> bool { matches!(self, Self::Enriched { .. }) }

  pub fn contact(&self) -> Option<&EnrichedContact> {
    match self {
      Self::Enriched { contact } => Some(contact),
      Self::Failed { .. } => None,
    }
  }

  pub fn error(&self) -> Option<&ItemError> {
    match self {
      Self::Enriched { .. } => None,
      Self::Failed { error } => Some(error),
    }
  }
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct BatchStats {
  pub total:     usize,
  pub succeeded: usize,
  /// Items rejected by validation for reasons other than missing data.
  pub failed:    usize,
  /// Items with neither a name nor an email address.
  pub skipped:   usize,
}

impl BatchStats {
  pub fn success_count(&self) -> usize { self.succeeded }

  /// Every item that did not produce an enriched contact.
  pub fn error_count(&self) -> usize { self.failed + self.skipped }
}

/// The result of enriching a list of contacts. Nothing about a batch is
/// transactional: partial success is expected and normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
  pub results:    Vec<ItemOutcome>,
  pub stats:      BatchStats,
  pub elapsed_ms: u64,
}
