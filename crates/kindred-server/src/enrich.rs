//! Handler for `POST /api/enrich`.
//!
//! One body shape covers both cardinalities: `{"contact": {…}}` enriches a
//! single record and `{"contacts": […]}` a batch, each with optional
//! `options` and `context` objects. Every call walks the same gauntlet:
//! privacy gate, rate limiter, shape validation, engine, persistence, audit
//! entry.

use std::time::Instant;

use axum::{Json, extract::State};
use chrono::Utc;
use kindred_core::{
  audit::{LogEntry, Operation},
  consent::{self, Feature, PrivacyConsent},
  contact::ContactRecord,
  enrichment::{BatchOutcome, BatchStats, EnrichmentContext, EnrichmentOptions, ItemOutcome},
  store::EnrichmentStore,
};
use kindred_engine::{ALGORITHM_VERSION, enrich_batch};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::AuthedUser, error::ApiError};

/// JSON body for `POST /api/enrich`.
#[derive(Debug, Deserialize)]
pub struct EnrichRequest {
  /// Single-contact form. Ignored when `contacts` is present.
  pub contact:  Option<ContactRecord>,
  pub contacts: Option<Vec<ContactRecord>>,
  #[serde(default)]
  pub options:  EnrichmentOptions,
  #[serde(default)]
  pub context:  EnrichmentContext,
}

#[derive(Debug, Serialize)]
pub struct EnrichResponse {
  pub results:    Vec<ItemOutcome>,
  pub stats:      BatchStats,
  /// How many enriched contacts were persisted. Save failures are logged
  /// and skipped rather than failing the call.
  pub saved:      usize,
  pub elapsed_ms: u64,
  pub version:    &'static str,
}

/// `POST /api/enrich`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  AuthedUser(user_id): AuthedUser,
  Json(body): Json<EnrichRequest>,
) -> Result<Json<EnrichResponse>, ApiError>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let started = Instant::now();
  let EnrichRequest { contact, contacts, options, context } = body;

  // Store trouble during the gate falls back to the no-record default,
  // which allows enrichment with every feature enabled.
  let record = match state.store.get_consent(&user_id).await {
    Ok(record) => record,
    Err(e) => {
      tracing::warn!("consent lookup failed, applying no-record default: {e}");
      None
    }
  };
  if !consent::enrichment_allowed(record.as_ref()) {
    return Err(ApiError::ConsentRequired);
  }

  let decision = state.limiter.check_and_consume(&user_id);
  if !decision.allowed {
    return Err(ApiError::RateLimited {
      retry_after_secs: decision.retry_after_secs.unwrap_or(60),
      remaining:        decision.remaining,
      reset_at:         decision.reset_at,
    });
  }

  let (operation, inputs) = match (contacts, contact) {
    (Some(contacts), _) => {
      if contacts.is_empty() {
        return Err(ApiError::InvalidRequest(
          "contacts array must not be empty".to_string(),
        ));
      }
      if contacts.len() > state.config.max_batch_size {
        return Err(ApiError::BatchTooLarge(state.config.max_batch_size));
      }
      (Operation::EnrichBatch, contacts)
    }
    (None, Some(contact)) => (Operation::EnrichSingle, vec![contact]),
    (None, None) => {
      return Err(ApiError::InvalidRequest(
        "a contact object or a contacts array is required".to_string(),
      ));
    }
  };

  let options = consented_options(options, record.as_ref());
  let mut outcome = enrich_batch(&inputs, &options, &context, Utc::now());

  let mut saved = 0usize;
  for result in &mut outcome.results {
    if let ItemOutcome::Enriched { contact } = result {
      match state.store.save_enriched(&user_id, contact).await {
        Ok(stored) => {
          // Swap in the stored copy so the response carries the assigned id.
          *contact = stored;
          saved += 1;
        }
        Err(e) => tracing::warn!("failed to persist enriched contact: {e}"),
      }
    }
  }

  state
    .audit
    .append(&audit_entry(&user_id, operation, &inputs, &outcome, saved, started))
    .await;

  Ok(Json(EnrichResponse {
    results:    outcome.results,
    stats:      outcome.stats,
    saved,
    elapsed_ms: outcome.elapsed_ms,
    version:    ALGORITHM_VERSION,
  }))
}

/// Intersect the caller's requested inferers with the per-feature consent
/// toggles. Gifting has no toggle of its own; the profile derives from
/// archetypes and vanishes along with them.
fn consented_options(
  requested: EnrichmentOptions,
  record: Option<&PrivacyConsent>,
) -> EnrichmentOptions {
  EnrichmentOptions {
    predict_birthday: requested.predict_birthday
      && consent::feature_allowed(record, Feature::BirthdayPrediction),
    infer_relationship: requested.infer_relationship
      && consent::feature_allowed(record, Feature::RelationshipInference),
    tag_archetypes: requested.tag_archetypes
      && consent::feature_allowed(record, Feature::ArchetypeTagging),
    generate_gifting_profile: requested.generate_gifting_profile,
  }
}

fn audit_entry(
  user_id: &str,
  operation: Operation,
  inputs: &[ContactRecord],
  outcome: &BatchOutcome,
  saved: usize,
  started: Instant,
) -> LogEntry {
  let success = outcome.stats.error_count() == 0;

  let (contact_id, fields_enriched, error) = match operation {
    Operation::EnrichSingle => {
      let first = outcome.results.first();
      (
        inputs.first().and_then(|c| c.id).map(|id| id.to_string()),
        first.and_then(|r| r.contact()).and_then(|c| {
          c.enrichment_metadata
            .as_ref()
            .map(|m| m.fields_enriched.clone())
        }),
        first.and_then(|r| r.error()).map(|e| e.message.clone()),
      )
    }
    _ => (None, None, None),
  };

  let metadata = match operation {
    Operation::EnrichBatch => Some(serde_json::json!({
      "total":     outcome.stats.total,
      "succeeded": outcome.stats.succeeded,
      "failed":    outcome.stats.failed,
      "skipped":   outcome.stats.skipped,
      "saved":     saved,
    })),
    _ => None,
  };

  LogEntry {
    timestamp: Utc::now(),
    user_id: user_id.to_string(),
    contact_id,
    operation,
    success,
    duration_ms: started.elapsed().as_millis() as u64,
    fields_enriched,
    error,
    metadata,
  }
}
