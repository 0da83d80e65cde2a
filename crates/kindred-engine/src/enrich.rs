//! Top-level enrichment composition.
//!
//! [`enrich_contact`] validates a record, runs the enabled inferers, and
//! assembles the [`EnrichedContact`] with its metadata block. The inferers
//! themselves are pure; the caller supplies the timestamp that becomes
//! `enriched_at`, so identical inputs always produce identical output.

use chrono::{DateTime, Utc};
use kindred_core::{
  Error, Result,
  contact::ContactRecord,
  enrichment::{
    Archetype, BatchOutcome, BatchStats, ConfidenceBreakdown, EnrichedContact,
    EnrichmentContext, EnrichmentMetadata, EnrichmentOptions, ItemOutcome,
  },
};

use crate::{
  archetype::tag_archetypes, birthday::predict_birthday,
  digest::source_digest, gifting::generate_gifting_profile,
  relationship::infer_relationship,
};

/// Bumped whenever a signal table or scoring formula changes.
pub const ALGORITHM_VERSION: &str = "1.0.0";

/// Enrich a single contact.
///
/// Fails only when the record itself is invalid (no name and no email, or an
/// out-of-range birthday). Inferers that find nothing simply leave their
/// field unset; that is not an error.
pub fn enrich_contact(
  contact: &ContactRecord,
  options: &EnrichmentOptions,
  context: &EnrichmentContext,
  now: DateTime<Utc>,
) -> Result<EnrichedContact> {
  contact.validate()?;

  let mut fields_enriched = Vec::new();
  let mut confidence = ConfidenceBreakdown::default();

  // A known birthday is never second-guessed.
  let predicted_birthday =
    if options.predict_birthday && !has_known_birthday(contact) {
      let predicted = predict_birthday(contact);
      if let Some(p) = &predicted {
        fields_enriched.push("predicted_birthday".to_string());
        confidence.birthday = p.confidence;
      }
      predicted
    } else {
      None
    };

  let inferred_relationship = if options.infer_relationship {
    let inference = infer_relationship(contact, context);
    fields_enriched.push("inferred_relationship".to_string());
    confidence.relationship = inference.confidence;
    Some(inference)
  } else {
    None
  };

  let archetypes = if options.tag_archetypes {
    let tagged = tag_archetypes(contact);
    if tagged.is_empty() {
      None
    } else {
      fields_enriched.push("archetypes".to_string());
      confidence.archetype = mean_confidence(&tagged);
      Some(tagged)
    }
  } else {
    None
  };

  // Gifting needs at least one archetype to say anything useful.
  let gifting_profile = match (&archetypes, options.generate_gifting_profile)
  {
    (Some(tagged), true) => {
      fields_enriched.push("gifting_profile".to_string());
      Some(generate_gifting_profile(tagged))
    }
    _ => None,
  };

  confidence.overall = overall_confidence(&confidence);

  let metadata = EnrichmentMetadata {
    enriched_at: now,
    version: ALGORITHM_VERSION.to_string(),
    fields_enriched,
    confidence,
    privacy_consent: true,
    source_digest: source_digest(contact)?,
  };

  Ok(EnrichedContact {
    contact:               contact.clone(),
    predicted_birthday,
    inferred_relationship,
    archetypes,
    gifting_profile,
    enrichment_metadata:   Some(metadata),
  })
}

/// Enrich a list of contacts, one outcome per input position.
///
/// Invalid items fail individually and never abort the rest of the batch.
pub fn enrich_batch(
  contacts: &[ContactRecord],
  options: &EnrichmentOptions,
  context: &EnrichmentContext,
  now: DateTime<Utc>,
) -> BatchOutcome {
  let started = std::time::Instant::now();
  let mut stats = BatchStats {
    total: contacts.len(),
    ..Default::default()
  };

  let results = contacts
    .iter()
    .map(|contact| match enrich_contact(contact, options, context, now) {
      Ok(contact) => {
        stats.succeeded += 1;
        ItemOutcome::Enriched { contact }
      }
      Err(e) => {
        if matches!(e, Error::InsufficientData) {
          stats.skipped += 1;
        } else {
          stats.failed += 1;
        }
        ItemOutcome::Failed { error: e.into() }
      }
    })
    .collect();

  BatchOutcome {
    results,
    stats,
    elapsed_ms: started.elapsed().as_millis() as u64,
  }
}

fn has_known_birthday(contact: &ContactRecord) -> bool {
  contact.birthday.as_ref().is_some_and(|b| !b.is_empty())
}

fn mean_confidence(archetypes: &[Archetype]) -> u8 {
  let sum: u32 = archetypes.iter().map(|a| u32::from(a.confidence)).sum();
  (f64::from(sum) / archetypes.len() as f64).round() as u8
}

/// Mean of the non-zero per-field confidences, or 0 when nothing ran.
fn overall_confidence(confidence: &ConfidenceBreakdown) -> u8 {
  let fields = [
    confidence.birthday,
    confidence.relationship,
    confidence.archetype,
  ];
  let nonzero: Vec<u32> = fields
    .iter()
    .filter(|v| **v > 0)
    .map(|v| u32::from(*v))
    .collect();
  if nonzero.is_empty() {
    return 0;
  }
  let sum: u32 = nonzero.iter().sum();
  (f64::from(sum) / nonzero.len() as f64).round() as u8
}
