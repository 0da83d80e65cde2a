//! Relationship inference from email domain and interaction history.

use kindred_core::{
  contact::ContactRecord,
  enrichment::{
    CommunicationFrequency, EnrichmentContext, RelationshipInference,
    RelationshipKind,
  },
};

/// Consumer mail providers; a contact on one of these is probably known
/// socially rather than professionally.
const PERSONAL_DOMAINS: [&str; 5] = [
  "gmail.com",
  "yahoo.com",
  "hotmail.com",
  "outlook.com",
  "icloud.com",
];

struct Signal {
  kind:       RelationshipKind,
  confidence: u32,
  reason:     String,
}

/// Infer a relationship type. Always returns a value: with no usable signal
/// the result is [`RelationshipKind::Unknown`] at low confidence rather than
/// a guess.
pub fn infer_relationship(
  contact: &ContactRecord,
  context: &EnrichmentContext,
) -> RelationshipInference {
  let mut signals = Vec::new();

  if let Some(domain) = contact.primary_email_domain() {
    let own_domain = context
      .own_email_domain
      .as_deref()
      .map(str::to_ascii_lowercase);
    if PERSONAL_DOMAINS.contains(&domain.as_str()) {
      signals.push(Signal {
        kind:       RelationshipKind::Friend,
        confidence: 40,
        reason:     "personal_email_domain".into(),
      });
    } else if own_domain.as_deref() == Some(domain.as_str()) {
      signals.push(Signal {
        kind:       RelationshipKind::Colleague,
        confidence: 70,
        reason:     format!("shared_email_domain ({domain})"),
      });
    } else {
      signals.push(Signal {
        kind:       RelationshipKind::Colleague,
        confidence: 60,
        reason:     "work_email_domain".into(),
      });
    }
  }

  if let Some(metrics) = &context.interaction {
    if let Some(frequency) = metrics.communication_frequency {
      let (kind, confidence, reason) = match frequency {
        CommunicationFrequency::Daily => {
          (RelationshipKind::CloseFriend, 70, "daily_communication")
        }
        CommunicationFrequency::Weekly => {
          (RelationshipKind::Friend, 60, "weekly_communication")
        }
        CommunicationFrequency::Monthly => {
          (RelationshipKind::Acquaintance, 50, "monthly_communication")
        }
        CommunicationFrequency::Rare => {
          (RelationshipKind::Acquaintance, 40, "rare_communication")
        }
      };
      signals.push(Signal {
        kind,
        confidence,
        reason: reason.into(),
      });
    }

    let shared = metrics.shared_connections.unwrap_or(0);
    if shared > 10 {
      signals.push(Signal {
        kind:       RelationshipKind::CloseFriend,
        confidence: 50,
        reason:     "many_shared_connections".into(),
      });
    } else if shared > 5 {
      signals.push(Signal {
        kind:       RelationshipKind::Friend,
        confidence: 45,
        reason:     "some_shared_connections".into(),
      });
    }

    if let Some(days) = metrics.days_since_last_contact {
      if days < 7 {
        signals.push(Signal {
          kind:       RelationshipKind::CloseFriend,
          confidence: 40,
          reason:     "recent_contact".into(),
        });
      } else if days > 180 {
        signals.push(Signal {
          kind:       RelationshipKind::Acquaintance,
          confidence: 35,
          reason:     "infrequent_contact".into(),
        });
      }
    }
  }

  if signals.is_empty() {
    return RelationshipInference {
      kind:       RelationshipKind::Unknown,
      confidence: 20,
      reasoning:  "Insufficient data for relationship inference".into(),
    };
  }

  aggregate(signals)
}

/// Pick the winning kind: most signals first, then highest mean confidence.
/// Remaining ties keep the earliest-encountered kind, which is deterministic
/// because signals are collected in a fixed order.
fn aggregate(signals: Vec<Signal>) -> RelationshipInference {
  struct Tally {
    count:   usize,
    total:   u32,
    reasons: Vec<String>,
  }

  let mut tallies: Vec<(RelationshipKind, Tally)> = Vec::new();
  for signal in signals {
    match tallies.iter_mut().find(|(kind, _)| *kind == signal.kind) {
      Some((_, tally)) => {
        tally.count += 1;
        tally.total += signal.confidence;
        tally.reasons.push(signal.reason);
      }
      None => tallies.push((
        signal.kind,
        Tally {
          count:   1,
          total:   signal.confidence,
          reasons: vec![signal.reason],
        },
      )),
    }
  }

  let mut best = 0;
  for index in 1..tallies.len() {
    let (_, candidate) = &tallies[index];
    let (_, current) = &tallies[best];
    // Mean comparison without division: a/b > c/d iff a*d > c*b.
    if candidate.count > current.count
      || (candidate.count == current.count
        && candidate.total as u64 * current.count as u64
          > current.total as u64 * candidate.count as u64)
    {
      best = index;
    }
  }
  let (kind, tally) = tallies.swap_remove(best);

  let confidence = (tally.total as f64 / tally.count as f64).round() as u8;
  RelationshipInference {
    kind,
    confidence,
    reasoning: format!("Inferred from {}", tally.reasons.join(", ")),
  }
}
