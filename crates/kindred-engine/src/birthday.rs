//! Birthday prediction from name, email and social-text signals.
//!
//! Signals are weak on their own (a contact named April is not reliably born
//! in April), so confidence starts from the strongest signal and grows only
//! with corroboration, capped far below user-confirmed certainty.

use std::collections::BTreeMap;

use kindred_core::{contact::ContactRecord, enrichment::BirthdayPrediction};

const MONTH_NAMES: [&str; 12] = [
  "january",
  "february",
  "march",
  "april",
  "may",
  "june",
  "july",
  "august",
  "september",
  "october",
  "november",
  "december",
];

/// Season word → the middle month of that season.
const SEASONS: [(&str, u32); 5] = [
  ("spring", 4),
  ("summer", 7),
  ("fall", 10),
  ("autumn", 10),
  ("winter", 1),
];

/// Rule-based guessing has limits; no amount of corroboration pushes a
/// prediction past this.
const CONFIDENCE_CAP: u32 = 60;
const CORROBORATION_BONUS: u32 = 5;

struct Signal {
  /// `None` for signals that suggest a birth year but no month.
  month:      Option<u32>,
  confidence: u32,
  source:     &'static str,
}

/// Predict a birthday month (never a day) from whatever weak signals the
/// record carries. Returns `None` when no month-bearing signal exists; a
/// year-only signal corroborates other evidence but cannot produce a
/// prediction by itself.
pub fn predict_birthday(contact: &ContactRecord) -> Option<BirthdayPrediction> {
  let signals = collect_signals(contact);

  struct MonthTally {
    count:     usize,
    strongest: u32,
    sources:   Vec<&'static str>,
  }

  let mut tallies: BTreeMap<u32, MonthTally> = BTreeMap::new();
  let mut corroborating: Vec<&'static str> = Vec::new();

  for signal in &signals {
    match signal.month {
      Some(month) => {
        let tally = tallies.entry(month).or_insert(MonthTally {
          count:     0,
          strongest: 0,
          sources:   Vec::new(),
        });
        tally.count += 1;
        tally.strongest = tally.strongest.max(signal.confidence);
        tally.sources.push(signal.source);
      }
      None => corroborating.push(signal.source),
    }
  }

  // Winning month: most signals, then strongest single signal. BTreeMap
  // iteration is ascending, so ties resolve to the lowest month number.
  let mut best: Option<(u32, MonthTally)> = None;
  for (month, tally) in tallies {
    let better = match &best {
      None => true,
      Some((_, current)) => {
        tally.count > current.count
          || (tally.count == current.count
            && tally.strongest > current.strongest)
      }
    };
    if better {
      best = Some((month, tally));
    }
  }
  let (month, tally) = best?;

  let extra_signals = tally.count - 1 + corroborating.len();
  let confidence = CONFIDENCE_CAP
    .min(tally.strongest + CORROBORATION_BONUS * extra_signals as u32);

  let mut sources = tally.sources;
  sources.extend(corroborating);
  let total = sources.len();
  let reasoning = format!(
    "Predicted from {} ({} signal{})",
    sources.join(", "),
    total,
    if total == 1 { "" } else { "s" },
  );

  Some(BirthdayPrediction {
    month,
    day: None,
    confidence: confidence as u8,
    reasoning,
  })
}

fn collect_signals(contact: &ContactRecord) -> Vec<Signal> {
  let mut signals = Vec::new();

  // A month name inside the full name, e.g. "April Johnson".
  let name = contact.full_name.as_deref().unwrap_or_default().to_lowercase();
  for (index, month_name) in MONTH_NAMES.into_iter().enumerate() {
    if name.contains(month_name) {
      signals.push(Signal {
        month:      Some(index as u32 + 1),
        confidence: 30,
        source:     "name_pattern",
      });
    }
  }

  // A plausible birth year inside the first email, e.g. john1990@example.com.
  if let Some(email) = contact.emails.first()
    && let Some(year) = first_four_digit_run(email)
    && (1940..=2010).contains(&year)
  {
    signals.push(Signal {
      month:      None,
      confidence: 40,
      source:     "email_year_pattern",
    });
  }

  // Month and season words across urls and social handles,
  // e.g. @june_bug or @spring_baby.
  let social = social_text(contact);
  for (index, month_name) in MONTH_NAMES.into_iter().enumerate() {
    if social.contains(month_name) {
      signals.push(Signal {
        month:      Some(index as u32 + 1),
        confidence: 50,
        source:     "social_handle_pattern",
      });
    }
  }
  for (season, middle_month) in SEASONS {
    if social.contains(season) {
      signals.push(Signal {
        month:      Some(middle_month),
        confidence: 35,
        source:     "season_pattern",
      });
    }
  }

  signals
}

fn social_text(contact: &ContactRecord) -> String {
  let mut parts: Vec<&str> =
    contact.urls.iter().map(String::as_str).collect();
  parts.extend(contact.social_handles.values().map(String::as_str));
  parts.join(" ").to_lowercase()
}

/// The first run of four consecutive ASCII digits in `s`, parsed.
fn first_four_digit_run(s: &str) -> Option<i64> {
  let bytes = s.as_bytes();
  for i in 0..bytes.len().saturating_sub(3) {
    if bytes[i..i + 4].iter().all(|b| b.is_ascii_digit()) {
      return s[i..i + 4].parse().ok();
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;

  fn named(name: &str) -> ContactRecord {
    ContactRecord {
      full_name: Some(name.into()),
      ..Default::default()
    }
  }

  #[test]
  fn month_name_in_full_name() {
    let prediction = predict_birthday(&named("April Johnson")).unwrap();
    assert_eq!(prediction.month, 4);
    assert_eq!(prediction.day, None);
    assert_eq!(prediction.confidence, 30);
    assert_eq!(prediction.reasoning, "Predicted from name_pattern (1 signal)");
  }

  #[test]
  fn no_signals_means_no_prediction() {
    assert!(predict_birthday(&named("John Doe")).is_none());
    assert!(predict_birthday(&ContactRecord::default()).is_none());
  }

  #[test]
  fn email_year_alone_cannot_pick_a_month() {
    let contact = ContactRecord {
      full_name: Some("John Doe".into()),
      emails: vec!["john1990@gmail.com".into()],
      ..Default::default()
    };
    assert!(predict_birthday(&contact).is_none());
  }

  #[test]
  fn email_year_corroborates_a_month_signal() {
    let contact = ContactRecord {
      full_name: Some("April Johnson".into()),
      emails: vec!["april1985@gmail.com".into()],
      ..Default::default()
    };
    let prediction = predict_birthday(&contact).unwrap();
    assert_eq!(prediction.month, 4);
    assert_eq!(prediction.confidence, 35);
    assert_eq!(
      prediction.reasoning,
      "Predicted from name_pattern, email_year_pattern (2 signals)"
    );
  }

  #[test]
  fn season_word_in_social_handle() {
    let contact = ContactRecord {
      full_name: Some("Sam Smith".into()),
      social_handles: [("twitter".to_string(), "@spring_baby".to_string())]
        .into_iter()
        .collect(),
      ..Default::default()
    };
    let prediction = predict_birthday(&contact).unwrap();
    assert_eq!(prediction.month, 4);
    assert_eq!(prediction.confidence, 35);
    assert!(prediction.reasoning.contains("season_pattern"));
  }

  #[test]
  fn month_name_in_social_text() {
    let contact = ContactRecord {
      urls: vec!["https://instagram.com/june_bug".into()],
      emails: vec!["someone@example.com".into()],
      ..Default::default()
    };
    let prediction = predict_birthday(&contact).unwrap();
    assert_eq!(prediction.month, 6);
    assert_eq!(prediction.confidence, 50);
    assert!(prediction.reasoning.contains("social_handle_pattern"));
  }

  #[test]
  fn most_corroborated_month_wins() {
    // Month 4 has two signals (name + social); month 6 has one.
    let contact = ContactRecord {
      full_name: Some("April Johnson".into()),
      urls: vec!["april.dev".into(), "june.example.com".into()],
      ..Default::default()
    };
    let prediction = predict_birthday(&contact).unwrap();
    assert_eq!(prediction.month, 4);
    assert_eq!(prediction.confidence, 55);
  }

  #[test]
  fn confidence_never_exceeds_the_cap() {
    // Four signals for April: name, social month, season, email year.
    let contact = ContactRecord {
      full_name: Some("April Johnson".into()),
      emails: vec!["april1990@gmail.com".into()],
      urls: vec!["https://april.me".into()],
      social_handles: [("instagram".to_string(), "@spring_kid".to_string())]
        .into_iter()
        .collect(),
      ..Default::default()
    };
    let prediction = predict_birthday(&contact).unwrap();
    assert_eq!(prediction.month, 4);
    assert_eq!(prediction.confidence, 60);
    assert!(prediction.reasoning.contains("(4 signals)"));
  }

  #[test]
  fn implausible_email_year_is_ignored() {
    let contact = ContactRecord {
      full_name: Some("April Johnson".into()),
      emails: vec!["april2024@gmail.com".into()],
      ..Default::default()
    };
    let prediction = predict_birthday(&contact).unwrap();
    // Only the name signal counts; 2024 is not a plausible birth year.
    assert_eq!(prediction.confidence, 30);
    assert!(!prediction.reasoning.contains("email_year_pattern"));
  }
}
