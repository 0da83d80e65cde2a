//! Gifting profile synthesis from tagged archetypes.
//!
//! Preference scores start at a neutral 50 and move with each archetype,
//! weighted by that archetype's confidence. The primary style compares the
//! four preference scores against the raw confidences of the style-flavored
//! archetypes; the earliest-listed candidate wins a tie.

use kindred_core::enrichment::{
  Archetype, GiftingPreferences, GiftingProfile, GiftingStyle,
};

/// Derive a gifting profile from a contact's archetypes. An empty slice
/// yields the neutral profile: every preference at 50, sentimental style.
pub fn generate_gifting_profile(archetypes: &[Archetype]) -> GiftingProfile {
  let mut preferences = GiftingPreferences {
    sentimental:  50.0,
    practical:    50.0,
    experiential: 50.0,
    luxurious:    50.0,
  };

  for archetype in archetypes {
    let weight = f64::from(archetype.confidence) / 100.0;
    match archetype.id.as_str() {
      "tech_enthusiast" => {
        preferences.practical += 20.0 * weight;
        preferences.luxurious += 15.0 * weight;
      }
      "creative_artist" => {
        preferences.sentimental += 25.0 * weight;
        preferences.experiential += 15.0 * weight;
      }
      "outdoor_adventurer" => {
        preferences.experiential += 30.0 * weight;
        preferences.practical += 10.0 * weight;
      }
      "foodie" => {
        preferences.experiential += 25.0 * weight;
        preferences.luxurious += 15.0 * weight;
      }
      "bookworm" => {
        preferences.sentimental += 20.0 * weight;
        preferences.practical += 10.0 * weight;
      }
      "fitness_enthusiast" => {
        preferences.practical += 25.0 * weight;
        preferences.experiential += 15.0 * weight;
      }
      "eco_warrior" => {
        preferences.sentimental += 15.0 * weight;
        preferences.practical += 20.0 * weight;
      }
      "fashionista" => {
        preferences.luxurious += 30.0 * weight;
        preferences.sentimental += 10.0 * weight;
      }
      _ => {}
    }
  }

  preferences.sentimental = preferences.sentimental.clamp(0.0, 100.0);
  preferences.practical = preferences.practical.clamp(0.0, 100.0);
  preferences.experiential = preferences.experiential.clamp(0.0, 100.0);
  preferences.luxurious = preferences.luxurious.clamp(0.0, 100.0);

  GiftingProfile {
    style: primary_style(&preferences, archetypes),
    preferences,
    budget_range: None,
    interests: collect_interests(archetypes),
  }
}

fn primary_style(
  preferences: &GiftingPreferences,
  archetypes: &[Archetype],
) -> GiftingStyle {
  let confidence_of = |id: &str| -> f64 {
    archetypes
      .iter()
      .find(|a| a.id == id)
      .map(|a| f64::from(a.confidence))
      .unwrap_or(0.0)
  };

  let candidates = [
    (GiftingStyle::Sentimental, preferences.sentimental),
    (GiftingStyle::Practical, preferences.practical),
    (GiftingStyle::Experiential, preferences.experiential),
    (GiftingStyle::Luxurious, preferences.luxurious),
    (GiftingStyle::Creative, confidence_of("creative_artist")),
    (GiftingStyle::TechSavvy, confidence_of("tech_enthusiast")),
    (GiftingStyle::EcoConscious, confidence_of("eco_warrior")),
    (GiftingStyle::Foodie, confidence_of("foodie")),
  ];

  let mut best = 0;
  for index in 1..candidates.len() {
    if candidates[index].1 > candidates[best].1 {
      best = index;
    }
  }
  candidates[best].0
}

/// Archetype tags in first-seen order, without duplicates.
fn collect_interests(archetypes: &[Archetype]) -> Vec<String> {
  let mut interests = Vec::new();
  for archetype in archetypes {
    for tag in &archetype.tags {
      if !interests.contains(tag) {
        interests.push(tag.clone());
      }
    }
  }
  interests
}

#[cfg(test)]
mod tests {
  use super::*;

  fn archetype(id: &str, confidence: u8) -> Archetype {
    Archetype {
      id: id.into(),
      name: String::new(),
      description: String::new(),
      tags: Vec::new(),
      confidence,
    }
  }

  fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
  }

  #[test]
  fn creative_artist_shifts_sentimental() {
    let profile =
      generate_gifting_profile(&[archetype("creative_artist", 80)]);
    assert!(close(profile.preferences.sentimental, 70.0));
    assert!(close(profile.preferences.experiential, 62.0));
    assert_eq!(profile.style, GiftingStyle::Creative);
  }

  #[test]
  fn tech_enthusiast_shifts_practical() {
    let profile =
      generate_gifting_profile(&[archetype("tech_enthusiast", 80)]);
    assert!(close(profile.preferences.practical, 66.0));
    assert!(close(profile.preferences.luxurious, 62.0));
    assert_eq!(profile.style, GiftingStyle::TechSavvy);
  }

  #[test]
  fn strong_preference_outranks_weak_archetype() {
    let profile = generate_gifting_profile(&[
      archetype("outdoor_adventurer", 60),
      archetype("foodie", 44),
    ]);
    assert!(close(profile.preferences.experiential, 79.0));
    assert_eq!(profile.style, GiftingStyle::Experiential);
  }

  #[test]
  fn no_archetypes_yield_the_neutral_profile() {
    let profile = generate_gifting_profile(&[]);
    assert!(close(profile.preferences.sentimental, 50.0));
    assert!(close(profile.preferences.practical, 50.0));
    assert_eq!(profile.style, GiftingStyle::Sentimental);
    assert!(profile.interests.is_empty());
    assert!(profile.budget_range.is_none());
  }

  #[test]
  fn preferences_stay_within_bounds() {
    let profile = generate_gifting_profile(&[
      archetype("tech_enthusiast", 100),
      archetype("fitness_enthusiast", 100),
      archetype("eco_warrior", 100),
      archetype("outdoor_adventurer", 100),
      archetype("bookworm", 100),
    ]);
    assert!(close(profile.preferences.practical, 100.0));
    for value in [
      profile.preferences.sentimental,
      profile.preferences.practical,
      profile.preferences.experiential,
      profile.preferences.luxurious,
    ] {
      assert!((0.0..=100.0).contains(&value));
    }
  }

  #[test]
  fn interests_union_tags_without_duplicates() {
    let mut creative = archetype("creative_artist", 50);
    creative.tags = vec!["creative".into(), "unique".into()];
    let mut fashion = archetype("fashionista", 40);
    fashion.tags = vec!["style".into(), "unique".into()];
    let profile = generate_gifting_profile(&[creative, fashion]);
    assert_eq!(profile.interests, vec!["creative", "unique", "style"]);
  }
}
