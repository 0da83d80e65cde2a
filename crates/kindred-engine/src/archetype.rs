//! Archetype tagging: keyword rules over a contact's interests and name.
//!
//! Matching is plain substring search over lowercased text, so short keywords
//! deliberately catch word fragments (`gadget` matches "tech gadgets"). Each
//! rule scores independently; archetypes are not mutually exclusive.

use kindred_core::{contact::ContactRecord, enrichment::Archetype};

pub struct ArchetypeRule {
  pub id:          &'static str,
  pub name:        &'static str,
  pub description: &'static str,
  pub keywords:    &'static [&'static str],
  pub tags:        &'static [&'static str],
}

pub const ARCHETYPE_RULES: [ArchetypeRule; 8] = [
  ArchetypeRule {
    id:          "tech_enthusiast",
    name:        "Tech Enthusiast",
    description: "Loves gadgets, technology, and innovation",
    keywords:    &[
      "tech",
      "gadget",
      "coding",
      "programming",
      "computer",
      "software",
      "hardware",
      "gaming",
      "ai",
      "robotics",
    ],
    tags:        &["tech", "innovation", "gadgets"],
  },
  ArchetypeRule {
    id:          "creative_artist",
    name:        "Creative Artist",
    description: "Artistic, creative, appreciates handmade and unique items",
    keywords:    &[
      "art",
      "painting",
      "drawing",
      "music",
      "design",
      "creative",
      "photography",
      "crafts",
      "handmade",
    ],
    tags:        &["creative", "artistic", "unique"],
  },
  ArchetypeRule {
    id:          "outdoor_adventurer",
    name:        "Outdoor Adventurer",
    description: "Enjoys nature, outdoor activities, and adventure",
    keywords:    &[
      "hiking",
      "camping",
      "outdoor",
      "nature",
      "adventure",
      "travel",
      "climbing",
      "skiing",
      "surfing",
    ],
    tags:        &["outdoors", "adventure", "nature"],
  },
  ArchetypeRule {
    id:          "foodie",
    name:        "Foodie",
    description: "Passionate about food, cooking, and culinary experiences",
    keywords:    &[
      "cooking",
      "food",
      "culinary",
      "restaurant",
      "chef",
      "baking",
      "gourmet",
      "wine",
      "coffee",
    ],
    tags:        &["food", "culinary", "dining"],
  },
  ArchetypeRule {
    id:          "bookworm",
    name:        "Bookworm",
    description: "Avid reader, enjoys literature and learning",
    keywords:    &[
      "reading",
      "books",
      "literature",
      "library",
      "novel",
      "writing",
      "author",
      "poetry",
    ],
    tags:        &["books", "reading", "literature"],
  },
  ArchetypeRule {
    id:          "fitness_enthusiast",
    name:        "Fitness Enthusiast",
    description: "Health-conscious, enjoys exercise and wellness",
    keywords:    &[
      "fitness",
      "gym",
      "workout",
      "yoga",
      "running",
      "health",
      "wellness",
      "sports",
      "marathon",
    ],
    tags:        &["fitness", "health", "wellness"],
  },
  ArchetypeRule {
    id:          "eco_warrior",
    name:        "Eco Warrior",
    description: "Environmentally conscious, prefers sustainable products",
    keywords:    &[
      "eco",
      "sustainable",
      "environment",
      "green",
      "organic",
      "recycling",
      "climate",
      "nature",
    ],
    tags:        &["eco", "sustainable", "environment"],
  },
  ArchetypeRule {
    id:          "fashionista",
    name:        "Fashionista",
    description: "Fashion-forward, appreciates style and trends",
    keywords:    &[
      "fashion",
      "style",
      "clothing",
      "designer",
      "trends",
      "beauty",
      "makeup",
      "accessories",
    ],
    tags:        &["fashion", "style", "trends"],
  },
];

/// How many archetypes a contact may carry.
const MAX_ARCHETYPES: usize = 3;
/// Keyword matching alone never justifies more than this.
const CONFIDENCE_CAP: u8 = 80;

/// Match archetype rules against the contact's name and interests. Returns
/// the top three by confidence; ties keep rule-declaration order.
pub fn tag_archetypes(contact: &ContactRecord) -> Vec<Archetype> {
  let text = profile_text(contact);

  let mut archetypes: Vec<Archetype> = ARCHETYPE_RULES
    .iter()
    .filter_map(|rule| {
      let matched =
        rule.keywords.iter().filter(|k| text.contains(**k)).count();
      if matched == 0 {
        return None;
      }
      let ratio = matched as f64 / rule.keywords.len() as f64;
      let confidence = CONFIDENCE_CAP.min((ratio * 100.0).round() as u8);
      Some(Archetype {
        id: rule.id.to_string(),
        name: rule.name.to_string(),
        description: rule.description.to_string(),
        tags: rule.tags.iter().map(|t| t.to_string()).collect(),
        confidence,
      })
    })
    .collect();

  // Stable sort, so equal confidences stay in rule order.
  archetypes.sort_by(|a, b| b.confidence.cmp(&a.confidence));
  archetypes.truncate(MAX_ARCHETYPES);
  archetypes
}

fn profile_text(contact: &ContactRecord) -> String {
  let mut parts: Vec<&str> =
    vec![contact.full_name.as_deref().unwrap_or_default()];
  for (category, terms) in &contact.interests {
    parts.push(category);
    parts.extend(terms.iter().map(String::as_str));
  }
  parts.join(" ").to_lowercase()
}
