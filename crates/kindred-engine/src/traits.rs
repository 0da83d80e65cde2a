//! Keyword-driven trait extraction from short recipient descriptions.
//!
//! Callers hand over a few free-form words ("describe them in three words")
//! and get back personality, tone, and aesthetic labels for gift matching.
//! A keyword matches anywhere inside a word, so "zen-like" still reads as
//! spiritual.

use kindred_core::enrichment::ExtractedTraits;

const PERSONALITY_KEYWORDS: [(&str, [&str; 6]); 10] = [
  (
    "adventurous",
    ["adventurous", "daring", "bold", "explorer", "wild", "fearless"],
  ),
  (
    "creative",
    [
      "creative",
      "artistic",
      "imaginative",
      "inventive",
      "original",
      "innovative",
    ],
  ),
  (
    "thoughtful",
    [
      "thoughtful",
      "caring",
      "considerate",
      "empathetic",
      "kind",
      "compassionate",
    ],
  ),
  (
    "fun",
    ["fun", "playful", "cheerful", "lively", "energetic", "spirited"],
  ),
  (
    "sophisticated",
    [
      "sophisticated",
      "elegant",
      "refined",
      "classy",
      "polished",
      "cultured",
    ],
  ),
  (
    "practical",
    [
      "practical",
      "pragmatic",
      "sensible",
      "realistic",
      "logical",
      "grounded",
    ],
  ),
  (
    "spiritual",
    ["spiritual", "mindful", "zen", "peaceful", "meditative", "soulful"],
  ),
  (
    "intellectual",
    ["intellectual", "smart", "brilliant", "wise", "scholarly", "cerebral"],
  ),
  (
    "outdoorsy",
    ["outdoorsy", "nature-lover", "athletic", "active", "sporty", "fit"],
  ),
  (
    "tech",
    ["techy", "geeky", "tech-savvy", "digital", "modern", "innovative"],
  ),
];

const TONE_KEYWORDS: [(&str, [&str; 6]); 6] = [
  (
    "playful",
    ["playful", "fun", "silly", "goofy", "cheerful", "lighthearted"],
  ),
  (
    "sophisticated",
    ["sophisticated", "elegant", "refined", "classy", "mature", "polished"],
  ),
  (
    "warm",
    ["warm", "cozy", "caring", "loving", "affectionate", "tender"],
  ),
  (
    "edgy",
    ["edgy", "bold", "daring", "unconventional", "rebellious", "fierce"],
  ),
  (
    "calm",
    ["calm", "peaceful", "serene", "tranquil", "zen", "relaxed"],
  ),
  (
    "vibrant",
    ["vibrant", "colorful", "energetic", "lively", "dynamic", "spirited"],
  ),
];

const AESTHETIC_KEYWORDS: [(&str, [&str; 6]); 6] = [
  (
    "minimalist",
    ["minimalist", "simple", "clean", "modern", "sleek", "understated"],
  ),
  (
    "bohemian",
    ["bohemian", "boho", "eclectic", "artistic", "free-spirited", "hippie"],
  ),
  (
    "luxurious",
    ["luxurious", "fancy", "upscale", "elegant", "premium", "high-end"],
  ),
  (
    "vintage",
    ["vintage", "retro", "classic", "timeless", "old-school", "nostalgic"],
  ),
  (
    "natural",
    ["natural", "organic", "earthy", "rustic", "eco", "green"],
  ),
  (
    "glam",
    ["glam", "glamorous", "sparkly", "chic", "fashionable", "stylish"],
  ),
];

/// Extract traits from descriptor words. Each category falls back to one
/// neutral default (thoughtful / warm / natural) when nothing matches.
pub fn extract_traits(words: &[String]) -> ExtractedTraits {
  let normalized: Vec<String> =
    words.iter().map(|w| w.trim().to_lowercase()).collect();

  ExtractedTraits {
    personality: or_default(
      matching_traits(&normalized, &PERSONALITY_KEYWORDS),
      "thoughtful",
    ),
    tone:        or_default(matching_traits(&normalized, &TONE_KEYWORDS), "warm"),
    aesthetic:   or_default(
      matching_traits(&normalized, &AESTHETIC_KEYWORDS),
      "natural",
    ),
  }
}

fn matching_traits(
  normalized: &[String],
  table: &[(&str, [&str; 6])],
) -> Vec<String> {
  table
    .iter()
    .filter(|(_, keywords)| {
      normalized
        .iter()
        .any(|word| keywords.iter().any(|keyword| word.contains(*keyword)))
    })
    .map(|(name, _)| (*name).to_string())
    .collect()
}

fn or_default(mut traits: Vec<String>, fallback: &str) -> Vec<String> {
  if traits.is_empty() {
    traits.push(fallback.to_string());
  }
  traits
}
