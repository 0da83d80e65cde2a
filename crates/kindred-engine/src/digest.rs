//! Input digests for change detection on stored enrichments.
//!
//! The digest is a SHA-256 over the canonical JSON encoding of a
//! [`ContactRecord`]. Map-valued fields serialize from ordered maps, so two
//! equal records digest identically regardless of how they were assembled.

use kindred_core::{Result, contact::ContactRecord};
use sha2::{Digest, Sha256};

/// Compute the source digest for a contact record.
///
/// Stable: the same record always digests to the same lowercase-hex string.
pub fn source_digest(contact: &ContactRecord) -> Result<String> {
  let canonical = serde_json::to_vec(contact)?;

  let mut hasher = Sha256::new();
  hasher.update(&canonical);
  let hash = hasher.finalize();
  Ok(hex::encode(hash))
}
