//! The `EnrichmentStore` trait.
//!
//! Implemented by storage backends (e.g. `kindred-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  consent::{NewConsent, PrivacyConsent},
  enrichment::EnrichedContact,
};

/// Abstraction over the consent + enriched-contact store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`).
pub trait EnrichmentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Consent ───────────────────────────────────────────────────────────

  /// Fetch a user's consent record. `None` when the user never recorded one.
  fn get_consent<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<PrivacyConsent>, Self::Error>> + Send + 'a;

  /// Idempotent upsert keyed by user id. Absent toggles take their defaults
  /// (birthday/relationship/archetype on, external off) on first write;
  /// on update, absent toggles keep their stored values.
  fn put_consent<'a>(
    &'a self,
    user_id: &'a str,
    input: NewConsent,
  ) -> impl Future<Output = Result<PrivacyConsent, Self::Error>> + Send + 'a;

  /// Withdraw umbrella consent, stamping a fresh consent date. Stored
  /// per-feature toggles are preserved but become irrelevant until consent
  /// is granted again.
  fn revoke_consent<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<PrivacyConsent, Self::Error>> + Send + 'a;

  // ── Enriched contacts ─────────────────────────────────────────────────

  /// Upsert an enriched contact for a user. Keyed by the contact's id when
  /// it has one, otherwise by `(user_id, full_name)`. Returns the stored
  /// contact with its assigned id.
  fn save_enriched<'a>(
    &'a self,
    user_id: &'a str,
    contact: &'a EnrichedContact,
  ) -> impl Future<Output = Result<EnrichedContact, Self::Error>> + Send + 'a;

  /// Fetch one stored enriched contact. `None` when absent or owned by a
  /// different user.
  fn get_enriched<'a>(
    &'a self,
    user_id: &'a str,
    contact_id: Uuid,
  ) -> impl Future<Output = Result<Option<EnrichedContact>, Self::Error>> + Send + 'a;

  /// List a user's enriched contacts, most recently updated first.
  fn list_enriched<'a>(
    &'a self,
    user_id: &'a str,
    limit: usize,
    offset: usize,
  ) -> impl Future<Output = Result<Vec<EnrichedContact>, Self::Error>> + Send + 'a;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Accept a predicted birthday: promote the predicted month/day into the
  /// contact's own birthday with confidence 100 and clear the prediction.
  /// Errors if the contact does not exist or carries no prediction.
  fn accept_birthday<'a>(
    &'a self,
    user_id: &'a str,
    contact_id: Uuid,
  ) -> impl Future<Output = Result<EnrichedContact, Self::Error>> + Send + 'a;
}
