//! Handler for `POST /api/traits`, the standalone keyword-to-trait mapper.

use axum::{Json, extract::State};
use kindred_core::{enrichment::ExtractedTraits, store::EnrichmentStore};
use kindred_engine::traits::extract_traits;
use serde::Deserialize;

use crate::{AppState, auth::AuthedUser};

/// JSON body for `POST /api/traits`.
#[derive(Debug, Deserialize)]
pub struct TraitsRequest {
  /// Free-form descriptor words, e.g. `["creative", "cozy", "outdoorsy"]`.
  pub words: Vec<String>,
}

/// `POST /api/traits` buckets descriptor words into personality, tone and
/// aesthetic labels.
pub async fn handler<S>(
  State(_state): State<AppState<S>>,
  AuthedUser(_user): AuthedUser,
  Json(body): Json<TraitsRequest>,
) -> Json<ExtractedTraits>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Json(extract_traits(&body.words))
}
