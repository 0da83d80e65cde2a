//! Handlers for `/api/consent`.
//!
//! | Method   | Path           | Notes                                        |
//! |----------|----------------|----------------------------------------------|
//! | `GET`    | `/api/consent` | 404 until a record is written                |
//! | `PUT`    | `/api/consent` | Upsert; absent toggles keep their defaults   |
//! | `DELETE` | `/api/consent` | Withdraw the umbrella consent                |

use axum::{Json, extract::State};
use kindred_core::{
  consent::{NewConsent, PrivacyConsent},
  store::EnrichmentStore,
};

use crate::{AppState, auth::AuthedUser, error::ApiError};

/// `GET /api/consent`
pub async fn read<S>(
  State(state): State<AppState<S>>,
  AuthedUser(user_id): AuthedUser,
) -> Result<Json<PrivacyConsent>, ApiError>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = state
    .store
    .get_consent(&user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("no consent record for {user_id}")))?;
  Ok(Json(record))
}

/// `PUT /api/consent` with a [`NewConsent`] body. On first write absent
/// toggles take their defaults; afterwards they keep their stored values.
pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  AuthedUser(user_id): AuthedUser,
  Json(body): Json<NewConsent>,
) -> Result<Json<PrivacyConsent>, ApiError>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = state
    .store
    .put_consent(&user_id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(record))
}

/// `DELETE /api/consent`
pub async fn revoke<S>(
  State(state): State<AppState<S>>,
  AuthedUser(user_id): AuthedUser,
) -> Result<Json<PrivacyConsent>, ApiError>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = state
    .store
    .revoke_consent(&user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(record))
}
