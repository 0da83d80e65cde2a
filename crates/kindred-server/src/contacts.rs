//! Handlers for stored enriched contacts.
//!
//! | Method | Path                                 | Notes                                  |
//! |--------|--------------------------------------|----------------------------------------|
//! | `GET`  | `/api/contacts`                      | `?contact_id=` for one, else paginated |
//! | `POST` | `/api/contacts/{id}/accept-birthday` | Promote a prediction                   |

use axum::{
  Json,
  extract::{Path, Query, State},
  response::{IntoResponse, Response},
};
use kindred_core::{enrichment::EnrichedContact, store::EnrichmentStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::AuthedUser, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// When set, return exactly this contact (404 if absent).
  pub contact_id: Option<Uuid>,
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

/// `GET /api/contacts[?contact_id=…][&limit=…][&offset=…]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  AuthedUser(user_id): AuthedUser,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Some(contact_id) = params.contact_id {
    let contact = state
      .store
      .get_enriched(&user_id, contact_id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .ok_or_else(|| ApiError::NotFound(format!("contact {contact_id} not found")))?;
    return Ok(Json(contact).into_response());
  }

  let contacts = state
    .store
    .list_enriched(
      &user_id,
      params.limit.unwrap_or(50),
      params.offset.unwrap_or(0),
    )
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(contacts).into_response())
}

/// `POST /api/contacts/{id}/accept-birthday` copies the predicted month and
/// day into the contact's own birthday and clears the prediction.
pub async fn accept_birthday<S>(
  State(state): State<AppState<S>>,
  AuthedUser(user_id): AuthedUser,
  Path(contact_id): Path<Uuid>,
) -> Result<Json<EnrichedContact>, ApiError>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let current = state
    .store
    .get_enriched(&user_id, contact_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("contact {contact_id} not found")))?;

  if current.predicted_birthday.is_none() {
    return Err(ApiError::InvalidRequest(format!(
      "contact {contact_id} has no predicted birthday"
    )));
  }

  let accepted = state
    .store
    .accept_birthday(&user_id, contact_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(accepted))
}
