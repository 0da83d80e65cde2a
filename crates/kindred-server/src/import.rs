//! Handler for `POST /api/import/{source}`.
//!
//! The raw request body is one third-party export: Google People JSON, a
//! `.vcf` file, a LinkedIn CSV or a Facebook JSON export. The response
//! carries the normalized records only; enriching them is a separate
//! `/api/enrich` call.

use axum::{
  Json,
  extract::{Path, State},
};
use bytes::Bytes;
use kindred_core::{contact::ContactRecord, store::EnrichmentStore};
use kindred_import::ImportSource;
use serde::Serialize;

use crate::{AppState, auth::AuthedUser, error::ApiError};

#[derive(Debug, Serialize)]
pub struct ImportResponse {
  pub source:   ImportSource,
  pub count:    usize,
  pub contacts: Vec<ContactRecord>,
}

/// `POST /api/import/{source}` where source is one of `google`, `vcard`,
/// `linkedin` or `facebook`.
pub async fn handler<S>(
  State(_state): State<AppState<S>>,
  AuthedUser(_user): AuthedUser,
  Path(source): Path<String>,
  body: Bytes,
) -> Result<Json<ImportResponse>, ApiError>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let source: ImportSource = source.parse()?;
  let contacts = kindred_import::parse_contacts(source, &body)?;
  Ok(Json(ImportResponse {
    source,
    count: contacts.len(),
    contacts,
  }))
}
