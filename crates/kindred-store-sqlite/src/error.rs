//! Error type for `kindred-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored string did not decode to a known domain value.
  #[error("decode error: {0}")]
  Decode(String),

  /// Lookup or lifecycle call against a contact the user does not have.
  #[error("contact not found: {0}")]
  ContactNotFound(uuid::Uuid),

  /// Accept called on a contact with no stored prediction.
  #[error("contact {0} has no predicted birthday")]
  NoPredictedBirthday(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
