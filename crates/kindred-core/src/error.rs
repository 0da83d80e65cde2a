//! Error types for `kindred-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("contact has no name and no email address")]
  InsufficientData,

  #[error("birthday month out of range: {0}")]
  InvalidBirthdayMonth(u32),

  #[error("birthday day out of range: {0}")]
  InvalidBirthdayDay(u32),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
