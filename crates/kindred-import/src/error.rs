use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown import source `{0}`")]
  UnknownSource(String),

  #[error("import body is not valid UTF-8")]
  NotUtf8(#[from] std::str::Utf8Error),

  #[error("import body is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
