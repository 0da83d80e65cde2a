//! API error type and the JSON error envelope.
//!
//! Every failed request gets the same body shape,
//! `{"success": false, "error": {"code": "…", "message": "…"}}`, where
//! `code` is a stable machine-readable string and `message` is for humans.
//! Rate-limit rejections additionally carry `Retry-After`,
//! `X-RateLimit-Remaining` and `X-RateLimit-Reset` headers.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

/// An error produced while handling an API request.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("authentication required")]
  Unauthorized,

  #[error("rate limit exceeded, try again in {retry_after_secs} seconds")]
  RateLimited {
    retry_after_secs: u64,
    remaining:        u64,
    reset_at:         DateTime<Utc>,
  },

  #[error("privacy consent required for contact enrichment")]
  ConsentRequired,

  #[error("{0}")]
  InvalidRequest(String),

  #[error("maximum batch size is {0} contacts")]
  BatchTooLarge(usize),

  #[error("{0}")]
  NotFound(String),

  #[error("import error: {0}")]
  Import(#[from] kindred_import::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  fn status_and_code(&self) -> (StatusCode, &'static str) {
    match self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
      ApiError::RateLimited { .. } => {
        (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
      }
      ApiError::ConsentRequired => {
        (StatusCode::FORBIDDEN, "PRIVACY_CONSENT_REQUIRED")
      }
      ApiError::InvalidRequest(_) => {
        (StatusCode::BAD_REQUEST, "INVALID_REQUEST")
      }
      ApiError::BatchTooLarge(_) => (StatusCode::BAD_REQUEST, "BATCH_TOO_LARGE"),
      ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
      ApiError::Import(_) => (StatusCode::BAD_REQUEST, "IMPORT_ERROR"),
      ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, code) = self.status_and_code();
    let body = Json(json!({
      "success": false,
      "error":   { "code": code, "message": self.to_string() },
    }));
    let mut res = (status, body).into_response();

    match &self {
      ApiError::Unauthorized => {
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"kindred\""),
        );
      }
      ApiError::RateLimited {
        retry_after_secs,
        remaining,
        reset_at,
      } => {
        let headers = res.headers_mut();
        if let Ok(v) = HeaderValue::from_str(&retry_after_secs.to_string()) {
          headers.insert(header::RETRY_AFTER, v);
        }
        if let Ok(v) = HeaderValue::from_str(&remaining.to_string()) {
          headers.insert("x-ratelimit-remaining", v);
        }
        if let Ok(v) = HeaderValue::from_str(&reset_at.to_rfc3339()) {
          headers.insert("x-ratelimit-reset", v);
        }
      }
      _ => {}
    }

    res
  }
}
