//! Status endpoints: rate-limit usage and audit-log queries.
//!
//! | Method   | Path          | Notes                                     |
//! |----------|---------------|-------------------------------------------|
//! | `GET`    | `/api/limits` | Per-window usage, no capacity consumed    |
//! | `DELETE` | `/api/limits` | Drop the caller's counters                |
//! | `GET`    | `/api/logs`   | The caller's audit entries, newest first  |
//! | `GET`    | `/api/stats`  | Aggregates over a sliding window of days  |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
};
use chrono::Utc;
use kindred_core::{
  audit::{AuditStats, LogEntry},
  store::EnrichmentStore,
};
use serde::Deserialize;

use crate::{AppState, auth::AuthedUser, limit::RateLimitSnapshot};

#[derive(Debug, Deserialize)]
pub struct WindowParams {
  /// How many day files to fold in, defaulting to a week.
  pub days: Option<u32>,
}

/// `GET /api/limits`
pub async fn limits<S>(
  State(state): State<AppState<S>>,
  AuthedUser(user_id): AuthedUser,
) -> Json<RateLimitSnapshot>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Json(state.limiter.snapshot(&user_id))
}

/// `DELETE /api/limits`
pub async fn reset_limits<S>(
  State(state): State<AppState<S>>,
  AuthedUser(user_id): AuthedUser,
) -> StatusCode
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state.limiter.reset(&user_id);
  StatusCode::NO_CONTENT
}

/// `GET /api/logs[?days=…]`
pub async fn logs<S>(
  State(state): State<AppState<S>>,
  AuthedUser(user_id): AuthedUser,
  Query(params): Query<WindowParams>,
) -> Json<Vec<LogEntry>>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Json(
    state
      .audit
      .by_user(&user_id, params.days.unwrap_or(7), Utc::now())
      .await,
  )
}

/// `GET /api/stats[?days=…]`
pub async fn overview<S>(
  State(state): State<AppState<S>>,
  AuthedUser(_user): AuthedUser,
  Query(params): Query<WindowParams>,
) -> Json<AuditStats>
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Json(state.audit.stats(params.days.unwrap_or(7), Utc::now()).await)
}
