//! In-memory rate limiting across four rolling windows.
//!
//! Each user gets a burst window (individual timestamps over the last ten
//! seconds) plus minute, hour and day counters that roll over lazily when a
//! request arrives after their reset time. Counters are process-local and
//! mutex-guarded, so a multi-instance deployment under-enforces the caps.
//! That gap is accepted for now.

use std::{
  collections::HashMap,
  sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const BURST_WINDOW_SECS: i64 = 10;

// ─── Configuration ──────────────────────────────────────────────────────────

/// Caps for the four windows, deserialised from the `[limits]` config table.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
  pub burst_limit:             u64,
  pub max_requests_per_minute: u64,
  pub max_requests_per_hour:   u64,
  pub max_requests_per_day:    u64,
}

impl Default for LimitConfig {
  fn default() -> Self {
    Self {
      burst_limit:             10,
      max_requests_per_minute: 60,
      max_requests_per_hour:   1000,
      max_requests_per_day:    10_000,
    }
  }
}

// ─── Decisions and snapshots ────────────────────────────────────────────────

/// Outcome of consulting the limiter for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
  pub allowed:          bool,
  /// Requests left in the most restrictive window.
  pub remaining:        u64,
  pub reset_at:         DateTime<Utc>,
  /// Whole seconds until a denied caller may retry. `None` when allowed.
  pub retry_after_secs: Option<u64>,
}

/// Usage of a single window, for status reporting.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WindowUsage {
  pub used:     u64,
  pub limit:    u64,
  pub reset_at: DateTime<Utc>,
}

/// Per-window usage for one user. Reading one never consumes capacity.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RateLimitSnapshot {
  pub burst:  WindowUsage,
  pub minute: WindowUsage,
  pub hour:   WindowUsage,
  pub day:    WindowUsage,
}

// ─── Internal bookkeeping ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Window {
  count:    u64,
  reset_at: DateTime<Utc>,
}

impl Window {
  fn fresh(now: DateTime<Utc>, length: Duration) -> Self {
    Self { count: 0, reset_at: now + length }
  }

  /// Lazily restart the window once its reset time has passed.
  fn roll(&mut self, now: DateTime<Utc>, length: Duration) {
    if now > self.reset_at {
      *self = Self::fresh(now, length);
    }
  }
}

#[derive(Debug, Clone)]
struct UserRecord {
  minute: Window,
  hour:   Window,
  day:    Window,
  burst:  Vec<DateTime<Utc>>,
}

impl UserRecord {
  fn new(now: DateTime<Utc>) -> Self {
    Self {
      minute: Window::fresh(now, Duration::minutes(1)),
      hour:   Window::fresh(now, Duration::hours(1)),
      day:    Window::fresh(now, Duration::days(1)),
      burst:  Vec::new(),
    }
  }
}

// ─── Limiter ────────────────────────────────────────────────────────────────

/// Shared limiter, one [`UserRecord`] per user id.
pub struct RateLimiter {
  config:  LimitConfig,
  records: Mutex<HashMap<String, UserRecord>>,
}

impl RateLimiter {
  pub fn new(config: LimitConfig) -> Self {
    Self { config, records: Mutex::new(HashMap::new()) }
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, UserRecord>> {
    self.records.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Consult and consume against the wall clock.
  pub fn check_and_consume(&self, user_id: &str) -> RateLimitDecision {
    self.check_and_consume_at(user_id, Utc::now())
  }

  /// Clock-injected variant driving the window arithmetic in tests.
  pub fn check_and_consume_at(
    &self,
    user_id: &str,
    now: DateTime<Utc>,
  ) -> RateLimitDecision {
    let mut records = self.lock();
    let record = records
      .entry(user_id.to_string())
      .or_insert_with(|| UserRecord::new(now));

    let burst_window = Duration::seconds(BURST_WINDOW_SECS);
    record.burst.retain(|ts| now - *ts < burst_window);

    if record.burst.len() as u64 >= self.config.burst_limit {
      return RateLimitDecision {
        allowed:          false,
        remaining:        0,
        reset_at:         now + burst_window,
        retry_after_secs: Some(BURST_WINDOW_SECS as u64),
      };
    }

    record.minute.roll(now, Duration::minutes(1));
    record.hour.roll(now, Duration::hours(1));
    record.day.roll(now, Duration::days(1));

    // When several windows are exhausted, report the one that frees up first.
    let capped = [
      (record.minute, self.config.max_requests_per_minute),
      (record.hour, self.config.max_requests_per_hour),
      (record.day, self.config.max_requests_per_day),
    ]
    .into_iter()
    .filter(|(window, cap)| window.count >= *cap)
    .min_by_key(|(window, _)| window.reset_at);

    if let Some((window, _)) = capped {
      return RateLimitDecision {
        allowed:          false,
        remaining:        0,
        reset_at:         window.reset_at,
        retry_after_secs: Some(secs_until(now, window.reset_at)),
      };
    }

    record.minute.count += 1;
    record.hour.count += 1;
    record.day.count += 1;
    record.burst.push(now);

    let remaining = [
      self.config.max_requests_per_minute - record.minute.count,
      self.config.max_requests_per_hour - record.hour.count,
      self.config.max_requests_per_day - record.day.count,
      self.config.burst_limit - record.burst.len() as u64,
    ]
    .into_iter()
    .min()
    .unwrap_or(0);

    RateLimitDecision {
      allowed:          true,
      remaining,
      reset_at:         record.minute.reset_at,
      retry_after_secs: None,
    }
  }

  /// Report per-window usage without consuming capacity.
  pub fn snapshot(&self, user_id: &str) -> RateLimitSnapshot {
    self.snapshot_at(user_id, Utc::now())
  }

  pub fn snapshot_at(&self, user_id: &str, now: DateTime<Utc>) -> RateLimitSnapshot {
    let mut records = self.lock();
    let record = records
      .entry(user_id.to_string())
      .or_insert_with(|| UserRecord::new(now));

    let burst_window = Duration::seconds(BURST_WINDOW_SECS);
    record.burst.retain(|ts| now - *ts < burst_window);
    record.minute.roll(now, Duration::minutes(1));
    record.hour.roll(now, Duration::hours(1));
    record.day.roll(now, Duration::days(1));

    RateLimitSnapshot {
      burst:  WindowUsage {
        used:     record.burst.len() as u64,
        limit:    self.config.burst_limit,
        // The burst window frees up when its oldest timestamp ages out.
        reset_at: record
          .burst
          .first()
          .map(|ts| *ts + burst_window)
          .unwrap_or(now),
      },
      minute: WindowUsage {
        used:     record.minute.count,
        limit:    self.config.max_requests_per_minute,
        reset_at: record.minute.reset_at,
      },
      hour:   WindowUsage {
        used:     record.hour.count,
        limit:    self.config.max_requests_per_hour,
        reset_at: record.hour.reset_at,
      },
      day:    WindowUsage {
        used:     record.day.count,
        limit:    self.config.max_requests_per_day,
        reset_at: record.day.reset_at,
      },
    }
  }

  /// Drop a user's counters entirely.
  pub fn reset(&self, user_id: &str) {
    self.lock().remove(user_id);
  }
}

fn secs_until(now: DateTime<Utc>, later: DateTime<Utc>) -> u64 {
  (later - now).num_milliseconds().max(0).div_ceil(1000) as u64
}
