//! Append-only JSON-lines audit log, one file per UTC day.
//!
//! Appends are best-effort: an enrichment result is never failed because its
//! log line could not be written. Failures surface as `tracing` warnings and
//! nothing else, and unreadable files or unparseable lines read back as
//! empty.

use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use kindred_core::audit::{AuditStats, LogEntry};
use tokio::io::AsyncWriteExt as _;

/// Writer and reader for the audit-log directory.
pub struct AuditLog {
  dir: PathBuf,
}

impl AuditLog {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  fn day_file(&self, date: NaiveDate) -> PathBuf {
    self.dir.join(format!("enrichment-{date}.log"))
  }

  /// Append one entry to the day file its timestamp falls in, creating the
  /// directory on first use.
  pub async fn append(&self, entry: &LogEntry) {
    if let Err(e) = self.try_append(entry).await {
      tracing::warn!("audit log append failed: {e}");
    }
  }

  async fn try_append(&self, entry: &LogEntry) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&self.dir).await?;
    let mut line = serde_json::to_string(entry).map_err(std::io::Error::other)?;
    line.push('\n');
    let mut file = tokio::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(self.day_file(entry.timestamp.date_naive()))
      .await?;
    file.write_all(line.as_bytes()).await
  }

  /// Every entry logged on `date`, in append order.
  pub async fn read_date(&self, date: NaiveDate) -> Vec<LogEntry> {
    let path = self.day_file(date);
    let content = match tokio::fs::read_to_string(&path).await {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
      Err(e) => {
        tracing::warn!("audit log read failed for {}: {e}", path.display());
        return Vec::new();
      }
    };
    content
      .lines()
      .filter_map(|line| serde_json::from_str(line).ok())
      .collect()
  }

  /// One user's entries over the last `days` day files, newest first.
  pub async fn by_user(
    &self,
    user_id: &str,
    days: u32,
    now: DateTime<Utc>,
  ) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    for date in window_dates(days, now) {
      entries.extend(
        self
          .read_date(date)
          .await
          .into_iter()
          .filter(|e| e.user_id == user_id),
      );
    }
    entries.sort_by_key(|e| std::cmp::Reverse(e.timestamp));
    entries
  }

  /// Aggregate counts over the last `days` day files, all users.
  pub async fn stats(&self, days: u32, now: DateTime<Utc>) -> AuditStats {
    let mut entries = Vec::new();
    for date in window_dates(days, now) {
      entries.extend(self.read_date(date).await);
    }

    let mut stats = AuditStats {
      total_operations: entries.len() as u64,
      ..AuditStats::default()
    };
    for entry in &entries {
      if entry.success {
        stats.successful_operations += 1;
      } else {
        stats.failed_operations += 1;
      }
      *stats
        .operations_by_type
        .entry(entry.operation.as_str().to_string())
        .or_insert(0) += 1;
    }
    if !entries.is_empty() {
      let total_ms: u64 = entries.iter().map(|e| e.duration_ms).sum();
      stats.average_duration_ms =
        (total_ms as f64 / entries.len() as f64).round() as u64;
    }
    stats
  }
}

/// Calendar dates covered by the last `days` days, today first.
fn window_dates(days: u32, now: DateTime<Utc>) -> impl Iterator<Item = NaiveDate> {
  (0..days).map(move |i| (now - Duration::days(i64::from(i))).date_naive())
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;
  use kindred_core::audit::Operation;

  use super::*;

  fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
  }

  fn entry(
    user: &str,
    operation: Operation,
    success: bool,
    duration_ms: u64,
    timestamp: DateTime<Utc>,
  ) -> LogEntry {
    LogEntry {
      timestamp,
      user_id: user.to_string(),
      contact_id: None,
      operation,
      success,
      duration_ms,
      fields_enriched: None,
      error: (!success).then(|| "boom".to_string()),
      metadata: None,
    }
  }

  #[tokio::test]
  async fn append_and_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(dir.path());

    let e = entry("alice", Operation::EnrichSingle, true, 12, at(1, 9));
    log.append(&e).await;

    let read = log.read_date(at(1, 9).date_naive()).await;
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].user_id, "alice");
    assert_eq!(read[0].duration_ms, 12);
    assert!(read[0].success);
  }

  #[tokio::test]
  async fn entries_land_in_per_day_files() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(dir.path());

    log
      .append(&entry("alice", Operation::EnrichSingle, true, 5, at(1, 9)))
      .await;
    log
      .append(&entry("alice", Operation::EnrichBatch, true, 7, at(2, 9)))
      .await;

    assert!(dir.path().join("enrichment-2025-06-01.log").exists());
    assert!(dir.path().join("enrichment-2025-06-02.log").exists());
    assert_eq!(log.read_date(at(1, 9).date_naive()).await.len(), 1);
    assert_eq!(log.read_date(at(2, 9).date_naive()).await.len(), 1);
  }

  #[tokio::test]
  async fn read_missing_date_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(dir.path());
    assert!(log.read_date(at(1, 0).date_naive()).await.is_empty());
  }

  #[tokio::test]
  async fn malformed_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(dir.path());

    log
      .append(&entry("alice", Operation::EnrichSingle, true, 5, at(1, 9)))
      .await;
    let path = dir.path().join("enrichment-2025-06-01.log");
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("not json\n");
    std::fs::write(&path, content).unwrap();

    assert_eq!(log.read_date(at(1, 9).date_naive()).await.len(), 1);
  }

  #[tokio::test]
  async fn by_user_filters_and_sorts_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(dir.path());

    log
      .append(&entry("alice", Operation::EnrichSingle, true, 5, at(1, 9)))
      .await;
    log
      .append(&entry("bob", Operation::EnrichSingle, true, 5, at(1, 10)))
      .await;
    log
      .append(&entry("alice", Operation::EnrichBatch, false, 9, at(2, 9)))
      .await;

    let entries = log.by_user("alice", 7, at(2, 12)).await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].timestamp, at(2, 9));
    assert_eq!(entries[1].timestamp, at(1, 9));
  }

  #[tokio::test]
  async fn by_user_window_excludes_older_files() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(dir.path());

    log
      .append(&entry("alice", Operation::EnrichSingle, true, 5, at(1, 9)))
      .await;

    assert!(log.by_user("alice", 7, at(10, 12)).await.is_empty());
    assert_eq!(log.by_user("alice", 10, at(10, 12)).await.len(), 1);
  }

  #[tokio::test]
  async fn stats_aggregate_across_day_files() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(dir.path());

    log
      .append(&entry("alice", Operation::EnrichSingle, true, 100, at(1, 9)))
      .await;
    log
      .append(&entry("alice", Operation::EnrichSingle, true, 200, at(1, 10)))
      .await;
    log
      .append(&entry("bob", Operation::EnrichBatch, false, 60, at(2, 9)))
      .await;

    let stats = log.stats(7, at(2, 12)).await;
    assert_eq!(stats.total_operations, 3);
    assert_eq!(stats.successful_operations, 2);
    assert_eq!(stats.failed_operations, 1);
    assert_eq!(stats.average_duration_ms, 120);
    assert_eq!(stats.operations_by_type.get("enrich_single"), Some(&2));
    assert_eq!(stats.operations_by_type.get("enrich_batch"), Some(&1));
  }

  #[tokio::test]
  async fn append_failure_is_swallowed() {
    // Pointing the log at a file makes every append fail.
    let file = tempfile::NamedTempFile::new().unwrap();
    let log = AuditLog::new(file.path());

    log
      .append(&entry("alice", Operation::EnrichSingle, true, 5, at(1, 9)))
      .await;
    assert!(log.read_date(at(1, 9).date_naive()).await.is_empty());
  }
}
