//! Audit-log entry types.
//!
//! Every enrichment attempt is recorded as one JSON object on its own line in
//! a per-day log file. These are domain records, not process logs; the
//! `tracing` output is a separate concern.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The auditable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
  EnrichSingle,
  EnrichBatch,
  PredictBirthday,
  InferRelationship,
  TagArchetype,
}

impl Operation {
  /// Histogram key; must match the serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::EnrichSingle => "enrich_single",
      Self::EnrichBatch => "enrich_batch",
      Self::PredictBirthday => "predict_birthday",
      Self::InferRelationship => "infer_relationship",
      Self::TagArchetype => "tag_archetype",
    }
  }
}

/// One line of the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
  pub timestamp:       DateTime<Utc>,
  pub user_id:         String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_id:      Option<String>,
  pub operation:       Operation,
  pub success:         bool,
  pub duration_ms:     u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fields_enriched: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata:        Option<serde_json::Value>,
}

/// Aggregates over a sliding N-day window of log files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
  pub total_operations:      u64,
  pub successful_operations: u64,
  pub failed_operations:     u64,
  /// Rounded mean duration across all operations in the window.
  pub average_duration_ms:   u64,
  pub operations_by_type:    BTreeMap<String, u64>,
}
