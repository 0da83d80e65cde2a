//! JSON HTTP API for the Kindred enrichment pipeline.
//!
//! Exposes an axum [`Router`] over any
//! [`EnrichmentStore`](kindred_core::store::EnrichmentStore). Every route
//! sits behind HTTP Basic auth, and the authenticated username doubles as
//! the user id that keys consent records, rate-limit counters and stored
//! contacts. Failed requests share one envelope, described in [`error`].

pub mod audit;
pub mod auth;
pub mod consent;
pub mod contacts;
pub mod enrich;
pub mod error;
pub mod import;
pub mod limit;
pub mod stats;
pub mod traits;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use kindred_core::store::EnrichmentStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use audit::AuditLog;
use auth::AuthConfig;
use limit::{LimitConfig, RateLimiter};

// ─── Configuration ──────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  /// SQLite database path.
  pub store_path:         PathBuf,
  /// Directory receiving the JSON-lines audit log, one file per day.
  #[serde(default = "default_log_dir")]
  pub log_dir:            PathBuf,
  pub auth_username:      String,
  /// Argon2 PHC string; generate one with `server --hash-password`.
  pub auth_password_hash: String,
  /// Largest contacts array `POST /api/enrich` accepts.
  #[serde(default = "default_max_batch_size")]
  pub max_batch_size:     usize,
  #[serde(default)]
  pub limits:             LimitConfig,
}

fn default_log_dir() -> PathBuf {
  PathBuf::from("logs/enrichment")
}

fn default_max_batch_size() -> usize {
  100
}

// ─── Application state ──────────────────────────────────────────────────────

/// Shared state threaded through every handler.
#[derive(Clone)]
pub struct AppState<S: EnrichmentStore> {
  pub store:   Arc<S>,
  pub config:  Arc<ServerConfig>,
  pub auth:    Arc<AuthConfig>,
  pub limiter: Arc<RateLimiter>,
  pub audit:   Arc<AuditLog>,
}

// ─── Router ─────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the enrichment API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: EnrichmentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/api/enrich", post(enrich::handler::<S>))
    .route("/api/contacts", get(contacts::list::<S>))
    .route(
      "/api/contacts/{id}/accept-birthday",
      post(contacts::accept_birthday::<S>),
    )
    .route(
      "/api/consent",
      get(consent::read::<S>)
        .put(consent::upsert::<S>)
        .delete(consent::revoke::<S>),
    )
    .route("/api/import/{source}", post(import::handler::<S>))
    .route(
      "/api/limits",
      get(stats::limits::<S>).delete(stats::reset_limits::<S>),
    )
    .route("/api/logs", get(stats::logs::<S>))
    .route("/api/stats", get(stats::overview::<S>))
    .route("/api/traits", post(traits::handler::<S>))
    .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use kindred_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state(
    password: &str,
    log_dir: &std::path::Path,
  ) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store:   Arc::new(store),
      config:  Arc::new(ServerConfig {
        host:               "127.0.0.1".to_string(),
        port:               7878,
        store_path:         PathBuf::from(":memory:"),
        log_dir:            log_dir.to_path_buf(),
        auth_username:      "user".to_string(),
        auth_password_hash: hash.clone(),
        max_batch_size:     100,
        limits:             LimitConfig::default(),
      }),
      auth:    Arc::new(AuthConfig {
        username:      "user".to_string(),
        password_hash: hash,
      }),
      limiter: Arc::new(RateLimiter::new(LimitConfig::default())),
      audit:   Arc::new(AuditLog::new(log_dir)),
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_raw(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, &str)>,
    body: &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn send_json(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    auth: &str,
    body: &Value,
  ) -> axum::response::Response {
    oneshot_raw(
      state,
      method,
      uri,
      vec![
        (header::AUTHORIZATION, auth),
        (header::CONTENT_TYPE, "application/json"),
      ],
      &body.to_string(),
    )
    .await
  }

  async fn get_authed(
    state: AppState<SqliteStore>,
    uri: &str,
    auth: &str,
  ) -> axum::response::Response {
    oneshot_raw(state, "GET", uri, vec![(header::AUTHORIZATION, auth)], "").await
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ─── Auth ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unauthenticated_requests_get_401_with_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;

    let resp = oneshot_raw(state, "GET", "/api/contacts", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
  }

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "wrong");

    let resp = get_authed(state, "/api/contacts", &auth).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ─── Enrichment ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn enrich_single_contact_predicts_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = send_json(
      state.clone(),
      "POST",
      "/api/enrich",
      &auth,
      &json!({
        "contact": {
          "full_name": "April Jones",
          "emails":    ["april.jones@gmail.com"],
        },
      }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    assert_eq!(body["version"], json!("1.0.0"));
    assert_eq!(body["saved"], json!(1));
    assert_eq!(body["stats"]["total"], json!(1));
    assert_eq!(body["stats"]["succeeded"], json!(1));

    let result = &body["results"][0];
    assert_eq!(result["status"], json!("enriched"));
    let contact = &result["contact"];
    assert!(contact["id"].is_string(), "stored id missing: {contact}");
    assert_eq!(contact["predicted_birthday"]["month"], json!(4));
    assert_eq!(contact["inferred_relationship"]["kind"], json!("friend"));

    // The stored copy is listable afterwards.
    let resp = get_authed(state, "/api/contacts", &auth).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = body_json(resp).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["full_name"], json!("April Jones"));
  }

  #[tokio::test]
  async fn enrich_batch_isolates_invalid_items() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = send_json(
      state,
      "POST",
      "/api/enrich",
      &auth,
      &json!({
        "contacts": [
          { "full_name": "April Jones", "emails": ["april@gmail.com"] },
          {},
        ],
      }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    assert_eq!(body["stats"]["total"], json!(2));
    assert_eq!(body["stats"]["succeeded"], json!(1));
    assert_eq!(body["stats"]["skipped"], json!(1));
    assert_eq!(body["saved"], json!(1));
    assert_eq!(body["results"][0]["status"], json!("enriched"));
    assert_eq!(body["results"][1]["status"], json!("failed"));
    assert_eq!(
      body["results"][1]["error"]["code"],
      json!("INSUFFICIENT_DATA"),
    );
  }

  #[tokio::test]
  async fn shared_domain_contact_reads_as_colleague() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = send_json(
      state,
      "POST",
      "/api/enrich",
      &auth,
      &json!({
        "contact": { "full_name": "Jane Doe", "emails": ["jane@acmecorp.com"] },
        "context": { "own_email_domain": "acmecorp.com" },
      }),
    )
    .await;
    let body = body_json(resp).await;

    let contact = &body["results"][0]["contact"];
    assert_eq!(contact["inferred_relationship"]["kind"], json!("colleague"));
    assert_eq!(contact["inferred_relationship"]["confidence"], json!(70));
    let reasoning = contact["inferred_relationship"]["reasoning"]
      .as_str()
      .unwrap();
    assert!(
      reasoning.contains("shared_email_domain (acmecorp.com)"),
      "unexpected reasoning: {reasoning}",
    );
    // "Jane Doe" carries no birthday signal.
    assert!(contact["predicted_birthday"].is_null());
  }

  #[tokio::test]
  async fn empty_contacts_array_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp =
      send_json(state, "POST", "/api/enrich", &auth, &json!({"contacts": []}))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("INVALID_REQUEST"));
  }

  #[tokio::test]
  async fn missing_contact_shapes_are_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = send_json(state, "POST", "/api/enrich", &auth, &json!({})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("INVALID_REQUEST"));
  }

  #[tokio::test]
  async fn oversized_batch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let contacts: Vec<Value> = (0..101)
      .map(|i| json!({"full_name": format!("Contact {i}")}))
      .collect();
    let resp = send_json(
      state,
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contacts": contacts}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("BATCH_TOO_LARGE"));
  }

  // ─── Consent ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn revoked_consent_blocks_enrichment() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = oneshot_raw(
      state.clone(),
      "DELETE",
      "/api/consent",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send_json(
      state,
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contact": {"full_name": "April Jones"}}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("PRIVACY_CONSENT_REQUIRED"));
  }

  #[tokio::test]
  async fn consent_round_trip_applies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    // Nothing stored yet.
    let resp = get_authed(state.clone(), "/api/consent", &auth).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send_json(
      state.clone(),
      "PUT",
      "/api/consent",
      &auth,
      &json!({"consent_given": true}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stored = body_json(resp).await;
    assert_eq!(stored["consent_given"], json!(true));
    assert_eq!(stored["allow_birthday_prediction"], json!(true));
    assert_eq!(stored["allow_external_enrichment"], json!(false));

    let resp = oneshot_raw(
      state.clone(),
      "DELETE",
      "/api/consent",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let revoked = body_json(resp).await;
    assert_eq!(revoked["consent_given"], json!(false));
    // Feature toggles survive revocation.
    assert_eq!(revoked["allow_birthday_prediction"], json!(true));

    let resp = get_authed(state, "/api/consent", &auth).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let read = body_json(resp).await;
    assert_eq!(read["consent_given"], json!(false));
  }

  #[tokio::test]
  async fn feature_optouts_narrow_enrichment() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = send_json(
      state.clone(),
      "PUT",
      "/api/consent",
      &auth,
      &json!({"consent_given": true, "allow_birthday_prediction": false}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send_json(
      state,
      "POST",
      "/api/enrich",
      &auth,
      &json!({
        "contact": {
          "full_name": "April Jones",
          "emails":    ["april@gmail.com"],
        },
      }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    let contact = &body["results"][0]["contact"];
    assert!(
      contact["predicted_birthday"].is_null(),
      "prediction should be withheld: {contact}",
    );
    assert_eq!(contact["inferred_relationship"]["kind"], json!("friend"));
  }

  // ─── Rate limiting ──────────────────────────────────────────────────

  #[tokio::test]
  async fn rate_limited_call_carries_retry_headers() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = make_state("secret", dir.path()).await;
    state.limiter = Arc::new(RateLimiter::new(LimitConfig {
      burst_limit: 1,
      ..LimitConfig::default()
    }));
    let auth = auth_header("user", "secret");

    let first = send_json(
      state.clone(),
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contact": {"full_name": "April Jones"}}),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = send_json(
      state,
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contact": {"full_name": "April Jones"}}),
    )
    .await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key(header::RETRY_AFTER));
    assert!(second.headers().contains_key("x-ratelimit-remaining"));
    assert!(second.headers().contains_key("x-ratelimit-reset"));
    let body = body_json(second).await;
    assert_eq!(body["error"]["code"], json!("RATE_LIMIT_EXCEEDED"));
  }

  // ─── Stored contacts ────────────────────────────────────────────────

  #[tokio::test]
  async fn accept_birthday_promotes_the_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = send_json(
      state.clone(),
      "POST",
      "/api/enrich",
      &auth,
      &json!({
        "contact": {
          "full_name": "April Jones",
          "emails":    ["april@gmail.com"],
        },
      }),
    )
    .await;
    let body = body_json(resp).await;
    let id = body["results"][0]["contact"]["id"]
      .as_str()
      .unwrap()
      .to_string();

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      &format!("/api/contacts/{id}/accept-birthday"),
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let accepted = body_json(resp).await;
    assert_eq!(accepted["birthday"]["month"], json!(4));
    assert!(accepted["predicted_birthday"].is_null());

    // The prediction is gone, so accepting again is a bad request.
    let resp = oneshot_raw(
      state,
      "POST",
      &format!("/api/contacts/{id}/accept-birthday"),
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn accept_birthday_for_unknown_contact_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = oneshot_raw(
      state,
      "POST",
      &format!("/api/contacts/{}/accept-birthday", uuid::Uuid::new_v4()),
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
  }

  #[tokio::test]
  async fn contacts_query_by_id_returns_one() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = send_json(
      state.clone(),
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contact": {"full_name": "April Jones"}}),
    )
    .await;
    let body = body_json(resp).await;
    let id = body["results"][0]["contact"]["id"]
      .as_str()
      .unwrap()
      .to_string();

    let resp =
      get_authed(state.clone(), &format!("/api/contacts?contact_id={id}"), &auth)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let contact = body_json(resp).await;
    assert_eq!(contact["full_name"], json!("April Jones"));

    let resp = get_authed(
      state,
      &format!("/api/contacts?contact_id={}", uuid::Uuid::new_v4()),
      &auth,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ─── Import ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn import_vcf_normalizes_contacts() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let vcf = "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Alice Example\r\nEMAIL:alice@example.com\r\nEND:VCARD\r\n";
    let resp = oneshot_raw(
      state,
      "POST",
      "/api/import/vcard",
      vec![(header::AUTHORIZATION, auth.as_str())],
      vcf,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    assert_eq!(body["source"], json!("vcard"));
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["contacts"][0]["full_name"], json!("Alice Example"));
    assert_eq!(body["contacts"][0]["emails"][0], json!("alice@example.com"));
  }

  #[tokio::test]
  async fn import_with_unknown_source_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = oneshot_raw(
      state,
      "POST",
      "/api/import/orkut",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "whatever",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("IMPORT_ERROR"));
  }

  // ─── Traits ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn traits_endpoint_buckets_descriptor_words() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    let resp = send_json(
      state,
      "POST",
      "/api/traits",
      &auth,
      &json!({"words": ["creative", "cozy"]}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    assert_eq!(body["personality"], json!(["creative"]));
    assert_eq!(body["tone"], json!(["warm"]));
    assert_eq!(body["aesthetic"], json!(["natural"]));
  }

  // ─── Limits and audit ───────────────────────────────────────────────

  #[tokio::test]
  async fn limits_snapshot_reports_usage() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    send_json(
      state.clone(),
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contact": {"full_name": "April Jones"}}),
    )
    .await;

    let resp = get_authed(state, "/api/limits", &auth).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    assert_eq!(body["minute"]["used"], json!(1));
    assert_eq!(body["minute"]["limit"], json!(60));
    assert_eq!(body["burst"]["used"], json!(1));
    assert_eq!(body["day"]["limit"], json!(10000));
  }

  #[tokio::test]
  async fn logs_return_the_callers_entries_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    send_json(
      state.clone(),
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contact": {"full_name": "April Jones"}}),
    )
    .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    send_json(
      state.clone(),
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contacts": [{"full_name": "May Smith"}]}),
    )
    .await;

    let resp = get_authed(state, "/api/logs", &auth).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["operation"], json!("enrich_batch"));
    assert_eq!(body[1]["operation"], json!("enrich_single"));
    assert_eq!(body[0]["metadata"]["saved"], json!(1));
  }

  #[tokio::test]
  async fn stats_aggregate_enrichment_operations() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state("secret", dir.path()).await;
    let auth = auth_header("user", "secret");

    send_json(
      state.clone(),
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contact": {"full_name": "April Jones"}}),
    )
    .await;
    send_json(
      state.clone(),
      "POST",
      "/api/enrich",
      &auth,
      &json!({"contacts": [{"full_name": "May Smith"}]}),
    )
    .await;

    let resp = get_authed(state, "/api/stats", &auth).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    assert_eq!(body["total_operations"], json!(2));
    assert_eq!(body["successful_operations"], json!(2));
    assert_eq!(body["operations_by_type"]["enrich_single"], json!(1));
    assert_eq!(body["operations_by_type"]["enrich_batch"], json!(1));
  }
}
