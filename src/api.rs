//! HTTP client for the LearnYourWay backend.
//!
//! Every endpoint answers with the `{code, message, data}` envelope, where
//! `code == 0` means application-level success independent of the HTTP status.
//! Calls are instrumented and log latencies and payload sizes (not contents).
//!
//! The poller and orchestrator depend on the small `ProfilesApi` / `IngestApi`
//! / `MaterialsApi` traits rather than on this struct, so tests can script
//! deterministic in-memory backends.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::config::ClientConfig;
use crate::domain::{ArtifactKind, GenerationRequest, IngestAccepted, IngestTask, LearnerProfile};
use crate::error::{ClientError, Result};

#[allow(async_fn_in_trait)]
pub trait ProfilesApi {
  /// Push the profile to `POST /profiles`. Success is envelope `code == 0`.
  async fn create_profile(&self, profile: &LearnerProfile) -> Result<()>;
}

#[allow(async_fn_in_trait)]
pub trait IngestApi {
  /// Upload a document as the multipart `file` field; returns the accepted
  /// task handle to poll.
  async fn upload_pdf(&self, filename: &str, bytes: Vec<u8>) -> Result<IngestAccepted>;
  /// One status query for a previously accepted task.
  async fn fetch_task(&self, task_id: &str) -> Result<IngestTask>;
}

#[allow(async_fn_in_trait)]
pub trait MaterialsApi {
  /// Submit one generation request; returns the raw `data` payload for the
  /// normalizer to validate.
  async fn generate_material(&self, kind: ArtifactKind, req: &GenerationRequest) -> Result<Value>;
}

#[derive(Clone)]
pub struct ApiClient {
  client: reqwest::Client,
  base_url: String,
}

/// Response envelope every backend endpoint wraps its payload in.
#[derive(Deserialize)]
struct Envelope {
  code: i64,
  #[serde(default)]
  message: String,
  #[serde(default)]
  data: Option<Value>,
}

impl ApiClient {
  pub fn new(cfg: &ClientConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.request_timeout_secs))
      .build()
      .map_err(|e| ClientError::Transport(e.to_string()))?;

    Ok(Self { client, base_url: cfg.base_url.trim_end_matches('/').to_string() })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// POST a JSON body and unwrap the envelope down to `data`.
  async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
    let url = format!("{}{}", self.base_url, path);
    let res = self.client.post(&url)
      .header(USER_AGENT, "learnyourway-client/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(body)
      .send().await?;
    unwrap_envelope(res).await
  }

  async fn get_json(&self, path: &str) -> Result<Value> {
    let url = format!("{}{}", self.base_url, path);
    let res = self.client.get(&url)
      .header(USER_AGENT, "learnyourway-client/0.1")
      .send().await?;
    unwrap_envelope(res).await
  }
}

impl ProfilesApi for ApiClient {
  #[instrument(level = "info", skip(self, profile), fields(user_id = %profile.user_id, interests = profile.interests.len()))]
  async fn create_profile(&self, profile: &LearnerProfile) -> Result<()> {
    let start = std::time::Instant::now();
    self.post_json("/profiles", profile).await?;
    info!(target: "learnyourway", elapsed = ?start.elapsed(), "Profile saved on backend");
    Ok(())
  }
}

impl IngestApi for ApiClient {
  #[instrument(level = "info", skip(self, bytes), fields(%filename, size = bytes.len()))]
  async fn upload_pdf(&self, filename: &str, bytes: Vec<u8>) -> Result<IngestAccepted> {
    let part = reqwest::multipart::Part::bytes(bytes)
      .file_name(filename.to_string())
      .mime_str("application/pdf")?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let url = format!("{}/ingest/pdf", self.base_url);
    let res = self.client.post(&url)
      .header(USER_AGENT, "learnyourway-client/0.1")
      .multipart(form)
      .send().await?;
    let data = unwrap_envelope(res).await?;

    let accepted: IngestAccepted = serde_json::from_value(data).map_err(|e| {
      ClientError::MalformedPayload { kind: "ingest", reason: e.to_string() }
    })?;
    info!(target: "ingest", task_id = %accepted.task_id, "Upload accepted");
    Ok(accepted)
  }

  #[instrument(level = "debug", skip(self), fields(%task_id))]
  async fn fetch_task(&self, task_id: &str) -> Result<IngestTask> {
    let data = self.get_json(&format!("/ingest/tasks/{}", task_id)).await?;
    serde_json::from_value(data).map_err(|e| {
      ClientError::MalformedPayload { kind: "ingest", reason: e.to_string() }
    })
  }
}

impl MaterialsApi for ApiClient {
  #[instrument(level = "info", skip(self, req), fields(%kind, chunk_id = %req.chunk_id, content_len = req.content.len()))]
  async fn generate_material(&self, kind: ArtifactKind, req: &GenerationRequest) -> Result<Value> {
    let start = std::time::Instant::now();
    let data = self.post_json(kind.endpoint(), req).await?;
    info!(target: "materials", %kind, elapsed = ?start.elapsed(), "Generation response received");
    Ok(data)
  }
}

/// Check the HTTP status, then the envelope code, and surface the best
/// available detail on failure: the backend `detail`/`message`, else the
/// HTTP status line, never a silent swallow.
async fn unwrap_envelope(res: reqwest::Response) -> Result<Value> {
  if !res.status().is_success() {
    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    let msg = extract_backend_detail(&body).unwrap_or_else(|| status.to_string());
    return Err(ClientError::GenerationFailed(format!("HTTP {}: {}", status.as_u16(), msg)));
  }

  let envelope: Envelope = res.json().await?;
  if envelope.code != 0 {
    let msg = if envelope.message.is_empty() {
      format!("backend error code {}", envelope.code)
    } else {
      envelope.message
    };
    return Err(ClientError::GenerationFailed(msg));
  }
  envelope.data.ok_or_else(|| ClientError::GenerationFailed("response envelope has no data".into()))
}

/// Try to extract a clean error message from a backend error body.
/// FastAPI-style bodies carry `detail`; envelope-style ones carry `message`.
fn extract_backend_detail(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
  }
  match serde_json::from_str::<EBody>(body) {
    Ok(e) => e.detail.or(e.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn backend_detail_prefers_fastapi_detail() {
    let body = r#"{"detail": "only PDF files are supported", "message": "bad request"}"#;
    assert_eq!(extract_backend_detail(body).as_deref(), Some("only PDF files are supported"));
  }

  #[test]
  fn backend_detail_falls_back_to_message_then_none() {
    assert_eq!(extract_backend_detail(r#"{"message": "boom"}"#).as_deref(), Some("boom"));
    assert_eq!(extract_backend_detail("<html>502</html>"), None);
  }
}
