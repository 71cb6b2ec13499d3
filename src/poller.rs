//! Ingestion task polling: drives one backend task from submission to a
//! terminal outcome under a hard attempt ceiling.
//!
//! State machine per the task lifecycle: every poll either stays pending
//! (progress observer fires, fixed-interval sleep), or terminates as
//! `Completed` / `Failed` / `TimedOut`. Transitions are driven only by poll
//! responses and the attempt counter; there is no cancel path — abandonment
//! is the embedder's lifecycle concern.

use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::api::IngestApi;
use crate::config::ClientConfig;
use crate::domain::TaskStatus;
use crate::normalize::{extract_text, UNEXTRACTABLE};

/// Terminal result of polling one task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
  /// Backend reported success; carries the extracted document text (or the
  /// unextractable sentinel when the result had no recognized shape).
  Completed(String),
  /// Backend reported failure, or a single poll request faulted at the
  /// transport level. Transport faults are not retried in place: once a
  /// request fails we cannot tell a blip from a dead task, so we stop.
  Failed(String),
  /// Attempt budget exhausted without a terminal backend status. Client-side
  /// abandonment, distinct from a backend-reported failure.
  TimedOut,
}

#[derive(Clone, Copy, Debug)]
pub struct PollOptions {
  pub max_attempts: u32,
  pub interval: Duration,
}

impl Default for PollOptions {
  fn default() -> Self {
    Self { max_attempts: 30, interval: Duration::from_secs(2) }
  }
}

impl PollOptions {
  pub fn from_config(cfg: &ClientConfig) -> Self {
    Self { max_attempts: cfg.poll_max_attempts.max(1), interval: cfg.poll_interval() }
  }
}

/// Poll `task_id` until a terminal outcome. `on_progress` fires once per
/// non-terminal attempt with the backend's `(stage, progress)` (defaults
/// "processing..." / 50 when omitted mid-flight). Callers must not re-poll a
/// task that already reached a terminal outcome.
#[instrument(level = "info", skip(api, on_progress), fields(%task_id, max_attempts = opts.max_attempts))]
pub async fn poll_task<A: IngestApi>(
  api: &A,
  task_id: &str,
  opts: PollOptions,
  mut on_progress: impl FnMut(&str, u8),
) -> PollOutcome {
  for attempt in 1..=opts.max_attempts {
    let task = match api.fetch_task(task_id).await {
      Ok(t) => t,
      Err(e) => {
        error!(target: "ingest", %task_id, attempt, error = %e, "Poll request failed");
        return PollOutcome::Failed(e.to_string());
      }
    };

    match task.status {
      TaskStatus::Success => {
        let text = match task.result.as_ref() {
          Some(result) => extract_text(result),
          None => UNEXTRACTABLE.to_string(),
        };
        info!(target: "ingest", %task_id, attempt, text_len = text.len(), "Task completed");
        return PollOutcome::Completed(text);
      }
      TaskStatus::Failure => {
        let msg = task.error.unwrap_or_else(|| "document parsing failed".to_string());
        error!(target: "ingest", %task_id, attempt, error = %msg, "Task failed on backend");
        return PollOutcome::Failed(msg);
      }
      _ => {
        let stage = task.stage.as_deref().unwrap_or("processing...");
        let progress = task.progress.unwrap_or(50);
        debug!(target: "ingest", %task_id, attempt, stage, progress, "Task still in progress");
        on_progress(stage, progress);
        if attempt < opts.max_attempts {
          tokio::time::sleep(opts.interval).await;
        }
      }
    }
  }

  warn!(target: "ingest", %task_id, attempts = opts.max_attempts, "Gave up polling: attempt budget exhausted");
  PollOutcome::TimedOut
}
