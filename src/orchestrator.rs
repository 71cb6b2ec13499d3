//! Generation orchestration: single and fan-out material generation, profile
//! saving, and the upload-then-poll ingestion flow.
//!
//! `generate_all` is all-or-nothing: the three requests run concurrently, the
//! orchestrator waits until all have settled, and the session is only updated
//! when every one of them normalized cleanly. A failure therefore leaves the
//! previous artifacts in place rather than a half-updated set.

use tracing::{error, info, instrument};

use crate::api::{IngestApi, MaterialsApi, ProfilesApi};
use crate::domain::{Artifact, ArtifactKind, GenerationRequest, LearnerProfile};
use crate::error::{ClientError, Result};
use crate::normalize::{normalize_immersive, normalize_mindmap, normalize_quiz};
use crate::poller::{poll_task, PollOptions, PollOutcome};
use crate::session::SessionState;
use crate::store::ProfileStore;

/// Source of client-generated chunk identifiers. Injected so the orchestrator
/// stays deterministic under test; production ids are random, not
/// wall-clock-derived, to stay unique across rapid fan-out.
pub trait ChunkIds {
  fn next_chunk_id(&self) -> String;
}

/// Default id source: `web_<uuid-v4>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidChunkIds;

impl ChunkIds for UuidChunkIds {
  fn next_chunk_id(&self) -> String {
    format!("web_{}", uuid::Uuid::new_v4())
  }
}

fn build_request(
  ids: &impl ChunkIds,
  profile: &LearnerProfile,
  kind: ArtifactKind,
  content: &str,
  quiz_count: u32,
) -> GenerationRequest {
  GenerationRequest {
    chunk_id: ids.next_chunk_id(),
    profile_id: profile.user_id.clone(),
    content: content.to_string(),
    count: (kind == ArtifactKind::Quiz).then_some(quiz_count),
  }
}

fn normalize_artifact(kind: ArtifactKind, payload: serde_json::Value) -> Result<Artifact> {
  match kind {
    ArtifactKind::Quiz => normalize_quiz(payload).map(Artifact::Quiz),
    ArtifactKind::MindMap => normalize_mindmap(payload).map(Artifact::MindMap),
    ArtifactKind::Immersive => normalize_immersive(payload).map(Artifact::Immersive),
  }
}

/// Generate one artifact and store it in the session. Blank content fails
/// with `EmptyContent` before any request is made.
#[instrument(level = "info", skip(api, ids, session, content), fields(%kind, content_len = content.len()))]
pub async fn generate_one<A: MaterialsApi>(
  api: &A,
  ids: &impl ChunkIds,
  session: &mut SessionState,
  kind: ArtifactKind,
  content: &str,
  quiz_count: u32,
) -> Result<Artifact> {
  let content = content.trim();
  if content.is_empty() {
    return Err(ClientError::EmptyContent);
  }

  let req = build_request(ids, &session.profile, kind, content, quiz_count);
  let payload = api.generate_material(kind, &req).await?;
  let artifact = normalize_artifact(kind, payload)?;

  session.set_artifact(artifact.clone());
  info!(target: "materials", %kind, chunk_id = %req.chunk_id, "Artifact generated");
  Ok(artifact)
}

/// Generate all three artifacts concurrently. Each request carries its own
/// chunk id; the three are fully independent. Normalization begins only after
/// all three have settled, and `SessionResults` is updated as one unit.
#[instrument(level = "info", skip(api, ids, session, content), fields(content_len = content.len()))]
pub async fn generate_all<A: MaterialsApi>(
  api: &A,
  ids: &impl ChunkIds,
  session: &mut SessionState,
  content: &str,
  quiz_count: u32,
) -> Result<()> {
  let content = content.trim();
  if content.is_empty() {
    return Err(ClientError::EmptyContent);
  }

  let quiz_req = build_request(ids, &session.profile, ArtifactKind::Quiz, content, quiz_count);
  let map_req = build_request(ids, &session.profile, ArtifactKind::MindMap, content, quiz_count);
  let text_req = build_request(ids, &session.profile, ArtifactKind::Immersive, content, quiz_count);

  let (quiz_res, map_res, text_res) = tokio::join!(
    api.generate_material(ArtifactKind::Quiz, &quiz_req),
    api.generate_material(ArtifactKind::MindMap, &map_req),
    api.generate_material(ArtifactKind::Immersive, &text_req),
  );

  // All settled. Abort on the first failure; the session stays untouched
  // even when the other two succeeded at the transport level.
  let result: Result<_> = (|| {
    let quiz = normalize_quiz(quiz_res?)?;
    let map = normalize_mindmap(map_res?)?;
    let text = normalize_immersive(text_res?)?;
    Ok((quiz, map, text))
  })();

  match result {
    Ok((quiz, map, text)) => {
      session.set_quiz(quiz);
      session.set_mindmap(map);
      session.set_immersive(text);
      info!(target: "materials", "All three artifacts generated");
      Ok(())
    }
    Err(e) => {
      error!(target: "materials", error = %e, "Fan-out generation failed; session left unchanged");
      Err(e)
    }
  }
}

/// Save the profile: backend first, then the local store, so a backend
/// rejection never leaves a stale local copy. Requires at least one interest.
#[instrument(level = "info", skip(api, store, profile), fields(user_id = %profile.user_id))]
pub async fn save_profile<A: ProfilesApi>(
  api: &A,
  store: &ProfileStore,
  profile: &LearnerProfile,
) -> Result<()> {
  if profile.interests.is_empty() {
    return Err(ClientError::EmptyInterests);
  }
  api.create_profile(profile).await?;
  store.save(profile)
}

/// Upload a document and drive its parsing task to a terminal outcome.
/// Upload rejection is an error; once the task is accepted, the poll outcome
/// (including timeout) is reported as a value.
#[instrument(level = "info", skip(api, bytes, on_progress), fields(%filename, size = bytes.len()))]
pub async fn ingest_document<A: IngestApi>(
  api: &A,
  opts: PollOptions,
  filename: &str,
  bytes: Vec<u8>,
  on_progress: impl FnMut(&str, u8),
) -> Result<PollOutcome> {
  let accepted = api.upload_pdf(filename, bytes).await?;
  Ok(poll_task(api, &accepted.task_id, opts, on_progress).await)
}
