//! End-to-end tests for `ApiClient` against an in-process fake backend that
//! speaks the `{code, message, data}` envelope convention.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use learnyourway::api::{ApiClient, IngestApi, MaterialsApi, ProfilesApi};
use learnyourway::config::ClientConfig;
use learnyourway::domain::{ArtifactKind, GenerationRequest, LearnerProfile, TaskStatus};
use learnyourway::error::ClientError;
use learnyourway::normalize::normalize_quiz;
use learnyourway::poller::{poll_task, PollOptions, PollOutcome};

/// How many status polls each task answers with "running" before succeeding.
const RUNNING_POLLS: u32 = 2;

#[derive(Default)]
struct Backend {
    polls: AtomicU32,
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({ "code": 0, "message": "success", "data": data }))
}

fn router(state: Arc<Backend>) -> Router {
    Router::new()
        .route("/profiles", post(create_profile))
        .route("/ingest/pdf", post(upload_pdf))
        .route("/ingest/tasks/:task_id", get(task_status))
        .route("/materials/quiz", post(materials_quiz))
        .route("/materials/mindmap", post(materials_mindmap))
        .route("/materials/immersive", post(materials_immersive))
        .with_state(state)
}

async fn create_profile(Json(profile): Json<Value>) -> Json<Value> {
    envelope(json!({
        "user_id": profile["user_id"],
        "grade": profile["grade"],
        "interests": profile["interests"],
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    }))
}

async fn upload_pdf() -> Json<Value> {
    envelope(json!({ "task_id": "task-1", "filename": "demo.pdf", "status": "pending" }))
}

async fn task_status(State(state): State<Arc<Backend>>, Path(task_id): Path<String>) -> Json<Value> {
    let n = state.polls.fetch_add(1, Ordering::SeqCst);
    if n < RUNNING_POLLS {
        envelope(json!({
            "task_id": task_id,
            "status": "started",
            "stage": "parsing pages",
            "progress": 30 * (n + 1),
        }))
    } else {
        envelope(json!({
            "task_id": task_id,
            "status": "success",
            "stage": "done",
            "progress": 100,
            "result": { "chunks": [{ "text": "Chapter one." }, "Chapter two."] }
        }))
    }
}

async fn materials_quiz(Json(req): Json<Value>) -> Json<Value> {
    assert!(req["chunk_id"].as_str().unwrap().starts_with("web_"));
    assert_eq!(req["count"], json!(5));
    envelope(json!({
        "questions": [{
            "type": "tf",
            "stem": "Grass is green.",
            "answer": true,
            "explanation": "Chlorophyll.",
            "difficulty": 1
        }]
    }))
}

async fn materials_mindmap() -> Json<Value> {
    Json(json!({ "code": 1, "message": "mindmap generation unavailable", "data": null }))
}

async fn materials_immersive() -> impl IntoResponse {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": "content too long" })))
}

#[tokio::test]
async fn full_ingest_flow_uploads_polls_and_extracts() {
    let (client, backend) = start().await;

    let accepted = client.upload_pdf("demo.pdf", b"%PDF-1.4 fake".to_vec()).await.unwrap();
    assert_eq!(accepted.task_id, "task-1");

    let opts = PollOptions { max_attempts: 10, interval: std::time::Duration::ZERO };
    let mut stages = Vec::new();
    let outcome = poll_task(&client, &accepted.task_id, opts, |stage, p| {
        stages.push((stage.to_string(), p));
    })
    .await;

    assert_eq!(outcome, PollOutcome::Completed("Chapter one.\n\nChapter two.".into()));
    assert_eq!(backend.polls.load(Ordering::SeqCst), RUNNING_POLLS + 1);
    assert_eq!(stages, vec![("parsing pages".to_string(), 30), ("parsing pages".to_string(), 60)]);
}

#[tokio::test]
async fn fetch_task_parses_backend_statuses() {
    let (client, _backend) = start().await;
    let task = client.fetch_task("task-1").await.unwrap();
    assert_eq!(task.status, TaskStatus::Started);
    assert_eq!(task.progress, Some(30));
}

#[tokio::test]
async fn create_profile_round_trips_through_envelope() {
    let (client, _backend) = start().await;
    let profile = LearnerProfile {
        user_id: "demo_user".into(),
        grade: 5,
        interests: vec!["soccer".into()],
    };
    client.create_profile(&profile).await.unwrap();
}

#[tokio::test]
async fn quiz_generation_yields_normalizable_payload() {
    let (client, _backend) = start().await;
    let req = GenerationRequest {
        chunk_id: "web_test-1".into(),
        profile_id: "demo_user".into(),
        content: "grass and chlorophyll".into(),
        count: Some(5),
    };

    let payload = client.generate_material(ArtifactKind::Quiz, &req).await.unwrap();
    let quiz = normalize_quiz(payload).unwrap();
    assert_eq!(quiz.questions.len(), 1);
}

#[tokio::test]
async fn nonzero_envelope_code_surfaces_backend_message() {
    let (client, _backend) = start().await;
    let req = GenerationRequest {
        chunk_id: "web_test-2".into(),
        profile_id: "demo_user".into(),
        content: "anything".into(),
        count: None,
    };

    let err = client.generate_material(ArtifactKind::MindMap, &req).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::GenerationFailed(msg) if msg.contains("mindmap generation unavailable")
    ));
}

#[tokio::test]
async fn http_error_status_surfaces_detail_field() {
    let (client, _backend) = start().await;
    let req = GenerationRequest {
        chunk_id: "web_test-3".into(),
        profile_id: "demo_user".into(),
        content: "anything".into(),
        count: None,
    };

    let err = client.generate_material(ArtifactKind::Immersive, &req).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::GenerationFailed(msg) if msg.contains("422") && msg.contains("content too long")
    ));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Port 9 (discard) with nothing listening.
    let cfg = ClientConfig { base_url: "http://127.0.0.1:9".into(), ..Default::default() };
    let client = ApiClient::new(&cfg).unwrap();

    let err = client.fetch_task("task-1").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

/// Bind the fake backend on an ephemeral port and build a client against it.
async fn start() -> (ApiClient, Arc<Backend>) {
    let state = Arc::new(Backend::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let cfg = ClientConfig { base_url: format!("http://{}", addr), ..Default::default() };
    (ApiClient::new(&cfg).unwrap(), state)
}
