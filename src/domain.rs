//! Domain models: learner profile, ingestion tasks, generation requests,
//! and the three generated artifact shapes (quiz, mind map, immersive text).
//!
//! Field names follow the backend wire format (snake_case: `user_id`,
//! `task_id`, `chunk_id`, `total_pages`, ...).

use serde::{Deserialize, Serialize};

/// Learner profile persisted locally and pushed to `POST /profiles`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LearnerProfile {
  pub user_id: String,
  pub grade: u8,
  /// Insertion-ordered, unique (exact string match).
  pub interests: Vec<String>,
}

impl Default for LearnerProfile {
  /// The demo profile every fresh session starts with.
  fn default() -> Self {
    Self {
      user_id: "demo_user".into(),
      grade: 5,
      interests: vec!["soccer".into(), "science experiments".into(), "dinosaurs".into()],
    }
  }
}

/// Backend-reported status of an ingestion task.
///
/// The backend emits five labels (`started`/`retry` show up mid-parse); only
/// `success` and `failure` are terminal. Anything unrecognized is treated as
/// still in progress rather than rejected.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum TaskStatus {
  Pending,
  Running,
  Started,
  Retry,
  Success,
  Failure,
  Unknown,
}

impl From<String> for TaskStatus {
  fn from(s: String) -> Self {
    match s.as_str() {
      "pending" => TaskStatus::Pending,
      "running" => TaskStatus::Running,
      "started" => TaskStatus::Started,
      "retry" => TaskStatus::Retry,
      "success" => TaskStatus::Success,
      "failure" => TaskStatus::Failure,
      _ => TaskStatus::Unknown,
    }
  }
}

impl TaskStatus {
  pub fn is_terminal(self) -> bool {
    matches!(self, TaskStatus::Success | TaskStatus::Failure)
  }
}

/// One poll response for an ingestion task (`GET /ingest/tasks/{id}`).
/// `stage`/`progress` may be absent mid-flight; `result` only appears on
/// success and its shape is deliberately left as raw JSON (see `normalize`).
#[derive(Clone, Debug, Deserialize)]
pub struct IngestTask {
  #[serde(default)]
  pub task_id: String,
  pub status: TaskStatus,
  #[serde(default)]
  pub stage: Option<String>,
  #[serde(default)]
  pub progress: Option<u8>,
  #[serde(default)]
  pub result: Option<serde_json::Value>,
  #[serde(default)]
  pub error: Option<String>,
}

/// Acknowledgement for an accepted upload (`POST /ingest/pdf`).
#[derive(Clone, Debug, Deserialize)]
pub struct IngestAccepted {
  pub task_id: String,
  #[serde(default)]
  pub filename: String,
}

/// Which artifact a generation request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
  Quiz,
  MindMap,
  Immersive,
}

impl ArtifactKind {
  /// Endpoint path under the API base.
  pub fn endpoint(self) -> &'static str {
    match self {
      ArtifactKind::Quiz => "/materials/quiz",
      ArtifactKind::MindMap => "/materials/mindmap",
      ArtifactKind::Immersive => "/materials/immersive",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      ArtifactKind::Quiz => "quiz",
      ArtifactKind::MindMap => "mindmap",
      ArtifactKind::Immersive => "immersive",
    }
  }
}

impl std::fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Body for the `/materials/*` endpoints. Ephemeral, never persisted.
/// `chunk_id` is client-generated and unique per request; `count` is only
/// meaningful for quizzes.
#[derive(Clone, Debug, Serialize)]
pub struct GenerationRequest {
  pub chunk_id: String,
  pub profile_id: String,
  pub content: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub count: Option<u32>,
}

// --- Quiz ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Quiz {
  pub questions: Vec<Question>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
  Single,
  Multi,
  Tf,
  Short,
}

/// The answer field varies by question type: an option text, a list of
/// option texts, or a plain boolean for true/false items.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Answer {
  Bool(bool),
  Text(String),
  Many(Vec<String>),
}

impl Default for Answer {
  fn default() -> Self {
    Answer::Text(String::new())
  }
}

impl std::fmt::Display for Answer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Answer::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
      Answer::Text(s) => f.write_str(s),
      Answer::Many(xs) => f.write_str(&xs.join(", ")),
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Question {
  #[serde(rename = "type")]
  pub question_type: QuestionType,
  pub stem: String,
  #[serde(default)]
  pub options: Option<Vec<String>>,
  #[serde(default)]
  pub answer: Answer,
  #[serde(default)]
  pub explanation: String,
  #[serde(default = "default_difficulty")]
  pub difficulty: u8,
}

fn default_difficulty() -> u8 {
  3
}

// --- Mind map ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MindMap {
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum NodeKind {
  Root,
  Concept,
  Detail,
  Other,
}

impl From<String> for NodeKind {
  fn from(s: String) -> Self {
    match s.as_str() {
      "root" => NodeKind::Root,
      "concept" => NodeKind::Concept,
      "detail" => NodeKind::Detail,
      _ => NodeKind::Other,
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Node {
  pub id: String,
  pub label: String,
  #[serde(rename = "type", default = "default_node_kind")]
  pub kind: NodeKind,
}

fn default_node_kind() -> NodeKind {
  NodeKind::Concept
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Edge {
  pub source: String,
  pub target: String,
  #[serde(default)]
  pub label: String,
}

// --- Immersive text ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImmersiveText {
  pub sections: Vec<Section>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Section {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub paragraphs: Vec<String>,
}

/// A normalized artifact, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Artifact {
  Quiz(Quiz),
  MindMap(MindMap),
  Immersive(ImmersiveText),
}

impl Artifact {
  pub fn kind(&self) -> ArtifactKind {
    match self {
      Artifact::Quiz(_) => ArtifactKind::Quiz,
      Artifact::MindMap(_) => ArtifactKind::MindMap,
      Artifact::Immersive(_) => ArtifactKind::Immersive,
    }
  }
}

/// The most recently generated artifacts for this session. Each field is
/// replaced wholesale when its generation completes; never merged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionResults {
  pub quiz: Option<Quiz>,
  pub mindmap: Option<MindMap>,
  pub immersive: Option<ImmersiveText>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn task_status_tolerates_unknown_labels() {
    let task: IngestTask = serde_json::from_value(json!({
      "task_id": "t1",
      "status": "vectorizing"
    }))
    .unwrap();
    assert_eq!(task.status, TaskStatus::Unknown);
    assert!(!task.status.is_terminal());
    assert!(TaskStatus::Success.is_terminal());
    assert!(TaskStatus::Failure.is_terminal());
  }

  #[test]
  fn generation_request_omits_count_when_absent() {
    let req = GenerationRequest {
      chunk_id: "web_1".into(),
      profile_id: "demo_user".into(),
      content: "text".into(),
      count: None,
    };
    let wire = serde_json::to_value(&req).unwrap();
    assert!(wire.get("count").is_none());
    assert_eq!(wire["chunk_id"], "web_1");
  }

  #[test]
  fn node_kind_rides_the_type_field() {
    let node: Node = serde_json::from_value(json!({
      "id": "n1", "label": "Roots", "type": "root"
    }))
    .unwrap();
    assert_eq!(node.kind, NodeKind::Root);

    let node: Node = serde_json::from_value(json!({
      "id": "n2", "label": "Weird", "type": "hexagon"
    }))
    .unwrap();
    assert_eq!(node.kind, NodeKind::Other);
  }
}
