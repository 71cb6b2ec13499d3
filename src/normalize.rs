//! Result normalization: the parse/don't-trust boundary between the backend's
//! loosely-typed payloads and the typed artifacts the rest of the client uses.
//!
//! `extract_text` is total and never fails; the three `normalize_*` functions
//! validate only the required top-level sequence and parse element fields
//! leniently (serde defaults), since per-field content is the backend's
//! responsibility.

use serde_json::Value;
use tracing::warn;

use crate::domain::{ImmersiveText, MindMap, Quiz};
use crate::error::{ClientError, Result};

/// Sentinel returned when no recognized text shape matched. Informational,
/// not an error: callers show it to the user and let them type content by hand.
pub const UNEXTRACTABLE: &str =
  "Document uploaded, but no text could be extracted. Please enter the study content manually.";

/// Pull a single text blob out of whatever an ingestion task reported as its
/// result. Accepts three shapes: a `chunks` array (strings or `{text}`
/// objects), a `{filename, total_pages}` metadata object, or a raw string.
/// Anything else degrades to the `UNEXTRACTABLE` sentinel.
pub fn extract_text(result: &Value) -> String {
  if let Some(chunks) = result.get("chunks").and_then(Value::as_array) {
    return chunks
      .iter()
      .map(|chunk| match chunk.get("text").and_then(Value::as_str) {
        Some(t) => t.to_string(),
        None => match chunk.as_str() {
          Some(s) => s.to_string(),
          // Unexpected chunk shape: keep its JSON text rather than drop it.
          None => chunk.to_string(),
        },
      })
      .collect::<Vec<_>>()
      .join("\n\n");
  }

  if let Some(filename) = result.get("filename").and_then(Value::as_str) {
    let pages = result.get("total_pages").and_then(Value::as_u64).unwrap_or(0);
    // Placeholder only: the parser reported metadata, not the document text.
    return format!(
      "PDF file: {}\nTotal pages: {}\n\n(The extracted text will appear here.)",
      filename, pages
    );
  }

  if let Some(s) = result.as_str() {
    return s.to_string();
  }

  UNEXTRACTABLE.to_string()
}

fn require_array(payload: &Value, kind: &'static str, field: &'static str) -> Result<()> {
  match payload.get(field) {
    Some(v) if v.is_array() => Ok(()),
    Some(_) => Err(ClientError::MalformedPayload {
      kind,
      reason: format!("'{}' is not an array", field),
    }),
    None => Err(ClientError::MalformedPayload {
      kind,
      reason: format!("missing '{}'", field),
    }),
  }
}

pub fn normalize_quiz(payload: Value) -> Result<Quiz> {
  require_array(&payload, "quiz", "questions")?;
  serde_json::from_value(payload)
    .map_err(|e| ClientError::MalformedPayload { kind: "quiz", reason: e.to_string() })
}

/// Parse a mind map and drop edges whose endpoints do not name an existing
/// node. The backend is trusted to uphold referential integrity, but a
/// dangling edge would otherwise surface as a phantom node in the graph view.
pub fn normalize_mindmap(payload: Value) -> Result<MindMap> {
  require_array(&payload, "mindmap", "nodes")?;
  require_array(&payload, "mindmap", "edges")?;
  let mut map: MindMap = serde_json::from_value(payload)
    .map_err(|e| ClientError::MalformedPayload { kind: "mindmap", reason: e.to_string() })?;

  let ids: std::collections::HashSet<&str> = map.nodes.iter().map(|n| n.id.as_str()).collect();
  let before = map.edges.len();
  map.edges.retain(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()));
  if map.edges.len() < before {
    warn!(target: "materials", dropped = before - map.edges.len(), "Dropped dangling mind map edges");
  }
  Ok(map)
}

pub fn normalize_immersive(payload: Value) -> Result<ImmersiveText> {
  require_array(&payload, "immersive", "sections")?;
  serde_json::from_value(payload)
    .map_err(|e| ClientError::MalformedPayload { kind: "immersive", reason: e.to_string() })
}

/// If the paragraph is an inline image placeholder (`{{image:<caption>}}`),
/// return the caption.
pub fn image_caption(paragraph: &str) -> Option<&str> {
  let start = paragraph.find("{{image:")?;
  let rest = &paragraph[start + "{{image:".len()..];
  let end = rest.find("}}")?;
  Some(&rest[..end])
}
