//! Session state: the learner profile being edited plus the most recently
//! generated artifacts.
//!
//! Single-writer by construction: the orchestrator mutates results, profile
//! edits go through the defined operations, presentation reads. Artifacts are
//! replaced wholesale, never merged.

use tracing::{debug, info};

use crate::domain::{Artifact, ImmersiveText, LearnerProfile, MindMap, Quiz, SessionResults};
use crate::error::{ClientError, Result};

#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub profile: LearnerProfile,
    pub results: SessionResults,
}

impl SessionState {
    /// Fresh session around a (loaded or default) profile, with empty results.
    pub fn new(profile: LearnerProfile) -> Self {
        Self { profile, results: SessionResults::default() }
    }

    /// Append an interest. Idempotent: an exact (case-sensitive) duplicate is
    /// a no-op. Returns whether the list changed.
    pub fn add_interest(&mut self, interest: &str) -> bool {
        let interest = interest.trim();
        if interest.is_empty() || self.profile.interests.iter().any(|i| i == interest) {
            debug!(target: "learnyourway", %interest, "Interest ignored (empty or duplicate)");
            return false;
        }
        self.profile.interests.push(interest.to_string());
        true
    }

    /// Positional removal. Out-of-range indices fail rather than silently
    /// doing nothing; the list is left unchanged on failure.
    pub fn remove_interest(&mut self, index: usize) -> Result<String> {
        let len = self.profile.interests.len();
        if index >= len {
            return Err(ClientError::IndexOutOfRange { index, len });
        }
        Ok(self.profile.interests.remove(index))
    }

    pub fn set_user_id(&mut self, user_id: &str) {
        self.profile.user_id = user_id.trim().to_string();
    }

    pub fn set_grade(&mut self, grade: u8) {
        self.profile.grade = grade;
    }

    pub fn set_quiz(&mut self, quiz: Quiz) {
        info!(target: "materials", questions = quiz.questions.len(), "Quiz stored in session");
        self.results.quiz = Some(quiz);
    }

    pub fn set_mindmap(&mut self, map: MindMap) {
        info!(target: "materials", nodes = map.nodes.len(), edges = map.edges.len(), "Mind map stored in session");
        self.results.mindmap = Some(map);
    }

    pub fn set_immersive(&mut self, text: ImmersiveText) {
        info!(target: "materials", sections = text.sections.len(), "Immersive text stored in session");
        self.results.immersive = Some(text);
    }

    pub fn set_artifact(&mut self, artifact: Artifact) {
        match artifact {
            Artifact::Quiz(q) => self.set_quiz(q),
            Artifact::MindMap(m) => self.set_mindmap(m),
            Artifact::Immersive(t) => self.set_immersive(t),
        }
    }
}
