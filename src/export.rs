//! On-demand Markdown export of the current profile and quiz results.
//! Pure string building; where the file lands is the caller's business.

use crate::domain::{LearnerProfile, SessionResults};
use crate::normalize::image_caption;

/// Render the profile header plus the generated quiz (when present) as
/// Markdown. Mind map and immersive text are screen-only artifacts; the
/// immersive image markers would not survive a text export anyway.
pub fn results_markdown(profile: &LearnerProfile, results: &SessionResults) -> String {
  let mut md = String::new();
  md.push_str("# LearnYourWay Results\n\n");
  md.push_str(&format!("**Learner**: {}\n", profile.user_id));
  md.push_str(&format!("**Grade**: {}\n", profile.grade));
  md.push_str(&format!("**Interests**: {}\n\n", profile.interests.join(", ")));

  if let Some(quiz) = &results.quiz {
    md.push_str("## Quiz\n\n");
    for (i, q) in quiz.questions.iter().enumerate() {
      md.push_str(&format!("### {}. {}\n\n", i + 1, q.stem));
      if let Some(options) = &q.options {
        for opt in options {
          md.push_str(&format!("- {}\n", opt));
        }
        md.push('\n');
      }
      md.push_str(&format!("**Answer**: {}\n\n", q.answer));
      md.push_str(&format!("**Explanation**: {}\n\n", q.explanation));
    }
  }

  md
}

/// Plain-text rendering of the immersive text, image markers replaced with
/// bracketed captions. Used by the CLI to show the artifact in a terminal.
pub fn immersive_plaintext(text: &crate::domain::ImmersiveText) -> String {
  let mut out = String::new();
  for section in &text.sections {
    out.push_str(&format!("== {} ==\n\n", section.title));
    for p in &section.paragraphs {
      match image_caption(p) {
        Some(caption) => out.push_str(&format!("[illustration: {}]\n\n", caption)),
        None => out.push_str(&format!("{}\n\n", p)),
      }
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Answer, ImmersiveText, Question, QuestionType, Quiz, Section};

  #[test]
  fn markdown_contains_profile_and_quiz() {
    let profile = LearnerProfile {
      user_id: "demo_user".into(),
      grade: 5,
      interests: vec!["soccer".into(), "dinosaurs".into()],
    };
    let results = SessionResults {
      quiz: Some(Quiz {
        questions: vec![Question {
          question_type: QuestionType::Multi,
          stem: "Which are planets?".into(),
          options: Some(vec!["Mars".into(), "Pluto".into(), "Sun".into()]),
          answer: Answer::Many(vec!["Mars".into(), "Pluto".into()]),
          explanation: "The Sun is a star.".into(),
          difficulty: 2,
        }],
      }),
      ..Default::default()
    };

    let md = results_markdown(&profile, &results);
    assert!(md.contains("**Learner**: demo_user"));
    assert!(md.contains("**Interests**: soccer, dinosaurs"));
    assert!(md.contains("### 1. Which are planets?"));
    assert!(md.contains("- Pluto"));
    assert!(md.contains("**Answer**: Mars, Pluto"));
  }

  #[test]
  fn markdown_without_quiz_is_just_the_header() {
    let md = results_markdown(&LearnerProfile::default(), &SessionResults::default());
    assert!(md.starts_with("# LearnYourWay Results"));
    assert!(!md.contains("## Quiz"));
  }

  #[test]
  fn immersive_plaintext_replaces_image_markers() {
    let text = ImmersiveText {
      sections: vec![Section {
        title: "Kickoff".into(),
        paragraphs: vec!["The whistle blew.".into(), "{{image:a stadium at dusk}}".into()],
      }],
    };

    let out = immersive_plaintext(&text);
    assert!(out.contains("== Kickoff =="));
    assert!(out.contains("[illustration: a stadium at dusk]"));
    assert!(!out.contains("{{image:"));
  }
}
