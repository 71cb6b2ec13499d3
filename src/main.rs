//! LearnYourWay · command-line client
//!
//! - `profile` / `profile save <user_id> <grade> <interest>...`
//! - `ingest <file.pdf>` — upload, poll to completion, print extracted text
//! - `generate <quiz|mindmap|immersive|all> <content-file> [out.md]`
//!
//! Important env variables:
//!   LEARNWAY_CONFIG_PATH : path to TOML config (backend URL, poll budget, ...)
//!   LEARNWAY_API_URL     : override the backend base URL
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

use std::process::ExitCode;

use learnyourway::api::ApiClient;
use learnyourway::config::{load_config_from_env, ClientConfig};
use learnyourway::domain::ArtifactKind;
use learnyourway::error::{ClientError, Result};
use learnyourway::orchestrator::{self, UuidChunkIds};
use learnyourway::poller::{PollOptions, PollOutcome};
use learnyourway::session::SessionState;
use learnyourway::store::ProfileStore;
use learnyourway::{export, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
  telemetry::init_tracing();
  let cfg = load_config_from_env();
  let args: Vec<String> = std::env::args().skip(1).collect();

  match run(&cfg, &args).await {
    Ok(code) => code,
    Err(e) => {
      eprintln!("error: {}", e);
      ExitCode::FAILURE
    }
  }
}

async fn run(cfg: &ClientConfig, args: &[String]) -> Result<ExitCode> {
  let store = ProfileStore::new(&cfg.profile_dir);
  let profile = store.load().unwrap_or_default();

  let arg_strs: Vec<&str> = args.iter().map(String::as_str).collect();
  match arg_strs.as_slice() {
    ["profile"] => {
      println!("user_id:   {}", profile.user_id);
      println!("grade:     {}", profile.grade);
      println!("interests: {}", profile.interests.join(", "));
      Ok(ExitCode::SUCCESS)
    }

    ["profile", "save", user_id, grade, interests @ ..] => {
      let grade: u8 = grade
        .parse()
        .map_err(|_| ClientError::Store(format!("grade '{}' is not a number", grade)))?;
      let mut session = SessionState::new(profile);
      session.set_user_id(user_id);
      session.set_grade(grade);
      session.profile.interests.clear();
      for interest in interests {
        session.add_interest(interest);
      }

      let api = ApiClient::new(cfg)?;
      orchestrator::save_profile(&api, &store, &session.profile).await?;
      println!("Profile saved.");
      Ok(ExitCode::SUCCESS)
    }

    ["ingest", path] => {
      let bytes = std::fs::read(path)
        .map_err(|e| ClientError::Store(format!("cannot read {}: {}", path, e)))?;
      let filename = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string());

      let api = ApiClient::new(cfg)?;
      let opts = PollOptions::from_config(cfg);
      let outcome = orchestrator::ingest_document(&api, opts, &filename, bytes, |stage, p| {
        eprintln!("[{:>3}%] {}", p, stage);
      })
      .await?;

      match outcome {
        PollOutcome::Completed(text) => {
          println!("{}", text);
          Ok(ExitCode::SUCCESS)
        }
        PollOutcome::Failed(msg) => {
          eprintln!("ingestion failed: {}", msg);
          Ok(ExitCode::FAILURE)
        }
        PollOutcome::TimedOut => {
          eprintln!("ingestion timed out; the task may still finish on the backend");
          Ok(ExitCode::FAILURE)
        }
      }
    }

    ["generate", kind, path, rest @ ..] => {
      let content = std::fs::read_to_string(path)
        .map_err(|e| ClientError::Store(format!("cannot read {}: {}", path, e)))?;
      let api = ApiClient::new(cfg)?;
      let ids = UuidChunkIds;
      let mut session = SessionState::new(profile);

      match *kind {
        "all" => {
          orchestrator::generate_all(&api, &ids, &mut session, &content, cfg.quiz_count).await?;
        }
        "quiz" | "mindmap" | "immersive" => {
          let kind = match *kind {
            "quiz" => ArtifactKind::Quiz,
            "mindmap" => ArtifactKind::MindMap,
            _ => ArtifactKind::Immersive,
          };
          orchestrator::generate_one(&api, &ids, &mut session, kind, &content, cfg.quiz_count)
            .await?;
        }
        other => {
          eprintln!("unknown artifact kind '{}'", other);
          return Ok(usage());
        }
      }

      print_results(&session);
      if let [out] = rest {
        let md = export::results_markdown(&session.profile, &session.results);
        std::fs::write(out, md)
          .map_err(|e| ClientError::Store(format!("cannot write {}: {}", out, e)))?;
        println!("(results exported to {})", out);
      }
      Ok(ExitCode::SUCCESS)
    }

    _ => Ok(usage()),
  }
}

fn print_results(session: &SessionState) {
  if let Some(quiz) = &session.results.quiz {
    println!("--- quiz: {} questions ---", quiz.questions.len());
    for (i, q) in quiz.questions.iter().enumerate() {
      println!("{}. {} (difficulty {})", i + 1, q.stem, q.difficulty);
    }
  }
  if let Some(map) = &session.results.mindmap {
    println!("--- mind map: {} nodes / {} edges ---", map.nodes.len(), map.edges.len());
  }
  if let Some(text) = &session.results.immersive {
    println!("--- immersive text ---");
    print!("{}", export::immersive_plaintext(text));
  }
}

fn usage() -> ExitCode {
  eprintln!("usage: learnyourway profile");
  eprintln!("       learnyourway profile save <user_id> <grade> <interest>...");
  eprintln!("       learnyourway ingest <file.pdf>");
  eprintln!("       learnyourway generate <quiz|mindmap|immersive|all> <content-file> [out.md]");
  ExitCode::FAILURE
}
