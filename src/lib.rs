//! LearnYourWay client library.
//!
//! Takes raw study material (typed text or an uploaded document) to the
//! generation backend and brings back three learning artifacts: a quiz, a
//! mind map, and an immersive narrated text. The interesting parts live in
//! `poller` (bounded-budget task polling), `orchestrator` (concurrent
//! fan-out with all-or-nothing aggregation), and `normalize` (the
//! parse/don't-trust boundary for backend payloads).

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod normalize;
pub mod orchestrator;
pub mod poller;
pub mod session;
pub mod store;
pub mod telemetry;

pub use error::{ClientError, Result};
