//! # bindloop Core Library
//!
//! Scoring, selection and greedy round acceptance for iterative binder design, where a
//! structure-prediction tool and a sequence-design tool are alternated and the best
//! predicted complex is carried from round to round.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `PaeMatrix`,
//!   `ConfidenceScores`), readers for the prediction artifacts, and the pure scoring
//!   functions (`metrics`, `fitness`).
//!
//! - **[`engine`]: The Logic Core.** The stateful layer. It holds the configuration
//!   builders, the `CandidateSelector` that reduces one batch to its best candidate,
//!   the explicit `RoundState` value and the `RoundController` state machine that
//!   drives the external oracles.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the two layers
//!   below: scoring a single batch directory and running the full design loop.

pub mod core;
pub mod engine;
pub mod workflows;
