//! # Engine Module
//!
//! The stateful part of the library: it turns candidate batches into decisions and drives
//! the external oracles from round to round.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Scoring and search settings with validating builders
//! - **Selection** ([`selector`]) - Loads, validates and scores a batch, then picks the
//!   first minimum-loss candidate
//! - **State** ([`state`]) - The explicit [`state::RoundState`] value, the acceptance rule
//!   and the controller phases
//! - **Control** ([`controller`]) - The oracle traits and the [`controller::RoundController`]
//!   state machine
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Candidate-scoped, batch-scoped and round-fatal errors
//!
//! ## Failure Model
//!
//! Data problems with a single candidate never stop a round; the candidate is excluded
//! and reported. A round fails only when the whole batch is unusable, when an oracle
//! fails, or when there is no accepted design to carry forward. A failed round leaves the
//! state exactly as the last accepted decision left it.

pub mod config;
pub mod controller;
pub mod error;
pub mod progress;
pub mod selector;
pub mod state;
