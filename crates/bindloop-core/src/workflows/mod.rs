//! # Workflows Module
//!
//! Top-level entry points that combine the core and engine layers into complete
//! procedures.
//!
//! - **Batch scoring** ([`score`]) - Discover the candidates of one structure-oracle output
//!   directory, score them and return the ranked report
//! - **Design loop** ([`design`]) - Open the round summary log and run the
//!   [`RoundController`](crate::engine::controller::RoundController) over the configured
//!   rounds
//!
//! Both workflows report progress through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) and log their
//! milestones with `tracing`.

pub mod design;
pub mod score;
