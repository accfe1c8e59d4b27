//! # Scoring Module
//!
//! Converts the raw artifacts of one candidate into scalar descriptors and combines them
//! into the loss that the search minimizes.
//!
//! - [`metrics`] - Interface confidence, interface pairwise error and compactness
//! - [`fitness`] - The composite log-space fitness and its negation, the loss
//!
//! Both submodules are pure functions of their inputs; no state is kept between calls.

pub mod fitness;
pub mod metrics;
