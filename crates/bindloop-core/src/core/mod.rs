//! # Core Module
//!
//! Stateless building blocks for interpreting the output of a structure-prediction run.
//!
//! - **Models** ([`models`]) - Predicted structures, pairwise error matrices, confidence
//!   scores, atom selections and candidate identity
//! - **File I/O** ([`io`]) - PDB, JSON and FASTA readers, batch discovery and the round
//!   summary log
//! - **Scoring** ([`scoring`]) - Structural descriptors and the composite fitness function
//! - **Utilities** ([`utils`]) - Geometry and robust statistics helpers
//!
//! All lengths handled by this module are in nanometres; PDB coordinates are converted on
//! load.

pub mod io;
pub mod models;
pub mod scoring;
pub mod utils;
