//! Provides input/output for the artifacts exchanged with the external oracles.
//!
//! Structures are read through the [`traits::StructureFile`] interface (PDB is the format
//! produced by the structure oracle). The JSON confidence and error artifacts, candidate
//! discovery inside a batch directory, FASTA sequence batches and the append-only round
//! summary each have their own module.

pub mod artifacts;
pub mod batch;
pub mod fasta;
pub mod pdb;
pub mod summary;
pub mod traits;
