//! # Core Models Module
//!
//! Data structures describing one candidate produced by the structure oracle.
//!
//! - [`structure`] - Atoms, residues and chains of a predicted complex
//! - [`pae`] - The (asymmetric) predicted aligned error matrix
//! - [`confidence`] - Per-residue confidence and global agreement scores
//! - [`selection`] - Atom selections used to define the interface and the binder
//! - [`candidate`] - Candidate identifiers, structure handles and aligned candidate records
//!
//! ```ignore
//! use bindloop::core::models::structure::StructureBuilder;
//! use nalgebra::Point3;
//!
//! let mut builder = StructureBuilder::new();
//! builder.start_chain('A');
//! builder.start_residue(1, None, "GLY");
//! builder.add_atom(1, "CA", "C", Point3::new(0.0, 0.0, 0.0));
//! let structure = builder.build();
//! ```

pub mod candidate;
pub mod confidence;
pub mod pae;
pub mod selection;
pub mod structure;
