//! # Topocrate Witness
//!
//! Landmark selection and strong witness complex construction.
//!
//! A witness complex approximates the topology of a large point set using a
//! small set of landmarks as vertices; every input point acts as a witness
//! that vouches for the landmark simplices closest to it.

pub mod landmarks;
pub mod parallel;
pub mod witness_complex;
pub mod witness_relation;

// Re-export commonly used items
pub use landmarks::*;
pub use witness_complex::*;
pub use witness_relation::*;
