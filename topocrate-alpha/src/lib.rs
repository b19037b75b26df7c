//! # Topocrate Alpha
//!
//! Alpha complexes of weighted and unweighted point sets in any dimension.
//!
//! The crate carries its own geometric kernels (floating point and exact
//! rational) and an incremental regular triangulation written once against
//! the [`Kernel`] trait. [`AlphaComplex`] selects one of four variants from
//! the `fast` flag and the presence of weights.

pub mod alpha_complex;
pub mod exact;
pub mod kernel;
pub mod triangulation;

// Re-export commonly used items
pub use alpha_complex::*;
pub use kernel::*;
pub use triangulation::*;
