//! # topocrate
//!
//! Simplicial complexes that approximate the shape of a point cloud.
//!
//! This is the umbrella crate that provides convenient access to all topocrate
//! functionality. You can use this crate to get everything in one place, or
//! use individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: points, point clouds, errors and the filtered complex interface
//! - **Witness**: landmark selection and strong witness complexes
//! - **Alpha**: exact and inexact, weighted and unweighted alpha complexes
//!
//! ## Quick Start
//!
//! ```rust
//! use topocrate::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let points = vec![
//!     point(&[0.0, 0.0]),
//!     point(&[1.0, 0.0]),
//!     point(&[0.0, 1.0]),
//! ];
//!
//! let mut complex = SimplexMap::new();
//! build_alpha_complex(&points, &[], true, false, f64::INFINITY, false, &mut complex)?;
//! assert_eq!(complex.num_simplices(), 7);
//!
//! let mut witnessed = SimplexMap::new();
//! build_witness_complex(&points, &points, 1, FiltrationMode::MinimalRelaxation, &mut witnessed)?;
//! assert_eq!(witnessed.num_vertices(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables witness and alpha
//! - `witness`: Witness complexes
//! - `alpha`: Alpha complexes
//! - `all`: Enables all features

// Re-export core functionality
pub use topocrate_core::*;

// Re-export sub-crates
#[cfg(feature = "witness")]
pub use topocrate_witness as witness;

#[cfg(feature = "alpha")]
pub use topocrate_alpha as alpha;

/// Convenient imports for common use cases
pub mod prelude {
    pub use topocrate_core::*;

    #[cfg(feature = "witness")]
    pub use topocrate_witness::*;

    #[cfg(feature = "alpha")]
    pub use topocrate_alpha::*;
}
