//! Core data structures and traits for topocrate
//!
//! This crate provides the types shared by witness and alpha complex
//! construction: d-dimensional points, point clouds, the error type, and the
//! filtered simplicial complex interface together with a reference
//! implementation.

pub mod complex;
pub mod error;
pub mod point;
pub mod point_cloud;
pub mod traits;

pub use complex::*;
pub use error::*;
pub use point::*;
pub use point_cloud::*;
pub use traits::*;

/// Re-export the vector type points are built on
pub use nalgebra::DVector;
