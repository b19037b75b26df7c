//! Point generators and logging setup shared by the demo programs

#![allow(dead_code)]

use nalgebra::DVector;
use rand::Rng;
use topocrate::PointD;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `info`)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Uniform random points on the unit sphere in `dimension` coordinates
pub fn sphere_points<R: Rng>(count: usize, dimension: usize, rng: &mut R) -> Vec<PointD> {
    let mut points = Vec::with_capacity(count);
    while points.len() < count {
        let candidate = DVector::from_fn(dimension, |_, _| rng.gen_range(-1.0..1.0));
        let norm = candidate.norm();
        if norm > 1e-6 && norm <= 1.0 {
            points.push(candidate / norm);
        }
    }
    points
}

/// Uniform random points in the unit cube
pub fn cube_points<R: Rng>(count: usize, dimension: usize, rng: &mut R) -> Vec<PointD> {
    (0..count)
        .map(|_| DVector::from_fn(dimension, |_, _| rng.gen_range(0.0..1.0)))
        .collect()
}
