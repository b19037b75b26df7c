//! Landmark selection
//!
//! Landmarks are the vertices of a witness complex. Two policies are offered:
//! greedy farthest-point sampling, which spreads landmarks out (a
//! 2-approximation of the optimal k-center radius), and uniform random
//! sampling without replacement.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use topocrate_core::{common_dimension, squared_distance, Error, PointD, Result};

/// Where farthest-point sampling starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartPoint {
    /// Start from this input index
    Index(usize),
    /// Start from an index drawn from the sampling RNG
    Random,
}

/// Landmark selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandmarkPolicy {
    /// Greedy farthest-point (k-center) sampling
    FarthestPoint(StartPoint),
    /// Uniform sampling without replacement
    Random,
}

impl Default for LandmarkPolicy {
    fn default() -> Self {
        LandmarkPolicy::FarthestPoint(StartPoint::Index(0))
    }
}

/// Result of a farthest-point sampling run
#[derive(Debug, Clone, PartialEq)]
pub struct FarthestPointSample {
    /// Selected input indices, in selection order
    pub indices: Vec<usize>,
    /// Squared distance from each landmark to the previously chosen ones at the
    /// moment it was picked (`f64::INFINITY` for the first landmark)
    pub radii: Vec<f64>,
}

fn make_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
        None => Box::new(thread_rng()),
    }
}

fn check_count(points: &[PointD], k: usize) -> Result<()> {
    common_dimension(points)?;
    if k == 0 {
        return Err(Error::invalid("number of landmarks must be positive"));
    }
    if k > points.len() {
        return Err(Error::invalid(format!(
            "cannot select {} landmarks from {} points",
            k,
            points.len()
        )));
    }
    Ok(())
}

/// Select `k` landmark indices from `points`.
///
/// With `seed = Some(_)` the result is reproducible; with `None` the thread
/// RNG is used (only relevant for `Random` policies and random start points).
pub fn select_landmarks(
    points: &[PointD],
    k: usize,
    policy: LandmarkPolicy,
    seed: Option<u64>,
) -> Result<Vec<usize>> {
    match policy {
        LandmarkPolicy::FarthestPoint(start) => {
            farthest_point_sampling(points, k, start, seed).map(|sample| sample.indices)
        }
        LandmarkPolicy::Random => random_sampling(points, k, seed),
    }
}

/// Greedy farthest-point sampling.
///
/// Each step adds the not-yet-selected point whose squared distance to the
/// current landmark set is largest, ties going to the lowest input index.
pub fn farthest_point_sampling(
    points: &[PointD],
    k: usize,
    start: StartPoint,
    seed: Option<u64>,
) -> Result<FarthestPointSample> {
    check_count(points, k)?;

    let first = match start {
        StartPoint::Index(index) if index < points.len() => index,
        StartPoint::Index(index) => {
            return Err(Error::invalid(format!(
                "start index {} out of range for {} points",
                index,
                points.len()
            )))
        }
        StartPoint::Random => make_rng(seed).gen_range(0..points.len()),
    };

    let mut indices = Vec::with_capacity(k);
    let mut radii = Vec::with_capacity(k);
    let mut selected = vec![false; points.len()];
    let mut nearest = vec![f64::INFINITY; points.len()];

    let mut current = first;
    let mut radius = f64::INFINITY;
    loop {
        indices.push(current);
        radii.push(radius);
        selected[current] = true;
        if indices.len() == k {
            break;
        }

        let landmark = &points[current];
        let mut best: Option<(usize, f64)> = None;
        for (index, p) in points.iter().enumerate() {
            let d = squared_distance(p, landmark);
            if d < nearest[index] {
                nearest[index] = d;
            }
            if selected[index] {
                continue;
            }
            // Strict comparison keeps the lowest index on ties.
            if best.map_or(true, |(_, best_d)| nearest[index] > best_d) {
                best = Some((index, nearest[index]));
            }
        }

        // k <= |points| guarantees an unselected point remains.
        let Some((next, next_radius)) = best else { break };
        current = next;
        radius = next_radius;
    }

    tracing::debug!(
        landmarks = indices.len(),
        last_radius = radii.last().copied().unwrap_or(f64::INFINITY),
        "farthest point sampling finished"
    );

    Ok(FarthestPointSample { indices, radii })
}

/// Uniform sampling of `k` distinct indices without replacement
pub fn random_sampling(points: &[PointD], k: usize, seed: Option<u64>) -> Result<Vec<usize>> {
    check_count(points, k)?;
    let mut rng = make_rng(seed);
    Ok(rand::seq::index::sample(&mut rng, points.len(), k).into_vec())
}

/// Gather the coordinates of the selected landmarks
pub fn landmark_points(points: &[PointD], indices: &[usize]) -> Result<Vec<PointD>> {
    indices
        .iter()
        .map(|&i| {
            points.get(i).cloned().ok_or_else(|| {
                Error::invalid(format!(
                    "landmark index {} out of range for {} points",
                    i,
                    points.len()
                ))
            })
        })
        .collect()
}
