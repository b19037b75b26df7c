//! Witness relation: sorted landmark distances per witness

use crate::parallel;
use std::cmp::Ordering;
use topocrate_core::{common_dimension, squared_distance, Error, PointD, Result};

/// Every landmark of one witness, nearest first.
///
/// Pairs are `(landmark index, squared distance)`, ordered by distance and then
/// by landmark index, so the order is total and reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct WitnessDistances {
    entries: Vec<(usize, f64)>,
}

impl WitnessDistances {
    /// Compute the sorted landmark list for one witness
    pub fn new(witness: &PointD, landmarks: &[PointD]) -> Self {
        let mut entries: Vec<(usize, f64)> = landmarks
            .iter()
            .enumerate()
            .map(|(index, landmark)| (index, squared_distance(witness, landmark)))
            .collect();

        entries.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        Self { entries }
    }

    /// Build a list from precomputed `(landmark, squared distance)` pairs.
    ///
    /// The pairs are re-sorted; distances must be finite and non-negative and
    /// each landmark may appear once.
    pub fn from_pairs(mut entries: Vec<(usize, f64)>) -> Result<Self> {
        if let Some(&(landmark, distance)) = entries
            .iter()
            .find(|(_, d)| !d.is_finite() || *d < 0.0)
        {
            return Err(Error::invalid(format!(
                "invalid squared distance {} to landmark {}",
                distance, landmark
            )));
        }

        entries.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let mut seen: Vec<usize> = entries.iter().map(|&(l, _)| l).collect();
        seen.sort_unstable();
        if seen.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(Error::invalid("landmark listed twice for one witness"));
        }

        Ok(Self { entries })
    }

    /// Nearest landmark and its squared distance
    pub fn nearest(&self) -> Option<(usize, f64)> {
        self.entries.first().copied()
    }

    pub fn as_slice(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank of a landmark in this witness's order
    pub fn position_of(&self, landmark: usize) -> Option<usize> {
        self.entries.iter().position(|&(l, _)| l == landmark)
    }
}

/// Check landmarks and witnesses before any distance work.
///
/// Both sets must be non-empty and share one ambient dimension.
pub fn validate_inputs(landmarks: &[PointD], witnesses: &[PointD]) -> Result<usize> {
    let landmark_dim = common_dimension(landmarks)?
        .ok_or_else(|| Error::invalid("landmark set is empty"))?;
    let witness_dim = common_dimension(witnesses)?
        .ok_or_else(|| Error::invalid("witness set is empty"))?;

    if landmark_dim != witness_dim {
        return Err(Error::invalid(format!(
            "landmarks have dimension {} but witnesses have dimension {}",
            landmark_dim, witness_dim
        )));
    }

    Ok(landmark_dim)
}

/// Compute the sorted landmark list of every witness, in witness order
pub fn compute_witness_distances(
    landmarks: &[PointD],
    witnesses: &[PointD],
) -> Result<Vec<WitnessDistances>> {
    validate_inputs(landmarks, witnesses)?;

    let relation = parallel::parallel_map(witnesses, |w| WitnessDistances::new(w, landmarks));

    tracing::debug!(
        witnesses = relation.len(),
        landmarks = landmarks.len(),
        "witness relation computed"
    );

    Ok(relation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use topocrate_core::point;

    fn unit_square() -> Vec<PointD> {
        vec![
            point(&[0.0, 0.0]),
            point(&[1.0, 0.0]),
            point(&[1.0, 1.0]),
            point(&[0.0, 1.0]),
        ]
    }

    #[test]
    fn test_sorted_with_index_ties() {
        let landmarks = unit_square();
        let center = point(&[0.5, 0.5]);
        let distances = WitnessDistances::new(&center, &landmarks);

        let order: Vec<usize> = distances.as_slice().iter().map(|&(l, _)| l).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert!(distances.as_slice().iter().all(|&(_, d)| d == 0.5));
    }

    #[test]
    fn test_corner_witness_order() {
        let landmarks = unit_square();
        let distances = WitnessDistances::new(&point(&[0.0, 0.0]), &landmarks);
        assert_eq!(
            distances.as_slice(),
            &[(0, 0.0), (1, 1.0), (3, 1.0), (2, 2.0)]
        );
        assert_eq!(distances.nearest(), Some((0, 0.0)));
        assert_eq!(distances.position_of(2), Some(3));
        assert_eq!(distances.len(), 4);
    }

    #[test]
    fn test_compute_for_all_witnesses() {
        let landmarks = unit_square();
        let mut witnesses = unit_square();
        witnesses.push(point(&[0.5, 0.5]));

        let relation = compute_witness_distances(&landmarks, &witnesses).unwrap();
        assert_eq!(relation.len(), 5);
        for (i, distances) in relation.iter().take(4).enumerate() {
            assert_eq!(distances.nearest(), Some((i, 0.0)));
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let landmarks = unit_square();
        assert!(matches!(
            compute_witness_distances(&[], &landmarks),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            compute_witness_distances(&landmarks, &[]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(compute_witness_distances(&landmarks, &[point(&[0.0, 0.0, 0.0])]).is_err());
    }

    #[test]
    fn test_from_pairs() {
        let distances = WitnessDistances::from_pairs(vec![(2, 4.0), (0, 1.0), (1, 1.0)]).unwrap();
        assert_eq!(distances.as_slice(), &[(0, 1.0), (1, 1.0), (2, 4.0)]);

        assert!(WitnessDistances::from_pairs(vec![(0, 1.0), (0, 2.0)]).is_err());
        assert!(WitnessDistances::from_pairs(vec![(0, -1.0)]).is_err());
        assert!(WitnessDistances::from_pairs(vec![(0, f64::NAN)]).is_err());
    }
}
