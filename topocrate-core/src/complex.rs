//! Reference filtered simplicial complex

use crate::traits::FilteredComplex;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filtered simplicial complex stored as an ordered map from sorted vertex
/// lists to filtration values.
///
/// Good enough for the complex sizes produced by witness and alpha
/// construction on moderate point clouds; faces are materialized explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplexMap {
    simplices: BTreeMap<Vec<usize>, f64>,
}

fn normalize(simplex: &[usize]) -> Vec<usize> {
    let mut key = simplex.to_vec();
    key.sort_unstable();
    key.dedup();
    key
}

impl SimplexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimension of the largest simplex, `None` for the empty complex
    pub fn dimension(&self) -> Option<usize> {
        self.simplices.keys().map(|s| s.len() - 1).max()
    }

    /// Number of 0-simplices
    pub fn num_vertices(&self) -> usize {
        self.simplices_of_dimension(0).count()
    }

    /// Check whether a simplex is present
    pub fn contains(&self, simplex: &[usize]) -> bool {
        self.simplices.contains_key(&normalize(simplex))
    }

    /// Iterate over `(simplex, filtration)` pairs in lexicographic vertex order
    pub fn iter(&self) -> impl Iterator<Item = (&[usize], f64)> + '_ {
        self.simplices.iter().map(|(s, f)| (s.as_slice(), *f))
    }

    /// Iterate over the simplices of one dimension
    pub fn simplices_of_dimension(
        &self,
        dimension: usize,
    ) -> impl Iterator<Item = (&[usize], f64)> + '_ {
        self.iter().filter(move |(s, _)| s.len() == dimension + 1)
    }

    /// Check that every facet carries a filtration value no larger than its coface
    pub fn is_monotone(&self) -> bool {
        self.simplices.iter().all(|(simplex, &value)| {
            simplex.len() < 2
                || simplex
                    .iter()
                    .copied()
                    .combinations(simplex.len() - 1)
                    .all(|facet| {
                        self.simplices
                            .get(&facet)
                            .is_some_and(|&facet_value| facet_value <= value)
                    })
        })
    }
}

impl FilteredComplex for SimplexMap {
    fn insert(&mut self, simplex: &[usize], filtration: f64) -> bool {
        let key = normalize(simplex);
        if key.is_empty() {
            return false;
        }

        let is_new = !self.simplices.contains_key(&key);

        for size in 1..=key.len() {
            for face in key.iter().copied().combinations(size) {
                let value = self.simplices.entry(face).or_insert(filtration);
                if *value > filtration {
                    *value = filtration;
                }
            }
        }

        is_new
    }

    fn num_simplices(&self) -> usize {
        self.simplices.len()
    }

    fn filtration(&self, simplex: &[usize]) -> Option<f64> {
        self.simplices.get(&normalize(simplex)).copied()
    }
}
