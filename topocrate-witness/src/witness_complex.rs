//! Strong witness complex construction
//!
//! A set `S` of `m + 1` landmarks is witnessed by `w` with relaxation `α` when
//! every landmark of `S` is at most `α` farther (in squared distance) from `w`
//! than the nearest landmark `w` skips before reaching the last one of `S`.
//! A simplex enters the complex at the smallest such `α` over all witnesses,
//! and never before its facets.

use crate::witness_relation::{compute_witness_distances, WitnessDistances};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use topocrate_core::{Error, FilteredComplex, PointD, Result};

/// How filtration values are assigned to witnessed simplices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FiltrationMode {
    /// Smallest relaxation at which some witness sees the simplex
    MinimalRelaxation,
    /// Every simplex found by the enumeration gets this value.
    ///
    /// A simplification: the relaxation values are still used to decide which
    /// simplices exist but are not recorded.
    Constant(f64),
}

impl Default for FiltrationMode {
    fn default() -> Self {
        FiltrationMode::MinimalRelaxation
    }
}

/// Configuration for witness complex construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WitnessConfig {
    /// Largest simplex dimension to build
    pub max_dimension: usize,
    /// Largest relaxation (squared distance units) a witness may use.
    /// `f64::INFINITY` builds the complete filtration.
    pub max_alpha_square: f64,
    /// Filtration value assignment
    pub filtration_mode: FiltrationMode,
}

impl Default for WitnessConfig {
    fn default() -> Self {
        Self {
            max_dimension: 2,
            max_alpha_square: f64::INFINITY,
            filtration_mode: FiltrationMode::MinimalRelaxation,
        }
    }
}

impl WitnessConfig {
    pub fn with_max_dimension(mut self, max_dimension: usize) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn with_max_alpha_square(mut self, max_alpha_square: f64) -> Self {
        self.max_alpha_square = max_alpha_square;
        self
    }

    pub fn with_filtration_mode(mut self, filtration_mode: FiltrationMode) -> Self {
        self.filtration_mode = filtration_mode;
        self
    }

    /// Reject relaxations and constant values that cannot be filtration values
    pub fn validate(&self) -> Result<()> {
        if self.max_alpha_square.is_nan() || self.max_alpha_square < 0.0 {
            return Err(Error::invalid(format!(
                "max_alpha_square must be non-negative, got {}",
                self.max_alpha_square
            )));
        }
        if let FiltrationMode::Constant(value) = self.filtration_mode {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(format!(
                    "constant filtration value must be finite and non-negative, got {}",
                    value
                )));
            }
        }
        Ok(())
    }
}

/// Witness complex builder holding the materialized witness relation
#[derive(Debug, Clone)]
pub struct WitnessComplex {
    num_landmarks: usize,
    relation: Vec<WitnessDistances>,
}

impl WitnessComplex {
    /// Compute the witness relation between Euclidean landmarks and witnesses
    pub fn new(landmarks: &[PointD], witnesses: &[PointD]) -> Result<Self> {
        let relation = compute_witness_distances(landmarks, witnesses)?;
        Ok(Self {
            num_landmarks: landmarks.len(),
            relation,
        })
    }

    /// Build from a precomputed nearest-landmark table, e.g. for non-Euclidean
    /// distances. Lists may be truncated but must only name landmarks in range.
    pub fn from_relation(num_landmarks: usize, relation: Vec<WitnessDistances>) -> Result<Self> {
        if num_landmarks == 0 {
            return Err(Error::invalid("landmark set is empty"));
        }
        if relation.is_empty() {
            return Err(Error::invalid("witness set is empty"));
        }
        if let Some((w, _)) = relation.iter().enumerate().find(|(_, distances)| {
            distances
                .as_slice()
                .iter()
                .any(|&(landmark, _)| landmark >= num_landmarks)
        }) {
            return Err(Error::invalid(format!(
                "witness {} refers to a landmark outside 0..{}",
                w, num_landmarks
            )));
        }
        Ok(Self {
            num_landmarks,
            relation,
        })
    }

    pub fn num_landmarks(&self) -> usize {
        self.num_landmarks
    }

    pub fn num_witnesses(&self) -> usize {
        self.relation.len()
    }

    pub fn relation(&self) -> &[WitnessDistances] {
        &self.relation
    }

    /// Enumerate the witness complex and insert it into `target`.
    ///
    /// All simplices are computed before the first insertion; they are then
    /// inserted by ascending dimension. Returns the number of simplices that
    /// were new to `target`.
    pub fn create_complex<C>(&self, target: &mut C, config: &WitnessConfig) -> Result<usize>
    where
        C: FilteredComplex + ?Sized,
    {
        config.validate()?;

        let mut values: HashMap<Vec<usize>, f64> = HashMap::new();
        let mut layers: Vec<Vec<Vec<usize>>> = Vec::with_capacity(config.max_dimension + 1);

        let vertices: Vec<Vec<usize>> = (0..self.num_landmarks).map(|l| vec![l]).collect();
        for vertex in &vertices {
            values.insert(vertex.clone(), 0.0);
        }
        layers.push(vertices);

        let mut active: Vec<usize> = (0..self.relation.len()).collect();
        for dimension in 1..=config.max_dimension {
            let mut found: HashMap<Vec<usize>, f64> = HashMap::new();
            active.retain(|&w| {
                let mut chosen = Vec::with_capacity(dimension + 1);
                extend_simplex(
                    self.relation[w].as_slice(),
                    0,
                    dimension,
                    f64::INFINITY,
                    config.max_alpha_square,
                    &mut chosen,
                    &values,
                    &mut found,
                )
            });

            tracing::debug!(
                dimension,
                simplices = found.len(),
                active_witnesses = active.len(),
                "witness enumeration pass"
            );

            if found.is_empty() {
                break;
            }

            let mut layer: Vec<Vec<usize>> = found.keys().cloned().collect();
            layer.sort_unstable();
            values.extend(found);
            layers.push(layer);
        }

        let mut inserted = 0;
        for simplex in layers.iter().flatten() {
            let value = match config.filtration_mode {
                FiltrationMode::MinimalRelaxation => values[simplex],
                FiltrationMode::Constant(value) => value,
            };
            if target.insert(simplex, value) {
                inserted += 1;
            }
        }

        tracing::info!(
            landmarks = self.num_landmarks,
            witnesses = self.relation.len(),
            dimension = layers.len() - 1,
            simplices = values.len(),
            inserted,
            "witness complex built"
        );

        Ok(inserted)
    }
}

/// Largest facet value of `simplex`, or `None` if a facet is missing
fn facet_filtration(simplex: &[usize], values: &HashMap<Vec<usize>, f64>) -> Option<f64> {
    let mut facet = Vec::with_capacity(simplex.len() - 1);
    let mut highest = 0.0f64;
    for skip in 0..simplex.len() {
        facet.clear();
        facet.extend(
            simplex
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &v)| v),
        );
        highest = highest.max(*values.get(&facet)?);
    }
    Some(highest)
}

fn sorted(chosen: &[usize]) -> Vec<usize> {
    let mut key = chosen.to_vec();
    key.sort_unstable();
    key
}

/// Walk one witness's landmark list choosing `remaining + 1` more landmarks.
///
/// `norelax` is the squared distance of the nearest landmark skipped so far.
/// Returns whether the witness produced at least one simplex.
#[allow(clippy::too_many_arguments)]
fn extend_simplex(
    list: &[(usize, f64)],
    from: usize,
    remaining: usize,
    mut norelax: f64,
    max_alpha_square: f64,
    chosen: &mut Vec<usize>,
    values: &HashMap<Vec<usize>, f64>,
    found: &mut HashMap<Vec<usize>, f64>,
) -> bool {
    let mut contributed = false;

    for (position, &(landmark, distance)) in list.iter().enumerate().skip(from) {
        if distance - max_alpha_square > norelax {
            break;
        }

        chosen.push(landmark);
        let key = sorted(chosen);

        if remaining == 0 {
            if let Some(facets) = facet_filtration(&key, values) {
                let relaxation = if distance > norelax {
                    distance - norelax
                } else {
                    0.0
                };
                let value = relaxation.max(facets);
                found
                    .entry(key)
                    .and_modify(|v| *v = v.min(value))
                    .or_insert(value);
                contributed = true;
            }
        } else if values.contains_key(&key) {
            contributed |= extend_simplex(
                list,
                position + 1,
                remaining - 1,
                norelax,
                max_alpha_square,
                chosen,
                values,
                found,
            );
        }

        chosen.pop();
        norelax = norelax.min(distance);
    }

    contributed
}

/// Build the witness complex of `landmarks` witnessed by `witnesses` up to
/// `max_dimension`, over the complete relaxation range.
pub fn build_witness_complex<C>(
    landmarks: &[PointD],
    witnesses: &[PointD],
    max_dimension: usize,
    filtration_mode: FiltrationMode,
    target: &mut C,
) -> Result<usize>
where
    C: FilteredComplex + ?Sized,
{
    let config = WitnessConfig::default()
        .with_max_dimension(max_dimension)
        .with_filtration_mode(filtration_mode);
    config.validate()?;
    WitnessComplex::new(landmarks, witnesses)?.create_complex(target, &config)
}
