//! Alpha complex construction
//!
//! The alpha complex at scale `α` is the subcomplex of the regular
//! triangulation made of the simplices whose alpha value is at most `α`. The
//! alpha value of a simplex is the squared radius of its smallest orthosphere,
//! unless it is attached to a coface (the coface's opposite vertex has
//! negative power with respect to that orthosphere), in which case it enters
//! together with the coface.

use crate::kernel::{ExactKernel, InexactKernel, Kernel};
use crate::triangulation::{validate_weighted_input, RegularTriangulation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use topocrate_core::{Error, FilteredComplex, PointD, Result};
use tracing::{debug, info};

/// Filtration value given to every simplex when `default_filtration` is set
pub const DEFAULT_FILTRATION_VALUE: f64 = 0.0;

/// The four construction variants, fixed when the complex is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlphaComplexVariant {
    /// Floating point Delaunay triangulation
    Inexact,
    /// Floating point regular triangulation of weighted points
    InexactWeighted,
    /// Exact Delaunay triangulation
    Exact,
    /// Exact regular triangulation of weighted points
    ExactWeighted,
}

impl AlphaComplexVariant {
    pub fn select(fast: bool, weighted: bool) -> Self {
        match (fast, weighted) {
            (true, false) => AlphaComplexVariant::Inexact,
            (true, true) => AlphaComplexVariant::InexactWeighted,
            (false, false) => AlphaComplexVariant::Exact,
            (false, true) => AlphaComplexVariant::ExactWeighted,
        }
    }

    pub fn is_fast(self) -> bool {
        matches!(
            self,
            AlphaComplexVariant::Inexact | AlphaComplexVariant::InexactWeighted
        )
    }

    pub fn is_weighted(self) -> bool {
        matches!(
            self,
            AlphaComplexVariant::InexactWeighted | AlphaComplexVariant::ExactWeighted
        )
    }
}

#[derive(Debug, Clone)]
enum Triangulation {
    Inexact(RegularTriangulation<InexactKernel>),
    Exact(RegularTriangulation<ExactKernel>),
}

/// Alpha complex of a (possibly weighted) point set
#[derive(Debug, Clone)]
pub struct AlphaComplex {
    variant: AlphaComplexVariant,
    exact: bool,
    triangulation: Option<Triangulation>,
}

impl AlphaComplex {
    /// Triangulate `points`.
    ///
    /// An empty `weights` slice means unweighted. `fast` picks the floating
    /// point kernel for the triangulation; `exact` evaluates alpha values and
    /// attachment in exact arithmetic whichever kernel triangulated.
    pub fn new(points: &[PointD], weights: &[f64], fast: bool, exact: bool) -> Result<Self> {
        let weights = (!weights.is_empty()).then_some(weights);
        validate_weighted_input(points, weights)?;

        let variant = AlphaComplexVariant::select(fast, weights.is_some());
        let triangulation = if points.is_empty() {
            None
        } else if fast {
            Some(Triangulation::Inexact(RegularTriangulation::new(points, weights)?))
        } else {
            Some(Triangulation::Exact(RegularTriangulation::new(points, weights)?))
        };

        let complex = Self {
            variant,
            exact,
            triangulation,
        };
        debug!(
            variant = ?variant,
            points = points.len(),
            vertices = complex.num_vertices(),
            "alpha complex triangulated"
        );
        Ok(complex)
    }

    pub fn variant(&self) -> AlphaComplexVariant {
        self.variant
    }

    /// Whether alpha values are computed exactly
    pub fn is_exact(&self) -> bool {
        self.exact || !self.variant.is_fast()
    }

    pub fn is_empty(&self) -> bool {
        self.triangulation.is_none()
    }

    pub fn num_vertices(&self) -> usize {
        match &self.triangulation {
            Some(Triangulation::Inexact(t)) => t.num_vertices(),
            Some(Triangulation::Exact(t)) => t.num_vertices(),
            None => 0,
        }
    }

    /// Dimension of the underlying triangulation
    pub fn dimension(&self) -> Option<usize> {
        match &self.triangulation {
            Some(Triangulation::Inexact(t)) => t.dimension(),
            Some(Triangulation::Exact(t)) => t.dimension(),
            None => None,
        }
    }

    /// Input coordinates of a triangulation vertex
    pub fn get_point(&self, vertex: usize) -> Result<&PointD> {
        let point = match &self.triangulation {
            Some(Triangulation::Inexact(t)) if t.is_vertex(vertex) => t.point(vertex),
            Some(Triangulation::Exact(t)) if t.is_vertex(vertex) => t.point(vertex),
            _ => None,
        };
        point
            .map(|p| &p.position)
            .ok_or_else(|| Error::invalid(format!("{} is not a vertex of the triangulation", vertex)))
    }

    /// Insert every simplex with alpha value at most `cutoff` into `target`,
    /// faces before cofaces.
    ///
    /// With `default_filtration` the simplices are inserted at
    /// [`DEFAULT_FILTRATION_VALUE`] instead of their alpha value. Returns the
    /// number of simplices that were new to `target`.
    pub fn build<C>(&self, target: &mut C, cutoff: f64, default_filtration: bool) -> Result<usize>
    where
        C: FilteredComplex + ?Sized,
    {
        let Some(triangulation) = &self.triangulation else {
            return Ok(0);
        };
        if cutoff.is_nan() {
            return Err(Error::invalid("alpha cutoff is NaN"));
        }

        let layers = match (triangulation, self.exact) {
            (Triangulation::Inexact(t), false) => alpha_values(t, &InexactKernel::new())?,
            (Triangulation::Inexact(t), true) => alpha_values(t, &ExactKernel::new())?,
            (Triangulation::Exact(t), _) => alpha_values(t, &ExactKernel::new())?,
        };

        let mut inserted = 0;
        let mut kept = 0;
        for (simplex, value) in layers.iter().flatten() {
            if *value > cutoff {
                continue;
            }
            kept += 1;
            let filtration = if default_filtration {
                DEFAULT_FILTRATION_VALUE
            } else {
                *value
            };
            if target.insert(simplex, filtration) {
                inserted += 1;
            }
        }

        info!(
            variant = ?self.variant,
            cutoff,
            simplices = kept,
            inserted,
            "alpha complex built"
        );

        Ok(inserted)
    }
}

fn facets(simplex: &[usize]) -> impl Iterator<Item = (Vec<usize>, usize)> + '_ {
    (0..simplex.len()).map(move |skip| {
        let facet = simplex
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != skip)
            .map(|(_, &v)| v)
            .collect();
        (facet, simplex[skip])
    })
}

/// Alpha value of every simplex of `triangulation`, grouped by dimension,
/// evaluated with `kernel`
fn alpha_values<K: Kernel, V: Kernel>(
    triangulation: &RegularTriangulation<K>,
    kernel: &V,
) -> Result<Vec<Vec<(Vec<usize>, f64)>>> {
    let layers = triangulation.simplices();
    let mut values: HashMap<Vec<usize>, f64> = HashMap::new();

    for layer in layers.iter().rev() {
        for simplex in layer {
            let value = match values.get(simplex) {
                Some(&value) => value,
                None => {
                    let value = kernel.squared_orthoradius(&triangulation.face(simplex))?;
                    values.insert(simplex.clone(), value);
                    value
                }
            };
            if simplex.len() == 1 {
                continue;
            }

            for (facet, opposite) in facets(simplex) {
                if let Some(existing) = values.get_mut(&facet) {
                    *existing = existing.min(value);
                    continue;
                }
                let face = triangulation.face(&facet);
                let apex = triangulation.face(&[opposite]);
                if kernel.is_attached(&face, apex[0])? {
                    values.insert(facet, value);
                }
            }
        }
    }

    // Rounding can leave a face above its coface.
    let mut result: Vec<Vec<(Vec<usize>, f64)>> = Vec::with_capacity(layers.len());
    for layer in layers {
        let mut valued = Vec::with_capacity(layer.len());
        for simplex in layer {
            let mut value = values[&simplex];
            if simplex.len() > 1 {
                for (facet, _) in facets(&simplex) {
                    value = value.max(values[&facet]);
                }
                values.insert(simplex.clone(), value);
            }
            valued.push((simplex, value));
        }
        result.push(valued);
    }

    Ok(result)
}

/// Build the alpha complex of `points` into `target` in one call.
///
/// `weights` may be empty for an unweighted complex. See [`AlphaComplex::new`]
/// and [`AlphaComplex::build`].
pub fn build_alpha_complex<C>(
    points: &[PointD],
    weights: &[f64],
    fast: bool,
    exact: bool,
    cutoff: f64,
    default_filtration: bool,
    target: &mut C,
) -> Result<usize>
where
    C: FilteredComplex + ?Sized,
{
    AlphaComplex::new(points, weights, fast, exact)?.build(target, cutoff, default_filtration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use topocrate_core::{point, SimplexMap};

    fn obtuse_triangle() -> Vec<PointD> {
        vec![point(&[0.0, 0.0]), point(&[4.0, 0.0]), point(&[2.0, 1.0])]
    }

    #[test]
    fn test_variant_selection() {
        let points = obtuse_triangle();
        let cases = [
            (true, false, AlphaComplexVariant::Inexact),
            (true, true, AlphaComplexVariant::InexactWeighted),
            (false, false, AlphaComplexVariant::Exact),
            (false, true, AlphaComplexVariant::ExactWeighted),
        ];
        for (fast, weighted, expected) in cases {
            let weights: &[f64] = if weighted { &[0.0, 0.0, 0.0] } else { &[] };
            let complex = AlphaComplex::new(&points, weights, fast, false).unwrap();
            assert_eq!(complex.variant(), expected);
            assert_eq!(complex.variant().is_fast(), fast);
            assert_eq!(complex.variant().is_weighted(), weighted);
        }
    }

    #[test]
    fn test_right_triangle_values() {
        let points = vec![point(&[0.0, 0.0]), point(&[1.0, 0.0]), point(&[0.0, 1.0])];
        let mut complex = SimplexMap::new();
        let inserted =
            build_alpha_complex(&points, &[], true, false, f64::INFINITY, false, &mut complex)
                .unwrap();

        assert_eq!(inserted, 7);
        assert_eq!(complex.filtration(&[0]), Some(0.0));
        assert_relative_eq!(complex.filtration(&[0, 1]).unwrap(), 0.25);
        assert_relative_eq!(complex.filtration(&[0, 2]).unwrap(), 0.25);
        assert_relative_eq!(complex.filtration(&[1, 2]).unwrap(), 0.5);
        assert_relative_eq!(complex.filtration(&[0, 1, 2]).unwrap(), 0.5);
    }

    #[test]
    fn test_attached_edge_takes_triangle_value() {
        for (fast, exact) in [(true, false), (true, true), (false, false)] {
            let alpha = AlphaComplex::new(&obtuse_triangle(), &[], fast, exact).unwrap();
            let mut complex = SimplexMap::new();
            alpha.build(&mut complex, f64::INFINITY, false).unwrap();

            assert_relative_eq!(complex.filtration(&[0, 1, 2]).unwrap(), 6.25);
            assert_relative_eq!(complex.filtration(&[0, 1]).unwrap(), 6.25);
            assert_relative_eq!(complex.filtration(&[0, 2]).unwrap(), 1.25);
            assert_relative_eq!(complex.filtration(&[1, 2]).unwrap(), 1.25);
            assert!(complex.is_monotone());
        }
    }

    #[test]
    fn test_cutoff_prunes() {
        let mut complex = SimplexMap::new();
        let inserted =
            build_alpha_complex(&obtuse_triangle(), &[], true, false, 1.3, false, &mut complex)
                .unwrap();
        assert_eq!(inserted, 5);
        assert!(!complex.contains(&[0, 1]));
        assert!(!complex.contains(&[0, 1, 2]));
    }

    #[test]
    fn test_default_filtration() {
        let mut complex = SimplexMap::new();
        build_alpha_complex(&obtuse_triangle(), &[], false, false, 2.0, true, &mut complex)
            .unwrap();
        assert_eq!(complex.num_simplices(), 5);
        assert!(complex.iter().all(|(_, f)| f == DEFAULT_FILTRATION_VALUE));
    }

    #[test]
    fn test_empty_point_set() {
        let alpha = AlphaComplex::new(&[], &[], true, false).unwrap();
        assert!(alpha.is_empty());
        assert_eq!(alpha.num_vertices(), 0);
        assert_eq!(alpha.dimension(), None);

        let mut complex = SimplexMap::new();
        assert_eq!(alpha.build(&mut complex, f64::INFINITY, false).unwrap(), 0);
        assert_eq!(complex.num_simplices(), 0);
    }

    #[test]
    fn test_invalid_weights() {
        let points = obtuse_triangle();
        assert!(matches!(
            AlphaComplex::new(&points, &[1.0, 2.0], false, false),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            AlphaComplex::new(&points, &[1.0, -2.0, 0.0], true, false),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            AlphaComplex::new(&[], &[1.0], true, false),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_weighted_vertices_and_hidden_points() {
        let points = vec![
            point(&[0.0, 0.0]),
            point(&[4.0, 0.0]),
            point(&[2.0, 4.0]),
            point(&[2.0, 1.5]),
        ];
        let weights = [9.0, 9.0, 9.0, 0.0];
        let alpha = AlphaComplex::new(&points, &weights, false, false).unwrap();
        assert_eq!(alpha.num_vertices(), 3);
        assert!(alpha.get_point(3).is_err());
        assert_eq!(alpha.get_point(1).unwrap(), &points[1]);
        assert!(alpha.get_point(7).is_err());

        let mut complex = SimplexMap::new();
        alpha.build(&mut complex, f64::INFINITY, false).unwrap();
        assert_eq!(complex.filtration(&[0]), Some(-9.0));
        assert!(!complex.contains(&[3]));
        assert!(complex.is_monotone());

        let unweighted = AlphaComplex::new(&points, &[], false, false).unwrap();
        assert_eq!(unweighted.num_vertices(), 4);
    }

    #[test]
    fn test_nan_cutoff_rejected() {
        let alpha = AlphaComplex::new(&obtuse_triangle(), &[], true, false).unwrap();
        let mut complex = SimplexMap::new();
        assert!(alpha.build(&mut complex, f64::NAN, false).is_err());
        assert_eq!(complex.num_simplices(), 0);
    }

    #[test]
    fn test_empty_complex_ignores_cutoff() {
        let alpha = AlphaComplex::new(&[], &[], true, false).unwrap();
        let mut complex = SimplexMap::new();
        assert_eq!(alpha.build(&mut complex, f64::NAN, false).unwrap(), 0);
        assert_eq!(alpha.build(&mut complex, -1.0, true).unwrap(), 0);
        assert_eq!(complex.num_simplices(), 0);
    }
}
