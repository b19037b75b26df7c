//! Geometric kernels for weighted points
//!
//! A [`Kernel`] bundles the predicates the regular triangulation needs
//! (affine independence, facet side and the power test) with the
//! constructions the alpha filtration needs (smallest orthosphere radius and
//! attachment). Every predicate works inside the affine hull of its
//! arguments, so a triangulation whose points span fewer dimensions than the
//! ambient space uses them unchanged. Two instantiations share the interface:
//! [`InexactKernel`] evaluates in `f64` with `nalgebra`, [`ExactKernel`] in
//! arbitrary precision rationals.
//!
//! The smallest orthosphere of a face `p_0..p_k` is centered at
//! `c = p_0 + Σ λ_j e_j` with `e_j = p_j - p_0`, where `λ` solves the Gram
//! system `Σ_j <e_i, e_j> λ_j = (|e_i|² - w_i + w_0) / 2`. Its squared radius
//! is `|c - p_0|² - w_0`.

use crate::exact::{self, RationalMatrix};
use nalgebra::{DMatrix, DVector};
use num_bigint::Sign;
use num_rational::BigRational;
use std::fmt::Debug;
use topocrate_core::{squared_distance, Error, PointD, Result};

/// A point with a non-negative weight (squared radius)
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPoint {
    pub position: PointD,
    pub weight: f64,
}

impl WeightedPoint {
    pub fn new(position: PointD, weight: f64) -> Self {
        Self { position, weight }
    }

    pub fn unweighted(position: PointD) -> Self {
        Self::new(position, 0.0)
    }

    pub fn dimension(&self) -> usize {
        self.position.len()
    }
}

/// Where a query lies relative to the hyperplane of a facet, seen from a
/// reference point off that hyperplane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Same side as the reference point
    Inner,
    /// On the hyperplane
    Boundary,
    /// Opposite side
    Outer,
}

impl Side {
    fn from_sign(sign: Sign) -> Self {
        match sign {
            Sign::Plus => Side::Inner,
            Sign::NoSign => Side::Boundary,
            Sign::Minus => Side::Outer,
        }
    }

    fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::NumericInstability(format!(
                "facet side determinant is {}",
                value
            )));
        }
        Ok(if value > 0.0 {
            Side::Inner
        } else if value < 0.0 {
            Side::Outer
        } else {
            Side::Boundary
        })
    }
}

/// Position of a weighted query point relative to an orthosphere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerTest {
    /// Negative power: the query conflicts with the sphere
    Inside,
    Boundary,
    Outside,
}

impl PowerTest {
    fn from_sign(sign: Sign) -> Self {
        match sign {
            Sign::Minus => PowerTest::Inside,
            Sign::NoSign => PowerTest::Boundary,
            Sign::Plus => PowerTest::Outside,
        }
    }

    fn from_f64(power: f64) -> Result<Self> {
        if !power.is_finite() {
            return Err(Error::NumericInstability(format!("power is {}", power)));
        }
        Ok(if power < 0.0 {
            PowerTest::Inside
        } else if power > 0.0 {
            PowerTest::Outside
        } else {
            PowerTest::Boundary
        })
    }
}

/// Predicates and constructions on weighted points
pub trait Kernel: Clone + Default + Debug {
    fn name(&self) -> &'static str;

    /// Whether `points` are affinely independent
    fn is_independent(&self, points: &[&WeightedPoint]) -> Result<bool>;

    /// Side of `query` with respect to the hyperplane of `facet` inside the
    /// affine hull of `facet` and `inner`.
    ///
    /// `facet` plus `inner` must be affinely independent and `query` must lie
    /// in their affine hull.
    fn side_of_facet(
        &self,
        facet: &[&WeightedPoint],
        inner: &WeightedPoint,
        query: &WeightedPoint,
    ) -> Result<Side>;

    /// Sign of the power of `query` with respect to the smallest orthosphere
    /// of `face`
    fn power_test(&self, face: &[&WeightedPoint], query: &WeightedPoint) -> Result<PowerTest>;

    /// Squared radius of the smallest sphere orthogonal to every point of `face`
    fn squared_orthoradius(&self, face: &[&WeightedPoint]) -> Result<f64>;

    /// Whether `query` has negative power with respect to the smallest
    /// orthosphere of `face`
    fn is_attached(&self, face: &[&WeightedPoint], query: &WeightedPoint) -> Result<bool> {
        Ok(self.power_test(face, query)? == PowerTest::Inside)
    }
}

fn check_face(face: &[&WeightedPoint]) -> Result<()> {
    match face.first() {
        Some(first) if face.len() <= first.dimension() + 1 => Ok(()),
        _ => Err(Error::invalid(format!(
            "a face needs between 1 and d + 1 points, got {}",
            face.len()
        ))),
    }
}

/// Orthosphere volume below this fraction of the edge-length product counts as flat
const RELATIVE_VOLUME_EPSILON: f64 = 1e-13;

/// Columns `p_j - p_0`
fn edge_matrix(points: &[&WeightedPoint]) -> DMatrix<f64> {
    let origin = &points[0].position;
    DMatrix::from_fn(origin.len(), points.len() - 1, |i, j| {
        points[j + 1].position[i] - origin[i]
    })
}

/// Floating point kernel built on `nalgebra` decompositions
#[derive(Debug, Clone, Copy, Default)]
pub struct InexactKernel;

impl InexactKernel {
    pub fn new() -> Self {
        Self
    }

    fn orthosphere(&self, face: &[&WeightedPoint]) -> Result<(PointD, f64)> {
        check_face(face)?;
        let origin = &face[0].position;
        let w0 = face[0].weight;
        let k = face.len() - 1;
        if k == 0 {
            return Ok((origin.clone(), 0.0 - w0));
        }

        let edges = edge_matrix(face);
        let rhs = DVector::from_fn(k, |j, _| {
            0.5 * (squared_distance(&face[j + 1].position, origin) - face[j + 1].weight + w0)
        });

        let gram = edges.transpose() * &edges;
        let lambda = gram.lu().solve(&rhs).ok_or_else(|| {
            Error::NumericInstability(format!("singular system for a {}-face", k))
        })?;
        let offset = &edges * lambda;
        let radius = offset.norm_squared() - w0;
        if !radius.is_finite() {
            return Err(Error::NumericInstability(format!(
                "orthoradius of a {}-face is {}",
                k, radius
            )));
        }

        Ok((origin + offset, radius))
    }
}

impl Kernel for InexactKernel {
    fn name(&self) -> &'static str {
        "inexact"
    }

    fn is_independent(&self, points: &[&WeightedPoint]) -> Result<bool> {
        let Some(first) = points.first() else {
            return Err(Error::invalid("independence test on an empty point set"));
        };
        let k = points.len() - 1;
        if k == 0 {
            return Ok(true);
        }
        if k > first.dimension() {
            return Ok(false);
        }

        let edges = edge_matrix(points);
        let scale: f64 = edges.column_iter().map(|column| column.norm()).product();
        let volume: f64 = edges.qr().r().diagonal().iter().map(|x| x.abs()).product();
        if !scale.is_finite() || !volume.is_finite() {
            return Err(Error::NumericInstability(format!(
                "volume of {} points overflows",
                points.len()
            )));
        }
        Ok(scale > 0.0 && volume > RELATIVE_VOLUME_EPSILON * scale)
    }

    fn side_of_facet(
        &self,
        facet: &[&WeightedPoint],
        inner: &WeightedPoint,
        query: &WeightedPoint,
    ) -> Result<Side> {
        if facet.is_empty() {
            return Err(Error::invalid("side test against an empty facet"));
        }
        let mut simplex = facet.to_vec();
        simplex.push(inner);
        check_face(&simplex)?;

        let k = facet.len();
        let edges = edge_matrix(&simplex);
        let offset = &query.position - &facet[0].position;
        let mut gram = edges.transpose() * &edges;
        let volume = gram.determinant();
        if !volume.is_finite() || volume <= 0.0 {
            return Err(Error::NumericInstability(format!(
                "side test against a flat {}-simplex",
                k
            )));
        }

        // Cramer's rule: the sign of the reference point's barycentric coordinate.
        let rhs = edges.transpose() * offset;
        gram.set_column(k - 1, &rhs);
        Side::from_f64(gram.determinant())
    }

    fn power_test(&self, face: &[&WeightedPoint], query: &WeightedPoint) -> Result<PowerTest> {
        let (center, radius) = self.orthosphere(face)?;
        PowerTest::from_f64(squared_distance(&query.position, &center) - query.weight - radius)
    }

    fn squared_orthoradius(&self, face: &[&WeightedPoint]) -> Result<f64> {
        self.orthosphere(face).map(|(_, radius)| radius)
    }
}

/// Exact kernel: inputs are converted to `BigRational` without loss and every
/// predicate is decided exactly
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactKernel;

struct RationalPoint {
    coords: Vec<BigRational>,
    weight: BigRational,
}

fn to_rational(point: &WeightedPoint) -> Result<RationalPoint> {
    Ok(RationalPoint {
        coords: point
            .position
            .iter()
            .map(|&x| exact::rational(x))
            .collect::<Result<_>>()?,
        weight: exact::rational(point.weight)?,
    })
}

fn to_rationals(points: &[&WeightedPoint]) -> Result<Vec<RationalPoint>> {
    points.iter().map(|p| to_rational(p)).collect()
}

fn zero() -> BigRational {
    BigRational::from_integer(0.into())
}

fn dot(u: &[BigRational], v: &[BigRational]) -> BigRational {
    u.iter().zip(v).fold(zero(), |acc, (a, b)| acc + a * b)
}

fn difference(p: &[BigRational], q: &[BigRational]) -> Vec<BigRational> {
    p.iter().zip(q).map(|(a, b)| a - b).collect()
}

fn rational_squared_distance(p: &[BigRational], q: &[BigRational]) -> BigRational {
    let diff = difference(p, q);
    dot(&diff, &diff)
}

fn rational_edges(points: &[RationalPoint]) -> Vec<Vec<BigRational>> {
    points[1..]
        .iter()
        .map(|p| difference(&p.coords, &points[0].coords))
        .collect()
}

fn gram(edges: &[Vec<BigRational>]) -> RationalMatrix {
    edges
        .iter()
        .map(|u| edges.iter().map(|v| dot(u, v)).collect())
        .collect()
}

impl ExactKernel {
    pub fn new() -> Self {
        Self
    }

    fn orthosphere(&self, face: &[&WeightedPoint]) -> Result<(Vec<BigRational>, BigRational)> {
        check_face(face)?;
        let points = to_rationals(face)?;
        let origin = &points[0];
        let k = points.len() - 1;
        if k == 0 {
            return Ok((origin.coords.clone(), -origin.weight.clone()));
        }

        let edges = rational_edges(&points);
        let half = BigRational::new(1.into(), 2.into());
        let rhs: Vec<BigRational> = points[1..]
            .iter()
            .map(|p| {
                (rational_squared_distance(&p.coords, &origin.coords) - &p.weight + &origin.weight)
                    * &half
            })
            .collect();

        let lambda = exact::solve(gram(&edges), rhs).ok_or_else(|| {
            Error::DegenerateInput(format!("affinely dependent {}-face", k))
        })?;

        let mut center = origin.coords.clone();
        for (edge, factor) in edges.iter().zip(&lambda) {
            for (c, e) in center.iter_mut().zip(edge) {
                *c = &*c + e * factor;
            }
        }
        let radius = rational_squared_distance(&center, &origin.coords) - &origin.weight;
        Ok((center, radius))
    }
}

impl Kernel for ExactKernel {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn is_independent(&self, points: &[&WeightedPoint]) -> Result<bool> {
        let Some(first) = points.first() else {
            return Err(Error::invalid("independence test on an empty point set"));
        };
        let k = points.len() - 1;
        if k == 0 {
            return Ok(true);
        }
        if k > first.dimension() {
            return Ok(false);
        }
        let edges = rational_edges(&to_rationals(points)?);
        Ok(exact::sign(&exact::determinant(gram(&edges))) != Sign::NoSign)
    }

    fn side_of_facet(
        &self,
        facet: &[&WeightedPoint],
        inner: &WeightedPoint,
        query: &WeightedPoint,
    ) -> Result<Side> {
        if facet.is_empty() {
            return Err(Error::invalid("side test against an empty facet"));
        }
        let mut simplex = facet.to_vec();
        simplex.push(inner);
        check_face(&simplex)?;

        let k = facet.len();
        let points = to_rationals(&simplex)?;
        let edges = rational_edges(&points);
        let mut matrix = gram(&edges);
        if exact::sign(&exact::determinant(matrix.clone())) == Sign::NoSign {
            return Err(Error::DegenerateInput(format!(
                "side test against a flat {}-simplex",
                k
            )));
        }

        let offset = difference(&to_rational(query)?.coords, &points[0].coords);
        for (row, edge) in matrix.iter_mut().zip(&edges) {
            row[k - 1] = dot(edge, &offset);
        }
        Ok(Side::from_sign(exact::sign(&exact::determinant(matrix))))
    }

    fn power_test(&self, face: &[&WeightedPoint], query: &WeightedPoint) -> Result<PowerTest> {
        let (center, radius) = self.orthosphere(face)?;
        let q = to_rational(query)?;
        let power = rational_squared_distance(&q.coords, &center) - &q.weight - radius;
        Ok(PowerTest::from_sign(exact::sign(&power)))
    }

    fn squared_orthoradius(&self, face: &[&WeightedPoint]) -> Result<f64> {
        let (_, radius) = self.orthosphere(face)?;
        exact::to_f64(&radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use topocrate_core::point;

    fn wp(coords: &[f64], weight: f64) -> WeightedPoint {
        WeightedPoint::new(point(coords), weight)
    }

    fn refs(points: &[WeightedPoint]) -> Vec<&WeightedPoint> {
        points.iter().collect()
    }

    fn check_independence<K: Kernel>(kernel: K) {
        let triangle = [wp(&[0.0, 0.0], 0.0), wp(&[1.0, 0.0], 0.0), wp(&[0.0, 1.0], 0.0)];
        let flat = [wp(&[0.0, 0.0], 0.0), wp(&[1.0, 1.0], 0.0), wp(&[2.0, 2.0], 0.0)];
        let thin = [wp(&[0.0, 0.0], 0.0), wp(&[2.0, 0.0], 0.0), wp(&[1.0, 1e-8], 0.0)];
        assert!(kernel.is_independent(&refs(&triangle)).unwrap());
        assert!(kernel.is_independent(&refs(&thin)).unwrap());
        assert!(!kernel.is_independent(&refs(&flat)).unwrap());
        assert!(kernel.is_independent(&refs(&triangle[..1])).unwrap());

        // A segment in 3D and too many points for the plane.
        let segment = [wp(&[0.0, 0.0, 0.0], 0.0), wp(&[0.0, 0.0, 1.0], 0.0)];
        assert!(kernel.is_independent(&refs(&segment)).unwrap());
        let four = [
            wp(&[0.0, 0.0], 0.0),
            wp(&[1.0, 0.0], 0.0),
            wp(&[0.0, 1.0], 0.0),
            wp(&[1.0, 1.0], 0.0),
        ];
        assert!(!kernel.is_independent(&refs(&four)).unwrap());
        assert!(kernel.is_independent(&[]).is_err());
    }

    fn check_side_of_facet<K: Kernel>(kernel: K) {
        let facet = [wp(&[0.0, 0.0], 0.0), wp(&[2.0, 0.0], 0.0)];
        let facet = refs(&facet);
        let inner = wp(&[1.0, 1.0], 0.0);
        let side = |coords: &[f64]| kernel.side_of_facet(&facet, &inner, &wp(coords, 0.0)).unwrap();
        assert_eq!(side(&[5.0, 0.5]), Side::Inner);
        assert_eq!(side(&[-3.0, 0.0]), Side::Boundary);
        assert_eq!(side(&[1.0, -1e-9]), Side::Outer);

        // On a line embedded in the plane.
        let point_facet = [wp(&[1.0, 1.0], 0.0)];
        let inner = wp(&[0.0, 0.0], 0.0);
        assert_eq!(
            kernel
                .side_of_facet(&refs(&point_facet), &inner, &wp(&[2.0, 2.0], 0.0))
                .unwrap(),
            Side::Outer
        );
        assert!(kernel
            .side_of_facet(&refs(&point_facet), &wp(&[1.0, 1.0], 0.0), &inner)
            .is_err());
    }

    fn check_power_test<K: Kernel>(kernel: K) {
        for triangle in [
            vec![wp(&[1.0, 0.0], 0.0), wp(&[0.0, 1.0], 0.0), wp(&[-1.0, 0.0], 0.0)],
            vec![wp(&[-1.0, 0.0], 0.0), wp(&[0.0, 1.0], 0.0), wp(&[1.0, 0.0], 0.0)],
        ] {
            let triangle = refs(&triangle);
            let test = |coords: &[f64], weight: f64| {
                kernel.power_test(&triangle, &wp(coords, weight)).unwrap()
            };
            assert_eq!(test(&[0.1, -0.2], 0.0), PowerTest::Inside);
            assert_eq!(test(&[2.0, 2.0], 0.0), PowerTest::Outside);
            // Weight shrinks the query's power: a heavy point far away conflicts.
            assert_eq!(test(&[2.0, 0.0], 4.0), PowerTest::Inside);
        }

        let segment = [wp(&[0.0], 0.0), wp(&[2.0], 0.0)];
        let segment = refs(&segment);
        assert_eq!(kernel.power_test(&segment, &wp(&[1.5], 0.0)).unwrap(), PowerTest::Inside);
        assert_eq!(kernel.power_test(&segment, &wp(&[-0.5], 0.0)).unwrap(), PowerTest::Outside);

        // A vertex against a coincident heavier point.
        let vertex = [wp(&[1.0, 1.0], 1.0)];
        assert_eq!(
            kernel.power_test(&refs(&vertex), &wp(&[1.0, 1.0], 2.0)).unwrap(),
            PowerTest::Inside
        );
        assert_eq!(
            kernel.power_test(&refs(&vertex), &wp(&[1.0, 1.0], 0.5)).unwrap(),
            PowerTest::Outside
        );
    }

    fn check_orthoradius<K: Kernel>(kernel: K) {
        let edge = [wp(&[0.0, 0.0], 0.0), wp(&[2.0, 0.0], 0.0)];
        assert_relative_eq!(kernel.squared_orthoradius(&refs(&edge)).unwrap(), 1.0);

        let triangle = [wp(&[0.0, 0.0], 0.0), wp(&[2.0, 0.0], 0.0), wp(&[0.0, 2.0], 0.0)];
        assert_relative_eq!(kernel.squared_orthoradius(&refs(&triangle)).unwrap(), 2.0);

        let weighted_edge = [wp(&[0.0, 0.0], 1.0), wp(&[2.0, 0.0], 1.0)];
        assert_relative_eq!(
            kernel.squared_orthoradius(&refs(&weighted_edge)).unwrap(),
            0.0,
            epsilon = 1e-12
        );

        let vertex = [wp(&[3.0, 1.0], 0.5)];
        assert_eq!(kernel.squared_orthoradius(&refs(&vertex)).unwrap(), -0.5);

        let unweighted_vertex = [wp(&[3.0, 1.0], 0.0)];
        let value = kernel.squared_orthoradius(&refs(&unweighted_vertex)).unwrap();
        assert!(value == 0.0 && value.is_sign_positive());

        // An edge in 3D: the orthosphere center stays on the edge.
        let edge_3d = [wp(&[0.0, 0.0, 0.0], 0.0), wp(&[0.0, 0.0, 4.0], 0.0)];
        assert_relative_eq!(kernel.squared_orthoradius(&refs(&edge_3d)).unwrap(), 4.0);
    }

    fn check_attached<K: Kernel>(kernel: K) {
        let edge = [wp(&[0.0, 0.0], 0.0), wp(&[2.0, 0.0], 0.0)];
        let edge = refs(&edge);
        assert!(kernel.is_attached(&edge, &wp(&[1.0, 0.5], 0.0)).unwrap());
        assert!(!kernel.is_attached(&edge, &wp(&[1.0, 3.0], 0.0)).unwrap());
        assert!(kernel.is_attached(&edge, &wp(&[1.0, 3.0], 10.0)).unwrap());
    }

    #[test]
    fn test_inexact_kernel() {
        check_independence(InexactKernel::new());
        check_side_of_facet(InexactKernel::new());
        check_power_test(InexactKernel::new());
        check_orthoradius(InexactKernel::new());
        check_attached(InexactKernel::new());
    }

    #[test]
    fn test_exact_kernel() {
        check_independence(ExactKernel::new());
        check_side_of_facet(ExactKernel::new());
        check_power_test(ExactKernel::new());
        check_orthoradius(ExactKernel::new());
        check_attached(ExactKernel::new());
    }

    #[test]
    fn test_exact_boundary_cases() {
        let kernel = ExactKernel::new();
        let triangle = [wp(&[1.0, 0.0], 0.0), wp(&[0.0, 1.0], 0.0), wp(&[-1.0, 0.0], 0.0)];
        assert_eq!(
            kernel.power_test(&refs(&triangle), &wp(&[0.0, -1.0], 0.0)).unwrap(),
            PowerTest::Boundary
        );

        let collinear = [wp(&[0.0, 0.0], 0.0), wp(&[1.0, 0.0], 0.0), wp(&[2.0, 0.0], 0.0)];
        assert!(matches!(
            kernel.squared_orthoradius(&refs(&collinear)),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(
            kernel.power_test(&refs(&collinear), &wp(&[0.0, 1.0], 0.0)),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_inexact_flat_face_fails() {
        let kernel = InexactKernel::new();
        let collinear = [wp(&[0.0, 0.0], 0.0), wp(&[1.0, 0.0], 0.0), wp(&[2.0, 0.0], 0.0)];
        assert!(kernel
            .power_test(&refs(&collinear), &wp(&[0.2, 0.2], 0.0))
            .is_err());
    }

    #[test]
    fn test_exact_kernel_reports_non_finite_input() {
        let kernel = ExactKernel::new();
        let segment = [wp(&[0.0, 0.0], 0.0), wp(&[1.0, 0.0], 0.0)];
        assert!(matches!(
            kernel.power_test(&refs(&segment), &wp(&[f64::NAN, 0.0], 0.0)),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            kernel.is_independent(&[&segment[0], &wp(&[f64::INFINITY, 1.0], 0.0)]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            kernel.squared_orthoradius(&[&segment[0], &wp(&[1.0, 1.0], f64::NAN)]),
            Err(Error::InvalidParameter(_))
        ));
    }
}
