//! Incremental regular triangulation in arbitrary dimension
//!
//! Bowyer–Watson under the power test: every point is located by scanning the
//! cells it conflicts with, that cavity is removed, and its boundary facets are
//! coned to the new point. The convex hull is closed off by a symbolic vertex
//! at infinity: an infinite cell joins it to a hull facet and conflicts with
//! the points that see that facet from outside. A point off the current affine
//! hull raises the dimension of the triangulation by one. Unweighted input
//! gives the Delaunay triangulation.

use crate::kernel::{Kernel, PowerTest, Side, WeightedPoint};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use topocrate_core::{common_dimension, Error, PointD, Result};
use tracing::{debug, warn};

/// Check points and optional weights before any geometric work.
///
/// Returns the common dimension, `None` for an empty point set.
pub fn validate_weighted_input(points: &[PointD], weights: Option<&[f64]>) -> Result<Option<usize>> {
    let dimension = common_dimension(points)?;
    if let Some(weights) = weights {
        if weights.len() != points.len() {
            return Err(Error::invalid(format!(
                "{} weights given for {} points",
                weights.len(),
                points.len()
            )));
        }
        if let Some((index, weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(Error::invalid(format!(
                "weight {} of point {} must be finite and non-negative",
                weight, index
            )));
        }
    }
    Ok(dimension)
}

/// Index of the symbolic vertex at infinity
const INFINITE: usize = usize::MAX;

/// A maximal cell, vertices sorted ascending so that [`INFINITE`] comes last
#[derive(Debug, Clone, PartialEq)]
struct Cell {
    vertices: Vec<usize>,
    /// For infinite cells, a vertex strictly inside the hull facet's halfspace
    inner: Option<usize>,
}

impl Cell {
    fn is_infinite(&self) -> bool {
        self.vertices.last() == Some(&INFINITE)
    }

    /// Vertices other than the one at infinity
    fn finite(&self) -> &[usize] {
        if self.is_infinite() {
            &self.vertices[..self.vertices.len() - 1]
        } else {
            &self.vertices
        }
    }
}

fn sorted_with(vertices: &[usize], extra: usize) -> Vec<usize> {
    let mut result = Vec::with_capacity(vertices.len() + 1);
    result.extend_from_slice(vertices);
    result.push(extra);
    result.sort_unstable();
    result
}

/// Regular (weighted Delaunay) triangulation of a point set
#[derive(Debug, Clone)]
pub struct RegularTriangulation<K: Kernel> {
    kernel: K,
    points: Vec<WeightedPoint>,
    ambient_dimension: usize,
    /// Affine dimension of the inserted points, `None` before the first one
    dimension: Option<usize>,
    /// Affinely independent inserted points spanning the current affine hull
    frame: Vec<usize>,
    cells: Vec<Cell>,
    is_vertex: Vec<bool>,
}

impl<K: Kernel> RegularTriangulation<K> {
    /// Triangulate `points`, weighted when `weights` is given.
    ///
    /// Points that conflict with no cell when inserted, or whose cells are all
    /// removed by a later insertion, are hidden and do not appear as vertices.
    pub fn new(points: &[PointD], weights: Option<&[f64]>) -> Result<Self> {
        let ambient_dimension = validate_weighted_input(points, weights)?.unwrap_or(0);

        let mut triangulation = Self {
            kernel: K::default(),
            points: points
                .iter()
                .enumerate()
                .map(|(i, p)| WeightedPoint::new(p.clone(), weights.map_or(0.0, |w| w[i])))
                .collect(),
            ambient_dimension,
            dimension: None,
            frame: Vec::new(),
            cells: Vec::new(),
            is_vertex: vec![false; points.len()],
        };

        let mut hidden = 0;
        for index in 0..points.len() {
            if !triangulation.insert(index)? {
                hidden += 1;
            }
        }

        for cell in &triangulation.cells {
            for &v in cell.finite() {
                triangulation.is_vertex[v] = true;
            }
        }

        debug!(
            kernel = triangulation.kernel.name(),
            points = points.len(),
            hidden_on_insert = hidden,
            vertices = triangulation.num_vertices(),
            cells = triangulation.cells().count(),
            dimension = ?triangulation.dimension,
            "regular triangulation built"
        );

        Ok(triangulation)
    }

    /// Insert one input point; `false` if it conflicts with no cell
    fn insert(&mut self, index: usize) -> Result<bool> {
        let Some(dimension) = self.dimension else {
            self.dimension = Some(0);
            self.frame.push(index);
            self.cells.push(Cell {
                vertices: vec![index],
                inner: None,
            });
            self.cells.push(Cell {
                vertices: vec![INFINITE],
                inner: None,
            });
            return Ok(true);
        };

        if dimension < self.ambient_dimension {
            let mut spanning = self.frame.clone();
            spanning.push(index);
            if self.kernel.is_independent(&self.face(&spanning))? {
                self.raise_dimension(index)?;
                return Ok(true);
            }
        }

        let mut conflicts = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            conflicts.push(self.in_conflict(cell, dimension, index)?);
        }
        if !conflicts.iter().any(|&c| c) {
            return Ok(false);
        }

        // Facets seen once in the cavity form its boundary.
        let mut facets: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
        for (cell, _) in self.cells.iter().zip(&conflicts).filter(|(_, &c)| c) {
            for skip in 0..cell.vertices.len() {
                let facet: Vec<usize> = cell
                    .vertices
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != skip)
                    .map(|(_, &v)| v)
                    .collect();
                *facets.entry(facet).or_insert(0) += 1;
            }
        }

        let mut cells: Vec<Cell> = std::mem::take(&mut self.cells)
            .into_iter()
            .zip(conflicts)
            .filter(|(_, conflict)| !conflict)
            .map(|(cell, _)| cell)
            .collect();

        for (facet, count) in facets {
            if count != 1 {
                continue;
            }
            let vertices = sorted_with(&facet, index);
            let mut cell = Cell {
                vertices,
                inner: None,
            };
            if !self.kernel.is_independent(&self.face(cell.finite()))? {
                warn!(point = index, cell = ?cell.vertices, "skipping flat cell");
                continue;
            }
            if cell.is_infinite() {
                cell.inner = self.inner_vertex(cell.finite())?;
                if cell.inner.is_none() {
                    warn!(point = index, cell = ?cell.vertices, "skipping unanchored hull cell");
                    continue;
                }
            }
            cells.push(cell);
        }

        self.cells = cells;
        Ok(true)
    }

    /// Whether inserting `index` destroys `cell`
    fn in_conflict(&self, cell: &Cell, dimension: usize, index: usize) -> Result<bool> {
        let query = &self.points[index];
        if !cell.is_infinite() {
            let side = self.kernel.power_test(&self.face(&cell.vertices), query)?;
            return Ok(side == PowerTest::Inside);
        }

        let (Some(inner), true) = (cell.inner, dimension > 0) else {
            return Ok(false);
        };
        let facet = self.face(cell.finite());
        match self.kernel.side_of_facet(&facet, &self.points[inner], query)? {
            Side::Outer => Ok(true),
            Side::Boundary => Ok(self.kernel.power_test(&facet, query)? == PowerTest::Inside),
            Side::Inner => Ok(false),
        }
    }

    /// A frame vertex off the hyperplane of a hull facet
    fn inner_vertex(&self, facet: &[usize]) -> Result<Option<usize>> {
        for &v in &self.frame {
            if facet.contains(&v) {
                continue;
            }
            let candidate = sorted_with(facet, v);
            if self.kernel.is_independent(&self.face(&candidate))? {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    /// Cone every cell to a point off the current affine hull
    fn raise_dimension(&mut self, index: usize) -> Result<()> {
        let old = std::mem::take(&mut self.cells);
        self.frame.push(index);
        self.dimension = self.dimension.map(|d| d + 1);

        let mut cells = Vec::with_capacity(2 * old.len());
        for cell in &old {
            let mut raised = Cell {
                vertices: sorted_with(&cell.vertices, index),
                inner: None,
            };
            if raised.is_infinite() {
                raised.inner = self.inner_vertex(raised.finite())?;
                if raised.inner.is_none() {
                    return Err(Error::NumericInstability(format!(
                        "no frame vertex off hull facet {:?}",
                        raised.finite()
                    )));
                }
            } else {
                // The old affine hull becomes a hull facet facing away from the new point.
                cells.push(Cell {
                    vertices: sorted_with(&cell.vertices, INFINITE),
                    inner: Some(index),
                });
            }
            cells.push(raised);
        }

        self.cells = cells;
        Ok(())
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Ambient dimension of the input, 0 when empty
    pub fn ambient_dimension(&self) -> usize {
        self.ambient_dimension
    }

    /// Affine dimension of the triangulation, `None` when there are no vertices
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn num_input_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_vertices(&self) -> usize {
        self.is_vertex.iter().filter(|&&v| v).count()
    }

    pub fn is_vertex(&self, index: usize) -> bool {
        self.is_vertex.get(index).copied().unwrap_or(false)
    }

    /// Input indices that are vertices, ascending
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.points.len()).filter(move |&i| self.is_vertex[i])
    }

    /// Maximal finite cells, each sorted ascending
    pub fn cells(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.cells
            .iter()
            .filter(|cell| !cell.is_infinite())
            .map(|cell| cell.vertices.as_slice())
    }

    /// Weighted input point, `None` when out of range
    pub fn point(&self, index: usize) -> Option<&WeightedPoint> {
        self.points.get(index)
    }

    pub(crate) fn face(&self, vertices: &[usize]) -> Vec<&WeightedPoint> {
        vertices.iter().map(|&v| &self.points[v]).collect()
    }

    /// Every simplex of the triangulation, grouped by dimension, each sorted
    /// ascending and the groups in lexicographic order
    pub fn simplices(&self) -> Vec<Vec<Vec<usize>>> {
        let Some(dimension) = self.dimension else {
            return Vec::new();
        };
        let mut layers: Vec<BTreeSet<Vec<usize>>> = vec![BTreeSet::new(); dimension + 1];
        for cell in self.cells() {
            for size in 1..=cell.len() {
                for face in cell.iter().copied().combinations(size) {
                    layers[size - 1].insert(face);
                }
            }
        }

        layers
            .into_iter()
            .map(|layer| layer.into_iter().collect())
            .collect()
    }
}
