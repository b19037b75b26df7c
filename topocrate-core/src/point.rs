//! Point types and related functionality

use nalgebra::DVector;

use crate::error::{Error, Result};

/// A point in a d-dimensional Euclidean space with double precision coordinates
pub type PointD = DVector<f64>;

/// Build a point from its coordinates
pub fn point(coords: &[f64]) -> PointD {
    PointD::from_column_slice(coords)
}

/// Squared Euclidean distance between two points of the same dimension.
///
/// No square root is taken; every distance comparison in the workspace works
/// on squared values.
pub fn squared_distance(p: &PointD, q: &PointD) -> f64 {
    p.iter()
        .zip(q.iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}

/// Check that a point set shares one ambient dimension and has finite coordinates.
///
/// Returns the ambient dimension, or `None` for an empty set.
pub fn common_dimension(points: &[PointD]) -> Result<Option<usize>> {
    let Some(first) = points.first() else {
        return Ok(None);
    };

    let dimension = first.len();
    if dimension == 0 {
        return Err(Error::invalid("points must have at least one coordinate"));
    }

    for (index, p) in points.iter().enumerate() {
        if p.len() != dimension {
            return Err(Error::invalid(format!(
                "point {} has dimension {}, expected {}",
                index,
                p.len(),
                dimension
            )));
        }
        if p.iter().any(|c| !c.is_finite()) {
            return Err(Error::invalid(format!(
                "point {} has a non-finite coordinate",
                index
            )));
        }
    }

    Ok(Some(dimension))
}
