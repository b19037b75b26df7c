//! Fraction-exact linear algebra over `BigRational`
//!
//! Every finite `f64` converts to a rational without loss, so determinants and
//! solves here are exact; results are rounded to `f64` once, by the caller.

use num_bigint::Sign;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use topocrate_core::{Error, Result};

pub type RationalMatrix = Vec<Vec<BigRational>>;

/// Convert a finite `f64` to the rational with the same value
pub fn rational(value: f64) -> Result<BigRational> {
    BigRational::from_float(value)
        .ok_or_else(|| Error::invalid(format!("coordinate {} is not finite", value)))
}

/// Round a rational to the nearest representable `f64`
pub fn to_f64(value: &BigRational) -> Result<f64> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::NumericInstability("exact value overflows f64".to_string()))
}

pub fn sign(value: &BigRational) -> Sign {
    if value.is_zero() {
        Sign::NoSign
    } else if value.numer().sign() == value.denom().sign() {
        Sign::Plus
    } else {
        Sign::Minus
    }
}

fn pivot_row(matrix: &RationalMatrix, col: usize) -> Option<usize> {
    (col..matrix.len()).find(|&row| !matrix[row][col].is_zero())
}

/// Determinant of a square matrix by Gaussian elimination
pub fn determinant(mut matrix: RationalMatrix) -> BigRational {
    let n = matrix.len();
    let mut det = BigRational::one();

    for col in 0..n {
        let Some(pivot) = pivot_row(&matrix, col) else {
            return BigRational::zero();
        };
        if pivot != col {
            matrix.swap(pivot, col);
            det = -det;
        }

        let diagonal = matrix[col][col].clone();
        det = det * &diagonal;

        for row in col + 1..n {
            if matrix[row][col].is_zero() {
                continue;
            }
            let factor = &matrix[row][col] / &diagonal;
            for c in col..n {
                let delta = &factor * &matrix[col][c];
                matrix[row][c] = &matrix[row][c] - delta;
            }
        }
    }

    det
}

/// Solve `matrix * x = rhs`, `None` when the matrix is singular
pub fn solve(mut matrix: RationalMatrix, mut rhs: Vec<BigRational>) -> Option<Vec<BigRational>> {
    let n = matrix.len();

    for col in 0..n {
        let pivot = pivot_row(&matrix, col)?;
        matrix.swap(pivot, col);
        rhs.swap(pivot, col);

        let diagonal = matrix[col][col].clone();
        for row in 0..n {
            if row == col || matrix[row][col].is_zero() {
                continue;
            }
            let factor = &matrix[row][col] / &diagonal;
            for c in col..n {
                let delta = &factor * &matrix[col][c];
                matrix[row][c] = &matrix[row][c] - delta;
            }
            let delta = &factor * &rhs[col];
            rhs[row] = &rhs[row] - delta;
        }
    }

    Some(
        rhs.iter()
            .zip(matrix.iter().enumerate())
            .map(|(value, (i, row))| value / &row[i])
            .collect(),
    )
}
