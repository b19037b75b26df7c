//! Core traits for topocrate

/// A filtered simplicial complex that construction algorithms write into.
///
/// Simplices are given as vertex index lists in any order. The complex owns
/// closure: inserting a simplex also makes all of its faces present with a
/// filtration value no larger than the simplex's own.
pub trait FilteredComplex {
    /// Insert a simplex and its missing faces.
    ///
    /// Returns `true` if the simplex itself was not present before.
    fn insert(&mut self, simplex: &[usize], filtration: f64) -> bool;

    /// Total number of simplices, faces included
    fn num_simplices(&self) -> usize;

    /// Filtration value of a simplex, if present
    fn filtration(&self, simplex: &[usize]) -> Option<f64>;
}
