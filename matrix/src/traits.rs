use semiring::{Result, Semiring};

/// The capabilities shared by every matrix storage (dense or sparse).
///
/// Algorithms that only need to walk the finite entries of a matrix
/// (e.g., [`howard`](crate::howard)) are written against this trait, so
/// they work with any storage.
pub trait MatrixStorage<T: Semiring> {
    /// Returns a tuple with number of rows and columns
    fn size(&self) -> (usize, usize);

    /// Gets an element from the matrix
    fn get(&self, row: usize, col: usize) -> Result<T>;

    /// Sets an element into the matrix
    fn set(&mut self, row: usize, col: usize, v: T) -> Result<T>;

    /// Calls `f(row, col, value)` for every element that is not $`\varepsilon`$,
    /// row by row and, within a row, in increasing column order.
    fn for_each_non_zero<F: FnMut(usize, usize, T)>(&self, f: F);
}
