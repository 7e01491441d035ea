use crate::generic_matrix::GenericMatrix;
use crate::traits::MatrixStorage;
use semiring::{Result, Semiring, SemiringError};
use serde::{Deserialize, Serialize};

/// A compact matrix that only stores the elements that are not $`\varepsilon`$,
/// in compressed rows.
///
/// Deserializing checks the row structure and rejects stored $`\varepsilon`$
/// elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSparseMatrix<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SparseMatrix<T: Semiring> {
    pub(crate) ncols: usize,
    pub(crate) nrows: usize,

    // The elements of row `r` live in `row_starts[r]..row_starts[r+1]`
    // of `cols` and `values`, sorted by column.
    row_starts: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<T>,
}

impl<T: Semiring> Default for SparseMatrix<T> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// The serialized form of a [`SparseMatrix`], before checking it
#[derive(Deserialize)]
struct RawSparseMatrix<T> {
    ncols: usize,
    nrows: usize,
    row_starts: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<T>,
}

impl<T: Semiring> TryFrom<RawSparseMatrix<T>> for SparseMatrix<T> {
    type Error = SemiringError;
    fn try_from(raw: RawSparseMatrix<T>) -> Result<Self> {
        let nnz = raw.values.len();
        let structure_error = SemiringError::DimensionMismatch {
            operation: "SparseMatrix (row_starts)",
            left: (raw.nrows + 1, nnz),
            right: (raw.row_starts.len(), raw.cols.len()),
        };
        if raw.row_starts.len() != raw.nrows + 1 || raw.cols.len() != nnz {
            return Err(structure_error);
        }
        let well_formed = raw.row_starts[0] == 0
            && raw.row_starts[raw.nrows] == nnz
            && raw.row_starts.windows(2).all(|w| w[0] <= w[1]);
        if !well_formed {
            return Err(structure_error);
        }
        if let Some(v) = raw.values.iter().find(|v| v.is_zero()) {
            return Err(SemiringError::InvalidValue { value: v.value() });
        }

        let mut triplets = Vec::with_capacity(nnz);
        for r in 0..raw.nrows {
            for i in raw.row_starts[r]..raw.row_starts[r + 1] {
                triplets.push((r, raw.cols[i], raw.values[i]));
            }
        }
        Self::from_triplets(raw.nrows, raw.ncols, &triplets)
    }
}

impl<T: Semiring> SparseMatrix<T> {
    /// Creates a `SparseMatrix` of `nrows` and `ncols` full of $`\varepsilon`$
    #[must_use]
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            row_starts: vec![0; nrows + 1],
            cols: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates the semiring identity matrix of size NxN
    #[must_use]
    pub fn eye(n: usize) -> Self {
        Self {
            nrows: n,
            ncols: n,
            row_starts: (0..=n).collect(),
            cols: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }

    /// Builds a `SparseMatrix` from `(row, col, value)` triplets. Elements
    /// given more than once are combined with $`\oplus`$, and $`\varepsilon`$
    /// elements are skipped.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, T)]) -> Result<Self> {
        let mut sorted: Vec<(usize, usize, T)> = Vec::with_capacity(triplets.len());
        for &(row, col, v) in triplets {
            if row >= nrows || col >= ncols {
                return Err(SemiringError::IndexOutOfBounds {
                    row,
                    col,
                    nrows,
                    ncols,
                });
            }
            if !v.is_zero() {
                sorted.push((row, col, v));
            }
        }
        sorted.sort_by_key(|(r, c, _)| (*r, *c));

        let mut ret = Self::new(nrows, ncols);
        for (row, col, v) in sorted {
            let last = ret.cols.len();
            let same_as_last = last > ret.row_starts[row] && ret.cols[last - 1] == col;
            if same_as_last {
                ret.values[last - 1] = ret.values[last - 1].oplus(v);
            } else {
                ret.cols.push(col);
                ret.values.push(v);
                ret.row_starts[row + 1..].iter_mut().for_each(|s| *s += 1);
            }
        }
        Ok(ret)
    }

    /// Builds a `SparseMatrix` with the elements of a dense matrix
    /// that are not $`\varepsilon`$
    #[must_use]
    pub fn from_dense(dense: &GenericMatrix<T>) -> Self {
        let mut ret = Self::new(dense.nrows, dense.ncols);
        for (r, row) in dense.rows().enumerate() {
            for (c, v) in row.iter().enumerate() {
                if !v.is_zero() {
                    ret.cols.push(c);
                    ret.values.push(*v);
                }
            }
            ret.row_starts[r + 1] = ret.cols.len();
        }
        ret
    }

    /// Expands the matrix into a dense one
    #[must_use]
    pub fn to_dense(&self) -> GenericMatrix<T> {
        let mut ret: GenericMatrix<T> = GenericMatrix::zeros(self.nrows, self.ncols);
        self.for_each_non_zero(|r, c, v| {
            let i = ret.index(r, c);
            ret.data[i] = v;
        });
        ret
    }

    /// Returns a tuple with number of rows and columns
    pub fn size(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// The number of stored (i.e., not $`\varepsilon`$) elements
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        self.row_starts[row]..self.row_starts[row + 1]
    }

    /// Finds the position of `(row, col)` in the storage: `Ok` if it is
    /// stored, `Err` with the insertion point if it is not.
    fn locate(&self, row: usize, col: usize) -> std::result::Result<usize, usize> {
        let range = self.row_range(row);
        let start = range.start;
        self.cols[range]
            .binary_search(&col)
            .map(|i| start + i)
            .map_err(|i| start + i)
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row < self.nrows && col < self.ncols {
            Ok(())
        } else {
            Err(SemiringError::IndexOutOfBounds {
                row,
                col,
                nrows: self.nrows,
                ncols: self.ncols,
            })
        }
    }

    /// Gets an element from the matrix
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_bounds(row, col)?;
        match self.locate(row, col) {
            Ok(i) => Ok(self.values[i]),
            Err(_) => Ok(T::zero()),
        }
    }

    /// Sets an element into the matrix. Setting $`\varepsilon`$ removes the
    /// element from the storage.
    pub fn set(&mut self, row: usize, col: usize, v: T) -> Result<T> {
        self.check_bounds(row, col)?;
        match (self.locate(row, col), v.is_zero()) {
            (Ok(i), false) => self.values[i] = v,
            (Ok(i), true) => {
                self.cols.remove(i);
                self.values.remove(i);
                self.row_starts[row + 1..].iter_mut().for_each(|s| *s -= 1);
            }
            (Err(i), false) => {
                self.cols.insert(i, col);
                self.values.insert(i, v);
                self.row_starts[row + 1..].iter_mut().for_each(|s| *s += 1);
            }
            (Err(_), true) => {}
        }
        Ok(v)
    }

    /// Iterates the stored elements as `(row, col, value)`
    pub fn iter_non_zero(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.nrows).flat_map(move |r| {
            self.row_range(r)
                .map(move |i| (r, self.cols[i], self.values[i]))
        })
    }

    /// Adds (i.e., $`\oplus`$) `self` and `other`, merging their rows
    pub fn add(&self, other: &SparseMatrix<T>) -> Result<SparseMatrix<T>> {
        if self.size() != other.size() {
            return Err(SemiringError::DimensionMismatch {
                operation: "add",
                left: self.size(),
                right: other.size(),
            });
        }
        let mut ret = Self::new(self.nrows, self.ncols);
        for r in 0..self.nrows {
            let mut a = self.row_range(r).peekable();
            let mut b = other.row_range(r).peekable();
            loop {
                let next = match (a.peek(), b.peek()) {
                    (Some(&i), Some(&j)) => {
                        if self.cols[i] < other.cols[j] {
                            a.next();
                            (self.cols[i], self.values[i])
                        } else if other.cols[j] < self.cols[i] {
                            b.next();
                            (other.cols[j], other.values[j])
                        } else {
                            a.next();
                            b.next();
                            (self.cols[i], self.values[i].oplus(other.values[j]))
                        }
                    }
                    (Some(&i), None) => {
                        a.next();
                        (self.cols[i], self.values[i])
                    }
                    (None, Some(&j)) => {
                        b.next();
                        (other.cols[j], other.values[j])
                    }
                    (None, None) => break,
                };
                ret.cols.push(next.0);
                ret.values.push(next.1);
            }
            ret.row_starts[r + 1] = ret.cols.len();
        }
        Ok(ret)
    }

    /// Multiplies (i.e., $`\otimes`$) `self` by `other`. Only the stored
    /// elements take part in the product.
    pub fn prod(&self, other: &SparseMatrix<T>) -> Result<SparseMatrix<T>> {
        if self.ncols != other.nrows {
            return Err(SemiringError::DimensionMismatch {
                operation: "prod",
                left: self.size(),
                right: other.size(),
            });
        }
        let mut ret = Self::new(self.nrows, other.ncols);
        let mut acc = vec![T::zero(); other.ncols];
        let mut touched: Vec<usize> = Vec::new();
        for r in 0..self.nrows {
            for i in self.row_range(r) {
                let k = self.cols[i];
                let a = self.values[i];
                for j in other.row_range(k) {
                    let c = other.cols[j];
                    if acc[c].is_zero() {
                        touched.push(c);
                    }
                    acc[c] = acc[c].oplus(a.otimes(other.values[j]));
                }
            }
            touched.sort_unstable();
            for c in touched.drain(..) {
                // a product of two stored elements is never epsilon
                if !acc[c].is_zero() {
                    ret.cols.push(c);
                    ret.values.push(acc[c]);
                }
                acc[c] = T::zero();
            }
            ret.row_starts[r + 1] = ret.cols.len();
        }
        Ok(ret)
    }

    /// Multiplies a sparse `self` by a dense `other`, returning a dense matrix
    pub fn prod_dense(&self, other: &GenericMatrix<T>) -> Result<GenericMatrix<T>> {
        if self.ncols != other.nrows {
            return Err(SemiringError::DimensionMismatch {
                operation: "prod",
                left: self.size(),
                right: other.size(),
            });
        }
        let mut ret: GenericMatrix<T> = GenericMatrix::zeros(self.nrows, other.ncols);
        self.for_each_non_zero(|r, k, a| {
            for c in 0..other.ncols {
                let i = ret.index(r, c);
                let b = other.data[other.index(k, c)];
                ret.data[i] = ret.data[i].oplus(a.otimes(b));
            }
        });
        Ok(ret)
    }

    /// Multiplies a dense `left` by a sparse `self`, returning a dense matrix
    pub fn dense_prod(&self, left: &GenericMatrix<T>) -> Result<GenericMatrix<T>> {
        if left.ncols != self.nrows {
            return Err(SemiringError::DimensionMismatch {
                operation: "prod",
                left: left.size(),
                right: self.size(),
            });
        }
        let mut ret: GenericMatrix<T> = GenericMatrix::zeros(left.nrows, self.ncols);
        for r in 0..left.nrows {
            self.for_each_non_zero(|k, c, b| {
                let a = left.data[left.index(r, k)];
                let i = ret.index(r, c);
                ret.data[i] = ret.data[i].oplus(a.otimes(b));
            });
        }
        Ok(ret)
    }

    /// Returns $`s \otimes a_{ij}`$ for every element. Multiplying by
    /// $`\varepsilon`$ gives an empty matrix.
    #[must_use]
    pub fn scalar_mul(&self, s: T) -> SparseMatrix<T> {
        if s.is_zero() {
            return Self::new(self.nrows, self.ncols);
        }
        let mut ret = self.clone();
        ret.values.iter_mut().for_each(|v| *v = v.otimes(s));
        ret
    }
}

impl<T: Semiring> MatrixStorage<T> for SparseMatrix<T> {
    fn size(&self) -> (usize, usize) {
        SparseMatrix::size(self)
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        SparseMatrix::get(self, row, col)
    }

    fn set(&mut self, row: usize, col: usize, v: T) -> Result<T> {
        SparseMatrix::set(self, row, col, v)
    }

    fn for_each_non_zero<F: FnMut(usize, usize, T)>(&self, mut f: F) {
        for r in 0..self.nrows {
            for i in self.row_range(r) {
                f(r, self.cols[i], self.values[i])
            }
        }
    }
}
