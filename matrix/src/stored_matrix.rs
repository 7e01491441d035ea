use crate::generic_matrix::GenericMatrix;
use crate::sparse_matrix::SparseMatrix;
use crate::traits::MatrixStorage;
use semiring::{Result, Semiring};
use serde::{Deserialize, Serialize};

/// The kind of storage used by a [`StoredMatrix`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Storage {
    /// Every element is stored
    Dense,
    /// Only the elements that are not $`\varepsilon`$ are stored
    Sparse,
}

/// A matrix whose storage is chosen at runtime.
///
/// Operations mixing storages follow a single rule: the result is
/// [`Storage::Sparse`] only when every operand is sparse, and
/// [`Storage::Dense`] otherwise. The only exception is
/// [`scalar_add`](StoredMatrix::scalar_add) with a value other than
/// $`\varepsilon`$, which fills every element and therefore always returns
/// a dense matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredMatrix<T: Semiring> {
    /// A dense matrix
    Dense(GenericMatrix<T>),
    /// A sparse matrix
    Sparse(SparseMatrix<T>),
}

impl<T: Semiring> From<GenericMatrix<T>> for StoredMatrix<T> {
    fn from(m: GenericMatrix<T>) -> Self {
        StoredMatrix::Dense(m)
    }
}

impl<T: Semiring> From<SparseMatrix<T>> for StoredMatrix<T> {
    fn from(m: SparseMatrix<T>) -> Self {
        StoredMatrix::Sparse(m)
    }
}

impl<T: Semiring> StoredMatrix<T> {
    /// The kind of storage of this matrix
    pub fn storage(&self) -> Storage {
        match self {
            StoredMatrix::Dense(_) => Storage::Dense,
            StoredMatrix::Sparse(_) => Storage::Sparse,
        }
    }

    /// Returns the same matrix stored in `storage`
    #[must_use]
    pub fn convert(&self, storage: Storage) -> StoredMatrix<T> {
        match (self, storage) {
            (StoredMatrix::Dense(m), Storage::Sparse) => SparseMatrix::from_dense(m).into(),
            (StoredMatrix::Sparse(m), Storage::Dense) => m.to_dense().into(),
            _ => self.clone(),
        }
    }

    /// Returns a dense copy of this matrix
    #[must_use]
    pub fn to_dense(&self) -> GenericMatrix<T> {
        match self {
            StoredMatrix::Dense(m) => m.clone(),
            StoredMatrix::Sparse(m) => m.to_dense(),
        }
    }

    /// Adds (i.e., $`\oplus`$) two matrices
    pub fn add(&self, other: &StoredMatrix<T>) -> Result<StoredMatrix<T>> {
        match (self, other) {
            (StoredMatrix::Sparse(a), StoredMatrix::Sparse(b)) => Ok(a.add(b)?.into()),
            (StoredMatrix::Dense(a), StoredMatrix::Dense(b)) => Ok(a.from_add(b)?.into()),
            (StoredMatrix::Dense(d), StoredMatrix::Sparse(s))
            | (StoredMatrix::Sparse(s), StoredMatrix::Dense(d)) => {
                Ok(d.from_add(&s.to_dense())?.into())
            }
        }
    }

    /// Multiplies (i.e., $`\otimes`$) two matrices
    pub fn prod(&self, other: &StoredMatrix<T>) -> Result<StoredMatrix<T>> {
        match (self, other) {
            (StoredMatrix::Sparse(a), StoredMatrix::Sparse(b)) => Ok(a.prod(b)?.into()),
            (StoredMatrix::Dense(a), StoredMatrix::Dense(b)) => Ok(a.from_prod(b)?.into()),
            (StoredMatrix::Dense(a), StoredMatrix::Sparse(b)) => Ok(b.dense_prod(a)?.into()),
            (StoredMatrix::Sparse(a), StoredMatrix::Dense(b)) => Ok(a.prod_dense(b)?.into()),
        }
    }

    /// Returns $`s \oplus a_{ij}`$ for every element.
    #[must_use]
    pub fn scalar_add(&self, s: T) -> StoredMatrix<T> {
        match self {
            StoredMatrix::Sparse(_) if s.is_zero() => self.clone(),
            _ => self.to_dense().scalar_add(s).into(),
        }
    }

    /// Returns $`s \otimes a_{ij}`$ for every element, keeping the storage.
    #[must_use]
    pub fn scalar_mul(&self, s: T) -> StoredMatrix<T> {
        match self {
            StoredMatrix::Dense(m) => m.scalar_mul(s).into(),
            StoredMatrix::Sparse(m) => m.scalar_mul(s).into(),
        }
    }

    /// Calculates the Kleene star of the matrix (see [`GenericMatrix::star`]).
    /// The closure is (almost always) full, so it is returned dense.
    pub fn star(&self) -> Result<GenericMatrix<T>> {
        self.to_dense().star()
    }
}

impl<T: Semiring> MatrixStorage<T> for StoredMatrix<T> {
    fn size(&self) -> (usize, usize) {
        match self {
            StoredMatrix::Dense(m) => m.size(),
            StoredMatrix::Sparse(m) => m.size(),
        }
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        match self {
            StoredMatrix::Dense(m) => m.get(row, col),
            StoredMatrix::Sparse(m) => m.get(row, col),
        }
    }

    fn set(&mut self, row: usize, col: usize, v: T) -> Result<T> {
        match self {
            StoredMatrix::Dense(m) => m.set(row, col, v),
            StoredMatrix::Sparse(m) => m.set(row, col, v),
        }
    }

    fn for_each_non_zero<F: FnMut(usize, usize, T)>(&self, f: F) {
        match self {
            StoredMatrix::Dense(m) => m.for_each_non_zero(f),
            StoredMatrix::Sparse(m) => m.for_each_non_zero(f),
        }
    }
}
