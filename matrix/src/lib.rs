/*
MIT License
Copyright (c) 2021 Germán Molina
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

#![deny(missing_docs)]

//! A Library for Matrix operations over max-plus and min-plus semirings.
//!
//! It is built generically (i.e., `GenericMatrix<T: Semiring>`) so that the same
//! code works for [`MaxPlus`](semiring::MaxPlus) and [`MinPlus`](semiring::MinPlus)
//! scalars. Besides the semiring arithmetic, it provides the two algorithms
//! needed for analysing timed event graphs:
//!
//! * the Kleene star $`A^*`$ (i.e., all the best paths of a graph), in [`GenericMatrix::star`]
//! * the eigenvalue (i.e., the cycle time) and eigenvector of a matrix, using
//!   Howard's policy iteration, in [`howard`]
//!
//! ```
//! use matrix::{MaxPlusMatrix, Semiring};
//!
//! let a = MaxPlusMatrix::from_classical(2, 2, &[2., 5., 1., 3.]).unwrap();
//! let (lambda, v) = a.eigen().unwrap();
//! assert_eq!(lambda.value(), 3.);
//! assert_eq!(a.from_prod(&v).unwrap(), v.scalar_mul(lambda));
//! ```
//!
//! Matrices are dense by default. [`SparseMatrix`] stores only the elements
//! that are not $`\varepsilon`$, and [`StoredMatrix`] allows choosing the storage
//! at runtime.
//!
//! ## Features
//!
//! * `float`: use `f32` instead of `f64`
//! * `parallel`: multiply dense matrices using `rayon`

pub use semiring::{Float, MaxPlus, MinPlus, Result, Semiring, SemiringError};

/// The trait implemented by every matrix storage
pub mod traits;
pub use traits::MatrixStorage;

/// The dense matrix
pub mod generic_matrix;
pub use generic_matrix::GenericMatrix;

/// The sparse matrix
pub mod sparse_matrix;
pub use sparse_matrix::SparseMatrix;

/// Dense and sparse storages behind a single type
pub mod stored_matrix;
pub use stored_matrix::{Storage, StoredMatrix};

/// Kleene star of a matrix
pub mod closure;
pub use closure::ClosureOptions;

/// Eigenvalues using Howard's algorithm
pub mod howard;
pub use howard::{eigen, eigenvalue, howard, HowardOptions, HowardResult};

/// A shorthand for `GenericMatrix<MaxPlus>`
pub type MaxPlusMatrix = GenericMatrix<MaxPlus>;

/// A shorthand for `GenericMatrix<MinPlus>`
pub type MinPlusMatrix = GenericMatrix<MinPlus>;
