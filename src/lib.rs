/*
MIT License
Copyright (c)  Germán Molina
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

//! The main `maxplus` crate, putting every other crate together.
//!
//! It provides max-plus and min-plus arithmetic over scalars and matrices
//! (in the [`semiring`] and [`matrix`] crates), the algorithms used for
//! analysing timed discrete event systems (i.e., the Kleene star and
//! Howard's eigenvalue algorithm), and linear systems built on top of them
//! (in the [`syslin`] crate).
//!
//! ```
//! use maxplus::{MaxPlusMatrix, Semiring};
//!
//! // Two machines sharing a robot
//! let a = MaxPlusMatrix::from_classical(2, 2, &[2., 5., 1., 3.]).unwrap();
//! let lambda: maxplus::MaxPlus = maxplus::eigenvalue(&a).unwrap();
//! assert_eq!(lambda.value(), 3.);
//! ```

pub use semiring;
pub use semiring::{Float, MaxPlus, MinPlus, Result, Semiring, SemiringError};

pub use matrix;
pub use matrix::{
    eigen, eigenvalue, howard, ClosureOptions, GenericMatrix, HowardOptions, HowardResult,
    MatrixStorage, MaxPlusMatrix, MinPlusMatrix, SparseMatrix, Storage, StoredMatrix,
};

pub use syslin;
pub use syslin::LinearSystem;
