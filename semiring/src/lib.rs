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

//! Scalars of the max-plus and min-plus idempotent semirings.
//!
//! A semiring value is a real number or the absorbing element $`\varepsilon`$,
//! which is $`-\infty`$ in max-plus and $`+\infty`$ in min-plus. The semiring
//! "addition" $`\oplus`$ is the maximum (resp. minimum) and the semiring
//! "multiplication" $`\otimes`$ is the ordinary sum.
//!
//! ```
//! use semiring::{MaxPlus, Semiring};
//!
//! let a = MaxPlus::from(3);
//! let b = MaxPlus::from(5);
//! assert_eq!(a.oplus(b), MaxPlus::from(5));
//! assert_eq!(a.otimes(b), MaxPlus::from(8));
//! assert_eq!(a.otimes(MaxPlus::zero()), MaxPlus::zero());
//! ```
//!
//! ## `f32` or `f64`?
//!
//! By default, this crate works with `f64`. Use the feature `float` to use `f32`.

/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(feature = "float")]
pub type Float = f32;

/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(not(feature = "float"))]
pub type Float = f64;

/// The default tolerance used when comparing values that went through
/// floating point arithmetic (cycle means, closures).
#[cfg(not(feature = "float"))]
pub const TOLERANCE: Float = 1e-9;

/// The default tolerance used when comparing values that went through
/// floating point arithmetic (cycle means, closures).
#[cfg(feature = "float")]
pub const TOLERANCE: Float = 1e-4;

mod error;
pub use error::{Result, SemiringError};

mod traits;
pub use traits::Semiring;

mod max_plus;
pub use max_plus::MaxPlus;

mod min_plus;
pub use min_plus::MinPlus;
