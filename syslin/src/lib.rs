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

//! Max-plus (or min-plus) linear time-invariant systems in descriptor form.
//!
//! A [`LinearSystem`] relates a sequence of inputs $`u(k)`$ to a sequence of
//! outputs $`y(k)`$ through a state $`x(k)`$:
//!
//! ```math
//! x(k) = D \otimes x(k) \oplus A \otimes x(k-1) \oplus B \otimes u(k)
//! ```
//! ```math
//! y(k) = C \otimes x(k)
//! ```
//!
//! The implicit matrix $`D`$ holds the dependencies between events of the
//! same step (e.g., a transition that fires as soon as another one does).
//! They are removed by means of the Kleene star, $`x(k) = D^* \otimes (A \otimes x(k-1) \oplus B \otimes u(k))`$,
//! which is what [`LinearSystem::explicit`] does.
//!
//! ```
//! use syslin::{LinearSystem, MaxPlusMatrix};
//!
//! // A machine that takes 3 units of time per part
//! let a = MaxPlusMatrix::from_classical(1, 1, &[3.]).unwrap();
//! let b = MaxPlusMatrix::from_classical(1, 1, &[0.]).unwrap();
//! let c = MaxPlusMatrix::from_classical(1, 1, &[3.]).unwrap();
//! let sys = LinearSystem::new(a, b, c).unwrap();
//!
//! // Three parts available at time 0
//! let u = MaxPlusMatrix::from_classical(1, 3, &[0., 0., 0.]).unwrap();
//! let y = sys.simulate(&u).unwrap();
//! assert_eq!(y.to_classical(), vec![3., 6., 9.]);
//! ```

use matrix::GenericMatrix;
use semiring::{Result, Semiring, SemiringError};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use matrix::{MaxPlusMatrix, MinPlusMatrix};

/// A linear system $`(A, B, C, D)`$ with an optional initial state.
///
/// Deserializing checks the shapes of the matrices, the same as building
/// the system with [`LinearSystem::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLinearSystem<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct LinearSystem<T: Semiring> {
    /// The state matrix (`n_states x n_states`)
    a: GenericMatrix<T>,

    /// The input matrix (`n_states x n_inputs`)
    b: GenericMatrix<T>,

    /// The output matrix (`n_outputs x n_states`)
    c: GenericMatrix<T>,

    /// The implicit matrix (`n_states x n_states`). `None` is the
    /// same as a matrix full of $`\varepsilon`$
    d: Option<GenericMatrix<T>>,

    /// The state $`x(-1)`$ (`n_states x 1`). `None` is the same as a
    /// column full of $`\varepsilon`$
    x0: Option<GenericMatrix<T>>,
}

/// The serialized form of a [`LinearSystem`], before checking its shapes
#[derive(Deserialize)]
struct RawLinearSystem<T: Semiring> {
    a: GenericMatrix<T>,
    b: GenericMatrix<T>,
    c: GenericMatrix<T>,
    d: Option<GenericMatrix<T>>,
    x0: Option<GenericMatrix<T>>,
}

impl<T: Semiring> TryFrom<RawLinearSystem<T>> for LinearSystem<T> {
    type Error = SemiringError;
    fn try_from(raw: RawLinearSystem<T>) -> Result<Self> {
        let mut sys = LinearSystem::new(raw.a, raw.b, raw.c)?;
        if let Some(d) = raw.d {
            sys = sys.with_implicit(d)?;
        }
        if let Some(x0) = raw.x0 {
            sys = sys.with_initial_state(x0)?;
        }
        Ok(sys)
    }
}

fn mismatch<T: Semiring>(
    operation: &'static str,
    left: &GenericMatrix<T>,
    right: &GenericMatrix<T>,
) -> SemiringError {
    SemiringError::DimensionMismatch {
        operation,
        left: left.size(),
        right: right.size(),
    }
}

/// Copies column `col` of `m` into a column vector
fn column<T: Semiring>(m: &GenericMatrix<T>, col: usize) -> Result<GenericMatrix<T>> {
    let (nrows, _) = m.size();
    let mut ret: GenericMatrix<T> = GenericMatrix::zeros(nrows, 1);
    for r in 0..nrows {
        ret.set(r, 0, m.get(r, col)?)?;
    }
    Ok(ret)
}

/// Returns `m`, or a `nrows x ncols` matrix full of $`\varepsilon`$ if there is none
fn or_zeros<T: Semiring>(m: &Option<GenericMatrix<T>>, nrows: usize, ncols: usize) -> GenericMatrix<T> {
    match m {
        Some(m) => m.clone(),
        None => GenericMatrix::zeros(nrows, ncols),
    }
}

/// Stacks `top` over `bottom`
fn stack<T: Semiring>(top: &GenericMatrix<T>, bottom: &GenericMatrix<T>) -> Result<GenericMatrix<T>> {
    let mut ret = top.clone();
    ret.concat_rows(bottom)?;
    Ok(ret)
}

/// Puts `left` and `right` side by side
fn side_by_side<T: Semiring>(
    left: &GenericMatrix<T>,
    right: &GenericMatrix<T>,
) -> Result<GenericMatrix<T>> {
    let mut ret = left.clone();
    ret.concat_cols(right)?;
    Ok(ret)
}

impl<T: Semiring> LinearSystem<T> {
    /// Creates an explicit system (i.e., without $`D`$).
    ///
    /// Returns `DimensionMismatch` unless `a` is square, `b` has as
    /// many rows as `a`, and `c` has as many columns as `a`.
    pub fn new(a: GenericMatrix<T>, b: GenericMatrix<T>, c: GenericMatrix<T>) -> Result<Self> {
        if !a.is_square() {
            return Err(mismatch("LinearSystem::new", &a, &a));
        }
        let (n, _) = a.size();
        if b.size().0 != n {
            return Err(mismatch("LinearSystem::new", &a, &b));
        }
        if c.size().1 != n {
            return Err(mismatch("LinearSystem::new", &a, &c));
        }
        Ok(Self {
            a,
            b,
            c,
            d: None,
            x0: None,
        })
    }

    /// Sets the implicit matrix $`D`$, which must have the same size as $`A`$
    pub fn with_implicit(mut self, d: GenericMatrix<T>) -> Result<Self> {
        if d.size() != self.a.size() {
            return Err(mismatch("LinearSystem::with_implicit", &self.a, &d));
        }
        self.d = Some(d);
        Ok(self)
    }

    /// Sets the initial state $`x(-1)`$, which must be a column with
    /// one element per state
    pub fn with_initial_state(mut self, x0: GenericMatrix<T>) -> Result<Self> {
        if x0.size() != (self.n_states(), 1) {
            return Err(mismatch("LinearSystem::with_initial_state", &self.a, &x0));
        }
        self.x0 = Some(x0);
        Ok(self)
    }

    /// The number of states
    pub fn n_states(&self) -> usize {
        self.a.size().0
    }

    /// The number of inputs
    pub fn n_inputs(&self) -> usize {
        self.b.size().1
    }

    /// The number of outputs
    pub fn n_outputs(&self) -> usize {
        self.c.size().0
    }

    /// The state matrix
    pub fn a(&self) -> &GenericMatrix<T> {
        &self.a
    }

    /// The input matrix
    pub fn b(&self) -> &GenericMatrix<T> {
        &self.b
    }

    /// The output matrix
    pub fn c(&self) -> &GenericMatrix<T> {
        &self.c
    }

    /// The implicit matrix, if any
    pub fn d(&self) -> Option<&GenericMatrix<T>> {
        self.d.as_ref()
    }

    /// The initial state, if any
    pub fn x0(&self) -> Option<&GenericMatrix<T>> {
        self.x0.as_ref()
    }

    /// Returns the equivalent system without implicit dependencies, this
    /// is $`(D^* \otimes A, D^* \otimes B, C)`$.
    ///
    /// Returns `DivergentSemiring` if $`D`$ has a cycle heavier than the unit
    /// element (i.e., events that would need to happen infinitely late).
    pub fn explicit(&self) -> Result<LinearSystem<T>> {
        let d = match &self.d {
            Some(d) => d,
            None => return Ok(self.clone()),
        };
        debug!(
            "folding the implicit matrix of a system with {} states",
            self.n_states()
        );
        let d_star = d.star()?;
        Ok(Self {
            a: d_star.from_prod(&self.a)?,
            b: d_star.from_prod(&self.b)?,
            c: self.c.clone(),
            d: None,
            x0: self.x0.clone(),
        })
    }

    /// Calculates the response of the system. Each column of `inputs`
    /// ($`n_{inputs} \times steps`$) is $`u(k)`$, and each column of the
    /// result ($`n_{outputs} \times steps`$) is $`y(k)`$.
    pub fn simulate(&self, inputs: &GenericMatrix<T>) -> Result<GenericMatrix<T>> {
        let (n_inputs, steps) = inputs.size();
        if n_inputs != self.n_inputs() {
            return Err(mismatch("LinearSystem::simulate", &self.b, inputs));
        }
        let sys = self.explicit()?;
        debug!("simulating {} steps", steps);

        let n_outputs = self.n_outputs();
        let mut outputs: GenericMatrix<T> = GenericMatrix::zeros(n_outputs, steps);
        let mut x = or_zeros(&sys.x0, sys.n_states(), 1);
        let mut bu: GenericMatrix<T> = GenericMatrix::zeros(sys.n_states(), 1);
        for k in 0..steps {
            let u = column(inputs, k)?;
            sys.b.prod_into(&u, &mut bu)?;
            x = sys.a.from_prod(&x)?;
            x.add_to_this(&bu)?;

            let y = sys.c.from_prod(&x)?;
            for r in 0..n_outputs {
                outputs.set(r, k, y.get(r, 0)?)?;
            }
        }
        Ok(outputs)
    }

    /// Connects the outputs of `self` to the inputs of `next`. The inputs
    /// of the result are those of `self`, and its outputs are those of
    /// `next`. The states of `self` come first.
    ///
    /// The connection is instantaneous: it goes into the implicit matrix
    /// of the result, $`D = [D_1, \varepsilon; B_2 \otimes C_1, D_2]`$.
    pub fn series(&self, next: &LinearSystem<T>) -> Result<LinearSystem<T>> {
        if next.n_inputs() != self.n_outputs() {
            return Err(mismatch("LinearSystem::series", &self.c, &next.b));
        }
        let n1 = self.n_states();
        let n2 = next.n_states();

        let coupling = next.b.from_prod(&self.c)?;
        let d1 = or_zeros(&self.d, n1, n1);
        let d2 = or_zeros(&next.d, n2, n2);
        let d = stack(
            &side_by_side(&d1, &GenericMatrix::zeros(n1, n2))?,
            &side_by_side(&coupling, &d2)?,
        )?;

        Ok(LinearSystem {
            a: self.a.block_diag(&next.a),
            b: stack(&self.b, &GenericMatrix::zeros(n2, self.n_inputs()))?,
            c: side_by_side(&GenericMatrix::zeros(next.n_outputs(), n1), &next.c)?,
            d: Some(d),
            x0: self.joint_initial_state(next)?,
        })
    }

    /// Feeds the same inputs to `self` and `other`, and adds (i.e., $`\oplus`$)
    /// their outputs. Both systems must have the same number of inputs
    /// and outputs. The states of `self` come first.
    pub fn parallel(&self, other: &LinearSystem<T>) -> Result<LinearSystem<T>> {
        if other.n_inputs() != self.n_inputs() {
            return Err(mismatch("LinearSystem::parallel", &self.b, &other.b));
        }
        if other.n_outputs() != self.n_outputs() {
            return Err(mismatch("LinearSystem::parallel", &self.c, &other.c));
        }
        let n1 = self.n_states();
        let n2 = other.n_states();
        let d = if self.d.is_some() || other.d.is_some() {
            Some(or_zeros(&self.d, n1, n1).block_diag(&or_zeros(&other.d, n2, n2)))
        } else {
            None
        };

        Ok(LinearSystem {
            a: self.a.block_diag(&other.a),
            b: stack(&self.b, &other.b)?,
            c: side_by_side(&self.c, &other.c)?,
            d,
            x0: self.joint_initial_state(other)?,
        })
    }

    /// The initial state of a system whose states are those of `self`
    /// followed by those of `other`
    fn joint_initial_state(&self, other: &LinearSystem<T>) -> Result<Option<GenericMatrix<T>>> {
        if self.x0.is_none() && other.x0.is_none() {
            return Ok(None);
        }
        let top = or_zeros(&self.x0, self.n_states(), 1);
        let bottom = or_zeros(&other.x0, other.n_states(), 1);
        stack(&top, &bottom).map(Some)
    }
}
