use crate::generic_matrix::GenericMatrix;
use semiring::{Float, Result, Semiring, SemiringError, TOLERANCE};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Options for calculating the Kleene star of a matrix
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureOptions {
    /// How much a diagonal element can exceed the unit element before
    /// the cycle going through it is considered divergent. This absorbs
    /// rounding errors in cycles whose weight is exactly zero.
    pub tolerance: Float,
}

impl Default for ClosureOptions {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
        }
    }
}

impl<T: Semiring> GenericMatrix<T> {
    /// Calculates the Kleene star (i.e., transitive closure)
    /// $`A^* = I \oplus A \oplus A^2 \oplus \dots`$ using default [`ClosureOptions`].
    ///
    /// Element $`(i,j)`$ of the result is the best weight of any path
    /// (including the empty one) going from $`i`$ to $`j`$.
    ///
    /// Returns `DivergentSemiring` if there is a cycle heavier than the
    /// unit element (positive in max-plus, negative in min-plus), in which
    /// case the series does not converge.
    ///
    /// # Note
    /// This method clones `self`. Check `mut_star()` for the in-place version.
    pub fn star(&self) -> Result<GenericMatrix<T>> {
        self.star_with(&ClosureOptions::default())
    }

    /// Calculates the Kleene star with the given options. See [`star`](Self::star)
    pub fn star_with(&self, options: &ClosureOptions) -> Result<GenericMatrix<T>> {
        let mut ret = self.clone();
        ret.mut_star(options)?;
        Ok(ret)
    }

    /// Replaces `self` by its Kleene star, using a Floyd-Warshall sweep over the
    /// semiring.
    ///
    /// If an error is returned, the contents of `self` are meaningless.
    pub fn mut_star(&mut self, options: &ClosureOptions) -> Result<()> {
        self.check_square("star")?;
        let n = self.nrows;

        // After sweeping vertex k, element (i,j) holds the best path from i
        // to j whose intermediate vertices are all in 0..=k.
        for k in 0..n {
            let pivot = self.data[self.index(k, k)];
            if pivot.exceeds(T::one(), options.tolerance) {
                warn!(
                    "vertex {} lies on a cycle of weight {}; closure diverges",
                    k,
                    pivot.value()
                );
                return Err(SemiringError::DivergentSemiring { vertex: k });
            }
            // pivot* is the unit element, so the update is simply
            // a_ij = a_ij + a_ik * a_kj
            for i in 0..n {
                let ik = self.data[self.index(i, k)];
                if ik.is_zero() {
                    continue;
                }
                for j in 0..n {
                    let kj = self.data[self.index(k, j)];
                    let ij = self.index(i, j);
                    self.data[ij] = self.data[ij].oplus(ik.otimes(kj));
                }
            }
        }

        // The empty path
        for i in 0..n {
            let ii = self.index(i, i);
            self.data[ii] = self.data[ii].oplus(T::one());
        }
        Ok(())
    }

    /// Calculates $`A^+ = A \otimes A^* = A \oplus A^2 \oplus \dots`$, the
    /// best weight of the non-empty paths.
    pub fn plus(&self) -> Result<GenericMatrix<T>> {
        let star = self.star()?;
        self.from_prod(&star)
    }
}
