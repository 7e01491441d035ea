use crate::traits::MatrixStorage;
use semiring::{Float, Result, Semiring, SemiringError};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A dense matrix over a semiring. This is the main structure in this library.
///
/// Deserializing checks that `data` holds `nrows * ncols` elements.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGenericMatrix<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GenericMatrix<T: Semiring> {
    pub(crate) ncols: usize,
    pub(crate) nrows: usize,

    // Contains the data ordered by row,
    // Going left to right, and up and down.
    pub(crate) data: Vec<T>,
}

/// The serialized form of a [`GenericMatrix`], before checking its size
#[derive(Deserialize)]
struct RawGenericMatrix<T> {
    ncols: usize,
    nrows: usize,
    data: Vec<T>,
}

impl<T: Semiring> TryFrom<RawGenericMatrix<T>> for GenericMatrix<T> {
    type Error = SemiringError;
    fn try_from(raw: RawGenericMatrix<T>) -> Result<Self> {
        Self::try_from_data(raw.nrows, raw.ncols, raw.data)
    }
}

impl<T: Semiring> GenericMatrix<T> {
    /// Creates a `GenericMatrix` from a vector containing the elements of the matrix
    ///
    /// # Panics
    /// Panics if `data` does not contain `nrows * ncols` elements. Use
    /// [`try_from_data`](Self::try_from_data) to get an error instead.
    #[must_use]
    pub fn from_data(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        if nrows * ncols != data.len() {
            panic!("When creating Matrix: Number of rows (nrows = {}) and cols (ncols = {}) does not match length of data (data.len() = {})... (nrows * ncols = {})", nrows, ncols, data.len(), nrows*ncols)
        }
        Self { nrows, ncols, data }
    }

    /// Creates a `GenericMatrix` from a vector containing the elements of the matrix,
    /// returning an error if the size of `data` is not `nrows * ncols`
    pub fn try_from_data(nrows: usize, ncols: usize, data: Vec<T>) -> Result<Self> {
        if nrows * ncols != data.len() {
            return Err(SemiringError::DimensionMismatch {
                operation: "from_data",
                left: (nrows, ncols),
                right: (data.len(), 1),
            });
        }
        Ok(Self { nrows, ncols, data })
    }

    /// Lifts a classical row-major array into the semiring, one element at a time.
    ///
    /// Returns `InvalidValue` if any element is `NaN` or the infinity
    /// that does not correspond to $`\varepsilon`$.
    pub fn from_classical(nrows: usize, ncols: usize, data: &[Float]) -> Result<Self> {
        if nrows * ncols != data.len() {
            return Err(SemiringError::DimensionMismatch {
                operation: "from_classical",
                left: (nrows, ncols),
                right: (data.len(), 1),
            });
        }
        let data = data
            .iter()
            .map(|v| T::lift(*v))
            .collect::<Result<Vec<T>>>()?;
        Ok(Self { nrows, ncols, data })
    }

    /// Returns the classical, row-major, values of the matrix. $`\varepsilon`$
    /// is mapped into the corresponding signed infinity.
    pub fn to_classical(&self) -> Vec<Float> {
        self.data.iter().map(|v| v.value()).collect()
    }

    /// Classical (i.e., **not** semiring) element-wise difference between `self` and `other`.
    pub fn classical_sub(&self, other: &GenericMatrix<T>) -> Result<Vec<Float>> {
        self.check_same_size(other, "classical_sub")?;
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a.value() - b.value())
            .collect())
    }

    /// Creates a `GenericMatrix` of `nrows` and `ncols` full of values `v`
    #[must_use]
    pub fn new(v: T, nrows: usize, ncols: usize) -> Self {
        GenericMatrix {
            nrows,
            ncols,
            data: vec![v; nrows * ncols],
        }
    }

    /// Creates a `GenericMatrix` of `nrows` and `ncols` full of $`\varepsilon`$
    #[must_use]
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::new(T::zero(), nrows, ncols)
    }

    /// Creates a squared matrix with the elements of `data`
    /// in the diagonal and $`\varepsilon`$ everywhere else
    #[must_use]
    pub fn diag(data: Vec<T>) -> Self {
        let n_rows = data.len();
        let mut ret = Self::zeros(n_rows, n_rows);
        for (nrow, value) in data.iter().enumerate() {
            ret.data[nrow * (n_rows + 1)] = *value;
        }
        ret
    }

    /// Creates the semiring identity matrix of size NxN: the unit
    /// element in the diagonal and $`\varepsilon`$ everywhere else
    #[must_use]
    pub fn eye(n: usize) -> Self {
        Self::diag(vec![T::one(); n])
    }

    /// Creates an empty Matrix (i.e., size 0x0)
    #[must_use]
    pub fn empty() -> Self {
        GenericMatrix {
            nrows: 0,
            ncols: 0,
            data: Vec::with_capacity(0),
        }
    }

    /// Checks whether a Matrix has Zero columns and Zero rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 && self.ncols == 0
    }

    /// Checks whether a Matrix has as many rows as columns
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Returns a tuple with number of rows and columns
    pub fn size(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Gets the index of an element within the `data` array of the Matrix
    pub(crate) fn index(&self, nrow: usize, ncol: usize) -> usize {
        self.ncols * nrow + ncol
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> SemiringError {
        SemiringError::IndexOutOfBounds {
            row,
            col,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    pub(crate) fn check_same_size(
        &self,
        other: &GenericMatrix<T>,
        operation: &'static str,
    ) -> Result<()> {
        if self.ncols != other.ncols || self.nrows != other.nrows {
            return Err(SemiringError::DimensionMismatch {
                operation,
                left: self.size(),
                right: other.size(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_square(&self, operation: &'static str) -> Result<()> {
        if !self.is_square() {
            return Err(SemiringError::DimensionMismatch {
                operation,
                left: self.size(),
                right: (self.ncols, self.nrows),
            });
        }
        Ok(())
    }

    /// Gets an element from the matrix
    pub fn get(&self, nrow: usize, ncol: usize) -> Result<T> {
        if nrow < self.nrows && ncol < self.ncols {
            Ok(self.data[self.index(nrow, ncol)])
        } else {
            Err(self.out_of_bounds(nrow, ncol))
        }
    }

    /// Sets an element into the matrix
    pub fn set(&mut self, nrow: usize, ncol: usize, v: T) -> Result<T> {
        if nrow < self.nrows && ncol < self.ncols {
            let i = self.index(nrow, ncol);
            self.data[i] = v;
            Ok(v)
        } else {
            Err(self.out_of_bounds(nrow, ncol))
        }
    }

    /// Iterates the rows of the matrix
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact(0) panics
        self.data.chunks_exact(self.ncols.max(1)).take(self.nrows)
    }

    /* ARITHMETIC OPERATION */

    /// Adds (i.e., $`\oplus`$) `self` with `other`, puting the result in `into`
    pub fn add_into(&self, other: &GenericMatrix<T>, into: &mut GenericMatrix<T>) -> Result<()> {
        self.check_same_size(other, "add")?;
        self.check_same_size(into, "add (result)")?;

        std::iter::zip(
            std::iter::zip(self.data.iter(), other.data.iter()),
            into.data.iter_mut(),
        )
        .for_each(|((x, y), res)| *res = x.oplus(*y));

        Ok(())
    }

    /// Adds (i.e., $`\oplus`$) `self` and `other`, returning a new matrix
    pub fn from_add(&self, other: &GenericMatrix<T>) -> Result<GenericMatrix<T>> {
        let mut ret = Self::zeros(self.nrows, self.ncols);
        self.add_into(other, &mut ret)?;
        Ok(ret)
    }

    /// Adds (i.e., $`\oplus`$) `other` into `self`, in place
    pub fn add_to_this(&mut self, other: &GenericMatrix<T>) -> Result<()> {
        self.check_same_size(other, "add")?;
        self.data
            .iter_mut()
            .zip(&other.data)
            .for_each(|(a, b)| *a = a.oplus(*b));
        Ok(())
    }

    /// Returns $`s \oplus a_{ij}`$ for every element in the matrix
    #[must_use]
    pub fn scalar_add(&self, s: T) -> GenericMatrix<T> {
        GenericMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            data: self.data.iter().map(|a| a.oplus(s)).collect(),
        }
    }

    /// Returns $`s \otimes a_{ij}`$ for every element in the matrix
    #[must_use]
    pub fn scalar_mul(&self, s: T) -> GenericMatrix<T> {
        GenericMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            data: self.data.iter().map(|a| a.otimes(s)).collect(),
        }
    }

    /// Multiplies (i.e., $`\otimes`$) every element of the matrix by `s`, in place
    pub fn scale_this(&mut self, s: T) {
        self.data.iter_mut().for_each(|a| *a = a.otimes(s));
    }

    /// Multiplies a matrix by `other`, putting the result into `into`
    ///
    /// $`c_{ij} = \bigoplus_k a_{ik} \otimes b_{kj}`$
    #[allow(clippy::needless_collect)]
    pub fn prod_into(&self, other: &GenericMatrix<T>, into: &mut GenericMatrix<T>) -> Result<()> {
        if self.ncols != other.nrows {
            return Err(SemiringError::DimensionMismatch {
                operation: "prod",
                left: self.size(),
                right: other.size(),
            });
        }

        if into.nrows != self.nrows || into.ncols != other.ncols {
            return Err(SemiringError::DimensionMismatch {
                operation: "prod (result)",
                left: (self.nrows, other.ncols),
                right: into.size(),
            });
        }

        // Clear
        into.scale_this(T::zero());
        if into.data.is_empty() || self.ncols == 0 {
            return Ok(());
        }

        // Multiply.
        let self_rows: Vec<&[T]> = self.data.chunks_exact(self.ncols).collect();
        #[cfg(not(feature = "parallel"))]
        let self_rows = self_rows
            .into_iter()
            .zip(into.data.chunks_exact_mut(other.ncols));
        #[cfg(feature = "parallel")]
        let self_rows = self_rows
            .into_par_iter()
            .zip(into.data.par_chunks_exact_mut(other.ncols));

        self_rows.for_each(|(row_data, into_data)| {
            for (col, item) in into_data.iter_mut().enumerate().take(other.ncols) {
                let coldata = other.data.iter().skip(col).step_by(other.ncols);
                *item = row_data
                    .iter()
                    .zip(coldata)
                    .map(|(a, b)| a.otimes(*b))
                    .fold(T::zero(), |acc, val| acc.oplus(val));
            }
        });

        Ok(())
    }

    /// Multiplies `self` by `other` and returns the result
    pub fn from_prod(&self, other: &GenericMatrix<T>) -> Result<GenericMatrix<T>> {
        let mut ret = Self::zeros(self.nrows, other.ncols);
        self.prod_into(other, &mut ret)?;
        Ok(ret)
    }

    /// Calculates $`A^{k}`$, with $`A^{0} = I`$.
    pub fn power(&self, k: u32) -> Result<GenericMatrix<T>> {
        self.check_square("power")?;
        let mut ret = Self::eye(self.nrows);
        let mut base = self.clone();
        let mut k = k;
        while k > 0 {
            if k & 1 == 1 {
                ret = ret.from_prod(&base)?;
            }
            k >>= 1;
            if k > 0 {
                base = base.from_prod(&base)?;
            }
        }
        Ok(ret)
    }

    /// Returns the transposed matrix
    #[must_use]
    pub fn transpose(&self) -> GenericMatrix<T> {
        let mut ret = Self::zeros(self.ncols, self.nrows);
        for r in 0..self.nrows {
            for c in 0..self.ncols {
                let i = ret.index(c, r);
                ret.data[i] = self.data[self.index(r, c)];
            }
        }
        ret
    }

    /// The $`\oplus`$ of the elements in the diagonal
    pub fn trace(&self) -> Result<T> {
        self.check_square("trace")?;
        Ok((0..self.nrows)
            .map(|i| self.data[self.index(i, i)])
            .fold(T::zero(), |acc, v| acc.oplus(v)))
    }

    /// Checks if two matrices are exactly the same (as in `element == other_element`... beware Floats).
    pub fn compare(&self, other: &GenericMatrix<T>) -> bool {
        self == other
    }

    /// Checks if two matrices have the same size and the same $`\varepsilon`$ elements, and
    /// their finite elements are within `tol` of each other
    pub fn approx_eq(&self, other: &GenericMatrix<T>, tol: Float) -> bool {
        if self.size() != other.size() {
            return false;
        }
        self.data.iter().zip(&other.data).all(|(a, b)| {
            if a.is_zero() || b.is_zero() {
                a.is_zero() && b.is_zero()
            } else {
                (a.value() - b.value()).abs() <= tol
            }
        })
    }

    /// Concatenates the rows in `other` below the rows of `self`
    pub fn concat_rows(&mut self, other: &GenericMatrix<T>) -> Result<()> {
        let (other_rows, other_cols) = other.size();
        if self.ncols != other_cols {
            return Err(SemiringError::DimensionMismatch {
                operation: "concat_rows",
                left: self.size(),
                right: other.size(),
            });
        }
        self.nrows += other_rows;
        self.data.extend_from_slice(&other.data);
        Ok(())
    }

    /// Concatenates the columns in `other` to the right of the columns of `self`
    pub fn concat_cols(&mut self, other: &GenericMatrix<T>) -> Result<()> {
        if self.nrows != other.nrows {
            return Err(SemiringError::DimensionMismatch {
                operation: "concat_cols",
                left: self.size(),
                right: other.size(),
            });
        }
        let ncols = self.ncols + other.ncols;
        let mut data = Vec::with_capacity(self.nrows * ncols);
        for r in 0..self.nrows {
            data.extend_from_slice(&self.data[r * self.ncols..(r + 1) * self.ncols]);
            data.extend_from_slice(&other.data[r * other.ncols..(r + 1) * other.ncols]);
        }
        self.ncols = ncols;
        self.data = data;
        Ok(())
    }

    /// Builds the block-diagonal matrix `[self, ε; ε, other]`
    #[must_use]
    pub fn block_diag(&self, other: &GenericMatrix<T>) -> GenericMatrix<T> {
        let mut ret = Self::zeros(self.nrows + other.nrows, self.ncols + other.ncols);
        for r in 0..self.nrows {
            for c in 0..self.ncols {
                let i = ret.index(r, c);
                ret.data[i] = self.data[self.index(r, c)];
            }
        }
        for r in 0..other.nrows {
            for c in 0..other.ncols {
                let i = ret.index(self.nrows + r, self.ncols + c);
                ret.data[i] = other.data[other.index(r, c)];
            }
        }
        ret
    }
}

impl<T: Semiring> MatrixStorage<T> for GenericMatrix<T> {
    fn size(&self) -> (usize, usize) {
        GenericMatrix::size(self)
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        GenericMatrix::get(self, row, col)
    }

    fn set(&mut self, row: usize, col: usize, v: T) -> Result<T> {
        GenericMatrix::set(self, row, col, v)
    }

    fn for_each_non_zero<F: FnMut(usize, usize, T)>(&self, mut f: F) {
        for (r, row) in self.rows().enumerate() {
            for (c, v) in row.iter().enumerate() {
                if !v.is_zero() {
                    f(r, c, *v)
                }
            }
        }
    }
}

impl<T: Semiring> std::ops::Add<&GenericMatrix<T>> for &GenericMatrix<T> {
    type Output = GenericMatrix<T>;

    /// # Panics
    /// Panics if the matrices are of different sizes. Use
    /// [`GenericMatrix::from_add`] to get an error instead.
    fn add(self, other: &GenericMatrix<T>) -> Self::Output {
        match self.from_add(other) {
            Ok(m) => m,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Semiring> std::ops::AddAssign<&GenericMatrix<T>> for GenericMatrix<T> {
    fn add_assign(&mut self, other: &GenericMatrix<T>) {
        if let Err(e) = self.add_to_this(other) {
            panic!("{}", e)
        }
    }
}

impl<T: Semiring> std::ops::Mul<T> for &GenericMatrix<T> {
    type Output = GenericMatrix<T>;

    fn mul(self, s: T) -> Self::Output {
        self.scalar_mul(s)
    }
}

impl<T: Semiring> std::ops::Mul<&GenericMatrix<T>> for &GenericMatrix<T> {
    type Output = GenericMatrix<T>;

    /// # Panics
    /// Panics if the inner dimensions do not match. Use
    /// [`GenericMatrix::from_prod`] to get an error instead.
    fn mul(self, other: &GenericMatrix<T>) -> Self::Output {
        match self.from_prod(other) {
            Ok(m) => m,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Semiring> std::ops::MulAssign<T> for GenericMatrix<T> {
    fn mul_assign(&mut self, s: T) {
        self.scale_this(s)
    }
}

#[cfg(test)]
mod tests {
    use crate::{GenericMatrix, MaxPlusMatrix, MinPlusMatrix};
    use semiring::{Float, MaxPlus, Result, Semiring, SemiringError};

    fn mp(v: i32) -> MaxPlus {
        MaxPlus::from(v)
    }

    fn eps() -> MaxPlus {
        MaxPlus::zero()
    }

    #[test]
    fn test_serde() -> std::result::Result<(), String> {
        let m = MaxPlusMatrix::from_data(2, 2, vec![mp(1), eps(), mp(3), mp(4)]);
        let json = serde_json::to_string(&m).map_err(|e| e.to_string())?;
        let m2: MaxPlusMatrix = serde_json::from_str(&json).map_err(|e| e.to_string())?;
        assert_eq!(m, m2);

        // The size is checked
        let short = serde_json::from_str::<MaxPlusMatrix>(r#"{"ncols":3,"nrows":3,"data":[1.0]}"#);
        assert!(short.is_err());
        let long = serde_json::from_str::<MaxPlusMatrix>(r#"{"ncols":1,"nrows":1,"data":[1.0,null]}"#);
        assert!(long.is_err());
        let ok = serde_json::from_str::<MaxPlusMatrix>(r#"{"ncols":2,"nrows":1,"data":[1.0,null]}"#)
            .map_err(|e| e.to_string())?;
        assert_eq!(ok.get(0, 1).map_err(|e| e.to_string())?, eps());
        Ok(())
    }

    #[test]
    fn test_default() {
        let m = MaxPlusMatrix::default();

        assert_eq!(m.ncols, 0);
        assert_eq!(m.nrows, 0);
        assert_eq!(m.data.len(), 0);
    }

    #[test]
    #[should_panic]
    fn test_from_data_fail() {
        let data = vec![eps(); 2];
        let _ = GenericMatrix::from_data(1, 1, data);
    }

    #[test]
    fn test_try_from_data_fail() {
        let res = MaxPlusMatrix::try_from_data(2, 2, vec![eps(); 3]);
        assert!(matches!(
            res,
            Err(SemiringError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_eye() -> Result<()> {
        let n = 3;
        let t = MaxPlusMatrix::eye(n);
        assert_eq!(t.size(), (n, n));

        for row in 0..n {
            for col in 0..n {
                if row == col {
                    assert_eq!(t.get(row, col)?, MaxPlus::one());
                } else {
                    assert!(t.get(row, col)?.is_zero());
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_diag() -> Result<()> {
        let v = vec![mp(1), mp(2), mp(3)];
        let m = MaxPlusMatrix::diag(v.clone());
        for r in 0..3 {
            for c in 0..3 {
                if r == c {
                    assert_eq!(m.get(r, c)?, v[r]);
                } else {
                    assert!(m.get(r, c)?.is_zero());
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_empty() {
        let e = MaxPlusMatrix::empty();
        assert!(e.is_empty());
        let e = MaxPlusMatrix::eye(2);
        assert!(!e.is_empty());
    }

    #[test]
    fn test_get_set_fail() {
        let mut a = MaxPlusMatrix::zeros(3, 4);
        assert!(a.get(3, 0).is_err());
        assert!(a.get(0, 4).is_err());
        assert!(matches!(
            a.set(3, 4, mp(1)),
            Err(SemiringError::IndexOutOfBounds {
                row: 3,
                col: 4,
                nrows: 3,
                ncols: 4
            })
        ));
        assert!(a.set(2, 3, mp(1)).is_ok());
    }

    #[test]
    fn test_classical_round_trip() -> Result<()> {
        let data = [1.0, -2.5, Float::NEG_INFINITY, 0.0, 7.25, 3.0];
        let m = MaxPlusMatrix::from_classical(2, 3, &data)?;
        assert!(m.get(0, 2)?.is_zero());
        assert_eq!(m.to_classical(), data.to_vec());

        // min-plus: epsilon is +inf
        let m = MinPlusMatrix::from_classical(1, 2, &[Float::INFINITY, 2.0])?;
        assert!(m.get(0, 0)?.is_zero());
        assert_eq!(m.to_classical(), vec![Float::INFINITY, 2.0]);
        Ok(())
    }

    #[test]
    fn test_from_classical_fail() {
        assert!(matches!(
            MaxPlusMatrix::from_classical(1, 2, &[1.0, Float::NAN]),
            Err(SemiringError::InvalidValue { .. })
        ));
        assert!(matches!(
            MaxPlusMatrix::from_classical(1, 1, &[Float::INFINITY]),
            Err(SemiringError::InvalidValue { .. })
        ));
        assert!(matches!(
            MinPlusMatrix::from_classical(1, 1, &[Float::NEG_INFINITY]),
            Err(SemiringError::InvalidValue { .. })
        ));
        assert!(matches!(
            MaxPlusMatrix::from_classical(2, 2, &[1.0]),
            Err(SemiringError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_add() -> Result<()> {
        let a = MaxPlusMatrix::from_data(2, 2, vec![mp(1), eps(), mp(3), mp(-2)]);
        let b = MaxPlusMatrix::from_data(2, 2, vec![mp(0), mp(5), eps(), mp(-1)]);
        let exp = MaxPlusMatrix::from_data(2, 2, vec![mp(1), mp(5), mp(3), mp(-1)]);

        assert_eq!(a.from_add(&b)?, exp);
        assert_eq!(&a + &b, exp);

        let mut into = MaxPlusMatrix::zeros(2, 2);
        a.add_into(&b, &mut into)?;
        assert_eq!(into, exp);

        let mut c = a.clone();
        c.add_to_this(&b)?;
        assert_eq!(c, exp);

        let mut c = a.clone();
        c += &b;
        assert_eq!(c, exp);

        // identity
        assert_eq!(a.from_add(&MaxPlusMatrix::zeros(2, 2))?, a);
        Ok(())
    }

    #[test]
    fn test_add_fail() {
        let a = MaxPlusMatrix::zeros(2, 2);
        let b = MaxPlusMatrix::zeros(2, 3);
        assert!(matches!(
            a.from_add(&b),
            Err(SemiringError::DimensionMismatch { .. })
        ));
        let mut into = MaxPlusMatrix::zeros(3, 3);
        assert!(a.add_into(&a, &mut into).is_err());
    }

    #[test]
    #[should_panic]
    fn test_add_operator_fail() {
        let a = MaxPlusMatrix::zeros(2, 2);
        let b = MaxPlusMatrix::zeros(2, 3);
        let _ = &a + &b;
    }

    #[test]
    fn test_scalar_ops() -> Result<()> {
        let a = MaxPlusMatrix::from_data(1, 3, vec![mp(1), eps(), mp(3)]);

        let added = a.scalar_add(mp(2));
        assert_eq!(added.to_classical(), vec![2.0, 2.0, 3.0]);

        let multiplied = &a * mp(2);
        assert_eq!(multiplied.data[0], mp(3));
        assert!(multiplied.data[1].is_zero());
        assert_eq!(multiplied.data[2], mp(5));
        assert_eq!(a.scalar_mul(mp(2)), multiplied);

        let mut b = a.clone();
        b *= eps();
        assert!(b.data.iter().all(|v| v.is_zero()));

        let mut b = a.clone();
        b.scale_this(MaxPlus::one());
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_prod() -> Result<()> {
        // [1 2] x [0 eps] = [max(1+0, 2+4) max(eps, 2+1)]
        // [3 4]   [4  1 ]   [max(3+0, 4+4) max(eps, 4+1)]
        let a = MaxPlusMatrix::from_data(2, 2, vec![mp(1), mp(2), mp(3), mp(4)]);
        let b = MaxPlusMatrix::from_data(2, 2, vec![mp(0), eps(), mp(4), mp(1)]);
        let exp = MaxPlusMatrix::from_data(2, 2, vec![mp(6), mp(3), mp(8), mp(5)]);
        assert_eq!(a.from_prod(&b)?, exp);
        assert_eq!(&a * &b, exp);

        // Stale data in into is ignored
        let mut into = MaxPlusMatrix::new(mp(100), 2, 2);
        a.prod_into(&b, &mut into)?;
        assert_eq!(into, exp);

        // Against EYE
        assert_eq!(a.from_prod(&MaxPlusMatrix::eye(2))?, a);
        assert_eq!(MaxPlusMatrix::eye(2).from_prod(&a)?, a);
        Ok(())
    }

    #[test]
    fn test_prod_epsilon_rows() -> Result<()> {
        let a = MaxPlusMatrix::from_data(2, 2, vec![eps(), eps(), mp(1), eps()]);
        let b = MaxPlusMatrix::from_data(2, 1, vec![mp(3), mp(4)]);
        let c = a.from_prod(&b)?;
        assert!(c.get(0, 0)?.is_zero());
        assert!(!c.get(0, 0)?.value().is_nan());
        assert_eq!(c.get(1, 0)?, mp(4));
        Ok(())
    }

    #[test]
    fn test_prod_fail() {
        let a = MaxPlusMatrix::zeros(2, 3);
        let b = MaxPlusMatrix::zeros(2, 2);
        assert!(matches!(
            a.from_prod(&b),
            Err(SemiringError::DimensionMismatch {
                operation: "prod",
                left: (2, 3),
                right: (2, 2)
            })
        ));

        let mut into = MaxPlusMatrix::zeros(3, 3);
        assert!(b.prod_into(&b, &mut into).is_err());
    }

    #[test]
    fn test_min_plus_prod() -> Result<()> {
        let a = MinPlusMatrix::from_classical(2, 2, &[0.0, 3.0, Float::INFINITY, 0.0])?;
        let b = a.from_prod(&a)?;
        assert_eq!(b.to_classical(), vec![0.0, 3.0, Float::INFINITY, 0.0]);
        Ok(())
    }

    #[test]
    fn test_power() -> Result<()> {
        let a = MaxPlusMatrix::from_data(2, 2, vec![mp(1), mp(2), mp(3), mp(4)]);
        assert_eq!(a.power(0)?, MaxPlusMatrix::eye(2));
        assert_eq!(a.power(1)?, a);
        let a3 = a.from_prod(&a)?.from_prod(&a)?;
        assert_eq!(a.power(3)?, a3);
        assert!(MaxPlusMatrix::zeros(2, 3).power(2).is_err());
        Ok(())
    }

    #[test]
    fn test_transpose_trace() -> Result<()> {
        let a = MaxPlusMatrix::from_data(2, 3, vec![mp(1), mp(2), mp(3), mp(4), mp(5), mp(6)]);
        let t = a.transpose();
        assert_eq!(t.size(), (3, 2));
        assert_eq!(t.get(2, 1)?, mp(6));
        assert_eq!(t.get(0, 1)?, mp(4));
        assert!(a.trace().is_err());

        let sq = MaxPlusMatrix::from_data(2, 2, vec![mp(1), mp(9), mp(9), mp(-4)]);
        assert_eq!(sq.trace()?, mp(1));
        assert!(MaxPlusMatrix::zeros(2, 2).trace()?.is_zero());
        Ok(())
    }

    #[test]
    fn test_concat() -> Result<()> {
        let mut a = MaxPlusMatrix::new(mp(1), 2, 2);
        let b = MaxPlusMatrix::new(mp(5), 1, 2);
        a.concat_rows(&b)?;
        assert_eq!(a.size(), (3, 2));
        assert_eq!(a.get(2, 1)?, mp(5));
        assert!(a.concat_rows(&MaxPlusMatrix::zeros(1, 3)).is_err());

        let c = MaxPlusMatrix::new(mp(7), 3, 1);
        a.concat_cols(&c)?;
        assert_eq!(a.size(), (3, 3));
        assert_eq!(a.get(0, 2)?, mp(7));
        assert_eq!(a.get(0, 1)?, mp(1));
        assert_eq!(a.get(2, 0)?, mp(5));
        assert!(a.concat_cols(&MaxPlusMatrix::zeros(1, 1)).is_err());
        Ok(())
    }

    #[test]
    fn test_block_diag() -> Result<()> {
        let a = MaxPlusMatrix::new(mp(1), 1, 2);
        let b = MaxPlusMatrix::new(mp(2), 2, 1);
        let d = a.block_diag(&b);
        assert_eq!(d.size(), (3, 3));
        assert_eq!(d.get(0, 1)?, mp(1));
        assert!(d.get(0, 2)?.is_zero());
        assert!(d.get(1, 0)?.is_zero());
        assert_eq!(d.get(2, 2)?, mp(2));
        Ok(())
    }

    #[test]
    fn test_approx_eq() {
        let a = MaxPlusMatrix::from_classical(1, 2, &[1.0, Float::NEG_INFINITY]).unwrap();
        let b = MaxPlusMatrix::from_classical(1, 2, &[1.0 + 1e-6, Float::NEG_INFINITY]).unwrap();
        let c = MaxPlusMatrix::from_classical(1, 2, &[1.0, 0.0]).unwrap();
        assert!(a.approx_eq(&b, 1e-3));
        assert!(!a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&c, 1e3));
        assert!(!a.compare(&b));
        assert!(a.compare(&a.clone()));
    }

    #[test]
    fn test_classical_sub() -> Result<()> {
        let a = MaxPlusMatrix::from_data(1, 2, vec![mp(3), mp(1)]);
        let b = MaxPlusMatrix::from_data(1, 2, vec![mp(1), mp(1)]);
        assert_eq!(a.classical_sub(&b)?, vec![2.0, 0.0]);
        assert!(a.classical_sub(&MaxPlusMatrix::zeros(2, 2)).is_err());
        Ok(())
    }
}
