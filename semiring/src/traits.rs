use serde::Serialize;

use crate::{Float, Result, SemiringError};

/// Define the basic algebraic requirements of a semiring scalar.
///
/// The named methods are the contract; the `+` and `*` operators
/// implemented by [`MaxPlus`](crate::MaxPlus) and [`MinPlus`](crate::MinPlus)
/// only forward to them.
pub trait Semiring:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + Sized
    + std::fmt::Debug
    + Sync
    + Send
    + Serialize
{
    /// `1.0` when $`\oplus`$ is the maximum, `-1.0` when it is the minimum.
    ///
    /// Multiplying a classical difference by this gives a positive number
    /// whenever the first operand is "better" in the semiring order.
    const ORIENTATION: Float;

    /// Returns the absorbing element $`\varepsilon`$, which is the identity
    /// of $`\oplus`$.
    fn zero() -> Self;

    /// Returns the identity of $`\otimes`$ (i.e., the classical `0`).
    fn one() -> Self;

    /// Semiring addition
    fn oplus(self, other: Self) -> Self;

    /// Semiring multiplication. $`\varepsilon`$ is absorbing, also against
    /// itself.
    ///
    /// This is a plain floating point sum, so two finite values whose sum
    /// falls out of the range of [`Float`] give an infinity. Use
    /// [`checked_otimes`](Semiring::checked_otimes) when the operands may be
    /// that large.
    fn otimes(self, other: Self) -> Self;

    /// Same as [`otimes`](Semiring::otimes), but returns `InvalidValue` when
    /// two finite values overflow into an infinity.
    fn checked_otimes(self, other: Self) -> Result<Self> {
        let ret = self.otimes(other);
        if self.is_zero() || other.is_zero() || ret.value().is_finite() {
            Ok(ret)
        } else {
            Err(SemiringError::InvalidValue { value: ret.value() })
        }
    }

    /// The classical value of the scalar. $`\varepsilon`$ maps to
    /// the corresponding signed infinity.
    fn value(self) -> Float;

    /// Lifts a classical value into the semiring.
    ///
    /// Returns [`InvalidValue`](crate::SemiringError::InvalidValue) for
    /// `NaN` and for the infinity that is not $`\varepsilon`$.
    fn lift(v: Float) -> Result<Self>;

    /// Checks whether this is $`\varepsilon`$
    fn is_zero(self) -> bool {
        self == Self::zero()
    }

    /// Checks whether `self` is strictly better than `other` in the semiring
    /// order (i.e., larger in max-plus, smaller in min-plus) by more than `tol`.
    fn exceeds(self, other: Self, tol: Float) -> bool {
        if self.is_zero() {
            return false;
        }
        if other.is_zero() {
            return true;
        }
        Self::ORIENTATION * (self.value() - other.value()) > tol
    }
}

/// Implements the operator sugar, the integer promotions and the
/// serialization proxy shared by every scalar in this crate.
macro_rules! scalar_boilerplate {
    ( $name : ident ) => {
        impl std::ops::Add for $name {
            type Output = Self;
            fn add(self, other: Self) -> Self {
                self.oplus(other)
            }
        }

        impl std::ops::AddAssign for $name {
            fn add_assign(&mut self, other: Self) {
                *self = self.oplus(other);
            }
        }

        impl std::ops::Mul for $name {
            type Output = Self;
            fn mul(self, other: Self) -> Self {
                self.otimes(other)
            }
        }

        impl std::ops::MulAssign for $name {
            fn mul_assign(&mut self, other: Self) {
                *self = self.otimes(other);
            }
        }

        impl From<i32> for $name {
            fn from(v: i32) -> Self {
                Self(v as Float)
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                Self(v as Float)
            }
        }

        impl TryFrom<Float> for $name {
            type Error = SemiringError;
            fn try_from(v: Float) -> Result<Self> {
                <Self as Semiring>::lift(v)
            }
        }

        // JSON has no infinities, so the absorbing element travels as `null`.
        impl From<$name> for Option<Float> {
            fn from(v: $name) -> Self {
                if v.is_zero() {
                    None
                } else {
                    Some(v.0)
                }
            }
        }

        impl TryFrom<Option<Float>> for $name {
            type Error = SemiringError;
            fn try_from(v: Option<Float>) -> Result<Self> {
                match v {
                    Some(v) => <Self as Semiring>::lift(v),
                    None => Ok(<Self as Semiring>::zero()),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as Semiring>::zero()
            }
        }

        impl $name {
            /// Ordinary (classical) sum of the two values. This is **not**
            /// a semiring operation.
            pub fn classical_add(self, other: Self) -> Float {
                self.0 + other.0
            }

            /// Ordinary (classical) difference of the two values. This is **not**
            /// a semiring operation.
            pub fn classical_sub(self, other: Self) -> Float {
                self.0 - other.0
            }
        }
    };
}
pub(crate) use scalar_boilerplate;
