use crate::traits::scalar_boilerplate;
use crate::{Float, Result, Semiring, SemiringError};
use serde::{Deserialize, Serialize};

/// An element of the max-plus semiring $`(\mathbb{R}\cup\{-\infty\}, \max, +)`$
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(into = "Option<Float>", try_from = "Option<Float>")]
pub struct MaxPlus(Float);

impl Semiring for MaxPlus {
    const ORIENTATION: Float = 1.0;

    fn zero() -> Self {
        Self(Float::NEG_INFINITY)
    }

    fn one() -> Self {
        Self(0.0)
    }

    fn oplus(self, other: Self) -> Self {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    fn otimes(self, other: Self) -> Self {
        // epsilon is absorbing
        if self.is_zero() || other.is_zero() {
            Self::zero()
        } else {
            Self(self.0 + other.0)
        }
    }

    fn value(self) -> Float {
        self.0
    }

    fn lift(v: Float) -> Result<Self> {
        if v.is_nan() || v == Float::INFINITY {
            Err(SemiringError::InvalidValue { value: v })
        } else {
            Ok(Self(v))
        }
    }
}

scalar_boilerplate!(MaxPlus);
