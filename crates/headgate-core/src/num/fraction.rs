// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Fractions in the closed unit interval.
//!
//! Margins (how close a solved allocation must stay to an observed quantity)
//! and irrigation efficiencies (how much applied water the crop actually
//! consumes) are both shares of a whole. `Fraction` validates that once, at
//! construction, so the model builder and sampler can multiply by it freely.
//!
//! Serialization goes through a plain `f64`, and deserialization re-runs the
//! validation, so an out-of-range value in a configuration file is rejected
//! when the file is read rather than when the model is built.

use serde::{Deserialize, Serialize};

/// The error returned when a value cannot be represented as a `Fraction`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FractionError {
    /// The value is NaN or infinite.
    #[error("fraction must be finite, got {0}")]
    NotFinite(f64),
    /// The value lies outside `[0, 1]`.
    #[error("fraction must lie in [0, 1], got {0}")]
    OutOfRange(f64),
}

/// A finite `f64` in `[0, 1]`.
///
/// # Examples
///
/// ```rust
/// # use headgate_core::num::fraction::Fraction;
/// let margin = Fraction::new(0.5).unwrap();
/// assert_eq!(margin.of(200.0), 100.0);
/// assert!(Fraction::new(1.5).is_err());
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Fraction(f64);

impl Fraction {
    /// The fraction `0.0`.
    pub const ZERO: Fraction = Fraction(0.0);

    /// The fraction `1.0`.
    pub const ONE: Fraction = Fraction(1.0);

    /// Creates a new fraction, validating that `value` is finite and in `[0, 1]`.
    #[inline]
    pub fn new(value: f64) -> Result<Self, FractionError> {
        if !value.is_finite() {
            return Err(FractionError::NotFinite(value));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(FractionError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Creates a fraction by clamping `value` into `[0, 1]`. NaN maps to zero.
    ///
    /// ```rust
    /// # use headgate_core::num::fraction::Fraction;
    /// assert_eq!(Fraction::clamped(1.7), Fraction::ONE);
    /// assert_eq!(Fraction::clamped(f64::NAN), Fraction::ZERO);
    /// ```
    #[inline]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the underlying value.
    #[inline(always)]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Returns `self × quantity`.
    #[inline(always)]
    pub fn of(self, quantity: f64) -> f64 {
        self.0 * quantity
    }

    /// Returns `true` if the fraction is exactly zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f64> for Fraction {
    type Error = FractionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fraction> for f64 {
    fn from(fraction: Fraction) -> Self {
        fraction.0
    }
}

impl std::fmt::Debug for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fraction({})", self.0)
    }
}

impl std::fmt::Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
