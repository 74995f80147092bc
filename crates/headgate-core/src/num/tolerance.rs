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

//! Tolerant comparisons for solver output.
//!
//! Simplex solutions satisfy `Σ x ≤ b` only up to accumulated pivoting error,
//! so checking a solved allocation against its analytic bound with a bare `<=`
//! produces spurious violations. `Tolerance` combines an absolute floor (for
//! bounds near zero) with a relative term (for large volumes).

/// Mixed absolute/relative tolerance.
///
/// Two values `a` and `b` are considered equal when
/// `|a - b| <= absolute + relative * max(|a|, |b|)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    absolute: f64,
    relative: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(1e-6, 1e-9)
    }
}

impl Tolerance {
    /// Creates a new tolerance.
    ///
    /// # Panics
    ///
    /// Panics if either component is negative or not finite.
    #[inline]
    pub fn new(absolute: f64, relative: f64) -> Self {
        assert!(
            absolute.is_finite() && absolute >= 0.0,
            "called `Tolerance::new` with invalid absolute tolerance: {}",
            absolute
        );
        assert!(
            relative.is_finite() && relative >= 0.0,
            "called `Tolerance::new` with invalid relative tolerance: {}",
            relative
        );
        Self { absolute, relative }
    }

    /// Returns the absolute component.
    #[inline]
    pub fn absolute(&self) -> f64 {
        self.absolute
    }

    /// Returns the relative component.
    #[inline]
    pub fn relative(&self) -> f64 {
        self.relative
    }

    #[inline]
    fn slack(&self, a: f64, b: f64) -> f64 {
        self.absolute + self.relative * a.abs().max(b.abs())
    }

    /// Returns `true` if `a` and `b` are equal within tolerance.
    #[inline]
    pub fn eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.slack(a, b)
    }

    /// Returns `true` if `a <= b` within tolerance.
    #[inline]
    pub fn le(&self, a: f64, b: f64) -> bool {
        a <= b + self.slack(a, b)
    }

    /// Returns `true` if `a >= b` within tolerance.
    #[inline]
    pub fn ge(&self, a: f64, b: f64) -> bool {
        a + self.slack(a, b) >= b
    }

    /// Clamps values that are within tolerance of zero to exactly zero.
    ///
    /// Solvers routinely report `-1e-12` for variables sitting on their lower
    /// bound.
    #[inline]
    pub fn snap_zero(&self, value: f64) -> f64 {
        if value.abs() <= self.absolute { 0.0 } else { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_uses_absolute_near_zero() {
        let tol = Tolerance::new(1e-6, 0.0);
        assert!(tol.eq(0.0, 5e-7));
        assert!(!tol.eq(0.0, 2e-6));
    }

    #[test]
    fn test_relative_component_scales_with_magnitude() {
        let tol = Tolerance::new(0.0, 1e-6);
        assert!(tol.eq(1_000_000.0, 1_000_000.5));
        assert!(!tol.eq(1.0, 1.5));
    }

    #[test]
    fn test_le_and_ge() {
        let tol = Tolerance::default();
        assert!(tol.le(40.0000000001, 40.0));
        assert!(!tol.le(40.1, 40.0));
        assert!(tol.ge(39.9999999999, 40.0));
        assert!(!tol.ge(39.0, 40.0));
    }

    #[test]
    fn test_snap_zero() {
        let tol = Tolerance::default();
        assert_eq!(tol.snap_zero(-1e-12), 0.0);
        assert_eq!(tol.snap_zero(3.0), 3.0);
    }

    #[test]
    #[should_panic]
    fn test_negative_tolerance_panics() {
        let _ = Tolerance::new(-1.0, 0.0);
    }
}
