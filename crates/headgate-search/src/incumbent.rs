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

//! # Incumbent (Best Iteration Holder)
//!
//! Tracks the best iteration of a run. The allocation objective is
//! maximized, so a candidate replaces the incumbent only if it is optimal and
//! its objective is strictly greater. Ties keep the earlier iteration, which
//! makes the best iteration of a seeded run reproducible.
//!
//! ## Usage
//!
//! ```rust
//! use headgate_search::incumbent::Incumbent;
//!
//! let mut incumbent = Incumbent::new();
//! assert!(incumbent.try_install(0, Some(10.0)));
//! assert!(!incumbent.try_install(1, Some(10.0)));
//! assert!(!incumbent.try_install(2, None));
//! assert!(incumbent.try_install(3, Some(12.5)));
//! assert_eq!(incumbent.position(), Some(3));
//! assert_eq!(incumbent.objective(), Some(12.5));
//! ```

/// The position and objective of the best optimal iteration so far.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Incumbent {
    best: Option<(usize, f64)>,
}

impl Incumbent {
    /// Creates an incumbent with nothing installed.
    #[inline]
    pub fn new() -> Self {
        Self { best: None }
    }

    /// Position of the best iteration in the run's iteration list.
    #[inline]
    pub fn position(&self) -> Option<usize> {
        self.best.map(|(position, _)| position)
    }

    #[inline]
    pub fn objective(&self) -> Option<f64> {
        self.best.map(|(_, objective)| objective)
    }

    /// Attempts to install the iteration at `position`.
    ///
    /// `objective` is `None` for non-optimal iterations, which are never
    /// installed. Returns `true` if the candidate became the incumbent.
    #[inline]
    pub fn try_install(&mut self, position: usize, objective: Option<f64>) -> bool {
        let Some(candidate) = objective else {
            return false;
        };
        if candidate.is_nan() {
            return false;
        }
        if let Some((_, current)) = self.best {
            if candidate <= current {
                return false;
            }
        }
        self.best = Some((position, candidate));
        true
    }
}

impl std::fmt::Display for Incumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.best {
            Some((position, objective)) => {
                write!(f, "Incumbent(iteration: {}, objective: {})", position, objective)
            }
            None => write!(f, "Incumbent(none)"),
        }
    }
}
