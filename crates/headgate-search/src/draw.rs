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

//! Choosing efficiency combinations.
//!
//! A combination assigns one option index to every field state. Random
//! draws sample each field independently in field order; exhaustive
//! enumeration walks every combination once as a mixed-radix counter whose
//! first digit (the first field) varies fastest. Both only ever pick options
//! with positive prior probability.

use crate::{
    config::{SamplerConfig, SamplingStrategy},
    error::RunError,
    field_state::FieldState,
};
use rand::Rng;

/// The resolved sampling plan of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Random { iterations: u64 },
    Exhaustive { combinations: u64 },
}

impl DrawMode {
    /// Number of iterations the plan runs.
    #[inline]
    pub fn iterations(&self) -> u64 {
        match *self {
            DrawMode::Random { iterations } => iterations,
            DrawMode::Exhaustive { combinations } => combinations,
        }
    }

    #[inline]
    pub fn is_exhaustive(&self) -> bool {
        matches!(self, DrawMode::Exhaustive { .. })
    }
}

impl std::fmt::Display for DrawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawMode::Random { iterations } => write!(f, "Random(iterations: {})", iterations),
            DrawMode::Exhaustive { combinations } => {
                write!(f, "Exhaustive(combinations: {})", combinations)
            }
        }
    }
}

/// The number of distinct combinations of drawable options, `None` if it
/// overflows `u64`.
///
/// No fields means exactly one (empty) combination.
pub fn combination_count(states: &[FieldState]) -> Option<u64> {
    states
        .iter()
        .try_fold(1u64, |acc, s| acc.checked_mul(s.support().len() as u64))
}

/// Resolves the configured strategy against the actual field states.
///
/// # Errors
///
/// Returns `RunError::CombinationOverflow` if exhaustive enumeration is
/// forced and the combination count does not fit in a `u64`.
pub fn resolve_mode(config: &SamplerConfig, states: &[FieldState]) -> Result<DrawMode, RunError> {
    let count = combination_count(states);
    let random = DrawMode::Random {
        iterations: config.iterations,
    };
    match config.strategy {
        SamplingStrategy::Random => Ok(random),
        SamplingStrategy::Exhaustive => count
            .map(|combinations| DrawMode::Exhaustive { combinations })
            .ok_or(RunError::CombinationOverflow {
                fields: states.len(),
            }),
        SamplingStrategy::Auto => Ok(match count {
            Some(combinations) if combinations <= config.exhaustive_threshold => {
                DrawMode::Exhaustive { combinations }
            }
            _ => random,
        }),
    }
}

/// Draws one option per field, in field order, into `choices`.
pub fn draw_random<R>(states: &[FieldState], rng: &mut R, choices: &mut Vec<usize>)
where
    R: Rng + ?Sized,
{
    choices.clear();
    choices.extend(states.iter().map(|s| s.draw(rng)));
}

/// A mixed-radix counter over option indices.
///
/// # Examples
///
/// ```rust
/// # use headgate_search::draw::Odometer;
/// let mut odometer = Odometer::new(vec![2, 3]);
/// let mut seen = Vec::new();
/// while let Some(digits) = odometer.next_combination() {
///     seen.push(digits.to_vec());
/// }
/// assert_eq!(seen.len(), 6);
/// assert_eq!(seen[0], vec![0, 0]);
/// assert_eq!(seen[1], vec![1, 0]);
/// assert_eq!(seen[2], vec![0, 1]);
/// assert_eq!(seen[5], vec![1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Odometer {
    radices: Vec<usize>,
    digits: Vec<usize>,
    started: bool,
    done: bool,
}

impl Odometer {
    /// Creates a counter with one digit per radix.
    ///
    /// A zero radix yields no combinations at all.
    pub fn new(radices: Vec<usize>) -> Self {
        let done = radices.contains(&0);
        let digits = vec![0; radices.len()];
        Self {
            radices,
            digits,
            started: false,
            done,
        }
    }

    /// Creates a counter over the drawable options of `states`. Digit `i`
    /// indexes into `states[i].support()`.
    pub fn for_states(states: &[FieldState]) -> Self {
        Self::new(states.iter().map(|s| s.support().len()).collect())
    }

    /// Advances to the next combination and returns it.
    pub fn next_combination(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.digits);
        }

        for i in 0..self.digits.len() {
            self.digits[i] += 1;
            if self.digits[i] < self.radices[i] {
                return Some(&self.digits);
            }
            self.digits[i] = 0;
        }

        self.done = true;
        None
    }
}
