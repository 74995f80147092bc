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

//! Sampler configuration.

use serde::{Deserialize, Serialize};

/// How efficiency combinations are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Enumerate when the number of combinations is at most
    /// `exhaustive_threshold`, draw randomly otherwise.
    #[default]
    Auto,
    /// Always draw `iterations` random combinations.
    Random,
    /// Always enumerate every combination exactly once.
    Exhaustive,
}

impl std::fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingStrategy::Auto => write!(f, "auto"),
            SamplingStrategy::Random => write!(f, "random"),
            SamplingStrategy::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

/// Configuration for `MonteCarloEngine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Number of random iterations.
    pub iterations: u64,
    pub seed: u64,
    pub strategy: SamplingStrategy,
    /// Largest combination count `SamplingStrategy::Auto` still enumerates.
    pub exhaustive_threshold: u64,
}

impl SamplerConfig {
    pub const DEFAULT_ITERATIONS: u64 = 1000;
    pub const DEFAULT_EXHAUSTIVE_THRESHOLD: u64 = 256;

    #[inline]
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[inline]
    pub fn with_exhaustive_threshold(mut self, threshold: u64) -> Self {
        self.exhaustive_threshold = threshold;
        self
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            seed: 0,
            strategy: SamplingStrategy::default(),
            exhaustive_threshold: Self::DEFAULT_EXHAUSTIVE_THRESHOLD,
        }
    }
}
