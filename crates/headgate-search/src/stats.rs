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

//! Statistics of a Monte Carlo run.

use headgate_lp::solver::SolveStatus;
use std::time::Duration;

/// Counters collected while a run progresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RunStatistics {
    /// Number of iterations performed.
    pub iterations: u64,
    pub optimal: u64,
    pub infeasible: u64,
    pub unbounded: u64,
    /// Number of times the incumbent was replaced.
    pub improvements: u64,
    pub duration: Duration,
}

impl RunStatistics {
    /// Called once per solved iteration.
    #[inline]
    pub fn on_iteration(&mut self, status: SolveStatus) {
        self.iterations = self.iterations.saturating_add(1);
        let counter = match status {
            SolveStatus::Optimal => &mut self.optimal,
            SolveStatus::Infeasible => &mut self.infeasible,
            SolveStatus::Unbounded => &mut self.unbounded,
        };
        *counter = counter.saturating_add(1);
    }

    /// Called when the incumbent is replaced.
    #[inline]
    pub fn on_improvement(&mut self) {
        self.improvements = self.improvements.saturating_add(1);
    }

    #[inline]
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Iterations that did not end `Optimal`.
    #[inline]
    pub fn non_optimal(&self) -> u64 {
        self.infeasible.saturating_add(self.unbounded)
    }

    /// Adds the counters of `other` and keeps the longer duration.
    pub fn merge(&mut self, other: &RunStatistics) {
        self.iterations = self.iterations.saturating_add(other.iterations);
        self.optimal = self.optimal.saturating_add(other.optimal);
        self.infeasible = self.infeasible.saturating_add(other.infeasible);
        self.unbounded = self.unbounded.saturating_add(other.unbounded);
        self.improvements = self.improvements.saturating_add(other.improvements);
        self.duration = self.duration.max(other.duration);
    }
}

impl std::fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run Statistics:")?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Optimal: {}", self.optimal)?;
        writeln!(f, "  Infeasible: {}", self.infeasible)?;
        writeln!(f, "  Unbounded: {}", self.unbounded)?;
        writeln!(f, "  Improvements: {}", self.improvements)?;
        writeln!(f, "  Duration (secs): {:.3}", self.duration.as_secs_f64())
    }
}

/// Builder for `RunStatistics`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunStatisticsBuilder {
    stats: RunStatistics,
}

impl RunStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.stats.iterations = iterations;
        self
    }

    #[inline]
    pub fn optimal(mut self, optimal: u64) -> Self {
        self.stats.optimal = optimal;
        self
    }

    #[inline]
    pub fn infeasible(mut self, infeasible: u64) -> Self {
        self.stats.infeasible = infeasible;
        self
    }

    #[inline]
    pub fn unbounded(mut self, unbounded: u64) -> Self {
        self.stats.unbounded = unbounded;
        self
    }

    #[inline]
    pub fn improvements(mut self, improvements: u64) -> Self {
        self.stats.improvements = improvements;
        self
    }

    #[inline]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.stats.duration = duration;
        self
    }

    #[inline]
    pub fn build(self) -> RunStatistics {
        self.stats
    }
}
