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

use crate::{
    aggregate::IterationResult, draw::DrawMode, monitor::run_monitor::RunMonitor,
    stats::RunStatistics,
};
use headgate_lp::{model::AllocationModel, solver::SolveStatus};
use std::time::{Duration, Instant};

/// Reports run progress through `tracing`.
///
/// A progress line is emitted at `info` every `log_every` iterations, but no
/// more often than `log_interval`. Non-optimal iterations are reported at
/// `warn`, new incumbents at `info`.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    log_every: u64,
    planned: u64,
    best_objective: Option<f64>,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, log_every: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            log_every: log_every.max(1),
            planned: 0,
            best_objective: None,
        }
    }

    #[inline]
    fn log_line(&mut self, stats: &RunStatistics) {
        let now = Instant::now();
        tracing::info!(
            elapsed_secs = now.duration_since(self.start_time).as_secs_f32(),
            iteration = stats.iterations,
            planned = self.planned,
            optimal = stats.optimal,
            non_optimal = stats.non_optimal(),
            best = ?self.best_objective,
            "monte carlo progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 100)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}s, log_every: {})",
            self.log_interval.as_secs(),
            self.log_every
        )
    }
}

impl RunMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_run(&mut self, model: &AllocationModel, mode: DrawMode) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.planned = mode.iterations();
        self.best_objective = None;
        tracing::info!(
            scope = %model.scope(),
            mode = %mode,
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            "monte carlo run started"
        );
    }

    fn on_iteration(&mut self, result: &IterationResult, stats: &RunStatistics) {
        if result.status != SolveStatus::Optimal {
            tracing::warn!(iteration = result.iteration, status = %result.status, "iteration not optimal");
        } else {
            tracing::debug!(iteration = result.iteration, objective = ?result.objective, "iteration solved");
        }

        if stats.iterations % self.log_every == 0 && self.last_log_time.elapsed() >= self.log_interval {
            self.log_line(stats);
        }
    }

    fn on_new_best(&mut self, result: &IterationResult, _stats: &RunStatistics) {
        self.best_objective = result.objective;
        tracing::info!(iteration = result.iteration, objective = ?result.objective, "new best iteration");
    }

    fn on_exit_run(&mut self, stats: &RunStatistics) {
        tracing::info!(
            iterations = stats.iterations,
            optimal = stats.optimal,
            infeasible = stats.infeasible,
            unbounded = stats.unbounded,
            improvements = stats.improvements,
            duration_secs = stats.duration.as_secs_f64(),
            best = ?self.best_objective,
            "monte carlo run finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_defaults() {
        let monitor = LogMonitor::default();
        assert_eq!(format!("{}", monitor), "LogMonitor(log_interval: 1s, log_every: 100)");
        assert_eq!(monitor.name(), "LogMonitor");
        assert_eq!(LogMonitor::new(Duration::ZERO, 0).log_every, 1);
    }

    #[test]
    fn test_tracks_best_objective() {
        let mut monitor = LogMonitor::new(Duration::ZERO, 1);
        let result = IterationResult {
            iteration: 3,
            status: SolveStatus::Optimal,
            objective: Some(9.5),
            draws: Vec::new(),
            fields: Vec::new(),
            wells: Vec::new(),
        };
        let mut stats = RunStatistics::default();
        stats.on_iteration(SolveStatus::Optimal);
        monitor.on_iteration(&result, &stats);
        monitor.on_new_best(&result, &stats);
        monitor.on_exit_run(&stats);
        assert_eq!(monitor.best_objective, Some(9.5));
    }
}
