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

//! # Service-Area Planner
//!
//! Runs the full pipeline (snapshot, model build, Monte Carlo run) for a list
//! of scopes and collects one `AreaReport` per scope that succeeded and one
//! `AreaFailure` per scope that did not. A failing scope never prevents the
//! others from being planned.
//!
//! With `RunConfig::parallel` set, every scope runs on its own thread inside
//! `std::thread::scope`. Each thread owns its snapshot, model, engine, and a
//! clone of the solver backend, so nothing is shared between runs except the
//! read-only network.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use headgate_lp::backend::MicrolpSolver;
//! use headgate_model::period::{TimeStep, Year};
//! use headgate_solver::{config::RunConfig, planner::PlannerBuilder};
//!
//! # fn run(network: &headgate_model::network::Network) -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::from_path("headgate.toml")?;
//! let planner = PlannerBuilder::new(MicrolpSolver::new())
//!     .with_config(config)
//!     .build();
//!
//! let outcome = planner.plan_all(network, TimeStep::new(6), Year::new(2018));
//! for report in outcome.reports() {
//!     println!("{}", report);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
    config::RunConfig,
    error::{AreaFailure, PlanError},
};
use headgate_lp::{
    builder::AllocationModelBuilder, config::BuildConfig, solver::LinearSolver,
};
use headgate_model::{
    index::ServiceAreaIndex,
    network::Network,
    period::{TimeStep, Year},
    snapshot::{Scope, Snapshot},
};
use headgate_search::{
    config::SamplerConfig,
    engine::MonteCarloEngine,
    monitor::log::LogMonitor,
    result::{AreaSummary, RunOutcome},
    stats::RunStatistics,
};
use std::time::{Duration, Instant};

/// The result of planning one service area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaReport {
    scope: Scope,
    num_variables: usize,
    num_constraints: usize,
    outcome: RunOutcome,
}

impl AreaReport {
    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Number of decision variables in the area's model.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.num_constraints
    }

    #[inline]
    pub fn outcome(&self) -> &RunOutcome {
        &self.outcome
    }

    #[inline]
    pub fn into_outcome(self) -> RunOutcome {
        self.outcome
    }

    /// Totals of the best iteration, if any iteration was optimal.
    #[inline]
    pub fn summary(&self) -> Option<AreaSummary> {
        self.outcome.area_summary()
    }
}

impl std::fmt::Display for AreaReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.summary() {
            Some(summary) => write!(f, "{}", summary)?,
            None => write!(f, "{}: no optimal iteration", self.scope)?,
        }
        write!(
            f,
            " ({} variables, {} constraints, {} iterations)",
            self.num_variables,
            self.num_constraints,
            self.outcome.statistics().iterations
        )
    }
}

/// Counters of a planning pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanStatistics {
    pub areas_planned: usize,
    pub areas_failed: usize,
    /// Run statistics merged over every planned area.
    pub runs: RunStatistics,
    /// Wall time of the whole pass.
    pub duration: Duration,
}

impl std::fmt::Display for PlanStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Plan Statistics:")?;
        writeln!(f, "  Areas planned: {}", self.areas_planned)?;
        writeln!(f, "  Areas failed: {}", self.areas_failed)?;
        writeln!(f, "  Duration (secs): {:.3}", self.duration.as_secs_f64())?;
        write!(f, "{}", self.runs)
    }
}

/// The result of a planning pass over several scopes.
#[derive(Debug)]
pub struct PlanOutcome {
    reports: Vec<AreaReport>,
    failures: Vec<AreaFailure>,
    statistics: PlanStatistics,
}

impl PlanOutcome {
    /// Reports in the order their scopes were requested.
    #[inline]
    pub fn reports(&self) -> &[AreaReport] {
        &self.reports
    }

    #[inline]
    pub fn failures(&self) -> &[AreaFailure] {
        &self.failures
    }

    #[inline]
    pub fn statistics(&self) -> &PlanStatistics {
        &self.statistics
    }

    /// Returns `true` if every requested scope was planned.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn report(&self, scope: Scope) -> Option<&AreaReport> {
        self.reports.iter().find(|r| r.scope == scope)
    }

    /// Sum of the best objectives of all areas that had an optimal iteration.
    pub fn total_objective(&self) -> f64 {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.best_objective())
            .sum()
    }
}

/// Plans service areas with clones of one solver backend.
#[derive(Debug, Clone)]
pub struct Planner<S> {
    solver: S,
    config: RunConfig,
}

impl<S> Planner<S>
where
    S: LinearSolver + Clone + Send,
{
    #[inline]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    #[inline]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Plans a single scope.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::Build` if the model cannot be built and
    /// `PlanError::Run` if the Monte Carlo run fails.
    pub fn plan_area(&self, network: &Network, scope: Scope) -> Result<AreaReport, PlanError> {
        let mut solver = self.solver.clone();
        run_area(network, scope, &self.config, &mut solver)
    }

    /// Plans every service area of `network` at one time step and year.
    pub fn plan_all(&self, network: &Network, timestep: TimeStep, year: Year) -> PlanOutcome {
        let scopes: Vec<Scope> = (0..network.num_service_areas())
            .map(|a| Scope::new(ServiceAreaIndex::new(a), timestep, year))
            .collect();
        self.plan(network, &scopes)
    }

    /// Plans every scope in `scopes`.
    pub fn plan(&self, network: &Network, scopes: &[Scope]) -> PlanOutcome {
        let start_time = Instant::now();
        tracing::info!(
            scopes = scopes.len(),
            parallel = self.config.parallel,
            solver = self.solver.name(),
            "planning service areas"
        );

        let results = if self.config.parallel && scopes.len() > 1 {
            self.run_parallel(network, scopes)
        } else {
            scopes
                .iter()
                .map(|&scope| self.plan_area(network, scope))
                .collect()
        };

        let mut reports = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        let mut runs = RunStatistics::default();
        for (&scope, result) in scopes.iter().zip(results) {
            match result {
                Ok(report) => {
                    runs.merge(report.outcome.statistics());
                    reports.push(report);
                }
                Err(error) => {
                    tracing::warn!(%scope, %error, "failed to plan service area");
                    failures.push(AreaFailure { scope, error });
                }
            }
        }

        let statistics = PlanStatistics {
            areas_planned: reports.len(),
            areas_failed: failures.len(),
            runs,
            duration: start_time.elapsed(),
        };
        tracing::info!(
            planned = statistics.areas_planned,
            failed = statistics.areas_failed,
            "finished planning"
        );

        PlanOutcome {
            reports,
            failures,
            statistics,
        }
    }

    fn run_parallel(&self, network: &Network, scopes: &[Scope]) -> Vec<Result<AreaReport, PlanError>> {
        let config = self.config;
        std::thread::scope(|s| {
            let handles: Vec<_> = scopes
                .iter()
                .map(|&scope| {
                    let mut solver = self.solver.clone();
                    s.spawn(move || run_area(network, scope, &config, &mut solver))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        })
    }
}

fn run_area<S>(
    network: &Network,
    scope: Scope,
    config: &RunConfig,
    solver: &mut S,
) -> Result<AreaReport, PlanError>
where
    S: LinearSolver + ?Sized,
{
    let snapshot = Snapshot::new(network, scope);
    let mut model = AllocationModelBuilder::new(&snapshot, config.build).build()?;
    let num_variables = model.num_variables();
    let num_constraints = model.num_constraints();

    let engine = MonteCarloEngine::new(&model, &snapshot, config.sampler)?;
    let outcome = engine.run(&mut model, solver, &mut LogMonitor::default())?;

    Ok(AreaReport {
        scope,
        num_variables,
        num_constraints,
        outcome,
    })
}

/// Builder for `Planner`.
#[derive(Debug, Clone)]
pub struct PlannerBuilder<S> {
    solver: S,
    config: RunConfig,
}

impl<S> Default for PlannerBuilder<S>
where
    S: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> PlannerBuilder<S> {
    #[inline]
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            config: RunConfig::default(),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn with_build_config(mut self, build: BuildConfig) -> Self {
        self.config.build = build;
        self
    }

    #[inline]
    pub fn with_sampler_config(mut self, sampler: SamplerConfig) -> Self {
        self.config.sampler = sampler;
        self
    }

    #[inline]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    #[inline]
    pub fn build(self) -> Planner<S> {
        Planner {
            solver: self.solver,
            config: self.config,
        }
    }
}
