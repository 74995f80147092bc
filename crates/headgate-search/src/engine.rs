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

//! The Monte Carlo iteration loop.
//!
//! One engine owns the sampling state of one run: the per-field options and
//! their effectiveness samples, the random number generator, and the
//! incumbent. Each iteration
//!
//! 1. chooses one option per field (randomly or by enumeration),
//! 2. writes the chosen efficiencies into the model's parameters,
//! 3. solves the model,
//! 4. aggregates the outcome into an `IterationResult`,
//! 5. appends the objective (or `0.0` if not optimal) to every chosen option,
//! 6. installs the result as the new best on strict improvement.
//!
//! The model's variables and constraints are never rebuilt; only its
//! parameters change between solves. Parameters are reset to `1.0` when the
//! run ends.

use crate::{
    aggregate::aggregate,
    config::SamplerConfig,
    draw::{DrawMode, Odometer, draw_random, resolve_mode},
    effectiveness::FieldEffectiveness,
    error::RunError,
    field_state::{FieldState, field_states},
    incumbent::Incumbent,
    monitor::run_monitor::RunMonitor,
    result::RunOutcome,
    stats::RunStatistics,
};
use headgate_lp::{model::AllocationModel, solver::LinearSolver};
use headgate_model::snapshot::Snapshot;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// A single-use Monte Carlo controller for one allocation model.
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    config: SamplerConfig,
    states: Vec<FieldState>,
    mode: DrawMode,
    rng: ChaCha8Rng,
}

impl MonteCarloEngine {
    /// Prepares a run over `model`, which must have been built from `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `RunError::CombinationOverflow` if exhaustive enumeration is
    /// forced but impossible, and `RunError::DegeneratePrior` if a field's
    /// prior cannot be sampled from.
    pub fn new(
        model: &AllocationModel,
        snapshot: &Snapshot<'_>,
        config: SamplerConfig,
    ) -> Result<Self, RunError> {
        let states = field_states(model, snapshot)?;
        let mode = resolve_mode(&config, &states)?;
        Ok(Self {
            config,
            states,
            mode,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    #[inline]
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// The resolved sampling plan.
    #[inline]
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    #[inline]
    pub fn field_states(&self) -> &[FieldState] {
        &self.states
    }

    /// Runs the sampler to completion.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Solver` if the backend fails or returns values that
    /// do not match the model. Infeasible and unbounded iterations are
    /// recorded, not returned as errors.
    pub fn run<S, M>(
        mut self,
        model: &mut AllocationModel,
        solver: &mut S,
        monitor: &mut M,
    ) -> Result<RunOutcome, RunError>
    where
        S: LinearSolver + ?Sized,
        M: RunMonitor + ?Sized,
    {
        debug_assert_eq!(
            model.num_parameters(),
            self.states.len(),
            "called `MonteCarloEngine::run` with a model that has {} parameters but {} field states",
            model.num_parameters(),
            self.states.len()
        );

        let start_time = Instant::now();
        let planned = self.mode.iterations();
        let mut stats = RunStatistics::default();
        let mut incumbent = Incumbent::new();
        let mut iterations = Vec::with_capacity(planned.min(1 << 16) as usize);
        let mut best_trace = Vec::with_capacity(iterations.capacity());
        let mut odometer = self.mode.is_exhaustive().then(|| Odometer::for_states(&self.states));
        let mut choices: Vec<usize> = Vec::with_capacity(self.states.len());

        tracing::info!(
            scope = %model.scope(),
            solver = solver.name(),
            mode = %self.mode,
            fields = self.states.len(),
            "starting monte carlo run"
        );
        monitor.on_enter_run(model, self.mode);

        for iteration in 0..planned {
            match odometer.as_mut() {
                Some(odometer) => {
                    let Some(digits) = odometer.next_combination() else {
                        break;
                    };
                    choices.clear();
                    choices.extend(
                        self.states
                            .iter()
                            .zip(digits)
                            .map(|(state, &digit)| state.support()[digit]),
                    );
                }
                None => draw_random(&self.states, &mut self.rng, &mut choices),
            }

            for (state, &choice) in self.states.iter().zip(&choices) {
                model.set_parameter(state.parameter(), state.options()[choice].efficiency);
            }

            let outcome = match solver.solve(model) {
                Ok(outcome) => outcome,
                Err(e) => {
                    model.reset_parameters();
                    return Err(e.into());
                }
            };
            if let Err(e) = outcome.check_shape(model) {
                model.reset_parameters();
                return Err(e.into());
            }
            stats.on_iteration(outcome.status());
            if !outcome.is_optimal() {
                tracing::warn!(iteration, status = ?outcome.status(), "iteration did not solve to optimality");
            }

            let result = aggregate(iteration, model, &self.states, &choices, &outcome);
            let sample = outcome.objective().filter(|_| outcome.is_optimal()).unwrap_or(0.0);
            for (state, &choice) in self.states.iter_mut().zip(&choices) {
                state.record(choice, sample);
            }

            monitor.on_iteration(&result, &stats);

            let position = iterations.len();
            if incumbent.try_install(position, result.objective) {
                stats.on_improvement();
                tracing::debug!(iteration, objective = ?result.objective, "new incumbent");
                monitor.on_new_best(&result, &stats);
            }
            best_trace.push(incumbent.objective());
            iterations.push(result);
        }

        model.reset_parameters();
        stats.set_duration(start_time.elapsed());
        monitor.on_exit_run(&stats);

        tracing::info!(
            scope = %model.scope(),
            iterations = stats.iterations,
            optimal = stats.optimal,
            best = ?incumbent.objective(),
            "finished monte carlo run"
        );

        let effectiveness = self.states.iter().map(FieldEffectiveness::from_state).collect();
        Ok(RunOutcome::new(
            model.scope(),
            self.mode.into(),
            iterations,
            incumbent.position(),
            best_trace,
            effectiveness,
            stats,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SamplingStrategy,
        monitor::{log::LogMonitor, no_op::NoOpMonitor},
        result::TerminationReason,
    };
    use headgate_core::num::{fraction::Fraction, tolerance::Tolerance};
    use headgate_lp::{
        backend::MicrolpSolver,
        builder::AllocationModelBuilder,
        config::{BuildConfig, MarginConfig},
        error::SolverError,
        solver::{SolveOutcome, SolveStatus},
    };
    use headgate_model::{
        entity::PriorWeight,
        index::{FieldIndex, IrrigationTypeIndex, ServiceAreaIndex},
        network::{Network, NetworkBuilder},
        period::{ProductionPeriod, TimeStep, Year},
        snapshot::Scope,
    };

    const T1: TimeStep = TimeStep::new(1);
    const Y: Year = Year::new(2018);

    /// Replays a fixed list of statuses and records the parameters it saw.
    struct ScriptedSolver {
        script: Vec<(SolveStatus, f64)>,
        calls: usize,
        seen: Vec<Vec<f64>>,
    }

    impl ScriptedSolver {
        fn new(script: Vec<(SolveStatus, f64)>) -> Self {
            Self {
                script,
                calls: 0,
                seen: Vec::new(),
            }
        }
    }

    impl LinearSolver for ScriptedSolver {
        fn name(&self) -> &str {
            "scripted"
        }

        fn solve(&mut self, model: &AllocationModel) -> Result<SolveOutcome, SolverError> {
            let (status, objective) = self.script[self.calls % self.script.len()];
            self.calls += 1;
            self.seen.push(model.parameters().to_vec());
            Ok(match status {
                SolveStatus::Optimal => {
                    SolveOutcome::optimal(objective, vec![0.0; model.num_variables()])
                }
                SolveStatus::Infeasible => SolveOutcome::infeasible(),
                SolveStatus::Unbounded => SolveOutcome::unbounded(),
            })
        }
    }

    struct FailingSolver {
        values: Option<usize>,
    }

    impl LinearSolver for FailingSolver {
        fn name(&self) -> &str {
            "failing"
        }

        fn solve(&mut self, _model: &AllocationModel) -> Result<SolveOutcome, SolverError> {
            match self.values {
                Some(n) => Ok(SolveOutcome::optimal(1.0, vec![0.0; n])),
                None => Err(SolverError::Backend("numerical trouble".into())),
            }
        }
    }

    /// `num_wells` wells and `num_fields` fields, every well piped to every
    /// field, two irrigation types (1.0 and 0.5) with a uniform fallback.
    fn grid(num_wells: usize, num_fields: usize, capacity: f64, demand: f64) -> (Network, Scope) {
        let mut b = NetworkBuilder::new();
        let area = b.add_service_area("A");
        b.add_irrigation_type("perfect", 1.0);
        b.add_irrigation_type("flood", 0.5);
        let wells: Vec<_> = (0..num_wells)
            .map(|i| {
                let w = b.add_well(format!("W{}", i), area);
                b.add_production(w, ProductionPeriod::annual(Y), None, capacity);
                w
            })
            .collect();
        for j in 0..num_fields {
            let f = b.add_field(format!("F{}", j), area, 1.0, None);
            b.add_field_timestep(f, T1, demand, 0.0);
            for (i, &w) in wells.iter().enumerate() {
                b.add_pipe(w, f, 100.0 * (i + j + 1) as f64);
            }
        }
        (b.build().unwrap(), Scope::new(area, T1, Y))
    }

    fn no_margins() -> BuildConfig {
        BuildConfig::default().with_margins(MarginConfig::none())
    }

    #[test]
    fn test_non_optimal_iterations_are_recorded_and_run_continues() {
        let (network, scope) = grid(1, 1, 100.0, 40.0);
        let snapshot = Snapshot::new(&network, scope);
        let mut model = AllocationModelBuilder::new(&snapshot, no_margins()).build().unwrap();
        let config = SamplerConfig::default()
            .with_strategy(SamplingStrategy::Random)
            .with_iterations(5);
        let engine = MonteCarloEngine::new(&model, &snapshot, config).unwrap();

        let mut solver = ScriptedSolver::new(vec![
            (SolveStatus::Optimal, 10.0),
            (SolveStatus::Infeasible, 0.0),
            (SolveStatus::Optimal, 20.0),
            (SolveStatus::Unbounded, 0.0),
            (SolveStatus::Optimal, 15.0),
        ]);
        let outcome = engine.run(&mut model, &mut solver, &mut NoOpMonitor).unwrap();

        let stats = outcome.statistics();
        assert_eq!(stats.iterations, 5);
        assert_eq!(stats.optimal, 3);
        assert_eq!(stats.infeasible, 1);
        assert_eq!(stats.unbounded, 1);
        assert_eq!(stats.improvements, 2);

        assert_eq!(outcome.termination_reason(), TerminationReason::IterationLimit);
        assert_eq!(outcome.iterations().len(), 5);
        assert_eq!(outcome.iterations()[1].status, SolveStatus::Infeasible);
        assert_eq!(outcome.best().unwrap().iteration, 2);
        assert_eq!(outcome.best_objective(), Some(20.0));
        assert_eq!(
            outcome.best_objective_trace(),
            &[Some(10.0), Some(10.0), Some(20.0), Some(20.0), Some(20.0)]
        );

        let samples: Vec<f64> = outcome.effectiveness()[0]
            .options
            .iter()
            .flat_map(|o| o.samples.iter().copied())
            .collect();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples.iter().filter(|&&s| s == 0.0).count(), 2);

        // Every solve saw the drawn efficiency; parameters are reset afterwards.
        assert!(solver.seen.iter().all(|p| p[0] == 1.0 || p[0] == 0.5));
        assert_eq!(model.parameters(), &[1.0]);
    }

    #[test]
    fn test_backend_failure_aborts_run() {
        let (network, scope) = grid(1, 1, 100.0, 40.0);
        let snapshot = Snapshot::new(&network, scope);
        let mut model = AllocationModelBuilder::new(&snapshot, no_margins()).build().unwrap();

        let engine = MonteCarloEngine::new(&model, &snapshot, SamplerConfig::default()).unwrap();
        let err = engine
            .run(&mut model, &mut FailingSolver { values: None }, &mut NoOpMonitor)
            .unwrap_err();
        assert_eq!(
            err,
            RunError::Solver(SolverError::Backend("numerical trouble".into()))
        );
        assert_eq!(model.parameters(), &[1.0]);

        let engine = MonteCarloEngine::new(&model, &snapshot, SamplerConfig::default()).unwrap();
        let err = engine
            .run(&mut model, &mut FailingSolver { values: Some(7) }, &mut NoOpMonitor)
            .unwrap_err();
        assert_eq!(
            err,
            RunError::Solver(SolverError::ShapeMismatch {
                expected: 1,
                found: 7
            })
        );
    }

    #[test]
    fn test_auto_enumerates_small_combination_spaces() {
        let (network, scope) = grid(1, 2, 100.0, 40.0);
        let snapshot = Snapshot::new(&network, scope);
        let mut model = AllocationModelBuilder::new(&snapshot, no_margins()).build().unwrap();
        let engine = MonteCarloEngine::new(&model, &snapshot, SamplerConfig::default()).unwrap();
        assert_eq!(engine.mode(), DrawMode::Exhaustive { combinations: 4 });

        let mut solver = ScriptedSolver::new(vec![(SolveStatus::Optimal, 1.0)]);
        let outcome = engine.run(&mut model, &mut solver, &mut NoOpMonitor).unwrap();
        assert_eq!(outcome.termination_reason(), TerminationReason::Exhausted);
        assert_eq!(
            solver.seen,
            vec![
                vec![1.0, 1.0],
                vec![0.5, 1.0],
                vec![1.0, 0.5],
                vec![0.5, 0.5]
            ]
        );
    }

    #[test]
    fn test_exhaustive_overflow() {
        let (network, scope) = grid(1, 65, 100.0, 40.0);
        let snapshot = Snapshot::new(&network, scope);
        let model = AllocationModelBuilder::new(&snapshot, no_margins()).build().unwrap();

        let forced = SamplerConfig::default().with_strategy(SamplingStrategy::Exhaustive);
        assert_eq!(
            MonteCarloEngine::new(&model, &snapshot, forced).unwrap_err(),
            RunError::CombinationOverflow { fields: 65 }
        );

        let auto = SamplerConfig::default().with_iterations(3);
        let engine = MonteCarloEngine::new(&model, &snapshot, auto).unwrap();
        assert_eq!(engine.mode(), DrawMode::Random { iterations: 3 });
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let (network, scope) = grid(2, 3, 60.0, 40.0);
        let snapshot = Snapshot::new(&network, scope);
        let config = SamplerConfig::default()
            .with_strategy(SamplingStrategy::Random)
            .with_iterations(20)
            .with_seed(42);

        let run = || {
            let mut model = AllocationModelBuilder::new(&snapshot, no_margins()).build().unwrap();
            let engine = MonteCarloEngine::new(&model, &snapshot, config).unwrap();
            engine
                .run(&mut model, &mut MicrolpSolver::new(), &mut NoOpMonitor)
                .unwrap()
        };
        let a = run();
        let b = run();

        let draws = |o: &RunOutcome| -> Vec<Vec<usize>> {
            o.iterations()
                .iter()
                .map(|r| r.draws.iter().map(|d| d.choice).collect())
                .collect()
        };
        assert_eq!(draws(&a), draws(&b));
        assert_eq!(a.best_objective(), b.best_objective());
        assert_eq!(a.iterations(), b.iterations());
        assert_eq!(a.effectiveness(), b.effectiveness());
    }

    #[test]
    fn test_optimal_iterations_respect_bounds() {
        let (network, scope) = grid(3, 4, 60.0, 40.0);
        let snapshot = Snapshot::new(&network, scope);
        let half = Fraction::new(0.5).unwrap();
        let config = BuildConfig::default().with_margins(MarginConfig::uniform(half));
        let mut model = AllocationModelBuilder::new(&snapshot, config).build().unwrap();
        let sampler = SamplerConfig::default()
            .with_strategy(SamplingStrategy::Random)
            .with_iterations(25)
            .with_seed(3);
        let engine = MonteCarloEngine::new(&model, &snapshot, sampler).unwrap();
        let outcome = engine
            .run(&mut model, &mut MicrolpSolver::new(), &mut LogMonitor::default())
            .unwrap();

        let tol = Tolerance::new(1e-6, 1e-9);
        assert!(outcome.statistics().optimal > 0);
        for result in outcome.iterations().iter().filter(|r| r.is_optimal()) {
            assert_eq!(result.fields.len(), 4);
            for f in &result.fields {
                assert!(tol.le(f.allocation, f.gross_demand), "{:?}", f);
                assert!(tol.ge(f.allocation, 0.5 * f.gross_demand), "{:?}", f);
                assert!(tol.eq(f.efficiency, result.draw(f.field).unwrap().efficiency));
            }
            for w in &result.wells {
                assert!(tol.le(w.allocated, w.capacity), "{:?}", w);
                assert!(tol.ge(w.allocated, 0.5 * w.capacity), "{:?}", w);
                assert!(tol.eq(w.unaccounted, w.capacity - w.allocated));
            }
        }

        let trace = outcome.best_objective_trace();
        for pair in trace.windows(2) {
            if let (Some(a), Some(b)) = (pair[0], pair[1]) {
                assert!(b >= a);
            }
            assert!(!(pair[0].is_some() && pair[1].is_none()));
        }
        assert_eq!(*trace.last().unwrap(), outcome.best_objective());

        let summary = outcome.area_summary().unwrap();
        assert_eq!(Some(summary.total_objective), outcome.best_objective());
        assert!(summary.total_allocated > 0.0);
    }

    #[test]
    fn test_zero_demand_fields_are_not_reported() {
        let mut b = NetworkBuilder::new();
        let area = b.add_service_area("A");
        b.add_irrigation_type("perfect", 1.0);
        let well = b.add_well("W1", area);
        let wet = b.add_field("F1", area, 1.0, None);
        let dry = b.add_field("F2", area, 1.0, None);
        b.add_field_timestep(wet, T1, 40.0, 0.0)
            .add_field_timestep(dry, T1, 1.0, 5.0)
            .add_production(well, ProductionPeriod::annual(Y), None, 100.0);
        b.add_pipe(well, wet, 100.0);
        b.add_pipe(well, dry, 100.0);
        let network = b.build().unwrap();

        let snapshot = Snapshot::new(&network, Scope::new(area, T1, Y));
        let mut model = AllocationModelBuilder::new(&snapshot, no_margins()).build().unwrap();
        let engine = MonteCarloEngine::new(&model, &snapshot, SamplerConfig::default()).unwrap();
        let outcome = engine
            .run(&mut model, &mut MicrolpSolver::new(), &mut NoOpMonitor)
            .unwrap();

        assert_eq!(outcome.iterations().len(), 1);
        let best = outcome.best().unwrap();
        assert!(best.field(dry).is_none());
        let f = best.field(wet).unwrap();
        assert!((f.allocation - 40.0).abs() < 1e-6);
        assert!((f.available_consumptive - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_enumeration_skips_zero_probability_options() {
        let mut b = NetworkBuilder::new();
        let area = b.add_service_area("A");
        let flood = b.add_irrigation_type("flood", 0.5);
        let drip = b.add_irrigation_type("drip", 0.9);
        let corn = b.add_crop("corn");
        b.set_crop_prior(
            corn,
            vec![
                PriorWeight {
                    irrigation_type: flood,
                    probability: 0.0,
                },
                PriorWeight {
                    irrigation_type: drip,
                    probability: 1.0,
                },
            ],
        );
        let well = b.add_well("W1", area);
        let corn_field = b.add_field("F1", area, 1.0, Some(corn));
        let open_field = b.add_field("F2", area, 1.0, None);
        b.add_field_timestep(corn_field, T1, 40.0, 0.0)
            .add_field_timestep(open_field, T1, 20.0, 0.0)
            .add_production(well, ProductionPeriod::annual(Y), None, 200.0);
        b.add_pipe(well, corn_field, 100.0);
        b.add_pipe(well, open_field, 100.0);
        let network = b.build().unwrap();

        let snapshot = Snapshot::new(&network, Scope::new(area, T1, Y));
        let mut model = AllocationModelBuilder::new(&snapshot, no_margins()).build().unwrap();
        let engine = MonteCarloEngine::new(&model, &snapshot, SamplerConfig::default()).unwrap();
        // Only drip for the corn field, both types for the uncropped field.
        assert_eq!(engine.mode(), DrawMode::Exhaustive { combinations: 2 });

        let outcome = engine
            .run(&mut model, &mut MicrolpSolver::new(), &mut NoOpMonitor)
            .unwrap();
        assert_eq!(outcome.iterations().len(), 2);
        for result in outcome.iterations() {
            let draw = result.draw(corn_field).unwrap();
            assert_eq!(draw.irrigation_type, drip);
            assert_eq!(draw.efficiency, 0.9);
        }
        assert_eq!(outcome.best().unwrap().draw(corn_field).unwrap().irrigation_type, drip);

        let eff = outcome.field_effectiveness(corn_field).unwrap();
        assert!(eff.options[0].samples.is_empty());
        assert_eq!(eff.options[1].samples.len(), 2);
    }

    fn single_field(crop_record: Option<f64>) -> (Network, ServiceAreaIndex, FieldIndex) {
        let mut b = NetworkBuilder::new();
        let area = b.add_service_area("A");
        b.add_irrigation_type("perfect", 1.0);
        b.add_irrigation_type("poor", 0.25);
        let crop = b.add_crop("X");
        let well = b.add_well("W1", area);
        let field = b.add_field("F1", area, 1.0, Some(crop));
        b.add_field_timestep(field, T1, 40.0, 0.0)
            .add_production(well, ProductionPeriod::annual(Y), None, 100.0);
        if let Some(q) = crop_record {
            b.add_production(well, ProductionPeriod::annual(Y), Some(crop), q);
        }
        b.add_pipe(well, field, 100.0);
        (b.build().unwrap(), area, field)
    }

    #[test]
    fn test_infeasible_efficiency_loses_effectiveness() {
        let (network, area, field) = single_field(None);
        let snapshot = Snapshot::new(&network, Scope::new(area, T1, Y));
        let config = BuildConfig::default()
            .with_margins(MarginConfig::default().with_well_allocation(Fraction::ZERO));
        let mut model = AllocationModelBuilder::new(&snapshot, config).build().unwrap();
        let engine = MonteCarloEngine::new(&model, &snapshot, SamplerConfig::default()).unwrap();
        let outcome = engine
            .run(&mut model, &mut MicrolpSolver::new(), &mut NoOpMonitor)
            .unwrap();

        // Efficiency 0.25 needs at least 152 units from a 100 unit well.
        let statuses: Vec<SolveStatus> = outcome.iterations().iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![SolveStatus::Optimal, SolveStatus::Infeasible]);
        assert_eq!(outcome.best().unwrap().iteration, 0);

        let eff = outcome.field_effectiveness(field).unwrap();
        assert!(eff.options[0].mean() > 0.0);
        assert_eq!(eff.options[1].samples, vec![0.0]);
        assert_eq!(
            outcome.posterior(field).unwrap(),
            vec![
                (IrrigationTypeIndex::new(0), 1.0),
                (IrrigationTypeIndex::new(1), 0.0)
            ]
        );

        let pooled = outcome.by_irrigation_type();
        assert_eq!(pooled.len(), 2);
        assert_eq!(pooled[1].mean(), 0.0);
    }

    #[test]
    fn test_infeasible_attribution_never_installs_best() {
        let (network, area, field) = single_field(Some(10.0));
        let snapshot = Snapshot::new(&network, Scope::new(area, T1, Y));
        let config = BuildConfig::default()
            .with_margins(MarginConfig::default().with_well_allocation(Fraction::ZERO));
        let mut model = AllocationModelBuilder::new(&snapshot, config).build().unwrap();
        let engine = MonteCarloEngine::new(&model, &snapshot, SamplerConfig::default()).unwrap();
        let outcome = engine
            .run(&mut model, &mut MicrolpSolver::new(), &mut NoOpMonitor)
            .unwrap();

        assert_eq!(outcome.statistics().iterations, 2);
        assert_eq!(outcome.statistics().infeasible, 2);
        assert!(outcome.best().is_none());
        assert!(outcome.area_summary().is_none());
        assert_eq!(outcome.best_objective_trace(), &[None, None]);
        // Nothing was ever optimal, so the posterior is the prior.
        assert_eq!(
            outcome.posterior(field).unwrap(),
            vec![
                (IrrigationTypeIndex::new(0), 0.5),
                (IrrigationTypeIndex::new(1), 0.5)
            ]
        );
    }
}
