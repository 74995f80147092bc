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

//! The record of a finished Monte Carlo run.
//!
//! `RunOutcome` keeps every iteration in order, the position of the best
//! one, the best objective after each iteration, the effectiveness samples
//! of every field, and the run statistics. Summaries per service area and
//! per irrigation type are derived from those on request.

use crate::{
    aggregate::IterationResult,
    draw::DrawMode,
    effectiveness::{FieldEffectiveness, TypeEffectiveness, pool_by_irrigation_type},
    stats::RunStatistics,
};
use headgate_model::{
    index::{FieldIndex, IrrigationTypeIndex},
    snapshot::Scope,
};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// Every efficiency combination was evaluated once.
    Exhausted,
    /// The configured number of random iterations was reached.
    IterationLimit,
}

impl From<DrawMode> for TerminationReason {
    fn from(mode: DrawMode) -> Self {
        match mode {
            DrawMode::Exhaustive { .. } => TerminationReason::Exhausted,
            DrawMode::Random { .. } => TerminationReason::IterationLimit,
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "All Combinations Evaluated"),
            TerminationReason::IterationLimit => write!(f, "Iteration Limit Reached"),
        }
    }
}

/// Totals of the best iteration of one service area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSummary {
    pub scope: Scope,
    pub total_objective: f64,
    pub total_allocated: f64,
}

impl std::fmt::Display for AreaSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: objective {:.3}, allocated {:.3}",
            self.scope, self.total_objective, self.total_allocated
        )
    }
}

/// Result of a Monte Carlo run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    scope: Scope,
    termination_reason: TerminationReason,
    iterations: Vec<IterationResult>,
    best: Option<usize>,
    best_trace: Vec<Option<f64>>,
    effectiveness: Vec<FieldEffectiveness>,
    statistics: RunStatistics,
}

impl RunOutcome {
    pub(crate) fn new(
        scope: Scope,
        termination_reason: TerminationReason,
        iterations: Vec<IterationResult>,
        best: Option<usize>,
        best_trace: Vec<Option<f64>>,
        effectiveness: Vec<FieldEffectiveness>,
        statistics: RunStatistics,
    ) -> Self {
        Self {
            scope,
            termination_reason,
            iterations,
            best,
            best_trace,
            effectiveness,
            statistics,
        }
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    #[inline]
    pub fn termination_reason(&self) -> TerminationReason {
        self.termination_reason
    }

    /// Every iteration, in the order it ran.
    #[inline]
    pub fn iterations(&self) -> &[IterationResult] {
        &self.iterations
    }

    /// The best optimal iteration, if any iteration was optimal.
    #[inline]
    pub fn best(&self) -> Option<&IterationResult> {
        self.best.map(|i| &self.iterations[i])
    }

    #[inline]
    pub fn best_objective(&self) -> Option<f64> {
        self.best().and_then(|b| b.objective)
    }

    /// The best objective after each iteration; never decreasing once set.
    #[inline]
    pub fn best_objective_trace(&self) -> &[Option<f64>] {
        &self.best_trace
    }

    /// Effectiveness of every field with an efficiency parameter.
    #[inline]
    pub fn effectiveness(&self) -> &[FieldEffectiveness] {
        &self.effectiveness
    }

    pub fn field_effectiveness(&self, field: FieldIndex) -> Option<&FieldEffectiveness> {
        self.effectiveness.iter().find(|e| e.field == field)
    }

    /// The effectiveness-weighted update of `field`'s prior.
    pub fn posterior(&self, field: FieldIndex) -> Option<Vec<(IrrigationTypeIndex, f64)>> {
        self.field_effectiveness(field).map(FieldEffectiveness::posterior)
    }

    /// Effectiveness samples pooled per irrigation type.
    pub fn by_irrigation_type(&self) -> Vec<TypeEffectiveness> {
        pool_by_irrigation_type(&self.effectiveness)
    }

    /// Totals of the best iteration, `None` if no iteration was optimal.
    pub fn area_summary(&self) -> Option<AreaSummary> {
        let best = self.best()?;
        Some(AreaSummary {
            scope: self.scope,
            total_objective: best.objective?,
            total_allocated: best.total_allocated()?,
        })
    }

    #[inline]
    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RunOutcome({}, termination: {}, iterations: {}, best: ",
            self.scope,
            self.termination_reason,
            self.iterations.len()
        )?;
        match self.best_objective() {
            Some(objective) => write!(f, "{:.3})", objective),
            None => write!(f, "none)"),
        }
    }
}
