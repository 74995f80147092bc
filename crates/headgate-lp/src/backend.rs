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

//! `microlp` backend.

use crate::{
    constraint::Sense,
    error::SolverError,
    model::AllocationModel,
    solver::{LinearSolver, SolveOutcome},
};
use headgate_core::num::tolerance::Tolerance;
use microlp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};

/// Solves allocation models with the `microlp` dense simplex implementation.
///
/// `microlp` has no notion of a parameter and cannot update a right-hand
/// side in place, so every call translates the whole model afresh with
/// right-hand sides evaluated from the current parameter values. This
/// translation is the only per-iteration rebuild in a run; the
/// `AllocationModel` itself persists. A backend that can patch right-hand
/// sides of an existing problem can implement `LinearSolver` and skip it.
/// Solved values within tolerance of zero are snapped to zero.
#[derive(Debug, Clone, Default)]
pub struct MicrolpSolver {
    tolerance: Tolerance,
}

impl MicrolpSolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl LinearSolver for MicrolpSolver {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&mut self, model: &AllocationModel) -> Result<SolveOutcome, SolverError> {
        let mut problem = Problem::new(OptimizationDirection::Maximize);
        let vars: Vec<microlp::Variable> = model
            .variables()
            .iter()
            .map(|(_, v)| problem.add_var(v.objective(), (0.0, f64::INFINITY)))
            .collect();

        for (index, constraint) in model.constraints() {
            let mut expr = LinearExpr::empty();
            for &(v, coefficient) in constraint.terms() {
                expr.add(vars[v.get()], coefficient);
            }
            let op = match constraint.sense() {
                Sense::Le => ComparisonOp::Le,
                Sense::Ge => ComparisonOp::Ge,
            };
            problem.add_constraint(expr, op, model.rhs(index));
        }

        match problem.solve() {
            Ok(solution) => {
                let values = vars
                    .iter()
                    .map(|&v| self.tolerance.snap_zero(solution[v]))
                    .collect();
                Ok(SolveOutcome::optimal(solution.objective(), values))
            }
            Err(microlp::Error::Infeasible) => Ok(SolveOutcome::infeasible()),
            Err(microlp::Error::Unbounded) => Ok(SolveOutcome::unbounded()),
            #[allow(unreachable_patterns)]
            Err(other) => Err(SolverError::Backend(other.to_string())),
        }
    }
}
