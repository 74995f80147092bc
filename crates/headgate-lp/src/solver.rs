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

//! The seam between the allocation model and an LP solver.
//!
//! A `LinearSolver` receives the persistent `AllocationModel`, evaluates its
//! parameter-dependent right-hand sides at call time, and reports a status.
//! Infeasible and unbounded models are outcomes, not errors; only a broken
//! backend returns `Err`.

use crate::{error::SolverError, model::AllocationModel, variable::VariableIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Unbounded => write!(f, "Unbounded"),
        }
    }
}

/// The result of one solve.
///
/// `objective` and `values` are only present for `SolveStatus::Optimal`;
/// `values` then holds one entry per model variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    status: SolveStatus,
    objective: Option<f64>,
    values: Vec<f64>,
}

impl SolveOutcome {
    #[inline]
    pub fn optimal(objective: f64, values: Vec<f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective: Some(objective),
            values,
        }
    }

    #[inline]
    pub fn infeasible() -> Self {
        Self {
            status: SolveStatus::Infeasible,
            objective: None,
            values: Vec::new(),
        }
    }

    #[inline]
    pub fn unbounded() -> Self {
        Self {
            status: SolveStatus::Unbounded,
            objective: None,
            values: Vec::new(),
        }
    }

    #[inline]
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    #[inline]
    pub fn objective(&self) -> Option<f64> {
        self.objective
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The realized value of `variable`, `None` unless optimal.
    #[inline]
    pub fn value(&self, variable: VariableIndex) -> Option<f64> {
        self.values.get(variable.get()).copied()
    }

    /// Checks that an optimal outcome carries one value per variable of `model`.
    pub fn check_shape(&self, model: &AllocationModel) -> Result<(), SolverError> {
        if self.is_optimal() && self.values.len() != model.num_variables() {
            return Err(SolverError::ShapeMismatch {
                expected: model.num_variables(),
                found: self.values.len(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.objective {
            Some(objective) => write!(f, "{}(objective={})", self.status, objective),
            None => write!(f, "{}", self.status),
        }
    }
}

/// A backend able to optimize an `AllocationModel`.
pub trait LinearSolver {
    fn name(&self) -> &str;

    /// Solves `model` with its current parameter values.
    ///
    /// # Errors
    ///
    /// Returns `SolverError` only for failures of the backend itself.
    fn solve(&mut self, model: &AllocationModel) -> Result<SolveOutcome, SolverError>;
}

impl<S> LinearSolver for Box<S>
where
    S: LinearSolver + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, model: &AllocationModel) -> Result<SolveOutcome, SolverError> {
        (**self).solve(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let o = SolveOutcome::optimal(12.5, vec![1.0, 2.0]);
        assert!(o.is_optimal());
        assert_eq!(o.objective(), Some(12.5));
        assert_eq!(o.value(VariableIndex::new(1)), Some(2.0));
        assert_eq!(format!("{}", o), "Optimal(objective=12.5)");

        let o = SolveOutcome::infeasible();
        assert!(!o.is_optimal());
        assert_eq!(o.objective(), None);
        assert_eq!(o.value(VariableIndex::new(0)), None);
        assert_eq!(format!("{}", SolveOutcome::unbounded()), "Unbounded");
    }
}
