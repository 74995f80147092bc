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

//! The allocation model.

use crate::{
    constraint::{ConstraintIndex, LinearConstraint, ParameterIndex, Sense},
    variable::{Variable, VariableIndex, VariableTable},
};
use headgate_core::num::tolerance::Tolerance;
use headgate_model::{
    index::{CropIndex, FieldIndex, WellIndex},
    snapshot::Scope,
};
use smallvec::SmallVec;

/// The variables, demand, and efficiency parameter of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub field: FieldIndex,
    pub crop: Option<CropIndex>,
    pub net_demand: f64,
    pub parameter: ParameterIndex,
    pub variables: SmallVec<[VariableIndex; 4]>,
    pub slack: Option<VariableIndex>,
}

/// The variables and capacity of one well.
#[derive(Debug, Clone, PartialEq)]
pub struct WellRow {
    pub well: WellIndex,
    pub capacity: f64,
    pub variables: SmallVec<[VariableIndex; 4]>,
}

/// A linear program allocating well water to fields.
///
/// The structure (variables, objective, constraints, row tables) is fixed at
/// build time. Only the efficiency parameters change, one per field with at
/// least one variable, each initialized to `1.0`.
///
/// Construction:
/// - Use `AllocationModelBuilder` and call `AllocationModelBuilder::build`.
#[derive(Debug, Clone)]
pub struct AllocationModel {
    scope: Scope,
    variables: VariableTable,
    constraints: Vec<LinearConstraint>,
    parameters: Vec<f64>, // len = fields.len()
    fields: Vec<FieldRow>,
    wells: Vec<WellRow>,
}

impl AllocationModel {
    pub(crate) fn new(
        scope: Scope,
        variables: VariableTable,
        constraints: Vec<LinearConstraint>,
        fields: Vec<FieldRow>,
        wells: Vec<WellRow>,
    ) -> Self {
        Self {
            scope,
            variables,
            constraints,
            parameters: vec![1.0; fields.len()],
            fields,
            wells,
        }
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    #[inline]
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    #[inline]
    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    #[inline]
    pub fn variable(&self, index: VariableIndex) -> &Variable {
        self.variables.get(index)
    }

    pub fn constraints(&self) -> impl ExactSizeIterator<Item = (ConstraintIndex, &LinearConstraint)> {
        self.constraints
            .iter()
            .enumerate()
            .map(|(i, c)| (ConstraintIndex::new(i), c))
    }

    /// Returns the constraint at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_constraints()`.
    #[inline]
    pub fn constraint(&self, index: ConstraintIndex) -> &LinearConstraint {
        &self.constraints[index.get()]
    }

    /// Current values of all efficiency parameters.
    #[inline]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    #[inline]
    pub fn parameter(&self, index: ParameterIndex) -> f64 {
        self.parameters[index.get()]
    }

    /// Sets an efficiency parameter.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds. Panics in debug builds if `value`
    /// is not a finite positive number.
    #[inline]
    pub fn set_parameter(&mut self, index: ParameterIndex, value: f64) {
        debug_assert!(
            value.is_finite() && value > 0.0,
            "called `AllocationModel::set_parameter` with non-positive efficiency {} for {}",
            value,
            index
        );
        self.parameters[index.get()] = value;
    }

    /// Resets every parameter to `1.0`.
    pub fn reset_parameters(&mut self) {
        self.parameters.fill(1.0);
    }

    /// Evaluates the right-hand side of `index` against the current parameters.
    #[inline]
    pub fn rhs(&self, index: ConstraintIndex) -> f64 {
        self.constraint(index).rhs().evaluate(&self.parameters)
    }

    /// Fields with at least one variable, ordered by field index. The row at
    /// position `i` owns parameter `i`.
    #[inline]
    pub fn field_rows(&self) -> &[FieldRow] {
        &self.fields
    }

    /// Wells with at least one variable, ordered by well index.
    #[inline]
    pub fn well_rows(&self) -> &[WellRow] {
        &self.wells
    }

    pub fn field_row(&self, field: FieldIndex) -> Option<&FieldRow> {
        self.fields
            .binary_search_by_key(&field, |r| r.field)
            .ok()
            .map(|i| &self.fields[i])
    }

    pub fn well_row(&self, well: WellIndex) -> Option<&WellRow> {
        self.wells
            .binary_search_by_key(&well, |r| r.well)
            .ok()
            .map(|i| &self.wells[i])
    }

    /// The objective value of a full assignment.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .map(|(i, v)| v.objective() * values[i.get()])
            .sum()
    }

    /// Returns the first constraint `values` violates under the current
    /// parameters, or `None` if every row holds.
    pub fn first_violation(&self, values: &[f64], tolerance: &Tolerance) -> Option<ConstraintIndex> {
        self.constraints().find_map(|(i, c)| {
            let lhs = c.lhs(values);
            let rhs = self.rhs(i);
            let holds = match c.sense() {
                Sense::Le => tolerance.le(lhs, rhs),
                Sense::Ge => tolerance.ge(lhs, rhs),
            };
            (!holds).then_some(i)
        })
    }

    /// Returns `true` if `values` is non-negative and satisfies every row.
    pub fn is_feasible(&self, values: &[f64], tolerance: &Tolerance) -> bool {
        values.len() == self.num_variables()
            && values.iter().all(|&v| tolerance.ge(v, 0.0))
            && self.first_violation(values, tolerance).is_none()
    }
}

impl std::fmt::Display for AllocationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AllocationModel({}, variables: {}, constraints: {}, parameters: {})",
            self.scope,
            self.num_variables(),
            self.num_constraints(),
            self.num_parameters()
        )
    }
}
