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

//! Decision variables and the side table that maps them back to the network.
//!
//! The solver only sees variable indices. Everything the result aggregator
//! needs to interpret a solved value (which pipe, well, and field a variable
//! belongs to, or that it is a field's slack) lives in `VariableTable`,
//! populated once when the model is built.

use crate::error::BuildError;
use headgate_core::utils::index::{TypedIndex, TypedIndexTag};
use headgate_model::index::{FieldIndex, PipeIndex, WellIndex};
use rustc_hash::FxHashMap;

/// A tag type for decision variable indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VariableIndexTag;

impl TypedIndexTag for VariableIndexTag {
    const NAME: &'static str = "VariableIndex";
}

/// A typed index for decision variables.
pub type VariableIndex = TypedIndex<VariableIndexTag>;

/// What a decision variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableOrigin {
    /// Water moved through a pipe.
    Pipe {
        pipe: PipeIndex,
        well: WellIndex,
        field: FieldIndex,
    },
    /// Demand of a field nobody could serve.
    Slack { field: FieldIndex },
}

impl VariableOrigin {
    /// The field the variable delivers to.
    #[inline]
    pub fn field(&self) -> FieldIndex {
        match *self {
            VariableOrigin::Pipe { field, .. } | VariableOrigin::Slack { field } => field,
        }
    }

    /// The well the variable draws from, `None` for slack.
    #[inline]
    pub fn well(&self) -> Option<WellIndex> {
        match *self {
            VariableOrigin::Pipe { well, .. } => Some(well),
            VariableOrigin::Slack { .. } => None,
        }
    }

    #[inline]
    pub fn is_slack(&self) -> bool {
        matches!(self, VariableOrigin::Slack { .. })
    }
}

impl std::fmt::Display for VariableOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableOrigin::Pipe { pipe, well, field } => {
                write!(f, "Pipe({}, {} -> {})", pipe, well, field)
            }
            VariableOrigin::Slack { field } => write!(f, "Slack({})", field),
        }
    }
}

/// A non-negative decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    origin: VariableOrigin,
    objective: f64,
}

impl Variable {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn origin(&self) -> VariableOrigin {
        self.origin
    }

    /// The coefficient of the variable in the maximized objective.
    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }
}

/// All variables of a model with a lookup from (well, field) pairs.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    variables: Vec<Variable>,
    by_pair: FxHashMap<(WellIndex, FieldIndex), VariableIndex>,
}

impl VariableTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the variable for `pipe`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the (well, field) pair already has a variable.
    pub fn push_pipe(
        &mut self,
        name: String,
        pipe: PipeIndex,
        well: WellIndex,
        field: FieldIndex,
        objective: f64,
    ) -> VariableIndex {
        let index = VariableIndex::new(self.variables.len());
        let previous = self.by_pair.insert((well, field), index);
        debug_assert!(
            previous.is_none(),
            "called `VariableTable::push_pipe` twice for {} and {}",
            well,
            field
        );
        self.variables.push(Variable {
            name,
            origin: VariableOrigin::Pipe { pipe, well, field },
            objective,
        });
        index
    }

    /// Adds the slack variable of `field`.
    pub fn push_slack(&mut self, name: String, field: FieldIndex, objective: f64) -> VariableIndex {
        let index = VariableIndex::new(self.variables.len());
        self.variables.push(Variable {
            name,
            origin: VariableOrigin::Slack { field },
            objective,
        });
        index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Returns the variable at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..len()`.
    #[inline]
    pub fn get(&self, index: VariableIndex) -> &Variable {
        &self.variables[index.get()]
    }

    /// Returns the variable created for the pipe from `well` to `field`.
    #[inline]
    pub fn lookup(&self, well: WellIndex, field: FieldIndex) -> Option<VariableIndex> {
        self.by_pair.get(&(well, field)).copied()
    }

    /// Like `lookup`, but a missing pair is an error.
    pub fn require(&self, well: WellIndex, field: FieldIndex) -> Result<VariableIndex, BuildError> {
        self.lookup(well, field)
            .ok_or(BuildError::MissingVariable { well, field })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (VariableIndex, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableIndex::new(i), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_origin() {
        let mut table = VariableTable::new();
        let w = WellIndex::new(0);
        let f = FieldIndex::new(3);
        let x = table.push_pipe("well_W_field_F".into(), PipeIndex::new(9), w, f, 2500.0);
        let s = table.push_slack("slack_field_F".into(), f, -1.0);

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(w, f), Some(x));
        assert_eq!(table.require(w, f), Ok(x));
        assert_eq!(
            table.require(WellIndex::new(1), f),
            Err(BuildError::MissingVariable {
                well: WellIndex::new(1),
                field: f
            })
        );

        let var = table.get(x);
        assert_eq!(var.name(), "well_W_field_F");
        assert_eq!(var.objective(), 2500.0);
        assert_eq!(var.origin().well(), Some(w));
        assert_eq!(var.origin().field(), f);
        assert!(!var.origin().is_slack());

        let slack = table.get(s).origin();
        assert!(slack.is_slack());
        assert_eq!(slack.well(), None);
        assert_eq!(slack.field(), f);
    }
}
