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

use headgate_model::{
    index::{FieldIndex, WellIndex},
    snapshot::Scope,
};

/// The error returned when an `AllocationModel` cannot be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// The scope contains no wells or no fields.
    #[error("{scope} contains no wells or no fields")]
    EmptyScope { scope: Scope },
    /// A group limit names a (well, field) pair that has no decision variable.
    #[error("no decision variable exists for the pipe from {well} to {field}")]
    MissingVariable { well: WellIndex, field: FieldIndex },
    /// A group limit carries a negative or non-finite quantity.
    #[error("group limit {group} has invalid quantity {quantity}")]
    InvalidGroupLimit { group: usize, quantity: f64 },
}

/// The error returned when a solver backend fails for reasons other than the
/// model being infeasible or unbounded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    #[error("solver backend failed: {0}")]
    Backend(String),
    #[error("solver returned {found} variable values for a model with {expected} variables")]
    ShapeMismatch { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = BuildError::MissingVariable {
            well: WellIndex::new(1),
            field: FieldIndex::new(2),
        };
        assert_eq!(
            err.to_string(),
            "no decision variable exists for the pipe from WellIndex(1) to FieldIndex(2)"
        );

        let err = SolverError::ShapeMismatch {
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "solver returned 2 variable values for a model with 3 variables"
        );
    }
}
