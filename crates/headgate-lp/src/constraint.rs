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

//! Linear constraints with parameter-dependent right-hand sides.
//!
//! A constraint's right-hand side is `quantity × factor`, optionally divided
//! by an efficiency parameter. Field demand constraints use the division:
//! a field irrigated at efficiency `f` has to receive `demand / f` units of
//! water for the crop to consume `demand`. Because the division is evaluated
//! when the model is handed to a solver, changing a parameter never requires
//! touching the constraint itself.

use crate::variable::VariableIndex;
use headgate_core::utils::index::{TypedIndex, TypedIndexTag};
use headgate_model::index::{CropIndex, FieldIndex, WellIndex};
use smallvec::SmallVec;

/// Terms of a constraint. Most rows touch only a field's few selected pipes.
pub type Terms = SmallVec<[(VariableIndex, f64); 4]>;

/// A tag type for efficiency parameter indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ParameterIndexTag;

impl TypedIndexTag for ParameterIndexTag {
    const NAME: &'static str = "ParameterIndex";
}

/// A typed index for efficiency parameters.
pub type ParameterIndex = TypedIndex<ParameterIndexTag>;

/// A tag type for constraint indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ConstraintIndexTag;

impl TypedIndexTag for ConstraintIndexTag {
    const NAME: &'static str = "ConstraintIndex";
}

/// A typed index for constraints.
pub type ConstraintIndex = TypedIndex<ConstraintIndexTag>;

/// Which rule of the allocation model a constraint enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    FieldDemand { field: FieldIndex },
    WellCapacity { well: WellIndex },
    CropAttribution { well: WellIndex, crop: CropIndex },
    /// A caller-supplied limit; `group` is its position in insertion order.
    GroupLimit { group: usize },
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::FieldDemand { field } => write!(f, "FieldDemand({})", field),
            ConstraintKind::WellCapacity { well } => write!(f, "WellCapacity({})", well),
            ConstraintKind::CropAttribution { well, crop } => {
                write!(f, "CropAttribution({}, {})", well, crop)
            }
            ConstraintKind::GroupLimit { group } => write!(f, "GroupLimit({})", group),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sense::Le => write!(f, "<="),
            Sense::Ge => write!(f, ">="),
        }
    }
}

/// The right-hand side `quantity × factor / parameter`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rhs {
    quantity: f64,
    factor: f64,
    divisor: Option<ParameterIndex>,
}

impl Rhs {
    /// A right-hand side independent of any parameter.
    #[inline]
    pub fn fixed(quantity: f64, factor: f64) -> Self {
        Self {
            quantity,
            factor,
            divisor: None,
        }
    }

    /// A right-hand side divided by the current value of `parameter`.
    #[inline]
    pub fn scaled_by_inverse(quantity: f64, factor: f64, parameter: ParameterIndex) -> Self {
        Self {
            quantity,
            factor,
            divisor: Some(parameter),
        }
    }

    #[inline]
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    #[inline]
    pub fn divisor(&self) -> Option<ParameterIndex> {
        self.divisor
    }

    /// Evaluates the right-hand side against the current parameter values.
    ///
    /// # Panics
    ///
    /// Panics if the divisor is out of bounds for `parameters`.
    #[inline]
    pub fn evaluate(&self, parameters: &[f64]) -> f64 {
        let value = self.quantity * self.factor;
        match self.divisor {
            Some(p) => value / parameters[p.get()],
            None => value,
        }
    }
}

/// `Σ coefficient × variable  (<= | >=)  rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    kind: ConstraintKind,
    sense: Sense,
    terms: Terms,
    rhs: Rhs,
}

impl LinearConstraint {
    #[inline]
    pub fn new<I>(kind: ConstraintKind, sense: Sense, terms: I, rhs: Rhs) -> Self
    where
        I: IntoIterator<Item = (VariableIndex, f64)>,
    {
        Self {
            kind,
            sense,
            terms: terms.into_iter().collect(),
            rhs,
        }
    }

    /// A constraint on the plain sum of `variables`.
    pub fn sum<I>(kind: ConstraintKind, sense: Sense, variables: I, rhs: Rhs) -> Self
    where
        I: IntoIterator<Item = VariableIndex>,
    {
        Self::new(kind, sense, variables.into_iter().map(|v| (v, 1.0)), rhs)
    }

    #[inline]
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    #[inline]
    pub fn sense(&self) -> Sense {
        self.sense
    }

    #[inline]
    pub fn terms(&self) -> &[(VariableIndex, f64)] {
        &self.terms
    }

    #[inline]
    pub fn rhs(&self) -> &Rhs {
        &self.rhs
    }

    /// Evaluates the left-hand side for a full assignment of variable values.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, coefficient)| coefficient * values[v.get()])
            .sum()
    }
}

impl std::fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} terms {} {}×{}",
            self.kind,
            self.terms.len(),
            self.sense,
            self.rhs.quantity,
            self.rhs.factor
        )?;
        if let Some(p) = self.rhs.divisor {
            write!(f, "/{}", p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rhs_evaluation() {
        let params = [0.5, 0.8];
        assert_eq!(Rhs::fixed(100.0, 0.5).evaluate(&params), 50.0);
        assert_eq!(
            Rhs::scaled_by_inverse(40.0, 1.0, ParameterIndex::new(0)).evaluate(&params),
            80.0
        );
        assert_eq!(
            Rhs::scaled_by_inverse(40.0, 0.5, ParameterIndex::new(1)).evaluate(&params),
            25.0
        );
    }

    #[test]
    fn test_sum_constraint_lhs() {
        let c = LinearConstraint::sum(
            ConstraintKind::WellCapacity {
                well: WellIndex::new(0),
            },
            Sense::Le,
            [VariableIndex::new(0), VariableIndex::new(2)],
            Rhs::fixed(10.0, 1.0),
        );
        assert_eq!(c.terms().len(), 2);
        assert_eq!(c.lhs(&[1.0, 100.0, 2.5]), 3.5);
        assert_eq!(c.sense(), Sense::Le);
        assert_eq!(format!("{}", c), "WellCapacity(WellIndex(0)): 2 terms <= 10×1");
    }
}
