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

//! Discrete irrigation-efficiency priors.
//!
//! Every crop may carry a prior: a discrete distribution over irrigation
//! types, and therefore over the efficiency coefficients those types imply.
//! The Monte Carlo sampler draws from it independently for every field and
//! every iteration.
//!
//! Probabilities are weights. They do not need to sum to one; the sampler
//! normalizes. They do need to be finite and non-negative with at least one
//! positive weight, or nothing could ever be drawn.
//!
//! Fields whose crop is unknown, or whose crop has no prior, use the
//! network's `FallbackPrior`. The fallback is configured explicitly rather
//! than implied: by default it is a uniform distribution over every known
//! irrigation type.

use crate::{entity::PriorWeight, index::IrrigationTypeIndex, index::CropIndex};
use std::borrow::Cow;

/// The error returned when a prior cannot be drawn from.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriorError {
    #[error("prior has no options")]
    Empty,
    #[error("prior weight for {irrigation_type} must be finite and non-negative, got {probability}")]
    InvalidWeight {
        irrigation_type: IrrigationTypeIndex,
        probability: f64,
    },
    #[error("prior weights sum to zero")]
    ZeroMass,
    #[error("prior lists {0} more than once")]
    DuplicateOption(IrrigationTypeIndex),
}

/// A discrete distribution over irrigation types.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyPrior {
    weights: Vec<PriorWeight>,
}

impl EfficiencyPrior {
    /// Creates a prior from explicit weights.
    ///
    /// # Errors
    ///
    /// Returns an error if `weights` is empty, contains a negative or
    /// non-finite probability, names an irrigation type twice, or carries no
    /// probability mass at all.
    pub fn new(weights: Vec<PriorWeight>) -> Result<Self, PriorError> {
        if weights.is_empty() {
            return Err(PriorError::Empty);
        }

        let mut mass = 0.0;
        for (i, w) in weights.iter().enumerate() {
            if !w.probability.is_finite() || w.probability < 0.0 {
                return Err(PriorError::InvalidWeight {
                    irrigation_type: w.irrigation_type,
                    probability: w.probability,
                });
            }
            if weights[..i]
                .iter()
                .any(|other| other.irrigation_type == w.irrigation_type)
            {
                return Err(PriorError::DuplicateOption(w.irrigation_type));
            }
            mass += w.probability;
        }

        if mass <= 0.0 {
            return Err(PriorError::ZeroMass);
        }

        Ok(Self { weights })
    }

    /// Creates a uniform prior over the first `num_irrigation_types` irrigation types.
    ///
    /// # Panics
    ///
    /// Panics if `num_irrigation_types` is zero.
    pub fn uniform(num_irrigation_types: usize) -> Self {
        assert!(
            num_irrigation_types > 0,
            "called `EfficiencyPrior::uniform` with zero irrigation types"
        );

        let probability = 1.0 / num_irrigation_types as f64;
        let weights = IrrigationTypeIndex::range(num_irrigation_types)
            .map(|irrigation_type| PriorWeight {
                irrigation_type,
                probability,
            })
            .collect();
        Self { weights }
    }

    /// Returns the options of the prior, in declaration order.
    #[inline]
    pub fn weights(&self) -> &[PriorWeight] {
        &self.weights
    }

    /// Returns the number of options.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`; a constructed prior has at least one option.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Returns the probabilities normalized to sum to one.
    pub fn normalized(&self) -> Vec<f64> {
        let mass: f64 = self.weights.iter().map(|w| w.probability).sum();
        self.weights.iter().map(|w| w.probability / mass).collect()
    }
}

/// The prior used for fields whose crop is unknown or has no prior of its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FallbackPrior {
    /// Uniform over every irrigation type known to the network.
    #[default]
    Uniform,
    /// An explicit distribution.
    Explicit(EfficiencyPrior),
}

/// Where a field's prior came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorSource {
    Crop(CropIndex),
    Fallback,
}

impl std::fmt::Display for PriorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorSource::Crop(crop) => write!(f, "{}", crop),
            PriorSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// A prior resolved for a specific field.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrior<'a> {
    pub source: PriorSource,
    pub prior: Cow<'a, EfficiencyPrior>,
}

impl ResolvedPrior<'_> {
    /// Returns `true` if the field fell back to the network's fallback prior.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.source == PriorSource::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(i: usize, p: f64) -> PriorWeight {
        PriorWeight {
            irrigation_type: IrrigationTypeIndex::new(i),
            probability: p,
        }
    }

    #[test]
    fn test_new_accepts_unnormalized_weights() {
        let prior = EfficiencyPrior::new(vec![w(0, 2.0), w(1, 6.0)]).unwrap();
        assert_eq!(prior.len(), 2);
        assert_eq!(prior.normalized(), vec![0.25, 0.75]);
    }

    #[test]
    fn test_new_rejects_degenerate_priors() {
        assert_eq!(EfficiencyPrior::new(vec![]), Err(PriorError::Empty));
        assert_eq!(
            EfficiencyPrior::new(vec![w(0, 0.0), w(1, 0.0)]),
            Err(PriorError::ZeroMass)
        );
        assert!(matches!(
            EfficiencyPrior::new(vec![w(0, -0.5)]),
            Err(PriorError::InvalidWeight { .. })
        ));
        assert!(matches!(
            EfficiencyPrior::new(vec![w(0, f64::NAN)]),
            Err(PriorError::InvalidWeight { .. })
        ));
        assert_eq!(
            EfficiencyPrior::new(vec![w(1, 0.5), w(1, 0.5)]),
            Err(PriorError::DuplicateOption(IrrigationTypeIndex::new(1)))
        );
    }

    #[test]
    fn test_uniform_covers_every_type() {
        let prior = EfficiencyPrior::uniform(4);
        assert_eq!(prior.len(), 4);
        for (i, weight) in prior.weights().iter().enumerate() {
            assert_eq!(weight.irrigation_type.get(), i);
            assert_eq!(weight.probability, 0.25);
        }
    }

    #[test]
    fn test_fallback_defaults_to_uniform() {
        assert_eq!(FallbackPrior::default(), FallbackPrior::Uniform);
    }
}
