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

//! Effectiveness summaries.
//!
//! An option's effectiveness is the mean objective of the iterations in
//! which it was drawn. The posterior post-pass turns those means into an
//! updated distribution: each option's weight is its prior probability times
//! its mean effectiveness, normalized. It is computed on request after a run
//! and never influences the draws of the run itself.

use crate::field_state::FieldState;
use headgate_model::{
    index::{FieldIndex, IrrigationTypeIndex},
    prior::PriorSource,
};

/// Effectiveness of one option of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEffectiveness {
    pub irrigation_type: IrrigationTypeIndex,
    pub efficiency: f64,
    pub prior_probability: f64,
    pub samples: Vec<f64>,
}

impl OptionEffectiveness {
    /// Mean of the samples, `0.0` if the option was never drawn.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

/// Effectiveness of every option of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEffectiveness {
    pub field: FieldIndex,
    pub source: PriorSource,
    pub options: Vec<OptionEffectiveness>,
}

impl FieldEffectiveness {
    /// Captures the samples collected in `state`.
    pub fn from_state(state: &FieldState) -> Self {
        Self {
            field: state.field(),
            source: state.source(),
            options: state
                .options()
                .iter()
                .map(|o| OptionEffectiveness {
                    irrigation_type: o.irrigation_type,
                    efficiency: o.efficiency,
                    prior_probability: o.probability,
                    samples: o.samples().to_vec(),
                })
                .collect(),
        }
    }

    /// The prior normalized to sum to one.
    pub fn normalized_prior(&self) -> Vec<(IrrigationTypeIndex, f64)> {
        let mass: f64 = self.options.iter().map(|o| o.prior_probability).sum();
        self.options
            .iter()
            .map(|o| (o.irrigation_type, o.prior_probability / mass))
            .collect()
    }

    /// The effectiveness-weighted update of the prior.
    ///
    /// Weights are `prior × max(mean, 0)`. If every weight is zero (nothing
    /// was ever optimal) the normalized prior is returned unchanged.
    pub fn posterior(&self) -> Vec<(IrrigationTypeIndex, f64)> {
        let weights: Vec<f64> = self
            .options
            .iter()
            .map(|o| o.prior_probability * o.mean().max(0.0))
            .collect();
        let mass: f64 = weights.iter().sum();
        if mass.is_nan() || mass <= 0.0 {
            return self.normalized_prior();
        }
        self.options
            .iter()
            .zip(weights)
            .map(|(o, w)| (o.irrigation_type, w / mass))
            .collect()
    }

    /// The option with the highest mean effectiveness among those drawn at
    /// least once. Ties go to the earlier option.
    pub fn most_effective(&self) -> Option<&OptionEffectiveness> {
        self.options
            .iter()
            .filter(|o| !o.samples.is_empty())
            .fold(None, |best: Option<&OptionEffectiveness>, o| match best {
                Some(b) if b.mean() >= o.mean() => Some(b),
                _ => Some(o),
            })
    }
}

/// Effectiveness samples of one irrigation type pooled across fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEffectiveness {
    pub irrigation_type: IrrigationTypeIndex,
    pub efficiency: f64,
    pub samples: Vec<f64>,
}

impl TypeEffectiveness {
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

/// Pools samples by irrigation type, ordered by irrigation type index.
pub fn pool_by_irrigation_type(fields: &[FieldEffectiveness]) -> Vec<TypeEffectiveness> {
    let mut pooled: Vec<TypeEffectiveness> = Vec::new();
    for option in fields.iter().flat_map(|f| &f.options) {
        match pooled
            .binary_search_by_key(&option.irrigation_type, |t| t.irrigation_type)
        {
            Ok(i) => pooled[i].samples.extend_from_slice(&option.samples),
            Err(i) => pooled.insert(
                i,
                TypeEffectiveness {
                    irrigation_type: option.irrigation_type,
                    efficiency: option.efficiency,
                    samples: option.samples.clone(),
                },
            ),
        }
    }
    pooled
}
