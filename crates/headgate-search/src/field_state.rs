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

//! Per-field sampling state.
//!
//! Each field with an efficiency parameter carries the options of its prior:
//! the irrigation type, the efficiency it implies, the prior probability, and
//! the effectiveness samples collected so far. Draws always come from the
//! fixed prior; samples never feed back into the distribution during a run.

use crate::error::RunError;
use headgate_lp::{constraint::ParameterIndex, model::AllocationModel};
use headgate_model::{
    index::{FieldIndex, IrrigationTypeIndex},
    prior::PriorSource,
    snapshot::Snapshot,
};
use rand::{Rng, distributions::Distribution, distributions::WeightedIndex};

/// One candidate irrigation type for a field.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyOption {
    pub irrigation_type: IrrigationTypeIndex,
    pub efficiency: f64,
    pub probability: f64,
    samples: Vec<f64>,
}

impl EfficiencyOption {
    /// Objective values of the iterations in which this option was drawn,
    /// zero for non-optimal iterations.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Mean of the samples, `None` if the option was never drawn.
    pub fn mean_effectiveness(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }
}

/// The sampling state of one field.
#[derive(Debug, Clone)]
pub struct FieldState {
    field: FieldIndex,
    parameter: ParameterIndex,
    source: PriorSource,
    options: Vec<EfficiencyOption>,
    support: Vec<usize>,
    distribution: WeightedIndex<f64>,
}

impl FieldState {
    #[inline]
    pub fn field(&self) -> FieldIndex {
        self.field
    }

    #[inline]
    pub fn parameter(&self) -> ParameterIndex {
        self.parameter
    }

    #[inline]
    pub fn source(&self) -> PriorSource {
        self.source
    }

    #[inline]
    pub fn options(&self) -> &[EfficiencyOption] {
        &self.options
    }

    #[inline]
    pub fn num_options(&self) -> usize {
        self.options.len()
    }

    /// Indices of the options with positive prior probability, in option
    /// order. Only these can be drawn or enumerated.
    #[inline]
    pub fn support(&self) -> &[usize] {
        &self.support
    }

    /// Draws an option index from the prior.
    #[inline]
    pub fn draw<R>(&self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        self.distribution.sample(rng)
    }

    /// Appends an effectiveness sample to option `choice`.
    #[inline]
    pub fn record(&mut self, choice: usize, sample: f64) {
        self.options[choice].samples.push(sample);
    }
}

/// Creates the sampling state for every field row of `model`, in parameter
/// order.
///
/// # Errors
///
/// Returns `RunError::DegeneratePrior` if a prior cannot be sampled from.
///
/// # Panics
///
/// Panics if `model` was not built from `snapshot`.
pub fn field_states(model: &AllocationModel, snapshot: &Snapshot<'_>) -> Result<Vec<FieldState>, RunError> {
    let network = snapshot.network();
    model
        .field_rows()
        .iter()
        .map(|row| {
            let field = snapshot
                .field(row.field)
                .unwrap_or_else(|| panic!("called `field_states` with {} missing from the snapshot", row.field));
            let prior = &field.prior;

            let options: Vec<EfficiencyOption> = prior
                .prior
                .weights()
                .iter()
                .map(|w| EfficiencyOption {
                    irrigation_type: w.irrigation_type,
                    efficiency: network.irrigation_type(w.irrigation_type).efficiency.get(),
                    probability: w.probability,
                    samples: Vec::new(),
                })
                .collect();

            let distribution = WeightedIndex::new(options.iter().map(|o| o.probability)).map_err(|e| {
                RunError::DegeneratePrior {
                    field: row.field,
                    reason: e.to_string(),
                }
            })?;

            let support = options
                .iter()
                .enumerate()
                .filter(|(_, o)| o.probability > 0.0)
                .map(|(i, _)| i)
                .collect();

            Ok(FieldState {
                field: row.field,
                parameter: row.parameter,
                source: prior.source,
                options,
                support,
                distribution,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use headgate_lp::{builder::AllocationModelBuilder, config::BuildConfig};
    use headgate_model::{
        entity::PriorWeight,
        network::NetworkBuilder,
        period::{ProductionPeriod, TimeStep, Year},
        snapshot::Scope,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_states_follow_priors() {
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
                    probability: 2.0,
                },
            ],
        );
        let well = b.add_well("W1", area);
        let f1 = b.add_field("F1", area, 1.0, Some(corn));
        let f2 = b.add_field("F2", area, 1.0, None);
        b.add_field("F3", area, 1.0, None);
        b.add_production(well, ProductionPeriod::annual(Year::new(2018)), None, 10.0);
        b.add_pipe(well, f1, 1.0);
        b.add_pipe(well, f2, 1.0);
        let network = b.build().unwrap();

        let snapshot = Snapshot::new(&network, Scope::new(area, TimeStep::new(1), Year::new(2018)));
        let model = AllocationModelBuilder::new(&snapshot, BuildConfig::default())
            .build()
            .unwrap();
        let mut states = field_states(&model, &snapshot).unwrap();

        // F3 has no pipe and therefore no state.
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].field(), f1);
        assert_eq!(states[0].source(), PriorSource::Crop(corn));
        assert_eq!(states[0].options()[1].efficiency, 0.9);
        assert_eq!(states[1].source(), PriorSource::Fallback);
        assert_eq!(states[1].num_options(), 2);
        assert_eq!(states[0].support(), &[1]);
        assert_eq!(states[1].support(), &[0, 1]);

        // A zero-probability option is never drawn.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(states[0].draw(&mut rng), 1);
        }

        assert_eq!(states[0].options()[1].mean_effectiveness(), None);
        states[0].record(1, 10.0);
        states[0].record(1, 0.0);
        assert_eq!(states[0].options()[1].samples(), &[10.0, 0.0]);
        assert_eq!(states[0].options()[1].mean_effectiveness(), Some(5.0));
    }
}
