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

//! Model build configuration.
//!
//! Every field has a default taken from how district planners ran the model
//! historically, so an empty TOML table is a valid configuration.

use headgate_core::num::fraction::Fraction;
use serde::{Deserialize, Serialize};

/// How close a solved allocation has to come to each upper bound.
///
/// A margin of `0.95` on field demand means every field with a pipe must
/// receive at least 95% of its gross demand. A margin of zero disables the
/// lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    pub field_demand: Fraction,
    pub well_allocation: Fraction,
    pub crop_attribution: Fraction,
}

impl MarginConfig {
    /// The margin applied to every bound unless overridden.
    pub const DEFAULT_MARGIN: f64 = 0.95;

    /// Uses the same margin for every bound.
    #[inline]
    pub fn uniform(margin: Fraction) -> Self {
        Self {
            field_demand: margin,
            well_allocation: margin,
            crop_attribution: margin,
        }
    }

    /// Disables every lower bound.
    #[inline]
    pub fn none() -> Self {
        Self::uniform(Fraction::ZERO)
    }

    #[inline]
    pub fn with_field_demand(mut self, margin: Fraction) -> Self {
        self.field_demand = margin;
        self
    }

    #[inline]
    pub fn with_well_allocation(mut self, margin: Fraction) -> Self {
        self.well_allocation = margin;
        self
    }

    #[inline]
    pub fn with_crop_attribution(mut self, margin: Fraction) -> Self {
        self.crop_attribution = margin;
        self
    }
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self::uniform(Fraction::clamped(Self::DEFAULT_MARGIN))
    }
}

/// Configuration for `AllocationModelBuilder`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub margins: MarginConfig,
    /// Keep at most this many of the shortest pipes into each field.
    pub max_pipes_per_field: Option<usize>,
    /// Bound allocations from a well into a crop by the quantity the well
    /// is recorded to have delivered to that crop.
    pub crop_attribution: bool,
    /// Add one slack variable per field that absorbs unmet demand floors
    /// at a prohibitive cost.
    pub slack: bool,
    /// Distance at which delivering water stops paying off.
    pub max_benefit_distance: f64,
    /// Per-unit cost of slack, as a multiple of `max_benefit_distance`.
    pub slack_cost_multiplier: f64,
}

impl BuildConfig {
    pub const DEFAULT_MAX_BENEFIT_DISTANCE: f64 = 3000.0;
    pub const DEFAULT_SLACK_COST_MULTIPLIER: f64 = 1000.0;

    #[inline]
    pub fn with_margins(mut self, margins: MarginConfig) -> Self {
        self.margins = margins;
        self
    }

    #[inline]
    pub fn with_max_pipes_per_field(mut self, max_pipes: usize) -> Self {
        self.max_pipes_per_field = Some(max_pipes);
        self
    }

    #[inline]
    pub fn with_crop_attribution(mut self, enabled: bool) -> Self {
        self.crop_attribution = enabled;
        self
    }

    #[inline]
    pub fn with_slack(mut self, enabled: bool) -> Self {
        self.slack = enabled;
        self
    }

    #[inline]
    pub fn with_max_benefit_distance(mut self, distance: f64) -> Self {
        self.max_benefit_distance = distance;
        self
    }

    #[inline]
    pub fn with_slack_cost_multiplier(mut self, multiplier: f64) -> Self {
        self.slack_cost_multiplier = multiplier;
        self
    }

    /// The objective coefficient of one unit of slack.
    #[inline]
    pub fn slack_cost(&self) -> f64 {
        -(self.slack_cost_multiplier * self.max_benefit_distance)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            margins: MarginConfig::default(),
            max_pipes_per_field: None,
            crop_attribution: true,
            slack: false,
            max_benefit_distance: Self::DEFAULT_MAX_BENEFIT_DISTANCE,
            slack_cost_multiplier: Self::DEFAULT_SLACK_COST_MULTIPLIER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.margins.field_demand.get(), 0.95);
        assert_eq!(config.margins.well_allocation.get(), 0.95);
        assert_eq!(config.margins.crop_attribution.get(), 0.95);
        assert_eq!(config.max_pipes_per_field, None);
        assert!(config.crop_attribution);
        assert!(!config.slack);
        assert_eq!(config.max_benefit_distance, 3000.0);
        assert_eq!(config.slack_cost(), -3_000_000.0);
    }

    #[test]
    fn test_margins_override_independently() {
        let half = Fraction::new(0.5).unwrap();
        let margins = MarginConfig::default().with_well_allocation(half);
        assert_eq!(margins.field_demand.get(), 0.95);
        assert_eq!(margins.well_allocation, half);
        assert_eq!(margins.crop_attribution.get(), 0.95);
        assert_eq!(MarginConfig::none().field_demand, Fraction::ZERO);
    }

    #[test]
    fn test_deserialize_partial_table() {
        let config: BuildConfig = toml::from_str(
            r#"
            max_pipes_per_field = 3
            slack = true

            [margins]
            field_demand = 0.8
            "#,
        )
        .unwrap();
        assert_eq!(config.max_pipes_per_field, Some(3));
        assert!(config.slack);
        assert_eq!(config.margins.field_demand.get(), 0.8);
        assert_eq!(config.margins.well_allocation.get(), 0.95);
        assert_eq!(config.max_benefit_distance, 3000.0);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_margin() {
        let result: Result<BuildConfig, _> = toml::from_str("[margins]\nwell_allocation = 1.2\n");
        assert!(result.is_err());
    }
}
