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

//! Per-iteration allocation records.
//!
//! For an optimal iteration the aggregator reads the solved variable values
//! through the model's row tables and derives, per field, how much water it
//! received against its gross demand and, per well, how much of its
//! capacity is left unaccounted for. Non-optimal iterations keep their
//! status and draws but carry no allocations.

use crate::field_state::FieldState;
use headgate_lp::{
    model::AllocationModel,
    solver::{SolveOutcome, SolveStatus},
};
use headgate_model::index::{FieldIndex, IrrigationTypeIndex, WellIndex};

/// The option drawn for one field in one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draw {
    pub field: FieldIndex,
    pub choice: usize,
    pub irrigation_type: IrrigationTypeIndex,
    pub efficiency: f64,
}

/// Water delivered to one field in one optimal iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldAllocation {
    pub field: FieldIndex,
    pub irrigation_type: IrrigationTypeIndex,
    pub efficiency: f64,
    pub net_demand: f64,
    /// `net_demand / efficiency`
    pub gross_demand: f64,
    /// Sum over the field's pipe variables.
    pub allocation: f64,
    /// `gross_demand - allocation`
    pub unmet_demand: f64,
    /// `allocation × efficiency`
    pub available_consumptive: f64,
    pub slack: f64,
}

/// Water drawn from one well in one optimal iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellAllocation {
    pub well: WellIndex,
    pub capacity: f64,
    pub allocated: f64,
    /// `capacity - allocated`, the most the well's users could still save.
    pub unaccounted: f64,
}

/// The immutable record of one Monte Carlo iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationResult {
    pub iteration: u64,
    pub status: SolveStatus,
    pub objective: Option<f64>,
    pub draws: Vec<Draw>,
    /// Fields with non-zero net demand, ordered by field index. Empty unless optimal.
    pub fields: Vec<FieldAllocation>,
    /// Wells with at least one variable, ordered by well index. Empty unless optimal.
    pub wells: Vec<WellAllocation>,
}

impl IterationResult {
    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Total water allocated through pipes, `None` unless optimal.
    pub fn total_allocated(&self) -> Option<f64> {
        self.is_optimal()
            .then(|| self.wells.iter().map(|w| w.allocated).sum())
    }

    pub fn field(&self, field: FieldIndex) -> Option<&FieldAllocation> {
        self.fields.iter().find(|f| f.field == field)
    }

    pub fn well(&self, well: WellIndex) -> Option<&WellAllocation> {
        self.wells.iter().find(|w| w.well == well)
    }

    pub fn draw(&self, field: FieldIndex) -> Option<&Draw> {
        self.draws.iter().find(|d| d.field == field)
    }
}

impl std::fmt::Display for IterationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.objective {
            Some(objective) => write!(
                f,
                "Iteration {}: {} (objective: {:.3}, fields: {}, wells: {})",
                self.iteration,
                self.status,
                objective,
                self.fields.len(),
                self.wells.len()
            ),
            None => write!(f, "Iteration {}: {}", self.iteration, self.status),
        }
    }
}

/// Builds the record of one iteration.
///
/// `choices[i]` is the option drawn for `states[i]`, and the model's
/// parameters must hold the efficiencies of those options.
pub fn aggregate(
    iteration: u64,
    model: &AllocationModel,
    states: &[FieldState],
    choices: &[usize],
    outcome: &SolveOutcome,
) -> IterationResult {
    debug_assert_eq!(
        states.len(),
        choices.len(),
        "called `aggregate` with {} field states but {} choices",
        states.len(),
        choices.len()
    );

    let draws: Vec<Draw> = states
        .iter()
        .zip(choices)
        .map(|(state, &choice)| {
            let option = &state.options()[choice];
            Draw {
                field: state.field(),
                choice,
                irrigation_type: option.irrigation_type,
                efficiency: option.efficiency,
            }
        })
        .collect();

    if !outcome.is_optimal() {
        return IterationResult {
            iteration,
            status: outcome.status(),
            objective: None,
            draws,
            fields: Vec::new(),
            wells: Vec::new(),
        };
    }

    let values = outcome.values();
    let sum = |vars: &[headgate_lp::variable::VariableIndex]| -> f64 {
        vars.iter().map(|v| values[v.get()]).sum()
    };

    let fields: Vec<FieldAllocation> = model
        .field_rows()
        .iter()
        .zip(&draws)
        .filter(|(row, _)| row.net_demand > 0.0)
        .map(|(row, draw)| {
            let efficiency = model.parameter(row.parameter);
            let gross_demand = row.net_demand / efficiency;
            let allocation = sum(&row.variables);
            FieldAllocation {
                field: row.field,
                irrigation_type: draw.irrigation_type,
                efficiency,
                net_demand: row.net_demand,
                gross_demand,
                allocation,
                unmet_demand: gross_demand - allocation,
                available_consumptive: allocation * efficiency,
                slack: row.slack.map_or(0.0, |s| values[s.get()]),
            }
        })
        .collect();

    let wells: Vec<WellAllocation> = model
        .well_rows()
        .iter()
        .map(|row| {
            let allocated = sum(&row.variables);
            WellAllocation {
                well: row.well,
                capacity: row.capacity,
                allocated,
                unaccounted: row.capacity - allocated,
            }
        })
        .collect();

    IterationResult {
        iteration,
        status: outcome.status(),
        objective: outcome.objective(),
        draws,
        fields,
        wells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_state::field_states;
    use headgate_lp::{builder::AllocationModelBuilder, config::BuildConfig};
    use headgate_model::{
        network::NetworkBuilder,
        period::{ProductionPeriod, TimeStep, Year},
        snapshot::{Scope, Snapshot},
    };

    const T1: TimeStep = TimeStep::new(1);
    const Y: Year = Year::new(2018);

    #[test]
    fn test_aggregate_optimal_iteration() {
        let mut b = NetworkBuilder::new();
        let area = b.add_service_area("A");
        b.add_irrigation_type("half", 0.5);
        b.set_fallback_prior(vec![headgate_model::entity::PriorWeight {
            irrigation_type: headgate_model::index::IrrigationTypeIndex::new(0),
            probability: 1.0,
        }]);
        let well = b.add_well("W1", area);
        let wet = b.add_field("F1", area, 1.0, None);
        let dry = b.add_field("F2", area, 1.0, None);
        b.add_field_timestep(wet, T1, 40.0, 0.0)
            .add_production(well, ProductionPeriod::annual(Y), None, 100.0);
        b.add_pipe(well, wet, 10.0);
        b.add_pipe(well, dry, 20.0);
        let network = b.build().unwrap();

        let snapshot = Snapshot::new(&network, Scope::new(area, T1, Y));
        let config = BuildConfig::default().with_slack(true);
        let mut model = AllocationModelBuilder::new(&snapshot, config).build().unwrap();
        let states = field_states(&model, &snapshot).unwrap();
        for s in &states {
            model.set_parameter(s.parameter(), 0.5);
        }

        // Variables: wet pipe, wet slack, dry pipe, dry slack.
        let outcome = SolveOutcome::optimal(123.0, vec![70.0, 2.0, 0.0, 0.0]);
        let result = aggregate(4, &model, &states, &[0, 0], &outcome);

        assert!(result.is_optimal());
        assert_eq!(result.iteration, 4);
        assert_eq!(result.objective, Some(123.0));
        assert_eq!(result.draws.len(), 2);

        // The zero-demand field is excluded.
        assert_eq!(result.fields.len(), 1);
        assert!(result.field(dry).is_none());
        let f = result.field(wet).unwrap();
        assert_eq!(f.gross_demand, 80.0);
        assert_eq!(f.allocation, 70.0);
        assert_eq!(f.unmet_demand, 10.0);
        assert_eq!(f.available_consumptive, 35.0);
        assert_eq!(f.slack, 2.0);

        let w = result.well(well).unwrap();
        assert_eq!(w.allocated, 70.0);
        assert_eq!(w.unaccounted, 30.0);
        assert_eq!(result.total_allocated(), Some(70.0));
    }

    #[test]
    fn test_aggregate_infeasible_iteration() {
        let mut b = NetworkBuilder::new();
        let area = b.add_service_area("A");
        b.add_irrigation_type("flood", 0.5);
        let well = b.add_well("W1", area);
        let field = b.add_field("F1", area, 1.0, None);
        b.add_field_timestep(field, T1, 40.0, 0.0);
        b.add_pipe(well, field, 10.0);
        let network = b.build().unwrap();

        let snapshot = Snapshot::new(&network, Scope::new(area, T1, Y));
        let model = AllocationModelBuilder::new(&snapshot, BuildConfig::default())
            .build()
            .unwrap();
        let states = field_states(&model, &snapshot).unwrap();

        let result = aggregate(0, &model, &states, &[0], &SolveOutcome::infeasible());
        assert_eq!(result.status, SolveStatus::Infeasible);
        assert_eq!(result.objective, None);
        assert_eq!(result.draw(field).unwrap().efficiency, 0.5);
        assert!(result.fields.is_empty());
        assert!(result.wells.is_empty());
        assert_eq!(result.total_allocated(), None);
        assert_eq!(format!("{}", result), "Iteration 0: Infeasible");
    }
}
