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

//! Builds an `AllocationModel` from a network snapshot.
//!
//! For every field in scope the builder keeps the `K` shortest pipes and
//! creates one variable per pipe. Each variable earns
//! `max_benefit_distance - distance` per unit in the objective, so water
//! travelling further than `max_benefit_distance` costs more than it is
//! worth. The constraints then pin the allocation between a margin and the
//! upper bound of each field's gross demand, each well's capacity, and
//! (optionally) each well's recorded delivery to a crop.

use crate::{
    config::BuildConfig,
    constraint::{ConstraintKind, LinearConstraint, ParameterIndex, Rhs, Sense},
    error::BuildError,
    model::{AllocationModel, FieldRow, WellRow},
    variable::{VariableIndex, VariableOrigin, VariableTable},
};
use headgate_core::num::fraction::Fraction;
use headgate_model::{
    index::{FieldIndex, WellIndex},
    snapshot::Snapshot,
};
use smallvec::SmallVec;

/// A caller-supplied bound on the combined allocation through a set of pipes.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLimit {
    pub pairs: Vec<(WellIndex, FieldIndex)>,
    pub quantity: f64,
    pub margin: Fraction,
}

/// Turns a `Snapshot` into an `AllocationModel`.
///
/// # Examples
///
/// ```rust
/// # use headgate_lp::{builder::AllocationModelBuilder, config::BuildConfig};
/// # use headgate_model::{network::NetworkBuilder, period::*, snapshot::*};
/// let mut b = NetworkBuilder::new();
/// let area = b.add_service_area("A");
/// b.add_irrigation_type("drip", 0.9);
/// let well = b.add_well("W1", area);
/// let field = b.add_field("F1", area, 1.0, None);
/// b.add_field_timestep(field, TimeStep::new(1), 40.0, 0.0)
///     .add_production(well, ProductionPeriod::annual(Year::new(2018)), None, 100.0);
/// b.add_pipe(well, field, 100.0);
/// let network = b.build().unwrap();
///
/// let snapshot = Snapshot::new(&network, Scope::new(area, TimeStep::new(1), Year::new(2018)));
/// let model = AllocationModelBuilder::new(&snapshot, BuildConfig::default())
///     .build()
///     .unwrap();
/// assert_eq!(model.num_variables(), 1);
/// assert_eq!(model.variable(model.field_rows()[0].variables[0]).name(), "well_W1_field_F1");
/// ```
#[derive(Debug, Clone)]
pub struct AllocationModelBuilder<'s, 'a> {
    snapshot: &'s Snapshot<'a>,
    config: BuildConfig,
    groups: Vec<GroupLimit>,
}

impl<'s, 'a> AllocationModelBuilder<'s, 'a> {
    #[inline]
    pub fn new(snapshot: &'s Snapshot<'a>, config: BuildConfig) -> Self {
        Self {
            snapshot,
            config,
            groups: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Adds a group limit: the combined allocation through `pairs` must not
    /// exceed `quantity` and must reach `margin × quantity`.
    ///
    /// Every pair has to name a pipe that receives a variable, otherwise
    /// `build` fails with `BuildError::MissingVariable`. A negative or
    /// non-finite `quantity` fails with `BuildError::InvalidGroupLimit`.
    pub fn add_group_limit(
        &mut self,
        pairs: Vec<(WellIndex, FieldIndex)>,
        quantity: f64,
        margin: Fraction,
    ) -> &mut Self {
        self.groups.push(GroupLimit {
            pairs,
            quantity,
            margin,
        });
        self
    }

    /// Builds the model.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::EmptyScope` if the snapshot has no wells or no
    /// fields, `BuildError::MissingVariable` if a group limit names a pair
    /// without a variable, and `BuildError::InvalidGroupLimit` if a group
    /// quantity is negative or not finite.
    pub fn build(&self) -> Result<AllocationModel, BuildError> {
        let snapshot = self.snapshot;
        let scope = snapshot.scope();
        if snapshot.is_empty() {
            return Err(BuildError::EmptyScope { scope });
        }

        let network = snapshot.network();
        let config = &self.config;
        let max_pipes = config.max_pipes_per_field.unwrap_or(usize::MAX);

        let mut variables = VariableTable::new();
        let mut fields: Vec<FieldRow> = Vec::with_capacity(snapshot.fields().len());

        for field in snapshot.fields() {
            if field.pipes.is_empty() {
                tracing::debug!(field = %field.index, "field has no pipes in scope");
                continue;
            }

            let field_id = &network.field(field.index).id;
            let selected: SmallVec<[VariableIndex; 4]> = field
                .pipes
                .iter()
                .take(max_pipes)
                .map(|pipe| {
                    let name = format!("well_{}_field_{}", network.well(pipe.well).id, field_id);
                    variables.push_pipe(
                        name,
                        pipe.index,
                        pipe.well,
                        field.index,
                        config.max_benefit_distance - pipe.distance,
                    )
                })
                .collect();
            if selected.is_empty() {
                tracing::debug!(field = %field.index, "pipe cap leaves field without variables");
                continue;
            }

            let slack = config.slack.then(|| {
                variables.push_slack(
                    format!("slack_field_{}", field_id),
                    field.index,
                    config.slack_cost(),
                )
            });

            fields.push(FieldRow {
                field: field.index,
                crop: field.crop,
                net_demand: field.net_demand,
                parameter: ParameterIndex::new(fields.len()),
                variables: selected,
                slack,
            });
        }

        let wells: Vec<WellRow> = snapshot
            .wells()
            .iter()
            .filter_map(|well| {
                let selected: SmallVec<[VariableIndex; 4]> = variables
                    .iter()
                    .filter(|(_, v)| v.origin().well() == Some(well.index))
                    .map(|(i, _)| i)
                    .collect();
                if selected.is_empty() {
                    return None;
                }
                Some(WellRow {
                    well: well.index,
                    capacity: well.capacity,
                    variables: selected,
                })
            })
            .collect();

        let mut constraints = Vec::new();
        let margins = &config.margins;

        for row in &fields {
            let kind = ConstraintKind::FieldDemand { field: row.field };
            constraints.push(LinearConstraint::sum(
                kind,
                Sense::Le,
                row.variables.iter().copied(),
                Rhs::scaled_by_inverse(row.net_demand, 1.0, row.parameter),
            ));
            if !margins.field_demand.is_zero() {
                constraints.push(LinearConstraint::sum(
                    kind,
                    Sense::Ge,
                    row.variables.iter().copied().chain(row.slack),
                    Rhs::scaled_by_inverse(row.net_demand, margins.field_demand.get(), row.parameter),
                ));
            }
        }

        for row in &wells {
            let kind = ConstraintKind::WellCapacity { well: row.well };
            push_bounded(
                &mut constraints,
                kind,
                row.variables.iter().copied(),
                row.capacity,
                margins.well_allocation,
            );
        }

        if config.crop_attribution {
            for delivery in snapshot.crop_deliveries() {
                let selected: Vec<VariableIndex> = variables
                    .iter()
                    .filter_map(|(i, v)| match v.origin() {
                        VariableOrigin::Pipe { well, field, .. }
                            if well == delivery.well
                                && snapshot.field(field).and_then(|f| f.crop) == Some(delivery.crop) =>
                        {
                            Some(i)
                        }
                        _ => None,
                    })
                    .collect();

                if selected.is_empty() {
                    tracing::warn!(
                        well = %delivery.well,
                        crop = %delivery.crop,
                        quantity = delivery.quantity,
                        "no selected pipe carries the recorded crop delivery; skipping attribution"
                    );
                    continue;
                }

                push_bounded(
                    &mut constraints,
                    ConstraintKind::CropAttribution {
                        well: delivery.well,
                        crop: delivery.crop,
                    },
                    selected,
                    delivery.quantity,
                    margins.crop_attribution,
                );
            }
        }

        for (group, limit) in self.groups.iter().enumerate() {
            if !limit.quantity.is_finite() || limit.quantity < 0.0 {
                return Err(BuildError::InvalidGroupLimit {
                    group,
                    quantity: limit.quantity,
                });
            }
            let selected = limit
                .pairs
                .iter()
                .map(|&(well, field)| variables.require(well, field))
                .collect::<Result<Vec<_>, _>>()?;
            push_bounded(
                &mut constraints,
                ConstraintKind::GroupLimit { group },
                selected,
                limit.quantity,
                limit.margin,
            );
        }

        let model = AllocationModel::new(scope, variables, constraints, fields, wells);
        tracing::debug!(
            scope = %scope,
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            parameters = model.num_parameters(),
            "built allocation model"
        );
        Ok(model)
    }
}

/// Pushes `Σ variables <= quantity` and, for a non-zero margin,
/// `Σ variables >= margin × quantity`.
fn push_bounded<I>(
    constraints: &mut Vec<LinearConstraint>,
    kind: ConstraintKind,
    variables: I,
    quantity: f64,
    margin: Fraction,
) where
    I: IntoIterator<Item = VariableIndex>,
{
    let upper = LinearConstraint::sum(kind, Sense::Le, variables, Rhs::fixed(quantity, 1.0));
    let lower = (!margin.is_zero()).then(|| {
        LinearConstraint::new(
            kind,
            Sense::Ge,
            upper.terms().iter().copied(),
            Rhs::fixed(quantity, margin.get()),
        )
    });
    constraints.push(upper);
    constraints.extend(lower);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarginConfig;
    use headgate_model::{
        index::{CropIndex, ServiceAreaIndex},
        network::{Network, NetworkBuilder},
        period::{ProductionPeriod, TimeStep, Year},
        snapshot::Scope,
    };

    const T1: TimeStep = TimeStep::new(1);
    const Y: Year = Year::new(2018);

    struct Fixture {
        network: Network,
        area: ServiceAreaIndex,
        wells: Vec<WellIndex>,
        fields: Vec<FieldIndex>,
        corn: CropIndex,
    }

    /// Two wells, three fields. F1 and F2 grow corn, F3 has no crop and no
    /// pipes. W1 reaches F1 (100) and F2 (400), W2 reaches F1 (50). W1
    /// delivered 10 to corn, W2 delivered 5 to beans.
    fn fixture() -> Fixture {
        let mut b = NetworkBuilder::new();
        let area = b.add_service_area("A");
        b.add_irrigation_type("flood", 0.5);
        let corn = b.add_crop("corn");
        let beans = b.add_crop("beans");
        let w1 = b.add_well("W1", area);
        let w2 = b.add_well("W2", area);
        let f1 = b.add_field("F1", area, 1.0, Some(corn));
        let f2 = b.add_field("F2", area, 1.0, Some(corn));
        let f3 = b.add_field("F3", area, 1.0, None);
        b.add_field_timestep(f1, T1, 40.0, 0.0)
            .add_field_timestep(f2, T1, 50.0, 0.0)
            .add_field_timestep(f3, T1, 10.0, 0.0)
            .add_production(w1, ProductionPeriod::annual(Y), None, 90.0)
            .add_production(w1, ProductionPeriod::annual(Y), Some(corn), 10.0)
            .add_production(w2, ProductionPeriod::annual(Y), None, 20.0)
            .add_production(w2, ProductionPeriod::annual(Y), Some(beans), 5.0);
        b.add_pipe(w1, f1, 100.0);
        b.add_pipe(w1, f2, 400.0);
        b.add_pipe(w2, f1, 50.0);

        Fixture {
            network: b.build().unwrap(),
            area,
            wells: vec![w1, w2],
            fields: vec![f1, f2, f3],
            corn,
        }
    }

    fn count(model: &AllocationModel, pred: impl Fn(ConstraintKind) -> bool) -> usize {
        model.constraints().filter(|(_, c)| pred(c.kind())).count()
    }

    #[test]
    fn test_variables_objective_and_rows() {
        let fx = fixture();
        let snapshot = Snapshot::new(&fx.network, Scope::new(fx.area, T1, Y));
        let model = AllocationModelBuilder::new(&snapshot, BuildConfig::default())
            .build()
            .unwrap();

        assert_eq!(model.num_variables(), 3);
        assert_eq!(model.num_parameters(), 2);
        assert!(model.field_row(fx.fields[2]).is_none());

        let f1 = model.field_row(fx.fields[0]).unwrap();
        assert_eq!(f1.net_demand, 40.0);
        assert_eq!(f1.crop, Some(fx.corn));
        assert_eq!(f1.variables.len(), 2);
        // Nearest pipe first: W2 at 50, then W1 at 100.
        assert_eq!(model.variable(f1.variables[0]).name(), "well_W2_field_F1");
        assert_eq!(model.variable(f1.variables[0]).objective(), 2950.0);
        assert_eq!(model.variable(f1.variables[1]).objective(), 2900.0);

        let w1 = model.well_row(fx.wells[0]).unwrap();
        assert_eq!(w1.capacity, 100.0);
        assert_eq!(w1.variables.len(), 2);
        assert_eq!(model.well_row(fx.wells[1]).unwrap().capacity, 25.0);

        // Field demand, well capacity, and crop attribution each get an
        // upper and a lower row.
        assert_eq!(count(&model, |k| matches!(k, ConstraintKind::FieldDemand { .. })), 4);
        assert_eq!(count(&model, |k| matches!(k, ConstraintKind::WellCapacity { .. })), 4);
        assert_eq!(count(&model, |k| matches!(k, ConstraintKind::CropAttribution { .. })), 2);
    }

    #[test]
    fn test_demand_rhs_follows_parameter() {
        let fx = fixture();
        let snapshot = Snapshot::new(&fx.network, Scope::new(fx.area, T1, Y));
        let mut model = AllocationModelBuilder::new(&snapshot, BuildConfig::default())
            .build()
            .unwrap();

        let row = model.field_row(fx.fields[0]).unwrap().clone();
        let (upper, lower) = {
            let mut it = model
                .constraints()
                .filter(|(_, c)| c.kind() == ConstraintKind::FieldDemand { field: row.field })
                .map(|(i, _)| i);
            (it.next().unwrap(), it.next().unwrap())
        };

        assert_eq!(model.rhs(upper), 40.0);
        model.set_parameter(row.parameter, 0.5);
        assert_eq!(model.rhs(upper), 80.0);
        assert!((model.rhs(lower) - 76.0).abs() < 1e-9);

        model.reset_parameters();
        assert_eq!(model.parameter(row.parameter), 1.0);
    }

    #[test]
    fn test_max_pipes_keeps_nearest() {
        let fx = fixture();
        let snapshot = Snapshot::new(&fx.network, Scope::new(fx.area, T1, Y));
        let config = BuildConfig::default().with_max_pipes_per_field(1);
        let model = AllocationModelBuilder::new(&snapshot, config).build().unwrap();

        let f1 = model.field_row(fx.fields[0]).unwrap();
        assert_eq!(f1.variables.len(), 1);
        assert_eq!(
            model.variables().lookup(fx.wells[1], fx.fields[0]),
            Some(f1.variables[0])
        );
        assert_eq!(model.variables().lookup(fx.wells[0], fx.fields[0]), None);
    }

    #[test]
    fn test_attribution_skipped_when_no_pipe_carries_crop() {
        let fx = fixture();
        let snapshot = Snapshot::new(&fx.network, Scope::new(fx.area, T1, Y));
        let model = AllocationModelBuilder::new(&snapshot, BuildConfig::default())
            .build()
            .unwrap();
        // W2 recorded a delivery to beans, but no beans field is reachable.
        assert_eq!(
            count(&model, |k| matches!(
                k,
                ConstraintKind::CropAttribution { well, .. } if well == fx.wells[1]
            )),
            0
        );

        let config = BuildConfig::default().with_crop_attribution(false);
        let model = AllocationModelBuilder::new(&snapshot, config).build().unwrap();
        assert_eq!(count(&model, |k| matches!(k, ConstraintKind::CropAttribution { .. })), 0);
    }

    #[test]
    fn test_zero_margins_drop_lower_rows_and_slack_enters_floor() {
        let fx = fixture();
        let snapshot = Snapshot::new(&fx.network, Scope::new(fx.area, T1, Y));

        let config = BuildConfig::default().with_margins(MarginConfig::none());
        let model = AllocationModelBuilder::new(&snapshot, config).build().unwrap();
        assert!(model.constraints().all(|(_, c)| c.sense() == Sense::Le));

        let config = BuildConfig::default().with_slack(true);
        let model = AllocationModelBuilder::new(&snapshot, config).build().unwrap();
        let row = model.field_row(fx.fields[1]).unwrap();
        let slack = row.slack.unwrap();
        assert_eq!(model.variable(slack).objective(), -3_000_000.0);
        assert_eq!(model.variable(slack).name(), "slack_field_F2");

        let floor = model
            .constraints()
            .find(|(_, c)| {
                c.kind() == ConstraintKind::FieldDemand { field: row.field } && c.sense() == Sense::Ge
            })
            .map(|(_, c)| c.clone())
            .unwrap();
        assert!(floor.terms().iter().any(|&(v, _)| v == slack));
    }

    #[test]
    fn test_group_limit_requires_variables() {
        let fx = fixture();
        let snapshot = Snapshot::new(&fx.network, Scope::new(fx.area, T1, Y));

        let mut builder = AllocationModelBuilder::new(&snapshot, BuildConfig::default());
        builder.add_group_limit(
            vec![(fx.wells[0], fx.fields[0]), (fx.wells[0], fx.fields[1])],
            30.0,
            Fraction::ZERO,
        );
        let model = builder.build().unwrap();
        assert_eq!(count(&model, |k| k == ConstraintKind::GroupLimit { group: 0 }), 1);

        builder.add_group_limit(vec![(fx.wells[1], fx.fields[1])], 5.0, Fraction::ZERO);
        assert_eq!(
            builder.build().unwrap_err(),
            BuildError::MissingVariable {
                well: fx.wells[1],
                field: fx.fields[1]
            }
        );
    }

    #[test]
    fn test_group_limit_rejects_invalid_quantity() {
        let fx = fixture();
        let snapshot = Snapshot::new(&fx.network, Scope::new(fx.area, T1, Y));

        for quantity in [-1.0, f64::NAN, f64::INFINITY] {
            let mut builder = AllocationModelBuilder::new(&snapshot, BuildConfig::default());
            builder
                .add_group_limit(vec![(fx.wells[0], fx.fields[0])], 30.0, Fraction::ZERO)
                .add_group_limit(vec![(fx.wells[0], fx.fields[1])], quantity, Fraction::ZERO);
            match builder.build().unwrap_err() {
                BuildError::InvalidGroupLimit { group, quantity: q } => {
                    assert_eq!(group, 1);
                    assert_eq!(q.is_nan(), quantity.is_nan());
                }
                other => panic!("expected invalid group limit, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_zero_pipe_cap_leaves_fields_out_of_model() {
        let fx = fixture();
        let snapshot = Snapshot::new(&fx.network, Scope::new(fx.area, T1, Y));
        let config = BuildConfig::default().with_max_pipes_per_field(0);
        let model = AllocationModelBuilder::new(&snapshot, config).build().unwrap();

        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.num_parameters(), 0);
        assert!(model.field_rows().is_empty());
        assert!(model.well_rows().is_empty());
        assert_eq!(model.num_constraints(), 0);
        for &field in &fx.fields {
            assert!(model.field_row(field).is_none());
        }
    }

    #[test]
    fn test_empty_scope_is_rejected() {
        let mut b = NetworkBuilder::new();
        let area = b.add_service_area("A");
        let empty = b.add_service_area("B");
        b.add_irrigation_type("flood", 0.5);
        b.add_well("W1", area);
        let network = b.build().unwrap();

        for a in [area, empty] {
            let scope = Scope::new(a, T1, Y);
            let snapshot = Snapshot::new(&network, scope);
            assert_eq!(
                AllocationModelBuilder::new(&snapshot, BuildConfig::default())
                    .build()
                    .unwrap_err(),
                BuildError::EmptyScope { scope }
            );
        }
    }
}
