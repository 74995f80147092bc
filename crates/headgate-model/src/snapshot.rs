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

//! A read-only view of one service area at one time step.
//!
//! The snapshot resolves everything the model builder needs from the
//! network up front: which wells and fields are in scope, the pipes into
//! each field ordered by distance, demand for the time step, capacity and
//! crop deliveries for the year, and every field's efficiency prior.

use crate::{
    index::{CropIndex, FieldIndex, PipeIndex, ServiceAreaIndex, WellIndex},
    network::Network,
    period::{TimeStep, Year},
    prior::ResolvedPrior,
};

/// Selects the part of a network one allocation run works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    pub service_area: ServiceAreaIndex,
    pub timestep: TimeStep,
    pub year: Year,
}

impl Scope {
    #[inline]
    pub const fn new(service_area: ServiceAreaIndex, timestep: TimeStep, year: Year) -> Self {
        Self {
            service_area,
            timestep,
            year,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scope({}, {}, year {})",
            self.service_area, self.timestep, self.year
        )
    }
}

/// A well in scope with its capacity for the year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotWell {
    pub index: WellIndex,
    pub capacity: f64,
}

/// A pipe into a field in scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotPipe {
    pub index: PipeIndex,
    pub well: WellIndex,
    pub distance: f64,
}

/// A field in scope with its demand, pipes, and prior resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotField<'a> {
    pub index: FieldIndex,
    pub crop: Option<CropIndex>,
    pub net_demand: f64,
    /// Sorted by ascending distance, ties broken by well index.
    pub pipes: Vec<SnapshotPipe>,
    pub prior: ResolvedPrior<'a>,
}

/// Water a well is recorded to have delivered to a crop during the year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropDelivery {
    pub well: WellIndex,
    pub crop: CropIndex,
    pub quantity: f64,
}

/// A read-only view of a network restricted to a `Scope`.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    network: &'a Network,
    scope: Scope,
    wells: Vec<SnapshotWell>,
    fields: Vec<SnapshotField<'a>>,
    crop_deliveries: Vec<CropDelivery>,
}

impl<'a> Snapshot<'a> {
    /// Takes a snapshot of `network` for `scope`.
    ///
    /// Pipes connecting a field in the area to a well outside it are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `scope.service_area` does not belong to `network`.
    pub fn new(network: &'a Network, scope: Scope) -> Self {
        assert!(
            scope.service_area.get() < network.num_service_areas(),
            "called `Snapshot::new` with service area index out of bounds: the len is {} but the index is {}",
            network.num_service_areas(),
            scope.service_area.get()
        );

        let wells: Vec<SnapshotWell> = network
            .wells()
            .filter(|(_, w)| w.service_area == scope.service_area)
            .map(|(index, _)| SnapshotWell {
                index,
                capacity: network.well_capacity(index, scope.year),
            })
            .collect();

        let fields: Vec<SnapshotField<'a>> = network
            .fields()
            .filter(|(_, f)| f.service_area == scope.service_area)
            .map(|(index, field)| {
                let mut pipes: Vec<SnapshotPipe> = network
                    .pipes_into(index)
                    .iter()
                    .filter_map(|&p| {
                        let pipe = network.pipe(p);
                        if network.well(pipe.well).service_area != scope.service_area {
                            tracing::debug!(
                                pipe = %p,
                                well = %pipe.well,
                                field = %index,
                                "ignoring pipe from a well outside the service area"
                            );
                            return None;
                        }
                        Some(SnapshotPipe {
                            index: p,
                            well: pipe.well,
                            distance: pipe.distance,
                        })
                    })
                    .collect();
                pipes.sort_by(|a, b| {
                    a.distance
                        .total_cmp(&b.distance)
                        .then_with(|| a.well.cmp(&b.well))
                });

                SnapshotField {
                    index,
                    crop: field.crop,
                    net_demand: field.net_demand(scope.timestep),
                    pipes,
                    prior: network.resolve_prior(field.crop),
                }
            })
            .collect();

        let crop_deliveries: Vec<CropDelivery> = wells
            .iter()
            .flat_map(|w| {
                network
                    .crop_productions(w.index, scope.year)
                    .into_iter()
                    .map(move |(crop, quantity)| CropDelivery {
                        well: w.index,
                        crop,
                        quantity,
                    })
            })
            .collect();

        tracing::debug!(
            scope = %scope,
            wells = wells.len(),
            fields = fields.len(),
            crop_deliveries = crop_deliveries.len(),
            "took network snapshot"
        );

        Self {
            network,
            scope,
            wells,
            fields,
            crop_deliveries,
        }
    }

    #[inline]
    pub fn network(&self) -> &'a Network {
        self.network
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Wells in scope, ordered by index.
    #[inline]
    pub fn wells(&self) -> &[SnapshotWell] {
        &self.wells
    }

    /// Fields in scope, ordered by index.
    #[inline]
    pub fn fields(&self) -> &[SnapshotField<'a>] {
        &self.fields
    }

    /// Crop deliveries of wells in scope, ordered by well then crop.
    #[inline]
    pub fn crop_deliveries(&self) -> &[CropDelivery] {
        &self.crop_deliveries
    }

    /// Returns `true` if the scope contains no wells or no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.wells.is_empty() || self.fields.is_empty()
    }

    /// Returns the field with `index` if it is in scope.
    pub fn field(&self, index: FieldIndex) -> Option<&SnapshotField<'a>> {
        self.fields
            .binary_search_by_key(&index, |f| f.index)
            .ok()
            .map(|i| &self.fields[i])
    }

    /// Returns the well with `index` if it is in scope.
    pub fn well(&self, index: WellIndex) -> Option<&SnapshotWell> {
        self.wells
            .binary_search_by_key(&index, |w| w.index)
            .ok()
            .map(|i| &self.wells[i])
    }
}
