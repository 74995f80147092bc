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

//! The immutable water network and its validating builder.
//!
//! A `Network` is built once from already-parsed district records and then
//! shared read-only by every snapshot, model build, and Monte Carlo run taken
//! from it. All structural validation happens in `NetworkBuilder::build`, so
//! everything downstream can index without checking.

use crate::{
    entity::{
        Crop, Field, FieldTimestep, IrrigationType, Pipe, PriorWeight, ProductionRecord,
        ServiceArea, Well,
    },
    index::{CropIndex, FieldIndex, IrrigationTypeIndex, PipeIndex, ServiceAreaIndex, WellIndex},
    period::{ProductionPeriod, TimeStep, Year, aggregate_by_fallback},
    prior::{EfficiencyPrior, FallbackPrior, PriorError, PriorSource, ResolvedPrior},
};
use headgate_core::num::fraction::Fraction;
use std::borrow::Cow;

/// The error returned by `NetworkBuilder::build` when the records are inconsistent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("{kind} {index} does not exist")]
    DanglingIndex { kind: &'static str, index: usize },
    #[error("duplicate pipe between {well} and {field}")]
    DuplicatePipe { well: WellIndex, field: FieldIndex },
    #[error("pipe between {well} and {field} has invalid distance {distance}")]
    InvalidDistance {
        well: WellIndex,
        field: FieldIndex,
        distance: f64,
    },
    #[error("{field} has invalid acreage {acreage}")]
    InvalidAcreage { field: FieldIndex, acreage: f64 },
    #[error("{field} has a non-finite depth at time step {timestep}")]
    InvalidDepth { field: FieldIndex, timestep: TimeStep },
    #[error("{field} has more than one record for time step {timestep}")]
    DuplicateTimestep { field: FieldIndex, timestep: TimeStep },
    #[error("{irrigation_type} has invalid efficiency {efficiency}; expected a value in (0, 1]")]
    InvalidEfficiency {
        irrigation_type: IrrigationTypeIndex,
        efficiency: f64,
    },
    #[error("invalid prior for {}: {source}", display_prior_owner(.crop))]
    InvalidPrior {
        crop: Option<CropIndex>,
        #[source]
        source: PriorError,
    },
    #[error("{well} has invalid production quantity {quantity} for {period}")]
    InvalidQuantity {
        well: WellIndex,
        period: ProductionPeriod,
        quantity: f64,
    },
    #[error("network has no irrigation types")]
    NoIrrigationTypes,
}

fn display_prior_owner(crop: &Option<CropIndex>) -> String {
    match crop {
        Some(crop) => crop.to_string(),
        None => "the fallback".to_string(),
    }
}

/// A validated, immutable water network.
///
/// Besides the entities themselves the network keeps two adjacency lists
/// built once at construction: the pipes entering every field, and the
/// production records of every well.
#[derive(Debug, Clone)]
pub struct Network {
    service_areas: Vec<ServiceArea>,
    irrigation_types: Vec<IrrigationType>,
    crops: Vec<Crop>,
    crop_priors: Vec<Option<EfficiencyPrior>>, // len = num_crops
    fallback_prior: FallbackPrior,
    wells: Vec<Well>,
    fields: Vec<Field>,
    pipes: Vec<Pipe>,
    production: Vec<ProductionRecord>,
    pipes_by_field: Vec<Vec<PipeIndex>>, // len = num_fields
    production_by_well: Vec<Vec<usize>>, // len = num_wells
}

impl Network {
    #[inline]
    pub fn num_service_areas(&self) -> usize {
        self.service_areas.len()
    }

    #[inline]
    pub fn num_irrigation_types(&self) -> usize {
        self.irrigation_types.len()
    }

    #[inline]
    pub fn num_crops(&self) -> usize {
        self.crops.len()
    }

    #[inline]
    pub fn num_wells(&self) -> usize {
        self.wells.len()
    }

    #[inline]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn num_pipes(&self) -> usize {
        self.pipes.len()
    }

    /// Returns the service area at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_service_areas()`.
    #[inline]
    pub fn service_area(&self, index: ServiceAreaIndex) -> &ServiceArea {
        &self.service_areas[index.get()]
    }

    /// Returns the irrigation type at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_irrigation_types()`.
    #[inline]
    pub fn irrigation_type(&self, index: IrrigationTypeIndex) -> &IrrigationType {
        &self.irrigation_types[index.get()]
    }

    /// Returns the crop at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_crops()`.
    #[inline]
    pub fn crop(&self, index: CropIndex) -> &Crop {
        &self.crops[index.get()]
    }

    /// Returns the well at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_wells()`.
    #[inline]
    pub fn well(&self, index: WellIndex) -> &Well {
        &self.wells[index.get()]
    }

    /// Returns the field at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_fields()`.
    #[inline]
    pub fn field(&self, index: FieldIndex) -> &Field {
        &self.fields[index.get()]
    }

    /// Returns the pipe at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_pipes()`.
    #[inline]
    pub fn pipe(&self, index: PipeIndex) -> &Pipe {
        &self.pipes[index.get()]
    }

    /// Iterates over all wells with their indices.
    pub fn wells(&self) -> impl Iterator<Item = (WellIndex, &Well)> {
        self.wells
            .iter()
            .enumerate()
            .map(|(i, w)| (WellIndex::new(i), w))
    }

    /// Iterates over all fields with their indices.
    pub fn fields(&self) -> impl Iterator<Item = (FieldIndex, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, f)| (FieldIndex::new(i), f))
    }

    /// Returns the pipes entering `field`, in insertion order.
    #[inline]
    pub fn pipes_into(&self, field: FieldIndex) -> &[PipeIndex] {
        &self.pipes_by_field[field.get()]
    }

    /// Iterates over the production records of `well`.
    pub fn production_of(&self, well: WellIndex) -> impl Iterator<Item = &ProductionRecord> {
        self.production_by_well[well.get()]
            .iter()
            .map(|&i| &self.production[i])
    }

    /// Returns the production capacity of `well` in `year`.
    ///
    /// Every record of the well counts, crop-tagged or not. Quantities are
    /// summed at the coarsest granularity that has any record for the year;
    /// an unmeasured well has zero capacity.
    pub fn well_capacity(&self, well: WellIndex, year: Year) -> f64 {
        let records: Vec<_> = self
            .production_of(well)
            .map(|r| (r.period, r.quantity))
            .collect();
        aggregate_by_fallback(year, records)
    }

    /// Returns the quantity `well` is recorded to have delivered to `crop` in
    /// `year`, or `None` if no such record exists.
    pub fn crop_production(&self, well: WellIndex, crop: CropIndex, year: Year) -> Option<f64> {
        let records: Vec<_> = self
            .production_of(well)
            .filter(|r| r.crop == Some(crop) && r.period.year() == year)
            .map(|r| (r.period, r.quantity))
            .collect();
        if records.is_empty() {
            return None;
        }
        Some(aggregate_by_fallback(year, records))
    }

    /// Returns every crop with a production record from `well` in `year`,
    /// together with the recorded quantity, ordered by crop index.
    pub fn crop_productions(&self, well: WellIndex, year: Year) -> Vec<(CropIndex, f64)> {
        let mut crops: Vec<CropIndex> = self
            .production_of(well)
            .filter(|r| r.period.year() == year)
            .filter_map(|r| r.crop)
            .collect();
        crops.sort_unstable();
        crops.dedup();

        crops
            .into_iter()
            .filter_map(|crop| {
                self.crop_production(well, crop, year)
                    .map(|quantity| (crop, quantity))
            })
            .collect()
    }

    /// Returns the fallback prior configured for the network.
    #[inline]
    pub fn fallback_prior(&self) -> &FallbackPrior {
        &self.fallback_prior
    }

    /// Returns the prior of `crop`, if one was set.
    #[inline]
    pub fn crop_prior(&self, crop: CropIndex) -> Option<&EfficiencyPrior> {
        self.crop_priors[crop.get()].as_ref()
    }

    /// Resolves the prior for a field planted with `crop`: the crop's own
    /// prior if it has one, the fallback otherwise.
    pub fn resolve_prior(&self, crop: Option<CropIndex>) -> ResolvedPrior<'_> {
        if let Some(crop) = crop {
            if let Some(prior) = self.crop_prior(crop) {
                return ResolvedPrior {
                    source: PriorSource::Crop(crop),
                    prior: Cow::Borrowed(prior),
                };
            }
        }

        let prior = match &self.fallback_prior {
            FallbackPrior::Uniform => Cow::Owned(EfficiencyPrior::uniform(self.num_irrigation_types())),
            FallbackPrior::Explicit(prior) => Cow::Borrowed(prior),
        };
        ResolvedPrior {
            source: PriorSource::Fallback,
            prior,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Network(service_areas: {}, wells: {}, fields: {}, pipes: {}, crops: {}, irrigation_types: {})",
            self.num_service_areas(),
            self.num_wells(),
            self.num_fields(),
            self.num_pipes(),
            self.num_crops(),
            self.num_irrigation_types()
        )
    }
}

/// Collects network records and validates them into a `Network`.
///
/// Every `add_*` method returns the dense index assigned to the new entity.
/// Indices passed back into the builder are checked in `build`, not when
/// they are passed, so records may be added in any order.
///
/// # Examples
///
/// ```rust
/// # use headgate_model::network::NetworkBuilder;
/// # use headgate_model::period::{ProductionPeriod, TimeStep, Year};
/// let mut builder = NetworkBuilder::new();
/// let area = builder.add_service_area("north");
/// builder.add_irrigation_type("flood", 0.6);
/// let well = builder.add_well("W1", area);
/// let field = builder.add_field("F1", area, 10.0, None);
/// builder
///     .add_field_timestep(field, TimeStep::new(1), 2.0, 0.5)
///     .add_production(well, ProductionPeriod::annual(Year::new(2018)), None, 100.0);
/// builder.add_pipe(well, field, 250.0);
///
/// let network = builder.build().unwrap();
/// assert_eq!(network.num_pipes(), 1);
/// assert_eq!(network.well_capacity(well, Year::new(2018)), 100.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    service_areas: Vec<ServiceArea>,
    irrigation_types: Vec<(String, f64)>,
    crops: Vec<Crop>,
    crop_priors: Vec<Option<Vec<PriorWeight>>>,
    fallback_prior: Option<Vec<PriorWeight>>,
    wells: Vec<Well>,
    fields: Vec<Field>,
    pipes: Vec<Pipe>,
    production: Vec<ProductionRecord>,
}

impl NetworkBuilder {
    /// Creates an empty builder whose fallback prior is uniform over all
    /// irrigation types.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_service_area(&mut self, id: impl Into<String>) -> ServiceAreaIndex {
        self.service_areas.push(ServiceArea { id: id.into() });
        ServiceAreaIndex::new(self.service_areas.len() - 1)
    }

    /// Adds an irrigation type with the fraction of applied water the crop
    /// consumptively uses. The efficiency is validated in `build`.
    pub fn add_irrigation_type(&mut self, id: impl Into<String>, efficiency: f64) -> IrrigationTypeIndex {
        self.irrigation_types.push((id.into(), efficiency));
        IrrigationTypeIndex::new(self.irrigation_types.len() - 1)
    }

    pub fn add_crop(&mut self, id: impl Into<String>) -> CropIndex {
        self.crops.push(Crop { id: id.into() });
        self.crop_priors.push(None);
        CropIndex::new(self.crops.len() - 1)
    }

    /// Sets the efficiency prior of `crop`, replacing any previous one.
    ///
    /// # Panics
    ///
    /// Panics if `crop` was not returned by `add_crop` on this builder.
    pub fn set_crop_prior(&mut self, crop: CropIndex, weights: Vec<PriorWeight>) -> &mut Self {
        let index = crop.get();
        assert!(
            index < self.crops.len(),
            "called `NetworkBuilder::set_crop_prior` with crop index out of bounds: the len is {} but the index is {}",
            self.crops.len(),
            index
        );
        self.crop_priors[index] = Some(weights);
        self
    }

    /// Replaces the uniform fallback with an explicit distribution.
    pub fn set_fallback_prior(&mut self, weights: Vec<PriorWeight>) -> &mut Self {
        self.fallback_prior = Some(weights);
        self
    }

    pub fn add_well(&mut self, id: impl Into<String>, service_area: ServiceAreaIndex) -> WellIndex {
        self.wells.push(Well {
            id: id.into(),
            service_area,
        });
        WellIndex::new(self.wells.len() - 1)
    }

    pub fn add_field(
        &mut self,
        id: impl Into<String>,
        service_area: ServiceAreaIndex,
        acreage: f64,
        crop: Option<CropIndex>,
    ) -> FieldIndex {
        self.fields.push(Field {
            id: id.into(),
            service_area,
            acreage,
            crop,
            timesteps: Vec::new(),
        });
        FieldIndex::new(self.fields.len() - 1)
    }

    /// Records consumptive use and precipitation depths for `field` at `timestep`.
    ///
    /// # Panics
    ///
    /// Panics if `field` was not returned by `add_field` on this builder.
    pub fn add_field_timestep(
        &mut self,
        field: FieldIndex,
        timestep: TimeStep,
        consumptive_use: f64,
        precip: f64,
    ) -> &mut Self {
        let index = field.get();
        assert!(
            index < self.fields.len(),
            "called `NetworkBuilder::add_field_timestep` with field index out of bounds: the len is {} but the index is {}",
            self.fields.len(),
            index
        );
        self.fields[index].timesteps.push(FieldTimestep {
            timestep,
            consumptive_use,
            precip,
        });
        self
    }

    pub fn add_pipe(&mut self, well: WellIndex, field: FieldIndex, distance: f64) -> PipeIndex {
        self.pipes.push(Pipe {
            well,
            field,
            distance,
        });
        PipeIndex::new(self.pipes.len() - 1)
    }

    /// Records a metered production quantity. With `crop` set, the record
    /// also attributes the water to that crop.
    pub fn add_production(
        &mut self,
        well: WellIndex,
        period: ProductionPeriod,
        crop: Option<CropIndex>,
        quantity: f64,
    ) -> &mut Self {
        self.production.push(ProductionRecord {
            well,
            period,
            crop,
            quantity,
        });
        self
    }

    /// Validates the collected records and builds the network.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found; see `NetworkError`.
    pub fn build(self) -> Result<Network, NetworkError> {
        let num_irrigation_types = self.irrigation_types.len();
        if num_irrigation_types == 0 {
            return Err(NetworkError::NoIrrigationTypes);
        }

        let irrigation_types = self
            .irrigation_types
            .into_iter()
            .enumerate()
            .map(|(i, (id, efficiency))| {
                let invalid = || NetworkError::InvalidEfficiency {
                    irrigation_type: IrrigationTypeIndex::new(i),
                    efficiency,
                };
                let fraction = Fraction::new(efficiency).map_err(|_| invalid())?;
                if fraction.is_zero() {
                    return Err(invalid());
                }
                Ok(IrrigationType {
                    id,
                    efficiency: fraction,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let validate_prior = |crop: Option<CropIndex>, weights: Vec<PriorWeight>| {
            for w in &weights {
                check_index("IrrigationTypeIndex", w.irrigation_type.get(), num_irrigation_types)?;
            }
            EfficiencyPrior::new(weights).map_err(|source| NetworkError::InvalidPrior { crop, source })
        };

        let crop_priors = self
            .crop_priors
            .into_iter()
            .enumerate()
            .map(|(i, weights)| {
                weights
                    .map(|weights| validate_prior(Some(CropIndex::new(i)), weights))
                    .transpose()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fallback_prior = match self.fallback_prior {
            Some(weights) => FallbackPrior::Explicit(validate_prior(None, weights)?),
            None => FallbackPrior::Uniform,
        };

        let num_areas = self.service_areas.len();
        let num_crops = self.crops.len();
        let num_wells = self.wells.len();
        let num_fields = self.fields.len();

        for well in &self.wells {
            check_index("ServiceAreaIndex", well.service_area.get(), num_areas)?;
        }

        for (i, field) in self.fields.iter().enumerate() {
            let index = FieldIndex::new(i);
            check_index("ServiceAreaIndex", field.service_area.get(), num_areas)?;
            if let Some(crop) = field.crop {
                check_index("CropIndex", crop.get(), num_crops)?;
            }
            if !field.acreage.is_finite() || field.acreage <= 0.0 {
                return Err(NetworkError::InvalidAcreage {
                    field: index,
                    acreage: field.acreage,
                });
            }
            for (j, ts) in field.timesteps.iter().enumerate() {
                if !ts.consumptive_use.is_finite() || !ts.precip.is_finite() {
                    return Err(NetworkError::InvalidDepth {
                        field: index,
                        timestep: ts.timestep,
                    });
                }
                if field.timesteps[..j].iter().any(|t| t.timestep == ts.timestep) {
                    return Err(NetworkError::DuplicateTimestep {
                        field: index,
                        timestep: ts.timestep,
                    });
                }
            }
        }

        let mut pipes_by_field = vec![Vec::new(); num_fields];
        let mut seen = std::collections::HashSet::with_capacity(self.pipes.len());
        for (i, pipe) in self.pipes.iter().enumerate() {
            check_index("WellIndex", pipe.well.get(), num_wells)?;
            check_index("FieldIndex", pipe.field.get(), num_fields)?;
            if !pipe.distance.is_finite() || pipe.distance < 0.0 {
                return Err(NetworkError::InvalidDistance {
                    well: pipe.well,
                    field: pipe.field,
                    distance: pipe.distance,
                });
            }
            if !seen.insert((pipe.well, pipe.field)) {
                return Err(NetworkError::DuplicatePipe {
                    well: pipe.well,
                    field: pipe.field,
                });
            }
            pipes_by_field[pipe.field.get()].push(PipeIndex::new(i));
        }

        let mut production_by_well = vec![Vec::new(); num_wells];
        for (i, record) in self.production.iter().enumerate() {
            check_index("WellIndex", record.well.get(), num_wells)?;
            if let Some(crop) = record.crop {
                check_index("CropIndex", crop.get(), num_crops)?;
            }
            if !record.quantity.is_finite() || record.quantity < 0.0 {
                return Err(NetworkError::InvalidQuantity {
                    well: record.well,
                    period: record.period,
                    quantity: record.quantity,
                });
            }
            production_by_well[record.well.get()].push(i);
        }

        Ok(Network {
            service_areas: self.service_areas,
            irrigation_types,
            crops: self.crops,
            crop_priors,
            fallback_prior,
            wells: self.wells,
            fields: self.fields,
            pipes: self.pipes,
            production: self.production,
            pipes_by_field,
            production_by_well,
        })
    }
}

#[inline]
fn check_index(kind: &'static str, index: usize, len: usize) -> Result<(), NetworkError> {
    if index < len {
        Ok(())
    } else {
        Err(NetworkError::DanglingIndex { kind, index })
    }
}
