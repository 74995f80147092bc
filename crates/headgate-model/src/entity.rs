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

//! Plain records for the entities of a water network.
//!
//! These are passive data: identifiers, measurements, and foreign keys
//! already resolved to typed indices. Cross-entity validation happens in
//! `NetworkBuilder::build`; aggregation across entities happens in
//! `Snapshot`.

use crate::{
    index::{CropIndex, FieldIndex, IrrigationTypeIndex, ServiceAreaIndex, WellIndex},
    period::{ProductionPeriod, TimeStep},
};
use headgate_core::num::fraction::Fraction;

/// A partition of wells and fields that only interact with each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceArea {
    pub id: String,
}

/// A method of applying water, with the fraction of applied water that the
/// crop consumptively uses.
#[derive(Debug, Clone, PartialEq)]
pub struct IrrigationType {
    pub id: String,
    pub efficiency: Fraction,
}

/// A crop that fields can be planted with and that wells report deliveries to.
#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    pub id: String,
}

/// A groundwater well.
#[derive(Debug, Clone, PartialEq)]
pub struct Well {
    pub id: String,
    pub service_area: ServiceAreaIndex,
}

/// Consumptive use and precipitation recorded for one field at one time step.
///
/// Both are depths (e.g. feet of water over the field); multiplying by the
/// field's acreage gives a volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTimestep {
    pub timestep: TimeStep,
    pub consumptive_use: f64,
    pub precip: f64,
}

impl FieldTimestep {
    /// Returns the net depth the crop needs from irrigation, never negative.
    #[inline]
    pub fn net_depth(&self) -> f64 {
        (self.consumptive_use - self.precip).max(0.0)
    }
}

/// An agricultural field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: String,
    pub service_area: ServiceAreaIndex,
    pub acreage: f64,
    pub crop: Option<CropIndex>,
    pub timesteps: Vec<FieldTimestep>,
}

impl Field {
    /// Returns the record for `timestep`, if any.
    #[inline]
    pub fn timestep(&self, timestep: TimeStep) -> Option<&FieldTimestep> {
        self.timesteps.iter().find(|t| t.timestep == timestep)
    }

    /// Returns the net volume of water the field needs at `timestep`:
    /// `max(consumptive_use - precip, 0) × acreage`.
    ///
    /// A time step without a record is treated as unplanted and yields `0.0`.
    #[inline]
    pub fn net_demand(&self, timestep: TimeStep) -> f64 {
        self.timestep(timestep)
            .map_or(0.0, |t| t.net_depth() * self.acreage)
    }
}

/// A physical connection from a well to a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub well: WellIndex,
    pub field: FieldIndex,
    pub distance: f64,
}

/// A metered quantity of water a well produced over a period, optionally
/// attributed to the crop it was delivered to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionRecord {
    pub well: WellIndex,
    pub period: ProductionPeriod,
    pub crop: Option<CropIndex>,
    pub quantity: f64,
}

/// A probability attached to one irrigation type within a crop's prior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorWeight {
    pub irrigation_type: IrrigationTypeIndex,
    pub probability: f64,
}
