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

use headgate_core::utils::index::{TypedIndex, TypedIndexTag};

/// A tag type for service area indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ServiceAreaIndexTag;

impl TypedIndexTag for ServiceAreaIndexTag {
    const NAME: &'static str = "ServiceAreaIndex";
}

/// A typed index for service areas.
pub type ServiceAreaIndex = TypedIndex<ServiceAreaIndexTag>;

/// A tag type for well indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct WellIndexTag;

impl TypedIndexTag for WellIndexTag {
    const NAME: &'static str = "WellIndex";
}

/// A typed index for wells.
pub type WellIndex = TypedIndex<WellIndexTag>;

/// A tag type for field indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FieldIndexTag;

impl TypedIndexTag for FieldIndexTag {
    const NAME: &'static str = "FieldIndex";
}

/// A typed index for agricultural fields.
pub type FieldIndex = TypedIndex<FieldIndexTag>;

/// A tag type for pipe indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PipeIndexTag;

impl TypedIndexTag for PipeIndexTag {
    const NAME: &'static str = "PipeIndex";
}

/// A typed index for pipes.
pub type PipeIndex = TypedIndex<PipeIndexTag>;

/// A tag type for crop indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CropIndexTag;

impl TypedIndexTag for CropIndexTag {
    const NAME: &'static str = "CropIndex";
}

/// A typed index for crops.
pub type CropIndex = TypedIndex<CropIndexTag>;

/// A tag type for irrigation type indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct IrrigationTypeIndexTag;

impl TypedIndexTag for IrrigationTypeIndexTag {
    const NAME: &'static str = "IrrigationTypeIndex";
}

/// A typed index for irrigation types.
pub type IrrigationTypeIndex = TypedIndex<IrrigationTypeIndexTag>;
