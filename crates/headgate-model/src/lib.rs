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

//! # Headgate Model
//!
//! **The network snapshot for the Headgate water allocation engine.**
//!
//! This crate holds the pre-validated data an allocation run consumes: wells
//! and their metered production, agricultural fields and their consumptive
//! use, the pipes connecting them, crops, irrigation types, and the discrete
//! efficiency priors that link the two. It is the data interchange layer
//! between whatever loads district records and the model builder in
//! `headgate_lp`.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed indices (`WellIndex`, `FieldIndex`, ...).
//! * **`period`**: Time steps, years, and production periods with their
//!   granularity fallback order.
//! * **`entity`**: Plain records for wells, fields, pipes, crops, irrigation
//!   types, and production.
//! * **`prior`**: Discrete efficiency priors and the fallback used for fields
//!   whose crop has none.
//! * **`network`**: The immutable `Network` and its validating `NetworkBuilder`.
//! * **`snapshot`**: A read-only view of one service area at one time step,
//!   with demand, capacity, and attribution quantities resolved.
//!
//! ## Design Philosophy
//!
//! Missing measurements are defined behavior, not errors: a field without a
//! record for the time step has zero demand, a well without production for the
//! year has zero capacity. Structural problems (a pipe pointing at a field
//! that does not exist, a negative distance, a prior nobody can draw from) are
//! rejected once, in `NetworkBuilder::build`.

pub mod entity;
pub mod index;
pub mod network;
pub mod period;
pub mod prior;
pub mod snapshot;
