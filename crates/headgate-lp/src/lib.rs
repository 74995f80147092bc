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

//! # Headgate LP
//!
//! **The linear allocation model and the seam to the solver that optimizes it.**
//!
//! An `AllocationModel` is built once from a network `Snapshot`: one
//! non-negative decision variable per selected pipe, an objective that
//! rewards delivered water and charges for distance, and supply, demand and
//! attribution constraints. Field demand constraints depend on an irrigation
//! efficiency parameter per field. The Monte Carlo sampler rewrites those
//! parameters between solves; variables and constraints never change.
//!
//! ## Architecture
//!
//! * **`config`**: `BuildConfig` and `MarginConfig`.
//! * **`variable`**: Variable indices and the side table mapping every
//!   variable back to the pipe or field it belongs to.
//! * **`constraint`**: Linear constraints whose right-hand side may be scaled
//!   by the inverse of an efficiency parameter.
//! * **`model`**: The `AllocationModel` itself, with row tables per field and
//!   per well.
//! * **`builder`**: `AllocationModelBuilder`, which turns a snapshot into a
//!   model.
//! * **`solver`**: The `LinearSolver` trait and its outcome types.
//! * **`backend`**: `MicrolpSolver`, the default pure-Rust simplex backend.
//! * **`error`**: Build and solver errors.

pub mod backend;
pub mod builder;
pub mod config;
pub mod constraint;
pub mod error;
pub mod model;
pub mod solver;
pub mod variable;
