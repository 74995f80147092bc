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

//! # Headgate Solver
//!
//! High-level orchestration of allocation runs across service areas. For
//! every requested scope the planner takes a snapshot of the network, builds
//! the allocation model, and runs the Monte Carlo sampler on its own clone of
//! the solver backend.
//!
//! ## Modules
//!
//! - `config`: `RunConfig`, the file-loadable bundle of build and sampler
//!   settings.
//! - `planner`: `Planner` and `PlannerBuilder`, sequential or threaded
//!   execution over service areas.
//! - `error`: Configuration and planning errors.
//!
//! Service areas share no water, so their runs are independent. Running them
//! on separate threads changes nothing about any single run's result.

pub mod config;
pub mod error;
pub mod planner;
