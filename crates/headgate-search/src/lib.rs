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

//! # Headgate Search
//!
//! **Monte Carlo inference of irrigation efficiency.**
//!
//! Nobody meters how much of the water a field receives its crop actually
//! consumes. This crate treats each field's irrigation efficiency as a draw
//! from its crop's prior, solves the allocation model once per draw, and
//! keeps two things: the best-scoring iteration, and for every field and
//! every candidate irrigation type the objective values of the iterations
//! in which that type was drawn. High average objective is evidence that an
//! efficiency is consistent with what the wells actually delivered.
//!
//! ## Architecture
//!
//! * **`config`**: `SamplerConfig` and `SamplingStrategy`.
//! * **`field_state`**: Per-field candidate efficiencies and their running
//!   effectiveness samples.
//! * **`draw`**: Random draws and exhaustive enumeration of efficiency
//!   combinations.
//! * **`engine`**: `MonteCarloEngine`, the iteration loop.
//! * **`aggregate`**: Per-iteration allocation records for fields and wells.
//! * **`effectiveness`**: Effectiveness summaries and the posterior post-pass.
//! * **`incumbent`**: The best iteration seen so far.
//! * **`stats`**: Run statistics.
//! * **`result`**: `RunOutcome`, the record of a finished run.
//! * **`monitor`**: Observers for run lifecycle events.
//! * **`error`**: Run errors.
//!
//! ## Reproducibility
//!
//! Draws come from a `ChaCha8Rng` seeded from `SamplerConfig::seed`. With the
//! same seed, iteration count, and model, two runs produce identical draw
//! sequences and identical results.

pub mod aggregate;
pub mod config;
pub mod draw;
pub mod effectiveness;
pub mod engine;
pub mod error;
pub mod field_state;
pub mod incumbent;
pub mod monitor;
pub mod result;
pub mod stats;
