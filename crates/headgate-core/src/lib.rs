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

//! # Headgate Core
//!
//! Foundational primitives shared by the Headgate water allocation crates.
//! Nothing in here knows about wells or fields; it provides the small typed
//! building blocks that keep the higher-level model and solver code honest.
//!
//! ## Modules
//!
//! - `num`: Floating-point helpers for volumes and rates: a validated
//!   `Fraction` in `[0, 1]` (margins, efficiencies) and a `Tolerance` for
//!   comparing solver output against analytic bounds.
//! - `utils`: Phantom-tagged, strongly typed indices (`TypedIndex<T>`) used to
//!   keep well, field, pipe, and variable index spaces apart at compile time.
//!
//! Refer to each module for detailed APIs and examples.

pub mod num;
pub mod utils;
