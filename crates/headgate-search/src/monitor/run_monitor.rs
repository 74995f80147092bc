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

use crate::{aggregate::IterationResult, draw::DrawMode, stats::RunStatistics};
use headgate_lp::model::AllocationModel;

/// Observes a Monte Carlo run.
pub trait RunMonitor {
    fn name(&self) -> &str;
    fn on_enter_run(&mut self, model: &AllocationModel, mode: DrawMode);
    fn on_iteration(&mut self, result: &IterationResult, stats: &RunStatistics);
    fn on_new_best(&mut self, result: &IterationResult, stats: &RunStatistics);
    fn on_exit_run(&mut self, stats: &RunStatistics);
}

impl std::fmt::Debug for dyn RunMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RunMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn RunMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RunMonitor({})", self.name())
    }
}
