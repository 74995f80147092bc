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

use crate::{
    aggregate::IterationResult, draw::DrawMode, monitor::run_monitor::RunMonitor,
    stats::RunStatistics,
};
use headgate_lp::model::AllocationModel;

/// A composite monitor that forwards events to every monitor it holds, in
/// insertion order.
#[derive(Default)]
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn RunMonitor + 'a>>,
}

impl std::fmt::Debug for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeMonitor")
            .field("monitors", &self.names().join(", "))
            .finish()
    }
}

impl std::fmt::Display for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompositeMonitor([{}])", self.names().join(", "))
    }
}

impl<'a> CompositeMonitor<'a> {
    /// Creates a new empty `CompositeMonitor`.
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeMonitor` with the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a monitor.
    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: RunMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor.
    #[inline]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn RunMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    fn names(&self) -> Vec<&str> {
        self.monitors.iter().map(|m| m.name()).collect()
    }
}

impl<'a> FromIterator<Box<dyn RunMonitor + 'a>> for CompositeMonitor<'a> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn RunMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl RunMonitor for CompositeMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_run(&mut self, model: &AllocationModel, mode: DrawMode) {
        for monitor in &mut self.monitors {
            monitor.on_enter_run(model, mode);
        }
    }

    fn on_iteration(&mut self, result: &IterationResult, stats: &RunStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_iteration(result, stats);
        }
    }

    fn on_new_best(&mut self, result: &IterationResult, stats: &RunStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_new_best(result, stats);
        }
    }

    fn on_exit_run(&mut self, stats: &RunStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_run(stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOpMonitor;
    use headgate_lp::solver::SolveStatus;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default)]
    struct Counts {
        iterations: u64,
        bests: u64,
        exits: u64,
    }

    struct Counting(Rc<RefCell<Counts>>);

    impl RunMonitor for Counting {
        fn name(&self) -> &str {
            "Counting"
        }
        fn on_enter_run(&mut self, _model: &AllocationModel, _mode: DrawMode) {}
        fn on_iteration(&mut self, _result: &IterationResult, _stats: &RunStatistics) {
            self.0.borrow_mut().iterations += 1;
        }
        fn on_new_best(&mut self, _result: &IterationResult, _stats: &RunStatistics) {
            self.0.borrow_mut().bests += 1;
        }
        fn on_exit_run(&mut self, _stats: &RunStatistics) {
            self.0.borrow_mut().exits += 1;
        }
    }

    fn result() -> IterationResult {
        IterationResult {
            iteration: 0,
            status: SolveStatus::Infeasible,
            objective: None,
            draws: Vec::new(),
            fields: Vec::new(),
            wells: Vec::new(),
        }
    }

    #[test]
    fn test_forwards_to_every_monitor() {
        let a = Rc::new(RefCell::new(Counts::default()));
        let b = Rc::new(RefCell::new(Counts::default()));
        let mut composite = CompositeMonitor::with_capacity(3);
        composite.add_monitor(Counting(a.clone()));
        composite.add_monitor_boxed(Box::new(Counting(b.clone())));
        composite.add_monitor(NoOpMonitor::new());
        assert_eq!(composite.len(), 3);
        assert_eq!(
            format!("{}", composite),
            "CompositeMonitor([Counting, Counting, NoOpMonitor])"
        );

        let stats = RunStatistics::default();
        composite.on_iteration(&result(), &stats);
        composite.on_iteration(&result(), &stats);
        composite.on_new_best(&result(), &stats);
        composite.on_exit_run(&stats);

        for counts in [a, b] {
            let c = counts.borrow();
            assert_eq!(c.iterations, 2);
            assert_eq!(c.bests, 1);
            assert_eq!(c.exits, 1);
        }
    }

    #[test]
    fn test_empty_composite() {
        let composite: CompositeMonitor = std::iter::empty::<Box<dyn RunMonitor>>().collect();
        assert!(composite.is_empty());
    }
}
