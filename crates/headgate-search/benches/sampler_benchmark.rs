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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use headgate_lp::{
    backend::MicrolpSolver, builder::AllocationModelBuilder, config::BuildConfig,
};
use headgate_model::{
    network::{Network, NetworkBuilder},
    period::{ProductionPeriod, TimeStep, Year},
    snapshot::{Scope, Snapshot},
};
use headgate_search::{
    config::{SamplerConfig, SamplingStrategy},
    engine::MonteCarloEngine,
    monitor::no_op::NoOpMonitor,
};
use std::hint::black_box;

const TIMESTEP: TimeStep = TimeStep::new(1);
const YEAR: Year = Year::new(2018);

/// A service area where every field is reachable from its three nearest wells.
fn synthetic_network(num_wells: usize, num_fields: usize) -> (Network, Scope) {
    let mut b = NetworkBuilder::new();
    let area = b.add_service_area("bench");
    b.add_irrigation_type("drip", 0.9);
    b.add_irrigation_type("sprinkler", 0.75);
    b.add_irrigation_type("flood", 0.5);

    let wells: Vec<_> = (0..num_wells)
        .map(|i| {
            let w = b.add_well(format!("W{}", i), area);
            b.add_production(w, ProductionPeriod::annual(YEAR), None, 80.0 + (i % 7) as f64 * 10.0);
            w
        })
        .collect();

    for j in 0..num_fields {
        let f = b.add_field(format!("F{}", j), area, 1.0 + (j % 3) as f64, None);
        b.add_field_timestep(f, TIMESTEP, 30.0 + (j % 5) as f64 * 4.0, 5.0);
        for k in 0..3.min(num_wells) {
            let w = wells[(j + k) % num_wells];
            b.add_pipe(w, f, 150.0 * (k + 1) as f64 + j as f64);
        }
    }

    let network = b.build().expect("synthetic network is consistent");
    (network, Scope::new(area, TIMESTEP, YEAR))
}

fn bench_sampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler_benchmark");
    group.sample_size(10);

    const ITERATIONS: u64 = 20;

    for &(wells, fields) in &[(4usize, 8usize), (8, 16), (16, 32)] {
        let (network, scope) = synthetic_network(wells, fields);
        let snapshot = Snapshot::new(&network, scope);
        let template = AllocationModelBuilder::new(&snapshot, BuildConfig::default())
            .build()
            .expect("synthetic model builds");
        let config = SamplerConfig::default()
            .with_strategy(SamplingStrategy::Random)
            .with_iterations(ITERATIONS);

        group.throughput(Throughput::Elements(ITERATIONS));
        group.bench_with_input(
            BenchmarkId::new("microlp", format!("{}x{}", wells, fields)),
            &template,
            |bench, template| {
                bench.iter(|| {
                    let mut model = template.clone();
                    let engine = MonteCarloEngine::new(&model, &snapshot, config)
                        .expect("priors are well formed");
                    let outcome = engine
                        .run(&mut model, &mut MicrolpSolver::new(), &mut NoOpMonitor)
                        .expect("backend does not fail");
                    black_box(outcome.best_objective())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sampler);
criterion_main!(benches);
