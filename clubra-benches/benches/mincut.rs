//! Stoer–Wagner minimum cut benchmarks.
//!
//! Measures the global minimum cut over the customers of a seeded
//! fractional relaxation.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use clubra_benches::{
    error::BenchSetupError,
    params::InstanceBenchParams,
    source::{SyntheticConfig, SyntheticInstance},
};
use clubra_core::mincut::customer_min_cut;

/// Seed used for all synthetic instance generation in this benchmark.
const SEED: u64 = 7;

/// Customer counts to benchmark. The algorithm is cubic in the node count.
const CUSTOMER_COUNTS: &[usize] = &[25, 50, 100];

fn mincut_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("customer_min_cut");
    group.sample_size(20);

    for &customer_count in CUSTOMER_COUNTS {
        let instance = SyntheticInstance::generate(&SyntheticConfig {
            customer_count,
            seed: SEED,
        })?;
        let solution = instance.relaxation()?;
        customer_min_cut(&solution).map_err(clubra_core::ClubraError::from)?;

        group.bench_with_input(
            BenchmarkId::from_parameter(InstanceBenchParams { customer_count }),
            &solution,
            |b, solution| {
                b.iter(|| customer_min_cut(solution));
            },
        );
    }

    group.finish();
    Ok(())
}

fn mincut(c: &mut Criterion) {
    if let Err(err) = mincut_impl(c) {
        panic!("mincut benchmark setup failed: {err}");
    }
}

criterion_group!(benches, mincut);
criterion_main!(benches);
