//! Instance clustering benchmarks.
//!
//! Measures single-linkage clustering over the minimum spanning tree and
//! tour clustering over a nearest-neighbour tour on seeded planar instances.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use clubra_benches::{
    error::BenchSetupError,
    params::ClusteringBenchParams,
    source::{SyntheticConfig, SyntheticInstance},
};
use clubra_core::{
    ClusteringMode, ClusteringParams, Rounding, clustering::cluster_instance,
    oracle::NearestNeighbourTour,
};

/// Seed used for all synthetic instance generation in this benchmark.
const SEED: u64 = 42;

/// Customer counts to benchmark.
const CUSTOMER_COUNTS: &[usize] = &[50, 200, 500];

const MODES: &[(&str, ClusteringMode)] = &[
    ("single-linkage", ClusteringMode::SingleLinkage),
    ("tour", ClusteringMode::Tour),
];

fn clustering_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("cluster_instance");
    group.sample_size(20);
    let params = ClusteringParams::default();
    let oracle = NearestNeighbourTour::new(Rounding::Exact);

    for &customer_count in CUSTOMER_COUNTS {
        let instance = SyntheticInstance::generate(&SyntheticConfig {
            customer_count,
            seed: SEED,
        })?;
        let distances = instance.distances();
        // Surface setup failures before timing starts.
        cluster_instance(&distances, &params, ClusteringMode::Both, &oracle)?;

        for &(mode_name, mode) in MODES {
            let bench_params = ClusteringBenchParams {
                customer_count,
                mode: mode_name,
            };
            group.bench_with_input(
                BenchmarkId::from_parameter(&bench_params),
                &distances,
                |b, distances| {
                    b.iter(|| cluster_instance(distances, &params, mode, &oracle));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn clustering(c: &mut Criterion) {
    if let Err(err) = clustering_impl(c) {
        panic!("clustering benchmark setup failed: {err}");
    }
}

criterion_group!(benches, clustering);
criterion_main!(benches);
