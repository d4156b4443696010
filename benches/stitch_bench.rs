use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mtg_mesh::algs::stitch::{StitchOptions, stitch_facets};
use mtg_mesh::facets::{MtgFacets, NormalMode};

/// An `n x n` grid of unit quads with corner copies jittered well below
/// the stitch tolerance.
fn perturbed_grid(n: usize, seed: u64) -> MtgFacets {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut facets = MtgFacets::new();
    facets
        .set_normal_mode(NormalMode::VertexOnly, 4 * n * n, 0)
        .expect("fresh facets");
    for i in 0..n {
        for j in 0..n {
            let (x, y) = (i as f64, j as f64);
            let quad: Vec<[f64; 3]> = [(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)]
                .into_iter()
                .map(|(px, py)| {
                    [
                        px + rng.gen_range(-1e-10..1e-10),
                        py + rng.gen_range(-1e-10..1e-10),
                        rng.gen_range(-1e-10..1e-10),
                    ]
                })
                .collect();
            facets
                .add_coordinate_face(&quad, None, None)
                .expect("quad face");
        }
    }
    facets
}

fn bench_stitch(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitch_facets");
    let options = StitchOptions::with_abs_tol(1e-8);

    for &n in &[16usize, 64] {
        let grid = perturbed_grid(n, 7);
        group.bench_with_input(BenchmarkId::new("grid", n * n), &n, |b, _| {
            b.iter_batched(
                || grid.clone(),
                |mut facets| {
                    let summary = stitch_facets(&mut facets, &options).expect("stitch");
                    black_box(summary);
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stitch);
criterion_main!(benches);
