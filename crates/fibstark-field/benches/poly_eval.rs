use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use fibstark_field::{FeltPoly, Felt, FIB_FIELD};

#[inline]
fn det_vec(n: usize, seed: u64) -> Vec<Felt> {
    let mut a = 1_664_525u64.wrapping_mul(seed).wrapping_add(1_013_904_223);
    (0..n)
        .map(|i| {
            a = a.wrapping_mul(1_664_525).wrapping_add(1_013_904_223) % (1u64 << 32);
            Felt::from_u64(a ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        })
        .collect()
}

fn bench_poly(c: &mut Criterion) {
    let mut group = c.benchmark_group("fibstark_poly");

    for &n in &[256usize, 1024] {
        let poly = FeltPoly::new(det_vec(n, 2024));
        let domain = FIB_FIELD.subgroup(8 * n).expect("power-of-two subgroup");
        let coset = domain.coset(FIB_FIELD.generator()).elements();
        group.throughput(Throughput::Elements(coset.len() as u64));
        group.bench_function(BenchmarkId::new("eval_many_coset", n), |b| {
            b.iter(|| black_box(poly.eval_many(black_box(&coset))));
        });
    }

    for &n in &[64usize, 256] {
        let g = FIB_FIELD.subgroup(n).expect("power-of-two subgroup");
        let xs = g.elements();
        let ys = det_vec(n, 7);
        group.bench_function(BenchmarkId::new("interpolate", n), |b| {
            b.iter_batched(
                || (xs.clone(), ys.clone()),
                |(xs, ys)| black_box(FeltPoly::interpolate(&xs, &ys)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_poly);
criterion_main!(benches);
