use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use geodesic_exact::geodesic_exact::GeodesicExact;
use geodesic_exact::geodesic_mask::GeodesicMask;

/// Random point, uniform in latitude and longitude.
#[inline]
fn rand_point(rng: &mut StdRng) -> (f64, f64) {
    (rng.random_range(-90.0..=90.0), rng.random_range(-180.0..180.0))
}

/// Generic pairs of points anywhere on the ellipsoid.
fn bench_random_pairs(c: &mut Criterion) {
    let geod = GeodesicExact::wgs84().unwrap();
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let samples = 1_000usize;

    c.bench_function("inverse/random_pairs", |b| {
        b.iter_batched(
            || {
                // Pre-generate inputs to avoid RNG cost in the timed section
                (0..samples)
                    .map(|_| (rand_point(&mut rng), rand_point(&mut rng)))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for ((lat1, lon1), (lat2, lon2)) in cases {
                    let sol = geod
                        .inverse(black_box(lat1), black_box(lon1), black_box(lat2), black_box(lon2))
                        .unwrap();
                    black_box(sol);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Distance only, the cheapest useful mask.
fn bench_distance_only(c: &mut Criterion) {
    let geod = GeodesicExact::wgs84().unwrap();
    let mut rng = StdRng::seed_from_u64(0xBADF00D);
    let samples = 1_000usize;

    c.bench_function("inverse/distance_only", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| (rand_point(&mut rng), rand_point(&mut rng)))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for ((lat1, lon1), (lat2, lon2)) in cases {
                    let _ = geod.gen_inverse(
                        black_box(lat1),
                        black_box(lon1),
                        black_box(lat2),
                        black_box(lon2),
                        GeodesicMask::DISTANCE,
                    );
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Nearly antipodal points, where the Newton iteration works hardest.
fn bench_near_antipodal(c: &mut Criterion) {
    let geod = GeodesicExact::wgs84().unwrap();
    let mut rng = StdRng::seed_from_u64(0xFEEDFACE);
    let samples = 1_000usize;

    c.bench_function("inverse/near_antipodal", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        let lat1: f64 = rng.random_range(-60.0..60.0);
                        let dlat: f64 = rng.random_range(-0.5..0.5);
                        let dlon: f64 = rng.random_range(179.0..180.0);
                        (lat1, -lat1 + dlat, dlon)
                    })
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (lat1, lat2, lon2) in cases {
                    let _ = geod.inverse(black_box(lat1), 0.0, black_box(lat2), black_box(lon2));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Higher-order area series on an oblate ellipsoid.
fn bench_area_high_order(c: &mut Criterion) {
    let params = geodesic_exact::geodesic_exact::GeodesicExactParams::builder()
        .c4_order(64)
        .build()
        .unwrap();
    let geod = GeodesicExact::with_params(6_378_137.0, 1.0 / 50.0, params).unwrap();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let samples = 500usize;

    c.bench_function("inverse/area_c4_order_64", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| (rand_point(&mut rng), rand_point(&mut rng)))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for ((lat1, lon1), (lat2, lon2)) in cases {
                    let _ = geod.gen_inverse(lat1, lon1, lat2, lon2, GeodesicMask::AREA);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_random_pairs,
    bench_distance_only,
    bench_near_antipodal,
    bench_area_high_order
);
criterion_main!(benches);
