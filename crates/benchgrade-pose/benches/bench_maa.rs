use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use benchgrade_pose::{evaluate_maa, umeyama_similarity, CenterMap, PoseEvalParams, TripletSearch};

fn make_centers(num_points: usize) -> (CenterMap, CenterMap) {
    let mut pred = CenterMap::new();
    let mut gt = CenterMap::new();
    for i in 0..num_points {
        let t = i as f64 * 0.37;
        let p = [t.cos() * 5.0, t.sin() * 5.0, 0.1 * t];
        // every fifth camera is badly misplaced
        let noise = if i % 5 == 0 { 3.0 } else { 0.01 };
        pred.insert(format!("{i:05}"), p);
        gt.insert(
            format!("{i:05}"),
            [2.0 * p[0] + 1.0 + noise, 2.0 * p[1] - 4.0, 2.0 * p[2] + 0.5],
        );
    }
    (pred, gt)
}

fn bench_umeyama(c: &mut Criterion) {
    let src = [[0.3, -1.0, 2.0], [1.5, 0.2, -0.7], [-2.0, 0.9, 0.4]];
    let dst = [[1.0, 2.0, 3.0], [4.0, -1.0, 0.0], [-2.0, 0.5, 2.5]];
    c.bench_function("umeyama_similarity", |b| {
        b.iter(|| umeyama_similarity(black_box(&src), black_box(&dst)))
    });
}

fn bench_evaluate_maa(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_maa");

    for num_points in [10, 20, 40].iter() {
        group.throughput(criterion::Throughput::Elements(*num_points as u64));
        let (pred, gt) = make_centers(*num_points);

        group.bench_with_input(
            BenchmarkId::new("exhaustive", num_points),
            &(&pred, &gt),
            |b, (pred, gt)| {
                let params = PoseEvalParams::default();
                b.iter(|| evaluate_maa(black_box(pred), black_box(gt), &params))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("sampled", num_points),
            &(&pred, &gt),
            |b, (pred, gt)| {
                let params = PoseEvalParams {
                    search: TripletSearch::Sampled {
                        iterations: 200,
                        seed: Some(42),
                    },
                    ..Default::default()
                };
                b.iter(|| evaluate_maa(black_box(pred), black_box(gt), &params))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_umeyama, bench_evaluate_maa);
criterion_main!(benches);
