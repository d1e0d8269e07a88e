//! Benchmarks for terrain generation and per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};

use lunar_mochi::animator::{animate, drift_particles, Animator};
use lunar_mochi::gpu::instances::collect_instances;
use lunar_mochi::scene::Scene;
use lunar_mochi::terrain::{default_craters, VertexGrid};
use lunar_mochi::SceneConfig;

fn bench_terrain(c: &mut Criterion) {
    let mut group = c.benchmark_group("terrain_displace");
    let craters = default_craters();

    for segments in [40u32, 128, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(segments), &segments, |b, &segments| {
            let mut rng = StdRng::seed_from_u64(1);
            let mut grid = VertexGrid::plane(40.0, 40.0, segments, segments);
            b.iter(|| {
                grid.displace(black_box(&craters), &mut rng);
                black_box(grid.positions().len())
            })
        });
    }

    group.finish();
}

fn bench_animation(c: &mut Criterion) {
    let config = SceneConfig {
        seed: Some(1),
        ..SceneConfig::default()
    };

    c.bench_function("tick_default_scene", |b| {
        let mut scene = Scene::from_config(&config);
        let mut animator = Animator::new(config.tick_step);
        b.iter(|| black_box(animator.tick(&mut scene)))
    });

    c.bench_function("animate_rig", |b| {
        let mut scene = Scene::from_config(&config);
        let rig = scene.rig().clone();
        let mut t = 0.0f32;
        b.iter(|| {
            t += 0.02;
            animate(black_box(t), &rig, scene.graph_mut());
        })
    });

    let mut group = c.benchmark_group("drift_particles");
    for count in [200usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut coords = vec![0.0f32; count * 3];
            b.iter(|| drift_particles(black_box(&mut coords)))
        });
    }
    group.finish();
}

fn bench_instances(c: &mut Criterion) {
    let config = SceneConfig {
        seed: Some(1),
        ..SceneConfig::default()
    };
    let scene = Scene::from_config(&config);

    c.bench_function("collect_instances", |b| b.iter(|| black_box(collect_instances(&scene))));
}

criterion_group!(benches, bench_terrain, bench_animation, bench_instances);
criterion_main!(benches);
