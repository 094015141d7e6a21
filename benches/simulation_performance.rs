use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lane_keeping_sim::{
    config::LaneKeepingConfig,
    env::{Environment, LaneKeepingEnv},
    simulation::Point,
};

fn benchmark_episode_step(c: &mut Criterion) {
    let mut env = LaneKeepingEnv::new(LaneKeepingConfig::default());
    env.reset().unwrap();

    c.bench_function("lane_keeping_step", |b| {
        b.iter(|| {
            env.step(black_box(0.1)).unwrap();
        })
    });
}

fn benchmark_sine_projection(c: &mut Criterion) {
    let config = LaneKeepingConfig::default();
    let lane = config.road.lane.build();
    let points: Vec<Point> = (0..100)
        .map(|i| lane.position(i as f64 * 5.0, (i % 9) as f64 - 4.0))
        .collect();

    c.bench_function("sine_lane_local_coordinates", |b| {
        b.iter(|| {
            for point in &points {
                black_box(lane.local_coordinates(black_box(point)));
            }
        })
    });
}

fn benchmark_substep_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("substep_scaling");

    for simulation_frequency in [10, 50, 100, 500].iter() {
        let mut config = LaneKeepingConfig::default();
        config.task.simulation_frequency = *simulation_frequency;

        let mut env = LaneKeepingEnv::new(config);
        env.reset().unwrap();

        group.bench_with_input(
            format!("simulation_{}hz", simulation_frequency),
            simulation_frequency,
            |b, _simulation_frequency| {
                b.iter(|| {
                    env.step(black_box(-0.05)).unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_episode_step,
    benchmark_sine_projection,
    benchmark_substep_scaling
);
criterion_main!(benches);
