//! # Inference Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use comms_if::world::ObstacleRect;
use nalgebra::Point2;
use truck_lib::{
    collision,
    sim::{SimParams, TruckSim},
    truck_ctrl::FuzzyCtrl,
};

fn inference_benchmark(c: &mut Criterion) {
    // ---- Controller evaluation ----

    let ctrl = FuzzyCtrl::new().unwrap();

    // Off centre and angled, so several rules fire
    c.bench_function("FuzzyCtrl::evaluate_primary", |b| {
        b.iter(|| ctrl.evaluate_primary(black_box(37.0), black_box(72.0)))
    });

    c.bench_function("FuzzyCtrl::evaluate_avoidance", |b| {
        b.iter(|| ctrl.evaluate_avoidance(black_box(0.3), black_box(104.0)))
    });

    // ---- Collision test ----

    let footprint = collision::footprint(Point2::new(50.0, 46.0), 75.0, 4.0, 2.0, 4.0);
    let obstacle = collision::rect_polygon(&ObstacleRect::new(180.0, 170.0, 40.0, 8.0));

    c.bench_function("collision::intersects", |b| {
        b.iter(|| collision::intersects(black_box(&footprint), black_box(&obstacle)))
    });

    // ---- Full iteration ----

    let mut sim = TruckSim::new(SimParams {
        start_x: 30.0,
        start_y: 90.0,
        start_phi_deg: 60.0,
        ..Default::default()
    })
    .unwrap();
    sim.set_obstacles(vec![ObstacleRect::new(230.0, 120.0, 40.0, 8.0)])
        .unwrap();

    c.bench_function("TruckSim::iterate", |b| {
        b.iter(|| {
            if sim.tm().outcome.is_finished() {
                sim.reset();
            }
            sim.iterate().unwrap()
        })
    });
}

criterion_group!(benches, inference_benchmark);
criterion_main!(benches);
