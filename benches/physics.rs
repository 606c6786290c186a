//! Benchmarks for softmesh simulation.

use criterion::{criterion_group, criterion_main, Criterion};
use softmesh::*;

fn bench_chain_simulation(c: &mut Criterion) {
    c.bench_function("chain_50_segments_60_steps", |b| {
        b.iter(|| {
            let config = SolverConfig::new()
                .with_gravity(Vec2::new(0.0, -9.81))
                .with_iterations(8)
                .with_collision_iterations(0);
            let mut world: World<f32> = World::new(config).unwrap();
            let chain = ChainTopology::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0), 50);
            let mut pins = vec![false; chain.node_count()];
            pins[0] = true;
            let body = world.add_body(BodyDesc::new(chain).with_pins(pins)).unwrap();
            for _ in 0..60 {
                world.step(1.0 / 60.0);
            }
            world.positions(body)
        });
    });
}

fn bench_grid_simulation(c: &mut Criterion) {
    c.bench_function("grid_20x20_cloth_60_steps", |b| {
        b.iter(|| {
            let config = SolverConfig::new()
                .with_gravity(Vec2::new(0.0, -9.81))
                .with_iterations(4);
            let mut world: World<f32> = World::new(config).unwrap();
            let grid = GridTopology::new(20, 20, 1.0);
            let body = world
                .add_body(
                    BodyDesc::new(grid)
                        .with_spring_param(SpringParam::new(0.8, 0.0))
                        .with_pins(grid.top_row_mask()),
                )
                .unwrap();
            for _ in 0..60 {
                world.step(1.0 / 60.0);
            }
            world.positions(body)
        });
    });
}

fn bench_collision_pass(c: &mut Criterion) {
    let mut world: World<f32> = World::new(SolverConfig::new().with_collision_radius_scale(1.0)).unwrap();
    for k in 0..10 {
        let origin = Vec2::new((k % 5) as f32 * 9.0, (k / 5) as f32 * 9.0);
        world
            .add_body(BodyDesc::new(GridTopology::new(10, 10, 1.0).with_origin(origin)).with_self_collisions(true))
            .unwrap();
    }
    c.bench_function("collision_pass_1000_particles", |b| {
        b.iter(|| world.resolve_collisions());
    });
}

criterion_group!(benches, bench_chain_simulation, bench_grid_simulation, bench_collision_pass);
criterion_main!(benches);
