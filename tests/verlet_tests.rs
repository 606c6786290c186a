use softmesh::{
    BodyDesc, GridTopology, MeshTopology, ParticleParam, SolverConfig, SpringParam, StepObserver,
    StepReport, Vec2, World,
};

#[test]
fn free_particle_falls_under_gravity() {
    let config = SolverConfig::new()
        .with_gravity(Vec2::new(0.0, -9.81))
        .with_damping(1.0);
    let mut world: World<f32> = World::new(config).unwrap();
    let body = world
        .add_body(BodyDesc::new(MeshTopology::points(vec![Vec2::new(0.0, 100.0)])))
        .unwrap();

    for _ in 0..60 {
        world.step(1.0 / 60.0);
    }

    let y = world.positions(body).unwrap()[0].y;
    let expected_y = 100.0 - 0.5 * 9.81;
    assert!((y - expected_y).abs() < 0.2, "y = {}, expected ~ {}", y, expected_y);
    assert!((world.time() - 1.0).abs() < 1e-4);
}

#[test]
fn pinned_particles_never_move() {
    let grid = GridTopology::new(5, 5, 1.0);
    let mut mask = grid.top_row_mask();
    mask[12] = true; // centre node
    let config = SolverConfig::new()
        .with_gravity(Vec2::new(3.0, -500.0))
        .with_iterations(8)
        .with_sub_steps(2);
    let mut world: World<f32> = World::new(config).unwrap();
    let body = world
        .add_body(
            BodyDesc::new(grid)
                .with_spring_param(SpringParam::new(1.0, 0.2))
                .with_pins(mask.clone()),
        )
        .unwrap();

    let before = world.positions(body).unwrap();
    for frame in 0..120 {
        let dt = if frame % 2 == 0 { 1.0 / 60.0 } else { 1.0 / 30.0 };
        world.step(dt);
        let now = world.positions(body).unwrap();
        for (i, pinned) in mask.iter().enumerate() {
            if *pinned {
                assert_eq!(now[i], before[i], "pinned node {} moved on frame {}", i, frame);
            }
        }
    }
}

#[test]
fn heavier_particle_moves_less_under_relaxation() {
    let mut world: World<f32> = World::new(SolverConfig::new().with_iterations(1)).unwrap();
    let heavy = world
        .add_body(
            BodyDesc::new(MeshTopology::points(vec![Vec2::new(0.0, 0.0)]))
                .with_particle_param(ParticleParam { mass: 10.0, ..ParticleParam::default() }),
        )
        .unwrap();
    let light = world
        .add_body(BodyDesc::new(MeshTopology::points(vec![Vec2::new(10.0, 0.0)])))
        .unwrap();
    let a = world.body(heavy).unwrap().particle(0).unwrap();
    let b = world.body(light).unwrap().particle(0).unwrap();
    let spring = world
        .connect(a, b, SpringParam::default(), softmesh::SpringType::Struct)
        .unwrap();

    // stretch to twice the rest length
    world.particle_mut(b).pos = Vec2::new(20.0, 0.0);
    world.particle_mut(b).prev_pos = Vec2::new(20.0, 0.0);
    world.relax_springs();

    let heavy_moved = world.particle(a).pos.distance(Vec2::new(0.0, 0.0));
    let light_moved = world.particle(b).pos.distance(Vec2::new(20.0, 0.0));
    assert!(heavy_moved > 0.0);
    assert!(heavy_moved < light_moved, "heavy {} light {}", heavy_moved, light_moved);
    assert!((world.spring(spring).current_length(world.particles()) - 10.0).abs() < 1e-4);
}

#[derive(Default)]
struct Counter {
    integrations: usize,
    relax_passes: usize,
    collision_passes: usize,
    completed: usize,
    last_time: f32,
}

impl StepObserver<f32> for Counter {
    fn on_integrate(&mut self) {
        self.integrations += 1;
    }
    fn on_relax_iteration(&mut self, _iteration: usize) {
        self.relax_passes += 1;
    }
    fn on_collision_pass(&mut self, _pass: usize, _resolved: usize) {
        self.collision_passes += 1;
    }
    fn on_step_complete(&mut self, report: &StepReport<f32>) {
        self.completed += 1;
        self.last_time = report.time;
    }
}

#[test]
fn observer_sees_every_phase() {
    let config = SolverConfig::new()
        .with_iterations(5)
        .with_collision_iterations(3)
        .with_sub_steps(2);
    let mut world: World<f32> = World::new(config).unwrap();
    world.add_body(BodyDesc::new(GridTopology::new(3, 3, 1.0))).unwrap();

    let mut counter = Counter::default();
    world.step_observed(0.5, &mut counter);
    world.step_observed(0.5, &mut counter);

    assert_eq!(counter.integrations, 4);
    assert_eq!(counter.relax_passes, 20);
    assert_eq!(counter.collision_passes, 12);
    assert_eq!(counter.completed, 2);
    assert!((counter.last_time - 1.0).abs() < 1e-6);
}
