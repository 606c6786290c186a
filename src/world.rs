//! The physics world: global particle and spring stores plus the solver loop.

use crate::appearance::{tension_color, type_style, ParticleAppearance, SpringColorMode, SpringLine};
use crate::collision::{excluded, resolve_pair, BroadPhase};
use crate::config::SolverConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver, StepReport};
use crate::particle::{CollisionGroup, Particle, ParticleId};
use crate::softbody::{BodyDesc, BodyId, SoftBody, Topology};
use crate::spring::{Spring, SpringId, SpringParam, SpringType};
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Owns every particle and spring of every body.
///
/// Springs are processed in store order, which only changes through
/// [`add_body`](Self::add_body), [`connect`](Self::connect) and
/// [`remove_body`](Self::remove_body). Identical construction and `dt`
/// sequences therefore give identical trajectories.
pub struct World<F: Float> {
    particles: AllocVec<Particle<F>>,
    springs: AllocVec<Spring<F>>,
    bodies: AllocVec<Option<SoftBody>>,
    config: SolverConfig<F>,
    time: F,
    next_group: u32,
    broad: BroadPhase,
}

impl<F: Float> World<F> {
    pub fn new(config: SolverConfig<F>) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(World {
            particles: AllocVec::new(),
            springs: AllocVec::new(),
            bodies: AllocVec::new(),
            config,
            time: F::zero(),
            next_group: 0,
            broad: BroadPhase::new(),
        })
    }

    pub fn config(&self) -> &SolverConfig<F> { &self.config }

    pub fn set_config(&mut self, config: SolverConfig<F>) -> Result<(), PhysicsError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Simulation time accumulated by [`step`](Self::step).
    pub fn time(&self) -> F { self.time }

    // ------------------------------------------------------------------
    // Bodies
    // ------------------------------------------------------------------

    /// Build a body and register its particles and springs.
    ///
    /// Validation happens before any allocation, so on error the world is
    /// unchanged.
    pub fn add_body(&mut self, desc: BodyDesc<F>) -> Result<BodyId, PhysicsError> {
        let layout = desc.validate().map_err(|e| {
            tracing::warn!(error = ?e, "rejected soft body");
            e
        })?;

        let id = BodyId(self.bodies.len());
        let offset = self.particles.len();
        let count = layout.node_count();
        let group = CollisionGroup(self.next_group);

        self.particles.reserve(count);
        for (local, &pos) in layout.positions.iter().enumerate() {
            let pinned = desc.pins.as_ref().is_some_and(|m| m[local]);
            let mut p = if pinned {
                Particle::pinned(pos, desc.particle.radius)
            } else {
                Particle::new(pos, desc.particle.radius, desc.particle.mass)
            };
            p.damping = desc.particle.damping;
            p.group = if desc.self_collisions {
                CollisionGroup(self.next_group + local as u32)
            } else {
                group
            };
            self.particles.push(p);
        }
        self.next_group += if desc.self_collisions { count as u32 } else { 1 };

        let first_spring = self.springs.len();
        for e in &layout.edges {
            let (a, b) = (ParticleId(offset + e.a), ParticleId(offset + e.b));
            let mut spring = Spring::from_particles(a, b, &self.particles, desc.spring, e.kind);
            spring.owner = Some(id);
            self.push_spring(spring);
        }

        let grid = match &desc.topology {
            Topology::Grid(g) => Some((g.cols, g.rows)),
            _ => None,
        };
        self.bodies.push(Some(SoftBody {
            id,
            range: offset..offset + count,
            group,
            self_collisions: desc.self_collisions,
            created: desc.create,
            grid,
            display: desc.create,
            style: Default::default(),
        }));

        tracing::debug!(
            body = id.0,
            nodes_offset = offset,
            num_nodes = count,
            springs = self.springs.len() - first_spring,
            "added soft body"
        );
        Ok(id)
    }

    /// Remove a body, its particles and the springs it owns.
    ///
    /// Fails with [`PhysicsError::DanglingSprings`] while any *enabled*
    /// spring owned elsewhere touches the body. Disabled foreign springs are
    /// dropped with it. Particle and spring ids after the removed range are
    /// shifted down; body ids are unaffected.
    pub fn remove_body(&mut self, id: BodyId) -> Result<SoftBody, PhysicsError> {
        let range = self.body(id).ok_or(PhysicsError::UnknownBody(id))?.particle_range();
        let touches = |s: &Spring<F>| range.contains(&s.pa.0) || range.contains(&s.pb.0);

        let dangling = self
            .springs
            .iter()
            .filter(|s| s.owner != Some(id) && s.is_enabled() && touches(*s))
            .count();
        if dangling > 0 {
            tracing::warn!(body = id.0, dangling, "refusing to remove body with live springs");
            return Err(PhysicsError::DanglingSprings { body: id, count: dangling });
        }

        let before = self.springs.len();
        self.springs.retain(|s| s.owner != Some(id) && !touches(s));
        let removed_springs = before - self.springs.len();

        let len = range.len();
        let shift = |p: ParticleId| if p.0 >= range.end { ParticleId(p.0 - len) } else { p };
        self.particles.drain(range.clone());
        for s in self.springs.iter_mut() {
            s.pa = shift(s.pa);
            s.pb = shift(s.pb);
        }
        self.rebuild_incidence();

        for body in self.bodies.iter_mut().flatten() {
            if body.range.start >= range.end {
                body.range = body.range.start - len..body.range.end - len;
            }
        }
        let body = self.bodies[id.0].take().ok_or(PhysicsError::UnknownBody(id))?;

        tracing::debug!(body = id.0, particles = len, springs = removed_springs, "removed soft body");
        Ok(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&SoftBody> {
        self.bodies.get(id.0).and_then(Option::as_ref)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut SoftBody> {
        self.bodies.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Live bodies in creation order.
    pub fn bodies(&self) -> impl Iterator<Item = &SoftBody> {
        self.bodies.iter().flatten()
    }

    pub fn body_count(&self) -> usize {
        self.bodies().count()
    }

    pub fn body_particles(&self, id: BodyId) -> Option<&[Particle<F>]> {
        self.body(id).map(|b| &self.particles[b.particle_range()])
    }

    /// Current positions of a body's particles, for geometry read-back.
    pub fn positions(&self, id: BodyId) -> Option<AllocVec<Vec2<F>>> {
        self.body_particles(id).map(|ps| ps.iter().map(|p| p.pos).collect())
    }

    /// Springs of a body, each visited once from its primary (`pa`) side.
    pub fn body_springs(&self, id: BodyId) -> AllocVec<SpringId> {
        let mut out = AllocVec::new();
        if let Some(body) = self.body(id) {
            for pid in body.particle_ids() {
                for &sid in self.particles[pid.0].springs() {
                    if self.springs[sid.0].pa == pid {
                        out.push(sid);
                    }
                }
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Particles and springs
    // ------------------------------------------------------------------

    pub fn particles(&self) -> &[Particle<F>] { &self.particles }

    pub fn springs(&self) -> &[Spring<F>] { &self.springs }

    pub fn particle_count(&self) -> usize { self.particles.len() }

    pub fn spring_count(&self) -> usize { self.springs.len() }

    /// Panics if `id` is out of range; see [`get_particle`](Self::get_particle).
    pub fn particle(&self, id: ParticleId) -> &Particle<F> { &self.particles[id.0] }

    pub fn particle_mut(&mut self, id: ParticleId) -> &mut Particle<F> { &mut self.particles[id.0] }

    pub fn get_particle(&self, id: ParticleId) -> Option<&Particle<F>> { self.particles.get(id.0) }

    /// Panics if `id` is out of range; see [`get_spring`](Self::get_spring).
    pub fn spring(&self, id: SpringId) -> &Spring<F> { &self.springs[id.0] }

    pub fn get_spring(&self, id: SpringId) -> Option<&Spring<F>> { self.springs.get(id.0) }

    /// Enable or disable a spring. Idempotent; the recorded force is kept.
    pub fn set_spring_enabled(&mut self, id: SpringId, enabled: bool) -> bool {
        match self.springs.get_mut(id.0) {
            Some(s) => {
                s.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    pub fn disable_spring(&mut self, id: SpringId) -> bool {
        self.set_spring_enabled(id, false)
    }

    pub fn enable_spring(&mut self, id: SpringId) -> bool {
        self.set_spring_enabled(id, true)
    }

    /// Add a spring between any two particles, typically across bodies.
    ///
    /// The rest length is the current distance. The spring has no owner and
    /// must be disabled before either endpoint's body can be removed.
    pub fn connect(
        &mut self,
        a: ParticleId,
        b: ParticleId,
        param: SpringParam<F>,
        kind: SpringType,
    ) -> Result<SpringId, PhysicsError> {
        let count = self.particles.len();
        for p in [a, b] {
            if p.0 >= count {
                return Err(PhysicsError::ParticleOutOfBounds { index: p.0, count });
            }
        }
        if a == b {
            return Err(PhysicsError::InvalidEdge { a: a.0, b: b.0, count });
        }
        if !(param.stiffness > F::zero() && param.stiffness <= F::one()) {
            return Err(PhysicsError::InvalidStiffness);
        }
        if !param.damping.is_finite() || param.damping < F::zero() {
            return Err(PhysicsError::InvalidDamping);
        }
        let spring = Spring::from_particles(a, b, &self.particles, param, kind);
        if !spring.rest_length.is_finite() || spring.rest_length.is_near_zero(F::from_f32(1e-10)) {
            return Err(PhysicsError::DegenerateEdge { a: a.0, b: b.0 });
        }
        Ok(self.push_spring(spring))
    }

    fn push_spring(&mut self, spring: Spring<F>) -> SpringId {
        let id = SpringId(self.springs.len());
        self.particles[spring.pa.0].attach(id);
        self.particles[spring.pb.0].attach(id);
        self.springs.push(spring);
        id
    }

    fn rebuild_incidence(&mut self) {
        for p in self.particles.iter_mut() {
            p.clear_springs();
        }
        for (k, s) in self.springs.iter().enumerate() {
            self.particles[s.pa.0].attach(SpringId(k));
            self.particles[s.pb.0].attach(SpringId(k));
        }
    }

    // ------------------------------------------------------------------
    // Stepping
    // ------------------------------------------------------------------

    /// Advance the simulation by `dt`.
    pub fn step(&mut self, dt: F) -> StepReport<F> {
        self.step_observed(dt, &mut NoOpStepObserver)
    }

    /// Advance by `dt`, reporting progress to `observer`.
    ///
    /// Per sub-step: integrate, relax springs `iterations` times, resolve
    /// collisions `collision_iterations` times, then clamp to bounds.
    pub fn step_observed<O: StepObserver<F>>(&mut self, dt: F, observer: &mut O) -> StepReport<F> {
        let sub_steps = self.config.sub_steps.max(1);
        let sub_dt = dt / F::from_usize(sub_steps);
        let gravity = self.config.gravity;
        let damping = self.config.damping;
        let mut collisions = 0;

        for _sub in 0..sub_steps {
            for p in self.particles.iter_mut() {
                p.integrate(sub_dt, gravity, damping);
            }
            observer.on_integrate();

            for i in 0..self.config.iterations {
                self.relax_springs();
                observer.on_relax_iteration(i);
            }

            for pass in 0..self.config.collision_iterations {
                let resolved = self.resolve_collisions();
                collisions += resolved;
                observer.on_collision_pass(pass, resolved);
            }

            self.apply_bounds();
        }
        self.time = self.time + dt;

        let report = self.report(collisions);
        tracing::trace!(
            time = report.time.to_f64(),
            collisions,
            max_tension = report.max_tension.to_f64(),
            "step complete"
        );
        observer.on_step_complete(&report);
        report
    }

    /// One relaxation pass over every enabled spring in store order.
    pub fn relax_springs(&mut self) {
        let particles = &mut self.particles;
        for s in self.springs.iter_mut() {
            s.relax(particles);
        }
    }

    /// One collision pass. Returns the number of corrected pairs.
    pub fn resolve_collisions(&mut self) -> usize {
        let scale = self.config.collision_radius_scale;
        let World { particles, springs, broad, .. } = self;
        let pairs = broad.candidate_pairs(particles, scale);
        let mut resolved = 0;
        for &(i, j) in pairs {
            if excluded(particles, springs, i, j) {
                continue;
            }
            if resolve_pair(particles, i, j, scale) {
                resolved += 1;
            }
        }
        resolved
    }

    fn apply_bounds(&mut self) {
        let Some(b) = self.config.bounds else { return };
        for p in self.particles.iter_mut() {
            if p.is_pinned() || !p.enabled {
                continue;
            }
            let (lo_x, hi_x) = (b.min.x + p.radius, b.max.x - p.radius);
            let (lo_y, hi_y) = (b.min.y + p.radius, b.max.y - p.radius);
            if p.pos.x < lo_x || p.pos.x > hi_x {
                p.pos.x = p.pos.x.clamp(lo_x, hi_x.max(lo_x));
                let vel_x = p.velocity_raw().x;
                p.prev_pos.x = p.pos.x + vel_x * b.restitution;
            }
            if p.pos.y < lo_y || p.pos.y > hi_y {
                p.pos.y = p.pos.y.clamp(lo_y, hi_y.max(lo_y));
                let vel_y = p.velocity_raw().y;
                p.prev_pos.y = p.pos.y + vel_y * b.restitution;
            }
        }
    }

    fn report(&self, collisions: usize) -> StepReport<F> {
        let mut max_tension = F::zero();
        let mut max_compression = F::zero();
        let mut active = 0;
        for s in self.springs.iter().filter(|s| s.is_enabled()) {
            active += 1;
            max_tension = max_tension.max(s.force());
            max_compression = max_compression.min(s.force());
        }
        StepReport { time: self.time, collisions, max_tension, max_compression, active_springs: active }
    }

    // ------------------------------------------------------------------
    // Forces and breakage
    // ------------------------------------------------------------------

    /// `(id, type, last relaxation force)` for every enabled spring.
    pub fn spring_forces(&self) -> impl Iterator<Item = (SpringId, SpringType, F)> + '_ {
        self.springs
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_enabled())
            .map(|(k, s)| (SpringId(k), s.kind, s.force()))
    }

    /// Disable every enabled spring whose |recorded force| exceeds `threshold`.
    ///
    /// Returns how many springs were disabled.
    pub fn break_springs(&mut self, threshold: F) -> usize {
        let mut broken = 0;
        for (k, s) in self.springs.iter_mut().enumerate() {
            if s.is_enabled() && s.force().abs() > threshold {
                s.disable();
                broken += 1;
                tracing::debug!(spring = k, force = s.force().to_f64(), "spring broke");
            }
        }
        broken
    }

    // ------------------------------------------------------------------
    // Presentation
    // ------------------------------------------------------------------

    /// Write `appearance` colors into every particle of `id`.
    pub fn update_colors<A: ParticleAppearance<F>>(&mut self, id: BodyId, appearance: &A) -> bool {
        let Some(body) = self.bodies.get(id.0).and_then(Option::as_ref) else {
            return false;
        };
        for pid in body.particle_ids() {
            let color = appearance.color(body, pid, &self.particles[pid.0]);
            self.particles[pid.0].color = color;
        }
        true
    }

    /// Drawable segments for the enabled springs of `id`.
    ///
    /// `only` restricts output to one category. In [`SpringColorMode::ByType`]
    /// categories hidden by the body's display toggles are skipped.
    pub fn spring_lines(&self, id: BodyId, mode: SpringColorMode, only: Option<SpringType>) -> AllocVec<SpringLine<F>> {
        let Some(body) = self.body(id) else {
            return AllocVec::new();
        };
        let mut lines = AllocVec::new();
        for sid in self.body_springs(id) {
            let s = &self.springs[sid.0];
            if !s.is_enabled() || only.is_some_and(|k| k != s.kind) {
                continue;
            }
            let (color, weight) = match mode {
                SpringColorMode::ByType => {
                    if !body.display.allows(s.kind) {
                        continue;
                    }
                    type_style(s.kind)
                }
                SpringColorMode::ByTension => (tension_color(s.compute_force(&self.particles), s.force()), F::one()),
            };
            lines.push(SpringLine {
                spring: sid,
                kind: s.kind,
                a: self.particles[s.pa.0].pos,
                b: self.particles[s.pb.0].pos,
                color,
                weight,
            });
        }
        lines
    }
}

impl<F: Float> Default for World<F> {
    fn default() -> Self {
        World {
            particles: AllocVec::new(),
            springs: AllocVec::new(),
            bodies: AllocVec::new(),
            config: SolverConfig::default(),
            time: F::zero(),
            next_group: 0,
            broad: BroadPhase::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridTopology;
    use crate::softbody::SpringToggles;

    fn cloth(world: &mut World<f32>) -> BodyId {
        let grid = GridTopology::new(3, 3, 1.0);
        world.add_body(BodyDesc::new(grid)).unwrap()
    }

    #[test]
    fn bodies_get_consecutive_offsets() {
        let mut world = World::default();
        let a = cloth(&mut world);
        let b = cloth(&mut world);
        assert_eq!(world.body(a).unwrap().nodes_offset(), 0);
        assert_eq!(world.body(b).unwrap().nodes_offset(), 9);
        assert_ne!(world.body(a).unwrap().collision_group(), world.body(b).unwrap().collision_group());
    }

    #[test]
    fn incidence_lists_cover_both_ends() {
        let mut world = World::default();
        cloth(&mut world);
        let total: usize = world.particles().iter().map(|p| p.springs().len()).sum();
        assert_eq!(total, 2 * world.spring_count());
    }

    #[test]
    fn body_springs_visits_each_once() {
        let mut world = World::default();
        let id = cloth(&mut world);
        let mut seen = world.body_springs(id);
        assert_eq!(seen.len(), world.spring_count());
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), world.spring_count());
    }

    #[test]
    fn removal_compacts_later_bodies() {
        let mut world = World::default();
        let a = cloth(&mut world);
        let b = cloth(&mut world);
        let before = world.positions(b).unwrap();
        world.remove_body(a).unwrap();
        assert!(world.body(a).is_none());
        assert_eq!(world.body(b).unwrap().nodes_offset(), 0);
        assert_eq!(world.positions(b).unwrap(), before);
        for s in world.springs() {
            assert!(s.pa.0 < world.particle_count() && s.pb.0 < world.particle_count());
        }
        let total: usize = world.particles().iter().map(|p| p.springs().len()).sum();
        assert_eq!(total, 2 * world.spring_count());
    }

    #[test]
    fn self_collision_assigns_distinct_groups() {
        let mut world: World<f32> = World::default();
        let desc = BodyDesc::new(GridTopology::new(2, 2, 1.0)).with_self_collisions(true);
        let id = world.add_body(desc).unwrap();
        let mut groups: AllocVec<_> = world.body_particles(id).unwrap().iter().map(|p| p.group).collect();
        groups.dedup();
        assert_eq!(groups.len(), 4);
        let next = world.add_body(BodyDesc::new(GridTopology::new(2, 2, 1.0))).unwrap();
        assert!(!groups.contains(&world.body(next).unwrap().collision_group()));
    }

    #[test]
    fn hidden_categories_are_not_drawn() {
        let mut world = World::default();
        let id = cloth(&mut world);
        world.body_mut(id).unwrap().display = SpringToggles::STRUCTURAL_ONLY;
        let lines = world.spring_lines(id, SpringColorMode::ByType, None);
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| l.kind == SpringType::Struct));
        let bends = world.spring_lines(id, SpringColorMode::ByTension, Some(SpringType::Bend));
        assert_eq!(bends.len(), 6);
    }
}
