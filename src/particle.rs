//! Verlet particles: point masses with implicit velocity.

use crate::float::Float;
use crate::spring::SpringId;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Index of a particle in the world's particle store.
///
/// Stable until a body stored before it is removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub usize);

impl ParticleId {
    pub fn index(self) -> usize { self.0 }
}

/// Particles sharing a group never collide with each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionGroup(pub u32);

/// Per-body particle parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleParam<F: Float> {
    /// Mass of every free particle. Default: 1.
    pub mass: F,
    /// Collision radius before the world's radius scale. Default: 1.
    pub radius: F,
    /// Velocity retention multiplied with the world damping, in [0, 1]. Default: 1.
    pub damping: F,
}

impl<F: Float> Default for ParticleParam<F> {
    fn default() -> Self {
        ParticleParam {
            mass: F::one(),
            radius: F::one(),
            damping: F::one(),
        }
    }
}

/// A Verlet particle.
///
/// `inv_mass == 0` means pinned: integration, relaxation and collision
/// never move it. Only [`Particle::move_to`] does.
#[derive(Clone, Debug)]
pub struct Particle<F: Float> {
    pub pos: Vec2<F>,
    pub prev_pos: Vec2<F>,
    pub radius: F,
    pub inv_mass: F,
    pub damping: F,
    pub force: Vec2<F>,
    pub group: CollisionGroup,
    pub enabled: bool,
    /// Display color as ARGB. Pass-through, the solver never reads it.
    pub color: u32,
    springs: AllocVec<SpringId>,
}

/// Zero (pinned) for masses that are not positive and finite.
fn inverse<F: Float>(mass: F) -> F {
    if !mass.is_finite() || mass <= F::from_f32(1e-10) {
        F::zero()
    } else {
        F::one() / mass
    }
}

impl<F: Float> Particle<F> {
    pub fn new(pos: Vec2<F>, radius: F, mass: F) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            radius,
            inv_mass: inverse(mass),
            damping: F::one(),
            force: Vec2::zero(),
            group: CollisionGroup(0),
            enabled: true,
            color: 0,
            springs: AllocVec::new(),
        }
    }

    pub fn pinned(pos: Vec2<F>, radius: F) -> Self {
        Self::new(pos, radius, F::zero())
    }

    pub fn is_pinned(&self) -> bool {
        self.inv_mass == F::zero()
    }

    /// Accumulate a force, consumed by the next [`integrate`](Self::integrate).
    pub fn apply_force(&mut self, force: Vec2<F>) {
        if !self.is_pinned() {
            self.force += force;
        }
    }

    /// Verlet step: `pos += (pos - prev) * damping + a * dt²`.
    pub fn integrate(&mut self, dt: F, gravity: Vec2<F>, damping: F) {
        if self.is_pinned() || !self.enabled {
            self.force = Vec2::zero();
            return;
        }
        let velocity = (self.pos - self.prev_pos).scale(damping * self.damping);
        let accel = gravity + self.force.scale(self.inv_mass);
        let new_pos = self.pos + velocity + accel.scale(dt * dt);
        self.prev_pos = self.pos;
        self.pos = new_pos;
        self.force = Vec2::zero();
    }

    /// Shift by this particle's share of a constraint correction.
    ///
    /// The share is `inv_mass / (inv_mass + partner_inv_mass)`.
    pub fn apply_correction(&mut self, delta: Vec2<F>, partner_inv_mass: F) {
        if self.is_pinned() {
            return;
        }
        let w_total = self.inv_mass + partner_inv_mass;
        if w_total.is_near_zero(F::from_f32(1e-10)) {
            return;
        }
        self.pos += delta.scale(self.inv_mass / w_total);
    }

    /// Displacement over the last step.
    pub fn velocity_raw(&self) -> Vec2<F> {
        self.pos - self.prev_pos
    }

    pub fn pin(&mut self) {
        self.inv_mass = F::zero();
        self.prev_pos = self.pos;
        self.force = Vec2::zero();
    }

    /// Give the particle `mass` again. A non-positive or non-finite mass
    /// leaves it pinned.
    pub fn unpin(&mut self, mass: F) {
        self.inv_mass = inverse(mass);
        self.prev_pos = self.pos;
    }

    /// Drag a pinned particle. Free particles ignore this.
    pub fn move_to(&mut self, pos: Vec2<F>) {
        if self.is_pinned() {
            self.prev_pos = self.pos;
            self.pos = pos;
        }
    }

    /// Spring ids registered on this particle, in creation order.
    pub fn springs(&self) -> &[SpringId] {
        &self.springs
    }

    pub(crate) fn attach(&mut self, spring: SpringId) {
        self.springs.push(spring);
    }

    pub(crate) fn clear_springs(&mut self) {
        self.springs.clear();
    }
}
