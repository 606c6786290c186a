//! Typed distance springs relaxed by position correction.

use crate::float::Float;
use crate::particle::{Particle, ParticleId};
use crate::softbody::BodyId;

/// Index of a spring in the world's spring store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpringId(pub usize);

impl SpringId {
    pub fn index(self) -> usize { self.0 }
}

/// Role of a spring in the body's topology.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpringType {
    /// Nearest neighbours, resists stretching.
    Struct,
    /// Diagonal neighbours, resists shearing.
    Shear,
    /// Next-nearest neighbours, resists bending.
    Bend,
}

/// Per-body spring parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringParam<F: Float> {
    /// Fraction of the length error corrected per relaxation, in (0, 1]. Default: 1.
    pub stiffness: F,
    /// Weight of the relative-velocity term in [`Spring::compute_force`]. Default: 0.
    pub damping: F,
}

impl<F: Float> Default for SpringParam<F> {
    fn default() -> Self {
        SpringParam { stiffness: F::one(), damping: F::zero() }
    }
}

impl<F: Float> SpringParam<F> {
    pub fn new(stiffness: F, damping: F) -> Self {
        SpringParam { stiffness, damping }
    }
}

/// A distance constraint between `pa` and `pb`.
///
/// The spring sits on the incidence lists of both endpoints. `pa` is the
/// primary owner: traversals that start from particles only visit a spring
/// from its `pa` side.
#[derive(Clone, Debug)]
pub struct Spring<F: Float> {
    pub pa: ParticleId,
    pub pb: ParticleId,
    pub rest_length: F,
    pub stiffness: F,
    pub damping: F,
    pub kind: SpringType,
    pub owner: Option<BodyId>,
    enabled: bool,
    force: F,
}

const DEGENERATE: f32 = 1e-10;

impl<F: Float> Spring<F> {
    pub fn new(pa: ParticleId, pb: ParticleId, rest_length: F, param: SpringParam<F>, kind: SpringType) -> Self {
        Spring {
            pa,
            pb,
            rest_length,
            stiffness: param.stiffness,
            damping: param.damping,
            kind,
            owner: None,
            enabled: true,
            force: F::zero(),
        }
    }

    /// Build with the current endpoint distance as rest length.
    pub fn from_particles(
        pa: ParticleId,
        pb: ParticleId,
        particles: &[Particle<F>],
        param: SpringParam<F>,
        kind: SpringType,
    ) -> Self {
        let rest = particles[pa.0].pos.distance(particles[pb.0].pos);
        Self::new(pa, pb, rest, param, kind)
    }

    /// Signed force at the current configuration (+ tension, - compression).
    ///
    /// `stiffness * (len - rest)` plus `damping` times the relative velocity
    /// along the spring axis. Zero when disabled or when the endpoints
    /// coincide.
    pub fn compute_force(&self, particles: &[Particle<F>]) -> F {
        if !self.enabled {
            return F::zero();
        }
        let a = &particles[self.pa.0];
        let b = &particles[self.pb.0];
        let delta = b.pos - a.pos;
        let len = delta.length();
        if len.is_near_zero(F::from_f32(DEGENERATE)) {
            return F::zero();
        }
        let dir = delta.scale(F::one() / len);
        let rel_vel = (b.velocity_raw() - a.velocity_raw()).dot(dir);
        self.stiffness * (len - self.rest_length) + self.damping * rel_vel
    }

    /// One Gauss–Seidel correction toward the rest length.
    ///
    /// Returns `false` if skipped (disabled, both ends pinned, or coincident
    /// endpoints). The recorded force is the correction's signed magnitude.
    pub fn relax(&mut self, particles: &mut [Particle<F>]) -> bool {
        if !self.enabled {
            return false;
        }
        let (ia, ib) = (self.pa.0, self.pb.0);
        let a_inv = particles[ia].inv_mass;
        let b_inv = particles[ib].inv_mass;
        if (a_inv + b_inv).is_near_zero(F::from_f32(DEGENERATE)) {
            return false;
        }

        let delta = particles[ib].pos - particles[ia].pos;
        let len = delta.length();
        if len.is_near_zero(F::from_f32(DEGENERATE)) {
            return false;
        }

        let error = len - self.rest_length;
        let magnitude = error * self.stiffness;
        let correction = delta.scale(magnitude / len);
        particles[ia].apply_correction(correction, b_inv);
        particles[ib].apply_correction(-correction, a_inv);
        self.force = magnitude;
        true
    }

    pub fn is_enabled(&self) -> bool { self.enabled }

    pub fn enable(&mut self) { self.enabled = true; }

    pub fn disable(&mut self) { self.enabled = false; }

    pub fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }

    /// Force recorded by the last [`relax`](Self::relax) that ran.
    pub fn force(&self) -> F { self.force }

    /// The endpoint that is not `p`, or `None` if `p` is not an endpoint.
    pub fn other(&self, p: ParticleId) -> Option<ParticleId> {
        if p == self.pa {
            Some(self.pb)
        } else if p == self.pb {
            Some(self.pa)
        } else {
            None
        }
    }

    pub fn current_length(&self, particles: &[Particle<F>]) -> F {
        particles[self.pa.0].pos.distance(particles[self.pb.0].pos)
    }
}
