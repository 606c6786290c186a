//! Configuration types for the world solver.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec2;

/// Axis-aligned box that keeps particles inside the world.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
    /// Fraction of the normal velocity kept on contact, in [0, 1].
    pub restitution: F,
}

impl<F: Float> Bounds<F> {
    pub fn new(min: Vec2<F>, max: Vec2<F>, restitution: F) -> Self {
        Bounds { min, max, restitution }
    }
}

/// Configuration for the solver and simulation.
///
/// # Builder Pattern
/// ```
/// use softmesh::config::SolverConfig;
/// use softmesh::vec::Vec2;
///
/// let config: SolverConfig<f32> = SolverConfig::new()
///     .with_iterations(20)
///     .with_gravity(Vec2::new(0.0, -500.0))
///     .with_damping(0.99)
///     .with_collision_radius_scale(1.2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(default, bound(deserialize = "F: Float + serde::Deserialize<'de>"))
)]
pub struct SolverConfig<F: Float> {
    /// Spring relaxation passes per sub-step.
    /// More iterations = stiffer but slower. Default: 16.
    pub iterations: usize,
    /// Collision passes per sub-step. Default: 2.
    pub collision_iterations: usize,
    /// Number of sub-steps per frame. Default: 1.
    pub sub_steps: usize,
    /// Gravity acceleration vector. Default: zero.
    pub gravity: Vec2<F>,
    /// Velocity retention [0, 1]. 1.0 = no damping. Default: 0.99.
    pub damping: F,
    /// Multiplier on particle radii for contact tests. Default: 4/3.
    pub collision_radius_scale: F,
    /// Optional containing box. Default: none.
    pub bounds: Option<Bounds<F>>,
}

impl<F: Float> SolverConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SolverConfig {
            iterations: 16,
            collision_iterations: 2,
            sub_steps: 1,
            gravity: Vec2::zero(),
            damping: F::from_f32(0.99),
            collision_radius_scale: F::from_f32(4.0 / 3.0),
            bounds: None,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_collision_iterations(mut self, iterations: usize) -> Self {
        self.collision_iterations = iterations;
        self
    }

    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_collision_radius_scale(mut self, scale: F) -> Self {
        self.collision_radius_scale = scale;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds<F>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Check value ranges. Called by the world whenever a config is installed.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.damping >= F::zero() && self.damping <= F::one()) {
            return Err(PhysicsError::InvalidDamping);
        }
        let scale = self.collision_radius_scale;
        if !scale.is_finite() || scale <= F::zero() {
            return Err(PhysicsError::InvalidConfig("collision radius scale must be positive"));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        if self.sub_steps == 0 {
            return Err(PhysicsError::InvalidConfig("sub_steps must be at least 1"));
        }
        if let Some(b) = &self.bounds {
            if !(b.min.x < b.max.x && b.min.y < b.max.y) {
                return Err(PhysicsError::InvalidConfig("bounds min must be below max"));
            }
            if !(b.restitution >= F::zero() && b.restitution <= F::one()) {
                return Err(PhysicsError::InvalidConfig("restitution must be in [0, 1]"));
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for SolverConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
