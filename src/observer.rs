//! Step observer trait for monitoring simulation progress.

use crate::float::Float;

/// Summary of one completed [`World::step`](crate::World::step).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepReport<F: Float> {
    /// Simulation time after the step.
    pub time: F,
    /// Collision corrections applied across all passes.
    pub collisions: usize,
    /// Largest recorded spring force (tension), zero if none.
    pub max_tension: F,
    /// Most negative recorded spring force (compression), zero if none.
    pub max_compression: F,
    /// Springs that took part in relaxation.
    pub active_springs: usize,
}

/// Trait for observing simulation steps.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver<F: Float> {
    /// Called after all particles have been integrated.
    fn on_integrate(&mut self) {}

    /// Called after each spring relaxation pass.
    fn on_relax_iteration(&mut self, _iteration: usize) {}

    /// Called after each collision pass with the number of corrections made.
    fn on_collision_pass(&mut self, _pass: usize, _resolved: usize) {}

    /// Called when a step is fully complete.
    fn on_step_complete(&mut self, _report: &StepReport<F>) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl<F: Float> StepObserver<F> for NoOpStepObserver {}
