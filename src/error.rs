//! Error types for physics operations.

use thiserror::Error;

use crate::softbody::BodyId;

/// Errors that can occur while building or editing a world.
///
/// Degenerate geometry during a step is *not* an error: coincident spring
/// endpoints or colliding particle centres simply skip their correction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Grid dimensions must be positive.
    #[error("invalid dimensions {cols}x{rows}")]
    InvalidGridDimensions { cols: usize, rows: usize },
    /// A chain or mesh with no nodes or segments.
    #[error("topology has no nodes")]
    EmptyTopology,
    /// A mesh node position is NaN or infinite.
    #[error("node {index} has a non-finite position")]
    InvalidPosition { index: usize },
    /// Node spacing must be positive and finite.
    #[error("spacing must be positive and finite")]
    InvalidSpacing,
    /// Stiffness must be in (0, 1].
    #[error("stiffness must be in (0, 1]")]
    InvalidStiffness,
    /// Damping must be non-negative (springs) or in [0, 1] (velocity).
    #[error("damping out of range")]
    InvalidDamping,
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// Radius must be positive and finite.
    #[error("radius must be positive and finite")]
    InvalidRadius,
    /// Pin mask does not cover every node of the topology.
    #[error("pin mask has {got} entries, topology has {expected} nodes")]
    PinMaskLength { expected: usize, got: usize },
    /// A mesh edge references a node that does not exist, or itself.
    #[error("edge ({a}, {b}) is invalid for a mesh of {count} nodes")]
    InvalidEdge { a: usize, b: usize, count: usize },
    /// A mesh edge joins two coincident nodes (rest length would be zero).
    #[error("edge ({a}, {b}) has zero rest length")]
    DegenerateEdge { a: usize, b: usize },
    /// The body handle does not name a live body.
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),
    /// Enabled springs owned elsewhere still reference the body's particles.
    #[error("{count} enabled springs still reference body {body:?}")]
    DanglingSprings { body: BodyId, count: usize },
    /// Particle index is out of bounds.
    #[error("particle index {index} out of bounds (count: {count})")]
    ParticleOutOfBounds { index: usize, count: usize },
    /// Solver configuration value out of range.
    #[error("invalid solver config: {0}")]
    InvalidConfig(&'static str),
}
