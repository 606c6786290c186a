//! Soft bodies: particle ranges and springs built from a topology template.

use core::ops::Range;

use crate::chain::ChainTopology;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::grid::GridTopology;
use crate::mesh::{Layout, MeshTopology};
use crate::particle::{CollisionGroup, ParticleId, ParticleParam};
use crate::spring::{SpringParam, SpringType};
use alloc::vec::Vec as AllocVec;

/// Stable handle to a body. Never reused within one world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub usize);

/// Shape template a body is built from.
#[derive(Clone, Debug, PartialEq)]
pub enum Topology<F: Float> {
    Grid(GridTopology<F>),
    Chain(ChainTopology<F>),
    Mesh(MeshTopology<F>),
}

impl<F: Float> Topology<F> {
    pub fn node_count(&self) -> usize {
        match self {
            Topology::Grid(g) => g.node_count(),
            Topology::Chain(c) => c.node_count(),
            Topology::Mesh(m) => m.node_count(),
        }
    }

    pub fn layout(&self) -> Result<Layout<F>, PhysicsError> {
        match self {
            Topology::Grid(g) => g.layout(),
            Topology::Chain(c) => c.layout(),
            Topology::Mesh(m) => m.layout(),
        }
    }
}

impl<F: Float> From<GridTopology<F>> for Topology<F> {
    fn from(g: GridTopology<F>) -> Self { Topology::Grid(g) }
}

impl<F: Float> From<ChainTopology<F>> for Topology<F> {
    fn from(c: ChainTopology<F>) -> Self { Topology::Chain(c) }
}

impl<F: Float> From<MeshTopology<F>> for Topology<F> {
    fn from(m: MeshTopology<F>) -> Self { Topology::Mesh(m) }
}

/// One flag per spring category.
///
/// Used both for creation (which categories get built) and display (which
/// categories are drawn).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringToggles {
    pub structural: bool,
    pub shear: bool,
    pub bend: bool,
}

impl SpringToggles {
    pub const ALL: SpringToggles = SpringToggles { structural: true, shear: true, bend: true };
    pub const STRUCTURAL_ONLY: SpringToggles = SpringToggles { structural: true, shear: false, bend: false };

    pub fn allows(&self, kind: SpringType) -> bool {
        match kind {
            SpringType::Struct => self.structural,
            SpringType::Shear => self.shear,
            SpringType::Bend => self.bend,
        }
    }
}

impl Default for SpringToggles {
    fn default() -> Self {
        Self::ALL
    }
}

/// Colors handed to [`ParticleAppearance`](crate::appearance::ParticleAppearance).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParticleStyle {
    pub particle_color: u32,
    pub particle_gray: u32,
    pub use_particles_color: bool,
}

impl Default for ParticleStyle {
    fn default() -> Self {
        ParticleStyle {
            particle_color: 0x5C00_0000,
            particle_gray: 0x5C00_0000,
            use_particles_color: true,
        }
    }
}

/// Everything needed to build a body. Consumed by
/// [`World::add_body`](crate::World::add_body).
#[derive(Clone, Debug)]
pub struct BodyDesc<F: Float> {
    pub topology: Topology<F>,
    pub particle: ParticleParam<F>,
    pub spring: SpringParam<F>,
    pub create: SpringToggles,
    pub self_collisions: bool,
    pub pins: Option<AllocVec<bool>>,
}

impl<F: Float> BodyDesc<F> {
    pub fn new(topology: impl Into<Topology<F>>) -> Self {
        BodyDesc {
            topology: topology.into(),
            particle: ParticleParam::default(),
            spring: SpringParam::default(),
            create: SpringToggles::ALL,
            self_collisions: false,
            pins: None,
        }
    }

    pub fn with_particle_param(mut self, param: ParticleParam<F>) -> Self {
        self.particle = param;
        self
    }

    pub fn with_spring_param(mut self, param: SpringParam<F>) -> Self {
        self.spring = param;
        self
    }

    /// Choose which spring categories are created.
    pub fn with_springs(mut self, create: SpringToggles) -> Self {
        self.create = create;
        self
    }

    /// Give every particle its own collision group.
    pub fn with_self_collisions(mut self, enabled: bool) -> Self {
        self.self_collisions = enabled;
        self
    }

    /// One flag per node; `true` pins it.
    pub fn with_pins(mut self, mask: AllocVec<bool>) -> Self {
        self.pins = Some(mask);
        self
    }

    /// Validate parameters and produce the filtered layout.
    pub fn validate(&self) -> Result<Layout<F>, PhysicsError> {
        let p = &self.particle;
        if !p.mass.is_finite() || p.mass <= F::zero() {
            return Err(PhysicsError::InvalidMass);
        }
        if !p.radius.is_finite() || p.radius <= F::zero() {
            return Err(PhysicsError::InvalidRadius);
        }
        if !(p.damping >= F::zero() && p.damping <= F::one()) {
            return Err(PhysicsError::InvalidDamping);
        }
        let s = &self.spring;
        if !(s.stiffness > F::zero() && s.stiffness <= F::one()) {
            return Err(PhysicsError::InvalidStiffness);
        }
        if !s.damping.is_finite() || s.damping < F::zero() {
            return Err(PhysicsError::InvalidDamping);
        }

        let mut layout = self.topology.layout()?;
        if let Some(mask) = &self.pins {
            if mask.len() != layout.node_count() {
                return Err(PhysicsError::PinMaskLength { expected: layout.node_count(), got: mask.len() });
            }
        }
        let create = self.create;
        layout.edges.retain(|e| create.allows(e.kind));
        Ok(layout)
    }
}

/// A body registered in a world.
///
/// Owns the contiguous particle range `nodes_offset..nodes_offset + num_nodes`
/// and every spring whose `owner` is this body.
#[derive(Clone, Debug)]
pub struct SoftBody {
    pub(crate) id: BodyId,
    pub(crate) range: Range<usize>,
    pub(crate) group: CollisionGroup,
    pub(crate) self_collisions: bool,
    pub(crate) created: SpringToggles,
    pub(crate) grid: Option<(usize, usize)>,
    /// Spring categories drawn by [`World::spring_lines`](crate::World::spring_lines).
    pub display: SpringToggles,
    pub style: ParticleStyle,
}

impl SoftBody {
    pub fn id(&self) -> BodyId { self.id }

    /// Offset of the first particle in the world store.
    pub fn nodes_offset(&self) -> usize { self.range.start }

    pub fn num_nodes(&self) -> usize { self.range.len() }

    pub fn particle_range(&self) -> Range<usize> { self.range.clone() }

    pub fn particle_ids(&self) -> impl Iterator<Item = ParticleId> {
        self.range.clone().map(ParticleId)
    }

    pub fn contains(&self, p: ParticleId) -> bool {
        self.range.contains(&p.0)
    }

    /// Shared group, or the first particle's group with self collisions.
    pub fn collision_group(&self) -> CollisionGroup { self.group }

    pub fn self_collisions(&self) -> bool { self.self_collisions }

    /// Categories that were created at build time.
    pub fn created_springs(&self) -> SpringToggles { self.created }

    /// `(cols, rows)` for grid bodies.
    pub fn grid_dims(&self) -> Option<(usize, usize)> { self.grid }

    /// Particle at (col, row) of a grid body.
    pub fn grid_particle(&self, col: usize, row: usize) -> Option<ParticleId> {
        let (cols, rows) = self.grid?;
        if col >= cols || row >= rows {
            return None;
        }
        Some(ParticleId(self.range.start + row * cols + col))
    }

    pub fn set_particle_color(&mut self, color: u32) {
        self.style.particle_color = color;
    }

    pub fn set_use_particles_color(&mut self, enabled: bool) {
        self.style.use_particles_color = enabled;
    }

    /// Local node index to world particle id.
    pub fn particle(&self, local: usize) -> Option<ParticleId> {
        (local < self.range.len()).then(|| ParticleId(self.range.start + local))
    }
}
