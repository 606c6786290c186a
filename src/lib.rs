//! 2D soft bodies built from particles and typed springs.
//!
//! `softmesh` simulates deformable sheets, ropes and meshes: point masses
//! integrated with position Verlet, joined by structural, shear and bend
//! springs that are relaxed Gauss–Seidel style for a fixed number of passes.
//!
//! # Features
//!
//! - **Verlet integration**: position-based dynamics with implicit velocity
//! - **Spring relaxation**: stiffness-scaled corrections split by inverse mass
//! - **Topologies**: grids (cloth), chains (rope) and free-form meshes
//! - **Collision groups**: siblings in one body never push each other apart
//! - **Breakable springs**: disable in place, no reallocation
//! - **Observable**: monitor steps via the `StepObserver` trait
//! - **`no_std` compatible**: only needs `alloc`
//!
//! # Example
//! ```
//! use softmesh::{BodyDesc, GridTopology, SolverConfig, SpringParam, Vec2, World};
//!
//! let config = SolverConfig::new().with_gravity(Vec2::new(0.0f32, -500.0));
//! let mut world = World::new(config).unwrap();
//!
//! let grid = GridTopology::new(4, 4, 10.0);
//! let body = world
//!     .add_body(
//!         BodyDesc::new(grid)
//!             .with_spring_param(SpringParam::new(0.8, 0.0))
//!             .with_pins(grid.top_row_mask()),
//!     )
//!     .unwrap();
//!
//! for _ in 0..10 {
//!     world.step(1.0 / 60.0);
//! }
//! let positions = world.positions(body).unwrap();
//! assert_eq!(positions.len(), 16);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod spring;
pub mod mesh;
pub mod grid;
pub mod chain;
pub mod softbody;
pub mod collision;
pub mod appearance;
pub mod world;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use particle::{CollisionGroup, Particle, ParticleId, ParticleParam};
pub use spring::{Spring, SpringId, SpringParam, SpringType};
pub use mesh::{Edge, Layout, MeshTopology};
pub use grid::GridTopology;
pub use chain::ChainTopology;
pub use softbody::{BodyDesc, BodyId, ParticleStyle, SoftBody, SpringToggles, Topology};
pub use appearance::{GroupColor, ParticleAppearance, SpringColorMode, SpringLine};
pub use world::World;
pub use config::{Bounds, SolverConfig};
pub use observer::{NoOpStepObserver, StepObserver, StepReport};
pub use error::PhysicsError;
