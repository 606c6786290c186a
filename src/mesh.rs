//! Free-form meshes with explicitly typed edges.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::spring::SpringType;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// A spring to create between two nodes of a layout (local indices).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub kind: SpringType,
}

impl Edge {
    pub fn new(a: usize, b: usize, kind: SpringType) -> Self {
        Edge { a, b, kind }
    }
}

/// Node positions plus springs, as produced by every topology.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout<F: Float> {
    pub positions: AllocVec<Vec2<F>>,
    pub edges: AllocVec<Edge>,
}

impl<F: Float> Layout<F> {
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }
}

/// Arbitrary mesh: caller-supplied positions and typed edges.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshTopology<F: Float> {
    pub positions: AllocVec<Vec2<F>>,
    pub edges: AllocVec<Edge>,
}

impl<F: Float> MeshTopology<F> {
    pub fn new(positions: AllocVec<Vec2<F>>, edges: AllocVec<Edge>) -> Self {
        MeshTopology { positions, edges }
    }

    /// Loose particles with no springs.
    pub fn points(positions: AllocVec<Vec2<F>>) -> Self {
        MeshTopology { positions, edges: AllocVec::new() }
    }

    /// Closed ring of `segments` nodes.
    ///
    /// STRUCT edges join neighbours, BEND edges skip one, and SHEAR edges
    /// cross to the opposite node (only for an even count of at least 4).
    pub fn ring(center: Vec2<F>, radius: F, segments: usize) -> Self {
        let two_pi = F::two() * F::pi();
        let n = F::from_usize(segments.max(1));
        let positions = (0..segments)
            .map(|i| {
                let angle = two_pi * F::from_usize(i) / n;
                Vec2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            })
            .collect();

        let mut edges = AllocVec::new();
        match segments {
            0 | 1 => {}
            2 => edges.push(Edge::new(0, 1, SpringType::Struct)),
            _ => {
                for i in 0..segments {
                    edges.push(Edge::new(i, (i + 1) % segments, SpringType::Struct));
                }
            }
        }
        if segments >= 5 {
            for i in 0..segments {
                edges.push(Edge::new(i, (i + 2) % segments, SpringType::Bend));
            }
        }
        if segments >= 4 && segments % 2 == 0 {
            let half = segments / 2;
            for i in 0..half {
                edges.push(Edge::new(i, i + half, SpringType::Shear));
            }
        }
        MeshTopology { positions, edges }
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn layout(&self) -> Result<Layout<F>, PhysicsError> {
        let count = self.positions.len();
        if count == 0 {
            return Err(PhysicsError::EmptyTopology);
        }
        if let Some(index) = self.positions.iter().position(|p| !p.is_finite()) {
            return Err(PhysicsError::InvalidPosition { index });
        }
        for e in &self.edges {
            if e.a >= count || e.b >= count || e.a == e.b {
                return Err(PhysicsError::InvalidEdge { a: e.a, b: e.b, count });
            }
            let rest = self.positions[e.a].distance(self.positions[e.b]);
            if rest.is_near_zero(F::from_f32(1e-10)) {
                return Err(PhysicsError::DegenerateEdge { a: e.a, b: e.b });
            }
        }
        Ok(Layout { positions: self.positions.clone(), edges: self.edges.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn ring_of_eight_has_all_categories() {
        let ring = MeshTopology::ring(Vec2::new(0.0f32, 0.0), 2.0, 8);
        let count = |k| ring.edges.iter().filter(|e| e.kind == k).count();
        assert_eq!(count(SpringType::Struct), 8);
        assert_eq!(count(SpringType::Bend), 8);
        assert_eq!(count(SpringType::Shear), 4);
        assert!(ring.layout().is_ok());
    }

    #[test]
    fn edge_out_of_range_is_rejected() {
        let mesh = MeshTopology::new(
            vec![Vec2::new(0.0f32, 0.0), Vec2::new(1.0, 0.0)],
            vec![Edge::new(0, 2, SpringType::Struct)],
        );
        assert_eq!(mesh.layout(), Err(PhysicsError::InvalidEdge { a: 0, b: 2, count: 2 }));
    }

    #[test]
    fn empty_or_non_finite_mesh_is_rejected() {
        assert_eq!(MeshTopology::<f32>::points(vec![]).layout(), Err(PhysicsError::EmptyTopology));
        let mesh = MeshTopology::points(vec![Vec2::new(0.0f32, 0.0), Vec2::new(f32::NAN, 1.0)]);
        assert_eq!(mesh.layout(), Err(PhysicsError::InvalidPosition { index: 1 }));
    }

    #[test]
    fn coincident_edge_is_rejected() {
        let mesh = MeshTopology::new(
            vec![Vec2::new(1.0f32, 1.0), Vec2::new(1.0, 1.0)],
            vec![Edge::new(0, 1, SpringType::Struct)],
        );
        assert_eq!(mesh.layout(), Err(PhysicsError::DegenerateEdge { a: 0, b: 1 }));
    }
}
