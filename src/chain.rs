//! Rope topology: a line of nodes with structural and bend springs.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::mesh::{Edge, Layout};
use crate::spring::SpringType;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// `segments + 1` nodes evenly spaced from `start` to `end`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainTopology<F: Float> {
    pub start: Vec2<F>,
    pub end: Vec2<F>,
    pub segments: usize,
}

impl<F: Float> ChainTopology<F> {
    pub fn new(start: Vec2<F>, end: Vec2<F>, segments: usize) -> Self {
        ChainTopology { start, end, segments }
    }

    pub fn node_count(&self) -> usize {
        self.segments + 1
    }

    pub fn layout(&self) -> Result<Layout<F>, PhysicsError> {
        if self.segments == 0 {
            return Err(PhysicsError::EmptyTopology);
        }
        let length = self.start.distance(self.end);
        if !length.is_finite() || length.is_near_zero(F::from_f32(1e-10)) {
            return Err(PhysicsError::InvalidSpacing);
        }

        let n = F::from_usize(self.segments);
        let positions = (0..=self.segments)
            .map(|i| self.start.lerp(self.end, F::from_usize(i) / n))
            .collect();

        let mut edges = AllocVec::with_capacity(2 * self.segments);
        for i in 0..self.segments {
            edges.push(Edge::new(i, i + 1, SpringType::Struct));
        }
        for i in 0..self.segments.saturating_sub(1) {
            edges.push(Edge::new(i, i + 2, SpringType::Bend));
        }
        Ok(Layout { positions, edges })
    }
}
