//! Rectangular cloth topology with structural, shear, and bend springs.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::mesh::{Edge, Layout};
use crate::spring::SpringType;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// A `cols` x `rows` lattice of nodes.
///
/// Node (col, row) sits at `origin + (col * spacing, -row * spacing)`: row 0
/// is the top row and rows extend toward -y. Its local index is
/// `row * cols + col`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTopology<F: Float> {
    pub cols: usize,
    pub rows: usize,
    pub spacing: F,
    pub origin: Vec2<F>,
}

impl<F: Float> GridTopology<F> {
    pub fn new(cols: usize, rows: usize, spacing: F) -> Self {
        GridTopology { cols, rows, spacing, origin: Vec2::zero() }
    }

    pub fn with_origin(mut self, origin: Vec2<F>) -> Self {
        self.origin = origin;
        self
    }

    pub fn node_count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// Pin mask with only row 0 set.
    pub fn top_row_mask(&self) -> AllocVec<bool> {
        (0..self.node_count()).map(|i| i < self.cols).collect()
    }

    /// Build positions and edges.
    ///
    /// Edges come out in a fixed order: horizontal STRUCT, vertical STRUCT,
    /// SHEAR diagonals per cell, horizontal BEND, vertical BEND.
    pub fn layout(&self) -> Result<Layout<F>, PhysicsError> {
        let (cols, rows) = (self.cols, self.rows);
        if cols == 0 || rows == 0 {
            return Err(PhysicsError::InvalidGridDimensions { cols, rows });
        }
        if !self.spacing.is_finite() || self.spacing <= F::zero() {
            return Err(PhysicsError::InvalidSpacing);
        }

        let mut positions = AllocVec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let x = self.origin.x + F::from_usize(col) * self.spacing;
                let y = self.origin.y - F::from_usize(row) * self.spacing;
                positions.push(Vec2::new(x, y));
            }
        }

        let idx = |col: usize, row: usize| row * cols + col;
        let mut edges = AllocVec::new();

        // Structural: horizontal
        for row in 0..rows {
            for col in 0..(cols - 1) {
                edges.push(Edge::new(idx(col, row), idx(col + 1, row), SpringType::Struct));
            }
        }

        // Structural: vertical
        for row in 0..(rows - 1) {
            for col in 0..cols {
                edges.push(Edge::new(idx(col, row), idx(col, row + 1), SpringType::Struct));
            }
        }

        // Shear: diagonals
        for row in 0..(rows - 1) {
            for col in 0..(cols - 1) {
                edges.push(Edge::new(idx(col, row), idx(col + 1, row + 1), SpringType::Shear));
                edges.push(Edge::new(idx(col + 1, row), idx(col, row + 1), SpringType::Shear));
            }
        }

        // Bend: skip-one horizontal
        for row in 0..rows {
            for col in 0..(cols.saturating_sub(2)) {
                edges.push(Edge::new(idx(col, row), idx(col + 2, row), SpringType::Bend));
            }
        }

        // Bend: skip-one vertical
        for row in 0..(rows.saturating_sub(2)) {
            for col in 0..cols {
                edges.push(Edge::new(idx(col, row), idx(col, row + 2), SpringType::Bend));
            }
        }

        Ok(Layout { positions, edges })
    }
}
