//! Particle-particle contact: uniform grid broad phase and push-out.

use crate::float::Float;
use crate::particle::Particle;
use crate::spring::Spring;
use alloc::vec::Vec as AllocVec;

/// Upper bound on cells per particle before the grid is coarsened.
const MAX_CELLS_PER_PARTICLE: usize = 4;

/// Reusable buckets for the broad phase.
///
/// Bucketing is a counting sort over particle indices, so candidate pairs
/// always come out in the same order for the same positions.
#[derive(Default, Clone, Debug)]
pub struct BroadPhase {
    cell_of: AllocVec<usize>,
    cell_start: AllocVec<usize>,
    entries: AllocVec<usize>,
    active: AllocVec<usize>,
    pairs: AllocVec<(usize, usize)>,
}

impl BroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate pairs `(i, j)` with `i < j` whose cells touch.
    ///
    /// Only enabled particles with finite positions take part.
    pub fn candidate_pairs<F: Float>(&mut self, particles: &[Particle<F>], radius_scale: F) -> &[(usize, usize)] {
        self.pairs.clear();
        self.active.clear();
        self.active.extend(
            particles
                .iter()
                .enumerate()
                .filter(|(_, p)| p.enabled && p.pos.is_finite())
                .map(|(i, _)| i),
        );
        if self.active.len() < 2 {
            return &self.pairs;
        }

        let first = particles[self.active[0]].pos;
        let (mut min, mut max) = (first, first);
        let mut diameter = F::zero();
        for &i in &self.active {
            let p = &particles[i];
            min.x = min.x.min(p.pos.x);
            min.y = min.y.min(p.pos.y);
            max.x = max.x.max(p.pos.x);
            max.y = max.y.max(p.pos.y);
            diameter = diameter.max(F::two() * p.radius * radius_scale);
        }
        let mut cell = diameter.to_f64();
        if !cell.is_finite() || cell <= 0.0 {
            return &self.pairs;
        }

        // Sized in f64 and clamped before any cast: far-flung particles
        // coarsen the grid but never overflow it.
        let (lo_x, lo_y) = (min.x.to_f64(), min.y.to_f64());
        let extent_x = max.x.to_f64() - lo_x;
        let extent_y = max.y.to_f64() - lo_y;
        let limit = self.active.len() * MAX_CELLS_PER_PARTICLE;
        let mut nx = cells_along(extent_x, cell, limit);
        let mut ny = cells_along(extent_y, cell, limit);
        while nx.saturating_mul(ny) > limit && cell.is_finite() {
            cell *= 2.0;
            nx = cells_along(extent_x, cell, limit);
            ny = cells_along(extent_y, cell, limit);
        }
        if nx.saturating_mul(ny) > limit {
            nx = 1;
            ny = 1;
        }

        let cell_coord = |v: F, lo: f64, n: usize| cell_index(v.to_f64() - lo, cell, n);

        self.cell_of.clear();
        self.cell_of.resize(particles.len(), usize::MAX);
        self.cell_start.clear();
        self.cell_start.resize(nx * ny + 1, 0);
        for &i in &self.active {
            let pos = particles[i].pos;
            let c = cell_coord(pos.x, lo_x, nx) + cell_coord(pos.y, lo_y, ny) * nx;
            self.cell_of[i] = c;
            self.cell_start[c + 1] += 1;
        }
        for c in 0..nx * ny {
            self.cell_start[c + 1] += self.cell_start[c];
        }
        self.entries.clear();
        self.entries.resize(self.active.len(), 0);
        let mut fill = self.cell_start.clone();
        for &i in &self.active {
            let c = self.cell_of[i];
            self.entries[fill[c]] = i;
            fill[c] += 1;
        }

        for &i in &self.active {
            let c = self.cell_of[i];
            let (cx, cy) = (c % nx, c / nx);
            for gy in cy.saturating_sub(1)..=(cy + 1).min(ny - 1) {
                for gx in cx.saturating_sub(1)..=(cx + 1).min(nx - 1) {
                    let g = gx + gy * nx;
                    for &j in &self.entries[self.cell_start[g]..self.cell_start[g + 1]] {
                        if j > i {
                            self.pairs.push((i, j));
                        }
                    }
                }
            }
        }
        &self.pairs
    }
}

/// Cells needed to cover `extent`, capped at `limit + 1`.
fn cells_along(extent: f64, cell: f64, limit: usize) -> usize {
    let span = Float::floor(extent / cell);
    if span.is_finite() && span >= 0.0 && span < limit as f64 {
        span as usize + 1
    } else {
        limit + 1
    }
}

/// Cell coordinate of an offset from the grid minimum, in `0..n`.
fn cell_index(offset: f64, cell: f64, n: usize) -> usize {
    let k = Float::floor(offset / cell);
    if k.is_finite() && k > 0.0 {
        (k as usize).min(n - 1)
    } else {
        0
    }
}

/// Whether contact between `i` and `j` is suppressed.
///
/// Same collision group, or a direct enabled spring between them.
pub fn excluded<F: Float>(particles: &[Particle<F>], springs: &[Spring<F>], i: usize, j: usize) -> bool {
    let (a, b) = (&particles[i], &particles[j]);
    if a.group == b.group {
        return true;
    }
    a.springs().iter().any(|sid| {
        let s = &springs[sid.0];
        s.is_enabled() && (s.pa.0 == j || s.pb.0 == j)
    })
}

/// Push `i` and `j` apart until their scaled radii no longer overlap.
///
/// Each side moves in proportion to its inverse mass. Returns `false` when
/// there is no overlap, both are pinned, or the centres coincide.
pub fn resolve_pair<F: Float>(particles: &mut [Particle<F>], i: usize, j: usize, radius_scale: F) -> bool {
    let a_inv = particles[i].inv_mass;
    let b_inv = particles[j].inv_mass;
    if (a_inv + b_inv).is_near_zero(F::from_f32(1e-10)) {
        return false;
    }
    let delta = particles[j].pos - particles[i].pos;
    let min_dist = (particles[i].radius + particles[j].radius) * radius_scale;
    let dist_sq = particles[i].pos.distance_sq(particles[j].pos);
    if dist_sq >= min_dist * min_dist {
        return false;
    }
    let dist = dist_sq.sqrt();
    if dist.is_near_zero(F::from_f32(1e-10)) {
        return false;
    }
    let push = delta.scale((min_dist - dist) / dist);
    particles[i].apply_correction(-push, b_inv);
    particles[j].apply_correction(push, a_inv);
    true
}
