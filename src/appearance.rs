//! Presentation data: particle colors and spring line lists.
//!
//! Nothing here feeds back into the simulation. Hosts that draw the world
//! can use these helpers or ignore them entirely.

use crate::float::Float;
use crate::particle::{Particle, ParticleId};
use crate::softbody::SoftBody;
use crate::spring::{SpringId, SpringType};
use crate::vec::Vec2;

/// Color source for particles, supplied by the host.
pub trait ParticleAppearance<F: Float> {
    /// ARGB color for `particle` of `body`.
    fn color(&self, body: &SoftBody, id: ParticleId, particle: &Particle<F>) -> u32;
}

/// Body color when `use_particles_color` is set, gray otherwise.
#[derive(Copy, Clone, Debug, Default)]
pub struct GroupColor;

impl<F: Float> ParticleAppearance<F> for GroupColor {
    fn color(&self, body: &SoftBody, _id: ParticleId, _particle: &Particle<F>) -> u32 {
        if body.style.use_particles_color {
            body.style.particle_color
        } else {
            body.style.particle_gray
        }
    }
}

impl<F: Float, T> ParticleAppearance<F> for T
where
    T: Fn(&SoftBody, ParticleId, &Particle<F>) -> u32,
{
    fn color(&self, body: &SoftBody, id: ParticleId, particle: &Particle<F>) -> u32 {
        self(body, id, particle)
    }
}

/// How spring lines are colored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpringColorMode {
    /// Fixed color and weight per spring category; hidden categories skipped.
    ByType,
    /// Red/yellow ramp over current plus last relaxation force.
    ByTension,
}

/// One drawable spring segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpringLine<F: Float> {
    pub spring: SpringId,
    pub kind: SpringType,
    pub a: Vec2<F>,
    pub b: Vec2<F>,
    pub color: u32,
    pub weight: F,
}

/// Opaque ARGB from 8-bit channels.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

fn channel(v: f64) -> u8 {
    if v >= 255.0 {
        255
    } else if v > 0.0 {
        v as u8
    } else {
        0
    }
}

/// Color and stroke weight for a spring category.
pub fn type_style<F: Float>(kind: SpringType) -> (u32, F) {
    match kind {
        SpringType::Struct => (rgb(0, 0, 0), F::one()),
        SpringType::Shear => (rgb(70, 140, 255), F::from_f32(0.8)),
        SpringType::Bend => (rgb(255, 90, 30), F::from_f32(0.6)),
    }
}

/// Ramp for `|current force| + |last relaxation force|`.
pub fn tension_color<F: Float>(current: F, relaxed: F) -> u32 {
    let force = (current.abs() + relaxed.abs()).to_f64();
    rgb(channel(force * 10000.0), channel(force * 1000.0), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_channels() {
        assert_eq!(rgb(0x12, 0x34, 0x56), 0xFF12_3456);
    }

    #[test]
    fn tension_ramp_saturates() {
        assert_eq!(tension_color(0.0f32, 0.0), rgb(0, 0, 0));
        assert_eq!(tension_color(1.0f32, -1.0), rgb(255, 255, 0));
        assert_eq!(tension_color(0.01f64, 0.0), rgb(100, 10, 0));
    }
}
