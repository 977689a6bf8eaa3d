//! A single firework.
//!
//! An emitter is either a rocket that climbs until it tops out or passes
//! its explosion height, or a burst that explodes where it is created.
//! After the explosion it owns a fixed set of particles that only shrinks
//! as they fade, and it is finished once the last one is gone.

use crate::color::Hsb;
use crate::config::{CanvasSize, Physics};
use crate::frame::Drawable;
use crate::particle::Particle;
use glam::Vec2;
use serde::Deserialize;

pub const ROCKET_DIAMETER: f32 = 5.0;
pub const ROCKET_SATURATION: u8 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EmitterVariant {
    /// Climb from the bottom of the canvas, then explode.
    Rocket,
    /// Explode immediately at the spawn point.
    Burst,
}

#[derive(Debug, Clone)]
pub struct Emitter {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub hue: u8,
    explosion_height: f32,
    exploded: bool,
    particles: Vec<Particle>,
}

impl Emitter {
    /// A rocket at `position` with a sampled upward speed and explosion height.
    pub fn rocket(
        position: Vec2,
        canvas: CanvasSize,
        physics: &Physics,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let speed = physics.rocket_speed.sample(rng);
        let explosion_height = physics.explosion_band.sample(rng) * canvas.height;
        Self {
            position,
            velocity: Vec2::new(0.0, -speed),
            acceleration: Vec2::new(0.0, physics.rocket_gravity),
            hue: rng.u8(..),
            explosion_height,
            exploded: false,
            particles: Vec::new(),
        }
    }

    /// A burst that has already exploded at `position`.
    pub fn burst(position: Vec2, physics: &Physics, rng: &mut fastrand::Rng) -> Self {
        let mut emitter = Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            hue: rng.u8(..),
            explosion_height: position.y,
            exploded: false,
            particles: Vec::new(),
        };
        emitter.explode(physics, rng);
        emitter
    }

    pub fn update(&mut self, physics: &Physics, rng: &mut fastrand::Rng) {
        if !self.exploded {
            self.velocity += self.acceleration;
            self.position += self.velocity;

            // The velocity check covers thresholds sampled above the apex
            if self.position.y < self.explosion_height || self.velocity.y >= 0.0 {
                self.explode(physics, rng);
            }
        } else {
            self.particles.retain_mut(|particle| {
                particle.advance();
                !particle.is_finished()
            });
        }
    }

    fn explode(&mut self, physics: &Physics, rng: &mut fastrand::Rng) {
        debug_assert!(!self.exploded);
        self.exploded = true;
        self.particles.reserve_exact(physics.burst_size);
        for _ in 0..physics.burst_size {
            let speed = physics.particle_speed.sample(rng);
            self.particles.push(Particle::outward(
                self.position,
                speed,
                physics.particle_gravity,
                self.hue,
                rng,
            ));
        }
        log::debug!(
            "Firework exploded at ({:.0}, {:.0}) with {} particles, hue {}",
            self.position.x,
            self.position.y,
            self.particles.len(),
            self.hue
        );
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn explosion_height(&self) -> f32 {
        self.explosion_height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_finished(&self) -> bool {
        self.exploded && self.particles.is_empty()
    }

    pub fn snapshot(&self, out: &mut Vec<Drawable>) {
        if self.exploded {
            out.extend(self.particles.iter().map(Particle::snapshot));
        } else {
            out.push(Drawable {
                position: self.position,
                diameter: ROCKET_DIAMETER,
                color: Hsb::new(self.hue, ROCKET_SATURATION, 255),
                alpha: 255,
            });
        }
    }
}
