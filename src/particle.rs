use crate::color::Hsb;
use crate::frame::Drawable;
use glam::Vec2;

pub const LIFESPAN: i32 = 255;
pub const DECAY: i32 = 4;
pub const DIAMETER: f32 = 4.0;

/// A single fading spark of a burst.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub hue: u8,
    lifespan: i32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, gravity: f32, hue: u8) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::new(0.0, gravity),
            hue,
            lifespan: LIFESPAN,
        }
    }

    /// Spawns a particle flying outward in a uniformly random direction.
    pub fn outward(
        position: Vec2,
        speed: f32,
        gravity: f32,
        hue: u8,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let angle = rng.f32() * std::f32::consts::TAU;
        let velocity = Vec2::from_angle(angle) * speed;
        Self::new(position, velocity, gravity, hue)
    }

    pub fn advance(&mut self) {
        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.lifespan -= DECAY;
    }

    pub fn lifespan(&self) -> i32 {
        self.lifespan
    }

    pub fn is_finished(&self) -> bool {
        self.lifespan < 0
    }

    pub fn snapshot(&self) -> Drawable {
        Drawable {
            position: self.position,
            diameter: DIAMETER,
            color: Hsb::new(self.hue, 255, 255),
            alpha: self.lifespan.clamp(0, 255) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_integrates_and_decays() {
        let mut p = Particle::new(Vec2::new(10.0, 10.0), Vec2::new(1.0, -2.0), 0.15, 40);
        p.advance();
        assert!(p.velocity.abs_diff_eq(Vec2::new(1.0, -1.85), 1e-5));
        assert!(p.position.abs_diff_eq(Vec2::new(11.0, 8.15), 1e-5));
        assert_eq!(p.lifespan(), LIFESPAN - DECAY);
    }

    #[test]
    fn finishes_after_64_ticks() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, 0.0, 0);
        for tick in 1..=64 {
            let before = p.lifespan();
            assert!(!p.is_finished(), "finished early at tick {tick}");
            p.advance();
            assert_eq!(p.lifespan(), before - DECAY);
        }
        assert!(p.is_finished());
    }

    #[test]
    fn snapshot_alpha_tracks_lifespan() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, 0.0, 200);
        assert_eq!(p.snapshot().alpha, 255);
        p.advance();
        assert_eq!(p.snapshot().alpha, 251);
        for _ in 0..70 {
            p.advance();
        }
        assert_eq!(p.snapshot().alpha, 0);
        assert_eq!(p.snapshot().color, Hsb::new(200, 255, 255));
    }

    #[test]
    fn outward_speed_matches_request() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..100 {
            let p = Particle::outward(Vec2::ZERO, 5.0, 0.15, 0, &mut rng);
            assert!((p.velocity.length() - 5.0).abs() < 1e-4);
        }
    }
}
