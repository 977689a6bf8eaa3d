//! Runtime configuration.
//!
//! Every tunable of the animation lives here. A TOML file may override any
//! subset of fields; the CLI then overrides the file.

use crate::color::Rgb;
use crate::emitter::EmitterVariant;
use crate::error::{Error, Result};
use crate::trigger::TriggerPolicy;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Inclusive range sampled uniformly. Written as `[min, max]` in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut fastrand::Rng) -> f32 {
        self.min + rng.f32() * (self.max - self.min)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(Error::InvalidConfig {
                field,
                reason: format!("expected finite [min, max], got [{}, {}]", self.min, self.max),
            });
        }
        Ok(())
    }

    fn validate_fraction(&self, field: &'static str) -> Result<()> {
        self.validate(field)?;
        if self.min < 0.0 || self.max > 1.0 {
            return Err(Error::InvalidConfig {
                field,
                reason: format!("fractions must lie in [0, 1], got [{}, {}]", self.min, self.max),
            });
        }
        Ok(())
    }
}

impl From<[f32; 2]> for Band {
    fn from([min, max]: [f32; 2]) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    // Half of a 1920x1080 viewport
    fn default() -> Self {
        Self::new(960.0, 540.0)
    }
}

impl FromStr for CanvasSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidCanvas(s.to_string());
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: f32 = w.trim().parse().map_err(|_| invalid())?;
        let height: f32 = h.trim().parse().map_err(|_| invalid())?;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(invalid());
        }
        Ok(Self::new(width, height))
    }
}

/// Motion constants, in canvas units per tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Physics {
    /// Downward acceleration applied to burst particles.
    pub particle_gravity: f32,
    /// Magnitude of each particle's outward velocity.
    pub particle_speed: Band,
    pub burst_size: usize,
    /// Upward launch speed of a rocket.
    pub rocket_speed: Band,
    pub rocket_gravity: f32,
    /// Explosion threshold as a fraction of canvas height.
    pub explosion_band: Band,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            particle_gravity: 0.15,
            particle_speed: Band::new(1.0, 7.0),
            burst_size: 80,
            rocket_speed: Band::new(12.0, 18.0),
            rocket_gravity: 0.05,
            explosion_band: Band::new(0.1, 0.3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub canvas: CanvasSize,
    pub policy: TriggerPolicy,
    pub variant: EmitterVariant,
    pub fps: u32,
    pub seed: Option<u64>,
    pub background: Rgb,
    /// Opacity of the background overlay while fireworks are in flight.
    pub trail_opacity: u8,
    /// Ticks between launches in celebration mode.
    pub spawn_interval: u64,
    /// Horizontal launch position as a fraction of canvas width.
    pub spawn_band: Band,
    pub physics: Physics,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            policy: TriggerPolicy::Continuous,
            variant: EmitterVariant::Rocket,
            fps: 60,
            seed: None,
            background: Rgb::WHITE,
            trail_opacity: 30,
            spawn_interval: 35,
            spawn_band: Band::new(0.1, 0.9),
            physics: Physics::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str, path: &Path) -> Result<Self> {
        toml::from_str(s).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text, path)?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |field: &'static str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig {
                    field,
                    reason: format!("must be positive, got {v}"),
                })
            }
        };
        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;

        if self.fps == 0 {
            return Err(Error::InvalidConfig {
                field: "fps",
                reason: "must be at least 1".into(),
            });
        }
        if self.trail_opacity == 0 {
            return Err(Error::InvalidConfig {
                field: "trail_opacity",
                reason: "0 would never fade old frames".into(),
            });
        }
        if self.spawn_interval == 0 {
            return Err(Error::InvalidConfig {
                field: "spawn_interval",
                reason: "must be at least 1 tick".into(),
            });
        }
        self.spawn_band.validate_fraction("spawn_band")?;

        let p = &self.physics;
        if p.burst_size == 0 {
            return Err(Error::InvalidConfig {
                field: "physics.burst_size",
                reason: "a burst needs at least one particle".into(),
            });
        }
        p.particle_speed.validate("physics.particle_speed")?;
        p.rocket_speed.validate("physics.rocket_speed")?;
        if p.particle_speed.min < 0.0 || p.rocket_speed.min < 0.0 {
            return Err(Error::InvalidConfig {
                field: "physics",
                reason: "speeds are magnitudes and cannot be negative".into(),
            });
        }
        p.explosion_band.validate_fraction("physics.explosion_band")?;
        if !p.particle_gravity.is_finite() || !p.rocket_gravity.is_finite() {
            return Err(Error::InvalidConfig {
                field: "physics",
                reason: "gravity must be finite".into(),
            });
        }
        Ok(())
    }
}
