use crate::config::{Band, CanvasSize, Config, Physics};
use crate::emitter::{Emitter, EmitterVariant};
use crate::error::Result;
use crate::frame::Drawable;
use glam::Vec2;

/// Every live firework on the canvas.
pub struct Simulation {
    canvas: CanvasSize,
    variant: EmitterVariant,
    physics: Physics,
    spawn_band: Band,
    spawn_interval: u64,
    emitters: Vec<Emitter>,
    tick_count: u64,
    launch_count: u64,
    // Ticks since celebration mode turned on
    celebration_ticks: Option<u64>,
    rng: fastrand::Rng,
}

impl Simulation {
    /// Fails if `config` does not pass [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Ok(Self {
            canvas: config.canvas,
            variant: config.variant,
            physics: config.physics.clone(),
            spawn_band: config.spawn_band,
            spawn_interval: config.spawn_interval,
            emitters: Vec::new(),
            tick_count: 0,
            launch_count: 0,
            celebration_ticks: None,
            rng,
        })
    }

    /// Launches one firework at a random point for the configured variant.
    pub fn spawn(&mut self) {
        let x = self.spawn_band.sample(&mut self.rng) * self.canvas.width;
        let emitter = match self.variant {
            EmitterVariant::Rocket => {
                let origin = Vec2::new(x, self.canvas.height);
                Emitter::rocket(origin, self.canvas, &self.physics, &mut self.rng)
            }
            EmitterVariant::Burst => {
                let y = self.physics.explosion_band.sample(&mut self.rng) * self.canvas.height;
                Emitter::burst(Vec2::new(x, y), &self.physics, &mut self.rng)
            }
        };
        log::debug!(
            "Spawned {:?} firework at ({:.0}, {:.0})",
            self.variant,
            emitter.position.x,
            emitter.position.y
        );
        self.emitters.push(emitter);
        self.launch_count += 1;
    }

    /// Advances one tick.
    ///
    /// While `celebrating`, a firework is launched on the first tick of the
    /// celebration and then every `spawn_interval` ticks.
    pub fn advance(&mut self, celebrating: bool) {
        self.tick_count += 1;

        if celebrating {
            let phase = self.celebration_ticks.unwrap_or(0);
            if phase % self.spawn_interval == 0 {
                self.spawn();
            }
            self.celebration_ticks = Some(phase + 1);
        } else {
            self.celebration_ticks = None;
        }

        let physics = &self.physics;
        let rng = &mut self.rng;
        self.emitters.retain_mut(|emitter| {
            emitter.update(physics, rng);
            !emitter.is_finished()
        });
    }

    pub fn drawables(&self) -> Vec<Drawable> {
        let mut out = Vec::new();
        for emitter in &self.emitters {
            emitter.snapshot(&mut out);
        }
        out
    }

    pub fn is_idle(&self) -> bool {
        self.emitters.is_empty()
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Fireworks launched since creation.
    pub fn launch_count(&self) -> u64 {
        self.launch_count
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn config(variant: EmitterVariant) -> Config {
        Config {
            variant,
            seed: Some(42),
            ..Config::default()
        }
    }

    #[test]
    fn starts_idle() {
        let sim = Simulation::new(&config(EmitterVariant::Rocket)).unwrap();
        assert!(sim.is_idle());
        assert_eq!(sim.tick_count(), 0);
        assert!(sim.drawables().is_empty());
    }

    #[test]
    fn rockets_launch_from_the_bottom_inside_the_band() {
        let mut sim = Simulation::new(&config(EmitterVariant::Rocket)).unwrap();
        for _ in 0..50 {
            sim.spawn();
        }
        for emitter in sim.emitters() {
            assert_eq!(emitter.position.y, 540.0);
            assert!(emitter.position.x >= 95.99 && emitter.position.x <= 864.01);
            assert!(!emitter.is_exploded());
        }
    }

    #[test]
    fn bursts_spawn_exploded_in_the_upper_band() {
        let mut sim = Simulation::new(&config(EmitterVariant::Burst)).unwrap();
        sim.spawn();
        let emitter = &sim.emitters()[0];
        assert!(emitter.is_exploded());
        assert!(emitter.position.y >= 53.99 && emitter.position.y <= 162.01);
    }

    #[test]
    fn celebration_spawns_on_first_tick_and_every_interval() {
        let mut sim = Simulation::new(&config(EmitterVariant::Rocket)).unwrap();
        sim.advance(true);
        assert_eq!(sim.launch_count(), 1);
        assert!(!sim.is_idle());

        for _ in 1..35 {
            sim.advance(true);
        }
        assert_eq!(sim.launch_count(), 1);
        sim.advance(true);
        assert_eq!(sim.launch_count(), 2);
        for _ in 0..35 {
            sim.advance(true);
        }
        assert_eq!(sim.launch_count(), 3);
        assert_eq!(sim.tick_count(), 71);
    }

    #[test]
    fn celebration_phase_restarts_after_a_pause() {
        let mut sim = Simulation::new(&config(EmitterVariant::Rocket)).unwrap();
        for _ in 0..10 {
            sim.advance(true);
        }
        assert_eq!(sim.launch_count(), 1);
        sim.advance(false);
        sim.advance(true);
        assert_eq!(sim.launch_count(), 2);
    }

    #[test]
    fn no_spawns_without_celebration() {
        let mut sim = Simulation::new(&config(EmitterVariant::Rocket)).unwrap();
        for _ in 0..200 {
            sim.advance(false);
        }
        assert!(sim.is_idle());
        assert_eq!(sim.tick_count(), 200);
    }

    #[test]
    fn finished_emitters_are_removed() {
        let mut sim = Simulation::new(&config(EmitterVariant::Burst)).unwrap();
        sim.spawn();
        sim.spawn();
        // Particles live 64 ticks
        for _ in 0..63 {
            sim.advance(false);
            assert!(sim.emitters().iter().all(|e| !e.is_finished()));
        }
        assert_eq!(sim.emitters().len(), 2);
        sim.advance(false);
        assert!(sim.is_idle());
    }

    #[test]
    fn never_holds_finished_emitters_after_advance() {
        let mut sim = Simulation::new(&config(EmitterVariant::Rocket)).unwrap();
        for tick in 0..600 {
            sim.advance(tick < 300);
            assert!(sim.emitters().iter().all(|e| !e.is_finished()));
            for emitter in sim.emitters() {
                assert!(emitter.particles().iter().all(|p| !p.is_finished()));
            }
        }
        assert!(sim.is_idle());
    }

    #[test]
    fn drawables_cover_rockets_and_particles() {
        let mut sim = Simulation::new(&config(EmitterVariant::Burst)).unwrap();
        sim.spawn();
        assert_eq!(sim.drawables().len(), 80);

        let mut sim = Simulation::new(&config(EmitterVariant::Rocket)).unwrap();
        sim.spawn();
        assert_eq!(sim.drawables().len(), 1);
    }

    #[test]
    fn rejects_zero_spawn_interval() {
        let config = Config {
            spawn_interval: 0,
            ..config(EmitterVariant::Rocket)
        };
        assert!(matches!(
            Simulation::new(&config),
            Err(Error::InvalidConfig { field: "spawn_interval", .. })
        ));
    }
}
