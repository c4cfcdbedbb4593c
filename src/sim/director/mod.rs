//! Adaptive director
//!
//! Derives presentation and audio parameters from telemetry: distance drives
//! the biome cycle, a timer drives weather, and flap cadence plus altitude
//! spread drive the persona palette.

pub mod environment;
pub mod persona;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use environment::{Biome, Environment, Weather, biome_at};
pub use persona::{BehaviorStats, EmissionProfile, Palette, Persona, PersonaTracker, classify};

use super::particles::ParticleSystem;
use crate::tuning::Tuning;

/// Telemetry for one director step
#[derive(Debug, Clone, Copy)]
pub struct DirectorInput {
    /// Scaled step for blending and emission
    pub dt: f32,
    /// Unscaled elapsed simulation time
    pub sim_time: f64,
    /// Cumulative distance in meters
    pub distance: f32,
    /// Player y
    pub altitude: f32,
    pub score: u32,
    /// Current scroll speed (pixels/s)
    pub speed: f32,
    /// Collect altitude samples and run periodic analysis
    pub analysing: bool,
    /// Persona ambient particle density multiplier
    pub ambient_density: f32,
    /// Rain and snow density multiplier
    pub weather_density: f32,
}

/// What changed during a director step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectorUpdate {
    pub weather_changed: Option<Weather>,
    pub persona_changed: Option<Persona>,
    /// Wind intensity for audio (0..1)
    pub wind: f32,
}

/// Environment and persona, advanced together
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdaptiveDirector {
    pub environment: Environment,
    pub persona: PersonaTracker,
}

impl AdaptiveDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for newly spawned obstacles
    pub fn obstacle_color(&self) -> crate::Color {
        self.environment.obstacle_color
    }

    /// Record a flap; classification runs immediately
    pub fn on_flap(&mut self, sim_time: f64, score: u32, tuning: &Tuning) -> Option<Persona> {
        self.persona.record_flap(sim_time, score, tuning)
    }

    /// Advance biome, weather and persona by one step
    pub fn tick<R: Rng>(
        &mut self,
        input: DirectorInput,
        tuning: &Tuning,
        particles: &mut ParticleSystem,
        rng: &mut R,
    ) -> DirectorUpdate {
        let mut update = DirectorUpdate::default();

        self.environment.update_cycle(input.distance, tuning);
        update.weather_changed = self.environment.update_weather(input.dt, tuning, rng);
        self.environment
            .emit_precipitation(input.dt, input.weather_density, tuning, particles, rng);

        if input.analysing {
            self.persona.sample_altitude(input.altitude, tuning);
            update.persona_changed = self.persona.maybe_analyze(input.sim_time, input.score, tuning);
        }
        self.persona.blend(input.dt, tuning);
        self.persona
            .emit_ambient(input.dt, input.ambient_density, tuning, particles, rng);

        update.wind = self.environment.wind_intensity(input.speed, tuning);
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::particles::ParticleKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn input(sim_time: f64, altitude: f32) -> DirectorInput {
        DirectorInput {
            dt: SIM_DT,
            sim_time,
            distance: 0.0,
            altitude,
            score: 0,
            speed: 200.0,
            analysing: true,
            ambient_density: 1.0,
            weather_density: 1.0,
        }
    }

    #[test]
    fn test_first_tick_rolls_weather() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = ParticleSystem::new();
        let mut director = AdaptiveDirector::new();
        let update = director.tick(input(0.0, 300.0), &tuning, &mut particles, &mut rng);
        assert!(update.weather_changed.is_some());
        assert!(update.wind > 0.0 && update.wind <= 1.0);

        let update = director.tick(input(SIM_DT as f64, 300.0), &tuning, &mut particles, &mut rng);
        assert!(update.weather_changed.is_none());
    }

    #[test]
    fn test_wild_altitude_reclassifies_on_cadence() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut particles = ParticleSystem::new();
        let mut director = AdaptiveDirector::new();

        let mut changed = None;
        for i in 0..240 {
            let t = i as f64 * SIM_DT as f64;
            let altitude = if i % 2 == 0 { 20.0 } else { 580.0 };
            changed = changed.or(director.tick(input(t, altitude), &tuning, &mut particles, &mut rng).persona_changed);
        }
        assert_eq!(changed, Some(Persona::Panic));
        assert_eq!(director.persona.persona, Persona::Panic);
    }

    #[test]
    fn test_no_samples_outside_analysis() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = ParticleSystem::new();
        let mut director = AdaptiveDirector::new();
        for i in 0..240 {
            let mut step = input(i as f64 * SIM_DT as f64, if i % 2 == 0 { 20.0 } else { 580.0 });
            step.analysing = false;
            director.tick(step, &tuning, &mut particles, &mut rng);
        }
        assert_eq!(director.persona.persona, Persona::Stoic);
        assert_eq!(director.persona.stats(&tuning).altitude_std, 0.0);
    }

    #[test]
    fn test_obstacle_color_tracks_distance() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut particles = ParticleSystem::new();
        let mut director = AdaptiveDirector::new();
        let mut step = input(0.0, 300.0);
        step.distance = tuning.day_length / 3.0 + 1.0;
        director.tick(step, &tuning, &mut particles, &mut rng);
        assert_eq!(director.environment.biome, Biome::Noon);
        assert_ne!(director.obstacle_color(), Biome::Dawn.obstacle_color());
    }

    #[test]
    fn test_precipitation_off_keeps_ambient_stream() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut particles = ParticleSystem::new();
        let mut director = AdaptiveDirector::new();
        let quiet = |i: usize| DirectorInput {
            weather_density: 0.0,
            ..input(i as f64 * SIM_DT as f64, 300.0)
        };

        director.tick(quiet(0), &tuning, &mut particles, &mut rng);
        director.environment.weather = Weather::Rain;
        for i in 1..=120 {
            director.tick(quiet(i), &tuning, &mut particles, &mut rng);
        }

        assert!(particles.iter().any(|p| p.kind == ParticleKind::Dust));
        assert!(particles.iter().all(|p| p.kind != ParticleKind::Rain));
    }
}
