//! Distance-driven biome cycle and randomized weather

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::particles::{ParticleKind, ParticleSystem};
use crate::tuning::Tuning;
use crate::{Color, hex};

/// Height above the view where precipitation spawns
const PRECIP_SPAWN_Y: f32 = -50.0;
/// Extra width snow spawns across so wind can carry it on-screen
const SNOW_SPAWN_OVERSCAN: f32 = 200.0;
/// Wind added while it rains
const RAIN_WIND_BONUS: f32 = 0.2;

/// Palette phase of the day cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    Dawn,
    Noon,
    Dusk,
}

impl Biome {
    pub const CYCLE: [Biome; 3] = [Biome::Dawn, Biome::Noon, Biome::Dusk];

    pub fn background(self) -> Color {
        match self {
            Biome::Dawn => hex(0xcbd5e1),
            Biome::Noon => hex(0x7dd3fc),
            Biome::Dusk => hex(0xfca5a5),
        }
    }

    pub fn obstacle_color(self) -> Color {
        match self {
            Biome::Dawn => hex(0x1e293b),
            Biome::Noon => hex(0x0c4a6e),
            Biome::Dusk => hex(0x450a0a),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Dawn => "Early Sketch",
            Biome::Noon => "Open Sky",
            Biome::Dusk => "Twilight",
        }
    }

    /// Following phase, wrapping dusk back to dawn
    pub fn next(self) -> Biome {
        match self {
            Biome::Dawn => Biome::Noon,
            Biome::Noon => Biome::Dusk,
            Biome::Dusk => Biome::Dawn,
        }
    }
}

/// Active weather mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Rain,
    Snow,
}

/// Biome for a cumulative distance, plus the blend toward the next biome
pub fn biome_at(distance: f32, day_length: f32) -> (Biome, f32) {
    let progress = distance.max(0.0).rem_euclid(day_length) / day_length;
    let scaled = progress * Biome::CYCLE.len() as f32;
    let index = (scaled.floor() as usize).min(Biome::CYCLE.len() - 1);
    (Biome::CYCLE[index], (scaled - index as f32).clamp(0.0, 1.0))
}

/// Environment half of the director
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub biome: Biome,
    /// Progress from `biome` toward `biome.next()`
    pub blend: f32,
    pub background: Color,
    pub obstacle_color: Color,
    pub weather: Weather,
    /// Seconds until the next weather roll
    pub weather_timer: f32,
    precip_budget: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            biome: Biome::Dawn,
            blend: 0.0,
            background: Biome::Dawn.background(),
            obstacle_color: Biome::Dawn.obstacle_color(),
            weather: Weather::Clear,
            weather_timer: 0.0,
            precip_budget: 0.0,
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute biome colors from cumulative distance
    pub fn update_cycle(&mut self, distance: f32, tuning: &Tuning) {
        let (biome, blend) = biome_at(distance, tuning.day_length);
        self.biome = biome;
        self.blend = blend;
        let next = biome.next();
        self.background = biome.background().lerp(next.background(), blend);
        self.obstacle_color = biome.obstacle_color().lerp(next.obstacle_color(), blend);
    }

    /// Count down the weather timer; roll a new mode when it runs out.
    ///
    /// Returns the freshly rolled mode (which may repeat the previous one).
    pub fn update_weather<R: Rng>(&mut self, dt: f32, tuning: &Tuning, rng: &mut R) -> Option<Weather> {
        self.weather_timer -= dt;
        if self.weather_timer > 0.0 {
            return None;
        }

        let [clear, rain, snow] = tuning.weather_weights;
        let roll = rng.random::<f32>() * (clear + rain + snow);
        self.weather = if roll < clear {
            Weather::Clear
        } else if roll < clear + rain {
            Weather::Rain
        } else {
            Weather::Snow
        };
        self.weather_timer = rng.random_range(tuning.weather_min_duration..=tuning.weather_max_duration);
        self.precip_budget = 0.0;
        log::info!("Weather change: {:?} for {:.1}s", self.weather, self.weather_timer);
        Some(self.weather)
    }

    /// Spawn precipitation at the current weather's rate
    pub fn emit_precipitation<R: Rng>(
        &mut self,
        dt: f32,
        density: f32,
        tuning: &Tuning,
        particles: &mut ParticleSystem,
        rng: &mut R,
    ) {
        let (kind, rate, span) = match self.weather {
            Weather::Clear => {
                self.precip_budget = 0.0;
                return;
            }
            Weather::Rain => (ParticleKind::Rain, tuning.rain_rate, tuning.view_width),
            Weather::Snow => (
                ParticleKind::Snow,
                tuning.snow_rate,
                tuning.view_width + SNOW_SPAWN_OVERSCAN,
            ),
        };

        self.precip_budget += rate * density * dt.max(0.0);
        while self.precip_budget >= 1.0 {
            self.precip_budget -= 1.0;
            let x = rng.random_range(0.0..span);
            particles.emit(Vec2::new(x, PRECIP_SPAWN_Y), kind, 1, rng);
        }
    }

    /// Wind level for audio: scroll speed relative to top soar speed, plus rain
    pub fn wind_intensity(&self, speed: f32, tuning: &Tuning) -> f32 {
        let top_speed = tuning.base_speed * tuning.soar_speed_multiplier;
        let bonus = if self.weather == Weather::Rain {
            RAIN_WIND_BONUS
        } else {
            0.0
        };
        (speed / top_speed + bonus).clamp(0.0, 1.0)
    }
}
