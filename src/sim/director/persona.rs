//! Behavior classification from flap cadence and altitude variance
//!
//! The tracker keeps a rolling window of flap timestamps and altitude samples,
//! classifies the player into a persona, and eases the presentation palette
//! toward that persona's target instead of snapping.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::particles::{Particle, ParticleKind, ParticleSystem};
use crate::tuning::Tuning;
use crate::{Color, approach, hex, rgb};

/// Ambient particles per second for every persona profile (0.1 per frame at 60 fps)
const AMBIENT_RATE: f32 = 6.0;

/// Behavioral archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persona {
    /// Few flaps, steady altitude
    Stoic,
    /// Frequent precise flaps with a decent score
    Ace,
    /// Frantic flapping or wild altitude swings
    Panic,
}

/// Sky gradient endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub sky_top: Color,
    pub sky_bottom: Color,
}

impl Palette {
    /// Sky before any classification has happened
    pub fn initial() -> Self {
        Self {
            sky_top: rgb(112, 197, 206),
            sky_bottom: rgb(255, 255, 255),
        }
    }
}

/// Ambient particle stream for a persona
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionProfile {
    pub kind: ParticleKind,
    pub color: Color,
    /// Particles per second at full density
    pub rate: f32,
}

impl Persona {
    pub fn palette(self) -> Palette {
        match self {
            Persona::Stoic => Palette {
                sky_top: rgb(125, 211, 252),
                sky_bottom: rgb(224, 242, 254),
            },
            Persona::Ace => Palette {
                sky_top: rgb(71, 85, 105),
                sky_bottom: rgb(192, 132, 252),
            },
            Persona::Panic => Palette {
                sky_top: rgb(120, 53, 15),
                sky_bottom: rgb(251, 146, 60),
            },
        }
    }

    pub fn emission(self) -> EmissionProfile {
        match self {
            Persona::Stoic => EmissionProfile {
                kind: ParticleKind::Dust,
                color: hex(0xffffff),
                rate: AMBIENT_RATE,
            },
            Persona::Ace => EmissionProfile {
                kind: ParticleKind::Spark,
                color: hex(0xa78bfa),
                rate: AMBIENT_RATE,
            },
            Persona::Panic => EmissionProfile {
                kind: ParticleKind::SpeedLine,
                color: hex(0xfdba74),
                rate: AMBIENT_RATE,
            },
        }
    }
}

/// Telemetry summary used for classification
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BehaviorStats {
    pub flap_rate: f32,
    pub altitude_mean: f32,
    pub altitude_std: f32,
}

/// Pure classification rule
pub fn classify(stats: BehaviorStats, score: u32, tuning: &Tuning) -> Persona {
    if stats.flap_rate > tuning.panic_flap_rate || stats.altitude_std > tuning.panic_altitude_std {
        Persona::Panic
    } else if score > tuning.ace_min_score && stats.flap_rate > tuning.ace_flap_rate {
        Persona::Ace
    } else {
        Persona::Stoic
    }
}

/// Persona half of the director
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaTracker {
    flaps: VecDeque<f64>,
    altitudes: VecDeque<f32>,
    last_analysis: f64,
    pub persona: Persona,
    /// Palette currently shown
    pub palette: Palette,
    target: Palette,
    pub emission: EmissionProfile,
    ambient_budget: f32,
}

impl Default for PersonaTracker {
    fn default() -> Self {
        Self {
            flaps: VecDeque::new(),
            altitudes: VecDeque::new(),
            last_analysis: 0.0,
            persona: Persona::Stoic,
            palette: Palette::initial(),
            target: Palette::initial(),
            emission: Persona::Stoic.emission(),
            ambient_budget: 0.0,
        }
    }
}

impl PersonaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Palette {
        self.target
    }

    /// Log a flap and re-classify immediately
    pub fn record_flap(&mut self, now: f64, score: u32, tuning: &Tuning) -> Option<Persona> {
        self.flaps.push_back(now);
        self.analyze(now, score, tuning)
    }

    /// Log the current altitude, keeping a bounded history
    pub fn sample_altitude(&mut self, y: f32, tuning: &Tuning) {
        self.altitudes.push_back(y);
        while self.altitudes.len() > tuning.altitude_samples {
            self.altitudes.pop_front();
        }
    }

    /// Re-classify if the analysis interval has elapsed
    pub fn maybe_analyze(&mut self, now: f64, score: u32, tuning: &Tuning) -> Option<Persona> {
        if now - self.last_analysis >= tuning.analysis_interval as f64 {
            self.analyze(now, score, tuning)
        } else {
            None
        }
    }

    /// Flap rate and altitude spread. Empty windows yield zeros.
    pub fn stats(&self, tuning: &Tuning) -> BehaviorStats {
        let flap_rate = self.flaps.len() as f32 / tuning.flap_window;
        if self.altitudes.is_empty() {
            return BehaviorStats {
                flap_rate,
                ..BehaviorStats::default()
            };
        }

        let n = self.altitudes.len() as f32;
        let mean = self.altitudes.iter().sum::<f32>() / n;
        let variance = self.altitudes.iter().map(|y| (y - mean).powi(2)).sum::<f32>() / n;
        BehaviorStats {
            flap_rate,
            altitude_mean: mean,
            altitude_std: variance.sqrt(),
        }
    }

    fn analyze(&mut self, now: f64, score: u32, tuning: &Tuning) -> Option<Persona> {
        self.last_analysis = now;
        let cutoff = now - tuning.flap_window as f64;
        while self.flaps.front().is_some_and(|t| *t <= cutoff) {
            self.flaps.pop_front();
        }

        let next = classify(self.stats(tuning), score, tuning);
        if next == self.persona {
            return None;
        }
        log::info!("Persona {:?} -> {:?}", self.persona, next);
        self.persona = next;
        self.target = next.palette();
        self.emission = next.emission();
        Some(next)
    }

    /// Ease the shown palette toward the target
    pub fn blend(&mut self, dt: f32, tuning: &Tuning) {
        self.palette.sky_top = approach(self.palette.sky_top, self.target.sky_top, dt, tuning.palette_blend_rate);
        self.palette.sky_bottom = approach(
            self.palette.sky_bottom,
            self.target.sky_bottom,
            dt,
            tuning.palette_blend_rate,
        );
    }

    /// Stream ambient particles for the active profile
    pub fn emit_ambient<R: Rng>(
        &mut self,
        dt: f32,
        density: f32,
        tuning: &Tuning,
        particles: &mut ParticleSystem,
        rng: &mut R,
    ) {
        self.ambient_budget += self.emission.rate * density * dt.max(0.0);
        while self.ambient_budget >= 1.0 {
            self.ambient_budget -= 1.0;
            let y = rng.random_range(0.0..tuning.playable_height());
            let x = match self.emission.kind {
                ParticleKind::SpeedLine => rng.random_range(0.0..tuning.view_width),
                _ => tuning.view_width,
            };
            let mut p = Particle::spawn(Vec2::new(x, y), self.emission.kind, self.emission.color, rng);
            match p.kind {
                ParticleKind::Spark => p.vel = Vec2::new(-400.0, rng.random_range(-25.0..25.0)),
                ParticleKind::SpeedLine => {}
                _ => p.vel = Vec2::new(-rng.random_range(100.0..300.0), rng.random_range(-25.0..25.0)),
            }
            particles.push(p);
        }
    }

    /// End-of-run text summary
    pub fn profile(&self, score: u32, tuning: &Tuning) -> String {
        if score < 2 {
            return "Analysis incomplete.\nSubject hesitation detected.".to_string();
        }

        let mut profile = match self.persona {
            Persona::Stoic => "Subject exhibits high efficiency.\nMinimalist. Calm. In flow.",
            Persona::Ace => "Subject thrives on risk.\nHigh precision inputs detected.",
            Persona::Panic => "Subject unstable.\nErratic rhythm detected. Recommendation: Breathe.",
        }
        .to_string();

        let stats = self.stats(tuning);
        if !self.altitudes.is_empty() {
            let screen_pct = stats.altitude_mean / tuning.playable_height();
            if screen_pct < 0.3 {
                profile.push_str("\nPreference for high altitude indicating avoidance.");
            } else if screen_pct > 0.7 {
                profile.push_str("\nPreference for low altitude indicating grounding.");
            }
        }
        profile
    }
}
