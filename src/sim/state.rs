//! Session state and lifecycle types
//!
//! Everything a run needs lives in [`GameSession`]; restart rebuilds it
//! wholesale except for the director, seed stream and tuning.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::director::{AdaptiveDirector, Persona, Weather};
use super::obstacle::ObstacleField;
use super::particles::{ParticleKind, ParticleSystem};
use super::player::PlayerBody;
use crate::tuning::Tuning;

/// Feathers thrown on impact
const IMPACT_FEATHERS: usize = 15;
/// Debris chunks thrown on impact
const IMPACT_DEBRIS: usize = 10;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Hovering, waiting for the first tap
    Intro,
    /// Active flight
    Playing,
    /// Impact freeze and slow-motion settle
    Dying,
    /// Run ended, waiting for a restart tap
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Ceiling,
    Floor,
    Obstacle,
}

/// Events produced by a tick, drained by the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Flap,
    Score { score: u32 },
    Graze { combo: u32, pos: Vec2 },
    SoarBegin,
    SoarEnd,
    Died { cause: DeathCause, score: u32, reward: u64 },
    WeatherChanged(Weather),
    PersonaChanged(Persona),
}

/// Combo bonus: faster scrolling and spawning for a limited time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoarState {
    pub active: bool,
    /// Seconds left while active, zero otherwise
    pub remaining: f32,
}

impl SoarState {
    /// Remaining below this counts as expired
    const EXPIRY_EPSILON: f32 = 1e-3;

    pub fn activate(&mut self, duration: f32) {
        self.active = true;
        self.remaining = duration;
    }

    /// Count down; returns true on the tick soar ends
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= Self::EXPIRY_EPSILON {
            self.active = false;
            self.remaining = 0.0;
            return true;
        }
        false
    }

    pub fn speed_multiplier(&self, tuning: &Tuning) -> f32 {
        if self.active { tuning.soar_speed_multiplier } else { 1.0 }
    }
}

/// One run of the game plus the state that outlives restarts
#[derive(Debug, Clone)]
pub struct GameSession {
    pub phase: GamePhase,
    pub score: u32,
    /// Grazes this run
    pub combo: u32,
    pub soar: SoarState,
    /// Fraction of real time the world advances at (0..=1)
    pub time_scale: f32,
    /// Unscaled seconds since death
    pub death_elapsed: f32,
    /// Cumulative distance (meters)
    pub distance: f32,
    /// Unscaled simulation seconds since the session was created
    pub sim_time: f64,
    /// Scroll speed on the last tick (pixels/s)
    pub speed: f32,
    /// Wind intensity on the last tick (0..1)
    pub wind: f32,
    /// Feathers awarded for the finished run
    pub reward: u64,
    pub player: PlayerBody,
    pub field: ObstacleField,
    pub particles: ParticleSystem,
    pub director: AdaptiveDirector,
    /// Persona ambient particle density multiplier
    pub ambient_density: f32,
    /// Rain and snow density multiplier
    pub weather_density: f32,
    pub tuning: Tuning,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        log::info!("New session (seed {seed})");
        Self {
            phase: GamePhase::Intro,
            score: 0,
            combo: 0,
            soar: SoarState::default(),
            time_scale: 1.0,
            death_elapsed: 0.0,
            distance: 0.0,
            sim_time: 0.0,
            speed: 0.0,
            wind: 0.0,
            reward: 0,
            player: PlayerBody::new(&tuning),
            field: ObstacleField::new(),
            particles: ParticleSystem::new(),
            director: AdaptiveDirector::new(),
            ambient_density: 1.0,
            weather_density: 1.0,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Back to the intro with a fresh run
    pub fn restart(&mut self) {
        log::info!("Restart after score {} ({:.0} m)", self.score, self.distance);
        self.phase = GamePhase::Intro;
        self.score = 0;
        self.combo = 0;
        self.soar = SoarState::default();
        self.time_scale = 1.0;
        self.death_elapsed = 0.0;
        self.distance = 0.0;
        self.speed = 0.0;
        self.reward = 0;
        self.player = PlayerBody::new(&self.tuning);
        self.field = ObstacleField::new();
        self.particles.clear();
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.soar.speed_multiplier(&self.tuning)
    }

    /// Feathers earned for a distance
    pub fn reward_for(&self, distance: f32) -> u64 {
        (distance / self.tuning.feather_distance).floor().max(0.0) as u64
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter the death sequence
    pub(crate) fn die(&mut self, cause: DeathCause) {
        self.phase = GamePhase::Dying;
        self.death_elapsed = 0.0;
        self.time_scale = 0.0;
        self.player.alive = false;
        self.reward = self.reward_for(self.distance);

        let pos = self.player.pos;
        self.particles
            .emit(pos, ParticleKind::Feather, IMPACT_FEATHERS, &mut self.rng);
        self.particles
            .emit(pos, ParticleKind::Debris, IMPACT_DEBRIS, &mut self.rng);

        log::info!(
            "Died ({:?}): score {}, {:.0} m, {} feathers",
            cause,
            self.score,
            self.distance,
            self.reward
        );
        self.push_event(GameEvent::Died {
            cause,
            score: self.score,
            reward: self.reward,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_in_intro() {
        let session = GameSession::new(7, Tuning::default());
        assert_eq!(session.phase, GamePhase::Intro);
        assert_eq!(session.score, 0);
        assert!(session.player.alive);
        assert!(session.field.is_empty());
        assert_eq!(session.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_soar_counts_down_then_expires() {
        let tuning = Tuning::default();
        let mut soar = SoarState::default();
        assert!(!soar.tick(1.0));
        soar.activate(tuning.soar_duration);
        assert_eq!(soar.speed_multiplier(&tuning), 2.0);

        let mut last = soar.remaining;
        while soar.active {
            let ended = soar.tick(0.25);
            assert!(soar.remaining < last);
            last = soar.remaining;
            if ended {
                assert_eq!(soar.remaining, 0.0);
            }
        }
        assert_eq!(soar.speed_multiplier(&tuning), 1.0);
    }

    #[test]
    fn test_reward_is_floored() {
        let session = GameSession::new(1, Tuning::default());
        assert_eq!(session.reward_for(0.0), 0);
        assert_eq!(session.reward_for(9.9), 0);
        assert_eq!(session.reward_for(125.0), 12);
    }

    #[test]
    fn test_death_records_reward_and_event() {
        let mut session = GameSession::new(2, Tuning::default());
        session.phase = GamePhase::Playing;
        session.distance = 57.0;
        session.score = 3;
        session.die(DeathCause::Floor);
        assert_eq!(session.phase, GamePhase::Dying);
        assert!(!session.player.alive);
        assert_eq!(session.time_scale, 0.0);
        assert_eq!(session.reward, 5);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::Died {
                cause: DeathCause::Floor,
                score: 3,
                reward: 5
            }]
        );
        assert!(session.drain_events().is_empty());
        assert_eq!(session.particles.len(), IMPACT_FEATHERS + IMPACT_DEBRIS);
    }

    #[test]
    fn test_restart_resets_run_but_keeps_director() {
        let mut session = GameSession::new(3, Tuning::default());
        session.director.persona.persona = Persona::Ace;
        session.score = 9;
        session.combo = 6;
        session.soar.activate(2.0);
        session.distance = 400.0;
        session.die(DeathCause::Obstacle);
        session.restart();

        assert_eq!(session.phase, GamePhase::Intro);
        assert_eq!(session.score, 0);
        assert_eq!(session.combo, 0);
        assert!(!session.soar.active);
        assert_eq!(session.distance, 0.0);
        assert!(session.player.alive);
        assert!(session.particles.is_empty());
        assert_eq!(session.director.persona.persona, Persona::Ace);
    }
}
