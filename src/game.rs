//! Frame driver
//!
//! Owns the session and its collaborators. Each frame feeds wall time into
//! the fixed-step clock, runs the resulting ticks, routes the events they
//! produce, and presents exactly once.

use crate::audio::{AudioCue, AudioSink};
use crate::consts::{MAX_FRAME_DT, SIM_HZ};
use crate::persistence::ProgressStore;
use crate::platform::InputLatch;
use crate::presentation::camera::{GRAZE_SHAKE, IMPACT_SHAKE};
use crate::presentation::{CameraRig, Frame, Renderer};
use crate::settings::Settings;
use crate::sim::{FixedStep, GameEvent, GamePhase, GameSession, TickInput, tick};
use crate::tuning::Tuning;

/// Session plus collaborators
pub struct Game<A: AudioSink, P: ProgressStore, R: Renderer> {
    session: GameSession,
    clock: FixedStep,
    input: InputLatch,
    camera: CameraRig,
    settings: Settings,
    audio: A,
    progress: P,
    renderer: R,
}

impl<A: AudioSink, P: ProgressStore, R: Renderer> Game<A, P, R> {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings, audio: A, progress: P, renderer: R) -> Self {
        let mut session = GameSession::new(seed, tuning);
        session.ambient_density = settings.ambient_density();
        session.weather_density = settings.weather_density();
        Self {
            session,
            clock: FixedStep::from_hz(SIM_HZ),
            input: InputLatch::new(),
            camera: CameraRig::new(settings.effective_screen_shake()),
            settings,
            audio,
            progress,
            renderer,
        }
    }

    /// Tap/flap button went down
    pub fn press(&mut self) {
        self.input.press();
    }

    pub fn release(&mut self) {
        self.input.release();
    }

    /// Run one frame of `elapsed` wall seconds; returns the ticks executed
    pub fn frame(&mut self, elapsed: f32) -> u32 {
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        let ticks = self.clock.advance(elapsed as f64);
        for _ in 0..ticks {
            let input = TickInput {
                tap: self.input.take_tap(),
                dive_held: self.input.held(),
            };
            let before = self.session.phase;
            tick(&mut self.session, &input, self.clock.fixed_dt());
            if before == GamePhase::GameOver && self.session.phase == GamePhase::Intro {
                self.camera.reset();
            }
            self.dispatch_events();
            self.audio.update_wind(self.session.wind);
        }

        let player = &self.session.player;
        self.camera.update(
            elapsed,
            player.velocity,
            player.pos.y,
            self.session.soar.active,
            &self.session.tuning,
        );
        let frame = Frame::capture(&self.session, self.camera.view());
        self.renderer.present(&frame);
        ticks
    }

    fn dispatch_events(&mut self) {
        for event in self.session.drain_events() {
            for cue in AudioCue::for_event(&event) {
                self.audio.play(*cue);
            }
            match event {
                GameEvent::Died { score, reward, .. } => {
                    self.camera.shake(IMPACT_SHAKE);
                    self.progress.add_progress(reward);
                    self.progress.record_score(score);
                }
                GameEvent::Graze { .. } => self.camera.shake(GRAZE_SHAKE),
                GameEvent::WeatherChanged(weather) => self.audio.set_weather(weather),
                GameEvent::Flap
                | GameEvent::Score { .. }
                | GameEvent::SoarBegin
                | GameEvent::SoarEnd
                | GameEvent::PersonaChanged(_) => {}
            }
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::persistence::{MemoryStorage, SaveManager};
    use crate::presentation::HeadlessRenderer;
    use crate::sim::{ParticleKind, Weather};

    #[derive(Default)]
    struct RecordingAudio {
        cues: Vec<AudioCue>,
        wind_updates: u32,
        weather: Vec<Weather>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: AudioCue) {
            self.cues.push(cue);
        }

        fn update_wind(&mut self, _intensity: f32) {
            self.wind_updates += 1;
        }

        fn set_weather(&mut self, weather: Weather) {
            self.weather.push(weather);
        }
    }

    type TestGame = Game<RecordingAudio, SaveManager<MemoryStorage>, HeadlessRenderer>;

    fn game() -> TestGame {
        Game::new(
            99,
            Tuning::default(),
            Settings::default(),
            RecordingAudio::default(),
            SaveManager::load(MemoryStorage::new()),
            HeadlessRenderer::default(),
        )
    }

    #[test]
    fn test_one_present_per_frame() {
        let mut game = game();
        assert_eq!(game.frame(1.0 / 60.0), 2);
        assert_eq!(game.frame(0.001), 0);
        assert_eq!(game.renderer().frames, 2);
        assert_eq!(game.audio().wind_updates, 2);
        assert_eq!(game.audio().weather.len(), 1);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut game = game();
        assert_eq!(game.frame(1.0), 6);
        assert_eq!(game.frame(f32::NAN), 0);
    }

    #[test]
    fn test_tap_consumed_by_one_tick() {
        let mut game = game();
        game.press();
        game.frame(1.0 / 60.0);
        assert_eq!(game.session().phase, GamePhase::Playing);
        let flaps = game.audio().cues.iter().filter(|c| **c == AudioCue::Flap).count();
        assert_eq!(flaps, 1);
    }

    #[test]
    fn test_death_credits_progress_once() {
        let mut game = game();
        game.press();
        game.frame(1.0 / 60.0);
        game.release();
        let mut frames = 0;
        while game.session().phase == GamePhase::Playing && frames < 600 {
            game.frame(1.0 / 60.0);
            frames += 1;
        }
        assert_eq!(game.session().phase, GamePhase::Dying);
        for _ in 0..120 {
            game.frame(1.0 / 60.0);
        }
        assert_eq!(game.session().phase, GamePhase::GameOver);

        let crashes = game.audio().cues.iter().filter(|c| **c == AudioCue::Crash).count();
        assert_eq!(crashes, 1);
        assert_eq!(game.progress().data().feathers, game.session().reward);
        assert!(game.renderer().last_hud.as_ref().is_some_and(|h| h.profile.is_some()));
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut game = game();
        game.press();
        game.frame(1.0 / 60.0);
        game.release();
        while game.session().phase != GamePhase::GameOver {
            game.frame(1.0 / 60.0);
        }
        for _ in 0..60 {
            game.frame(1.0 / 60.0);
        }
        game.press();
        game.frame(1.0 / 60.0);
        assert_eq!(game.session().phase, GamePhase::Intro);
    }

    #[test]
    fn test_weather_off_keeps_persona_particles() {
        let settings = Settings {
            weather_effects: false,
            ..Settings::default()
        };
        let mut game = Game::new(
            7,
            Tuning::default(),
            settings,
            RecordingAudio::default(),
            SaveManager::load(MemoryStorage::new()),
            HeadlessRenderer::default(),
        );
        assert_eq!(game.session().weather_density, 0.0);
        assert_eq!(game.session().ambient_density, 0.6);

        for _ in 0..60 {
            game.frame(1.0 / 60.0);
        }
        let particles = &game.session().particles;
        assert!(particles.iter().any(|p| p.kind == ParticleKind::Dust));
        assert!(
            particles
                .iter()
                .all(|p| !matches!(p.kind, ParticleKind::Rain | ParticleKind::Snow))
        );
    }

    #[test]
    fn test_runs_without_audio() {
        let mut game = Game::new(
            11,
            Tuning::default(),
            Settings::default(),
            NullAudio,
            SaveManager::load(MemoryStorage::new()),
            HeadlessRenderer::default(),
        );
        game.press();
        game.frame(1.0 / 60.0);
        game.release();
        while game.session().phase != GamePhase::GameOver {
            game.frame(1.0 / 60.0);
        }
        assert_eq!(game.progress().data().feathers, game.session().reward);
        assert!(game.progress().data().high_score >= game.session().score);
    }
}
