//! Audio collaborator contract
//!
//! The simulation never synthesizes sound. It reports cues and continuous
//! parameters to an [`AudioSink`]; a missing backend is simply [`NullAudio`].

use crate::sim::{GameEvent, Weather};

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Wing beat
    Flap,
    /// Obstacle passed
    Score,
    /// Body destroyed
    Crash,
    /// Near miss
    Graze,
    /// Soar bonus started
    SoarBegin,
    /// Heavy hit-stop thud on death
    Impact,
}

impl AudioCue {
    /// Cues a simulation event should trigger, in play order
    pub fn for_event(event: &GameEvent) -> &'static [AudioCue] {
        match event {
            GameEvent::Flap => &[AudioCue::Flap],
            GameEvent::Score { .. } => &[AudioCue::Score],
            GameEvent::Graze { .. } => &[AudioCue::Graze],
            GameEvent::SoarBegin => &[AudioCue::SoarBegin],
            GameEvent::Died { .. } => &[AudioCue::Impact, AudioCue::Crash],
            GameEvent::SoarEnd | GameEvent::WeatherChanged(_) | GameEvent::PersonaChanged(_) => &[],
        }
    }
}

/// Fire-and-forget audio backend
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);

    /// Continuous wind level (0..1)
    fn update_wind(&mut self, intensity: f32);

    fn set_weather(&mut self, weather: Weather);
}

/// Backend used when audio is unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}

    fn update_wind(&mut self, _intensity: f32) {}

    fn set_weather(&mut self, _weather: Weather) {}
}

/// Backend that only logs cues, for headless runs
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    muted: bool,
    wind: f32,
    weather: Option<Weather>,
    /// Cues played so far
    pub played: u64,
}

impl LogAudio {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            ..Self::default()
        }
    }

    pub fn wind(&self) -> f32 {
        self.wind
    }

    pub fn weather(&self) -> Option<Weather> {
        self.weather
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        if self.muted {
            return;
        }
        self.played += 1;
        log::debug!("audio: {cue:?}");
    }

    fn update_wind(&mut self, intensity: f32) {
        self.wind = intensity.clamp(0.0, 1.0);
    }

    fn set_weather(&mut self, weather: Weather) {
        if self.weather != Some(weather) {
            log::debug!("audio: weather bed {weather:?}");
        }
        self.weather = Some(weather);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DeathCause;

    #[test]
    fn test_death_plays_impact_then_crash() {
        let event = GameEvent::Died {
            cause: DeathCause::Floor,
            score: 1,
            reward: 0,
        };
        assert_eq!(AudioCue::for_event(&event), &[AudioCue::Impact, AudioCue::Crash]);
        assert!(AudioCue::for_event(&GameEvent::SoarEnd).is_empty());
    }

    #[test]
    fn test_muted_log_audio_counts_nothing() {
        let mut audio = LogAudio::new(true);
        audio.play(AudioCue::Flap);
        assert_eq!(audio.played, 0);

        let mut audio = LogAudio::new(false);
        audio.play(AudioCue::Flap);
        audio.update_wind(3.0);
        audio.set_weather(Weather::Snow);
        assert_eq!(audio.played, 1);
        assert_eq!(audio.wind(), 1.0);
        assert_eq!(audio.weather(), Some(Weather::Snow));
    }
}
