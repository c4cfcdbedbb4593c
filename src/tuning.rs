//! Data-driven game balance
//!
//! Every gameplay constant lives here so feel can be tuned without touching the
//! simulation. Partial JSON overrides are accepted; missing fields keep defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === View ===
    /// Logical view width (pixels)
    pub view_width: f32,
    /// Logical view height including the ground strip
    pub view_height: f32,
    /// Height of the ground strip at the bottom of the view
    pub ground_height: f32,
    /// Conversion from scrolled pixels to distance meters
    pub meters_per_pixel: f32,

    // === Player ===
    /// Player x as a fraction of the view width
    pub player_x_ratio: f32,
    /// Half extents of the player hitbox
    pub player_half_extent: Vec2,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Velocity set by a flap (negative is up)
    pub flap_impulse: f32,
    /// Linear drag coefficient (1/s)
    pub drag: f32,
    /// Fall-speed clamp while not diving
    pub terminal_velocity: f32,
    /// Gravity multiplier while diving
    pub dive_gravity_factor: f32,
    /// Terminal velocity multiplier while diving
    pub dive_terminal_factor: f32,
    /// Nose-up angle while climbing (degrees, magnitude of the rising clamp)
    pub climb_angle_deg: f32,
    /// Nose-down angle approached while falling (degrees)
    pub dive_angle_deg: f32,
    /// Easing rate toward the climb angle (1/s)
    pub climb_turn_rate: f32,
    /// Angular speed toward the dive angle while falling (rad/s)
    pub fall_turn_rate: f32,
    /// Angular speed toward the dive angle while diving (rad/s)
    pub dive_turn_rate: f32,
    /// Idle hover amplitude during the intro (pixels)
    pub hover_amplitude: f32,
    /// Idle hover period divisor (seconds per radian)
    pub hover_period: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub gap_height: f32,
    /// Minimum height of both top and bottom segments
    pub min_segment: f32,
    /// Scroll speed at distance zero (pixels/s)
    pub base_speed: f32,
    /// Extra scroll speed per meter traveled (pixels/s per m)
    pub speed_ramp: f32,
    /// Seconds between spawns at multiplier 1
    pub spawn_interval: f32,
    /// Extra distance past the left edge before an obstacle is culled
    pub cull_buffer: f32,

    // === Collision ===
    /// Inward shrink of the player hitbox against obstacles
    pub hit_margin: f32,
    /// Distance from a gap edge that counts as a graze
    pub graze_margin: f32,
    /// Slack beyond the playable area before a boundary hit is lethal
    pub boundary_margin: f32,

    // === Soar ===
    pub soar_threshold: u32,
    pub soar_duration: f32,
    pub soar_speed_multiplier: f32,

    // === Death cadence ===
    /// Full freeze right after impact (seconds)
    pub impact_freeze: f32,
    /// Slow-motion window after the freeze (seconds)
    pub settle_duration: f32,
    /// Time scale during the slow-motion window
    pub settle_time_scale: f32,
    /// Minimum death-sequence time before a restart tap is accepted
    pub restart_delay: f32,
    /// Meters per feather awarded at death
    pub feather_distance: f32,

    // === Director: environment ===
    /// Meters per dawn/noon/dusk cycle
    pub day_length: f32,
    pub weather_min_duration: f32,
    pub weather_max_duration: f32,
    /// Relative weights for clear, rain, snow
    pub weather_weights: [f32; 3],
    /// Precipitation particles per second (per-frame chance at 60 fps)
    pub rain_rate: f32,
    pub snow_rate: f32,

    // === Director: persona ===
    /// Flap history window (seconds)
    pub flap_window: f32,
    /// Maximum altitude samples kept, one per tick (10 s at 120 Hz)
    pub altitude_samples: usize,
    /// Seconds between periodic re-classifications
    pub analysis_interval: f32,
    /// Palette easing rate (1/s)
    pub palette_blend_rate: f32,
    pub panic_flap_rate: f32,
    pub panic_altitude_std: f32,
    pub ace_flap_rate: f32,
    pub ace_min_score: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            view_width: 1000.0,
            view_height: 700.0,
            ground_height: 100.0,
            meters_per_pixel: 0.1,

            player_x_ratio: 0.3,
            player_half_extent: Vec2::new(20.0, 20.0),
            gravity: 1500.0,
            flap_impulse: -450.0,
            drag: 0.6,
            terminal_velocity: 600.0,
            dive_gravity_factor: 2.5,
            dive_terminal_factor: 2.0,
            climb_angle_deg: 25.0,
            dive_angle_deg: 90.0,
            climb_turn_rate: 10.0,
            fall_turn_rate: 2.5,
            dive_turn_rate: 6.0,
            hover_amplitude: 5.0,
            hover_period: 0.3,

            obstacle_width: 90.0,
            gap_height: 220.0,
            min_segment: 50.0,
            base_speed: 200.0,
            speed_ramp: 0.1,
            spawn_interval: 1.8,
            cull_buffer: 100.0,

            hit_margin: 10.0,
            graze_margin: 50.0,
            boundary_margin: 10.0,

            soar_threshold: 5,
            soar_duration: 5.0,
            soar_speed_multiplier: 2.0,

            impact_freeze: 0.1,
            settle_duration: 0.4,
            settle_time_scale: 0.5,
            restart_delay: 0.6,
            feather_distance: 10.0,

            day_length: 1000.0,
            weather_min_duration: 10.0,
            weather_max_duration: 30.0,
            weather_weights: [0.5, 0.3, 0.2],
            rain_rate: 48.0,
            snow_rate: 18.0,

            flap_window: 10.0,
            altitude_samples: 1200,
            analysis_interval: 1.0,
            palette_blend_rate: 2.0,
            panic_flap_rate: 2.5,
            panic_altitude_std: 150.0,
            ace_flap_rate: 1.5,
            ace_min_score: 5,
        }
    }
}

impl Tuning {
    /// Parse a JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse an optional override, falling back to defaults on any problem
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Some(Err(err)) => {
                log::warn!("Ignoring tuning override: {err}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Reject values that would stall or invert the simulation.
    ///
    /// Infeasible obstacle geometry is not an error: spawning clamps it.
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        positive("view_width", self.view_width)?;
        positive("view_height", self.view_height)?;
        positive("meters_per_pixel", self.meters_per_pixel)?;
        positive("terminal_velocity", self.terminal_velocity)?;
        positive("spawn_interval", self.spawn_interval)?;
        positive("soar_speed_multiplier", self.soar_speed_multiplier)?;
        positive("day_length", self.day_length)?;
        positive("flap_window", self.flap_window)?;
        positive("analysis_interval", self.analysis_interval)?;
        positive("feather_distance", self.feather_distance)?;

        if self.ground_height < 0.0 || self.ground_height >= self.view_height {
            return Err(TuningError::Invalid {
                field: "ground_height",
                reason: "must leave a playable area above the ground",
            });
        }
        if self.gravity < 0.0 || self.drag < 0.0 {
            return Err(TuningError::Invalid {
                field: "gravity",
                reason: "gravity and drag cannot be negative",
            });
        }
        if self.dive_gravity_factor <= 1.0 || self.dive_terminal_factor <= 1.0 {
            return Err(TuningError::Invalid {
                field: "dive_gravity_factor",
                reason: "diving must accelerate harder than falling",
            });
        }
        if self.weather_min_duration > self.weather_max_duration || self.weather_min_duration <= 0.0 {
            return Err(TuningError::Invalid {
                field: "weather_min_duration",
                reason: "must be positive and not exceed weather_max_duration",
            });
        }
        if self.weather_weights.iter().any(|w| *w < 0.0) || self.weather_weights.iter().sum::<f32>() <= 0.0 {
            return Err(TuningError::Invalid {
                field: "weather_weights",
                reason: "weights must be non-negative with a positive sum",
            });
        }
        if !(0.0..=1.0).contains(&self.settle_time_scale) {
            return Err(TuningError::Invalid {
                field: "settle_time_scale",
                reason: "must lie in [0, 1]",
            });
        }
        if self.soar_threshold == 0 {
            return Err(TuningError::Invalid {
                field: "soar_threshold",
                reason: "must be at least one graze",
            });
        }
        Ok(())
    }

    /// Height of the flyable area above the ground line
    #[inline]
    pub fn playable_height(&self) -> f32 {
        self.view_height - self.ground_height
    }

    /// Resting position of the player (intro hover center)
    #[inline]
    pub fn player_home(&self) -> Vec2 {
        Vec2::new(self.view_width * self.player_x_ratio, self.playable_height() / 2.0)
    }

    /// Total length of the death sequence before the final freeze
    #[inline]
    pub fn death_sequence_length(&self) -> f32 {
        self.impact_freeze + self.settle_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.playable_height(), 600.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 900.0, "soar_threshold": 3 }"#).unwrap();
        assert_eq!(tuning.gravity, 900.0);
        assert_eq!(tuning.soar_threshold, 3);
        assert_eq!(tuning.gap_height, Tuning::default().gap_height);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = Tuning::from_json(r#"{ "spawn_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "spawn_interval", .. }));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let tuning = Tuning::load_or_default(Some(r#"{ "dive_gravity_factor": 0.5 }"#));
        assert_eq!(tuning, Tuning::default());
        assert_eq!(Tuning::load_or_default(None), Tuning::default());
    }

    #[test]
    fn test_frame_based_rates_share_one_basis() {
        // Per-frame chances at 60 fps, windows in seconds of simulation
        let tuning = Tuning::default();
        assert!((tuning.rain_rate / 60.0 - 0.8).abs() < 1e-6);
        assert!((tuning.snow_rate / 60.0 - 0.3).abs() < 1e-6);
        let altitude_window = tuning.altitude_samples as f64 / crate::consts::SIM_HZ;
        assert_eq!(altitude_window, tuning.flap_window as f64);
    }
}
