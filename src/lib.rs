//! Eagle Soar - adaptive arcade flight simulation core
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (physics, obstacles, collisions, lifecycle, director)
//! - `presentation`: Per-frame render snapshot and camera parameters
//! - `audio`: Audio collaborator contract (cues + continuous parameters)
//! - `persistence`: Save data with corruption fallback
//! - `platform`: Logging init and edge-triggered input latch
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance
//! - `game`: Frame driver wiring the simulation to its collaborators

pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod presentation;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const SIM_HZ: f64 = 120.0;
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Largest wall-clock delta a single frame may feed the accumulator
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Storage key for save data
    pub const SAVE_KEY: &str = "flappy_eagle_save";
    /// Storage key for settings
    pub const SETTINGS_KEY: &str = "flappy_eagle_settings";
}

/// RGB color with 0-255 channels, kept as floats so it can be blended
pub type Color = Vec3;

/// Build a color from 8-bit channels
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Vec3::new(r as f32, g as f32, b as f32)
}

/// Build a color from a 0xRRGGBB literal
#[inline]
pub const fn hex(value: u32) -> Color {
    rgb(
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    )
}

/// Exponential approach: move `current` toward `target` by `dt * rate` of the gap.
///
/// The step factor is capped at 1 so large frames land on the target instead of
/// overshooting it.
#[inline]
pub fn approach(current: Color, target: Color, dt: f32, rate: f32) -> Color {
    let k = (dt * rate).clamp(0.0, 1.0);
    current + (target - current) * k
}

/// Scalar version of [`approach`]
#[inline]
pub fn approach_f32(current: f32, target: f32, dt: f32, rate: f32) -> f32 {
    let k = (dt * rate).clamp(0.0, 1.0);
    current + (target - current) * k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        let c = hex(0x7dd3fc);
        assert_eq!(c, Vec3::new(125.0, 211.0, 252.0));
    }

    #[test]
    fn test_approach_never_overshoots() {
        let a = Vec3::ZERO;
        let b = Vec3::splat(100.0);
        let half = approach(a, b, 0.25, 2.0);
        assert!((half.x - 50.0).abs() < 1e-4);
        // dt * rate > 1 lands exactly on target
        assert_eq!(approach(a, b, 1.0, 2.0), b);
    }
}
