//! Camera parameters
//!
//! Only the numbers a renderer needs: zoom, shake strength and vertical pan.
//! The transform itself is the renderer's business.

use serde::{Deserialize, Serialize};

use crate::approach_f32;
use crate::tuning::Tuning;

/// Fall speed beyond which the camera pulls back
const FAST_FALL_VELOCITY: f32 = 400.0;
/// Climb speed beyond which the camera pushes in
const FAST_CLIMB_VELOCITY: f32 = -200.0;
const FALL_ZOOM: f32 = 0.9;
const CLIMB_ZOOM: f32 = 1.05;
const SOAR_ZOOM: f32 = 0.95;
/// Zoom and pan easing rate (1/s)
const EASE_RATE: f32 = 2.0;
/// Shake strength lost per second
const SHAKE_DECAY: f32 = 30.0;
/// Anchor height (fraction of view) the pan keeps the body near
const PAN_ANCHOR: f32 = 0.4;
/// How much of the offset from the anchor the pan follows
const PAN_FOLLOW: f32 = 0.3;

/// Shake for a death impact
pub const IMPACT_SHAKE: f32 = 20.0;
/// Shake for a graze
pub const GRAZE_SHAKE: f32 = 4.0;

/// Snapshot handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub zoom: f32,
    /// Max random offset in pixels
    pub shake: f32,
    /// Vertical offset; positive moves the view down
    pub pan_y: f32,
}

/// Eased camera state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    zoom: f32,
    target_zoom: f32,
    shake: f32,
    pan_y: f32,
    shake_enabled: bool,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            target_zoom: 1.0,
            shake: 0.0,
            pan_y: 0.0,
            shake_enabled: true,
        }
    }
}

impl CameraRig {
    pub fn new(shake_enabled: bool) -> Self {
        Self {
            shake_enabled,
            ..Self::default()
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.shake_enabled);
    }

    /// Start a shake; a weaker request never cuts a stronger one short
    pub fn shake(&mut self, amount: f32) {
        if self.shake_enabled {
            self.shake = self.shake.max(amount);
        }
    }

    /// Ease toward the framing for the body's current motion
    pub fn update(&mut self, dt: f32, velocity: f32, altitude: f32, soaring: bool, tuning: &Tuning) {
        self.target_zoom = if velocity > FAST_FALL_VELOCITY {
            FALL_ZOOM
        } else if velocity < FAST_CLIMB_VELOCITY {
            CLIMB_ZOOM
        } else if soaring {
            SOAR_ZOOM
        } else {
            1.0
        };
        self.zoom = approach_f32(self.zoom, self.target_zoom, dt, EASE_RATE);

        self.shake = (self.shake - SHAKE_DECAY * dt).max(0.0);

        let target_pan = (altitude - tuning.view_height * PAN_ANCHOR) * PAN_FOLLOW;
        self.pan_y = approach_f32(self.pan_y, target_pan, dt, EASE_RATE);
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            zoom: self.zoom,
            shake: self.shake,
            pan_y: self.pan_y,
        }
    }
}
