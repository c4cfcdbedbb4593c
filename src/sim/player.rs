//! The controllable body
//!
//! Vertical-only flight: gravity, linear drag, a terminal-velocity clamp and a
//! dive modifier that trades control for speed. Horizontal position is fixed;
//! the world scrolls past instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::approach_f32;
use crate::tuning::Tuning;

/// Vertical limits for the body's hitbox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest allowed y for the body's top edge
    pub ceiling: f32,
    /// Largest allowed y for the body's bottom edge
    pub floor: f32,
}

/// Which limit, if any, the body was clamped against this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryContact {
    None,
    Ceiling,
    Floor,
}

/// The player's eagle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Hitbox center
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub velocity: f32,
    /// Pose angle in radians (positive is nose down)
    pub rotation: f32,
    pub alive: bool,
    pub half_extent: Vec2,
    /// Dive modifier was in effect on the last tick
    pub diving: bool,
}

impl PlayerBody {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.player_home(),
            velocity: 0.0,
            rotation: 0.0,
            alive: true,
            half_extent: tuning.player_half_extent,
            diving: false,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.half_extent.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_extent.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.half_extent.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.half_extent.x
    }

    /// Kick upward. Returns false (and does nothing) once dead.
    pub fn flap(&mut self, tuning: &Tuning) -> bool {
        if !self.alive {
            return false;
        }
        self.velocity = tuning.flap_impulse;
        true
    }

    /// Fall-speed clamp for the current dive state
    pub fn terminal_bound(&self, tuning: &Tuning) -> f32 {
        if self.diving {
            tuning.terminal_velocity * tuning.dive_terminal_factor
        } else {
            tuning.terminal_velocity
        }
    }

    /// Idle bob used before the first flap
    pub fn hover(&mut self, tuning: &Tuning, sim_time: f64) {
        let home = tuning.player_home();
        let phase = (sim_time / tuning.hover_period as f64).sin() as f32;
        self.pos = Vec2::new(home.x, home.y + phase * tuning.hover_amplitude);
        self.velocity = 0.0;
        self.rotation = 0.0;
        self.diving = false;
    }

    /// Integrate one step of flight physics and clamp against `bounds`
    pub fn tick(&mut self, dt: f32, dive_held: bool, bounds: Bounds, tuning: &Tuning) -> BoundaryContact {
        if dt <= 0.0 {
            return BoundaryContact::None;
        }

        // Dive only engages once already falling
        self.diving = dive_held && self.velocity > 0.0;
        let gravity = if self.diving {
            tuning.gravity * tuning.dive_gravity_factor
        } else {
            tuning.gravity
        };
        let terminal = self.terminal_bound(tuning);

        self.velocity += gravity * dt;
        self.velocity -= self.velocity * tuning.drag * dt;
        self.velocity = self.velocity.clamp(-terminal, terminal);
        self.pos.y += self.velocity * dt;

        self.update_rotation(dt, tuning);
        self.clamp_to(bounds)
    }

    fn update_rotation(&mut self, dt: f32, tuning: &Tuning) {
        let climb_limit = tuning.climb_angle_deg.to_radians();
        if self.velocity < 0.0 {
            self.rotation = approach_f32(self.rotation, -climb_limit, dt, tuning.climb_turn_rate)
                .clamp(-climb_limit, climb_limit);
        } else {
            let rate = if self.diving {
                tuning.dive_turn_rate
            } else {
                tuning.fall_turn_rate
            };
            let dive_angle = tuning.dive_angle_deg.to_radians();
            self.rotation = (self.rotation + rate * dt).min(dive_angle);
        }
    }

    fn clamp_to(&mut self, bounds: Bounds) -> BoundaryContact {
        if self.top() <= bounds.ceiling {
            self.pos.y = bounds.ceiling + self.half_extent.y;
            self.velocity = 0.0;
            BoundaryContact::Ceiling
        } else if self.bottom() >= bounds.floor {
            self.pos.y = bounds.floor - self.half_extent.y;
            self.velocity = 0.0;
            BoundaryContact::Floor
        } else {
            BoundaryContact::None
        }
    }
}
