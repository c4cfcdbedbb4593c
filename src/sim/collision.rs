//! Collision, graze and scoring tests
//!
//! Pure functions over the player body and obstacles. The body is treated as
//! an axis-aligned box; obstacles as two boxes around a gap.

use glam::Vec2;

use super::obstacle::{Obstacle, ObstacleField};
use super::player::PlayerBody;
use crate::tuning::Tuning;

/// Outcome of testing the body against the whole field for one tick
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// The body hit a pillar
    pub collided: bool,
    /// Points where new grazes were credited
    pub grazes: Vec<Vec2>,
    /// Obstacles newly passed
    pub passes: u32,
}

/// Horizontal extents of body and obstacle overlap
#[inline]
pub fn overlaps_horizontally(body: &PlayerBody, obstacle: &Obstacle) -> bool {
    body.right() > obstacle.x && body.left() < obstacle.right()
}

/// Body penetrates either pillar, ignoring `hit_margin` of its own edges
pub fn collides(body: &PlayerBody, obstacle: &Obstacle, hit_margin: f32) -> bool {
    if !overlaps_horizontally(body, obstacle) {
        return false;
    }
    body.top() + hit_margin < obstacle.gap_top() || body.bottom() - hit_margin > obstacle.gap_bottom()
}

/// Credit a near miss at most once per obstacle.
///
/// Distances are absolute, so a body far past one edge can still register
/// against the other edge; callers rule that out by testing collision first.
pub fn check_graze(body: &PlayerBody, obstacle: &mut Obstacle, tuning: &Tuning) -> bool {
    if obstacle.grazed || !overlaps_horizontally(body, obstacle) {
        return false;
    }
    if collides(body, obstacle, tuning.hit_margin) {
        return false;
    }

    let dist_to_top = body.top() - obstacle.gap_top();
    let dist_to_bottom = obstacle.gap_bottom() - body.bottom();
    if dist_to_top.abs() < tuning.graze_margin || dist_to_bottom.abs() < tuning.graze_margin {
        obstacle.grazed = true;
        return true;
    }
    false
}

/// Credit a pass once the body's leading edge clears the trailing edge
pub fn check_pass(body: &PlayerBody, obstacle: &mut Obstacle) -> bool {
    if obstacle.passed || body.right() <= obstacle.right() {
        return false;
    }
    obstacle.passed = true;
    true
}

/// Body has left the playable area by more than the allowed slack
pub fn out_of_bounds(body: &PlayerBody, tuning: &Tuning) -> bool {
    body.top() <= -tuning.boundary_margin
        || body.bottom() >= tuning.playable_height() + tuning.boundary_margin
}

/// Test the body against every obstacle.
///
/// Any collision ends evaluation before grazes or passes are looked at, so a
/// fatal tick never leaves an obstacle flagged without credit.
pub fn resolve(body: &PlayerBody, field: &mut ObstacleField, tuning: &Tuning) -> CollisionReport {
    let mut report = CollisionReport::default();

    if field.iter().any(|o| collides(body, o, tuning.hit_margin)) {
        report.collided = true;
        return report;
    }

    for obstacle in field.iter_mut() {
        if check_graze(body, obstacle, tuning) {
            let edge_y = if (body.top() - obstacle.gap_top()).abs()
                < (obstacle.gap_bottom() - body.bottom()).abs()
            {
                obstacle.gap_top()
            } else {
                obstacle.gap_bottom()
            };
            report.grazes.push(Vec2::new(body.pos.x, edge_y));
        }
        if check_pass(body, obstacle) {
            report.passes += 1;
        }
    }

    report
}
