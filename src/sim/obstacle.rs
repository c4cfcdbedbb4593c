//! Paired obstacles and the field that spawns, scrolls and culls them
//!
//! Each obstacle is a top and a bottom pillar around a passable gap. The gap
//! height is constant; only the gap center is randomized, inside a band that
//! keeps both pillars at least `min_segment` tall.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Color;
use crate::tuning::Tuning;

/// A pillar pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Leading (left) edge
    pub x: f32,
    pub gap_center: f32,
    pub gap_height: f32,
    pub width: f32,
    pub color: Color,
    /// Graze credit already awarded
    pub grazed: bool,
    /// Score credit already awarded
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_center: f32, gap_height: f32, width: f32, color: Color) -> Self {
        Self {
            x,
            gap_center,
            gap_height,
            width,
            color,
            grazed: false,
            passed: false,
        }
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge of the top pillar
    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap_height / 2.0
    }

    /// Top edge of the bottom pillar
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap_height / 2.0
    }

    /// Height of the top pillar
    #[inline]
    pub fn top_segment(&self) -> f32 {
        self.gap_top()
    }

    /// Height of the bottom pillar above the ground line
    #[inline]
    pub fn bottom_segment(&self, playable_height: f32) -> f32 {
        playable_height - self.gap_bottom()
    }
}

/// Scroll speed for the given distance and soar multiplier
pub fn effective_speed(tuning: &Tuning, distance: f32, speed_multiplier: f32) -> f32 {
    (tuning.base_speed + tuning.speed_ramp * distance) * speed_multiplier
}

/// Pick a gap center (and the gap height actually used).
///
/// When the configured geometry cannot fit both minimum segments, the gap is
/// pinned to the middle of the playable area instead of producing an
/// impossible obstacle.
pub fn choose_gap<R: Rng>(tuning: &Tuning, rng: &mut R) -> (f32, f32) {
    let playable = tuning.playable_height();
    let gap = tuning.gap_height.min(playable);
    let half = gap / 2.0;
    let lo = tuning.min_segment + half;
    let hi = playable - tuning.min_segment - half;

    if hi >= lo {
        (rng.random_range(lo..=hi), gap)
    } else {
        log::warn!(
            "Gap {} with min segment {} does not fit playable height {}; centering",
            tuning.gap_height,
            tuning.min_segment,
            playable
        );
        (playable / 2.0, gap)
    }
}

/// Owner of live obstacles and the spawn timer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    spawn_timer: f32,
    /// Total obstacles spawned this run
    pub spawned: u64,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll everything left by `speed * dt` and drop what is fully off-screen
    pub fn advance(&mut self, dt: f32, speed: f32, tuning: &Tuning) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed * dt;
        }
        self.obstacles.retain(|o| o.right() + tuning.cull_buffer >= 0.0);
    }

    /// Advance the spawn timer and spawn at the right edge when it elapses.
    ///
    /// Outside active play the timer is held at zero. Returns true if an
    /// obstacle was spawned.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        dt: f32,
        active: bool,
        speed_multiplier: f32,
        color: Color,
        tuning: &Tuning,
        rng: &mut R,
    ) -> bool {
        if !active {
            self.spawn_timer = 0.0;
            return false;
        }

        self.spawn_timer += dt;
        let interval = tuning.spawn_interval / speed_multiplier.max(f32::EPSILON);
        if self.spawn_timer < interval {
            return false;
        }
        self.spawn_timer = 0.0;

        let (gap_center, gap_height) = choose_gap(tuning, rng);
        self.obstacles.push(Obstacle::new(
            tuning.view_width,
            gap_center,
            gap_height,
            tuning.obstacle_width,
            color,
        ));
        self.spawned += 1;
        log::debug!("Spawned obstacle #{} gap center {:.1}", self.spawned, gap_center);
        true
    }

    /// Insert a pre-built obstacle
    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.obstacles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use glam::Vec3;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_gap_edges() {
        let obstacle = Obstacle::new(500.0, 300.0, 220.0, 90.0, Vec3::ZERO);
        assert_eq!(obstacle.gap_top(), 190.0);
        assert_eq!(obstacle.gap_bottom(), 410.0);
        assert_eq!(obstacle.top_segment(), 190.0);
        assert_eq!(obstacle.bottom_segment(600.0), 190.0);
        assert_eq!(obstacle.right(), 590.0);
    }

    #[test]
    fn test_spawn_suppressed_when_inactive() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ObstacleField::new();
        for _ in 0..1000 {
            assert!(!field.maybe_spawn(SIM_DT, false, 1.0, Vec3::ONE, &tuning, &mut rng));
        }
        assert!(field.is_empty());
        assert_eq!(field.spawn_timer(), 0.0);
    }

    #[test]
    fn test_spawn_cadence_scales_with_multiplier() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);

        let count = |multiplier: f32, rng: &mut Pcg32| {
            let mut field = ObstacleField::new();
            // 10 simulated seconds
            for _ in 0..1200 {
                field.maybe_spawn(SIM_DT, true, multiplier, Vec3::ONE, &tuning, rng);
            }
            field.spawned
        };

        let normal = count(1.0, &mut rng);
        let soaring = count(2.0, &mut rng);
        assert_eq!(normal, 5);
        assert!(soaring >= 2 * normal);
    }

    #[test]
    fn test_spawned_at_right_edge_with_color() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = ObstacleField::new();
        let color = Vec3::new(30.0, 41.0, 59.0);
        assert!(field.maybe_spawn(tuning.spawn_interval, true, 1.0, color, &tuning, &mut rng));
        let o = field.iter().next().unwrap();
        assert_eq!(o.x, tuning.view_width);
        assert_eq!(o.color, color);
        assert!(!o.grazed && !o.passed);
    }

    #[test]
    fn test_tick_scrolls_and_culls() {
        let tuning = Tuning::default();
        let mut field = ObstacleField::new();
        field.push(Obstacle::new(100.0, 300.0, 220.0, 90.0, Vec3::ZERO));
        field.push(Obstacle::new(-185.0, 300.0, 220.0, 90.0, Vec3::ZERO));

        field.advance(0.1, 200.0, &tuning);
        assert_eq!(field.len(), 1);
        assert!((field.iter().next().unwrap().x - 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_infeasible_geometry_centers_gap() {
        let tuning = Tuning {
            gap_height: 450.0,
            min_segment: 100.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(4);
        let (center, gap) = choose_gap(&tuning, &mut rng);
        assert_eq!(center, 300.0);
        assert_eq!(gap, 450.0);

        let tuning = Tuning {
            gap_height: 900.0,
            ..Tuning::default()
        };
        let (center, gap) = choose_gap(&tuning, &mut rng);
        assert_eq!(gap, 600.0);
        assert_eq!(center - gap / 2.0, 0.0);
    }

    #[test]
    fn test_speed_ramps_with_distance() {
        let tuning = Tuning::default();
        assert_eq!(effective_speed(&tuning, 0.0, 1.0), tuning.base_speed);
        assert!(effective_speed(&tuning, 500.0, 1.0) > tuning.base_speed);
        assert_eq!(
            effective_speed(&tuning, 500.0, 2.0),
            2.0 * effective_speed(&tuning, 500.0, 1.0)
        );
    }

    proptest! {
        #[test]
        fn prop_spawn_respects_min_segments(
            seed in any::<u64>(),
            gap_height in 80.0f32..400.0,
            min_segment in 10.0f32..100.0,
        ) {
            let tuning = Tuning { gap_height, min_segment, ..Tuning::default() };
            let playable = tuning.playable_height();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut field = ObstacleField::new();
            for _ in 0..20 {
                field.maybe_spawn(tuning.spawn_interval, true, 1.0, Vec3::ONE, &tuning, &mut rng);
            }
            for o in field.iter() {
                let top = o.top_segment();
                let bottom = o.bottom_segment(playable);
                prop_assert!(top >= min_segment - 1e-3);
                prop_assert!(bottom >= min_segment - 1e-3);
                prop_assert!((top + o.gap_height + bottom - playable).abs() < 1e-3);
            }
        }
    }
}
