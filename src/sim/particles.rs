//! Transient visual-effect bodies
//!
//! Particles never influence gameplay. Each kind carries its own spawn
//! distribution and motion rule; the system only ages, moves and culls them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::{Color, hex};

/// Downward pull applied to kinds that use default physics (pixels/s²)
const PARTICLE_GRAVITY: f32 = 300.0;
/// Velocity decay for kinds that use default physics (1/s)
const PARTICLE_DRAG: f32 = 1.5;
/// Horizontal sway speed for snow (pixels/s)
const SNOW_SWAY: f32 = 60.0;
/// Fixed slant for rain streaks (radians)
const RAIN_SLANT: f32 = 0.2;

/// Particle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Flap and crash plumage
    Feather,
    /// Soft drifting motes
    Dust,
    /// Graze and persona sparks
    Spark,
    /// Heavy chunks thrown on impact
    Debris,
    /// Fast horizontal streak for speed cues
    SpeedLine,
    /// Slanted fast-falling precipitation
    Rain,
    /// Slow swaying precipitation
    Snow,
}

impl ParticleKind {
    /// Default tint for this kind
    pub fn color(self) -> Color {
        match self {
            ParticleKind::Feather => hex(0xfbbf24),
            ParticleKind::Dust => hex(0xe7e5e4),
            ParticleKind::Spark => hex(0x22d3ee),
            ParticleKind::Debris => hex(0x475569),
            ParticleKind::SpeedLine => hex(0xffffff),
            ParticleKind::Rain => hex(0xa5f3fc),
            ParticleKind::Snow => hex(0xffffff),
        }
    }

    /// Initial lifetime in seconds
    pub fn lifetime(self) -> f32 {
        match self {
            ParticleKind::Feather | ParticleKind::Dust => 1.0,
            ParticleKind::Spark => 0.5,
            ParticleKind::Debris => 2.0,
            ParticleKind::SpeedLine => 0.3,
            ParticleKind::Rain => 1.5,
            ParticleKind::Snow => 3.0,
        }
    }

    /// Whether gravity, drag and spin apply
    fn uses_default_physics(self) -> bool {
        !matches!(
            self,
            ParticleKind::SpeedLine | ParticleKind::Rain | ParticleKind::Snow
        )
    }
}

/// A single effect body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in seconds
    pub life: f32,
    /// Life at spawn, for fade-out
    pub max_life: f32,
    pub kind: ParticleKind,
    /// Radius, or streak length for line kinds
    pub size: f32,
    pub rotation: f32,
    /// Angular velocity (rad/s)
    pub spin: f32,
    pub color: Color,
}

impl Particle {
    /// Spawn one particle of `kind` with jittered initial state
    pub fn spawn<R: Rng>(pos: Vec2, kind: ParticleKind, color: Color, rng: &mut R) -> Self {
        let mut p = Self {
            pos,
            vel: Vec2::new(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0)),
            life: kind.lifetime(),
            max_life: kind.lifetime(),
            kind,
            size: rng.random_range(2.0..6.0),
            rotation: rng.random_range(0.0..TAU),
            spin: rng.random_range(-5.0..5.0),
            color,
        };

        match kind {
            ParticleKind::Feather | ParticleKind::Dust => {}
            ParticleKind::SpeedLine => {
                p.vel = Vec2::new(-400.0 - rng.random_range(0.0..200.0), 0.0);
                p.size = rng.random_range(20.0..40.0);
                p.rotation = 0.0;
                p.spin = 0.0;
            }
            ParticleKind::Debris => {
                p.size = rng.random_range(4.0..12.0);
            }
            ParticleKind::Spark => {
                p.vel = Vec2::new(rng.random_range(-150.0..150.0), rng.random_range(-150.0..150.0));
                p.size = rng.random_range(2.0..5.0);
            }
            ParticleKind::Rain => {
                p.vel = Vec2::new(-200.0, 800.0 + rng.random_range(0.0..400.0));
                p.size = rng.random_range(10.0..20.0);
                p.rotation = RAIN_SLANT;
                p.spin = 0.0;
            }
            ParticleKind::Snow => {
                p.vel = Vec2::new(-150.0 - rng.random_range(0.0..100.0), 50.0 + rng.random_range(0.0..50.0));
                p.size = rng.random_range(1.0..4.0);
                p.spin = 0.0;
            }
        }
        p
    }

    /// Opacity for rendering (fades with remaining life)
    #[inline]
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    fn step(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        match self.kind {
            ParticleKind::Snow => {
                self.pos.x += (self.life * 5.0).sin() * SNOW_SWAY * dt;
            }
            kind if kind.uses_default_physics() => {
                self.rotation += self.spin * dt;
                self.vel.y += PARTICLE_GRAVITY * dt;
                self.vel *= (1.0 - PARTICLE_DRAG * dt).max(0.0);
            }
            _ => {}
        }
    }
}

/// Owner of all live particles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `count` particles of `kind` in the kind's default color
    pub fn emit<R: Rng>(&mut self, pos: Vec2, kind: ParticleKind, count: usize, rng: &mut R) {
        self.emit_colored(pos, kind, count, kind.color(), rng);
    }

    /// Emit `count` particles of `kind` with an explicit tint
    pub fn emit_colored<R: Rng>(
        &mut self,
        pos: Vec2,
        kind: ParticleKind,
        count: usize,
        color: Color,
        rng: &mut R,
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::spawn(pos, kind, color, rng));
        }
    }

    /// Insert a particle built by the caller
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Age, cull and move every particle.
    ///
    /// A non-positive `dt` (frozen time) leaves everything untouched.
    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.particles.retain_mut(|p| {
            p.life -= dt;
            if p.life <= 0.0 {
                return false;
            }
            p.step(dt);
            true
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
