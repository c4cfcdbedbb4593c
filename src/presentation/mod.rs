//! Per-frame render snapshot
//!
//! The simulation is sampled once per frame into a [`Frame`]: poses, colors,
//! camera parameters and HUD state. Renderers never see simulation types.

pub mod camera;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

pub use camera::{CameraRig, CameraView};

use crate::Color;
use crate::sim::{Biome, GamePhase, GameSession, Particle, ParticleKind, Persona, Weather};

/// GPU-ready sprite record
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub rotation: f32,
    /// Sprite selector, see [`InstanceKind`]
    pub kind: u32,
    /// Linear RGBA in 0..1
    pub color: [f32; 4],
}

/// Sprite selector values for [`RenderInstance::kind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum InstanceKind {
    Player = 0,
    Pillar = 1,
    Feather = 2,
    Dust = 3,
    Spark = 4,
    Debris = 5,
    SpeedLine = 6,
    Rain = 7,
    Snow = 8,
}

impl From<ParticleKind> for InstanceKind {
    fn from(kind: ParticleKind) -> Self {
        match kind {
            ParticleKind::Feather => InstanceKind::Feather,
            ParticleKind::Dust => InstanceKind::Dust,
            ParticleKind::Spark => InstanceKind::Spark,
            ParticleKind::Debris => InstanceKind::Debris,
            ParticleKind::SpeedLine => InstanceKind::SpeedLine,
            ParticleKind::Rain => InstanceKind::Rain,
            ParticleKind::Snow => InstanceKind::Snow,
        }
    }
}

/// 0-255 color plus alpha to normalized RGBA
fn rgba(color: Color, alpha: f32) -> [f32; 4] {
    let c = color / 255.0;
    [c.x, c.y, c.z, alpha.clamp(0.0, 1.0)]
}

impl RenderInstance {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            position: p.pos.to_array(),
            size: [p.size, p.size],
            rotation: p.rotation,
            kind: InstanceKind::from(p.kind) as u32,
            color: rgba(p.color, p.alpha()),
        }
    }
}

/// Text and counters overlaid on the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudState {
    pub phase: GamePhase,
    pub score: u32,
    pub combo: u32,
    pub soaring: bool,
    pub soar_remaining: f32,
    /// Meters flown this run
    pub distance: f32,
    /// Feathers earned by the finished run
    pub reward: u64,
    pub biome: Biome,
    pub weather: Weather,
    pub persona: Persona,
    /// A tap would restart now
    pub restart_ready: bool,
    /// End-of-run summary, once the run is over
    pub profile: Option<String>,
}

/// Everything drawn for one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub sky_top: Color,
    pub sky_bottom: Color,
    pub background: Color,
    pub ground_y: f32,
    pub camera: CameraView,
    /// Player first, then pillars, then particles
    pub instances: Vec<RenderInstance>,
    pub hud: HudState,
}

impl Frame {
    /// Sample the session for drawing
    pub fn capture(session: &GameSession, camera: CameraView) -> Self {
        let tuning = &session.tuning;
        let playable = tuning.playable_height();
        let mut instances = Vec::with_capacity(1 + session.field.len() * 2 + session.particles.len());

        let player = &session.player;
        instances.push(RenderInstance {
            position: player.pos.to_array(),
            size: (player.half_extent * 2.0).to_array(),
            rotation: player.rotation,
            kind: InstanceKind::Player as u32,
            color: rgba(crate::hex(0xfbbf24), 1.0),
        });

        for o in session.field.iter() {
            let cx = o.x + o.width / 2.0;
            let top = o.top_segment();
            let bottom = o.bottom_segment(playable);
            let color = rgba(o.color, 1.0);
            instances.push(RenderInstance {
                position: [cx, top / 2.0],
                size: [o.width, top],
                rotation: 0.0,
                kind: InstanceKind::Pillar as u32,
                color,
            });
            instances.push(RenderInstance {
                position: [cx, o.gap_bottom() + bottom / 2.0],
                size: [o.width, bottom],
                rotation: 0.0,
                kind: InstanceKind::Pillar as u32,
                color,
            });
        }

        instances.extend(session.particles.iter().map(RenderInstance::from_particle));

        let director = &session.director;
        let over = session.phase == GamePhase::GameOver;
        let hud = HudState {
            phase: session.phase,
            score: session.score,
            combo: session.combo,
            soaring: session.soar.active,
            soar_remaining: session.soar.remaining,
            distance: session.distance,
            reward: session.reward,
            biome: director.environment.biome,
            weather: director.environment.weather,
            persona: director.persona.persona,
            restart_ready: over && session.death_elapsed >= tuning.restart_delay,
            profile: over.then(|| director.persona.profile(session.score, tuning)),
        };

        Self {
            sky_top: director.persona.palette.sky_top,
            sky_bottom: director.persona.palette.sky_bottom,
            background: director.environment.background,
            ground_y: playable,
            camera,
            instances,
            hud,
        }
    }

    /// Raw instance bytes for upload
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Drawing backend
pub trait Renderer {
    fn present(&mut self, frame: &Frame);
}

/// Renderer that keeps counters instead of drawing
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub peak_instances: usize,
    pub last_hud: Option<HudState>,
}

impl Renderer for HeadlessRenderer {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        self.peak_instances = self.peak_instances.max(frame.instances.len());
        self.last_hud = Some(frame.hud.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Obstacle;
    use crate::tuning::Tuning;
    use glam::Vec3;

    #[test]
    fn test_instance_layout_is_packed() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), 40);
    }

    #[test]
    fn test_capture_orders_player_pillars_particles() {
        let mut session = GameSession::new(5, Tuning::default());
        session
            .field
            .push(Obstacle::new(500.0, 300.0, 220.0, 90.0, Vec3::new(255.0, 0.0, 0.0)));

        let frame = Frame::capture(&session, CameraRig::default().view());
        assert_eq!(frame.instances[0].kind, InstanceKind::Player as u32);
        assert_eq!(frame.instances[1].kind, InstanceKind::Pillar as u32);
        assert_eq!(frame.instances[1].size, [90.0, 190.0]);
        assert_eq!(frame.instances[1].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(frame.instances[2].position, [545.0, 505.0]);
        assert_eq!(frame.instances.len(), 3 + session.particles.len());
        assert_eq!(frame.instance_bytes().len(), frame.instances.len() * 40);
        assert!(frame.hud.profile.is_none());
        assert_eq!(frame.ground_y, 600.0);
    }

    #[test]
    fn test_headless_renderer_counts() {
        let session = GameSession::new(6, Tuning::default());
        let mut renderer = HeadlessRenderer::default();
        renderer.present(&Frame::capture(&session, CameraRig::default().view()));
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.last_hud.map(|h| h.phase), Some(GamePhase::Intro));
    }
}
