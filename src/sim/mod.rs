//! Fixed-timestep simulation
//!
//! All gameplay logic lives here:
//! - Fixed timestep only, elapsed time threaded through explicitly
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod director;
pub mod obstacle;
pub mod particles;
pub mod player;
pub mod state;
pub mod tick;

pub use clock::FixedStep;
pub use collision::CollisionReport;
pub use director::{AdaptiveDirector, Biome, Persona, Weather};
pub use obstacle::{Obstacle, ObstacleField};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use player::PlayerBody;
pub use state::{DeathCause, GameEvent, GamePhase, GameSession, SoarState};
pub use tick::{TickInput, death_time_scale, tick};
