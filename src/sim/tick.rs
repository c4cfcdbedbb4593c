//! Fixed timestep simulation tick
//!
//! Advances one [`GameSession`] by one step, dispatching on the lifecycle
//! phase. The caller passes the unscaled fixed step; the death sequence
//! applies its own time scale.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::director::DirectorInput;
use super::obstacle::effective_speed;
use super::particles::ParticleKind;
use super::player::{BoundaryContact, Bounds};
use super::state::{DeathCause, GameEvent, GamePhase, GameSession};
use crate::tuning::Tuning;

/// Feathers shed per flap
const FLAP_FEATHERS: usize = 3;
/// Sparks thrown at a graze point
const GRAZE_SPARKS: usize = 5;
/// Chance per tick of a speed streak while soaring
const SOAR_STREAK_CHANCE: f32 = 0.5;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Edge-triggered press (flap, start, restart)
    pub tap: bool,
    /// Dive modifier currently held
    pub dive_held: bool,
}

/// World time scale for a point in the death sequence:
/// frozen on impact, slow-motion settle, then frozen again
pub fn death_time_scale(elapsed: f32, tuning: &Tuning) -> f32 {
    if elapsed < tuning.impact_freeze {
        0.0
    } else if elapsed < tuning.death_sequence_length() {
        tuning.settle_time_scale
    } else {
        0.0
    }
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    session.sim_time += dt as f64;

    match session.phase {
        GamePhase::Intro => tick_intro(session, input, dt),
        GamePhase::Playing => tick_playing(session, input, dt),
        GamePhase::Dying | GamePhase::GameOver => tick_death(session, input, dt),
    }
}

fn tick_intro(session: &mut GameSession, input: &TickInput, dt: f32) {
    session.time_scale = 1.0;

    if input.tap {
        log::info!("Flight started");
        session.phase = GamePhase::Playing;
        flap(session);
    } else {
        session.player.hover(&session.tuning, session.sim_time);
    }

    let color = session.director.obstacle_color();
    session
        .field
        .maybe_spawn(dt, false, 1.0, color, &session.tuning, &mut session.rng);
    session.particles.tick(dt);
    step_director(session, dt, false);
}

fn tick_playing(session: &mut GameSession, input: &TickInput, dt: f32) {
    session.time_scale = 1.0;

    if input.tap {
        flap(session);
    }

    if session.soar.tick(dt) {
        log::info!("Soar ended");
        session.push_event(GameEvent::SoarEnd);
    }

    let bounds = Bounds {
        ceiling: -session.tuning.boundary_margin,
        floor: session.tuning.playable_height() + session.tuning.boundary_margin,
    };
    let contact = session
        .player
        .tick(dt, input.dive_held, bounds, &session.tuning);
    match contact {
        BoundaryContact::Ceiling => return session.die(DeathCause::Ceiling),
        BoundaryContact::Floor => return session.die(DeathCause::Floor),
        BoundaryContact::None => {}
    }
    if collision::out_of_bounds(&session.player, &session.tuning) {
        let cause = if session.player.pos.y < session.tuning.playable_height() / 2.0 {
            DeathCause::Ceiling
        } else {
            DeathCause::Floor
        };
        return session.die(cause);
    }

    let multiplier = session.speed_multiplier();
    let speed = effective_speed(&session.tuning, session.distance, multiplier);
    session.speed = speed;
    session.field.advance(dt, speed, &session.tuning);
    session.distance += speed * dt * session.tuning.meters_per_pixel;

    let color = session.director.obstacle_color();
    session
        .field
        .maybe_spawn(dt, true, multiplier, color, &session.tuning, &mut session.rng);

    let report = collision::resolve(&session.player, &mut session.field, &session.tuning);
    if report.collided {
        return session.die(DeathCause::Obstacle);
    }
    for pos in report.grazes {
        on_graze(session, pos);
    }
    for _ in 0..report.passes {
        session.score += 1;
        session.push_event(GameEvent::Score {
            score: session.score,
        });
    }

    if session.soar.active && session.rng.random::<f32>() < SOAR_STREAK_CHANCE {
        let offset = Vec2::new(
            session.rng.random_range(-40.0..40.0),
            session.rng.random_range(-60.0..60.0),
        );
        let pos = session.player.pos + offset;
        session
            .particles
            .emit(pos, ParticleKind::SpeedLine, 1, &mut session.rng);
    }

    session.particles.tick(dt);
    step_director(session, dt, true);
}

fn tick_death(session: &mut GameSession, input: &TickInput, dt: f32) {
    session.death_elapsed += dt;

    if session.phase == GamePhase::GameOver
        && input.tap
        && session.death_elapsed >= session.tuning.restart_delay
    {
        session.restart();
        return;
    }

    session.time_scale = death_time_scale(session.death_elapsed, &session.tuning);
    let scaled = dt * session.time_scale;

    // The body falls limp and rests on the ground
    let rest = Bounds {
        ceiling: 0.0,
        floor: session.tuning.playable_height(),
    };
    session.player.tick(scaled, false, rest, &session.tuning);
    session.field.advance(scaled, session.speed, &session.tuning);
    session.particles.tick(scaled);
    step_director(session, scaled, false);

    if session.phase == GamePhase::Dying && session.death_elapsed >= session.tuning.death_sequence_length() {
        log::info!("Game over: score {}, combo {}", session.score, session.combo);
        session.phase = GamePhase::GameOver;
    }
}

fn flap(session: &mut GameSession) {
    if !session.player.flap(&session.tuning) {
        return;
    }
    let pos = session.player.pos;
    session
        .particles
        .emit(pos, ParticleKind::Feather, FLAP_FEATHERS, &mut session.rng);
    session.push_event(GameEvent::Flap);

    let (sim_time, score) = (session.sim_time, session.score);
    if let Some(persona) = session.director.on_flap(sim_time, score, &session.tuning) {
        session.push_event(GameEvent::PersonaChanged(persona));
    }
}

fn on_graze(session: &mut GameSession, pos: Vec2) {
    session.combo += 1;
    log::debug!("Graze #{} at {:.0},{:.0}", session.combo, pos.x, pos.y);
    session
        .particles
        .emit(pos, ParticleKind::Spark, GRAZE_SPARKS, &mut session.rng);
    session.push_event(GameEvent::Graze {
        combo: session.combo,
        pos,
    });

    if !session.soar.active && session.combo % session.tuning.soar_threshold == 0 {
        log::info!("Soar! combo {}", session.combo);
        session.soar.activate(session.tuning.soar_duration);
        session.push_event(GameEvent::SoarBegin);
    }
}

fn step_director(session: &mut GameSession, dt: f32, analysing: bool) {
    let input = DirectorInput {
        dt,
        sim_time: session.sim_time,
        distance: session.distance,
        altitude: session.player.pos.y,
        score: session.score,
        speed: session.speed,
        analysing,
        ambient_density: session.ambient_density,
        weather_density: session.weather_density,
    };
    let update = session
        .director
        .tick(input, &session.tuning, &mut session.particles, &mut session.rng);
    session.wind = update.wind;

    if let Some(weather) = update.weather_changed {
        session.push_event(GameEvent::WeatherChanged(weather));
    }
    if let Some(persona) = update.persona_changed {
        session.push_event(GameEvent::PersonaChanged(persona));
    }
}
