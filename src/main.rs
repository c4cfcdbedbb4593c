//! Eagle Soar headless runner
//!
//! Flies the simulation with a simple autopilot for a fixed span of
//! simulated time and prints a JSON summary of the session.
//!
//! Usage: `eagle-soar [seed] [seconds]`

use serde::Serialize;

use eagle_soar::audio::LogAudio;
use eagle_soar::persistence::{SaveManager, StorageBackend, default_backend};
use eagle_soar::platform::init_logging;
use eagle_soar::presentation::{HeadlessRenderer, Renderer};
use eagle_soar::sim::{GamePhase, GameSession, Persona, Weather};
use eagle_soar::{Game, Settings, Tuning};

/// Simulated frame length (60 fps display)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Flap when the body sinks this far below the target line
const AUTOPILOT_SLACK: f32 = 25.0;

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    seconds: f32,
    frames: u64,
    runs: u32,
    best_score: u32,
    feathers: u64,
    peak_instances: usize,
    last_phase: GamePhase,
    biome: &'static str,
    persona: Persona,
    weather: Weather,
}

/// Aim for the next unpassed gap, or mid-screen when none is in view
fn wants_flap(session: &GameSession) -> bool {
    let player = &session.player;
    let target = session
        .field
        .iter()
        .filter(|o| o.right() > player.left())
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|o| o.gap_center)
        .unwrap_or(session.tuning.playable_height() / 2.0);
    player.velocity >= 0.0 && player.pos.y > target + AUTOPILOT_SLACK
}

fn parse_args() -> (u64, f32) {
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);
    let seconds = args
        .next()
        .and_then(|s| s.parse().ok())
        .filter(|s: &f32| s.is_finite() && *s > 0.0)
        .unwrap_or(60.0);
    (seed, seconds)
}

fn run<S: StorageBackend, R: Renderer>(
    game: &mut Game<LogAudio, SaveManager<S>, R>,
    seconds: f32,
) -> (u64, u32, u32) {
    let frames = (seconds / FRAME_DT).ceil() as u64;
    let mut runs = 0;
    let mut best = 0;

    for _ in 0..frames {
        let session = game.session();
        let tap = match session.phase {
            GamePhase::Intro => true,
            GamePhase::Playing => wants_flap(session),
            GamePhase::Dying => false,
            GamePhase::GameOver => session.death_elapsed >= session.tuning.restart_delay,
        };
        if session.phase == GamePhase::GameOver && tap {
            runs += 1;
            best = best.max(session.score);
        }

        if tap {
            game.press();
        }
        game.frame(FRAME_DT);
        game.release();
    }

    let session = game.session();
    if session.phase != GamePhase::Intro {
        runs += 1;
        best = best.max(session.score);
    }
    (frames, runs, best)
}

fn main() {
    init_logging();
    let (seed, seconds) = parse_args();
    log::info!("Eagle Soar (headless) seed {seed}, {seconds}s");

    let storage = default_backend();
    let settings = Settings::load(&storage);
    let progress = SaveManager::load(storage);

    let mut game = Game::new(
        seed,
        Tuning::default(),
        settings.clone(),
        LogAudio::new(settings.muted),
        progress,
        HeadlessRenderer::default(),
    );

    let (frames, runs, best_score) = run(&mut game, seconds);

    let session = game.session();
    let environment = &session.director.environment;
    let summary = RunSummary {
        seed,
        seconds,
        frames,
        runs,
        best_score,
        feathers: game.progress().data().feathers,
        peak_instances: game.renderer().peak_instances,
        last_phase: session.phase,
        biome: environment.biome.name(),
        persona: session.director.persona.persona,
        weather: environment.weather,
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to encode summary: {err}"),
    }
}
