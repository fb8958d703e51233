//! Headless demo driver
//!
//! Runs a scripted session against the file-backed save store and logs the
//! outcome. Useful for smoke-testing the simulation without a renderer.

use std::time::{SystemTime, UNIX_EPOCH};

use galactic_defender::persistence::JsonFileStore;
use galactic_defender::sim::{Bounds, GamePhase, GameSession, InputState};

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = JsonFileStore::new("saves");
    let mut session = GameSession::login("DEMO", now_ms() as u64, Bounds::default(), store, now_ms());
    session.start_game();

    // Scripted input: hold fire and sweep left/right across the play area.
    let max_ticks = 60 * 120; // two minutes of simulated play
    for frame in 0..max_ticks {
        let sweep_left = (frame / 180) % 2 == 0;
        let input = InputState {
            left: sweep_left,
            right: !sweep_left,
            fire: true,
            ..Default::default()
        };
        session.tick(&input);

        for cue in session.drain_cues() {
            log::debug!("cue: {}", cue.name());
        }
        if session.phase() == GamePhase::Ended {
            break;
        }
    }

    let views = session.render_snapshot();
    log::info!(
        "demo finished: score {}, lives {}, {} drawable entities, {} credits banked",
        session.score(),
        session.lives(),
        views.len(),
        session.profile.credits,
    );
}
