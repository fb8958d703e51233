//! Spawn director: fixed-interval enemy and boss spawning
//!
//! Runs on its own tick-count schedule, independent of what the rest of the
//! frame does. Each interval spawns a standard enemy, unless the score has
//! crossed the next boss threshold, in which case a boss enters instead.
//! Only one boss is ever alive; while it is, the director spawns nothing.

use crate::audio::AudioCue;
use crate::consts::*;
use crate::sim::entity::{Boss, Enemy};
use crate::sim::state::GameState;

#[derive(Debug)]
pub struct SpawnDirector {
    interval: u64,
    countdown: u64,
    /// Remaining quiet ticks (boss-death grace window).
    pause_ticks: u64,
    /// Last boss threshold already served.
    last_boss_score: u64,
    active: bool,
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL_TICKS)
    }
}

impl SpawnDirector {
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            countdown: interval,
            pause_ticks: 0,
            last_boss_score: 0,
            active: false,
        }
    }

    /// Start (or restart) the spawn schedule. Idempotent: the interval is
    /// reset every call, and the boss threshold starts over.
    pub fn start(&mut self) {
        self.active = true;
        self.countdown = self.interval;
        self.pause_ticks = 0;
        self.last_boss_score = 0;
        log::debug!("spawn schedule started (every {} ticks)", self.interval);
    }

    /// Stop the schedule. A dangling spawn timer after session end is a bug.
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Suspend spawning for a grace window, then resume on schedule.
    pub fn pause_for(&mut self, ticks: u64) {
        self.pause_ticks = ticks;
        self.countdown = self.interval;
    }

    /// Advance the schedule by one tick, enqueueing at most one spawn.
    pub fn tick(&mut self, state: &mut GameState) {
        if !self.active {
            return;
        }
        if self.pause_ticks > 0 {
            self.pause_ticks -= 1;
            return;
        }
        self.countdown -= 1;
        if self.countdown > 0 {
            return;
        }
        self.countdown = self.interval;

        // Exclusivity: never a second boss while one is alive.
        if state.boss.is_some() {
            return;
        }

        if state.score > self.last_boss_score + BOSS_SCORE_INTERVAL {
            state.boss = Some(Boss::spawn(state.score, state.bounds));
            self.last_boss_score = (state.score / BOSS_SCORE_INTERVAL) * BOSS_SCORE_INTERVAL;
            state.push_cue(AudioCue::BossSpawned);
            log::info!(
                "boss spawned at score {} (next threshold {})",
                state.score,
                self.last_boss_score + BOSS_SCORE_INTERVAL
            );
        } else {
            let enemy = Enemy::spawn(
                &mut state.rng,
                state.score,
                state.enemy_base_speed,
                state.bounds,
            );
            log::debug!("enemy spawned (hp {}, speed {:.2})", enemy.health, enemy.speed);
            state.enemies.push(enemy);
        }
    }
}
