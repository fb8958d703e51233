//! Game session orchestrator
//!
//! Owns the session state, the pilot profile, the spawn director and the
//! save store. Drives both periodic schedules (frame tick and spawn
//! interval) from one serialized execution context and flushes a save after
//! every credit-changing tick.

use glam::Vec2;

use crate::audio::AudioCue;
use crate::consts::*;
use crate::persistence::SaveStore;
use crate::profile::{PilotProfile, UpgradeKind};
use crate::sim::spawn::SpawnDirector;
use crate::sim::state::{Bounds, GamePhase, GameState};
use crate::sim::tick::{self, InputState, TickReport};

/// Read-only drawable view of one entity, handed to a render collaborator.
#[derive(Debug, Clone, Copy)]
pub struct EntityView {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: &'static str,
    /// 1.0 for full health or non-damageable entities.
    pub health_ratio: f32,
    /// Opacity, only below 1.0 for fading particles.
    pub alpha: f32,
}

pub struct GameSession<S: SaveStore> {
    pub state: GameState,
    pub profile: PilotProfile,
    director: SpawnDirector,
    store: S,
}

impl<S: SaveStore> GameSession<S> {
    /// Log a pilot in: restore their profile or start fresh, and make sure
    /// the stock inventory is usable.
    pub fn login(pilot_name: &str, seed: u64, bounds: Bounds, store: S, now_ms: f64) -> Self {
        let profile = match store.load(pilot_name) {
            Some(profile) => {
                log::info!(
                    "pilot {} logged in with {} credits",
                    profile.pilot_name,
                    profile.credits
                );
                profile
            }
            None => {
                log::info!("new pilot {}", pilot_name.trim().to_uppercase());
                PilotProfile::new(pilot_name)
            }
        };
        let mut session = Self {
            state: GameState::new(seed, bounds),
            profile,
            director: SpawnDirector::default(),
            store,
        };
        session.maybe_refresh_stock(now_ms);
        session
    }

    /// Reset run-scoped state and begin the launch sequence. Permanent
    /// progression is untouched. Restarts the spawn schedule.
    pub fn start_game(&mut self) {
        self.state.reset_run();
        self.director.start();
        log::info!("game started for {}", self.profile.pilot_name);
    }

    /// Advance the whole simulation by one frame.
    pub fn tick(&mut self, input: &InputState) -> TickReport {
        if self.state.phase == GamePhase::Running {
            self.director.tick(&mut self.state);
        }
        let report = tick::tick(&mut self.state, &mut self.profile, input);

        if report.boss_killed {
            self.director.pause_for(BOSS_GRACE_TICKS);
        }
        if report.game_over {
            // Both drivers stop deterministically with the session.
            self.director.stop();
        }
        if self.state.credits_dirty {
            self.store.save(&self.profile);
            self.state.credits_dirty = false;
        }
        report
    }

    /// Buy a permanent upgrade; persists on success.
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> bool {
        if self.profile.purchase_upgrade(kind) {
            self.store.save(&self.profile);
            self.state.push_cue(AudioCue::PurchaseAccepted);
            true
        } else {
            self.state.push_cue(AudioCue::PurchaseDenied);
            false
        }
    }

    /// Buy a stock item; persists on success.
    pub fn purchase_stock_item(&mut self, id: u32) -> bool {
        if self.profile.purchase_stock_item(id) {
            self.store.save(&self.profile);
            self.state.push_cue(AudioCue::PurchaseAccepted);
            true
        } else {
            self.state.push_cue(AudioCue::PurchaseDenied);
            false
        }
    }

    /// Periodic stock-refresh check; regenerates and persists when due.
    pub fn maybe_refresh_stock(&mut self, now_ms: f64) -> bool {
        if self.profile.maybe_refresh_stock(&mut self.state.rng, now_ms) {
            self.store.save(&self.profile);
            true
        } else {
            false
        }
    }

    /// Cues emitted since the last drain, for the audio collaborator.
    pub fn drain_cues(&mut self) -> Vec<AudioCue> {
        self.state.drain_cues()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    pub fn spawning_active(&self) -> bool {
        self.director.is_active()
    }

    /// The backing save store (read access, e.g. for UI refresh checks).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Per-tick drawable snapshot for the render collaborator.
    pub fn render_snapshot(&self) -> Vec<EntityView> {
        let state = &self.state;
        let mut views = Vec::with_capacity(
            1 + state.projectiles.len()
                + state.enemy_projectiles.len()
                + state.enemies.len()
                + state.powerups.len()
                + state.particles.len()
                + 1,
        );

        let player_y = if state.phase == GamePhase::Launching {
            state.launch_y
        } else {
            state.player.pos.y
        };
        views.push(EntityView {
            pos: Vec2::new(state.player.pos.x, player_y),
            size: Vec2::splat(state.player.size),
            color: state.player.color,
            health_ratio: 1.0,
            alpha: 1.0,
        });

        for p in &state.projectiles {
            views.push(EntityView {
                pos: p.pos,
                size: Vec2::splat(p.radius * 2.0),
                color: p.color,
                health_ratio: 1.0,
                alpha: 1.0,
            });
        }
        for p in &state.enemy_projectiles {
            views.push(EntityView {
                pos: p.pos,
                size: Vec2::splat(p.radius * 2.0),
                color: p.color,
                health_ratio: 1.0,
                alpha: 1.0,
            });
        }
        for e in &state.enemies {
            views.push(EntityView {
                pos: e.pos,
                size: Vec2::splat(e.size),
                color: e.color,
                health_ratio: e.health_ratio(),
                alpha: 1.0,
            });
        }
        if let Some(boss) = &state.boss {
            views.push(EntityView {
                pos: boss.pos,
                size: Vec2::new(boss.width, boss.height),
                color: boss.color,
                health_ratio: boss.health_ratio(),
                alpha: 1.0,
            });
        }
        for p in &state.powerups {
            views.push(EntityView {
                pos: p.pos,
                size: Vec2::splat(p.size),
                color: p.kind.color(),
                health_ratio: 1.0,
                alpha: 1.0,
            });
        }
        for p in &state.particles {
            views.push(EntityView {
                pos: p.pos,
                size: Vec2::splat(p.radius * 2.0),
                color: p.color,
                health_ratio: 1.0,
                alpha: p.alpha,
            });
        }
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn session() -> GameSession<MemoryStore> {
        GameSession::login("TEST", 42, Bounds::default(), MemoryStore::new(), 0.0)
    }

    #[test]
    fn login_generates_stock_for_new_pilot() {
        let session = session();
        assert_eq!(session.profile.stock.len(), 105);
        assert!(session.profile.next_stock_refresh > 0.0);
    }

    #[test]
    fn login_restores_saved_profile() {
        let mut store = MemoryStore::new();
        let mut saved = PilotProfile::new("VEGA");
        saved.credits = 7777;
        store.save(&saved);

        let session = GameSession::login("vega", 1, Bounds::default(), store, 0.0);
        assert_eq!(session.profile.credits, 7777);
    }

    #[test]
    fn start_game_resets_run_but_keeps_progression() {
        let mut session = session();
        session.profile.credits = 500;
        session.state.score = 1234;
        session.start_game();
        assert_eq!(session.state.score, 0);
        assert_eq!(session.profile.credits, 500);
        assert_eq!(session.phase(), GamePhase::Launching);
        assert!(session.spawning_active());
    }

    #[test]
    fn game_over_stops_the_spawn_schedule() {
        let mut session = session();
        session.start_game();
        while session.phase() == GamePhase::Launching {
            session.tick(&InputState::default());
        }
        // Force the last life to be lost by parking an enemy on the player.
        session.state.lives = 1;
        let player_center = session.state.player.center();
        session.state.enemies.push(crate::sim::entity::Enemy {
            pos: player_center - Vec2::splat(25.0),
            size: 50.0,
            health: 1,
            max_health: 1,
            speed: 0.0,
            points: 100,
            color: "#39ff14",
        });
        let report = session.tick(&InputState::default());
        assert!(report.game_over);
        assert_eq!(session.phase(), GamePhase::Ended);
        assert!(!session.spawning_active());

        // Ended phase is inert.
        let tick_before = session.state.now_tick;
        session.tick(&InputState::default());
        assert_eq!(session.state.now_tick, tick_before);
    }

    #[test]
    fn denied_purchase_emits_cue_and_changes_nothing() {
        let mut session = session();
        session.profile.credits = 400;
        assert!(!session.purchase_upgrade(UpgradeKind::FireRate));
        assert_eq!(session.profile.credits, 400);
        assert!(session.drain_cues().contains(&AudioCue::PurchaseDenied));
    }

    #[test]
    fn accepted_purchase_persists() {
        let mut session = session();
        session.profile.credits = 600;
        assert!(session.purchase_upgrade(UpgradeKind::FireRate));
        let reloaded = session.store.load("TEST").expect("saved");
        assert_eq!(reloaded.fire_rate_level, 1);
        assert_eq!(reloaded.credits, 100);
    }

    #[test]
    fn render_snapshot_always_includes_the_player() {
        let session = session();
        let views = session.render_snapshot();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].color, "#00f2ff");
    }
}
