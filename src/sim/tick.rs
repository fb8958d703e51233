//! Per-frame simulation tick
//!
//! Advances the whole session by one frame: input apply, entity updates,
//! collision resolution, delayed events, timer countdowns. Spawning runs on
//! its own schedule (`spawn::SpawnDirector`) driven by the session.

use glam::Vec2;

use crate::audio::AudioCue;
use crate::consts::*;
use crate::profile::PilotProfile;
use crate::sim::collision;
use crate::sim::entity::{Player, PowerupKind, ShotRoll};
use crate::sim::state::{DelayedEvent, GamePhase, GameState};

/// Normalized input snapshot for one tick.
///
/// Held directions are level-triggered; `press_left`/`press_right` are
/// edge-triggered key-down events used for double-tap dash detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub press_left: bool,
    pub press_right: bool,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickReport {
    /// The run ended this tick.
    pub game_over: bool,
    /// A boss died this tick; the spawn schedule should pause.
    pub boss_killed: bool,
}

/// Advance the session by one frame.
pub fn tick(state: &mut GameState, profile: &mut PilotProfile, input: &InputState) -> TickReport {
    match state.phase {
        GamePhase::Idle | GamePhase::Ended => TickReport::default(),
        GamePhase::Launching => {
            state.now_tick += 1;
            tick_launch(state);
            TickReport::default()
        }
        GamePhase::Running => {
            state.now_tick += 1;
            tick_running(state, profile, input)
        }
    }
}

/// Non-interactive ship ascent from below the bottom edge.
fn tick_launch(state: &mut GameState) {
    state.launch_y -= LAUNCH_ASCENT_SPEED;
    if state.launch_y <= state.player.pos.y {
        state.launch_y = state.player.pos.y;
        state.phase = GamePhase::Running;
        log::info!("launch complete, run started");
    }
}

fn tick_running(state: &mut GameState, profile: &mut PilotProfile, input: &InputState) -> TickReport {
    apply_input(state, profile, input);
    update_entities(state, profile);

    let outcome = collision::resolve(state, profile);

    for event in state.due_events() {
        match event {
            DelayedEvent::BossExplosion { pos } => {
                state.spawn_explosion(pos, "#fff");
                state.push_cue(AudioCue::BossExplosion);
            }
        }
    }

    tick_effect_timers(state);

    if outcome.game_over {
        state.phase = GamePhase::Ended;
        state.push_cue(AudioCue::GameOver);
        log::info!("run ended at score {}", state.score);
    }

    TickReport {
        game_over: outcome.game_over,
        boss_killed: outcome.boss_killed,
    }
}

/// Steering, dash detection and firing.
fn apply_input(state: &mut GameState, profile: &mut PilotProfile, input: &InputState) {
    let stats = &profile.player_stats;
    let dx = (input.right as i32 - input.left as i32) as f32;
    let dy = (input.down as i32 - input.up as i32) as f32;
    state.player.steer(dx, dy, stats, state.bounds);

    let now = state.now_tick;
    let mut dashed = None;
    if input.press_left && state.player.register_tap(-1.0, now) {
        dashed = Some(-1.0);
    }
    if input.press_right && state.player.register_tap(1.0, now) {
        dashed = Some(1.0);
    }
    if let Some(dir) = dashed {
        state.player.dash(dir, state.bounds);
        let center = state.player.center();
        let color = state.player.color;
        state.spawn_explosion(center, color);
        state.push_cue(AudioCue::Dash);
    }

    if input.fire && state.player.cooldown == 0 {
        fire(state, profile);
        let rapid = state.effects.active == Some(PowerupKind::RapidFire);
        state.player.cooldown = Player::shot_cooldown(profile.fire_rate_level, rapid);
    }
    state.player.cooldown = state.player.cooldown.saturating_sub(1);
}

/// Spawn one shot: center projectile, plus side pairs from cannons or a
/// spread powerup. The whole shot shares one damage/color/crit roll.
fn fire(state: &mut GameState, profile: &PilotProfile) {
    let roll = ShotRoll::roll(
        &mut state.rng,
        profile.damage_level,
        &profile.player_stats,
        state.effects.active,
    );
    let p = &state.player;
    let (x, y, w) = (p.pos.x, p.pos.y, p.size);
    let spread = state.effects.active.is_some_and(|k| k.is_spread());

    let mut spawned = vec![roll.spawn_at(Vec2::new(x + w / 2.0, y))];
    if profile.side_cannons_level >= 1 || spread {
        spawned.push(roll.spawn_at(Vec2::new(x, y + 20.0)));
        spawned.push(roll.spawn_at(Vec2::new(x + w, y + 20.0)));
    }
    if profile.side_cannons_level >= 2 || spread {
        spawned.push(roll.spawn_at(Vec2::new(x - 10.0, y + 40.0)));
        spawned.push(roll.spawn_at(Vec2::new(x + w + 10.0, y + 40.0)));
    }
    state.projectiles.extend(spawned);
    state.push_cue(AudioCue::Fire);
}

/// Move every entity one step and drop the ones that aged out.
fn update_entities(state: &mut GameState, profile: &PilotProfile) {
    for proj in state.projectiles.iter_mut() {
        proj.update();
    }
    state.projectiles.retain(|p| !p.is_expired());

    let bounds = state.bounds;
    for proj in state.enemy_projectiles.iter_mut() {
        proj.update();
    }
    state.enemy_projectiles.retain(|p| !p.is_expired(bounds));

    for enemy in state.enemies.iter_mut() {
        enemy.update();
    }
    state.enemies.retain(|e| !e.is_expired(bounds));

    if let Some(boss) = state.boss.as_mut() {
        boss.update(state.now_tick, state.enemy_base_speed, bounds);
        if boss.tick_weapon() {
            state.enemy_projectiles.extend(boss.volley());
        }
    }

    let player_center = state.player.center();
    let magnet = profile.player_stats.magnet_range;
    for powerup in state.powerups.iter_mut() {
        powerup.update(player_center, magnet);
    }
    state.powerups.retain(|p| !p.is_expired(bounds));

    for particle in state.particles.iter_mut() {
        particle.update();
    }
    state.particles.retain(|p| !p.is_expired());
}

/// Count down the timed powerup and slow-mo; restore the saved base speed
/// exactly when slow-mo expires.
fn tick_effect_timers(state: &mut GameState) {
    let effects = &mut state.effects;
    if effects.powerup_ticks > 0 {
        effects.powerup_ticks -= 1;
        if effects.powerup_ticks == 0 {
            effects.active = None;
        }
    }
    if effects.slow_mo_ticks > 0 {
        effects.slow_mo_ticks -= 1;
        if effects.slow_mo_ticks == 0 {
            if let Some(speed) = effects.saved_base_speed.take() {
                state.enemy_base_speed = speed;
            }
        }
    }
}
