//! Collision and combat resolution
//!
//! One pass per tick over the current entity containers. Removals are never
//! done mid-iteration: each scan collects intents (damage, deaths, pickups)
//! and applies them afterwards, so a projectile consumed by one enemy is
//! never re-evaluated against the next.

use glam::Vec2;
use rand::Rng;

use crate::audio::AudioCue;
use crate::consts::*;
use crate::profile::PilotProfile;
use crate::sim::entity::{Powerup, PowerupKind};
use crate::sim::state::{DelayedEvent, GameState};

/// Ticks between the staggered secondary explosions of a boss death.
const BOSS_EXPLOSION_STAGGER_TICKS: u64 = 6;
/// Number of staggered secondary explosions.
const BOSS_EXPLOSION_BURSTS: u64 = 5;

/// What the combat pass decided this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatOutcome {
    /// Lives reached zero during this pass.
    pub game_over: bool,
    /// The boss died during this pass; spawning pauses for the grace window.
    pub boss_killed: bool,
}

/// Resolve all proximity tests and their side effects for the current tick.
pub fn resolve(state: &mut GameState, profile: &mut PilotProfile) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();
    resolve_projectile_hits(state, profile, &mut outcome);
    resolve_player_enemy(state, &mut outcome);
    resolve_player_enemy_projectiles(state, &mut outcome);
    resolve_powerup_pickups(state, profile);
    outcome
}

/// Player projectiles against enemies and the boss.
///
/// Damage accumulates first, deaths resolve after the scan. Each projectile
/// hits at most one target and is destroyed on contact.
fn resolve_projectile_hits(
    state: &mut GameState,
    profile: &mut PilotProfile,
    outcome: &mut CombatOutcome,
) {
    let mut consumed = vec![false; state.projectiles.len()];
    let mut impacts: Vec<Vec2> = Vec::new();

    for pi in 0..state.projectiles.len() {
        let pos = state.projectiles[pi].pos;
        let damage = state.projectiles[pi].damage as i64;
        let mut hit = false;

        for enemy in state.enemies.iter_mut() {
            if (pos - enemy.center()).length_squared() < PROJECTILE_ENEMY_DIST_SQ {
                enemy.health -= damage;
                if enemy.health > 0 {
                    impacts.push(pos);
                }
                hit = true;
                break;
            }
        }
        if !hit
            && let Some(boss) = state.boss.as_mut()
            && (pos - boss.center()).length_squared() < PROJECTILE_ENEMY_DIST_SQ
        {
            boss.health -= damage;
            if boss.health > 0 {
                impacts.push(pos);
            }
            hit = true;
        }
        consumed[pi] = hit;
    }

    let mut keep = consumed.iter().map(|c| !c);
    state.projectiles.retain(|_| keep.next().unwrap_or(true));
    for pos in impacts {
        state.spawn_explosion(pos, "#fff");
        state.push_cue(AudioCue::EnemyHit);
    }

    // Death resolution: same tick the health crossed zero.
    let mut killed = Vec::new();
    let mut ei = 0;
    while ei < state.enemies.len() {
        if state.enemies[ei].health <= 0 {
            killed.push(state.enemies.remove(ei));
        } else {
            ei += 1;
        }
    }
    for enemy in killed {
        let center = enemy.center();
        state.spawn_explosion(center, enemy.color);
        state.push_cue(AudioCue::EnemyKilled);
        grant_kill_reward(state, profile, enemy.points);
        if state.rng.random_bool(POWERUP_DROP_CHANCE) {
            let powerup = Powerup::spawn(&mut state.rng, enemy.pos);
            state.powerups.push(powerup);
        }
    }

    if state.boss.as_ref().is_some_and(|b| b.health <= 0) {
        let boss = state.boss.take().expect("checked above");
        resolve_boss_death(state, profile, &boss);
        outcome.boss_killed = true;
    }
}

/// Boss death: fixed reward, guaranteed drops, staggered secondary bursts.
fn resolve_boss_death(
    state: &mut GameState,
    profile: &mut PilotProfile,
    boss: &crate::sim::entity::Boss,
) {
    state.spawn_explosion(boss.center(), boss.color);
    state.push_cue(AudioCue::BossKilled);
    grant_kill_reward(state, profile, boss.points);
    profile.credits += BOSS_CREDIT_BONUS;
    state.credits_dirty = true;

    // Exactly three drops spaced evenly across the boss width.
    for i in 0..3 {
        let x = (boss.pos.x + i as f32 * boss.width / 3.0).rem_euclid(state.bounds.width);
        let powerup = Powerup::spawn(&mut state.rng, Vec2::new(x, boss.pos.y));
        state.powerups.push(powerup);
    }

    for i in 1..=BOSS_EXPLOSION_BURSTS {
        let pos = Vec2::new(
            boss.pos.x + state.rng.random::<f32>() * boss.width,
            boss.pos.y + state.rng.random::<f32>() * boss.height,
        );
        state.schedule(i * BOSS_EXPLOSION_STAGGER_TICKS, DelayedEvent::BossExplosion { pos });
    }
}

/// Points to score, credits to the profile, save flag set.
fn grant_kill_reward(state: &mut GameState, profile: &mut PilotProfile, points: u64) {
    state.score += points;
    profile.credits += profile.kill_credits(points);
    state.credits_dirty = true;
}

/// Player against enemy ships: shield absorbs, otherwise a life is lost.
fn resolve_player_enemy(state: &mut GameState, outcome: &mut CombatOutcome) {
    let player_center = state.player.center();
    let mut overlapping = Vec::new();
    for (ei, enemy) in state.enemies.iter().enumerate() {
        if (player_center - enemy.center()).length_squared() < PLAYER_ENEMY_DIST_SQ {
            overlapping.push(ei);
        }
    }
    for ei in overlapping.into_iter().rev() {
        let enemy = state.enemies.remove(ei);
        if state.effects.shield_hits > 0 {
            state.effects.shield_hits -= 1;
            state.spawn_explosion(enemy.center(), enemy.color);
            state.push_cue(AudioCue::ShieldAbsorb);
        } else {
            state.spawn_explosion(player_center, state.player.color);
            state.push_cue(AudioCue::PlayerHit);
            state.lives = state.lives.saturating_sub(1);
            if state.lives == 0 {
                outcome.game_over = true;
                return;
            }
        }
    }
}

/// Enemy projectiles against the player: always destroyed on contact.
fn resolve_player_enemy_projectiles(state: &mut GameState, outcome: &mut CombatOutcome) {
    let player_center = state.player.center();
    let mut hits = Vec::new();
    for (pi, proj) in state.enemy_projectiles.iter().enumerate() {
        if (player_center - proj.pos).length() < PLAYER_ENEMY_PROJECTILE_DIST {
            hits.push(pi);
        }
    }
    for pi in hits.into_iter().rev() {
        let proj = state.enemy_projectiles.remove(pi);
        if state.effects.shield_hits > 0 {
            state.effects.shield_hits -= 1;
            state.spawn_explosion(proj.pos, proj.color);
            state.push_cue(AudioCue::ShieldAbsorb);
        } else {
            state.spawn_explosion(player_center, state.player.color);
            state.push_cue(AudioCue::PlayerHit);
            state.lives = state.lives.saturating_sub(1);
            if state.lives == 0 {
                outcome.game_over = true;
                return;
            }
        }
    }
}

/// Powerup collection and effect application.
fn resolve_powerup_pickups(state: &mut GameState, profile: &PilotProfile) {
    let player_center = state.player.center();
    let mut collected = Vec::new();
    for (i, powerup) in state.powerups.iter().enumerate() {
        if (player_center - powerup.center()).length() < POWERUP_PICKUP_DIST {
            collected.push(i);
        }
    }
    for i in collected.into_iter().rev() {
        let powerup = state.powerups.remove(i);
        state.spawn_explosion(powerup.center(), powerup.kind.color());
        state.push_cue(AudioCue::PowerupCollected);
        match powerup.kind {
            PowerupKind::Shield => {
                state.effects.shield_hits = profile.player_stats.shield_hits();
            }
            PowerupKind::SlowMo => {
                // Re-pickup refreshes the timer without halving twice.
                if state.effects.slow_mo_ticks == 0 {
                    state.effects.saved_base_speed = Some(state.enemy_base_speed);
                    state.enemy_base_speed *= 0.5;
                }
                state.effects.slow_mo_ticks = SLOW_MO_DURATION_TICKS;
            }
            kind => {
                // Replaces any previous timed powerup.
                state.effects.active = Some(kind);
                state.effects.powerup_ticks = POWERUP_DURATION_TICKS;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ENEMY_BASE_SPEED;
    use crate::sim::entity::{Boss, Enemy, EnemyProjectile, Projectile};
    use crate::sim::state::Bounds;

    fn setup() -> (GameState, PilotProfile) {
        (
            GameState::new(77, Bounds::default()),
            PilotProfile::new("TEST"),
        )
    }

    fn enemy_at(pos: Vec2, health: i64, points: u64) -> Enemy {
        Enemy {
            pos,
            size: 50.0,
            health,
            max_health: health,
            speed: 1.0,
            points,
            color: "#39ff14",
        }
    }

    fn projectile_at(pos: Vec2, damage: u32) -> Projectile {
        Projectile {
            pos,
            radius: 4.0,
            color: "#00f2ff",
            damage,
            crit: false,
        }
    }

    #[test]
    fn armored_enemy_survives_two_weak_hits() {
        let (mut state, mut profile) = setup();
        let enemy = enemy_at(Vec2::new(100.0, 100.0), 3, 500);
        let center = enemy.center();
        state.enemies.push(enemy);

        for _ in 0..2 {
            state.projectiles.push(projectile_at(center, 1));
            resolve(&mut state, &mut profile);
        }
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].health, 1);
        assert_eq!(state.score, 0);
        assert_eq!(profile.credits, 0);

        // Third hit kills within the same pass.
        state.projectiles.push(projectile_at(center, 1));
        resolve(&mut state, &mut profile);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 500);
        assert_eq!(profile.credits, 50);
        assert!(state.credits_dirty);
    }

    #[test]
    fn one_projectile_hits_at_most_one_enemy() {
        let (mut state, mut profile) = setup();
        // Two 1-hp enemies stacked inside the same threshold.
        state.enemies.push(enemy_at(Vec2::new(100.0, 100.0), 1, 100));
        state.enemies.push(enemy_at(Vec2::new(110.0, 100.0), 1, 100));
        state
            .projectiles
            .push(projectile_at(Vec2::new(128.0, 128.0), 5));

        resolve(&mut state, &mut profile);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 100);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn health_never_exceeds_max_after_damage() {
        let (mut state, mut profile) = setup();
        let enemy = enemy_at(Vec2::new(50.0, 50.0), 3, 500);
        let center = enemy.center();
        state.enemies.push(enemy);
        state.projectiles.push(projectile_at(center, 1));
        resolve(&mut state, &mut profile);
        let e = &state.enemies[0];
        assert!(e.health <= e.max_health);
    }

    #[test]
    fn shield_absorbs_enemy_contact_without_life_loss() {
        let (mut state, mut profile) = setup();
        state.effects.shield_hits = 2;
        let player_center = state.player.center();
        state
            .enemies
            .push(enemy_at(player_center - Vec2::splat(25.0), 1, 100));

        let outcome = resolve(&mut state, &mut profile);
        assert!(!outcome.game_over);
        assert_eq!(state.lives, 3);
        assert_eq!(state.effects.shield_hits, 1);
        assert!(state.enemies.is_empty());
        assert!(state.cues.contains(&AudioCue::ShieldAbsorb));
    }

    #[test]
    fn unshielded_contact_costs_a_life_and_last_life_ends_run() {
        let (mut state, mut profile) = setup();
        state.lives = 1;
        let player_center = state.player.center();
        state
            .enemies
            .push(enemy_at(player_center - Vec2::splat(25.0), 1, 100));

        let outcome = resolve(&mut state, &mut profile);
        assert!(outcome.game_over);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn enemy_projectile_destroyed_on_player_contact() {
        let (mut state, mut profile) = setup();
        let player_center = state.player.center();
        state
            .enemy_projectiles
            .push(EnemyProjectile::new(player_center + Vec2::new(10.0, 0.0), 0.0));

        resolve(&mut state, &mut profile);
        assert!(state.enemy_projectiles.is_empty());
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn boss_death_pays_fixed_reward_and_drops_three_powerups() {
        let (mut state, mut profile) = setup();
        let mut boss = Boss::spawn(0, state.bounds);
        boss.pos = Vec2::new(300.0, 90.0);
        boss.health = 1;
        let center = boss.center();
        state.boss = Some(boss);
        state.projectiles.push(projectile_at(center, 5));

        let outcome = resolve(&mut state, &mut profile);
        assert!(outcome.boss_killed);
        assert!(state.boss.is_none());
        assert_eq!(state.score, BOSS_POINTS);
        // floor(5000/10) + flat 1000 bonus
        assert_eq!(profile.credits, 500 + BOSS_CREDIT_BONUS);
        assert_eq!(state.powerups.len(), 3);
        assert_eq!(state.pending_events(), 5);
    }

    #[test]
    fn shield_pickup_sets_hits_from_capacity_stat() {
        let (mut state, mut profile) = setup();
        profile.player_stats.shield_capacity = 2.0;
        let mut powerup = Powerup::spawn(&mut state.rng, Vec2::ZERO);
        powerup.kind = PowerupKind::Shield;
        powerup.pos = state.player.center() - Vec2::splat(powerup.size / 2.0);
        state.powerups.push(powerup);

        resolve(&mut state, &mut profile);
        assert_eq!(state.effects.shield_hits, 3);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn slow_mo_halves_base_speed_once_and_saves_restore_value() {
        let (mut state, mut profile) = setup();
        let mut powerup = Powerup::spawn(&mut state.rng, Vec2::ZERO);
        powerup.kind = PowerupKind::SlowMo;
        powerup.pos = state.player.center() - Vec2::splat(powerup.size / 2.0);
        state.powerups.push(powerup.clone());
        resolve(&mut state, &mut profile);
        assert_eq!(state.enemy_base_speed, ENEMY_BASE_SPEED / 2.0);
        assert_eq!(state.effects.saved_base_speed, Some(ENEMY_BASE_SPEED));

        // Picking up a second slow-mo refreshes the timer, no double halving.
        state.effects.slow_mo_ticks = 10;
        state.powerups.push(powerup);
        resolve(&mut state, &mut profile);
        assert_eq!(state.enemy_base_speed, ENEMY_BASE_SPEED / 2.0);
        assert_eq!(state.effects.slow_mo_ticks, SLOW_MO_DURATION_TICKS);
    }

    #[test]
    fn timed_powerup_replaces_previous_slot() {
        let (mut state, mut profile) = setup();
        state.effects.active = Some(PowerupKind::RapidFire);
        state.effects.powerup_ticks = 100;
        let mut powerup = Powerup::spawn(&mut state.rng, Vec2::ZERO);
        powerup.kind = PowerupKind::DoubleDamage;
        powerup.pos = state.player.center() - Vec2::splat(powerup.size / 2.0);
        state.powerups.push(powerup);

        resolve(&mut state, &mut profile);
        assert_eq!(state.effects.active, Some(PowerupKind::DoubleDamage));
        assert_eq!(state.effects.powerup_ticks, POWERUP_DURATION_TICKS);
    }
}
