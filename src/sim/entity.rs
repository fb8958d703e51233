//! Game entity types: pure data plus per-entity update logic
//!
//! Positions are top-left corners (matching the play-area coordinate system,
//! y growing downward); proximity tests work on centers. Movement is
//! frame-tick based: every tick advances a position by a fixed per-tick
//! speed, there is no delta-time scaling.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::consts::*;
use crate::profile::PlayerStats;
use crate::sim::state::Bounds;

/// Bullet color cycles with the damage level.
const BULLET_COLORS: [&str; 5] = ["#00f2ff", "#39ff14", "#ffff00", "#ff00ff", "#ff2d55"];

/// The player ship. Singleton per session.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    /// Ticks until the next shot is allowed.
    pub cooldown: u32,
    /// Tick of the most recent left-direction press, for dash detection.
    pub last_left_tap: Option<u64>,
    /// Tick of the most recent right-direction press, for dash detection.
    pub last_right_tap: Option<u64>,
    pub color: &'static str,
}

impl Player {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            pos: Vec2::new(
                bounds.width / 2.0 - PLAYER_SIZE / 2.0,
                bounds.height - 100.0,
            ),
            size: PLAYER_SIZE,
            cooldown: 0,
            last_left_tap: None,
            last_right_tap: None,
            color: "#00f2ff",
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Apply held directions, then clamp to the play area.
    pub fn steer(&mut self, dx: f32, dy: f32, stats: &PlayerStats, bounds: Bounds) {
        let speed = PLAYER_BASE_SPEED * stats.speed_multiplier;
        self.pos.x += dx * speed;
        self.pos.y += dy * speed;
        self.clamp_to(bounds);
    }

    /// Lateral dash of fixed distance; no cooldown gate.
    pub fn dash(&mut self, dir: f32, bounds: Bounds) {
        self.pos.x += dir * PLAYER_DASH_DISTANCE;
        self.clamp_to(bounds);
    }

    fn clamp_to(&mut self, bounds: Bounds) {
        self.pos.x = self.pos.x.clamp(0.0, bounds.width - self.size);
        self.pos.y = self.pos.y.clamp(0.0, bounds.height - self.size);
    }

    /// Register a directional press and report whether it completes a
    /// double tap (two presses within the dash window).
    pub fn register_tap(&mut self, dir: f32, now_tick: u64) -> bool {
        let slot = if dir < 0.0 {
            &mut self.last_left_tap
        } else {
            &mut self.last_right_tap
        };
        let dashed = matches!(*slot, Some(prev) if now_tick - prev < DOUBLE_TAP_WINDOW_TICKS);
        *slot = Some(now_tick);
        dashed
    }

    /// Cooldown after a shot: faster with fire-rate levels, halved again
    /// under RAPID_FIRE, floored at 5 ticks.
    pub fn shot_cooldown(fire_rate_level: u32, rapid_fire: bool) -> u32 {
        let base = 15u32.saturating_sub(2 * fire_rate_level).max(5);
        if rapid_fire { (base / 2).max(1) } else { base }
    }
}

/// A player-fired projectile. Travels straight up.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub radius: f32,
    pub color: &'static str,
    pub damage: u32,
    pub crit: bool,
}

impl Projectile {
    pub fn update(&mut self) {
        self.pos.y -= PROJECTILE_SPEED;
    }

    pub fn is_expired(&self) -> bool {
        self.pos.y < 0.0
    }
}

/// Shared damage/color/crit roll for one trigger pull; every projectile of
/// the shot uses the same values.
#[derive(Debug, Clone, Copy)]
pub struct ShotRoll {
    pub damage: u32,
    pub radius: f32,
    pub color: &'static str,
    pub crit: bool,
}

impl ShotRoll {
    pub fn roll<R: Rng>(
        rng: &mut R,
        damage_level: u32,
        stats: &PlayerStats,
        active: Option<PowerupKind>,
    ) -> Self {
        let mut damage = damage_level;
        if active == Some(PowerupKind::DoubleDamage) {
            damage *= 2;
        }
        let crit = stats.crit_chance > 0.0 && rng.random_bool(f64::from(stats.crit_chance).min(1.0));
        if crit {
            damage *= 2;
        }
        let mut radius = PROJECTILE_BASE_RADIUS + stats.projectile_size;
        if crit {
            radius += CRIT_RADIUS_BONUS;
        }
        let color = match active {
            Some(PowerupKind::DoubleDamage) => "#fff",
            Some(PowerupKind::Squadron) => "#39ff14",
            _ => BULLET_COLORS[damage_level as usize % BULLET_COLORS.len()],
        };
        Self {
            damage,
            radius,
            color,
            crit,
        }
    }

    pub fn spawn_at(&self, pos: Vec2) -> Projectile {
        Projectile {
            pos,
            radius: self.radius,
            color: self.color,
            damage: self.damage,
            crit: self.crit,
        }
    }
}

/// A boss-fired projectile. Travels down with a fixed lateral component.
#[derive(Debug, Clone)]
pub struct EnemyProjectile {
    pub pos: Vec2,
    pub vx: f32,
    pub radius: f32,
    pub color: &'static str,
}

impl EnemyProjectile {
    pub fn new(pos: Vec2, vx: f32) -> Self {
        Self {
            pos,
            vx,
            radius: ENEMY_PROJECTILE_RADIUS,
            color: "#ff2d55",
        }
    }

    pub fn update(&mut self) {
        self.pos.x += self.vx;
        self.pos.y += ENEMY_PROJECTILE_SPEED;
    }

    pub fn is_expired(&self, bounds: Bounds) -> bool {
        self.pos.y > bounds.height
    }
}

/// A descending enemy ship.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: f32,
    pub health: i64,
    pub max_health: i64,
    pub speed: f32,
    pub points: u64,
    pub color: &'static str,
}

impl Enemy {
    /// Roll a new enemy at the top edge. Speed and the armored chance both
    /// scale with the current score.
    pub fn spawn<R: Rng>(rng: &mut R, score: u64, base_speed: f32, bounds: Bounds) -> Self {
        let x = rng.random_range(0.0..(bounds.width - ENEMY_SIZE).max(1.0));
        let speed = base_speed + rng.random_range(0.0..0.8) + score as f32 / 5000.0;
        let armored_chance = (score as f64 / 10_000.0).min(ARMORED_CHANCE_CAP);
        let armored = armored_chance > 0.0 && rng.random_bool(armored_chance);
        let (health, points, color) = if armored {
            (3, 500, "#ffaa00")
        } else {
            (1, 100, "#39ff14")
        };
        Self {
            pos: Vec2::new(x, -ENEMY_SIZE),
            size: ENEMY_SIZE,
            health,
            max_health: health,
            speed,
            points,
            color,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn is_expired(&self, bounds: Bounds) -> bool {
        self.pos.y > bounds.height
    }

    pub fn health_ratio(&self) -> f32 {
        (self.health.max(0) as f32) / (self.max_health as f32)
    }
}

/// The boss: descends fast, then hovers and fires spreads.
#[derive(Debug, Clone)]
pub struct Boss {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: i64,
    pub max_health: i64,
    /// Ticks until the next 3-projectile volley.
    pub shoot_cooldown: u32,
    pub points: u64,
    pub color: &'static str,
}

impl Boss {
    /// Boss toughness scales with the score at spawn time.
    pub fn spawn(score: u64, bounds: Bounds) -> Self {
        let health = 20 + (score / 1000) as i64;
        Self {
            pos: Vec2::new(bounds.width / 2.0 - BOSS_WIDTH / 2.0, -BOSS_HEIGHT),
            width: BOSS_WIDTH,
            height: BOSS_HEIGHT,
            health,
            max_health: health,
            shoot_cooldown: BOSS_SHOOT_COOLDOWN_TICKS,
            points: BOSS_POINTS,
            color: "#ff00ff",
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Entry phase: descend at 4x the enemy base speed. Hover phase: hold
    /// height, drift sinusoidally inside the horizontal band.
    pub fn update(&mut self, now_tick: u64, base_speed: f32, bounds: Bounds) {
        let hover_y = bounds.height * BOSS_HOVER_FRACTION;
        if self.pos.y < hover_y {
            self.pos.y += 4.0 * base_speed;
        } else {
            self.pos.y = hover_y;
            self.pos.x += (now_tick as f32 / 60.0).sin() * 2.0;
            self.pos.x = self.pos.x.clamp(0.0, bounds.width - self.width);
        }
    }

    /// Count down the volley timer; true when a spread should fire this tick.
    pub fn tick_weapon(&mut self) -> bool {
        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
            false
        } else {
            self.shoot_cooldown = BOSS_SHOOT_COOLDOWN_TICKS;
            true
        }
    }

    /// Spawn positions and lateral speeds for one 3-projectile spread.
    pub fn volley(&self) -> [EnemyProjectile; 3] {
        let muzzle = Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height);
        [
            EnemyProjectile::new(muzzle, -1.5),
            EnemyProjectile::new(muzzle, 0.0),
            EnemyProjectile::new(muzzle, 1.5),
        ]
    }

    pub fn health_ratio(&self) -> f32 {
        (self.health.max(0) as f32) / (self.max_health as f32)
    }
}

/// Ephemeral explosion debris. Visual only, never collides.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: &'static str,
    pub alpha: f32,
}

impl Particle {
    pub fn spawn<R: Rng>(rng: &mut R, pos: Vec2, color: &'static str) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 4.0,
                (rng.random::<f32>() - 0.5) * 4.0,
            ),
            radius: rng.random::<f32>() * 3.0 + 1.0,
            color,
            alpha: 1.0,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.alpha -= 0.03;
    }

    pub fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Timed-effect powerup kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerupKind {
    RapidFire,
    Squadron,
    DoubleDamage,
    Shield,
    SlowMo,
}

const ALL_POWERUPS: [PowerupKind; 5] = [
    PowerupKind::RapidFire,
    PowerupKind::Squadron,
    PowerupKind::DoubleDamage,
    PowerupKind::Shield,
    PowerupKind::SlowMo,
];

impl PowerupKind {
    pub fn color(&self) -> &'static str {
        match self {
            PowerupKind::RapidFire => "#ffff00",
            PowerupKind::Squadron => "#00ff00",
            PowerupKind::DoubleDamage => "#ff00ff",
            PowerupKind::Shield => "#00f2ff",
            PowerupKind::SlowMo => "#ffffff",
        }
    }

    /// Whether this kind adds the spread-shot side projectiles while active.
    pub fn is_spread(&self) -> bool {
        matches!(self, PowerupKind::Squadron)
    }
}

/// A falling collectible powerup.
#[derive(Debug, Clone)]
pub struct Powerup {
    pub pos: Vec2,
    pub size: f32,
    pub kind: PowerupKind,
}

impl Powerup {
    pub fn spawn<R: Rng>(rng: &mut R, pos: Vec2) -> Self {
        let kind = ALL_POWERUPS[rng.random_range(0..ALL_POWERUPS.len())];
        Self {
            pos,
            size: 40.0,
            kind,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Fall, with a magnet pull toward the player when the magnet-range
    /// stat covers the current separation.
    pub fn update(&mut self, player_center: Vec2, magnet_range: f32) {
        self.pos.y += POWERUP_FALL_SPEED;
        if magnet_range > 0.0 {
            let to_player = player_center - self.center();
            let dist = to_player.length();
            if dist > 1.0 && dist < magnet_range {
                self.pos += to_player / dist * 3.0;
            }
        }
    }

    pub fn is_expired(&self, bounds: Bounds) -> bool {
        self.pos.y > bounds.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bounds;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    #[test]
    fn shot_cooldown_formula() {
        assert_eq!(Player::shot_cooldown(0, false), 15);
        assert_eq!(Player::shot_cooldown(3, false), 9);
        // Floored at 5 no matter how high the level goes.
        assert_eq!(Player::shot_cooldown(5, false), 5);
        assert_eq!(Player::shot_cooldown(20, false), 5);
        // Rapid fire halves it.
        assert_eq!(Player::shot_cooldown(0, true), 7);
        assert_eq!(Player::shot_cooldown(20, true), 2);
    }

    #[test]
    fn double_tap_within_window_dashes() {
        let mut player = Player::new(bounds());
        assert!(!player.register_tap(-1.0, 100));
        assert!(player.register_tap(-1.0, 110));
        // Window expired: single tap again.
        assert!(!player.register_tap(-1.0, 200));
        // Opposite directions never pair up.
        assert!(!player.register_tap(1.0, 201));
    }

    #[test]
    fn dash_clamps_to_bounds() {
        let mut player = Player::new(bounds());
        player.pos.x = 10.0;
        player.dash(-1.0, bounds());
        assert_eq!(player.pos.x, 0.0);
        player.pos.x = 700.0;
        player.dash(1.0, bounds());
        assert_eq!(player.pos.x, 800.0 - player.size);
    }

    #[test]
    fn shot_roll_without_crit_stat_never_crits() {
        let mut rng = Pcg32::seed_from_u64(1);
        let stats = crate::profile::PlayerStats::default();
        for _ in 0..100 {
            let roll = ShotRoll::roll(&mut rng, 1, &stats, None);
            assert!(!roll.crit);
            assert_eq!(roll.damage, 1);
            assert_eq!(roll.radius, PROJECTILE_BASE_RADIUS);
        }
    }

    #[test]
    fn double_damage_doubles_and_whitens() {
        let mut rng = Pcg32::seed_from_u64(1);
        let stats = crate::profile::PlayerStats::default();
        let roll = ShotRoll::roll(&mut rng, 3, &stats, Some(PowerupKind::DoubleDamage));
        assert_eq!(roll.damage, 6);
        assert_eq!(roll.color, "#fff");
    }

    #[test]
    fn enemy_speed_scales_with_score() {
        let mut rng = Pcg32::seed_from_u64(2);
        let slow = Enemy::spawn(&mut rng, 0, ENEMY_BASE_SPEED, bounds());
        assert!(slow.speed >= ENEMY_BASE_SPEED && slow.speed < ENEMY_BASE_SPEED + 0.8);
        let fast = Enemy::spawn(&mut rng, 10_000, ENEMY_BASE_SPEED, bounds());
        assert!(fast.speed >= ENEMY_BASE_SPEED + 2.0);
    }

    #[test]
    fn zero_score_never_spawns_armored() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let enemy = Enemy::spawn(&mut rng, 0, ENEMY_BASE_SPEED, bounds());
            assert_eq!(enemy.health, 1);
            assert_eq!(enemy.points, 100);
        }
    }

    #[test]
    fn boss_descends_then_hovers() {
        let b = bounds();
        let mut boss = Boss::spawn(0, b);
        let hover_y = b.height * BOSS_HOVER_FRACTION;
        for tick in 0..10_000u64 {
            boss.update(tick, ENEMY_BASE_SPEED, b);
            assert!(boss.pos.y <= hover_y);
        }
        assert_eq!(boss.pos.y, hover_y);
        assert!(boss.pos.x >= 0.0 && boss.pos.x <= b.width - boss.width);
    }

    #[test]
    fn boss_volley_fires_every_hundred_ticks() {
        let mut boss = Boss::spawn(0, bounds());
        let mut fired = 0;
        for _ in 0..=(2 * BOSS_SHOOT_COOLDOWN_TICKS + 1) {
            if boss.tick_weapon() {
                fired += 1;
            }
        }
        assert_eq!(fired, 2);
        assert_eq!(boss.volley().len(), 3);
    }

    #[test]
    fn particle_fades_out() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut particle = Particle::spawn(&mut rng, Vec2::ZERO, "#fff");
        let mut ticks = 0;
        while !particle.is_expired() {
            particle.update();
            ticks += 1;
            assert!(ticks < 100);
        }
    }

    #[test]
    fn magnet_pulls_powerup_toward_player() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut powerup = Powerup::spawn(&mut rng, Vec2::new(100.0, 100.0));
        let player_center = Vec2::new(160.0, 100.0);
        let before = (player_center - powerup.center()).length();
        powerup.update(player_center, 200.0);
        let after = (player_center - powerup.center()).length();
        assert!(after < before);

        // Out of range: only gravity applies.
        let mut far = Powerup::spawn(&mut rng, Vec2::new(100.0, 100.0));
        let x_before = far.pos.x;
        far.update(Vec2::new(700.0, 500.0), 50.0);
        assert_eq!(far.pos.x, x_before);
    }
}
