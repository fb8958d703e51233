//! Session state: one explicit aggregate owned by the game loop
//!
//! Everything run-scoped lives here - entity containers, score, lives, timed
//! effects, the seeded RNG and the delayed-event queue. Nothing is ambient or
//! module-global; the tick function receives the aggregate by reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::AudioCue;
use crate::consts::*;
use crate::sim::entity::{
    Boss, Enemy, EnemyProjectile, Particle, Player, Powerup, PowerupKind, Projectile,
};

/// Play-area dimensions in simulation units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(DEFAULT_PLAY_WIDTH, DEFAULT_PLAY_HEIGHT)
    }
}

/// Current phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No run in progress
    Idle,
    /// Fixed ship-ascent animation, non-interactive
    Launching,
    /// Full tick: input, updates, collisions, timers
    Running,
    /// Final score reported, drivers stopped
    Ended,
}

/// Timed buff/debuff state for the current run.
///
/// Only one of the timed kinds occupies `active` at a time; shield hits and
/// slow-mo are tracked independently.
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    /// The single-slot timed powerup (RAPID_FIRE / SQUADRON / DOUBLE_DAMAGE).
    pub active: Option<PowerupKind>,
    pub powerup_ticks: u32,
    /// Absorbable incoming hits remaining.
    pub shield_hits: u32,
    pub slow_mo_ticks: u32,
    /// Base enemy speed to restore when slow-mo expires.
    pub saved_base_speed: Option<f32>,
}

/// A side effect scheduled for a future tick.
#[derive(Debug, Clone)]
pub enum DelayedEvent {
    /// Secondary explosion burst after a boss death.
    BossExplosion { pos: Vec2 },
}

#[derive(Debug, Clone)]
struct ScheduledEvent {
    at_tick: u64,
    event: DelayedEvent,
}

/// Complete run-scoped simulation state.
#[derive(Debug)]
pub struct GameState {
    pub bounds: Bounds,
    pub phase: GamePhase,
    pub now_tick: u64,
    pub score: u64,
    pub lives: u32,
    pub player: Player,
    /// Ship y during the launch ascent.
    pub launch_y: f32,
    pub projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    pub enemies: Vec<Enemy>,
    /// At most one boss on screen; `None` when no boss is alive.
    pub boss: Option<Boss>,
    pub powerups: Vec<Powerup>,
    pub particles: Vec<Particle>,
    pub effects: ActiveEffects,
    /// Current base enemy speed; halved while slow-mo is active.
    pub enemy_base_speed: f32,
    /// Run seed, for reproducibility.
    pub seed: u64,
    pub rng: Pcg32,
    scheduled: Vec<ScheduledEvent>,
    /// Cues emitted this tick, drained by the audio collaborator.
    pub cues: Vec<AudioCue>,
    /// Set whenever credits changed; the session flushes a save and clears it.
    pub credits_dirty: bool,
}

impl GameState {
    pub fn new(seed: u64, bounds: Bounds) -> Self {
        Self {
            bounds,
            phase: GamePhase::Idle,
            now_tick: 0,
            score: 0,
            lives: STARTING_LIVES,
            player: Player::new(bounds),
            launch_y: bounds.height + 200.0,
            projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            enemies: Vec::new(),
            boss: None,
            powerups: Vec::new(),
            particles: Vec::new(),
            effects: ActiveEffects::default(),
            enemy_base_speed: ENEMY_BASE_SPEED,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            scheduled: Vec::new(),
            cues: Vec::new(),
            credits_dirty: false,
        }
    }

    /// Reset all run-scoped state and begin the launch ascent.
    ///
    /// Permanent progression lives in the pilot profile and is untouched.
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.player = Player::new(self.bounds);
        self.launch_y = self.bounds.height + 200.0;
        self.projectiles.clear();
        self.enemy_projectiles.clear();
        self.enemies.clear();
        self.boss = None;
        self.powerups.clear();
        self.particles.clear();
        self.effects = ActiveEffects::default();
        self.enemy_base_speed = ENEMY_BASE_SPEED;
        self.scheduled.clear();
        self.phase = GamePhase::Launching;
        self.push_cue(AudioCue::Launch);
    }

    pub fn push_cue(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    /// Drain the cues emitted since the last drain.
    pub fn drain_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }

    /// Spawn one 15-particle explosion burst.
    pub fn spawn_explosion(&mut self, pos: Vec2, color: &'static str) {
        for _ in 0..EXPLOSION_PARTICLES {
            let particle = Particle::spawn(&mut self.rng, pos, color);
            self.particles.push(particle);
        }
    }

    /// Schedule an event `delay` ticks from now.
    pub fn schedule(&mut self, delay: u64, event: DelayedEvent) {
        self.scheduled.push(ScheduledEvent {
            at_tick: self.now_tick + delay,
            event,
        });
    }

    /// Pop every scheduled event that is due at the current tick.
    pub fn due_events(&mut self) -> Vec<DelayedEvent> {
        let now = self.now_tick;
        let mut due = Vec::new();
        self.scheduled.retain(|s| {
            if s.at_tick <= now {
                due.push(s.event.clone());
                false
            } else {
                true
            }
        });
        due
    }

    /// Number of events still waiting on the tick timeline.
    pub fn pending_events(&self) -> usize {
        self.scheduled.len()
    }
}
