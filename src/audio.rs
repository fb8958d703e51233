//! Named audio cues emitted by the simulation
//!
//! The core knows nothing about tone synthesis; it pushes cues into a
//! per-tick queue that a sound collaborator drains and maps to playback.

/// Discrete sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Player fired a shot
    Fire,
    /// Player dashed sideways
    Dash,
    /// Enemy destroyed
    EnemyKilled,
    /// Projectile hit an enemy without killing it
    EnemyHit,
    /// Shield absorbed an incoming threat
    ShieldAbsorb,
    /// Player lost a life
    PlayerHit,
    /// Powerup collected
    PowerupCollected,
    /// Boss entered the play area
    BossSpawned,
    /// Boss destroyed
    BossKilled,
    /// Secondary boss-death explosion burst
    BossExplosion,
    /// Purchase accepted
    PurchaseAccepted,
    /// Purchase rejected (unaffordable or unavailable)
    PurchaseDenied,
    /// Ship launch sequence started
    Launch,
    /// Run ended
    GameOver,
}

impl AudioCue {
    /// Stable name for logging and external cue routing.
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Fire => "fire",
            AudioCue::Dash => "dash",
            AudioCue::EnemyKilled => "enemy-killed",
            AudioCue::EnemyHit => "enemy-hit",
            AudioCue::ShieldAbsorb => "shield-absorb",
            AudioCue::PlayerHit => "player-hit",
            AudioCue::PowerupCollected => "powerup-collected",
            AudioCue::BossSpawned => "boss-spawned",
            AudioCue::BossKilled => "boss-killed",
            AudioCue::BossExplosion => "boss-explosion",
            AudioCue::PurchaseAccepted => "purchase-accepted",
            AudioCue::PurchaseDenied => "purchase-denied",
            AudioCue::Launch => "launch",
            AudioCue::GameOver => "game-over",
        }
    }
}
