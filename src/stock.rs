//! Randomized stock-shop inventory
//!
//! A time-limited list of one-time permanent stat boosts. Each rarity tier
//! contributes a fixed number of items; costs are rolled once at generation
//! (+/-20% of the tier base) and never change afterwards. The whole inventory
//! is regenerated wholesale every ten minutes of wall-clock time, or whenever
//! it is empty.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::STOCK_REFRESH_MS;

/// Rarity tiers, rarest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Rarity {
    Mythic,
    Legendary,
    Epic,
    Rare,
    Uncommon,
    Common,
}

/// All tiers in generation order (rarest first).
pub const ALL_RARITIES: [Rarity; 6] = [
    Rarity::Mythic,
    Rarity::Legendary,
    Rarity::Epic,
    Rarity::Rare,
    Rarity::Uncommon,
    Rarity::Common,
];

impl Rarity {
    /// Number of items this tier contributes to a fresh inventory.
    pub fn population(&self) -> usize {
        match self {
            Rarity::Mythic => 5,
            Rarity::Legendary => 10,
            Rarity::Epic => 15,
            Rarity::Rare => 20,
            Rarity::Uncommon => 25,
            Rarity::Common => 30,
        }
    }

    /// Base cost before the +/-20% roll.
    pub fn base_cost(&self) -> u64 {
        match self {
            Rarity::Mythic => 100_000,
            Rarity::Legendary => 50_000,
            Rarity::Epic => 20_000,
            Rarity::Rare => 5_000,
            Rarity::Uncommon => 1_500,
            Rarity::Common => 500,
        }
    }

    /// Stat-delta multiplier; rarer items give bigger boosts.
    pub fn stat_weight(&self) -> f32 {
        match self {
            Rarity::Mythic => 10.0,
            Rarity::Legendary => 6.0,
            Rarity::Epic => 4.0,
            Rarity::Rare => 2.5,
            Rarity::Uncommon => 1.5,
            Rarity::Common => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Mythic => "Mythic",
            Rarity::Legendary => "Legendary",
            Rarity::Epic => "Epic",
            Rarity::Rare => "Rare",
            Rarity::Uncommon => "Uncommon",
            Rarity::Common => "Common",
        }
    }
}

impl From<Rarity> for u8 {
    fn from(r: Rarity) -> u8 {
        ALL_RARITIES.iter().position(|&x| x == r).unwrap_or(5) as u8
    }
}

impl From<u8> for Rarity {
    fn from(id: u8) -> Rarity {
        *ALL_RARITIES.get(id as usize).unwrap_or(&Rarity::Common)
    }
}

/// The six purchasable stat effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum StatKind {
    CritChance,
    MagnetRange,
    BonusCredits,
    ShieldCapacity,
    ProjectileSize,
    SpeedMultiplier,
}

const ALL_STAT_KINDS: [StatKind; 6] = [
    StatKind::CritChance,
    StatKind::MagnetRange,
    StatKind::BonusCredits,
    StatKind::ShieldCapacity,
    StatKind::ProjectileSize,
    StatKind::SpeedMultiplier,
];

impl StatKind {
    /// Per-item delta at weight 1.0 (Common); scaled by `Rarity::stat_weight`.
    pub fn base_delta(&self) -> f32 {
        match self {
            StatKind::CritChance => 0.01,
            StatKind::MagnetRange => 10.0,
            StatKind::BonusCredits => 0.05,
            StatKind::ShieldCapacity => 0.5,
            StatKind::ProjectileSize => 0.5,
            StatKind::SpeedMultiplier => 0.02,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatKind::CritChance => "Crit Chance",
            StatKind::MagnetRange => "Magnet Range",
            StatKind::BonusCredits => "Bonus Credits",
            StatKind::ShieldCapacity => "Shield Capacity",
            StatKind::ProjectileSize => "Projectile Size",
            StatKind::SpeedMultiplier => "Engine Tuning",
        }
    }
}

impl From<StatKind> for u8 {
    fn from(k: StatKind) -> u8 {
        ALL_STAT_KINDS.iter().position(|&x| x == k).unwrap_or(0) as u8
    }
}

impl From<u8> for StatKind {
    fn from(id: u8) -> StatKind {
        *ALL_STAT_KINDS.get(id as usize).unwrap_or(&StatKind::CritChance)
    }
}

/// A single purchasable shop entry.
///
/// Serialized field names match the original save schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    pub id: u32,
    #[serde(rename = "rarityId")]
    pub rarity: Rarity,
    #[serde(rename = "typeId")]
    pub kind: StatKind,
    pub cost: u64,
    pub purchased: bool,
}

impl StockItem {
    /// Stat delta this item grants when purchased.
    pub fn stat_delta(&self) -> f32 {
        self.kind.base_delta() * self.rarity.stat_weight()
    }
}

/// Generate a complete fresh inventory, sorted rarest first.
///
/// Item ids are sequential within the batch; costs are rolled uniformly in
/// [0.8, 1.2] x tier base and fixed from then on.
pub fn generate_stock<R: Rng>(rng: &mut R) -> Vec<StockItem> {
    let mut items = Vec::new();
    let mut next_id: u32 = 0;
    for rarity in ALL_RARITIES {
        for _ in 0..rarity.population() {
            let kind = ALL_STAT_KINDS[rng.random_range(0..ALL_STAT_KINDS.len())];
            let cost = (rarity.base_cost() as f64 * rng.random_range(0.8..=1.2)).round() as u64;
            items.push(StockItem {
                id: next_id,
                rarity,
                kind,
                cost,
                purchased: false,
            });
            next_id += 1;
        }
    }
    log::debug!("generated {} stock items", items.len());
    items
}

/// When the next wholesale refresh is due, given the current wall clock.
pub fn next_refresh_deadline(now_ms: f64) -> f64 {
    now_ms + STOCK_REFRESH_MS
}

/// Whether the inventory must be regenerated right now.
pub fn refresh_due(stock: &[StockItem], next_refresh_ms: f64, now_ms: f64) -> bool {
    stock.is_empty() || now_ms >= next_refresh_ms
}
