//! Pilot profile: credits, permanent upgrades and stat bonuses
//!
//! Single source of truth for everything that survives between runs. All
//! purchases are atomic check-then-commit: read the balance, verify
//! affordability, debit, apply the effect. Unaffordable or stale purchases
//! are silent no-ops, never errors.
//!
//! The struct doubles as the save record; serialized field names match the
//! original localStorage schema.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::stock::{self, StockItem};

/// The three permanent upgrade tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    FireRate,
    Damage,
    SideCannons,
}

/// Current purchase price per upgrade track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeCosts {
    pub fire_rate: u64,
    pub damage: u64,
    pub side_cannons: u64,
}

impl Default for UpgradeCosts {
    fn default() -> Self {
        Self {
            fire_rate: 500,
            damage: 1000,
            side_cannons: 5000,
        }
    }
}

/// Additive stat bonuses unlocked through stock purchases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub crit_chance: f32,
    pub magnet_range: f32,
    pub bonus_credits: f32,
    pub shield_capacity: f32,
    pub projectile_size: f32,
    pub speed_multiplier: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            crit_chance: 0.0,
            magnet_range: 0.0,
            bonus_credits: 0.0,
            shield_capacity: 0.0,
            projectile_size: 0.0,
            speed_multiplier: 1.0,
        }
    }
}

impl PlayerStats {
    /// Absorbable hits granted by a SHIELD pickup.
    pub fn shield_hits(&self) -> u32 {
        1 + self.shield_capacity.floor() as u32
    }
}

/// A named pilot's persistent progression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PilotProfile {
    pub pilot_name: String,
    pub credits: u64,
    pub fire_rate_level: u32,
    pub damage_level: u32,
    pub side_cannons_level: u32,
    pub upgrade_costs: UpgradeCosts,
    #[serde(default)]
    pub stock: Vec<StockItem>,
    /// Epoch milliseconds of the next wholesale stock refresh.
    #[serde(default)]
    pub next_stock_refresh: f64,
    #[serde(default)]
    pub player_stats: PlayerStats,
}

impl PilotProfile {
    /// Fresh profile for a pilot who has never flown.
    pub fn new(pilot_name: &str) -> Self {
        Self {
            pilot_name: pilot_name.trim().to_uppercase(),
            credits: 0,
            fire_rate_level: 0,
            damage_level: 1,
            side_cannons_level: 0,
            upgrade_costs: UpgradeCosts::default(),
            stock: Vec::new(),
            next_stock_refresh: 0.0,
            player_stats: PlayerStats::default(),
        }
    }

    /// Buy one level of a permanent upgrade.
    ///
    /// Debits the current listed cost, bumps the level and grows the cost by
    /// the track's factor. Returns false (and changes nothing) when the
    /// pilot cannot afford it.
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> bool {
        let cost = self.upgrade_cost(kind);
        if self.credits < cost {
            return false;
        }
        self.credits -= cost;
        match kind {
            UpgradeKind::FireRate => {
                self.fire_rate_level += 1;
                self.upgrade_costs.fire_rate = (cost as f64 * 1.5).floor() as u64;
            }
            UpgradeKind::Damage => {
                self.damage_level += 1;
                self.upgrade_costs.damage = (cost as f64 * 1.8).floor() as u64;
            }
            UpgradeKind::SideCannons => {
                self.side_cannons_level += 1;
                self.upgrade_costs.side_cannons = cost * 3;
            }
        }
        log::info!(
            "{} bought {:?} for {} credits ({} left)",
            self.pilot_name,
            kind,
            cost,
            self.credits
        );
        true
    }

    /// Current listed cost for an upgrade track.
    pub fn upgrade_cost(&self, kind: UpgradeKind) -> u64 {
        match kind {
            UpgradeKind::FireRate => self.upgrade_costs.fire_rate,
            UpgradeKind::Damage => self.upgrade_costs.damage,
            UpgradeKind::SideCannons => self.upgrade_costs.side_cannons,
        }
    }

    /// Buy a stock item by id.
    ///
    /// No-op when the item is missing, already purchased or unaffordable.
    /// On success the item is marked purchased and its stat delta is added
    /// to the pilot's bonuses.
    pub fn purchase_stock_item(&mut self, id: u32) -> bool {
        let Some(idx) = self.stock.iter().position(|i| i.id == id) else {
            return false;
        };
        let item = &self.stock[idx];
        if item.purchased || self.credits < item.cost {
            return false;
        }
        let cost = item.cost;
        let delta = item.stat_delta();
        let kind = item.kind;
        self.credits -= cost;
        self.stock[idx].purchased = true;
        let stats = &mut self.player_stats;
        match kind {
            crate::stock::StatKind::CritChance => stats.crit_chance += delta,
            crate::stock::StatKind::MagnetRange => stats.magnet_range += delta,
            crate::stock::StatKind::BonusCredits => stats.bonus_credits += delta,
            crate::stock::StatKind::ShieldCapacity => stats.shield_capacity += delta,
            crate::stock::StatKind::ProjectileSize => stats.projectile_size += delta,
            crate::stock::StatKind::SpeedMultiplier => stats.speed_multiplier += delta,
        }
        log::info!(
            "{} bought stock item {} ({}) for {} credits",
            self.pilot_name,
            id,
            kind.name(),
            cost
        );
        true
    }

    /// Wholesale-replace the inventory and push the refresh deadline out.
    pub fn generate_stock<R: Rng>(&mut self, rng: &mut R, now_ms: f64) {
        self.stock = stock::generate_stock(rng);
        self.next_stock_refresh = stock::next_refresh_deadline(now_ms);
    }

    /// Regenerate the inventory if it is empty or the refresh window passed.
    ///
    /// Idempotent inside the window: at most one regeneration per deadline.
    pub fn maybe_refresh_stock<R: Rng>(&mut self, rng: &mut R, now_ms: f64) -> bool {
        if stock::refresh_due(&self.stock, self.next_stock_refresh, now_ms) {
            self.generate_stock(rng, now_ms);
            true
        } else {
            false
        }
    }

    /// Credits earned for a kill worth `points`, scaled by the bonus stat.
    pub fn kill_credits(&self, points: u64) -> u64 {
        ((points as f64 / 10.0) * (1.0 + self.player_stats.bonus_credits as f64)).floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn unaffordable_upgrade_is_a_noop() {
        let mut profile = PilotProfile::new("ACE");
        profile.credits = 400;
        assert!(!profile.purchase_upgrade(UpgradeKind::FireRate));
        assert_eq!(profile.credits, 400);
        assert_eq!(profile.fire_rate_level, 0);
        assert_eq!(profile.upgrade_costs.fire_rate, 500);
    }

    #[test]
    fn upgrade_debits_and_grows_cost() {
        let mut profile = PilotProfile::new("ACE");
        profile.credits = 2000;
        assert!(profile.purchase_upgrade(UpgradeKind::FireRate));
        assert_eq!(profile.credits, 1500);
        assert_eq!(profile.fire_rate_level, 1);
        assert_eq!(profile.upgrade_costs.fire_rate, 750);

        assert!(profile.purchase_upgrade(UpgradeKind::Damage));
        assert_eq!(profile.credits, 500);
        assert_eq!(profile.damage_level, 2);
        assert_eq!(profile.upgrade_costs.damage, 1800);
    }

    #[test]
    fn side_cannon_cost_triples() {
        let mut profile = PilotProfile::new("ACE");
        profile.credits = 20_000;
        assert!(profile.purchase_upgrade(UpgradeKind::SideCannons));
        assert_eq!(profile.upgrade_costs.side_cannons, 15_000);
        assert!(profile.purchase_upgrade(UpgradeKind::SideCannons));
        assert_eq!(profile.side_cannons_level, 2);
        assert_eq!(profile.credits, 0);
    }

    #[test]
    fn stock_purchase_marks_item_and_applies_stat() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut profile = PilotProfile::new("NOVA");
        profile.generate_stock(&mut rng, 0.0);
        profile.credits = 1_000_000;

        let item = profile.stock[0].clone();
        let before = profile.credits;
        assert!(profile.purchase_stock_item(item.id));
        assert_eq!(profile.credits, before - item.cost);
        assert!(profile.stock[0].purchased);

        // Second purchase of the same item must be rejected.
        assert!(!profile.purchase_stock_item(item.id));
        assert_eq!(profile.credits, before - item.cost);
    }

    #[test]
    fn missing_stock_id_is_a_noop() {
        let mut profile = PilotProfile::new("NOVA");
        profile.credits = 999;
        assert!(!profile.purchase_stock_item(4242));
        assert_eq!(profile.credits, 999);
    }

    #[test]
    fn refresh_is_idempotent_inside_window() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut profile = PilotProfile::new("NOVA");
        assert!(profile.maybe_refresh_stock(&mut rng, 1000.0));
        let snapshot: Vec<u64> = profile.stock.iter().map(|i| i.cost).collect();
        assert!(!profile.maybe_refresh_stock(&mut rng, 2000.0));
        let after: Vec<u64> = profile.stock.iter().map(|i| i.cost).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn pilot_name_is_uppercased() {
        let profile = PilotProfile::new("  maverick ");
        assert_eq!(profile.pilot_name, "MAVERICK");
    }

    #[test]
    fn kill_credits_scale_with_bonus() {
        let mut profile = PilotProfile::new("ACE");
        assert_eq!(profile.kill_credits(100), 10);
        profile.player_stats.bonus_credits = 0.5;
        assert_eq!(profile.kill_credits(100), 15);
        assert_eq!(profile.kill_credits(5000), 750);
    }

    proptest! {
        #[test]
        fn purchases_never_overdraw(credits in 0u64..10_000, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut profile = PilotProfile::new("P");
            profile.credits = credits;
            profile.generate_stock(&mut rng, 0.0);
            for id in 0..20u32 {
                let _ = profile.purchase_stock_item(id);
            }
            let _ = profile.purchase_upgrade(UpgradeKind::FireRate);
            let _ = profile.purchase_upgrade(UpgradeKind::Damage);
            // u64 balance cannot go negative; the real check is that every
            // debit was covered by the pre-purchase balance.
            prop_assert!(profile.credits <= credits);
        }
    }
}
