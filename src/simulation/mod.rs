//! Monte-Carlo loot simulation
//!
//! Plays thousands of scripted sessions against fresh managers, feeding every
//! draw back in as a gameplay event, to check that the feedback policy never
//! starves a pool and to report how rarity and drops distribute over a run.
//! Sessions are independent and run in parallel with rayon.

use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use tracing::info;

use crate::error::{LootError, LootResult};
use crate::items::{ItemKind, LootItem, Rarity};
use crate::logging::TimingSpan;
use crate::loot::{LootConfig, LootPoolManager, PoolKind};

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub session_count: u64,
    pub events_per_session: u32,
    pub base_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            session_count: 1_000,
            events_per_session: 200,
            base_seed: 42,
        }
    }
}

/// Aggregated results of a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub sessions: u64,
    pub total_draws: u64,
    /// Draws that hit a pool with total weight 0
    pub exhausted_draws: u64,
    /// Events the manager rejected for reasons other than exhaustion
    pub rejected_events: u64,
    /// Sessions that ended with the Legendary tier locked
    pub legendary_locks: u64,
    pub swaps: u64,
    pub rarity_counts: Vec<(Rarity, u64)>,
    pub health_drops: u64,
    pub charge_drops: u64,
    pub power_up_pickups: u64,
}

impl SimulationReport {
    pub fn rarity_share(&self, rarity: Rarity) -> f64 {
        let total: u64 = self.rarity_counts.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return 0.0;
        }
        let count = self
            .rarity_counts
            .iter()
            .find(|(r, _)| *r == rarity)
            .map(|(_, c)| *c)
            .unwrap_or(0);
        count as f64 / total as f64
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SessionOutcome {
    draws: u64,
    exhausted: u64,
    rejected: u64,
    legendary_locked: bool,
    swaps: u64,
    rarities: [u64; 4],
    health_drops: u64,
    charge_drops: u64,
    power_up_pickups: u64,
}

impl SessionOutcome {
    fn record<T>(&mut self, result: LootResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(LootError::ExhaustedPool) => {
                self.exhausted += 1;
                None
            }
            Err(_) => {
                self.rejected += 1;
                None
            }
        }
    }
}

/// Derive the seed of session `index` from the run seed
pub fn session_seed(base_seed: u64, index: u64) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(base_seed.to_le_bytes());
    hasher.update(index.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

/// Run every session in parallel and aggregate the outcomes
pub fn run_loot_simulation(sim: &SimConfig, loot: &LootConfig) -> LootResult<SimulationReport> {
    let _timing = TimingSpan::new("loot_simulation");

    let outcomes: Vec<SessionOutcome> = (0..sim.session_count)
        .into_par_iter()
        .map(|i| simulate_session(loot, session_seed(sim.base_seed, i), sim.events_per_session))
        .collect::<LootResult<Vec<_>>>()?;

    let report = aggregate(&outcomes);
    info!(
        sessions = report.sessions,
        draws = report.total_draws,
        exhausted = report.exhausted_draws,
        legendary_locks = report.legendary_locks,
        "Loot simulation finished"
    );
    Ok(report)
}

/// Play one session against a fresh manager
fn simulate_session(loot: &LootConfig, seed: u64, events: u32) -> LootResult<SessionOutcome> {
    let mut manager = LootPoolManager::from_config(&loot.clone().with_seed(seed))?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
    let mut outcome = SessionOutcome::default();
    let mut health_maxed = false;

    for _ in 0..events {
        match rng.gen_range(0..7u32) {
            // Enemy killed
            0 | 1 => {
                outcome.draws += 1;
                let drop = outcome.record(manager.enemy_drop(rng.gen_bool(0.05)));
                if let Some(Some(item)) = drop {
                    collect(&mut manager, &mut outcome, &item, &mut health_maxed);
                }
            }
            // Chest opened
            2 => {
                outcome.draws += 1;
                if let Some(item) = outcome.record(manager.chest_drop()) {
                    collect(&mut manager, &mut outcome, &item, &mut health_maxed);
                }
            }
            // Shop purchase, occasionally a weapon
            3 => {
                let kind = if rng.gen_bool(0.1) {
                    PoolKind::WeaponPowerup
                } else {
                    PoolKind::Powerup
                };
                outcome.draws += 1;
                if let Some(item) = outcome.record(manager.draw(kind)) {
                    collect(&mut manager, &mut outcome, &item, &mut health_maxed);
                }
            }
            // Progression tick
            4 => {
                outcome.record(manager.increase_rarity());
                outcome.draws += 1;
                if let Some(rarity) = outcome.record(manager.random_rarity()) {
                    outcome.rarities[rarity as usize] += 1;
                }
            }
            // Swap attempt
            5 => {
                if let Some(true) = outcome.record(manager.try_swap()) {
                    outcome.swaps += 1;
                }
            }
            // Took damage
            _ => {
                if health_maxed {
                    health_maxed = false;
                    outcome.record(manager.on_health_maxed(false));
                }
            }
        }
    }

    outcome.legendary_locked = manager.rarity_weight(Rarity::Legendary) == 0;
    Ok(outcome)
}

fn collect(
    manager: &mut LootPoolManager,
    outcome: &mut SessionOutcome,
    item: &LootItem,
    health_maxed: &mut bool,
) {
    match &item.kind {
        ItemKind::PowerUp(effect) => {
            outcome.power_up_pickups += 1;
            outcome.record(manager.on_powerup_picked(effect));
        }
        ItemKind::Health { .. } => {
            outcome.health_drops += 1;
            if !*health_maxed {
                *health_maxed = true;
                outcome.record(manager.on_health_maxed(true));
            }
        }
        ItemKind::ChargePickup { charges } => {
            outcome.charge_drops += 1;
            outcome.record(manager.gain_charges(*charges as i64));
        }
        ItemKind::Currency { .. } | ItemKind::DimensionShard(_) => {}
    }
}

fn aggregate(outcomes: &[SessionOutcome]) -> SimulationReport {
    let mut rarities = [0u64; 4];
    let mut report = SimulationReport {
        sessions: outcomes.len() as u64,
        ..Default::default()
    };

    for o in outcomes {
        report.total_draws += o.draws;
        report.exhausted_draws += o.exhausted;
        report.rejected_events += o.rejected;
        report.legendary_locks += o.legendary_locked as u64;
        report.swaps += o.swaps;
        report.health_drops += o.health_drops;
        report.charge_drops += o.charge_drops;
        report.power_up_pickups += o.power_up_pickups;
        for (total, count) in rarities.iter_mut().zip(o.rarities) {
            *total += count;
        }
    }

    report.rarity_counts = Rarity::all().into_iter().zip(rarities).collect();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SimConfig {
        SimConfig {
            session_count: 64,
            events_per_session: 300,
            base_seed: 7,
        }
    }

    #[test]
    fn test_simulation_never_exhausts_pools() {
        let report = run_loot_simulation(&small(), &LootConfig::default()).unwrap();
        assert_eq!(report.sessions, 64);
        assert!(report.total_draws > 0);
        assert_eq!(report.exhausted_draws, 0);
        assert_eq!(report.rejected_events, 0);
    }

    #[test]
    fn test_simulation_deterministic() {
        let a = run_loot_simulation(&small(), &LootConfig::default()).unwrap();
        let b = run_loot_simulation(&small(), &LootConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_simulation_exercises_policy() {
        let report = run_loot_simulation(&small(), &LootConfig::default()).unwrap();
        assert!(report.swaps > 0, "charge pickups should enable swaps");
        assert!(report.power_up_pickups > 0);
        assert!(report.rarity_share(Rarity::Common) > report.rarity_share(Rarity::Legendary));
    }

    #[test]
    fn test_session_seed_distinct() {
        assert_ne!(session_seed(42, 0), session_seed(42, 1));
        assert_eq!(session_seed(42, 3), session_seed(42, 3));
    }

    #[test]
    fn test_invalid_config_propagates() {
        let mut loot = LootConfig::default();
        loot.rarity_tiers.clear();
        assert!(run_loot_simulation(&small(), &loot).is_err());
    }

    #[test]
    fn test_empty_run() {
        let sim = SimConfig {
            session_count: 0,
            ..small()
        };
        let report = run_loot_simulation(&sim, &LootConfig::default()).unwrap();
        assert_eq!(report.sessions, 0);
        assert_eq!(report.rarity_share(Rarity::Common), 0.0);
    }
}
