//! Initial pool contents.
//!
//! Content authors ship pool tables as RON (or JSON). The built-in default
//! mirrors `config/loot_tables.ron`.

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOOT_SEED, DEFAULT_MAX_CHARGES};
use crate::dimension::Dimension;
use crate::error::LootResult;
use crate::items::{CollectableSlot, EffectCategory, ItemKind, LootItem, PowerUpEffect, Rarity};

/// One entry in an item pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntryConfig {
    pub item: LootItem,
    pub weight: u32,
    #[serde(default)]
    pub slot: Option<CollectableSlot>,
}

impl PoolEntryConfig {
    pub fn new(item: LootItem, weight: u32) -> Self {
        Self {
            item,
            weight,
            slot: None,
        }
    }

    pub fn with_slot(mut self, slot: CollectableSlot) -> Self {
        self.slot = Some(slot);
        self
    }
}

/// One entry in the rarity table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityEntryConfig {
    pub rarity: Rarity,
    pub weight: u32,
}

/// Full description of a session's loot pools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_max_charges")]
    pub max_charges: u32,
    pub powerups: Vec<PoolEntryConfig>,
    pub true_powerups: Vec<PoolEntryConfig>,
    pub mirror_powerups: Vec<PoolEntryConfig>,
    pub collectables: Vec<PoolEntryConfig>,
    pub shop_collectables: Vec<PoolEntryConfig>,
    pub weapon_powerups: Vec<PoolEntryConfig>,
    pub rarity_tiers: Vec<RarityEntryConfig>,
}

fn default_seed() -> u64 {
    DEFAULT_LOOT_SEED
}

fn default_max_charges() -> u32 {
    DEFAULT_MAX_CHARGES
}

impl LootConfig {
    pub fn from_ron_str(s: &str) -> LootResult<Self> {
        Ok(ron::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> LootResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_ron_string(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load from a `.ron` or `.json` file
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read loot config {}", path.display()))?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => bail!(
                "Unsupported loot config extension {:?} for {}",
                other,
                path.display()
            ),
        };

        config.with_context(|| format!("Invalid loot config {}", path.display()))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

fn power_up(name: &str, id: &str, category: EffectCategory, weight: u32) -> PoolEntryConfig {
    PoolEntryConfig::new(
        LootItem::power_up(name, PowerUpEffect::new(id, category)),
        weight,
    )
}

fn collectable(name: &str, kind: ItemKind, weight: u32) -> PoolEntryConfig {
    PoolEntryConfig::new(LootItem::new(name, kind), weight)
}

impl Default for LootConfig {
    fn default() -> Self {
        use EffectCategory::*;

        Self {
            seed: DEFAULT_LOOT_SEED,
            max_charges: DEFAULT_MAX_CHARGES,
            powerups: vec![
                power_up("Rapid Fire", "rapid_fire", Offensive, 10),
                power_up("Piercing Rounds", "piercing_rounds", Offensive, 10),
                power_up("Explosive Shots", "explosive_shots", Offensive, 8),
                power_up("Iron Skin", "iron_skin", Defensive, 10),
                power_up("Regeneration", "regeneration", Defensive, 8),
                power_up("Swift Step", "swift_step", Other, 10),
                power_up("Mirror Blade", "mirror_blade", Weapon, 2),
                power_up("Void Cannon", "void_cannon", Weapon, 2),
            ],
            true_powerups: vec![
                power_up("Rapid Fire", "rapid_fire", Offensive, 10),
                power_up("Piercing Rounds", "piercing_rounds", Offensive, 10),
                power_up("Explosive Shots", "explosive_shots", Offensive, 8),
                power_up("Swift Step", "swift_step", Other, 6),
            ],
            mirror_powerups: vec![
                power_up("Iron Skin", "iron_skin", Defensive, 10),
                power_up("Regeneration", "regeneration", Defensive, 8),
                power_up("Swift Step", "swift_step", Other, 6),
            ],
            collectables: vec![
                collectable("Coin", ItemKind::Currency { amount: 5 }, 10),
                collectable("Large Health", ItemKind::Health { restore: 50 }, 3)
                    .with_slot(CollectableSlot::LargeHealth),
                collectable("True Shard", ItemKind::DimensionShard(Dimension::True), 4)
                    .with_slot(CollectableSlot::TrueShard),
                collectable(
                    "Mirror Shard",
                    ItemKind::DimensionShard(Dimension::Mirror),
                    0,
                )
                .with_slot(CollectableSlot::MirrorShard),
                collectable("Charge Cell", ItemKind::ChargePickup { charges: 1 }, 2)
                    .with_slot(CollectableSlot::DimensionCharge),
                collectable("Medium Health", ItemKind::Health { restore: 25 }, 2)
                    .with_slot(CollectableSlot::MediumHealth),
                collectable("Small Health", ItemKind::Health { restore: 10 }, 1)
                    .with_slot(CollectableSlot::SmallHealth),
            ],
            shop_collectables: vec![
                collectable("Large Health", ItemKind::Health { restore: 50 }, 4),
                collectable("Medium Health", ItemKind::Health { restore: 25 }, 4),
                collectable("Charge Cell", ItemKind::ChargePickup { charges: 1 }, 2),
            ],
            weapon_powerups: vec![
                power_up("Mirror Blade", "mirror_blade", Weapon, 5),
                power_up("Void Cannon", "void_cannon", Weapon, 5),
            ],
            rarity_tiers: vec![
                RarityEntryConfig {
                    rarity: Rarity::Common,
                    weight: 60,
                },
                RarityEntryConfig {
                    rarity: Rarity::Rare,
                    weight: 25,
                },
                RarityEntryConfig {
                    rarity: Rarity::Epic,
                    weight: 10,
                },
                RarityEntryConfig {
                    rarity: Rarity::Legendary,
                    weight: 1,
                },
            ],
        }
    }
}
