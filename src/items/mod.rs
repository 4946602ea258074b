//! Loot descriptors: rarity tiers, power-up effects and pool items.
//!
//! All descriptors are plain values with structural equality, so a
//! `PowerUpEffect` read from config keys the same ledger slot as one carried
//! by a pickup event.

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

/// Rarity tiers, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn all() -> [Rarity; 4] {
        [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Power-up category. Unrecognised source labels fall into `Other`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum EffectCategory {
    Weapon,
    Offensive,
    Defensive,
    #[default]
    Other,
}

impl EffectCategory {
    /// Parse the loose type labels used by content authors
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "weapon" => EffectCategory::Weapon,
            "offensive" => EffectCategory::Offensive,
            "defensive" => EffectCategory::Defensive,
            _ => EffectCategory::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectCategory::Weapon => "weapon",
            EffectCategory::Offensive => "offensive",
            EffectCategory::Defensive => "defensive",
            EffectCategory::Other => "other",
        }
    }
}

/// Identity of a power-up, used as the pick-rate ledger key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerUpEffect {
    pub id: String,
    pub category: EffectCategory,
}

impl PowerUpEffect {
    pub fn new(id: impl Into<String>, category: EffectCategory) -> Self {
        Self {
            id: id.into(),
            category,
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.category == EffectCategory::Weapon
    }
}

/// Named handles for collectable entries the policy writes to directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectableSlot {
    LargeHealth,
    MediumHealth,
    SmallHealth,
    TrueShard,
    MirrorShard,
    DimensionCharge,
}

impl CollectableSlot {
    pub fn all() -> [CollectableSlot; 6] {
        [
            CollectableSlot::LargeHealth,
            CollectableSlot::MediumHealth,
            CollectableSlot::SmallHealth,
            CollectableSlot::TrueShard,
            CollectableSlot::MirrorShard,
            CollectableSlot::DimensionCharge,
        ]
    }

    /// Shard slot that is active while the player is in `dimension`
    pub fn shard_for(dimension: Dimension) -> Self {
        match dimension {
            Dimension::True => CollectableSlot::TrueShard,
            Dimension::Mirror => CollectableSlot::MirrorShard,
        }
    }
}

/// What a pool entry spawns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    PowerUp(PowerUpEffect),
    Health { restore: u32 },
    Currency { amount: u32 },
    DimensionShard(Dimension),
    ChargePickup { charges: u32 },
}

/// A spawnable pool item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    pub name: String,
    pub kind: ItemKind,
}

impl LootItem {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn power_up(name: impl Into<String>, effect: PowerUpEffect) -> Self {
        Self::new(name, ItemKind::PowerUp(effect))
    }

    pub fn effect(&self) -> Option<&PowerUpEffect> {
        match &self.kind {
            ItemKind::PowerUp(effect) => Some(effect),
            _ => None,
        }
    }

    pub fn has_effect(&self, effect: &PowerUpEffect) -> bool {
        self.effect() == Some(effect)
    }

    pub fn restores_health(&self) -> bool {
        matches!(self.kind, ItemKind::Health { .. })
    }
}
