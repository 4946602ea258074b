use bevy::prelude::Resource;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::*;
use crate::dimension::{Charges, Dimension};
use crate::error::{LootError, LootResult};
use crate::items::{CollectableSlot, EffectCategory, LootItem, PowerUpEffect, Rarity};
use crate::loot::config::{LootConfig, PoolEntryConfig};
use crate::loot::ledger::PickRateLedger;
use crate::loot::plugin::LootEvent;
use crate::weighted::WeightedRandomList;

/// Named item pools owned by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    /// Base power-up supply (shop)
    Powerup,
    /// Chest power-ups while in the True dimension
    TruePowerup,
    /// Chest power-ups while in the Mirror dimension
    MirrorPowerup,
    /// Enemy drops
    Collectable,
    ShopCollectable,
    WeaponPowerup,
}

impl PoolKind {
    pub fn all() -> [PoolKind; 6] {
        [
            PoolKind::Powerup,
            PoolKind::TruePowerup,
            PoolKind::MirrorPowerup,
            PoolKind::Collectable,
            PoolKind::ShopCollectable,
            PoolKind::WeaponPowerup,
        ]
    }

    /// Chest pool for the given dimension
    pub fn chest_pool(dimension: Dimension) -> Self {
        match dimension {
            Dimension::True => PoolKind::TruePowerup,
            Dimension::Mirror => PoolKind::MirrorPowerup,
        }
    }
}

/// The six item pools
#[derive(Debug, Clone, Default)]
pub struct LootPools {
    powerups: WeightedRandomList<LootItem>,
    true_powerups: WeightedRandomList<LootItem>,
    mirror_powerups: WeightedRandomList<LootItem>,
    collectables: WeightedRandomList<LootItem>,
    shop_collectables: WeightedRandomList<LootItem>,
    weapon_powerups: WeightedRandomList<LootItem>,
}

impl LootPools {
    pub fn get(&self, kind: PoolKind) -> &WeightedRandomList<LootItem> {
        match kind {
            PoolKind::Powerup => &self.powerups,
            PoolKind::TruePowerup => &self.true_powerups,
            PoolKind::MirrorPowerup => &self.mirror_powerups,
            PoolKind::Collectable => &self.collectables,
            PoolKind::ShopCollectable => &self.shop_collectables,
            PoolKind::WeaponPowerup => &self.weapon_powerups,
        }
    }

    pub fn get_mut(&mut self, kind: PoolKind) -> &mut WeightedRandomList<LootItem> {
        match kind {
            PoolKind::Powerup => &mut self.powerups,
            PoolKind::TruePowerup => &mut self.true_powerups,
            PoolKind::MirrorPowerup => &mut self.mirror_powerups,
            PoolKind::Collectable => &mut self.collectables,
            PoolKind::ShopCollectable => &mut self.shop_collectables,
            PoolKind::WeaponPowerup => &mut self.weapon_powerups,
        }
    }
}

/// Collectable indices resolved once at construction
#[derive(Debug, Clone, Copy)]
struct SlotIndices {
    large_health: usize,
    medium_health: usize,
    small_health: usize,
    true_shard: usize,
    mirror_shard: usize,
    dimension_charge: usize,
}

impl SlotIndices {
    fn resolve(entries: &[PoolEntryConfig]) -> LootResult<Self> {
        let find = |slot: CollectableSlot| -> LootResult<usize> {
            let mut tagged = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.slot == Some(slot))
                .map(|(i, _)| i);
            let index = tagged.next().ok_or(LootError::MissingSlot(slot))?;
            if tagged.next().is_some() {
                return Err(LootError::DuplicateSlot(slot));
            }
            Ok(index)
        };

        Ok(Self {
            large_health: find(CollectableSlot::LargeHealth)?,
            medium_health: find(CollectableSlot::MediumHealth)?,
            small_health: find(CollectableSlot::SmallHealth)?,
            true_shard: find(CollectableSlot::TrueShard)?,
            mirror_shard: find(CollectableSlot::MirrorShard)?,
            dimension_charge: find(CollectableSlot::DimensionCharge)?,
        })
    }

    fn get(&self, slot: CollectableSlot) -> usize {
        match slot {
            CollectableSlot::LargeHealth => self.large_health,
            CollectableSlot::MediumHealth => self.medium_health,
            CollectableSlot::SmallHealth => self.small_health,
            CollectableSlot::TrueShard => self.true_shard,
            CollectableSlot::MirrorShard => self.mirror_shard,
            CollectableSlot::DimensionCharge => self.dimension_charge,
        }
    }
}

/// Rarity tier indices resolved once at construction
#[derive(Debug, Clone, Copy)]
struct RarityIndices {
    common: usize,
    rare: usize,
    epic: usize,
    legendary: usize,
}

impl RarityIndices {
    fn resolve(tiers: &WeightedRandomList<Rarity>) -> LootResult<Self> {
        let find = |rarity: Rarity| -> LootResult<usize> {
            match tiers.positions(|r| *r == rarity).as_slice() {
                [] => Err(LootError::MissingRarity(rarity)),
                [index] => Ok(*index),
                _ => Err(LootError::DuplicateRarity(rarity)),
            }
        };

        Ok(Self {
            common: find(Rarity::Common)?,
            rare: find(Rarity::Rare)?,
            epic: find(Rarity::Epic)?,
            legendary: find(Rarity::Legendary)?,
        })
    }

    fn get(&self, rarity: Rarity) -> usize {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
        }
    }
}

/// Owns every gameplay-facing pool and applies the adaptive drop policy.
///
/// All mutation happens through `&mut self`; inside Bevy the manager is a
/// `Resource`, so the scheduler hands out a single writer at a time.
#[derive(Resource, Debug, Clone)]
pub struct LootPoolManager {
    pools: LootPools,
    rarity_tiers: WeightedRandomList<Rarity>,
    slots: SlotIndices,
    rarities: RarityIndices,
    ledger: PickRateLedger,
    legendaries_collected: u32,
    /// Set once enough weapons were collected; Legendary must stay at 0
    legendary_locked: bool,
    dimension: Dimension,
    charges: Charges,
    subscribed: bool,
    rng: Xoshiro256PlusPlus,
}

fn build_pool(entries: &[PoolEntryConfig]) -> WeightedRandomList<LootItem> {
    entries
        .iter()
        .map(|e| (e.item.clone(), e.weight))
        .collect()
}

impl LootPoolManager {
    /// Build every pool from config and register each distinct base-pool
    /// effect in the pick-rate ledger.
    pub fn from_config(config: &LootConfig) -> LootResult<Self> {
        let pools = LootPools {
            powerups: build_pool(&config.powerups),
            true_powerups: build_pool(&config.true_powerups),
            mirror_powerups: build_pool(&config.mirror_powerups),
            collectables: build_pool(&config.collectables),
            shop_collectables: build_pool(&config.shop_collectables),
            weapon_powerups: build_pool(&config.weapon_powerups),
        };
        let rarity_tiers: WeightedRandomList<Rarity> = config
            .rarity_tiers
            .iter()
            .map(|t| (t.rarity, t.weight))
            .collect();

        let slots = SlotIndices::resolve(&config.collectables)?;
        let rarities = RarityIndices::resolve(&rarity_tiers)?;

        let mut ledger = PickRateLedger::new();
        for entry in pools.powerups.iter() {
            match entry.item().effect() {
                Some(effect) => ledger.register(effect.clone()),
                None => warn!(item = %entry.item().name, "Non power-up entry in base power-up pool"),
            }
        }

        info!(
            effects = ledger.len(),
            max_charges = config.max_charges,
            seed = config.seed,
            "Loot pools initialized"
        );

        Ok(Self {
            pools,
            rarity_tiers,
            slots,
            rarities,
            ledger,
            legendaries_collected: 0,
            legendary_locked: false,
            dimension: Dimension::True,
            charges: Charges::new(config.max_charges),
            subscribed: true,
            rng: Xoshiro256PlusPlus::seed_from_u64(config.seed),
        })
    }

    // =====================================================
    // Queries
    // =====================================================

    pub fn pool(&self, kind: PoolKind) -> &WeightedRandomList<LootItem> {
        self.pools.get(kind)
    }

    /// Direct weight access for progression systems
    pub fn pool_mut(&mut self, kind: PoolKind) -> &mut WeightedRandomList<LootItem> {
        self.pools.get_mut(kind)
    }

    pub fn powerup_pool_for(&self, dimension: Dimension) -> &WeightedRandomList<LootItem> {
        self.pools.get(PoolKind::chest_pool(dimension))
    }

    pub fn rarity_tiers(&self) -> &WeightedRandomList<Rarity> {
        &self.rarity_tiers
    }

    pub fn rarity_weight(&self, rarity: Rarity) -> u32 {
        self.rarity_tiers
            .weight(self.rarities.get(rarity))
            .unwrap_or_default()
    }

    pub fn slot_index(&self, slot: CollectableSlot) -> usize {
        self.slots.get(slot)
    }

    pub fn slot_weight(&self, slot: CollectableSlot) -> u32 {
        self.pools
            .collectables
            .weight(self.slots.get(slot))
            .unwrap_or_default()
    }

    pub fn ledger(&self) -> &PickRateLedger {
        &self.ledger
    }

    pub fn amount_picked(&self, effect: &PowerUpEffect) -> LootResult<u32> {
        self.ledger.count(effect)
    }

    pub fn average_pick_rate(&self) -> f64 {
        self.ledger.average()
    }

    pub fn legendaries_collected(&self) -> u32 {
        self.legendaries_collected
    }

    pub fn is_legendary_locked(&self) -> bool {
        self.legendary_locked
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn current_charges(&self) -> u32 {
        self.charges.current()
    }

    pub fn max_charges(&self) -> u32 {
        self.charges.max()
    }

    /// Pools (by kind) whose total weight has reached 0
    pub fn exhausted_pools(&self) -> Vec<PoolKind> {
        PoolKind::all()
            .into_iter()
            .filter(|k| self.pools.get(*k).total_weight() == 0)
            .collect()
    }

    // =====================================================
    // Draws
    // =====================================================

    pub fn draw(&mut self, kind: PoolKind) -> LootResult<LootItem> {
        self.pools
            .get(kind)
            .get_random_with(&mut self.rng)
            .cloned()
    }

    pub fn random_rarity(&mut self) -> LootResult<Rarity> {
        self.rarity_tiers.get_random_with(&mut self.rng).copied()
    }

    /// Enemy death drop. Bosses drop nothing from the collectable pool.
    pub fn enemy_drop(&mut self, is_boss: bool) -> LootResult<Option<LootItem>> {
        if is_boss {
            return Ok(None);
        }
        self.draw(PoolKind::Collectable).map(Some)
    }

    /// Chest drop from the current dimension's power-up pool
    pub fn chest_drop(&mut self) -> LootResult<LootItem> {
        self.draw(PoolKind::chest_pool(self.dimension))
    }

    // =====================================================
    // Pick-rate policy
    // =====================================================

    /// Record a power-up pickup and rebalance.
    ///
    /// Weapons count toward the legendary lock and are retired from the
    /// weapon pool. Other effects picked at or above the mean rate have their
    /// weights halved in the shop pool and in the chest pool of their
    /// category.
    pub fn on_powerup_picked(&mut self, effect: &PowerUpEffect) -> LootResult<()> {
        let count = self.ledger.record_pick(effect)?;
        debug!(effect = %effect.id, count, "Power-up picked");

        if effect.is_weapon() {
            self.legendaries_collected += 1;
            if !self.legendary_locked && self.legendaries_collected >= LEGENDARY_LOCK_PICKUPS {
                self.legendary_locked = true;
                info!(
                    collected = self.legendaries_collected,
                    "Legendary tier locked"
                );
            }
            self.enforce_legendary_lock()?;
            self.zero_matching(PoolKind::WeaponPowerup, effect)?;
            return Ok(());
        }

        let average = self.ledger.average();
        if (count as f64) < average {
            return Ok(());
        }

        self.halve_matching(PoolKind::Powerup, effect)?;
        match effect.category {
            EffectCategory::Offensive => self.halve_matching(PoolKind::TruePowerup, effect)?,
            EffectCategory::Defensive => self.halve_matching(PoolKind::MirrorPowerup, effect)?,
            EffectCategory::Weapon | EffectCategory::Other => {}
        }
        debug!(effect = %effect.id, count, average, "Overused power-up weight halved");
        Ok(())
    }

    fn halve_matching(&mut self, kind: PoolKind, effect: &PowerUpEffect) -> LootResult<()> {
        let pool = self.pools.get_mut(kind);
        for index in pool.positions(|item| item.has_effect(effect)) {
            let halved = pool.weight(index)? / 2;
            pool.set_weight_guarded(index, halved as i64)?;
        }
        Ok(())
    }

    fn zero_matching(&mut self, kind: PoolKind, effect: &PowerUpEffect) -> LootResult<()> {
        let pool = self.pools.get_mut(kind);
        for index in pool.positions(|item| item.has_effect(effect)) {
            pool.set_weight_guarded(index, 0)?;
        }
        Ok(())
    }

    // =====================================================
    // Health supply
    // =====================================================

    /// Enable restores the three health slots to fixed weights; disable
    /// zeroes every health-restoring collectable.
    pub fn set_health_item_weights(&mut self, enable: bool) -> LootResult<()> {
        let collectables = &mut self.pools.collectables;
        if enable {
            for (slot, weight) in [
                (CollectableSlot::LargeHealth, LARGE_HEALTH_WEIGHT),
                (CollectableSlot::MediumHealth, MEDIUM_HEALTH_WEIGHT),
                (CollectableSlot::SmallHealth, SMALL_HEALTH_WEIGHT),
            ] {
                collectables.set_weight(self.slots.get(slot), weight)?;
            }
        } else {
            for index in collectables.positions(LootItem::restores_health) {
                collectables.set_weight_guarded(index, 0)?;
            }
        }
        debug!(enable, "Health item supply toggled");
        Ok(())
    }

    /// Player health reached (`true`) or left (`false`) its maximum
    pub fn on_health_maxed(&mut self, maxed: bool) -> LootResult<()> {
        self.set_health_item_weights(!maxed)
    }

    // =====================================================
    // Rarity curve
    // =====================================================

    pub fn increase_rarity(&mut self) -> LootResult<()> {
        self.rarity_tiers
            .increase_weight(self.rarities.get(Rarity::Rare), RARE_WEIGHT_STEP)?;
        self.rarity_tiers
            .increase_weight(self.rarities.get(Rarity::Epic), EPIC_WEIGHT_STEP)?;

        let legendary = self.rarities.get(Rarity::Legendary);
        let weight = self.rarity_tiers.weight(legendary)?;
        if self.legendary_locked {
            self.enforce_legendary_lock()?;
        } else if weight > 0 && weight <= LEGENDARY_GROWTH_CEILING {
            self.rarity_tiers
                .increase_weight(legendary, LEGENDARY_WEIGHT_STEP)?;
        }
        debug!(
            rare = self.rarity_weight(Rarity::Rare),
            epic = self.rarity_weight(Rarity::Epic),
            legendary = self.rarity_weight(Rarity::Legendary),
            "Rarity increased"
        );
        Ok(())
    }

    /// Overwrite the Common, Rare and Epic weights
    pub fn set_rarity_tiers(&mut self, common: i64, rare: i64, epic: i64) -> LootResult<()> {
        for (rarity, weight) in [
            (Rarity::Common, common),
            (Rarity::Rare, rare),
            (Rarity::Epic, epic),
        ] {
            self.rarity_tiers
                .set_weight_guarded(self.rarities.get(rarity), weight)?;
        }
        self.enforce_legendary_lock()
    }

    /// Zero the Legendary tier if it is locked. The write stays pending
    /// while Legendary is the only live tier.
    fn enforce_legendary_lock(&mut self) -> LootResult<()> {
        if !self.legendary_locked {
            return Ok(());
        }
        let legendary = self.rarities.get(Rarity::Legendary);
        if self.rarity_tiers.weight(legendary)? == 0 {
            return Ok(());
        }
        if !self.rarity_tiers.set_weight_guarded(legendary, 0)? {
            debug!("Legendary lock pending until another tier is live");
        }
        Ok(())
    }

    // =====================================================
    // Dimension charges
    // =====================================================

    /// Add charges; once full, charge pickups stop dropping
    pub fn gain_charges(&mut self, amount: i64) -> LootResult<u32> {
        let current = self.charges.gain(amount);
        if self.charges.is_full() {
            self.pools
                .collectables
                .set_weight_guarded(self.slots.get(CollectableSlot::DimensionCharge), 0)?;
        }
        debug!(current, max = self.charges.max(), "Charges gained");
        Ok(current)
    }

    /// Spend all charges; charge pickups resume
    pub fn reset_charges(&mut self) -> LootResult<()> {
        self.charges.reset();
        self.pools.collectables.set_weight(
            self.slots.get(CollectableSlot::DimensionCharge),
            CHARGE_PICKUP_WEIGHT,
        )
    }

    /// Activate the shard slot of `incoming` and retire the other one
    pub fn on_dimension_swapped(&mut self, incoming: Dimension) -> LootResult<()> {
        let collectables = &mut self.pools.collectables;
        collectables.set_weight(
            self.slots.get(CollectableSlot::shard_for(incoming)),
            ACTIVE_SHARD_WEIGHT,
        )?;
        collectables.set_weight_guarded(
            self.slots.get(CollectableSlot::shard_for(incoming.other())),
            0,
        )?;
        Ok(())
    }

    pub fn can_swap(&self) -> bool {
        self.charges.is_full()
    }

    /// Swap dimension if fully charged. Returns whether the swap happened.
    pub fn try_swap(&mut self) -> LootResult<bool> {
        if !self.can_swap() {
            return Ok(false);
        }
        let incoming = self.dimension.other();
        self.on_dimension_swapped(incoming)?;
        self.forced_swap();
        self.reset_charges()?;
        info!(dimension = ?incoming, "Dimension swapped");
        Ok(true)
    }

    /// Flip the dimension without touching charges or pools
    pub fn forced_swap(&mut self) {
        self.dimension = self.dimension.other();
    }

    /// Change the swap requirement. Lowering it to or below the current
    /// count stops charge pickups like any other full charge.
    pub fn set_max_charges(&mut self, max: u32) -> LootResult<()> {
        self.charges.set_max(max);
        if self.charges.is_full() {
            self.pools
                .collectables
                .set_weight_guarded(self.slots.get(CollectableSlot::DimensionCharge), 0)?;
        }
        Ok(())
    }

    // =====================================================
    // Event subscription
    // =====================================================

    pub fn subscribe(&mut self) {
        self.subscribed = true;
    }

    pub fn unsubscribe(&mut self) {
        self.subscribed = false;
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Route a gameplay event to its handler. Ignored while unsubscribed.
    pub fn handle(&mut self, event: &LootEvent) -> LootResult<()> {
        if !self.subscribed {
            debug!(?event, "Loot manager unsubscribed, event ignored");
            return Ok(());
        }

        match event {
            LootEvent::PowerUpCollected(effect) => self.on_powerup_picked(effect),
            LootEvent::HealthMaxed { maxed } => self.on_health_maxed(*maxed),
            LootEvent::ChargesGained(amount) => self.gain_charges(*amount).map(|_| ()),
            LootEvent::ChargesReset => self.reset_charges(),
            LootEvent::DimensionSwapped(incoming) => self.on_dimension_swapped(*incoming),
            LootEvent::RarityTick => self.increase_rarity(),
            LootEvent::RarityTiersSet { common, rare, epic } => {
                self.set_rarity_tiers(*common, *rare, *epic)
            }
        }
    }
}
