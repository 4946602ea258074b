//! Centralized loot-economy constants.
//!
//! Every fixed weight the feedback policy writes back into a pool lives here,
//! so the policy code never carries bare numbers.

// =====================================================
// Rarity curve
// =====================================================

/// Rare tier growth per rarity tick
pub const RARE_WEIGHT_STEP: i64 = 1;

/// Epic tier growth per rarity tick (twice the rare rate)
pub const EPIC_WEIGHT_STEP: i64 = 2;

/// Legendary tier growth per rarity tick
pub const LEGENDARY_WEIGHT_STEP: i64 = 1;

/// Legendary keeps growing while its weight is in (0, LEGENDARY_GROWTH_CEILING]
pub const LEGENDARY_GROWTH_CEILING: u32 = 8;

/// Weapon pickups after which the Legendary tier is locked at 0
pub const LEGENDARY_LOCK_PICKUPS: u32 = 2;

// =====================================================
// Collectable supply
// =====================================================

/// Large health pickup weight when health items are re-enabled
pub const LARGE_HEALTH_WEIGHT: i64 = 3;

/// Medium health pickup weight when health items are re-enabled
pub const MEDIUM_HEALTH_WEIGHT: i64 = 2;

/// Small health pickup weight when health items are re-enabled
pub const SMALL_HEALTH_WEIGHT: i64 = 1;

/// Dimension charge pickup weight while charges are not full
pub const CHARGE_PICKUP_WEIGHT: i64 = 2;

/// Weight of the shard slot belonging to the dimension the player is in
pub const ACTIVE_SHARD_WEIGHT: i64 = 4;

// =====================================================
// Session defaults
// =====================================================

/// Charges required before a dimension swap is allowed
pub const DEFAULT_MAX_CHARGES: u32 = 3;

/// Seed for the manager's draw RNG when the config does not supply one
pub const DEFAULT_LOOT_SEED: u64 = 42;
