//! Adaptive loot economy.
//!
//! The manager owns every item pool plus the rarity table and rebalances them
//! in response to gameplay events:
//!   - overused power-ups become rarer (pick-rate feedback)
//!   - two collected weapons lock the Legendary tier
//!   - health pickups stop dropping while health is full
//!   - charge pickups stop dropping while charges are full
//!   - shard drops follow the dimension the player is in

pub mod config;
pub mod ledger;
pub mod manager;
pub mod plugin;

pub use config::{LootConfig, PoolEntryConfig, RarityEntryConfig};
pub use ledger::PickRateLedger;
pub use manager::{LootPoolManager, LootPools, PoolKind};
pub use plugin::{LootEvent, LootPlugin};
