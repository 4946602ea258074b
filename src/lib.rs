//! Reflected - Gameplay Core Library
//!
//! This crate provides the loot economy for Reflected:
//! - Weighted-random sampling container
//! - Loot descriptors (rarity tiers, power-up effects, pool items)
//! - Adaptive loot pool manager (pick-rate feedback, legendary lock,
//!   health and charge supply, dimension-bound shard drops)
//! - Bevy plugin dispatching gameplay events to the manager
//! - Monte-Carlo loot simulation
//! - Structured logging setup

pub mod constants;
pub mod dimension;
pub mod error;
pub mod items;
pub mod logging;
pub mod loot;
pub mod simulation;
pub mod weighted;

pub use error::{LootError, LootResult};
pub use loot::{LootConfig, LootEvent, LootPlugin, LootPoolManager, PoolKind};
pub use weighted::{WeightedEntry, WeightedRandomList};
