use bevy::prelude::{App, Event, EventReader, Plugin, ResMut, Update};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::dimension::Dimension;
use crate::items::PowerUpEffect;
use crate::loot::config::LootConfig;
use crate::loot::manager::LootPoolManager;

/// Gameplay notifications the loot manager reacts to
#[derive(Event, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootEvent {
    /// A power-up was picked up by the player
    PowerUpCollected(PowerUpEffect),
    /// Player health reached (`maxed: true`) or dropped below its maximum
    HealthMaxed { maxed: bool },
    /// Dimension charges gained (negative drains)
    ChargesGained(i64),
    /// Charges were spent
    ChargesReset,
    /// The world moved into the given dimension
    DimensionSwapped(Dimension),
    /// Periodic progression tick
    RarityTick,
    /// Difficulty system overrides the lower rarity tiers
    RarityTiersSet { common: i64, rare: i64, epic: i64 },
}

/// Registers the loot manager as a resource and feeds it `LootEvent`s
pub struct LootPlugin {
    pub config: LootConfig,
}

impl LootPlugin {
    pub fn new(config: LootConfig) -> Self {
        Self { config }
    }
}

impl Default for LootPlugin {
    fn default() -> Self {
        Self::new(LootConfig::default())
    }
}

impl Plugin for LootPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LootEvent>()
            .add_systems(Update, dispatch_loot_events);

        match LootPoolManager::from_config(&self.config) {
            Ok(manager) => {
                app.insert_resource(manager);
            }
            Err(e) => error!("Loot pools not created: {}", e),
        }
    }
}

fn dispatch_loot_events(
    mut events: EventReader<LootEvent>,
    manager: Option<ResMut<LootPoolManager>>,
) {
    let Some(mut manager) = manager else {
        events.clear();
        return;
    };

    for event in events.read() {
        if let Err(e) = manager.handle(event) {
            error!(?event, "Loot event rejected: {}", e);
        }
    }
}
