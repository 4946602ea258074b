use thiserror::Error;

use crate::items::{CollectableSlot, Rarity};

/// Contract violations raised by the loot economy.
///
/// None of these reach the player; they surface to developers and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LootError {
    #[error("Cannot sample from a pool whose total weight is 0")]
    ExhaustedPool,

    #[error("Power-up effect not registered in the pick-rate ledger: {0}")]
    UnknownEffect(String),

    #[error("Pool index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Collectable pool has no entry tagged {0:?}")]
    MissingSlot(CollectableSlot),

    #[error("Collectable slot {0:?} tagged on more than one entry")]
    DuplicateSlot(CollectableSlot),

    #[error("Rarity tier {0:?} missing from rarity table")]
    MissingRarity(Rarity),

    #[error("Rarity tier {0:?} listed more than once")]
    DuplicateRarity(Rarity),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<ron::error::SpannedError> for LootError {
    fn from(e: ron::error::SpannedError) -> Self {
        LootError::Config(format!("RON parse error: {}", e))
    }
}

impl From<serde_json::Error> for LootError {
    fn from(e: serde_json::Error) -> Self {
        LootError::Config(format!("JSON parse error: {}", e))
    }
}

pub type LootResult<T> = Result<T, LootError>;
