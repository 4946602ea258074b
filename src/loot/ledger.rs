use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{LootError, LootResult};
use crate::items::PowerUpEffect;

/// Per-effect pickup counter used to spot overused power-ups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickRateLedger {
    counts: HashMap<PowerUpEffect, u32>,
}

impl PickRateLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an effect at count 0. Re-registering keeps the existing slot.
    pub fn register(&mut self, effect: PowerUpEffect) {
        self.counts.entry(effect).or_insert(0);
    }

    pub fn contains(&self, effect: &PowerUpEffect) -> bool {
        self.counts.contains_key(effect)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, effect: &PowerUpEffect) -> LootResult<u32> {
        self.counts
            .get(effect)
            .copied()
            .ok_or_else(|| LootError::UnknownEffect(effect.id.clone()))
    }

    /// Increment and return the new count
    pub fn record_pick(&mut self, effect: &PowerUpEffect) -> LootResult<u32> {
        let count = self
            .counts
            .get_mut(effect)
            .ok_or_else(|| LootError::UnknownEffect(effect.id.clone()))?;
        *count = count.saturating_add(1);
        Ok(*count)
    }

    /// Mean pick count over all registered effects (0.0 when empty)
    pub fn average(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.counts.values().map(|&c| c as u64).sum();
        sum as f64 / self.counts.len() as f64
    }

    pub fn total_picks(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PowerUpEffect, u32)> {
        self.counts.iter().map(|(e, &c)| (e, c))
    }

    #[cfg(test)]
    pub(crate) fn set_count(&mut self, effect: &PowerUpEffect, count: u32) {
        if let Some(slot) = self.counts.get_mut(effect) {
            *slot = count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::EffectCategory;

    fn effect(id: &str) -> PowerUpEffect {
        PowerUpEffect::new(id, EffectCategory::Offensive)
    }

    #[test]
    fn test_register_dedupes() {
        let mut ledger = PickRateLedger::new();
        ledger.register(effect("a"));
        ledger.record_pick(&effect("a")).unwrap();
        ledger.register(effect("a"));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.count(&effect("a")).unwrap(), 1);
    }

    #[test]
    fn test_unknown_effect() {
        let mut ledger = PickRateLedger::new();
        assert_eq!(
            ledger.count(&effect("ghost")),
            Err(LootError::UnknownEffect("ghost".into()))
        );
        assert!(ledger.record_pick(&effect("ghost")).is_err());
    }

    #[test]
    fn test_average() {
        let mut ledger = PickRateLedger::new();
        assert_eq!(ledger.average(), 0.0);
        ledger.register(effect("a"));
        ledger.register(effect("b"));
        ledger.set_count(&effect("a"), 10);
        ledger.set_count(&effect("b"), 2);
        assert!((ledger.average() - 6.0).abs() < f64::EPSILON);
        assert_eq!(ledger.total_picks(), 12);
    }
}
