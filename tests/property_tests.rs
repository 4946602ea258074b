//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL inputs:
//! - Weighted list: weights never negative, zero-weight entries never drawn
//! - Guarded writes: a live pool never becomes exhausted
//! - Manager: any event sequence leaves every pool drawable
//! - Charges: counter always within [0, max]

use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use reflected_core::dimension::Dimension;
use reflected_core::items::{EffectCategory, PowerUpEffect, Rarity};
use reflected_core::loot::{LootConfig, LootEvent, LootPoolManager};
use reflected_core::weighted::WeightedRandomList;

// ============================================================
// Strategies
// ============================================================

fn known_effect() -> impl Strategy<Value = PowerUpEffect> {
    prop_oneof![
        Just(PowerUpEffect::new("rapid_fire", EffectCategory::Offensive)),
        Just(PowerUpEffect::new("piercing_rounds", EffectCategory::Offensive)),
        Just(PowerUpEffect::new("explosive_shots", EffectCategory::Offensive)),
        Just(PowerUpEffect::new("iron_skin", EffectCategory::Defensive)),
        Just(PowerUpEffect::new("regeneration", EffectCategory::Defensive)),
        Just(PowerUpEffect::new("swift_step", EffectCategory::Other)),
        Just(PowerUpEffect::new("mirror_blade", EffectCategory::Weapon)),
        Just(PowerUpEffect::new("void_cannon", EffectCategory::Weapon)),
    ]
}

fn loot_event() -> impl Strategy<Value = LootEvent> {
    prop_oneof![
        4 => known_effect().prop_map(LootEvent::PowerUpCollected),
        1 => any::<bool>().prop_map(|maxed| LootEvent::HealthMaxed { maxed }),
        1 => (-5i64..10).prop_map(LootEvent::ChargesGained),
        1 => Just(LootEvent::ChargesReset),
        1 => prop_oneof![Just(Dimension::True), Just(Dimension::Mirror)]
            .prop_map(LootEvent::DimensionSwapped),
        1 => Just(LootEvent::RarityTick),
        1 => (-5i64..30, -5i64..30, -5i64..30).prop_map(|(common, rare, epic)| {
            LootEvent::RarityTiersSet { common, rare, epic }
        }),
        1 => Just(LootEvent::RarityTiersSet {
            common: 0,
            rare: 0,
            epic: 0,
        }),
    ]
}

// ============================================================
// Weighted list properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_writes_never_go_negative(
        start in proptest::collection::vec(0u32..100, 1..10),
        writes in proptest::collection::vec((0usize..10, -200i64..200, any::<bool>()), 0..50),
    ) {
        let mut list: WeightedRandomList<usize> =
            start.iter().copied().enumerate().collect();
        for (index, value, increase) in writes {
            let index = index % list.len();
            let before = list.weight(index).unwrap() as i64;
            let expected = if increase { before + value } else { value };
            if increase {
                list.increase_weight(index, value).unwrap();
            } else {
                list.set_weight(index, value).unwrap();
            }
            prop_assert_eq!(list.weight(index).unwrap() as i64, expected.max(0));
        }
        prop_assert_eq!(
            list.total_weight(),
            list.iter().map(|e| e.weight() as u64).sum::<u64>()
        );
    }

    #[test]
    fn prop_zero_weight_never_drawn(
        weights in proptest::collection::vec(0u32..5, 1..12),
        seed in any::<u64>(),
    ) {
        let list: WeightedRandomList<usize> = weights.iter().copied().enumerate().collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        if list.total_weight() == 0 {
            prop_assert!(list.get_random_with(&mut rng).is_err());
        } else {
            for _ in 0..200 {
                let index = *list.get_random_with(&mut rng).unwrap();
                prop_assert!(weights[index] > 0, "drew zero-weight index {}", index);
            }
        }
    }

    #[test]
    fn prop_guarded_writes_keep_pool_live(
        weights in proptest::collection::vec(1u32..10, 1..8),
        targets in proptest::collection::vec(0usize..8, 0..30),
    ) {
        let mut list: WeightedRandomList<usize> = weights.iter().copied().enumerate().collect();
        for target in targets {
            let index = target % list.len();
            list.set_weight_guarded(index, 0).unwrap();
            prop_assert!(list.total_weight() > 0);
        }
    }
}

// ============================================================
// Manager properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_any_event_sequence_keeps_pools_drawable(
        events in proptest::collection::vec(loot_event(), 0..150),
    ) {
        let mut m = LootPoolManager::from_config(&LootConfig::default()).unwrap();
        for event in &events {
            prop_assert!(m.handle(event).is_ok(), "event rejected: {:?}", event);
            prop_assert!(m.exhausted_pools().is_empty(), "after {:?}", event);
            prop_assert!(m.rarity_tiers().total_weight() > 0);
            prop_assert!(m.current_charges() <= m.max_charges());
        }
        prop_assert!(m.chest_drop().is_ok());
        prop_assert!(m.random_rarity().is_ok());
    }

    #[test]
    fn prop_legendary_lock_is_sticky(
        ticks in 0usize..40,
        extra in proptest::collection::vec(loot_event(), 0..40),
    ) {
        let mut m = LootPoolManager::from_config(&LootConfig::default()).unwrap();
        m.on_powerup_picked(&PowerUpEffect::new("mirror_blade", EffectCategory::Weapon)).unwrap();
        m.on_powerup_picked(&PowerUpEffect::new("mirror_blade", EffectCategory::Weapon)).unwrap();
        prop_assert_eq!(m.rarity_weight(Rarity::Legendary), 0);

        for _ in 0..ticks {
            m.increase_rarity().unwrap();
        }
        for event in &extra {
            m.handle(event).unwrap();
        }
        prop_assert_eq!(m.rarity_weight(Rarity::Legendary), 0);
    }

    #[test]
    fn prop_locked_legendary_never_grows(
        events in proptest::collection::vec(loot_event(), 0..200),
    ) {
        let mut m = LootPoolManager::from_config(&LootConfig::default()).unwrap();
        for event in &events {
            let before = m.rarity_weight(Rarity::Legendary);
            m.handle(event).unwrap();
            if m.is_legendary_locked() {
                prop_assert!(
                    m.rarity_weight(Rarity::Legendary) <= before,
                    "grew after {:?}",
                    event
                );
                if *event == LootEvent::RarityTick {
                    prop_assert_eq!(m.rarity_weight(Rarity::Legendary), 0);
                }
            }
        }
    }

    #[test]
    fn prop_pick_counts_match_events(
        picks in proptest::collection::vec(known_effect(), 0..100),
    ) {
        let mut m = LootPoolManager::from_config(&LootConfig::default()).unwrap();
        for effect in &picks {
            m.on_powerup_picked(effect).unwrap();
        }
        prop_assert_eq!(m.ledger().total_picks(), picks.len() as u64);
        for effect in &picks {
            let expected = picks.iter().filter(|e| *e == effect).count() as u32;
            prop_assert_eq!(m.amount_picked(effect).unwrap(), expected);
        }
    }
}
