//! Weighted-random sampling container.
//!
//! Entries keep insertion order and are addressed by index. Weights are
//! unsigned; every signed write clamps at 0, so a pool can only be
//! "soft-removed" from (weight 0), never shrunk.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::{LootError, LootResult};

/// A single item with its selection weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEntry<T> {
    item: T,
    weight: u32,
}

impl<T> WeightedEntry<T> {
    pub fn new(item: T, weight: u32) -> Self {
        Self { item, weight }
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Set weight, clamping negative input to 0
    pub fn set_weight(&mut self, weight: i64) {
        self.weight = clamp_weight(weight);
    }
}

/// Ordered list of weighted entries supporting O(n) sampling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedRandomList<T> {
    entries: Vec<WeightedEntry<T>>,
}

impl<T> Default for WeightedRandomList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> WeightedRandomList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; returns its index
    pub fn push(&mut self, item: T, weight: u32) -> usize {
        self.entries.push(WeightedEntry::new(item, weight));
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[WeightedEntry<T>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedEntry<T>> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> LootResult<&WeightedEntry<T>> {
        self.entries.get(index).ok_or(LootError::IndexOutOfBounds {
            index,
            len: self.entries.len(),
        })
    }

    pub fn weight(&self, index: usize) -> LootResult<u32> {
        self.get(index).map(WeightedEntry::weight)
    }

    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| e.weight as u64).sum()
    }

    /// Selection probability of the entry at `index` (0.0 for an exhausted list)
    pub fn probability(&self, index: usize) -> LootResult<f64> {
        let weight = self.weight(index)?;
        let total = self.total_weight();
        if total == 0 {
            return Ok(0.0);
        }
        Ok(weight as f64 / total as f64)
    }

    /// Index of the first entry whose item matches `pred`
    pub fn position<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.entries.iter().position(|e| pred(&e.item))
    }

    /// Indices of every entry whose item matches `pred`
    pub fn positions<F>(&self, mut pred: F) -> Vec<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| pred(&e.item))
            .map(|(i, _)| i)
            .collect()
    }

    /// Replace the weight at `index`. Negative input is stored as 0.
    pub fn set_weight(&mut self, index: usize, weight: i64) -> LootResult<()> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(LootError::IndexOutOfBounds { index, len })?;
        entry.set_weight(weight);
        Ok(())
    }

    /// Add `delta` to the weight at `index`, saturating at 0
    pub fn increase_weight(&mut self, index: usize, delta: i64) -> LootResult<()> {
        let current = self.weight(index)? as i64;
        self.set_weight(index, current.saturating_add(delta))
    }

    /// Like [`set_weight`](Self::set_weight), but refuses any write that would
    /// leave the whole list with total weight 0. Returns whether it applied.
    pub fn set_weight_guarded(&mut self, index: usize, weight: i64) -> LootResult<bool> {
        let current = self.weight(index)? as u64;
        let new_weight = clamp_weight(weight) as u64;
        let remaining = self.total_weight() - current;
        if remaining + new_weight == 0 && current > 0 {
            warn!(
                index,
                current, "Refusing weight write that would exhaust the pool"
            );
            return Ok(false);
        }
        self.set_weight(index, weight)?;
        Ok(true)
    }

    /// Draw one item with probability weight / total, using the given RNG.
    ///
    /// Zero-weight entries are never returned. The caller must not draw from
    /// an exhausted list; doing so yields [`LootError::ExhaustedPool`].
    pub fn get_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> LootResult<&T> {
        let total = self.total_weight();
        if total == 0 {
            error!(len = self.entries.len(), "Draw from exhausted pool");
            return Err(LootError::ExhaustedPool);
        }

        let roll = rng.gen_range(0..total);
        let mut accumulated = 0u64;
        for entry in &self.entries {
            accumulated += entry.weight as u64;
            if roll < accumulated {
                return Ok(&entry.item);
            }
        }

        // roll < total == final accumulated value, so the loop always returns
        Err(LootError::ExhaustedPool)
    }

    /// Draw one item using the thread-local RNG
    pub fn get_random(&self) -> LootResult<&T> {
        self.get_random_with(&mut rand::thread_rng())
    }
}

impl<T> FromIterator<(T, u32)> for WeightedRandomList<T> {
    fn from_iter<I: IntoIterator<Item = (T, u32)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(item, weight)| WeightedEntry::new(item, weight))
                .collect(),
        }
    }
}

fn clamp_weight(weight: i64) -> u32 {
    weight.clamp(0, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(7)
    }

    #[test]
    fn test_uniform_sampling_fidelity() {
        let list: WeightedRandomList<usize> = (0..4).map(|i| (i, 1)).collect();
        let mut rng = rng();
        let mut counts = [0u32; 4];
        let draws = 100_000;
        for _ in 0..draws {
            counts[*list.get_random_with(&mut rng).unwrap()] += 1;
        }
        for count in counts {
            let freq = count as f64 / draws as f64;
            assert!((freq - 0.25).abs() < 0.01, "frequency {freq} too far from 0.25");
        }
    }

    #[test]
    fn test_proportional_sampling() {
        let list: WeightedRandomList<&str> = vec![("a", 3), ("b", 1)].into_iter().collect();
        let mut rng = rng();
        let draws = 40_000;
        let a = (0..draws)
            .filter(|_| *list.get_random_with(&mut rng).unwrap() == "a")
            .count();
        let freq = a as f64 / draws as f64;
        assert!((freq - 0.75).abs() < 0.02);
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let list: WeightedRandomList<&str> =
            vec![("never", 0), ("always", 5), ("also_never", 0)]
                .into_iter()
                .collect();
        let mut rng = rng();
        for _ in 0..10_000 {
            assert_eq!(*list.get_random_with(&mut rng).unwrap(), "always");
        }
    }

    #[test]
    fn test_single_entry_always_returned() {
        let mut list = WeightedRandomList::new();
        list.push("only", 1);
        for _ in 0..100 {
            assert_eq!(*list.get_random().unwrap(), "only");
        }
    }

    #[test]
    fn test_exhausted_and_empty_pools_error() {
        let empty: WeightedRandomList<u8> = WeightedRandomList::new();
        assert_eq!(empty.get_random(), Err(LootError::ExhaustedPool));

        let zeroed: WeightedRandomList<u8> = vec![(1, 0), (2, 0)].into_iter().collect();
        assert_eq!(zeroed.get_random(), Err(LootError::ExhaustedPool));
    }

    #[test]
    fn test_set_weight_clamps_negative() {
        let mut list: WeightedRandomList<u8> = vec![(1, 4)].into_iter().collect();
        list.set_weight(0, -5).unwrap();
        assert_eq!(list.weight(0).unwrap(), 0);
    }

    #[test]
    fn test_increase_weight_saturates_at_zero() {
        let mut list: WeightedRandomList<u8> = vec![(1, 3)].into_iter().collect();
        list.increase_weight(0, 2).unwrap();
        assert_eq!(list.weight(0).unwrap(), 5);
        list.increase_weight(0, -10).unwrap();
        assert_eq!(list.weight(0).unwrap(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut list: WeightedRandomList<u8> = vec![(1, 3)].into_iter().collect();
        assert_eq!(
            list.set_weight(3, 1),
            Err(LootError::IndexOutOfBounds { index: 3, len: 1 })
        );
        assert!(list.increase_weight(1, 1).is_err());
        assert!(list.weight(9).is_err());
    }

    #[test]
    fn test_duplicates_are_independent() {
        let mut list = WeightedRandomList::new();
        list.push("x", 2);
        list.push("x", 6);
        list.set_weight(0, 0).unwrap();
        assert_eq!(list.weight(1).unwrap(), 6);
        assert_eq!(list.positions(|i| *i == "x"), vec![0, 1]);
    }

    #[test]
    fn test_guarded_write_keeps_pool_live() {
        let mut list: WeightedRandomList<u8> = vec![(1, 2), (2, 1)].into_iter().collect();
        assert!(list.set_weight_guarded(0, 0).unwrap());
        assert!(!list.set_weight_guarded(1, 0).unwrap());
        assert_eq!(list.weight(1).unwrap(), 1);
        assert_eq!(list.total_weight(), 1);
    }

    #[test]
    fn test_guarded_write_on_zero_entry_is_noop_success() {
        let mut list: WeightedRandomList<u8> = vec![(1, 0), (2, 0)].into_iter().collect();
        assert!(list.set_weight_guarded(0, 0).unwrap());
    }

    #[test]
    fn test_probability() {
        let list: WeightedRandomList<u8> = vec![(1, 1), (2, 3)].into_iter().collect();
        assert!((list.probability(1).unwrap() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let list: WeightedRandomList<u32> = (0..10).map(|i| (i, i + 1)).collect();
        let mut a = rng();
        let mut b = rng();
        for _ in 0..100 {
            assert_eq!(
                list.get_random_with(&mut a).unwrap(),
                list.get_random_with(&mut b).unwrap()
            );
        }
    }
}
