//! Dimension state and swap charges.
//!
//! The player lives in one of two world states and may swap once the charge
//! counter is full. Only the accounting lives here; lighting, music and mesh
//! swaps belong to the engine side.

use serde::{Deserialize, Serialize};

/// Binary world state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    True,
    Mirror,
}

impl Dimension {
    pub fn other(self) -> Self {
        match self {
            Dimension::True => Dimension::Mirror,
            Dimension::Mirror => Dimension::True,
        }
    }
}

/// Swap charge counter, always within [0, max]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charges {
    current: u32,
    max: u32,
}

impl Charges {
    pub fn new(max: u32) -> Self {
        Self { current: 0, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Add (or remove, if negative) charges, clamped into [0, max]
    pub fn gain(&mut self, amount: i64) -> u32 {
        let next = (self.current as i64).saturating_add(amount);
        self.current = next.clamp(0, self.max as i64) as u32;
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Change the requirement; the current count is re-clamped
    pub fn set_max(&mut self, max: u32) {
        self.max = max;
        self.current = self.current.min(max);
    }
}
