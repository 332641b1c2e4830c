//! Power tokens and the bounded stack that holds collected ones.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerType {
    /// Burns every word on screen for bonus points.
    Fire,
    /// Freezes words in place and pauses spawning for a while.
    Ice,
    /// Blows the limit meter back to zero.
    Wind,
    /// Slows falling words for a while.
    Slow,
}

impl PowerType {
    /// Drop table order; also the order of the debug hotkeys 1..4.
    pub const ALL: [PowerType; 4] = [PowerType::Fire, PowerType::Ice, PowerType::Wind, PowerType::Slow];

    /// Word the player types to activate this power.
    pub fn name(self) -> &'static str {
        match self {
            PowerType::Fire => "fire",
            PowerType::Ice => "ice",
            PowerType::Wind => "wind",
            PowerType::Slow => "slow",
        }
    }

    pub fn from_typed(typed: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(typed))
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PowerType::Fire => "🔥",
            PowerType::Ice => "❄️",
            PowerType::Wind => "💨",
            PowerType::Slow => "⏱️",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PowerType::Fire => "#ff6b35",
            PowerType::Ice => "#64b5f6",
            PowerType::Wind => "#ba68c8",
            PowerType::Slow => "#ffb74d",
        }
    }
}

/// Bounded FIFO of collected powers awaiting activation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PowerStack {
    items: Vec<PowerType>,
    #[serde(skip)]
    capacity: usize,
}

impl PowerStack {
    pub fn new(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity), capacity }
    }

    /// Returns false (and drops the token) when the stack is full.
    pub fn push(&mut self, power: PowerType) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(power);
        true
    }

    pub fn contains(&self, power: PowerType) -> bool {
        self.items.contains(&power)
    }

    /// Remove the oldest occurrence of `power`.
    pub fn take(&mut self, power: PowerType) -> bool {
        match self.items.iter().position(|p| *p == power) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = PowerType> + '_ {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &[PowerType] {
        &self.items
    }
}
