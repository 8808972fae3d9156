//! Slots, player groups, and partnerships.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Anonymous tournament position, `1..=N`.
pub type Slot = usize;

/// Which half of a mixed tournament a slot belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    /// Slots `1..=N/2`.
    A,
    /// Slots `N/2+1..=N`.
    B,
}

impl Group {
    /// Group of `slot` in a tournament of `player_count` players. The split is fixed at the midpoint.
    pub fn of(slot: Slot, player_count: usize) -> Self {
        if slot <= player_count / 2 {
            Group::A
        } else {
            Group::B
        }
    }
}

/// Unordered pair of slots that shared a team. Always stored as `(min, max)`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Partnership(Slot, Slot);

impl Partnership {
    pub fn new(a: Slot, b: Slot) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn low(&self) -> Slot {
        self.0
    }

    pub fn high(&self) -> Slot {
        self.1
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.0 == slot || self.1 == slot
    }

    /// True when both slots fall on opposite sides of the midpoint.
    pub fn is_mixed(&self, player_count: usize) -> bool {
        Group::of(self.0, player_count) != Group::of(self.1, player_count)
    }
}

impl fmt::Display for Partnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

impl From<(Slot, Slot)> for Partnership {
    fn from((a, b): (Slot, Slot)) -> Self {
        Self::new(a, b)
    }
}
