//! Game: one doubles match between two teams of two slots.

use crate::models::slot::{Partnership, Slot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential game number, unique across a schedule (1-based).
pub type GameId = u32;

/// Two slots playing on the same side.
pub type TeamSlots = (Slot, Slot);

/// A single game: two teams, always doubles.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// 1-based round number this game belongs to.
    pub round: u32,
    pub team_1: TeamSlots,
    pub team_2: TeamSlots,
}

impl Game {
    pub fn new(id: GameId, round: u32, team_1: TeamSlots, team_2: TeamSlots) -> Self {
        Self {
            id,
            round,
            team_1,
            team_2,
        }
    }

    /// The four slots in table order: team 1 then team 2.
    pub fn slots(&self) -> [Slot; 4] {
        [self.team_1.0, self.team_1.1, self.team_2.0, self.team_2.1]
    }

    pub fn partnerships(&self) -> [Partnership; 2] {
        [self.team_1.into(), self.team_2.into()]
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.slots().contains(&slot)
    }
}

/// Renders as `[a, b] vs [c, d]`, the shape analysis tooling parses.
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] vs [{}, {}]",
            self.team_1.0, self.team_1.1, self.team_2.0, self.team_2.1
        )
    }
}
