//! Round and Schedule: the round-structured list of games for a player count.

use crate::models::game::{Game, GameId};
use crate::models::slot::Slot;
use serde::{Deserialize, Serialize};

/// Every tournament is exactly this many rounds long.
pub const ROUNDS: usize = 4;

/// Each slot plays once per round, so this equals [`ROUNDS`].
pub const GAMES_PER_PLAYER: usize = ROUNDS;

pub const PLAYERS_PER_GAME: usize = 4;

/// One game row of a fixed table: `[team1_a, team1_b, team2_a, team2_b]`.
pub type TableRow = [Slot; 4];

/// Ordered games of a single round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based.
    pub number: u32,
    pub games: Vec<Game>,
}

/// All rounds for a given player count. Immutable once built; derived schedules are new values.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub player_count: usize,
    pub rounds: Vec<Round>,
}

impl Schedule {
    /// Build from table rows, numbering games sequentially from 1 across rounds.
    pub fn from_table(player_count: usize, rounds: &[&[TableRow]]) -> Self {
        let mut next_id: GameId = 1;
        let rounds = rounds
            .iter()
            .enumerate()
            .map(|(idx, rows)| {
                let number = idx as u32 + 1;
                let games = rows
                    .iter()
                    .map(|row| {
                        let game = Game::new(next_id, number, (row[0], row[1]), (row[2], row[3]));
                        next_id += 1;
                        game
                    })
                    .collect();
                Round { number, games }
            })
            .collect();
        Self {
            player_count,
            rounds,
        }
    }

    /// Games per round for a well-formed schedule of `player_count` players.
    pub fn games_per_round(player_count: usize) -> usize {
        player_count / PLAYERS_PER_GAME
    }

    /// All games in round order.
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.rounds.iter().flat_map(|r| r.games.iter())
    }

    pub fn game_count(&self) -> usize {
        self.rounds.iter().map(|r| r.games.len()).sum()
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games().find(|g| g.id == id)
    }

    /// Table rows per round, the inverse of [`Schedule::from_table`].
    pub fn to_table(&self) -> Vec<Vec<TableRow>> {
        self.rounds
            .iter()
            .map(|r| r.games.iter().map(|g| g.slots()).collect())
            .collect()
    }
}
