//! ValidationReport: the structured result of checking a schedule.
//!
//! The report is the error channel for validation: an empty `violations`
//! list means the schedule satisfies every invariant. Its `Display` output
//! is the plain-text shape consumed by external analysis scripts.

use crate::models::game::GameId;
use crate::models::slot::{Group, Partnership, Slot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single broken invariant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Player count is zero or not divisible by 4.
    InvalidPlayerCount { player_count: usize },
    RoundCount { expected: usize, actual: usize },
    GamesPerRound { round: u32, expected: usize, actual: usize },
    /// Slot outside `1..=N`.
    SlotOutOfRange { game_id: GameId, slot: Slot },
    /// The same slot listed twice inside one game.
    DuplicateSlotInGame { game_id: GameId, slot: Slot },
    /// A slot placed in more than one game of a round.
    DuplicateSlotInRound { round: u32, slot: Slot, game_ids: Vec<GameId> },
    MissingSlotInRound { round: u32, slot: Slot },
    RepeatedPartnership { partnership: Partnership, game_ids: Vec<GameId> },
    AppearanceMismatch { slot: Slot, expected: usize, actual: usize },
    /// Mixed mode: both team slots in the same group.
    SameGroupTeam { game_id: GameId, team: Partnership, group: Group },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::InvalidPlayerCount { player_count } => {
                write!(f, "Player count {player_count} is not a positive multiple of 4")
            }
            Violation::RoundCount { expected, actual } => {
                write!(f, "Expected {expected} rounds, found {actual}")
            }
            Violation::GamesPerRound { round, expected, actual } => {
                write!(f, "Round {round}: expected {expected} games, found {actual}")
            }
            Violation::SlotOutOfRange { game_id, slot } => {
                write!(f, "Game {game_id}: slot {slot} is out of range")
            }
            Violation::DuplicateSlotInGame { game_id, slot } => {
                write!(f, "Game {game_id}: slot {slot} appears twice")
            }
            Violation::DuplicateSlotInRound { round, slot, game_ids } => {
                write!(f, "Round {round}: slot {slot} plays in games {}", join_ids(game_ids))
            }
            Violation::MissingSlotInRound { round, slot } => {
                write!(f, "Round {round}: slot {slot} does not play")
            }
            Violation::RepeatedPartnership { partnership, game_ids } => {
                write!(f, "Pair [{partnership}] repeated in games: {}", join_ids(game_ids))
            }
            Violation::AppearanceMismatch { slot, expected, actual } => {
                write!(f, "Slot {slot} plays {actual} games (expected {expected})")
            }
            Violation::SameGroupTeam { game_id, team, group } => {
                write!(f, "Game {game_id}: team [{team}] is entirely group {group:?}")
            }
        }
    }
}

/// Literal game listing for one round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundListing {
    pub round: u32,
    /// One `[a, b] vs [c, d]` entry per game.
    pub games: Vec<String>,
}

/// A partnership seen in more than one game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePartnership {
    pub partnership: Partnership,
    pub game_ids: Vec<GameId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_games: usize,
    pub unique_partnerships: usize,
    pub duplicate_partnerships: Vec<DuplicatePartnership>,
    pub min_appearances: usize,
    pub max_appearances: usize,
    pub avg_appearances: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub player_count: usize,
    pub mixed: bool,
    pub rounds: Vec<RoundListing>,
    pub summary: ReportSummary,
    /// Distinct partners of every slot, sorted.
    pub partners: BTreeMap<Slot, Vec<Slot>>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Repeated partnerships only, ignoring other violation kinds.
    pub fn repeated_partnerships(&self) -> usize {
        self.summary.duplicate_partnerships.len()
    }

    pub fn is_balanced(&self) -> bool {
        self.summary.min_appearances == self.summary.max_appearances
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.mixed { "mixed" } else { "normal" };
        writeln!(f, "=== SCHEDULE: {} players ({mode}) ===", self.player_count)?;
        for listing in &self.rounds {
            writeln!(f)?;
            writeln!(f, "Round {}:", listing.round)?;
            for game in &listing.games {
                writeln!(f, "  {game}")?;
            }
        }

        let s = &self.summary;
        writeln!(f)?;
        writeln!(f, "=== SUMMARY ===")?;
        writeln!(f, "Total games: {}", s.total_games)?;
        writeln!(f, "Unique partnerships: {}", s.unique_partnerships)?;
        writeln!(f, "Repeated partnerships: {}", s.duplicate_partnerships.len())?;
        for dup in &s.duplicate_partnerships {
            writeln!(
                f,
                "  Pair [{}] repeated in games: {}",
                dup.partnership,
                join_ids(&dup.game_ids)
            )?;
        }
        writeln!(
            f,
            "Games per player: min={}, max={}, avg={:.2}",
            s.min_appearances, s.max_appearances, s.avg_appearances
        )?;

        if self.violations.is_empty() {
            write!(f, "No violations")
        } else {
            writeln!(f, "Violations: {}", self.violations.len())?;
            for (idx, v) in self.violations.iter().enumerate() {
                if idx > 0 {
                    writeln!(f)?;
                }
                write!(f, "  - {v}")?;
            }
            Ok(())
        }
    }
}

fn join_ids(ids: &[GameId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
