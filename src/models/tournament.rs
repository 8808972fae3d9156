//! Tournament: a schedule resolved to player names, plus the creation options and errors.

use crate::models::game::{Game, GameId};
use crate::models::player::{Player, SlotAssignment};
use crate::models::report::{ValidationReport, Violation};
use crate::models::schedule::Schedule;
use crate::models::slot::{Group, Slot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Invalid input, rejected before any scheduling work starts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ArgumentError {
    /// Number of names differs from the player count.
    NameCountMismatch { expected: usize, actual: usize },
    PlayerCountNotDivisibleByFour(usize),
    /// Mixed tournaments need two equal groups.
    MixedPlayerCountOdd(usize),
    /// Blank name at this 0-based input position.
    EmptyName { position: usize },
    /// A mixed-pairing skeleton left no group-A/group-B pair for a team.
    MalformedSkeleton { player_count: usize, round: u32, game_id: GameId },
}

impl std::fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgumentError::NameCountMismatch { expected, actual } => {
                write!(f, "Expected {} player names, got {}", expected, actual)
            }
            ArgumentError::PlayerCountNotDivisibleByFour(n) => {
                write!(f, "Player count {} is not divisible by 4", n)
            }
            ArgumentError::MixedPlayerCountOdd(n) => {
                write!(f, "Mixed doubles needs an even player count, got {}", n)
            }
            ArgumentError::EmptyName { position } => {
                write!(f, "Player name at position {} is empty", position + 1)
            }
            ArgumentError::MalformedSkeleton {
                player_count,
                round,
                game_id,
            } => write!(
                f,
                "Schedule skeleton for {} players has no legal pair in round {}, game {}",
                player_count, round, game_id
            ),
        }
    }
}

/// Errors that can occur while creating or editing a tournament.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// No canonical schedule for this player count.
    ScheduleNotFound { player_count: usize },
    Argument(ArgumentError),
    /// The mixed pairing degraded and the caller asked to reject degraded schedules.
    PairingDegraded { violations: Vec<Violation> },
    /// A built-in table failed validation at load time.
    InvalidCanonicalSchedule {
        player_count: usize,
        violations: Vec<Violation>,
    },
    /// Two schedules offered to the repository for the same player count.
    DuplicateSchedule { player_count: usize },
    SlotNotFound(Slot),
    EmptyPlayerName,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::ScheduleNotFound { player_count } => {
                write!(f, "No schedule available for {} players", player_count)
            }
            TournamentError::Argument(e) => write!(f, "{}", e),
            TournamentError::PairingDegraded { violations } => write!(
                f,
                "Mixed pairing could not avoid {} violation(s)",
                violations.len()
            ),
            TournamentError::InvalidCanonicalSchedule {
                player_count,
                violations,
            } => write!(
                f,
                "Built-in schedule for {} players is invalid ({} violation(s))",
                player_count,
                violations.len()
            ),
            TournamentError::DuplicateSchedule { player_count } => {
                write!(f, "More than one schedule given for {} players", player_count)
            }
            TournamentError::SlotNotFound(slot) => write!(f, "Slot {} not found", slot),
            TournamentError::EmptyPlayerName => write!(f, "Player name cannot be empty"),
        }
    }
}

impl std::error::Error for ArgumentError {}

impl std::error::Error for TournamentError {}

impl From<ArgumentError> for TournamentError {
    fn from(e: ArgumentError) -> Self {
        TournamentError::Argument(e)
    }
}

/// Normal doubles, or mixed doubles (one group-A and one group-B slot per team).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentMode {
    #[default]
    Normal,
    Mixed,
}

impl TournamentMode {
    pub fn is_mixed(self) -> bool {
        self == TournamentMode::Mixed
    }
}

/// How names are drawn onto slots.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    /// Shuffle, then assign in order.
    #[default]
    Random,
    /// Input order, no shuffle.
    Linear,
}

/// What to do when the mixed pairing leaves violations behind.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradationPolicy {
    /// Create the tournament anyway; the report carries the violations.
    #[default]
    Accept,
    Reject,
}

/// Everything needed to create a tournament. For mixed mode, names are already ordered group A then group B.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentRequest {
    #[serde(default)]
    pub name: String,
    /// Chosen tournament size; `player_names` must hold exactly this many names.
    pub player_count: usize,
    pub player_names: Vec<String>,
    #[serde(default)]
    pub mode: TournamentMode,
    #[serde(default)]
    pub assignment: AssignmentMode,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub degradation: DegradationPolicy,
}

impl TournamentRequest {
    /// Request sized to `player_names`.
    pub fn new(player_names: Vec<String>) -> Self {
        Self {
            player_count: player_names.len(),
            player_names,
            ..Self::default()
        }
    }
}

/// A game with both representations: slot numbers (in `slots`) and resolved players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentGame {
    pub id: GameId,
    pub round: u32,
    pub slots: Game,
    pub team_1: [Player; 2],
    pub team_2: [Player; 2],
}

/// A created tournament: slot schedule, name mapping, resolved games, and the validation report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub player_count: usize,
    pub mode: TournamentMode,
    pub assignment: SlotAssignment,
    pub schedule: Schedule,
    pub games: Vec<TournamentGame>,
    pub report: ValidationReport,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Resolve every game of `schedule` through `assignment`.
    pub fn new(
        name: impl Into<String>,
        mode: TournamentMode,
        assignment: SlotAssignment,
        schedule: Schedule,
        report: ValidationReport,
    ) -> Self {
        let now = Utc::now();
        let mut tournament = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            player_count: schedule.player_count,
            mode,
            assignment,
            schedule,
            games: Vec::new(),
            report,
            created_at: now,
            updated_at: now,
        };
        tournament.resolve_games();
        tournament
    }

    fn resolve_games(&mut self) {
        let games = self
            .schedule
            .games()
            .map(|g| TournamentGame {
                id: g.id,
                round: g.round,
                slots: *g,
                team_1: [self.player(g.team_1.0), self.player(g.team_1.1)],
                team_2: [self.player(g.team_2.0), self.player(g.team_2.1)],
            })
            .collect();
        self.games = games;
    }

    /// Resolved player for `slot`. Unassigned slots fall back to `Player {slot}`.
    pub fn player(&self, slot: Slot) -> Player {
        let player = Player::new(slot, self.assignment.display_name(slot));
        if self.mode.is_mixed() {
            player.with_group(Group::of(slot, self.player_count))
        } else {
            player
        }
    }

    /// Games of a single 1-based round.
    pub fn games_in_round(&self, round: u32) -> Vec<&TournamentGame> {
        self.games.iter().filter(|g| g.round == round).collect()
    }

    /// Rename the player in `slot` everywhere: the mapping and every resolved game.
    pub fn rename_player(&mut self, slot: Slot, name: impl Into<String>) -> Result<(), TournamentError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }
        if !self.assignment.rename(slot, trimmed.to_string()) {
            return Err(TournamentError::SlotNotFound(slot));
        }
        for game in &mut self.games {
            for p in game.team_1.iter_mut().chain(game.team_2.iter_mut()) {
                if p.slot == slot {
                    p.name = trimmed.to_string();
                }
            }
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
