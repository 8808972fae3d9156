//! Data structures for doubles scheduling: slots, games, schedules, reports, tournaments.

mod game;
mod player;
mod report;
mod schedule;
mod slot;
mod tournament;

pub use game::{Game, GameId, TeamSlots};
pub use player::{Player, SlotAssignment};
pub use report::{DuplicatePartnership, ReportSummary, RoundListing, ValidationReport, Violation};
pub use schedule::{Round, Schedule, TableRow, GAMES_PER_PLAYER, PLAYERS_PER_GAME, ROUNDS};
pub use slot::{Group, Partnership, Slot};
pub use tournament::{
    ArgumentError, AssignmentMode, DegradationPolicy, Tournament, TournamentError, TournamentGame,
    TournamentId, TournamentMode, TournamentRequest,
};
