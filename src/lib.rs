//! Doubles tournament scheduler: library with models and scheduling logic.
//!
//! Every player plays one game per round for 4 rounds, never with the same
//! partner twice; mixed tournaments pair one group-A with one group-B player
//! in every team.

pub mod logic;
pub mod models;

pub use logic::{
    assign_slots, check_names, check_player_count, create_tournament, create_tournament_with_rng,
    generate_mixed_schedule, solve_schedule, validate_schedule, CancelToken, DegradationKind,
    ExhaustReason, MixedPairing, PairingDegraded, ScheduleRepository, ScheduleSolver, SearchExhausted,
    Solution, SolverConfig, DEFAULT_MAX_STEPS,
};
pub use models::{
    ArgumentError, AssignmentMode, DegradationPolicy, DuplicatePartnership, Game, GameId, Group,
    Partnership, Player, ReportSummary, Round, RoundListing, Schedule, Slot, SlotAssignment, TableRow,
    TeamSlots, Tournament, TournamentError, TournamentGame, TournamentId, TournamentMode,
    TournamentRequest, ValidationReport, Violation, GAMES_PER_PLAYER, PLAYERS_PER_GAME, ROUNDS,
};
