//! Scheduling logic: repository, validation, slot assignment, mixed pairing, solver, creation flow.

mod assignment;
mod mixed_pairing;
mod repository;
mod setup;
mod solver;
mod validation;

pub use assignment::{assign_slots, check_names, check_player_count};
pub use mixed_pairing::{generate_mixed_schedule, DegradationKind, MixedPairing, PairingDegraded};
pub use repository::ScheduleRepository;
pub use setup::{create_tournament, create_tournament_with_rng};
pub use solver::{
    solve_schedule, CancelToken, ExhaustReason, ScheduleSolver, SearchExhausted, Solution, SolverConfig,
    DEFAULT_MAX_STEPS,
};
pub use validation::validate_schedule;
