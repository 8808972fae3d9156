//! Slot assignment: draws player names onto slots `1..=N`.

use crate::models::{ArgumentError, AssignmentMode, SlotAssignment, TournamentMode, PLAYERS_PER_GAME};
use rand::seq::SliceRandom;
use rand::Rng;

/// Reject a player count the schedules cannot hold.
pub fn check_player_count(player_count: usize, mode: TournamentMode) -> Result<(), ArgumentError> {
    if player_count == 0 || player_count % PLAYERS_PER_GAME != 0 {
        return Err(ArgumentError::PlayerCountNotDivisibleByFour(player_count));
    }
    if mode.is_mixed() && player_count % 2 != 0 {
        return Err(ArgumentError::MixedPlayerCountOdd(player_count));
    }
    Ok(())
}

/// Reject a name list that does not match `player_count` or holds blank names.
pub fn check_names(names: &[String], player_count: usize) -> Result<(), ArgumentError> {
    if names.len() != player_count {
        return Err(ArgumentError::NameCountMismatch {
            expected: player_count,
            actual: names.len(),
        });
    }
    if let Some(position) = names.iter().position(|n| n.trim().is_empty()) {
        return Err(ArgumentError::EmptyName { position });
    }
    Ok(())
}

/// Assign `names` to slots `1..=player_count`.
///
/// - `Random`: Fisher–Yates shuffle with `rng`, then assign in order.
/// - `Linear`: input order.
/// - Mixed mode: the first half of `names` goes to group-A slots `1..=N/2`,
///   the second half to group-B slots `N/2+1..=N`; shuffling (if any) stays
///   within each half.
///
/// Names are kept exactly as given. The result is always a total bijection onto `1..=N`.
pub fn assign_slots<R: Rng + ?Sized>(
    names: &[String],
    player_count: usize,
    mode: TournamentMode,
    assignment: AssignmentMode,
    rng: &mut R,
) -> Result<SlotAssignment, ArgumentError> {
    check_player_count(player_count, mode)?;
    check_names(names, player_count)?;

    let names = names.to_vec();
    let mut result = SlotAssignment::new();
    match mode {
        TournamentMode::Normal => {
            result.place(1, draw(names, assignment, rng));
        }
        TournamentMode::Mixed => {
            let half = player_count / 2;
            let mut group_a = names;
            let group_b = group_a.split_off(half);
            result.place(1, draw(group_a, assignment, rng));
            result.place(half + 1, draw(group_b, assignment, rng));
        }
    }
    Ok(result)
}

fn draw<R: Rng + ?Sized>(mut names: Vec<String>, assignment: AssignmentMode, rng: &mut R) -> Vec<String> {
    if assignment == AssignmentMode::Random {
        names.shuffle(rng);
    }
    names
}
