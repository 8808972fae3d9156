//! Integration tests for slot assignment and argument checks.

use doubles_tournament_web::{
    assign_slots, check_names, check_player_count, ArgumentError, AssignmentMode, TournamentMode,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Player{i:02}")).collect()
}

#[test]
fn linear_assignment_keeps_input_order() {
    let input = names(12);
    let mut rng = StdRng::seed_from_u64(1);
    let assignment = assign_slots(&input, 12, TournamentMode::Normal, AssignmentMode::Linear, &mut rng).unwrap();

    assert_eq!(assignment.len(), 12);
    assert_eq!(assignment.slots(), (1..=12).collect::<Vec<_>>());
    assert_eq!(assignment.names(), input.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(assignment.name(1), Some("Player01"));
    assert_eq!(assignment.slot_of("Player12"), Some(12));
}

#[test]
fn random_assignment_is_a_bijection() {
    let input = names(16);
    let mut rng = StdRng::seed_from_u64(42);
    let assignment = assign_slots(&input, 16, TournamentMode::Normal, AssignmentMode::Random, &mut rng).unwrap();

    assert_eq!(assignment.slots(), (1..=16).collect::<Vec<_>>());
    let mut drawn: Vec<&str> = assignment.names();
    drawn.sort();
    assert_eq!(drawn, input.iter().map(String::as_str).collect::<Vec<_>>());

    // Inverse lookup recovers every name's slot.
    for (slot, name) in assignment.iter() {
        assert_eq!(assignment.slot_of(name), Some(slot));
    }
}

#[test]
fn same_seed_same_draw() {
    let input = names(20);
    let a = assign_slots(
        &input,
        20,
        TournamentMode::Normal,
        AssignmentMode::Random,
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();
    let b = assign_slots(
        &input,
        20,
        TournamentMode::Normal,
        AssignmentMode::Random,
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn mixed_assignment_keeps_groups_apart() {
    let input = names(12);
    let mut rng = StdRng::seed_from_u64(3);
    let assignment = assign_slots(&input, 12, TournamentMode::Mixed, AssignmentMode::Random, &mut rng).unwrap();

    let first_half: Vec<&str> = input[..6].iter().map(String::as_str).collect();
    for slot in 1..=12 {
        let name = assignment.name(slot).unwrap();
        assert_eq!(first_half.contains(&name), slot <= 6, "slot {slot} got {name}");
    }
}

#[test]
fn mixed_linear_assignment_is_identity() {
    let input = names(8);
    let mut rng = StdRng::seed_from_u64(0);
    let assignment = assign_slots(&input, 8, TournamentMode::Mixed, AssignmentMode::Linear, &mut rng).unwrap();
    assert_eq!(assignment.name(5), Some("Player05"));
    assert_eq!(assignment.name(8), Some("Player08"));
}

#[test]
fn names_are_kept_verbatim() {
    let input: Vec<String> = vec!["  Ann ".into(), "Bo".into(), "Cy\t".into(), "Di".into()];
    let mut rng = StdRng::seed_from_u64(0);
    let assignment = assign_slots(&input, 4, TournamentMode::Normal, AssignmentMode::Linear, &mut rng).unwrap();
    assert_eq!(assignment.name(1), Some("  Ann "));
    assert_eq!(assignment.name(3), Some("Cy\t"));

    let mut rng = StdRng::seed_from_u64(5);
    let assignment = assign_slots(&input, 4, TournamentMode::Normal, AssignmentMode::Random, &mut rng).unwrap();
    let mut drawn: Vec<&str> = assignment.names();
    drawn.sort();
    let mut expected: Vec<&str> = input.iter().map(String::as_str).collect();
    expected.sort();
    assert_eq!(drawn, expected);
}

#[test]
fn unassigned_slot_falls_back_to_placeholder() {
    let mut rng = StdRng::seed_from_u64(0);
    let assignment = assign_slots(&names(4), 4, TournamentMode::Normal, AssignmentMode::Linear, &mut rng).unwrap();
    assert_eq!(assignment.display_name(2), "Player02");
    assert_eq!(assignment.display_name(9), "Player 9");
}

#[test]
fn player_count_must_be_divisible_by_four() {
    assert_eq!(
        check_player_count(13, TournamentMode::Normal),
        Err(ArgumentError::PlayerCountNotDivisibleByFour(13))
    );
    assert_eq!(
        check_player_count(0, TournamentMode::Mixed),
        Err(ArgumentError::PlayerCountNotDivisibleByFour(0))
    );
    assert_eq!(check_player_count(20, TournamentMode::Mixed), Ok(()));

    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        assign_slots(&names(13), 13, TournamentMode::Normal, AssignmentMode::Random, &mut rng),
        Err(ArgumentError::PlayerCountNotDivisibleByFour(13))
    );
}

#[test]
fn name_count_must_match() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        assign_slots(&names(11), 12, TournamentMode::Normal, AssignmentMode::Linear, &mut rng),
        Err(ArgumentError::NameCountMismatch {
            expected: 12,
            actual: 11
        })
    );
}

#[test]
fn blank_names_are_rejected() {
    let mut input = names(8);
    input[5] = "   ".into();
    assert_eq!(check_names(&input, 8), Err(ArgumentError::EmptyName { position: 5 }));
    assert_eq!(
        ArgumentError::EmptyName { position: 5 }.to_string(),
        "Player name at position 6 is empty"
    );
}
