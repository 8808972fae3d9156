//! Integration tests for the mixed doubles pairing engine.

use doubles_tournament_web::{
    generate_mixed_schedule, validate_schedule, ArgumentError, DegradationKind, Group, Partnership, Schedule,
    ScheduleRepository, TournamentMode, Violation,
};

fn canonical(n: usize) -> Schedule {
    ScheduleRepository::canonical().unwrap().get(n).unwrap().clone()
}

#[test]
fn every_team_crosses_groups() {
    let repo = ScheduleRepository::canonical().unwrap();
    for n in repo.supported_counts() {
        let pairing = generate_mixed_schedule(repo.get(n).unwrap()).unwrap();
        for game in pairing.schedule.games() {
            for team in game.partnerships() {
                assert_eq!(Group::of(team.low(), n), Group::A, "{n} players, game {}", game.id);
                assert_eq!(Group::of(team.high(), n), Group::B, "{n} players, game {}", game.id);
            }
        }
        assert!(pairing.report.is_balanced(), "{n} players");
        assert_eq!(pairing.report.summary.min_appearances, 4);
    }
}

#[test]
fn keeps_skeleton_structure() {
    let skeleton = canonical(16);
    let pairing = generate_mixed_schedule(&skeleton).unwrap();
    assert_eq!(pairing.schedule.player_count, 16);
    assert_eq!(pairing.schedule.rounds.len(), skeleton.rounds.len());
    let ids = |s: &Schedule| s.games().map(|g| (g.id, g.round)).collect::<Vec<_>>();
    assert_eq!(ids(&pairing.schedule), ids(&skeleton));
}

#[test]
fn sixteen_and_twenty_four_are_repeat_free() {
    for n in [16, 24] {
        let pairing = generate_mixed_schedule(&canonical(n)).unwrap();
        assert!(pairing.report.is_valid(), "{n} players:\n{}", pairing.report);
        assert!(!pairing.is_degraded());
        assert_eq!(pairing.repeated_pairs(), 0);
        assert_eq!(pairing.pair_usage.len(), n / 4 * 4 * 2);
    }
}

#[test]
fn twenty_players_degrade_by_four_repeats() {
    let pairing = generate_mixed_schedule(&canonical(20)).unwrap();

    assert_eq!(pairing.schedule.games().count() * 2, 40);
    assert!(pairing.is_degraded());
    assert_eq!(pairing.repeated_pairs(), 4);
    assert_eq!(pairing.degradations.len(), 4);
    assert!(pairing
        .degradations
        .iter()
        .all(|d| d.kind == DegradationKind::RepeatedPartnership && d.prior_uses == 1));

    // Only repeats remain: every round is complete and every slot plays 4 games.
    assert_eq!(pairing.report.repeated_partnerships(), 4);
    assert!(pairing
        .report
        .violations
        .iter()
        .all(|v| matches!(v, Violation::RepeatedPartnership { .. })));
    let repeated: Vec<Partnership> = pairing
        .report
        .summary
        .duplicate_partnerships
        .iter()
        .map(|d| d.partnership)
        .collect();
    assert_eq!(
        repeated,
        vec![
            Partnership::new(9, 19),
            Partnership::new(9, 20),
            Partnership::new(10, 19),
            Partnership::new(10, 20),
        ]
    );
}

#[test]
fn pairing_is_deterministic() {
    let skeleton = canonical(28);
    assert_eq!(
        generate_mixed_schedule(&skeleton).unwrap(),
        generate_mixed_schedule(&skeleton).unwrap()
    );
}

#[test]
fn first_round_for_eight_players() {
    let skeleton = Schedule::from_table(
        8,
        &[
            &[[1, 2, 3, 4], [5, 6, 7, 8]],
            &[[1, 3, 2, 4], [5, 7, 6, 8]],
            &[[1, 4, 2, 3], [5, 8, 6, 7]],
            &[[1, 5, 2, 6], [3, 7, 4, 8]],
        ],
    );
    let pairing = generate_mixed_schedule(&skeleton).unwrap();
    assert_eq!(pairing.schedule.to_table()[0], vec![[1, 5, 2, 6], [3, 7, 4, 8]]);
    assert!(pairing.report.is_valid(), "{}", pairing.report);
    assert_eq!(
        pairing.report,
        validate_schedule(&pairing.schedule, 8, TournamentMode::Mixed)
    );
}

#[test]
fn does_not_mutate_the_skeleton() {
    let repo = ScheduleRepository::canonical().unwrap();
    let before = repo.get(12).unwrap().clone();
    let _ = generate_mixed_schedule(repo.get(12).unwrap()).unwrap();
    assert_eq!(repo.get(12).unwrap(), &before);
}

#[test]
fn rejects_player_counts_not_divisible_by_four() {
    let skeleton = Schedule::from_table(10, &[]);
    assert_eq!(
        generate_mixed_schedule(&skeleton),
        Err(ArgumentError::PlayerCountNotDivisibleByFour(10))
    );
}

#[test]
fn oversized_round_reuses_placed_slots() {
    // Three games for eight players: the third game has no unplaced slots left.
    let skeleton = Schedule::from_table(8, &[&[[1, 2, 3, 4], [5, 6, 7, 8], [1, 3, 5, 7]]]);
    let pairing = generate_mixed_schedule(&skeleton).unwrap();

    assert_eq!(
        pairing.schedule.to_table()[0],
        vec![[1, 5, 2, 6], [3, 7, 4, 8], [1, 7, 2, 8]]
    );
    let exhausted: Vec<_> = pairing
        .degradations
        .iter()
        .map(|d| (d.round, d.game_id, d.team, d.kind))
        .collect();
    assert_eq!(
        exhausted,
        vec![
            (1, 3, Partnership::new(1, 7), DegradationKind::RoundExhausted),
            (1, 3, Partnership::new(2, 8), DegradationKind::RoundExhausted),
        ]
    );
    assert!(pairing.report.violations.iter().any(|v| matches!(
        v,
        Violation::GamesPerRound { round: 1, expected: 2, actual: 3 }
    )));
}

#[test]
fn malformed_skeleton_names_its_position() {
    let err = ArgumentError::MalformedSkeleton {
        player_count: 8,
        round: 2,
        game_id: 5,
    };
    assert_eq!(
        err.to_string(),
        "Schedule skeleton for 8 players has no legal pair in round 2, game 5"
    );
    assert_ne!(err, ArgumentError::PlayerCountNotDivisibleByFour(8));
}
