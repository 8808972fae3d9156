//! Integration tests for tournament creation, renaming and serialization.

use doubles_tournament_web::{
    create_tournament, create_tournament_with_rng, ArgumentError, AssignmentMode, DegradationPolicy, Group,
    ScheduleRepository, Tournament, TournamentError, TournamentMode, TournamentRequest, Violation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("P{i}")).collect()
}

fn request(n: usize, mode: TournamentMode) -> TournamentRequest {
    TournamentRequest {
        name: "Club night".into(),
        mode,
        seed: Some(2024),
        ..TournamentRequest::new(names(n))
    }
}

#[test]
fn creates_normal_tournament() {
    let repo = ScheduleRepository::canonical().unwrap();
    let t = create_tournament(&repo, &request(12, TournamentMode::Normal)).unwrap();

    assert_eq!(t.name, "Club night");
    assert_eq!(t.player_count, 12);
    assert_eq!(t.games.len(), 12);
    assert!(t.report.is_valid());
    assert_eq!(&t.schedule, repo.get(12).unwrap());
    assert_eq!(t.assignment.len(), 12);

    // Both representations agree: resolved names match the slot mapping.
    for game in &t.games {
        let slots = game.slots.slots();
        let players = [&game.team_1[0], &game.team_1[1], &game.team_2[0], &game.team_2[1]];
        for (slot, player) in slots.iter().zip(players) {
            assert_eq!(player.slot, *slot);
            assert_eq!(Some(player.name.as_str()), t.assignment.name(*slot));
            assert_eq!(player.group, None);
        }
    }

    // Every name plays exactly once per round.
    for round in 1..=4 {
        let games = t.games_in_round(round);
        assert_eq!(games.len(), 3);
        let mut seen: Vec<&str> = games
            .iter()
            .flat_map(|g| g.team_1.iter().chain(g.team_2.iter()))
            .map(|p| p.name.as_str())
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 12, "round {round}");
    }
}

#[test]
fn linear_assignment_puts_names_in_input_order() {
    let repo = ScheduleRepository::canonical().unwrap();
    let req = TournamentRequest {
        assignment: AssignmentMode::Linear,
        ..request(12, TournamentMode::Normal)
    };
    let t = create_tournament(&repo, &req).unwrap();
    let first = &t.games[0];
    assert_eq!(first.team_1[0].name, "P1");
    assert_eq!(first.team_1[1].name, "P2");
    assert_eq!(first.team_2[1].name, "P4");
}

#[test]
fn seeded_requests_draw_identically() {
    let repo = ScheduleRepository::canonical().unwrap();
    let req = request(16, TournamentMode::Normal);
    let a = create_tournament(&repo, &req).unwrap();
    let b = create_tournament(&repo, &req).unwrap();
    assert_eq!(a.assignment, b.assignment);
    assert_ne!(a.id, b.id);

    let mut rng = StdRng::seed_from_u64(2024);
    let c = create_tournament_with_rng(&repo, &req, &mut rng).unwrap();
    assert_eq!(a.assignment, c.assignment);
}

#[test]
fn mixed_tournament_pairs_groups() {
    let repo = ScheduleRepository::canonical().unwrap();
    let t = create_tournament(&repo, &request(16, TournamentMode::Mixed)).unwrap();
    assert!(t.report.is_valid());
    assert_eq!(t.mode, TournamentMode::Mixed);

    let group_a: Vec<String> = names(16)[..8].to_vec();
    for game in &t.games {
        for team in [&game.team_1, &game.team_2] {
            assert_eq!(team[0].group, Some(Group::A));
            assert_eq!(team[1].group, Some(Group::B));
            assert!(group_a.contains(&team[0].name));
            assert!(!group_a.contains(&team[1].name));
        }
    }
}

#[test]
fn degraded_mixed_schedule_is_accepted_by_default() {
    let repo = ScheduleRepository::canonical().unwrap();
    let t = create_tournament(&repo, &request(20, TournamentMode::Mixed)).unwrap();
    assert!(!t.report.is_valid());
    assert_eq!(t.report.repeated_partnerships(), 4);
    assert_eq!(t.games.len(), 20);
}

#[test]
fn degraded_mixed_schedule_can_be_rejected() {
    let repo = ScheduleRepository::canonical().unwrap();
    let req = TournamentRequest {
        degradation: DegradationPolicy::Reject,
        ..request(20, TournamentMode::Mixed)
    };
    match create_tournament(&repo, &req) {
        Err(TournamentError::PairingDegraded { violations }) => {
            assert_eq!(violations.len(), 4);
            assert!(violations
                .iter()
                .all(|v| matches!(v, Violation::RepeatedPartnership { .. })));
        }
        other => panic!("expected PairingDegraded, got {other:?}"),
    }

    // Clean counts pass under the same policy.
    let req = TournamentRequest {
        degradation: DegradationPolicy::Reject,
        ..request(24, TournamentMode::Mixed)
    };
    assert!(create_tournament(&repo, &req).is_ok());
}

#[test]
fn creation_leaves_canonical_schedule_untouched() {
    let repo = ScheduleRepository::canonical().unwrap();
    let before = repo.get(20).unwrap().clone();
    create_tournament(&repo, &request(20, TournamentMode::Mixed)).unwrap();
    assert_eq!(repo.get(20).unwrap(), &before);
}

#[test]
fn invalid_requests_fail_before_scheduling() {
    let repo = ScheduleRepository::canonical().unwrap();

    assert_eq!(
        create_tournament(&repo, &request(13, TournamentMode::Normal)).unwrap_err(),
        TournamentError::Argument(ArgumentError::PlayerCountNotDivisibleByFour(13))
    );
    assert_eq!(
        create_tournament(&repo, &request(8, TournamentMode::Normal)).unwrap_err(),
        TournamentError::ScheduleNotFound { player_count: 8 }
    );

    let mut req = request(12, TournamentMode::Normal);
    req.player_names[3] = " ".into();
    assert_eq!(
        create_tournament(&repo, &req).unwrap_err(),
        TournamentError::Argument(ArgumentError::EmptyName { position: 3 })
    );
}

#[test]
fn name_list_must_match_chosen_size() {
    let repo = ScheduleRepository::canonical().unwrap();
    let json = serde_json::json!({
        "player_count": 16,
        "player_names": names(12),
        "assignment": "linear",
    });
    let req: TournamentRequest = serde_json::from_value(json).unwrap();
    assert_eq!(
        create_tournament(&repo, &req).unwrap_err(),
        TournamentError::Argument(ArgumentError::NameCountMismatch { expected: 16, actual: 12 })
    );

    let req = TournamentRequest {
        player_count: 12,
        ..TournamentRequest::new(names(16))
    };
    assert_eq!(
        create_tournament(&repo, &req).unwrap_err(),
        TournamentError::Argument(ArgumentError::NameCountMismatch { expected: 12, actual: 16 })
    );
}

#[test]
fn request_requires_player_count() {
    let parsed = serde_json::from_str::<TournamentRequest>(r#"{"player_names": ["a", "b", "c", "d"]}"#);
    assert!(parsed.is_err());
}

#[test]
fn rename_updates_mapping_and_games() {
    let repo = ScheduleRepository::canonical().unwrap();
    let mut t = create_tournament(&repo, &request(12, TournamentMode::Normal)).unwrap();
    let created = t.updated_at;

    t.rename_player(7, "  Zoe ").unwrap();
    assert_eq!(t.assignment.name(7), Some("Zoe"));
    let appearances = t
        .games
        .iter()
        .flat_map(|g| g.team_1.iter().chain(g.team_2.iter()))
        .filter(|p| p.slot == 7)
        .inspect(|p| assert_eq!(p.name, "Zoe"))
        .count();
    assert_eq!(appearances, 4);
    assert!(t.updated_at >= created);

    assert_eq!(t.rename_player(7, "   "), Err(TournamentError::EmptyPlayerName));
    assert_eq!(t.rename_player(40, "Max"), Err(TournamentError::SlotNotFound(40)));
    assert_eq!(t.assignment.name(7), Some("Zoe"));
}

#[test]
fn tournament_round_trips_through_json() {
    let repo = ScheduleRepository::canonical().unwrap();
    let t = create_tournament(&repo, &request(20, TournamentMode::Mixed)).unwrap();

    let json = serde_json::to_string(&t).unwrap();
    let back: Tournament = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["mode"], "mixed");
    assert_eq!(value["games"][0]["slots"]["team_1"], serde_json::json!([1, 11]));
    assert_eq!(value["games"][0]["team_1"][0]["group"], "a");
    let mapping: BTreeMap<String, String> = serde_json::from_value(value["assignment"].clone()).unwrap();
    assert_eq!(mapping.len(), 20);
}

#[test]
fn request_defaults_from_json() {
    let req: TournamentRequest =
        serde_json::from_str(r#"{"player_count": 4, "player_names": ["a", "b", "c", "d"]}"#).unwrap();
    assert_eq!(req.mode, TournamentMode::Normal);
    assert_eq!(req.assignment, AssignmentMode::Random);
    assert_eq!(req.degradation, DegradationPolicy::Accept);
    assert_eq!(req.seed, None);
    assert_eq!(req.player_count, 4);
}
