//! Schedule validation: checks every invariant in one pass and reports all violations.

use crate::models::{
    DuplicatePartnership, GameId, Group, Partnership, ReportSummary, RoundListing, Schedule, Slot,
    TournamentMode, ValidationReport, Violation, GAMES_PER_PLAYER, PLAYERS_PER_GAME, ROUNDS,
};
use std::collections::{BTreeMap, BTreeSet};

/// Validate `schedule` for `player_count` players.
///
/// Pure and deterministic: the same input always produces the same report.
/// Never panics on malformed schedules (out-of-range slots, short rounds,
/// duplicated slots); those become violations instead.
///
/// Checks, in order:
/// 1. Player count is a positive multiple of 4, and there are exactly 4 rounds.
/// 2. Each round has N/4 games and covers every slot exactly once.
/// 3. No partnership is formed twice across the schedule.
/// 4. Every slot plays exactly 4 games.
/// 5. Mixed mode: every team has one group-A and one group-B slot.
pub fn validate_schedule(schedule: &Schedule, player_count: usize, mode: TournamentMode) -> ValidationReport {
    let mixed = mode.is_mixed();
    let mut violations = Vec::new();

    if player_count == 0 || player_count % PLAYERS_PER_GAME != 0 {
        violations.push(Violation::InvalidPlayerCount { player_count });
    }
    if schedule.rounds.len() != ROUNDS {
        violations.push(Violation::RoundCount {
            expected: ROUNDS,
            actual: schedule.rounds.len(),
        });
    }

    let expected_games = Schedule::games_per_round(player_count);
    let in_range = |slot: Slot| (1..=player_count).contains(&slot);

    let mut appearances = vec![0usize; player_count + 1];
    let mut occurrences: BTreeMap<Partnership, Vec<GameId>> = BTreeMap::new();
    let mut listings = Vec::with_capacity(schedule.rounds.len());

    for round in &schedule.rounds {
        if round.games.len() != expected_games {
            violations.push(Violation::GamesPerRound {
                round: round.number,
                expected: expected_games,
                actual: round.games.len(),
            });
        }

        let mut seen_in_round: BTreeMap<Slot, Vec<GameId>> = BTreeMap::new();
        for game in &round.games {
            let slots = game.slots();
            for (i, &slot) in slots.iter().enumerate() {
                if !in_range(slot) {
                    violations.push(Violation::SlotOutOfRange { game_id: game.id, slot });
                    continue;
                }
                if slots[..i].contains(&slot) {
                    violations.push(Violation::DuplicateSlotInGame { game_id: game.id, slot });
                    continue;
                }
                appearances[slot] += 1;
                seen_in_round.entry(slot).or_default().push(game.id);
            }

            for team in game.partnerships() {
                occurrences.entry(team).or_default().push(game.id);
                if mixed && in_range(team.low()) && in_range(team.high()) && !team.is_mixed(player_count) {
                    violations.push(Violation::SameGroupTeam {
                        game_id: game.id,
                        team,
                        group: Group::of(team.low(), player_count),
                    });
                }
            }
        }

        for slot in 1..=player_count {
            match seen_in_round.get(&slot) {
                None => violations.push(Violation::MissingSlotInRound {
                    round: round.number,
                    slot,
                }),
                Some(ids) if ids.len() > 1 => violations.push(Violation::DuplicateSlotInRound {
                    round: round.number,
                    slot,
                    game_ids: ids.clone(),
                }),
                Some(_) => {}
            }
        }

        listings.push(RoundListing {
            round: round.number,
            games: round.games.iter().map(|g| g.to_string()).collect(),
        });
    }

    let mut duplicate_partnerships = Vec::new();
    for (&partnership, game_ids) in &occurrences {
        if game_ids.len() > 1 {
            violations.push(Violation::RepeatedPartnership {
                partnership,
                game_ids: game_ids.clone(),
            });
            duplicate_partnerships.push(DuplicatePartnership {
                partnership,
                game_ids: game_ids.clone(),
            });
        }
    }

    for slot in 1..=player_count {
        if appearances[slot] != GAMES_PER_PLAYER {
            violations.push(Violation::AppearanceMismatch {
                slot,
                expected: GAMES_PER_PLAYER,
                actual: appearances[slot],
            });
        }
    }

    let counts = &appearances[1..];
    let total: usize = counts.iter().sum();
    let summary = ReportSummary {
        total_games: schedule.game_count(),
        unique_partnerships: occurrences.len(),
        duplicate_partnerships,
        min_appearances: counts.iter().copied().min().unwrap_or(0),
        max_appearances: counts.iter().copied().max().unwrap_or(0),
        avg_appearances: if player_count == 0 {
            0.0
        } else {
            total as f64 / player_count as f64
        },
    };

    ValidationReport {
        player_count,
        mixed,
        rounds: listings,
        summary,
        partners: partner_lists(occurrences.keys(), player_count),
        violations,
    }
}

fn partner_lists<'a, I>(partnerships: I, player_count: usize) -> BTreeMap<Slot, Vec<Slot>>
where
    I: Iterator<Item = &'a Partnership>,
{
    let mut partners: BTreeMap<Slot, BTreeSet<Slot>> =
        (1..=player_count).map(|slot| (slot, BTreeSet::new())).collect();
    for p in partnerships {
        if p.low() == p.high() {
            continue;
        }
        if let Some(set) = partners.get_mut(&p.low()) {
            set.insert(p.high());
        }
        if let Some(set) = partners.get_mut(&p.high()) {
            set.insert(p.low());
        }
    }
    partners
        .into_iter()
        .map(|(slot, set)| (slot, set.into_iter().collect()))
        .collect()
}
