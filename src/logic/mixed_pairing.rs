//! Mixed doubles pairing: rebuilds a schedule so every team is one group-A and one group-B slot.
//!
//! The skeleton (a canonical schedule) supplies the round and game structure;
//! its teams are discarded. Teams are chosen greedily, round by round and game
//! by game, in this order:
//!
//! 1. diversity: fewest prior uses of the partnership,
//! 2. balance: fewest games so far for the two slots combined,
//! 3. `(a + b + round_index) % 2`, so equal scores do not always favour low slots,
//! 4. slot order (group A ascending, then group B ascending).
//!
//! Greedy selection is not guaranteed to be repeat-free. With this order it is
//! for 8, 16 and 24 players, and leaves exactly 4 repeated partnerships for
//! 12, 20 and 28. The exhaustive solver is the authority when a perfect
//! mixed schedule is required.

use crate::logic::assignment::check_player_count;
use crate::logic::validation::validate_schedule;
use crate::models::{
    ArgumentError, Game, GameId, Partnership, Round, Schedule, Slot, TeamSlots, TournamentMode,
    ValidationReport,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why a pairing step could not make a clean choice.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradationKind {
    /// Every available pair had been used before; the least-used one was taken.
    RepeatedPartnership,
    /// No group-A/group-B pair was left unplaced in the round; round exclusion was ignored.
    RoundExhausted,
}

/// One step where the engine had to accept a substitute pair.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PairingDegraded {
    pub round: u32,
    pub game_id: GameId,
    pub team: Partnership,
    /// Uses of `team` before this game.
    pub prior_uses: u32,
    pub kind: DegradationKind,
}

/// Result of mixed pairing. Violations are reported, not raised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixedPairing {
    pub schedule: Schedule,
    pub pair_usage: BTreeMap<Partnership, u32>,
    pub degradations: Vec<PairingDegraded>,
    pub report: ValidationReport,
}

impl MixedPairing {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty() || !self.report.is_valid()
    }

    /// Extra uses beyond the first, summed over all partnerships.
    pub fn repeated_pairs(&self) -> u32 {
        self.pair_usage.values().map(|&n| n.saturating_sub(1)).sum()
    }
}

struct PairingState {
    group_a: Vec<Slot>,
    group_b: Vec<Slot>,
    load: Vec<u32>,
    pair_usage: BTreeMap<Partnership, u32>,
}

impl PairingState {
    fn new(player_count: usize) -> Self {
        let half = player_count / 2;
        Self {
            group_a: (1..=half).collect(),
            group_b: (half + 1..=player_count).collect(),
            load: vec![0; player_count + 1],
            pair_usage: BTreeMap::new(),
        }
    }

    fn usage(&self, a: Slot, b: Slot) -> u32 {
        self.pair_usage.get(&Partnership::new(a, b)).copied().unwrap_or(0)
    }

    /// Lowest `(diversity, balance, tie-break, a, b)` among pairs whose slots are both allowed.
    fn best_pair<F>(&self, round_index: usize, allowed: F) -> Option<TeamSlots>
    where
        F: Fn(Slot) -> bool,
    {
        let allowed = &allowed;
        self.group_a
            .iter()
            .filter(|&&a| allowed(a))
            .flat_map(|&a| {
                self.group_b
                    .iter()
                    .filter(move |&&b| allowed(b))
                    .map(move |&b| (a, b))
            })
            .min_by_key(|&(a, b)| {
                let diversity = self.usage(a, b);
                let balance = self.load[a] + self.load[b];
                let tie_break = (a + b + round_index) % 2;
                (diversity, balance, tie_break, a, b)
            })
    }

    fn commit(&mut self, (a, b): TeamSlots) {
        *self.pair_usage.entry(Partnership::new(a, b)).or_insert(0) += 1;
        self.load[a] += 1;
        self.load[b] += 1;
    }
}

/// Derive a mixed schedule from `skeleton`, keeping its round/game structure and game ids.
pub fn generate_mixed_schedule(skeleton: &Schedule) -> Result<MixedPairing, ArgumentError> {
    let player_count = skeleton.player_count;
    check_player_count(player_count, TournamentMode::Mixed)?;

    let mut state = PairingState::new(player_count);
    let mut degradations = Vec::new();
    let mut rounds = Vec::with_capacity(skeleton.rounds.len());

    for (round_index, round) in skeleton.rounds.iter().enumerate() {
        let mut placed = vec![false; player_count + 1];
        let mut games = Vec::with_capacity(round.games.len());

        for template in &round.games {
            let mut in_game = vec![false; player_count + 1];
            let mut teams = [(0, 0); 2];
            for team in teams.iter_mut() {
                let (pair, kind) = match state.best_pair(round_index, |s| !placed[s]) {
                    Some(pair) => (pair, None),
                    None => {
                        let pair = state
                            .best_pair(round_index, |s| !in_game[s])
                            .ok_or(ArgumentError::MalformedSkeleton {
                                player_count,
                                round: round.number,
                                game_id: template.id,
                            })?;
                        (pair, Some(DegradationKind::RoundExhausted))
                    }
                };
                let prior_uses = state.usage(pair.0, pair.1);
                let kind = kind.or((prior_uses > 0).then_some(DegradationKind::RepeatedPartnership));
                if let Some(kind) = kind {
                    log::warn!(
                        "Mixed pairing degraded in round {}, game {}: [{}, {}] ({:?}, used {} time(s) before)",
                        round.number,
                        template.id,
                        pair.0,
                        pair.1,
                        kind,
                        prior_uses
                    );
                    degradations.push(PairingDegraded {
                        round: round.number,
                        game_id: template.id,
                        team: Partnership::new(pair.0, pair.1),
                        prior_uses,
                        kind,
                    });
                } else {
                    log::debug!("Round {}, game {}: pair [{}, {}]", round.number, template.id, pair.0, pair.1);
                }

                state.commit(pair);
                for slot in [pair.0, pair.1] {
                    placed[slot] = true;
                    in_game[slot] = true;
                }
                *team = pair;
            }
            games.push(Game::new(template.id, round.number, teams[0], teams[1]));
        }

        rounds.push(Round {
            number: round.number,
            games,
        });
    }

    let schedule = Schedule {
        player_count,
        rounds,
    };
    let report = validate_schedule(&schedule, player_count, TournamentMode::Mixed);
    if !report.is_valid() {
        log::warn!(
            "Mixed schedule for {} players has {} violation(s)",
            player_count,
            report.violation_count()
        );
    }

    Ok(MixedPairing {
        schedule,
        pair_usage: state.pair_usage,
        degradations,
        report,
    })
}
