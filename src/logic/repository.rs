//! Canonical schedules keyed by player count.
//!
//! Each table gives 4 rounds in which every slot plays once per round and no
//! two slots partner twice. Tables are re-validated when the repository is
//! built; an invalid table is an error, never served.

use crate::logic::validation::validate_schedule;
use crate::models::{Schedule, TableRow, TournamentError, TournamentMode};
use std::collections::BTreeMap;

const TABLE_12: [&[TableRow]; 4] = [
    &[[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12]],
    &[[1, 5, 9, 3], [2, 6, 10, 4], [7, 11, 8, 12]],
    &[[1, 9, 5, 7], [2, 10, 6, 8], [3, 11, 4, 12]],
    &[[1, 11, 7, 4], [2, 12, 8, 3], [5, 10, 6, 9]],
];

const TABLE_16: [&[TableRow]; 4] = [
    &[[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 16]],
    &[[1, 5, 9, 13], [2, 6, 10, 14], [3, 7, 11, 15], [4, 8, 12, 16]],
    &[[1, 9, 5, 13], [2, 10, 6, 14], [3, 11, 7, 15], [4, 12, 8, 16]],
    &[[1, 13, 9, 5], [2, 14, 10, 6], [3, 15, 11, 7], [4, 16, 12, 8]],
];

const TABLE_20: [&[TableRow]; 4] = [
    &[[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 16], [17, 18, 19, 20]],
    &[[1, 5, 9, 13], [2, 6, 10, 14], [3, 7, 11, 15], [4, 8, 12, 16], [17, 19, 18, 20]],
    &[[1, 9, 5, 17], [2, 10, 6, 18], [3, 11, 7, 19], [4, 12, 8, 20], [13, 15, 14, 16]],
    &[[1, 13, 9, 17], [2, 14, 10, 18], [3, 15, 11, 19], [4, 16, 12, 20], [5, 7, 6, 8]],
];

const TABLE_24: [&[TableRow]; 4] = [
    &[
        [1, 2, 3, 4],
        [5, 6, 7, 8],
        [9, 10, 11, 12],
        [13, 14, 15, 16],
        [17, 18, 19, 20],
        [21, 22, 23, 24],
    ],
    &[
        [1, 5, 9, 13],
        [2, 6, 10, 14],
        [3, 7, 11, 15],
        [4, 8, 12, 16],
        [17, 21, 19, 23],
        [18, 22, 20, 24],
    ],
    &[
        [1, 9, 5, 17],
        [2, 10, 6, 18],
        [3, 11, 7, 19],
        [4, 12, 8, 20],
        [13, 21, 15, 23],
        [14, 22, 16, 24],
    ],
    &[
        [1, 13, 9, 21],
        [2, 14, 10, 22],
        [3, 15, 11, 23],
        [4, 16, 12, 24],
        [5, 18, 7, 20],
        [6, 17, 8, 19],
    ],
];

const TABLE_28: [&[TableRow]; 4] = [
    &[
        [1, 2, 3, 4],
        [5, 6, 7, 8],
        [9, 10, 11, 12],
        [13, 14, 15, 16],
        [17, 18, 19, 20],
        [21, 22, 23, 24],
        [25, 26, 27, 28],
    ],
    &[
        [1, 5, 9, 13],
        [2, 6, 10, 14],
        [3, 7, 11, 15],
        [4, 8, 12, 16],
        [17, 21, 19, 23],
        [18, 22, 20, 24],
        [25, 27, 26, 28],
    ],
    &[
        [1, 3, 2, 4],
        [5, 9, 17, 25],
        [6, 10, 18, 26],
        [7, 11, 19, 27],
        [8, 12, 20, 28],
        [13, 21, 15, 23],
        [14, 22, 16, 24],
    ],
    &[
        [1, 9, 5, 17],
        [2, 10, 6, 18],
        [3, 11, 7, 19],
        [4, 12, 8, 20],
        [13, 25, 15, 27],
        [14, 26, 16, 28],
        [21, 23, 22, 24],
    ],
];

/// Read-only registry of validated schedules. Built once, then shared.
#[derive(Clone, Debug)]
pub struct ScheduleRepository {
    schedules: BTreeMap<usize, Schedule>,
}

impl ScheduleRepository {
    /// The built-in tables for 12, 16, 20, 24 and 28 players.
    pub fn canonical() -> Result<Self, TournamentError> {
        Self::from_schedules(vec![
            Schedule::from_table(12, &TABLE_12),
            Schedule::from_table(16, &TABLE_16),
            Schedule::from_table(20, &TABLE_20),
            Schedule::from_table(24, &TABLE_24),
            Schedule::from_table(28, &TABLE_28),
        ])
    }

    /// Build from arbitrary schedules (e.g. solver output). Fails on the first invalid one.
    pub fn from_schedules(schedules: Vec<Schedule>) -> Result<Self, TournamentError> {
        let mut map = BTreeMap::new();
        for schedule in schedules {
            let player_count = schedule.player_count;
            let report = validate_schedule(&schedule, player_count, TournamentMode::Normal);
            if !report.is_valid() {
                log::error!(
                    "Rejecting schedule for {} players: {} violation(s)",
                    player_count,
                    report.violation_count()
                );
                return Err(TournamentError::InvalidCanonicalSchedule {
                    player_count,
                    violations: report.violations,
                });
            }
            if map.insert(player_count, schedule).is_some() {
                log::error!("Rejecting second schedule for {} players", player_count);
                return Err(TournamentError::DuplicateSchedule { player_count });
            }
        }
        log::info!("Loaded {} schedule(s): {:?}", map.len(), map.keys().collect::<Vec<_>>());
        Ok(Self { schedules: map })
    }

    /// Schedule for `player_count`, or `ScheduleNotFound`.
    pub fn get(&self, player_count: usize) -> Result<&Schedule, TournamentError> {
        self.schedules
            .get(&player_count)
            .ok_or(TournamentError::ScheduleNotFound { player_count })
    }

    /// Supported player counts, ascending.
    pub fn supported_counts(&self) -> Vec<usize> {
        self.schedules.keys().copied().collect()
    }

    pub fn supports(&self, player_count: usize) -> bool {
        self.schedules.contains_key(&player_count)
    }
}
