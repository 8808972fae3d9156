//! Exhaustive backtracking search for perfect schedules.
//!
//! Design-time tool, not for the request path. It proves a schedule exists
//! for a player count (optionally with the mixed-doubles group rule) and
//! returns it, so it can be added to the repository.
//!
//! The search walks game positions `(round, game)` in order. At each position
//! it tries every game made of two unused partnerships over slots not yet
//! placed in the round, commits it, and recurses; dead ends are undone
//! explicitly on the search context. Each game must contain the lowest slot
//! still free in its round: games within a round are interchangeable, so this
//! prunes mirrored branches without losing solutions.
//!
//! The search is bounded by an optional step budget, an optional wall-clock
//! limit, and a cancellation token; running out is reported as
//! [`SearchExhausted`], never as a hang or a panic.

use crate::logic::assignment::check_player_count;
use crate::logic::validation::validate_schedule;
use crate::models::{
    ArgumentError, Group, Schedule, Slot, TableRow, TournamentMode, GAMES_PER_PLAYER, ROUNDS,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default step budget: far above what the supported player counts need.
pub const DEFAULT_MAX_STEPS: u64 = 5_000_000;

/// Deadline and cancellation are polled every this many steps.
const CHECK_INTERVAL: u64 = 256;

const PROGRESS_INTERVAL: u64 = 100_000;

/// Why the search returned without a schedule.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustReason {
    /// The whole search space was explored: no schedule exists under these constraints.
    NoSolution,
    StepBudget,
    TimeLimit,
    Cancelled,
}

/// No schedule found. Expected outcome of a design-time search, not a crash.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SearchExhausted {
    pub reason: ExhaustReason,
    /// Commits performed before giving up.
    pub steps: u64,
}

impl std::fmt::Display for SearchExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            ExhaustReason::NoSolution => write!(f, "No schedule exists (searched {} steps)", self.steps),
            ExhaustReason::StepBudget => write!(f, "Step budget exhausted after {} steps", self.steps),
            ExhaustReason::TimeLimit => write!(f, "Time limit reached after {} steps", self.steps),
            ExhaustReason::Cancelled => write!(f, "Search cancelled after {} steps", self.steps),
        }
    }
}

impl std::error::Error for SearchExhausted {}

/// Search parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    pub player_count: usize,
    pub mode: TournamentMode,
    /// `None` = unbounded. Per worker when `threads > 1`.
    pub max_steps: Option<u64>,
    pub time_limit: Option<Duration>,
    /// Worker threads; top-level branches are split between them.
    pub threads: usize,
}

impl SolverConfig {
    pub fn new(player_count: usize, mode: TournamentMode) -> Self {
        Self {
            player_count,
            mode,
            max_steps: Some(DEFAULT_MAX_STEPS),
            time_limit: None,
            threads: 1,
        }
    }

    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }
}

/// Shared flag to stop a running search from another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A schedule found by the search, with its cost.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub schedule: Schedule,
    pub steps: u64,
    pub elapsed: Duration,
}

/// Backtracking state: slot loads, used partnerships, committed games.
///
/// A slot is free in the current round when its load equals the round index,
/// because every earlier round placed every slot exactly once. Undo only has
/// to pop the last game and roll back its loads and partnerships.
#[derive(Clone, Debug)]
struct SearchContext {
    player_count: usize,
    mixed: bool,
    games_per_round: usize,
    load: Vec<usize>,
    used: Vec<bool>,
    games: Vec<TableRow>,
}

impl SearchContext {
    fn new(player_count: usize, mode: TournamentMode) -> Self {
        Self {
            player_count,
            mixed: mode.is_mixed(),
            games_per_round: Schedule::games_per_round(player_count),
            load: vec![0; player_count + 1],
            used: vec![false; (player_count + 1) * (player_count + 1)],
            games: Vec::with_capacity(ROUNDS * Schedule::games_per_round(player_count)),
        }
    }

    fn round(&self) -> usize {
        self.games.len() / self.games_per_round
    }

    fn is_complete(&self) -> bool {
        self.games.len() == ROUNDS * self.games_per_round
    }

    fn pair_index(&self, a: Slot, b: Slot) -> usize {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        lo * (self.player_count + 1) + hi
    }

    /// Not yet placed in the current round and below the per-player game target.
    fn is_free(&self, slot: Slot) -> bool {
        self.load[slot] == self.round() && self.load[slot] < GAMES_PER_PLAYER
    }

    fn can_partner(&self, a: Slot, b: Slot) -> bool {
        if a == b || self.used[self.pair_index(a, b)] {
            return false;
        }
        !self.mixed || Group::of(a, self.player_count) != Group::of(b, self.player_count)
    }

    /// Games legal at the current position, anchored on the lowest free slot.
    fn candidates(&self) -> Vec<TableRow> {
        let free: Vec<Slot> = (1..=self.player_count).filter(|&s| self.is_free(s)).collect();
        let Some((&anchor, rest)) = free.split_first() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for &partner in rest {
            if !self.can_partner(anchor, partner) {
                continue;
            }
            let others: Vec<Slot> = rest.iter().copied().filter(|&s| s != partner).collect();
            for (i, &c) in others.iter().enumerate() {
                for &d in &others[i + 1..] {
                    if self.can_partner(c, d) {
                        out.push([anchor, partner, c, d]);
                    }
                }
            }
        }
        out
    }

    fn commit(&mut self, game: TableRow) {
        for slot in game {
            self.load[slot] += 1;
        }
        let first = self.pair_index(game[0], game[1]);
        let second = self.pair_index(game[2], game[3]);
        self.used[first] = true;
        self.used[second] = true;
        self.games.push(game);
    }

    fn undo(&mut self) -> Option<TableRow> {
        let game = self.games.pop()?;
        for slot in game {
            self.load[slot] -= 1;
        }
        let first = self.pair_index(game[0], game[1]);
        let second = self.pair_index(game[2], game[3]);
        self.used[first] = false;
        self.used[second] = false;
        Some(game)
    }

    fn to_schedule(&self) -> Schedule {
        let rounds: Vec<&[TableRow]> = self.games.chunks(self.games_per_round.max(1)).collect();
        Schedule::from_table(self.player_count, &rounds)
    }
}

/// Step counter plus the stop conditions it polls.
struct Budget<'a> {
    max_steps: Option<u64>,
    deadline: Option<Instant>,
    cancel: &'a CancelToken,
    /// Set by a sibling worker that already found a schedule.
    sibling_done: Option<&'a AtomicBool>,
    steps: u64,
}

impl<'a> Budget<'a> {
    fn tick(&mut self) -> Option<ExhaustReason> {
        self.steps += 1;
        if self.max_steps.is_some_and(|max| self.steps > max) {
            return Some(ExhaustReason::StepBudget);
        }
        if self.steps % PROGRESS_INTERVAL == 0 {
            log::debug!("Solver progress: {} steps", self.steps);
        }
        if self.steps % CHECK_INTERVAL == 0 {
            if self.cancel.is_cancelled() || self.sibling_done.is_some_and(|f| f.load(Ordering::Relaxed)) {
                return Some(ExhaustReason::Cancelled);
            }
            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                return Some(ExhaustReason::TimeLimit);
            }
        }
        None
    }
}

enum Flow {
    Found,
    DeadEnd,
    Stop(ExhaustReason),
}

fn search(ctx: &mut SearchContext, mode: TournamentMode, budget: &mut Budget<'_>) -> Flow {
    if ctx.is_complete() {
        let schedule = ctx.to_schedule();
        return if validate_schedule(&schedule, ctx.player_count, mode).is_valid() {
            Flow::Found
        } else {
            Flow::DeadEnd
        };
    }

    for game in ctx.candidates() {
        if let Some(reason) = budget.tick() {
            return Flow::Stop(reason);
        }
        ctx.commit(game);
        match search(ctx, mode, budget) {
            Flow::DeadEnd => {
                ctx.undo();
            }
            other => return other,
        }
    }
    Flow::DeadEnd
}

/// Exhaustive schedule search with budgets and cancellation.
#[derive(Debug)]
pub struct ScheduleSolver {
    config: SolverConfig,
    cancel: CancelToken,
}

impl ScheduleSolver {
    /// Rejects player counts no schedule can have before any search starts.
    pub fn new(config: SolverConfig) -> Result<Self, ArgumentError> {
        check_player_count(config.player_count, config.mode)?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Token that stops this solver's searches when cancelled.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn solve(&self) -> Result<Solution, SearchExhausted> {
        if self.cancel.is_cancelled() {
            return Err(SearchExhausted {
                reason: ExhaustReason::Cancelled,
                steps: 0,
            });
        }
        let started = Instant::now();
        log::info!(
            "Searching {} schedule for {} players ({} thread(s))",
            if self.config.mode.is_mixed() { "mixed" } else { "normal" },
            self.config.player_count,
            self.config.threads
        );
        let result = if self.config.threads > 1 {
            self.solve_parallel(started)
        } else {
            self.solve_sequential(started)
        };
        match &result {
            Ok(solution) => log::info!(
                "Found schedule for {} players in {} steps ({:?})",
                self.config.player_count,
                solution.steps,
                solution.elapsed
            ),
            Err(e) => log::warn!("Search for {} players stopped: {}", self.config.player_count, e),
        }
        result
    }

    fn deadline(&self, started: Instant) -> Option<Instant> {
        self.config.time_limit.map(|limit| started + limit)
    }

    fn solve_sequential(&self, started: Instant) -> Result<Solution, SearchExhausted> {
        let mut ctx = SearchContext::new(self.config.player_count, self.config.mode);
        let mut budget = Budget {
            max_steps: self.config.max_steps,
            deadline: self.deadline(started),
            cancel: &self.cancel,
            sibling_done: None,
            steps: 0,
        };
        match search(&mut ctx, self.config.mode, &mut budget) {
            Flow::Found => Ok(Solution {
                schedule: ctx.to_schedule(),
                steps: budget.steps,
                elapsed: started.elapsed(),
            }),
            Flow::DeadEnd => Err(SearchExhausted {
                reason: ExhaustReason::NoSolution,
                steps: budget.steps,
            }),
            Flow::Stop(reason) => Err(SearchExhausted {
                reason,
                steps: budget.steps,
            }),
        }
    }

    /// Split the first game's candidates across workers. Each worker owns its
    /// search context; the only shared state is the "found" flag.
    fn solve_parallel(&self, started: Instant) -> Result<Solution, SearchExhausted> {
        let SolverConfig {
            player_count,
            mode,
            threads,
            max_steps,
            ..
        } = self.config;
        let branches = SearchContext::new(player_count, mode).candidates();
        let found = AtomicBool::new(false);
        let deadline = self.deadline(started);

        let outcomes: Vec<BranchOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|worker| {
                    let branches = &branches;
                    let found = &found;
                    let cancel = &self.cancel;
                    scope.spawn(move || {
                        let mut budget = Budget {
                            max_steps,
                            deadline,
                            cancel,
                            sibling_done: Some(found),
                            steps: 0,
                        };
                        let mut out = Vec::new();
                        for (index, &branch) in branches.iter().enumerate().skip(worker).step_by(threads) {
                            if found.load(Ordering::Relaxed) {
                                break;
                            }
                            let mut ctx = SearchContext::new(player_count, mode);
                            ctx.commit(branch);
                            let before = budget.steps;
                            let flow = search(&mut ctx, mode, &mut budget);
                            let steps = budget.steps - before;
                            match flow {
                                Flow::Found => {
                                    found.store(true, Ordering::Relaxed);
                                    out.push(BranchOutcome::found(index, ctx.to_schedule(), steps));
                                    break;
                                }
                                Flow::DeadEnd => out.push(BranchOutcome::failed(index, ExhaustReason::NoSolution, steps)),
                                Flow::Stop(reason) => {
                                    out.push(BranchOutcome::failed(index, reason, steps));
                                    break;
                                }
                            }
                        }
                        out
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_default())
                .collect()
        });

        let steps: u64 = outcomes.iter().map(|o| o.steps).sum();
        if let Some(schedule) = outcomes
            .iter()
            .filter(|o| o.schedule.is_some())
            .min_by_key(|o| o.index)
            .and_then(|o| o.schedule.clone())
        {
            return Ok(Solution {
                schedule,
                steps,
                elapsed: started.elapsed(),
            });
        }

        let all_explored = outcomes.len() == branches.len()
            && outcomes.iter().all(|o| o.reason == Some(ExhaustReason::NoSolution));
        let reason = if all_explored {
            ExhaustReason::NoSolution
        } else if self.cancel.is_cancelled() {
            ExhaustReason::Cancelled
        } else {
            outcomes
                .iter()
                .filter_map(|o| o.reason)
                .find(|&r| r != ExhaustReason::NoSolution)
                .unwrap_or(ExhaustReason::Cancelled)
        };
        Err(SearchExhausted { reason, steps })
    }
}

struct BranchOutcome {
    index: usize,
    schedule: Option<Schedule>,
    reason: Option<ExhaustReason>,
    steps: u64,
}

impl BranchOutcome {
    fn found(index: usize, schedule: Schedule, steps: u64) -> Self {
        Self {
            index,
            schedule: Some(schedule),
            reason: None,
            steps,
        }
    }

    fn failed(index: usize, reason: ExhaustReason, steps: u64) -> Self {
        Self {
            index,
            schedule: None,
            reason: Some(reason),
            steps,
        }
    }
}

/// Search with default budgets. `None` when no schedule was found.
pub fn solve_schedule(player_count: usize, mode: TournamentMode) -> Option<Schedule> {
    ScheduleSolver::new(SolverConfig::new(player_count, mode))
        .ok()?
        .solve()
        .ok()
        .map(|s| s.schedule)
}
