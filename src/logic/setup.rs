//! Tournament creation: canonical schedule → slot draw → (mixed pairing) → validation.

use crate::logic::assignment::{assign_slots, check_names, check_player_count};
use crate::logic::mixed_pairing::generate_mixed_schedule;
use crate::logic::repository::ScheduleRepository;
use crate::logic::validation::validate_schedule;
use crate::models::{DegradationPolicy, Tournament, TournamentError, TournamentMode, TournamentRequest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Create a tournament. Uses `request.seed` when given, otherwise OS entropy.
pub fn create_tournament(
    repository: &ScheduleRepository,
    request: &TournamentRequest,
) -> Result<Tournament, TournamentError> {
    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    create_tournament_with_rng(repository, request, &mut rng)
}

/// Create a tournament drawing slots with `rng`.
///
/// 1. Validate arguments (count divisible by 4, names match count, no blank names).
/// 2. Look up the canonical schedule; unsupported counts are an error.
/// 3. Assign names to slots (random or linear; per group in mixed mode).
/// 4. Mixed mode: derive the gendered schedule from the canonical one.
/// 5. Validate the final schedule and apply the degradation policy.
pub fn create_tournament_with_rng<R: Rng + ?Sized>(
    repository: &ScheduleRepository,
    request: &TournamentRequest,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    let player_count = request.player_count;
    check_player_count(player_count, request.mode)?;
    check_names(&request.player_names, player_count)?;

    let canonical = repository.get(player_count)?;
    let assignment = assign_slots(
        &request.player_names,
        player_count,
        request.mode,
        request.assignment,
        rng,
    )?;

    let (schedule, report) = match request.mode {
        TournamentMode::Normal => {
            let report = validate_schedule(canonical, player_count, TournamentMode::Normal);
            (canonical.clone(), report)
        }
        TournamentMode::Mixed => {
            let pairing = generate_mixed_schedule(canonical)?;
            if !pairing.degradations.is_empty() {
                log::warn!(
                    "Mixed pairing for {} players degraded at {} step(s)",
                    player_count,
                    pairing.degradations.len()
                );
            }
            (pairing.schedule, pairing.report)
        }
    };

    if !report.is_valid() && request.degradation == DegradationPolicy::Reject {
        return Err(TournamentError::PairingDegraded {
            violations: report.violations,
        });
    }

    let tournament = Tournament::new(request.name.trim(), request.mode, assignment, schedule, report);
    log::info!(
        "Created tournament {} ({} players, {:?}, {} game(s), {} violation(s))",
        tournament.id,
        player_count,
        request.mode,
        tournament.games.len(),
        tournament.report.violation_count()
    );
    Ok(tournament)
}
