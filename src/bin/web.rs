//! JSON API for the tournament front end: create tournaments, fetch schedules and reports.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, TOURNAMENT_TTL_HOURS (inactivity before an in-memory tournament is dropped).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use doubles_tournament_web::{
    create_tournament, generate_mixed_schedule, validate_schedule, ScheduleRepository, Slot, Tournament,
    TournamentError, TournamentId, TournamentMode, TournamentRequest,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory tournaments by id. Entries idle longer than the TTL are removed.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Canonical schedules, validated once at startup and shared read-only.
type Repository = Data<ScheduleRepository>;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(30 * 60);

struct ServerConfig {
    host: String,
    port: u16,
    ttl: Duration,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let ttl_hours: u64 = std::env::var("TOURNAMENT_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or_else(default_ttl_hours);
        Self {
            host,
            port,
            ttl: Duration::from_secs(ttl_hours * 3600),
        }
    }
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(serde::Serialize)]
struct PlayerCountsResponse {
    player_counts: Vec<usize>,
}

#[derive(Deserialize)]
struct RenamePlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct ReportQuery {
    #[serde(default)]
    mixed: bool,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and slot (e.g. /api/tournaments/{id}/players/{slot})
#[derive(Deserialize)]
struct TournamentSlotPath {
    id: TournamentId,
    slot: Slot,
}

#[derive(Deserialize)]
struct PlayerCountPath {
    player_count: usize,
}

/// Every error leaves the API as `{"error": "..."}`.
fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = error_body(e);
    match e {
        TournamentError::ScheduleNotFound { .. } | TournamentError::SlotNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        TournamentError::InvalidCanonicalSchedule { .. } => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(error_body("No tournament"))
}

/// A handler panicked while holding the store lock.
fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(error_body("Tournament store unavailable"))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "doubles-tournament-web",
    })
}

/// Player counts the creation form may offer.
#[get("/api/player-counts")]
async fn api_player_counts(repo: Repository) -> HttpResponse {
    HttpResponse::Ok().json(PlayerCountsResponse {
        player_counts: repo.supported_counts(),
    })
}

/// Validation report for a canonical schedule, or for its mixed derivation with `?mixed=true`.
#[get("/api/schedules/{player_count}/report")]
async fn api_schedule_report(repo: Repository, path: Path<PlayerCountPath>, query: Query<ReportQuery>) -> HttpResponse {
    let schedule = match repo.get(path.player_count) {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    if query.mixed {
        match generate_mixed_schedule(schedule) {
            Ok(pairing) => HttpResponse::Ok().json(&pairing.report),
            Err(e) => error_response(&e.into()),
        }
    } else {
        HttpResponse::Ok().json(validate_schedule(schedule, path.player_count, TournamentMode::Normal))
    }
}

/// Create a tournament from a name list (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, repo: Repository, body: Json<TournamentRequest>) -> HttpResponse {
    let tournament = match create_tournament(&repo, &body) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => no_tournament(),
    }
}

/// Rename the player sitting in a slot.
#[put("/api/tournaments/{id}/players/{slot}")]
async fn api_rename_player(
    state: AppState,
    path: Path<TournamentSlotPath>,
    body: Json<RenamePlayerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.rename_player(path.slot, body.name.as_str()) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.remove(&path.id) {
        Some(_) => HttpResponse::NoContent().finish(),
        None => no_tournament(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_ttl_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let repository = ScheduleRepository::canonical()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    log::info!("Supported player counts: {:?}", repository.supported_counts());
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let repository = Data::new(repository);

    // Background task: periodically remove tournaments idle longer than the TTL
    let state_cleanup = state.clone();
    let ttl = config.ttl;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < ttl);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(repository.clone())
            .service(api_health)
            .service(api_player_counts)
            .service(api_schedule_report)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_rename_player)
            .service(api_delete_tournament)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
