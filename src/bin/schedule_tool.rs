//! Operational and design-time tool: inspect canonical schedules, run the solver,
//! create tournaments offline and export them as CSV.
//! Run with: cargo run --bin schedule-tool -- <command>

use clap::Parser;
use doubles_tournament_web::{
    create_tournament, generate_mixed_schedule, validate_schedule, AssignmentMode, DegradationPolicy, Schedule,
    ScheduleRepository, ScheduleSolver, SolverConfig, Tournament, TournamentMode, TournamentRequest,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "schedule-tool", version, about = "Doubles tournament schedules: reports, solving, export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List the player counts with a canonical schedule
    Counts,
    /// Print the validation report of a canonical (or mixed) schedule
    Report(ReportArgs),
    /// Search for a perfect schedule with the backtracking solver
    Solve(SolveArgs),
    /// Create a tournament from a CSV list of names
    Create(CreateArgs),
    /// Write a schedule as CSV rows: round,game,team1_a,team1_b,team2_a,team2_b
    Export(ExportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Number of players
    #[arg(long)]
    players: usize,

    /// Report the mixed-doubles derivation instead of the canonical table
    #[arg(long)]
    mixed: bool,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SolveArgs {
    /// Number of players (must be divisible by 4)
    #[arg(long)]
    players: usize,

    /// Require one group-A and one group-B slot per team
    #[arg(long)]
    mixed: bool,

    /// Step budget per worker. 0 = unbounded.
    #[arg(long, default_value_t = doubles_tournament_web::DEFAULT_MAX_STEPS)]
    max_steps: u64,

    /// Wall-clock limit in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Worker threads for the top-level branches
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Output JSON instead of table rows
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct CreateArgs {
    /// CSV file with one player name per record (first column). Mixed mode: group A first, then group B.
    #[arg(long)]
    names: PathBuf,

    /// Skip the first CSV record
    #[arg(long)]
    has_header: bool,

    /// Tournament name
    #[arg(long, default_value = "")]
    name: String,

    /// Number of players; defaults to the number of names read
    #[arg(long)]
    players: Option<usize>,

    /// Mixed doubles
    #[arg(long)]
    mixed: bool,

    /// Assign names in input order instead of shuffling
    #[arg(long)]
    linear: bool,

    /// Seed for the shuffle (reproducible draws)
    #[arg(long)]
    seed: Option<u64>,

    /// Fail instead of accepting a degraded mixed schedule
    #[arg(long)]
    reject_degraded: bool,

    /// Also write the resolved schedule as CSV to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ExportArgs {
    /// Number of players
    #[arg(long)]
    players: usize,

    /// Export the mixed-doubles derivation
    #[arg(long)]
    mixed: bool,

    /// Output file (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn mode_of(mixed: bool) -> TournamentMode {
    if mixed {
        TournamentMode::Mixed
    } else {
        TournamentMode::Normal
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => bail(format!("Failed to serialize output: {e}")),
    }
}

/// Canonical schedule for `players`, or its mixed derivation.
fn load_schedule(repo: &ScheduleRepository, players: usize, mixed: bool) -> Schedule {
    let canonical = repo.get(players).unwrap_or_else(|e| bail(e));
    if !mixed {
        return canonical.clone();
    }
    let pairing = generate_mixed_schedule(canonical).unwrap_or_else(|e| bail(e));
    if pairing.is_degraded() {
        eprintln!(
            "Warning: mixed pairing degraded ({} repeated pair(s))",
            pairing.repeated_pairs()
        );
    }
    pairing.schedule
}

/// Player names from the first column of a CSV file.
fn read_names(path: &Path, has_header: bool) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_path(path)
        .unwrap_or_else(|e| bail(format!("Failed to open {}: {e}", path.display())));
    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.unwrap_or_else(|e| bail(format!("Failed to read {}: {e}", path.display())));
        if let Some(name) = record.get(0).map(str::trim).filter(|n| !n.is_empty()) {
            names.push(name.to_string());
        }
    }
    names
}

fn write_schedule_csv<W: io::Write>(schedule: &Schedule, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["round", "game", "team1_a", "team1_b", "team2_a", "team2_b"])?;
    for game in schedule.games() {
        let mut record = vec![game.round.to_string(), game.id.to_string()];
        record.extend(game.slots().iter().map(|s| s.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_tournament_csv<W: io::Write>(tournament: &Tournament, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["round", "game", "team1_a", "team1_b", "team2_a", "team2_b"])?;
    for game in &tournament.games {
        let mut record = vec![game.round.to_string(), game.id.to_string()];
        record.extend(game.team_1.iter().chain(game.team_2.iter()).map(|p| p.name.clone()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_table(schedule: &Schedule) {
    for round in &schedule.rounds {
        println!("Round {}:", round.number);
        for game in &round.games {
            println!("  Game {}: {}", game.id, game);
        }
    }
}

fn run_counts(repo: &ScheduleRepository) {
    for n in repo.supported_counts() {
        println!("{n}");
    }
}

fn run_report(repo: &ScheduleRepository, args: ReportArgs) {
    let mode = mode_of(args.mixed);
    let schedule = load_schedule(repo, args.players, args.mixed);
    let report = validate_schedule(&schedule, args.players, mode);
    if args.json {
        print_json(&report);
    } else {
        println!("{report}");
    }
    if !report.is_valid() {
        std::process::exit(2);
    }
}

fn run_solve(args: SolveArgs) {
    let max_steps = if args.max_steps == 0 { None } else { Some(args.max_steps) };
    let config = SolverConfig::new(args.players, mode_of(args.mixed))
        .with_max_steps(max_steps)
        .with_time_limit(args.timeout_ms.map(Duration::from_millis))
        .with_threads(args.threads);
    let solver = ScheduleSolver::new(config).unwrap_or_else(|e| bail(e));
    let solution = solver.solve().unwrap_or_else(|e| bail(e));
    if args.json {
        print_json(&solution.schedule);
    } else {
        print_table(&solution.schedule);
        println!(
            "Found in {} steps ({} ms)",
            solution.steps,
            solution.elapsed.as_millis()
        );
    }
}

fn run_create(repo: &ScheduleRepository, args: CreateArgs) {
    let player_names = read_names(&args.names, args.has_header);
    let request = TournamentRequest {
        name: args.name,
        player_count: args.players.unwrap_or(player_names.len()),
        player_names,
        mode: mode_of(args.mixed),
        assignment: if args.linear {
            AssignmentMode::Linear
        } else {
            AssignmentMode::Random
        },
        seed: args.seed,
        degradation: if args.reject_degraded {
            DegradationPolicy::Reject
        } else {
            DegradationPolicy::Accept
        },
    };
    let tournament = create_tournament(repo, &request).unwrap_or_else(|e| bail(e));

    if let Some(ref path) = args.export {
        let file = std::fs::File::create(path)
            .unwrap_or_else(|e| bail(format!("Failed to create {}: {e}", path.display())));
        write_tournament_csv(&tournament, file)
            .unwrap_or_else(|e| bail(format!("Failed to write {}: {e}", path.display())));
    }

    if args.json {
        print_json(&tournament);
        return;
    }
    println!("Tournament {} ({} players)", tournament.id, tournament.player_count);
    for round in 1..=tournament.schedule.rounds.len() as u32 {
        println!("Round {round}:");
        for game in tournament.games_in_round(round) {
            println!(
                "  Game {}: {} & {} vs {} & {}",
                game.id, game.team_1[0].name, game.team_1[1].name, game.team_2[0].name, game.team_2[1].name
            );
        }
    }
    if !tournament.report.is_valid() {
        println!("Warnings:");
        for v in &tournament.report.violations {
            println!("  {v}");
        }
    }
}

fn run_export(repo: &ScheduleRepository, args: ExportArgs) {
    let schedule = load_schedule(repo, args.players, args.mixed);
    let result = match args.output {
        Some(ref path) => {
            let file = std::fs::File::create(path)
                .unwrap_or_else(|e| bail(format!("Failed to create {}: {e}", path.display())));
            write_schedule_csv(&schedule, file)
        }
        None => write_schedule_csv(&schedule, io::stdout().lock()),
    };
    if let Err(e) = result {
        bail(format!("Failed to write CSV: {e}"));
    }
}

fn repository() -> ScheduleRepository {
    ScheduleRepository::canonical().unwrap_or_else(|e| bail(e))
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let cli = Cli::parse();

    match cli.command {
        Commands::Counts => run_counts(&repository()),
        Commands::Report(args) => run_report(&repository(), args),
        Commands::Solve(args) => run_solve(args),
        Commands::Create(args) => run_create(&repository(), args),
        Commands::Export(args) => run_export(&repository(), args),
    }
}
