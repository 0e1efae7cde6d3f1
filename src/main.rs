//! Sector Runner headless driver
//!
//! Runs one session at a fixed 60 Hz clock, optionally steering with a simple
//! autopilot, then submits the run to the local leaderboard.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};

use sector_runner::leaderboard::JsonFileScoreService;
use sector_runner::sim::{Command, GameEvent, GameState, RunMode, TickInput};
use sector_runner::{ScoreClient, Session, Settings};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Command-line arguments for the headless run
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Settings file (JSON); defaults are used when omitted
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Seed for the run's random source (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,
    /// Frames to simulate before giving up
    #[arg(
        long,
        default_value_t = 36_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    frames: u64,
    /// Name recorded on the leaderboard
    #[arg(long)]
    name: Option<String>,
    /// Steer toward the nearest threat instead of standing still
    #[arg(long)]
    autopilot: bool,
    /// Upgrade picked at each choice gate
    #[arg(long, value_enum, default_value_t = Preference::Alternate)]
    prefer: Preference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preference {
    Weapon,
    Squad,
    Alternate,
}

impl Preference {
    fn command(self, sector: u32) -> Command {
        match self {
            Preference::Weapon => Command::ChooseWeapon,
            Preference::Squad => Command::ChooseSquad,
            Preference::Alternate if sector % 2 == 1 => Command::ChooseWeapon,
            Preference::Alternate => Command::ChooseSquad,
        }
    }
}

/// Line up under the lowest enemy still above the squad
fn autopilot(state: &GameState) -> TickInput {
    let px = state.player.pos.x;
    let target = state
        .entities
        .enemies
        .iter()
        .filter(|e| e.pos.y < state.player.pos.y)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|e| e.pos.x);

    match target {
        Some(x) if x < px - 4.0 => TickInput {
            move_left: true,
            ..Default::default()
        },
        Some(x) if x > px + 4.0 => TickInput {
            move_right: true,
            ..Default::default()
        },
        _ => TickInput::default(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::default(),
    };
    if let Some(name) = args.name {
        settings.player_name = name;
    }

    let seed = args.seed.or(settings.seed).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Sector Runner (headless) starting, seed {}", seed);

    let service = JsonFileScoreService::open(&settings.leaderboard_path)?;
    let client = ScoreClient::spawn(service, settings.service_timeout())?;
    let state = GameState::new(seed, settings.sim_config()?);
    let mut session = Session::new(state, client, settings.player_name.clone());

    session.frame(&TickInput::with_command(Command::Start), 0.0);

    for frame in 1..args.frames {
        let now = frame as f64 * FRAME_MS;
        let state = session.state();
        let mut input = if args.autopilot {
            autopilot(state)
        } else {
            TickInput::default()
        };
        if state.mode() == RunMode::ChoicePending {
            input.command = Some(args.prefer.command(state.run.sector));
        }

        let events = session.frame(&input, now);
        for event in &events {
            if let GameEvent::UpgradeApplied { choice, sector } = event {
                log::info!("Sector {:02}: took {:?}", sector, choice);
            }
        }

        if session.state().mode() == RunMode::GameOver {
            session.frame(&TickInput::with_command(Command::SubmitScore), now + FRAME_MS);
            break;
        }
    }

    let hud = session.hud();
    match session.state().run.summary {
        Some(summary) => println!("{}", summary),
        None => println!(
            "Still running: SECTOR {} / DIST {} / KILLS {}",
            hud.sector_label(),
            hud.distance_label(),
            hud.kills_label()
        ),
    }

    session.settle_scores(settings.service_timeout() + Duration::from_millis(100));
    println!("--- Leaderboard ---");
    for line in session.leaderboard().lines() {
        println!("{}", line);
    }

    Ok(())
}
