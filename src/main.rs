//! Spyfall - unified CLI
//!
//! Plays configured games, offline demos, and lists location packs.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use spyfall::{
    AgentPlayer, EventSink, GameConfig, GameEvent, GameRules, GameSession, HumanPlayer, LlmClient,
    LocationPack, Outcome, PlayerController, Seat, SeatKind, SeatSpec, SimpleAi,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

const DEMO_NAMES: &[&str] = &["Ava", "Ben", "Cleo", "Dev", "Eli", "Fay", "Gus", "Hana"];

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Game log lines go to stdout through the event printer, so the
    // subscriber writes to stderr and mutes the duplicate target.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,spyfall::game=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { config, json } => run_play(config, json).await,
        Command::Demo {
            players,
            rounds,
            seed,
            no_early_vote,
            json,
        } => run_demo(players, rounds, seed, !no_early_vote, json).await,
        Command::Locations { pack } => list_locations(pack),
    }
}

/// Plays a game from a config file.
#[instrument(skip(config), fields(config = %config.display()))]
async fn run_play(config: PathBuf, json: bool) -> Result<()> {
    let config = GameConfig::from_file(&config)?;
    let pack = config.load_pack()?;
    let locations = pack.location_names();
    let base_seed = config.rules().seed().unwrap_or_else(rand::random);
    let (prompt_tx, prompt_rx) = mpsc::unbounded_channel();

    let mut seats = Vec::with_capacity(config.players().len());
    for (index, seat) in config.players().iter().enumerate() {
        let controller: Box<dyn PlayerController> = match seat.kind() {
            SeatKind::Human => Box::new(terminal_human(seat.name(), prompt_tx.clone())),
            SeatKind::Ai => {
                let llm = LlmClient::new(seat.create_llm_config()?);
                Box::new(AgentPlayer::new(
                    seat.name().clone(),
                    Box::new(llm),
                    locations.clone(),
                ))
            }
            SeatKind::Bot => Box::new(
                SimpleAi::new(
                    seat.name().clone(),
                    locations.clone(),
                    base_seed.wrapping_add(index as u64),
                )
                .with_accuse_chance(0.1),
            ),
        };
        let spec = SeatSpec::new(seat.name().clone(), seat.kind() == SeatKind::Human);
        seats.push(Seat::new(spec, controller));
    }
    drop(prompt_tx);

    let (events, rx) = EventSink::channel();
    let session = GameSession::new(seats, &pack, config.rules().clone(), events)?;
    play_session(session, rx, prompt_rx, json).await
}

/// Plays an offline game between random bots.
#[instrument]
async fn run_demo(
    players: usize,
    rounds: u32,
    seed: Option<u64>,
    allow_early_vote: bool,
    json: bool,
) -> Result<()> {
    if players < 2 || players > DEMO_NAMES.len() {
        bail!("Demo supports 2 to {} players", DEMO_NAMES.len());
    }
    let pack = LocationPack::classic();
    let locations = pack.location_names();
    let base_seed = seed.unwrap_or_else(rand::random);
    info!(players, rounds, seed = base_seed, "Starting demo");

    let seats = DEMO_NAMES
        .iter()
        .take(players)
        .enumerate()
        .map(|(index, name)| {
            let bot = SimpleAi::new(*name, locations.clone(), base_seed.wrapping_add(index as u64 + 1))
                .with_guess_chance(0.05)
                .with_accuse_chance(0.1);
            Seat::new(SeatSpec::new(*name, false), Box::new(bot))
        })
        .collect();

    let rules = GameRules::new()
        .with_rounds(rounds)
        .with_allow_early_vote(allow_early_vote)
        .with_seed(base_seed);
    let (events, rx) = EventSink::channel();
    let session = GameSession::new(seats, &pack, rules, events)?;
    let (_, no_prompts) = mpsc::unbounded_channel();
    play_session(session, rx, no_prompts, json).await
}

/// Prints every location and its roles.
#[instrument]
fn list_locations(pack: Option<PathBuf>) -> Result<()> {
    let pack = match pack {
        Some(path) => LocationPack::from_file(&path)
            .with_context(|| format!("Loading {}", path.display()))?,
        None => LocationPack::classic(),
    };
    println!("{} ({} locations)", pack.name(), pack.locations().len());
    for location in pack.locations() {
        println!("  {}: {}", location.name(), location.roles().join(", "));
    }
    Ok(())
}

/// Runs a session while a printer task drains its events and prompts.
async fn play_session(
    session: GameSession,
    rx: mpsc::UnboundedReceiver<GameEvent>,
    prompts: mpsc::UnboundedReceiver<String>,
    json: bool,
) -> Result<()> {
    let printer = tokio::spawn(print_events(rx, prompts, json, write_line));
    let result = session.run().await;
    printer.await.context("Event printer panicked")?;

    let outcome = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&outcome);
    }
    Ok(())
}

/// A line bound for the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Output {
    Stdout(String),
    Stderr(String),
}

fn write_line(output: Output) {
    match output {
        Output::Stdout(line) => println!("{line}"),
        Output::Stderr(line) => eprintln!("{line}"),
    }
}

/// Writes log lines and human prompts through one writer. Events win ties,
/// so a log line emitted before a prompt is always shown before it. With
/// `--json`, stdout is reserved for the outcome and the log goes to stderr.
async fn print_events(
    mut rx: mpsc::UnboundedReceiver<GameEvent>,
    mut prompts: mpsc::UnboundedReceiver<String>,
    json: bool,
    mut write: impl FnMut(Output),
) {
    loop {
        tokio::select! {
            biased;
            event = rx.recv() => match event {
                Some(GameEvent::Log(line)) if json => write(Output::Stderr(line)),
                Some(GameEvent::Log(line)) => write(Output::Stdout(line)),
                Some(GameEvent::Started(info)) => {
                    debug!(location = %info.location, spy = %info.spy_name, "Game started");
                }
                Some(GameEvent::Aborted(reason)) => {
                    write(Output::Stderr(format!("Game aborted: {reason}")));
                }
                Some(GameEvent::Reaction { .. } | GameEvent::Finished(_)) => {}
                Some(GameEvent::Closed) | None => break,
            },
            Some(prompt) = prompts.recv() => write(Output::Stdout(prompt)),
        }
    }
    while let Ok(prompt) = prompts.try_recv() {
        write(Output::Stdout(prompt));
    }
}

fn print_summary(outcome: &Outcome) {
    println!();
    println!("=== {} win: {} ===", outcome.winner(), outcome.reason());
    println!("Spy: {}", outcome.spy_name());
    println!("Location: {}", outcome.location());
    if let Some(guess) = outcome.spy_guess() {
        println!("Spy's guess: {guess}");
    }
    println!(
        "Rounds played: {} ({} questions)",
        outcome.rounds_played(),
        outcome.turns().len()
    );
}

/// A human seat reading stdin. Its prompts go to the event printer.
fn terminal_human(name: &str, prompt_tx: mpsc::UnboundedSender<String>) -> HumanPlayer {
    let (input_tx, input_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if input_tx.send(line).is_err() {
                break;
            }
        }
        debug!("Stdin closed");
    });

    HumanPlayer::new(name, input_rx, prompt_tx)
}
