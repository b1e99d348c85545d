//! Tilecycle - Idle-triggered highlight cycler
//!
//! CLI entry point: simulate, watch live, diagnose traces, write config.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use tilecycle::cli::display::{render_diagnostic_report, render_event, render_run_summary};
use tilecycle::cli::init::write_default_config;
use tilecycle::cycler::config::CyclerConfig;
use tilecycle::cycler::machine::{IdleCycler, InputEvent};
use tilecycle::doctor::diagnose;
use tilecycle::log::{init_tracing, TraceLogger};
use tilecycle::schedule::{run_loop, TokioScheduler};
use tilecycle::simulation::{Simulation, TimedEvent};
use tilecycle::surface::{RecordingSurface, TerminalSurface};

/// Idle-triggered highlight cycler for card grids
///
/// After a period without input, cards are spotlighted one at a time
/// until input returns.
#[derive(Parser, Debug)]
#[command(name = "tilecycle", version, about)]
struct Cli {
    /// Path to the tilecycle.toml configuration file
    #[arg(long, global = true, default_value = "tilecycle.toml")]
    config: PathBuf,

    /// Directory for trace files (.tilecycle by default)
    #[arg(long, global = true, default_value = ".tilecycle")]
    trace_dir: PathBuf,

    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay scripted input against a simulated clock
    Simulate {
        /// Number of cards on the page
        #[arg(long, default_value_t = 7)]
        cards: usize,

        /// Simulated time to stop at, in milliseconds
        #[arg(long, default_value_t = 120_000)]
        until_ms: u64,

        /// Input event as MS:KIND, e.g. 90000:click (repeatable)
        #[arg(long = "input", value_parser = parse_scripted_input)]
        inputs: Vec<ScriptedInput>,

        /// Do not append the run to the trace file
        #[arg(long)]
        no_trace: bool,
    },
    /// Run live: each stdin line is user activity, EOF quits
    Watch {
        /// Number of cards on the page
        #[arg(long, default_value_t = 7)]
        cards: usize,
    },
    /// Audit the trace and lint the config
    Doctor,
    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// An input scheduled at a simulated time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScriptedInput {
    at_ms: u64,
    event: InputEvent,
}

/// Parse `MS:KIND`, e.g. `90000:click`.
fn parse_scripted_input(s: &str) -> Result<ScriptedInput, String> {
    let (at, kind) = s
        .split_once(':')
        .ok_or_else(|| format!("expected MS:KIND, got '{s}'"))?;
    let at_ms = at
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid time '{at}': {e}"))?;
    let event = kind.parse::<InputEvent>().map_err(|e| e.to_string())?;
    Ok(ScriptedInput { at_ms, event })
}

/// Replay `inputs` in time order and collect every transition.
fn run_simulation(
    config: CyclerConfig,
    cards: usize,
    mut inputs: Vec<ScriptedInput>,
    until_ms: u64,
) -> Vec<TimedEvent> {
    inputs.sort_by_key(|i| i.at_ms);

    let mut sim = Simulation::new(config, RecordingSurface::with_cards(cards));
    let mut events = sim.start();
    for input in inputs.iter().filter(|i| i.at_ms <= until_ms) {
        events.extend(sim.input_at(input.at_ms, input.event));
    }
    events.extend(sim.advance_to(until_ms));
    events.extend(sim.dispose());
    events
}

fn simulate(
    cli: &Cli,
    config: CyclerConfig,
    cards: usize,
    until_ms: u64,
    inputs: &[ScriptedInput],
    no_trace: bool,
) -> Result<()> {
    let events = run_simulation(config, cards, inputs.to_vec(), until_ms);
    for timed in &events {
        eprintln!("{}", render_event(timed.at_ms, &timed.event));
    }
    eprint!("{}", render_run_summary(&events, until_ms));

    if !no_trace {
        let mut logger =
            TraceLogger::new(&cli.trace_dir).context("Failed to initialize trace logger")?;
        logger
            .record_all(&events)
            .context("Failed to write to trace")?;
        eprintln!("Trace written to {}", logger.log_path().display());
    }
    Ok(())
}

async fn watch(cli: &Cli, config: CyclerConfig, cards: usize) -> Result<()> {
    let mut logger =
        TraceLogger::new(&cli.trace_dir).context("Failed to initialize trace logger")?;
    let surface = TerminalSurface::numbered(cards, config.grid.columns);
    let (scheduler, timers) = TokioScheduler::new();
    let mut cycler = IdleCycler::new(config, scheduler, surface);

    let (tx, inputs) = mpsc::channel(64);
    // Plain thread: a blocked stdin read must not hold up runtime shutdown
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            // Anything unrecognised still counts as activity
            let event = line.parse().unwrap_or(InputEvent::MouseMove);
            if tx.blocking_send(event).is_err() {
                break;
            }
        }
    });

    eprintln!(
        "Watching {cards} card(s). Enter a line (click, move, load) for activity, Ctrl-D or Ctrl-C to quit."
    );

    let started = Instant::now();
    let mut write_error = None;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    run_loop(&mut cycler, timers, inputs, shutdown, |event| {
        let at_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        eprintln!("{}", render_event(at_ms, &event));
        if write_error.is_none() {
            if let Err(e) = logger.record(at_ms, event) {
                tracing::warn!("trace write failed: {e:#}");
                write_error = Some(e);
            }
        }
    })
    .await;

    write_error.map_or(Ok(()), |e| Err(e.context("Failed to write to trace")))
}

fn doctor(cli: &Cli, config: &CyclerConfig) -> Result<()> {
    let logger = TraceLogger::new(&cli.trace_dir).context("Failed to initialize trace logger")?;
    let trace = logger.read_all().context("Failed to read trace")?;

    let report = diagnose(config, &trace);
    eprint!("{}", render_diagnostic_report(&report));

    if report.error_count() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<CyclerConfig> {
    CyclerConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from '{}'", cli.config.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Init { force } => {
            write_default_config(&cli.config, *force)?;
            eprintln!("Wrote {}", cli.config.display());
            Ok(())
        }
        Command::Simulate {
            cards,
            until_ms,
            inputs,
            no_trace,
        } => simulate(&cli, load_config(&cli)?, *cards, *until_ms, inputs, *no_trace),
        Command::Watch { cards } => watch(&cli, load_config(&cli)?, *cards).await,
        Command::Doctor => doctor(&cli, &load_config(&cli)?),
    }
}
