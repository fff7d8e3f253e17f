//! loan_app — command-line front end for the bps process simulator.
//!
//! `loan_app demo` builds a small synthetic loan application process, saves
//! it, applies a what-if patch, and simulates the patched configuration.
//! The other subcommands work on saved configurations (JSON or binary):
//!
//! ```text
//! loan_app init   config.json
//! loan_app patch  config.json what_if.json --output patched.bpsc
//! loan_app run    patched.bpsc --repetitions 5 --out output/what_if
//! loan_app inspect patched.bpsc
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` for per-repetition
//! detail.

mod process;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bps_calendar::Interval;
use bps_core::Weekday;
use bps_model::Configuration;
use bps_mutate::{Edit, Patch, PopulationChange, apply_patch};
use bps_output::{EventLogObserver, format_timestamp};
use bps_sim::SimBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_CASES:       u32 = 200;
const DEFAULT_REPETITIONS: u32 = 3;
const DEFAULT_SEED:        u64 = 42;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "loan_app", version, about = "Business process simulation demo")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

/// Overrides for the run plan stored in the configuration.
#[derive(Args, Clone, Debug)]
struct RunArgs {
    /// Base seed; repetition `i` uses stream `i` of it.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Cases per repetition.
    #[arg(long, global = true)]
    cases: Option<u32>,

    #[arg(long, global = true)]
    repetitions: Option<u32>,

    /// Directory for `simulated_log_<i>.csv` files and demo artifacts.
    #[arg(long, global = true, default_value = "output/loan_app")]
    out: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Build, save, patch, and simulate the synthetic loan process (default).
    Demo,
    /// Write the synthetic loan configuration to a file.
    Init { path: PathBuf },
    /// Apply a patch document to a saved configuration.
    Patch {
        config: PathBuf,
        patch:  PathBuf,
        /// Where to save the result; defaults to overwriting `config`.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Simulate a saved configuration.
    Run { config: PathBuf },
    /// Print a summary of a saved configuration.
    Inspect { config: PathBuf },
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => demo(&cli.run),
        Command::Init { path } => {
            let config = synthetic(&cli.run)?;
            save(&config, &path)
        }
        Command::Patch { config, patch, output } => {
            let mut cfg = load(&config)?;
            let patch = Patch::from_file(&patch)
                .with_context(|| format!("reading patch {}", patch.display()))?;
            let applied = apply_patch(&mut cfg, &patch).context("applying patch")?;
            cfg.validate().context("patched configuration is invalid")?;
            let target = output.unwrap_or(config);
            save(&cfg, &target)?;
            println!("Applied {applied} edits → {}", target.display());
            Ok(())
        }
        Command::Run { config } => {
            let cfg = load(&config)?;
            simulate(&cfg, &cli.run)
        }
        Command::Inspect { config } => {
            let cfg = load(&config)?;
            inspect(&cfg);
            Ok(())
        }
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn synthetic(args: &RunArgs) -> Result<Configuration> {
    process::build(
        args.cases.unwrap_or(DEFAULT_CASES),
        args.repetitions.unwrap_or(DEFAULT_REPETITIONS),
        args.seed.unwrap_or(DEFAULT_SEED),
    )
    .context("building the synthetic loan process")
}

/// Second approver, Dev leaves at noon on Wednesdays, rejections get faster.
fn what_if() -> Result<Patch> {
    Ok(Patch::new(vec![
        Edit::UpdateAgentPopulation {
            changes: vec![PopulationChange { agent: process::FAY, count: 2 }],
        },
        Edit::SetAgentSchedule {
            agent:     process::DEV,
            weekday:   Weekday::Wed,
            intervals: vec![Interval::parse("09:00", "12:00")?],
        },
        Edit::OverrideActivityDuration { activity: process::REJECT.into(), seconds: 300.0 },
    ]))
}

fn demo(args: &RunArgs) -> Result<()> {
    println!("=== loan_app — business process simulation ===");
    println!();

    let mut config = synthetic(args)?;
    println!(
        "Process: {} activities, {} agents, {} cases × {} repetitions",
        config.activities.len() - 1,
        config.agents.len(),
        config.settings.case_count,
        config.settings.repetitions,
    );

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    save(&config, &args.out.join("loan_config.json"))?;

    let patch = what_if()?;
    fs::write(args.out.join("what_if.json"), patch.to_json()?)
        .context("writing what_if.json")?;
    let applied = apply_patch(&mut config, &patch).context("applying what-if patch")?;
    save(&config, &args.out.join("loan_config_what_if.bpsc"))?;
    println!("What-if patch: {applied} edits, now {} agents", config.agents.len());
    println!();

    simulate(&config, args)
}

fn simulate(config: &Configuration, args: &RunArgs) -> Result<()> {
    let mut builder = SimBuilder::new(config);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if let Some(cases) = args.cases {
        builder = builder.case_count(cases);
    }
    if let Some(reps) = args.repetitions {
        builder = builder.repetitions(reps);
    }
    let sim = builder.build().context("configuration rejected")?;
    let out = args.out.as_path();

    let t0 = Instant::now();
    let runs = sim.run_with(|rep| EventLogObserver::csv(out, rep));
    let elapsed = t0.elapsed();

    println!("Simulation complete in {:.3} s → {}", elapsed.as_secs_f64(), out.display());
    println!();
    println!("{:<6} {:>6} {:>8} {:>8}  {:<24}", "Rep", "Cases", "Failed", "Rows", "Last event");
    println!("{}", "-".repeat(58));
    for (output, mut obs) in runs {
        if let Some(e) = obs.take_error() {
            return Err(e).with_context(|| format!("writing event log {}", output.repetition));
        }
        let last = output
            .log
            .iter()
            .map(|ev| ev.end)
            .max()
            .map(|t| format_timestamp(&t))
            .unwrap_or_default();
        println!(
            "{:<6} {:>6} {:>8} {:>8}  {:<24}",
            output.repetition,
            output.cases.len(),
            output.failed_cases(),
            obs.rows_written(),
            last,
        );
    }

    if let Some(usage) = memory_stats::memory_stats() {
        info!(physical_mb = usage.physical_mem / (1 << 20), "memory after run");
    }
    Ok(())
}

fn inspect(config: &Configuration) {
    println!("Activities ({})", config.activities.len());
    for (id, name) in config.activities.iter() {
        println!("  {:>3}  {name}", id.0);
    }
    println!();

    println!("Agents ({})", config.agents.len());
    for agent in config.agents.iter() {
        let state = if config.is_active(agent.id) { "" } else { "  [inactive]" };
        let origin = agent.origin.map(|o| format!("  (copy of {})", o.0)).unwrap_or_default();
        println!(
            "  {:>3}  {:<24} {:<10}{origin}{state}",
            agent.id.0,
            agent.name,
            agent.role.as_deref().unwrap_or("-"),
        );
        for line in agent.calendar.summary().lines() {
            println!("         {line}");
        }
    }
    println!();

    let table = config.routing_table();
    println!("Routing: {:?}, {} transition rows", config.routing, table.len());
    let model = config.arrivals.model;
    println!(
        "Arrivals: {} from {} ({:?}, mean {:.0} s, std {:.0} s)",
        config.arrivals.len(),
        config.start_time().map(|t| format_timestamp(&t)).unwrap_or_else(|| "-".into()),
        model.kind,
        model.mean_secs,
        model.std_secs,
    );
    let s = &config.settings;
    println!(
        "Settings: {} cases × {} repetitions, seed {}, max {} steps per case",
        s.case_count, s.repetitions, s.seed, s.max_steps_per_case
    );
    let overrides = config.overrides.activity.len() + config.overrides.agent_activity.len();
    if overrides > 0 {
        println!("Duration overrides: {overrides}");
    }
    for (activity, delay) in &config.delays {
        println!(
            "Delay before {}: {:?}, mean {:.0} s",
            config.activities.label(*activity),
            delay.kind,
            delay.mean,
        );
    }
    if let Err(e) = config.validate() {
        warn!("configuration does not validate: {e}");
    }
}

// ── Files ─────────────────────────────────────────────────────────────────────

fn load(path: &Path) -> Result<Configuration> {
    let config = Configuration::load_file(path)
        .with_context(|| format!("loading configuration {}", path.display()))?;
    info!(path = %path.display(), agents = config.agents.len(), "configuration loaded");
    Ok(config)
}

fn save(config: &Configuration, path: &Path) -> Result<()> {
    config
        .save_file(path)
        .with_context(|| format!("saving configuration {}", path.display()))?;
    info!(path = %path.display(), "configuration saved");
    Ok(())
}
