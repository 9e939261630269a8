//! Alsvid command-line interface.
//!
//! The executable boundary of the simulator: read a qobj JSON document,
//! run the batch, emit a result JSON document. Exit status 0 means a
//! result document was produced — member circuits may still have failed
//! individually, which their `success` flags report. Nonzero means total
//! failure (unreadable or unparseable input).

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use alsvid_core::{BatchResult, Executor};
use alsvid_qobj::Qobj;
use alsvid_statevector::StatevectorSimulator;

/// Alsvid - statevector quantum-circuit simulator
#[derive(Parser)]
#[command(name = "alsvid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input qobj JSON file
    input: PathBuf,

    /// Output file for the result JSON (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Statevector mode: force shots=1, reject mid-circuit measurement,
    /// and report the exact final state per circuit
    #[arg(long)]
    statevector: bool,

    /// Override the shot count for every circuit
    #[arg(short, long)]
    shots: Option<u32>,

    /// Override the base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum addressable qubit count
    #[arg(long)]
    max_qubits: Option<u32>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let mut qobj = Qobj::from_json(&text).context("parsing qobj document")?;
    apply_overrides(&mut qobj, &cli);

    debug!(circuits = qobj.circuits.len(), "loaded qobj");

    let batch = run_batch(&qobj, &cli);
    print_summary(&batch);

    let json = serde_json::to_string_pretty(&batch).context("serializing result")?;
    match &cli.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

/// CLI flags beat both batch- and circuit-level config.
fn apply_overrides(qobj: &mut Qobj, cli: &Cli) {
    if let Some(shots) = cli.shots {
        qobj.config.shots = Some(shots);
        for circuit in &mut qobj.circuits {
            circuit.config.shots = Some(shots);
        }
    }
    if let Some(seed) = cli.seed {
        qobj.config.seed = Some(seed);
        for circuit in &mut qobj.circuits {
            circuit.config.seed = Some(seed);
        }
    }
    if let Some(max_qubits) = cli.max_qubits {
        qobj.config.max_qubits = Some(max_qubits);
    }
}

fn run_batch(qobj: &Qobj, cli: &Cli) -> BatchResult {
    let seed = qobj.config.seed.unwrap_or(0);
    let max_qubits = qobj
        .config
        .max_qubits
        .unwrap_or(alsvid_core::DEFAULT_MAX_QUBITS);

    if cli.statevector {
        StatevectorSimulator::new()
            .with_seed(seed)
            .with_max_qubits(max_qubits)
            .run(qobj)
    } else {
        Executor::new()
            .with_seed(seed)
            .with_max_qubits(max_qubits)
            .run(qobj)
    }
}

fn print_summary(batch: &BatchResult) {
    for result in &batch.results {
        if result.success {
            eprintln!(
                "{} {} ({} shots, {:.3}s)",
                style("ok  ").green(),
                result.name,
                result.shots,
                result.time_taken
            );
        } else {
            eprintln!(
                "{} {} — {}",
                style("fail").red(),
                result.name,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
