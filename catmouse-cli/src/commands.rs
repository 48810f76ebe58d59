use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use validator::Validate;

use catmouse_config::{CatMouseConfig, SimulationConfig, BASE_FILE};
use catmouse_core::AdmissionPolicy;
use catmouse_simulator::Simulator;
use catmouse_telemetry::{EventLogger, MetricsRecorder};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one simulation
    Simulate(SimulateArgs),
    /// Run simulations over random configurations until one fails
    Fuzz(FuzzArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    Greedy,
    Alternating,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Configuration file; defaults to config/catmouse.yaml and the environment
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bowls: Option<usize>,
    #[arg(long)]
    pub cats: Option<usize>,
    #[arg(long)]
    pub mice: Option<usize>,
    /// Meals per creature
    #[arg(long)]
    pub iterations: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, value_enum)]
    pub policy: Option<PolicyKind>,
    /// Consecutive admissions per turn under the alternating policy
    #[arg(long)]
    pub batch: Option<NonZeroUsize>,
    /// Print Prometheus metrics after the run
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FuzzArgs {
    /// Initial seed (auto-increments)
    #[arg(long, default_value_t = 1)]
    pub seed: u64,
    /// Number of runs (0 for unlimited)
    #[arg(long, default_value_t = 100)]
    pub iterations: usize,
    /// Maximum cats and maximum mice per run
    #[arg(long, default_value_t = 8)]
    pub max_creatures: usize,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Simulate(args) => run_simulate(args),
        Commands::Fuzz(args) => {
            EventLogger::init(&CatMouseConfig::default().telemetry.log_filter);
            run_fuzz(args)
        }
    }
}

fn load_config(args: &SimulateArgs) -> anyhow::Result<CatMouseConfig> {
    let mut config = match &args.config {
        Some(path) => CatMouseConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CatMouseConfig::load().context("loading configuration")?,
    };

    let simulation = &mut config.simulation;
    if let Some(bowls) = args.bowls {
        simulation.bowls = bowls;
    }
    if let Some(cats) = args.cats {
        simulation.cats = cats;
    }
    if let Some(mice) = args.mice {
        simulation.mice = mice;
    }
    if let Some(iterations) = args.iterations {
        simulation.iterations = iterations;
    }
    if let Some(seed) = args.seed {
        simulation.seed = seed;
    }

    config.coordinator.policy =
        override_policy(config.coordinator.policy, args.policy, args.batch)?;
    config.telemetry.metrics |= args.metrics;

    config.validate().context("validating configuration")?;
    Ok(config)
}

/// Applies `--policy` and `--batch` on top of the configured policy.
///
/// A bare `--policy alternating` keeps a batch the configuration already set.
fn override_policy(
    configured: AdmissionPolicy,
    kind: Option<PolicyKind>,
    batch: Option<NonZeroUsize>,
) -> anyhow::Result<AdmissionPolicy> {
    let configured_batch = match configured {
        AdmissionPolicy::Alternating { batch } => Some(batch),
        AdmissionPolicy::Greedy => None,
    };
    Ok(match (kind, batch) {
        (Some(PolicyKind::Greedy), Some(_)) => {
            anyhow::bail!("--batch only applies to the alternating policy")
        }
        (Some(PolicyKind::Greedy), None) => AdmissionPolicy::Greedy,
        (Some(PolicyKind::Alternating), batch) => AdmissionPolicy::alternating(
            batch.or(configured_batch).unwrap_or(NonZeroUsize::MIN),
        ),
        (None, Some(batch)) => AdmissionPolicy::alternating(batch),
        (None, None) => configured,
    })
}

fn config_source(args: &SimulateArgs) -> String {
    match &args.config {
        Some(path) => path.display().to_string(),
        None if Path::new(BASE_FILE).exists() => BASE_FILE.to_string(),
        None => "built-in defaults".to_string(),
    }
}

fn run_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    EventLogger::init(&config.telemetry.log_filter);
    info!(source = %config_source(&args), "configuration loaded");

    let mut simulator = Simulator::from_config(&config)?;
    let metrics = if config.telemetry.metrics {
        let metrics = Arc::new(MetricsRecorder::new().context("creating metrics registry")?);
        simulator = simulator.with_metrics(Arc::clone(&metrics));
        Some(metrics)
    } else {
        None
    };

    let report = simulator.run()?;
    print!("{report}");

    if let Some(metrics) = metrics {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

fn run_fuzz(args: FuzzArgs) -> anyhow::Result<()> {
    if args.iterations == 0 {
        warn!("Infinite fuzz mode activated (Ctrl-C to exit)");
    }

    let mut count = 0;
    let mut seed = args.seed;
    while args.iterations == 0 || count < args.iterations {
        let config = SimulationConfig::generate_fuzz_config(seed, args.max_creatures);
        let policy = fuzz_policy(seed);
        info!(
            seed,
            bowls = config.bowls,
            cats = config.cats,
            mice = config.mice,
            ?policy,
            "fuzz iteration {}",
            count + 1
        );

        let report = Simulator::new(config, policy)?
            .run()
            .with_context(|| format!("fuzz run with seed {seed} failed"))?;
        info!(meals = report.total_meals(), "fuzz iteration passed");

        seed = seed.wrapping_add(1);
        count += 1;
    }

    println!("{count} fuzz runs passed");
    Ok(())
}

/// Even seeds run greedy, odd seeds alternate with a batch of 1 to 4.
fn fuzz_policy(seed: u64) -> AdmissionPolicy {
    if seed % 2 == 0 {
        return AdmissionPolicy::Greedy;
    }
    NonZeroUsize::new((seed / 2 % 4) as usize + 1)
        .map(AdmissionPolicy::alternating)
        .unwrap_or_default()
}
