//! Command-line interface for the portfolio simulator.

use investor_gym::config::{GymFileConfig, SimulationSettings};
use investor_gym::env::{EpisodeSummary, InvestorEnv};
use investor_gym::error::Result;
use investor_gym::factory::PortfolioFactory;
use investor_gym::policy::PolicyKind;

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Investor Gym - a stochastic multi-asset portfolio simulator.
#[derive(Parser)]
#[command(name = "investor-gym")]
#[command(version)]
#[command(about = "Play simulated portfolio episodes with baseline policies")]
#[command(long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run episodes on the canonical three-asset universe
    Run {
        /// Ticks per episode
        #[arg(short = 'H', long, default_value = "100")]
        horizon: usize,

        /// Number of episodes
        #[arg(short, long, default_value = "10")]
        episodes: usize,

        /// Random seed (entropy if omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Policy driving the allocation
        #[arg(short, long, value_enum, default_value = "equal")]
        policy: PolicyArg,

        /// Print the state after every step
        #[arg(long)]
        render: bool,
    },

    /// Run episodes using a configuration file
    RunConfig {
        /// Path to TOML configuration file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "investor_gym.toml")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Hold,
    Equal,
    Random,
    Momentum,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Hold => PolicyKind::Hold,
            PolicyArg::Equal => PolicyKind::Equal,
            PolicyArg::Random => PolicyKind::Random,
            PolicyArg::Momentum => PolicyKind::Momentum,
        }
    }
}

impl Cli {
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    match &cli.command {
        Commands::Run {
            horizon,
            episodes,
            seed,
            policy,
            render,
        } => {
            let settings = SimulationSettings {
                horizon: *horizon,
                episodes: *episodes,
                seed: *seed,
                policy: (*policy).into(),
                render: *render,
            };
            run_episodes(&settings, PortfolioFactory::new(), cli.output)
        }

        Commands::RunConfig { config } => run_from_config(config, cli.output),

        Commands::Init { output } => init_config(output),
    }
}

fn run_from_config(config_path: &PathBuf, output: OutputFormat) -> Result<()> {
    let file_config = GymFileConfig::load(config_path)?;
    let factory = file_config.factory()?;
    run_episodes(&file_config.simulation, factory, output)
}

fn run_episodes(
    settings: &SimulationSettings,
    factory: PortfolioFactory,
    output: OutputFormat,
) -> Result<()> {
    let mut env = InvestorEnv::with_factory(settings.horizon, settings.seed, factory)?;
    // The agent gets its own stream so it never perturbs the price paths.
    let mut policy = settings.policy.build(env.current_seed().wrapping_add(1));

    info!(
        "Running {} episodes of {} ticks with policy '{}' (seed {})",
        settings.episodes,
        settings.horizon,
        policy.name(),
        env.current_seed()
    );

    let mut summaries = Vec::with_capacity(settings.episodes);
    for episode in 0..settings.episodes {
        let render = settings.render && output == OutputFormat::Text;
        let summary = env.run_episode(episode, policy.as_mut(), |env, _| {
            if render {
                println!("{}", env.render());
            }
        })?;
        if output == OutputFormat::Text {
            print_summary(&summary);
        }
        summaries.push(summary);
    }

    let average = if summaries.is_empty() {
        0.0
    } else {
        summaries.iter().map(|s| s.total_reward).sum::<f64>() / summaries.len() as f64
    };

    match output {
        OutputFormat::Text => {
            println!(
                "Finished {} episodes. Average reward: {:.4}",
                summaries.len(),
                average
            );
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "seed": env.current_seed(),
                "horizon": settings.horizon,
                "policy": settings.policy.to_string(),
                "average_reward": average,
                "episodes": summaries,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn print_summary(summary: &EpisodeSummary) {
    println!("{}", format_summary(summary));
}

fn format_summary(summary: &EpisodeSummary) -> String {
    format!(
        "Episode {:4} after {} steps: reward {:+.4}, value {:.2} -> {:.2}",
        summary.episode,
        summary.steps,
        summary.total_reward,
        summary.start_value,
        summary.final_value
    )
}

fn init_config(output: &PathBuf) -> Result<()> {
    let content = GymFileConfig::example();
    fs::write(output, content)?;
    println!("Created configuration file: {}", output.display());
    Ok(())
}
