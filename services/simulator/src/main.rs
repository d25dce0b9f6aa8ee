//! Pool simulator entry point

use amm::SwapDirection;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use poolsim_simulator::logging::{init_logging, resolve_level};
use poolsim_simulator::report;
use poolsim_simulator::Session;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Constant-product AMM pool simulator", long_about = None)]
struct Args {
    /// Configuration file path (supports ~ and $VARS)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level, overrides the configured one
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a swap without executing it
    Quote {
        /// Amount to pay, fee included
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,

        /// x-to-y pays token X, y-to-x pays token Y
        #[arg(short, long, default_value = "x-to-y")]
        direction: SwapDirection,
    },

    /// Execute swaps in order, each against the previous pool state
    Swap {
        /// Amount to pay; repeat for a sequence of swaps
        #[arg(short, long, required = true, allow_hyphen_values = true)]
        amount: Vec<String>,

        #[arg(short, long, default_value = "x-to-y")]
        direction: SwapDirection,

        /// Restore the starting reserves after the sequence
        #[arg(long)]
        reset: bool,
    },

    /// Show TVL, prices and impermanent loss
    Stats,

    /// Sample the x * y = k curve around the current reserves
    Curve {
        /// Number of points, defaults to the configured density
        #[arg(short, long)]
        points: Option<usize>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Serialize)]
struct SwapRun<'a> {
    baseline: amm::InitialSnapshot,
    swaps: &'a [poolsim_simulator::SwapOutcome],
    stats: amm::LiquidityStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    reset_to: Option<amm::Pool>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = config::load_config(args.config.as_deref())?;
    init_logging(
        resolve_level(args.log_level.as_deref(), &config.logging.level),
        config.logging.json,
    )?;

    info!("Starting Poolsim simulator v{}", env!("CARGO_PKG_VERSION"));
    // The subscriber only exists once the configuration is known
    info!(
        source = args.config.as_deref().unwrap_or("<built-in defaults>"),
        pool = %format!("{}/{}", config.pool.token_x, config.pool.token_y),
        tokens = config.tokens.len(),
        "Configuration loaded"
    );
    debug!(curve_points = config.simulation.curve_points, "Simulation settings");

    let mut session = Session::from_config(&config)?;

    match args.command {
        Command::Quote { amount, direction } => {
            let view = session.quote(&amount, direction)?;
            if args.json {
                print_json(&view)?;
            } else {
                print!("{}", report::render_pool(session.pool()));
                print!("{}", report::render_quote(&view));
            }
        }
        Command::Swap {
            amount,
            direction,
            reset,
        } => {
            let mut outcomes = Vec::with_capacity(amount.len());
            for value in &amount {
                outcomes.push(session.swap(value, direction)?);
            }
            let stats = session.stats()?;
            let swapped_pool = session.pool().clone();

            let reset_to = if reset {
                session.reset()?;
                Some(session.pool().clone())
            } else {
                None
            };

            if args.json {
                print_json(&SwapRun {
                    baseline: *session.snapshot(),
                    swaps: &outcomes,
                    stats,
                    reset_to,
                })?;
            } else {
                for outcome in &outcomes {
                    print!("{}", report::render_swap(outcome, &swapped_pool));
                }
                print!("{}", report::render_stats(&stats, &swapped_pool));
                if let Some(pool) = &reset_to {
                    println!("Reset to starting reserves");
                    print!("{}", report::render_pool(pool));
                }
            }
        }
        Command::Stats => {
            let stats = session.stats()?;
            if args.json {
                print_json(&stats)?;
            } else {
                print!("{}", report::render_pool(session.pool()));
                print!("{}", report::render_stats(&stats, session.pool()));
            }
        }
        Command::Curve { points } => {
            let curve = session.curve(points)?;
            if args.json {
                print_json(&curve)?;
            } else {
                print!("{}", report::render_curve(&curve));
            }
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}
