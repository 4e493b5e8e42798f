mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use combodraw::draw::{DrawReport, Requirements};
use combodraw::{BitString, ReplaySource, RngSource, SelectionRequest, draw};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log directives used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    /// Emit logs as JSON instead of plain text.
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct GameArgs {
    /// Highest number in the pool; numbers are drawn from 1 to this value.
    #[arg(long, env = "COMBODRAW_POOL", default_value_t = 45)]
    pool: u32,
    /// Numbers picked per game.
    #[arg(long, env = "COMBODRAW_PICK", default_value_t = 6)]
    pick: u32,
    /// Games decoded from a single bit string.
    #[arg(long, env = "COMBODRAW_GAMES", default_value_t = 4)]
    games: u64,
}

impl From<GameArgs> for SelectionRequest {
    fn from(args: GameArgs) -> Self {
        SelectionRequest::new(args.pool, args.pick, args.games)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Draw games from freshly generated random bits.
    Draw {
        #[command(flatten)]
        game: GameArgs,
        /// Seed for a reproducible pseudo-random draw.
        #[arg(long)]
        seed: Option<u64>,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Decode games from a recorded bit string such as `0110...`.
    Decode {
        /// Bits to decode; the length must match the game parameters exactly.
        bits: String,
        #[command(flatten)]
        game: GameArgs,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show how many bits a draw needs and the resulting modulo bias.
    Requirements {
        #[command(flatten)]
        game: GameArgs,
        /// Print the requirements as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Parse CLI arguments and execute the requested command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log_level, cli.log_json);

    match cli.command {
        Commands::Draw { game, seed, json } => {
            let request = SelectionRequest::from(game);
            let report = match seed {
                Some(seed) => draw(&request, &mut RngSource::seeded(seed)),
                None => draw(&request, &mut RngSource::from_entropy()),
            }
            .context("draw failed")?;
            print_report(&report, json)?;
        }
        Commands::Decode { bits, game, json } => {
            let request = SelectionRequest::from(game);
            let recorded = BitString::parse(bits.trim())
                .with_context(|| format!("invalid bit string: {bits}"))?;
            let report = draw(&request, &mut ReplaySource::new(recorded))
                .context("decode failed")?;
            print_report(&report, json)?;
        }
        Commands::Requirements { game, json } => {
            let requirements = SelectionRequest::from(game)
                .requirements()
                .context("invalid game parameters")?;
            print_requirements(&requirements, json)?;
        }
    }

    Ok(())
}

fn print_report(report: &DrawReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for (i, game) in report.result.combinations().iter().enumerate() {
        println!("Game {}: {}", i + 1, game);
    }
    println!();
    println!("Details:");
    println!("  Source: {}", report.source);
    println!("  Measurement: {}", report.bits);
    println!(
        "  Bits: {} ({} per game)",
        report.result.total_bits_required(),
        report.result.bits_per_selection()
    );
    println!("  Possible games: {}", report.result.universe_size());
    println!("  State space: {} states", report.state_space_size);
    Ok(())
}

fn print_requirements(requirements: &Requirements, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(requirements)?);
        return Ok(());
    }

    println!("Possible games: {}", requirements.universe_size);
    println!("Bits per game: {}", requirements.bits_per_selection);
    println!("Total bits: {}", requirements.total_bits);
    println!("State space: {} states", requirements.state_space_size);
    println!(
        "Modulo bias: {} over-represented games, {:.4}% of the bit space",
        requirements.bias.surplus(),
        requirements.bias.bias_fraction() * 100.0
    );
    Ok(())
}
