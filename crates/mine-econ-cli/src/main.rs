mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::districts::DistrictsArgs;
use commands::economics::EconomicsArgs;
use commands::esg::EsgScoreArgs;
use commands::resource::ResourceGridArgs;
use commands::screening::ScreenArgs;

/// Mining project economics and resource screening
#[derive(Parser)]
#[command(
    name = "mea",
    version,
    about = "Mining project economics and resource screening",
    long_about = "A CLI for early-stage mining project evaluation with decimal \
                  precision. Computes flat-annuity project economics (contained \
                  metal through NPV and IRR), inverse-distance resource grids, \
                  ESG composite scores, PGM/REE commodity screening, and mineral \
                  district lookups."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate flat-annuity project economics (NPV, IRR, annual cash flows)
    Economics(EconomicsArgs),
    /// Estimate a resource grid from scattered samples (inverse distance weighting)
    ResourceGrid(ResourceGridArgs),
    /// Compute an ESG composite score from pillar scores
    EsgScore(EsgScoreArgs),
    /// Screen mineral records for PGM/REE indicators and tally commodities
    Screen(ScreenArgs),
    /// List or look up mineral districts
    Districts(DistrictsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Economics(args) => commands::economics::run_economics(args),
        Commands::ResourceGrid(args) => commands::resource::run_resource_grid(args),
        Commands::EsgScore(args) => commands::esg::run_esg_score(args),
        Commands::Screen(args) => commands::screening::run_screen(args),
        Commands::Districts(args) => commands::districts::run_districts(args),
        Commands::Version => {
            println!("mea {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
