use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mine_econ_core::esg::{self, EsgScoreInput};

use crate::input;

/// Arguments for ESG composite scoring
#[derive(Args)]
pub struct EsgScoreArgs {
    /// Environmental pillar score (0-10)
    #[arg(long)]
    pub environmental: Option<Decimal>,

    /// Social pillar score (0-10)
    #[arg(long)]
    pub social: Option<Decimal>,

    /// Governance pillar score (0-10)
    #[arg(long)]
    pub governance: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_esg_score(args: EsgScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let score_input: EsgScoreInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        EsgScoreInput {
            environmental: args
                .environmental
                .ok_or("--environmental is required (or provide --input)")?,
            social: args
                .social
                .ok_or("--social is required (or provide --input)")?,
            governance: args
                .governance
                .ok_or("--governance is required (or provide --input)")?,
        }
    };

    let result = esg::calculate_esg_score(&score_input)?;
    Ok(serde_json::to_value(result)?)
}
