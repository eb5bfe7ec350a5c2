use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mine_econ_core::project_economics::{self, ProjectAssumptions};

use crate::input;

/// Arguments for project economics evaluation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EconomicsArgs {
    /// Ore tonnage over the project life (tons)
    #[arg(long)]
    pub tonnage: Option<Decimal>,

    /// Ore grade: grams per ton, or percent with --grade-is-percent
    #[arg(long)]
    pub grade: Option<Decimal>,

    /// Interpret --grade as a percentage (base metals)
    #[arg(long)]
    pub grade_is_percent: bool,

    /// Grams per payable unit for mass grades (31.1035 for troy ounces)
    #[arg(long, default_value = "31.1035")]
    pub unit_conversion_factor: Decimal,

    /// Metallurgical recovery (percent, 0-100)
    #[arg(long)]
    pub recovery_rate: Option<Decimal>,

    /// Metal price per payable unit
    #[arg(long)]
    pub metal_price: Option<Decimal>,

    /// Mining and processing cost per ton of ore
    #[arg(long)]
    pub operating_cost: Option<Decimal>,

    /// Environmental cost per ton of ore
    #[arg(long, default_value = "0")]
    pub environmental_cost: Decimal,

    /// Social cost per ton of ore
    #[arg(long, default_value = "0")]
    pub social_cost: Decimal,

    /// Governance cost per ton of ore
    #[arg(long, default_value = "0")]
    pub governance_cost: Decimal,

    /// Initial capital expenditure (year 0 outflow)
    #[arg(long)]
    pub initial_capex: Option<Decimal>,

    /// Annual sustaining capital expenditure
    #[arg(long, default_value = "0")]
    pub sustaining_capex: Decimal,

    /// Royalty rate (percent of revenue)
    #[arg(long, default_value = "0")]
    pub royalty_rate: Decimal,

    /// Corporate tax rate (percent of positive EBITDA)
    #[arg(long, default_value = "0")]
    pub tax_rate: Decimal,

    /// Discount rate (percent)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Project life (years)
    #[arg(long)]
    pub project_life: Option<u32>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_economics(args: EconomicsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions: ProjectAssumptions = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ProjectAssumptions {
            tonnage: args
                .tonnage
                .ok_or("--tonnage is required (or provide --input)")?,
            grade: args
                .grade
                .ok_or("--grade is required (or provide --input)")?,
            grade_is_percent: args.grade_is_percent,
            unit_conversion_factor: args.unit_conversion_factor,
            recovery_rate_percent: args
                .recovery_rate
                .ok_or("--recovery-rate is required (or provide --input)")?,
            metal_price_per_unit: args
                .metal_price
                .ok_or("--metal-price is required (or provide --input)")?,
            operating_cost_per_ton: args
                .operating_cost
                .ok_or("--operating-cost is required (or provide --input)")?,
            environmental_cost_per_ton: args.environmental_cost,
            social_cost_per_ton: args.social_cost,
            governance_cost_per_ton: args.governance_cost,
            initial_capex: args
                .initial_capex
                .ok_or("--initial-capex is required (or provide --input)")?,
            annual_sustaining_capex: args.sustaining_capex,
            royalty_rate_percent: args.royalty_rate,
            tax_rate_percent: args.tax_rate,
            discount_rate_percent: args
                .discount_rate
                .ok_or("--discount-rate is required (or provide --input)")?,
            project_life_years: args
                .project_life
                .ok_or("--project-life is required (or provide --input)")?,
        }
    };

    let result = project_economics::calculate_project_economics(&assumptions)?;
    Ok(serde_json::to_value(result)?)
}
