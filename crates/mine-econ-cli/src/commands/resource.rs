use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mine_econ_core::resource_estimation::{
    self, GridSample, ResourceGridInput, DEFAULT_GRID_RESOLUTION, DEFAULT_IDW_POWER,
};

use crate::input;

/// Arguments for resource grid estimation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ResourceGridArgs {
    /// Path to a JSON/YAML input file, or a CSV of x,y,value sample rows
    #[arg(long)]
    pub input: Option<String>,

    /// Inline sample triple; repeat the flag for each sample
    #[arg(long = "sample", value_name = "X,Y,VALUE")]
    pub samples: Vec<String>,

    /// Grid nodes per axis
    #[arg(long, default_value_t = DEFAULT_GRID_RESOLUTION)]
    pub resolution: u32,

    /// Distance-decay exponent
    #[arg(long, default_value_t = DEFAULT_IDW_POWER)]
    pub power: Decimal,
}

pub fn run_resource_grid(args: ResourceGridArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let grid_input: ResourceGridInput = if let Some(ref path) = args.input {
        // CSV files carry bare samples (x,y,value columns); JSON and YAML
        // carry the full input object including resolution and power.
        if input::file::is_csv(path) {
            ResourceGridInput {
                samples: input::file::read_csv_rows(path)?,
                resolution: args.resolution,
                power: args.power,
            }
        } else {
            input::file::read_input(path)?
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else if !args.samples.is_empty() {
        let samples = args
            .samples
            .iter()
            .map(|raw| parse_sample(raw))
            .collect::<Result<Vec<_>, _>>()?;
        ResourceGridInput {
            samples,
            resolution: args.resolution,
            power: args.power,
        }
    } else {
        return Err(
            "--input <file>, piped JSON, or at least one --sample X,Y,VALUE is required".into(),
        );
    };

    let result = resource_estimation::estimate_resource_grid(&grid_input)?;
    Ok(serde_json::to_value(result)?)
}

fn parse_sample(raw: &str) -> Result<GridSample, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("Invalid --sample '{raw}': expected X,Y,VALUE").into());
    }
    Ok(GridSample {
        x: parts[0]
            .parse::<Decimal>()
            .map_err(|e| format!("Invalid --sample x '{}': {}", parts[0], e))?,
        y: parts[1]
            .parse::<Decimal>()
            .map_err(|e| format!("Invalid --sample y '{}': {}", parts[1], e))?,
        value: parts[2]
            .parse::<Decimal>()
            .map_err(|e| format!("Invalid --sample value '{}': {}", parts[2], e))?,
    })
}
