use clap::Args;
use serde_json::Value;

use mine_econ_core::districts::{self, District};

/// Arguments for mineral district lookups
#[derive(Args)]
pub struct DistrictsArgs {
    /// Look up a single district by its full registry name
    #[arg(long)]
    pub name: Option<String>,

    /// List only districts hosted in this state
    #[arg(long)]
    pub state: Option<String>,
}

pub fn run_districts(args: DistrictsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref name) = args.name {
        let district = districts::find_district(name)
            .ok_or_else(|| format!("Unknown district: {name}"))?;
        return Ok(serde_json::to_value(district)?);
    }

    let listed: Vec<&District> = match args.state {
        Some(ref state) => districts::districts_in_state(state),
        None => districts::all_districts().iter().collect(),
    };
    Ok(serde_json::to_value(listed)?)
}
