use clap::Args;
use serde_json::Value;

use mine_econ_core::screening::{self, MineralRecord};

use crate::input;

/// Arguments for commodity screening
#[derive(Args)]
pub struct ScreenArgs {
    /// Path to JSON or YAML file holding an array of mineral records
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_screen(args: ScreenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records: Vec<MineralRecord> = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file> or piped JSON records required for screening".into());
    };

    let result = screening::screen_commodities(&records)?;
    Ok(serde_json::to_value(result)?)
}
