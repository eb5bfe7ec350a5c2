use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MineEconError;
use crate::types::{with_metadata, ComputationOutput};
use crate::MineEconResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Pillar scores on the 0-10 scale used in project screening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsgScoreInput {
    /// Environmental pillar score (0-10)
    pub environmental: Decimal,
    /// Social pillar score (0-10)
    pub social: Decimal,
    /// Governance pillar score (0-10)
    pub governance: Decimal,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsgScoreOutput {
    pub environmental: Decimal,
    pub social: Decimal,
    pub governance: Decimal,
    /// Equal-weight mean of the three pillars (0-10)
    pub overall_score: Decimal,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const SCORE_MIN: Decimal = dec!(0);
const SCORE_MAX: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Combine environmental, social, and governance pillar scores into a
/// single equal-weight composite on the 0-10 scale.
pub fn calculate_esg_score(
    input: &EsgScoreInput,
) -> MineEconResult<ComputationOutput<EsgScoreOutput>> {
    let start = Instant::now();

    // -- Validation ----------------------------------------------------------
    validate_input(input)?;

    let overall_score = (input.environmental + input.social + input.governance) / dec!(3);

    let output = EsgScoreOutput {
        environmental: input.environmental,
        social: input.social,
        governance: input.governance,
        overall_score,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "ESG Composite Score (Equal-Weight Pillar Mean)",
        &serde_json::json!({
            "score_range": "0-10",
            "pillar_weighting": "equal",
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &EsgScoreInput) -> MineEconResult<()> {
    for (field, value) in [
        ("environmental", input.environmental),
        ("social", input.social),
        ("governance", input.governance),
    ] {
        if value < SCORE_MIN || value > SCORE_MAX {
            return Err(MineEconError::InvalidAssumptions {
                field: field.into(),
                reason: "Pillar score must be between 0 and 10".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
