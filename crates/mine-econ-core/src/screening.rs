//! Commodity screening over geological record extracts.
//!
//! Takes the flattened commodity columns of a mineral-site records pull and
//! answers two questions analysts ask first: are platinum-group or
//! rare-earth indicators present anywhere in the set, and which commodities
//! dominate the district. Matching is a normalized substring test against
//! fixed term lists, so "Neodymium-Praseodymium" and "PGE placer" both
//! register.

use std::collections::BTreeMap;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MineEconError;
use crate::types::{with_metadata, ComputationOutput};
use crate::MineEconResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Platinum-group indicator terms, matched against normalized commodity text.
const PGM_TERMS: &[&str] = &[
    "platinum",
    "palladium",
    "rhodium",
    "iridium",
    "osmium",
    "ruthenium",
    "pge",
    "pgm",
];

/// Rare-earth indicator terms: the naturally occurring lanthanides plus
/// yttrium and scandium, and the common shorthand labels.
const REE_TERMS: &[&str] = &[
    "lanthanum",
    "cerium",
    "praseodymium",
    "neodymium",
    "samarium",
    "europium",
    "gadolinium",
    "terbium",
    "dysprosium",
    "holmium",
    "erbium",
    "thulium",
    "ytterbium",
    "lutetium",
    "yttrium",
    "scandium",
    "ree",
    "rare earth",
];

/// The commodity tally is capped at this many entries.
const TOP_COMMODITY_COUNT: usize = 10;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One mineral-site row from a records pull, with its commodity columns
/// already flattened into a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineralRecord {
    /// Site or deposit name
    pub site_name: String,
    /// Site latitude in decimal degrees, when the source reports one
    #[serde(default)]
    pub latitude: Option<Decimal>,
    /// Site longitude in decimal degrees, when the source reports one
    #[serde(default)]
    pub longitude: Option<Decimal>,
    /// Commodity labels as reported by the source (free text)
    #[serde(default)]
    pub commodities: Vec<String>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One commodity label and the number of records reporting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityCount {
    /// Normalized commodity label
    pub commodity: String,
    /// Number of records carrying this label
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityScreenOutput {
    /// True when any record matches a platinum-group indicator term
    pub pgm_present: bool,
    /// True when any record matches a rare-earth indicator term
    pub ree_present: bool,
    /// Commodity tally, descending by count with alphabetical tie-break,
    /// capped at the top ten
    pub commodity_counts: Vec<CommodityCount>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Screens a set of mineral records for platinum-group and rare-earth
/// indicators and tallies the dominant commodities.
///
/// Records with no commodity labels contribute nothing to the tally but are
/// not an error; an entirely empty record set is `InsufficientData`.
pub fn screen_commodities(
    records: &[MineralRecord],
) -> MineEconResult<ComputationOutput<CommodityScreenOutput>> {
    let started = Instant::now();

    if records.is_empty() {
        return Err(MineEconError::InsufficientData(
            "commodity screening requires at least one mineral record".to_string(),
        ));
    }

    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut pgm_present = false;
    let mut ree_present = false;

    for record in records {
        for commodity in &record.commodities {
            let token = normalize(commodity);
            if token.is_empty() {
                continue;
            }
            if contains_any(&token, PGM_TERMS) {
                pgm_present = true;
            }
            if contains_any(&token, REE_TERMS) {
                ree_present = true;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    // BTreeMap iteration is already alphabetical, so a stable sort by count
    // keeps the alphabetical order within ties.
    let mut commodity_counts: Vec<CommodityCount> = counts
        .into_iter()
        .map(|(commodity, count)| CommodityCount { commodity, count })
        .collect();
    commodity_counts.sort_by(|a, b| b.count.cmp(&a.count));
    commodity_counts.truncate(TOP_COMMODITY_COUNT);

    let mut warnings = Vec::new();
    if !pgm_present && !ree_present {
        warnings.push(
            "No platinum-group or rare-earth indicators detected in the supplied records"
                .to_string(),
        );
    }

    let assumptions = serde_json::json!({
        "records_screened": records.len(),
        "pgm_terms": PGM_TERMS,
        "ree_terms": REE_TERMS,
        "top_commodity_count": TOP_COMMODITY_COUNT,
        "matching": "case-insensitive substring",
    });

    Ok(with_metadata(
        "Commodity Screening (PGM/REE Indicator Match)",
        &assumptions,
        warnings,
        started.elapsed().as_micros() as u64,
        CommodityScreenOutput {
            pgm_present,
            ree_present,
            commodity_counts,
        },
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn contains_any(token: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| token.contains(term))
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
