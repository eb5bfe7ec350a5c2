//! Grade-grid estimation by inverse distance weighting.
//!
//! Turns scattered drill or surface samples into a regular estimation grid
//! spanning the samples' bounding box. Each node takes the weighted mean of
//! all sample values with weights `1 / d^power`; a node sitting on a sample
//! takes that sample's value exactly. The estimator is deterministic and
//! total: weight saturation resolves to the nearest sample instead of
//! failing.

use std::time::Instant;

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MineEconError;
use crate::types::{with_metadata, ComputationOutput};
use crate::MineEconResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Nodes per axis when the caller does not choose a resolution.
pub const DEFAULT_GRID_RESOLUTION: u32 = 100;

/// Distance-decay exponent when the caller does not choose one.
pub const DEFAULT_IDW_POWER: Decimal = dec!(2);

/// Nodes per axis are capped to keep grids at a workable size.
pub const MAX_GRID_RESOLUTION: u32 = 1000;

/// A node within this distance of a sample takes the sample's value exactly.
const EXACT_MATCH_TOLERANCE: Decimal = dec!(0.000000000001);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One located sample of the quantity being estimated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSample {
    /// Easting or longitude of the sample point
    pub x: Decimal,
    /// Northing or latitude of the sample point
    pub y: Decimal,
    /// Sampled quantity (grade, thickness, accumulation)
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGridInput {
    /// Sample points; at least one is required
    pub samples: Vec<GridSample>,
    /// Grid nodes per axis, inclusive of both bounding-box edges (2-1000)
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Distance-decay exponent; 2 gives the classic inverse-square falloff
    #[serde(default = "default_power")]
    pub power: Decimal,
}

fn default_resolution() -> u32 {
    DEFAULT_GRID_RESOLUTION
}

fn default_power() -> Decimal {
    DEFAULT_IDW_POWER
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGridOutput {
    /// Nodes along the x axis (1 when all samples share one x)
    pub nx: u32,
    /// Nodes along the y axis (1 when all samples share one y)
    pub ny: u32,
    /// Bounding-box west edge
    pub min_x: Decimal,
    /// Bounding-box east edge
    pub max_x: Decimal,
    /// Bounding-box south edge
    pub min_y: Decimal,
    /// Bounding-box north edge
    pub max_y: Decimal,
    /// Row-major estimates: `values[j][i]` is the node at `(x_i, y_j)`,
    /// rows ascending in y
    pub values: Vec<Vec<Decimal>>,
    /// Smallest node estimate on the grid
    pub min_estimate: Decimal,
    /// Largest node estimate on the grid
    pub max_estimate: Decimal,
    /// Arithmetic mean of all node estimates
    pub mean_estimate: Decimal,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Builds the estimation grid for a set of scattered samples.
///
/// The grid spans the samples' bounding box with `resolution` nodes per
/// axis; an axis on which every sample agrees collapses to a single
/// coordinate. Estimates are convex combinations of the sample values, so
/// the surface never leaves the sampled value range.
pub fn estimate_resource_grid(
    input: &ResourceGridInput,
) -> MineEconResult<ComputationOutput<ResourceGridOutput>> {
    let started = Instant::now();

    // ── Validation ───────────────────────────────────────────────────
    validate_input(input)?;

    let samples = &input.samples;
    let (min_x, max_x) = axis_bounds(samples.iter().map(|s| s.x));
    let (min_y, max_y) = axis_bounds(samples.iter().map(|s| s.y));
    if max_x.checked_sub(min_x).is_none() || max_y.checked_sub(min_y).is_none() {
        return Err(invalid(
            "samples",
            "coordinate spread exceeds the supported numeric range",
        ));
    }

    // ── Grid construction ────────────────────────────────────────────
    let xs = axis_nodes(min_x, max_x, input.resolution);
    let ys = axis_nodes(min_y, max_y, input.resolution);
    let node_count = Decimal::from(xs.len() as u64 * ys.len() as u64);

    let mut values = Vec::with_capacity(ys.len());
    let mut min_estimate = Decimal::MAX;
    let mut max_estimate = Decimal::MIN;
    let mut mean_estimate = Decimal::ZERO;

    for &gy in &ys {
        let mut row = Vec::with_capacity(xs.len());
        for &gx in &xs {
            let estimate = idw_estimate(gx, gy, samples, input.power);
            if estimate < min_estimate {
                min_estimate = estimate;
            }
            if estimate > max_estimate {
                max_estimate = estimate;
            }
            // Estimates stay within the sampled value range, so the scaled
            // accumulation cannot overflow.
            mean_estimate += estimate / node_count;
            row.push(estimate);
        }
        values.push(row);
    }

    let mut warnings = Vec::new();
    if samples.len() < 3 {
        warnings.push(format!(
            "Only {} sample(s) supplied; the interpolated surface is weakly constrained",
            samples.len()
        ));
    }

    let assumptions = serde_json::json!({
        "sample_count": samples.len(),
        "resolution": input.resolution,
        "power": input.power.to_string(),
        "weighting": "inverse distance, w = 1 / d^power",
        "exact_match_tolerance": EXACT_MATCH_TOLERANCE.to_string(),
    });

    let output = ResourceGridOutput {
        nx: xs.len() as u32,
        ny: ys.len() as u32,
        min_x,
        max_x,
        min_y,
        max_y,
        values,
        min_estimate,
        max_estimate,
        mean_estimate,
    };

    Ok(with_metadata(
        "Resource Grid Estimation (Inverse Distance Weighting)",
        &assumptions,
        warnings,
        started.elapsed().as_micros() as u64,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// IDW estimate at one grid node. Total by construction: exact hits and
/// saturated weights snap to the controlling sample, and a node every
/// sample is out of range of falls back to the nearest sample's value.
fn idw_estimate(x: Decimal, y: Decimal, samples: &[GridSample], power: Decimal) -> Decimal {
    let mut numerator = Decimal::ZERO;
    let mut denominator = Decimal::ZERO;
    let mut nearest_d2 = Decimal::MAX;
    let mut nearest_value = match samples.first() {
        Some(sample) => sample.value,
        None => return Decimal::ZERO,
    };

    for sample in samples {
        let d2 = match squared_distance(x, y, sample) {
            Some(d2) => d2,
            // Out of decimal range means negligible weight.
            None => continue,
        };
        if d2 < nearest_d2 {
            nearest_d2 = d2;
            nearest_value = sample.value;
        }

        let distance = d2.sqrt().unwrap_or(Decimal::ZERO);
        if distance <= EXACT_MATCH_TOLERANCE {
            return sample.value;
        }

        let decayed = match distance.checked_powd(power) {
            Some(decayed) => decayed,
            None => continue,
        };
        if decayed.is_zero() {
            // Underflow: the weight would be unbounded, the sample dominates.
            return sample.value;
        }
        let weight = match Decimal::ONE.checked_div(decayed) {
            Some(weight) => weight,
            None => return sample.value,
        };

        let weighted = match weight.checked_mul(sample.value) {
            Some(weighted) => weighted,
            None => return nearest_value,
        };
        match (
            numerator.checked_add(weighted),
            denominator.checked_add(weight),
        ) {
            (Some(num), Some(den)) => {
                numerator = num;
                denominator = den;
            }
            _ => return nearest_value,
        }
    }

    if denominator.is_zero() {
        return nearest_value;
    }
    numerator.checked_div(denominator).unwrap_or(nearest_value)
}

fn squared_distance(x: Decimal, y: Decimal, sample: &GridSample) -> Option<Decimal> {
    let dx = x.checked_sub(sample.x)?;
    let dy = y.checked_sub(sample.y)?;
    let xx = dx.checked_mul(dx)?;
    let yy = dy.checked_mul(dy)?;
    xx.checked_add(yy)
}

/// Node coordinates along one axis, inclusive of both edges. The final node
/// is pinned to `max` so the grid always reaches the bounding box exactly.
fn axis_nodes(min: Decimal, max: Decimal, resolution: u32) -> Vec<Decimal> {
    if min == max {
        return vec![min];
    }
    let last = resolution - 1;
    let step = (max - min) / Decimal::from(last);
    (0..=last)
        .map(|i| {
            if i == last {
                max
            } else {
                min + step * Decimal::from(i)
            }
        })
        .collect()
}

fn axis_bounds<I: Iterator<Item = Decimal>>(mut coords: I) -> (Decimal, Decimal) {
    let first = coords.next().unwrap_or_default();
    coords.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &ResourceGridInput) -> MineEconResult<()> {
    if input.samples.is_empty() {
        return Err(MineEconError::InsufficientData(
            "resource estimation requires at least one grid sample".to_string(),
        ));
    }
    if input.resolution < 2 || input.resolution > MAX_GRID_RESOLUTION {
        return Err(invalid(
            "resolution",
            "must be between 2 and 1000 nodes per axis",
        ));
    }
    if input.power <= Decimal::ZERO {
        return Err(invalid("power", "must be positive"));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> MineEconError {
    MineEconError::InvalidAssumptions {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: Decimal, y: Decimal, value: Decimal) -> GridSample {
        GridSample { x, y, value }
    }

    fn diagonal_input() -> ResourceGridInput {
        ResourceGridInput {
            samples: vec![
                sample(dec!(0), dec!(0), dec!(10)),
                sample(dec!(1), dec!(1), dec!(30)),
            ],
            resolution: 2,
            power: dec!(2),
        }
    }

    #[test]
    fn test_grid_snaps_to_exact_sample_locations() {
        let result = estimate_resource_grid(&diagonal_input()).unwrap();
        let grid = &result.result;

        assert_eq!(grid.values[0][0], dec!(10), "Node on the (0,0) sample");
        assert_eq!(grid.values[1][1], dec!(30), "Node on the (1,1) sample");
    }

    #[test]
    fn test_grid_averages_equidistant_samples_exactly() {
        let result = estimate_resource_grid(&diagonal_input()).unwrap();
        let grid = &result.result;

        // (1,0) and (0,1) sit at distance 1 from both samples.
        assert!((grid.values[0][1] - dec!(20)).abs() < dec!(0.0000001));
        assert!((grid.values[1][0] - dec!(20)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_grid_dimensions_and_bounds() {
        let input = ResourceGridInput {
            samples: vec![
                sample(dec!(-2), dec!(3), dec!(1)),
                sample(dec!(6), dec!(11), dec!(5)),
            ],
            resolution: 5,
            power: dec!(2),
        };
        let result = estimate_resource_grid(&input).unwrap();
        let grid = &result.result;

        assert_eq!(grid.nx, 5);
        assert_eq!(grid.ny, 5);
        assert_eq!(grid.min_x, dec!(-2));
        assert_eq!(grid.max_x, dec!(6));
        assert_eq!(grid.min_y, dec!(3));
        assert_eq!(grid.max_y, dec!(11));
        assert_eq!(grid.values.len(), 5);
        assert_eq!(grid.values[0].len(), 5);
    }

    #[test]
    fn test_estimates_stay_inside_sampled_value_range() {
        let input = ResourceGridInput {
            samples: vec![
                sample(dec!(0), dec!(0), dec!(2.5)),
                sample(dec!(4), dec!(0), dec!(7.0)),
                sample(dec!(2), dec!(3), dec!(4.1)),
            ],
            resolution: 9,
            power: dec!(2),
        };
        let result = estimate_resource_grid(&input).unwrap();
        let grid = &result.result;

        for row in &grid.values {
            for estimate in row {
                assert!(
                    *estimate >= dec!(2.5) && *estimate <= dec!(7.0),
                    "Estimate {estimate} escaped the sampled value range"
                );
            }
        }
        assert!(grid.min_estimate >= dec!(2.5));
        assert!(grid.max_estimate <= dec!(7.0));
        assert!(result.warnings.is_empty(), "Three samples should not warn");
    }

    #[test]
    fn test_summary_statistics_match_surface() {
        let result = estimate_resource_grid(&diagonal_input()).unwrap();
        let grid = &result.result;

        // Surface is {10, 20, 20, 30}; the corner nodes snap exactly.
        assert_eq!(grid.min_estimate, dec!(10));
        assert_eq!(grid.max_estimate, dec!(30));
        assert!((grid.mean_estimate - dec!(20)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_nearby_sample_dominates_estimate() {
        let samples = vec![
            sample(dec!(0), dec!(0), dec!(0)),
            sample(dec!(10), dec!(0), dec!(100)),
        ];
        let estimate = idw_estimate(dec!(1), dec!(0), &samples, dec!(2));

        // Weights 1 and 1/81 give 100/82.
        let expected = dec!(100) / dec!(82);
        assert!(
            (estimate - expected).abs() < dec!(0.0001),
            "Expected ~{expected}, got {estimate}"
        );
    }

    #[test]
    fn test_higher_power_sharpens_local_influence() {
        let samples = vec![
            sample(dec!(0), dec!(0), dec!(0)),
            sample(dec!(10), dec!(0), dec!(100)),
        ];
        let gentle = idw_estimate(dec!(1), dec!(0), &samples, dec!(1));
        let sharp = idw_estimate(dec!(1), dec!(0), &samples, dec!(4));

        assert!(
            sharp < gentle,
            "Power 4 should pull the estimate toward the near sample: {sharp} vs {gentle}"
        );
    }

    #[test]
    fn test_single_sample_collapses_to_constant_cell() {
        let input = ResourceGridInput {
            samples: vec![sample(dec!(5), dec!(7), dec!(42))],
            resolution: 50,
            power: dec!(2),
        };
        let result = estimate_resource_grid(&input).unwrap();
        let grid = &result.result;

        assert_eq!(grid.nx, 1);
        assert_eq!(grid.ny, 1);
        assert_eq!(grid.values, vec![vec![dec!(42)]]);
        assert_eq!(grid.mean_estimate, dec!(42));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("weakly constrained"));
    }

    #[test]
    fn test_collinear_samples_collapse_one_axis() {
        let input = ResourceGridInput {
            samples: vec![
                sample(dec!(5), dec!(0), dec!(1)),
                sample(dec!(5), dec!(10), dec!(9)),
            ],
            resolution: 4,
            power: dec!(2),
        };
        let result = estimate_resource_grid(&input).unwrap();
        let grid = &result.result;

        assert_eq!(grid.nx, 1, "All samples share x = 5");
        assert_eq!(grid.ny, 4);
        assert_eq!(grid.min_x, dec!(5));
        assert_eq!(grid.max_x, dec!(5));
    }

    #[test]
    fn test_validation_rejects_empty_samples() {
        let input = ResourceGridInput {
            samples: vec![],
            resolution: 10,
            power: dec!(2),
        };
        let result = estimate_resource_grid(&input);

        match result.unwrap_err() {
            MineEconError::InsufficientData(msg) => {
                assert!(msg.contains("at least one grid sample"));
            }
            other => panic!("Expected InsufficientData, got: {other:?}"),
        }
    }

    #[test]
    fn test_validation_rejects_degenerate_resolution() {
        let mut input = diagonal_input();
        input.resolution = 1;
        let result = estimate_resource_grid(&input);

        match result.unwrap_err() {
            MineEconError::InvalidAssumptions { field, .. } => {
                assert_eq!(field, "resolution");
            }
            other => panic!("Expected InvalidAssumptions, got: {other:?}"),
        }
    }

    #[test]
    fn test_validation_rejects_nonpositive_power() {
        let mut input = diagonal_input();
        input.power = dec!(0);
        let result = estimate_resource_grid(&input);

        match result.unwrap_err() {
            MineEconError::InvalidAssumptions { field, .. } => {
                assert_eq!(field, "power");
            }
            other => panic!("Expected InvalidAssumptions, got: {other:?}"),
        }
    }

    #[test]
    fn test_input_defaults_apply_when_fields_omitted() {
        let json = serde_json::json!({
            "samples": [
                { "x": "0", "y": "0", "value": "1.5" },
                { "x": "2", "y": "2", "value": "3.5" }
            ]
        });
        let parsed: ResourceGridInput = serde_json::from_value(json).unwrap();

        assert_eq!(parsed.resolution, DEFAULT_GRID_RESOLUTION);
        assert_eq!(parsed.power, DEFAULT_IDW_POWER);
    }

    #[test]
    fn test_envelope_names_the_method() {
        let result = estimate_resource_grid(&diagonal_input()).unwrap();
        assert!(result.methodology.contains("Inverse Distance Weighting"));
    }
}
