use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MineEconError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MineEconResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Flat single-asset mining project assumptions. Production, costs, and
/// price are held constant over the whole horizon (no ramp-up, no price
/// curve).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAssumptions {
    /// Ore tonnage to be mined over the project life (tons)
    pub tonnage: Decimal,
    /// Ore grade: percent when `grade_is_percent`, otherwise mass per ton
    /// (e.g. grams per ton)
    pub grade: Decimal,
    /// Grade unit mode: true for percent grades (base metals), false for
    /// mass-per-ton grades (precious metals)
    pub grade_is_percent: bool,
    /// Divisor converting mass-per-ton grade into saleable units
    /// (e.g. 31.1035 grams per troy ounce). Used only when
    /// `grade_is_percent` is false.
    pub unit_conversion_factor: Decimal,
    /// Metallurgical recovery (0-100)
    pub recovery_rate_percent: Percent,
    /// Price per saleable unit (per ton for percent grades, per ounce for
    /// mass grades)
    pub metal_price_per_unit: Money,
    /// Mining and processing cost per ton of ore
    pub operating_cost_per_ton: Money,
    /// Environmental cost per ton of ore
    pub environmental_cost_per_ton: Money,
    /// Social / community cost per ton of ore
    pub social_cost_per_ton: Money,
    /// Governance / compliance cost per ton of ore
    pub governance_cost_per_ton: Money,
    /// Up-front development capital at year 0
    pub initial_capex: Money,
    /// Sustaining capital per operating year
    pub annual_sustaining_capex: Money,
    /// Royalty on gross revenue (0-100)
    pub royalty_rate_percent: Percent,
    /// Tax on positive EBITDA (0-100)
    pub tax_rate_percent: Percent,
    /// Discount rate for NPV (0-100)
    pub discount_rate_percent: Percent,
    /// Operating horizon in years
    pub project_life_years: u32,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Derived project economics. Recomputed fully on each evaluation; all
/// "annual" figures are constant across every year of the horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEconomics {
    /// Metal contained in the ore body (saleable units)
    pub contained_metal: Decimal,
    /// Contained metal expected to be extracted after processing losses
    pub recoverable_metal: Decimal,
    /// Recoverable metal produced per year
    pub annual_production: Decimal,
    /// Gross revenue per year
    pub annual_revenue: Money,
    /// Royalty paid per year
    pub annual_royalty: Money,
    /// Operating cost per year, ESG per-ton costs included
    pub annual_operating_cost: Money,
    /// EBITDA per year (revenue - royalty - operating cost - sustaining capex)
    pub annual_ebitda: Money,
    /// Tax per year (zero when EBITDA is not positive)
    pub annual_tax: Money,
    /// Free cash flow per year (EBITDA - tax)
    pub annual_free_cash_flow: Money,
    /// Net present value at the given discount rate
    pub npv: Money,
    /// Internal rate of return in percent. None when the cash flows admit
    /// no rate (all flows the same sign) or the search does not converge.
    pub irr: Option<Percent>,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Evaluate the economics of a single-asset mining project under a flat
/// annuity model.
///
/// Computes containment and recovery from tonnage and grade, builds annual
/// revenue, royalty, cost (including ESG per-ton add-ons), EBITDA, tax,
/// and free cash flow, then discounts the resulting cash-flow sequence
/// for NPV and solves it for IRR.
///
/// IRR is an optional result: a project whose flows never change sign has
/// no IRR, and a bounded root search that fails to converge reports none.
/// Both outcomes carry a warning in the output envelope.
pub fn calculate_project_economics(
    assumptions: &ProjectAssumptions,
) -> MineEconResult<ComputationOutput<ProjectEconomics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // ── Validation ───────────────────────────────────────────────────
    validate_assumptions(assumptions)?;

    let years = Decimal::from(assumptions.project_life_years);

    // ── Containment and recovery ─────────────────────────────────────
    let esg_cost_per_ton = assumptions.environmental_cost_per_ton
        + assumptions.social_cost_per_ton
        + assumptions.governance_cost_per_ton;
    let total_op_cost_per_ton = assumptions.operating_cost_per_ton + esg_cost_per_ton;

    let contained_metal = if assumptions.grade_is_percent {
        assumptions.tonnage * (assumptions.grade / dec!(100))
    } else {
        assumptions.tonnage * (assumptions.grade / assumptions.unit_conversion_factor)
    };
    let recoverable_metal = contained_metal * (assumptions.recovery_rate_percent / dec!(100));

    // ── Annual figures (flat across the horizon) ─────────────────────
    let annual_production = recoverable_metal / years;
    let annual_revenue = annual_production * assumptions.metal_price_per_unit;
    let annual_royalty = annual_revenue * (assumptions.royalty_rate_percent / dec!(100));
    let annual_operating_cost = (assumptions.tonnage / years) * total_op_cost_per_ton;

    let annual_ebitda = annual_revenue
        - annual_royalty
        - annual_operating_cost
        - assumptions.annual_sustaining_capex;

    // Tax floor at zero: no loss carry-back or carry-forward modeled
    let annual_tax = (annual_ebitda * (assumptions.tax_rate_percent / dec!(100)))
        .max(Decimal::ZERO);
    let annual_free_cash_flow = annual_ebitda - annual_tax;

    // ── Discounted cash flows ────────────────────────────────────────
    let mut cash_flows: Vec<Money> =
        Vec::with_capacity(assumptions.project_life_years as usize + 1);
    cash_flows.push(-assumptions.initial_capex);
    for _ in 0..assumptions.project_life_years {
        cash_flows.push(annual_free_cash_flow);
    }

    let discount_rate = assumptions.discount_rate_percent / dec!(100);
    let npv = crate::time_value::npv(discount_rate, &cash_flows)?;

    let irr = match crate::time_value::irr(&cash_flows, dec!(0.10)) {
        Ok(rate) => Some(rate * dec!(100)),
        Err(e) => {
            warnings.push(format!("IRR is undefined for these cash flows: {e}"));
            None
        }
    };

    // ── Warnings ─────────────────────────────────────────────────────
    if annual_ebitda <= Decimal::ZERO {
        warnings.push(format!(
            "Annual EBITDA of {annual_ebitda} is not positive — operating costs exceed net revenue"
        ));
    }
    if npv < Decimal::ZERO {
        warnings.push(format!(
            "NPV of {npv} is negative at a {}% discount rate",
            assumptions.discount_rate_percent
        ));
    }

    let output = ProjectEconomics {
        contained_metal,
        recoverable_metal,
        annual_production,
        annual_revenue,
        annual_royalty,
        annual_operating_cost,
        annual_ebitda,
        annual_tax,
        annual_free_cash_flow,
        npv,
        irr,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Mining Project Economics (Flat Annuity DCF)",
        &serde_json::json!({
            "tonnage": assumptions.tonnage.to_string(),
            "grade": assumptions.grade.to_string(),
            "grade_is_percent": assumptions.grade_is_percent,
            "recovery_rate_percent": assumptions.recovery_rate_percent.to_string(),
            "metal_price_per_unit": assumptions.metal_price_per_unit.to_string(),
            "initial_capex": assumptions.initial_capex.to_string(),
            "discount_rate_percent": assumptions.discount_rate_percent.to_string(),
            "project_life_years": assumptions.project_life_years,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate all input constraints, naming the offending field.
fn validate_assumptions(a: &ProjectAssumptions) -> MineEconResult<()> {
    if a.tonnage < Decimal::ZERO {
        return Err(invalid("tonnage", "Tonnage cannot be negative"));
    }
    if !a.grade_is_percent && a.unit_conversion_factor <= Decimal::ZERO {
        return Err(invalid(
            "unit_conversion_factor",
            "Unit conversion factor must be positive for mass-per-ton grades",
        ));
    }
    if a.recovery_rate_percent < Decimal::ZERO || a.recovery_rate_percent > dec!(100) {
        return Err(invalid(
            "recovery_rate_percent",
            "Recovery rate must be between 0 and 100",
        ));
    }
    if a.metal_price_per_unit < Decimal::ZERO {
        return Err(invalid(
            "metal_price_per_unit",
            "Metal price cannot be negative",
        ));
    }
    if a.operating_cost_per_ton < Decimal::ZERO {
        return Err(invalid(
            "operating_cost_per_ton",
            "Operating cost cannot be negative",
        ));
    }
    if a.environmental_cost_per_ton < Decimal::ZERO {
        return Err(invalid(
            "environmental_cost_per_ton",
            "Environmental cost cannot be negative",
        ));
    }
    if a.social_cost_per_ton < Decimal::ZERO {
        return Err(invalid(
            "social_cost_per_ton",
            "Social cost cannot be negative",
        ));
    }
    if a.governance_cost_per_ton < Decimal::ZERO {
        return Err(invalid(
            "governance_cost_per_ton",
            "Governance cost cannot be negative",
        ));
    }
    if a.initial_capex < Decimal::ZERO {
        return Err(invalid("initial_capex", "Initial capex cannot be negative"));
    }
    if a.annual_sustaining_capex < Decimal::ZERO {
        return Err(invalid(
            "annual_sustaining_capex",
            "Sustaining capex cannot be negative",
        ));
    }
    if a.royalty_rate_percent < Decimal::ZERO {
        return Err(invalid(
            "royalty_rate_percent",
            "Royalty rate cannot be negative",
        ));
    }
    if a.tax_rate_percent < Decimal::ZERO {
        return Err(invalid("tax_rate_percent", "Tax rate cannot be negative"));
    }
    if a.discount_rate_percent < Decimal::ZERO {
        return Err(invalid(
            "discount_rate_percent",
            "Discount rate cannot be negative",
        ));
    }
    if a.project_life_years < 1 {
        return Err(invalid(
            "project_life_years",
            "Project life must be at least 1 year",
        ));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> MineEconError {
    MineEconError::InvalidAssumptions {
        field: field.into(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Helper: marginal gold project with mass-per-ton grade (g/t over
    /// troy-ounce conversion).
    fn gold_project_assumptions() -> ProjectAssumptions {
        ProjectAssumptions {
            tonnage: dec!(1_000_000),
            grade: dec!(1.0),
            grade_is_percent: false,
            unit_conversion_factor: dec!(31.1035),
            recovery_rate_percent: dec!(90),
            metal_price_per_unit: dec!(2000),
            operating_cost_per_ton: dec!(50),
            environmental_cost_per_ton: dec!(5),
            social_cost_per_ton: dec!(3),
            governance_cost_per_ton: dec!(2),
            initial_capex: dec!(100_000_000),
            annual_sustaining_capex: dec!(5_000_000),
            royalty_rate_percent: dec!(2.5),
            tax_rate_percent: dec!(25),
            discount_rate_percent: dec!(10),
            project_life_years: 10,
        }
    }

    /// Helper: profitable open-pit project with a percent grade, sized so
    /// the IRR is well-defined.
    fn copper_project_assumptions() -> ProjectAssumptions {
        ProjectAssumptions {
            tonnage: dec!(1_000_000),
            grade: dec!(1.0),
            grade_is_percent: true,
            unit_conversion_factor: dec!(31.1035),
            recovery_rate_percent: dec!(85),
            metal_price_per_unit: dec!(9000),
            operating_cost_per_ton: dec!(40),
            environmental_cost_per_ton: dec!(2),
            social_cost_per_ton: dec!(1),
            governance_cost_per_ton: dec!(1),
            initial_capex: dec!(10_000_000),
            annual_sustaining_capex: dec!(500_000),
            royalty_rate_percent: dec!(3),
            tax_rate_percent: dec!(30),
            discount_rate_percent: dec!(8),
            project_life_years: 8,
        }
    }

    #[test]
    fn test_containment_mass_grade() {
        let result = calculate_project_economics(&gold_project_assumptions()).unwrap();
        let out = &result.result;

        // 1,000,000 t at 1.0 g/t over 31.1035 g/oz ≈ 32,150.72 oz
        assert!(
            (out.contained_metal - dec!(32150.72)).abs() < dec!(0.01),
            "contained {}",
            out.contained_metal
        );
        // 90% recovery ≈ 28,935.65 oz
        assert!(
            (out.recoverable_metal - dec!(28935.65)).abs() < dec!(0.01),
            "recoverable {}",
            out.recoverable_metal
        );
    }

    #[test]
    fn test_containment_percent_grade() {
        let result = calculate_project_economics(&copper_project_assumptions()).unwrap();
        let out = &result.result;

        // 1,000,000 t at 1.0% = 10,000 t of metal
        assert_eq!(out.contained_metal, dec!(10000));
        assert_eq!(out.recoverable_metal, dec!(8500));
    }

    #[test]
    fn test_recoverable_never_exceeds_contained() {
        let result = calculate_project_economics(&gold_project_assumptions()).unwrap();
        let out = &result.result;
        assert!(out.recoverable_metal <= out.contained_metal);
    }

    #[test]
    fn test_marginal_gold_project_full_statement() {
        let result = calculate_project_economics(&gold_project_assumptions()).unwrap();
        let out = &result.result;

        // 28,935.65 oz over 10 years at $2,000/oz
        assert!((out.annual_production - dec!(2893.565)).abs() < dec!(0.001));
        assert!((out.annual_revenue - dec!(5787130.07)).abs() < dec!(0.01));
        assert!((out.annual_royalty - dec!(144678.25)).abs() < dec!(0.01));
        // 100,000 t/yr at $60/t all-in
        assert_eq!(out.annual_operating_cost, dec!(6_000_000));
        // Revenue does not cover costs: negative EBITDA, zero tax
        assert!((out.annual_ebitda - dec!(-5357548.18)).abs() < dec!(1.0));
        assert_eq!(out.annual_tax, Decimal::ZERO);
        assert_eq!(out.annual_free_cash_flow, out.annual_ebitda);

        // NPV ≈ -100M - 5.36M × 6.1446 ≈ -132.9M
        assert!(
            out.npv > dec!(-134_000_000) && out.npv < dec!(-132_000_000),
            "npv {}",
            out.npv
        );

        // Every cash flow is negative: no IRR exists
        assert!(out.irr.is_none());
        assert!(
            result.warnings.iter().any(|w| w.contains("IRR is undefined")),
            "expected an IRR warning, got {:?}",
            result.warnings
        );
    }

    #[test]
    fn test_profitable_project_has_defined_irr() {
        let result = calculate_project_economics(&copper_project_assumptions()).unwrap();
        let out = &result.result;

        // Revenue 9.5625M, royalty 286,875, opex 5.5M, sustaining 0.5M
        assert_eq!(out.annual_ebitda, dec!(3275625));
        assert_eq!(out.annual_tax, dec!(982687.5));
        assert_eq!(out.annual_free_cash_flow, dec!(2292937.5));

        let irr = out.irr.unwrap();
        assert!(
            irr > dec!(15) && irr < dec!(17),
            "IRR should be ~15.9%, got {irr}"
        );
        assert!(out.npv > Decimal::ZERO, "npv {}", out.npv);
    }

    #[test]
    fn test_irr_roundtrip_zeroes_npv() {
        let a = copper_project_assumptions();
        let result = calculate_project_economics(&a).unwrap();
        let irr = result.result.irr.unwrap();

        let mut cash_flows = vec![-a.initial_capex];
        for _ in 0..a.project_life_years {
            cash_flows.push(result.result.annual_free_cash_flow);
        }
        let residual = crate::time_value::npv(irr / dec!(100), &cash_flows).unwrap();
        assert!(
            residual.abs() < dec!(0.001),
            "NPV at IRR should be ~0, got {residual}"
        );
    }

    #[test]
    fn test_zero_discount_rate_identity() {
        let mut a = copper_project_assumptions();
        a.discount_rate_percent = Decimal::ZERO;

        let result = calculate_project_economics(&a).unwrap();
        let out = &result.result;

        let expected = -a.initial_capex
            + Decimal::from(a.project_life_years) * out.annual_free_cash_flow;
        assert_eq!(out.npv, expected);
    }

    #[test]
    fn test_revenue_and_cost_scale_with_tonnage() {
        let a1 = copper_project_assumptions();
        let mut a2 = copper_project_assumptions();
        a2.tonnage = a1.tonnage * dec!(2);

        let r1 = calculate_project_economics(&a1).unwrap().result;
        let r2 = calculate_project_economics(&a2).unwrap().result;

        assert!((r2.annual_revenue - r1.annual_revenue * dec!(2)).abs() < dec!(0.01));
        assert!(
            (r2.annual_operating_cost - r1.annual_operating_cost * dec!(2)).abs() < dec!(0.01)
        );
    }

    #[test]
    fn test_esg_costs_fold_into_operating_cost() {
        let with_esg = copper_project_assumptions();
        let mut without_esg = copper_project_assumptions();
        without_esg.environmental_cost_per_ton = Decimal::ZERO;
        without_esg.social_cost_per_ton = Decimal::ZERO;
        without_esg.governance_cost_per_ton = Decimal::ZERO;

        let r_with = calculate_project_economics(&with_esg).unwrap().result;
        let r_without = calculate_project_economics(&without_esg).unwrap().result;

        // $4/t of ESG cost on 125,000 t/yr
        assert_eq!(
            r_with.annual_operating_cost - r_without.annual_operating_cost,
            dec!(500_000)
        );
    }

    #[test]
    fn test_tax_floor_at_zero() {
        let mut a = copper_project_assumptions();
        // Price low enough that EBITDA goes negative
        a.metal_price_per_unit = dec!(1000);

        let result = calculate_project_economics(&a).unwrap();
        let out = &result.result;

        assert!(out.annual_ebitda < Decimal::ZERO);
        assert_eq!(out.annual_tax, Decimal::ZERO);
        assert_eq!(out.annual_free_cash_flow, out.annual_ebitda);
    }

    #[test]
    fn test_single_year_project() {
        let mut a = copper_project_assumptions();
        a.project_life_years = 1;

        let result = calculate_project_economics(&a).unwrap();
        let out = &result.result;

        // One year: annual production is the full recoverable metal
        assert_eq!(out.annual_production, out.recoverable_metal);
        // NPV = -capex + fcf / 1.08
        let expected = -a.initial_capex + out.annual_free_cash_flow / dec!(1.08);
        assert!((out.npv - expected).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_tonnage_is_valid() {
        let mut a = copper_project_assumptions();
        a.tonnage = Decimal::ZERO;

        let result = calculate_project_economics(&a).unwrap();
        let out = &result.result;

        assert_eq!(out.contained_metal, Decimal::ZERO);
        assert_eq!(out.annual_revenue, Decimal::ZERO);
        // Pure capex sink: every flow is non-positive, IRR undefined
        assert!(out.irr.is_none());
    }

    #[test]
    fn test_validation_negative_tonnage() {
        let mut a = gold_project_assumptions();
        a.tonnage = dec!(-1);

        match calculate_project_economics(&a).unwrap_err() {
            MineEconError::InvalidAssumptions { field, .. } => assert_eq!(field, "tonnage"),
            other => panic!("Expected InvalidAssumptions, got: {other:?}"),
        }
    }

    #[test]
    fn test_validation_recovery_above_100() {
        let mut a = gold_project_assumptions();
        a.recovery_rate_percent = dec!(150);

        match calculate_project_economics(&a).unwrap_err() {
            MineEconError::InvalidAssumptions { field, .. } => {
                assert_eq!(field, "recovery_rate_percent");
            }
            other => panic!("Expected InvalidAssumptions, got: {other:?}"),
        }
    }

    #[test]
    fn test_validation_zero_conversion_factor() {
        let mut a = gold_project_assumptions();
        a.unit_conversion_factor = Decimal::ZERO;

        match calculate_project_economics(&a).unwrap_err() {
            MineEconError::InvalidAssumptions { field, .. } => {
                assert_eq!(field, "unit_conversion_factor");
            }
            other => panic!("Expected InvalidAssumptions, got: {other:?}"),
        }
    }

    #[test]
    fn test_conversion_factor_ignored_for_percent_grades() {
        let mut a = copper_project_assumptions();
        a.unit_conversion_factor = Decimal::ZERO;

        // Percent mode never divides by the conversion factor
        let result = calculate_project_economics(&a);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validation_zero_project_life() {
        let mut a = gold_project_assumptions();
        a.project_life_years = 0;

        match calculate_project_economics(&a).unwrap_err() {
            MineEconError::InvalidAssumptions { field, .. } => {
                assert_eq!(field, "project_life_years");
            }
            other => panic!("Expected InvalidAssumptions, got: {other:?}"),
        }
    }

    #[test]
    fn test_validation_negative_price() {
        let mut a = gold_project_assumptions();
        a.metal_price_per_unit = dec!(-100);

        match calculate_project_economics(&a).unwrap_err() {
            MineEconError::InvalidAssumptions { field, .. } => {
                assert_eq!(field, "metal_price_per_unit");
            }
            other => panic!("Expected InvalidAssumptions, got: {other:?}"),
        }
    }

    #[test]
    fn test_validation_negative_esg_cost() {
        let mut a = gold_project_assumptions();
        a.environmental_cost_per_ton = dec!(-5);

        match calculate_project_economics(&a).unwrap_err() {
            MineEconError::InvalidAssumptions { field, .. } => {
                assert_eq!(field, "environmental_cost_per_ton");
            }
            other => panic!("Expected InvalidAssumptions, got: {other:?}"),
        }
    }

    #[test]
    fn test_output_serializes_undefined_irr_as_null() {
        let result = calculate_project_economics(&gold_project_assumptions()).unwrap();
        let json = serde_json::to_value(&result.result).unwrap();
        assert!(json.get("irr").unwrap().is_null());
    }
}
