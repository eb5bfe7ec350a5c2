use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::MineEconError;
use crate::types::{Money, Rate};
use crate::MineEconResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;

/// Plausible per-period IRR search range: -99% to +1000%.
const IRR_LOWER_BOUND: Decimal = dec!(-0.99);
const IRR_UPPER_BOUND: Decimal = dec!(10.0);

/// Net Present Value of a series of cash flows
pub fn npv(rate: Rate, cash_flows: &[Money]) -> MineEconResult<Money> {
    if rate <= dec!(-1) {
        return Err(MineEconError::InvalidAssumptions {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            // Once the factor saturates, the remaining terms are below
            // representable precision.
            discount = match discount.checked_mul(one_plus_r) {
                Some(d) => d,
                None => break,
            };
        }
        if discount.is_zero() {
            return Err(MineEconError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        result += cf / discount;
    }

    Ok(result)
}

/// Internal Rate of Return: the rate at which the NPV of the cash flows
/// is zero. Newton-Raphson from `guess`, with a bisection fallback over
/// the bounded rate range when Newton fails to converge.
///
/// A sequence whose flows never change sign has no IRR and reports
/// `FinancialImpossibility`; exhausting the bounded search reports
/// `ConvergenceFailure`. Both are expected outcomes for callers that
/// surface IRR as an optional result.
pub fn irr(cash_flows: &[Money], guess: Rate) -> MineEconResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(MineEconError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let has_inflow = cash_flows.iter().any(|cf| *cf > Decimal::ZERO);
    let has_outflow = cash_flows.iter().any(|cf| *cf < Decimal::ZERO);
    if !has_inflow || !has_outflow {
        return Err(MineEconError::FinancialImpossibility(
            "cash flows never change sign, so no IRR exists".into(),
        ));
    }

    let mut rate = clamp_rate(guess);

    for _ in 0..MAX_IRR_ITERATIONS {
        let (npv_val, dnpv) = match npv_and_derivative(cash_flows, rate) {
            Some(pair) => pair,
            None => break,
        };

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        if dnpv.is_zero() {
            break;
        }

        let step = match npv_val.checked_div(dnpv) {
            Some(s) => s,
            None => break,
        };
        rate = clamp_rate(rate - step);
    }

    bisect_irr(cash_flows)
}

fn clamp_rate(rate: Rate) -> Rate {
    if rate < IRR_LOWER_BOUND {
        IRR_LOWER_BOUND
    } else if rate > IRR_UPPER_BOUND {
        IRR_UPPER_BOUND
    } else {
        rate
    }
}

/// NPV(r) = sum CF_t / (1+r)^t and its derivative d(NPV)/dr, in one pass.
/// Returns None when the terms leave Decimal range at this rate, which
/// happens only near the -100% edge of the search range.
fn npv_and_derivative(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }

    let mut npv_val = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE; // (1+r)^-t

    for (t, cf) in cash_flows.iter().enumerate() {
        npv_val = npv_val.checked_add(cf.checked_mul(discount)?)?;
        if t > 0 {
            // d/dr of CF_t / (1+r)^t = -t * CF_t / (1+r)^(t+1)
            let slope = Decimal::from(-(t as i64))
                .checked_mul(*cf)?
                .checked_mul(discount)?
                .checked_div(one_plus_r)?;
            dnpv = dnpv.checked_add(slope)?;
        }
        discount = discount.checked_div(one_plus_r)?;
    }

    Some((npv_val, dnpv))
}

/// Bisection over the bounded rate range. The NPV sign must differ at the
/// two bracket ends, otherwise no root lies within bounds.
fn bisect_irr(cash_flows: &[Money]) -> MineEconResult<Rate> {
    let mut lo = IRR_LOWER_BOUND;
    let mut hi = IRR_UPPER_BOUND;

    // The -99% edge may not be representable for long horizons; walk the
    // lower end inward, doubling its distance from -100%, until NPV is
    // evaluable there.
    let mut one_plus_lo = Decimal::ONE + lo;
    let mut npv_lo = loop {
        match npv_and_derivative(cash_flows, lo) {
            Some((v, _)) => break v,
            None => {
                one_plus_lo *= dec!(2);
                lo = one_plus_lo - Decimal::ONE;
                if lo >= hi {
                    return Err(convergence_failure(0, Decimal::ZERO));
                }
            }
        }
    };

    let npv_hi = match npv_and_derivative(cash_flows, hi) {
        Some((v, _)) => v,
        None => return Err(convergence_failure(0, Decimal::ZERO)),
    };

    if npv_lo.abs() < CONVERGENCE_THRESHOLD {
        return Ok(lo);
    }
    if npv_hi.abs() < CONVERGENCE_THRESHOLD {
        return Ok(hi);
    }
    if npv_lo.is_sign_positive() == npv_hi.is_sign_positive() {
        return Err(convergence_failure(0, npv_lo));
    }

    let mut last_delta = npv_lo;

    for i in 0..MAX_IRR_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        let npv_mid = match npv_and_derivative(cash_flows, mid) {
            Some((v, _)) => v,
            None => return Err(convergence_failure(i, last_delta)),
        };

        if npv_mid.abs() < CONVERGENCE_THRESHOLD {
            return Ok(mid);
        }

        if npv_mid.is_sign_positive() == npv_lo.is_sign_positive() {
            lo = mid;
            npv_lo = npv_mid;
        } else {
            hi = mid;
        }
        last_delta = npv_mid;
    }

    Err(convergence_failure(MAX_IRR_ITERATIONS, last_delta))
}

fn convergence_failure(iterations: u32, last_delta: Decimal) -> MineEconError {
    MineEconError::ConvergenceFailure {
        function: "IRR".into(),
        iterations,
        last_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_npv_basic() {
        let cfs = vec![dec!(-1000), dec!(300), dec!(400), dec!(500)];
        let result = npv(dec!(0.10), &cfs).unwrap();
        // NPV at 10%: -1000 + 300/1.1 + 400/1.21 + 500/1.331 ≈ -21.04
        assert!((result - dec!(-21.04)).abs() < dec!(1.0));
    }

    #[test]
    fn test_npv_zero_rate() {
        let cfs = vec![dec!(-100), dec!(50), dec!(50), dec!(50)];
        let result = npv(dec!(0.0), &cfs).unwrap();
        assert_eq!(result, dec!(50));
    }

    #[test]
    fn test_npv_rejects_rate_at_or_below_minus_one() {
        let cfs = vec![dec!(-100), dec!(50)];
        let err = npv(dec!(-1), &cfs).unwrap_err();
        match err {
            MineEconError::InvalidAssumptions { field, .. } => assert_eq!(field, "rate"),
            other => panic!("Expected InvalidAssumptions, got: {other:?}"),
        }
    }

    #[test]
    fn test_irr_basic() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = irr(&cfs, dec!(0.10)).unwrap();
        // IRR should be ~9.7%
        assert!((result - dec!(0.097)).abs() < dec!(0.01));
    }

    #[test]
    fn test_irr_roundtrip_npv_is_zero() {
        let cfs = vec![dec!(-10000), dec!(3000), dec!(4200), dec!(6800)];
        let rate = irr(&cfs, dec!(0.10)).unwrap();
        let residual = npv(rate, &cfs).unwrap();
        assert!(
            residual.abs() < dec!(0.001),
            "NPV at IRR should be ~0, got {residual}"
        );
    }

    #[test]
    fn test_irr_negative_rate() {
        // Total inflows below the outlay: the root is deeply negative.
        // 300x^2 + 300x - 1000 = 0 with x = 1/(1+r) gives r ≈ -28.2%.
        let cfs = vec![dec!(-1000), dec!(300), dec!(300)];
        let result = irr(&cfs, dec!(0.10)).unwrap();
        assert!((result - dec!(-0.282)).abs() < dec!(0.005), "got {result}");
    }

    #[test]
    fn test_irr_all_negative_is_impossible() {
        let cfs = vec![dec!(-1000), dec!(-500), dec!(-500)];
        let err = irr(&cfs, dec!(0.10)).unwrap_err();
        assert!(matches!(err, MineEconError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_irr_all_positive_is_impossible() {
        let cfs = vec![dec!(1000), dec!(500)];
        let err = irr(&cfs, dec!(0.10)).unwrap_err();
        assert!(matches!(err, MineEconError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_irr_requires_two_flows() {
        let cfs = vec![dec!(-1000)];
        let err = irr(&cfs, dec!(0.10)).unwrap_err();
        assert!(matches!(err, MineEconError::InsufficientData(_)));
    }

    #[test]
    fn test_bisection_finds_same_root_as_newton() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let newton = irr(&cfs, dec!(0.10)).unwrap();
        let bisected = bisect_irr(&cfs).unwrap();
        assert!((newton - bisected).abs() < dec!(0.001));
    }

    #[test]
    fn test_irr_long_horizon_stays_bounded() {
        // 40 periods with a weak annuity: the search probes the -99% edge
        // without panicking and still finds the root.
        let mut cfs = vec![dec!(-100000000)];
        for _ in 0..40 {
            cfs.push(dec!(500000));
        }
        let result = irr(&cfs, dec!(0.10)).unwrap();
        let residual = npv(result, &cfs).unwrap();
        assert!(residual.abs() < dec!(0.01), "residual {residual}");
    }
}
