use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MineEconError {
    #[error("Invalid assumptions: {field} — {reason}")]
    InvalidAssumptions { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },
}
