pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "economics")]
pub mod project_economics;

#[cfg(feature = "resource_estimation")]
pub mod resource_estimation;

#[cfg(feature = "esg")]
pub mod esg;

#[cfg(feature = "districts")]
pub mod districts;

#[cfg(feature = "screening")]
pub mod screening;

pub use error::MineEconError;
pub use types::*;

/// Standard result type for all mine-econ operations
pub type MineEconResult<T> = Result<T, MineEconError>;
