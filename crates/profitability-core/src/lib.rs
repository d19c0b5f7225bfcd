pub mod assumptions;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod policy;
pub mod portfolio;
pub mod types;
pub mod waterfall;

pub use assumptions::Assumptions;
pub use coverage::{CoverageKind, CoverageRules};
pub use error::ProfitabilityError;
pub use types::*;

/// Standard result type for all profitability operations
pub type ProfitabilityResult<T> = Result<T, ProfitabilityError>;
