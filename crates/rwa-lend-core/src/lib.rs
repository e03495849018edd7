pub mod display;
pub mod error;
pub mod lending;
pub mod types;

pub use error::LendingError;
pub use types::*;

/// Standard result type for all lending calculations
pub type LendingResult<T> = Result<T, LendingError>;
