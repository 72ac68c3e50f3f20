pub mod amortization;
pub mod error;
pub mod time_value;
pub mod types;

pub use error::HomeLoanError;
pub use types::*;

/// Standard result type for all home-loan operations
pub type HomeLoanResult<T> = Result<T, HomeLoanError>;
