//! Loan terms as entered by the borrower and the figures derived from them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HomeLoanError;
use crate::types::{Money, Months, Rate};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_DOWN_PAYMENT_PCT: Decimal = dec!(0);
pub const MAX_DOWN_PAYMENT_PCT: Decimal = dec!(80);
pub const MAX_ANNUAL_RATE_PCT: Decimal = dec!(30);
pub const MIN_TERM_YEARS: u32 = 1;
pub const MAX_TERM_YEARS: u32 = 30;

/// Smallest home value the input form offers. The engine accepts lower
/// values but flags them.
pub const DISPLAY_MIN_HOME_VALUE: Money = dec!(10_000_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Purchase price of the home.
    pub home_value: Money,
    /// Share of the home value paid up front, in percent (30 = 30%).
    pub down_payment_pct: Decimal,
    /// Annual nominal interest rate, in percent (12.0 = 12%).
    pub annual_rate_pct: Decimal,
    pub term_years: u32,
}

impl Default for LoanParameters {
    fn default() -> Self {
        LoanParameters {
            home_value: dec!(300_000_000),
            down_payment_pct: dec!(30),
            annual_rate_pct: dec!(12),
            term_years: 20,
        }
    }
}

impl LoanParameters {
    pub fn down_payment(&self) -> Money {
        self.home_value * self.down_payment_pct / Decimal::ONE_HUNDRED
    }

    /// Amount financed: home value less the down payment.
    pub fn principal(&self) -> Money {
        self.home_value - self.down_payment()
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_pct / dec!(12) / Decimal::ONE_HUNDRED
    }

    pub fn total_months(&self) -> Months {
        self.term_years * 12
    }

    pub fn validate(&self) -> HomeLoanResult<()> {
        if self.home_value < Decimal::ZERO {
            return Err(HomeLoanError::InvalidInput {
                field: "home_value".into(),
                reason: "Home value cannot be negative".into(),
            });
        }
        if self.down_payment_pct < MIN_DOWN_PAYMENT_PCT
            || self.down_payment_pct > MAX_DOWN_PAYMENT_PCT
        {
            return Err(HomeLoanError::InvalidInput {
                field: "down_payment_pct".into(),
                reason: format!(
                    "Down payment must be between {MIN_DOWN_PAYMENT_PCT}% and {MAX_DOWN_PAYMENT_PCT}%"
                ),
            });
        }
        if self.annual_rate_pct < Decimal::ZERO || self.annual_rate_pct > MAX_ANNUAL_RATE_PCT {
            return Err(HomeLoanError::InvalidInput {
                field: "annual_rate_pct".into(),
                reason: format!("Annual rate must be between 0% and {MAX_ANNUAL_RATE_PCT}%"),
            });
        }
        if self.term_years < MIN_TERM_YEARS || self.term_years > MAX_TERM_YEARS {
            return Err(HomeLoanError::InvalidInput {
                field: "term_years".into(),
                reason: format!(
                    "Term must be between {MIN_TERM_YEARS} and {MAX_TERM_YEARS} years"
                ),
            });
        }
        Ok(())
    }
}
