//! Annuity math for the French (constant-payment) amortization system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HomeLoanError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::HomeLoanResult;

/// `(1 + rate)^periods` via iterative multiplication.
pub fn compound_factor(rate: Rate, periods: u32) -> HomeLoanResult<Decimal> {
    let one_plus_r = Decimal::ONE.checked_add(rate).ok_or_else(|| {
        HomeLoanError::FinancialImpossibility(format!("rate {rate} is out of range"))
    })?;
    let mut factor = Decimal::ONE;
    for period in 0..periods {
        factor = factor.checked_mul(one_plus_r).ok_or_else(|| {
            HomeLoanError::FinancialImpossibility(format!(
                "compound factor (1 + {rate})^{periods} overflows at period {}",
                period + 1
            ))
        })?;
    }
    Ok(factor)
}

/// Constant periodic payment that repays `principal` over `periods` at
/// periodic `rate`.
///
/// payment = P · r(1+r)^n / ((1+r)^n − 1), or P / n when r = 0.
pub fn compute_payment(principal: Money, rate: Rate, periods: u32) -> HomeLoanResult<Money> {
    if periods == 0 {
        return Err(HomeLoanError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if principal < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }
    if rate < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate cannot be negative".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = compound_factor(rate, periods)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(HomeLoanError::DivisionByZero {
            context: "French payment annuity factor".into(),
        });
    }

    rate.checked_mul(factor)
        .and_then(|numerator| principal.checked_mul(numerator))
        .and_then(|scaled| scaled.checked_div(denominator))
        .ok_or_else(|| {
            HomeLoanError::FinancialImpossibility(format!(
                "payment on {principal} at {rate} over {periods} periods overflows"
            ))
        })
}

// ---------------------------------------------------------------------------
// Standalone payment quote
// ---------------------------------------------------------------------------

/// Payment-only request: a principal, an annual percentage rate and a
/// term in years.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub principal: Money,
    /// Annual nominal rate in percent (12.0 = 12%).
    pub annual_rate_pct: Decimal,
    pub term_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub monthly_rate: Rate,
    pub periods: u32,
    /// Rounded to whole currency units.
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// Quote the constant monthly payment for a loan without building a
/// schedule.
pub fn quote_payment(input: &PaymentInput) -> HomeLoanResult<ComputationOutput<PaymentQuote>> {
    let start = Instant::now();

    if input.term_years == 0 {
        return Err(HomeLoanError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least one year".into(),
        });
    }

    let monthly_rate = input.annual_rate_pct / Decimal::from(12) / Decimal::ONE_HUNDRED;
    let periods = input
        .term_years
        .checked_mul(12)
        .ok_or_else(|| HomeLoanError::InvalidInput {
            field: "term_years".into(),
            reason: "Term is too long to express in months".into(),
        })?;
    let payment = compute_payment(input.principal, monthly_rate, periods)?;
    let total_paid = payment
        .checked_mul(Decimal::from(periods))
        .ok_or_else(|| {
            HomeLoanError::FinancialImpossibility("total paid overflows".into())
        })?;

    let quote = PaymentQuote {
        monthly_rate,
        periods,
        monthly_payment: payment.round(),
        total_paid: total_paid.round(),
        total_interest: (total_paid - input.principal).round(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "French amortization constant payment",
        input,
        Vec::new(),
        elapsed,
        quote,
    ))
}
