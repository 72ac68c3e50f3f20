//! Extraordinary (out-of-schedule) payments applied straight to principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HomeLoanError;
use crate::types::{Money, Months};
use crate::HomeLoanResult;

/// How often the extra payment recurs once it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    OneTime,
    EverySixMonths,
    EveryTwelveMonths,
}

impl Recurrence {
    /// Whether an extra payment falls due in `month` for a policy starting
    /// at `start_month`.
    pub fn is_due(self, month: Months, start_month: Months) -> bool {
        if month < start_month {
            return false;
        }
        let elapsed = month - start_month;
        match self {
            Recurrence::OneTime => elapsed == 0,
            Recurrence::EverySixMonths => elapsed % 6 == 0,
            Recurrence::EveryTwelveMonths => elapsed % 12 == 0,
        }
    }
}

/// What the borrower gets back for prepaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationMode {
    /// Keep the payment; the loan finishes earlier.
    ShortenTerm,
    /// Keep the horizon; re-amortize the balance into a lower payment.
    ReducePayment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentPolicy {
    pub amount: Money,
    pub recurrence: Recurrence,
    /// First month (1-based) in which the extra payment is made.
    pub start_month: Months,
    pub mode: ApplicationMode,
}

impl PrepaymentPolicy {
    /// A zero amount never produces an extra payment.
    pub fn is_active(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Extra payment scheduled for `month`, before any capping against the
    /// outstanding balance.
    pub fn extra_for_month(&self, month: Months) -> Money {
        if self.is_active() && self.recurrence.is_due(month, self.start_month) {
            self.amount
        } else {
            Decimal::ZERO
        }
    }

    pub fn validate(&self, total_months: Months) -> HomeLoanResult<()> {
        if self.amount < Decimal::ZERO {
            return Err(HomeLoanError::InvalidInput {
                field: "prepayment.amount".into(),
                reason: "Prepayment amount cannot be negative".into(),
            });
        }
        if self.start_month == 0 || self.start_month > total_months {
            return Err(HomeLoanError::InvalidInput {
                field: "prepayment.start_month".into(),
                reason: format!("Start month must be between 1 and {total_months}"),
            });
        }
        Ok(())
    }
}
