//! Month-by-month ledger of a French-system loan.
//!
//! The ledger is produced by repeatedly advancing an immutable
//! `AmortizationState`; each step yields the next state and the record
//! for the month just closed. Interest always accrues on the opening
//! balance and the principal portion is split from the payment in force
//! at month start. A due extra payment comes off the balance before that
//! principal portion; in reduce-payment mode it also re-amortizes the
//! remainder over the originally scheduled horizon, and the new payment
//! is the one recorded for the month and carried forward.

use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::prepayment::{ApplicationMode, PrepaymentPolicy};
use crate::error::HomeLoanError;
use crate::time_value::compute_payment;
use crate::types::{Money, Months, Rate};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Hard stop for schedules whose payment never outruns the interest.
pub const MAX_SCHEDULE_MONTHS: Months = 1000;

/// Balance below which the loan is considered fully paid.
const BALANCE_EPSILON: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One simulated month. Amounts are rounded to whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub month: Months,
    pub payment: Money,
    pub interest: Money,
    /// Regular amortization of principal (payment less interest).
    pub principal: Money,
    pub extra_payment: Money,
    /// Outstanding balance at month end, never negative.
    pub balance: Money,
}

/// Ordered ledger, month 1 first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub periods: Vec<PeriodRecord>,
}

impl Schedule {
    /// Regular payments plus extra payments, summed from rounded rows.
    pub fn total_paid(&self) -> Money {
        self.periods
            .iter()
            .map(|p| p.payment + p.extra_payment)
            .sum()
    }

    pub fn total_interest(&self) -> Money {
        self.periods.iter().map(|p| p.interest).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.periods.iter().map(|p| p.principal).sum()
    }

    pub fn total_extra(&self) -> Money {
        self.periods.iter().map(|p| p.extra_payment).sum()
    }

    pub fn duration_months(&self) -> Months {
        self.periods.len() as Months
    }

    pub fn final_balance(&self) -> Money {
        self.periods
            .last()
            .map(|p| p.balance)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn final_payment(&self) -> Option<Money> {
        self.periods.last().map(|p| p.payment)
    }

    pub fn is_fully_amortized(&self) -> bool {
        self.final_balance().is_zero()
    }

    /// True when the run stopped at [`MAX_SCHEDULE_MONTHS`] with money
    /// still owed.
    pub fn hit_safety_cap(&self) -> bool {
        self.duration_months() >= MAX_SCHEDULE_MONTHS && !self.is_fully_amortized()
    }

    /// First month in which an extra payment was applied.
    pub fn first_extra_month(&self) -> Option<Months> {
        self.periods
            .iter()
            .find(|p| p.extra_payment > Decimal::ZERO)
            .map(|p| p.month)
    }
}

// ---------------------------------------------------------------------------
// State transition
// ---------------------------------------------------------------------------

struct LoanTerms {
    monthly_rate: Rate,
    total_months: Months,
}

#[derive(Debug, Clone, Copy)]
struct AmortizationState {
    /// Month about to be simulated.
    month: Months,
    balance: Money,
    payment: Money,
}

impl AmortizationState {
    fn opening(principal: Money, payment: Money) -> Self {
        AmortizationState {
            month: 1,
            balance: principal,
            payment,
        }
    }

    fn is_running(&self) -> bool {
        self.balance > Decimal::ZERO && self.month <= MAX_SCHEDULE_MONTHS
    }

    fn advance(
        &self,
        terms: &LoanTerms,
        policy: Option<&PrepaymentPolicy>,
    ) -> HomeLoanResult<(AmortizationState, PeriodRecord)> {
        let month = self.month;
        let mut balance = self.balance;
        let mut payment = self.payment;

        let interest = checked(balance.checked_mul(terms.monthly_rate), month, "interest")?;
        // Split against the payment in force at month start.
        let principal = checked(payment.checked_sub(interest), month, "principal portion")?;

        let extra = policy
            .map(|p| p.extra_for_month(month))
            .unwrap_or(Decimal::ZERO)
            .min(balance);

        if extra > Decimal::ZERO {
            balance -= extra;

            let reduce = matches!(policy.map(|p| p.mode), Some(ApplicationMode::ReducePayment));
            // Anchored to the original term, not the adjusted one.
            let remaining = i64::from(terms.total_months) - i64::from(month) + 1;
            if reduce && remaining > 0 && balance > Decimal::ZERO {
                payment = compute_payment(balance, terms.monthly_rate, remaining as Months)?;
            }
        }

        balance = checked(balance.checked_sub(principal), month, "balance")?;
        if balance < BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }

        let record = PeriodRecord {
            month,
            payment: payment.round(),
            interest: interest.round(),
            principal: principal.round(),
            extra_payment: extra.round(),
            balance: balance.round(),
        };

        let next = AmortizationState {
            month: month + 1,
            balance,
            payment,
        };

        Ok((next, record))
    }
}

fn checked(value: Option<Decimal>, month: Months, what: &str) -> HomeLoanResult<Decimal> {
    value.ok_or_else(|| {
        HomeLoanError::FinancialImpossibility(format!(
            "{what} exceeds representable range at month {month}"
        ))
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate the loan month by month until the balance is repaid or
/// [`MAX_SCHEDULE_MONTHS`] is reached.
///
/// `initial_payment` is taken as given; a payment that never covers the
/// interest yields a truncated schedule rather than an error.
pub fn simulate(
    principal: Money,
    monthly_rate: Rate,
    total_months: Months,
    initial_payment: Money,
    policy: Option<&PrepaymentPolicy>,
) -> HomeLoanResult<Schedule> {
    validate_simulation(principal, monthly_rate, total_months)?;
    if let Some(p) = policy {
        p.validate(total_months)?;
    }

    let terms = LoanTerms {
        monthly_rate,
        total_months,
    };

    let mut state = AmortizationState::opening(principal, initial_payment);
    let mut periods = Vec::with_capacity(total_months as usize);

    while state.is_running() {
        let (next, record) = state.advance(&terms, policy)?;
        periods.push(record);
        state = next;
    }

    let schedule = Schedule { periods };
    if schedule.hit_safety_cap() {
        warn!(
            "schedule truncated at {} months with balance {} outstanding",
            MAX_SCHEDULE_MONTHS,
            schedule.final_balance()
        );
    }

    Ok(schedule)
}

fn validate_simulation(
    principal: Money,
    monthly_rate: Rate,
    total_months: Months,
) -> HomeLoanResult<()> {
    if principal < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }
    if monthly_rate < Decimal::ZERO {
        return Err(HomeLoanError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Monthly rate cannot be negative".into(),
        });
    }
    if total_months == 0 {
        return Err(HomeLoanError::InvalidInput {
            field: "total_months".into(),
            reason: "Scheduled months must be greater than zero".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
