//! End-to-end mortgage simulation: validated loan terms in, summary,
//! prepayment comparison and full ledger out.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::loan::{LoanParameters, DISPLAY_MIN_HOME_VALUE};
use crate::amortization::prepayment::PrepaymentPolicy;
use crate::amortization::schedule::{self, Schedule, MAX_SCHEDULE_MONTHS};
use crate::time_value::compute_payment;
use crate::types::{with_metadata, ComputationOutput, Money, Months, Rate};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageInput {
    pub loan: LoanParameters,
    /// Absent means no extraordinary payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment: Option<PrepaymentPolicy>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageSummary {
    pub home_value: Money,
    pub down_payment: Money,
    pub principal: Money,
    pub monthly_rate: Rate,
    pub scheduled_months: Months,
    /// Constant payment before any prepayment, rounded.
    pub initial_payment: Money,
    /// Payment in force in the last simulated month.
    pub final_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_extra_paid: Money,
    pub duration_months: Months,
    pub duration_years: u32,
    pub duration_remainder_months: u32,
    pub fully_amortized: bool,
}

/// How the prepaid loan compares to the same loan without prepayments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentComparison {
    pub baseline_duration_months: Months,
    pub baseline_total_interest: Money,
    pub baseline_total_paid: Money,
    pub months_saved: Months,
    pub interest_saved: Money,
    /// Initial payment less the final payment in force.
    pub payment_reduction: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageSimulation {
    pub summary: MortgageSummary,
    /// Contractual total: initial payment times scheduled months.
    pub scheduled_total_paid: Money,
    pub scheduled_total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<PrepaymentComparison>,
    pub schedule: Schedule,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run a full mortgage simulation.
pub fn simulate_mortgage(
    input: &MortgageInput,
) -> HomeLoanResult<ComputationOutput<MortgageSimulation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan = &input.loan;
    loan.validate()?;
    let total_months = loan.total_months();
    if let Some(policy) = &input.prepayment {
        policy.validate(total_months)?;
    }

    if loan.home_value < DISPLAY_MIN_HOME_VALUE {
        warnings.push(format!(
            "Home value {} is below the usual minimum of {}",
            loan.home_value, DISPLAY_MIN_HOME_VALUE
        ));
    }

    let principal = loan.principal();
    let monthly_rate = loan.monthly_rate();
    let initial_payment = compute_payment(principal, monthly_rate, total_months)?;

    debug!(
        "simulating principal={} monthly_rate={} months={} payment={}",
        principal, monthly_rate, total_months, initial_payment
    );

    let active_policy = input.prepayment.as_ref().filter(|p| p.is_active());

    let schedule = schedule::simulate(
        principal,
        monthly_rate,
        total_months,
        initial_payment,
        active_policy,
    )?;

    if schedule.hit_safety_cap() {
        warnings.push(format!(
            "Schedule truncated at {} months with {} still outstanding",
            MAX_SCHEDULE_MONTHS,
            schedule.final_balance()
        ));
    }

    let comparison = match active_policy {
        Some(policy) => {
            if schedule.first_extra_month().is_none() {
                warnings.push(format!(
                    "Prepayment starting at month {} was never applied; the loan was already repaid",
                    policy.start_month
                ));
            }
            let baseline = schedule::simulate(
                principal,
                monthly_rate,
                total_months,
                initial_payment,
                None,
            )?;
            Some(compare(&baseline, &schedule, initial_payment))
        }
        None => None,
    };

    let duration = schedule.duration_months();
    let summary = MortgageSummary {
        home_value: loan.home_value,
        down_payment: loan.down_payment(),
        principal,
        monthly_rate,
        scheduled_months: total_months,
        initial_payment: initial_payment.round(),
        final_payment: schedule
            .final_payment()
            .unwrap_or_else(|| initial_payment.round()),
        total_paid: schedule.total_paid(),
        total_interest: schedule.total_interest(),
        total_extra_paid: schedule.total_extra(),
        duration_months: duration,
        duration_years: duration / 12,
        duration_remainder_months: duration % 12,
        fully_amortized: schedule.is_fully_amortized(),
    };

    let scheduled_total = initial_payment * Decimal::from(total_months);

    debug!(
        "simulation finished: {} months, total interest {}",
        duration, summary.total_interest
    );

    let output = MortgageSimulation {
        summary,
        scheduled_total_paid: scheduled_total.round(),
        scheduled_total_interest: (scheduled_total - principal).round(),
        comparison,
        schedule,
    };

    let methodology = match active_policy {
        Some(_) => "French amortization with extraordinary prepayments",
        None => "French amortization (constant payment)",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

/// Only the month-by-month ledger, for callers that render the table alone.
pub fn amortization_schedule(input: &MortgageInput) -> HomeLoanResult<Schedule> {
    Ok(simulate_mortgage(input)?.result.schedule)
}

fn compare(baseline: &Schedule, prepaid: &Schedule, initial_payment: Money) -> PrepaymentComparison {
    let final_payment = prepaid
        .final_payment()
        .unwrap_or_else(|| initial_payment.round());
    PrepaymentComparison {
        baseline_duration_months: baseline.duration_months(),
        baseline_total_interest: baseline.total_interest(),
        baseline_total_paid: baseline.total_paid(),
        months_saved: baseline
            .duration_months()
            .saturating_sub(prepaid.duration_months()),
        interest_saved: baseline.total_interest() - prepaid.total_interest(),
        payment_reduction: initial_payment.round() - final_payment,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
