use home_loan_core::amortization::loan::LoanParameters;
use home_loan_core::amortization::prepayment::{ApplicationMode, PrepaymentPolicy, Recurrence};
use home_loan_core::amortization::schedule::{self, Schedule, MAX_SCHEDULE_MONTHS};
use home_loan_core::amortization::simulator::{simulate_mortgage, MortgageInput};
use home_loan_core::time_value::compute_payment;
use home_loan_core::HomeLoanError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

const PRINCIPAL: Decimal = dec!(210_000_000);
const MONTHLY_RATE: Decimal = dec!(0.01);
const MONTHS: u32 = 240;

fn baseline() -> Schedule {
    let payment = compute_payment(PRINCIPAL, MONTHLY_RATE, MONTHS).unwrap();
    schedule::simulate(PRINCIPAL, MONTHLY_RATE, MONTHS, payment, None).unwrap()
}

fn with_policy(policy: &PrepaymentPolicy) -> Schedule {
    let payment = compute_payment(PRINCIPAL, MONTHLY_RATE, MONTHS).unwrap();
    schedule::simulate(PRINCIPAL, MONTHLY_RATE, MONTHS, payment, Some(policy)).unwrap()
}

fn one_time(amount: Decimal, start_month: u32, mode: ApplicationMode) -> PrepaymentPolicy {
    PrepaymentPolicy {
        amount,
        recurrence: Recurrence::OneTime,
        start_month,
        mode,
    }
}

// ===========================================================================
// Reference loans
// ===========================================================================

#[test]
fn test_twenty_year_loan_at_one_percent_monthly() {
    let s = baseline();
    assert_eq!(s.periods[0].payment, dec!(2_312_281));
    assert_eq!(s.duration_months(), 240);
    assert_eq!(s.final_balance(), Decimal::ZERO);

    // First month: 1% of 210M is 2.1M interest
    assert_eq!(s.periods[0].interest, dec!(2_100_000));
    assert_eq!(s.periods[0].principal, dec!(212_281));
}

#[test]
fn test_principal_portions_sum_to_principal() {
    let s = baseline();
    // Rounded rows drift by a few units at most
    assert!((s.total_principal() - PRINCIPAL).abs() <= dec!(240));
    assert!((s.total_paid() - s.total_interest() - PRINCIPAL).abs() <= dec!(240));
}

#[test]
fn test_zero_rate_loan() {
    let principal = dec!(100_000_000);
    let payment = compute_payment(principal, Decimal::ZERO, 120).unwrap();
    assert_eq!(payment.round(), dec!(833_333));

    let s = schedule::simulate(principal, Decimal::ZERO, 120, payment, None).unwrap();
    assert_eq!(s.duration_months(), 120);
    assert_eq!(s.total_interest(), Decimal::ZERO);
    assert!((s.total_paid() - principal).abs() <= dec!(120));
    assert!(s.is_fully_amortized());
}

// ===========================================================================
// Prepayments
// ===========================================================================

#[test]
fn test_one_time_shorten_term_at_month_13() {
    let base = baseline();
    let prepaid = with_policy(&one_time(dec!(10_000_000), 13, ApplicationMode::ShortenTerm));

    // Identical until the prepayment
    assert_eq!(&base.periods[..12], &prepaid.periods[..12]);

    let gap = base.periods[12].balance - prepaid.periods[12].balance;
    assert_eq!(gap, dec!(10_000_000));
    assert_eq!(prepaid.periods[12].extra_payment, dec!(10_000_000));
    assert_eq!(prepaid.periods[12].payment, base.periods[12].payment);

    assert!(prepaid.duration_months() < base.duration_months());
    assert!(prepaid.is_fully_amortized());
}

#[test]
fn test_shorten_term_never_finishes_later() {
    let base = baseline();
    let policies = [
        one_time(dec!(1_000_000), 200, ApplicationMode::ShortenTerm),
        PrepaymentPolicy {
            amount: dec!(5_000_000),
            recurrence: Recurrence::EveryTwelveMonths,
            start_month: 13,
            mode: ApplicationMode::ShortenTerm,
        },
        PrepaymentPolicy {
            amount: dec!(500_000),
            recurrence: Recurrence::EverySixMonths,
            start_month: 1,
            mode: ApplicationMode::ShortenTerm,
        },
    ];
    for policy in &policies {
        let prepaid = with_policy(policy);
        assert!(
            prepaid.duration_months() <= base.duration_months(),
            "{:?} finished later than baseline",
            policy
        );
        assert!(prepaid.total_interest() < base.total_interest());
    }
}

#[test]
fn test_reduce_payment_lowers_payment_from_first_extra() {
    let base = baseline();
    let prepaid = with_policy(&one_time(dec!(10_000_000), 13, ApplicationMode::ReducePayment));
    let before = prepaid.periods[11].payment;
    let after = prepaid.periods[12].payment;
    assert_eq!(before, dec!(2_312_281));
    assert!(after < before);
    assert!(prepaid.periods[13..].iter().all(|p| p.payment == after));

    // Month 13 splits interest and principal against the old payment
    assert_eq!(prepaid.periods[12].interest, base.periods[12].interest);
    assert_eq!(prepaid.periods[12].principal, base.periods[12].principal);
    assert_eq!(
        base.periods[12].balance - prepaid.periods[12].balance,
        dec!(10_000_000)
    );
    assert!(prepaid.is_fully_amortized());
}

#[test]
fn test_reduce_payment_keeps_original_horizon() {
    let policies = [
        one_time(dec!(10_000_000), 13, ApplicationMode::ReducePayment),
        one_time(dec!(1_000_000), 240, ApplicationMode::ReducePayment),
        PrepaymentPolicy {
            amount: dec!(2_000_000),
            recurrence: Recurrence::EveryTwelveMonths,
            start_month: 12,
            mode: ApplicationMode::ReducePayment,
        },
    ];
    for policy in &policies {
        let prepaid = with_policy(policy);
        assert!(
            prepaid.duration_months() <= MONTHS,
            "{:?} ran {} months",
            policy,
            prepaid.duration_months()
        );
        assert!(prepaid.is_fully_amortized());
    }
}

#[test]
fn test_reduce_payment_each_event_lowers_payment() {
    let policy = PrepaymentPolicy {
        amount: dec!(5_000_000),
        recurrence: Recurrence::EverySixMonths,
        start_month: 1,
        mode: ApplicationMode::ReducePayment,
    };
    let prepaid = with_policy(&policy);
    let event_payments: Vec<Decimal> = prepaid
        .periods
        .iter()
        // The final event clears the loan and leaves the payment alone
        .filter(|p| p.extra_payment > Decimal::ZERO && p.balance > Decimal::ZERO)
        .map(|p| p.payment)
        .collect();
    assert!(event_payments.len() > 2);
    assert!(event_payments.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn test_simulation_is_deterministic() {
    let policy = PrepaymentPolicy {
        amount: dec!(3_000_000),
        recurrence: Recurrence::EveryTwelveMonths,
        start_month: 6,
        mode: ApplicationMode::ReducePayment,
    };
    assert_eq!(with_policy(&policy), with_policy(&policy));

    let input = MortgageInput {
        loan: LoanParameters::default(),
        prepayment: Some(policy),
    };
    let first = serde_json::to_string(&simulate_mortgage(&input).unwrap().result).unwrap();
    let second = serde_json::to_string(&simulate_mortgage(&input).unwrap().result).unwrap();
    assert_eq!(first, second);
}

// ===========================================================================
// Boundaries
// ===========================================================================

#[test]
fn test_payment_below_interest_truncates_at_cap() {
    let s = schedule::simulate(PRINCIPAL, MONTHLY_RATE, MONTHS, dec!(2_000_000), None).unwrap();
    assert_eq!(s.duration_months(), MAX_SCHEDULE_MONTHS);
    assert_eq!(s.periods.last().map(|p| p.month), Some(1000));
    assert!(s.final_balance() > Decimal::ZERO);
    assert!(s.hit_safety_cap());
}

#[test]
fn test_maximum_rate_and_term_fully_amortizes() {
    let input = MortgageInput {
        loan: LoanParameters {
            home_value: dec!(500_000_000),
            down_payment_pct: Decimal::ZERO,
            annual_rate_pct: dec!(30),
            term_years: 30,
        },
        prepayment: None,
    };
    let out = simulate_mortgage(&input).unwrap();
    assert_eq!(out.result.summary.duration_months, 360);
    assert!(out.result.summary.fully_amortized);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_json_round_trip_of_input() {
    let json = r#"{
        "loan": {
            "home_value": "300000000",
            "down_payment_pct": "30",
            "annual_rate_pct": "12",
            "term_years": 20
        },
        "prepayment": {
            "amount": "10000000",
            "recurrence": "OneTime",
            "start_month": 13,
            "mode": "ShortenTerm"
        }
    }"#;
    let input: MortgageInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.loan, LoanParameters::default());
    let out = simulate_mortgage(&input).unwrap();
    let expected = with_policy(&one_time(dec!(10_000_000), 13, ApplicationMode::ShortenTerm));
    assert_eq!(out.result.schedule, expected);
}

#[test]
fn test_missing_prepayment_defaults_to_none() {
    let json = r#"{
        "loan": {
            "home_value": "300000000",
            "down_payment_pct": "30",
            "annual_rate_pct": "12",
            "term_years": 20
        }
    }"#;
    let input: MortgageInput = serde_json::from_str(json).unwrap();
    assert!(input.prepayment.is_none());
}

#[test]
fn test_payment_overflow_is_an_error_not_a_panic() {
    let err = compute_payment(dec!(1000), Decimal::ONE, 100).unwrap_err();
    assert!(matches!(err, HomeLoanError::FinancialImpossibility(_)));
}

#[test]
fn test_zero_periods_rejected() {
    let err = compute_payment(PRINCIPAL, MONTHLY_RATE, 0).unwrap_err();
    assert!(matches!(err, HomeLoanError::InvalidInput { .. }));
}
