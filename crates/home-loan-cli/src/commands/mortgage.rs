use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use home_loan_core::amortization::loan::LoanParameters;
use home_loan_core::amortization::prepayment::{ApplicationMode, PrepaymentPolicy, Recurrence};
use home_loan_core::amortization::simulator::{self, MortgageInput};
use home_loan_core::time_value::{self, PaymentInput};

use crate::input;

/// How often an extraordinary payment repeats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RecurrenceArg {
    Once,
    Semiannual,
    Annual,
}

impl From<RecurrenceArg> for Recurrence {
    fn from(arg: RecurrenceArg) -> Self {
        match arg {
            RecurrenceArg::Once => Recurrence::OneTime,
            RecurrenceArg::Semiannual => Recurrence::EverySixMonths,
            RecurrenceArg::Annual => Recurrence::EveryTwelveMonths,
        }
    }
}

/// What an extraordinary payment buys
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    ShortenTerm,
    ReducePayment,
}

impl From<ModeArg> for ApplicationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::ShortenTerm => ApplicationMode::ShortenTerm,
            ModeArg::ReducePayment => ApplicationMode::ReducePayment,
        }
    }
}

/// Arguments for a mortgage simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Home value in whole currency units
    #[arg(long)]
    pub home_value: Option<Decimal>,

    /// Down payment as a percentage of the home value (0-80)
    #[arg(long, alias = "down")]
    pub down_payment_pct: Option<Decimal>,

    /// Annual nominal interest rate in percent (e.g. 12.0 for 12%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Loan term in years (1-30)
    #[arg(long)]
    pub years: Option<u32>,

    /// Extraordinary payment amount; enables prepayments when > 0
    #[arg(long)]
    pub prepay_amount: Option<Decimal>,

    /// Prepayment recurrence
    #[arg(long, value_enum, default_value = "once")]
    pub prepay_recurrence: RecurrenceArg,

    /// First month (1-based) in which the prepayment is made
    #[arg(long, default_value = "1")]
    pub prepay_start: u32,

    /// Whether prepayments shorten the term or reduce the payment
    #[arg(long, value_enum, default_value = "shorten-term")]
    pub prepay_mode: ModeArg,
}

/// Arguments for a payment quote
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual nominal interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input = resolve_mortgage_input(args)?;
    let result = simulator::simulate_mortgage(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input = resolve_mortgage_input(args)?;
    let schedule = simulator::amortization_schedule(&mortgage_input)?;
    Ok(serde_json::to_value(schedule.periods)?)
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin::<PaymentInput>()? {
        piped
    } else {
        PaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            term_years: years_or_default(args.years),
        }
    };
    let result = time_value::quote_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}

fn years_or_default(years: Option<u32>) -> u32 {
    years.unwrap_or_else(|| LoanParameters::default().term_years)
}

/// File, then piped stdin, then flags with the form's defaults.
fn resolve_mortgage_input(args: SimulateArgs) -> Result<MortgageInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(piped) = input::stdin::read_stdin::<MortgageInput>()? {
        return Ok(piped);
    }

    let defaults = LoanParameters::default();
    let loan = LoanParameters {
        home_value: args.home_value.unwrap_or(defaults.home_value),
        down_payment_pct: args.down_payment_pct.unwrap_or(defaults.down_payment_pct),
        annual_rate_pct: args.annual_rate.unwrap_or(defaults.annual_rate_pct),
        term_years: args.years.unwrap_or(defaults.term_years),
    };

    let prepayment = args
        .prepay_amount
        .filter(|amount| *amount > Decimal::ZERO)
        .map(|amount| PrepaymentPolicy {
            amount,
            recurrence: args.prepay_recurrence.into(),
            start_month: args.prepay_start,
            mode: args.prepay_mode.into(),
        });

    Ok(MortgageInput { loan, prepayment })
}
