use napi::Result as NapiResult;
use napi_derive::napi;

use home_loan_core::amortization::simulator::{self, MortgageInput};
use home_loan_core::time_value::{self, PaymentInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Mortgage simulation
// ---------------------------------------------------------------------------

/// Full simulation envelope: summary, prepayment comparison and schedule.
#[napi]
pub fn simulate_mortgage(input_json: String) -> NapiResult<String> {
    let input: MortgageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = simulator::simulate_mortgage(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Month-by-month rows only, as a JSON array.
#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: MortgageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = simulator::amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&schedule.periods).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_payment(input_json: String) -> NapiResult<String> {
    let input: PaymentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = time_value::quote_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
