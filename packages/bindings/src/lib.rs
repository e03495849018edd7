use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_summary(input_json: String) -> NapiResult<String> {
    let params: rwa_lend_core::lending::amortization::LoanParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rwa_lend_core::lending::amortization::compute_summary(&params)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Schedule input: loan parameters plus the payment and row cap the dashboard
/// resolved on its side.
#[derive(serde::Deserialize)]
struct ScheduleRequest {
    loan: rwa_lend_core::lending::amortization::LoanParameters,
    monthly_payment: rust_decimal::Decimal,
    max_periods: u32,
}

#[napi]
pub fn generate_schedule(input_json: String) -> NapiResult<String> {
    let request: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rwa_lend_core::lending::amortization::generate_schedule(
        &request.loan,
        request.monthly_payment,
        request.max_periods,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_affordability(input_json: String) -> NapiResult<String> {
    let input: rwa_lend_core::lending::affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rwa_lend_core::lending::affordability::assess_affordability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
