use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rwa_lend_core::lending::affordability::{self, AffordabilityInput};

use crate::commands::loan::{resolve_params, LoanParamArgs};
use crate::input;

/// Arguments for the affordability assessment command
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AffordabilityArgs {
    #[command(flatten)]
    pub params: LoanParamArgs,

    /// Borrower's declared gross annual income
    #[arg(long)]
    pub annual_income: Option<Decimal>,
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    // A JSON --input file may carry the full AffordabilityInput (loan + income);
    // otherwise income rides alongside the loan flags.
    let assessment_input: AffordabilityInput = if let Some(ref path) = args.params.input {
        let data: Value = input::read_json_value(path)?;
        if data.get("loan").is_some() {
            serde_json::from_value(data)?
        } else {
            AffordabilityInput {
                loan: serde_json::from_value(data)?,
                annual_income: args.annual_income,
            }
        }
    } else {
        AffordabilityInput {
            loan: resolve_params(&args.params)?,
            annual_income: args.annual_income,
        }
    };

    let result = affordability::assess_affordability(&assessment_input)?;
    Ok(serde_json::to_value(result)?)
}
