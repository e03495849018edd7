pub mod affordability;
pub mod amortization;
