pub mod affordability;
pub mod loan;
