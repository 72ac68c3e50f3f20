//! French-system mortgage amortization with extraordinary prepayments.

pub mod loan;
pub mod prepayment;
pub mod schedule;
pub mod simulator;
