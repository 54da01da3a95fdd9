//! Payroll rules: net salary, calendar months, the one-payment-per-month
//! guard and the report aggregates.

pub mod guard;
pub mod month;
pub mod net;
pub mod report;
