//! HTTP handlers, one module per resource.

pub mod dashboard;
pub mod department;
pub mod employee;
pub mod report;
pub mod salary;
