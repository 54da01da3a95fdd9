//! Data access for departments, employees and salary payments.
//!
//! Handlers only ever see `dyn PayrollStore`; the backend is picked once at
//! startup.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::PayrollError,
    model::{
        department::Department,
        employee::{Employee, EmployeeSummary, EmployeeView},
        salary::{NewSalaryPayment, PaymentRecord, SalaryPayment},
    },
};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// Referential rules every implementation enforces:
///
/// * an employee must reference an existing department,
/// * a department with employees cannot be deleted,
/// * an employee with payments cannot be deleted,
/// * at most one payment per (employee, calendar month), checked and written
///   atomically.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Ordered by department code.
    async fn list_departments(&self) -> Result<Vec<Department>, PayrollError>;

    async fn get_department(&self, code: &str) -> Result<Option<Department>, PayrollError>;

    async fn insert_department(&self, department: &Department) -> Result<(), PayrollError>;

    /// Fails with `NotFound` when the code is unknown.
    async fn update_department(&self, department: &Department) -> Result<(), PayrollError>;

    async fn delete_department(&self, code: &str) -> Result<(), PayrollError>;

    /// Ordered by employee number.
    async fn list_employees(&self) -> Result<Vec<EmployeeView>, PayrollError>;

    async fn list_employee_summaries(&self) -> Result<Vec<EmployeeSummary>, PayrollError> {
        let employees = self.list_employees().await?;
        Ok(employees.iter().map(EmployeeSummary::from).collect())
    }

    async fn get_employee(&self, number: &str) -> Result<Option<EmployeeView>, PayrollError>;

    async fn insert_employee(&self, employee: &Employee) -> Result<(), PayrollError>;

    async fn update_employee(&self, employee: &Employee) -> Result<(), PayrollError>;

    async fn delete_employee(&self, number: &str) -> Result<(), PayrollError>;

    /// Newest month first.
    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, PayrollError>;

    async fn get_payment(&self, id: u64) -> Result<Option<PaymentRecord>, PayrollError>;

    async fn payments_for_employee(
        &self,
        number: &str,
    ) -> Result<Vec<SalaryPayment>, PayrollError>;

    /// Ordered by employee number.
    async fn payments_for_month(&self, month: NaiveDate)
    -> Result<Vec<PaymentRecord>, PayrollError>;

    async fn find_payment(
        &self,
        number: &str,
        month: NaiveDate,
    ) -> Result<Option<SalaryPayment>, PayrollError>;

    /// Fails with `DuplicatePayment` when the employee is already paid that
    /// month, `NotFound` when the employee does not exist.
    async fn insert_payment(
        &self,
        payment: NewSalaryPayment,
    ) -> Result<SalaryPayment, PayrollError>;

    /// Replaces amounts and month of an existing payment, same rules as insert.
    async fn update_payment(&self, payment: &SalaryPayment) -> Result<(), PayrollError>;

    async fn delete_payment(&self, id: u64) -> Result<(), PayrollError>;
}
