use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One month's payroll disbursement for one employee.
///
/// Figures are a snapshot taken when the payment is recorded; editing the
/// department afterwards does not touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalaryPayment {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP001")]
    pub employee_number: String,

    #[schema(value_type = f64, example = 75000.0)]
    pub gross_salary: Decimal,

    #[schema(value_type = f64, example = 15000.0)]
    pub total_deduction: Decimal,

    #[schema(value_type = f64, example = 60000.0)]
    pub net_salary: Decimal,

    /// Always the first day of the paid month
    #[schema(example = "2025-01-01", value_type = String, format = "date")]
    pub month: NaiveDate,

    #[schema(example = "2025-01-28", value_type = String, format = "date")]
    pub payment_date: NaiveDate,
}

/// A payment that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSalaryPayment {
    pub employee_number: String,
    pub gross_salary: Decimal,
    pub total_deduction: Decimal,
    pub net_salary: Decimal,
    pub month: NaiveDate,
    pub payment_date: NaiveDate,
}

impl NewSalaryPayment {
    pub fn with_id(self, id: u64) -> SalaryPayment {
        SalaryPayment {
            id,
            employee_number: self.employee_number,
            gross_salary: self.gross_salary,
            total_deduction: self.total_deduction,
            net_salary: self.net_salary,
            month: self.month,
            payment_date: self.payment_date,
        }
    }
}

/// A payment joined with the employee and department it was made to.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaymentRecord {
    #[serde(flatten)]
    pub payment: SalaryPayment,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "Developer")]
    pub position: String,

    #[schema(example = "Engineering")]
    pub department_name: String,
}
