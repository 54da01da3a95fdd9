use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::payroll::net::{net_salary, round_money};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "department_code": "ENG",
        "department_name": "Engineering",
        "gross_salary": 75000.0,
        "total_deduction": 15000.0,
        "net_salary": 60000.0
    })
)]
pub struct Department {
    #[schema(example = "ENG")]
    pub department_code: String,

    #[schema(example = "Engineering")]
    pub department_name: String,

    /// Default monthly gross for employees of this department
    #[schema(value_type = f64, example = 75000.0)]
    pub gross_salary: Decimal,

    #[schema(value_type = f64, example = 15000.0)]
    pub total_deduction: Decimal,

    #[schema(value_type = f64, example = 60000.0)]
    pub net_salary: Decimal,
}

impl Department {
    /// Builds a department, deriving the net figure from gross and deduction.
    pub fn new(
        department_code: impl Into<String>,
        department_name: impl Into<String>,
        gross_salary: Decimal,
        total_deduction: Decimal,
    ) -> Self {
        let gross_salary = round_money(gross_salary);
        let total_deduction = round_money(total_deduction);

        Self {
            department_code: department_code.into(),
            department_name: department_name.into(),
            gross_salary,
            total_deduction,
            net_salary: net_salary(gross_salary, total_deduction),
        }
    }
}
