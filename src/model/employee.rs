use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "employee_number": "EMP001",
        "first_name": "John",
        "last_name": "Doe",
        "position": "Developer",
        "address": "12 Main Street",
        "telephone": "+250788000001",
        "gender": "Male",
        "hired_date": "2023-03-01",
        "department_code": "ENG"
    })
)]
pub struct Employee {
    #[schema(example = "EMP001")]
    pub employee_number: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "Developer")]
    pub position: String,

    #[schema(example = "12 Main Street", nullable = true)]
    pub address: Option<String>,

    #[schema(example = "+250788000001", nullable = true)]
    pub telephone: Option<String>,

    pub gender: Option<Gender>,

    #[schema(example = "2023-03-01", value_type = String, format = "date")]
    pub hired_date: NaiveDate,

    #[schema(example = "ENG")]
    pub department_code: String,
}

/// An employee together with the name of its department.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,

    #[schema(example = "Engineering")]
    pub department_name: String,
}

/// Lightweight row used to populate employee pickers.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeSummary {
    #[schema(example = "EMP001")]
    pub employee_number: String,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "Developer")]
    pub position: String,
    #[schema(example = "Engineering")]
    pub department_name: String,
}

impl From<&EmployeeView> for EmployeeSummary {
    fn from(view: &EmployeeView) -> Self {
        Self {
            employee_number: view.employee.employee_number.clone(),
            first_name: view.employee.first_name.clone(),
            last_name: view.employee.last_name.clone(),
            position: view.employee.position.clone(),
            department_name: view.department_name.clone(),
        }
    }
}

/// Default salary figures an employee inherits from its department.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SalaryInfo {
    #[schema(example = "EMP001")]
    pub employee_number: String,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "Developer")]
    pub position: String,
    #[schema(example = "ENG")]
    pub department_code: String,
    #[schema(example = "Engineering")]
    pub department_name: String,
    #[schema(value_type = f64, example = 75000.0)]
    pub gross_salary: Decimal,
    #[schema(value_type = f64, example = 15000.0)]
    pub total_deduction: Decimal,
    #[schema(value_type = f64, example = 60000.0)]
    pub net_salary: Decimal,
}
