use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{
    error::PayrollError,
    model::employee::{Employee, EmployeeSummary, EmployeeView, Gender, SalaryInfo},
    model::salary::SalaryPayment,
    payroll::month::parse_date,
    store::PayrollStore,
    utils::validate::{bounded, max_len, optional, required},
};

// Column widths of the employees table
const NAME_MAX: usize = 50;
const POSITION_MAX: usize = 100;
const ADDRESS_MAX: usize = 255;
const TELEPHONE_MAX: usize = 20;

fn text(label: &str, value: Option<String>, max: usize) -> Result<String, PayrollError> {
    max_len(label, required(label, value)?, max)
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    #[schema(example = "EMP003")]
    pub employee_number: Option<String>,
    #[schema(example = "Alice")]
    pub first_name: Option<String>,
    #[schema(example = "Uwase")]
    pub last_name: Option<String>,
    #[schema(example = "Accountant")]
    pub position: Option<String>,
    #[schema(example = "KG 11 Ave")]
    pub address: Option<String>,
    #[schema(example = "+250788000003")]
    pub telephone: Option<String>,
    #[schema(example = "Female")]
    pub gender: Option<String>,
    #[schema(example = "2024-06-01", format = "date")]
    pub hired_date: Option<String>,
    #[schema(example = "HR")]
    pub department_code: Option<String>,
}

/// Empty means "not given"; anything else must name a known gender.
fn parse_gender(value: Option<String>) -> Result<Option<Gender>, PayrollError> {
    match optional(value) {
        None => Ok(None),
        Some(v) => Gender::from_str(&v).map(Some).map_err(|_| {
            PayrollError::validation(format!(
                "Invalid gender '{v}', expected Male, Female or Other"
            ))
        }),
    }
}

impl CreateEmployee {
    pub fn validate(self) -> Result<Employee, PayrollError> {
        let employee_number = required("Employee number", self.employee_number)?;
        let hired_date = required("Hired date", self.hired_date)?;

        Ok(Employee {
            employee_number: max_len("Employee number", employee_number, 20)?,
            first_name: text("First name", self.first_name, NAME_MAX)?,
            last_name: text("Last name", self.last_name, NAME_MAX)?,
            position: text("Position", self.position, POSITION_MAX)?,
            address: bounded("Address", self.address, ADDRESS_MAX)?,
            telephone: bounded("Telephone", self.telephone, TELEPHONE_MAX)?,
            gender: parse_gender(self.gender)?,
            hired_date: parse_date("hired date", &hired_date)?,
            department_code: text("Department code", self.department_code, 10)?,
        })
    }
}

/// Fields left out keep their current value. The employee number is taken
/// from the path and cannot change.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>,
    pub gender: Option<String>,
    #[schema(example = "2024-06-01", format = "date")]
    pub hired_date: Option<String>,
    #[schema(example = "ENG")]
    pub department_code: Option<String>,
}

impl UpdateEmployee {
    pub fn apply(self, mut employee: Employee) -> Result<Employee, PayrollError> {
        if let Some(v) = bounded("First name", self.first_name, NAME_MAX)? {
            employee.first_name = v;
        }
        if let Some(v) = bounded("Last name", self.last_name, NAME_MAX)? {
            employee.last_name = v;
        }
        if let Some(v) = bounded("Position", self.position, POSITION_MAX)? {
            employee.position = v;
        }
        if self.address.is_some() {
            employee.address = bounded("Address", self.address, ADDRESS_MAX)?;
        }
        if self.telephone.is_some() {
            employee.telephone = bounded("Telephone", self.telephone, TELEPHONE_MAX)?;
        }
        if self.gender.is_some() {
            employee.gender = parse_gender(self.gender)?;
        }
        if let Some(v) = optional(self.hired_date) {
            employee.hired_date = parse_date("hired date", &v)?;
        }
        if let Some(v) = bounded("Department code", self.department_code, 10)? {
            employee.department_code = v;
        }
        Ok(employee)
    }
}

async fn find_employee(
    store: &dyn PayrollStore,
    number: &str,
) -> Result<EmployeeView, PayrollError> {
    store
        .get_employee(number)
        .await?
        .ok_or_else(|| PayrollError::not_found(format!("Employee {number}")))
}

/// List Employees with their department name
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Employees ordered by number", body = [EmployeeView])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    store: web::Data<dyn PayrollStore>,
) -> Result<HttpResponse, PayrollError> {
    let employees = store.list_employees().await?;
    Ok(HttpResponse::Ok().json(employees))
}

#[utoipa::path(
    get,
    path = "/api/employees/list",
    responses(
        (status = 200, description = "Number, name, position and department of every employee", body = [EmployeeSummary])
    ),
    tag = "Employee"
)]
pub async fn list_employee_summaries(
    store: web::Data<dyn PayrollStore>,
) -> Result<HttpResponse, PayrollError> {
    let employees = store.list_employee_summaries().await?;
    Ok(HttpResponse::Ok().json(employees))
}

#[utoipa::path(
    get,
    path = "/api/employees/{number}",
    params(("number", Path, description = "Employee number")),
    responses(
        (status = 200, body = EmployeeView),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee EMP009 not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PayrollError> {
    let employee = find_employee(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Department default salary figures for one employee, used to prefill a payment
#[utoipa::path(
    get,
    path = "/api/employees/{number}/salary-info",
    params(("number", Path, description = "Employee number")),
    responses(
        (status = 200, body = SalaryInfo),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_salary_info(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PayrollError> {
    let view = find_employee(store.get_ref(), &path).await?;
    let employee = view.employee;

    let department = store
        .get_department(&employee.department_code)
        .await?
        .ok_or_else(|| {
            PayrollError::Internal(format!(
                "department {} of employee {} is missing",
                employee.department_code, employee.employee_number
            ))
        })?;

    Ok(HttpResponse::Ok().json(SalaryInfo {
        employee_number: employee.employee_number,
        first_name: employee.first_name,
        last_name: employee.last_name,
        position: employee.position,
        department_code: department.department_code,
        department_name: department.department_name,
        gross_salary: department.gross_salary,
        total_deduction: department.total_deduction,
        net_salary: department.net_salary,
    }))
}

#[utoipa::path(
    get,
    path = "/api/employees/{number}/salaries",
    params(("number", Path, description = "Employee number")),
    responses(
        (status = 200, description = "Payments newest month first", body = [SalaryPayment]),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn list_employee_salaries(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PayrollError> {
    let number = path.into_inner();
    find_employee(store.get_ref(), &number).await?;

    let payments = store.payments_for_employee(&number).await?;
    Ok(HttpResponse::Ok().json(payments))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Missing field or unknown department", body = Object, example = json!({
            "message": "Department XYZ does not exist"
        })),
        (status = 409, description = "Employee number already exists")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    store: web::Data<dyn PayrollStore>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, PayrollError> {
    let employee = payload.into_inner().validate()?;

    if let Err(e) = store.insert_employee(&employee).await {
        warn!(employee_number = %employee.employee_number, error = %e, "Employee not created");
        return Err(e);
    }

    info!(
        employee_number = %employee.employee_number,
        department_code = %employee.department_code,
        "Employee created"
    );

    Ok(HttpResponse::Created().json(employee))
}

#[utoipa::path(
    put,
    path = "/api/employees/{number}",
    params(("number", Path, description = "Employee number")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Invalid field or unknown department"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, PayrollError> {
    let current = find_employee(store.get_ref(), &path).await?;
    let employee = payload.into_inner().apply(current.employee)?;

    store.update_employee(&employee).await?;

    info!(employee_number = %employee.employee_number, "Employee updated");

    Ok(HttpResponse::Ok().json(employee))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{number}",
    params(("number", Path, description = "Employee number")),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 400, description = "Salary payments exist for the employee"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PayrollError> {
    let number = path.into_inner();

    store.delete_employee(&number).await?;

    info!(employee_number = %number, "Employee deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully"
    })))
}
