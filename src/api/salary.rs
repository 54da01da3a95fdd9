use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{
    error::PayrollError,
    model::salary::{NewSalaryPayment, PaymentRecord, SalaryPayment},
    payroll::{
        guard::{PaymentCheck, check_payment},
        month::{parse_date, parse_month},
        net::net_salary,
    },
    store::PayrollStore,
    utils::validate::{amount, non_negative, optional, required},
};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalary {
    #[schema(example = "EMP001")]
    pub employee_number: Option<String>,

    #[schema(value_type = f64, example = 75000.0)]
    pub gross_salary: Option<Decimal>,

    #[schema(value_type = f64, example = 15000.0)]
    pub total_deduction: Option<Decimal>,

    /// Ignored; the server always derives it
    #[schema(value_type = f64, example = 60000.0)]
    pub net_salary: Option<Decimal>,

    /// Any day of the paid month, or `YYYY-MM`
    #[schema(example = "2025-01")]
    pub month: Option<String>,

    /// Defaults to today
    #[schema(example = "2025-01-28", format = "date")]
    pub payment_date: Option<String>,
}

fn payment_date(value: Option<String>) -> Result<NaiveDate, PayrollError> {
    match optional(value) {
        Some(v) => parse_date("payment date", &v),
        None => Ok(Local::now().date_naive()),
    }
}

impl CreateSalary {
    pub fn validate(self) -> Result<NewSalaryPayment, PayrollError> {
        let employee_number = required("Employee number", self.employee_number)?;
        let gross_salary = amount("Gross salary", self.gross_salary)?;
        let total_deduction = amount("Total deduction", self.total_deduction)?;
        let month = parse_month(&required("Month", self.month)?)?;

        Ok(NewSalaryPayment {
            employee_number,
            gross_salary,
            total_deduction,
            net_salary: net_salary(gross_salary, total_deduction),
            month,
            payment_date: payment_date(self.payment_date)?,
        })
    }
}

/// Fields left out keep their current value; net is recomputed.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalary {
    #[schema(value_type = f64, example = 76000.0)]
    pub gross_salary: Option<Decimal>,

    #[schema(value_type = f64, example = 15000.0)]
    pub total_deduction: Option<Decimal>,

    /// Ignored; the server always derives it
    #[schema(value_type = f64)]
    pub net_salary: Option<Decimal>,

    #[schema(example = "2025-02")]
    pub month: Option<String>,

    #[schema(example = "2025-02-27", format = "date")]
    pub payment_date: Option<String>,
}

impl UpdateSalary {
    pub fn apply(self, mut payment: SalaryPayment) -> Result<SalaryPayment, PayrollError> {
        if let Some(v) = self.gross_salary {
            payment.gross_salary = non_negative("Gross salary", v)?;
        }
        if let Some(v) = self.total_deduction {
            payment.total_deduction = non_negative("Total deduction", v)?;
        }
        if let Some(v) = optional(self.month) {
            payment.month = parse_month(&v)?;
        }
        if let Some(v) = optional(self.payment_date) {
            payment.payment_date = parse_date("payment date", &v)?;
        }
        payment.net_salary = net_salary(payment.gross_salary, payment.total_deduction);
        Ok(payment)
    }
}

async fn find_payment(store: &dyn PayrollStore, id: u64) -> Result<PaymentRecord, PayrollError> {
    store
        .get_payment(id)
        .await?
        .ok_or_else(|| PayrollError::not_found(format!("Salary record {id}")))
}

/// List all salary payments with employee details
#[utoipa::path(
    get,
    path = "/api/salaries",
    responses(
        (status = 200, description = "Payments, newest month first", body = [PaymentRecord])
    ),
    tag = "Salary"
)]
pub async fn list_salaries(
    store: web::Data<dyn PayrollStore>,
) -> Result<HttpResponse, PayrollError> {
    let payments = store.list_payments().await?;
    Ok(HttpResponse::Ok().json(payments))
}

#[utoipa::path(
    get,
    path = "/api/salaries/{id}",
    params(("id", Path, description = "Salary record id")),
    responses(
        (status = 200, body = PaymentRecord),
        (status = 404, description = "Salary record not found")
    ),
    tag = "Salary"
)]
pub async fn get_salary(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, PayrollError> {
    let record = find_payment(store.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Has the employee already been paid for the month?
#[utoipa::path(
    get,
    path = "/api/salaries/check/{employeeNumber}/{month}",
    params(
        ("employeeNumber", Path, description = "Employee number"),
        ("month", Path, description = "Any day of the month, or YYYY-MM")
    ),
    responses(
        (status = 200, body = PaymentCheck, example = json!({
            "hasPaid": false,
            "payment": null
        })),
        (status = 400, description = "Invalid month")
    ),
    tag = "Salary"
)]
pub async fn check_salary(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, PayrollError> {
    let (employee_number, month) = path.into_inner();
    let month = parse_month(&month)?;

    let check = check_payment(store.get_ref(), &employee_number, month).await?;
    Ok(HttpResponse::Ok().json(check))
}

/// Record a salary payment; at most one per employee and month
#[utoipa::path(
    post,
    path = "/api/salaries",
    request_body = CreateSalary,
    responses(
        (status = 201, description = "Payment recorded", body = SalaryPayment),
        (status = 400, description = "Missing or invalid field"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Already paid for that month", body = Object, example = json!({
            "message": "Employee EMP001 has already been paid for January 2025"
        }))
    ),
    tag = "Salary"
)]
pub async fn create_salary(
    store: web::Data<dyn PayrollStore>,
    payload: web::Json<CreateSalary>,
) -> Result<HttpResponse, PayrollError> {
    let new_payment = payload.into_inner().validate()?;

    let payment = match store.insert_payment(new_payment).await {
        Ok(payment) => payment,
        Err(e) => {
            warn!(error = %e, "Salary payment rejected");
            return Err(e);
        }
    };

    info!(
        id = payment.id,
        employee_number = %payment.employee_number,
        month = %payment.month,
        net_salary = %payment.net_salary,
        "Salary payment recorded"
    );

    Ok(HttpResponse::Created().json(payment))
}

#[utoipa::path(
    put,
    path = "/api/salaries/{id}",
    params(("id", Path, description = "Salary record id")),
    request_body = UpdateSalary,
    responses(
        (status = 200, description = "Payment updated, net salary recomputed", body = SalaryPayment),
        (status = 404, description = "Salary record not found"),
        (status = 409, description = "Employee already paid for the new month")
    ),
    tag = "Salary"
)]
pub async fn update_salary(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<u64>,
    payload: web::Json<UpdateSalary>,
) -> Result<HttpResponse, PayrollError> {
    let current = find_payment(store.get_ref(), path.into_inner()).await?;
    let payment = payload.into_inner().apply(current.payment)?;

    store.update_payment(&payment).await?;

    info!(id = payment.id, month = %payment.month, "Salary payment updated");

    Ok(HttpResponse::Ok().json(payment))
}

#[utoipa::path(
    delete,
    path = "/api/salaries/{id}",
    params(("id", Path, description = "Salary record id")),
    responses(
        (status = 200, description = "Payment deleted", body = Object, example = json!({
            "message": "Salary record deleted successfully"
        })),
        (status = 404, description = "Salary record not found")
    ),
    tag = "Salary"
)]
pub async fn delete_salary(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, PayrollError> {
    let id = path.into_inner();

    store.delete_payment(id).await?;

    info!(id, "Salary payment deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Salary record deleted successfully"
    })))
}
