use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use crate::{
    config::Config,
    error::PayrollError,
    model::salary::PaymentRecord,
    payroll::{
        month::{first_of_month, parse_month},
        report::{
            DepartmentSummary, EmployeeSalaryHistory, MonthlyPayrollReport, Signature,
            department_summaries,
        },
    },
    store::PayrollStore,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthQuery {
    /// Any day of the month, or `YYYY-MM`; defaults to the current month
    #[param(example = "2025-01-01")]
    pub month: Option<String>,
}

impl MonthQuery {
    fn month(&self) -> Result<NaiveDate, PayrollError> {
        match self.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => parse_month(m),
            None => Ok(first_of_month(Local::now().date_naive())),
        }
    }
}

fn signature(config: &Config) -> Signature {
    Signature {
        prepared_by: config.report_prepared_by.clone(),
        approved_by: config.report_approved_by.clone(),
        date: Local::now().date_naive(),
    }
}

/// Employee counts and payment sums/averages per department
#[utoipa::path(
    get,
    path = "/api/reports/departments",
    responses(
        (status = 200, body = [DepartmentSummary])
    ),
    tag = "Report"
)]
pub async fn department_report(
    store: web::Data<dyn PayrollStore>,
) -> Result<HttpResponse, PayrollError> {
    let departments = store.list_departments().await?;
    let employees = store.list_employees().await?;
    let payments = store.list_payments().await?;

    let summaries = department_summaries(
        &departments,
        employees.iter().map(|e| &e.employee),
        payments.iter().map(|p| &p.payment),
    );

    Ok(HttpResponse::Ok().json(summaries))
}

#[utoipa::path(
    get,
    path = "/api/reports/monthly-payroll",
    params(MonthQuery),
    responses(
        (status = 200, description = "Payments of the month ordered by employee number", body = [PaymentRecord]),
        (status = 400, description = "Invalid month")
    ),
    tag = "Report"
)]
pub async fn monthly_payroll(
    store: web::Data<dyn PayrollStore>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, PayrollError> {
    let month = query.month()?;
    let rows = store.payments_for_month(month).await?;

    debug!(%month, rows = rows.len(), "Monthly payroll loaded");

    Ok(HttpResponse::Ok().json(rows))
}

/// Printable monthly payroll with totals and signature block
#[utoipa::path(
    get,
    path = "/api/reports/monthly-payroll/print",
    params(MonthQuery),
    responses(
        (status = 200, body = MonthlyPayrollReport),
        (status = 400, description = "Invalid month")
    ),
    tag = "Report"
)]
pub async fn monthly_payroll_print(
    store: web::Data<dyn PayrollStore>,
    config: web::Data<Config>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, PayrollError> {
    let month = query.month()?;
    let rows = store.payments_for_month(month).await?;

    Ok(HttpResponse::Ok().json(MonthlyPayrollReport::new(month, rows, signature(&config))))
}

async fn salary_history(
    store: &dyn PayrollStore,
    number: &str,
) -> Result<EmployeeSalaryHistory, PayrollError> {
    let employee = store
        .get_employee(number)
        .await?
        .ok_or_else(|| PayrollError::not_found(format!("Employee {number}")))?;
    let history = store.payments_for_employee(number).await?;

    Ok(EmployeeSalaryHistory::new(employee, history))
}

#[utoipa::path(
    get,
    path = "/api/reports/employee-salary-history/{number}",
    params(("number", Path, description = "Employee number")),
    responses(
        (status = 200, body = EmployeeSalaryHistory),
        (status = 404, description = "Employee not found")
    ),
    tag = "Report"
)]
pub async fn employee_salary_history(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PayrollError> {
    let history = salary_history(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(history))
}

#[utoipa::path(
    get,
    path = "/api/reports/employee-salary-history/{number}/print",
    params(("number", Path, description = "Employee number")),
    responses(
        (status = 200, description = "History with signature block", body = EmployeeSalaryHistory),
        (status = 404, description = "Employee not found")
    ),
    tag = "Report"
)]
pub async fn employee_salary_history_print(
    store: web::Data<dyn PayrollStore>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse, PayrollError> {
    let history = salary_history(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(history.signed(signature(&config))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn month_query_defaults_to_current_month() {
        let query = MonthQuery { month: None };
        assert_eq!(
            query.month().unwrap(),
            first_of_month(Local::now().date_naive())
        );
    }

    #[test]
    fn month_query_normalises_day() {
        let query = MonthQuery {
            month: Some("2025-01-20".into()),
        };
        assert_eq!(
            query.month().unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn signature_uses_configured_names() {
        let sig = signature(&Config::default());
        assert_eq!(sig.prepared_by, "Payroll Officer");
        assert_eq!(sig.approved_by, "Finance Manager");
    }
}
