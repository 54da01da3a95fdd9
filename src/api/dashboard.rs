use actix_web::{HttpResponse, web};
use chrono::Local;

use crate::{
    error::PayrollError,
    model::salary::SalaryPayment,
    payroll::report::{DashboardStats, dashboard_stats},
    store::PayrollStore,
};

/// Headline figures for the landing page
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, body = DashboardStats)
    ),
    tag = "Dashboard"
)]
pub async fn stats(store: web::Data<dyn PayrollStore>) -> Result<HttpResponse, PayrollError> {
    let departments = store.list_departments().await?;
    let employees = store.list_employees().await?;
    let payments: Vec<SalaryPayment> = store
        .list_payments()
        .await?
        .into_iter()
        .map(|record| record.payment)
        .collect();

    let stats = dashboard_stats(
        Local::now().date_naive(),
        departments.len(),
        employees.len(),
        &payments,
    );

    Ok(HttpResponse::Ok().json(stats))
}
