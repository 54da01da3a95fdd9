use crate::{
    api::{dashboard, department, employee, report, salary},
    config::Config,
    error::PayrollError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, get, web};
use anyhow::{Context, Result};
use serde_json::json;

pub type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` requests with a full-minute burst.
pub fn build_limiter(requests_per_min: u32) -> Result<LimiterConfig> {
    anyhow::ensure!(
        requests_per_min > 0,
        "RATE_API_PER_MIN must be greater than zero"
    );
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("Invalid rate limiter configuration")
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: &LimiterConfig) {
    // Extractor failures answer with the same {"message": ...} body as handlers
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        PayrollError::validation(format!("Invalid request body: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        PayrollError::validation(format!("Invalid path parameter: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        PayrollError::validation(format!("Invalid query: {err}")).into()
    }));

    cfg.service(health);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(limiter)) // rate limiting
            .service(
                web::scope("/departments")
                    // /departments
                    .service(
                        web::resource("")
                            .route(web::get().to(department::list_departments))
                            .route(web::post().to(department::create_department)),
                    )
                    // /departments/{code}
                    .service(
                        web::resource("/{code}")
                            .route(web::get().to(department::get_department))
                            .route(web::put().to(department::update_department))
                            .route(web::delete().to(department::delete_department)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/list, registered before /{number}
                    .service(
                        web::resource("/list")
                            .route(web::get().to(employee::list_employee_summaries)),
                    )
                    // /employees/{number}
                    .service(
                        web::resource("/{number}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    .service(
                        web::resource("/{number}/salary-info")
                            .route(web::get().to(employee::get_salary_info)),
                    )
                    .service(
                        web::resource("/{number}/salaries")
                            .route(web::get().to(employee::list_employee_salaries)),
                    ),
            )
            .service(
                web::scope("/salaries")
                    // /salaries
                    .service(
                        web::resource("")
                            .route(web::get().to(salary::list_salaries))
                            .route(web::post().to(salary::create_salary)),
                    )
                    // /salaries/check/{employeeNumber}/{month}
                    .service(
                        web::resource("/check/{employee_number}/{month}")
                            .route(web::get().to(salary::check_salary)),
                    )
                    // /salaries/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(salary::get_salary))
                            .route(web::put().to(salary::update_salary))
                            .route(web::delete().to(salary::delete_salary)),
                    ),
            )
            .service(
                web::scope("/reports")
                    .service(
                        web::resource("/departments")
                            .route(web::get().to(report::department_report)),
                    )
                    .service(
                        web::resource("/monthly-payroll")
                            .route(web::get().to(report::monthly_payroll)),
                    )
                    .service(
                        web::resource("/monthly-payroll/print")
                            .route(web::get().to(report::monthly_payroll_print)),
                    )
                    .service(
                        web::resource("/employee-salary-history/{number}")
                            .route(web::get().to(report::employee_salary_history)),
                    )
                    .service(
                        web::resource("/employee-salary-history/{number}/print")
                            .route(web::get().to(report::employee_salary_history_print)),
                    ),
            )
            .service(
                web::resource("/dashboard/stats").route(web::get().to(dashboard::stats)),
            ),
    );
}
