//! End-to-end checks through the full route table, backed by the demo
//! in-memory store.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{
    App,
    http::StatusCode,
    test::{self, TestRequest},
    web::Data,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{
    config::Config,
    routes,
    store::{MemoryStore, PayrollStore},
};

macro_rules! test_app {
    () => {{
        let store: Arc<dyn PayrollStore> = Arc::new(MemoryStore::with_demo_data());
        let config = Config::default();
        let limiter = routes::build_limiter(config.rate_api_per_min).unwrap();
        test::init_service(
            App::new()
                .app_data(Data::from(store))
                .app_data(Data::new(config.clone()))
                .configure(move |cfg| routes::configure(cfg, &config, &limiter)),
        )
        .await
    }};
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

fn get(uri: &str) -> TestRequest {
    TestRequest::get().uri(uri).peer_addr(peer())
}

fn post(uri: &str, body: Value) -> TestRequest {
    TestRequest::post().uri(uri).peer_addr(peer()).set_json(body)
}

fn put(uri: &str, body: Value) -> TestRequest {
    TestRequest::put().uri(uri).peer_addr(peer()).set_json(body)
}

fn delete(uri: &str) -> TestRequest {
    TestRequest::delete().uri(uri).peer_addr(peer())
}

fn payment(employee_number: &str, month: &str) -> Value {
    json!({
        "employeeNumber": employee_number,
        "grossSalary": 75000.0,
        "totalDeduction": 15000.0,
        "netSalary": 60000.0,
        "month": month,
        "paymentDate": "2025-01-28"
    })
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = test_app!();

    let resp = test::call_service(&app, get("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn create_department_computes_net_salary() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        post(
            "/api/departments",
            json!({
                "departmentCode": "FIN",
                "departmentName": "Finance",
                "grossSalary": 75000,
                "totalDeduction": 15000,
                "netSalary": 1
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["department_code"], "FIN");
    assert_eq!(body["net_salary"], json!(60000.0));

    let resp = test::call_service(&app, get("/api/departments/FIN").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn create_department_rejects_duplicate_code() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        post(
            "/api/departments",
            json!({
                "departmentCode": "ENG",
                "departmentName": "Engineering again",
                "grossSalary": 1000,
                "totalDeduction": 100
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn update_department_recomputes_net_salary() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        put("/api/departments/HR", json!({ "grossSalary": 70000 })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["department_name"], "Human Resources");
    assert_eq!(body["net_salary"], json!(57000.0));
}

#[actix_web::test]
async fn delete_department_only_when_unused() {
    let app = test_app!();

    let resp = test::call_service(&app, delete("/api/departments/HR").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        post(
            "/api/departments",
            json!({
                "departmentCode": "OPS",
                "departmentName": "Operations",
                "grossSalary": 50000,
                "totalDeduction": 5000
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, delete("/api/departments/OPS").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, get("/api/departments/OPS").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_employee_validates_fields_and_department() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        post(
            "/api/employees",
            json!({
                "employeeNumber": "EMP003",
                "lastName": "Uwase",
                "position": "Accountant",
                "hiredDate": "2024-06-01",
                "departmentCode": "HR"
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "First name is required");

    let resp = test::call_service(
        &app,
        post(
            "/api/employees",
            json!({
                "employeeNumber": "EMP003",
                "firstName": "Alice",
                "lastName": "Uwase",
                "position": "Accountant",
                "hiredDate": "2024-06-01",
                "departmentCode": "XYZ"
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Department XYZ does not exist");

    let resp = test::call_service(
        &app,
        post(
            "/api/employees",
            json!({
                "employeeNumber": "EMP003",
                "firstName": "Alice",
                "lastName": "Uwase",
                "position": "Accountant",
                "gender": "Female",
                "hiredDate": "2024-06-01",
                "departmentCode": "HR"
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/employees/list").to_request()).await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
    assert_eq!(body[2]["employee_number"], "EMP003");
    assert_eq!(body[2]["department_name"], "Human Resources");
}

#[actix_web::test]
async fn malformed_body_is_a_validation_error() {
    let app = test_app!();

    let req = TestRequest::post()
        .uri("/api/departments")
        .peer_addr(peer())
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.starts_with("Invalid request body"), "{message}");
}

#[actix_web::test]
async fn salary_info_uses_department_defaults() {
    let app = test_app!();

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/employees/EMP001/salary-info").to_request(),
    )
    .await;
    assert_eq!(body["department_code"], "ENG");
    assert_eq!(body["gross_salary"], json!(75000.0));
    assert_eq!(body["net_salary"], json!(60000.0));

    let resp =
        test::call_service(&app, get("/api/employees/EMP404/salary-info").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn second_payment_for_same_month_is_rejected() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        post("/api/salaries", payment("EMP001", "2025-01-01")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first: Value = test::read_body_json(resp).await;
    assert_eq!(first["month"], "2025-01-01");
    assert_eq!(first["net_salary"], json!(60000.0));

    let resp = test::call_service(
        &app,
        post("/api/salaries", payment("EMP001", "2025-01")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "Employee EMP001 has already been paid for January 2025"
    );

    let resp = test::call_service(
        &app,
        post("/api/salaries", payment("EMP001", "2025-02")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/salaries").to_request()).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["month"], "2025-02-01");
    assert_eq!(body[0]["first_name"], "John");
}

#[actix_web::test]
async fn payment_for_unknown_employee_is_not_found() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        post("/api/salaries", payment("EMP404", "2025-01")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn check_endpoint_reports_existing_payment() {
    let app = test_app!();

    test::call_service(
        &app,
        post("/api/salaries", payment("EMP001", "2025-01")).to_request(),
    )
    .await;

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/salaries/check/EMP001/2025-01-15").to_request(),
    )
    .await;
    assert_eq!(body["hasPaid"], true);
    assert_eq!(body["payment"]["employee_number"], "EMP001");

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/salaries/check/EMP002/2025-01").to_request(),
    )
    .await;
    assert_eq!(body, json!({ "hasPaid": false, "payment": null }));

    let resp = test::call_service(
        &app,
        get("/api/salaries/check/EMP001/not-a-month").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_payment_cannot_move_onto_paid_month() {
    let app = test_app!();

    let jan: Value = test::call_and_read_body_json(
        &app,
        post("/api/salaries", payment("EMP001", "2025-01")).to_request(),
    )
    .await;
    let feb: Value = test::call_and_read_body_json(
        &app,
        post("/api/salaries", payment("EMP001", "2025-02")).to_request(),
    )
    .await;

    let uri = format!("/api/salaries/{}", feb["id"]);
    let resp = test::call_service(&app, put(&uri, json!({ "month": "2025-01" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
        &app,
        put(&uri, json!({ "totalDeduction": 20000 })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["net_salary"], json!(55000.0));
    assert_eq!(body["month"], "2025-02-01");

    let uri = format!("/api/salaries/{}", jan["id"]);
    let resp = test::call_service(&app, delete(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, get(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn non_numeric_salary_id_is_a_validation_error() {
    let app = test_app!();

    let resp = test::call_service(&app, get("/api/salaries/abc").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn employee_with_payments_cannot_be_deleted() {
    let app = test_app!();

    test::call_service(
        &app,
        post("/api/salaries", payment("EMP002", "2025-01")).to_request(),
    )
    .await;

    let resp = test::call_service(&app, delete("/api/employees/EMP002").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, delete("/api/employees/EMP001").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn monthly_print_report_carries_totals_and_signature() {
    let app = test_app!();

    for (number, month) in [("EMP001", "2025-01"), ("EMP002", "2025-01"), ("EMP001", "2025-02")] {
        let resp =
            test::call_service(&app, post("/api/salaries", payment(number, month)).to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let rows: Value = test::call_and_read_body_json(
        &app,
        get("/api/reports/monthly-payroll?month=2025-01-01").to_request(),
    )
    .await;
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
    assert_eq!(rows[0]["employee_number"], "EMP001");
    assert_eq!(rows[1]["department_name"], "Human Resources");

    let report: Value = test::call_and_read_body_json(
        &app,
        get("/api/reports/monthly-payroll/print?month=2025-01").to_request(),
    )
    .await;
    assert_eq!(report["month"], "2025-01-01");
    assert_eq!(report["employeeCount"], 2);
    assert_eq!(report["totals"]["totalGross"], json!(150000.0));
    assert_eq!(report["totals"]["totalNet"], json!(120000.0));
    assert_eq!(report["signature"]["preparedBy"], "Payroll Officer");
    assert_eq!(report["signature"]["approvedBy"], "Finance Manager");
}

#[actix_web::test]
async fn salary_history_lists_newest_first() {
    let app = test_app!();

    for month in ["2025-01", "2025-03", "2025-02"] {
        test::call_service(&app, post("/api/salaries", payment("EMP001", month)).to_request())
            .await;
    }

    let history: Value = test::call_and_read_body_json(
        &app,
        get("/api/reports/employee-salary-history/EMP001").to_request(),
    )
    .await;
    assert_eq!(history["employee"]["first_name"], "John");
    assert_eq!(history["employee"]["department_name"], "Engineering");
    assert_eq!(history["totalPayments"], 3);
    assert_eq!(history["salaryHistory"][0]["month"], "2025-03-01");
    assert_eq!(history["totals"]["totalNet"], json!(180000.0));
    assert!(history.get("signature").is_none());

    let payments: Value = test::call_and_read_body_json(
        &app,
        get("/api/employees/EMP001/salaries").to_request(),
    )
    .await;
    assert_eq!(payments.as_array().map(Vec::len), Some(3));
    assert_eq!(payments[2]["month"], "2025-01-01");

    let printed: Value = test::call_and_read_body_json(
        &app,
        get("/api/reports/employee-salary-history/EMP001/print").to_request(),
    )
    .await;
    assert_eq!(printed["signature"]["preparedBy"], "Payroll Officer");

    let resp = test::call_service(
        &app,
        get("/api/reports/employee-salary-history/EMP404").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn department_report_aggregates_payments() {
    let app = test_app!();

    test::call_service(&app, post("/api/salaries", payment("EMP001", "2025-01")).to_request())
        .await;
    test::call_service(&app, post("/api/salaries", payment("EMP001", "2025-02")).to_request())
        .await;

    let report: Value =
        test::call_and_read_body_json(&app, get("/api/reports/departments").to_request()).await;

    assert_eq!(report[0]["department_code"], "ENG");
    assert_eq!(report[0]["employee_count"], 1);
    assert_eq!(report[0]["payment_count"], 2);
    assert_eq!(report[0]["average_net_salary"], json!(60000.0));
    assert_eq!(report[1]["department_code"], "HR");
    assert_eq!(report[1]["payment_count"], 0);
    assert_eq!(report[1]["average_net_salary"], json!(0.0));
}

#[actix_web::test]
async fn dashboard_counts_demo_data() {
    let app = test_app!();

    let stats: Value =
        test::call_and_read_body_json(&app, get("/api/dashboard/stats").to_request()).await;

    assert_eq!(stats["totalEmployees"], 2);
    assert_eq!(stats["totalDepartments"], 2);
    assert_eq!(stats["totalPayments"], 0);
    assert_eq!(stats["currentMonthPayments"], 0);
}

#[actix_web::test]
async fn oversized_amount_is_rejected_before_reports_can_overflow() {
    let app = test_app!();

    for month in ["2025-01", "2025-02"] {
        let resp = test::call_service(
            &app,
            post(
                "/api/salaries",
                json!({
                    "employeeNumber": "EMP001",
                    "grossSalary": "70000000000000000000000000000",
                    "totalDeduction": 0,
                    "month": month
                }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Gross salary must not exceed 9999999999.99");
    }

    let history: Value = test::call_and_read_body_json(
        &app,
        get("/api/reports/employee-salary-history/EMP001").to_request(),
    )
    .await;
    assert_eq!(history["totalPayments"], 0);
}

#[actix_web::test]
async fn overlong_employee_name_is_a_validation_error() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        post(
            "/api/employees",
            json!({
                "employeeNumber": "EMP003",
                "firstName": "A".repeat(51),
                "lastName": "Uwase",
                "position": "Accountant",
                "hiredDate": "2024-06-01",
                "departmentCode": "HR"
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "First name must be at most 50 characters");

    let resp = test::call_service(&app, get("/api/employees/EMP003").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
