use actix_web::{HttpResponse, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::PayrollError,
    model::department::Department,
    store::PayrollStore,
    utils::validate::{amount, bounded, max_len, non_negative, required},
};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    #[schema(example = "ENG")]
    pub department_code: Option<String>,

    #[schema(example = "Engineering")]
    pub department_name: Option<String>,

    #[schema(value_type = f64, example = 75000.0)]
    pub gross_salary: Option<Decimal>,

    #[schema(value_type = f64, example = 15000.0)]
    pub total_deduction: Option<Decimal>,
}

impl CreateDepartment {
    pub fn validate(self) -> Result<Department, PayrollError> {
        let code = required("Department code", self.department_code)?;
        let code = max_len("Department code", code, 10)?;
        let name = required("Department name", self.department_name)?;
        let name = max_len("Department name", name, 100)?;
        let gross = amount("Gross salary", self.gross_salary)?;
        let deduction = amount("Total deduction", self.total_deduction)?;

        Ok(Department::new(code, name, gross, deduction))
    }
}

/// Fields left out keep their current value.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    #[schema(example = "Engineering")]
    pub department_name: Option<String>,

    #[schema(value_type = f64, example = 80000.0)]
    pub gross_salary: Option<Decimal>,

    #[schema(value_type = f64, example = 16000.0)]
    pub total_deduction: Option<Decimal>,
}

impl UpdateDepartment {
    pub fn apply(self, current: Department) -> Result<Department, PayrollError> {
        let name = bounded("Department name", self.department_name, 100)?
            .unwrap_or(current.department_name);
        let gross = match self.gross_salary {
            Some(v) => non_negative("Gross salary", v)?,
            None => current.gross_salary,
        };
        let deduction = match self.total_deduction {
            Some(v) => non_negative("Total deduction", v)?,
            None => current.total_deduction,
        };

        Ok(Department::new(current.department_code, name, gross, deduction))
    }
}

#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "All departments ordered by code", body = [Department])
    ),
    tag = "Department"
)]
pub async fn list_departments(
    store: web::Data<dyn PayrollStore>,
) -> Result<HttpResponse, PayrollError> {
    let departments = store.list_departments().await?;
    Ok(HttpResponse::Ok().json(departments))
}

#[utoipa::path(
    get,
    path = "/api/departments/{code}",
    params(("code", Path, description = "Department code")),
    responses(
        (status = 200, body = Department),
        (status = 404, description = "Department not found", body = Object, example = json!({
            "message": "Department ENG not found"
        }))
    ),
    tag = "Department"
)]
pub async fn get_department(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PayrollError> {
    let code = path.into_inner();
    match store.get_department(&code).await? {
        Some(department) => Ok(HttpResponse::Ok().json(department)),
        None => Err(PayrollError::not_found(format!("Department {code}"))),
    }
}

/// Create Department; net salary is derived from gross and deduction
#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Missing or invalid field", body = Object, example = json!({
            "message": "Department name is required"
        })),
        (status = 409, description = "Department code already exists")
    ),
    tag = "Department"
)]
pub async fn create_department(
    store: web::Data<dyn PayrollStore>,
    payload: web::Json<CreateDepartment>,
) -> Result<HttpResponse, PayrollError> {
    let department = payload.into_inner().validate()?;

    store.insert_department(&department).await?;

    info!(
        department_code = %department.department_code,
        net_salary = %department.net_salary,
        "Department created"
    );

    Ok(HttpResponse::Created().json(department))
}

#[utoipa::path(
    put,
    path = "/api/departments/{code}",
    params(("code", Path, description = "Department code")),
    request_body = UpdateDepartment,
    responses(
        (status = 200, description = "Department updated, net salary recomputed", body = Department),
        (status = 404, description = "Department not found")
    ),
    tag = "Department"
)]
pub async fn update_department(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<String>,
    payload: web::Json<UpdateDepartment>,
) -> Result<HttpResponse, PayrollError> {
    let code = path.into_inner();

    let current = store
        .get_department(&code)
        .await?
        .ok_or_else(|| PayrollError::not_found(format!("Department {code}")))?;

    let department = payload.into_inner().apply(current)?;
    store.update_department(&department).await?;

    info!(department_code = %code, "Department updated");

    Ok(HttpResponse::Ok().json(department))
}

#[utoipa::path(
    delete,
    path = "/api/departments/{code}",
    params(("code", Path, description = "Department code")),
    responses(
        (status = 200, description = "Department deleted", body = Object, example = json!({
            "message": "Department deleted successfully"
        })),
        (status = 400, description = "Employees still belong to the department"),
        (status = 404, description = "Department not found")
    ),
    tag = "Department"
)]
pub async fn delete_department(
    store: web::Data<dyn PayrollStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PayrollError> {
    let code = path.into_inner();

    store.delete_department(&code).await?;

    info!(department_code = %code, "Department deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department deleted successfully"
    })))
}
