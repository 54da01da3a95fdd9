use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use derive_more::{Display, Error};
use serde_json::json;

/// Everything a payroll operation can fail with.
///
/// Handlers return this directly; [`ResponseError`] turns it into a
/// `{"message": ...}` body with the matching status code.
#[derive(Debug, Display, Error)]
pub enum PayrollError {
    #[display(fmt = "{}", _0)]
    Validation(#[error(not(source))] String),

    #[display(fmt = "{} not found", _0)]
    NotFound(#[error(not(source))] String),

    #[display(fmt = "Department {} does not exist", _0)]
    UnknownDepartment(#[error(not(source))] String),

    #[display(fmt = "Cannot delete department {}: employees are still assigned to it", _0)]
    DepartmentInUse(#[error(not(source))] String),

    #[display(fmt = "Cannot delete employee {}: salary payments exist for this employee", _0)]
    EmployeeHasPayments(#[error(not(source))] String),

    #[display(fmt = "Department code {} already exists", _0)]
    DuplicateDepartment(#[error(not(source))] String),

    #[display(fmt = "Employee number {} already exists", _0)]
    DuplicateEmployee(#[error(not(source))] String),

    #[display(
        fmt = "Employee {} has already been paid for {}",
        employee_number,
        "month.format(\"%B %Y\")"
    )]
    DuplicatePayment {
        employee_number: String,
        month: NaiveDate,
    },

    #[display(fmt = "Database error: {}", _0)]
    Database(sqlx::Error),

    #[display(fmt = "{}", _0)]
    Internal(#[error(not(source))] String),
}

impl PayrollError {
    pub fn validation(message: impl Into<String>) -> Self {
        PayrollError::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        PayrollError::NotFound(what.into())
    }
}

impl From<sqlx::Error> for PayrollError {
    fn from(e: sqlx::Error) -> Self {
        PayrollError::Database(e)
    }
}

impl ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::Validation(_)
            | PayrollError::UnknownDepartment(_)
            | PayrollError::DepartmentInUse(_)
            | PayrollError::EmployeeHasPayments(_) => StatusCode::BAD_REQUEST,
            PayrollError::NotFound(_) => StatusCode::NOT_FOUND,
            PayrollError::DuplicateDepartment(_)
            | PayrollError::DuplicateEmployee(_)
            | PayrollError::DuplicatePayment { .. } => StatusCode::CONFLICT,
            PayrollError::Database(_) | PayrollError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            PayrollError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Something went wrong, Contact with system admin".to_string()
            }
            PayrollError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Something went wrong, Contact with system admin".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

/// True when MySQL rejected a write on a unique key (duplicate entry).
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// True when a foreign key blocked the write (parent missing or still referenced).
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_foreign_key_violation(),
        _ => false,
    }
}
