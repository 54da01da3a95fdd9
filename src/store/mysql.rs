use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, warn};

use crate::{
    error::{PayrollError, is_foreign_key_violation, is_unique_violation},
    model::{
        department::Department,
        employee::{Employee, EmployeeSummary, EmployeeView, Gender},
        salary::{NewSalaryPayment, PaymentRecord, SalaryPayment},
    },
    payroll::month::first_of_month,
};

use super::PayrollStore;

const EMPLOYEE_COLUMNS: &str = r#"
    e.employee_number, e.first_name, e.last_name, e.position, e.address,
    e.telephone, e.gender, e.hired_date, e.department_code,
    d.department_name
"#;

const PAYMENT_COLUMNS: &str = r#"
    s.id, s.employee_number, s.gross_salary, s.total_deduction, s.net_salary,
    s.month, s.payment_date,
    e.first_name, e.last_name, e.position, d.department_name
"#;

#[derive(FromRow)]
struct EmployeeRow {
    employee_number: String,
    first_name: String,
    last_name: String,
    position: String,
    address: Option<String>,
    telephone: Option<String>,
    gender: Option<String>,
    hired_date: NaiveDate,
    department_code: String,
    department_name: String,
}

impl From<EmployeeRow> for EmployeeView {
    fn from(row: EmployeeRow) -> Self {
        let gender = match row.gender.as_deref().map(str::parse::<Gender>) {
            Some(Ok(gender)) => Some(gender),
            Some(Err(_)) => {
                warn!(employee_number = %row.employee_number, gender = ?row.gender, "Unknown gender value");
                None
            }
            None => None,
        };

        EmployeeView {
            employee: Employee {
                employee_number: row.employee_number,
                first_name: row.first_name,
                last_name: row.last_name,
                position: row.position,
                address: row.address,
                telephone: row.telephone,
                gender,
                hired_date: row.hired_date,
                department_code: row.department_code,
            },
            department_name: row.department_name,
        }
    }
}

#[derive(FromRow)]
struct PaymentRow {
    id: u64,
    employee_number: String,
    gross_salary: Decimal,
    total_deduction: Decimal,
    net_salary: Decimal,
    month: NaiveDate,
    payment_date: NaiveDate,
    first_name: String,
    last_name: String,
    position: String,
    department_name: String,
}

impl From<PaymentRow> for PaymentRecord {
    fn from(row: PaymentRow) -> Self {
        PaymentRecord {
            payment: SalaryPayment {
                id: row.id,
                employee_number: row.employee_number,
                gross_salary: row.gross_salary,
                total_deduction: row.total_deduction,
                net_salary: row.net_salary,
                month: row.month,
                payment_date: row.payment_date,
            },
            first_name: row.first_name,
            last_name: row.last_name,
            position: row.position,
            department_name: row.department_name,
        }
    }
}

/// [`PayrollStore`] over a MySQL connection pool.
///
/// Integrity rules are enforced by the schema in `migrations/` (foreign keys
/// and `UNIQUE (employee_number, month)`); the explicit checks here only turn
/// the common cases into precise errors before the database has to.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn employee_exists(&self, number: &str) -> Result<bool, PayrollError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_number = ? LIMIT 1)",
        )
        .bind(number)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn department_exists(&self, code: &str) -> Result<bool, PayrollError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE department_code = ? LIMIT 1)",
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

fn duplicate_payment(employee_number: &str, month: NaiveDate) -> PayrollError {
    PayrollError::DuplicatePayment {
        employee_number: employee_number.to_string(),
        month,
    }
}

/// Translates a failed write to `salaries`. The unique key on
/// `(employee_number, month)` is what settles concurrent inserts.
fn payment_write_error(e: sqlx::Error, employee_number: &str, month: NaiveDate) -> PayrollError {
    if is_unique_violation(&e) {
        warn!(employee_number, %month, "Concurrent duplicate payment rejected");
        duplicate_payment(employee_number, month)
    } else if is_foreign_key_violation(&e) {
        PayrollError::not_found(format!("Employee {employee_number}"))
    } else {
        e.into()
    }
}

#[async_trait]
impl PayrollStore for MySqlStore {
    async fn list_departments(&self) -> Result<Vec<Department>, PayrollError> {
        let departments = sqlx::query_as::<_, Department>(
            r#"
            SELECT department_code, department_name, gross_salary, total_deduction, net_salary
            FROM departments
            ORDER BY department_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(departments)
    }

    async fn get_department(&self, code: &str) -> Result<Option<Department>, PayrollError> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            SELECT department_code, department_name, gross_salary, total_deduction, net_salary
            FROM departments
            WHERE department_code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(department)
    }

    async fn insert_department(&self, department: &Department) -> Result<(), PayrollError> {
        let result = sqlx::query(
            r#"
            INSERT INTO departments
            (department_code, department_name, gross_salary, total_deduction, net_salary)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&department.department_code)
        .bind(&department.department_name)
        .bind(department.gross_salary)
        .bind(department.total_deduction)
        .bind(department.net_salary)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(PayrollError::DuplicateDepartment(
                department.department_code.clone(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_department(&self, department: &Department) -> Result<(), PayrollError> {
        if !self.department_exists(&department.department_code).await? {
            return Err(PayrollError::not_found(format!(
                "Department {}",
                department.department_code
            )));
        }

        // rows_affected is 0 for an unchanged row in MySQL, hence the check above
        sqlx::query(
            r#"
            UPDATE departments
            SET department_name = ?, gross_salary = ?, total_deduction = ?, net_salary = ?
            WHERE department_code = ?
            "#,
        )
        .bind(&department.department_name)
        .bind(department.gross_salary)
        .bind(department.total_deduction)
        .bind(department.net_salary)
        .bind(&department.department_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_department(&self, code: &str) -> Result<(), PayrollError> {
        let employees = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE department_code = ?",
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        if employees > 0 {
            debug!(department_code = code, employees, "Department still referenced");
            return Err(PayrollError::DepartmentInUse(code.to_string()));
        }

        let result = sqlx::query("DELETE FROM departments WHERE department_code = ?")
            .bind(code)
            .execute(&self.pool)
            .await;

        match result {
            Ok(res) if res.rows_affected() == 0 => {
                Err(PayrollError::not_found(format!("Department {code}")))
            }
            Ok(_) => Ok(()),
            // an employee was added between the count and the delete
            Err(e) if is_foreign_key_violation(&e) => {
                Err(PayrollError::DepartmentInUse(code.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_employees(&self) -> Result<Vec<EmployeeView>, PayrollError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees e \
             JOIN departments d ON d.department_code = e.department_code \
             ORDER BY e.employee_number"
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(EmployeeView::from).collect())
    }

    async fn list_employee_summaries(&self) -> Result<Vec<EmployeeSummary>, PayrollError> {
        let rows = sqlx::query_as::<_, EmployeeSummary>(
            r#"
            SELECT e.employee_number, e.first_name, e.last_name, e.position, d.department_name
            FROM employees e
            JOIN departments d ON d.department_code = e.department_code
            ORDER BY e.employee_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_employee(&self, number: &str) -> Result<Option<EmployeeView>, PayrollError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees e \
             JOIN departments d ON d.department_code = e.department_code \
             WHERE e.employee_number = ?"
        );
        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(EmployeeView::from))
    }

    async fn insert_employee(&self, employee: &Employee) -> Result<(), PayrollError> {
        if !self.department_exists(&employee.department_code).await? {
            return Err(PayrollError::UnknownDepartment(
                employee.department_code.clone(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (employee_number, first_name, last_name, position, address, telephone,
             gender, hired_date, department_code)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&employee.employee_number)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.position)
        .bind(&employee.address)
        .bind(&employee.telephone)
        .bind(employee.gender.map(|g| g.to_string()))
        .bind(employee.hired_date)
        .bind(&employee.department_code)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(PayrollError::DuplicateEmployee(
                employee.employee_number.clone(),
            )),
            Err(e) if is_foreign_key_violation(&e) => Err(PayrollError::UnknownDepartment(
                employee.department_code.clone(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_employee(&self, employee: &Employee) -> Result<(), PayrollError> {
        if !self.employee_exists(&employee.employee_number).await? {
            return Err(PayrollError::not_found(format!(
                "Employee {}",
                employee.employee_number
            )));
        }
        if !self.department_exists(&employee.department_code).await? {
            return Err(PayrollError::UnknownDepartment(
                employee.department_code.clone(),
            ));
        }

        let result = sqlx::query(
            r#"
            UPDATE employees
            SET first_name = ?, last_name = ?, position = ?, address = ?, telephone = ?,
                gender = ?, hired_date = ?, department_code = ?
            WHERE employee_number = ?
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.position)
        .bind(&employee.address)
        .bind(&employee.telephone)
        .bind(employee.gender.map(|g| g.to_string()))
        .bind(employee.hired_date)
        .bind(&employee.department_code)
        .bind(&employee.employee_number)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(PayrollError::UnknownDepartment(
                employee.department_code.clone(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_employee(&self, number: &str) -> Result<(), PayrollError> {
        let payments = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM salaries WHERE employee_number = ?",
        )
        .bind(number)
        .fetch_one(&self.pool)
        .await?;

        if payments > 0 {
            return Err(PayrollError::EmployeeHasPayments(number.to_string()));
        }

        let result = sqlx::query("DELETE FROM employees WHERE employee_number = ?")
            .bind(number)
            .execute(&self.pool)
            .await;

        match result {
            Ok(res) if res.rows_affected() == 0 => {
                Err(PayrollError::not_found(format!("Employee {number}")))
            }
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(PayrollError::EmployeeHasPayments(number.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, PayrollError> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM salaries s \
             JOIN employees e ON e.employee_number = s.employee_number \
             JOIN departments d ON d.department_code = e.department_code \
             ORDER BY s.month DESC, s.employee_number, s.id DESC"
        );
        let rows = sqlx::query_as::<_, PaymentRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(PaymentRecord::from).collect())
    }

    async fn get_payment(&self, id: u64) -> Result<Option<PaymentRecord>, PayrollError> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM salaries s \
             JOIN employees e ON e.employee_number = s.employee_number \
             JOIN departments d ON d.department_code = e.department_code \
             WHERE s.id = ?"
        );
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PaymentRecord::from))
    }

    async fn payments_for_employee(
        &self,
        number: &str,
    ) -> Result<Vec<SalaryPayment>, PayrollError> {
        let payments = sqlx::query_as::<_, SalaryPayment>(
            r#"
            SELECT id, employee_number, gross_salary, total_deduction, net_salary, month, payment_date
            FROM salaries
            WHERE employee_number = ?
            ORDER BY month DESC, id DESC
            "#,
        )
        .bind(number)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    async fn payments_for_month(
        &self,
        month: NaiveDate,
    ) -> Result<Vec<PaymentRecord>, PayrollError> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM salaries s \
             JOIN employees e ON e.employee_number = s.employee_number \
             JOIN departments d ON d.department_code = e.department_code \
             WHERE s.month = ? \
             ORDER BY s.employee_number"
        );
        let rows = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(first_of_month(month))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(PaymentRecord::from).collect())
    }

    async fn find_payment(
        &self,
        number: &str,
        month: NaiveDate,
    ) -> Result<Option<SalaryPayment>, PayrollError> {
        let payment = sqlx::query_as::<_, SalaryPayment>(
            r#"
            SELECT id, employee_number, gross_salary, total_deduction, net_salary, month, payment_date
            FROM salaries
            WHERE employee_number = ? AND month = ?
            "#,
        )
        .bind(number)
        .bind(first_of_month(month))
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    async fn insert_payment(
        &self,
        payment: NewSalaryPayment,
    ) -> Result<SalaryPayment, PayrollError> {
        let month = first_of_month(payment.month);

        if !self.employee_exists(&payment.employee_number).await? {
            return Err(PayrollError::not_found(format!(
                "Employee {}",
                payment.employee_number
            )));
        }

        // advisory; uq_salaries_employee_month decides under concurrency
        if self.find_payment(&payment.employee_number, month).await?.is_some() {
            return Err(duplicate_payment(&payment.employee_number, month));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO salaries
            (employee_number, gross_salary, total_deduction, net_salary, month, payment_date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.employee_number)
        .bind(payment.gross_salary)
        .bind(payment.total_deduction)
        .bind(payment.net_salary)
        .bind(month)
        .bind(payment.payment_date)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => {
                let id = res.last_insert_id();
                debug!(id, employee_number = %payment.employee_number, %month, "Salary payment stored");
                Ok(NewSalaryPayment { month, ..payment }.with_id(id))
            }
            Err(e) => Err(payment_write_error(e, &payment.employee_number, month)),
        }
    }

    async fn update_payment(&self, payment: &SalaryPayment) -> Result<(), PayrollError> {
        let month = first_of_month(payment.month);

        if let Some(existing) = self.find_payment(&payment.employee_number, month).await? {
            if existing.id != payment.id {
                return Err(duplicate_payment(&payment.employee_number, month));
            }
        }

        let result = sqlx::query(
            r#"
            UPDATE salaries
            SET gross_salary = ?, total_deduction = ?, net_salary = ?, month = ?, payment_date = ?
            WHERE id = ?
            "#,
        )
        .bind(payment.gross_salary)
        .bind(payment.total_deduction)
        .bind(payment.net_salary)
        .bind(month)
        .bind(payment.payment_date)
        .bind(payment.id)
        .execute(&self.pool)
        .await;

        // the caller has already loaded the row, so 0 affected rows only means unchanged
        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(payment_write_error(e, &payment.employee_number, month)),
        }
    }

    async fn delete_payment(&self, id: u64) -> Result<(), PayrollError> {
        let result = sqlx::query("DELETE FROM salaries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PayrollError::not_found(format!("Salary record {id}")));
        }
        Ok(())
    }
}
