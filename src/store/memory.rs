use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    error::PayrollError,
    model::{
        department::Department,
        employee::{Employee, EmployeeView, Gender},
        salary::{NewSalaryPayment, PaymentRecord, SalaryPayment},
    },
    payroll::{
        guard::{ensure_unpaid, find_month_payment},
        month::first_of_month,
    },
};

use super::PayrollStore;

#[derive(Default)]
struct Tables {
    departments: BTreeMap<String, Department>,
    employees: BTreeMap<String, Employee>,
    payments: BTreeMap<u64, SalaryPayment>,
    last_payment_id: u64,
}

impl Tables {
    fn employee_view(&self, employee: &Employee) -> EmployeeView {
        let department_name = self
            .departments
            .get(&employee.department_code)
            .map(|d| d.department_name.clone())
            .unwrap_or_default();

        EmployeeView {
            employee: employee.clone(),
            department_name,
        }
    }

    fn payment_record(&self, payment: &SalaryPayment) -> PaymentRecord {
        let view = self
            .employees
            .get(&payment.employee_number)
            .map(|e| self.employee_view(e));

        PaymentRecord {
            payment: payment.clone(),
            first_name: view.as_ref().map(|v| v.employee.first_name.clone()).unwrap_or_default(),
            last_name: view.as_ref().map(|v| v.employee.last_name.clone()).unwrap_or_default(),
            position: view.as_ref().map(|v| v.employee.position.clone()).unwrap_or_default(),
            department_name: view.map(|v| v.department_name).unwrap_or_default(),
        }
    }

    fn require_department(&self, code: &str) -> Result<(), PayrollError> {
        if self.departments.contains_key(code) {
            Ok(())
        } else {
            Err(PayrollError::UnknownDepartment(code.to_string()))
        }
    }
}

/// Keeps everything in process memory behind one lock.
///
/// Used when no database is configured and by the tests. Every write takes
/// the write lock for its whole check-and-modify, so the duplicate-payment
/// rule holds under concurrent requests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Two departments and two employees, enough to click around in.
    pub fn with_demo_data() -> Self {
        let mut tables = Tables::default();

        for department in [
            Department::new("ENG", "Engineering", Decimal::new(75000, 0), Decimal::new(15000, 0)),
            Department::new("HR", "Human Resources", Decimal::new(65000, 0), Decimal::new(13000, 0)),
        ] {
            tables
                .departments
                .insert(department.department_code.clone(), department);
        }

        for employee in [
            demo_employee("EMP001", "John", "Doe", "Developer", Gender::Male, "ENG"),
            demo_employee("EMP002", "Jane", "Smith", "Manager", Gender::Female, "HR"),
        ] {
            tables
                .employees
                .insert(employee.employee_number.clone(), employee);
        }

        Self {
            tables: RwLock::new(tables),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, PayrollError> {
        self.tables
            .read()
            .map_err(|_| PayrollError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, PayrollError> {
        self.tables
            .write()
            .map_err(|_| PayrollError::Internal("memory store lock poisoned".into()))
    }
}

fn demo_employee(
    number: &str,
    first_name: &str,
    last_name: &str,
    position: &str,
    gender: Gender,
    department_code: &str,
) -> Employee {
    Employee {
        employee_number: number.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        position: position.to_string(),
        address: None,
        telephone: None,
        gender: Some(gender),
        hired_date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or(NaiveDate::MIN),
        department_code: department_code.to_string(),
    }
}

fn newest_first(a: &SalaryPayment, b: &SalaryPayment) -> std::cmp::Ordering {
    b.month
        .cmp(&a.month)
        .then_with(|| a.employee_number.cmp(&b.employee_number))
        .then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl PayrollStore for MemoryStore {
    async fn list_departments(&self) -> Result<Vec<Department>, PayrollError> {
        Ok(self.read()?.departments.values().cloned().collect())
    }

    async fn get_department(&self, code: &str) -> Result<Option<Department>, PayrollError> {
        Ok(self.read()?.departments.get(code).cloned())
    }

    async fn insert_department(&self, department: &Department) -> Result<(), PayrollError> {
        let mut tables = self.write()?;
        if tables.departments.contains_key(&department.department_code) {
            return Err(PayrollError::DuplicateDepartment(
                department.department_code.clone(),
            ));
        }
        tables
            .departments
            .insert(department.department_code.clone(), department.clone());
        Ok(())
    }

    async fn update_department(&self, department: &Department) -> Result<(), PayrollError> {
        let mut tables = self.write()?;
        match tables.departments.get_mut(&department.department_code) {
            Some(existing) => {
                *existing = department.clone();
                Ok(())
            }
            None => Err(PayrollError::not_found(format!(
                "Department {}",
                department.department_code
            ))),
        }
    }

    async fn delete_department(&self, code: &str) -> Result<(), PayrollError> {
        let mut tables = self.write()?;
        if !tables.departments.contains_key(code) {
            return Err(PayrollError::not_found(format!("Department {code}")));
        }
        if tables.employees.values().any(|e| e.department_code == code) {
            return Err(PayrollError::DepartmentInUse(code.to_string()));
        }
        tables.departments.remove(code);
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<EmployeeView>, PayrollError> {
        let tables = self.read()?;
        Ok(tables
            .employees
            .values()
            .map(|e| tables.employee_view(e))
            .collect())
    }

    async fn get_employee(&self, number: &str) -> Result<Option<EmployeeView>, PayrollError> {
        let tables = self.read()?;
        Ok(tables.employees.get(number).map(|e| tables.employee_view(e)))
    }

    async fn insert_employee(&self, employee: &Employee) -> Result<(), PayrollError> {
        let mut tables = self.write()?;
        tables.require_department(&employee.department_code)?;
        if tables.employees.contains_key(&employee.employee_number) {
            return Err(PayrollError::DuplicateEmployee(
                employee.employee_number.clone(),
            ));
        }
        tables
            .employees
            .insert(employee.employee_number.clone(), employee.clone());
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> Result<(), PayrollError> {
        let mut tables = self.write()?;
        if !tables.employees.contains_key(&employee.employee_number) {
            return Err(PayrollError::not_found(format!(
                "Employee {}",
                employee.employee_number
            )));
        }
        tables.require_department(&employee.department_code)?;
        tables
            .employees
            .insert(employee.employee_number.clone(), employee.clone());
        Ok(())
    }

    async fn delete_employee(&self, number: &str) -> Result<(), PayrollError> {
        let mut tables = self.write()?;
        if !tables.employees.contains_key(number) {
            return Err(PayrollError::not_found(format!("Employee {number}")));
        }
        if tables.payments.values().any(|p| p.employee_number == number) {
            return Err(PayrollError::EmployeeHasPayments(number.to_string()));
        }
        tables.employees.remove(number);
        Ok(())
    }

    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, PayrollError> {
        let tables = self.read()?;
        let mut payments: Vec<_> = tables.payments.values().collect();
        payments.sort_by(|a, b| newest_first(a, b));
        Ok(payments.into_iter().map(|p| tables.payment_record(p)).collect())
    }

    async fn get_payment(&self, id: u64) -> Result<Option<PaymentRecord>, PayrollError> {
        let tables = self.read()?;
        Ok(tables.payments.get(&id).map(|p| tables.payment_record(p)))
    }

    async fn payments_for_employee(
        &self,
        number: &str,
    ) -> Result<Vec<SalaryPayment>, PayrollError> {
        let tables = self.read()?;
        let mut payments: Vec<_> = tables
            .payments
            .values()
            .filter(|p| p.employee_number == number)
            .cloned()
            .collect();
        payments.sort_by(newest_first);
        Ok(payments)
    }

    async fn payments_for_month(
        &self,
        month: NaiveDate,
    ) -> Result<Vec<PaymentRecord>, PayrollError> {
        let month = first_of_month(month);
        let tables = self.read()?;
        let mut payments: Vec<_> = tables
            .payments
            .values()
            .filter(|p| p.month == month)
            .collect();
        payments.sort_by(|a, b| a.employee_number.cmp(&b.employee_number));
        Ok(payments.into_iter().map(|p| tables.payment_record(p)).collect())
    }

    async fn find_payment(
        &self,
        number: &str,
        month: NaiveDate,
    ) -> Result<Option<SalaryPayment>, PayrollError> {
        let tables = self.read()?;
        Ok(find_month_payment(tables.payments.values(), number, month).cloned())
    }

    async fn insert_payment(
        &self,
        payment: NewSalaryPayment,
    ) -> Result<SalaryPayment, PayrollError> {
        let mut tables = self.write()?;
        if !tables.employees.contains_key(&payment.employee_number) {
            return Err(PayrollError::not_found(format!(
                "Employee {}",
                payment.employee_number
            )));
        }
        ensure_unpaid(
            tables.payments.values(),
            &payment.employee_number,
            payment.month,
            None,
        )?;

        tables.last_payment_id += 1;
        let payment = payment.with_id(tables.last_payment_id);
        tables.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn update_payment(&self, payment: &SalaryPayment) -> Result<(), PayrollError> {
        let mut tables = self.write()?;
        if !tables.payments.contains_key(&payment.id) {
            return Err(PayrollError::not_found(format!("Salary record {}", payment.id)));
        }
        ensure_unpaid(
            tables.payments.values(),
            &payment.employee_number,
            payment.month,
            Some(payment.id),
        )?;
        tables.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn delete_payment(&self, id: u64) -> Result<(), PayrollError> {
        let mut tables = self.write()?;
        match tables.payments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(PayrollError::not_found(format!("Salary record {id}"))),
        }
    }
}
