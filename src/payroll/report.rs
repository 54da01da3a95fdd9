//! Aggregates behind the reporting and dashboard endpoints.
//!
//! Everything here works on collections already loaded from the store, in a
//! single pass over each input.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{
    department::Department,
    employee::{Employee, EmployeeView},
    salary::{PaymentRecord, SalaryPayment},
};

use super::{month::first_of_month, net::round_money};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DepartmentSummary {
    #[schema(example = "ENG")]
    pub department_code: String,
    #[schema(example = "Engineering")]
    pub department_name: String,
    #[schema(example = 4)]
    pub employee_count: u64,

    /// Department default figures
    #[schema(value_type = f64, example = 75000.0)]
    pub gross_salary: Decimal,
    #[schema(value_type = f64, example = 15000.0)]
    pub total_deduction: Decimal,
    #[schema(value_type = f64, example = 60000.0)]
    pub net_salary: Decimal,

    /// Payments made to employees of the department
    #[schema(example = 12)]
    pub payment_count: u64,
    #[schema(value_type = f64)]
    pub total_gross_paid: Decimal,
    #[schema(value_type = f64)]
    pub total_deduction_paid: Decimal,
    #[schema(value_type = f64)]
    pub total_net_paid: Decimal,
    #[schema(value_type = f64)]
    pub average_gross_salary: Decimal,
    #[schema(value_type = f64)]
    pub average_deduction: Decimal,
    #[schema(value_type = f64)]
    pub average_net_salary: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[schema(value_type = f64)]
    pub total_gross: Decimal,
    #[schema(value_type = f64)]
    pub total_deduction: Decimal,
    #[schema(value_type = f64)]
    pub total_net: Decimal,
}

impl Totals {
    fn add(&mut self, payment: &SalaryPayment) {
        self.total_gross += payment.gross_salary;
        self.total_deduction += payment.total_deduction;
        self.total_net += payment.net_salary;
    }

    pub fn of<'a>(payments: impl IntoIterator<Item = &'a SalaryPayment>) -> Self {
        let mut totals = Totals::default();
        for payment in payments {
            totals.add(payment);
        }
        totals
    }
}

fn average(sum: Decimal, count: u64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    round_money(sum / Decimal::from(count))
}

/// Per-department employee counts and payment sums/averages.
///
/// Rows follow the order of `departments`. Payments to employees that are not
/// in `employees` are not attributed to any department.
pub fn department_summaries<'a>(
    departments: &[Department],
    employees: impl IntoIterator<Item = &'a Employee>,
    payments: impl IntoIterator<Item = &'a SalaryPayment>,
) -> Vec<DepartmentSummary> {
    let index: HashMap<&str, usize> = departments
        .iter()
        .enumerate()
        .map(|(i, d)| (d.department_code.as_str(), i))
        .collect();

    let mut employee_counts = vec![0u64; departments.len()];
    let mut payment_counts = vec![0u64; departments.len()];
    let mut totals = vec![Totals::default(); departments.len()];
    let mut employee_department: HashMap<&str, usize> = HashMap::new();

    for employee in employees {
        if let Some(&i) = index.get(employee.department_code.as_str()) {
            employee_counts[i] += 1;
            employee_department.insert(employee.employee_number.as_str(), i);
        }
    }

    for payment in payments {
        if let Some(&i) = employee_department.get(payment.employee_number.as_str()) {
            payment_counts[i] += 1;
            totals[i].add(payment);
        }
    }

    departments
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let t = totals[i];
            let n = payment_counts[i];
            DepartmentSummary {
                department_code: d.department_code.clone(),
                department_name: d.department_name.clone(),
                employee_count: employee_counts[i],
                gross_salary: d.gross_salary,
                total_deduction: d.total_deduction,
                net_salary: d.net_salary,
                payment_count: n,
                total_gross_paid: t.total_gross,
                total_deduction_paid: t.total_deduction,
                total_net_paid: t.total_net,
                average_gross_salary: average(t.total_gross, n),
                average_deduction: average(t.total_deduction, n),
                average_net_salary: average(t.total_net, n),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[schema(example = 2)]
    pub total_employees: u64,
    #[schema(example = 2)]
    pub total_departments: u64,
    #[schema(example = 10)]
    pub total_payments: u64,
    #[schema(example = 2)]
    pub current_month_payments: u64,
    #[schema(value_type = f64, example = 112000.0)]
    pub current_month_total: Decimal,
}

/// Headline counts; "current month" is the month containing `today`.
pub fn dashboard_stats(
    today: NaiveDate,
    total_departments: usize,
    total_employees: usize,
    payments: &[SalaryPayment],
) -> DashboardStats {
    let this_month = first_of_month(today);
    let mut current_month_payments = 0u64;
    let mut current_month_total = Decimal::ZERO;

    for payment in payments {
        if first_of_month(payment.month) == this_month {
            current_month_payments += 1;
            current_month_total += payment.net_salary;
        }
    }

    DashboardStats {
        total_employees: total_employees as u64,
        total_departments: total_departments as u64,
        total_payments: payments.len() as u64,
        current_month_payments,
        current_month_total,
    }
}

/// Signature block printed at the bottom of reports.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[schema(example = "Payroll Officer")]
    pub prepared_by: String,
    #[schema(example = "Finance Manager")]
    pub approved_by: String,
    #[schema(example = "2025-01-31", value_type = String, format = "date")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPayrollReport {
    #[schema(example = "2025-01-01", value_type = String, format = "date")]
    pub month: NaiveDate,
    pub employees: Vec<PaymentRecord>,
    #[schema(example = 2)]
    pub employee_count: u64,
    pub totals: Totals,
    pub signature: Signature,
}

impl MonthlyPayrollReport {
    pub fn new(month: NaiveDate, rows: Vec<PaymentRecord>, signature: Signature) -> Self {
        let totals = Totals::of(rows.iter().map(|r| &r.payment));
        Self {
            month: first_of_month(month),
            employee_count: rows.len() as u64,
            employees: rows,
            totals,
            signature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSalaryHistory {
    pub employee: EmployeeView,
    pub salary_history: Vec<SalaryPayment>,
    #[schema(example = 3)]
    pub total_payments: u64,
    pub totals: Totals,
    /// Present on the printable variant only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
}

impl EmployeeSalaryHistory {
    /// Orders the history newest month first.
    pub fn new(employee: EmployeeView, mut history: Vec<SalaryPayment>) -> Self {
        history.sort_by(|a, b| b.month.cmp(&a.month).then(b.id.cmp(&a.id)));
        let totals = Totals::of(&history);
        Self {
            employee,
            total_payments: history.len() as u64,
            salary_history: history,
            totals,
            signature: None,
        }
    }

    pub fn signed(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee(number: &str, department: &str) -> Employee {
        Employee {
            employee_number: number.to_string(),
            first_name: "First".into(),
            last_name: "Last".into(),
            position: "Clerk".into(),
            address: None,
            telephone: None,
            gender: None,
            hired_date: ymd(2020, 1, 1),
            department_code: department.to_string(),
        }
    }

    fn payment(id: u64, employee: &str, month: NaiveDate, gross: &str, deduction: &str) -> SalaryPayment {
        SalaryPayment {
            id,
            employee_number: employee.to_string(),
            gross_salary: dec(gross),
            total_deduction: dec(deduction),
            net_salary: dec(gross) - dec(deduction),
            month,
            payment_date: month,
        }
    }

    fn departments() -> Vec<Department> {
        vec![
            Department::new("ENG", "Engineering", dec("75000"), dec("15000")),
            Department::new("HR", "Human Resources", dec("65000"), dec("13000")),
            Department::new("OPS", "Operations", dec("50000"), dec("5000")),
        ]
    }

    #[test]
    fn summaries_follow_department_order_and_average_payments() {
        let employees = vec![
            employee("EMP001", "ENG"),
            employee("EMP002", "HR"),
            employee("EMP003", "ENG"),
        ];
        let payments = vec![
            payment(1, "EMP001", ymd(2025, 1, 1), "75000", "15000"),
            payment(2, "EMP003", ymd(2025, 1, 1), "70000", "14000"),
            payment(3, "EMP002", ymd(2025, 1, 1), "65000", "13000"),
        ];

        let rows = department_summaries(&departments(), &employees, &payments);

        let codes: Vec<_> = rows.iter().map(|r| r.department_code.as_str()).collect();
        assert_eq!(codes, vec!["ENG", "HR", "OPS"]);

        let eng = &rows[0];
        assert_eq!(eng.employee_count, 2);
        assert_eq!(eng.payment_count, 2);
        assert_eq!(eng.total_gross_paid, dec("145000"));
        assert_eq!(eng.average_gross_salary, dec("72500"));
        assert_eq!(eng.average_deduction, dec("14500"));
        assert_eq!(eng.average_net_salary, dec("58000"));
        assert_eq!(eng.net_salary, dec("60000"));

        assert_eq!(rows[1].employee_count, 1);
        assert_eq!(rows[1].average_net_salary, dec("52000"));
    }

    #[test]
    fn department_without_payments_has_zero_averages() {
        let rows = department_summaries(&departments(), std::iter::empty(), std::iter::empty());

        for row in rows {
            assert_eq!(row.employee_count, 0);
            assert_eq!(row.payment_count, 0);
            assert_eq!(row.average_gross_salary, Decimal::ZERO);
            assert_eq!(row.average_deduction, Decimal::ZERO);
            assert_eq!(row.average_net_salary, Decimal::ZERO);
        }
    }

    #[test]
    fn averages_round_to_cents() {
        let employees = vec![employee("EMP001", "OPS")];
        let payments = vec![
            payment(1, "EMP001", ymd(2025, 1, 1), "100", "0"),
            payment(2, "EMP001", ymd(2025, 2, 1), "100", "0"),
            payment(3, "EMP001", ymd(2025, 3, 1), "100.01", "0"),
        ];

        let rows = department_summaries(&departments(), &employees, &payments);
        assert_eq!(rows[2].average_gross_salary, dec("100.00"));
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        assert_eq!(Totals::of(std::iter::empty()), Totals::default());
    }

    #[test]
    fn dashboard_counts_only_the_current_month() {
        let payments = vec![
            payment(1, "EMP001", ymd(2025, 1, 1), "75000", "15000"),
            payment(2, "EMP002", ymd(2025, 1, 1), "65000", "13000"),
            payment(3, "EMP001", ymd(2024, 12, 1), "75000", "15000"),
        ];

        let stats = dashboard_stats(ymd(2025, 1, 20), 2, 2, &payments);

        assert_eq!(stats.total_payments, 3);
        assert_eq!(stats.current_month_payments, 2);
        assert_eq!(stats.current_month_total, dec("112000"));
    }

    #[test]
    fn history_is_newest_first_with_totals() {
        let view = EmployeeView {
            employee: employee("EMP001", "ENG"),
            department_name: "Engineering".into(),
        };
        let history = vec![
            payment(1, "EMP001", ymd(2025, 1, 1), "75000", "15000"),
            payment(2, "EMP001", ymd(2025, 3, 1), "75000", "15000"),
            payment(3, "EMP001", ymd(2025, 2, 1), "80000", "16000"),
        ];

        let report = EmployeeSalaryHistory::new(view, history);

        let months: Vec<_> = report.salary_history.iter().map(|p| p.month.month0()).collect();
        assert_eq!(months, vec![2, 1, 0]);
        assert_eq!(report.total_payments, 3);
        assert_eq!(report.totals.total_gross, dec("230000"));
        assert_eq!(report.totals.total_net, dec("184000"));

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("signature").is_none());
        assert_eq!(value["totalPayments"], 3);
    }
}
