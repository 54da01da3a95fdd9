use crate::api::department::{CreateDepartment, UpdateDepartment};
use crate::api::employee::{CreateEmployee, UpdateEmployee};
use crate::api::salary::{CreateSalary, UpdateSalary};
use crate::model::department::Department;
use crate::model::employee::{Employee, EmployeeSummary, EmployeeView, Gender, SalaryInfo};
use crate::model::salary::{PaymentRecord, SalaryPayment};
use crate::payroll::guard::PaymentCheck;
use crate::payroll::report::{
    DashboardStats, DepartmentSummary, EmployeeSalaryHistory, MonthlyPayrollReport, Signature,
    Totals,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll API",
        version = "1.0.0",
        description = r#"
## Employee Payroll Management

REST API for recording departments, employees and monthly salary payments.

### Key Features
- **Departments** carry a default gross salary and deduction; net salary is always computed by the server
- **Employees** belong to exactly one department
- **Salary payments** are limited to one per employee and calendar month
- **Reports** per department, per month and per employee, with printable variants carrying a signature block

### Response Format
- JSON bodies; errors are `{"message": "..."}`
- Money is serialized as a number with two decimals
"#,
    ),
    paths(
        crate::api::department::list_departments,
        crate::api::department::get_department,
        crate::api::department::create_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,

        crate::api::employee::list_employees,
        crate::api::employee::list_employee_summaries,
        crate::api::employee::get_employee,
        crate::api::employee::get_salary_info,
        crate::api::employee::list_employee_salaries,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::salary::list_salaries,
        crate::api::salary::get_salary,
        crate::api::salary::check_salary,
        crate::api::salary::create_salary,
        crate::api::salary::update_salary,
        crate::api::salary::delete_salary,

        crate::api::report::department_report,
        crate::api::report::monthly_payroll,
        crate::api::report::monthly_payroll_print,
        crate::api::report::employee_salary_history,
        crate::api::report::employee_salary_history_print,

        crate::api::dashboard::stats
    ),
    components(
        schemas(
            Department,
            CreateDepartment,
            UpdateDepartment,
            Employee,
            EmployeeView,
            EmployeeSummary,
            Gender,
            SalaryInfo,
            CreateEmployee,
            UpdateEmployee,
            SalaryPayment,
            PaymentRecord,
            CreateSalary,
            UpdateSalary,
            PaymentCheck,
            DepartmentSummary,
            Totals,
            Signature,
            MonthlyPayrollReport,
            EmployeeSalaryHistory,
            DashboardStats
        )
    ),
    tags(
        (name = "Department", description = "Department management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Salary", description = "Salary payment APIs"),
        (name = "Report", description = "Payroll reports"),
        (name = "Dashboard", description = "Dashboard statistics"),
    )
)]
pub struct ApiDoc;
