//! Entity projections
//!
//! Every record leaving the store goes through one of these: the account
//! projection strips the password and all token material, the employee
//! projection expands its foreign keys into nested projections.

use shared::models::{Account, AccountResponse, Department, Employee, EmployeeResponse};

use super::Collections;

/// External-safe view of an account
pub fn project_account(account: &Account) -> AccountResponse {
    AccountResponse {
        id: account.id,
        title: account.title.clone(),
        first_name: account.first_name.clone(),
        last_name: account.last_name.clone(),
        email: account.email.clone(),
        role: account.role,
        date_created: account.date_created,
        is_verified: account.is_verified,
        is_active: account.is_active,
    }
}

/// External view of a department (identity, nothing to strip)
pub fn project_department(department: &Department) -> Department {
    department.clone()
}

/// External view of an employee with expanded relations
///
/// Dangling foreign keys (e.g. after a department delete) project as `null`
/// rather than failing the whole response.
pub fn project_employee(data: &Collections, employee: &Employee) -> EmployeeResponse {
    let account = data.account_by_id(employee.user_id).map(project_account);
    let department = data
        .department_by_id(employee.department_id)
        .map(project_department);

    EmployeeResponse {
        id: employee.id.clone(),
        employee_id: employee.employee_id.clone(),
        position: employee.position.clone(),
        user_id: employee.user_id,
        department_id: employee.department_id,
        hire_date: employee.hire_date.clone(),
        is_active: employee.is_active,
        account,
        department,
    }
}
