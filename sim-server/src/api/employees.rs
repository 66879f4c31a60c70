//! Employee endpoints
//!
//! Employees tie an account to a department. Creation enforces the
//! one-employee-per-account rule and validates both foreign keys; the
//! PATCH route is the department transfer operation.

use serde_json::to_value;

use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, Role, TransferRequest};

use super::parse_body;
use crate::auth::{require_auth, require_role};
use crate::core::{ApiError, BackendState};
use crate::routes::{HandlerFuture, RequestContext};
use crate::store::project_employee;

/// POST /employees (admin)
pub fn create(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: EmployeeCreate = parse_body(&ctx)?;
        let mut data = state.store.lock().await;
        require_role(&state.tokens, &data, ctx.auth.as_deref(), Role::Admin)?;

        if data.account_by_id(req.user_id).is_none() {
            return Err(ApiError::NotFound("User not found".into()));
        }
        // 一个账户至多一条员工记录
        if data.employees.iter().any(|e| e.user_id == req.user_id) {
            return Err(ApiError::Validation(
                "User already has an employee record".into(),
            ));
        }
        if data.department_by_id(req.department_id).is_none() {
            return Err(ApiError::NotFound("Department not found".into()));
        }

        let employee = Employee {
            id: data.next_employee_id().to_string(),
            employee_id: req.employee_id,
            position: req.position,
            user_id: req.user_id,
            department_id: req.department_id,
            hire_date: req.hire_date,
            is_active: true,
        };
        data.employees.push(employee);
        state.store.flush_employees(&data.employees)?;

        let created = data.employees.last().expect("just pushed");
        Ok(Some(to_value(project_employee(&data, created))?))
    })
}

/// GET /employees
pub fn list(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let data = state.store.lock().await;
        require_auth(&state.tokens, &data, ctx.auth.as_deref())?;

        let employees: Vec<_> = data
            .employees
            .iter()
            .map(|e| project_employee(&data, e))
            .collect();
        Ok(Some(to_value(employees)?))
    })
}

/// GET /employees/{id}
pub fn get_by_id(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let data = state.store.lock().await;
        require_auth(&state.tokens, &data, ctx.auth.as_deref())?;

        let id = ctx.id().to_string();
        let Some(employee) = data.employee_by_id(&id) else {
            return Err(ApiError::NotFound("Item not found".into()));
        };
        Ok(Some(to_value(project_employee(&data, employee))?))
    })
}

/// PUT /employees/{id} (admin)
pub fn update(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: EmployeeUpdate = parse_body(&ctx)?;
        let mut data = state.store.lock().await;
        require_role(&state.tokens, &data, ctx.auth.as_deref(), Role::Admin)?;

        let id = ctx.id().to_string();
        let Some(idx) = data.employees.iter().position(|e| e.id == id) else {
            return Err(ApiError::NotFound("Employee not found".into()));
        };

        {
            let employee = &mut data.employees[idx];
            if let Some(employee_id) = req.employee_id {
                employee.employee_id = employee_id;
            }
            if let Some(position) = req.position {
                employee.position = position;
            }
            if let Some(user_id) = req.user_id {
                employee.user_id = user_id;
            }
            if let Some(department_id) = req.department_id {
                employee.department_id = department_id;
            }
            if let Some(hire_date) = req.hire_date {
                employee.hire_date = Some(hire_date);
            }
            if let Some(is_active) = req.is_active {
                employee.is_active = is_active;
            }
        }
        state.store.flush_employees(&data.employees)?;

        Ok(Some(to_value(project_employee(&data, &data.employees[idx]))?))
    })
}

/// DELETE /employees/{id} (admin)
pub fn delete(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let mut data = state.store.lock().await;
        require_role(&state.tokens, &data, ctx.auth.as_deref(), Role::Admin)?;

        let id = ctx.id().to_string();
        if data.employee_by_id(&id).is_none() {
            return Err(ApiError::NotFound("Employee not found".into()));
        }

        data.employees.retain(|e| e.id != id);
        state.store.flush_employees(&data.employees)?;

        Ok(None)
    })
}

/// PATCH /employees/{id}: department transfer (admin)
pub fn transfer(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: TransferRequest = parse_body(&ctx)?;
        let mut data = state.store.lock().await;
        require_role(&state.tokens, &data, ctx.auth.as_deref(), Role::Admin)?;

        let id = ctx.id().to_string();
        let Some(idx) = data.employees.iter().position(|e| e.id == id) else {
            return Err(ApiError::NotFound("Employee not found".into()));
        };
        // 目标部门必须存在才能转入
        if data.department_by_id(req.department_id).is_none() {
            return Err(ApiError::Validation("Invalid department ID".into()));
        }

        data.employees[idx].department_id = req.department_id;
        state.store.flush_employees(&data.employees)?;
        tracing::info!(
            employee = %data.employees[idx].id,
            department_id = req.department_id,
            "employee transferred"
        );

        Ok(Some(to_value(project_employee(&data, &data.employees[idx]))?))
    })
}
