//! Department endpoints

use serde_json::to_value;

use shared::models::{Department, DepartmentCreate, DepartmentUpdate, Role};

use super::parse_body;
use crate::auth::{require_auth, require_role};
use crate::core::{ApiError, BackendState};
use crate::routes::{HandlerFuture, RequestContext};
use crate::store::project_department;

/// POST /departments (admin)
pub fn create(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: DepartmentCreate = parse_body(&ctx)?;
        let mut data = state.store.lock().await;
        require_role(&state.tokens, &data, ctx.auth.as_deref(), Role::Admin)?;

        // 部门名全局唯一
        if data.departments.iter().any(|d| d.name == req.name) {
            return Err(ApiError::Validation(
                "Department name is already registered".into(),
            ));
        }

        let department = Department {
            id: data.next_department_id(),
            name: req.name,
            description: req.description,
        };
        data.departments.push(department);
        state.store.flush_departments(&data.departments)?;

        Ok(None)
    })
}

/// GET /departments
pub fn list(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let data = state.store.lock().await;
        require_auth(&state.tokens, &data, ctx.auth.as_deref())?;

        let departments: Vec<_> = data.departments.iter().map(project_department).collect();
        Ok(Some(to_value(departments)?))
    })
}

/// GET /departments/{id}
pub fn get_by_id(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let data = state.store.lock().await;
        require_auth(&state.tokens, &data, ctx.auth.as_deref())?;

        let Some(department) = data.department_by_id(ctx.id()) else {
            return Err(ApiError::NotFound("Item not found".into()));
        };
        Ok(Some(to_value(project_department(department))?))
    })
}

/// PUT /departments/{id}
///
/// 参考行为：更新只要求已认证，不要求管理员。
pub fn update(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: DepartmentUpdate = parse_body(&ctx)?;
        let mut data = state.store.lock().await;
        require_auth(&state.tokens, &data, ctx.auth.as_deref())?;

        let id = ctx.id();
        let Some(idx) = data.departments.iter().position(|d| d.id == id) else {
            return Err(ApiError::NotFound("Department not found".into()));
        };

        {
            let department = &mut data.departments[idx];
            if let Some(name) = req.name {
                department.name = name;
            }
            if let Some(description) = req.description {
                department.description = description;
            }
        }
        state.store.flush_departments(&data.departments)?;

        Ok(Some(to_value(project_department(&data.departments[idx]))?))
    })
}

/// DELETE /departments/{id} (admin)
///
/// 不级联：引用该部门的员工保留悬空的 departmentId，
/// 其投影中的 department 字段变为 null。
pub fn delete(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let mut data = state.store.lock().await;
        require_auth(&state.tokens, &data, ctx.auth.as_deref())?;
        require_role(&state.tokens, &data, ctx.auth.as_deref(), Role::Admin)?;

        let id = ctx.id();
        data.departments.retain(|d| d.id != id);
        state.store.flush_departments(&data.departments)?;

        Ok(None)
    })
}
