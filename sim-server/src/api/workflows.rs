//! Workflow endpoints
//!
//! The workflow routes skip authentication entirely, matching the reference
//! behavior. Updates are an unwhitelisted shallow merge: any caller-supplied
//! field overwrites the stored one (the record id excepted). A hardened
//! backend would whitelist mutable fields instead.

use chrono::Utc;
use serde_json::to_value;

use shared::models::Workflow;

use crate::core::{ApiError, BackendState};
use crate::routes::{HandlerFuture, RequestContext};

/// GET /api/workflows
pub fn list(state: &BackendState, _ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let data = state.store.lock().await;
        Ok(Some(to_value(&data.workflows)?))
    })
}

/// GET /api/workflows/{id}
pub fn get_by_id(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let data = state.store.lock().await;
        let id = ctx.id();

        let Some(workflow) = data.workflows.iter().find(|w| w.id == id) else {
            return Err(ApiError::NotFound("Workflow not found".into()));
        };
        Ok(Some(to_value(workflow)?))
    })
}

/// GET /api/workflows/employee/{id}
///
/// 按 employeeId 精确过滤。
pub fn get_by_employee(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let data = state.store.lock().await;
        let employee_id = ctx.id().to_string();

        let workflows: Vec<&Workflow> = data
            .workflows
            .iter()
            .filter(|w| w.employee_id == employee_id)
            .collect();
        Ok(Some(to_value(workflows)?))
    })
}

/// POST /api/workflows
pub fn create(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let mut workflow: Workflow = serde_json::from_value(ctx.body.clone())
            .map_err(|e| ApiError::Validation(format!("Invalid workflow: {e}")))?;

        let mut data = state.store.lock().await;
        workflow.id = data.next_workflow_id();
        workflow.date_created = Utc::now();
        workflow.date_updated = workflow.date_created;

        let body = to_value(&workflow)?;
        data.workflows.push(workflow);
        state.store.flush_workflows(&data.workflows)?;

        Ok(Some(body))
    })
}

/// PUT /api/workflows/{id}
pub fn update(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let mut data = state.store.lock().await;
        let id = ctx.id();

        let Some(idx) = data.workflows.iter().position(|w| w.id == id) else {
            return Err(ApiError::NotFound("Workflow not found".into()));
        };

        // 无白名单的浅合并：调用方给什么字段就覆盖什么字段
        let mut merged = to_value(&data.workflows[idx])?;
        if let (Some(target), Some(patch)) = (merged.as_object_mut(), ctx.body.as_object()) {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }

        let mut updated: Workflow = serde_json::from_value(merged)
            .map_err(|e| ApiError::Validation(format!("Invalid workflow update: {e}")))?;
        updated.id = id; // 记录 id 不可由调用方改写
        updated.date_updated = Utc::now();

        data.workflows[idx] = updated;
        state.store.flush_workflows(&data.workflows)?;

        Ok(Some(to_value(&data.workflows[idx])?))
    })
}

/// DELETE /api/workflows/{id}
pub fn delete(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let mut data = state.store.lock().await;
        let id = ctx.id();

        if !data.workflows.iter().any(|w| w.id == id) {
            return Err(ApiError::NotFound("Workflow not found".into()));
        }

        data.workflows.retain(|w| w.id != id);
        state.store.flush_workflows(&data.workflows)?;

        Ok(None)
    })
}
