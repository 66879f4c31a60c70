//! Workflow model
//!
//! Workflows are the HR request records (onboarding, leave, expenses, …)
//! attached to an employee. Updates are a shallow merge of whatever the
//! caller sends; unknown fields are kept in the flattened `extra` map so
//! they survive storage round trips.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The seven workflow request kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowType {
    Onboarding,
    #[serde(rename = "Department Transfer")]
    DepartmentTransfer,
    #[serde(rename = "Leave Request")]
    LeaveRequest,
    #[serde(rename = "Overtime Request")]
    OvertimeRequest,
    #[serde(rename = "Expense Claim")]
    ExpenseClaim,
    #[serde(rename = "Training Request")]
    TrainingRequest,
    #[serde(rename = "Equipment Request")]
    EquipmentRequest,
}

/// Workflow lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Approved,
    Rejected,
    Completed,
}

/// Comment attached to a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowComment {
    pub id: String,
    pub workflow_id: String,
    pub user_id: String,
    pub user_name: String,
    pub comment: String,
    pub date_created: String,
}

/// File attachment metadata on a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAttachment {
    pub id: String,
    pub workflow_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub upload_date: String,
    pub uploaded_by: String,
}

/// Stored workflow record
///
/// Returned to callers as-is; there is no separate projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: WorkflowType,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub status: WorkflowStatus,
    pub employee_id: String,
    #[serde(default = "Utc::now")]
    pub date_created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub date_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<WorkflowComment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<WorkflowAttachment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Caller-supplied fields outside the known schema
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
