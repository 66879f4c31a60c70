//! Employee model
//!
//! An employee links one account (`user_id`, one employee per account) to
//! one department (`department_id`). The record id is string-typed and
//! carries the numeric value assigned at creation.

use serde::{Deserialize, Serialize};

use super::{AccountResponse, Department};

/// Stored employee record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    /// Business identifier, e.g. `EMP-007`
    pub employee_id: String,
    pub position: String,
    pub user_id: i64,
    pub department_id: i64,
    #[serde(default)]
    pub hire_date: Option<String>,
    pub is_active: bool,
}

/// External employee projection with expanded relations
///
/// `account` and `department` are the nested projections of the records the
/// foreign keys point at, or `null` when a key dangles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: String,
    pub employee_id: String,
    pub position: String,
    pub user_id: i64,
    pub department_id: i64,
    pub hire_date: Option<String>,
    pub is_active: bool,
    pub account: Option<AccountResponse>,
    pub department: Option<Department>,
}

/// `POST /employees` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    pub employee_id: String,
    pub position: String,
    pub user_id: i64,
    pub department_id: i64,
    #[serde(default)]
    pub hire_date: Option<String>,
}

/// `PUT /employees/{id}` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// `PATCH /employees/{id}` payload (department transfer)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub department_id: i64,
}
