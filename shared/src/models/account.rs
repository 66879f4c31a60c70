//! Account model and authentication payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
///
/// Authorization checks compare roles for exact equality; Admin is not an
/// implicit superset of User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

/// Stored account record
///
/// Internal shape only: it carries the plaintext password, the verification
/// and reset token material, and the refresh-token set. It must never leave
/// the store as-is; [`AccountResponse`] is the external projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub is_verified: bool,
    pub is_active: bool,
    pub date_created: DateTime<Utc>,
    pub verification_token: Option<String>,
    /// Paired with `reset_token_expires`: both present or both absent
    pub reset_token: Option<String>,
    pub reset_token_expires: Option<DateTime<Utc>>,
    /// Currently valid refresh tokens for this account
    #[serde(default)]
    pub refresh_tokens: Vec<String>,
}

/// External-safe account projection
///
/// Strips `password`, `refreshTokens`, `verificationToken`, `resetToken`
/// and `resetTokenExpires`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub date_created: DateTime<Utc>,
    pub is_verified: bool,
    pub is_active: bool,
}

/// `POST /accounts/authenticate` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

/// Successful authenticate/refresh body: the caller's projection plus a
/// fresh access token. The rotated refresh token travels out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub jwt_token: String,
}

/// Public `POST /accounts/register` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Client-side confirmation field, discarded on arrival
    #[serde(default)]
    pub confirm_password: Option<String>,
}

/// Admin `POST /accounts` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: Option<String>,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// `PUT /accounts/{id}` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Only replaces the stored password when non-empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// `POST /accounts/verify-email` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// `POST /accounts/forgot-password` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// `POST /accounts/validate-reset-token` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResetTokenRequest {
    pub token: String,
}

/// `POST /accounts/reset-password` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: Option<String>,
}
