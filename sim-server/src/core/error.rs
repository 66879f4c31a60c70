use http::StatusCode;
use thiserror::Error;

use crate::auth::TokenError;
use crate::store::StoreError;

/// 请求级错误分类
///
/// 每个错误最终都以 `{ message }` 结构返回给调用方：
/// 领域错误 400，认证/授权失败 401，内部错误 500。
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Email or password is incorrect")]
    InvalidCredentials,

    #[error("Account is inactive. Please contact a system administrator")]
    AccountInactive,

    #[error("Email is not verified")]
    EmailNotVerified,

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP 状态码映射
    ///
    /// 模拟接口只区分 200/400/401；存储或序列化故障按 500 上报。
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_)
            | ApiError::NotFound(_)
            | ApiError::InvalidCredentials
            | ApiError::AccountInactive
            | ApiError::EmailNotVerified => StatusCode::BAD_REQUEST,
            ApiError::Storage(_)
            | ApiError::Token(_)
            | ApiError::Serialization(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 给调用方的错误消息
    pub fn message(&self) -> String {
        match self {
            ApiError::Storage(err) => {
                // 记录内部错误但不暴露详细信息
                tracing::error!(error = ?err, "storage failure");
                "An internal error occurred".to_string()
            }
            ApiError::Token(err) => {
                tracing::error!(error = ?err, "token service failure");
                "An internal error occurred".to_string()
            }
            ApiError::Serialization(err) => {
                tracing::error!(error = ?err, "serialization failure");
                "An internal error occurred".to_string()
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// 处理器的 Result 类型别名
pub type ApiResult<T> = std::result::Result<T, ApiError>;
