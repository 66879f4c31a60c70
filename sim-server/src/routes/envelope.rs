//! 延迟响应信封
//!
//! 每个被拦截的请求 —— 无论成功、领域错误还是未授权 —— 都经过同一条
//! 延迟投递路径：处理器先跑完（含落盘），再等待固定的模拟延迟，最后
//! 才成形响应。错误路径绝不会比成功路径更早返回。

use std::time::Duration;

use shared::SimResponse;

use crate::core::ApiError;

/// Handler 的统一返回：`Ok(None)` 表示空 200
pub type HandlerResult = Result<Option<serde_json::Value>, ApiError>;

/// 等待模拟延迟后把处理结果成形为响应
pub async fn deliver(latency: Duration, result: HandlerResult) -> SimResponse {
    tokio::time::sleep(latency).await;

    match result {
        Ok(body) => SimResponse::ok(body),
        Err(err) => {
            let status = err.status();
            let message = err.message();
            tracing::debug!(status = %status, message = %message, "simulated error response");
            SimResponse::err(status, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use tokio::time::Instant;

    const LATENCY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_success_waits_full_latency() {
        let start = Instant::now();
        let response = deliver(LATENCY, Ok(Some(serde_json::json!({"ok": true})))).await;

        assert!(start.elapsed() >= LATENCY);
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_waits_full_latency_too() {
        let start = Instant::now();
        let response = deliver(LATENCY, Err(ApiError::Unauthorized)).await;

        assert!(start.elapsed() >= LATENCY);
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.error_message(), Some("Unauthorized"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_domain_error_shape() {
        let response = deliver(
            LATENCY,
            Err(ApiError::Validation("Invalid department ID".into())),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_message(), Some("Invalid department ID"));
        assert!(response.body.is_none());
    }
}
