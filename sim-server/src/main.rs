//! 演示入口：启动模拟后端并走一遍核心流程

use serde_json::json;
use tracing_subscriber::EnvFilter;

use shared::SimRequest;
use sim_server::{Backend, Config, Dispatch};

async fn show(backend: &Backend, request: SimRequest) {
    let method = request.method.clone();
    let path = request.path.clone();
    match backend.handle(request).await {
        Dispatch::Handled(response) => {
            if let Some(error) = &response.error {
                tracing::warn!(%method, %path, status = %response.status, message = %error.message, "error");
            } else {
                tracing::info!(%method, %path, status = %response.status, body = ?response.body, "ok");
            }
        }
        Dispatch::PassThrough(_) => {
            tracing::info!(%method, %path, "pass-through (not simulated)");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(work_dir = %config.work_dir, latency_ms = config.latency_ms, "starting simulated backend");
    let backend = Backend::initialize(&config)?;

    // 首个注册的账户自动成为已验证的管理员
    show(
        &backend,
        SimRequest::post("/accounts/register").with_body(json!({
            "title": "Ms",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "password": "correct-horse",
        })),
    )
    .await;

    let login = backend
        .handle(SimRequest::post("/accounts/authenticate").with_body(json!({
            "email": "ada@example.com",
            "password": "correct-horse",
        })))
        .await;
    let Dispatch::Handled(response) = login else {
        anyhow::bail!("authenticate route must be simulated");
    };
    let Some(token) = response
        .body
        .as_ref()
        .and_then(|b| b["jwtToken"].as_str())
        .map(str::to_string)
    else {
        tracing::warn!(error = ?response.error, "authentication failed, demo data already present?");
        return Ok(());
    };
    tracing::info!("authenticated, got access token");

    show(
        &backend,
        SimRequest::post("/departments")
            .with_bearer(&token)
            .with_body(json!({ "name": "Engineering", "description": "builds things" })),
    )
    .await;
    show(&backend, SimRequest::get("/departments").with_bearer(&token)).await;
    show(
        &backend,
        SimRequest::post("/employees").with_bearer(&token).with_body(json!({
            "employeeId": "EMP-001",
            "position": "Engineer",
            "userId": 1,
            "departmentId": 1,
            "hireDate": "2025-01-15",
        })),
    )
    .await;
    show(
        &backend,
        SimRequest::post("/api/workflows").with_body(json!({
            "type": "Onboarding",
            "details": "Set up workstation",
            "employeeId": "1",
        })),
    )
    .await;
    show(&backend, SimRequest::get("/api/workflows/employee/1")).await;

    // 未注册的路径透传给真实传输层
    show(&backend, SimRequest::get("/external/status")).await;

    Ok(())
}
