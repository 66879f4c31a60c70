//! Shared helpers for the integration suites
//!
//! All tests run with a paused tokio clock, so the 500 ms simulated latency
//! elapses virtually and suites stay fast.

#![allow(dead_code)]

use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

use shared::{SimRequest, SimResponse};
use sim_server::{Backend, BackendState, Config, Dispatch, Notification, Notifier};

pub const PASSWORD: &str = "password-123";

/// In-memory backend with the test configuration
pub fn test_backend() -> Backend {
    Backend::in_memory(Config::for_tests()).expect("in-memory backend")
}

/// In-memory backend plus a channel observing every "email" it delivers
pub fn backend_with_notifications() -> (Backend, UnboundedReceiver<Notification>) {
    let config = Config::for_tests();
    let (notifier, rx) = Notifier::with_capture(config.notify_delay());
    let state = BackendState::in_memory(config)
        .expect("in-memory backend")
        .with_notifier(notifier);
    (Backend::new(state), rx)
}

/// Dispatch a request that must be simulated
pub async fn send(backend: &Backend, request: SimRequest) -> SimResponse {
    backend
        .handle(request)
        .await
        .into_handled()
        .expect("request should hit a simulated route")
}

pub async fn register(backend: &Backend, email: &str) -> SimResponse {
    send(
        backend,
        SimRequest::post("/accounts/register").with_body(json!({
            "title": "Mx",
            "firstName": "Test",
            "lastName": "User",
            "email": email,
            "password": PASSWORD,
            "confirmPassword": PASSWORD,
        })),
    )
    .await
}

pub async fn authenticate(backend: &Backend, email: &str, password: &str) -> SimResponse {
    send(
        backend,
        SimRequest::post("/accounts/authenticate")
            .with_body(json!({ "email": email, "password": password })),
    )
    .await
}

/// Authenticate and return the access token
pub async fn login_token(backend: &Backend, email: &str) -> String {
    let response = authenticate(backend, email, PASSWORD).await;
    assert!(response.is_success(), "login failed: {:?}", response.error);
    response.body.expect("auth body")["jwtToken"]
        .as_str()
        .expect("jwtToken in auth body")
        .to_string()
}

/// Register the first (admin) account and log in
pub async fn admin_token(backend: &Backend) -> String {
    register(backend, "admin@example.com").await;
    login_token(backend, "admin@example.com").await
}

/// Admin-create a department, returning nothing; ids are sequential from 1
pub async fn create_department(backend: &Backend, token: &str, name: &str) {
    let response = send(
        backend,
        SimRequest::post("/departments")
            .with_bearer(token)
            .with_body(json!({ "name": name, "description": "" })),
    )
    .await;
    assert!(response.is_success(), "create department: {:?}", response.error);
}
