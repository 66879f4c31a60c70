//! 认证生命周期：注册、登录、令牌轮换、注销、邮箱验证、密码重置

mod common;

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;

use common::*;
use shared::SimRequest;
use sim_server::{JwtConfig, Notification, TokenService};

#[tokio::test(start_paused = true)]
async fn first_account_is_verified_admin_later_ones_are_not() {
    let backend = test_backend();

    let response = register(&backend, "first@example.com").await;
    assert!(response.is_success());

    // 首个账户：已验证的管理员，注册后可直接登录
    let response = authenticate(&backend, "first@example.com", PASSWORD).await;
    assert!(response.is_success());
    let body = response.body.unwrap();
    assert_eq!(body["role"], "Admin");
    assert_eq!(body["isVerified"], true);

    // 后续账户：未验证的普通用户，登录被拒
    register(&backend, "second@example.com").await;
    let response = authenticate(&backend, "second@example.com", PASSWORD).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), Some("Email is not verified"));

    let data = backend.state().store.lock().await;
    assert_eq!(data.accounts[1].role, shared::models::Role::User);
    assert!(!data.accounts[1].is_verified);
}

#[tokio::test(start_paused = true)]
async fn bad_credentials_are_not_distinguished() {
    let backend = test_backend();
    register(&backend, "user@example.com").await;

    let unknown = authenticate(&backend, "nobody@example.com", PASSWORD).await;
    let wrong = authenticate(&backend, "user@example.com", "wrong").await;

    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.error_message(), wrong.error_message());
}

#[tokio::test(start_paused = true)]
async fn inactive_account_cannot_authenticate() {
    let backend = test_backend();
    let token = admin_token(&backend).await;

    let response = send(
        &backend,
        SimRequest::post("/accounts").with_bearer(&token).with_body(json!({
            "title": "Mr",
            "firstName": "Idle",
            "lastName": "User",
            "email": "idle@example.com",
            "password": PASSWORD,
            "role": "User",
            "isActive": false,
        })),
    )
    .await;
    assert!(response.is_success());

    let response = authenticate(&backend, "idle@example.com", PASSWORD).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error_message().unwrap().contains("inactive"));
}

#[tokio::test(start_paused = true)]
async fn refresh_rotates_tokens_without_accumulating() {
    let backend = test_backend();
    register(&backend, "admin@example.com").await;

    let first = authenticate(&backend, "admin@example.com", PASSWORD).await;
    let jwt_1 = first.body.unwrap()["jwtToken"].as_str().unwrap().to_string();

    let stored_1 = {
        let data = backend.state().store.lock().await;
        assert_eq!(data.accounts[0].refresh_tokens.len(), 1);
        data.accounts[0].refresh_tokens[0].clone()
    };

    let second = send(&backend, SimRequest::post("/accounts/refresh-token")).await;
    assert!(second.is_success());
    let jwt_2 = second.body.unwrap()["jwtToken"].as_str().unwrap().to_string();

    let stored_2 = {
        let data = backend.state().store.lock().await;
        // 轮换而非累积：集合始终只有一个净条目
        assert_eq!(data.accounts[0].refresh_tokens.len(), 1);
        data.accounts[0].refresh_tokens[0].clone()
    };

    let third = send(&backend, SimRequest::post("/accounts/refresh-token")).await;
    assert!(third.is_success());
    let jwt_3 = third.body.unwrap()["jwtToken"].as_str().unwrap().to_string();

    // 三次拿到的访问令牌两两不同，刷新令牌也换了
    assert_ne!(jwt_1, jwt_2);
    assert_ne!(jwt_2, jwt_3);
    assert_ne!(jwt_1, jwt_3);
    assert_ne!(stored_1, stored_2);
}

#[tokio::test(start_paused = true)]
async fn revoke_removes_only_the_presented_token() {
    let backend = test_backend();
    register(&backend, "admin@example.com").await;

    // 两次登录：集合两个令牌，cookie 持有第二个
    authenticate(&backend, "admin@example.com", PASSWORD).await;
    let second = authenticate(&backend, "admin@example.com", PASSWORD).await;
    let jwt = second.body.unwrap()["jwtToken"].as_str().unwrap().to_string();

    let response = send(
        &backend,
        SimRequest::post("/accounts/revoke-token").with_bearer(&jwt),
    )
    .await;
    assert!(response.is_success());

    {
        let data = backend.state().store.lock().await;
        assert_eq!(data.accounts[0].refresh_tokens.len(), 1);
    }

    // 被吊销的令牌仍留在 cookie 里，刷新必须失败
    let response = send(&backend, SimRequest::post("/accounts/refresh-token")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_message(), Some("Unauthorized"));
}

#[tokio::test(start_paused = true)]
async fn revoke_requires_authentication() {
    let backend = test_backend();
    register(&backend, "admin@example.com").await;
    authenticate(&backend, "admin@example.com", PASSWORD).await;

    let response = send(&backend, SimRequest::post("/accounts/revoke-token")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test(start_paused = true)]
async fn duplicate_register_reports_success_without_creating() {
    let (backend, mut notifications) = backend_with_notifications();
    register(&backend, "admin@example.com").await;

    let response = register(&backend, "admin@example.com").await;
    assert!(response.is_success());

    let data = backend.state().store.lock().await;
    assert_eq!(data.accounts.len(), 1);
    drop(data);

    // 第一封是首用户提示，第二封是"邮箱已注册"
    let first = notifications.recv().await.unwrap();
    assert!(matches!(first, Notification::FirstUser { .. }));
    let second = notifications.recv().await.unwrap();
    assert_eq!(
        second,
        Notification::AlreadyRegistered {
            email: "admin@example.com".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn verify_email_enables_login() {
    let (backend, mut notifications) = backend_with_notifications();
    register(&backend, "admin@example.com").await;
    register(&backend, "user@example.com").await;

    // 从投递的"邮件"里取出验证令牌
    let token = loop {
        match notifications.recv().await.unwrap() {
            Notification::Verification { email, token } if email == "user@example.com" => {
                break token;
            }
            _ => continue,
        }
    };

    let response = send(
        &backend,
        SimRequest::post("/accounts/verify-email").with_body(json!({ "token": "bogus" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), Some("Verification failed"));

    let response = send(
        &backend,
        SimRequest::post("/accounts/verify-email").with_body(json!({ "token": token })),
    )
    .await;
    assert!(response.is_success());

    let response = authenticate(&backend, "user@example.com", PASSWORD).await;
    assert!(response.is_success());
}

#[tokio::test(start_paused = true)]
async fn forgot_password_is_enumeration_safe() {
    let backend = test_backend();
    register(&backend, "admin@example.com").await;

    let known = send(
        &backend,
        SimRequest::post("/accounts/forgot-password")
            .with_body(json!({ "email": "admin@example.com" })),
    )
    .await;
    let unknown = send(
        &backend,
        SimRequest::post("/accounts/forgot-password")
            .with_body(json!({ "email": "nobody@example.com" })),
    )
    .await;

    assert!(known.is_success());
    assert!(unknown.is_success());
}

#[tokio::test(start_paused = true)]
async fn reset_password_round_trip() {
    let (backend, mut notifications) = backend_with_notifications();
    register(&backend, "admin@example.com").await;

    send(
        &backend,
        SimRequest::post("/accounts/forgot-password")
            .with_body(json!({ "email": "admin@example.com" })),
    )
    .await;

    let token = loop {
        match notifications.recv().await.unwrap() {
            Notification::PasswordReset { token, .. } => break token,
            _ => continue,
        }
    };

    let response = send(
        &backend,
        SimRequest::post("/accounts/validate-reset-token").with_body(json!({ "token": token })),
    )
    .await;
    assert!(response.is_success());

    let response = send(
        &backend,
        SimRequest::post("/accounts/reset-password")
            .with_body(json!({ "token": token, "password": "new-password" })),
    )
    .await;
    assert!(response.is_success());

    // 旧密码失效，新密码生效，令牌对已清除
    assert_eq!(
        authenticate(&backend, "admin@example.com", PASSWORD).await.status,
        StatusCode::BAD_REQUEST
    );
    assert!(
        authenticate(&backend, "admin@example.com", "new-password")
            .await
            .is_success()
    );
    let response = send(
        &backend,
        SimRequest::post("/accounts/reset-password")
            .with_body(json!({ "token": token, "password": "again" })),
    )
    .await;
    assert_eq!(response.error_message(), Some("Invalid token"));
}

#[tokio::test(start_paused = true)]
async fn expired_reset_token_is_rejected() {
    let backend = test_backend();
    register(&backend, "admin@example.com").await;

    send(
        &backend,
        SimRequest::post("/accounts/forgot-password")
            .with_body(json!({ "email": "admin@example.com" })),
    )
    .await;

    // 把过期时间拨到过去
    let token = {
        let mut data = backend.state().store.lock().await;
        data.accounts[0].reset_token_expires = Some(Utc::now() - Duration::hours(1));
        data.accounts[0].reset_token.clone().unwrap()
    };

    let response = send(
        &backend,
        SimRequest::post("/accounts/reset-password")
            .with_body(json!({ "token": token, "password": "new-password" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), Some("Invalid token"));
}

#[tokio::test(start_paused = true)]
async fn expired_access_token_is_unauthorized() {
    let backend = test_backend();
    register(&backend, "admin@example.com").await;

    // 用同一密钥签一个已过期的令牌
    let expired = TokenService::with_config(JwtConfig {
        secret: backend.state().config.jwt.secret.clone(),
        expiration_minutes: -1,
    })
    .issue_access_token(1)
    .unwrap();

    let response = send(&backend, SimRequest::get("/accounts").with_bearer(&expired)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
