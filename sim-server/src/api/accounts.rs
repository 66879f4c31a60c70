//! 账户端点：认证生命周期 + 账户 CRUD

use chrono::Utc;
use serde_json::to_value;
use uuid::Uuid;

use shared::models::{
    Account, AuthPayload, AuthenticateRequest, CreateAccountRequest, ForgotPasswordRequest,
    RegisterRequest, ResetPasswordRequest, Role, UpdateAccountRequest, ValidateResetTokenRequest,
    VerifyEmailRequest,
};

use super::parse_body;
use crate::auth::{REFRESH_COOKIE, TokenService, require_auth, require_role};
use crate::core::{ApiError, BackendState};
use crate::notify::Notification;
use crate::routes::{HandlerFuture, RequestContext};
use crate::store::project_account;

/// POST /accounts/authenticate
pub fn authenticate(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: AuthenticateRequest = parse_body(&ctx)?;
        let mut data = state.store.lock().await;

        let Some(idx) = data
            .accounts
            .iter()
            .position(|a| a.email == req.email && a.password == req.password)
        else {
            return Err(ApiError::InvalidCredentials);
        };

        if !data.accounts[idx].is_active {
            return Err(ApiError::AccountInactive);
        }
        if !data.accounts[idx].is_verified {
            // 失败前重发验证链接
            if let Some(token) = data.accounts[idx].verification_token.clone() {
                state.notifier.send(Notification::Verification {
                    email: data.accounts[idx].email.clone(),
                    token,
                });
            }
            return Err(ApiError::EmailNotVerified);
        }

        // 轮换进一个新的刷新令牌
        let refresh = TokenService::generate_refresh_token();
        data.accounts[idx].refresh_tokens.push(refresh.clone());
        state.store.flush_accounts(&data.accounts)?;
        state
            .cookies
            .set(REFRESH_COOKIE, &refresh, state.config.refresh_ttl())
            .await;

        let account = &data.accounts[idx];
        tracing::info!(account_id = account.id, email = %account.email, "authenticated");

        let payload = AuthPayload {
            account: project_account(account),
            jwt_token: state.tokens.issue_access_token(account.id)?,
        };
        Ok(Some(to_value(payload)?))
    })
}

/// POST /accounts/refresh-token
///
/// 滑动会话：旧令牌作废，新令牌入集合并写回 cookie 旁路。
pub fn refresh_token(state: &BackendState, _ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let Some(refresh) = state.cookies.get(REFRESH_COOKIE).await else {
            return Err(ApiError::Unauthorized);
        };

        let mut data = state.store.lock().await;
        let Some(idx) = data
            .accounts
            .iter()
            .position(|a| a.refresh_tokens.contains(&refresh))
        else {
            return Err(ApiError::Unauthorized);
        };

        let next = TokenService::generate_refresh_token();
        data.accounts[idx].refresh_tokens.retain(|t| t != &refresh);
        data.accounts[idx].refresh_tokens.push(next.clone());
        state.store.flush_accounts(&data.accounts)?;
        state
            .cookies
            .set(REFRESH_COOKIE, &next, state.config.refresh_ttl())
            .await;

        let account = &data.accounts[idx];
        let payload = AuthPayload {
            account: project_account(account),
            jwt_token: state.tokens.issue_access_token(account.id)?,
        };
        Ok(Some(to_value(payload)?))
    })
}

/// POST /accounts/revoke-token
///
/// 只移除当前出示的刷新令牌，不签发新令牌。
pub fn revoke_token(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let mut data = state.store.lock().await;
        require_auth(&state.tokens, &data, ctx.auth.as_deref())?;

        let Some(refresh) = state.cookies.get(REFRESH_COOKIE).await else {
            return Ok(None);
        };

        if let Some(idx) = data
            .accounts
            .iter()
            .position(|a| a.refresh_tokens.contains(&refresh))
        {
            data.accounts[idx].refresh_tokens.retain(|t| t != &refresh);
            state.store.flush_accounts(&data.accounts)?;
            tracing::info!(account_id = data.accounts[idx].id, "refresh token revoked");
        }

        Ok(None)
    })
}

/// POST /accounts/register
///
/// 撞号时仍返回成功（防枚举），改为给已有账户投递提示"邮件"。
pub fn register(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: RegisterRequest = parse_body(&ctx)?;
        let mut data = state.store.lock().await;

        if data.accounts.iter().any(|a| a.email == req.email) {
            state.notifier.send(Notification::AlreadyRegistered { email: req.email });
            return Ok(None);
        }

        let id = data.next_account_id();
        let first_account = id == 1;
        let verification_token = Uuid::new_v4().as_simple().to_string();

        // 首个注册的账户自动成为已验证的管理员
        let account = Account {
            id,
            title: req.title,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email.clone(),
            password: req.password,
            role: if first_account { Role::Admin } else { Role::User },
            is_verified: first_account,
            is_active: true,
            date_created: Utc::now(),
            verification_token: Some(verification_token.clone()),
            reset_token: None,
            reset_token_expires: None,
            refresh_tokens: Vec::new(),
        };
        data.accounts.push(account);
        state.store.flush_accounts(&data.accounts)?;
        tracing::info!(account_id = id, email = %req.email, first_account, "account registered");

        if first_account {
            state.notifier.send(Notification::FirstUser { email: req.email });
        } else {
            state.notifier.send(Notification::Verification {
                email: req.email,
                token: verification_token,
            });
        }

        Ok(None)
    })
}

/// POST /accounts/verify-email
pub fn verify_email(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: VerifyEmailRequest = parse_body(&ctx)?;
        let mut data = state.store.lock().await;

        {
            let Some(account) = data
                .accounts
                .iter_mut()
                .find(|a| a.verification_token.as_deref() == Some(req.token.as_str()))
            else {
                return Err(ApiError::Validation("Verification failed".into()));
            };
            account.is_verified = true;
        }
        state.store.flush_accounts(&data.accounts)?;

        Ok(None)
    })
}

/// POST /accounts/forgot-password
///
/// 无论邮箱是否存在都返回成功（防枚举）。
pub fn forgot_password(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: ForgotPasswordRequest = parse_body(&ctx)?;
        let mut data = state.store.lock().await;

        let Some(idx) = data.accounts.iter().position(|a| a.email == req.email) else {
            return Ok(None);
        };

        let token = Uuid::new_v4().as_simple().to_string();
        data.accounts[idx].reset_token = Some(token.clone());
        data.accounts[idx].reset_token_expires = Some(Utc::now() + state.config.reset_ttl());
        state.store.flush_accounts(&data.accounts)?;

        state.notifier.send(Notification::PasswordReset {
            email: req.email,
            token,
        });

        Ok(None)
    })
}

/// 重置令牌匹配且未过期
fn reset_token_valid(account: &Account, token: &str) -> bool {
    account.reset_token.as_deref() == Some(token)
        && account.reset_token_expires.is_some_and(|exp| Utc::now() < exp)
}

/// POST /accounts/validate-reset-token
pub fn validate_reset_token(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: ValidateResetTokenRequest = parse_body(&ctx)?;
        let data = state.store.lock().await;

        if !data.accounts.iter().any(|a| reset_token_valid(a, &req.token)) {
            return Err(ApiError::Validation("Invalid token".into()));
        }
        Ok(None)
    })
}

/// POST /accounts/reset-password
pub fn reset_password(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: ResetPasswordRequest = parse_body(&ctx)?;
        let mut data = state.store.lock().await;

        {
            let Some(account) = data
                .accounts
                .iter_mut()
                .find(|a| reset_token_valid(a, &req.token))
            else {
                return Err(ApiError::Validation("Invalid token".into()));
            };

            // 换密码、标记已验证、清掉重置令牌对
            account.password = req.password;
            account.is_verified = true;
            account.reset_token = None;
            account.reset_token_expires = None;
        }
        state.store.flush_accounts(&data.accounts)?;

        Ok(None)
    })
}

/// GET /accounts
pub fn list(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let data = state.store.lock().await;
        require_auth(&state.tokens, &data, ctx.auth.as_deref())?;

        let accounts: Vec<_> = data.accounts.iter().map(project_account).collect();
        Ok(Some(to_value(accounts)?))
    })
}

/// GET /accounts/{id}
///
/// 普通用户只能取自己的记录，管理员可以取任何记录。
pub fn get_by_id(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let data = state.store.lock().await;
        let caller = require_auth(&state.tokens, &data, ctx.auth.as_deref())?;
        let (caller_id, caller_role) = (caller.id, caller.role);

        let Some(account) = data.account_by_id(ctx.id()) else {
            return Err(ApiError::NotFound("Item not found".into()));
        };
        if account.id != caller_id && caller_role != Role::Admin {
            return Err(ApiError::Unauthorized);
        }

        Ok(Some(to_value(project_account(account))?))
    })
}

/// POST /accounts (admin)
///
/// 管理员创建的账户直接标记为已验证；角色取载荷里的值，
/// 不适用"首个账户即管理员"规则。
pub fn create(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: CreateAccountRequest = parse_body(&ctx)?;
        let mut data = state.store.lock().await;
        require_role(&state.tokens, &data, ctx.auth.as_deref(), Role::Admin)?;

        if data.accounts.iter().any(|a| a.email == req.email) {
            return Err(ApiError::Validation(format!(
                "Email {} is already registered",
                req.email
            )));
        }

        let account = Account {
            id: data.next_account_id(),
            title: req.title,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
            role: req.role,
            is_verified: true,
            is_active: req.is_active,
            date_created: Utc::now(),
            verification_token: None,
            reset_token: None,
            reset_token_expires: None,
            refresh_tokens: Vec::new(),
        };
        data.accounts.push(account);
        state.store.flush_accounts(&data.accounts)?;

        Ok(None)
    })
}

/// PUT /accounts/{id}
///
/// 用户可以更新自己的资料，管理员可以更新任何账户。
pub fn update(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let req: UpdateAccountRequest = parse_body(&ctx)?;
        let mut data = state.store.lock().await;
        let caller = require_auth(&state.tokens, &data, ctx.auth.as_deref())?;
        let (caller_id, caller_role) = (caller.id, caller.role);

        let id = ctx.id();
        let Some(idx) = data.accounts.iter().position(|a| a.id == id) else {
            return Err(ApiError::NotFound("Account not found".into()));
        };
        if data.accounts[idx].id != caller_id && caller_role != Role::Admin {
            return Err(ApiError::Unauthorized);
        }

        {
            let account = &mut data.accounts[idx];
            if let Some(title) = req.title {
                account.title = title;
            }
            if let Some(first_name) = req.first_name {
                account.first_name = first_name;
            }
            if let Some(last_name) = req.last_name {
                account.last_name = last_name;
            }
            if let Some(email) = req.email {
                account.email = email;
            }
            // 密码只在提供了非空值时替换
            if let Some(password) = req.password
                && !password.is_empty()
            {
                account.password = password;
            }
            if let Some(role) = req.role {
                account.role = role;
            }
            if let Some(is_active) = req.is_active {
                account.is_active = is_active;
            }
        }
        state.store.flush_accounts(&data.accounts)?;

        Ok(Some(to_value(project_account(&data.accounts[idx]))?))
    })
}

/// DELETE /accounts/{id}
///
/// 用户可以删除自己的账户，管理员可以删除任何账户。
pub fn delete(state: &BackendState, ctx: RequestContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let mut data = state.store.lock().await;
        let caller = require_auth(&state.tokens, &data, ctx.auth.as_deref())?;
        let (caller_id, caller_role) = (caller.id, caller.role);

        let id = ctx.id();
        let Some(account) = data.account_by_id(id) else {
            return Err(ApiError::NotFound("Account not found".into()));
        };
        if account.id != caller_id && caller_role != Role::Admin {
            return Err(ApiError::Unauthorized);
        }

        data.accounts.retain(|a| a.id != id);
        state.store.flush_accounts(&data.accounts)?;

        Ok(None)
    })
}
