//! Caller resolution and authorization checks
//!
//! Every protected handler derives the caller from the `Authorization`
//! header: a missing header, an unparseable token or an expired token all
//! resolve to "no caller" and surface as `Unauthorized`.

use shared::models::{Account, Role};

use crate::auth::TokenService;
use crate::core::ApiError;
use crate::store::Collections;

/// Resolve the calling account from a raw `Authorization` header value
///
/// Returns `None` when the header is absent or malformed, the token fails
/// to parse, the token is expired, or the subject id matches no account.
pub fn resolve_caller<'a>(
    tokens: &TokenService,
    data: &'a Collections,
    auth_header: Option<&str>,
) -> Option<&'a Account> {
    let token = TokenService::extract_from_header(auth_header?)?;
    let claims = tokens.parse(token).ok()?;
    let id: i64 = claims.sub.parse().ok()?;
    data.accounts.iter().find(|a| a.id == id)
}

/// The caller must be authenticated
pub fn require_auth<'a>(
    tokens: &TokenService,
    data: &'a Collections,
    auth_header: Option<&str>,
) -> Result<&'a Account, ApiError> {
    resolve_caller(tokens, data, auth_header).ok_or(ApiError::Unauthorized)
}

/// The caller must be authenticated and hold exactly `role`
pub fn require_role<'a>(
    tokens: &TokenService,
    data: &'a Collections,
    auth_header: Option<&str>,
    role: Role,
) -> Result<&'a Account, ApiError> {
    let account = require_auth(tokens, data, auth_header)?;
    if account.role != role {
        return Err(ApiError::Unauthorized);
    }
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use chrono::Utc;

    fn account(id: i64, role: Role) -> Account {
        Account {
            id,
            title: "Mr".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            email: format!("user{id}@example.com"),
            password: "secret".into(),
            role,
            is_verified: true,
            is_active: true,
            date_created: Utc::now(),
            verification_token: None,
            reset_token: None,
            reset_token_expires: None,
            refresh_tokens: vec![],
        }
    }

    fn service() -> TokenService {
        TokenService::with_config(JwtConfig {
            secret: "test-secret-test-secret-test-secret!".into(),
            expiration_minutes: 15,
        })
    }

    #[test]
    fn test_resolves_known_account() {
        let tokens = service();
        let mut data = Collections::default();
        data.accounts.push(account(1, Role::Admin));

        let jwt = tokens.issue_access_token(1).unwrap();
        let header = format!("Bearer {jwt}");
        let caller = resolve_caller(&tokens, &data, Some(&header));

        assert_eq!(caller.map(|a| a.id), Some(1));
    }

    #[test]
    fn test_missing_and_malformed_headers() {
        let tokens = service();
        let mut data = Collections::default();
        data.accounts.push(account(1, Role::User));

        assert!(resolve_caller(&tokens, &data, None).is_none());
        assert!(resolve_caller(&tokens, &data, Some("Basic abc")).is_none());
        assert!(resolve_caller(&tokens, &data, Some("Bearer junk")).is_none());
    }

    #[test]
    fn test_role_check_is_exact() {
        let tokens = service();
        let mut data = Collections::default();
        data.accounts.push(account(1, Role::Admin));

        let jwt = tokens.issue_access_token(1).unwrap();
        let header = format!("Bearer {jwt}");

        assert!(require_role(&tokens, &data, Some(&header), Role::Admin).is_ok());
        // Admin 不隐含 User 权限，角色必须完全相等
        assert!(matches!(
            require_role(&tokens, &data, Some(&header), Role::User),
            Err(ApiError::Unauthorized)
        ));
    }
}
