//! 认证模块：令牌服务、caller 解析、cookie 旁路

mod cookies;
mod identity;
mod jwt;

pub use cookies::{CookieStore, REFRESH_COOKIE};
pub use identity::{require_auth, require_role, resolve_caller};
pub use jwt::{Claims, JwtConfig, TokenError, TokenService};
