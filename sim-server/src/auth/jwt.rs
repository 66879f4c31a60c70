//! 访问令牌与刷新令牌
//!
//! 访问令牌是 HS256 JWT，只编码主体账户 id 与过期时间（默认 15 分钟），
//! 每次请求随 `Authorization: Bearer <token>` 头重新提交。
//! 刷新令牌是不透明的时间前缀字符串，只存在于账户记录的令牌集合与
//! 进程内 cookie 槽中，从不进入响应体。
//!
//! 这里的签名密钥只是开发默认值 —— 令牌在本设计中不是安全边界。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 未配置 JWT_SECRET 时使用的开发密钥
const DEV_SECRET: &str = "sim-server-development-secret-change-me!";

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// 签名密钥 (应至少 32 字节)
    pub secret: String,
    /// 访问令牌过期时间 (分钟)
    pub expiration_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development secret");
            DEV_SECRET.to_string()
        });

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
        }
    }
}

/// 存储在访问令牌中的 Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 账户 id (Subject)
    pub sub: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 令牌唯一 id —— 同一秒内连续签发的令牌也互不相同
    pub jti: String,
}

/// 令牌错误
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// 令牌服务
#[derive(Debug, Clone)]
pub struct TokenService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// 使用默认配置创建令牌服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建令牌服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为账户签发访问令牌
    pub fn issue_access_token(&self, account_id: i64) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: account_id.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().as_simple().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码访问令牌
    ///
    /// 过期判断与参考行为一致：按当前墙钟严格比较，无宽限期。
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// 生成刷新令牌
    ///
    /// 时间前缀 + 随机后缀的不透明字符串；有效性完全由账户记录中的
    /// 令牌集合决定，令牌本身不携带任何可验证信息。
    pub fn generate_refresh_token() -> String {
        format!(
            "{}.{}",
            shared::util::now_millis(),
            Uuid::new_v4().as_simple()
        )
    }
}

impl Default for TokenService {
    fn default() -> Self {
        Self::new()
    }
}
