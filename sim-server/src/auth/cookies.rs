//! 进程内 cookie 槽
//!
//! 刷新令牌通过带过期时间的 cookie 等价物旁路传递，不进入响应体。
//! 这里的槽是进程级共享状态：后端在认证/刷新时写入，
//! 刷新/注销端点读取，行为等同于浏览器的 cookie jar。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// 携带刷新令牌的 cookie 名
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Debug, Clone)]
struct Cookie {
    value: String,
    expires_at: DateTime<Utc>,
}

/// 进程级 cookie 存储
#[derive(Debug, Default)]
pub struct CookieStore {
    entries: Mutex<HashMap<String, Cookie>>,
}

impl CookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入 cookie，过期时间从现在起算
    pub async fn set(&self, name: &str, value: &str, ttl: chrono::Duration) {
        let cookie = Cookie {
            value: value.to_string(),
            expires_at: Utc::now() + ttl,
        };
        self.entries.lock().await.insert(name.to_string(), cookie);
    }

    /// 读取未过期的 cookie；过期条目当场清除
    pub async fn get(&self, name: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        match entries.get(name) {
            Some(cookie) if cookie.expires_at > Utc::now() => Some(cookie.value.clone()),
            Some(_) => {
                entries.remove(name);
                None
            }
            None => None,
        }
    }

    /// 删除 cookie
    pub async fn clear(&self, name: &str) {
        self.entries.lock().await.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = CookieStore::new();
        store
            .set(REFRESH_COOKIE, "token-1", chrono::Duration::days(7))
            .await;

        assert_eq!(
            store.get(REFRESH_COOKIE).await.as_deref(),
            Some("token-1")
        );
    }

    #[tokio::test]
    async fn test_expired_cookie_is_dropped() {
        let store = CookieStore::new();
        store
            .set(REFRESH_COOKIE, "stale", chrono::Duration::seconds(-1))
            .await;

        assert_eq!(store.get(REFRESH_COOKIE).await, None);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = CookieStore::new();
        store
            .set(REFRESH_COOKIE, "token-2", chrono::Duration::days(7))
            .await;
        store.clear(REFRESH_COOKIE).await;

        assert_eq!(store.get(REFRESH_COOKIE).await, None);
    }
}
