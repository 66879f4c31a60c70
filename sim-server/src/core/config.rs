use std::path::PathBuf;
use std::time::Duration;

use crate::auth::JwtConfig;

/// 模拟后端配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (存放 redb 数据文件) |
/// | SIM_LATENCY_MS | 500 | 每个模拟响应的固定延迟(毫秒) |
/// | NOTIFY_DELAY_MS | 1000 | 模拟"邮件"通知的投递延迟(毫秒) |
/// | REFRESH_TTL_DAYS | 7 | 刷新令牌有效期(天) |
/// | RESET_TTL_HOURS | 24 | 密码重置令牌有效期(小时) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// JWT 相关项见 [`JwtConfig`]。
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放持久化数据
    pub work_dir: String,
    /// 模拟响应延迟 (成功与失败路径一致)
    pub latency_ms: u64,
    /// 通知投递延迟
    pub notify_delay_ms: u64,
    /// JWT 配置
    pub jwt: JwtConfig,
    /// 刷新令牌有效期 (天)
    pub refresh_ttl_days: i64,
    /// 密码重置令牌有效期 (小时)
    pub reset_ttl_hours: i64,
    /// 运行环境: development | test | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            latency_ms: std::env::var("SIM_LATENCY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            notify_delay_ms: std::env::var("NOTIFY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            jwt: JwtConfig::default(),
            refresh_ttl_days: std::env::var("REFRESH_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            reset_ttl_hours: std::env::var("RESET_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 测试配置：固定的密钥与默认延迟，不读环境变量
    pub fn for_tests() -> Self {
        Self {
            work_dir: String::new(),
            latency_ms: 500,
            notify_delay_ms: 1000,
            jwt: JwtConfig {
                secret: "sim-server-test-secret-at-least-32-bytes!".into(),
                expiration_minutes: 15,
            },
            refresh_ttl_days: 7,
            reset_ttl_hours: 24,
            environment: "test".into(),
        }
    }

    /// redb 数据文件路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("sim.redb")
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn notify_delay(&self) -> Duration {
        Duration::from_millis(self.notify_delay_ms)
    }

    /// 刷新令牌有效期
    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_ttl_days)
    }

    /// 密码重置令牌有效期
    pub fn reset_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.reset_ttl_hours)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
