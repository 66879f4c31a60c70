use std::sync::Arc;

use crate::auth::{CookieStore, TokenService};
use crate::core::Config;
use crate::notify::Notifier;
use crate::store::{EntityStore, StoreResult};

/// 后端状态 - 持有所有服务的共享引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<EntityStore> | 四集合实体存储 |
/// | tokens | Arc<TokenService> | 访问/刷新令牌服务 |
/// | cookies | Arc<CookieStore> | 刷新令牌的 cookie 旁路 |
/// | notifier | Notifier | 模拟"邮件"通知 |
#[derive(Clone)]
pub struct BackendState {
    /// 后端配置
    pub config: Config,
    /// 实体存储
    pub store: Arc<EntityStore>,
    /// 令牌服务
    pub tokens: Arc<TokenService>,
    /// cookie 旁路 (刷新令牌)
    pub cookies: Arc<CookieStore>,
    /// 通知投递器
    pub notifier: Notifier,
}

impl BackendState {
    /// 初始化后端状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录 (确保存在)
    /// 2. 实体存储 (work_dir/sim.redb，整体加载四个集合)
    /// 3. 令牌服务、cookie 槽、通知投递器
    pub fn initialize(config: &Config) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.work_dir).ok();
        let store = EntityStore::open(config.database_path())?;
        Ok(Self::with_store(config.clone(), store))
    }

    /// 使用内存存储初始化（测试与一次性模拟）
    pub fn in_memory(config: Config) -> StoreResult<Self> {
        let store = EntityStore::open_in_memory()?;
        Ok(Self::with_store(config, store))
    }

    fn with_store(config: Config, store: EntityStore) -> Self {
        let tokens = Arc::new(TokenService::with_config(config.jwt.clone()));
        let notifier = Notifier::new(config.notify_delay());

        Self {
            config,
            store: Arc::new(store),
            tokens,
            cookies: Arc::new(CookieStore::new()),
            notifier,
        }
    }

    /// 替换通知投递器（测试挂捕获通道用）
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }
}
