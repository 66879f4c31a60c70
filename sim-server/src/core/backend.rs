use shared::SimRequest;

use crate::core::{BackendState, Config};
use crate::routes::{Dispatch, RouteTable, envelope};
use crate::store::StoreResult;

/// 模拟后端入口
///
/// 持有路由表与后端状态。`handle` 是唯一的外部接口：拦截一条请求，
/// 要么在延迟后给出模拟响应，要么原样透传。
pub struct Backend {
    state: BackendState,
    routes: RouteTable,
}

impl Backend {
    pub fn new(state: BackendState) -> Self {
        Self {
            state,
            routes: RouteTable::new(),
        }
    }

    /// 从配置初始化（持久化存储在 work_dir 下）
    pub fn initialize(config: &Config) -> StoreResult<Self> {
        Ok(Self::new(BackendState::initialize(config)?))
    }

    /// 内存后端（测试与一次性模拟）
    pub fn in_memory(config: Config) -> StoreResult<Self> {
        Ok(Self::new(BackendState::in_memory(config)?))
    }

    pub fn state(&self) -> &BackendState {
        &self.state
    }

    /// 拦截一条请求
    ///
    /// 命中路由时：处理器同步完成全部读写（含落盘），然后等待固定的
    /// 模拟延迟，再返回响应 —— 错误与成功走同一条延迟路径。
    /// 未命中时：请求原样返回，由调用方交给真实传输层。
    pub async fn handle(&self, request: SimRequest) -> Dispatch {
        let (handler, ctx) = match self.routes.resolve(request) {
            Ok(resolved) => resolved,
            Err(request) => {
                tracing::trace!(method = %request.method, path = %request.path, "pass-through");
                return Dispatch::PassThrough(request);
            }
        };

        tracing::debug!(method = %ctx.method, path = %ctx.path, "simulated route");
        let result = handler(&self.state, ctx).await;
        Dispatch::Handled(envelope::deliver(self.state.config.latency(), result).await)
    }
}
