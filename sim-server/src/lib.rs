//! Sim Server - 人事管理系统的进程内模拟后端
//!
//! # 架构概述
//!
//! 本 crate 在进程内完整模拟一个 HR 管理后端：拦截外发的 API 请求，
//! 用内存数据集合 + 嵌入式 redb 持久化逐一应答，行为对齐真实后端 ——
//! 认证、令牌轮换、基于角色的授权、四类实体的关联 CRUD，以及成功与
//! 失败路径一致的模拟延迟。
//!
//! # 模块结构
//!
//! ```text
//! sim-server/src/
//! ├── core/          # 配置、状态、错误、后端入口
//! ├── auth/          # 令牌服务、caller 解析、cookie 旁路
//! ├── store/         # redb 实体存储与投影
//! ├── routes/        # 有序路由表、路径模式、延迟信封
//! ├── api/           # 各集合的端点处理器
//! └── notify.rs      # 模拟"邮件"通知
//! ```
//!
//! # 使用示例
//!
//! ```ignore
//! let backend = Backend::in_memory(Config::for_tests())?;
//! match backend.handle(SimRequest::get("/accounts")).await {
//!     Dispatch::Handled(response) => println!("{:?}", response.status),
//!     Dispatch::PassThrough(request) => send_for_real(request).await,
//! }
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod notify;
pub mod routes;
pub mod store;

// Re-export 公共类型
pub use auth::{CookieStore, JwtConfig, TokenService};
pub use core::{ApiError, ApiResult, Backend, BackendState, Config};
pub use notify::{Notification, Notifier};
pub use routes::{Dispatch, RouteTable};
pub use store::{Collections, EntityStore, StoreError};
