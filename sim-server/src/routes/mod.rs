//! 路由分发
//!
//! 请求按序匹配一张 `(method, pattern, handler)` 路由表，第一个命中者
//! 获胜。顺序是有语义的：字面量端点（如 `GET /accounts`）必须排在对应
//! 的 id 模式（`GET /accounts/{id}`）之前，所有条目都排在兜底的
//! 透传之前 —— 未命中的请求原样返回，交给真实传输层。

pub mod envelope;
mod pattern;

pub use envelope::HandlerResult;
pub use pattern::PathPattern;

use std::future::Future;
use std::pin::Pin;

use http::Method;
use serde_json::Value;

use shared::{SimRequest, SimResponse};

use crate::api::{accounts, departments, employees, workflows};
use crate::core::BackendState;

/// 分发结果：被模拟处理，或原样透传给真实传输层
#[derive(Debug)]
pub enum Dispatch {
    Handled(SimResponse),
    PassThrough(SimRequest),
}

impl Dispatch {
    /// 取出模拟响应；透传时返回 `None`
    pub fn into_handled(self) -> Option<SimResponse> {
        match self {
            Dispatch::Handled(response) => Some(response),
            Dispatch::PassThrough(_) => None,
        }
    }
}

/// 传给处理器的请求上下文
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    /// 原始 Authorization 头
    pub auth: Option<String>,
    pub body: Value,
    /// 路由模式捕获的尾部 id
    pub id: Option<i64>,
}

impl RequestContext {
    fn from_request(request: SimRequest, id: Option<i64>) -> Self {
        let auth = request.auth_header().map(str::to_string);
        Self {
            method: request.method,
            path: request.path,
            auth,
            body: request.body,
            id,
        }
    }

    /// 路由捕获的 id；只在 IdSuffix 路由的处理器里调用
    pub fn id(&self) -> i64 {
        self.id.expect("handler bound to an id pattern")
    }
}

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'a>>;

/// 路由处理器：借用后端状态，消费请求上下文
pub type Handler = for<'a> fn(&'a BackendState, RequestContext) -> HandlerFuture<'a>;

struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
}

/// 有序路由表
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// 构建完整路由表
    ///
    /// 注意排序不变量：
    /// - `GET /accounts` 在 `GET /accounts/{id}` 之前；
    /// - 认证端点（字面量后缀）在账户 CRUD 之前；
    /// - `/api/workflows/employee/{id}` 有独立的模式，不与
    ///   `/api/workflows/{id}` 冲突，但保持参考实现的相对顺序。
    pub fn new() -> Self {
        use PathPattern::{IdSuffix, Suffix};

        let mut table = Self { routes: Vec::new() };

        // 认证与账户生命周期
        table.add(Method::POST, Suffix("/accounts/authenticate"), accounts::authenticate);
        table.add(Method::POST, Suffix("/accounts/refresh-token"), accounts::refresh_token);
        table.add(Method::POST, Suffix("/accounts/revoke-token"), accounts::revoke_token);
        table.add(Method::POST, Suffix("/accounts/register"), accounts::register);
        table.add(Method::POST, Suffix("/accounts/verify-email"), accounts::verify_email);
        table.add(Method::POST, Suffix("/accounts/forgot-password"), accounts::forgot_password);
        table.add(
            Method::POST,
            Suffix("/accounts/validate-reset-token"),
            accounts::validate_reset_token,
        );
        table.add(Method::POST, Suffix("/accounts/reset-password"), accounts::reset_password);

        // 账户 CRUD —— 字面量 GET 必须先于 id 模式
        table.add(Method::GET, Suffix("/accounts"), accounts::list);
        table.add(Method::GET, IdSuffix("/accounts"), accounts::get_by_id);
        table.add(Method::POST, Suffix("/accounts"), accounts::create);
        table.add(Method::PUT, IdSuffix("/accounts"), accounts::update);
        table.add(Method::DELETE, IdSuffix("/accounts"), accounts::delete);

        // 部门
        table.add(Method::POST, Suffix("/departments"), departments::create);
        table.add(Method::GET, Suffix("/departments"), departments::list);
        table.add(Method::PUT, IdSuffix("/departments"), departments::update);
        table.add(Method::GET, IdSuffix("/departments"), departments::get_by_id);
        table.add(Method::DELETE, IdSuffix("/departments"), departments::delete);

        // 员工
        table.add(Method::POST, Suffix("/employees"), employees::create);
        table.add(Method::GET, Suffix("/employees"), employees::list);
        table.add(Method::GET, IdSuffix("/employees"), employees::get_by_id);
        table.add(Method::PUT, IdSuffix("/employees"), employees::update);
        table.add(Method::DELETE, IdSuffix("/employees"), employees::delete);
        table.add(Method::PATCH, IdSuffix("/employees"), employees::transfer);

        // 工作流
        table.add(Method::GET, IdSuffix("/api/workflows"), workflows::get_by_id);
        table.add(Method::GET, Suffix("/api/workflows"), workflows::list);
        table.add(
            Method::GET,
            IdSuffix("/api/workflows/employee"),
            workflows::get_by_employee,
        );
        table.add(Method::POST, Suffix("/api/workflows"), workflows::create);
        table.add(Method::PUT, IdSuffix("/api/workflows"), workflows::update);
        table.add(Method::DELETE, IdSuffix("/api/workflows"), workflows::delete);

        table
    }

    fn add(&mut self, method: Method, pattern: PathPattern, handler: Handler) {
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
    }

    /// 顺序扫描，返回第一个命中的处理器与捕获的 id
    pub fn find(&self, method: &Method, path: &str) -> Option<(Handler, Option<i64>)> {
        for route in &self.routes {
            if route.method == *method
                && let Some(id) = route.pattern.matches(path)
            {
                return Some((route.handler, id));
            }
        }
        None
    }

    /// 匹配请求并构建处理上下文；未命中时原样归还请求
    pub fn resolve(&self, request: SimRequest) -> Result<(Handler, RequestContext), SimRequest> {
        match self.find(&request.method, &request.path) {
            Some((handler, id)) => Ok((handler, RequestContext::from_request(request, id))),
            None => Err(request),
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_wins_over_id_pattern() {
        let table = RouteTable::new();

        // `GET /accounts` 与 `GET /accounts/{id}` 必须各自命中
        assert!(matches!(table.find(&Method::GET, "/accounts"), Some((_, None))));
        assert!(matches!(
            table.find(&Method::GET, "/accounts/3"),
            Some((_, Some(3)))
        ));
    }

    #[test]
    fn test_unknown_paths_fall_through() {
        let table = RouteTable::new();

        assert!(table.find(&Method::GET, "/external/api/status").is_none());
        assert!(table.find(&Method::POST, "/accounts/unknown-op").is_none());
    }

    #[test]
    fn test_method_is_part_of_the_key() {
        let table = RouteTable::new();

        // PATCH 只对员工 id 路由有效
        assert!(table.find(&Method::PATCH, "/employees/1").is_some());
        assert!(table.find(&Method::PATCH, "/departments/1").is_none());
    }

    #[test]
    fn test_workflow_employee_lookup_routes_separately() {
        let table = RouteTable::new();

        let (_, id) = table
            .find(&Method::GET, "/api/workflows/employee/5")
            .expect("employee lookup route");
        assert_eq!(id, Some(5));
    }
}
