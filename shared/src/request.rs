//! Simulated request shape
//!
//! The in-process equivalent of an outgoing HTTP request: method, path,
//! headers and a JSON body. Consumers build one of these instead of hitting
//! the network; the backend either answers it or passes it through.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value;

/// Request consumed by the simulated backend
#[derive(Debug, Clone)]
pub struct SimRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

impl SimRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Value::Null,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    ///
    /// # Panics
    ///
    /// Panics if the value cannot be serialized, which cannot happen for the
    /// plain data types used on this wire.
    pub fn with_body(mut self, body: impl Serialize) -> Self {
        self.body = serde_json::to_value(body).expect("serializable request body");
        self
    }

    /// Attach a bearer access token as the `Authorization` header
    pub fn with_bearer(mut self, token: &str) -> Self {
        let value = format!("Bearer {token}");
        if let Ok(value) = HeaderValue::from_str(&value) {
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    /// Raw `Authorization` header value, if present and valid UTF-8
    pub fn auth_header(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
    }
}
