//! 模拟"邮件"通知
//!
//! 真实后端在注册/验证/找回密码时发送邮件；模拟后端把同样的内容延迟
//! 约一秒后写进日志，fire-and-forget，投递失败不建模。测试可以挂一个
//! 捕获通道观察投递了什么。

use std::time::Duration;

use tokio::sync::mpsc;

/// 一封待投递的"邮件"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// 验证邮箱（注册后 / 未验证账户尝试登录后）
    Verification { email: String, token: String },
    /// 邮箱已注册（注册撞号时发给已有账户，而不是报错）
    AlreadyRegistered { email: String },
    /// 首个账户的提示：直接以管理员身份登录即可
    FirstUser { email: String },
    /// 密码重置链接
    PasswordReset { email: String, token: String },
}

/// 通知投递器
#[derive(Debug, Clone)]
pub struct Notifier {
    delay: Duration,
    capture: Option<mpsc::UnboundedSender<Notification>>,
}

impl Notifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            capture: None,
        }
    }

    /// 测试用：返回一个能观察到每次投递的接收端
    pub fn with_capture(delay: Duration) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                capture: Some(tx),
            },
            rx,
        )
    }

    /// 异步投递一条通知，调用方不等待
    pub fn send(&self, notification: Notification) {
        let delay = self.delay;
        let capture = self.capture.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            render(&notification);
            if let Some(tx) = capture {
                let _ = tx.send(notification);
            }
        });
    }
}

/// 把"邮件"渲染到日志 —— 真实后端在这里发真实邮件
fn render(notification: &Notification) {
    match notification {
        Notification::Verification { email, token } => {
            tracing::info!(
                email = %email,
                verify_url = %format!("/account/verify-email?token={token}"),
                "📧 verification email"
            );
        }
        Notification::AlreadyRegistered { email } => {
            tracing::info!(
                email = %email,
                "📧 email already registered, directing to forgot-password"
            );
        }
        Notification::FirstUser { email } => {
            tracing::info!(
                email = %email,
                "📧 first account registered as verified admin, login directly"
            );
        }
        Notification::PasswordReset { email, token } => {
            tracing::info!(
                email = %email,
                reset_url = %format!("/account/reset-password?token={token}"),
                "📧 password reset email, link valid for 1 day"
            );
        }
    }
}
