//! 错误处理模块
//!
//! 定义客户端的错误类型。抓取失败一律视为可恢复的瞬时错误，
//! 由调用方清空列表并记录日志，不会向界面抛出。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 传输层错误（连接失败、读取响应体失败等）
    #[error("传输错误: {0}")]
    Transport(String),

    /// 服务返回非成功状态码
    #[error("服务返回状态 {status}: {url}")]
    Status { status: u16, url: String },

    /// 响应体无法解码为预期结构
    #[error("响应格式错误: {0}")]
    MalformedResponse(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),
}

impl AppError {
    /// 是否属于瞬时抓取失败（传输、状态码、格式错误）
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_) | AppError::Status { .. } | AppError::MalformedResponse(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::MalformedResponse(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::MalformedResponse(e.to_string())
        } else {
            AppError::Transport(e.to_string())
        }
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
