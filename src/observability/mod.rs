//! 可观测性模块
//!
//! 提供 tracing 日志初始化和客户端计数指标。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::config::LoggingConfig;
use crate::error::{AppError, Result};

// ===== Simple Metrics (using atomics for zero-dep implementation) =====

/// 客户端指标
#[derive(Clone, Default, Debug)]
pub struct ClientMetrics {
    pub search_requests_total: Arc<AtomicU64>,
    pub recommend_requests_total: Arc<AtomicU64>,
    pub recommend_latency_sum_ms: Arc<AtomicU64>,
    pub stale_responses_total: Arc<AtomicU64>,
    pub fetch_failures_total: Arc<AtomicU64>,
}

impl ClientMetrics {
    /// 记录发起的搜索请求
    pub fn record_search(&self) {
        self.search_requests_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录发起的推荐请求
    pub fn record_recommend(&self) {
        self.recommend_requests_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录成功推荐请求的耗时
    pub fn record_recommend_latency(&self, elapsed_ms: u64) {
        self.recommend_latency_sum_ms
            .fetch_add(elapsed_ms, Ordering::SeqCst);
    }

    /// 记录被丢弃的过期响应
    pub fn record_stale(&self) {
        self.stale_responses_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录失败的请求
    pub fn record_failure(&self) {
        self.fetch_failures_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP search_requests_total Search requests issued
# TYPE search_requests_total counter
search_requests_total {}
# HELP recommend_requests_total Recommendation requests issued
# TYPE recommend_requests_total counter
recommend_requests_total {}
# HELP recommend_latency_seconds_sum Round-trip time of applied recommendation fetches
# TYPE recommend_latency_seconds_sum counter
recommend_latency_seconds_sum {}
# HELP stale_responses_total Responses discarded because a newer request superseded them
# TYPE stale_responses_total counter
stale_responses_total {}
# HELP fetch_failures_total Failed search or recommendation fetches
# TYPE fetch_failures_total counter
fetch_failures_total {}
"#,
            self.search_requests_total.load(Ordering::SeqCst),
            self.recommend_requests_total.load(Ordering::SeqCst),
            self.recommend_latency_sum_ms.load(Ordering::SeqCst) as f64 / 1000.0,
            self.stale_responses_total.load(Ordering::SeqCst),
            self.fetch_failures_total.load(Ordering::SeqCst),
        )
    }
}

// ===== Logging =====

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先于配置中的日志级别。未配置日志目录时输出到 stderr，
/// 因为 stdout 用于界面输出。返回的 guard 需在程序退出前保持存活。
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| AppError::Config(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "steamsearch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let installed = if config.structured {
                builder.json().with_writer(writer).try_init()
            } else {
                builder.with_ansi(false).with_writer(writer).try_init()
            };
            installed.map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            let installed = if config.structured {
                builder.json().with_writer(std::io::stderr).try_init()
            } else {
                builder.with_writer(std::io::stderr).try_init()
            };
            installed.map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(None)
        }
    }
}
