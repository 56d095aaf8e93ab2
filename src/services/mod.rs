//! 服务模块
//!
//! 搜索控制器与推荐会话。两者只负责状态迁移：发起请求时返回待派发的请求对象，
//! 请求完成后由事件循环调用 `apply` 写回结果。

pub mod recommendation;
pub mod search;

pub use recommendation::{
    MAX_PAGES, PAGE_SIZE, Pagination, RecommendRequest, RecommendResponse, RecommendationSession,
};
pub use search::{MIN_QUERY_CHARS, SearchController, SearchRequest, SearchResponse};

/// 请求完成后写回的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 结果已写入状态
    Applied,
    /// 请求失败，已按规则处理
    Failed,
    /// 已被更新的请求取代，结果被丢弃
    Stale,
}
