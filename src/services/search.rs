//! 实时搜索控制器
//!
//! 每次输入都会发起一次搜索，不取消进行中的请求，因此响应可能乱序到达。
//! 每个请求带有单调递增的序号，只有与最新序号一致的响应才会被应用。

use tracing::{debug, warn};

use super::FetchOutcome;
use crate::client::CatalogService;
use crate::error::Result;
use crate::models::Game;

/// 发起搜索所需的最少字符数（去除首尾空白后）
pub const MIN_QUERY_CHARS: usize = 2;

/// 待派发的搜索请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

impl SearchRequest {
    pub async fn execute(self, client: &dyn CatalogService) -> SearchResponse {
        let outcome = client.search(&self.query).await;
        SearchResponse {
            seq: self.seq,
            query: self.query,
            outcome,
        }
    }
}

/// 搜索请求的完成结果
#[derive(Debug)]
pub struct SearchResponse {
    pub seq: u64,
    pub query: String,
    pub outcome: Result<Vec<Game>>,
}

/// 搜索控制器
#[derive(Debug, Default)]
pub struct SearchController {
    query: String,
    candidates: Vec<Game>,
    latest_seq: u64,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前输入框文本
    pub fn query(&self) -> &str {
        &self.query
    }

    /// 下拉候选列表，保持服务端的相关度顺序
    pub fn candidates(&self) -> &[Game] {
        &self.candidates
    }

    pub fn candidate(&self, index: usize) -> Option<&Game> {
        self.candidates.get(index)
    }

    /// 更新查询文本
    ///
    /// 文本过短时立即清空候选并返回 `None`；否则返回一个需要派发的请求。
    pub fn search(&mut self, text: &str) -> Option<SearchRequest> {
        self.query = text.to_string();

        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            self.clear();
            return None;
        }

        self.latest_seq += 1;
        debug!(seq = self.latest_seq, query = %trimmed, "search issued");
        Some(SearchRequest {
            seq: self.latest_seq,
            query: trimmed.to_string(),
        })
    }

    /// 应用搜索结果
    pub fn apply(&mut self, response: SearchResponse) -> FetchOutcome {
        if response.seq != self.latest_seq {
            debug!(
                seq = response.seq,
                latest = self.latest_seq,
                query = %response.query,
                "stale search response discarded"
            );
            return FetchOutcome::Stale;
        }

        match response.outcome {
            Ok(games) => {
                debug!(query = %response.query, count = games.len(), "search results applied");
                self.candidates = games;
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!(query = %response.query, error = %e, "search failed");
                self.candidates.clear();
                FetchOutcome::Failed
            }
        }
    }

    /// 清空候选列表，并作废所有进行中的搜索
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.latest_seq += 1;
    }

    /// 清空查询文本与候选列表
    pub fn reset(&mut self) {
        self.query.clear();
        self.clear();
    }
}
