//! 推荐会话
//!
//! 持有当前选中的游戏、当前算法、截断后的推荐列表、分页游标和最近一次请求耗时。
//! 切换算法时若已有选中的游戏，则视为以新算法重新选中同一游戏。

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::FetchOutcome;
use crate::client::{CatalogService, MAX_RECOMMENDATIONS};
use crate::error::Result;
use crate::models::{Algorithm, Game, RecommendationItem};

/// 每页卡片数
pub const PAGE_SIZE: usize = 9;

/// 页数硬上限
pub const MAX_PAGES: usize = 10;

/// 分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 页码（从 1 开始）
    pub page: usize,
    /// 每页数量
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, PAGE_SIZE)
    }
}

impl Pagination {
    /// 创建新分页参数
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// 计算偏移量
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1)) * self.page_size
    }

    /// 可翻到的最大页码：min(ceil(total / page_size), MAX_PAGES)
    pub fn page_count(&self, total: usize) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        total.div_ceil(self.page_size).min(MAX_PAGES)
    }
}

/// 待派发的推荐请求
#[derive(Debug, Clone)]
pub struct RecommendRequest {
    pub seq: u64,
    pub game_id: u64,
    pub algorithm: Algorithm,
    /// 选中时启动的计时器
    pub started: Instant,
}

impl RecommendRequest {
    pub async fn execute(self, client: &dyn CatalogService) -> RecommendResponse {
        let outcome = client.recommend(self.algorithm, self.game_id).await;
        RecommendResponse {
            seq: self.seq,
            game_id: self.game_id,
            algorithm: self.algorithm,
            started: self.started,
            outcome,
        }
    }
}

/// 推荐请求的完成结果
#[derive(Debug)]
pub struct RecommendResponse {
    pub seq: u64,
    pub game_id: u64,
    pub algorithm: Algorithm,
    pub started: Instant,
    pub outcome: Result<Vec<RecommendationItem>>,
}

/// 推荐会话
#[derive(Debug, Default)]
pub struct RecommendationSession {
    algorithm: Algorithm,
    selected: Option<Game>,
    recommendations: Vec<RecommendationItem>,
    pagination: Pagination,
    elapsed_ms: Option<u64>,
    latest_seq: u64,
    pending: bool,
}

impl RecommendationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn selected(&self) -> Option<&Game> {
        self.selected.as_ref()
    }

    pub fn recommendations(&self) -> &[RecommendationItem] {
        &self.recommendations
    }

    pub fn page(&self) -> usize {
        self.pagination.page
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.recommendations.len())
    }

    /// 最近一次成功请求的往返耗时（毫秒）
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.elapsed_ms
    }

    /// 是否有尚未返回的最新请求
    pub fn is_loading(&self) -> bool {
        self.pending
    }

    /// 当前页的推荐条目
    pub fn current_page(&self) -> &[RecommendationItem] {
        let start = self.pagination.offset().min(self.recommendations.len());
        let end = (start + self.pagination.page_size).min(self.recommendations.len());
        &self.recommendations[start..end]
    }

    /// 选中游戏并发起推荐请求
    pub fn select(&mut self, game: Game) -> RecommendRequest {
        self.latest_seq += 1;
        self.pagination.page = 1;
        self.pending = true;

        let request = RecommendRequest {
            seq: self.latest_seq,
            game_id: game.id,
            algorithm: self.algorithm,
            started: Instant::now(),
        };
        info!(
            game_id = game.id,
            name = %game.name,
            algorithm = %request.algorithm.discriminator(),
            "game selected"
        );

        self.selected = Some(game);
        request
    }

    /// 切换算法
    ///
    /// 已选中游戏时以新算法重新请求；否则只记录算法供下次选中使用。
    /// 选择当前已激活的算法不产生任何变化。
    pub fn change_algorithm(&mut self, algorithm: Algorithm) -> Option<RecommendRequest> {
        if algorithm == self.algorithm {
            return None;
        }

        debug!(from = %self.algorithm, to = %algorithm, "algorithm changed");
        self.algorithm = algorithm;

        let game = self.selected.clone()?;
        Some(self.select(game))
    }

    /// 应用推荐结果
    ///
    /// 成功时截断到上限并整体替换列表；失败时保持原状态不变。
    pub fn apply(&mut self, response: RecommendResponse) -> FetchOutcome {
        if response.seq != self.latest_seq {
            debug!(
                seq = response.seq,
                latest = self.latest_seq,
                game_id = response.game_id,
                "stale recommendation response discarded"
            );
            return FetchOutcome::Stale;
        }
        self.pending = false;

        match response.outcome {
            Ok(mut items) => {
                let received = items.len();
                items.truncate(MAX_RECOMMENDATIONS);

                let elapsed_ms = (response.started.elapsed().as_secs_f64() * 1000.0).round() as u64;
                info!(
                    game_id = response.game_id,
                    algorithm = %response.algorithm.discriminator(),
                    received,
                    kept = items.len(),
                    elapsed_ms,
                    "recommendations applied"
                );

                self.recommendations = items;
                self.elapsed_ms = Some(elapsed_ms);
                self.pagination.page = 1;
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!(
                    game_id = response.game_id,
                    algorithm = %response.algorithm.discriminator(),
                    error = %e,
                    "recommendation fetch failed"
                );
                FetchOutcome::Failed
            }
        }
    }

    /// 下一页，已在最后一页时不变
    pub fn next_page(&mut self) -> bool {
        if self.pagination.page >= self.page_count() {
            return false;
        }
        self.pagination.page += 1;
        true
    }

    /// 上一页，已在第一页时不变
    pub fn prev_page(&mut self) -> bool {
        if self.pagination.page <= 1 {
            return false;
        }
        self.pagination.page -= 1;
        true
    }

    /// 清空选中游戏与推荐结果，并作废进行中的请求；当前算法保留
    pub fn reset(&mut self) {
        self.selected = None;
        self.recommendations.clear();
        self.pagination.page = 1;
        self.elapsed_ms = None;
        self.pending = false;
        self.latest_seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use rstest::rstest;
    use std::time::Duration;

    fn items(count: usize) -> Vec<RecommendationItem> {
        (0..count)
            .map(|i| RecommendationItem::new(Game::new(1000 + i as u64, &format!("Game {}", i), "")))
            .collect()
    }

    fn respond(request: RecommendRequest, outcome: Result<Vec<RecommendationItem>>) -> RecommendResponse {
        RecommendResponse {
            seq: request.seq,
            game_id: request.game_id,
            algorithm: request.algorithm,
            started: request.started,
            outcome,
        }
    }

    fn loaded(count: usize) -> RecommendationSession {
        let mut session = RecommendationSession::new();
        let request = session.select(Game::new(220, "Half-Life 2", ""));
        session.apply(respond(request, Ok(items(count))));
        session
    }

    #[test]
    fn test_pagination_offset() {
        let pagination = Pagination::new(1, 9);
        assert_eq!(pagination.offset(), 0);

        let pagination = Pagination::new(3, 9);
        assert_eq!(pagination.offset(), 18);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(9, 1)]
    #[case(10, 2)]
    #[case(81, 9)]
    #[case(82, 10)]
    #[case(90, 10)]
    #[case(200, 10)]
    fn test_page_count(#[case] total: usize, #[case] expected: usize) {
        assert_eq!(Pagination::default().page_count(total), expected);
    }

    #[test]
    fn test_select_requests_active_algorithm() {
        let mut session = RecommendationSession::new();
        session.change_algorithm(Algorithm::Jaccard);
        let request = session.select(Game::new(70, "Half-Life", ""));
        assert_eq!(request.game_id, 70);
        assert_eq!(request.algorithm, Algorithm::Jaccard);
        assert_eq!(session.selected().map(|g| g.id), Some(70));
        assert!(session.is_loading());
    }

    #[test]
    fn test_truncates_to_cap_preserving_order() {
        let session = loaded(95);
        assert_eq!(session.recommendations().len(), MAX_RECOMMENDATIONS);
        assert_eq!(session.recommendations()[0].game.id, 1000);
        assert_eq!(session.recommendations()[89].game.id, 1089);
        assert_eq!(session.page_count(), 10);
    }

    #[rstest]
    #[case(Algorithm::Default, Algorithm::Jaccard)]
    #[case(Algorithm::Default, Algorithm::Cosine)]
    #[case(Algorithm::Default, Algorithm::MinHash)]
    #[case(Algorithm::MinHash, Algorithm::Default)]
    fn test_change_algorithm_refetches_once(#[case] from: Algorithm, #[case] to: Algorithm) {
        let mut session = RecommendationSession::new();
        session.change_algorithm(from);
        let request = session.select(Game::new(220, "Half-Life 2", ""));
        session.apply(respond(request, Ok(items(40))));
        session.next_page();
        session.next_page();
        assert_eq!(session.page(), 3);

        let refetch = session.change_algorithm(to).expect("refetch");
        assert_eq!(refetch.game_id, 220);
        assert_eq!(refetch.algorithm, to);
        assert_eq!(session.page(), 1);
        assert!(session.change_algorithm(to).is_none());
    }

    #[test]
    fn test_change_algorithm_without_selection_only_records() {
        let mut session = RecommendationSession::new();
        assert!(session.change_algorithm(Algorithm::Cosine).is_none());
        assert_eq!(session.algorithm(), Algorithm::Cosine);
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_page_bounds_are_idempotent() {
        let mut session = loaded(20);
        assert_eq!(session.page_count(), 3);
        assert!(!session.prev_page());
        assert_eq!(session.page(), 1);

        assert!(session.next_page());
        assert!(session.next_page());
        assert!(!session.next_page());
        assert!(!session.next_page());
        assert_eq!(session.page(), 3);
        assert_eq!(session.current_page().len(), 2);
    }

    #[test]
    fn test_page_never_exceeds_hard_cap() {
        let mut session = loaded(90);
        for _ in 0..25 {
            session.next_page();
        }
        assert_eq!(session.page(), MAX_PAGES);
        assert_eq!(session.current_page().len(), PAGE_SIZE);
    }

    #[test]
    fn test_empty_result_keeps_page_one() {
        let mut session = loaded(0);
        assert!(!session.next_page());
        assert_eq!(session.page(), 1);
        assert!(session.current_page().is_empty());
    }

    #[test]
    fn test_failure_leaves_prior_state() {
        let mut session = loaded(12);
        session.next_page();
        let elapsed = session.elapsed_ms();

        let request = session.select(Game::new(400, "Portal", ""));
        let outcome = session.apply(respond(
            request,
            Err(AppError::Status {
                status: 500,
                url: "/recommend/global/400".into(),
            }),
        ));

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(session.recommendations().len(), 12);
        assert_eq!(session.elapsed_ms(), elapsed);
        assert!(!session.is_loading());
    }

    #[test]
    fn test_out_of_order_recommendations() {
        let mut session = RecommendationSession::new();
        let first = session.select(Game::new(220, "Half-Life 2", ""));
        let second = session.change_algorithm(Algorithm::Cosine).unwrap();

        assert_eq!(session.apply(respond(second, Ok(items(3)))), FetchOutcome::Applied);
        assert_eq!(session.apply(respond(first, Ok(items(50)))), FetchOutcome::Stale);
        assert_eq!(session.recommendations().len(), 3);
    }

    #[test]
    fn test_reset_discards_in_flight() {
        let mut session = loaded(30);
        let request = session.select(Game::new(400, "Portal", ""));
        session.reset();

        assert_eq!(session.apply(respond(request, Ok(items(5)))), FetchOutcome::Stale);
        assert!(session.selected().is_none());
        assert!(session.recommendations().is_empty());
        assert_eq!(session.elapsed_ms(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_is_measured_from_selection() {
        let mut session = RecommendationSession::new();
        let request = session.select(Game::new(220, "Half-Life 2", ""));
        tokio::time::advance(Duration::from_millis(1234)).await;

        session.apply(respond(request, Ok(items(1))));
        assert_eq!(session.elapsed_ms(), Some(1234));
    }
}
