//! 探索视图
//!
//! 组合搜索控制器、推荐会话与详情浮层，对外暴露三个模式：
//! Browsing（未选中游戏）、Exploring（展示推荐网格）、Detail（浮层查看单个推荐）。
//!
//! 所有状态迁移都是同步的；需要网络的迁移返回一个 [`Fetch`]，由运行时派发，
//! 完成后以 [`Completion`] 的形式交回 [`ExplorationView::complete`]。

pub mod command;
pub mod keyboard;
pub mod render;
pub mod runtime;

use tracing::debug;

use crate::client::CatalogService;
use crate::models::{Algorithm, RecommendationItem};
use crate::observability::ClientMetrics;
use crate::services::{
    FetchOutcome, RecommendRequest, RecommendResponse, RecommendationSession, SearchController,
    SearchRequest, SearchResponse,
};
use crate::similarity::Visualization;
use keyboard::{Key, KeySubscription, KeyboardHub};

/// 视图模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    Exploring,
    Detail,
}

/// 用户界面事件
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// 首屏上的“继续”提示
    ContinuePrompt,
    /// 搜索框文本变化
    QueryChanged(String),
    /// 选择下拉列表中的第 N 个候选（从 0 开始）
    CandidateChosen(usize),
    /// 点击算法筛选标签
    AlgorithmChosen(Algorithm),
    NextPage,
    PrevPage,
    /// 打开当前页第 N 张卡片（从 0 开始）
    CardChosen(usize),
    /// 点击浮层背景
    OverlayBackdropClicked,
    /// 点击浮层中的卡片本身
    OverlayCardClicked,
    /// 点击浮层关闭按钮
    OverlayCloseClicked,
    /// 返回初始界面
    ResetClicked,
}

/// 需要派发的网络请求
#[derive(Debug, Clone)]
pub enum Fetch {
    Search(SearchRequest),
    Recommend(RecommendRequest),
}

impl Fetch {
    pub async fn execute(self, client: &dyn CatalogService) -> Completion {
        match self {
            Fetch::Search(request) => Completion::Search(request.execute(client).await),
            Fetch::Recommend(request) => Completion::Recommend(request.execute(client).await),
        }
    }
}

/// 已完成的网络请求
#[derive(Debug)]
pub enum Completion {
    Search(SearchResponse),
    Recommend(RecommendResponse),
}

/// 探索视图
pub struct ExplorationView {
    search: SearchController,
    session: RecommendationSession,
    detail: Option<RecommendationItem>,
    prompt_dismissed: bool,
    metrics: ClientMetrics,
    _bindings: Vec<KeySubscription<UiEvent>>,
}

impl ExplorationView {
    /// 创建视图并注册按键：Enter 跳过首屏，Escape 关闭浮层
    pub fn new(keyboard: &KeyboardHub<UiEvent>, metrics: ClientMetrics) -> Self {
        let bindings = vec![
            keyboard.subscribe(Key::Enter, UiEvent::ContinuePrompt),
            keyboard.subscribe(Key::Escape, UiEvent::OverlayCloseClicked),
        ];

        Self {
            search: SearchController::new(),
            session: RecommendationSession::new(),
            detail: None,
            prompt_dismissed: false,
            metrics,
            _bindings: bindings,
        }
    }

    pub fn mode(&self) -> Mode {
        match (self.session.selected(), &self.detail) {
            (None, _) => Mode::Browsing,
            (Some(_), None) => Mode::Exploring,
            (Some(_), Some(_)) => Mode::Detail,
        }
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn session(&self) -> &RecommendationSession {
        &self.session
    }

    /// 浮层中正在查看的推荐
    pub fn detail(&self) -> Option<&RecommendationItem> {
        self.detail.as_ref()
    }

    /// 首屏提示是否已跳过
    pub fn prompt_dismissed(&self) -> bool {
        self.prompt_dismissed
    }

    /// 浮层中需要显示的可视化，按当前算法筛选
    pub fn visualizations(&self) -> Vec<Visualization> {
        match (self.session.selected(), &self.detail) {
            (Some(selected), Some(candidate)) => Visualization::for_pair(
                self.session.algorithm(),
                &selected.features,
                candidate.features(),
            ),
            _ => Vec::new(),
        }
    }

    /// 处理界面事件
    pub fn handle(&mut self, event: UiEvent) -> Option<Fetch> {
        if self.mode() == Mode::Detail {
            return self.handle_overlay(event);
        }

        match event {
            UiEvent::ContinuePrompt => {
                self.prompt_dismissed = true;
                None
            }
            UiEvent::QueryChanged(text) => {
                self.prompt_dismissed = true;
                let request = self.search.search(&text)?;
                self.metrics.record_search();
                Some(Fetch::Search(request))
            }
            UiEvent::CandidateChosen(index) => {
                let game = self.search.candidate(index).cloned()?;
                self.search.clear();
                self.metrics.record_recommend();
                Some(Fetch::Recommend(self.session.select(game)))
            }
            UiEvent::AlgorithmChosen(algorithm) => {
                let request = self.session.change_algorithm(algorithm)?;
                self.metrics.record_recommend();
                Some(Fetch::Recommend(request))
            }
            UiEvent::NextPage => {
                self.session.next_page();
                None
            }
            UiEvent::PrevPage => {
                self.session.prev_page();
                None
            }
            UiEvent::CardChosen(index) => {
                self.detail = self.session.current_page().get(index).cloned();
                None
            }
            UiEvent::ResetClicked => {
                self.search.reset();
                self.session.reset();
                self.detail = None;
                self.prompt_dismissed = false;
                None
            }
            UiEvent::OverlayBackdropClicked
            | UiEvent::OverlayCardClicked
            | UiEvent::OverlayCloseClicked => None,
        }
    }

    /// 浮层打开时，浮层之外的元素不可达；关闭浮层的点击也不会继续传递
    fn handle_overlay(&mut self, event: UiEvent) -> Option<Fetch> {
        match event {
            UiEvent::OverlayBackdropClicked | UiEvent::OverlayCloseClicked => {
                self.detail = None;
            }
            UiEvent::OverlayCardClicked => {}
            other => debug!(event = ?other, "event blocked by detail overlay"),
        }
        None
    }

    /// 写回请求结果
    pub fn complete(&mut self, completion: Completion) -> FetchOutcome {
        let outcome = match completion {
            Completion::Search(response) => self.search.apply(response),
            Completion::Recommend(response) => {
                let outcome = self.session.apply(response);
                if outcome == FetchOutcome::Applied {
                    if let Some(elapsed_ms) = self.session.elapsed_ms() {
                        self.metrics.record_recommend_latency(elapsed_ms);
                    }
                }
                outcome
            }
        };

        match outcome {
            FetchOutcome::Stale => self.metrics.record_stale(),
            FetchOutcome::Failed => self.metrics.record_failure(),
            FetchOutcome::Applied => {}
        }
        outcome
    }
}
