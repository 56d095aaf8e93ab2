//! 目录服务客户端
//!
//! `CatalogService` 是搜索 / 推荐两个远程接口的边界，`HttpCatalogClient`
//! 为基于 reqwest 的实现。测试中使用 mockall 生成的 `MockCatalogService`。

pub mod http;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::config::ServiceConfig;
use crate::error::Result;
use crate::models::{Algorithm, Game, RecommendationItem};

pub use http::HttpCatalogClient;

/// 推荐列表上限，超出部分在客户端截断
pub const MAX_RECOMMENDATIONS: usize = 90;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// 按标题片段搜索，结果按相关度排序
    async fn search(&self, query: &str) -> Result<Vec<Game>>;

    /// 获取与指定游戏相似的游戏，按相似度降序
    async fn recommend(&self, algorithm: Algorithm, game_id: u64)
    -> Result<Vec<RecommendationItem>>;
}

pub fn create_catalog_client(config: &ServiceConfig) -> Result<Arc<dyn CatalogService>> {
    let client = HttpCatalogClient::new(&config.base_url)?;
    Ok(Arc::new(client))
}
