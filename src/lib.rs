//! SteamSearch - 相似游戏探索客户端
//!
//! 按标题实时搜索游戏目录，选中后按所选相似度算法（混合评分、Jaccard、
//! 余弦、MinHash）请求相似游戏列表，分页浏览，并对单个推荐展示三种相似度可视化。

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod similarity;
pub mod view;
