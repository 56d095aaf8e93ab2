//! 数据模型

pub mod algorithm;
pub mod game;

pub use algorithm::Algorithm;
pub use game::{Game, RecommendationItem, SimilarityFeatures};
