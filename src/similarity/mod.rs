//! 相似度特征解读与可视化

pub mod codec;
pub mod visualizer;

pub use visualizer::{CosineView, JaccardView, MinHashView, Visualization};
