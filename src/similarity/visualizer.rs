//! 相似度可视化
//!
//! 三个互相独立的视图，输入为当前选中的游戏和详情中查看的候选游戏，
//! 输出数值摘要与终端文本。显示哪些视图只取决于当前算法。

use std::fmt::Write;

use super::codec;
use crate::models::game::MINHASH_SIGNATURE_LEN;
use crate::models::{Algorithm, SimilarityFeatures};

const GAUGE_WIDTH: usize = 30;

/// Jaccard 标签重叠视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JaccardView {
    pub intersection: u32,
    pub union: u32,
}

impl JaccardView {
    pub fn new(selected: &SimilarityFeatures, candidate: &SimilarityFeatures) -> Self {
        Self {
            intersection: codec::intersection_count(&selected.tag_bits, &candidate.tag_bits),
            union: codec::union_count(&selected.tag_bits, &candidate.tag_bits),
        }
    }

    pub fn render(&self) -> String {
        let filled = if self.union == 0 {
            0
        } else {
            (self.intersection as usize * GAUGE_WIDTH) / self.union as usize
        };
        format!(
            "Jaccard   shared tags {} / {} total\n          [{}{}]",
            self.intersection,
            self.union,
            "#".repeat(filled),
            "-".repeat(GAUGE_WIDTH - filled)
        )
    }
}

/// 余弦夹角视图
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosineView {
    pub score: f64,
    pub angle_degrees: f64,
}

impl CosineView {
    pub fn new(candidate: &SimilarityFeatures) -> Self {
        Self {
            score: candidate.score,
            angle_degrees: codec::angle_degrees(candidate.score),
        }
    }

    pub fn render(&self) -> String {
        // 0° 时指针在最左，90° 时在最右
        let position = ((self.angle_degrees / 90.0) * GAUGE_WIDTH as f64).round() as usize;
        let position = position.min(GAUGE_WIDTH);
        format!(
            "Cosine    angle {:.1}° (score {:.2})\n          0°{}^{}90°",
            self.angle_degrees,
            self.score,
            " ".repeat(position),
            " ".repeat(GAUGE_WIDTH - position)
        )
    }
}

/// MinHash 签名对齐视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinHashView {
    pub matches: usize,
    pub total: usize,
    pub alignment: Vec<bool>,
}

impl MinHashView {
    pub fn new(selected: &SimilarityFeatures, candidate: &SimilarityFeatures) -> Self {
        let selected = truncate(&selected.min_hash, MINHASH_SIGNATURE_LEN);
        let candidate = truncate(&candidate.min_hash, MINHASH_SIGNATURE_LEN);
        let alignment = codec::signature_alignment(selected, candidate);
        Self {
            matches: codec::signature_matches(selected, candidate),
            total: MINHASH_SIGNATURE_LEN,
            alignment,
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "MinHash   matching positions {} / {}",
            self.matches, self.total
        );
        let strip: String = (0..self.total)
            .map(|i| match self.alignment.get(i) {
                Some(true) => '|',
                _ => '.',
            })
            .collect();
        for chunk in strip.as_bytes().chunks(50) {
            let _ = write!(out, "\n          {}", String::from_utf8_lossy(chunk));
        }
        out
    }
}

fn truncate(signature: &[u32], len: usize) -> &[u32] {
    signature.get(..len).unwrap_or(signature)
}

/// 单个可视化结果
#[derive(Debug, Clone, PartialEq)]
pub enum Visualization {
    Jaccard(JaccardView),
    Cosine(CosineView),
    MinHash(MinHashView),
}

impl Visualization {
    /// 按当前算法生成需要显示的视图
    ///
    /// Default 下三者全部显示，具体算法下只显示对应的一个。
    pub fn for_pair(
        algorithm: Algorithm,
        selected: &SimilarityFeatures,
        candidate: &SimilarityFeatures,
    ) -> Vec<Visualization> {
        let mut views = Vec::with_capacity(3);
        if matches!(algorithm, Algorithm::Default | Algorithm::Jaccard) {
            views.push(Visualization::Jaccard(JaccardView::new(selected, candidate)));
        }
        if matches!(algorithm, Algorithm::Default | Algorithm::Cosine) {
            views.push(Visualization::Cosine(CosineView::new(candidate)));
        }
        if matches!(algorithm, Algorithm::Default | Algorithm::MinHash) {
            views.push(Visualization::MinHash(MinHashView::new(selected, candidate)));
        }
        views
    }

    pub fn render(&self) -> String {
        match self {
            Visualization::Jaccard(view) => view.render(),
            Visualization::Cosine(view) => view.render(),
            Visualization::MinHash(view) => view.render(),
        }
    }
}
