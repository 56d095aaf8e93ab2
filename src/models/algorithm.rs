//! 相似度算法选择器

use std::fmt;
use std::str::FromStr;

/// 推荐算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// 混合评分（余弦、MinHash、Jaccard 加权）
    #[default]
    Default,
    /// 标签集合 Jaccard 重叠
    Jaccard,
    /// 余弦相似度
    Cosine,
    /// MinHash 签名相似度
    MinHash,
}

impl Algorithm {
    /// 所有算法，按筛选标签的显示顺序
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Default,
        Algorithm::Jaccard,
        Algorithm::Cosine,
        Algorithm::MinHash,
    ];

    /// 显示名称
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Default => "Default",
            Algorithm::Jaccard => "Jaccard",
            Algorithm::Cosine => "Cosine",
            Algorithm::MinHash => "Min-Hash",
        }
    }

    /// 推荐接口路径中的算法标识
    ///
    /// 由显示名称去掉连字符并转小写得到，Default 对应 `global`。
    pub fn discriminator(&self) -> String {
        match self {
            Algorithm::Default => "global".to_string(),
            other => other.label().replace('-', "").to_lowercase(),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 未知算法名
#[derive(thiserror::Error, Debug, PartialEq)]
#[error("未知算法: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// 接受显示名称或接口标识，大小写与连字符不敏感
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().replace('-', "").to_lowercase();
        match token.as_str() {
            "default" | "global" => Ok(Algorithm::Default),
            "jaccard" => Ok(Algorithm::Jaccard),
            "cosine" => Ok(Algorithm::Cosine),
            "minhash" => Ok(Algorithm::MinHash),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}
