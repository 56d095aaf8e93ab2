//! 游戏与推荐条目
//!
//! 服务端返回的 JSON 结构没有任何校验保证，这里所有特征字段都允许缺失或为 `null`，
//! 缺失时退化为零值 / 空序列，保证在可视化中不会被误判为“匹配”。

use serde::{Deserialize, Deserializer};

/// 标签位向量的字数（8 × 32 位）
pub const TAG_WORDS: usize = 8;

/// MinHash 签名长度，与服务端草图一致
pub const MINHASH_SIGNATURE_LEN: usize = 150;

/// 相似度特征
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SimilarityFeatures {
    /// 打包的标签集合
    #[serde(rename = "tagBits", default, deserialize_with = "null_as_default")]
    pub tag_bits: Vec<u32>,

    /// 余弦相似度，位于 [0, 1]
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,

    /// MinHash 签名
    #[serde(rename = "minHash", default, deserialize_with = "null_as_default")]
    pub min_hash: Vec<u32>,
}

/// 游戏
///
/// 搜索结果直接反序列化为该类型；搜索接口同时携带游戏自身的标签位和签名，
/// 选中后用作可视化比较的一侧。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Game {
    /// 游戏唯一标识
    pub id: u64,

    /// 显示名称
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// 封面图地址
    #[serde(rename = "imageURL", default, deserialize_with = "null_as_default")]
    pub image_url: String,

    /// 相似度特征
    #[serde(flatten)]
    pub features: SimilarityFeatures,
}

impl Game {
    /// 创建不带特征的游戏
    pub fn new(id: u64, name: &str, image_url: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            image_url: image_url.to_string(),
            features: SimilarityFeatures::default(),
        }
    }

    /// 附加相似度特征
    pub fn with_features(mut self, features: SimilarityFeatures) -> Self {
        self.features = features;
        self
    }
}

/// 推荐条目
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendationItem {
    #[serde(flatten)]
    pub game: Game,

    /// 价格（美元）
    #[serde(default)]
    pub price: Option<f64>,

    /// 服务端标注的算法名
    #[serde(default)]
    pub algorithm: Option<String>,
}

impl RecommendationItem {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            price: None,
            algorithm: None,
        }
    }

    pub fn features(&self) -> &SimilarityFeatures {
        &self.game.features
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_game_decodes_search_payload() {
        let payload = json!({
            "id": 220,
            "name": "Half-Life 2",
            "imageURL": "https://cdn.example/220.jpg",
            "tagBits": [1, 0, 0, 0, 0, 0, 0, 4],
            "minHash": [7, 0, 9]
        });

        let game: Game = serde_json::from_value(payload).unwrap();
        assert_eq!(game.id, 220);
        assert_eq!(game.name, "Half-Life 2");
        assert_eq!(game.image_url, "https://cdn.example/220.jpg");
        assert_eq!(game.features.tag_bits.len(), TAG_WORDS);
        assert_eq!(game.features.min_hash, vec![7, 0, 9]);
        assert_eq!(game.features.score, 0.0);
    }

    #[test]
    fn test_missing_and_null_features_default_to_zero() {
        let payload = json!({
            "id": 70,
            "name": "Half-Life",
            "imageURL": null,
            "score": null,
            "tagBits": null
        });

        let item: RecommendationItem = serde_json::from_value(payload).unwrap();
        assert_eq!(item.game.image_url, "");
        assert!(item.features().tag_bits.is_empty());
        assert!(item.features().min_hash.is_empty());
        assert_eq!(item.features().score, 0.0);
        assert_eq!(item.price, None);
    }

    #[test]
    fn test_recommendation_item_keeps_price_and_algorithm() {
        let payload = json!({
            "id": 400,
            "name": "Portal",
            "imageURL": "",
            "score": 0.87,
            "price": 9.99,
            "algorithm": "global_weighted",
            "tagBits": [0, 0, 0, 0, 0, 0, 0, 0],
            "minHash": []
        });

        let item: RecommendationItem = serde_json::from_value(payload).unwrap();
        assert_eq!(item.features().score, 0.87);
        assert_eq!(item.price, Some(9.99));
        assert_eq!(item.algorithm.as_deref(), Some("global_weighted"));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let payload = json!({ "name": "Nameless" });
        assert!(serde_json::from_value::<Game>(payload).is_err());
    }
}
