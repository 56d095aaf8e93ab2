//! 相似度特征编解码
//!
//! 纯函数，对任意输入都有定义。长度不一致时，较短一侧缺失的位置按零处理。

/// 两个标签位向量共有的标签数（按位与后的 popcount）
pub fn intersection_count(bits_a: &[u32], bits_b: &[u32]) -> u32 {
    zip_words(bits_a, bits_b).map(|(a, b)| (a & b).count_ones()).sum()
}

/// 任一游戏拥有的标签数（按位或后的 popcount）
pub fn union_count(bits_a: &[u32], bits_b: &[u32]) -> u32 {
    zip_words(bits_a, bits_b).map(|(a, b)| (a | b).count_ones()).sum()
}

/// 余弦相似度对应的夹角（度），保留一位小数
///
/// 分数先夹到 [0, 1]，NaN 视为 0。
pub fn angle_degrees(score: f64) -> f64 {
    let score = if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    };
    let degrees = score.acos().to_degrees();
    (degrees * 10.0).round() / 10.0
}

/// 逐位置比对两个 MinHash 签名
///
/// 值为 0 表示该位置未分配哈希，两侧同为 0 不算匹配。
pub fn signature_alignment(sig_a: &[u32], sig_b: &[u32]) -> Vec<bool> {
    sig_a
        .iter()
        .zip(sig_b)
        .map(|(a, b)| *a != 0 && a == b)
        .collect()
}

/// 匹配的签名位置数
pub fn signature_matches(sig_a: &[u32], sig_b: &[u32]) -> usize {
    sig_a
        .iter()
        .zip(sig_b)
        .filter(|(a, b)| **a != 0 && a == b)
        .count()
}

fn zip_words<'a>(a: &'a [u32], b: &'a [u32]) -> impl Iterator<Item = (u32, u32)> + 'a {
    let len = a.len().max(b.len());
    (0..len).map(move |i| {
        (
            a.get(i).copied().unwrap_or(0),
            b.get(i).copied().unwrap_or(0),
        )
    })
}
