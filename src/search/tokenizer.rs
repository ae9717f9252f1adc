//! Tokenizer - jieba segmentation plus punctuation splitting / 分词器
//!
//! Supports / 支持：
//! - English text (split on whitespace and punctuation, lowercase) / 英文分词
//! - CJK text (jieba search-mode segmentation) / 中文分词
//! - Identifier-like words such as `tg_mean` or `sfcWind` / 标识符

use jieba_rs::Jieba;
use once_cell::sync::Lazy;

/// Global jieba tokenizer instance / 全局 jieba 分词器实例
static JIEBA: Lazy<Jieba> = Lazy::new(Jieba::new);

/// Tokenize text for indexing / 对文本进行分词
///
/// Tokens are lowercase and contain only alphanumeric characters, so
/// `tg_mean` becomes `tg`, `mean` and `temperature.` becomes `temperature`.
pub fn tokenize(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let words: Vec<&str> = if contains_cjk(text) {
        JIEBA.cut_for_search(text, true)
    } else {
        vec![text]
    };

    for word in words {
        for piece in word.split(|c: char| !c.is_alphanumeric()) {
            if piece.is_empty() {
                continue;
            }
            tokens.push(piece.to_lowercase());
        }
    }

    tokens
}

/// Tokenize a search query / 对搜索查询进行分词
///
/// Same rules as [`tokenize`], with repeated terms removed (first occurrence kept).
pub fn tokenize_query(query: &str) -> Vec<String> {
    let mut tokens = tokenize(query);
    let mut seen = std::collections::HashSet::new();
    tokens.retain(|t| seen.insert(t.clone()));
    tokens
}

/// Normalize text for exact comparison / 标准化文本用于精确比较
pub fn normalize(text: &str) -> String {
    tokenize(text).join(" ")
}

/// Check if text contains CJK characters (Chinese, Japanese, Korean) / 检测文本是否包含CJK字符
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{4e00}'..='\u{9fff}' |  // CJK Unified Ideographs
            '\u{3400}'..='\u{4dbf}' |  // CJK Extension A
            '\u{3040}'..='\u{309f}' |  // Hiragana
            '\u{30a0}'..='\u{30ff}' |  // Katakana
            '\u{ac00}'..='\u{d7af}'    // Hangul Syllables
        )
    })
}

/// Levenshtein edit distance, counted in characters / 计算 Levenshtein 编辑距离
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 { return len2; }
    if len2 == 0 { return len1; }

    // Two-row variant of the full matrix
    let mut prev: Vec<usize> = (0..=len2).collect();
    let mut curr = vec![0usize; len2 + 1];

    for i in 1..=len1 {
        curr[0] = i;
        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[len2]
}
