//! ファイル分類
//!
//! ファイル名・拡張子・先頭テキスト（スニペット）だけを見て
//! recipe / menu / other を判定する。ネットワークやバックエンドは使わない。
//!
//! ## 判定順（最初に一致したものを採用）
//! 1. json / csv → recipe
//! 2. txt かつ (レシピ語スコア ≥ 2 またはレシピっぽいファイル名) → recipe
//! 3. txt かつ (価格シグナル ≥ 3 またはメニューっぽいファイル名) → menu
//! 4. menu / menutxt 拡張子、またはメニューっぽいファイル名 → menu
//! 5. レシピ語スコア ≥ 3 かつレシピ系拡張子 → recipe
//! 6. 価格シグナル ≥ 4 → menu
//! 7. other

use crate::text::extension_of;
use crate::types::{ClassificationResult, FileKind};
use regex::Regex;
use std::collections::HashSet;

/// スニペットとして読む最大バイト数
pub const SNIPPET_BYTE_CAP: usize = 20_000;

lazy_static::lazy_static! {
    static ref MENU_NAME_RE: Regex =
        Regex::new(r"(?i)menu|prix|specials|banquet|dining|prix-fixe|tasting").unwrap();
    static ref RECIPE_NAME_RE: Regex =
        Regex::new(r"(?i)recipe|recipes|cookbook|prep|ingredient").unwrap();

    static ref RECIPE_TOKEN_RES: Vec<Regex> = [
        r"(?i)ingredients:",
        r"(?i)instructions:",
        r"(?i)method:",
        r"(?i)yield:",
        r"(?i)servings:",
        r"(?i)prep time",
        r"(?i)cook time",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref CURRENCY_PRICE_RE: Regex = Regex::new(r"[$€£]\s?\d+(?:[.,]\d{1,2})?").unwrap();
    static ref DECIMAL_PRICE_RE: Regex = Regex::new(r"\b\d{1,3}\.\d{2}\b").unwrap();
    static ref SPACED_PRICE_RE: Regex = Regex::new(r"\b\d{1,3}\s\d{2}\b").unwrap();
}

/// 分類のしきい値と信頼度
///
/// `Default` は従来の判定表そのもの。
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierWeights {
    /// json / csv
    pub structured_confidence: f64,
    pub txt_recipe_min_score: usize,
    pub txt_recipe_confidence: f64,
    pub txt_menu_min_price_signals: usize,
    pub txt_menu_confidence: f64,
    /// menu / menutxt 拡張子またはファイル名
    pub menu_hint_confidence: f64,
    pub content_recipe_min_score: usize,
    pub content_recipe_confidence: f64,
    pub content_menu_min_price_signals: usize,
    pub content_menu_confidence: f64,
    /// txt / json / csv 以外でレシピとみなせる拡張子
    pub extra_recipe_extensions: Vec<String>,
}

impl Default for ClassifierWeights {
    fn default() -> Self {
        Self {
            structured_confidence: 0.85,
            txt_recipe_min_score: 2,
            txt_recipe_confidence: 0.7,
            txt_menu_min_price_signals: 3,
            txt_menu_confidence: 0.6,
            menu_hint_confidence: 0.7,
            content_recipe_min_score: 3,
            content_recipe_confidence: 0.65,
            content_menu_min_price_signals: 4,
            content_menu_confidence: 0.65,
            extra_recipe_extensions: vec!["md".to_string(), "rtf".to_string()],
        }
    }
}

impl ClassifierWeights {
    fn is_recipe_extension(&self, ext: &str) -> bool {
        matches!(ext, "txt" | "json" | "csv")
            || self.extra_recipe_extensions.iter().any(|e| e == ext)
    }
}

/// レシピ語のスコア（各トークン最大1点）
pub fn recipe_score(snippet: &str) -> usize {
    RECIPE_TOKEN_RES
        .iter()
        .filter(|re| re.is_match(snippet))
        .count()
}

/// 価格らしい文字列の種類数
///
/// 通貨付き・小数2桁・空白区切りの3パターンの一致文字列を重複なしで数える。
pub fn price_signals(snippet: &str) -> usize {
    let mut seen: HashSet<&str> = HashSet::new();
    for re in [&*CURRENCY_PRICE_RE, &*DECIMAL_PRICE_RE, &*SPACED_PRICE_RE] {
        seen.extend(re.find_iter(snippet).map(|m| m.as_str()));
    }
    seen.len()
}

/// メニューっぽいファイル名か
pub fn is_probable_menu_name(file_name: &str) -> bool {
    MENU_NAME_RE.is_match(file_name)
}

/// レシピっぽいファイル名か
pub fn is_probable_recipe_name(file_name: &str) -> bool {
    RECIPE_NAME_RE.is_match(file_name)
}

/// ファイル名とスニペットから種別を判定する
///
/// # Arguments
/// * `file_name` - ファイル名（パスではなく名前部分）
/// * `snippet` - 先頭テキスト。読めなかった場合は空文字
/// * `weights` - しきい値表
pub fn classify(file_name: &str, snippet: &str, weights: &ClassifierWeights) -> ClassificationResult {
    let format = extension_of(file_name);
    let lower_name = file_name.to_lowercase();
    let menu_name = is_probable_menu_name(&lower_name);
    let recipe_name = is_probable_recipe_name(&lower_name);

    let score = recipe_score(snippet);
    let prices = price_signals(snippet);
    let ext = format.as_str();

    let (kind, confidence) = if matches!(ext, "json" | "csv") {
        (FileKind::Recipe, weights.structured_confidence)
    } else if ext == "txt" && (score >= weights.txt_recipe_min_score || recipe_name) {
        (FileKind::Recipe, weights.txt_recipe_confidence)
    } else if ext == "txt" && (prices >= weights.txt_menu_min_price_signals || menu_name) {
        (FileKind::Menu, weights.txt_menu_confidence)
    } else if matches!(ext, "menu" | "menutxt") || menu_name {
        (FileKind::Menu, weights.menu_hint_confidence)
    } else if score >= weights.content_recipe_min_score && weights.is_recipe_extension(ext) {
        (FileKind::Recipe, weights.content_recipe_confidence)
    } else if prices >= weights.content_menu_min_price_signals {
        (FileKind::Menu, weights.content_menu_confidence)
    } else {
        (FileKind::Other, 0.0)
    };

    ClassificationResult {
        kind,
        format,
        confidence,
        snippet: snippet.to_string(),
    }
}
