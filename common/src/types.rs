//! 取り込み結果の型定義
//!
//! CLIとライブラリで共有される型:
//! - ClassificationResult: ファイル分類の出力
//! - MenuLineItem / MenuParseResult: メニューテキスト解析の出力
//! - MenuDraftEntry: ユーザーごとに保存される下書き
//! - Recipe: レシピ取り込みの出力

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ファイル種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Recipe,
    Menu,
    #[default]
    Other,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Recipe => write!(f, "recipe"),
            FileKind::Menu => write!(f, "menu"),
            FileKind::Other => write!(f, "other"),
        }
    }
}

/// ファイル分類結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// 拡張子（小文字、ドットなし）
    pub format: String,
    /// ヒューリスティックの強さ（確率ではない）
    pub confidence: f64,
    /// 判定に使った先頭テキスト
    #[serde(default)]
    pub snippet: String,
}

/// メニューの1行項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuLineItem {
    pub id: String,
    pub name: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub source: String,
}

/// メニューテキスト解析結果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuParseResult {
    pub items: Vec<MenuLineItem>,
    pub section_count: usize,
    pub preview: String,
}

/// メニュー下書き（ユーザーごとに永続化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDraftEntry {
    pub source: String,
    /// ISO 8601
    pub imported_at: String,
    pub item_count: usize,
    pub sections: usize,
    pub preview: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub items: Vec<MenuLineItem>,
}

/// レシピ
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    #[serde(alias = "title")]
    pub name: String,
    pub ingredients: Vec<String>,
    #[serde(alias = "directions", alias = "method")]
    pub instructions: Vec<String>,
    pub servings: Option<String>,
    #[serde(rename = "yield")]
    pub yield_amount: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub source: Option<String>,
    /// 未知のフィールドはそのまま保持
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_serializes_type_key() {
        let result = ClassificationResult {
            kind: FileKind::Menu,
            format: "txt".to_string(),
            confidence: 0.6,
            snippet: String::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "menu");
        assert_eq!(json["format"], "txt");
    }

    #[test]
    fn test_draft_entry_camel_case() {
        let entry = MenuDraftEntry {
            source: "dinner.txt".to_string(),
            imported_at: "2026-01-01T00:00:00Z".to_string(),
            item_count: 2,
            sections: 1,
            preview: "A, B".to_string(),
            metadata: serde_json::Value::Null,
            items: vec![],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["importedAt"], "2026-01-01T00:00:00Z");
        assert_eq!(json["itemCount"], 2);
    }

    #[test]
    fn test_recipe_title_alias_and_extra_fields() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"title": "Pancakes", "ingredients": ["flour"], "rating": 5}"#,
        )
        .unwrap();
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.ingredients, vec!["flour".to_string()]);
        assert!(recipe.instructions.is_empty());
        assert_eq!(recipe.extra.get("rating"), Some(&serde_json::json!(5)));
    }
}
