use menu_import_common::text::parse_price;
use menu_import_common::{MenuLineItem, Recipe, DEFAULT_SECTION};
use serde::{Deserialize, Serialize};

/// 抽出バックエンドのレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionResponse {
    pub recipes: Vec<Recipe>,

    /// `menu_items` と `menuItems` のどちらでも返ってくる
    #[serde(rename = "menu_items")]
    pub menu_items_snake: Vec<ExtractedMenuItem>,

    #[serde(rename = "menuItems")]
    pub menu_items_camel: Vec<ExtractedMenuItem>,

    pub warnings: Vec<String>,

    pub metadata: serde_json::Value,
}

impl ExtractionResponse {
    /// `menu_items` を優先し、空なら `menuItems` を使う
    pub fn menu_items(&self) -> &[ExtractedMenuItem] {
        if self.menu_items_snake.is_empty() {
            &self.menu_items_camel
        } else {
            &self.menu_items_snake
        }
    }
}

/// バックエンドが返すメニュー項目
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedMenuItem {
    #[serde(alias = "title")]
    pub name: String,
    /// 数値または "$12.50" のような文字列
    pub price: Option<serde_json::Value>,
    pub description: String,
    #[serde(alias = "section")]
    pub category: String,
}

impl ExtractedMenuItem {
    pub fn price_value(&self) -> Option<f64> {
        match self.price.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => parse_price(s),
            _ => None,
        }
    }

    /// 下書き用の `MenuLineItem` に変換
    ///
    /// 名前の整形と同名項目の統合は `normalize_menu_items` で行う。
    pub fn into_line_item(self, source: &str, index: usize) -> MenuLineItem {
        let price = self.price_value();
        let category = if self.category.trim().is_empty() {
            DEFAULT_SECTION.to_string()
        } else {
            self.category
        };
        MenuLineItem {
            id: format!("menu_import_{}_{}", source, index),
            name: self.name.trim().to_string(),
            price,
            description: self.description,
            category,
            source: source.to_string(),
        }
    }
}
