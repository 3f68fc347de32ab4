//! レシピ取り込み
//!
//! json / csv / txt のレシピファイルを読み、ライブラリへ追加する。

mod library;

pub use library::{LibraryEntry, RecipeLibrary};

use crate::error::{MenuImportError, Result};
use async_trait::async_trait;
use menu_import_common::{parse_recipe_csv, parse_recipe_json, parse_recipe_text, Recipe};
use std::path::Path;

/// 取り込み結果
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub success: bool,
    pub recipes: Vec<Recipe>,
}

/// レシピファイルを `Recipe` に変換する
#[async_trait]
pub trait RecipeImporter: Send + Sync {
    async fn import_recipes(&self, path: &Path) -> Result<ImportOutcome>;
}

/// ファイル内容を直接パースする取り込み
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRecipeImporter;

#[async_trait]
impl RecipeImporter for FileRecipeImporter {
    async fn import_recipes(&self, path: &Path) -> Result<ImportOutcome> {
        let bytes = tokio::fs::read(path).await?;
        let content = String::from_utf8_lossy(&bytes);
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let recipes = match ext.as_str() {
            "json" => parse_recipe_json(&content)?,
            "csv" => parse_recipe_csv(&content)?,
            "txt" => parse_recipe_text(&content)?,
            other => {
                return Err(MenuImportError::RecipeImport(format!(
                    "未対応の形式です: {}",
                    other
                )))
            }
        };

        Ok(ImportOutcome {
            success: !recipes.is_empty(),
            recipes,
        })
    }
}
