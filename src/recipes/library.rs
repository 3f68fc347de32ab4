//! レシピライブラリ
//!
//! ユーザーごとのJSONファイルに取り込んだレシピを追記していく。

use crate::error::Result;
use crate::storage::{file_safe_user, load_json_or_default, save_json};
use menu_import_common::Recipe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ライブラリの1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub recipe: Recipe,
    /// 取り込み経路（初回取り込みは "first-run-import"）
    pub source_tag: String,
    /// ISO 8601
    pub added_at: String,
}

#[derive(Debug, Clone)]
pub struct RecipeLibrary {
    path: PathBuf,
    entries: Vec<LibraryEntry>,
}

impl RecipeLibrary {
    pub fn file_path(data_dir: &Path, user_id: &str) -> PathBuf {
        data_dir.join(format!("recipe_library_{}.json", file_safe_user(user_id)))
    }

    /// ライブラリを読み込み（壊れていれば `.corrupt` に退避して空）
    pub fn load(data_dir: &Path, user_id: &str) -> Self {
        let path = Self::file_path(data_dir, user_id);
        let entries = load_json_or_default(&path);
        Self { path, entries }
    }

    pub fn save(&self) -> Result<()> {
        save_json(&self.path, &self.entries)
    }

    /// レシピを追加して保存
    pub fn add_to_library(&mut self, recipe: Recipe, source_tag: &str) -> Result<()> {
        self.add_all(vec![recipe], source_tag).map(|_| ())
    }

    /// 複数のレシピをまとめて追加して保存
    ///
    /// 保存に失敗したらメモリ上も追加前に戻す。
    pub fn add_all(&mut self, recipes: Vec<Recipe>, source_tag: &str) -> Result<usize> {
        let before = self.entries.len();
        let added_at = chrono::Utc::now().to_rfc3339();
        self.entries.extend(recipes.into_iter().map(|recipe| LibraryEntry {
            recipe,
            source_tag: source_tag.to_string(),
            added_at: added_at.clone(),
        }));

        if let Err(e) = self.save() {
            self.entries.truncate(before);
            return Err(e);
        }
        Ok(self.entries.len() - before)
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
