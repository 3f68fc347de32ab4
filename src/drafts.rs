//! メニュー下書きストア
//!
//! 解析したメニュー項目をユーザーごとのJSONファイルに追記する。
//! 追記は読み込み→追加→全体書き込みで行い、排他制御はしない。

use crate::error::Result;
use crate::storage::{file_safe_user, load_json_or_default, save_json};
use menu_import_common::{MenuDraftEntry, MenuLineItem};
use std::path::{Path, PathBuf};

/// 1件の下書きに保存する最大項目数
pub const MAX_DRAFT_ITEMS: usize = 100;

/// プレビューに含める項目数
const PREVIEW_ITEMS: usize = 3;

#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    pub fn new(data_dir: &Path, user_id: &str) -> Self {
        Self {
            path: data_dir.join(Self::key(user_id)),
        }
    }

    /// ユーザーごとの保存キー（パス区切りなどは `_` に置換）
    pub fn key(user_id: &str) -> String {
        format!("first_run_menu_drafts_{}.json", file_safe_user(user_id))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 保存済みの下書きを読む
    ///
    /// 存在しなければ空。壊れていれば `.corrupt` に退避して空から始める。
    pub fn load(&self) -> Vec<MenuDraftEntry> {
        load_json_or_default(&self.path)
    }

    fn save(&self, entries: &[MenuDraftEntry]) -> Result<()> {
        save_json(&self.path, entries)
    }

    /// 下書きを1件追記する
    pub fn append(&self, entry: MenuDraftEntry) -> Result<()> {
        let mut entries = self.load();
        entries.push(entry);
        self.save(&entries)
    }

    /// 解析済みのメニュー項目から下書きを作って保存
    ///
    /// 保存する項目は先頭 `MAX_DRAFT_ITEMS` 件まで。`item_count` は全件数。
    pub fn store_menu_draft(
        &self,
        source: &str,
        items: &[MenuLineItem],
        metadata: serde_json::Value,
    ) -> Result<MenuDraftEntry> {
        let entry = build_draft_entry(source, items, metadata);
        self.append(entry.clone())?;
        Ok(entry)
    }

    /// 全ての下書きを削除。削除したら true
    pub fn clear(&self) -> Result<bool> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// 下書きエントリを組み立てる
pub fn build_draft_entry(
    source: &str,
    items: &[MenuLineItem],
    metadata: serde_json::Value,
) -> MenuDraftEntry {
    let sections = items
        .iter()
        .map(|item| item.category.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();

    let preview = items
        .iter()
        .take(PREVIEW_ITEMS)
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    MenuDraftEntry {
        source: source.to_string(),
        imported_at: chrono::Utc::now().to_rfc3339(),
        item_count: items.len(),
        sections,
        preview,
        metadata,
        items: items.iter().take(MAX_DRAFT_ITEMS).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn item(i: usize, category: &str) -> MenuLineItem {
        MenuLineItem {
            id: format!("menu_import_m.txt_{}", i),
            name: format!("Dish {}", i),
            price: Some(10.0),
            description: String::new(),
            category: category.to_string(),
            source: "m.txt".to_string(),
        }
    }

    #[test]
    fn test_key_is_namespaced_by_user() {
        assert_eq!(DraftStore::key("42"), "first_run_menu_drafts_42.json");
    }

    #[test]
    fn test_user_id_cannot_leave_data_dir() {
        let dir = tempdir().unwrap();
        let store = DraftStore::new(dir.path(), "../outside");
        assert_eq!(store.path().parent(), Some(dir.path()));
        assert_eq!(DraftStore::key("../outside"), "first_run_menu_drafts_.._outside.json");
    }

    #[test]
    fn test_build_entry_counts() {
        let items = vec![item(0, "Mains"), item(1, "Mains"), item(2, "Desserts"), item(3, "Desserts")];
        let entry = build_draft_entry("m.txt", &items, serde_json::Value::Null);
        assert_eq!(entry.item_count, 4);
        assert_eq!(entry.sections, 2);
        assert_eq!(entry.preview, "Dish 0, Dish 1, Dish 2");
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.imported_at).is_ok());
    }

    #[test]
    fn test_clear_missing_file() {
        let dir = tempdir().unwrap();
        let store = DraftStore::new(dir.path(), "u");
        assert!(!store.clear().unwrap());
    }
}
