use serde::Serialize;

/// ファイル単位のエラー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportError {
    pub file: String,
    pub message: String,
}

/// 1回の取り込みセッションの状態
///
/// 永続化しない。残るのは下書きとライブラリだけ。
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRunState {
    pub scanned: usize,
    pub supported: usize,
    /// 取り込んだレシピ数
    pub imported: usize,
    pub menu_files: usize,
    pub menu_items: usize,
    pub drafts_saved: usize,
    pub errors: Vec<ImportError>,
    pub warnings: Vec<String>,
    pub completed: bool,
    pub in_progress: bool,
}

impl ImportRunState {
    pub fn update_completed(&mut self) {
        self.completed = self.imported + self.menu_items > 0;
    }
}

/// 1ファイル分の処理結果（成功時にまとめて状態へ反映）
#[derive(Debug, Clone, Default)]
pub(crate) struct FileOutcome {
    pub recipes: usize,
    pub menu_items: usize,
    pub menu_file: bool,
    pub draft_saved: bool,
    pub warnings: Vec<String>,
}

impl FileOutcome {
    pub fn apply_to(self, state: &mut ImportRunState) {
        state.imported += self.recipes;
        state.menu_items += self.menu_items;
        if self.menu_file {
            state.menu_files += 1;
        }
        if self.draft_saved {
            state.drafts_saved += 1;
        }
        state.warnings.extend(self.warnings);
    }
}

/// 進捗通知
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub processed: usize,
    pub total: usize,
    pub recipes: usize,
    pub menu_items: usize,
    pub status: String,
}

impl ProgressEvent {
    pub fn new(processed: usize, total: usize, state: &ImportRunState) -> Self {
        Self {
            processed,
            total,
            recipes: state.imported,
            menu_items: state.menu_items,
            status: format!(
                "{}/{} 件処理済み・レシピ {} 件・メニュー項目 {} 件",
                processed, total, state.imported, state.menu_items
            ),
        }
    }
}
