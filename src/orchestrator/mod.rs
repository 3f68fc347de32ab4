//! 取り込みオーケストレーター
//!
//! ファイルを1件ずつ順番に処理する。
//!
//! ## 振り分け
//! 1. pdf / xls / xlsx → 抽出バックエンド
//! 2. txt → 分類して menu ならメニューパーサー、それ以外はレシピ取り込み
//! 3. json / csv → レシピ取り込み
//! 4. その他 → スキップ
//!
//! ファイル単位の失敗は `errors` に記録して次のファイルへ進む（リトライなし）。

mod report;
mod state;

pub use report::render_summary;
pub use state::{ImportError, ImportRunState, ProgressEvent};

use crate::drafts::DraftStore;
use crate::error::{MenuImportError, Result};
use crate::extractor::Extractor;
use crate::recipes::{RecipeImporter, RecipeLibrary};
use crate::scanner::{classify_file, ScannedFile};
use menu_import_common::{
    normalize_menu_items, parse_menu_text, ClassifierWeights, FileKind, Recipe,
};
use state::FileOutcome;
use std::ops::{Deref, DerefMut};

/// 何件ごとに進捗を通知して制御を返すか
const PROGRESS_EVERY: usize = 3;

/// ライブラリに追加するときのタグ
pub const SOURCE_TAG: &str = "first-run-import";

pub struct ImportOrchestrator<'a> {
    extractor: &'a dyn Extractor,
    importer: &'a dyn RecipeImporter,
    library: &'a mut RecipeLibrary,
    drafts: &'a DraftStore,
    weights: ClassifierWeights,
    state: ImportRunState,
}

impl<'a> ImportOrchestrator<'a> {
    pub fn new(
        extractor: &'a dyn Extractor,
        importer: &'a dyn RecipeImporter,
        library: &'a mut RecipeLibrary,
        drafts: &'a DraftStore,
    ) -> Self {
        Self {
            extractor,
            importer,
            library,
            drafts,
            weights: ClassifierWeights::default(),
            state: ImportRunState::default(),
        }
    }

    pub fn with_weights(mut self, weights: ClassifierWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn state(&self) -> &ImportRunState {
        &self.state
    }

    pub fn into_state(self) -> ImportRunState {
        self.state
    }

    /// ファイル群を取り込む
    ///
    /// 同じオーケストレーターで複数回呼ぶと件数は累積する。
    /// 実行中の `in_progress` は、途中で future が破棄されても戻る。
    pub async fn run<F>(&mut self, files: &[ScannedFile], mut on_progress: F) -> Result<&ImportRunState>
    where
        F: FnMut(&ProgressEvent),
    {
        if self.state.in_progress {
            return Err(MenuImportError::ImportInProgress);
        }
        self.state.in_progress = true;

        {
            let mut this = RunGuard(&mut *self);

            let supported: Vec<&ScannedFile> = files.iter().filter(|f| f.is_supported()).collect();
            this.state.scanned += files.len();
            this.state.supported += supported.len();
            let total = supported.len();

            tracing::info!(scanned = files.len(), supported = total, "取り込み開始");

            for (index, file) in supported.iter().enumerate() {
                let result = this.process_file(file).await;
                match result {
                    Ok(outcome) => outcome.apply_to(&mut this.state),
                    Err(e) => {
                        tracing::warn!(file = %file.file_name, error = %e, "取り込み失敗");
                        this.state.errors.push(ImportError {
                            file: file.file_name.clone(),
                            message: e.to_string(),
                        });
                    }
                }

                let processed = index + 1;
                if processed % PROGRESS_EVERY == 0 || processed == total {
                    on_progress(&ProgressEvent::new(processed, total, &this.state));
                    tokio::task::yield_now().await;
                }
            }

            this.state.update_completed();
        }

        tracing::info!(
            recipes = self.state.imported,
            menu_items = self.state.menu_items,
            errors = self.state.errors.len(),
            "取り込み完了"
        );

        Ok(&self.state)
    }

    async fn process_file(&mut self, file: &ScannedFile) -> Result<FileOutcome> {
        match file.extension.as_str() {
            "pdf" | "xls" | "xlsx" => {
                tracing::debug!(file = %file.file_name, "抽出バックエンドへ送信");
                self.process_with_backend(file).await
            }
            "txt" => {
                let classification = classify_file(&file.path, &self.weights);
                tracing::debug!(
                    file = %file.file_name,
                    kind = %classification.kind,
                    confidence = classification.confidence,
                    "分類"
                );
                if classification.kind == FileKind::Menu {
                    self.process_menu_text(file).await
                } else {
                    self.process_recipes(file).await
                }
            }
            "json" | "csv" => self.process_recipes(file).await,
            _ => Ok(FileOutcome::default()),
        }
    }

    async fn process_with_backend(&mut self, file: &ScannedFile) -> Result<FileOutcome> {
        let response = self.extractor.extract(&file.path).await?;
        let mut outcome = FileOutcome::default();

        let menu_items = normalize_menu_items(
            response
                .menu_items()
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, item)| item.into_line_item(&file.file_name, i)),
            &file.file_name,
        );

        // 下書きの保存に失敗したらライブラリには触れない
        if !menu_items.is_empty() {
            let mut metadata = serde_json::json!({ "parser": "backend" });
            if let (Some(target), serde_json::Value::Object(extra)) =
                (metadata.as_object_mut(), response.metadata)
            {
                target.extend(extra);
            }
            self.drafts
                .store_menu_draft(&file.file_name, &menu_items, metadata)?;
            outcome.menu_items = menu_items.len();
            outcome.menu_file = true;
            outcome.draft_saved = true;
        }

        outcome.recipes = self.add_recipes(response.recipes, &file.file_name)?;

        outcome.warnings = response
            .warnings
            .iter()
            .map(|w| format!("{}: {}", file.file_name, w))
            .collect();

        if outcome.recipes == 0 && outcome.menu_items == 0 {
            outcome
                .warnings
                .push(format!("{}: 抽出できるレシピ・メニューがありません", file.file_name));
        }

        Ok(outcome)
    }

    async fn process_menu_text(&mut self, file: &ScannedFile) -> Result<FileOutcome> {
        let bytes = tokio::fs::read(&file.path).await?;
        let text = String::from_utf8_lossy(&bytes);
        let parsed = parse_menu_text(&text, &file.file_name);

        if parsed.items.is_empty() {
            return Err(MenuImportError::NoMenuItems);
        }

        let metadata = serde_json::json!({
            "parser": "heuristic-text",
            "sections": parsed.section_count,
        });
        self.drafts
            .store_menu_draft(&file.file_name, &parsed.items, metadata)?;

        tracing::debug!(file = %file.file_name, items = parsed.items.len(), preview = %parsed.preview, "メニュー下書きを保存");

        Ok(FileOutcome {
            menu_items: parsed.items.len(),
            menu_file: true,
            draft_saved: true,
            ..Default::default()
        })
    }

    async fn process_recipes(&mut self, file: &ScannedFile) -> Result<FileOutcome> {
        let result = self.importer.import_recipes(&file.path).await?;
        let mut outcome = FileOutcome::default();

        if !result.success || result.recipes.is_empty() {
            outcome
                .warnings
                .push(format!("{}: レシピが見つかりません", file.file_name));
            return Ok(outcome);
        }

        outcome.recipes = self.add_recipes(result.recipes, &file.file_name)?;
        Ok(outcome)
    }

    /// ファイルのレシピをまとめてライブラリへ（全件保存できたときだけ反映）
    fn add_recipes(&mut self, recipes: Vec<Recipe>, file_name: &str) -> Result<usize> {
        if recipes.is_empty() {
            return Ok(0);
        }
        let recipes = recipes
            .into_iter()
            .map(|mut recipe| {
                if recipe.source.is_none() {
                    recipe.source = Some(file_name.to_string());
                }
                recipe
            })
            .collect();
        self.library.add_all(recipes, SOURCE_TAG)
    }
}

/// 実行中フラグを確実に下ろす
struct RunGuard<'r, 'a>(&'r mut ImportOrchestrator<'a>);

impl<'a> Deref for RunGuard<'_, 'a> {
    type Target = ImportOrchestrator<'a>;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl DerefMut for RunGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0
    }
}

impl Drop for RunGuard<'_, '_> {
    fn drop(&mut self) {
        self.0.state.in_progress = false;
    }
}
