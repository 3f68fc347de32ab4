use super::state::ImportRunState;

/// 表示するエラー・警告の最大件数（新しいものから）
const MAX_LISTED: usize = 5;

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// 取り込み結果のサマリー文字列
pub fn render_summary(state: &ImportRunState) -> String {
    let mut lines = vec![
        format!("スキャン: {} 件（対応形式 {} 件）", state.scanned, state.supported),
        format!("レシピ取り込み: {} 件", state.imported),
        format!(
            "メニュー項目: {} 件（{} ファイル、下書き {} 件）",
            state.menu_items, state.menu_files, state.drafts_saved
        ),
    ];

    if !state.errors.is_empty() {
        lines.push(format!("エラー ({} 件):", state.errors.len()));
        for error in last_n(&state.errors, MAX_LISTED) {
            lines.push(format!("  - {}: {}", error.file, error.message));
        }
    }

    if !state.warnings.is_empty() {
        lines.push(format!("警告 ({} 件):", state.warnings.len()));
        for warning in last_n(&state.warnings, MAX_LISTED) {
            lines.push(format!("  - {}", warning));
        }
    }

    lines.join("\n")
}
