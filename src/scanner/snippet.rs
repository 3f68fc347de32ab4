use menu_import_common::{classify, ClassificationResult, ClassifierWeights, SNIPPET_BYTE_CAP};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 先頭 `SNIPPET_BYTE_CAP` バイトをテキストとして読む
///
/// 読めない場合は空文字（分類はファイル名と拡張子だけで続行）。
pub fn read_snippet(path: &Path) -> String {
    let read = || -> std::io::Result<Vec<u8>> {
        let file = File::open(path)?;
        let mut buffer = Vec::with_capacity(SNIPPET_BYTE_CAP);
        file.take(SNIPPET_BYTE_CAP as u64).read_to_end(&mut buffer)?;
        Ok(buffer)
    };

    match read() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "スニペットを読めません");
            String::new()
        }
    }
}

/// ファイルを読んで分類する
pub fn classify_file(path: &Path, weights: &ClassifierWeights) -> ClassificationResult {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let snippet = read_snippet(path);
    classify(&file_name, &snippet, weights)
}
