mod snippet;

pub use snippet::{classify_file, read_snippet};

use crate::error::{MenuImportError, Result};
use menu_import_common::extension_of;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 再帰スキャン時の最大深さ
pub const MAX_SCAN_DEPTH: usize = 8;

/// 取り込み対象の拡張子
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "xls", "xlsx", "txt", "json", "csv"];

#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub file_name: String,
    /// 小文字、ドットなし
    pub extension: String,
}

impl ScannedFile {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = extension_of(&file_name);
        Self {
            path: path.to_path_buf(),
            file_name,
            extension,
        }
    }

    pub fn is_supported(&self) -> bool {
        is_supported_extension(&self.extension)
    }
}

pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&ext)
}

/// フォルダ内のファイルを列挙
///
/// 非対応の拡張子も含めて返す（件数表示のため）。隠しファイルは除外。
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ScannedFile>> {
    if !folder.is_dir() {
        return Err(MenuImportError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { MAX_SCAN_DEPTH } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            files.push(ScannedFile::from_path(entry.path()));
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(files)
}
