use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuImportError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("{0}")]
    Extraction(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("レシピ取り込みエラー: {0}")]
    RecipeImport(String),

    #[error("No menu items detected in this document")]
    NoMenuItems,

    #[error("取り込み処理が既に実行中です")]
    ImportInProgress,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] menu_import_common::Error),
}

pub type Result<T> = std::result::Result<T, MenuImportError>;
