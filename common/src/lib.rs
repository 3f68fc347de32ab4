//! Menu Import Common Library
//!
//! ファイル分類・メニューテキスト解析などの純粋ロジック。
//! I/Oを持たないのでCLI以外からも再利用できる。

pub mod types;
pub mod error;
pub mod text;
pub mod classifier;
pub mod menu_parser;
pub mod recipe_parser;

pub use types::{
    ClassificationResult, FileKind, MenuDraftEntry, MenuLineItem, MenuParseResult, Recipe,
};
pub use error::{Error, Result};
pub use classifier::{classify, ClassifierWeights, SNIPPET_BYTE_CAP};
pub use text::{extension_of, title_case};
pub use menu_parser::{normalize_menu_items, parse_menu_text, DEFAULT_SECTION};
pub use recipe_parser::{parse_recipe_csv, parse_recipe_json, parse_recipe_text};
