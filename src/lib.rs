//! menu-import
//!
//! フォルダ内のレシピ・メニューファイルを分類し、
//! レシピはライブラリへ、メニューは下書きへ取り込む。

pub mod cli;
pub mod config;
pub mod drafts;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod recipes;
pub mod scanner;
pub mod storage;
