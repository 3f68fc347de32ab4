use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "menu-import")]
#[command(about = "レシピ・メニューファイル一括取り込みツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ファイルを recipe / menu / other に分類
    Classify {
        /// 対象ファイル
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// メニューのテキストファイルを解析
    Parse {
        /// メニューのテキストファイル
        #[arg(required = true)]
        file: PathBuf,

        /// 結果をJSONファイルに保存
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// フォルダ内のファイルを一括取り込み
    Import {
        /// 取り込むフォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// ユーザーID（省略時は設定値）
        #[arg(short, long)]
        user: Option<String>,

        /// サブフォルダも再帰的にスキャン（最大8階層）
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 抽出バックエンドのURL（省略時は設定値）
        #[arg(long)]
        extractor_url: Option<String>,

        /// 何も取り込めなくても再スキャンを確認しない
        #[arg(long)]
        no_prompt: bool,
    },

    /// 保存済みのメニュー下書きを表示/削除
    Drafts {
        /// ユーザーID（省略時は設定値）
        #[arg(short, long)]
        user: Option<String>,

        /// 下書きを削除
        #[arg(long)]
        clear: bool,
    },

    /// レシピライブラリを表示
    Library {
        /// ユーザーID（省略時は設定値）
        #[arg(short, long)]
        user: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 抽出バックエンドのURLを設定
        #[arg(long)]
        set_extractor_url: Option<String>,

        /// 既定のユーザーIDを設定
        #[arg(long)]
        set_user: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
