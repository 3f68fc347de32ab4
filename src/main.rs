use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use menu_import::drafts::DraftStore;
use menu_import::extractor::HttpExtractor;
use menu_import::orchestrator::{render_summary, ImportOrchestrator};
use menu_import::recipes::{FileRecipeImporter, RecipeLibrary};
use menu_import::{cli, config, error, scanner};
use menu_import_common::{parse_menu_text, ClassifierWeights};
use cli::{Cli, Commands};
use config::Config;
use error::{MenuImportError, Result};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Classify { files, json } => {
            let weights = ClassifierWeights::default();
            let mut results = Vec::new();

            for path in &files {
                let mut result = scanner::classify_file(path, &weights);
                if json {
                    result.snippet.clear();
                    results.push(serde_json::json!({ "file": path.display().to_string(), "result": result }));
                } else {
                    println!(
                        "{}  {} (format: {}, confidence: {:.2}, snippet: {} bytes)",
                        path.display(),
                        result.kind,
                        result.format,
                        result.confidence,
                        result.snippet.len()
                    );
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }

        Commands::Parse { file, output } => {
            if !file.is_file() {
                return Err(MenuImportError::FileNotFound(file.display().to_string()));
            }

            let bytes = std::fs::read(&file)?;
            let text = String::from_utf8_lossy(&bytes);
            let file_name = scanner::ScannedFile::from_path(&file).file_name;
            let parsed = parse_menu_text(&text, &file_name);

            if let Some(output) = output {
                std::fs::write(&output, serde_json::to_string_pretty(&parsed)?)?;
                println!("✔ 結果を保存: {}", output.display());
            } else {
                for item in &parsed.items {
                    let price = item
                        .price
                        .map(|p| format!("{:.2}", p))
                        .unwrap_or_else(|| "-".to_string());
                    println!("[{}] {}  {}", item.category, item.name, price);
                    if !item.description.is_empty() {
                        println!("    {}", item.description);
                    }
                }
            }

            println!(
                "\n{} 件 / {} セクション / プレビュー: {}",
                parsed.items.len(),
                parsed.section_count,
                parsed.preview
            );
        }

        Commands::Import { folder, user, recursive, extractor_url, no_prompt } => {
            println!("🍽  menu-import - 一括取り込み\n");

            let user_id = user.unwrap_or_else(|| config.user_id.clone());
            let url = extractor_url.unwrap_or_else(|| config.extractor_url.clone());
            let data_dir = config.data_dir()?;

            let extractor = HttpExtractor::new(url, Duration::from_secs(config.timeout_seconds))?;
            let importer = FileRecipeImporter;
            let mut library = RecipeLibrary::load(&data_dir, &user_id);
            let drafts = DraftStore::new(&data_dir, &user_id);
            let mut orchestrator = ImportOrchestrator::new(&extractor, &importer, &mut library, &drafts);

            let mut folder = folder;
            loop {
                println!("- スキャン中: {}", folder.display());
                let files = scanner::scan_folder(&folder, recursive)?;
                let supported = files.iter().filter(|f| f.is_supported()).count();
                println!("✔ {}件のファイルを検出（対応形式 {}件）\n", files.len(), supported);

                let bar = ProgressBar::new(supported as u64);
                bar.set_style(
                    ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                orchestrator
                    .run(&files, |event| {
                        bar.set_position(event.processed as u64);
                        bar.set_message(event.status.clone());
                    })
                    .await?;
                bar.finish_and_clear();

                println!("{}\n", render_summary(orchestrator.state()));

                if orchestrator.state().completed || no_prompt || !std::io::stdin().is_terminal() {
                    break;
                }

                match ask_rescan_folder() {
                    Some(next) => folder = next,
                    None => break,
                }
            }

            let state = orchestrator.into_state();
            if state.completed {
                println!("✅ 取り込み完了（下書き: {}）", drafts.path().display());
            } else {
                println!("取り込めるレシピ・メニューがありませんでした。後でもう一度お試しください。");
            }
        }

        Commands::Drafts { user, clear } => {
            let user_id = user.unwrap_or_else(|| config.user_id.clone());
            let store = DraftStore::new(&config.data_dir()?, &user_id);

            if clear {
                if store.clear()? {
                    println!("✔ 下書きを削除しました: {}", store.path().display());
                } else {
                    println!("下書きはありません");
                }
                return Ok(());
            }

            let entries = store.load();
            if entries.is_empty() {
                println!("下書きはありません");
            }
            for entry in entries {
                println!(
                    "{}  {}  {}件 / {}セクション  {}",
                    entry.imported_at, entry.source, entry.item_count, entry.sections, entry.preview
                );
            }
        }

        Commands::Library { user } => {
            let user_id = user.unwrap_or_else(|| config.user_id.clone());
            let library = RecipeLibrary::load(&config.data_dir()?, &user_id);

            println!("レシピライブラリ: {} 件", library.len());
            for entry in library.entries() {
                println!(
                    "  {}  ({}, 材料 {} / 手順 {})",
                    entry.recipe.name,
                    entry.recipe.source.as_deref().unwrap_or(&entry.source_tag),
                    entry.recipe.ingredients.len(),
                    entry.recipe.instructions.len()
                );
            }
        }

        Commands::Config { set_extractor_url, set_user, show } => {
            let mut config = config;

            if let Some(url) = set_extractor_url {
                config.set_extractor_url(url)?;
                println!("✔ 抽出バックエンドのURLを設定しました");
            }

            if let Some(user) = set_user {
                config.set_user(user)?;
                println!("✔ ユーザーIDを設定しました");
            }

            if show {
                println!("設定:");
                println!("  抽出URL: {}", config.extractor_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  ユーザーID: {}", config.user_id);
                match config.data_dir() {
                    Ok(dir) => println!("  データ: {}", dir.display()),
                    Err(e) => println!("  データ: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// 何も取り込めなかったときに別フォルダで再スキャンするか確認
fn ask_rescan_folder() -> Option<PathBuf> {
    let retry = dialoguer::Confirm::new()
        .with_prompt("レシピ・メニューが見つかりませんでした。別のフォルダをスキャンしますか？")
        .default(false)
        .interact()
        .ok()?;

    if !retry {
        return None;
    }

    let input: String = dialoguer::Input::new()
        .with_prompt("フォルダのパス")
        .interact_text()
        .ok()?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
