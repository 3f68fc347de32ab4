//! ユーザーごとのJSONファイル
//!
//! 下書きとレシピライブラリが共通で使う読み書き。

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// 壊れたファイルを退避するときに付ける拡張子
const CORRUPT_SUFFIX: &str = "corrupt";

/// ファイル名に埋め込めるユーザーID
///
/// 英数字と `-` `_` `.` `@` 以外は `_` に置き換える。
/// パス区切りを含むIDでも保存先ディレクトリの外には出ない。
pub fn file_safe_user(user_id: &str) -> String {
    user_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// 壊れたファイルの退避先（`<name>.corrupt`）
pub fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(CORRUPT_SUFFIX);
    path.with_file_name(name)
}

/// JSONファイルを読む
///
/// ファイルがなければ既定値。中身が壊れていれば `<name>.corrupt` に退避して
/// 既定値を返すので、次の保存で元の内容が消えることはない。
pub fn load_json_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return T::default(),
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => value,
        Err(e) if e.is_io() => {
            tracing::warn!(path = %path.display(), error = %e, "ファイルを読めません");
            T::default()
        }
        Err(e) => {
            let backup = corrupt_path(path);
            match std::fs::rename(path, &backup) {
                Ok(()) => tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "壊れたファイルを退避しました"
                ),
                Err(rename_err) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    rename_error = %rename_err,
                    "壊れたファイルを退避できません"
                ),
            }
            T::default()
        }
    }
}

/// JSONファイルに書き込む（親ディレクトリがなければ作る）
pub fn save_json<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}
