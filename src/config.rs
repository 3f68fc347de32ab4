use crate::error::{MenuImportError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_EXTRACTOR_URL: &str = "http://localhost:8081/extract";
pub const DEFAULT_USER_ID: &str = "default";

const EXTRACTOR_URL_ENV: &str = "MENU_IMPORT_EXTRACTOR_URL";
const USER_ENV: &str = "MENU_IMPORT_USER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub extractor_url: String,
    pub timeout_seconds: u64,
    pub user_id: String,
    /// 下書き・ライブラリの保存先
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extractor_url: DEFAULT_EXTRACTOR_URL.into(),
            timeout_seconds: 60,
            user_id: DEFAULT_USER_ID.into(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MenuImportError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("menu-import").join("config.json"))
    }

    /// 環境変数を優先
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(EXTRACTOR_URL_ENV) {
            if !url.trim().is_empty() {
                self.extractor_url = url;
            }
        }
        if let Ok(user) = std::env::var(USER_ENV) {
            if !user.trim().is_empty() {
                self.user_id = user;
            }
        }
    }

    /// 下書き・ライブラリの保存先ディレクトリ
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("menu-import"))
            .ok_or_else(|| MenuImportError::Config("データディレクトリが見つかりません".into()))
    }

    pub fn set_extractor_url(&mut self, url: String) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(MenuImportError::Config(format!("URLが不正です: {}", url)));
        }
        self.extractor_url = url;
        self.save()
    }

    pub fn set_user(&mut self, user_id: String) -> Result<()> {
        if user_id.trim().is_empty() {
            return Err(MenuImportError::Config("ユーザーIDが空です".into()));
        }
        self.user_id = user_id;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extractor_url, "http://localhost:8081/extract");
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.user_id, "default");
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"userId": "chef"}"#).unwrap();
        assert_eq!(config.user_id, "chef");
        assert_eq!(config.extractor_url, DEFAULT_EXTRACTOR_URL);
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/menu-import-data")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/menu-import-data"));
    }
}
