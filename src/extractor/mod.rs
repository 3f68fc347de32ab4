//! 抽出バックエンド連携モジュール
//!
//! PDF / Excel はローカルで読まず、HTTPの抽出エンドポイントへ
//! multipart（フィールド名 `file`）で送って構造化データを受け取る。
//! リトライはしない。接続失敗・タイムアウトはファイル単位のエラーとして扱う。

mod types;

pub use types::{ExtractedMenuItem, ExtractionResponse};

use crate::error::{MenuImportError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;

/// ファイルから構造化データを取り出す
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<ExtractionResponse>;
}

/// HTTPの抽出エンドポイントを呼ぶクライアント
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: reqwest::Client,
    url: String,
}

impl HttpExtractor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractionResponse> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let bytes = tokio::fs::read(path).await?;

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for(&file_name))?;
        let form = Form::new().part("file", part);

        tracing::debug!(url = %self.url, file = %file_name, "抽出リクエスト送信");

        let response = self.client.post(&self.url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MenuImportError::Extraction(error_message(status, &body)));
        }

        Ok(response.json::<ExtractionResponse>().await?)
    }
}

fn mime_for(file_name: &str) -> &'static str {
    match menu_import_common::extension_of(file_name).as_str() {
        "pdf" => "application/pdf",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// エラーレスポンスからメッセージを取り出す
///
/// JSONの `detail` があればそれを、なければHTTPステータスの説明文を使う。
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        });

    detail.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or(status.as_str())
            .to_string()
    })
}
