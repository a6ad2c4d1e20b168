use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ApiResult;
use crate::models::{LeaveRecord, MonthYear, SummaryRecord, UploadReceipt, WarningRecord};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Remote leave API. Only transport failures are errors; bad payloads come back empty.
#[async_trait]
pub trait LeaveApi: Send + Sync {
    async fn fetch_history(&self) -> ApiResult<Vec<LeaveRecord>>;
    async fn fetch_summary(&self, period: MonthYear) -> ApiResult<Vec<SummaryRecord>>;
    async fn upload(&self, file: UploadFile) -> ApiResult<UploadReceipt>;
    async fn fetch_warnings(&self) -> ApiResult<Vec<WarningRecord>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub async fn read(path: &Path) -> ApiResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.xlsx".to_string());
        Ok(UploadFile { file_name, bytes })
    }
}

pub struct HttpLeaveApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLeaveApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        HttpLeaveApi {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_array<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!("{} answered {}", path, status);
        }
        Ok(decode_array(&body, path))
    }
}

#[async_trait]
impl LeaveApi for HttpLeaveApi {
    async fn fetch_history(&self) -> ApiResult<Vec<LeaveRecord>> {
        self.get_array("/api/history").await
    }

    async fn fetch_summary(&self, period: MonthYear) -> ApiResult<Vec<SummaryRecord>> {
        let response = self
            .client
            .get(self.url("/api/summary"))
            .query(&[("month", period.month.to_string()), ("year", period.year.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(
                "No summary for {:02}/{}: status {}",
                period.month,
                period.year,
                response.status()
            );
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        Ok(decode_array(&body, "/api/summary"))
    }

    async fn upload(&self, file: UploadFile) -> ApiResult<UploadReceipt> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(XLSX_MIME)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let message = response.text().await?;
        Ok(UploadReceipt { status, message })
    }

    async fn fetch_warnings(&self) -> ApiResult<Vec<WarningRecord>> {
        self.get_array("/api/warning").await
    }
}

/// Decodes a JSON array of `T`. Anything else (an object, `null`, invalid JSON) yields an
/// empty list. Rows that fail to decode are logged and skipped.
pub fn decode_array<T: DeserializeOwned>(body: &str, source: &str) -> Vec<T> {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(err) => {
            warn!("{}: invalid JSON: {}", source, err);
            return Vec::new();
        }
    };

    let rows = match value {
        Value::Array(rows) => rows,
        other => {
            warn!("{}: expected an array, got {}", source, kind_of(&other));
            return Vec::new();
        }
    };

    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<T>(row) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("{}: skipping row {}: {}", source, index, err);
                None
            }
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
