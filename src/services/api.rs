use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::config::AppConfig;
use crate::errors::ApiError;
use crate::models::{
    HealthResponse, HttpValidationError, InvoiceListResponse, InvoiceStats, InvoiceUploadResponse,
    UploadFile,
};

/// Typed access to the invoice backend.
///
/// Every call is issued once; there is no retry and no idempotency key, so a
/// repeated upload creates a second record on the server.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_path: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let base_url = config.api_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url));
        }
        Ok(ApiClient {
            http: reqwest::Client::new(),
            base_url,
            api_path: config.api_path.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn route(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_path, path)
    }

    pub async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        let response = self.http.get(self.url("/_healthz")).send().await?;
        decode(response).await
    }

    pub async fn list_invoices(&self) -> Result<InvoiceListResponse, ApiError> {
        tracing::debug!("GET /invoices");
        let response = self.http.get(self.route("/invoices")).send().await?;
        decode(response).await
    }

    pub async fn get_invoice_stats(&self) -> Result<InvoiceStats, ApiError> {
        tracing::debug!("GET /invoices/stats");
        let response = self.http.get(self.route("/invoices/stats")).send().await?;
        decode(response).await
    }

    pub async fn upload_invoice(
        &self,
        file: UploadFile,
    ) -> Result<InvoiceUploadResponse, ApiError> {
        tracing::debug!(filename = %file.filename, size = file.size, "POST /invoices/upload");
        let part = Part::bytes(file.bytes)
            .file_name(file.filename.clone())
            .mime_str(mime_for(&file.filename))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.route("/invoices/upload"))
            .multipart(form)
            .send()
            .await?;

        if response.status().is_client_error() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(client_error(status, body));
        }
        decode(response).await
    }
}

/// Reads a file from disk into an upload payload.
pub async fn read_upload_file(path: &Path) -> Result<UploadFile, ApiError> {
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "invoice".to_string());
    Ok(UploadFile {
        filename,
        size: bytes.len() as u64,
        bytes,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status { status, body });
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn client_error(status: StatusCode, body: String) -> ApiError {
    match serde_json::from_str::<HttpValidationError>(&body) {
        Ok(parsed) if !parsed.detail.is_empty() => ApiError::Validation(parsed.detail),
        _ => ApiError::Status { status, body },
    }
}

fn mime_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
