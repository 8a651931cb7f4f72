use std::future::Future;

use crate::models::{Invoice, InvoiceStats, UploadFile};
use crate::services::api::ApiClient;

/// Outcome of a service call. Keeps "the server has nothing" apart from
/// "the request failed".
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ok(T),
    Empty,
    Failed(String),
}

impl<T> Fetched<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Fetched::Failed(_))
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Fetched::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Collapses to the neutral value callers used before the split.
    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Ok(value) => Some(value),
            Fetched::Empty | Fetched::Failed(_) => None,
        }
    }
}

/// What the dashboard and the upload widget need from the backend.
pub trait InvoiceSource: Send + Sync {
    fn list_invoices(&self) -> impl Future<Output = Fetched<Vec<Invoice>>> + Send;
    fn invoice_stats(&self) -> impl Future<Output = Fetched<InvoiceStats>> + Send;
    fn upload_invoice(&self, file: UploadFile) -> impl Future<Output = Fetched<Invoice>> + Send;
}

/// Failure boundary around [`ApiClient`]: every error is logged and turned
/// into `Fetched::Failed`.
#[derive(Clone)]
pub struct InvoiceService {
    client: ApiClient,
}

impl InvoiceService {
    pub fn new(client: ApiClient) -> Self {
        InvoiceService { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl InvoiceSource for InvoiceService {
    async fn list_invoices(&self) -> Fetched<Vec<Invoice>> {
        match self.client.list_invoices().await {
            Ok(body) if body.invoices.is_empty() => Fetched::Empty,
            Ok(body) => Fetched::Ok(body.invoices),
            Err(err) => {
                tracing::error!(error = %err, "Error fetching invoices");
                Fetched::Failed(err.to_string())
            }
        }
    }

    async fn invoice_stats(&self) -> Fetched<InvoiceStats> {
        match self.client.get_invoice_stats().await {
            Ok(stats) if stats.is_empty() => Fetched::Empty,
            Ok(stats) => {
                if !stats.is_consistent() {
                    tracing::warn!(?stats, "Backend stats do not add up");
                }
                Fetched::Ok(stats)
            }
            Err(err) => {
                tracing::error!(error = %err, "Error fetching invoice stats");
                Fetched::Failed(err.to_string())
            }
        }
    }

    async fn upload_invoice(&self, file: UploadFile) -> Fetched<Invoice> {
        let filename = file.filename.clone();
        match self.client.upload_invoice(file).await {
            Ok(body) => {
                tracing::info!(
                    filename = %filename,
                    id = %body.invoice.id,
                    message = %body.message,
                    "Invoice uploaded"
                );
                Fetched::Ok(body.invoice)
            }
            Err(err) => {
                tracing::error!(filename = %filename, error = %err, "Error uploading invoice");
                Fetched::Failed(err.to_string())
            }
        }
    }
}
