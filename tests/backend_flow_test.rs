//! Drives the real HTTP client against a stub backend bound to a random port.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use payrush::config::AppConfig;
use payrush::errors::ApiError;
use payrush::models::UploadFile;
use payrush::services::api::ApiClient;
use payrush::services::dashboard::{Dashboard, LOAD_ERROR};
use payrush::services::invoice_service::{Fetched, InvoiceService, InvoiceSource};
use payrush::services::upload::{UploadEvent, UploadWidget, UPLOAD_REJECTED};

#[derive(Clone, Default)]
struct Backend {
    invoices: Arc<Mutex<Vec<Value>>>,
    reject_uploads: bool,
}

async fn list_invoices(State(backend): State<Backend>) -> Json<Value> {
    let invoices = backend.invoices.lock().unwrap().clone();
    Json(json!({ "invoices": invoices }))
}

async fn invoice_stats(State(backend): State<Backend>) -> Json<Value> {
    let invoices = backend.invoices.lock().unwrap();
    let paid = invoices.iter().filter(|i| i["statut"] == "Payé").count();
    let pending = invoices.iter().filter(|i| i["statut"] == "En attente").count();
    Json(json!({
        "total_paid": paid,
        "total_amount": 42.5 * invoices.len() as f64,
        "total_invoices": invoices.len(),
        "pending_invoices": pending,
    }))
}

async fn upload_invoice(State(backend): State<Backend>, mut multipart: Multipart) -> Response {
    if backend.reject_uploads {
        let body = json!({
            "detail": [{ "loc": ["body", "file"], "msg": "field required", "type": "value_error.missing" }]
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }

    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let data = field.bytes().await.unwrap();

        let mut invoices = backend.invoices.lock().unwrap();
        let invoice = json!({
            "id": format!("srv-{}", invoices.len() + 1),
            "fournisseur": "Free",
            "montant": "42.50 €",
            "statut": "En attente",
            "filename": filename,
            "file_size": data.len(),
            "upload_date": "2025-04-02 08:00:00",
        });
        invoices.push(invoice.clone());
        return Json(json!({ "message": "Invoice uploaded", "invoice": invoice })).into_response();
    }
    (StatusCode::BAD_REQUEST, "missing file").into_response()
}

async fn start_server(backend: Backend) -> String {
    let app = Router::new()
        .route("/_healthz", get(|| async { Json(json!({ "status": "healthy" })) }))
        .route("/routes/invoices", get(list_invoices))
        .route("/routes/invoices/stats", get(invoice_stats))
        .route("/routes/invoices/upload", post(upload_invoice))
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> ApiClient {
    let config = AppConfig {
        api_url: base_url.to_string(),
        ..AppConfig::default()
    };
    ApiClient::new(&config).unwrap()
}

fn seeded_invoice(id: &str, supplier: &str, status: &str) -> Value {
    json!({
        "id": id,
        "fournisseur": supplier,
        "montant": "42.50 €",
        "statut": status,
        "filename": format!("{}.pdf", id),
        "file_size": 1024,
        "upload_date": "2025-04-01 09:00:00",
    })
}

#[tokio::test]
async fn health_check_reports_status() {
    let base = start_server(Backend::default()).await;
    let health = client_for(&base).check_health().await.unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn empty_backend_maps_to_empty_results() {
    let base = start_server(Backend::default()).await;
    let service = InvoiceService::new(client_for(&base));

    assert_eq!(service.list_invoices().await, Fetched::Empty);
    assert_eq!(service.invoice_stats().await, Fetched::Empty);
}

#[tokio::test]
async fn seeded_backend_lists_in_server_order() {
    let backend = Backend::default();
    backend.invoices.lock().unwrap().extend([
        seeded_invoice("a", "Engie", "Payé"),
        seeded_invoice("b", "Bouygues", "En attente"),
    ]);
    let base = start_server(backend).await;
    let service = InvoiceService::new(client_for(&base));

    let Fetched::Ok(invoices) = service.list_invoices().await else {
        panic!("expected invoices");
    };
    let suppliers: Vec<&str> = invoices.iter().map(|i| i.supplier.as_str()).collect();
    assert_eq!(suppliers, vec!["Engie", "Bouygues"]);

    let Fetched::Ok(stats) = service.invoice_stats().await else {
        panic!("expected stats");
    };
    assert_eq!(stats.total_invoices, 2);
    assert_eq!(stats.total_paid, 1);
    assert_eq!(stats.pending_invoices, 1);
}

#[tokio::test]
async fn multipart_upload_creates_one_record_per_call() {
    let backend = Backend::default();
    let base = start_server(backend.clone()).await;
    let client = client_for(&base);
    let file = UploadFile {
        filename: "free-box.pdf".to_string(),
        size: 11,
        bytes: b"%PDF-1.4 xx".to_vec(),
    };

    let first = client.upload_invoice(file.clone()).await.unwrap();
    assert_eq!(first.message, "Invoice uploaded");
    assert_eq!(first.invoice.filename, "free-box.pdf");
    assert_eq!(first.invoice.file_size, 11);

    // No idempotency key: sending the same file again makes a duplicate.
    let second = client.upload_invoice(file).await.unwrap();
    assert_ne!(first.invoice.id, second.invoice.id);
    assert_eq!(backend.invoices.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn validation_rejection_is_typed() {
    let backend = Backend {
        reject_uploads: true,
        ..Backend::default()
    };
    let base = start_server(backend).await;
    let client = client_for(&base);
    let file = UploadFile {
        filename: "x.pdf".to_string(),
        size: 1,
        bytes: vec![0],
    };

    let err = client.upload_invoice(file.clone()).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(err.validation_details()[0].msg, "field required");

    let service = InvoiceService::new(client);
    assert!(service.upload_invoice(file).await.is_failed());
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_sample_data() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = InvoiceService::new(client_for(&format!("http://{}", addr)));
    assert!(service.list_invoices().await.is_failed());

    let mut dashboard = Dashboard::new(Duration::from_secs(5));
    dashboard.load(&service).await;
    assert_eq!(dashboard.error_message(), Some(LOAD_ERROR));
    assert_eq!(dashboard.invoices().len(), 5);
    assert_eq!(dashboard.invoices()[0].supplier, "EDF");
}

#[tokio::test]
async fn uploaded_invoice_becomes_the_first_row() {
    let backend = Backend::default();
    backend
        .invoices
        .lock()
        .unwrap()
        .push(seeded_invoice("a", "Engie", "Payé"));
    let base = start_server(backend).await;
    let service = InvoiceService::new(client_for(&base));

    let mut dashboard = Dashboard::new(Duration::from_secs(5));
    dashboard.load(&service).await;
    assert_eq!(dashboard.invoices()[0].supplier, "Engie");
    assert_eq!(dashboard.stats().unwrap().total_invoices, 1);

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("free-box.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 content").unwrap();
    let ignored = dir.path().join("second.pdf");
    std::fs::write(&ignored, b"%PDF-1.4 other").unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut widget = UploadWidget::new(5, tx);
    widget.drop_files(&service, vec![pdf, ignored]).await;

    while let Ok(event) = rx.try_recv() {
        match event {
            UploadEvent::FilesSelected(files) => {
                assert_eq!(files.len(), 2);
                dashboard.on_upload_start();
            }
            UploadEvent::Succeeded(invoice) => {
                let refresh = dashboard.on_upload_success(invoice);
                let stats = service.invoice_stats().await;
                assert!(dashboard.apply_stats_refresh(refresh, stats));
            }
            UploadEvent::Failed(message) => panic!("upload failed: {:?}", message),
            UploadEvent::Ended => dashboard.on_upload_end(),
        }
    }

    let filenames: Vec<&str> = dashboard.invoices().iter().map(|i| i.filename.as_str()).collect();
    assert_eq!(filenames, vec!["free-box.pdf", "a.pdf"]);
    assert_eq!(dashboard.stats().unwrap().total_invoices, 2);
    assert!(!dashboard.is_uploading());
    assert_eq!(
        dashboard.success_message(),
        Some("Facture téléchargée avec succès : free-box.pdf")
    );
}

#[tokio::test]
async fn rejected_upload_surfaces_localized_error() {
    let backend = Backend {
        reject_uploads: true,
        ..Backend::default()
    };
    let base = start_server(backend).await;
    let service = InvoiceService::new(client_for(&base));

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("broken.pdf");
    std::fs::write(&pdf, b"%PDF").unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut widget = UploadWidget::new(5, tx);
    widget.drop_files(&service, vec![pdf]).await;

    let mut dashboard = Dashboard::new(Duration::from_secs(5));
    while let Ok(event) = rx.try_recv() {
        if let UploadEvent::Failed(message) = event {
            dashboard.on_upload_error(message);
        }
    }
    assert_eq!(dashboard.error_message(), Some(UPLOAD_REJECTED));
    assert!(widget.progress_value() < 100);
}
