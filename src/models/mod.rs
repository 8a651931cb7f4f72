use serde::{Deserialize, Serialize};

/// One uploaded billing document as the backend describes it.
///
/// Field names follow the backend's JSON contract, so the supplier, amount
/// and status keep their French keys on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    #[serde(rename = "fournisseur")]
    pub supplier: String,
    /// Display amount such as `"150 €"`. Not guaranteed to be numeric.
    #[serde(rename = "montant")]
    pub amount: String,
    #[serde(rename = "statut")]
    pub status: String,
    pub filename: String,
    pub file_size: u64,
    pub upload_date: String,
}

impl Invoice {
    pub fn status_kind(&self) -> StatusKind {
        StatusKind::classify(&self.status)
    }
}

/// Coarse reading of the open set of status labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Paid,
    Pending,
    Other,
}

impl StatusKind {
    pub fn classify(label: &str) -> Self {
        let label = label.trim();
        if label == "Payé" || label.eq_ignore_ascii_case("paid") {
            StatusKind::Paid
        } else if label == "En attente" || label.eq_ignore_ascii_case("pending") {
            StatusKind::Pending
        } else {
            StatusKind::Other
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceStats {
    pub total_paid: u64,
    pub total_amount: f64,
    pub total_invoices: u64,
    pub pending_invoices: u64,
}

impl InvoiceStats {
    /// The server reports a zeroed summary when it has nothing on record.
    pub fn is_empty(&self) -> bool {
        self.total_invoices == 0
    }

    /// `total_invoices >= total_paid + pending_invoices`. The client only
    /// reports a violation, it never repairs it.
    pub fn is_consistent(&self) -> bool {
        self.total_invoices >= self.total_paid + self.pending_invoices
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceUploadResponse {
    pub message: String,
    pub invoice: Invoice,
}

/// One segment of a validation error location: a field name or a list index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Field(String),
    Index(i64),
}

impl std::fmt::Display for LocSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocSegment::Field(name) => write!(f, "{}", name),
            LocSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = self
            .loc
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}: {}", path, self.msg)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpValidationError {
    #[serde(default)]
    pub detail: Vec<ValidationError>,
}

/// A file picked for upload. Only the bytes and the name are sent.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub filename: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_uses_backend_field_names() {
        let raw = r#"{
            "id": "42",
            "fournisseur": "EDF",
            "montant": "150 €",
            "statut": "Payé",
            "filename": "edf.pdf",
            "file_size": 245000,
            "upload_date": "2025-03-20 14:30:00"
        }"#;
        let invoice: Invoice = serde_json::from_str(raw).unwrap();
        assert_eq!(invoice.supplier, "EDF");
        assert_eq!(invoice.amount, "150 €");
        assert_eq!(invoice.status_kind(), StatusKind::Paid);

        let back = serde_json::to_value(&invoice).unwrap();
        assert_eq!(back["fournisseur"], "EDF");
        assert!(back.get("supplier").is_none());
    }

    #[test]
    fn status_labels_are_classified() {
        assert_eq!(StatusKind::classify("Payé"), StatusKind::Paid);
        assert_eq!(StatusKind::classify("paid"), StatusKind::Paid);
        assert_eq!(StatusKind::classify("En attente"), StatusKind::Pending);
        assert_eq!(StatusKind::classify("PENDING"), StatusKind::Pending);
        assert_eq!(StatusKind::classify("Annulé"), StatusKind::Other);
    }

    #[test]
    fn validation_error_location_mixes_fields_and_indices() {
        let raw = r#"{"detail": [{"loc": ["body", "file", 0], "msg": "field required", "type": "value_error.missing"}]}"#;
        let parsed: HttpValidationError = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.detail.len(), 1);
        let error = &parsed.detail[0];
        assert_eq!(error.loc[2], LocSegment::Index(0));
        assert_eq!(error.kind, "value_error.missing");
        assert_eq!(error.to_string(), "body.file.0: field required");
    }

    #[test]
    fn stats_consistency_check() {
        let stats = InvoiceStats {
            total_paid: 3,
            total_amount: 10.0,
            total_invoices: 4,
            pending_invoices: 2,
        };
        assert!(!stats.is_consistent());
        assert!(!stats.is_empty());
        assert!(InvoiceStats::default().is_empty());
    }
}
