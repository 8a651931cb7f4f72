//! Fixed invoice set shown while the backend has nothing to offer.

use crate::models::{Invoice, InvoiceStats, StatusKind};
use crate::utils::parse_amount;

const SAMPLE_ROWS: [(&str, &str, &str, &str, &str, u64, &str); 5] = [
    ("1", "EDF", "150 €", "Payé", "edf-facture.pdf", 245000, "2025-03-20 14:30:00"),
    ("2", "Adobe", "50 €", "En attente", "adobe-subscription.pdf", 125000, "2025-03-21 09:15:00"),
    ("3", "Orange", "75 €", "En attente", "orange-internet.pdf", 198000, "2025-03-22 11:45:00"),
    ("4", "SFR", "45 €", "Payé", "sfr-mobile.pdf", 167000, "2025-03-18 16:20:00"),
    ("5", "Spotify", "9.99 €", "Payé", "spotify-premium.pdf", 89000, "2025-03-15 10:05:00"),
];

pub fn sample_invoices() -> Vec<Invoice> {
    SAMPLE_ROWS
        .iter()
        .map(|(id, supplier, amount, status, filename, file_size, upload_date)| Invoice {
            id: id.to_string(),
            supplier: supplier.to_string(),
            amount: amount.to_string(),
            status: status.to_string(),
            filename: filename.to_string(),
            file_size: *file_size,
            upload_date: upload_date.to_string(),
        })
        .collect()
}

/// Local approximation of the server summary. Amounts that do not parse are
/// left out of the total.
pub fn compute_stats(invoices: &[Invoice]) -> InvoiceStats {
    let mut stats = InvoiceStats {
        total_invoices: invoices.len() as u64,
        ..InvoiceStats::default()
    };
    for invoice in invoices {
        match invoice.status_kind() {
            StatusKind::Paid => stats.total_paid += 1,
            StatusKind::Pending => stats.pending_invoices += 1,
            StatusKind::Other => {}
        }
        if let Some(amount) = parse_amount(&invoice.amount) {
            stats.total_amount += amount;
        }
    }
    stats
}

pub fn sample_stats() -> InvoiceStats {
    compute_stats(&sample_invoices())
}
