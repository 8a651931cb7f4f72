use crate::components::pad;
use crate::models::{Invoice, StatusKind};
use crate::utils::{format_kb, format_upload_date};

pub const EMPTY_MESSAGE: &str = "Aucune facture trouvée. Téléchargez votre première facture.";

#[derive(Debug, Clone)]
pub struct TableOptions<'a> {
    pub loading: bool,
    pub empty_message: &'a str,
    /// Adds file name, size and upload date columns.
    pub details: bool,
}

impl Default for TableOptions<'_> {
    fn default() -> Self {
        TableOptions {
            loading: false,
            empty_message: EMPTY_MESSAGE,
            details: false,
        }
    }
}

fn status_badge(invoice: &Invoice) -> String {
    match invoice.status_kind() {
        StatusKind::Paid => format!("✔ {}", invoice.status),
        StatusKind::Pending | StatusKind::Other => format!("… {}", invoice.status),
    }
}

fn row(invoice: &Invoice, details: bool) -> Vec<String> {
    let mut cells = vec![
        invoice.supplier.clone(),
        invoice.amount.clone(),
        status_badge(invoice),
    ];
    if details {
        cells.push(invoice.filename.clone());
        cells.push(format_kb(invoice.file_size));
        cells.push(format_upload_date(&invoice.upload_date));
    }
    cells
}

pub fn render_invoice_table(invoices: &[Invoice], options: &TableOptions<'_>) -> String {
    let mut header = vec!["Fournisseur", "Montant", "Statut"];
    if options.details {
        header.extend(["Fichier", "Taille", "Date"]);
    }

    let title = if options.loading {
        "Factures récentes (Chargement...)"
    } else {
        "Factures récentes"
    };
    let mut out = format!("{}\n", title);

    if invoices.is_empty() {
        out.push_str(&header.join(" | "));
        out.push('\n');
        if options.loading {
            out.push_str("Chargement des factures...\n");
        } else {
            out.push_str(options.empty_message);
            out.push('\n');
        }
        return out;
    }

    let rows: Vec<Vec<String>> = invoices.iter().map(|i| row(i, options.details)).collect();
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(col, title)| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(title.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    out.push_str(&line(header.iter().map(|h| h.to_string()).collect()));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    out.push('\n');
    for cells in rows {
        out.push_str(&line(cells));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sample::sample_invoices;

    #[test]
    fn sample_rows_render_in_order() {
        let text = render_invoice_table(&sample_invoices(), &TableOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Factures récentes");
        assert!(lines[1].starts_with("Fournisseur"));

        let body = &lines[3..];
        assert_eq!(body.len(), 5);
        let suppliers: Vec<&str> = body
            .iter()
            .map(|l| l.split(" | ").next().unwrap().trim())
            .collect();
        assert_eq!(suppliers, vec!["EDF", "Adobe", "Orange", "SFR", "Spotify"]);
        assert!(body[0].contains("✔ Payé"));
        assert!(body[1].contains("… En attente"));
    }

    #[test]
    fn empty_and_loading_placeholders() {
        let text = render_invoice_table(&[], &TableOptions::default());
        assert!(text.ends_with(&format!("{}\n", EMPTY_MESSAGE)));

        let loading = TableOptions {
            loading: true,
            ..TableOptions::default()
        };
        let text = render_invoice_table(&[], &loading);
        assert!(text.starts_with("Factures récentes (Chargement...)"));
        assert!(text.contains("Chargement des factures..."));
    }

    #[test]
    fn details_add_file_columns() {
        let options = TableOptions {
            details: true,
            ..TableOptions::default()
        };
        let text = render_invoice_table(&sample_invoices()[..1], &options);
        assert!(text.contains("edf-facture.pdf"));
        assert!(text.contains("239.3 KB"));
        assert!(text.contains("20/03/2025 14:30"));
    }
}
