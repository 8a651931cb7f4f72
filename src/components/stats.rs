use crate::components::pad;
use crate::models::InvoiceStats;
use crate::utils::format_currency;

/// Short line such as `3 payées, 329.99 €`.
pub fn stats_summary_text(stats: Option<&InvoiceStats>, loading: bool) -> String {
    match stats {
        Some(stats) if !loading => format!(
            "{} payée{}, {}",
            stats.total_paid,
            if stats.total_paid > 1 { "s" } else { "" },
            format_currency(stats.total_amount)
        ),
        _ => "Chargement...".to_string(),
    }
}

/// Four cards; a missing summary renders as zeros.
pub fn render_stats_cards(stats: Option<&InvoiceStats>, loading: bool) -> String {
    let mut out = String::from("Statistiques\n");
    if loading {
        out.push_str("Chargement des statistiques...\n");
        return out;
    }

    let zero = InvoiceStats::default();
    let stats = stats.unwrap_or(&zero);
    let cards = [
        ("Factures payées", stats.total_paid.to_string()),
        ("Montant total", format_currency(stats.total_amount)),
        ("Factures en attente", stats.pending_invoices.to_string()),
        ("Total factures", stats.total_invoices.to_string()),
    ];
    let width = cards.iter().map(|(title, _)| title.chars().count()).max().unwrap_or(0);
    for (title, value) in cards {
        out.push_str(&format!("  {}  {}\n", pad(title, width), value));
    }
    out
}
