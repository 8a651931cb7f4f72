use chrono::{Local, NaiveDateTime};

/// Reads the leading number of a display amount such as `"150 €"` or
/// `"150€ TTC"`. A decimal comma is read as a dot.
///
/// Returns `None` when the text does not start with a number; callers skip
/// such amounts instead of counting them as zero.
pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned = value.replace('€', " ").replace(',', ".");
    let cleaned = cleaned.trim_start();

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in cleaned.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    cleaned[..end]
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

pub fn format_currency(amount: f64) -> String {
    format!("{:.2} €", amount)
}

pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Turns the backend's `YYYY-MM-DD HH:MM:SS` stamp into `DD/MM/YYYY HH:MM`.
/// Anything else is shown as received.
pub fn format_upload_date(raw: &str) -> String {
    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];
    for fmt in formats.iter() {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw.trim(), fmt) {
            return date.format("%d/%m/%Y %H:%M").to_string();
        }
    }
    raw.to_string()
}

pub fn now_clock() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
