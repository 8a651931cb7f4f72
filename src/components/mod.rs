//! Terminal renderers. They read state and return text; none of them
//! mutates anything.

pub mod banner;
pub mod invoice_table;
pub mod landing;
pub mod stats;
pub mod upload;

pub use banner::render_banners;
pub use invoice_table::{render_invoice_table, TableOptions};
pub use landing::render_landing;
pub use stats::{render_stats_cards, stats_summary_text};
pub use upload::render_upload_widget;

/// Pads `text` with spaces up to `width` visible characters.
pub(crate) fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}
