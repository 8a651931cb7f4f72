use crate::services::dashboard::Dashboard;

/// Success first, then error. Both may be shown at once.
pub fn render_banners(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    if let Some(message) = dashboard.success_message() {
        out.push_str(&format!("[OK] {}\n", message));
    }
    if let Some(message) = dashboard.error_message() {
        out.push_str(&format!("[ERREUR] {}\n", message));
    }
    out
}
