use anyhow::Result;

use crate::config::AppConfig;
use crate::services::state::AppState;

pub fn render_settings(config: &AppConfig) -> String {
    let inbox = config
        .inbox
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "API URL      {}\nAPI prefix   {}\nTitle        {}\nBanner delay {}s\nMax files    {}\nInbox        {}\n",
        config.api_url, config.api_path, config.app_title, config.banner_secs, config.max_files, inbox
    )
}

/// Liveness probe. Returns true when the backend answers with a 2xx status.
pub async fn check_health(state: &AppState) -> Result<bool> {
    match state.service.client().check_health().await {
        Ok(health) => {
            println!("{} : {}", state.service.client().base_url(), health.status);
            Ok(true)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Health check failed");
            println!("{} : injoignable ({})", state.service.client().base_url(), err);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_list_every_value() {
        let text = render_settings(&AppConfig::default());
        assert!(text.contains("API URL      http://127.0.0.1:8000"));
        assert!(text.contains("Max files    5"));
        assert!(text.ends_with("Inbox        -\n"));
    }
}
