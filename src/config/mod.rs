use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_path: String,
    pub app_title: String,
    pub banner_secs: u64,
    pub max_files: usize,
    pub inbox: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            api_path: "/routes".to_string(),
            app_title: "PayRush".to_string(),
            banner_secs: 5,
            max_files: 5,
            inbox: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_url: lookup("PAYRUSH_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            api_path: lookup("PAYRUSH_API_PATH")
                .map(|path| normalize_path(&path))
                .unwrap_or(defaults.api_path),
            app_title: lookup("PAYRUSH_APP_TITLE").unwrap_or(defaults.app_title),
            banner_secs: lookup("PAYRUSH_BANNER_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.banner_secs),
            max_files: lookup("PAYRUSH_MAX_FILES")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_files),
            inbox: lookup("PAYRUSH_INBOX")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn banner_delay(&self) -> Duration {
        Duration::from_secs(self.banner_secs)
    }
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
