//! Path to view mapping.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Dashboard,
}

pub const ROUTES: [(&str, Route); 2] = [("/", Route::Landing), ("/dashboard", Route::Dashboard)];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("No view for path: {0}")]
pub struct UnknownRoute(pub String);

impl Route {
    /// Matches case-insensitively and ignores a trailing slash.
    pub fn resolve(path: &str) -> Result<Route, UnknownRoute> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/".to_string(),
            p if p.starts_with('/') => p.to_ascii_lowercase(),
            p => format!("/{}", p.to_ascii_lowercase()),
        };
        ROUTES
            .iter()
            .find(|(route_path, _)| *route_path == normalized)
            .map(|(_, route)| *route)
            .ok_or_else(|| UnknownRoute(trimmed.to_string()))
    }

    pub fn path(&self) -> &'static str {
        ROUTES
            .iter()
            .find(|(_, route)| route == self)
            .map(|(path, _)| *path)
            .unwrap_or("/")
    }
}
