//! Errors raised by the backend client.

use crate::models::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Connection failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Validation failed: {}", join_validation(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Validation details when the backend rejected the payload shape.
    pub fn validation_details(&self) -> &[ValidationError] {
        match self {
            Self::Validation(details) => details,
            _ => &[],
        }
    }
}

fn join_validation(details: &[ValidationError]) -> String {
    if details.is_empty() {
        return "no detail".to_string();
    }
    details
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocSegment;

    #[test]
    fn validation_display_lists_every_detail() {
        let err = ApiError::Validation(vec![
            ValidationError {
                loc: vec![LocSegment::Field("body".into()), LocSegment::Field("file".into())],
                msg: "field required".into(),
                kind: "missing".into(),
            },
            ValidationError {
                loc: vec![LocSegment::Field("body".into())],
                msg: "too large".into(),
                kind: "value_error".into(),
            },
        ]);
        assert!(err.is_validation());
        assert_eq!(err.validation_details().len(), 2);
        assert_eq!(
            err.to_string(),
            "Validation failed: body.file: field required; body: too large"
        );
    }

    #[test]
    fn status_error_display() {
        let err = ApiError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        };
        assert!(!err.is_validation());
        assert!(err.validation_details().is_empty());
        assert_eq!(err.to_string(), "Backend error 500 Internal Server Error: boom");
    }
}
