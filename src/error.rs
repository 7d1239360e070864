use axum::http::StatusCode;
use thiserror::Error;

/// Closed set of request-level failures. Every fault is converted into a
/// structured error response at the request boundary; `Unexpected` is the
/// fallback for anything outside the anticipated kinds.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Repository URL is required")]
    MissingUrl,

    #[error("Repository not initialised. Clone a repo first via POST /api/repo")]
    NotInitialized,

    /// Clone against the version-control backend failed. The public message
    /// is a user-facing hint; the underlying error is kept for diagnostics.
    #[error("Failed to clone repository. Is the URL correct and the repo public?")]
    CloneFailed(anyhow::Error),

    #[error("Failed to construct commit tree: {0}")]
    GraphBuild(anyhow::Error),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(anyhow::Error),
}

impl AppError {
    /// HTTP status this failure maps to at the request boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUrl | AppError::NotInitialized => StatusCode::BAD_REQUEST,
            AppError::CloneFailed(_) | AppError::GraphBuild(_) | AppError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Underlying fault, for logging kinds whose public message hides it.
    pub fn detail(&self) -> Option<&anyhow::Error> {
        match self {
            AppError::MissingUrl | AppError::NotInitialized => None,
            AppError::CloneFailed(source)
            | AppError::GraphBuild(source)
            | AppError::Unexpected(source) => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn validation_and_precondition_errors_are_client_faults() {
        assert_eq!(AppError::MissingUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotInitialized.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn backend_and_fallback_errors_are_server_faults() {
        assert_eq!(
            AppError::CloneFailed(anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::GraphBuild(anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Unexpected(anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn clone_failure_hides_the_cause_but_keeps_it_for_logs() {
        let err = AppError::CloneFailed(anyhow!("dns lookup failed"));
        assert_eq!(
            err.to_string(),
            "Failed to clone repository. Is the URL correct and the repo public?"
        );
        assert_eq!(err.detail().map(|e| e.to_string()).as_deref(), Some("dns lookup failed"));
    }

    #[test]
    fn unexpected_failure_carries_the_underlying_message() {
        let err = AppError::Unexpected(anyhow!("disk full"));
        assert_eq!(err.to_string(), "An unexpected error occurred: disk full");
    }
}
