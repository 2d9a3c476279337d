use thiserror::Error;

/// Errors surfaced synchronously, before any probe is issued.
///
/// Per-probe failures (timeouts, transport errors) never appear here; the
/// executor folds them into a `ProbeResult` so a failing probe cannot abort
/// a run.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Unknown technique category: {0}")]
    UnknownCategory(String),

    #[error("Target is not an absolute URL: {0}")]
    InvalidTarget(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("A run is already in progress")]
    AlreadyRunning,

    #[error("No technique categories selected")]
    EmptySelection,

    #[error("Export serialization failed: {0}")]
    Export(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ProbeError::UnknownCategory("dom".to_string()).to_string(),
            "Unknown technique category: dom"
        );
        assert_eq!(
            ProbeError::InvalidTarget("/rel".to_string()).to_string(),
            "Target is not an absolute URL: /rel"
        );
        assert_eq!(
            ProbeError::AlreadyRunning.to_string(),
            "A run is already in progress"
        );
        assert_eq!(
            ProbeError::EmptySelection.to_string(),
            "No technique categories selected"
        );
    }
}
