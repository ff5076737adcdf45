use super::types::CriticError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl CriticError {
    /// Classify this error to determine its type and whether it can be retried.
    ///
    /// Malformed agent output is deliberately non-retryable: a model that
    /// produced garbage once is unlikely to do better on an identical prompt,
    /// so the runner degrades the result immediately instead of burning
    /// rate-limiter slots.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Retryable errors
            CriticError::Throttled(_) => ErrorClassification {
                error_type: "ThrottledError",
                retryable: true,
            },
            CriticError::Model(_) => ErrorClassification {
                error_type: "ModelApiError",
                retryable: true,
            },
            CriticError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
            },
            CriticError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: true,
            },
            CriticError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: true,
            },

            // Non-retryable errors
            CriticError::Parse(_) => ErrorClassification {
                error_type: "ParseError",
                retryable: false,
            },
            CriticError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
            CriticError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            CriticError::Rejected(_) => ErrorClassification {
                error_type: "RejectedError",
                retryable: false,
            },
            CriticError::Cancelled => ErrorClassification {
                error_type: "CancelledError",
                retryable: false,
            },
            CriticError::Scheduling(_) => ErrorClassification {
                error_type: "SchedulingError",
                retryable: false,
            },
        }
    }
}
