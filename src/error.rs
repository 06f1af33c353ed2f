use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;

/// Failure kinds surfaced by the attendance engine.
///
/// Every transition either fully commits or fails with one of these; the
/// engine never retries on its own.
#[derive(Debug, Clone, Display, PartialEq, Eq)]
pub enum EngineError {
    /// Missing/blank mandatory justification text, malformed input.
    #[display(fmt = "{}", _0)]
    Validation(String),
    /// Duplicate active clock-in, or a restore colliding with an active record.
    #[display(fmt = "{}", _0)]
    Conflict(String),
    /// Transition attempted from a state that does not allow it.
    #[display(fmt = "{}", _0)]
    InvalidState(String),
}

impl EngineError {
    pub fn validation(detail: impl Into<String>) -> Self {
        EngineError::Validation(detail.into())
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        EngineError::Conflict(detail.into())
    }

    pub fn invalid_state(detail: impl Into<String>) -> Self {
        EngineError::InvalidState(detail.into())
    }

    /// Stable discriminant for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation",
            EngineError::Conflict(_) => "conflict",
            EngineError::InvalidState(_) => "invalid_state",
        }
    }
}

impl std::error::Error for EngineError {}

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::Conflict(_) => StatusCode::CONFLICT,
            EngineError::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}
