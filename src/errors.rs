use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

/// Errors a chat request can surface to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Ollama service unavailable at {host}")]
    OllamaUnavailable { host: String },

    #[error("Inference error: {message}")]
    Inference { message: String },
}

impl ApiError {
    /// Classify a failed Ollama round trip. Refused connections map to the
    /// unavailable variant so callers can answer with 503 instead of 500.
    pub fn from_ollama(err: anyhow::Error, host: &str) -> Self {
        let msg = format!("{err:#}");
        if msg.contains("Connection refused") || msg.contains("connect") {
            ApiError::OllamaUnavailable {
                host: host.to_string(),
            }
        } else {
            ApiError::Inference { message: msg }
        }
    }

    pub fn is_agent_unavailable(&self) -> bool {
        matches!(self, ApiError::OllamaUnavailable { .. })
    }

    pub fn status(&self) -> StatusCode {
        if self.is_agent_unavailable() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn refused_connection_maps_to_unavailable() {
        let err = ApiError::from_ollama(
            anyhow!("error sending request: Connection refused (os error 111)"),
            "http://localhost:11434",
        );
        assert!(err.is_agent_unavailable());
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            err.to_string(),
            "Ollama service unavailable at http://localhost:11434"
        );
    }

    #[test]
    fn other_failures_map_to_inference_errors() {
        let err = ApiError::from_ollama(
            anyhow!("Ollama request failed with status: 500 Internal Server Error. Make sure Ollama is running with: ollama serve"),
            "http://localhost:11434",
        );
        assert!(!err.is_agent_unavailable());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Inference error:"));
    }
}
