use serde::{Deserialize, Serialize};

/// Body of `POST /chat`. Fields left out by a client default to empty
/// strings instead of rejecting the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub context: String,
}

/// Body of a successful `POST /chat` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Served at `GET /` so clients (or a human with curl) can see what is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub model: String,
    pub games: usize,
}
