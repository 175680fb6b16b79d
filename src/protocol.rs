//! JSON-serializable bodies exchanged with the control tool.

use serde::{Deserialize, Serialize};

/// Fallback used when a valid JSON body arrives without a `message` field.
pub const MISSING_MESSAGE_FALLBACK: &str = "No message";

fn missing_message() -> String {
    MISSING_MESSAGE_FALLBACK.to_string()
}

/// Body of `POST /message`.
#[derive(Deserialize, Debug)]
pub struct UpdateRequest {
    #[serde(default = "missing_message")]
    pub message: String,
}

/// Acknowledgment for a stored update, echoing the value that was kept.
#[derive(Serialize, Debug)]
pub struct UpdateAck {
    pub status: &'static str,
    pub received: String,
}

impl UpdateAck {
    pub fn success(received: String) -> Self {
        Self {
            status: "success",
            received,
        }
    }
}

/// Reply to `GET /ping`: proves liveness and reports the current message.
#[derive(Serialize, Debug)]
pub struct PingResponse {
    pub status: &'static str,
    pub current_message: String,
}

impl PingResponse {
    pub fn alive(current_message: String) -> Self {
        Self {
            status: "alive",
            current_message,
        }
    }
}

/// Error body for rejected requests.
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}
