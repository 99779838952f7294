use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::jobs::fanout::DeliveryOutcome;
use crate::models::responses::DefaultResponse;

/// Errors that end a `/hook` request before or after the fan-out.
#[derive(Debug)]
pub enum HookError {
    MissingBotToken,
    Unauthorized,
    InvalidBody(String),
    NoDestinations,
    AllDeliveriesFailed(Vec<DeliveryOutcome>),
}

impl HookError {
    pub fn status(&self) -> StatusCode {
        match self {
            HookError::MissingBotToken => StatusCode::INTERNAL_SERVER_ERROR,
            HookError::Unauthorized => StatusCode::UNAUTHORIZED,
            HookError::InvalidBody(_) | HookError::NoDestinations => StatusCode::BAD_REQUEST,
            HookError::AllDeliveriesFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::MissingBotToken => write!(f, "TELEGRAM_BOT_TOKEN is not configured"),
            HookError::Unauthorized => write!(f, "Unauthorized"),
            HookError::InvalidBody(reason) => write!(f, "invalid request body: {}", reason),
            HookError::NoDestinations => write!(
                f,
                "no chat_id given in the request and none configured"
            ),
            HookError::AllDeliveriesFailed(outcomes) => {
                write!(f, "delivery failed for all {} chat(s)", outcomes.len())
            }
        }
    }
}

impl std::error::Error for HookError {}

impl IntoResponse for HookError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = DefaultResponse::error(self.to_string());

        if let HookError::AllDeliveriesFailed(outcomes) = self {
            body = body.with_result(json!(outcomes));
        }

        (status, body.into_json()).into_response()
    }
}

/// Why a single `sendMessage` call did not deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryError {
    /// Telegram answered, but not with a success.
    Rejected { status: u16, body: Value },
    /// No usable answer: timeout, DNS, connection reset, unreadable body.
    Transport(String),
}

impl DeliveryError {
    pub fn detail(&self) -> Value {
        match self {
            DeliveryError::Rejected { body, .. } => body.clone(),
            DeliveryError::Transport(message) => Value::String(message.clone()),
        }
    }
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Rejected { status, body } => {
                write!(f, "telegram rejected the message ({}): {}", status, body)
            }
            DeliveryError::Transport(message) => write!(f, "telegram unreachable: {}", message),
        }
    }
}

impl std::error::Error for DeliveryError {}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Transport(err.to_string())
    }
}
