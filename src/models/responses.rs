use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// JSON body of every `/hook` answer.
#[derive(Serialize, Debug, Default)]
pub struct DefaultResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_to: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl DefaultResponse {
    pub fn ok() -> Self {
        DefaultResponse {
            ok: true,
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        DefaultResponse {
            ok: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_sent_to(mut self, sent_to: Vec<String>) -> Self {
        self.sent_to = Some(sent_to);
        self
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn into_json(self) -> Json<Value> {
        Json(json!(self))
    }
}
