use std::time::Duration;

use serde_json::Value;

use crate::errors::DeliveryError;
use crate::models::message::PARSE_MODE;
use crate::models::requests::telegram::{SendMessageRequest, TelegramApiResponse};

/// Bot API client. Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(TelegramClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Delivered only when the call succeeds at HTTP level and the body says `ok: true`.
    pub async fn send_message(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<Value, DeliveryError> {
        let form = SendMessageRequest {
            chat_id,
            text,
            parse_mode: PARSE_MODE,
        };

        let response = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.base_url, bot_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        let body = match serde_json::from_str::<Value>(&raw) {
            Ok(body) => body,
            Err(_) => Value::String(raw),
        };

        let accepted = serde_json::from_value::<TelegramApiResponse>(body.clone())
            .map(|reply| reply.ok)
            .unwrap_or(false);

        if status.is_success() && accepted {
            return Ok(body);
        }

        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
