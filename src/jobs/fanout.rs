use serde::Serialize;
use serde_json::Value;

use crate::errors::{DeliveryError, HookError};
use crate::repositories::telegram::TelegramClient;

/// What happened to one destination.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered { chat_id: String, response: Value },
    Failed { chat_id: String, error: Value },
}

impl DeliveryOutcome {
    fn new(chat_id: String, result: Result<Value, DeliveryError>) -> Self {
        match result {
            Ok(response) => {
                tracing::debug!(chat_id = %chat_id, "message delivered");
                DeliveryOutcome::Delivered { chat_id, response }
            }
            Err(err) => {
                tracing::warn!(chat_id = %chat_id, error = %err, "message not delivered");
                DeliveryOutcome::Failed {
                    chat_id,
                    error: err.detail(),
                }
            }
        }
    }

    pub fn chat_id(&self) -> &str {
        match self {
            DeliveryOutcome::Delivered { chat_id, .. } | DeliveryOutcome::Failed { chat_id, .. } => {
                chat_id
            }
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Outcomes of one fan-out, in destination order.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct FanoutReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl FanoutReport {
    pub fn sent_to(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_delivered())
            .map(|outcome| outcome.chat_id().to_string())
            .collect()
    }

    /// At least one destination got the message.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().any(DeliveryOutcome::is_delivered)
    }

    pub fn into_result(self) -> Result<FanoutReport, HookError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HookError::AllDeliveriesFailed(self.outcomes))
        }
    }
}

/// Sends `text` to every chat concurrently and waits for all of them.
pub async fn fan_out(
    client: &TelegramClient,
    bot_token: &str,
    chat_ids: &[String],
    text: &str,
) -> Result<FanoutReport, HookError> {
    if chat_ids.is_empty() {
        return Err(HookError::NoDestinations);
    }

    let handles: Vec<_> = chat_ids
        .iter()
        .map(|chat_id| {
            let client = client.clone();
            let bot_token = bot_token.to_string();
            let target = chat_id.clone();
            let text = text.to_string();

            let handle = tokio::spawn(async move {
                client.send_message(&bot_token, &target, &text).await
            });

            (chat_id.clone(), handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());

    for (chat_id, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(err) => Err(DeliveryError::Transport(format!("delivery task failed: {}", err))),
        };

        outcomes.push(DeliveryOutcome::new(chat_id, result));
    }

    let report = FanoutReport { outcomes };

    tracing::info!(
        attempted = report.outcomes.len(),
        delivered = report.sent_to().len(),
        "fan-out finished"
    );

    Ok(report)
}
