use serde::{Deserialize, Serialize};

/// Form fields of a Bot API `sendMessage` call.
#[derive(Serialize, Debug)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'a str,
}

/// The part of the Bot API reply envelope that decides success.
#[derive(Deserialize, Debug)]
pub struct TelegramApiResponse {
    pub ok: bool,
}
