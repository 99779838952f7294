use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use config::{ConfigError, Environment, Source};
use serde::Deserialize;

use crate::models::destination::split_ids;

/// Process-wide settings, read once at startup.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_chat_ids: Option<String>,
    pub shared_secret: Option<String>,
    #[serde(default = "default_telegram_base_url")]
    pub telegram_base_url: String,
    #[serde(default = "default_telegram_timeout_secs")]
    pub telegram_timeout_secs: u64,
    #[serde(default = "default_listen_host")]
    pub listen_host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_telegram_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_telegram_timeout_secs() -> u64 {
    15
}

fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_chat_ids: None,
            shared_secret: None,
            telegram_base_url: default_telegram_base_url(),
            telegram_timeout_secs: default_telegram_timeout_secs(),
            listen_host: default_listen_host(),
            port: default_port(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn bot_token(&self) -> Option<&str> {
        non_blank(&self.telegram_bot_token)
    }

    /// Empty or absent disables the secret check.
    pub fn shared_secret(&self) -> Option<&str> {
        self.shared_secret.as_deref().filter(|secret| !secret.is_empty())
    }

    /// Configured plural list first, then the singular fallback.
    pub fn default_chat_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();

        if let Some(list) = &self.telegram_chat_ids {
            ids.extend(split_ids(list));
        }

        if let Some(single) = &self.telegram_chat_id {
            ids.extend(split_ids(single));
        }

        ids
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.telegram_timeout_secs)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.listen_host, self.port).parse::<SocketAddr>()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
