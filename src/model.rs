use anyhow::Result;
use reqwest::Client;
use tracing::debug;

use crate::config::{Config, ServiceType};
use crate::providers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

pub async fn chat(client: &Client, cfg: &Config, messages: &[Message]) -> Result<String> {
    debug!(
        service_type = cfg.service_type.as_str(),
        model = %cfg.model,
        message_count = messages.len(),
        "dispatching model chat request"
    );

    match cfg.service_type {
        ServiceType::Openai => providers::openai::chat(client, cfg, messages).await,
        ServiceType::Claude => providers::anthropic::chat(client, cfg, messages).await,
    }
}
