use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{Message, MessageRole};
use crate::providers::http_errors::{ensure_success, model_api_request_error};

const PROVIDER: &str = "claude";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

fn messages_url(base_url: &str) -> String {
    format!("{}{MESSAGES_PATH}", base_url.trim_end_matches('/'))
}

/// The Messages API takes the system instruction as a top-level field rather
/// than as a role-tagged message.
fn to_messages_request<'a>(cfg: &'a Config, messages: &'a [Message]) -> MessagesRequest<'a> {
    let system_parts: Vec<&str> = messages
        .iter()
        .filter(|msg| msg.role == MessageRole::System)
        .map(|msg| msg.content.as_str())
        .collect();
    let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));

    MessagesRequest {
        model: &cfg.model,
        max_tokens: cfg.max_tokens,
        system,
        messages: messages
            .iter()
            .filter(|msg| msg.role != MessageRole::System)
            .map(|msg| ApiMessage {
                role: msg.role.as_str(),
                content: &msg.content,
            })
            .collect(),
    }
}

pub async fn chat(client: &Client, cfg: &Config, messages: &[Message]) -> Result<String> {
    let api_url = messages_url(&cfg.base_url);
    let body = to_messages_request(cfg, messages);
    debug!(
        api_url = %api_url,
        model = %cfg.model,
        max_tokens = cfg.max_tokens,
        "sending anthropic messages request"
    );

    let response = client
        .post(&api_url)
        .header("x-api-key", &cfg.api_key)
        .header("anthropic-version", ANTHROPIC_API_VERSION)
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            warn!(
                api_url = %api_url,
                model = %cfg.model,
                error = %err,
                "anthropic request failed"
            );
            model_api_request_error(err, &api_url)
        })?;
    let response = ensure_success(response, &api_url, PROVIDER).await?;

    let parsed: MessagesResponse = response
        .json()
        .await
        .context("Failed to parse anthropic messages response")?;
    let content = parsed
        .content
        .into_iter()
        .find_map(|block| block.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| anyhow!("{PROVIDER} response did not contain text content"))?;
    debug!(
        model = %cfg.model,
        response_len = content.len(),
        "received anthropic messages response"
    );
    Ok(content)
}
