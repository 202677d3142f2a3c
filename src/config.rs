use std::env;

use clap::ValueEnum;
use thiserror::Error;
use tracing::warn;

use crate::cli::Args;
use crate::schema::ReplyPolicy;

pub const DEFAULT_COUNTRY: &str = "United Kingdom";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_CLAUDE_MODEL: &str = "claude-3-haiku-20240307";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
/// Sent as the key to self-hosted OpenAI-compatible servers, which ignore it.
const PLACEHOLDER_API_KEY: &str = "ollama";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ServiceType {
    #[default]
    Openai,
    Claude,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Claude => "claude",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key_env} environment variable is not set")]
    MissingApiKey { key_env: &'static str },
    #[error("--model must be provided when --base-url is specified")]
    MissingModel,
    #[error("--country must not be empty")]
    BlankCountry,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service_type: ServiceType,
    pub country: String,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub reply_policy: ReplyPolicy,
}

impl Config {
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        Self::resolve_with(args, |key| env::var(key).ok())
    }

    fn resolve_with(
        args: &Args,
        mut get_var: impl FnMut(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let country = args.country.trim();
        if country.is_empty() {
            return Err(ConfigError::BlankCountry);
        }

        let base_url_override = non_blank(args.base_url.as_deref());
        let model_override = non_blank(args.model.as_deref());

        let (api_key, base_url, model) = match args.service_type {
            ServiceType::Claude => {
                if let Some(url) = base_url_override {
                    warn!(base_url = %url, "--base-url is ignored for service type claude");
                }
                let api_key = required_key(&mut get_var, ANTHROPIC_API_KEY_ENV)?;
                let model = model_override.unwrap_or(DEFAULT_CLAUDE_MODEL);
                (api_key, DEFAULT_ANTHROPIC_BASE_URL.to_string(), model.to_string())
            }
            ServiceType::Openai => match base_url_override {
                Some(url) => {
                    let model = model_override.ok_or(ConfigError::MissingModel)?;
                    (
                        PLACEHOLDER_API_KEY.to_string(),
                        url.to_string(),
                        model.to_string(),
                    )
                }
                None => {
                    let api_key = required_key(&mut get_var, OPENAI_API_KEY_ENV)?;
                    let model = model_override.unwrap_or(DEFAULT_OPENAI_MODEL);
                    (api_key, DEFAULT_OPENAI_BASE_URL.to_string(), model.to_string())
                }
            },
        };

        Ok(Self {
            service_type: args.service_type,
            country: country.to_string(),
            model,
            api_key,
            base_url,
            max_tokens: args.max_tokens,
            reply_policy: args.reply_policy,
        })
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn required_key(
    get_var: &mut impl FnMut(&str) -> Option<String>,
    key_env: &'static str,
) -> Result<String, ConfigError> {
    get_var(key_env)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingApiKey { key_env })
}
