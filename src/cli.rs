use clap::Parser;

use crate::config::{DEFAULT_COUNTRY, DEFAULT_MAX_TOKENS, ServiceType};
use crate::schema::ReplyPolicy;

const HELP_EXAMPLES: &str = "Examples:\n  countryinfo --country France\n  countryinfo --service-type claude --country Japan\n  countryinfo --base-url http://localhost:11434/v1 --model llama3 --reply-policy strip-fences";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "countryinfo",
    version,
    about = "Request structured country information from an LLM chat API",
    after_help = HELP_EXAMPLES
)]
pub struct Args {
    /// Name of the country to request information for
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Base URL of an OpenAI-compatible API; a placeholder key is sent and --model is required
    #[arg(long)]
    pub base_url: Option<String>,

    /// Model to use; defaults depend on the service type
    #[arg(long)]
    pub model: Option<String>,

    /// Provider to send the request to
    #[arg(long, value_enum, default_value_t = ServiceType::Openai)]
    pub service_type: ServiceType,

    /// Upper bound on reply length, in tokens
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: u32,

    /// How much formatting around the reply JSON to accept
    #[arg(long, value_enum, default_value_t = ReplyPolicy::Strict)]
    pub reply_policy: ReplyPolicy,
}
