pub mod anthropic;
mod http_errors;
pub mod openai;
