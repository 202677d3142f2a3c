use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::model::Message;
use crate::model_gateway::{ModelGateway, ModelGatewayRequest};
use crate::schema::{self, CountryResponse, ReplyPolicy};

pub fn build_messages(encoded_request: &str) -> Vec<Message> {
    vec![
        Message::system(schema::system_prompt()),
        Message::user(encoded_request),
    ]
}

pub async fn lookup_country<G, W>(
    gateway: &G,
    country: &str,
    policy: ReplyPolicy,
    out: &mut W,
) -> Result<CountryResponse>
where
    G: ModelGateway + ?Sized,
    W: Write,
{
    let encoded_request =
        schema::encode_request(country).context("Failed to encode country request")?;
    writeln!(out, "Encoded request: {encoded_request}").context("Failed to write output")?;

    let reply = gateway
        .chat(ModelGatewayRequest {
            messages: build_messages(&encoded_request),
        })
        .await?
        .content;
    writeln!(out, "Received:\n{reply}").context("Failed to write output")?;

    let response = schema::decode_response(&reply, policy)
        .inspect_err(|err| {
            warn!(
                reply_policy = policy.as_str(),
                reply_len = reply.len(),
                error = %err,
                "model reply failed schema decode"
            );
        })
        .context("Failed to decode model reply")?;
    info!(country = %response.country, "decoded country response");
    writeln!(out, "Decoded response: {response:?}").context("Failed to write output")?;

    Ok(response)
}
