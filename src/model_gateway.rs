use anyhow::Result;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

use crate::config::Config;
use crate::model::{self, Message};

pub struct ModelGatewayRequest {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelGatewayResponse {
    pub content: String,
}

pub type ModelGatewayFuture<'a> = Pin<Box<dyn Future<Output = Result<ModelGatewayResponse>> + 'a>>;

pub trait ModelGateway {
    fn chat<'a>(&'a self, request: ModelGatewayRequest) -> ModelGatewayFuture<'a>;
}

pub struct HostModelGateway<'a> {
    client: &'a Client,
    cfg: &'a Config,
}

impl<'a> HostModelGateway<'a> {
    pub fn new(client: &'a Client, cfg: &'a Config) -> Self {
        Self { client, cfg }
    }
}

impl ModelGateway for HostModelGateway<'_> {
    fn chat<'b>(&'b self, request: ModelGatewayRequest) -> ModelGatewayFuture<'b> {
        Box::pin(async move {
            let content = model::chat(self.client, self.cfg, &request.messages).await?;
            Ok(ModelGatewayResponse { content })
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{HostModelGateway, ModelGateway, ModelGatewayRequest};
    use crate::config::{Config, ServiceType};
    use crate::model::Message;
    use crate::schema::ReplyPolicy;

    #[tokio::test]
    async fn routes_to_provider_selected_by_service_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "{\"country\":\"Peru\"}"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let cfg = Config {
            service_type: ServiceType::Claude,
            country: "Peru".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            api_key: "sk-ant-test".to_string(),
            base_url: server.uri(),
            max_tokens: 1000,
            reply_policy: ReplyPolicy::Strict,
        };
        let gateway = HostModelGateway::new(&client, &cfg);

        let response = gateway
            .chat(ModelGatewayRequest {
                messages: vec![
                    Message::system("sys"),
                    Message::user("{\"country\":\"Peru\"}"),
                ],
            })
            .await
            .expect("gateway chat should succeed");

        assert_eq!(response.content, "{\"country\":\"Peru\"}");
    }
}
