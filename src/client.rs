use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Completion, CompletionRequest, CompletionResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status} {message}")]
    Provider { status: u16, message: String },

    #[error("Malformed completion response: {0}")]
    Malformed(String)
}

/// Anything that can turn a completion request into generated text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ClientError>;
}

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    api_key: String,
    base_url: String
}

impl OpenAiClient {

    pub fn new(http_client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {

        OpenAiClient {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into()
        }

    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

}

#[async_trait]
impl CompletionService for OpenAiClient {

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ClientError> {

        // no timeout here, a hung provider holds the request open
        let response = self.http_client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ClientError::Provider {
                status: status.as_u16(),
                message: provider_error_message(&body)
            });
        }

        let body = response.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::Malformed(e.to_string()))?;

        let text = parsed.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClientError::Malformed("no message content in choices".to_string()))?;

        Ok(Completion { text, usage: parsed.usage })

    }

}

// openai style errors look like {"error": {"message": "..."}}
fn provider_error_message(body: &str) -> String {

    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value.get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())

}
