use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// message in the provider's chat schema
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String
}

impl Message {

    pub fn system(content: impl Into<String>) -> Self {
        Message { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message { role: "assistant".to_string(), content: content.into() }
    }

}

// message as the web client keeps it in its own history.
// id is whatever scalar the client uses (number or string)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversationMessage {
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String
}

/// Body of `POST /api/chat`.
///
/// Generation parameters are kept as wide as JSON allows, range checks live in
/// `relay::validate_generation_params`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<ConversationMessage>>,
    #[serde(rename = "userInput", default)]
    pub user_input: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<i64>
}

// what gets sent to the completion provider
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: i64
}

impl CompletionRequest {

    // everything between the system prompt and the final user input
    pub fn history_len(&self) -> usize {
        self.messages.len().saturating_sub(2)
    }

}

#[derive(Debug, Deserialize, Serialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Value>
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Choice {
    pub message: ChoiceMessage
}

// content can be null on the provider side (tool calls, refusals)
#[derive(Debug, Deserialize, Serialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>
}

/// Generated text plus the provider's usage block, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Value>
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub daily_requests: u64,
    pub monthly_requests: u64,
    pub token_usage: u64,
    pub estimated_cost: &'static str
}

// clients send null for fields they never filled in
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>
{

    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())

}
