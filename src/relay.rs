//! Reshaping of a client chat request into the request sent to the completion provider.

use crate::error::AppError;
use crate::models::{ChatRequest, CompletionRequest, ConversationMessage, Message};
use crate::persona;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: i64 = 300;

pub const MISSING_USER_INPUT: &str = "User input is required";

/// Returns the caller's input, rejecting a missing or empty one.
pub fn require_user_input(request: &ChatRequest) -> Result<&str, AppError> {

    match request.user_input.as_deref() {
        Some(input) if !input.is_empty() => Ok(input),
        _ => Err(AppError::BadRequest(MISSING_USER_INPUT.to_string()))
    }

}

/// Maps client history to provider messages.
///
/// Every entry whose `id` equals the id of the last entry is dropped, not only
/// the last entry itself, so repeated ids lose their earlier occurrences too.
/// Remaining entries keep their order; `sender == "user"` becomes the user role,
/// anything else the assistant role.
pub fn transform_history(messages: &[ConversationMessage]) -> Vec<Message> {

    let Some(last) = messages.last() else {
        return Vec::new();
    };

    messages
        .iter()
        .filter(|message| message.id != last.id)
        .map(|message| {
            if message.sender == "user" {
                Message::user(message.text.clone())
            } else {
                Message::assistant(message.text.clone())
            }
        })
        .collect()

}

/// Builds `[system, history..., user input]`.
///
/// `model`, `temperature` and `max_tokens` fall back to their defaults only when
/// missing or `null`. Any value the caller does send, including `""` or `0`,
/// is forwarded as-is.
pub fn build_completion_request(request: &ChatRequest, user_input: &str) -> CompletionRequest {

    let history = transform_history(request.messages.as_deref().unwrap_or_default());

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(persona::system_prompt()));
    messages.extend(history);
    messages.push(Message::user(user_input));

    CompletionRequest {
        model: request.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        messages,
        temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

}

/// Range checks applied only when `VALIDATE_GENERATION_PARAMS` is on.
pub fn validate_generation_params(request: &CompletionRequest) -> Result<(), AppError> {

    if !(0.0..=2.0).contains(&request.temperature) {
        return Err(AppError::BadRequest(format!(
            "temperature must be between 0 and 2, got {}",
            request.temperature
        )));
    }

    if request.max_tokens < 1 {
        return Err(AppError::BadRequest("max_tokens must be at least 1".to_string()));
    }

    Ok(())

}

#[cfg(test)]
mod tests {

    use super::*;
    use serde_json::json;

    fn conversation(id: serde_json::Value, sender: &str, text: &str) -> ConversationMessage {
        ConversationMessage { id, sender: sender.to_string(), text: text.to_string() }
    }

    fn chat_request(messages: Option<Vec<ConversationMessage>>, user_input: &str) -> ChatRequest {
        ChatRequest {
            messages,
            user_input: Some(user_input.to_string()),
            model: None,
            temperature: None,
            max_tokens: None
        }
    }

    #[test]
    fn test_single_message_history_is_empty() {

        let history = vec![conversation(json!(1), "user", "hi")];
        assert!(transform_history(&history).is_empty());

        let request = build_completion_request(&chat_request(Some(history), "hi"), "hi");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1], Message::user("hi"));

    }

    #[test]
    fn test_last_id_dropped_and_order_kept() {

        let history = vec![
            conversation(json!(1), "user", "a"),
            conversation(json!(2), "assistant", "b"),
            conversation(json!(3), "user", "c")
        ];

        assert_eq!(
            transform_history(&history),
            vec![Message::user("a"), Message::assistant("b")]
        );

        let request = build_completion_request(&chat_request(Some(history), "next"), "next");
        let roles: Vec<&str> = request.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(request.messages.last(), Some(&Message::user("next")));

    }

    #[test]
    fn test_repeated_ids_all_dropped() {

        let history = vec![
            conversation(json!("x"), "user", "first"),
            conversation(json!("y"), "bot", "middle"),
            conversation(json!("x"), "user", "last")
        ];

        assert_eq!(transform_history(&history), vec![Message::assistant("middle")]);

    }

    #[test]
    fn test_numeric_and_string_ids_differ() {

        let history = vec![
            conversation(json!(1), "user", "numeric"),
            conversation(json!("1"), "user", "string")
        ];

        assert_eq!(transform_history(&history), vec![Message::user("numeric")]);

    }

    #[test]
    fn test_text_passed_verbatim() {

        let history = vec![
            conversation(json!(1), "User", "  padded  "),
            conversation(json!(2), "user", "end")
        ];

        // only the exact literal "user" maps to the user role
        assert_eq!(transform_history(&history), vec![Message::assistant("  padded  ")]);

    }

    #[test]
    fn test_missing_or_empty_messages() {

        assert!(transform_history(&[]).is_empty());

        let request = build_completion_request(&chat_request(None, "hello"), "hello");
        assert_eq!(request.messages.len(), 2);

        let request = build_completion_request(&chat_request(Some(vec![]), "hello"), "hello");
        assert_eq!(request.messages.len(), 2);

    }

    #[test]
    fn test_defaults_and_overrides() {

        let request = build_completion_request(&chat_request(None, "q"), "q");
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 300);

        let mut chat = chat_request(None, "q");
        chat.model = Some("gpt-4o".to_string());
        chat.temperature = Some(5.0);
        chat.max_tokens = Some(0);

        // out of range values go through untouched
        let request = build_completion_request(&chat, "q");
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, 5.0);
        assert_eq!(request.max_tokens, 0);

        // only a missing value falls back, an explicit empty or zero one does not
        chat.model = Some(String::new());
        chat.temperature = Some(0.0);
        chat.max_tokens = Some(-1);
        let request = build_completion_request(&chat, "q");
        assert_eq!(request.model, "");
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, -1);

    }

    #[test]
    fn test_user_input_required() {

        assert!(require_user_input(&chat_request(None, "hey")).is_ok());
        assert!(matches!(
            require_user_input(&chat_request(None, "")),
            Err(AppError::BadRequest(_))
        ));

        let mut chat = chat_request(None, "");
        chat.user_input = None;
        assert!(require_user_input(&chat).is_err());

    }

    #[test]
    fn test_validate_generation_params() {

        let mut request = build_completion_request(&chat_request(None, "q"), "q");
        assert!(validate_generation_params(&request).is_ok());

        request.temperature = 2.5;
        assert!(validate_generation_params(&request).is_err());

        request.temperature = 0.0;
        request.max_tokens = 0;
        assert!(validate_generation_params(&request).is_err());

        request.max_tokens = -5;
        assert!(validate_generation_params(&request).is_err());

        request.max_tokens = 1;
        assert!(validate_generation_params(&request).is_ok());

    }

}
