//! Conversation assistant — the single point of entry for all chat-completion
//! API calls.
//!
//! Sessions without an API key stay usable in demo mode: fixed replies after
//! a short simulated thinking delay. With a key, each turn makes exactly one
//! API attempt; failures become display strings, never session errors.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod prompts;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all assistant calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-3.5-turbo";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Simulated thinking delay before a demo-mode reply.
const DEMO_DELAY: Duration = Duration::from_millis(1200);
/// Prefix of every failure reply.
pub const ERROR_PREFIX: &str = "error: ";

/// Message roles as replayed to the chat API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat log entry. Insertion order is both display order and the order
/// replayed to the chat API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatMessage,
}

/// The single chat client shared by all sessions. Credentials are supplied
/// per call; the client itself holds none.
#[derive(Clone)]
pub struct AssistantClient {
    client: reqwest::Client,
    base_url: String,
}

impl AssistantClient {
    pub fn new() -> Self {
        Self::with_base_url(CHAT_COMPLETIONS_URL)
    }

    /// Client pointed at a non-default endpoint. Used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// Produces one assistant reply for the current turn.
    ///
    /// With no API key, returns a fixed demo string after the simulated
    /// delay. With a key, makes exactly one chat-completion attempt (no
    /// retries) and converts any failure into an `error: ...` string.
    pub async fn respond(
        &self,
        history: &[ChatMessage],
        api_key: Option<&str>,
        hidden_prompt: Option<&str>,
    ) -> String {
        let Some(api_key) = api_key.filter(|key| !key.is_empty()) else {
            tokio::time::sleep(DEMO_DELAY).await;
            return if hidden_prompt.is_some() {
                prompts::DEMO_DRAFT_REPLY.to_string()
            } else {
                prompts::DEMO_REPLY.to_string()
            };
        };

        // A pending hidden prompt replaces the history for this one call.
        let outgoing: Vec<ChatMessage> = match hidden_prompt {
            Some(prompt) => vec![ChatMessage::system(prompt)],
            None => history.to_vec(),
        };

        match self.call(&outgoing, api_key).await {
            Ok(reply) => reply,
            Err(details) => format!("{ERROR_PREFIX}{details}"),
        }
    }

    /// One attempt against the chat-completions endpoint.
    async fn call(&self, messages: &[ChatMessage], api_key: &str) -> Result<String, String> {
        let request = ChatCompletionRequest {
            model: MODEL,
            messages,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("chat API returned {status}: {body}"));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| e.to_string())?;

        debug!("assistant reply received ({} choices)", parsed.choices.len());

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| "chat API returned no choices".to_string())
    }
}

impl Default for AssistantClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let message = ChatMessage::user("hi");
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);

        let back: ChatMessage = serde_json::from_str(r#"{"role":"assistant","content":"ok"}"#)
            .unwrap();
        assert_eq!(back.role, Role::Assistant);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_key_ordinary_turn_returns_generic_demo_reply() {
        let client = AssistantClient::new();
        let history = [ChatMessage::user("hello")];
        let reply = client.respond(&history, None, None).await;
        assert_eq!(reply, prompts::DEMO_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_key_hidden_prompt_returns_demo_question_list() {
        let client = AssistantClient::new();
        let reply = client.respond(&[], None, Some("hidden")).await;
        assert_eq!(reply, prompts::DEMO_DRAFT_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_key_counts_as_no_key() {
        let client = AssistantClient::new();
        let reply = client.respond(&[], Some(""), None).await;
        assert_eq!(reply, prompts::DEMO_REPLY);
    }

    #[tokio::test]
    async fn test_api_failure_becomes_error_string() {
        // nothing listens on the discard port, so the one attempt fails fast
        let client = AssistantClient::with_base_url("http://127.0.0.1:9/v1/chat/completions");
        let history = [ChatMessage::user("hello")];
        let reply = client.respond(&history, Some("sk-test"), None).await;
        assert!(reply.starts_with(ERROR_PREFIX), "got: {reply}");
    }
}
