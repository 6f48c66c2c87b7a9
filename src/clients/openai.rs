use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatCompleter, ClientError, ensure_success};

pub const SERVICE: &str = "Chat completion";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    #[must_use]
    pub const fn with_shared_client(
        client: Client,
        url: String,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            client,
            url,
            api_key,
            model,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 1.0,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

#[async_trait]
impl ChatCompleter for ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(ClientError::http(SERVICE))?;

        let response: ChatResponse = ensure_success(SERVICE, response)
            .await?
            .json()
            .await
            .map_err(ClientError::http(SERVICE))?;

        first_reply(response)
    }
}

fn first_reply(response: ChatResponse) -> Result<String, ClientError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| ClientError::malformed(SERVICE, "response has no message content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_fixed_sampling() {
        let client = ChatClient::with_shared_client(
            Client::new(),
            "http://localhost".to_string(),
            "key".to_string(),
            "gpt-test".to_string(),
        );
        let body = serde_json::to_value(client.request("hi")).unwrap();
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["temperature"], 1.0);
        assert_eq!(body["frequency_penalty"], 0.0);
        assert_eq!(body["presence_penalty"], 0.0);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
    }

    #[test]
    fn first_choice_content_is_returned() {
        let json = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Hello"}},
            {"index":1,"message":{"role":"assistant","content":"Other"}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_reply(response).unwrap(), "Hello");
    }

    #[test]
    fn missing_content_is_malformed() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_reply(response).is_err());

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(first_reply(response).is_err());
    }
}
