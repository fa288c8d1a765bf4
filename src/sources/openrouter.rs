//! OpenRouter client for generating market commentary.
//!
//! Talks to the OpenAI-compatible chat-completions endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

/// OpenRouter chat-completions client.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    referer: String,
    model: String,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client.
    pub fn new(api_key: String, base_url: String, referer: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url,
            referer,
            model,
        }
    }

    /// Send a prompt and return the assistant's reply.
    pub async fn generate(&self, prompt: &str) -> Result<String, String> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        debug!("Requesting completion from {} with model {}", url, self.model);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", "Radar")
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("API error: {}", response.status()));
        }

        let data: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        data.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| "Empty completion response".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest {
            model: "mistralai/mistral-7b-instruct",
            messages: vec![ChatMessage {
                role: "user",
                content: "Analise o mercado.",
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"mistralai/mistral-7b-instruct\""));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Analise o mercado.\""));
    }

    #[test]
    fn test_chat_completion_response_deserialization() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "O IBOV opera em alta."}}
            ]
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.content, "O IBOV opera em alta.");
    }

    #[test]
    fn test_chat_completion_response_empty_choices() {
        let json = r#"{"choices": []}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert!(response.choices.is_empty());
    }

    #[test]
    fn test_client_creation() {
        let client = OpenRouterClient::new(
            "sk-test".to_string(),
            "https://openrouter.ai/api/v1/".to_string(),
            "http://localhost".to_string(),
            "mistralai/mistral-7b-instruct".to_string(),
        );
        // Trailing slash in the base URL must not produce a double slash.
        assert_eq!(
            format!("{}/chat/completions", client.base_url.trim_end_matches('/')),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }
}
