use super::{ChatTurn, CompletionService};
use crate::config::Settings;
use crate::core::error::AitermError;
use crate::providers::base_client::{HttpClient, HttpResponse};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    stream: bool,
}

pub struct OpenRouterProvider {
    client: HttpClient,
    model: String,
}

impl OpenRouterProvider {
    pub fn new(settings: &Settings) -> Result<Self, AitermError> {
        let mut extra_headers = HashMap::new();
        extra_headers.insert("HTTP-Referer".to_string(), "http://localhost".to_string());
        extra_headers.insert("X-Title".to_string(), "AI Terminal Assistant".to_string());

        let client = HttpClient::new(
            settings.base_url.clone(),
            settings.api_key.clone().unwrap_or_default(),
            settings.timeout,
            Some(extra_headers),
        )?;

        Ok(Self {
            client,
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionService for OpenRouterProvider {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, AitermError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: turns,
            stream: false,
        };

        let response = self.client.post("chat/completions", &payload).await?;
        parse_completion(response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Pulls `choices[0].message.content` out of a chat-completions response.
pub fn parse_completion(response: HttpResponse) -> Result<String, AitermError> {
    if !response.is_success() {
        return Err(AitermError::Http {
            status: response.status,
            body: response.body,
        });
    }

    let parsed: Value = serde_json::from_str(&response.body).map_err(|e| AitermError::Decode {
        message: e.to_string(),
        raw: response.body.clone(),
    })?;

    let first_choice = match parsed.get("choices").and_then(Value::as_array) {
        Some(choices) if !choices.is_empty() => &choices[0],
        _ => {
            return Err(AitermError::MalformedResponse {
                message: "API response did not contain 'choices'".to_string(),
                raw: response.body,
            });
        }
    };

    match first_choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
    {
        Some(content) if !content.is_empty() => Ok(content.to_string()),
        _ => Err(AitermError::MalformedResponse {
            message: "AI response was empty or malformed".to_string(),
            raw: first_choice.to_string(),
        }),
    }
}
