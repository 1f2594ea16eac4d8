use crate::domain::models::chat::{ChatMessage, ChatRole};
use crate::domain::ports::LlmService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{error, info, warn, instrument};
use std::time::Duration;
use tokio::time::sleep;

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiService {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiService {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model,
        }
    }

    async fn send_request_with_retry(&self, url: &str, payload: &Value) -> Result<String, AppError> {
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self.client.post(url)
                .header("x-goog-api-key", &self.api_key)
                .json(payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: Value = response.json().await.map_err(|e| {
                            error!("Failed to parse Gemini response JSON: {:?}", e);
                            AppError::Upstream("unreadable model response".into())
                        })?;
                        return extract_content(body);
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            let text = response.text().await.unwrap_or_default();
                            return Err(AppError::Upstream(format!("Gemini failed after {} retries: {} - {}", retries, status, text)));
                        }
                        warn!("Gemini API transient error {}. Retrying in {}ms...", status, backoff);
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        return Err(AppError::Upstream(format!("Gemini rejected the request: {} - {}", status, text)));
                    }
                },
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        return Err(AppError::Upstream(format!("Gemini network error: {}", e)));
                    }
                    warn!("Gemini Network Error. Retrying in {}ms... {:?}", backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

/// Gemini names the assistant side of a conversation `model`.
fn gemini_role(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "model",
    }
}

pub fn build_payload(system_instruction: &str, messages: &[ChatMessage]) -> Value {
    let contents: Vec<Value> = messages
        .iter()
        .map(|m| json!({
            "role": gemini_role(m.role),
            "parts": [{ "text": m.content }]
        }))
        .collect();

    json!({
        "contents": contents,
        "systemInstruction": {
            "parts": [{ "text": system_instruction }]
        },
        "generationConfig": {
            "temperature": 0.7,
            "maxOutputTokens": 1024,
            "topP": 0.9
        }
    })
}

fn extract_content(body: Value) -> Result<String, AppError> {
    if let Some(first) = body.get("candidates").and_then(|c| c.as_array()).and_then(|c| c.first()) {
        if let Some(reason) = first.get("finishReason").and_then(|s| s.as_str())
            && reason == "SAFETY" {
                warn!("Chat reply blocked by safety filters");
                return Ok("I'm sorry, I can't help with that. Is there anything else about Airloft I can tell you?".to_string());
            }

        let text: String = first
            .pointer("/content/parts")
            .and_then(|p| p.as_array())
            .map(|parts| parts.iter().filter_map(|p| p.get("text").and_then(|t| t.as_str())).collect())
            .unwrap_or_default();
        if !text.trim().is_empty() {
            return Ok(text.trim().to_string());
        }
    }

    Err(AppError::Upstream(format!("model response missing content: {}", body)))
}

#[async_trait]
impl LlmService for GeminiService {
    #[instrument(skip(self, system_instruction, messages), fields(turns = messages.len(), model = %self.model))]
    async fn chat(
        &self,
        system_instruction: &str,
        messages: &[ChatMessage],
    ) -> Result<String, AppError> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let payload = build_payload(system_instruction, messages);

        info!("Sending chat request to Gemini...");
        let reply = self.send_request_with_retry(&url, &payload).await?;
        info!(reply_len = reply.len(), "Chat reply received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_turns_are_sent_as_model() {
        let messages = vec![
            ChatMessage { role: ChatRole::User, content: "hi".into() },
            ChatMessage { role: ChatRole::Assistant, content: "hello".into() },
        ];
        let payload = build_payload("sys", &messages);
        assert_eq!(payload["contents"][1]["role"], "model");
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(payload["systemInstruction"]["parts"][0]["text"], "sys");
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let body = json!({
            "candidates": [{
                "finishReason": "STOP",
                "content": { "parts": [{ "text": "Up to " }, { "text": "250 guests." }] }
            }]
        });
        assert_eq!(extract_content(body).unwrap(), "Up to 250 guests.");
    }

    #[test]
    fn empty_candidates_are_an_upstream_error() {
        assert!(matches!(extract_content(json!({ "candidates": [] })), Err(AppError::Upstream(_))));
    }
}
