//! Secondary backend: a plain OpenAI-compatible chat model prompted with the
//! query grammar. Its output may wrap the query in a reasoning block and/or
//! a JSON object; both are peeled off by [`extract_query`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::parse::extract_query;
use super::{BackendKind, InferenceBackend, InferenceResult};
use crate::config::LlmConfig;

const SYSTEM_PROMPT: &str = "You translate astronomy literature search requests into \
structured search queries. Use fields such as abs:, title:, author:\"Last, F.\", \
author:\"^Last\" (first author), object:, pubdate:[YYYY-MM TO YYYY-MM], year:, \
citation_count:[N TO *], read_count:[N TO *], doctype:, property:, and operators \
trending(), similar(), useful(), reviews(), citations(), references(). Quote \
multi-word phrases. Respond with ONLY a JSON object: {\"query\": \"...\"}";

pub struct ChatBackend {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ChatBackend {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl InferenceBackend for ChatBackend {
    async fn generate(&self, text: &str) -> Result<InferenceResult> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let req = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: 0.0,
            max_tokens: self.config.max_tokens,
        };

        let mut builder = self.client.post(&url).json(&req);
        if let Some(key) = self.config.api_key.as_deref() {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let resp = builder
            .send()
            .await
            .context("Failed to call chat API for query generation")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Chat API returned {status}: {body}");
        }

        let body: ChatResponse = resp.json().await?;
        let content = body
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(InferenceResult::new(
            extract_query(&content),
            BackendKind::Secondary,
        ))
    }
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
