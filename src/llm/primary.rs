//! Primary backend: a retrieval-augmented pipeline exposed behind an
//! OpenAI-compatible chat endpoint. Besides the usual `choices`, the response
//! carries a `pipeline_result` with the parsed intent, the few-shot examples
//! it retrieved, and per-step timing.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::parse::extract_query;
use super::{BackendKind, InferenceBackend, InferenceResult};
use crate::config::PipelineConfig;
use crate::models::Timing;

pub struct PipelineBackend {
    client: reqwest::Client,
    config: PipelineConfig,
}

impl PipelineBackend {
    pub fn new(client: reqwest::Client, config: PipelineConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl InferenceBackend for PipelineBackend {
    async fn generate(&self, text: &str) -> Result<InferenceResult> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .context("primary backend not configured")?;
        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

        let req = PipelineRequest {
            model: self.config.model.clone(),
            messages: vec![PipelineMessage {
                role: "user".to_string(),
                content: text.to_string(),
            }],
        };

        let mut builder = self.client.post(&url).json(&req);
        if let Some(key) = self.config.api_key.as_deref() {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let resp = builder
            .send()
            .await
            .context("Failed to reach pipeline endpoint")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Pipeline endpoint returned {status}: {body}");
        }

        let body: PipelineResponse = resp
            .json()
            .await
            .context("Failed to parse pipeline response")?;

        Ok(into_result(body))
    }
}

fn into_result(body: PipelineResponse) -> InferenceResult {
    let content = body
        .choices
        .first()
        .map(|c| c.message.content.clone())
        .unwrap_or_default();

    let Some(pipeline) = body.pipeline_result else {
        return InferenceResult::new(extract_query(&content), BackendKind::Primary);
    };

    let query = match pipeline.final_query {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => extract_query(&content),
    };

    let mut result = InferenceResult::new(query, BackendKind::Primary);
    result.intent = (!pipeline.intent.is_null()).then_some(pipeline.intent);
    result.retrieved_examples = pipeline.retrieved_examples;
    result.timing = Some(Timing {
        ner_ms: pipeline.timing.ner_ms,
        retrieval_ms: pipeline.timing.retrieval_ms,
        assembly_ms: pipeline.timing.assembly_ms,
        total_ms: pipeline.timing.total_ms,
    });
    result
}

// ─── Request/Response types ────────────────────────────

#[derive(Serialize)]
struct PipelineRequest {
    model: String,
    messages: Vec<PipelineMessage>,
}

#[derive(Serialize, Deserialize)]
struct PipelineMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct PipelineResponse {
    #[serde(default)]
    choices: Vec<PipelineChoice>,
    #[serde(default)]
    pipeline_result: Option<PipelineResult>,
}

#[derive(Deserialize)]
struct PipelineChoice {
    message: PipelineMessage,
}

#[derive(Deserialize)]
struct PipelineResult {
    #[serde(default)]
    intent: serde_json::Value,
    #[serde(default)]
    retrieved_examples: Vec<serde_json::Value>,
    #[serde(default)]
    timing: PipelineTiming,
    #[serde(default)]
    final_query: Option<String>,
}

#[derive(Deserialize, Default)]
struct PipelineTiming {
    #[serde(default)]
    ner_ms: u64,
    #[serde(default)]
    retrieval_ms: u64,
    #[serde(default)]
    assembly_ms: u64,
    #[serde(default)]
    total_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: Option<String>) -> PipelineBackend {
        PipelineBackend::new(
            reqwest::Client::new(),
            PipelineConfig {
                base_url,
                ..PipelineConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_unconfigured_backend_errors() {
        let err = backend(None).generate("x").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[tokio::test]
    async fn test_parses_pipeline_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{"message": {"role": "assistant", "content": "abs:ignored"}}],
                    "pipeline_result": {
                        "intent": {"topics": ["exoplanets"]},
                        "retrieved_examples": [{"nl": "exoplanet papers", "query": "abs:exoplanet"}],
                        "timing": {"ner_ms": 3, "retrieval_ms": 12, "assembly_ms": 1, "total_ms": 16},
                        "final_query": "abs:exoplanet year:2020-2023"
                    }
                }"#,
            )
            .create_async()
            .await;

        let result = backend(Some(server.url()))
            .generate("recent exoplanet papers")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.query, "abs:exoplanet year:2020-2023");
        assert_eq!(result.backend, BackendKind::Primary);
        assert_eq!(result.retrieved_examples.len(), 1);
        assert_eq!(result.intent.unwrap()["topics"][0], "exoplanets");
        assert_eq!(result.timing.unwrap().retrieval_ms, 12);
    }

    #[tokio::test]
    async fn test_falls_back_to_message_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "abs:galaxy"}}]}"#)
            .create_async()
            .await;

        let result = backend(Some(server.url())).generate("galaxies").await.unwrap();
        assert_eq!(result.query, "abs:galaxy");
        assert!(result.timing.is_none());
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let err = backend(Some(server.url())).generate("x").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}
