//! Inference backends and the primary-then-secondary fallback.

pub mod parse;
pub mod primary;
pub mod secondary;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::Timing;

/// Which backend produced the raw query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Primary,
    Secondary,
}

/// Raw model output plus whatever debug payload the backend returned.
#[derive(Debug, Clone)]
pub struct InferenceResult {
    pub query: String,
    pub backend: BackendKind,
    pub intent: Option<serde_json::Value>,
    pub retrieved_examples: Vec<serde_json::Value>,
    pub timing: Option<Timing>,
    /// Why the primary backend was not used, when it wasn't.
    pub fallback_reason: Option<String>,
}

impl InferenceResult {
    pub fn new(query: impl Into<String>, backend: BackendKind) -> Self {
        Self {
            query: query.into(),
            backend,
            intent: None,
            retrieved_examples: Vec::new(),
            timing: None,
            fallback_reason: None,
        }
    }
}

/// Tagged result of one inference attempt.
#[derive(Debug, Clone)]
pub enum InferenceOutcome {
    Success(InferenceResult),
    Failure(String),
}

impl InferenceOutcome {
    /// Run `fallback` with the failure reason if this attempt failed.
    pub async fn or_else<F, Fut>(self, fallback: F) -> InferenceOutcome
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = InferenceOutcome>,
    {
        match self {
            InferenceOutcome::Success(result) => InferenceOutcome::Success(result),
            InferenceOutcome::Failure(reason) => fallback(reason).await,
        }
    }

    pub fn into_result(self) -> Option<InferenceResult> {
        match self {
            InferenceOutcome::Success(result) => Some(result),
            InferenceOutcome::Failure(_) => None,
        }
    }

    fn from_call(result: anyhow::Result<InferenceResult>) -> Self {
        match result {
            Ok(r) if !r.query.trim().is_empty() => InferenceOutcome::Success(r),
            Ok(_) => InferenceOutcome::Failure("empty response".to_string()),
            Err(e) => InferenceOutcome::Failure(e.to_string()),
        }
    }
}

/// A model service that turns free text into a raw query.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn generate(&self, text: &str) -> anyhow::Result<InferenceResult>;
}

/// Call `backend`, giving up after `limit` if one is set.
pub async fn attempt(
    backend: &dyn InferenceBackend,
    text: &str,
    limit: Option<Duration>,
) -> InferenceOutcome {
    match limit {
        Some(limit) => match tokio::time::timeout(limit, backend.generate(text)).await {
            Ok(result) => InferenceOutcome::from_call(result),
            Err(_) => InferenceOutcome::Failure(format!(
                "timed out after {}ms",
                limit.as_millis()
            )),
        },
        None => InferenceOutcome::from_call(backend.generate(text).await),
    }
}

/// Primary with a bounded wait, else secondary with no extra bound.
/// Returns None when neither produced a query.
pub async fn infer(
    primary: &dyn InferenceBackend,
    secondary: &dyn InferenceBackend,
    text: &str,
    use_primary: bool,
    primary_timeout: Duration,
) -> Option<InferenceResult> {
    let first = if use_primary {
        attempt(primary, text, Some(primary_timeout)).await
    } else {
        InferenceOutcome::Failure("pipeline disabled by request".to_string())
    };

    let outcome = first
        .or_else(|reason| async move {
            tracing::warn!("Primary backend unavailable ({reason}), using secondary");
            match attempt(secondary, text, None).await {
                InferenceOutcome::Success(mut result) => {
                    result.fallback_reason = Some(reason);
                    InferenceOutcome::Success(result)
                }
                InferenceOutcome::Failure(secondary_reason) => {
                    tracing::warn!("Secondary backend failed: {secondary_reason}");
                    InferenceOutcome::Failure(secondary_reason)
                }
            }
        })
        .await;

    outcome.into_result()
}
