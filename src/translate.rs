//! The translation pipeline: inference with fallback, constraint correction,
//! then the enrichment stages and variation generation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::constraints::{ConstraintChecker, FieldConstraints};
use crate::enrich::{authors, objects, operators, synonyms, variations};
use crate::error::{ApiError, ApiResult};
use crate::llm::primary::PipelineBackend;
use crate::llm::secondary::ChatBackend;
use crate::llm::{self, BackendKind, InferenceBackend};
use crate::lookup::{AdsAutocomplete, AuthorLookup, ObjectResolver, SimbadResolver};
use crate::models::{PipelineDebug, Timing, TranslateRequest, TranslateResponse};

pub const MISSING_QUERY: &str = "Missing required field: query";

/// External collaborators the pipeline calls out to.
#[derive(Clone)]
pub struct Collaborators {
    pub primary: Arc<dyn InferenceBackend>,
    pub secondary: Arc<dyn InferenceBackend>,
    pub authors: Arc<dyn AuthorLookup>,
    pub objects: Arc<dyn ObjectResolver>,
    pub constraints: Arc<dyn ConstraintChecker>,
}

impl Collaborators {
    /// HTTP-backed collaborators built from configuration.
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self {
            primary: Arc::new(PipelineBackend::new(client.clone(), config.pipeline.clone())),
            secondary: Arc::new(ChatBackend::new(client.clone(), config.llm.clone())),
            authors: Arc::new(AdsAutocomplete::new(client.clone(), config.autocomplete.clone())),
            objects: Arc::new(SimbadResolver::new(client, config.resolver.clone())),
            constraints: Arc::new(FieldConstraints),
        }
    }
}

/// Per-call upper bounds. The secondary backend has none of its own.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub primary: Duration,
    pub author: Duration,
    pub object: Duration,
}

impl Timeouts {
    pub fn from_config(config: &Config) -> Self {
        Self {
            primary: Duration::from_millis(config.pipeline.timeout_ms),
            author: Duration::from_millis(config.autocomplete.timeout_ms),
            object: Duration::from_millis(config.resolver.timeout_ms),
        }
    }
}

pub struct Translator {
    collaborators: Collaborators,
    timeouts: Timeouts,
    author_cache: TtlCache<Vec<String>>,
    object_cache: TtlCache<Vec<String>>,
}

impl Translator {
    pub fn new(config: &Config, collaborators: Collaborators) -> Self {
        let ttl = Duration::from_secs(config.cache.ttl_secs);
        Self {
            collaborators,
            timeouts: Timeouts::from_config(config),
            author_cache: TtlCache::new(config.cache.capacity, ttl),
            object_cache: TtlCache::new(config.cache.capacity, ttl),
        }
    }

    pub async fn translate(&self, req: &TranslateRequest) -> ApiResult<TranslateResponse> {
        let started = Instant::now();
        let text = req
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ApiError::BadRequest(MISSING_QUERY.to_string()))?;
        let c = &self.collaborators;

        // ── Step 1: Inference (primary, else secondary) ──────
        let inference = llm::infer(
            c.primary.as_ref(),
            c.secondary.as_ref(),
            text,
            req.use_pipeline,
            self.timeouts.primary,
        )
        .await
        .ok_or(ApiError::NoModelResponse)?;
        let used_pipeline = inference.backend == BackendKind::Primary;
        let raw_query = inference.query.clone();

        // ── Step 2: Constraint validation/correction ─────────
        let violations = c.constraints.validate(&raw_query);
        let (mut query, corrections) = c.constraints.correct(&raw_query);
        if !corrections.is_empty() {
            tracing::info!("Applied {} constraint corrections", corrections.len());
        }

        // ── Step 3: Operator heuristics (secondary only) ─────
        if !used_pipeline {
            query = operators::apply_operators(&query, text);
        }

        // ── Step 4: Author disambiguation ────────────────────
        query = authors::validate_authors(
            &query,
            c.authors.as_ref(),
            &self.author_cache,
            self.timeouts.author,
        )
        .await;

        // ── Step 5: Object alias resolution ──────────────────
        if req.resolve_objects {
            query = objects::resolve_objects(
                &query,
                text,
                c.objects.as_ref(),
                &self.object_cache,
                self.timeouts.object,
            )
            .await;
        }

        // ── Step 6: Synonym expansion ────────────────────────
        if req.expand {
            query = synonyms::expand_synonyms(&query);
        }

        // ── Step 7: Variations ───────────────────────────────
        let queries = variations::generate(&query);

        let total_ms = started.elapsed().as_millis() as u64;
        let timing = match inference.timing {
            Some(t) => Timing { total_ms, ..t },
            None => Timing {
                total_ms,
                ..Timing::default()
            },
        };
        tracing::info!(
            "Translated in {total_ms}ms via {:?} backend ({} variants)",
            inference.backend,
            queries.len()
        );

        let has_fixes = !violations.is_empty() || !corrections.is_empty();
        Ok(TranslateResponse {
            query,
            queries,
            raw_query: has_fixes.then(|| raw_query.clone()),
            constraint_violations: (!violations.is_empty()).then_some(violations),
            corrections: (!corrections.is_empty()).then(|| corrections.clone()),
            pipeline_debug: PipelineDebug {
                intent: inference.intent.unwrap_or(serde_json::Value::Null),
                retrieved_examples: inference.retrieved_examples,
                timing,
                constraint_corrections: corrections,
                fallback_reason: inference.fallback_reason,
                used_pipeline,
            },
        })
    }
}
