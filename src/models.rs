use serde::{Deserialize, Serialize};

/// Translation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    /// Free-text search request. Optional here so a missing field can be
    /// reported as a 400 with the standard error body.
    #[serde(default)]
    pub query: Option<String>,
    /// Broaden `abs:` terms with synonyms
    #[serde(default = "default_true")]
    pub expand: bool,
    /// Resolve object names to catalog aliases
    #[serde(default = "default_true")]
    pub resolve_objects: bool,
    /// Try the primary pipeline backend before the secondary
    #[serde(default = "default_true")]
    pub use_pipeline: bool,
}

fn default_true() -> bool {
    true
}

impl TranslateRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            expand: true,
            resolve_objects: true,
            use_pipeline: true,
        }
    }
}

/// A candidate query with a human label. Position in the list encodes
/// specificity: best match first, progressively broader after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub query: String,
    pub description: String,
}

impl Suggestion {
    pub fn new(query: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            description: description.into(),
        }
    }
}

/// A field value outside its allowed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub value: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionAction {
    Drop,
    Replace,
}

/// An automatic fix applied to the raw query. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub field: String,
    pub original: String,
    pub action: CorrectionAction,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub ner_ms: u64,
    pub retrieval_ms: u64,
    pub assembly_ms: u64,
    pub total_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDebug {
    pub intent: serde_json::Value,
    pub retrieved_examples: Vec<serde_json::Value>,
    pub timing: Timing,
    pub constraint_corrections: Vec<Correction>,
    pub fallback_reason: Option<String>,
    pub used_pipeline: bool,
}

/// Translation response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub query: String,
    pub queries: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_violations: Option<Vec<Violation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrections: Option<Vec<Correction>>,
    /// Pre-correction text, present whenever violations or corrections exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_query: Option<String>,
    pub pipeline_debug: PipelineDebug,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_flags_default_to_true() {
        let req: TranslateRequest = serde_json::from_str(r#"{"query": "dark matter"}"#).unwrap();
        assert_eq!(req.query.as_deref(), Some("dark matter"));
        assert!(req.expand);
        assert!(req.resolve_objects);
        assert!(req.use_pipeline);
    }

    #[test]
    fn test_request_camel_case_flags() {
        let req: TranslateRequest = serde_json::from_str(
            r#"{"query": "x", "expand": false, "resolveObjects": false, "usePipeline": false}"#,
        )
        .unwrap();
        assert!(!req.expand);
        assert!(!req.resolve_objects);
        assert!(!req.use_pipeline);
    }

    #[test]
    fn test_missing_query_deserializes_to_none() {
        let req: TranslateRequest = serde_json::from_str(r#"{"expand": true}"#).unwrap();
        assert!(req.query.is_none());
    }

    #[test]
    fn test_correction_action_serializes_to_snake_case() {
        let json = serde_json::to_value(CorrectionAction::Replace).unwrap();
        assert_eq!(json, "replace");
    }

    #[test]
    fn test_pipeline_debug_always_has_fallback_reason_key() {
        let json = serde_json::to_value(PipelineDebug::default()).unwrap();
        assert!(json.get("fallbackReason").unwrap().is_null());
        assert_eq!(json["usedPipeline"], false);
        assert_eq!(json["timing"]["totalMs"], 0);
    }

    #[test]
    fn test_optional_response_fields_are_omitted() {
        let resp = TranslateResponse {
            query: "abs:x".into(),
            queries: vec![Suggestion::new("abs:x", "Best match")],
            constraint_violations: None,
            corrections: None,
            raw_query: None,
            pipeline_debug: PipelineDebug::default(),
        };
        let json = serde_json::to_value(resp).unwrap();
        assert!(json.get("rawQuery").is_none());
        assert!(json.get("corrections").is_none());
        assert!(json.get("pipelineDebug").is_some());
    }
}
