use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Primary (retrieval-augmented pipeline) inference backend
    pub pipeline: PipelineConfig,
    /// Secondary (plain chat-completion) inference backend
    pub llm: LlmConfig,
    /// Author autocomplete service
    pub autocomplete: AutocompleteConfig,
    /// Astronomical object identifier service
    pub resolver: ResolverConfig,
    /// Shared settings for the author and object caches
    pub cache: CacheConfig,
}

/// Configuration for the primary backend. If `base_url` is None the backend
/// is treated as unavailable and every request falls through to the secondary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub base_url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    /// Upper bound on the primary call; past it the secondary is used.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the OpenAI-compatible API
    pub base_url: String,
    /// Model name for query generation
    pub chat_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Completion token cap
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteConfig {
    pub url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// TAP sync endpoint, e.g. `https://simbad.cds.unistra.fr/simbad/sim-tap/sync`
    pub tap_url: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    /// Maximum entries per cache
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9100".to_string(),
            pipeline: PipelineConfig::default(),
            llm: LlmConfig::default(),
            autocomplete: AutocompleteConfig::default(),
            resolver: ResolverConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: "nls-pipeline".to_string(),
            api_key: None,
            timeout_ms: 2000,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            chat_model: "qwen3:1.7b".to_string(),
            api_key: None,
            max_tokens: 256,
        }
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            url: Some("https://api.adsabs.harvard.edu/v1/search/autocomplete".to_string()),
            api_token: None,
            timeout_ms: 200,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tap_url: Some("https://simbad.cds.unistra.fr/simbad/sim-tap/sync".to_string()),
            timeout_ms: 100,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            capacity: 2048,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("NL_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // Primary backend
        if let Ok(url) = std::env::var("PIPELINE_BASE_URL") {
            config.pipeline.base_url = Some(url);
        }
        if let Ok(model) = std::env::var("PIPELINE_MODEL") {
            config.pipeline.model = model;
        }
        if let Ok(key) = std::env::var("PIPELINE_API_KEY") {
            config.pipeline.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("PIPELINE_TIMEOUT_MS") {
            if let Ok(v) = val.parse() {
                config.pipeline.timeout_ms = v;
            }
        }

        // Secondary backend
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(v) = val.parse() {
                config.llm.max_tokens = v;
            }
        }

        // Lookups
        if let Ok(url) = std::env::var("ADS_AUTOCOMPLETE_URL") {
            config.autocomplete.url = Some(url);
        }
        if let Ok(token) = std::env::var("ADS_API_TOKEN") {
            config.autocomplete.api_token = Some(token);
        }
        if let Ok(val) = std::env::var("AUTHOR_TIMEOUT_MS") {
            if let Ok(v) = val.parse() {
                config.autocomplete.timeout_ms = v;
            }
        }
        if let Ok(url) = std::env::var("SIMBAD_TAP_URL") {
            config.resolver.tap_url = Some(url);
        }
        if let Ok(val) = std::env::var("OBJECT_TIMEOUT_MS") {
            if let Ok(v) = val.parse() {
                config.resolver.timeout_ms = v;
            }
        }

        // Caches
        if let Ok(val) = std::env::var("CACHE_TTL_SECS") {
            if let Ok(v) = val.parse() {
                config.cache.ttl_secs = v;
            }
        }
        if let Ok(val) = std::env::var("CACHE_CAPACITY") {
            if let Ok(v) = val.parse() {
                config.cache.capacity = v;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let config = Config::default();
        assert_eq!(config.pipeline.timeout_ms, 2000);
        assert_eq!(config.autocomplete.timeout_ms, 200);
        assert_eq!(config.resolver.timeout_ms, 100);
        assert_eq!(config.cache.ttl_secs, 3600);
    }

    #[test]
    fn test_primary_disabled_by_default() {
        assert!(Config::default().pipeline.base_url.is_none());
    }
}
