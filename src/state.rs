use std::sync::Arc;

use crate::config::Config;
use crate::translate::{Collaborators, Translator};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub translator: Arc<Translator>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        // Per-call bounds are enforced by the stages; these only catch hung sockets.
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let collaborators = Collaborators::from_config(&config, http_client);
        Ok(Self::with_collaborators(config, collaborators))
    }

    /// State over caller-supplied collaborators (used by tests).
    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Self {
        let translator = Translator::new(&config, collaborators);
        Self {
            config,
            translator: Arc::new(translator),
        }
    }
}
