//! External lookups consumed by the enrichment stages.

pub mod autocomplete;
pub mod simbad;

use async_trait::async_trait;

/// Ranked author-name suggestions for a (possibly partial) name.
#[async_trait]
pub trait AuthorLookup: Send + Sync {
    async fn suggest(&self, name: &str) -> anyhow::Result<Vec<String>>;
}

/// Raw catalog identifiers for an astronomical object, in discovery order.
#[async_trait]
pub trait ObjectResolver: Send + Sync {
    async fn identifiers(&self, name: &str) -> anyhow::Result<Vec<String>>;
}

pub use autocomplete::AdsAutocomplete;
pub use simbad::SimbadResolver;
