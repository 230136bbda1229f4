//! Object identifier lookup against a SIMBAD TAP sync endpoint.
//!
//! Every identifier sharing an `oidref` with the requested name is returned,
//! whitespace-collapsed (SIMBAD pads numbers: `M  31`, `NGC   224`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::ObjectResolver;
use crate::config::ResolverConfig;

pub struct SimbadResolver {
    client: reqwest::Client,
    config: ResolverConfig,
}

impl SimbadResolver {
    pub fn new(client: reqwest::Client, config: ResolverConfig) -> Self {
        Self { client, config }
    }
}

/// ADQL selecting all identifiers of the object known as `name`.
pub fn identifier_query(name: &str) -> String {
    let escaped = name.trim().replace('\'', "''");
    format!(
        "SELECT id2.id FROM ident AS id1 JOIN ident AS id2 USING(oidref) WHERE id1.id = '{escaped}'"
    )
}

#[async_trait]
impl ObjectResolver for SimbadResolver {
    async fn identifiers(&self, name: &str) -> Result<Vec<String>> {
        let url = self
            .config
            .tap_url
            .as_deref()
            .context("Object resolver url not configured")?;

        let adql = identifier_query(name);
        let form = [
            ("request", "doQuery"),
            ("lang", "adql"),
            ("format", "json"),
            ("query", adql.as_str()),
        ];

        let resp = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .context("Failed to reach object resolver")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Object resolver returned {status}");
        }

        let body: TapResponse = resp
            .json()
            .await
            .context("Failed to parse object resolver response")?;

        Ok(body
            .data
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .filter_map(|cell| cell.as_str().map(collapse_whitespace))
            .filter(|id| !id.is_empty())
            .collect())
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Deserialize)]
struct TapResponse {
    #[serde(default)]
    data: Vec<Vec<serde_json::Value>>,
}
