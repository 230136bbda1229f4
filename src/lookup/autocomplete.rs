use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::AuthorLookup;
use crate::config::AutocompleteConfig;

/// Author autocomplete over `GET {url}?term=..&field=author` with bearer auth.
pub struct AdsAutocomplete {
    client: reqwest::Client,
    config: AutocompleteConfig,
}

impl AdsAutocomplete {
    pub fn new(client: reqwest::Client, config: AutocompleteConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl AuthorLookup for AdsAutocomplete {
    async fn suggest(&self, name: &str) -> Result<Vec<String>> {
        let url = self
            .config
            .url
            .as_deref()
            .context("Autocomplete url not configured")?;

        let mut builder = self
            .client
            .get(url)
            .query(&[("term", name), ("field", "author")]);
        if let Some(token) = self.config.api_token.as_deref() {
            builder = builder.bearer_auth(token);
        }

        let resp = builder
            .send()
            .await
            .context("Failed to reach autocomplete service")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Autocomplete returned {status}");
        }

        let body: AutocompleteBody = resp
            .json()
            .await
            .context("Failed to parse autocomplete response")?;

        Ok(body.into_names())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AutocompleteBody {
    List(Vec<SuggestionItem>),
    Wrapped {
        #[serde(alias = "docs")]
        suggestions: Vec<SuggestionItem>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionItem {
    Plain(String),
    Object {
        #[serde(alias = "label", alias = "author")]
        value: String,
    },
}

impl AutocompleteBody {
    fn into_names(self) -> Vec<String> {
        let items = match self {
            AutocompleteBody::List(items) => items,
            AutocompleteBody::Wrapped { suggestions } => suggestions,
        };
        items
            .into_iter()
            .map(|item| match item {
                SuggestionItem::Plain(s) => s,
                SuggestionItem::Object { value } => value,
            })
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(url: String) -> AdsAutocomplete {
        AdsAutocomplete::new(
            reqwest::Client::new(),
            AutocompleteConfig {
                url: Some(url),
                api_token: Some("tok".to_string()),
                timeout_ms: 200,
            },
        )
    }

    #[tokio::test]
    async fn test_sends_term_field_and_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/autocomplete")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("term".into(), "Hawking".into()),
                Matcher::UrlEncoded("field".into(), "author".into()),
            ]))
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["Hawking, S. W.", "Hawking, S."]"#)
            .create_async()
            .await;

        let names = client_for(format!("{}/autocomplete", server.url()))
            .suggest("Hawking")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(names, vec!["Hawking, S. W.", "Hawking, S."]);
    }

    #[tokio::test]
    async fn test_object_items_under_suggestions_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/autocomplete")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"suggestions": [{"value": "Smith, J."}, {"label": "Smith, A."}]}"#)
            .create_async()
            .await;

        let names = client_for(format!("{}/autocomplete", server.url()))
            .suggest("Smith")
            .await
            .unwrap();
        assert_eq!(names, vec!["Smith, J.", "Smith, A."]);
    }

    #[tokio::test]
    async fn test_unauthorized_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/autocomplete")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        assert!(client_for(format!("{}/autocomplete", server.url()))
            .suggest("Smith")
            .await
            .is_err());
    }
}
