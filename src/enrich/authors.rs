//! Author disambiguation against the autocomplete service.
//!
//! Each `author:` value is replaced by the service's canonical spelling: the
//! suggestion matching it after normalization, or else the top suggestion.

use std::time::Duration;

use crate::cache::TtlCache;
use crate::lookup::AuthorLookup;
use crate::query::{apply_rewrites, field_expressions, Field, Rewrite, ValueKind};

/// Values this short are bare initials; lookups on them are noise.
const MIN_AUTHOR_LEN: usize = 3;

/// Strip commas, periods and whitespace, then lower-case.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ',' | '.') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Pick the suggestion to substitute for `value`, if any.
pub fn choose_suggestion<'a>(value: &str, suggestions: &'a [String]) -> Option<&'a str> {
    let wanted = normalize_name(value);
    suggestions
        .iter()
        .find(|s| normalize_name(s) == wanted)
        .or_else(|| suggestions.first())
        .map(String::as_str)
}

async fn suggestions_for(
    name: &str,
    lookup: &dyn AuthorLookup,
    cache: &TtlCache<Vec<String>>,
    limit: Duration,
) -> Vec<String> {
    if let Some(cached) = cache.get(name) {
        return cached;
    }

    match tokio::time::timeout(limit, lookup.suggest(name)).await {
        Ok(Ok(suggestions)) => {
            cache.insert(name, suggestions.clone());
            suggestions
        }
        Ok(Err(e)) => {
            tracing::warn!("Author autocomplete failed for '{name}': {e}");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(
                "Author autocomplete for '{name}' timed out after {}ms",
                limit.as_millis()
            );
            Vec::new()
        }
    }
}

pub async fn validate_authors(
    query: &str,
    lookup: &dyn AuthorLookup,
    cache: &TtlCache<Vec<String>>,
    limit: Duration,
) -> String {
    let mut rewrites = Vec::new();

    for expr in field_expressions(query, Field::Author) {
        if expr.kind == ValueKind::List || expr.value.chars().count() < MIN_AUTHOR_LEN {
            continue;
        }

        let suggestions = suggestions_for(&expr.value, lookup, cache, limit).await;
        let Some(chosen) = choose_suggestion(&expr.value, &suggestions) else {
            continue;
        };

        if normalize_name(chosen) != normalize_name(&expr.value) {
            tracing::debug!(
                "No exact autocomplete match for '{}', using top suggestion '{chosen}'",
                expr.value
            );
        }

        let marker = if expr.first_author { "^" } else { "" };
        let replacement = format!("author:\"{marker}{chosen}\"");
        if replacement != expr.text {
            rewrites.push(Rewrite::new(expr.start..expr.end, replacement));
        }
    }

    apply_rewrites(query, &rewrites)
}
