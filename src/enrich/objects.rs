//! Object resolution: expand `object:` values and object designations found
//! in the user's text into OR-lists of catalog aliases.

use std::time::Duration;

use super::catalog::{compact, find_designations, rank_aliases, MAX_ALIASES};
use crate::cache::TtlCache;
use crate::lookup::ObjectResolver;
use crate::query::{apply_rewrites, field_expressions, or_list, Field, Rewrite, ValueKind};

/// Aliases for `name`, from cache or the resolver. Failures and timeouts
/// yield an empty list and are not cached.
pub async fn aliases_for(
    name: &str,
    resolver: &dyn ObjectResolver,
    cache: &TtlCache<Vec<String>>,
    limit: Duration,
) -> Vec<String> {
    if let Some(cached) = cache.get(name) {
        return cached;
    }

    match tokio::time::timeout(limit, resolver.identifiers(name)).await {
        Ok(Ok(raw)) => {
            let aliases = rank_aliases(&raw);
            cache.insert(name, aliases.clone());
            aliases
        }
        Ok(Err(e)) => {
            tracing::warn!("Object lookup failed for '{name}': {e}");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(
                "Object lookup for '{name}' timed out after {}ms",
                limit.as_millis()
            );
            Vec::new()
        }
    }
}

/// Keeps the user's own term in the OR-list: it leads when the ranked
/// aliases do not already contain it.
fn with_original(value: &str, aliases: Vec<String>) -> Vec<String> {
    let key = compact(value);
    if aliases.iter().any(|a| compact(a) == key) {
        return aliases;
    }
    std::iter::once(value.to_string())
        .chain(aliases)
        .take(MAX_ALIASES)
        .collect()
}

pub async fn resolve_objects(
    query: &str,
    user_text: &str,
    resolver: &dyn ObjectResolver,
    cache: &TtlCache<Vec<String>>,
    limit: Duration,
) -> String {
    let fields: Vec<_> = field_expressions(query, Field::Object)
        .into_iter()
        .filter(|expr| expr.kind != ValueKind::List && !expr.value.is_empty())
        .collect();

    let mut rewrites = Vec::new();
    for expr in &fields {
        let aliases = aliases_for(&expr.value, resolver, cache, limit).await;
        if aliases.is_empty() {
            continue;
        }
        let aliases = with_original(&expr.value, aliases);
        // A single alias is just the name again
        if aliases.len() >= 2 {
            tracing::debug!("Expanding object '{}' to {} aliases", expr.value, aliases.len());
            rewrites.push(Rewrite::new(
                expr.start..expr.end,
                format!("object:{}", or_list(&aliases)),
            ));
        }
    }
    let mut out = apply_rewrites(query, &rewrites);

    let query_lower = query.to_lowercase();
    let query_compact = compact(query);
    for name in find_designations(user_text) {
        let key = compact(&name);
        let already_present = query_lower.contains(&name.to_lowercase())
            || query_compact.contains(&key)
            || fields.iter().any(|f| compact(&f.value) == key);
        if already_present {
            continue;
        }

        let aliases = aliases_for(&name, resolver, cache, limit).await;
        if !aliases.is_empty() {
            tracing::debug!("Adding object clause for '{name}' from free text");
            out = format!("{} object:{}", out.trim_end(), or_list(&aliases));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeResolver {
        table: HashMap<String, Vec<String>>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FakeResolver {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                    .collect(),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ObjectResolver for FakeResolver {
        async fn identifiers(&self, name: &str) -> anyhow::Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.table
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("unknown object {name}"))
        }
    }

    const LIMIT: Duration = Duration::from_millis(100);

    fn cache() -> TtlCache<Vec<String>> {
        TtlCache::new(16, Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_object_field_expands_to_aliases() {
        let resolver = FakeResolver::new(&[("M31", &["M31", "NGC 224", "Andromeda"])]);
        let out = resolve_objects("object:M31", "", &resolver, &cache(), LIMIT).await;
        assert_eq!(out, r#"object:(M31 OR "NGC 224" OR Andromeda)"#);
    }

    #[tokio::test]
    async fn test_denied_identifier_is_kept_in_list() {
        let resolver = FakeResolver::new(&[(
            "2MASS J00424433+4116074",
            &["2MASS J00424433+4116074", "M 31", "NGC 224"],
        )]);
        let out = resolve_objects(
            r#"object:"2MASS J00424433+4116074""#,
            "",
            &resolver,
            &cache(),
            LIMIT,
        )
        .await;
        assert_eq!(out, r#"object:("2MASS J00424433+4116074" OR M31 OR "NGC 224")"#);
    }

    #[tokio::test]
    async fn test_common_name_is_kept_ahead_of_aliases() {
        let resolver = FakeResolver::new(&[(
            "Andromeda",
            &["M 31", "NGC 224", "NAME Andromeda Galaxy"],
        )]);
        let out = resolve_objects("object:Andromeda", "", &resolver, &cache(), LIMIT).await;
        assert_eq!(out, r#"object:(Andromeda OR M31 OR "NGC 224" OR "Andromeda Galaxy")"#);
    }

    #[tokio::test]
    async fn test_original_term_survives_alias_cap() {
        let resolver = FakeResolver::new(&[(
            "Sombrero",
            &["M 104", "NGC 4594", "UGCA 293", "PGC 42407", "IRAS 12373-1120", "NAME Sombrero Galaxy"],
        )]);
        let out = resolve_objects("object:Sombrero", "", &resolver, &cache(), LIMIT).await;
        let list = out.strip_prefix("object:(").expect("rewritten to a list");
        assert!(list.starts_with("Sombrero OR "));
        assert_eq!(list.matches(" OR ").count(), MAX_ALIASES - 1);
    }

    #[tokio::test]
    async fn test_single_alias_leaves_field_untouched() {
        let resolver = FakeResolver::new(&[("Foo", &["Foo"])]);
        let out = resolve_objects("object:Foo abs:x", "", &resolver, &cache(), LIMIT).await;
        assert_eq!(out, "object:Foo abs:x");
    }

    #[tokio::test]
    async fn test_lookup_failure_leaves_query_unchanged() {
        let resolver = FakeResolver::new(&[]);
        let out = resolve_objects(r#"object:"Crab Nebula""#, "", &resolver, &cache(), LIMIT).await;
        assert_eq!(out, r#"object:"Crab Nebula""#);
    }

    #[tokio::test]
    async fn test_timeout_leaves_query_unchanged() {
        let mut resolver = FakeResolver::new(&[("M31", &["M31", "NGC 224"])]);
        resolver.delay = Duration::from_millis(200);
        let out =
            resolve_objects("object:M31", "", &resolver, &cache(), Duration::from_millis(10)).await;
        assert_eq!(out, "object:M31");
    }

    #[tokio::test]
    async fn test_free_text_designation_appends_clause() {
        let resolver = FakeResolver::new(&[("NGC 1275", &["NGC 1275", "NAME Perseus A", "3C 84"])]);
        let out = resolve_objects(
            "abs:\"AGN feedback\"",
            "AGN feedback in NGC 1275",
            &resolver,
            &cache(),
            LIMIT,
        )
        .await;
        assert_eq!(
            out,
            r#"abs:"AGN feedback" object:("NGC 1275" OR "Perseus A" OR "3C 84")"#
        );
    }

    #[tokio::test]
    async fn test_free_text_designation_already_in_query_is_skipped() {
        let resolver = FakeResolver::new(&[("M87", &["M87", "NGC 4486", "Virgo A"])]);
        let out = resolve_objects("abs:M87 abs:jet", "the M 87 jet", &resolver, &cache(), LIMIT).await;
        assert_eq!(out, "abs:M87 abs:jet");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_avoids_second_lookup() {
        let resolver = FakeResolver::new(&[("M31", &["M31", "NGC 224"])]);
        let cache = cache();
        resolve_objects("object:M31", "", &resolver, &cache, LIMIT).await;
        resolve_objects("object:m31", "", &resolver, &cache, LIMIT).await;
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_existing_or_list_is_not_reexpanded() {
        let resolver = FakeResolver::new(&[]);
        let q = r#"object:(M31 OR "NGC 224")"#;
        assert_eq!(resolve_objects(q, "", &resolver, &cache(), LIMIT).await, q);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_objects_is_noop() {
        let resolver = FakeResolver::new(&[]);
        let q = "abs:exoplanet pubdate:[2020 TO *]";
        assert_eq!(resolve_objects(q, "exoplanets", &resolver, &cache(), LIMIT).await, q);
    }
}
