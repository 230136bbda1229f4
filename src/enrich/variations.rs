//! Ranked alternative queries derived from the enriched query.

use crate::models::Suggestion;
use crate::query::grammar::{has_any_operator, quoted_phrases};
use crate::query::{field_expressions, Field, ValueKind};

pub const MAX_SUGGESTIONS: usize = 5;
pub const MIN_CITATIONS: u32 = 10;

/// Words longer than two characters in the first quoted phrase of the first
/// `abs:` term.
fn significant_words(query: &str) -> Vec<String> {
    let Some(first_abs) = field_expressions(query, Field::Abs).into_iter().next() else {
        return Vec::new();
    };
    let Some(phrase) = quoted_phrases(&first_abs.text).into_iter().next() else {
        return Vec::new();
    };
    phrase
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

fn push(suggestions: &mut Vec<Suggestion>, query: String, description: &str) {
    if suggestions.len() >= MAX_SUGGESTIONS || suggestions.iter().any(|s| s.query == query) {
        return;
    }
    suggestions.push(Suggestion::new(query, description));
}

/// Suggestion #1 is always `query` itself; the rest are appended only when
/// their rule applies. No minimum count is guaranteed.
pub fn generate(query: &str) -> Vec<Suggestion> {
    let mut suggestions = vec![Suggestion::new(query, "Best match")];

    let authors = field_expressions(query, Field::Author);
    let others: Vec<String> = authors
        .iter()
        .chain(field_expressions(query, Field::Pubdate).iter())
        .chain(field_expressions(query, Field::Object).iter())
        .map(|expr| expr.text.clone())
        .collect();

    let recombine = |abs_clause: String| -> String {
        std::iter::once(abs_clause)
            .chain(others.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let words = significant_words(query);
    if words.len() >= 2 {
        let all_terms = format!("abs:({})", words.join(" AND "));
        push(&mut suggestions, recombine(all_terms), "All terms (any order)");

        if !query.contains(" OR ") {
            let any_term = format!("abs:({})", words.join(" OR "));
            push(&mut suggestions, recombine(any_term), "Any term (broader)");
        }
    }

    if let Some(author) = authors.first() {
        // Lists hold several names; `^` applies to a single author only
        if !author.first_author && author.kind != ValueKind::List && !has_any_operator(query) {
            let first_author = format!(
                "{}author:\"^{}\"{}",
                &query[..author.start],
                author.value,
                &query[author.end..]
            );
            push(&mut suggestions, first_author, "First author only");
        }
    }

    if !query.contains("citation_count") {
        push(
            &mut suggestions,
            format!("{query} citation_count:[{MIN_CITATIONS} TO *]"),
            "Cited papers (10+)",
        );
    }

    suggestions
}
