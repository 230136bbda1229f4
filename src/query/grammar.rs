//! Scanners for `field:value` expressions in the search grammar.
//!
//! A field value is a quoted phrase (`abs:"dark matter"`), a parenthesized
//! list (`object:(M31 OR "NGC 224")`), a bracketed range
//! (`pubdate:[2020 TO 2023]`), or a bare token (`author:Smith`). A leading `^`
//! inside the value marks a first-author search.

use once_cell::sync::Lazy;
use regex::Regex;

/// Derived operators that wrap a whole sub-query.
pub const OPERATORS: &[&str] = &[
    "citations",
    "references",
    "trending",
    "useful",
    "similar",
    "reviews",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Abs,
    Author,
    Object,
    Pubdate,
}

impl Field {
    fn regex(self) -> &'static Regex {
        match self {
            Field::Abs => &*ABS_RE,
            Field::Author => &*AUTHOR_RE,
            Field::Object => &*OBJECT_RE,
            Field::Pubdate => &*PUBDATE_RE,
        }
    }
}

fn field_regex(field: &str) -> Regex {
    // Bracketed ranges (`pubdate:[2020 TO 2023]`) may contain spaces
    let pattern = format!(
        r#"(?i)\b{field}:(?:"(?P<quoted>[^"]*)"|\((?P<list>[^)]*)\)|(?P<range>\[[^\]]*\])|(?P<bare>[^\s()"]+))"#
    );
    Regex::new(&pattern).expect("field pattern is valid")
}

static ABS_RE: Lazy<Regex> = Lazy::new(|| field_regex("abs"));
static AUTHOR_RE: Lazy<Regex> = Lazy::new(|| field_regex("author"));
static OBJECT_RE: Lazy<Regex> = Lazy::new(|| field_regex("object"));
static PUBDATE_RE: Lazy<Regex> = Lazy::new(|| field_regex("pubdate"));

static QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));

/// Shape of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Quoted,
    List,
    Bare,
}

/// One `field:value` occurrence with its byte span in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExpr {
    pub start: usize,
    pub end: usize,
    /// The full matched expression, e.g. `author:"^Smith, J."`.
    pub text: String,
    /// The value with quotes, parentheses and the first-author marker removed.
    pub value: String,
    pub kind: ValueKind,
    pub first_author: bool,
}

/// Every occurrence of `field` in `query`, in left-to-right order.
pub fn field_expressions(query: &str, field: Field) -> Vec<FieldExpr> {
    field
        .regex()
        .captures_iter(query)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (raw, kind) = if let Some(m) = caps.name("quoted") {
                (m.as_str(), ValueKind::Quoted)
            } else if let Some(m) = caps.name("list") {
                (m.as_str(), ValueKind::List)
            } else if let Some(m) = caps.name("range") {
                (m.as_str(), ValueKind::Bare)
            } else {
                (caps.name("bare")?.as_str(), ValueKind::Bare)
            };
            let trimmed = raw.trim();
            let (value, first_author) = match trimmed.strip_prefix('^') {
                Some(rest) => (rest.trim().to_string(), true),
                None => (trimmed.to_string(), false),
            };
            Some(FieldExpr {
                start: whole.start(),
                end: whole.end(),
                text: whole.as_str().to_string(),
                value,
                kind,
                first_author,
            })
        })
        .collect()
}

/// Quoted phrases inside an expression, in order.
pub fn quoted_phrases(text: &str) -> Vec<String> {
    QUOTED_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// True when the query contains a call to `op`, e.g. `trending(`.
pub fn has_operator(query: &str, op: &str) -> bool {
    let lower = query.to_lowercase();
    lower.contains(&format!("{op}("))
}

/// True when any derived operator appears in the query.
pub fn has_any_operator(query: &str) -> bool {
    OPERATORS.iter().any(|op| has_operator(query, op))
}

/// Render terms as an OR-list, quoting multi-word terms:
/// `["M31", "NGC 224"]` becomes `(M31 OR "NGC 224")`.
pub fn or_list<S: AsRef<str>>(terms: &[S]) -> String {
    let parts: Vec<String> = terms.iter().map(|t| quote_term(t.as_ref())).collect();
    format!("({})", parts.join(" OR "))
}

/// Quote a term if it contains whitespace; embedded quotes are dropped.
pub fn quote_term(term: &str) -> String {
    let clean = term.replace('"', "");
    let clean = clean.trim();
    if clean.chars().any(char::is_whitespace) {
        format!("\"{clean}\"")
    } else {
        clean.to_string()
    }
}
