//! Validation and correction of enumerated field values.
//!
//! Models routinely invent values such as `doctype:journal` or
//! `property:peer-reviewed`. Invalid values are replaced by a close allowed
//! value when one exists, otherwise the clause is dropped. Both operations are
//! advisory: the handler always continues with the corrected query.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Correction, CorrectionAction, Violation};

/// Validator/corrector seam; swapped for fakes in tests.
pub trait ConstraintChecker: Send + Sync {
    fn validate(&self, query: &str) -> Vec<Violation>;
    fn correct(&self, query: &str) -> (String, Vec<Correction>);
}

const DOCTYPES: &[&str] = &[
    "abstract",
    "article",
    "book",
    "bookreview",
    "catalog",
    "circular",
    "editorial",
    "eprint",
    "erratum",
    "inbook",
    "inproceedings",
    "mastersthesis",
    "misc",
    "newsletter",
    "obituary",
    "phdthesis",
    "pressrelease",
    "proceedings",
    "proposal",
    "software",
    "talk",
    "techreport",
];

const PROPERTIES: &[&str] = &[
    "ads_openaccess",
    "article",
    "author_openaccess",
    "data",
    "eprint",
    "eprint_openaccess",
    "inproceedings",
    "non_article",
    "notrefereed",
    "ocrabstract",
    "openaccess",
    "pub_openaccess",
    "refereed",
    "software",
];

const DATABASES: &[&str] = &["astronomy", "earthscience", "general", "physics"];

/// Enumerated fields and their allowed values.
const CONSTRAINED_FIELDS: &[(&str, &[&str])] = &[
    ("doctype", DOCTYPES),
    ("property", PROPERTIES),
    ("database", DATABASES),
    ("collection", DATABASES),
];

static CONSTRAINED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(doctype|property|database|collection):("[^"]*"|[^\s()"]+)"#)
        .expect("valid regex")
});

static DANGLING_LEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:AND|OR)\s+)+").expect("valid regex"));
static DANGLING_TRAILING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s+(?:AND|OR))+$").expect("valid regex"));
static DOUBLE_OP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(AND|OR)\s+(?:AND|OR)\b").expect("valid regex"));
static EMPTY_PARENS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)").expect("valid regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Default checker over the static field tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldConstraints;

struct Invalid {
    span: std::ops::Range<usize>,
    field: String,
    value: String,
    suggestions: Vec<String>,
}

fn allowed_values(field: &str) -> Option<&'static [&'static str]> {
    CONSTRAINED_FIELDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(field))
        .map(|(_, values)| *values)
}

fn find_invalid(query: &str) -> Vec<Invalid> {
    CONSTRAINED_RE
        .captures_iter(query)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let field = caps.get(1)?.as_str().to_lowercase();
            let value = caps.get(2)?.as_str().trim_matches('"').to_string();
            let allowed = allowed_values(&field)?;
            let normalized = value.to_lowercase();
            if allowed.contains(&normalized.as_str()) {
                return None;
            }
            Some(Invalid {
                span: whole.range(),
                suggestions: suggest(&normalized, allowed),
                field,
                value,
            })
        })
        .collect()
}

/// Allowed values sharing a prefix with `value` or within edit distance 2.
fn suggest(value: &str, allowed: &[&str]) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    allowed
        .iter()
        .filter(|candidate| {
            candidate.starts_with(value) || value.starts_with(*candidate) || levenshtein(value, candidate) <= 2
        })
        .map(|s| s.to_string())
        .collect()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Collapse the debris a dropped clause leaves behind.
fn tidy(query: &str) -> String {
    let mut out = EMPTY_PARENS_RE.replace_all(query, " ").into_owned();
    out = SPACE_RE.replace_all(&out, " ").into_owned();
    // Repeat until stable: removing one dangling operator can expose another
    loop {
        let next = DOUBLE_OP_RE.replace_all(&out, "$1").into_owned();
        if next == out {
            break;
        }
        out = next;
    }
    let out = out.replace("( ", "(").replace(" )", ")");
    let out = DANGLING_LEADING_RE.replace(out.trim(), "").into_owned();
    DANGLING_TRAILING_RE.replace(&out, "").trim().to_string()
}

impl ConstraintChecker for FieldConstraints {
    fn validate(&self, query: &str) -> Vec<Violation> {
        find_invalid(query)
            .into_iter()
            .map(|inv| Violation {
                field: inv.field,
                value: inv.value,
                suggestions: inv.suggestions,
            })
            .collect()
    }

    fn correct(&self, query: &str) -> (String, Vec<Correction>) {
        let invalid = find_invalid(query);
        if invalid.is_empty() {
            return (query.to_string(), Vec::new());
        }

        let mut out = query.to_string();
        let mut corrections = Vec::with_capacity(invalid.len());
        let mut dropped = false;

        for inv in invalid.iter().rev() {
            let (replacement, action) = match inv.suggestions.first() {
                Some(s) => (format!("{}:{s}", inv.field), CorrectionAction::Replace),
                None => {
                    dropped = true;
                    (String::new(), CorrectionAction::Drop)
                }
            };
            out.replace_range(inv.span.clone(), &replacement);
            corrections.push(Correction {
                field: inv.field.clone(),
                original: inv.value.clone(),
                action,
                suggestions: inv.suggestions.clone(),
            });
        }
        corrections.reverse();

        if dropped {
            out = tidy(&out);
        }
        (out, corrections)
    }
}
