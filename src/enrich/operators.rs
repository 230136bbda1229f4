//! Heuristic rewrite of plain queries into derived-operator calls.
//!
//! Only used for the secondary backend, which rarely emits operators on its
//! own. The trigger phrases are matched against the user's original text, and
//! the first rule that matches decides the operator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::query::grammar::has_operator;

static READ_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bread_count:(?:\[[^\]]*\]|[^\s()]+)").expect("valid regex")
});
static REVIEW_DOCTYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bdoctype:"?reviews?"?"#).expect("valid regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));
static EDGE_OP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:AND|OR)\s+)+|(?:\s+(?:AND|OR))+$").expect("valid regex"));

/// Clauses that the operator itself replaces.
#[derive(Debug, Clone, Copy)]
enum Strip {
    Nothing,
    ReadCount,
    ReviewDoctype,
}

struct OperatorRule {
    operator: &'static str,
    triggers: &'static [&'static str],
    strip: Strip,
}

const RULES: &[OperatorRule] = &[
    OperatorRule {
        operator: "citations",
        triggers: &["papers citing", "citing papers", "papers that cite", "works citing"],
        strip: Strip::Nothing,
    },
    OperatorRule {
        operator: "references",
        triggers: &[
            "papers referenced by",
            "referenced by",
            "references of",
            "reference list of",
            "papers cited by",
        ],
        strip: Strip::Nothing,
    },
    OperatorRule {
        operator: "similar",
        triggers: &["similar to", "papers like", "similar papers", "related papers"],
        strip: Strip::Nothing,
    },
    OperatorRule {
        operator: "reviews",
        triggers: &["review papers", "review articles", "reviews of", "reviews on", "a review of"],
        strip: Strip::ReviewDoctype,
    },
    OperatorRule {
        operator: "useful",
        triggers: &[
            "useful papers",
            "methodology papers",
            "methods papers",
            "foundational papers",
            "most useful",
        ],
        strip: Strip::Nothing,
    },
    OperatorRule {
        operator: "trending",
        triggers: &["trending", "popular", "hot topic", "hot papers", "what's hot", "most read"],
        strip: Strip::ReadCount,
    },
];

/// True if `phrase` occurs in `text` bounded by non-alphanumerics.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(i, m)| {
        let before = text[..i].chars().next_back();
        let after = text[i + m.len()..].chars().next();
        before.map_or(true, |c| !c.is_alphanumeric()) && after.map_or(true, |c| !c.is_alphanumeric())
    })
}

fn strip_clauses(query: &str, strip: Strip) -> String {
    let stripped = match strip {
        Strip::Nothing => query.to_string(),
        Strip::ReadCount => READ_COUNT_RE.replace_all(query, "").into_owned(),
        Strip::ReviewDoctype => REVIEW_DOCTYPE_RE.replace_all(query, "").into_owned(),
    };
    let collapsed = SPACE_RE.replace_all(stripped.trim(), " ");
    EDGE_OP_RE.replace_all(&collapsed, "").trim().to_string()
}

/// Wrap `query` in the operator implied by `user_text`, if any.
pub fn apply_operators(query: &str, user_text: &str) -> String {
    let text = user_text.to_lowercase();

    let Some(rule) = RULES
        .iter()
        .find(|rule| rule.triggers.iter().any(|t| contains_phrase(&text, t)))
    else {
        return query.to_string();
    };

    if has_operator(query, rule.operator) {
        return query.to_string();
    }

    let inner = strip_clauses(query, rule.strip);
    if inner.is_empty() {
        return query.to_string();
    }

    tracing::debug!("Wrapping query in {}()", rule.operator);
    format!("{}({inner})", rule.operator)
}
