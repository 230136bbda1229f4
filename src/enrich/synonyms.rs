//! Synonym expansion of `abs:` terms.
//!
//! Each set lists the canonical term first. Expansion keeps the user's own
//! term in front and only ever adds OR-alternatives.

use crate::query::{apply_rewrites, field_expressions, or_list, Field, Rewrite, ValueKind};

pub type SynonymSet = &'static [&'static str];

pub const SYNONYMS: &[(&str, SynonymSet)] = &[
    (
        "exoplanet",
        &["exoplanet", "extrasolar planet", "hot Jupiter", "super Earth"],
    ),
    (
        "dark matter",
        &["dark matter", "DM", "cold dark matter", "CDM", "WIMP"],
    ),
    (
        "dark energy",
        &["dark energy", "cosmological constant", "quintessence"],
    ),
    (
        "black hole",
        &["black hole", "BH", "supermassive black hole", "SMBH"],
    ),
    (
        "gravitational wave",
        &["gravitational wave", "gravitational radiation", "GW"],
    ),
    (
        "active galactic nucleus",
        &["active galactic nucleus", "AGN", "active galactic nuclei"],
    ),
    ("agn", &["AGN", "active galactic nucleus", "active galactic nuclei"]),
    ("quasar", &["quasar", "QSO", "quasi-stellar object"]),
    ("supernova", &["supernova", "supernovae", "SN"]),
    (
        "gamma-ray burst",
        &["gamma-ray burst", "GRB", "gamma ray burst"],
    ),
    ("fast radio burst", &["fast radio burst", "FRB"]),
    (
        "cosmic microwave background",
        &["cosmic microwave background", "CMB", "CMBR"],
    ),
    ("cmb", &["CMB", "cosmic microwave background"]),
    ("neutron star", &["neutron star", "pulsar", "magnetar"]),
    ("white dwarf", &["white dwarf", "WD", "degenerate star"]),
    ("brown dwarf", &["brown dwarf", "substellar object"]),
    (
        "star formation",
        &["star formation", "star-forming", "stellar birth"],
    ),
    (
        "interstellar medium",
        &["interstellar medium", "ISM", "interstellar gas"],
    ),
    ("galaxy cluster", &["galaxy cluster", "cluster of galaxies"]),
    (
        "protoplanetary disk",
        &["protoplanetary disk", "protoplanetary disc", "circumstellar disk"],
    ),
    ("habitable zone", &["habitable zone", "Goldilocks zone"]),
    (
        "stellar evolution",
        &["stellar evolution", "stellar lifecycle"],
    ),
    ("cosmic ray", &["cosmic ray", "cosmic radiation", "CR"]),
    ("redshift", &["redshift", "photometric redshift", "spectroscopic redshift"]),
    (
        "machine learning",
        &["machine learning", "deep learning", "neural network"],
    ),
];

/// True if `needle` occurs in `hay` starting at a word boundary.
fn contains_at_word_start(hay: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    hay.match_indices(needle).any(|(i, _)| {
        hay[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

/// Find the synonym set for `term`: exact (case-insensitive) key first, then
/// keys contained in the term or containing it at a word start, longest key
/// winning and table order breaking ties.
pub fn lookup(term: &str) -> Option<SynonymSet> {
    let lower = term.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some((_, set)) = SYNONYMS.iter().find(|(key, _)| *key == lower) {
        return Some(*set);
    }

    // Containment on very short terms matches almost anything
    if lower.chars().count() < 3 {
        return None;
    }

    let mut best: Option<(&str, SynonymSet)> = None;
    for (key, set) in SYNONYMS {
        let related = contains_at_word_start(&lower, key) || contains_at_word_start(key, &lower);
        if related && best.map_or(true, |(b, _)| key.len() > b.len()) {
            best = Some((*key, *set));
        }
    }
    best.map(|(_, set)| set)
}

/// The user's term followed by every distinct synonym.
fn expansion_terms(term: &str, set: SynonymSet) -> Vec<String> {
    let mut terms = vec![term.to_string()];
    for synonym in set.iter() {
        if !terms.iter().any(|t| t.eq_ignore_ascii_case(synonym)) {
            terms.push(synonym.to_string());
        }
    }
    terms
}

/// Rewrite every `abs:` term with a known synonym set into an OR-list.
pub fn expand_synonyms(query: &str) -> String {
    let mut rewrites = Vec::new();

    for expr in field_expressions(query, Field::Abs) {
        if expr.kind == ValueKind::List {
            continue;
        }
        let Some(set) = lookup(&expr.value) else {
            continue;
        };
        if set.len() < 2 {
            continue;
        }
        let terms = expansion_terms(&expr.value, set);
        tracing::debug!("Expanding abs:{} with {} synonyms", expr.value, terms.len() - 1);
        rewrites.push(Rewrite::new(
            expr.start..expr.end,
            format!("abs:{}", or_list(&terms)),
        ));
    }

    apply_rewrites(query, &rewrites)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_bare_term() {
        assert_eq!(
            expand_synonyms("abs:exoplanet"),
            r#"abs:(exoplanet OR "extrasolar planet" OR "hot Jupiter" OR "super Earth")"#
        );
    }

    #[test]
    fn test_expand_quoted_phrase() {
        assert_eq!(
            expand_synonyms(r#"abs:"dark matter""#),
            r#"abs:("dark matter" OR DM OR "cold dark matter" OR CDM OR WIMP)"#
        );
    }

    #[test]
    fn test_multiple_terms_expand_without_offset_drift() {
        let out = expand_synonyms(r#"abs:quasar AND abs:"fast radio burst" year:2021"#);
        assert_eq!(
            out,
            r#"abs:(quasar OR QSO OR "quasi-stellar object") AND abs:("fast radio burst" OR FRB) year:2021"#
        );
    }

    #[test]
    fn test_user_term_stays_first_on_containment_match() {
        let out = expand_synonyms(r#"abs:"exoplanet atmospheres""#);
        assert!(out.starts_with(r#"abs:("exoplanet atmospheres" OR exoplanet OR"#));
    }

    #[test]
    fn test_unknown_term_is_unchanged() {
        assert_eq!(expand_synonyms("abs:spectroscopy"), "abs:spectroscopy");
    }

    #[test]
    fn test_existing_or_list_is_untouched() {
        let q = "abs:(exoplanet OR planet)";
        assert_eq!(expand_synonyms(q), q);
    }

    #[test]
    fn test_no_abs_fields_is_noop() {
        let q = r#"author:"Smith, J." object:M31"#;
        assert_eq!(expand_synonyms(q), q);
    }

    #[test]
    fn test_lookup_ignores_mid_word_containment() {
        // "planet" sits inside "exoplanet" but not at a word start
        assert!(lookup("planet").is_none());
    }

    #[test]
    fn test_lookup_prefers_longest_key() {
        let set = lookup("supermassive black hole mergers").unwrap();
        assert_eq!(set[0], "black hole");
        let set = lookup("active galactic nucleus feedback").unwrap();
        assert_eq!(set[0], "active galactic nucleus");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("Dark Matter").unwrap()[0], "dark matter");
    }

    #[test]
    fn test_short_terms_require_exact_key() {
        assert!(lookup("ag").is_none());
        assert_eq!(lookup("AGN").unwrap()[0], "AGN");
    }
}
