//! Catalog designation patterns and alias ranking for astronomical objects.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum aliases kept per object.
pub const MAX_ALIASES: usize = 5;

/// Designations recognized in free text. Messier is case-sensitive so that
/// ordinary words ("m3" in "m3 of gas") don't trigger lookups.
static DESIGNATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bM\s?\d{1,3}\b",
        r"(?i)\bNGC\s?\d{1,4}[A-Z]?\b",
        r"(?i)\bIC\s?\d{1,4}\b",
        r"(?i)\bUGC\s?\d{1,5}\b",
        r"(?i)\bPGC\s?\d{1,7}\b",
        r"(?i)\b3C\s?\d{1,3}(?:\.\d)?\b",
        r"(?i)\bAbell\s?\d{1,4}\b",
        r"(?i)\b(?:MACS|RXC|SPT-CL|ACT-CL|XMMXCS)\s?J\d{4}(?:\.\d{1,2})?[+-]\d{2,4}(?:\.\d{1,2})?\b",
        r"(?i)\bHD\s?\d{1,6}\b",
        r"(?i)\bHIP\s?\d{1,6}\b",
        r"(?i)\b2MASS\s?J\d{8}[+-]\d{7}\b",
        r"(?i)\bSDSS\s?J\d{6}(?:\.\d{1,2})?[+-]\d{6}(?:\.\d{1,2})?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("designation pattern is valid"))
    .collect()
});

/// Identifier prefixes from survey or astrometric catalogs that nobody
/// searches literature by.
const DENIED_PREFIXES: &[&str] = &[
    "[", "1RXS ", "2MASS ", "2MASX ", "AG+", "AG-", "AKARI ", "BD+", "BD-", "CXO ", "EPIC ",
    "GALEX ", "Gaia ", "GSC ", "IRAS ", "KIC ", "LEDA ", "MCG", "PLX ", "PPM ", "SAO ", "SDSS ",
    "TIC ", "TYC ", "UCAC", "USNO", "WISE ", "WISEA ", "XMM", "Z ",
];

const NAME_PREFIX: &str = "NAME ";

static MESSIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^M\s*(\d{1,3})$").expect("valid regex"));

/// Priority classes, best first. Anything unmatched ranks after all of them.
static PRIORITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"^M\d{1,3}$", r"^NGC\s", r"^IC\s", r"^(?:Abell|ACO)\s", r"^3C\s"]
        .iter()
        .map(|p| Regex::new(p).expect("priority pattern is valid"))
        .collect()
});

/// Distinct designations mentioned in `text`, in order of appearance.
pub fn find_designations(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    for pattern in DESIGNATION_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            found.push((m.start(), canonical(m.as_str())));
        }
    }
    found.sort_by_key(|(pos, _)| *pos);

    let mut seen: Vec<String> = Vec::new();
    for (_, name) in found {
        if !seen.iter().any(|s| compact(s) == compact(&name)) {
            seen.push(name);
        }
    }
    seen
}

/// Collapse internal whitespace and write Messier numbers without a space.
pub fn canonical(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    match MESSIER_RE.captures(&collapsed) {
        Some(caps) => format!("M{}", &caps[1]),
        None => collapsed,
    }
}

/// Lower-cased with all whitespace removed, for loose comparisons.
pub fn compact(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Deny-list filter, `NAME ` stripping, priority ranking, de-duplication and
/// truncation of raw identifiers.
pub fn rank_aliases(raw: &[String]) -> Vec<String> {
    // (priority, discovery index, alias)
    let mut ranked: Vec<(usize, usize, String)> = Vec::new();
    let name_priority = 3;
    let fallback_priority = PRIORITY_PATTERNS.len() + 1;

    for (index, id) in raw.iter().enumerate() {
        let id = canonical(id);
        if id.is_empty() || DENIED_PREFIXES.iter().any(|p| id.starts_with(p)) {
            continue;
        }

        let (alias, priority) = match id.strip_prefix(NAME_PREFIX) {
            Some(name) => (name.trim().to_string(), name_priority),
            None => {
                let class = PRIORITY_PATTERNS.iter().position(|re| re.is_match(&id));
                // Abell and 3C rank after NAME-derived aliases
                let priority = match class {
                    Some(c) if c < name_priority => c,
                    Some(c) => c + 1,
                    None => fallback_priority,
                };
                (id, priority)
            }
        };
        ranked.push((priority, index, alias));
    }

    ranked.sort_by_key(|(priority, index, _)| (*priority, *index));

    let mut aliases: Vec<String> = Vec::new();
    for (_, _, alias) in ranked {
        if aliases.len() == MAX_ALIASES {
            break;
        }
        if !aliases.iter().any(|a| a.eq_ignore_ascii_case(&alias)) {
            aliases.push(alias);
        }
    }
    aliases
}
