//! Span-based rewriting of query text.
//!
//! Stages scan their input once, collect the edits they want, then apply them
//! from the last span to the first. Earlier edits never shift the offsets of
//! later ones, so a replacement can never be matched or mangled twice.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub span: Range<usize>,
    pub replacement: String,
}

impl Rewrite {
    pub fn new(span: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

/// Apply rewrites collected in discovery (left-to-right) order against the
/// text they were discovered in. Overlapping spans are skipped.
pub fn apply_rewrites(text: &str, rewrites: &[Rewrite]) -> String {
    let mut out = text.to_string();
    let mut floor = text.len() + 1;

    for rewrite in rewrites.iter().rev() {
        let Range { start, end } = rewrite.span.clone();
        if start > end || end > text.len() || end > floor {
            tracing::debug!("Skipping overlapping rewrite at {start}..{end}");
            continue;
        }
        if !out.is_char_boundary(start) || !out.is_char_boundary(end) {
            continue;
        }
        out.replace_range(start..end, &rewrite.replacement);
        floor = start;
    }

    out
}
