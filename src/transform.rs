//! Line-level text transforms applied while assembling a page.
//!
//! All of these are pure `&str -> String` functions so they compose in any
//! order the pipeline needs and can be tested in isolation.

use crate::document::FenceState;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Horizontal rule the source uses as a visual separator between sections.
pub const SECTION_RULE: &str = "---";

static ANCHOR_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\((#[a-z0-9-]+)\)").expect("anchor link pattern is valid"));

/// Drop one trailing `---` rule and the blank lines around it.
///
/// Trailing whitespace is trimmed whether or not a rule was present.
pub fn strip_trailing_rule(body: &str) -> &str {
    let trimmed = body.trim_end();
    match trimmed.strip_suffix(SECTION_RULE) {
        Some(rest) if rest.ends_with('\n') => rest.trim_end(),
        _ => trimmed,
    }
}

/// Remove a closing publication footer from the whole document.
///
/// The footer is a `---` rule line, then blank lines, then a final line
/// beginning with `marker`. An empty marker disables stripping.
pub fn strip_footer<'a>(text: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return text;
    }
    let trimmed = text.trim_end();
    let Some(newline) = trimmed.rfind('\n') else {
        return text;
    };
    if !trimmed[newline + 1..].starts_with(marker) {
        return text;
    }
    let before = trimmed[..newline].trim_end_matches('\n');
    match before.strip_suffix("\n---") {
        Some(rest) => rest,
        None => text,
    }
}

/// Shift every heading outside a code fence up one level.
///
/// Only levels 2 through 6 are touched; a level-1 heading has nowhere to go.
pub fn promote_headings(text: &str) -> String {
    let mut fence = FenceState::default();
    text.split('\n')
        .map(|line| {
            let in_fence = fence.advance(line);
            if !in_fence && is_promotable_heading(line) {
                &line[1..]
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_promotable_heading(line: &str) -> bool {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    (2..=6).contains(&hashes) && line.as_bytes().get(hashes) == Some(&b' ')
}

/// Point same-document anchor links at their cross-page targets.
///
/// Anchors missing from `table` are left alone; they may still resolve on
/// the page they ended up on.
pub fn rewrite_links(text: &str, table: &BTreeMap<String, String>) -> String {
    ANCHOR_LINK_RE
        .replace_all(text, |caps: &Captures| match table.get(&caps[1]) {
            Some(target) => format!("]({target})"),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Make text byte-stable: right-trim every line, drop trailing blank lines,
/// end with exactly one newline. Idempotent.
pub fn normalize(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').map(str::trim_end).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
