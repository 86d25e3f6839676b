//! Subsection filtering for a single section.
//!
//! A page may narrow one of its sections down to selected subsections. Two
//! modes exist and exactly one is active:
//!
//! - **Include**: only the listed subsections survive, heading and body. The
//!   section intro is dropped, and the projector also drops the section's own
//!   heading, so the page reads as an excerpt.
//! - **Exclude**: everything survives except the listed subsections. An
//!   excluded subsection with a configured stub is replaced by its heading,
//!   its first paragraph, and the stub text (typically a pointer to the page
//!   that carries it in full). Without a stub, or with empty stub text, it
//!   disappears.
//!
//! Subsections are matched by prefix (first token of the title) and never
//! reordered.

use crate::document::{Subsection, split_subsections};
use std::collections::BTreeMap;

/// Which subsections of a section to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsectionFilter {
    Include {
        prefixes: Vec<String>,
    },
    Exclude {
        prefixes: Vec<String>,
        /// Replacement text per excluded prefix.
        stubs: BTreeMap<String, String>,
    },
}

impl SubsectionFilter {
    /// Prefixes this filter names, in configuration order.
    pub fn prefixes(&self) -> &[String] {
        match self {
            SubsectionFilter::Include { prefixes } | SubsectionFilter::Exclude { prefixes, .. } => {
                prefixes
            }
        }
    }

    /// Whether the section heading is kept above the filtered content.
    pub fn keeps_parent_heading(&self) -> bool {
        matches!(self, SubsectionFilter::Exclude { .. })
    }
}

/// Result of filtering one section body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered {
    pub text: String,
    /// Configured prefixes that matched no subsection.
    pub unmatched: Vec<String>,
}

/// Apply `filter` to a section body whose subsections are at heading `level`.
pub fn apply_filter(body: &str, filter: &SubsectionFilter, level: usize) -> Filtered {
    let split = split_subsections(body, level);

    let mut parts: Vec<String> = Vec::new();
    match filter {
        SubsectionFilter::Include { prefixes } => {
            for sub in &split.subsections {
                if contains(prefixes, sub.prefix()) {
                    parts.push(sub.full_text());
                }
            }
        }
        SubsectionFilter::Exclude { prefixes, stubs } => {
            parts.push(split.intro.clone());
            for sub in &split.subsections {
                if !contains(prefixes, sub.prefix()) {
                    parts.push(sub.full_text());
                } else if let Some(stub) = stubs.get(sub.prefix()).filter(|s| !s.is_empty()) {
                    parts.push(stub_for(sub, stub));
                }
            }
        }
    }

    let unmatched = filter
        .prefixes()
        .iter()
        .filter(|p| !split.subsections.iter().any(|s| s.prefix() == p.as_str()))
        .cloned()
        .collect();

    Filtered {
        text: parts.join("\n"),
        unmatched,
    }
}

fn contains(prefixes: &[String], prefix: &str) -> bool {
    prefixes.iter().any(|p| p == prefix)
}

/// Heading, blank line, first paragraph, blank line, stub text.
///
/// The first paragraph is the run of non-blank lines after any leading blank
/// lines; by convention it is the `**Description:**` line.
fn stub_for(sub: &Subsection, stub: &str) -> String {
    let mut out = sub.heading();
    out.push('\n');

    let paragraph = sub
        .body
        .split('\n')
        .skip_while(|line| line.trim().is_empty())
        .take_while(|line| !line.trim().is_empty());
    for line in paragraph {
        out.push('\n');
        out.push_str(line);
    }

    out.push_str("\n\n");
    out.push_str(stub);
    out
}
