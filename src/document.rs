//! Structural parsing of the source specification.
//!
//! The specification is one long markdown document. Its top-level sections are
//! headings at the configured section level (`## ` by default); each section
//! body may in turn be split into subsections one level deeper (`### `).
//!
//! ```text
//! ---                        ┐
//! status: draft              │ preamble (everything before the first section)
//! ---                        │
//! # Title                    │
//! **Version 1.0**            ┘
//! ## 1. Introduction         ← section heading (title key: "1. Introduction")
//! body...
//! ### 1.1 Goals              ← subsection heading (prefix: "1.1")
//! body...
//! ```
//!
//! ## Code fences
//!
//! Fenced code blocks are opaque: a heading-looking line inside a fence is
//! body text. Fence state is a single flag toggled by every line that starts
//! (after indentation) with ```` ``` ````, carried linearly across the whole
//! input. An unclosed fence in one section therefore swallows every heading
//! after it. That is the documented behavior and is relied upon; do not scope
//! fence state per section.
//!
//! ## Duplicate titles
//!
//! Section titles are lookup keys. A repeated title replaces the earlier body
//! but keeps the earlier position in document order (last write wins).

use std::collections::HashMap;
use tracing::debug;

/// Opening/closing marker of a fenced code block.
pub const FENCE_MARKER: &str = "```";

/// Fence state for a line-by-line scan.
#[derive(Debug, Default, Clone, Copy)]
pub struct FenceState {
    open: bool,
}

impl FenceState {
    /// Feed the next line and report whether it sits inside a fence.
    ///
    /// The toggle happens before the answer, so an opening fence line counts
    /// as inside and a closing fence line as outside. Neither can be a
    /// heading, so the distinction only matters for callers that care.
    pub fn advance(&mut self, line: &str) -> bool {
        if line.trim_start().starts_with(FENCE_MARKER) {
            self.open = !self.open;
        }
        self.open
    }
}

/// The literal marker that opens a heading of `level`, e.g. `"## "` for 2.
pub fn heading_marker(level: usize) -> String {
    format!("{} ", "#".repeat(level))
}

/// A top-level section: its title key and the body text below its heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Lines between this heading and the next, joined with `\n`.
    pub body: String,
}

/// A parsed specification.
#[derive(Debug, Clone)]
pub struct Document {
    /// Text preceding the first section heading.
    pub preamble: String,
    sections: Vec<Section>,
    index: HashMap<String, usize>,
    level: usize,
}

impl Document {
    /// Split `text` into a preamble and sections at heading `level`.
    pub fn parse(text: &str, level: usize) -> Self {
        let split = split_at_headings(text, level);
        let mut doc = Document {
            preamble: split.leading.join("\n"),
            sections: Vec::new(),
            index: HashMap::new(),
            level,
        };
        for (title, lines) in split.blocks {
            doc.insert(title, lines.join("\n"));
        }
        debug!(sections = doc.sections.len(), level, "parsed document");
        doc
    }

    fn insert(&mut self, title: String, body: String) {
        match self.index.get(&title) {
            Some(&pos) => {
                debug!(%title, "duplicate section title, later body wins");
                self.sections[pos].body = body;
            }
            None => {
                self.index.insert(title.clone(), self.sections.len());
                self.sections.push(Section { title, body });
            }
        }
    }

    /// Look up a section by its exact title.
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.index.get(title).map(|&pos| &self.sections[pos])
    }

    /// All sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Heading level that delimits sections.
    pub fn level(&self) -> usize {
        self.level
    }
}

/// A subsection inside a section body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    pub title: String,
    pub body: String,
    level: usize,
}

impl Subsection {
    /// First whitespace-delimited token of the title, e.g. `"D.4"` from
    /// `"D.4 Lazy Loading"`. Filters match on this, never the full title.
    pub fn prefix(&self) -> &str {
        self.title.split_whitespace().next().unwrap_or("")
    }

    /// The heading line as it appeared in the source.
    pub fn heading(&self) -> String {
        format!("{}{}", heading_marker(self.level), self.title)
    }

    /// Heading and body, exactly as in the source section.
    pub fn full_text(&self) -> String {
        format!("{}\n{}", self.heading(), self.body)
    }
}

/// A section body split at its subsection headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSection {
    /// Text before the first subsection heading.
    pub intro: String,
    pub subsections: Vec<Subsection>,
}

/// Split a section body into intro and subsections at heading `level`.
///
/// Fence state starts closed: the body is scanned on its own, after the
/// document-level parse has already decided where it begins and ends.
pub fn split_subsections(body: &str, level: usize) -> SplitSection {
    let split = split_at_headings(body, level);
    SplitSection {
        intro: split.leading.join("\n"),
        subsections: split
            .blocks
            .into_iter()
            .map(|(title, lines)| Subsection {
                title,
                body: lines.join("\n"),
                level,
            })
            .collect(),
    }
}

struct HeadingSplit<'a> {
    leading: Vec<&'a str>,
    blocks: Vec<(String, Vec<&'a str>)>,
}

/// Shared line scanner for both section and subsection splitting.
///
/// Heading lines are consumed (they are not part of any body); every other
/// line, fence lines included, lands in the current block.
fn split_at_headings(text: &str, level: usize) -> HeadingSplit<'_> {
    let marker = heading_marker(level);
    let mut fence = FenceState::default();
    let mut leading = Vec::new();
    let mut blocks: Vec<(String, Vec<&str>)> = Vec::new();

    for line in text.split('\n') {
        let in_fence = fence.advance(line);
        if !in_fence {
            if let Some(rest) = line.strip_prefix(marker.as_str()) {
                blocks.push((rest.trim().to_string(), Vec::new()));
                continue;
            }
        }
        match blocks.last_mut() {
            Some((_, lines)) => lines.push(line),
            None => leading.push(line),
        }
    }

    HeadingSplit { leading, blocks }
}
